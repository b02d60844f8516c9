//! Path attribute values.
//!
//! The attribute envelope (flags, type code and length) is handled by the
//! caller. Values here are parsed from and composed to the octets inside
//! that envelope. [`AttributeHeader`] tells the envelope what to put around
//! them.

use std::fmt;

use octseq::{Octets, OctetsBuilder, Parser};

use crate::util::parser::ParseError;
use crate::bgp::error::NlriError;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags(u8);

impl Flags {
    // 0 1 2 3 4 5 6 7
    //
    // 0: optional (1 == optional)
    // 1: transitive (1 == transitive) (well-known attr are transitive)
    // 2: partial
    // 3: extended length (0 -> 1 byte length, 1 -> 2 byte length)
    // 4-7: MUST be 0 when sent, ignored when received
    pub const OPT_NON_TRANS: u8 = 0b1000_0000;
    pub const OPT_TRANS: u8     = 0b1100_0000;
    pub const WELLKNOWN: u8     = 0b0100_0000;

    /// Returns true if the optional flag is set.
    pub fn is_optional(self) -> bool {
        self.0 & 0x80 == 0x80
    }

    /// Returns true if the transitive bit is set.
    pub fn is_transitive(self) -> bool {
        self.0 & 0x40 == 0x40
    }
}

impl From<u8> for Flags {
    fn from(u: u8) -> Flags {
        Flags(u)
    }
}

impl From<Flags> for u8 {
    fn from(f: Flags) -> u8 {
        f.0
    }
}

pub trait AttributeHeader {
    const FLAGS: u8;
    const TYPE_CODE: u8;

    fn flags() -> Flags {
        Self::FLAGS.into()
    }
}

//------------ MultiExitDisc -------------------------------------------------

/// Wrapper for the 4 byte Multi-Exit Discriminator in path attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiExitDisc(pub u32);

impl AttributeHeader for MultiExitDisc {
    const FLAGS: u8 = Flags::OPT_NON_TRANS;
    const TYPE_CODE: u8 = 4;
}

impl MultiExitDisc {
    pub fn value_len(&self) -> usize { 4 }

    /// Creates the value from an attribute body of exactly four octets.
    pub fn from_slice(value: &[u8]) -> Result<Self, NlriError> {
        let b: [u8; 4] = value.try_into().map_err(|_|
            ParseError::form_error("MULTI_EXIT_DISC must be 4 octets")
        )?;
        Ok(Self(u32::from_be_bytes(b)))
    }

    pub fn compose_value<Target: OctetsBuilder>(&self, target: &mut Target)
        -> Result<(), Target::AppendError>
    {
        target.append_slice(&self.0.to_be_bytes())
    }

    /// Parses the value, which must take up the rest of `parser`.
    pub fn parse<R: Octets + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<Self, ParseError>
    {
        if parser.remaining() != 4 {
            return Err(ParseError::form_error(
                "invalid length for MULTI_EXIT_DISC"
            ));
        }
        Ok(Self(parser.parse_u32_be()?))
    }
}

impl fmt::Display for MultiExitDisc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn med() {
        let raw = vec![0x00, 0x00, 0x01, 0x00];
        let mut parser = Parser::from_ref(&raw);
        let med = MultiExitDisc::parse(&mut parser).unwrap();
        assert_eq!(med, MultiExitDisc(256));
        assert_eq!(med.to_string(), "256");
        assert_eq!(med.value_len(), 4);

        let mut target = Vec::new();
        med.compose_value(&mut target).unwrap();
        assert_eq!(target, raw);
        assert_eq!(MultiExitDisc::from_slice(&raw).unwrap(), med);
    }

    #[test]
    fn med_wrong_length() {
        let raw = vec![0x00, 0x00, 0x01, 0x00, 0x00];
        let mut parser = Parser::from_ref(&raw);
        assert!(MultiExitDisc::parse(&mut parser).is_err());
        assert!(MultiExitDisc::from_slice(&raw[..3]).is_err());
    }

    #[test]
    fn header() {
        assert_eq!(MultiExitDisc::TYPE_CODE, 4);
        assert!(MultiExitDisc::flags().is_optional());
        assert!(!MultiExitDisc::flags().is_transitive());
    }
}
