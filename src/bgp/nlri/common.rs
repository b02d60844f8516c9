use octseq::{Octets, OctetsBuilder, Parser};
use crate::util::parser::ParseError;
use crate::bgp::error::NlriError;

use std::net::Ipv4Addr;
use std::fmt;
use std::str::FromStr;

//------------ Types ---------------------------------------------------------

/// Path Identifier for BGP Multiple Paths (RFC7911).
///
/// Conventionally written as a dotted quad, but really just a `u32`: the
/// integer, the four octets and the dotted quad all describe the same value.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathId(pub u32);

impl PathId {
    pub const COMPOSE_LEN: usize = 4;

    /// Creates a path id from exactly four octets in network byte order.
    pub fn from_slice(octets: &[u8]) -> Result<Self, NlriError> {
        let b: [u8; 4] = octets.try_into().map_err(|_|
            ParseError::form_error("path identifier must be 4 octets")
        )?;
        Ok(PathId(u32::from_be_bytes(b)))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn parse<R: Octets + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<Self, ParseError>
    {
        Ok(PathId(parser.parse_u32_be()?))
    }

    pub fn compose<Target: OctetsBuilder>(&self, target: &mut Target)
        -> Result<(), Target::AppendError>
    {
        target.append_slice(&self.to_bytes())
    }
}

impl From<u32> for PathId {
    fn from(id: u32) -> Self {
        PathId(id)
    }
}

impl From<Ipv4Addr> for PathId {
    fn from(addr: Ipv4Addr) -> Self {
        PathId(addr.into())
    }
}

impl From<PathId> for u32 {
    fn from(id: PathId) -> Self {
        id.0
    }
}

/// Accepts either a dotted quad (`0.0.0.1`) or a plain decimal (`1`).
impl FromStr for PathId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(addr) = Ipv4Addr::from_str(s) {
            return Ok(addr.into());
        }
        u32::from_str(s).map(PathId).map_err(|_|
            ParseError::form_error("invalid path identifier")
        )
    }
}

/// Renders the dotted quad without the `path-information` keyword, which
/// [`Nlri`] adds when rendering a whole NLRI.
///
/// [`Nlri`]: super::afisafi::Nlri
impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Ipv4Addr::from(self.0))
    }
}

//------------ Helper functions ----------------------------------------------

/// Composes the ADD-PATH part of an NLRI.
///
/// Nothing is written unless `include` is set. If it is set but there is no
/// path id, four zero octets stand in for it.
pub(super) fn compose_path_id<Target: OctetsBuilder>(
    path_id: Option<PathId>,
    include: bool,
    target: &mut Target
) -> Result<(), Target::AppendError> {
    if include {
        path_id.unwrap_or_default().compose(target)?;
    }
    Ok(())
}

pub(super) fn compose_len_path_id(include: bool) -> usize {
    if include { PathId::COMPOSE_LEN } else { 0 }
}

pub(super) fn prefix_bits_to_bytes(bits: u8) -> usize {
    if bits != 0 {
        (bits as usize - 1) / 8 + 1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_agree() {
        let from_int = PathId::from(0x0a000001);
        let from_slice = PathId::from_slice(&[10, 0, 0, 1]).unwrap();
        let from_str: PathId = "10.0.0.1".parse().unwrap();
        let from_dec: PathId = "167772161".parse().unwrap();
        assert_eq!(from_int, from_slice);
        assert_eq!(from_int, from_str);
        assert_eq!(from_int, from_dec);
        assert_eq!(from_int.to_string(), "10.0.0.1");
    }

    #[test]
    fn wrong_length() {
        assert!(matches!(
            PathId::from_slice(&[0, 0, 1]),
            Err(NlriError::Format(ParseError::Form(_)))
        ));
        assert!(PathId::from_slice(&[0, 0, 0, 0, 1]).is_err());
        assert!("1.2.3".parse::<PathId>().is_err());
    }

    #[test]
    fn compose_include() {
        let mut target = Vec::new();
        compose_path_id(Some(PathId(1)), false, &mut target).unwrap();
        assert!(target.is_empty());

        compose_path_id(None, true, &mut target).unwrap();
        assert_eq!(target, vec![0, 0, 0, 0]);

        target.clear();
        compose_path_id(Some(PathId(0x01020304)), true, &mut target).unwrap();
        assert_eq!(target, vec![1, 2, 3, 4]);
        assert_eq!(compose_len_path_id(true), 4);
        assert_eq!(compose_len_path_id(false), 0);
    }

    #[test]
    fn parse() {
        let raw = vec![0x00, 0x00, 0x00, 0x05, 0xff];
        let mut parser = Parser::from_ref(&raw);
        assert_eq!(PathId::parse(&mut parser).unwrap(), PathId(5));
        assert_eq!(parser.remaining(), 1);
        assert_eq!(PathId::parse(&mut parser), Err(ParseError::ShortInput));
    }

    #[test]
    fn bits_to_bytes() {
        assert_eq!(prefix_bits_to_bytes(0), 0);
        assert_eq!(prefix_bits_to_bytes(1), 1);
        assert_eq!(prefix_bits_to_bytes(8), 1);
        assert_eq!(prefix_bits_to_bytes(9), 2);
        assert_eq!(prefix_bits_to_bytes(32), 4);
        assert_eq!(prefix_bits_to_bytes(128), 16);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_tokens() {
        use serde_test::{assert_tokens, Token};
        assert_tokens(&PathId(100), &[
            Token::NewtypeStruct { name: "PathId" },
            Token::U32(100),
        ]);
    }
}
