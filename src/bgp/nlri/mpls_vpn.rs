use std::cmp;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::Ipv4Addr;

use log::debug;
use octseq::{Octets, OctetsBuilder, Parser};
use crate::util::parser::ParseError;
use crate::bgp::error::NlriError;

//------------ RouteDistinguisher --------------------------------------------

/// Route Distinguisher (RD) as defined in RFC4364.
///
/// Eight octets on the wire: a two octet type followed by a six octet value
/// whose layout depends on the type.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteDistinguisher {
    /// Type 0: two octet ASN administrator, four octet assigned number.
    AsnAssigned { admin: u16, assigned: u32 },

    /// Type 1: IPv4 address administrator, two octet assigned number.
    Ipv4Assigned { admin: Ipv4Addr, assigned: u16 },

    /// Type 2: four octet ASN administrator, two octet assigned number.
    Asn4Assigned { admin: u32, assigned: u16 },

    /// Any other type, value kept as is.
    Unknown { typ: u16, value: [u8; 6] },
}

impl RouteDistinguisher {
    pub const COMPOSE_LEN: usize = 8;

    /// Creates a RD from its wire representation.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        let typ = u16::from_be_bytes([bytes[0], bytes[1]]);
        match typ {
            0 => RouteDistinguisher::AsnAssigned {
                admin: u16::from_be_bytes([bytes[2], bytes[3]]),
                assigned: u32::from_be_bytes(
                    [bytes[4], bytes[5], bytes[6], bytes[7]]
                ),
            },
            1 => RouteDistinguisher::Ipv4Assigned {
                admin: Ipv4Addr::new(bytes[2], bytes[3], bytes[4], bytes[5]),
                assigned: u16::from_be_bytes([bytes[6], bytes[7]]),
            },
            2 => RouteDistinguisher::Asn4Assigned {
                admin: u32::from_be_bytes(
                    [bytes[2], bytes[3], bytes[4], bytes[5]]
                ),
                assigned: u16::from_be_bytes([bytes[6], bytes[7]]),
            },
            _ => {
                let mut value = [0u8; 6];
                value.copy_from_slice(&bytes[2..]);
                RouteDistinguisher::Unknown { typ, value }
            }
        }
    }

    /// Creates a RD from a slice that must be exactly eight octets long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, NlriError> {
        let b: [u8; 8] = bytes.try_into().map_err(|_|
            ParseError::form_error("route distinguisher must be 8 octets")
        )?;
        Ok(Self::from_bytes(b))
    }

    pub fn zeroes() -> Self {
        Self::from_bytes([0u8; 8])
    }

    /// Returns the wire representation of this RD.
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut res = [0u8; 8];
        res[..2].copy_from_slice(&self.type_code().to_be_bytes());
        res[2..].copy_from_slice(&self.value());
        res
    }

    /// Returns the numeric type of this RD.
    pub fn type_code(&self) -> u16 {
        match self {
            RouteDistinguisher::AsnAssigned { .. } => 0,
            RouteDistinguisher::Ipv4Assigned { .. } => 1,
            RouteDistinguisher::Asn4Assigned { .. } => 2,
            RouteDistinguisher::Unknown { typ, .. } => *typ,
        }
    }

    /// Returns the type this RouteDistinguisher.
    pub fn typ(&self) -> RouteDistinguisherType {
        match self {
            RouteDistinguisher::AsnAssigned { .. } =>
                RouteDistinguisherType::Type0,
            RouteDistinguisher::Ipv4Assigned { .. } =>
                RouteDistinguisherType::Type1,
            RouteDistinguisher::Asn4Assigned { .. } =>
                RouteDistinguisherType::Type2,
            RouteDistinguisher::Unknown { .. } =>
                RouteDistinguisherType::UnknownType,
        }
    }

    /// Returns the raw value of this RouteDistinguisher.
    pub fn value(&self) -> [u8; 6] {
        let mut res = [0u8; 6];
        match self {
            RouteDistinguisher::AsnAssigned { admin, assigned } => {
                res[..2].copy_from_slice(&admin.to_be_bytes());
                res[2..].copy_from_slice(&assigned.to_be_bytes());
            }
            RouteDistinguisher::Ipv4Assigned { admin, assigned } => {
                res[..4].copy_from_slice(&admin.octets());
                res[4..].copy_from_slice(&assigned.to_be_bytes());
            }
            RouteDistinguisher::Asn4Assigned { admin, assigned } => {
                res[..4].copy_from_slice(&admin.to_be_bytes());
                res[4..].copy_from_slice(&assigned.to_be_bytes());
            }
            RouteDistinguisher::Unknown { value, .. } => {
                res = *value;
            }
        }
        res
    }

    pub fn parse<R: Octets + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<Self, ParseError>
    {
        let mut b = [0u8; 8];
        parser.parse_buf(&mut b)?;
        let res = Self::from_bytes(b);
        if let RouteDistinguisher::Unknown { typ, .. } = res {
            debug!("RouteDistinguisher of unknown type {}", typ);
        }
        Ok(res)
    }

    pub fn skip<R: Octets + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<(), ParseError>
    {
        Ok(parser.advance(Self::COMPOSE_LEN)?)
    }

    pub fn compose<Target: OctetsBuilder>(&self, target: &mut Target)
        -> Result<(), Target::AppendError>
    {
        target.append_slice(&self.to_bytes())
    }
}

//--- Eq, Ord and Hash on the wire representation

impl PartialEq for RouteDistinguisher {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for RouteDistinguisher { }

impl PartialOrd for RouteDistinguisher {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RouteDistinguisher {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl Hash for RouteDistinguisher {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state)
    }
}

impl From<[u8; 8]> for RouteDistinguisher {
    fn from(bytes: [u8; 8]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Renders the RD value alone, e.g. `1:2` or `10.0.0.1:5`.
///
/// The `route-distinguisher` keyword is added by [`Nlri`] when it renders
/// an RD as part of a whole NLRI.
///
/// [`Nlri`]: super::afisafi::Nlri
impl fmt::Display for RouteDistinguisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDistinguisher::AsnAssigned { admin, assigned } => {
                write!(f, "{}:{}", admin, assigned)
            }
            RouteDistinguisher::Ipv4Assigned { admin, assigned } => {
                write!(f, "{}:{}", admin, assigned)
            }
            RouteDistinguisher::Asn4Assigned { admin, assigned } => {
                write!(f, "{}:{}", admin, assigned)
            }
            RouteDistinguisher::Unknown { .. } => {
                write!(f, "{}", u64::from_be_bytes(self.to_bytes()))
            }
        }
    }
}

/// Route Distinguisher types as defined in RFC4364.
#[derive(Eq, PartialEq, Debug)]
pub enum RouteDistinguisherType {
    Type0,
    Type1,
    Type2,
    UnknownType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type0() {
        let rd = RouteDistinguisher::from_bytes(
            [0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02]
        );
        assert_eq!(rd, RouteDistinguisher::AsnAssigned { admin: 1, assigned: 2 });
        assert_eq!(rd.typ(), RouteDistinguisherType::Type0);
        assert_eq!(rd.to_string(), "1:2");
    }

    #[test]
    fn type1() {
        let rd = RouteDistinguisher::from_bytes(
            [0x00, 0x01, 10, 0, 0, 1, 0x00, 0x05]
        );
        assert_eq!(rd.typ(), RouteDistinguisherType::Type1);
        assert_eq!(rd.to_string(), "10.0.0.1:5");
        assert_eq!(rd.value(), [10, 0, 0, 1, 0, 5]);
    }

    #[test]
    fn type2() {
        let rd = RouteDistinguisher::from_bytes(
            [0x00, 0x02, 0xfa, 0x56, 0xea, 0x00, 0x00, 0x64]
        );
        assert_eq!(rd.typ(), RouteDistinguisherType::Type2);
        assert_eq!(rd.to_string(), "4200000000:100");
    }

    #[test]
    fn unknown_type() {
        let bytes = [0x00, 0x07, 0, 0, 0, 0, 0, 0x01];
        let rd = RouteDistinguisher::from_bytes(bytes);
        assert_eq!(rd.typ(), RouteDistinguisherType::UnknownType);
        assert_eq!(rd.type_code(), 7);
        assert_eq!(rd.to_bytes(), bytes);
        assert_eq!(rd.to_string(), "1970324836974593");
    }

    #[test]
    fn zeroes() {
        let rd = RouteDistinguisher::zeroes();
        assert_eq!(rd.to_string(), "0:0");
        let mut target = Vec::new();
        rd.compose(&mut target).unwrap();
        assert_eq!(target, vec![0u8; 8]);
    }

    #[test]
    fn compose_matches_parse() {
        let rd = RouteDistinguisher::Ipv4Assigned {
            admin: Ipv4Addr::new(192, 0, 2, 1),
            assigned: 65000,
        };
        let mut target = Vec::new();
        rd.compose(&mut target).unwrap();
        assert_eq!(target.len(), RouteDistinguisher::COMPOSE_LEN);

        let mut parser = Parser::from_ref(&target);
        assert_eq!(RouteDistinguisher::parse(&mut parser).unwrap(), rd);
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn short() {
        let raw = vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        let mut parser = Parser::from_ref(&raw);
        assert_eq!(
            RouteDistinguisher::parse(&mut parser),
            Err(ParseError::ShortInput)
        );
        assert!(RouteDistinguisher::from_slice(&raw).is_err());
    }
}
