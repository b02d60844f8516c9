use std::fmt;

use crate::util::parser::ParseError;
use super::afisafi::{Afi, AddressFamily};

/// Errors from constructing or composing NLRI and their parts.
///
/// Wire input that cannot be decoded yields a [`ParseError`] instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NlriError {
    /// Prefix length exceeds the address width of the family.
    InvalidMask { afi: Afi, mask: u8 },

    /// MPLS label does not fit in 20 bits.
    LabelOutOfRange(u32),

    /// Labels, RD and prefix together exceed the one-octet length field,
    /// data field carries the violating length in bits.
    LengthOverflow(usize),

    /// Address family is not one we know the shape of.
    UnsupportedFamily(AddressFamily),

    /// Labels or RD present (or missing) contrary to the address family.
    IllegalCombination,

    /// Fixed-size value supplied with the wrong number of octets.
    Format(ParseError),
}

impl From<ParseError> for NlriError {
    fn from(pe: ParseError) -> NlriError {
        NlriError::Format(pe)
    }
}

impl std::error::Error for NlriError { }

impl fmt::Display for NlriError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NlriError::InvalidMask { afi, mask } => {
                write!(f, "invalid prefix length {mask} for {afi}")
            }
            NlriError::LabelOutOfRange(label) => {
                write!(f, "MPLS label {label} exceeds 20 bits")
            }
            NlriError::LengthOverflow(n) => {
                write!(f, "NLRI length field overflow: {n} bits")
            }
            NlriError::UnsupportedFamily(family) => {
                write!(f, "unsupported address family {family}")
            }
            NlriError::IllegalCombination => {
                write!(f, "illegal combination of labels/RD for family")
            }
            NlriError::Format(pe) => {
                write!(f, "format error: {}", pe)
            }
        }
    }
}
