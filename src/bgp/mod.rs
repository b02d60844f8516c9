//! Types and parsing for BGP NLRI.

pub mod afisafi;
pub mod error;
pub mod nlri;
pub mod path_attributes;

pub use crate::util::parser::{FormError, ParseError};
pub use self::afisafi::{AddressFamily, Afi, Safi};
pub use self::error::NlriError;
