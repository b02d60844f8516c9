//! NLRI wire format: prefixes with MPLS labels, Route Distinguishers and
//! ADD-PATH path identifiers.

pub mod afisafi;
pub mod common;
pub mod mpls;
pub mod mpls_vpn;
pub mod prefix;

pub use self::afisafi::{Nlri, NlriIter};
pub use self::common::PathId;
pub use self::mpls::{Label, Labels};
pub use self::mpls_vpn::{RouteDistinguisher, RouteDistinguisherType};
pub use self::prefix::PrefixAddress;
