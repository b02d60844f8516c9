//! Wire encoding and decoding of BGP NLRI.
//!
//! An NLRI announces or withdraws a single prefix. Depending on the address
//! family it also carries an MPLS label stack and a VPN Route
//! Distinguisher, and with ADD-PATH a path identifier. See
//! [`bgp::nlri::Nlri`] for the composite and [`bgp::afisafi`] for the rules
//! deciding its shape.
//!
//! ```
//! use nlricore::bgp::AddressFamily;
//! use nlricore::bgp::nlri::{Labels, Nlri, PrefixAddress, RouteDistinguisher};
//!
//! let family = AddressFamily::IPV4_MPLS_VPN_UNICAST;
//! let nlri = Nlri::vpn(
//!     PrefixAddress::new(family, &[10, 1, 2], 24).unwrap(),
//!     Labels::from_values([100]).unwrap(),
//!     RouteDistinguisher::AsnAssigned { admin: 65000, assigned: 1 },
//! ).unwrap();
//!
//! let raw = nlri.to_bytes(false);
//! assert_eq!(raw[0], 112);
//! let (parsed, rest) = Nlri::from_octets(&raw, family, false).unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(
//!     parsed.to_string(),
//!     "10.1.2.0/24 label 100 route-distinguisher 65000:1"
//! );
//! ```

pub mod bgp;

pub use octseq::Octets;

//--- Private modules

mod util;
