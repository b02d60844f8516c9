//! Address family identifiers and the wire-shape policy derived from them.

use std::fmt;

use crate::typeenum; // from util::macros

typeenum!(
    /// AFI as used in BGP OPEN and UPDATE messages.
    #[cfg_attr(feature = "serde", serde(from = "u16", into = "u16"))]
    Afi, u16,
    {
        1 => Ipv4,
        2 => Ipv6,
    });

typeenum!(
    /// SAFI as used in BGP OPEN and UPDATE messages.
    #[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
    Safi, u8,
    {
        1 => Unicast,
        2 => Multicast,
        4 => MplsUnicast,
        128 => MplsVpnUnicast,
    });

impl Afi {
    /// Returns the full width in bits of an address in this family.
    ///
    /// Returns `None` for address families without a fixed-width address.
    pub fn max_prefix_len(self) -> Option<u8> {
        match self {
            Afi::Ipv4 => Some(32),
            Afi::Ipv6 => Some(128),
            Afi::Unimplemented(_) => None,
        }
    }

    /// Returns the full width in octets of an address in this family.
    pub fn addr_len(self) -> Option<usize> {
        self.max_prefix_len().map(|bits| usize::from(bits) / 8)
    }
}

//------------ AddressFamily -------------------------------------------------

/// A pair of [`Afi`] and [`Safi`].
///
/// The pair decides the shape of an NLRI on the wire: whether it carries an
/// MPLS label stack, and whether it carries a Route Distinguisher. These
/// decisions are made here and nowhere else, so composing and parsing can
/// never disagree about them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct AddressFamily {
    afi: Afi,
    safi: Safi,
}

impl AddressFamily {
    pub const IPV4_UNICAST: Self = Self::new(Afi::Ipv4, Safi::Unicast);
    pub const IPV6_UNICAST: Self = Self::new(Afi::Ipv6, Safi::Unicast);
    pub const IPV4_MULTICAST: Self = Self::new(Afi::Ipv4, Safi::Multicast);
    pub const IPV6_MULTICAST: Self = Self::new(Afi::Ipv6, Safi::Multicast);
    pub const IPV4_MPLS_UNICAST: Self =
        Self::new(Afi::Ipv4, Safi::MplsUnicast);
    pub const IPV4_MPLS_VPN_UNICAST: Self =
        Self::new(Afi::Ipv4, Safi::MplsVpnUnicast);
    pub const IPV6_MPLS_VPN_UNICAST: Self =
        Self::new(Afi::Ipv6, Safi::MplsVpnUnicast);

    pub const fn new(afi: Afi, safi: Safi) -> Self {
        Self { afi, safi }
    }

    pub fn afi(self) -> Afi {
        self.afi
    }

    pub fn safi(self) -> Safi {
        self.safi
    }

    /// Returns whether NLRI of this family carry an MPLS label stack.
    pub fn has_label(self) -> bool {
        matches!(
            (self.afi, self.safi),
            (Afi::Ipv4, Safi::MplsUnicast)
            | (Afi::Ipv4, Safi::MplsVpnUnicast)
            | (Afi::Ipv6, Safi::MplsVpnUnicast)
        )
    }

    /// Returns whether NLRI of this family carry a Route Distinguisher.
    ///
    /// Only labeled VPN families do; labeled unicast carries labels alone.
    pub fn has_rd(self) -> bool {
        self.has_label() && self.safi == Safi::MplsVpnUnicast
    }

    /// Returns whether this crate knows how to encode NLRI of this family.
    pub fn is_supported(self) -> bool {
        self.afi.max_prefix_len().is_some()
            && !matches!(self.safi, Safi::Unimplemented(_))
    }
}

impl From<(Afi, Safi)> for AddressFamily {
    fn from((afi, safi): (Afi, Safi)) -> Self {
        Self::new(afi, safi)
    }
}

impl From<(u16, u8)> for AddressFamily {
    fn from((afi, safi): (u16, u8)) -> Self {
        Self::new(afi.into(), safi.into())
    }
}

impl From<AddressFamily> for (u16, u8) {
    fn from(family: AddressFamily) -> Self {
        (family.afi.into(), family.safi.into())
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.afi, self.safi)
    }
}
