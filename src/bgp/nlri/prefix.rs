use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use inetnum::addr::Prefix;
use octseq::{Octets, OctetsBuilder, Parser};
use crate::util::parser::ParseError;
use crate::bgp::afisafi::{Afi, AddressFamily, Safi};
use crate::bgp::error::NlriError;
use super::common::prefix_bits_to_bytes;

//------------ PrefixAddress -------------------------------------------------

/// The address part of an NLRI: address octets plus a prefix length.
///
/// The address is kept at the full width of its family. Only the octets
/// covered by the prefix length ever go on the wire; octets beyond those are
/// always zero, whatever was passed in. Bits beyond the prefix length within
/// the last covered octet are carried as given.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(
    try_from = "PrefixAddressRepr", into = "PrefixAddressRepr"
))]
pub struct PrefixAddress {
    family: AddressFamily,
    raw: [u8; 16],
    mask: u8,
}

impl PrefixAddress {
    /// Creates a prefix from address octets and a prefix length.
    ///
    /// `octets` may be shorter than the full address width. It must cover
    /// at least the octets of the prefix length and must not be longer than
    /// the address width. Octets past the prefix length are dropped.
    pub fn new(
        family: AddressFamily,
        octets: &[u8],
        mask: u8
    ) -> Result<Self, NlriError> {
        let (max_bits, addr_len) = Self::widths(family)?;
        if mask > max_bits {
            return Err(NlriError::InvalidMask { afi: family.afi(), mask });
        }
        if octets.len() > addr_len
            || octets.len() < prefix_bits_to_bytes(mask)
        {
            return Err(ParseError::form_error(
                "address octets do not match address family"
            ).into());
        }
        let len = prefix_bits_to_bytes(mask);
        let mut raw = [0u8; 16];
        raw[..len].copy_from_slice(&octets[..len]);
        Ok(PrefixAddress { family, raw, mask })
    }

    /// Creates an IPv4 or IPv6 prefix from an address and a prefix length.
    pub fn from_addr(
        addr: IpAddr,
        mask: u8,
        safi: Safi
    ) -> Result<Self, NlriError> {
        match addr {
            IpAddr::V4(a) => Self::new(
                AddressFamily::new(Afi::Ipv4, safi), &a.octets(), mask
            ),
            IpAddr::V6(a) => Self::new(
                AddressFamily::new(Afi::Ipv6, safi), &a.octets(), mask
            ),
        }
    }

    /// Creates a prefix from an [`inetnum`] prefix for the given SAFI.
    pub fn from_prefix(prefix: Prefix, safi: Safi) -> Result<Self, NlriError> {
        Self::from_addr(prefix.addr(), prefix.len(), safi)
    }

    fn widths(family: AddressFamily) -> Result<(u8, usize), NlriError> {
        if !family.is_supported() {
            return Err(NlriError::UnsupportedFamily(family));
        }
        match (family.afi().max_prefix_len(), family.afi().addr_len()) {
            (Some(bits), Some(len)) => Ok((bits, len)),
            _ => Err(NlriError::UnsupportedFamily(family)),
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn afi(&self) -> Afi {
        self.family.afi()
    }

    pub fn safi(&self) -> Safi {
        self.family.safi()
    }

    /// Returns the prefix length in bits.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Returns the address octets at the full width of the family.
    pub fn octets(&self) -> &[u8] {
        match self.family.afi() {
            Afi::Ipv4 => &self.raw[..4],
            _ => &self.raw[..],
        }
    }

    /// Returns the octets that go on the wire.
    pub fn prefix_octets(&self) -> &[u8] {
        &self.raw[..prefix_bits_to_bytes(self.mask)]
    }

    pub fn addr(&self) -> IpAddr {
        match self.family.afi() {
            Afi::Ipv4 => IpAddr::V4(Ipv4Addr::new(
                self.raw[0], self.raw[1], self.raw[2], self.raw[3]
            )),
            _ => IpAddr::V6(Ipv6Addr::from(self.raw)),
        }
    }

    /// Returns the [`inetnum`] prefix, with any host bits cleared.
    pub fn prefix(&self) -> Result<Prefix, NlriError> {
        let mut b = self.raw;
        let full = usize::from(self.mask / 8);
        let rest = self.mask % 8;
        if rest != 0 {
            b[full] &= 0xffu8 << (8 - rest);
        }
        let from = full + usize::from(rest != 0);
        b[from..].iter_mut().for_each(|o| *o = 0);

        let addr = match self.family.afi() {
            Afi::Ipv4 => IpAddr::V4(Ipv4Addr::new(b[0], b[1], b[2], b[3])),
            _ => IpAddr::V6(Ipv6Addr::from(b)),
        };
        Prefix::new(addr, self.mask).map_err(|_|
            NlriError::InvalidMask { afi: self.family.afi(), mask: self.mask }
        )
    }

    /// Returns the number of octets for the prefix length and the prefix.
    pub fn compose_len(&self) -> usize {
        1 + prefix_bits_to_bytes(self.mask)
    }

    /// Composes the prefix length octet followed by the prefix octets.
    pub fn compose<Target: OctetsBuilder>(&self, target: &mut Target)
        -> Result<(), Target::AppendError>
    {
        target.append_slice(&[self.mask])?;
        self.compose_without_len(target)
    }

    /// Composes only the prefix octets.
    ///
    /// Used where the prefix length is folded into another length field.
    pub fn compose_without_len<Target: OctetsBuilder>(
        &self,
        target: &mut Target
    ) -> Result<(), Target::AppendError> {
        target.append_slice(self.prefix_octets())
    }

    pub fn parse<R: Octets + ?Sized>(
        parser: &mut Parser<'_, R>,
        family: AddressFamily,
    ) -> Result<Self, ParseError> {
        let prefix_bits = parser.parse_u8()?;
        Self::parse_for_len(parser, family, prefix_bits)
    }

    /// Parses the prefix octets for an already known prefix length.
    pub fn parse_for_len<R: Octets + ?Sized>(
        parser: &mut Parser<'_, R>,
        family: AddressFamily,
        prefix_bits: u8,
    ) -> Result<Self, ParseError> {
        let max_bits = family.afi().max_prefix_len()
            .filter(|_| family.is_supported())
            .ok_or(ParseError::form_error("unknown prefix format"))?;
        if prefix_bits > max_bits {
            return Err(ParseError::form_error(
                "prefix length exceeds address family"
            ));
        }
        let mut raw = [0u8; 16];
        parser.parse_buf(&mut raw[..prefix_bits_to_bytes(prefix_bits)])?;
        Ok(PrefixAddress { family, raw, mask: prefix_bits })
    }
}

//--- Serde via the checked constructor

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename = "PrefixAddress")]
struct PrefixAddressRepr {
    family: AddressFamily,
    octets: Vec<u8>,
    mask: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<PrefixAddressRepr> for PrefixAddress {
    type Error = NlriError;

    fn try_from(repr: PrefixAddressRepr) -> Result<Self, Self::Error> {
        PrefixAddress::new(repr.family, &repr.octets, repr.mask)
    }
}

#[cfg(feature = "serde")]
impl From<PrefixAddress> for PrefixAddressRepr {
    fn from(prefix: PrefixAddress) -> Self {
        PrefixAddressRepr {
            family: prefix.family,
            octets: prefix.prefix_octets().to_vec(),
            mask: prefix.mask,
        }
    }
}

impl fmt::Display for PrefixAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mask_truncation() {
        let p = PrefixAddress::new(
            AddressFamily::IPV4_UNICAST, &[10, 1, 2, 3], 0
        ).unwrap();
        let mut target = Vec::new();
        p.compose(&mut target).unwrap();
        assert_eq!(target, vec![0x00]);
        assert_eq!(p.compose_len(), 1);

        let p = PrefixAddress::new(
            AddressFamily::IPV4_UNICAST, &[10, 1, 2, 3], 32
        ).unwrap();
        target.clear();
        p.compose(&mut target).unwrap();
        assert_eq!(target, vec![32, 10, 1, 2, 3]);
        assert_eq!(p.compose_len(), 5);

        // octets beyond the prefix length never go out
        let p = PrefixAddress::new(
            AddressFamily::IPV4_UNICAST, &[10, 1, 0xff, 0xff], 16
        ).unwrap();
        target.clear();
        p.compose(&mut target).unwrap();
        assert_eq!(target, vec![16, 10, 1]);
        assert_eq!(p.octets(), &[10, 1, 0, 0]);
        assert_eq!(
            p,
            PrefixAddress::new(AddressFamily::IPV4_UNICAST, &[10, 1], 16)
                .unwrap()
        );
    }

    #[test]
    fn invalid_mask() {
        assert_eq!(
            PrefixAddress::new(AddressFamily::IPV4_UNICAST, &[0; 4], 33),
            Err(NlriError::InvalidMask { afi: Afi::Ipv4, mask: 33 })
        );
        assert!(
            PrefixAddress::new(AddressFamily::IPV6_UNICAST, &[0; 16], 128)
            .is_ok()
        );
        assert_eq!(
            PrefixAddress::new(AddressFamily::IPV6_UNICAST, &[0; 16], 129),
            Err(NlriError::InvalidMask { afi: Afi::Ipv6, mask: 129 })
        );
    }

    #[test]
    fn unsupported_family() {
        let family = AddressFamily::from((25u16, 65u8));
        assert_eq!(
            PrefixAddress::new(family, &[], 0),
            Err(NlriError::UnsupportedFamily(family))
        );
    }

    #[test]
    fn short_octets() {
        assert!(matches!(
            PrefixAddress::new(AddressFamily::IPV4_UNICAST, &[10], 16),
            Err(NlriError::Format(_))
        ));
        assert!(matches!(
            PrefixAddress::new(AddressFamily::IPV4_UNICAST, &[0; 5], 16),
            Err(NlriError::Format(_))
        ));
    }

    #[test]
    fn parse_v6() {
        let raw = vec![
            0x30, 0x20, 0x01, 0x0d, 0xb8, 0x00, 0x01, 0xff
        ];
        let mut parser = Parser::from_ref(&raw);
        let p = PrefixAddress::parse(
            &mut parser, AddressFamily::IPV6_UNICAST
        ).unwrap();
        assert_eq!(parser.remaining(), 1);
        assert_eq!(p.mask(), 48);
        assert_eq!(p.to_string(), "2001:db8:1::/48");
        assert_eq!(p.prefix().unwrap(), Prefix::from_str("2001:db8:1::/48").unwrap());
    }

    #[test]
    fn parse_short() {
        let raw = vec![0x18, 0x0a, 0x00];
        let mut parser = Parser::from_ref(&raw);
        assert_eq!(
            PrefixAddress::parse(&mut parser, AddressFamily::IPV4_UNICAST),
            Err(ParseError::ShortInput)
        );
    }

    #[test]
    fn parse_mask_too_long() {
        let raw = vec![0x21, 0x0a, 0x00, 0x00, 0x00, 0x00];
        let mut parser = Parser::from_ref(&raw);
        assert!(matches!(
            PrefixAddress::parse(&mut parser, AddressFamily::IPV4_UNICAST),
            Err(ParseError::Form(_))
        ));
    }

    #[test]
    fn inetnum_prefix() {
        let prefix = Prefix::from_str("192.0.2.0/24").unwrap();
        let p = PrefixAddress::from_prefix(prefix, Safi::Unicast).unwrap();
        assert_eq!(p.family(), AddressFamily::IPV4_UNICAST);
        assert_eq!(p.prefix_octets(), &[192, 0, 2]);
        assert_eq!(p.prefix().unwrap(), prefix);

        // host bits in the last covered octet are cleared
        let p = PrefixAddress::new(
            AddressFamily::IPV4_UNICAST, &[10, 0xff], 12
        ).unwrap();
        assert_eq!(p.prefix().unwrap(), Prefix::from_str("10.240.0.0/12").unwrap());
        assert_eq!(p.to_string(), "10.255.0.0/12");
    }

    #[cfg(feature = "serde")]
    fn v4_tokens(octets: &[u8], mask: u8) -> Vec<serde_test::Token> {
        use serde_test::Token;
        let mut res = vec![
            Token::Struct { name: "PrefixAddress", len: 3 },
            Token::Str("family"),
            Token::Struct { name: "AddressFamily", len: 2 },
            Token::Str("afi"),
            Token::U16(1),
            Token::Str("safi"),
            Token::U8(1),
            Token::StructEnd,
            Token::Str("octets"),
            Token::Seq { len: Some(octets.len()) },
        ];
        res.extend(octets.iter().map(|o| Token::U8(*o)));
        res.extend([
            Token::SeqEnd,
            Token::Str("mask"),
            Token::U8(mask),
            Token::StructEnd,
        ]);
        res
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_tokens() {
        use serde_test::assert_tokens;
        let p = PrefixAddress::new(
            AddressFamily::IPV4_UNICAST, &[192, 0, 2, 0], 24
        ).unwrap();
        assert_tokens(&p, &v4_tokens(&[192, 0, 2], 24));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_checks_mask() {
        use serde_test::assert_de_tokens_error;
        assert_de_tokens_error::<PrefixAddress>(
            &v4_tokens(&[10], 200),
            "invalid prefix length 200 for Ipv4"
        );
    }
}
