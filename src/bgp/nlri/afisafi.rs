use std::fmt;

use bytes::{Bytes, BytesMut};
use octseq::builder::infallible;
use octseq::{Octets, OctetsBuilder, Parser};

use crate::util::parser::ParseError;
use crate::bgp::afisafi::AddressFamily;
use crate::bgp::error::NlriError;
use super::common::{compose_len_path_id, compose_path_id, PathId};
use super::mpls::Labels;
use super::mpls_vpn::RouteDistinguisher;
use super::prefix::PrefixAddress;

//------------ Nlri ----------------------------------------------------------

/// A single NLRI: a prefix, optionally with MPLS labels, a Route
/// Distinguisher and an ADD-PATH path identifier.
///
/// Whether labels and RD are part of the NLRI follows from the address
/// family of the prefix (see [`AddressFamily::has_label`] and
/// [`AddressFamily::has_rd`]), and is checked on construction. The same
/// rules drive both composing and parsing.
///
/// On the wire, labeled NLRI fold everything into a single length octet
/// that counts *bits* of labels, RD and prefix together:
///
/// ```text
/// [path id (4)] length-in-bits (1) | labels (3 each) | RD (8) | prefix
/// ```
///
/// Unlabeled NLRI are a plain prefix length octet and prefix octets,
/// optionally preceded by the path id.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "NlriRepr", into = "NlriRepr"))]
pub struct Nlri {
    prefix: PrefixAddress,
    labels: Labels,
    rd: Option<RouteDistinguisher>,
    path_id: Option<PathId>,
}

impl Nlri {
    pub fn new(
        prefix: PrefixAddress,
        labels: Labels,
        rd: Option<RouteDistinguisher>,
        path_id: Option<PathId>,
    ) -> Result<Self, NlriError> {
        let family = prefix.family();
        if family.has_label() == labels.is_empty()
            || family.has_rd() != rd.is_some()
        {
            return Err(NlriError::IllegalCombination);
        }
        let res = Nlri { prefix, labels, rd, path_id };
        if family.has_label() {
            let bits = res.wire_len_bits();
            if bits > usize::from(u8::MAX) {
                return Err(NlriError::LengthOverflow(bits));
            }
        }
        Ok(res)
    }

    /// Creates an NLRI for a family without labels and RD.
    pub fn unlabeled(prefix: PrefixAddress) -> Result<Self, NlriError> {
        Self::new(prefix, Labels::empty(), None, None)
    }

    /// Creates an NLRI for labeled unicast.
    pub fn labeled(
        prefix: PrefixAddress,
        labels: Labels
    ) -> Result<Self, NlriError> {
        Self::new(prefix, labels, None, None)
    }

    /// Creates an NLRI for MPLS VPN.
    pub fn vpn(
        prefix: PrefixAddress,
        labels: Labels,
        rd: RouteDistinguisher
    ) -> Result<Self, NlriError> {
        Self::new(prefix, labels, Some(rd), None)
    }

    /// Returns this NLRI with the given path id attached.
    pub fn with_path_id(self, path_id: PathId) -> Self {
        Nlri { path_id: Some(path_id), ..self }
    }

    pub fn family(&self) -> AddressFamily {
        self.prefix.family()
    }

    pub fn prefix(&self) -> &PrefixAddress {
        &self.prefix
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn rd(&self) -> Option<RouteDistinguisher> {
        self.rd
    }

    pub fn path_id(&self) -> Option<PathId> {
        self.path_id
    }

    /// Returns whether this NLRI carries labels (and possibly an RD).
    pub fn has_label(&self) -> bool {
        self.family().has_label()
    }

    fn rd_len(&self) -> usize {
        if self.rd.is_some() { RouteDistinguisher::COMPOSE_LEN } else { 0 }
    }

    fn wire_len_bits(&self) -> usize {
        8 * self.labels.compose_len()
            + 8 * self.rd_len()
            + usize::from(self.prefix.mask())
    }

    /// Returns the value of the length octet of a labeled NLRI.
    ///
    /// This counts the bits of labels, RD and prefix. For unlabeled NLRI
    /// it is simply the prefix length.
    pub fn length_bits(&self) -> u8 {
        if self.has_label() {
            // fits, checked on construction
            self.wire_len_bits() as u8
        } else {
            self.prefix.mask()
        }
    }

    /// Returns the number of octets [`Nlri::compose`] will produce.
    pub fn compose_len(&self, addpath: bool) -> usize {
        compose_len_path_id(addpath)
            + self.labels.compose_len()
            + self.rd_len()
            + self.prefix.compose_len()
    }

    pub fn compose<Target: OctetsBuilder>(
        &self,
        target: &mut Target,
        addpath: bool,
    ) -> Result<(), Target::AppendError> {
        compose_path_id(self.path_id, addpath, target)?;

        if !self.has_label() {
            return self.prefix.compose(target);
        }

        target.append_slice(&[self.length_bits()])?;
        self.labels.compose(target)?;
        if let Some(rd) = self.rd {
            rd.compose(target)?;
        }
        self.prefix.compose_without_len(target)
    }

    /// Returns the wire representation of this NLRI.
    pub fn to_bytes(&self, addpath: bool) -> Bytes {
        let mut target = BytesMut::with_capacity(self.compose_len(addpath));
        infallible(self.compose(&mut target, addpath));
        target.freeze()
    }

    /// Parses a single NLRI of the given family.
    ///
    /// If `addpath` is set, a four octet path id is expected first.
    pub fn parse<R: Octets + ?Sized>(
        parser: &mut Parser<'_, R>,
        family: AddressFamily,
        addpath: bool,
    ) -> Result<Self, ParseError> {
        if !family.is_supported() {
            return Err(ParseError::form_error("unsupported address family"));
        }

        let path_id = if addpath {
            Some(PathId::parse(parser)?)
        } else {
            None
        };

        if !family.has_label() {
            let prefix = PrefixAddress::parse(parser, family)?;
            return Ok(Nlri { prefix, labels: Labels::empty(), rd: None, path_id });
        }

        let length_bits = parser.parse_u8()?;
        let labels = Labels::parse(parser)?;

        let rd_len = if family.has_rd() {
            RouteDistinguisher::COMPOSE_LEN
        } else {
            0
        };
        let prefix_bits = usize::from(length_bits)
            .checked_sub(8 * (labels.compose_len() + rd_len))
            .ok_or(ParseError::form_error(
                "NLRI length shorter than labels and RD"
            ))?;

        let rd = if family.has_rd() {
            Some(RouteDistinguisher::parse(parser)?)
        } else {
            None
        };

        // prefix_bits <= length_bits, so this cannot truncate
        let prefix = PrefixAddress::parse_for_len(
            parser, family, prefix_bits as u8
        )?;

        Ok(Nlri { prefix, labels, rd, path_id })
    }

    /// Parses a single NLRI from the start of `octets`.
    ///
    /// Returns the NLRI and whatever octets follow it.
    pub fn from_octets(
        octets: &[u8],
        family: AddressFamily,
        addpath: bool,
    ) -> Result<(Self, &[u8]), ParseError> {
        let mut parser = Parser::from_ref(octets);
        let res = Self::parse(&mut parser, family, addpath)?;
        Ok((res, &octets[parser.pos()..]))
    }
}

//--- Serde via the checked constructor

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename = "Nlri")]
struct NlriRepr {
    prefix: PrefixAddress,
    labels: Labels,
    rd: Option<RouteDistinguisher>,
    path_id: Option<PathId>,
}

#[cfg(feature = "serde")]
impl TryFrom<NlriRepr> for Nlri {
    type Error = NlriError;

    fn try_from(repr: NlriRepr) -> Result<Self, Self::Error> {
        Nlri::new(repr.prefix, repr.labels, repr.rd, repr.path_id)
    }
}

#[cfg(feature = "serde")]
impl From<Nlri> for NlriRepr {
    fn from(nlri: Nlri) -> Self {
        NlriRepr {
            prefix: nlri.prefix,
            labels: nlri.labels,
            rd: nlri.rd,
            path_id: nlri.path_id,
        }
    }
}

/// Renders the prefix followed by whichever optional parts are present,
/// e.g. `10.1.2.0/24 label 100 path-information 0.0.0.1
/// route-distinguisher 1:2`.
///
/// The parts render on their own without separators or keywords. The space
/// in front of the labels and the `path-information` and
/// `route-distinguisher` keywords are added here.
impl fmt::Display for Nlri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)?;
        if !self.labels.is_empty() {
            write!(f, " {}", self.labels)?;
        }
        if let Some(path_id) = self.path_id {
            write!(f, " path-information {}", path_id)?;
        }
        if let Some(rd) = self.rd {
            write!(f, " route-distinguisher {}", rd)?;
        }
        Ok(())
    }
}

//------------ NlriIter ------------------------------------------------------

/// Iterator over consecutive NLRI of a single address family.
///
/// This is what the NLRI field of an MP_REACH_NLRI or MP_UNREACH_NLRI
/// attribute looks like. Iteration ends at the end of input, or right after
/// the first error.
pub struct NlriIter<'a, Octs: ?Sized> {
    parser: Parser<'a, Octs>,
    family: AddressFamily,
    addpath: bool,
    failed: bool,
}

impl<'a, Octs: Octets + ?Sized> NlriIter<'a, Octs> {
    pub fn new(
        octets: &'a Octs,
        family: AddressFamily,
        addpath: bool
    ) -> Self {
        NlriIter {
            parser: Parser::from_ref(octets),
            family,
            addpath,
            failed: false,
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }
}

impl<'a, Octs: Octets + ?Sized> Iterator for NlriIter<'a, Octs> {
    type Item = Result<Nlri, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.parser.remaining() == 0 {
            return None;
        }
        let res = Nlri::parse(&mut self.parser, self.family, self.addpath);
        self.failed = res.is_err();
        Some(res)
    }
}
