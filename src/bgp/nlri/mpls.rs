use std::fmt;

use log::debug;
use octseq::{Octets, OctetsBuilder, Parser};
use crate::util::parser::ParseError;
use crate::bgp::error::NlriError;

//------------ Label ---------------------------------------------------------

/// A single 20 bit MPLS label.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Label(u32);

impl Label {
    /// Upper bound (exclusive) for label values.
    pub const LIMIT: u32 = 1 << 20;

    pub fn new(value: u32) -> Result<Self, NlriError> {
        if value >= Self::LIMIT {
            return Err(NlriError::LabelOutOfRange(value));
        }
        Ok(Label(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the three wire octets for this label.
    ///
    /// The label occupies the top 20 bits, the traffic class bits are zero
    /// and the lowest bit is the bottom of stack marker.
    fn to_bytes(self, bottom: bool) -> [u8; 3] {
        let v = self.0 << 4 | u32::from(bottom);
        let b = v.to_be_bytes();
        [b[1], b[2], b[3]]
    }
}

impl TryFrom<u32> for Label {
    type Error = NlriError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Label::new(value)
    }
}

impl From<Label> for u32 {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//------------ Labels --------------------------------------------------------

/// MPLS label stack, part of labeled unicast and MPLS VPN NLRI.
///
/// The first label is the top of the stack, the last one the bottom. An
/// empty stack composes to nothing.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Labels {
    labels: Vec<Label>,
}

impl Labels {
    pub fn new(labels: Vec<Label>) -> Self {
        Labels { labels }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a stack from raw values, checking each to fit in 20 bits.
    pub fn from_values<I>(values: I) -> Result<Self, NlriError>
    where I: IntoIterator<Item = u32>
    {
        values.into_iter()
            .map(Label::new)
            .collect::<Result<Vec<_>, _>>()
            .map(Labels::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }

    pub fn count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the number of octets this stack takes up on the wire.
    pub fn compose_len(&self) -> usize {
        3 * self.labels.len()
    }

    pub fn compose<Target: OctetsBuilder>(&self, target: &mut Target)
        -> Result<(), Target::AppendError>
    {
        let last = self.labels.len().saturating_sub(1);
        for (idx, label) in self.labels.iter().enumerate() {
            target.append_slice(&label.to_bytes(idx == last))?;
        }
        Ok(())
    }

    /// Parses labels up to and including the one marked bottom of stack.
    ///
    /// Running out of input before the marker shows up is an error: the
    /// stack length is not signalled anywhere else.
    pub fn parse<R: Octets + ?Sized>(parser: &mut Parser<'_, R>)
        -> Result<Self, ParseError>
    {
        let mut labels = Vec::new();
        let mut buf = [0u8; 3];

        loop {
            //20bits label + 3bits tc + S bit
            if parser.parse_buf(&mut buf).is_err() {
                return Err(ParseError::form_error(
                    "MPLS label stack without bottom of stack"
                ));
            }
            let lbl =
                (buf[0] as u32) << 12 |
                (buf[1] as u32) << 4  |
                (buf[2] as u32) >> 4;

            if buf[2] & 0x0e != 0 {
                debug!("dropping traffic class bits of MPLS label {}", lbl);
            }
            labels.push(Label(lbl));

            if buf[2] & 0x01 == 0x01 {
                break;
            }
        }

        Ok(Labels { labels })
    }
}

impl From<Vec<Label>> for Labels {
    fn from(labels: Vec<Label>) -> Self {
        Labels::new(labels)
    }
}

impl From<Label> for Labels {
    fn from(label: Label) -> Self {
        Labels::new(vec![label])
    }
}

/// Renders `label 100` or `label [ 100 200 ]`, and nothing for an empty
/// stack.
///
/// There is no leading separator. [`Nlri`] puts a space in front when it
/// renders the stack as part of a whole NLRI.
///
/// [`Nlri`]: super::afisafi::Nlri
impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.labels.as_slice() {
            [] => Ok(()),
            [single] => write!(f, "label {}", single),
            multi => {
                f.write_str("label [")?;
                for label in multi {
                    write!(f, " {}", label)?;
                }
                f.write_str(" ]")
            }
        }
    }
}
