use std::fmt;

const MARKER_OPEN: &str = "【";
const MARKER_CLOSE: &str = "†source】";

/// A per-document reference token rendered as `【n†source】`.
///
/// The bracket characters never occur in ordinary prose, so a marker survives a round
/// trip through an LLM prompt and response as a verbatim substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker(u32);

impl Marker {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// Parses exactly one rendered marker; surrounding whitespace is not accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix(MARKER_OPEN)?.strip_suffix(MARKER_CLOSE)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER_OPEN}{}{MARKER_CLOSE}", self.0)
    }
}

/// Hands out markers in assignment order. One sequence belongs to one document pipeline.
#[derive(Debug, Default)]
pub struct MarkerSequence {
    next: u32,
}

impl MarkerSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_marker(&mut self) -> Marker {
        let marker = Marker(self.next);
        self.next += 1;
        marker
    }

    pub fn issued(&self) -> u32 {
        self.next
    }
}
