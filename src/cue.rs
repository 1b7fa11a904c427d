use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Identity of a cue within one editing session. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CueId(u64);

impl CueId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl FromStr for CueId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(CueId)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub(crate) id: CueId,
    pub(crate) start: Duration,
    pub(crate) end: Duration,
    pub(crate) text: String,
}

impl Cue {
    pub(crate) fn empty(id: CueId) -> Self {
        Self {
            id,
            start: Duration::from_secs(0),
            end: Duration::from_secs(0),
            text: String::new(),
        }
    }

    pub fn id(&self) -> CueId {
        self.id
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}
