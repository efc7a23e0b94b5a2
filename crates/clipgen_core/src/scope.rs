use serde::{Deserialize, Serialize};

/// Display labels indexed by `scope - 1`.
pub const SCOPE_LABELS: [&str; 3] = ["Low", "Medium", "High"];

/// How much of the source media the generator considers per produced clip.
///
/// Only the values 1, 2 and 3 can be represented; 2 ("Medium") is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Scope(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scope must be 1, 2 or 3 (got {0})")]
pub struct ScopeOutOfRange(pub u8);

impl Scope {
    pub const LOW: Scope = Scope(1);
    pub const MEDIUM: Scope = Scope(2);
    pub const HIGH: Scope = Scope(3);

    pub fn new(value: u8) -> Option<Self> {
        match value {
            1..=3 => Some(Self(value)),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        SCOPE_LABELS[usize::from(self.0 - 1)]
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<u8> for Scope {
    type Error = ScopeOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ScopeOutOfRange(value))
    }
}

impl From<Scope> for u8 {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}
