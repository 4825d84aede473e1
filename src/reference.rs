use std::fmt::{Display, Formatter};

/// A handle to a ZDD node.
///
/// Handles are plain indices into the manager's node arena. ZDDs do not use
/// complement edges, so there is no negation bit to mask off.
///
/// # Permanent handles
///
/// For a universe of `N` variables, the first `2N + 2` handles are permanent
/// and never garbage-collected:
///
/// - `ZddId::BOTTOM` (`0`) — the empty family: no sets
/// - `ZddId::TOP` (`1`) — the family containing only the empty set: {∅}
/// - `2 ..= N + 1` — the elementary families `{{v}}`
/// - `N + 2 ..= 2N + 1` — the tautology chain ("all subsets of `{v, ..., N-1}`")
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ZddId(u32);

impl ZddId {
    /// Empty family (⊥): contains no sets.
    pub const BOTTOM: ZddId = ZddId(0);

    /// Family containing only the empty set (⊤): {∅}.
    pub const TOP: ZddId = ZddId(1);

    /// Creates a handle from a raw arena index.
    pub const fn new(index: u32) -> Self {
        ZddId(index)
    }

    /// Returns the raw index value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the index for array access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is a terminal (BOTTOM or TOP).
    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }

    /// Returns true if this is the empty family.
    pub const fn is_bottom(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this is the {∅} family.
    pub const fn is_top(self) -> bool {
        self.0 == 1
    }
}

impl Display for ZddId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "⊥"),
            1 => write!(f, "⊤"),
            _ => write!(f, "@{}", self.0),
        }
    }
}

impl From<u32> for ZddId {
    fn from(index: u32) -> Self {
        ZddId::new(index)
    }
}

impl From<ZddId> for u32 {
    fn from(id: ZddId) -> Self {
        id.0
    }
}
