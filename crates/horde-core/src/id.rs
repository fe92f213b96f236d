//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a pursuer within the world roster.
///
/// Assigned sequentially at spawn time: `PursuerId(n)` is the n-th pursuer
/// ever admitted to the roster. Pursuers are never removed mid-game, so an
/// id stays valid for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PursuerId(pub u32);

impl PursuerId {
    /// Roster index for this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PursuerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PursuerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing orchestrator tick counter.
///
/// Incremented once per world tick. `TickId(0)` is the state before the
/// first tick has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pursuer_id_index_matches_value() {
        assert_eq!(PursuerId(3).index(), 3);
        assert_eq!(PursuerId::from(7), PursuerId(7));
    }

    #[test]
    fn tick_id_orders_and_displays() {
        assert!(TickId(1) < TickId(2));
        assert_eq!(TickId::default(), TickId(0));
        assert_eq!(TickId(42).to_string(), "42");
    }
}
