//! Context → priority encoding shared by the loader and by tests that need
//! to construct priorities directly without going through a document.

/// The context tiers a rule can be declared in, lowest precedence first.
/// Numeric values are the base priority shifted into the high bits; the
/// loader ORs in a monotonically increasing rule counter for the low bits
/// so that, within a context, the last-declared rule wins.
///
/// `Mandatory` sits above `User`/`Group` rather than between `Default` and
/// `User`: it is declared to override every user- and group-specific rule,
/// not just the bus-wide default (spec.md §8, invariant 5). `Console` is the
/// narrowest, most specific context and stays the highest tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Context {
    /// Applies to every peer.
    Default,
    /// Applies when the peer's uid matches.
    User,
    /// Applies when one of the peer's gids matches.
    Group,
    /// Applies to every peer; overrides everything user/group-specific.
    Mandatory,
    /// `at-console` / `no-console`, the highest tier.
    Console,
}

impl Context {
    /// The base priority for this context, before the rule counter is
    /// folded in. Strictly increasing with precedence.
    #[must_use]
    pub const fn base(self) -> u64 {
        match self {
            Self::Default => 0,
            Self::User => 1,
            Self::Group => 2,
            Self::Mandatory => 3,
            Self::Console => 4,
        }
    }
}

/// Combine a context and a monotonic rule counter into a single priority
/// value: `base << 32 | counter`. Guarantees that any rule in a
/// higher-precedence context dominates any rule in a lower one, and that
/// within one context, a rule with a larger counter (declared later) wins.
#[must_use]
pub const fn encode(context: Context, counter: u32) -> u64 {
    (context.base() << 32) | counter as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_strictly_dominate_regardless_of_counter() {
        let default_late = encode(Context::Default, u32::MAX);
        let mandatory_early = encode(Context::Mandatory, 0);
        assert!(mandatory_early > default_late);
    }

    #[test]
    fn within_context_later_counter_wins() {
        let early = encode(Context::User, 3);
        let late = encode(Context::User, 4);
        assert!(late > early);
    }
}
