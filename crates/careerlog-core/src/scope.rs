//! Explicit event-scope tokens.
//!
//! The host marks some currency changes as belonging to a programmatic
//! transaction. Instead of reading that marker from ambient state, every
//! mutating entry point of the career log receives an [`EventScope`]
//! describing the innermost active scope.

/// Kind of programmatic transaction a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// A transaction that must not be logged (tests, rollbacks, cheats).
    Ignore,
    /// Periodic facility maintenance charge.
    Maintenance,
    /// Part tooling purchase.
    Tooling,
}

/// The innermost transaction scope active when an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventScope {
    kind: Option<ScopeKind>,
}

impl EventScope {
    /// No scope is active.
    pub const NONE: Self = Self { kind: None };

    /// A scope of the given kind.
    pub const fn of(kind: ScopeKind) -> Self {
        Self { kind: Some(kind) }
    }

    /// A suppressed (not loggable) scope.
    pub const fn ignored() -> Self {
        Self::of(ScopeKind::Ignore)
    }

    /// A maintenance scope.
    pub const fn maintenance() -> Self {
        Self::of(ScopeKind::Maintenance)
    }

    /// A tooling scope.
    pub const fn tooling() -> Self {
        Self::of(ScopeKind::Tooling)
    }

    /// The active scope kind, if any.
    pub const fn kind(self) -> Option<ScopeKind> {
        self.kind
    }

    /// Whether events under this scope must be dropped.
    pub const fn should_ignore(self) -> bool {
        matches!(self.kind, Some(ScopeKind::Ignore))
    }
}

impl From<ScopeKind> for EventScope {
    fn from(kind: ScopeKind) -> Self {
        Self::of(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ignore_suppresses() {
        assert!(EventScope::ignored().should_ignore());
        assert!(!EventScope::maintenance().should_ignore());
        assert!(!EventScope::NONE.should_ignore());
        assert_eq!(EventScope::default(), EventScope::NONE);
        assert_eq!(EventScope::from(ScopeKind::Tooling), EventScope::tooling());
    }
}
