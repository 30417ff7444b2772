//! Registered rules and the per-phase registry.

use std::fmt;

use rpe_foundation::RuleError;
use rpe_storage::World;

use crate::phase::Phase;

/// Boxed rule body. Infallible rules are adapted to always return `Ok`.
pub type RuleFn = Box<dyn FnMut(&mut World) -> Result<(), RuleError>>;

// =============================================================================
// Rule
// =============================================================================

/// A named callable run against the world during one phase.
pub struct Rule {
    name: String,
    body: RuleFn,
}

impl Rule {
    /// Wraps an infallible rule.
    pub fn new(name: impl Into<String>, mut body: impl FnMut(&mut World) + 'static) -> Self {
        Self {
            name: name.into(),
            body: Box::new(move |world| {
                body(world);
                Ok(())
            }),
        }
    }

    /// Wraps a rule that may report failure.
    pub fn fallible(
        name: impl Into<String>,
        body: impl FnMut(&mut World) -> Result<(), RuleError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the rule.
    ///
    /// # Errors
    ///
    /// Returns whatever error a fallible rule reports.
    pub fn run(&mut self, world: &mut World) -> Result<(), RuleError> {
        (self.body)(world)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

// =============================================================================
// Rule Registry
// =============================================================================

/// Ordered rule lists, one per phase.
///
/// Registration appends. There is no deduplication, priority or removal, so
/// rules run in exactly the order they were registered.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    phases: [Vec<Rule>; 6],
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule to a phase.
    pub fn register(&mut self, phase: Phase, rule: Rule) {
        self.phases[phase.index()].push(rule);
    }

    /// Returns the rules of a phase in registration order.
    #[must_use]
    pub fn rules(&self, phase: Phase) -> &[Rule] {
        &self.phases[phase.index()]
    }

    /// Returns the rules of a phase for invocation.
    pub fn rules_mut(&mut self, phase: Phase) -> &mut [Rule] {
        &mut self.phases[phase.index()]
    }

    /// Returns the rule names of a phase in registration order.
    #[must_use]
    pub fn names(&self, phase: Phase) -> Vec<&str> {
        self.rules(phase).iter().map(Rule::name).collect()
    }

    /// Returns the number of rules across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.iter().all(Vec::is_empty)
    }
}
