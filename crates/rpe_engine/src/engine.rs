//! The phased tick loop.
//!
//! Every tick runs the six phases in fixed order:
//!
//! 1. GEOMETRY rules, then the spatial sync
//! 2. CONSTRAINT rules, then the vital clamps
//! 3. EPISTEMIC rules
//! 4. DYNAMICS rules
//! 5. META rules, then the death sweep
//! 6. GCO rules
//!
//! and then clears dirty flags and advances the tick counter. There is no
//! branching or early exit; the only way a tick stops short is a fallible
//! rule reporting an error.

use rpe_foundation::{EntityId, Error, ErrorContext, Result, RuleError};
use rpe_storage::World;

use crate::builtin::{self, Clamp};
use crate::config::EngineConfig;
use crate::phase::Phase;
use crate::rule::{Rule, RuleRegistry};
use crate::trace::{TraceBuffer, TraceEvent};

// =============================================================================
// Tick Report
// =============================================================================

/// Summary of one tick (or one phase run through [`Engine::run_phase`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick counter after the run. For a completed tick this is the number
    /// of ticks completed so far.
    pub tick: u64,
    /// Registered rules invoked.
    pub rules_run: usize,
    /// Entities pushed into the spatial index.
    pub synced: usize,
    /// Values changed by the clamps.
    pub clamped: Vec<Clamp>,
    /// Entities removed by the death sweep, in removal order.
    pub removed: Vec<EntityId>,
}

impl TickReport {
    /// Returns the number of distinct entities that had a value clamped.
    #[must_use]
    pub fn clamped_entities(&self) -> usize {
        let mut ids: Vec<&EntityId> = self.clamped.iter().map(|c| &c.entity).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Drives a [`World`] through ticks.
///
/// The engine owns the world for its whole lifetime. Rules can be
/// registered at any time between ticks and are kept in registration order
/// per phase.
#[derive(Debug)]
pub struct Engine {
    world: World,
    rules: RuleRegistry,
    config: EngineConfig,
    trace: TraceBuffer,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(World::new())
    }
}

impl Engine {
    /// Creates an engine over `world` with the default configuration.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self::with_config(world, EngineConfig::default())
    }

    /// Creates an engine over `world` with the given configuration.
    #[must_use]
    pub fn with_config(world: World, config: EngineConfig) -> Self {
        Self {
            world,
            rules: RuleRegistry::new(),
            trace: TraceBuffer::new(config.trace_capacity),
            config,
        }
    }

    // --- World Access ---

    /// Returns the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns the world for setup or inspection between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Consumes the engine and returns its world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    // --- Configuration ---

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Turns diagnostic logging and trace recording on or off.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Returns true if diagnostics are on.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.config.verbose
    }

    /// Returns the trace recorded while verbose.
    #[must_use]
    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Drops all recorded trace events.
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    // --- Rule Registration ---

    /// Returns the registered rules.
    #[must_use]
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Appends an infallible rule to `phase`.
    pub fn register_rule(
        &mut self,
        phase: Phase,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.rules.register(phase, Rule::new(name, rule));
    }

    /// Appends a rule that may fail to `phase`.
    ///
    /// An `Err` from the rule aborts the tick it runs in.
    pub fn register_fallible_rule(
        &mut self,
        phase: Phase,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) -> std::result::Result<(), RuleError> + 'static,
    ) {
        self.rules.register(phase, Rule::fallible(name, rule));
    }

    /// Appends a GEOMETRY rule.
    pub fn register_geometry_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Geometry, name, rule);
    }

    /// Appends a CONSTRAINT rule.
    pub fn register_constraint_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Constraint, name, rule);
    }

    /// Appends an EPISTEMIC rule.
    pub fn register_epistemic_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Epistemic, name, rule);
    }

    /// Appends a DYNAMICS rule.
    pub fn register_dynamics_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Dynamics, name, rule);
    }

    /// Appends a META rule.
    pub fn register_meta_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Meta, name, rule);
    }

    /// Appends a GCO rule.
    pub fn register_gco_rule(
        &mut self,
        name: impl Into<String>,
        rule: impl FnMut(&mut World) + 'static,
    ) {
        self.register_rule(Phase::Gco, name, rule);
    }

    // --- Execution ---

    /// Runs one full tick.
    ///
    /// On success the dirty set is empty, every entity's flag is clear and
    /// the tick counter has advanced by one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::RuleFailed`](rpe_foundation::ErrorKind::RuleFailed)
    /// if a fallible rule reports an error. The tick stops at that rule:
    /// mutations made so far remain, while the dirty flags and the tick
    /// counter are left as they were.
    ///
    /// # Panics
    ///
    /// A panicking rule propagates its panic.
    pub fn tick(&mut self) -> Result<TickReport> {
        let tick = self.world.current_tick();
        if self.config.verbose {
            tracing::debug!(tick, entities = self.world.entity_count(), "tick start");
            self.trace.push(tick, TraceEvent::TickStart);
        }

        let mut report = TickReport::default();
        for phase in Phase::ALL {
            if let Err(err) = self.execute_phase(phase, &mut report) {
                if self.config.verbose {
                    tracing::debug!(tick, error = %err, "tick aborted");
                    self.trace.push(tick, TraceEvent::TickEnd { success: false });
                }
                return Err(err);
            }
        }

        self.world.clear_dirty_flags();
        self.world.increment_tick();
        report.tick = self.world.current_tick();

        if self.config.verbose {
            tracing::debug!(
                tick,
                rules = report.rules_run,
                clamped = report.clamped.len(),
                removed = report.removed.len(),
                "tick end"
            );
            self.trace.push(tick, TraceEvent::TickEnd { success: true });
        }
        Ok(report)
    }

    /// Runs a single phase: its registered rules, then its built-in pass.
    ///
    /// Dirty flags and the tick counter are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if a fallible rule of the phase fails.
    pub fn run_phase(&mut self, phase: Phase) -> Result<TickReport> {
        let mut report = TickReport {
            tick: self.world.current_tick(),
            ..TickReport::default()
        };
        self.execute_phase(phase, &mut report)?;
        Ok(report)
    }

    fn execute_phase(&mut self, phase: Phase, report: &mut TickReport) -> Result<()> {
        let tick = self.world.current_tick();
        let verbose = self.config.verbose;
        if verbose {
            tracing::debug!(tick, %phase, "phase start");
            self.trace.push(tick, TraceEvent::PhaseStart { phase });
        }

        for rule in self.rules.rules_mut(phase) {
            if verbose {
                tracing::debug!(tick, %phase, rule = rule.name(), "running rule");
                self.trace.push(
                    tick,
                    TraceEvent::RuleRun {
                        phase,
                        rule: rule.name().to_string(),
                    },
                );
            }
            report.rules_run += 1;

            if let Err(source) = rule.run(&mut self.world) {
                return Err(Error::rule_failed(phase.as_str(), rule.name(), source)
                    .with_context(ErrorContext::new().with_tick(tick)));
            }
        }

        match phase {
            Phase::Geometry => {
                report.synced += builtin::sync_spatial_index(&mut self.world);
            }
            Phase::Constraint => {
                let clamps = builtin::clamp_vitals(&mut self.world);
                if verbose {
                    for clamp in &clamps {
                        tracing::trace!(
                            tick,
                            entity = %clamp.entity,
                            key = clamp.key,
                            from = clamp.from,
                            to = clamp.to,
                            "clamped"
                        );
                        self.trace.push(
                            tick,
                            TraceEvent::Clamped {
                                entity: clamp.entity.clone(),
                                key: clamp.key.to_string(),
                                from: clamp.from,
                                to: clamp.to,
                            },
                        );
                    }
                }
                report.clamped.extend(clamps);
            }
            Phase::Meta => {
                let removed = builtin::sweep_dead(&mut self.world);
                if verbose {
                    for id in &removed {
                        tracing::debug!(tick, entity = %id, "entity removed");
                        self.trace
                            .push(tick, TraceEvent::EntityRemoved { entity: id.clone() });
                    }
                }
                report.removed.extend(removed);
            }
            Phase::Epistemic | Phase::Dynamics | Phase::Gco => {}
        }
        Ok(())
    }
}
