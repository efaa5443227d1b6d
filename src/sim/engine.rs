//! Main simulation loop
//!
//! The engine advances one tick at a time under a compute-then-commit
//! discipline: every rule reads the tick t-1 snapshot, all writes land
//! in a tick-local buffer, and the buffer becomes the tick t snapshot
//! in one step. Results are therefore independent of the iteration
//! order over actors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::error::{HegemonError, Result};
use crate::sim::events::{Event, EventKind, EventLog};
use crate::sim::output::SimulationOutput;
use crate::sim::polity::WorldState;
use crate::sim::registry::SiteRegistry;
use crate::sim::systems;

/// Wealth this far below zero before the floor is an arithmetic bug,
/// not float dust.
const NEGATIVE_WEALTH_TOLERANCE: f32 = 1e-3;

pub struct TributeEngine<'a> {
    registry: &'a SiteRegistry,
    config: &'a EngineConfig,
    rng: ChaCha8Rng,
    current: WorldState,
}

impl<'a> TributeEngine<'a> {
    /// Set up a run. The config is validated here; an invalid one
    /// never produces a log entry. (Registry validation happened at
    /// `SiteRegistry` construction.)
    pub fn new(registry: &'a SiteRegistry, config: &'a EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            current: WorldState::initial(registry),
        })
    }

    /// The snapshot the next `step` will read from
    pub fn current_state(&self) -> &WorldState {
        &self.current
    }

    /// Advance one tick. Returns the snapshot the events were derived
    /// from together with those events; the engine's current state
    /// moves to the next tick.
    pub fn step(&mut self) -> Result<(WorldState, Vec<Event>)> {
        let registry = self.registry;
        let config = self.config;
        let prev = &self.current;
        let tick = prev.tick;
        let n = prev.polities.len();

        // 1. Income
        let post_income: Vec<f32> = prev
            .polities
            .iter()
            .enumerate()
            .map(|(i, p)| p.wealth + registry.sites()[i].base_resource)
            .collect();

        // 2. Effective strength (previous snapshot only)
        let strengths = systems::effective_strengths(registry, prev, config);

        // 3. Conflict resolution
        let wars = systems::resolve_conflicts(
            registry,
            prev,
            &strengths,
            config.war_margin,
            &mut self.rng,
        );

        // 4. Tribute collection (previous relation, post-income wealth)
        let payments =
            systems::collect_tribute(registry, prev, &post_income, config.tribute_fraction);

        // 5. Rebellion check
        let secessions = systems::check_rebellions(registry, prev, &strengths, config);

        // Commit: wealth
        let mut wealth = post_income;
        for payment in &payments {
            wealth[payment.payer] -= payment.amount;
            wealth[payment.payee] += payment.amount;
        }
        for (i, w) in wealth.iter_mut().enumerate() {
            if *w < -NEGATIVE_WEALTH_TOLERANCE {
                return Err(HegemonError::InvariantViolation {
                    tick,
                    detail: format!(
                        "wealth of {} went negative: {}",
                        prev.polities[i].id, w
                    ),
                });
            }
            // 6. Floor
            *w = w.max(0.0);
        }

        // Commit: hierarchy. Secessions first, conquests last, so a
        // polity both rebelling and conquered ends the tick as the
        // winner's tributary (both events are logged).
        let mut overlords: Vec<_> = prev.polities.iter().map(|p| p.overlord).collect();
        for secession in &secessions {
            overlords[secession.tributary] = None;
        }
        for war in &wars {
            overlords[war.loser] = Some(prev.polities[war.winner].id);
        }

        let mut events = Vec::with_capacity(wars.len() + payments.len() + secessions.len());
        for war in &wars {
            let attacker = prev.polities[war.winner].id;
            let defender = prev.polities[war.loser].id;
            tracing::debug!(tick, %attacker, %defender, margin = war.margin, "war resolved");
            events.push(Event {
                tick,
                kind: EventKind::War {
                    attacker,
                    defender,
                    winner: attacker,
                },
            });
        }
        for payment in &payments {
            events.push(Event {
                tick,
                kind: EventKind::Tribute {
                    payer: prev.polities[payment.payer].id,
                    payee: prev.polities[payment.payee].id,
                    amount: payment.amount,
                },
            });
        }
        for secession in &secessions {
            let tributary = prev.polities[secession.tributary].id;
            let former_overlord = prev.polities[secession.former_overlord].id;
            tracing::debug!(tick, %tributary, %former_overlord, "rebellion");
            events.push(Event {
                tick,
                kind: EventKind::Rebellion {
                    tributary,
                    former_overlord,
                },
            });
        }

        let next = WorldState {
            tick: tick + 1,
            polities: (0..n)
                .map(|i| {
                    let mut polity = prev.polities[i].clone();
                    polity.wealth = wealth[i];
                    polity.overlord = overlords[i];
                    polity
                })
                .collect(),
        };
        next.verify_forest(registry)?;

        let stepped = std::mem::replace(&mut self.current, next);
        Ok((stepped, events))
    }
}

/// Run a full simulation: the tick 0 snapshot through the horizon,
/// every tick appended to the log. Log entry t pairs the tick t
/// snapshot with the events derived from it; their effects appear in
/// the tick t+1 snapshot. The final entry carries no events.
pub fn simulate(registry: &SiteRegistry, config: &EngineConfig) -> Result<SimulationOutput> {
    let start = std::time::Instant::now();
    let mut engine = TributeEngine::new(registry, config)?;
    let mut log = EventLog::new();

    tracing::info!(
        sites = registry.len(),
        horizon = config.horizon,
        seed = config.seed,
        "simulation starting"
    );

    for _ in 0..config.horizon {
        let (state, events) = engine.step()?;
        log.append(state, events)?;
    }
    log.append(engine.current_state().clone(), Vec::new())?;

    let elapsed = start.elapsed();
    let output = SimulationOutput::new(log, elapsed);
    tracing::info!(
        ticks = config.horizon,
        events = output.statistics.total_events,
        wars = output.statistics.wars_fought,
        "simulation complete"
    );
    Ok(output)
}
