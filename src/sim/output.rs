//! Simulation output and serialization
//!
//! The row tables mirror the external exchange schema: one wealth row
//! per tick per actor, plus a side table of events. War rows carry the
//! winner in `outcome`; tribute rows carry the transfer in `amount`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{PolityId, Tick};
use crate::sim::events::{EventKind, EventLog};

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub log: EventLog,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: u32,
    pub simulation_time_ms: u64,
    pub total_events: u32,
    pub wars_fought: u32,
    pub tributes_paid: u32,
    pub rebellions: u32,
}

/// One row of the tick-indexed wealth table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WealthRow {
    pub tick: Tick,
    pub actor: PolityId,
    pub wealth: f32,
    pub overlord: Option<PolityId>,
}

/// One row of the event side table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventRow {
    pub tick: Tick,
    pub kind: &'static str,
    pub actor_a: PolityId,
    pub actor_b: PolityId,
    pub amount: Option<f32>,
    pub outcome: Option<PolityId>,
}

impl SimulationOutput {
    pub fn new(log: EventLog, elapsed: Duration) -> Self {
        let ticks_simulated = log.last_tick().unwrap_or(0);
        let mut wars_fought = 0;
        let mut tributes_paid = 0;
        let mut rebellions = 0;
        for entry in log.entries() {
            for event in &entry.events {
                match event.kind {
                    EventKind::War { .. } => wars_fought += 1,
                    EventKind::Tribute { .. } => tributes_paid += 1,
                    EventKind::Rebellion { .. } => rebellions += 1,
                }
            }
        }

        Self {
            statistics: SimulationStats {
                ticks_simulated,
                simulation_time_ms: elapsed.as_millis() as u64,
                total_events: wars_fought + tributes_paid + rebellions,
                wars_fought,
                tributes_paid,
                rebellions,
            },
            log,
        }
    }

    /// Tick-indexed wealth table, one row per tick per actor
    pub fn wealth_rows(&self) -> Vec<WealthRow> {
        self.log
            .entries()
            .iter()
            .flat_map(|entry| {
                entry.state.polities.iter().map(move |p| WealthRow {
                    tick: entry.state.tick,
                    actor: p.id,
                    wealth: p.wealth,
                    overlord: p.overlord,
                })
            })
            .collect()
    }

    /// Event side table in tick order
    pub fn event_rows(&self) -> Vec<EventRow> {
        self.log
            .entries()
            .iter()
            .flat_map(|entry| entry.events.iter())
            .map(|event| match event.kind {
                EventKind::War {
                    attacker,
                    defender,
                    winner,
                } => EventRow {
                    tick: event.tick,
                    kind: "war",
                    actor_a: attacker,
                    actor_b: defender,
                    amount: None,
                    outcome: Some(winner),
                },
                EventKind::Tribute { payer, payee, amount } => EventRow {
                    tick: event.tick,
                    kind: "tribute",
                    actor_a: payer,
                    actor_b: payee,
                    amount: Some(amount),
                    outcome: None,
                },
                EventKind::Rebellion {
                    tributary,
                    former_overlord,
                } => EventRow {
                    tick: event.tick,
                    kind: "rebellion",
                    actor_a: tributary,
                    actor_b: former_overlord,
                    amount: None,
                    outcome: None,
                },
            })
            .collect()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} ticks in {}ms\n{} events: {} wars, {} tributes, {} rebellions",
            self.statistics.ticks_simulated,
            self.statistics.simulation_time_ms,
            self.statistics.total_events,
            self.statistics.wars_fought,
            self.statistics.tributes_paid,
            self.statistics.rebellions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Event;
    use crate::sim::polity::{PolityState, WorldState};

    fn small_log() -> EventLog {
        let mut log = EventLog::new();
        for tick in 0..3u32 {
            let state = WorldState {
                tick,
                polities: vec![
                    PolityState { id: PolityId(0), wealth: 10.0 + tick as f32, overlord: None },
                    PolityState {
                        id: PolityId(1),
                        wealth: 5.0,
                        overlord: if tick > 0 { Some(PolityId(0)) } else { None },
                    },
                ],
            };
            let events = if tick == 0 {
                vec![Event {
                    tick,
                    kind: EventKind::War {
                        attacker: PolityId(0),
                        defender: PolityId(1),
                        winner: PolityId(0),
                    },
                }]
            } else {
                vec![Event {
                    tick,
                    kind: EventKind::Tribute {
                        payer: PolityId(1),
                        payee: PolityId(0),
                        amount: 1.0,
                    },
                }]
            };
            log.append(state, events).unwrap();
        }
        log
    }

    #[test]
    fn test_statistics_count_by_kind() {
        let output = SimulationOutput::new(small_log(), Duration::from_millis(1));
        assert_eq!(output.statistics.wars_fought, 1);
        assert_eq!(output.statistics.tributes_paid, 2);
        assert_eq!(output.statistics.rebellions, 0);
        assert_eq!(output.statistics.total_events, 3);
        assert_eq!(output.statistics.ticks_simulated, 2);
    }

    #[test]
    fn test_wealth_rows_one_per_tick_per_actor() {
        let output = SimulationOutput::new(small_log(), Duration::from_millis(1));
        let rows = output.wealth_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].actor, PolityId(0));
        assert_eq!(rows[3].tick, 1);
        assert_eq!(rows[3].overlord, Some(PolityId(0)));
    }

    #[test]
    fn test_event_rows_carry_outcome_or_amount() {
        let output = SimulationOutput::new(small_log(), Duration::from_millis(1));
        let rows = output.event_rows();
        assert_eq!(rows[0].kind, "war");
        assert_eq!(rows[0].outcome, Some(PolityId(0)));
        assert_eq!(rows[1].kind, "tribute");
        assert_eq!(rows[1].amount, Some(1.0));
    }
}
