//! Eras - contiguous stretches of one actor's history
//!
//! An era spans the ticks between two adjacent wealth-series
//! boundaries and owns the events that fell inside it. For one actor,
//! eras partition the full logged range with no gap and no overlap.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{PolityId, Tick};
use crate::narrative::extrema::era_boundaries;
use crate::sim::events::{Event, EventLog};

/// Net wealth trend over an era
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EraTrend {
    Growth,
    Decline,
    Stable,
}

impl EraTrend {
    /// Classify by net change: strictly up is growth, strictly down is
    /// decline, exact equality is stable.
    pub fn classify(start_wealth: f32, end_wealth: f32) -> Self {
        if end_wealth > start_wealth {
            EraTrend::Growth
        } else if end_wealth < start_wealth {
            EraTrend::Decline
        } else {
            EraTrend::Stable
        }
    }

    /// Noun used in the trend sentence
    pub fn noun(&self) -> &'static str {
        match self {
            EraTrend::Growth => "growth",
            EraTrend::Decline => "decline",
            EraTrend::Stable => "stability",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Era {
    pub actor: PolityId,
    pub start: Tick,
    pub end: Tick,
    pub trend: EraTrend,
    /// Events attributed to this era, in tick order
    pub events: Vec<Event>,
}

/// Segment one actor's logged history into eras and attribute its
/// events to them.
///
/// Attribution assigns an event on a shared boundary tick to the
/// earlier era: era 0 covers `[b_0, b_1]`, every later era covers
/// `(b_i, b_{i+1}]`. Each event involving the actor therefore lands in
/// exactly one era.
pub fn build_eras(log: &EventLog, actor: PolityId, min_prominence: f32) -> Result<Vec<Era>> {
    let series = log.wealth_series(actor)?;
    let values: Vec<f32> = series.iter().map(|&(_, w)| w).collect();
    let boundaries = era_boundaries(&values, min_prominence);

    if boundaries.len() < 2 {
        // degenerate single-tick log: one era, all events
        let tick = series[0].0;
        let events = log
            .events_in_range(actor, tick, tick)?
            .into_iter()
            .cloned()
            .collect();
        return Ok(vec![Era {
            actor,
            start: tick,
            end: tick,
            trend: EraTrend::Stable,
            events,
        }]);
    }

    let mut eras = Vec::with_capacity(boundaries.len() - 1);
    for (i, window) in boundaries.windows(2).enumerate() {
        let start = series[window[0]].0;
        let end = series[window[1]].0;
        let events_from = if i == 0 { start } else { start + 1 };
        let events = log
            .events_in_range(actor, events_from, end)?
            .into_iter()
            .cloned()
            .collect();
        eras.push(Era {
            actor,
            start,
            end,
            trend: EraTrend::classify(values[window[0]], values[window[1]]),
            events,
        });
    }
    Ok(eras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::EventKind;
    use crate::sim::polity::{PolityState, WorldState};

    fn log_from_series(series: &[f32]) -> EventLog {
        let mut log = EventLog::new();
        for (tick, &wealth) in series.iter().enumerate() {
            log.append(
                WorldState {
                    tick: tick as Tick,
                    polities: vec![PolityState {
                        id: PolityId(0),
                        wealth,
                        overlord: None,
                    }],
                },
                vec![],
            )
            .unwrap();
        }
        log
    }

    #[test]
    fn test_monotonic_series_is_single_growth_era() {
        let log = log_from_series(&[10.0, 12.0, 15.0, 20.0]);
        let eras = build_eras(&log, PolityId(0), 0.0).unwrap();
        assert_eq!(eras.len(), 1);
        assert_eq!((eras[0].start, eras[0].end), (0, 3));
        assert_eq!(eras[0].trend, EraTrend::Growth);
    }

    #[test]
    fn test_valley_series_splits_decline_then_growth() {
        let log = log_from_series(&[20.0, 15.0, 10.0, 14.0, 18.0]);
        let eras = build_eras(&log, PolityId(0), 0.0).unwrap();
        assert_eq!(eras.len(), 2);
        assert_eq!((eras[0].start, eras[0].end), (0, 2));
        assert_eq!(eras[0].trend, EraTrend::Decline);
        assert_eq!((eras[1].start, eras[1].end), (2, 4));
        assert_eq!(eras[1].trend, EraTrend::Growth);
    }

    #[test]
    fn test_flat_era_is_stable() {
        let log = log_from_series(&[5.0, 5.0, 5.0]);
        let eras = build_eras(&log, PolityId(0), 0.0).unwrap();
        assert_eq!(eras.len(), 1);
        assert_eq!(eras[0].trend, EraTrend::Stable);
    }

    #[test]
    fn test_single_tick_log_is_degenerate_era() {
        let log = log_from_series(&[9.0]);
        let eras = build_eras(&log, PolityId(0), 0.0).unwrap();
        assert_eq!(eras.len(), 1);
        assert_eq!((eras[0].start, eras[0].end), (0, 0));
    }

    #[test]
    fn test_boundary_event_goes_to_earlier_era() {
        let mut log = EventLog::new();
        let series = [20.0f32, 10.0, 15.0];
        for (tick, &wealth) in series.iter().enumerate() {
            let tick = tick as Tick;
            let events = if tick == 1 {
                vec![Event {
                    tick,
                    kind: EventKind::Rebellion {
                        tributary: PolityId(0),
                        former_overlord: PolityId(1),
                    },
                }]
            } else {
                vec![]
            };
            log.append(
                WorldState {
                    tick,
                    polities: vec![
                        PolityState { id: PolityId(0), wealth, overlord: None },
                        PolityState { id: PolityId(1), wealth: 1.0, overlord: None },
                    ],
                },
                events,
            )
            .unwrap();
        }

        let eras = build_eras(&log, PolityId(0), 0.0).unwrap();
        assert_eq!(eras.len(), 2);
        // tick 1 is the shared boundary: the event belongs to the first era
        assert_eq!(eras[0].events.len(), 1);
        assert!(eras[1].events.is_empty());
    }
}
