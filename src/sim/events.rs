//! Events and the append-only run log

use serde::{Deserialize, Serialize};

use crate::core::error::{HegemonError, Result};
use crate::core::types::{PolityId, Tick};
use crate::sim::polity::WorldState;

/// Discrete event kinds emitted by the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A war resolved this tick; the loser became the winner's direct
    /// tributary in the next snapshot.
    War {
        attacker: PolityId,
        defender: PolityId,
        winner: PolityId,
    },
    /// Wealth transferred up one link of the tribute hierarchy.
    Tribute {
        payer: PolityId,
        payee: PolityId,
        amount: f32,
    },
    /// A tributary seceded from an overextended overlord.
    Rebellion {
        tributary: PolityId,
        former_overlord: PolityId,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: Tick,
    pub kind: EventKind,
}

impl Event {
    /// Whether the given polity participates in this event
    pub fn involves(&self, id: PolityId) -> bool {
        match self.kind {
            EventKind::War {
                attacker,
                defender,
                winner,
            } => attacker == id || defender == id || winner == id,
            EventKind::Tribute { payer, payee, .. } => payer == id || payee == id,
            EventKind::Rebellion {
                tributary,
                former_overlord,
            } => tributary == id || former_overlord == id,
        }
    }
}

/// One logged tick: the snapshot plus the events the engine derived
/// from it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub state: WorldState,
    pub events: Vec<Event>,
}

/// Append-only, tick-ordered record of a run
///
/// Ticks are contiguous from 0 with no gaps; once appended, an entry is
/// immutable. Analysis (segmentation, summarization) reads only
/// committed entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.entries.last().map(|e| e.state.tick)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Append the next tick. The snapshot's tick must be exactly
    /// `last_tick + 1` (or 0 for the first call) and every event must
    /// carry that tick; anything else is an internal bug and aborts
    /// the run.
    pub fn append(&mut self, state: WorldState, events: Vec<Event>) -> Result<()> {
        let expected = match self.last_tick() {
            Some(t) => t + 1,
            None => 0,
        };
        if state.tick != expected {
            return Err(HegemonError::OutOfOrderTick {
                expected,
                got: state.tick,
            });
        }
        if let Some(stray) = events.iter().find(|e| e.tick != state.tick) {
            return Err(HegemonError::InvariantViolation {
                tick: state.tick,
                detail: format!("event stamped {} appended at tick {}", stray.tick, state.tick),
            });
        }
        self.entries.push(LogEntry { state, events });
        Ok(())
    }

    pub fn snapshot(&self, tick: Tick) -> Option<&WorldState> {
        self.entries.get(tick as usize).map(|e| &e.state)
    }

    pub fn events_for_tick(&self, tick: Tick) -> &[Event] {
        self.entries
            .get(tick as usize)
            .map(|e| e.events.as_slice())
            .unwrap_or(&[])
    }

    /// The actor's ordered (tick, wealth) sequence over the full logged
    /// range. The log is integrity-checked here: a tick gap or an actor
    /// missing from some tick is surfaced, never interpolated.
    pub fn wealth_series(&self, actor: PolityId) -> Result<Vec<(Tick, f32)>> {
        if self.entries.is_empty() {
            return Err(HegemonError::MalformedLog("empty log".into()));
        }
        let position = self.entries[0]
            .state
            .polities
            .iter()
            .position(|p| p.id == actor)
            .ok_or(HegemonError::UnknownActor(actor))?;

        let mut series = Vec::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.state.tick != i as Tick {
                return Err(HegemonError::MalformedLog(format!(
                    "gap in tick sequence: entry {} has tick {}",
                    i, entry.state.tick
                )));
            }
            match entry.state.polities.get(position) {
                Some(p) if p.id == actor => series.push((entry.state.tick, p.wealth)),
                _ => {
                    return Err(HegemonError::MalformedLog(format!(
                        "actor {} absent from tick {}",
                        actor, entry.state.tick
                    )))
                }
            }
        }
        Ok(series)
    }

    /// All events in `[start, end]` (inclusive) in which the actor
    /// participates, in tick order.
    pub fn events_in_range(
        &self,
        actor: PolityId,
        start: Tick,
        end: Tick,
    ) -> Result<Vec<&Event>> {
        let last = self
            .last_tick()
            .ok_or_else(|| HegemonError::MalformedLog("empty log".into()))?;
        if start > end || end > last {
            return Err(HegemonError::InvalidTickWindow { start, end, last });
        }
        if self.entries[0]
            .state
            .polities
            .iter()
            .all(|p| p.id != actor)
        {
            return Err(HegemonError::UnknownActor(actor));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| e.state.tick >= start && e.state.tick <= end)
            .flat_map(|e| e.events.iter())
            .filter(|e| e.involves(actor))
            .collect())
    }
}
