//! Chronicle assembly - from log to readable history
//!
//! Orders an actor's eras chronologically and concatenates their
//! rendered sentences into the actor's narrative paragraph.

use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::PolityId;
use crate::narrative::era::build_eras;
use crate::narrative::naming::NameBook;
use crate::narrative::summary::{digest_sentence, render_event, trend_sentence, TickToYear};
use crate::sim::events::EventLog;

/// How era contents are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NarrativeStyle {
    /// One sentence per attributed event, in tick order
    #[default]
    Chronicle,
    /// One aggregate sentence per era counting wars, tributes and
    /// rebellions
    Digest,
}

pub struct NarrativeAssembler<'a> {
    log: &'a EventLog,
    names: &'a NameBook,
    years: TickToYear,
    style: NarrativeStyle,
    min_prominence: f32,
}

impl<'a> NarrativeAssembler<'a> {
    pub fn new(log: &'a EventLog, names: &'a NameBook) -> Self {
        Self {
            log,
            names,
            years: TickToYear::default(),
            style: NarrativeStyle::default(),
            min_prominence: 0.0,
        }
    }

    pub fn with_years(mut self, years: TickToYear) -> Self {
        self.years = years;
        self
    }

    pub fn with_style(mut self, style: NarrativeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_min_prominence(mut self, min_prominence: f32) -> Self {
        self.min_prominence = min_prominence;
        self
    }

    /// The full narrative paragraph for one actor
    pub fn actor_narrative(&self, actor: PolityId) -> Result<String> {
        let series = self.log.wealth_series(actor)?;
        let eras = build_eras(self.log, actor, self.min_prominence)?;

        let mut sentences = Vec::new();
        for era in &eras {
            sentences.push(trend_sentence(era, &series, self.names, self.years));
            match self.style {
                NarrativeStyle::Chronicle => {
                    for event in &era.events {
                        sentences.push(render_event(event, self.names, self.years));
                    }
                }
                NarrativeStyle::Digest => {
                    if let Some(sentence) = digest_sentence(era, self.names, self.years) {
                        sentences.push(sentence);
                    }
                }
            }
        }
        Ok(sentences.join(" "))
    }

    /// Narratives for every actor in the log, keyed by id
    pub fn narrate_all(&self) -> Result<BTreeMap<PolityId, String>> {
        let mut narratives = BTreeMap::new();
        let actors: Vec<PolityId> = self
            .log
            .entries()
            .first()
            .map(|entry| entry.state.polities.iter().map(|p| p.id).collect())
            .unwrap_or_default();
        for actor in actors {
            narratives.insert(actor, self.actor_narrative(actor)?);
        }
        Ok(narratives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Tick;
    use crate::sim::events::{Event, EventKind};
    use crate::sim::polity::{PolityState, WorldState};

    fn log_with_war() -> EventLog {
        let mut log = EventLog::new();
        let wealth = [[10.0, 10.0], [12.0, 8.0], [15.0, 7.0]];
        for (tick, pair) in wealth.iter().enumerate() {
            let tick = tick as Tick;
            let events = if tick == 1 {
                vec![Event {
                    tick,
                    kind: EventKind::War {
                        attacker: PolityId(0),
                        defender: PolityId(1),
                        winner: PolityId(0),
                    },
                }]
            } else {
                vec![]
            };
            log.append(
                WorldState {
                    tick,
                    polities: vec![
                        PolityState { id: PolityId(0), wealth: pair[0], overlord: None },
                        PolityState { id: PolityId(1), wealth: pair[1], overlord: None },
                    ],
                },
                events,
            )
            .unwrap();
        }
        log
    }

    #[test]
    fn test_chronicle_includes_event_sentence() {
        let log = log_with_war();
        let names = NameBook::generate_for(&[PolityId(0), PolityId(1)], 1);
        let assembler = NarrativeAssembler::new(&log, &names);
        let text = assembler.actor_narrative(PolityId(0)).unwrap();
        assert!(text.contains("saw"));
        assert!(text.contains("made war upon"));
    }

    #[test]
    fn test_digest_style_aggregates() {
        let log = log_with_war();
        let names = NameBook::generate_for(&[PolityId(0), PolityId(1)], 1);
        let assembler =
            NarrativeAssembler::new(&log, &names).with_style(NarrativeStyle::Digest);
        let text = assembler.actor_narrative(PolityId(0)).unwrap();
        assert!(text.contains("fought a war against"));
        assert!(!text.contains("made war upon"));
    }

    #[test]
    fn test_narrate_all_covers_every_actor() {
        let log = log_with_war();
        let names = NameBook::generate_for(&[PolityId(0), PolityId(1)], 1);
        let narratives = NarrativeAssembler::new(&log, &names).narrate_all().unwrap();
        assert_eq!(narratives.len(), 2);
        assert!(narratives.contains_key(&PolityId(0)));
        assert!(narratives.contains_key(&PolityId(1)));
    }

    #[test]
    fn test_year_mapping_flows_into_sentences() {
        let log = log_with_war();
        let names = NameBook::generate_for(&[PolityId(0), PolityId(1)], 1);
        let assembler = NarrativeAssembler::new(&log, &names)
            .with_years(TickToYear { base_year: 1000, years_per_tick: 10 });
        let text = assembler.actor_narrative(PolityId(0)).unwrap();
        assert!(text.contains("From 1000 to 1020"));
        assert!(text.contains("In 1010,"));
    }
}
