//! Sentence rendering for eras and events
//!
//! Each event kind maps to one sentence template; an era renders as a
//! trend sentence followed by its event sentences in tick order. The
//! tick-to-year mapping is supplied by the caller.

use crate::core::types::Tick;
use crate::narrative::era::{Era, EraTrend};
use crate::narrative::naming::NameBook;
use crate::sim::events::{Event, EventKind};

/// Linear tick-to-year mapping. Defaults to the identity; callers with
/// a calendar supply their own base and step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickToYear {
    pub base_year: i64,
    pub years_per_tick: i64,
}

impl Default for TickToYear {
    fn default() -> Self {
        Self { base_year: 0, years_per_tick: 1 }
    }
}

impl TickToYear {
    pub fn year(&self, tick: Tick) -> i64 {
        self.base_year + self.years_per_tick * i64::from(tick)
    }
}

/// Render one event as a sentence
pub fn render_event(event: &Event, names: &NameBook, years: TickToYear) -> String {
    let year = years.year(event.tick);
    match &event.kind {
        EventKind::War { attacker, defender, winner } => format!(
            "In {}, {} made war upon {} and {} prevailed.",
            year,
            names.name(*attacker),
            names.name(*defender),
            names.name(*winner),
        ),
        EventKind::Tribute { payer, payee, amount } => format!(
            "In {}, {} rendered tribute of {:.0} to {}.",
            year,
            names.name(*payer),
            amount,
            names.name(*payee),
        ),
        EventKind::Rebellion { tributary, former_overlord } => format!(
            "In {}, {} rose against {} and broke free.",
            year,
            names.name(*tributary),
            names.name(*former_overlord),
        ),
    }
}

/// Render the era's opening trend sentence.
///
/// The pace qualifier compares the era's mean wealth change per tick
/// with the standard deviation of the actor's per-tick deltas over the
/// whole series: below it reads as slow, at or above as rapid.
pub fn trend_sentence(
    era: &Era,
    full_series: &[(Tick, f32)],
    names: &NameBook,
    years: TickToYear,
) -> String {
    let name = names.name(era.actor);
    let from = years.year(era.start);
    let to = years.year(era.end);

    if era.end == era.start {
        return format!("In {}, {} held steady.", from, name);
    }

    let wealth_at = |tick: Tick| {
        full_series
            .iter()
            .find(|&&(t, _)| t == tick)
            .map(|&(_, w)| w)
            .unwrap_or(0.0)
    };
    let delta = wealth_at(era.end) - wealth_at(era.start);
    let duration = (era.end - era.start) as f32;
    let pace = if (delta / duration).abs() < delta_std(full_series) {
        "slow"
    } else {
        "rapid"
    };

    match era.trend {
        EraTrend::Stable => format!("From {} to {}, {} saw stability.", from, to, name),
        trend => format!(
            "From {} to {}, {} saw {} {}.",
            from,
            to,
            name,
            pace,
            trend.noun()
        ),
    }
}

/// Population standard deviation of the series' per-tick deltas
fn delta_std(series: &[(Tick, f32)]) -> f32 {
    if series.len() < 2 {
        return 0.0;
    }
    let deltas: Vec<f32> = series.windows(2).map(|w| w[1].1 - w[0].1).collect();
    let mean = deltas.iter().sum::<f32>() / deltas.len() as f32;
    let variance =
        deltas.iter().map(|d| (d - mean) * (d - mean)).sum::<f32>() / deltas.len() as f32;
    variance.sqrt()
}

/// Join names into prose: "nobody", "A", or "A, B and C"
pub fn list_to_words(values: &[String]) -> String {
    match values {
        [] => "nobody".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// One aggregate sentence for an era's events, from the era's actor's
/// point of view. None when the era saw nothing worth telling.
pub fn digest_sentence(era: &Era, names: &NameBook, years: TickToYear) -> Option<String> {
    let mut war_targets: Vec<String> = Vec::new();
    let mut war_count = 0u32;
    let mut tribute_sources: Vec<String> = Vec::new();
    let mut tribute_paid_to: Vec<String> = Vec::new();
    let mut cast_off: Vec<String> = Vec::new();
    let mut defections: Vec<String> = Vec::new();

    let mut push_unique = |list: &mut Vec<String>, name: String| {
        if !list.contains(&name) {
            list.push(name);
        }
    };

    for event in &era.events {
        match &event.kind {
            EventKind::War { attacker, defender, .. } => {
                war_count += 1;
                let other = if *attacker == era.actor { defender } else { attacker };
                push_unique(&mut war_targets, names.name(*other));
            }
            EventKind::Tribute { payer, payee, .. } => {
                if *payee == era.actor {
                    push_unique(&mut tribute_sources, names.name(*payer));
                } else {
                    push_unique(&mut tribute_paid_to, names.name(*payee));
                }
            }
            EventKind::Rebellion { tributary, former_overlord } => {
                if *tributary == era.actor {
                    push_unique(&mut cast_off, names.name(*former_overlord));
                } else {
                    push_unique(&mut defections, names.name(*tributary));
                }
            }
        }
    }

    let mut clauses = Vec::new();
    if war_count == 1 {
        clauses.push(format!("fought a war against {}", list_to_words(&war_targets)));
    } else if war_count > 1 {
        clauses.push(format!(
            "fought {} wars against {}",
            war_count,
            list_to_words(&war_targets)
        ));
    }
    if !tribute_sources.is_empty() {
        clauses.push(format!("drew tribute from {}", list_to_words(&tribute_sources)));
    }
    if !tribute_paid_to.is_empty() {
        clauses.push(format!("paid tribute to {}", list_to_words(&tribute_paid_to)));
    }
    if !cast_off.is_empty() {
        clauses.push(format!("cast off the rule of {}", list_to_words(&cast_off)));
    }
    if !defections.is_empty() {
        clauses.push(format!(
            "suffered the defection of {}",
            list_to_words(&defections)
        ));
    }

    if clauses.is_empty() {
        return None;
    }

    let opening = if era.end > era.start + 1 {
        "In this period it".to_string()
    } else {
        format!("In {} it", years.year(era.end))
    };
    Some(format!("{} {}.", opening, list_to_words(&clauses)))
}
