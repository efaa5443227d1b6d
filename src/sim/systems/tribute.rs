//! Tribute collection up the hierarchy
//!
//! Every tributary transfers a configured fraction of its post-income
//! wealth to its direct overlord. Transfers are computed against the
//! previous snapshot's relation and the shared post-income buffer, then
//! applied together: payer and payee move by the same amount, so total
//! wealth is conserved across every pair.

use crate::sim::polity::WorldState;
use crate::sim::registry::SiteRegistry;

/// One payer -> payee transfer, by snapshot index
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TributePayment {
    pub payer: usize,
    pub payee: usize,
    pub amount: f32,
}

pub fn collect_tribute(
    registry: &SiteRegistry,
    prev: &WorldState,
    post_income_wealth: &[f32],
    tribute_fraction: f32,
) -> Vec<TributePayment> {
    let mut payments = Vec::new();
    for (payer, polity) in prev.polities.iter().enumerate() {
        let Some(payee) = polity.overlord.and_then(|id| registry.index_of(id)) else {
            continue;
        };
        let amount = tribute_fraction * post_income_wealth[payer];
        if amount > 0.0 {
            payments.push(TributePayment { payer, payee, amount });
        }
    }
    payments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PolityId, Vec2};
    use crate::sim::registry::Site;

    fn world(overlords: &[Option<u32>]) -> (SiteRegistry, WorldState) {
        let sites = overlords
            .iter()
            .enumerate()
            .map(|(i, &overlord)| Site {
                id: PolityId(i as u32),
                position: Vec2::default(),
                neighbors: vec![],
                base_resource: 0.0,
                initial_wealth: 100.0,
                initial_overlord: overlord.map(PolityId),
            })
            .collect();
        let registry = SiteRegistry::new(sites).unwrap();
        let state = WorldState::initial(&registry);
        (registry, state)
    }

    #[test]
    fn test_each_tributary_pays_its_direct_overlord() {
        let (registry, state) = world(&[None, Some(0), Some(1)]);
        let payments = collect_tribute(&registry, &state, &[120.0, 120.0, 120.0], 0.1);
        assert_eq!(
            payments,
            vec![
                TributePayment { payer: 1, payee: 0, amount: 12.0 },
                TributePayment { payer: 2, payee: 1, amount: 12.0 },
            ]
        );
    }

    #[test]
    fn test_independents_pay_nothing() {
        let (registry, state) = world(&[None, None]);
        assert!(collect_tribute(&registry, &state, &[50.0, 50.0], 0.2).is_empty());
    }

    #[test]
    fn test_zero_wealth_emits_no_event() {
        let (registry, state) = world(&[None, Some(0)]);
        assert!(collect_tribute(&registry, &state, &[50.0, 0.0], 0.2).is_empty());
    }

    #[test]
    fn test_transfers_conserve_total() {
        let (registry, state) = world(&[None, Some(0), Some(0)]);
        let buffer = [80.0, 40.0, 60.0];
        let payments = collect_tribute(&registry, &state, &buffer, 0.25);
        let mut wealth = buffer;
        for p in &payments {
            wealth[p.payer] -= p.amount;
            wealth[p.payee] += p.amount;
        }
        let before: f32 = buffer.iter().sum();
        let after: f32 = wealth.iter().sum();
        assert!((before - after).abs() < 1e-4);
    }
}
