//! Result selection with specialty diversity and a fallback cascade.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use wellmatch_model::SelectionOptions;

use crate::rank::ScoredCandidate;

/// Which pass produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Candidates above the primary cutoff, diversified by specialty.
    Primary,
    /// Nothing cleared the primary cutoff; a lower cutoff was used.
    LoweredCutoff,
    /// Best-reputation practitioners in the patient's city.
    LocalReputation,
    /// Best-reputation practitioners overall.
    GlobalReputation,
}

impl SelectionStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::LoweredCutoff => "lowered cutoff",
            Self::LocalReputation => "local reputation",
            Self::GlobalReputation => "global reputation",
        }
    }

    pub fn is_fallback(self) -> bool {
        self != Self::Primary
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the final recommendations from a ranked list.
///
/// The primary pass keeps candidates above `min_final_score` and takes the
/// first of each specialty before filling remaining slots in rank order.
/// When that yields nothing, the cascade tries a lowered cutoff, then
/// same-city reputation, then global reputation. The result is empty only
/// when `ranked` is.
pub fn select<'a>(
    ranked: Vec<ScoredCandidate<'a>>,
    options: &SelectionOptions,
) -> (Vec<ScoredCandidate<'a>>, SelectionStrategy) {
    let eligible: Vec<usize> = (0..ranked.len())
        .filter(|&i| ranked[i].final_score > options.min_final_score)
        .collect();
    let picks = diverse_picks(&ranked, &eligible, options.max_results);
    if !picks.is_empty() {
        return (take(ranked, &picks), SelectionStrategy::Primary);
    }

    let mut lowered: Vec<usize> = (0..ranked.len())
        .filter(|&i| ranked[i].final_score > options.fallback_min_final_score)
        .collect();
    lowered.sort_by(|&a, &b| ranked[b].final_score.total_cmp(&ranked[a].final_score));
    lowered.truncate(options.fallback_results);
    if !lowered.is_empty() {
        tracing::warn!(
            count = lowered.len(),
            "nothing cleared the cutoff; selected with lowered cutoff"
        );
        return (take(ranked, &lowered), SelectionStrategy::LoweredCutoff);
    }

    let local: Vec<usize> = (0..ranked.len())
        .filter(|&i| ranked[i].location.same_city)
        .collect();
    let local = by_reputation(&ranked, local, options.fallback_results);
    if !local.is_empty() {
        tracing::warn!(
            count = local.len(),
            "no relevant candidate; selected local practitioners by reputation"
        );
        return (take(ranked, &local), SelectionStrategy::LocalReputation);
    }

    let global = by_reputation(&ranked, (0..ranked.len()).collect(), options.fallback_results);
    tracing::warn!(
        count = global.len(),
        "no relevant or local candidate; selected practitioners by reputation"
    );
    (take(ranked, &global), SelectionStrategy::GlobalReputation)
}

fn diverse_picks(ranked: &[ScoredCandidate<'_>], eligible: &[usize], max: usize) -> Vec<usize> {
    let mut picks = Vec::new();
    let mut specialties: BTreeSet<String> = BTreeSet::new();

    for &i in eligible {
        if picks.len() >= max {
            break;
        }
        if specialties.insert(ranked[i].practitioner.specialty().to_lowercase()) {
            picks.push(i);
        }
    }
    for &i in eligible {
        if picks.len() >= max {
            break;
        }
        if !picks.contains(&i) {
            picks.push(i);
        }
    }
    picks
}

fn by_reputation(ranked: &[ScoredCandidate<'_>], mut indices: Vec<usize>, n: usize) -> Vec<usize> {
    indices.sort_by(|&a, &b| ranked[b].reputation.total_cmp(&ranked[a].reputation));
    indices.truncate(n);
    indices
}

/// Moves the picked candidates out of `ranked`, in pick order.
fn take<'a>(ranked: Vec<ScoredCandidate<'a>>, picks: &[usize]) -> Vec<ScoredCandidate<'a>> {
    let mut slots: Vec<Option<ScoredCandidate<'a>>> = ranked.into_iter().map(Some).collect();
    picks
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
