//! Publication classification against a criteria set.

use serde::{Deserialize, Serialize};

use crate::config::YearRange;
use crate::criteria::{CombinationLogic, Criterion, CriteriaSet};
use crate::models::Publication;

/// Screening outcome for one publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Included,
    Excluded,
}

/// Why a publication was excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// A matched exclusion criterion
    Criterion(Criterion),
    /// Publication year unknown or outside the configured window
    OutsideDateRange(YearRange),
    /// No inclusion criterion matched
    FailedInclusion,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::Criterion(criterion) => write!(f, "{}", criterion),
            ExclusionReason::OutsideDateRange(range) => {
                write!(f, "published outside {}", range)
            }
            ExclusionReason::FailedInclusion => write!(f, "failed inclusion criteria"),
        }
    }
}

/// Classification attached alongside a publication (never into it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub disposition: Disposition,
    /// Ordered exclusion reasons; empty for included publications
    pub reasons: Vec<ExclusionReason>,
}

impl ClassificationResult {
    pub fn is_included(&self) -> bool {
        self.disposition == Disposition::Included
    }

    /// Reasons joined for CSV output; included publications report that
    /// they met all criteria.
    pub fn reasons_joined(&self) -> String {
        if self.reasons.is_empty() {
            "Meets all criteria".to_string()
        } else {
            self.reasons
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// Classify one publication against the criteria set.
///
/// Exclusion is authoritative: a publication matching the exclusion
/// threshold is excluded no matter what the inclusion list says. The
/// stages run in order — exclusion criteria, date window, inclusion
/// criteria — and the first failing stage decides the reasons. All matched
/// exclusion criteria are reported, not just the first.
///
/// Deterministic: the same `(publication, criteria)` pair always produces
/// the same result.
pub fn classify(publication: &Publication, criteria: &CriteriaSet) -> ClassificationResult {
    let matched_exclusions: Vec<&Criterion> = criteria
        .exclusion
        .iter()
        .filter(|criterion| criterion.matches(publication))
        .collect();

    let exclusion_triggered = !criteria.exclusion.is_empty()
        && threshold_met(criteria.logic, matched_exclusions.len(), criteria.exclusion.len());

    if exclusion_triggered {
        return ClassificationResult {
            disposition: Disposition::Excluded,
            reasons: matched_exclusions
                .into_iter()
                .map(|criterion| ExclusionReason::Criterion(criterion.clone()))
                .collect(),
        };
    }

    if let Some(range) = criteria.year_range {
        // Unknown years fail the window: a record that cannot prove it is
        // in range is not carried forward.
        let in_range = publication.year.map_or(false, |year| range.contains(year));
        if !in_range {
            return ClassificationResult {
                disposition: Disposition::Excluded,
                reasons: vec![ExclusionReason::OutsideDateRange(range)],
            };
        }
    }

    let matched_inclusions = criteria
        .inclusion
        .iter()
        .filter(|criterion| criterion.matches(publication))
        .count();

    // An empty inclusion list is trivially satisfied.
    let included = criteria.inclusion.is_empty()
        || threshold_met(criteria.logic, matched_inclusions, criteria.inclusion.len());

    if included {
        ClassificationResult {
            disposition: Disposition::Included,
            reasons: Vec::new(),
        }
    } else {
        ClassificationResult {
            disposition: Disposition::Excluded,
            reasons: vec![ExclusionReason::FailedInclusion],
        }
    }
}

fn threshold_met(logic: CombinationLogic, matched: usize, total: usize) -> bool {
    match logic {
        CombinationLogic::Or => matched >= 1,
        CombinationLogic::And => matched == total,
    }
}
