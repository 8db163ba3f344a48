//! Aggregation functions over distribution tables.
//!
//! Everything here is a pure function of its inputs. A distribution whose
//! total is zero never raises: breakdowns report 0.0 for every key and there
//! is no dominant entry. Callers that need a hard precondition use
//! [`require_non_empty`].
//!
//! Classification thresholds come from [`PolicyConfig`]; the free functions
//! without a policy argument use the default policy.

use std::fmt;

use feedlens_common::{Error, PolicyConfig, Result};
use serde::{Deserialize, Serialize};

use crate::label::{Distribution, Label};

// ============================================================================
// Shares
// ============================================================================

/// One row of a percentage breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: Label,
    pub count: u64,
    /// `count / total * 100`, rounded to one decimal place
    pub percentage: f64,
}

/// The largest entry of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dominant {
    pub label: Label,
    pub count: u64,
    /// Unrounded share of the total, in percent
    pub percentage: f64,
}

/// Sum of all counts; zero for an empty table. Saturates at `u64::MAX`.
pub fn total_of(distribution: &Distribution) -> u64 {
    distribution
        .iter()
        .fold(0u64, |total, (_, count)| total.saturating_add(*count))
}

/// Sum of all counts, `None` when it does not fit in a `u64`.
pub fn checked_total(distribution: &Distribution) -> Option<u64> {
    distribution
        .iter()
        .try_fold(0u64, |total, (_, count)| total.checked_add(*count))
}

/// Unrounded percentage of `count` in `total`, zero when `total` is zero.
pub fn percent_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Round to one decimal place for display.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Entries ordered by count, descending. The sort is stable, so equal
/// counts keep insertion order.
fn ranked(distribution: &Distribution) -> Vec<(&Label, u64)> {
    let mut entries: Vec<_> = distribution.iter().map(|(l, c)| (l, *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// Per-key percentage of the total, largest first.
pub fn percentage_breakdown(distribution: &Distribution) -> Vec<Share> {
    let total = total_of(distribution);
    ranked(distribution)
        .into_iter()
        .map(|(label, count)| Share {
            label: label.clone(),
            count,
            percentage: round_tenth(percent_of(count, total)),
        })
        .collect()
}

/// The key with the highest count; the first one in insertion order wins a
/// tie. `None` when the table is empty or sums to zero.
pub fn dominant_entry(distribution: &Distribution) -> Option<Dominant> {
    let total = total_of(distribution);
    if total == 0 {
        return None;
    }
    ranked(distribution).into_iter().next().map(|(label, count)| Dominant {
        label: label.clone(),
        count,
        percentage: percent_of(count, total),
    })
}

/// Total of the table, or [`Error::EmptyDistribution`] when it is zero.
pub fn require_non_empty(distribution: &Distribution, what: &str) -> Result<u64> {
    match total_of(distribution) {
        0 => Err(Error::EmptyDistribution(format!("{what} has no counts"))),
        total => Ok(total),
    }
}

/// Number of keys whose share of the total is strictly below
/// `threshold_fraction`. Zero for a zero-total table.
pub fn minority_group_count(distribution: &Distribution, threshold_fraction: f64) -> usize {
    let total = total_of(distribution);
    if total == 0 {
        return 0;
    }
    distribution
        .iter()
        .filter(|(_, count)| (**count as f64 / total as f64) < threshold_fraction)
        .count()
}

/// [`minority_group_count`] with the policy's minority fraction.
pub fn minority_groups(distribution: &Distribution, policy: &PolicyConfig) -> usize {
    minority_group_count(distribution, policy.minority_fraction)
}

// ============================================================================
// Classifications
// ============================================================================

/// How strongly the largest group dominates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiasLevel {
    Low,
    Moderate,
    High,
}

impl BiasLevel {
    /// `High` above the high threshold, `Moderate` above the moderate one,
    /// otherwise `Low`. A value exactly on a threshold takes the lower tier.
    pub fn classify(dominant_percentage: f64, policy: &PolicyConfig) -> Self {
        if dominant_percentage > policy.high_bias_above {
            Self::High
        } else if dominant_percentage > policy.moderate_bias_above {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Representation balance of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceLabel {
    Balanced,
    Moderate,
    Imbalanced,
}

impl BalanceLabel {
    /// `Balanced` below the balanced threshold, `Moderate` below the
    /// imbalanced one, otherwise `Imbalanced`. A value exactly on a
    /// threshold takes the higher tier.
    pub fn classify(dominant_percentage: f64, policy: &PolicyConfig) -> Self {
        if dominant_percentage < policy.balanced_below {
            Self::Balanced
        } else if dominant_percentage < policy.imbalanced_at {
            Self::Moderate
        } else {
            Self::Imbalanced
        }
    }
}

impl fmt::Display for BalanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "Balanced"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Imbalanced => write!(f, "Imbalanced"),
        }
    }
}

/// Argument strength band of a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    Weak,
    Moderate,
    Strong,
}

impl StrengthTier {
    pub fn classify(strength_score: f64, policy: &PolicyConfig) -> Self {
        if strength_score >= policy.strong_strength_at {
            Self::Strong
        } else if strength_score >= policy.moderate_strength_at {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// [`BiasLevel::classify`] with the default policy (60 / 40).
pub fn bias_level(dominant_percentage: f64) -> BiasLevel {
    BiasLevel::classify(dominant_percentage, &PolicyConfig::default())
}

/// [`BalanceLabel::classify`] with the default policy (40 / 60).
pub fn balance_label(dominant_percentage: f64) -> BalanceLabel {
    BalanceLabel::classify(dominant_percentage, &PolicyConfig::default())
}
