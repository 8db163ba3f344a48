//! Cross-check between the intent distribution and the thematic clusters.
//!
//! The two tables are maintained independently and both are treated as
//! ground truth for their own displays. This report only documents where
//! they disagree; nothing is corrected.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::total_of;
use crate::corpus::FeedbackCorpus;
use crate::label::Label;

/// An intent whose volume differs between the two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterMismatch {
    pub intent: Label,
    /// Count in the intent distribution, `None` when the intent is not listed
    pub intent_count: Option<u64>,
    /// Sum of theme counts, `None` when the clusters have no entry
    pub theme_total: Option<u64>,
}

impl ClusterMismatch {
    /// Theme total minus intent count, treating a missing side as zero.
    pub fn difference(&self) -> i128 {
        i128::from(self.theme_total.unwrap_or(0)) - i128::from(self.intent_count.unwrap_or(0))
    }
}

/// Every intent whose theme total differs from its intent count, or that
/// appears in only one of the two tables. Intent-distribution order first,
/// then cluster-only intents.
pub fn cluster_consistency(corpus: &FeedbackCorpus) -> Vec<ClusterMismatch> {
    let intents = corpus.intent_distribution();
    let clusters = corpus.thematic_clusters();

    let mut mismatches: Vec<ClusterMismatch> = intents
        .iter()
        .filter_map(|(intent, count)| {
            let theme_total = clusters.get(intent.as_str()).map(total_of);
            (theme_total != Some(*count)).then(|| ClusterMismatch {
                intent: intent.clone(),
                intent_count: Some(*count),
                theme_total,
            })
        })
        .collect();

    mismatches.extend(
        clusters
            .iter()
            .filter(|(intent, _)| !intents.contains(intent.as_str()))
            .map(|(intent, themes)| ClusterMismatch {
                intent: intent.clone(),
                intent_count: None,
                theme_total: Some(total_of(themes)),
            }),
    );

    debug!(mismatches = mismatches.len(), "Checked cluster consistency");
    mismatches
}
