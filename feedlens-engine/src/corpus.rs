//! Corpus store.
//!
//! [`FeedbackCorpus`] is the aggregate root: the precomputed distribution
//! tables plus the ordered comment list. It is built once (sample data or a
//! JSON document) and only ever read afterwards.
//!
//! The intent distribution and the thematic clusters are independently
//! maintained aggregates. Neither is derived from the other and they are not
//! cross-validated on load; see [`crate::consistency`] for the report that
//! documents where they disagree.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use feedlens_common::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::checked_total;
use crate::label::{Distribution, Label, ThematicClusters};

// ============================================================================
// Comment
// ============================================================================

/// A single categorized public comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Opaque stable identifier (e.g. `comment_007`)
    pub id: String,
    pub intent: Label,
    pub theme: Label,
    pub stakeholder: Label,
    pub summary: String,
    /// Short tags; order is kept, duplicates carry no meaning
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Argument strength, documented range 0-10 (not enforced)
    pub strength_score: f64,
    /// Real submission time, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a comment with validated labels and no keywords.
    pub fn new(
        id: impl Into<String>,
        intent: &str,
        theme: &str,
        stakeholder: &str,
        summary: impl Into<String>,
        strength_score: f64,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            intent: Label::new(intent)?,
            theme: Label::new(theme)?,
            stakeholder: Label::new(stakeholder)?,
            summary: summary.into(),
            keywords: Vec::new(),
            strength_score,
            submitted_at: None,
        })
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(at);
        self
    }

    /// Describe what makes this record structurally invalid, if anything.
    ///
    /// Labels are validated by construction; the identifier and the score
    /// are plain fields and are checked here.
    pub fn structural_problem(&self) -> Option<String> {
        if self.id.trim().is_empty() {
            return Some("identifier is blank".to_string());
        }
        if !self.strength_score.is_finite() {
            return Some(format!(
                "strength score {} is not a finite number",
                self.strength_score
            ));
        }
        None
    }
}

// ============================================================================
// Feedback Corpus
// ============================================================================

/// The immutable in-memory dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CorpusDocument")]
pub struct FeedbackCorpus {
    intent_distribution: Distribution,
    thematic_clusters: ThematicClusters,
    stakeholder_distribution: Distribution,
    comments: Vec<Comment>,
}

/// Wire shape of a corpus document, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorpusDocument {
    #[serde(default)]
    intent_distribution: Distribution,
    #[serde(default)]
    thematic_clusters: ThematicClusters,
    #[serde(default)]
    stakeholder_distribution: Distribution,
    comments: Vec<Comment>,
}

impl TryFrom<CorpusDocument> for FeedbackCorpus {
    type Error = Error;

    fn try_from(doc: CorpusDocument) -> Result<Self> {
        Self::new(
            doc.intent_distribution,
            doc.thematic_clusters,
            doc.stakeholder_distribution,
            doc.comments,
        )
    }
}

fn check_total(table: &str, distribution: &Distribution) -> Result<()> {
    match checked_total(distribution) {
        Some(_) => Ok(()),
        None => Err(Error::MalformedCorpus(format!(
            "{table} counts add up to more than {}",
            u64::MAX
        ))),
    }
}

impl FeedbackCorpus {
    /// Assemble a corpus, rejecting structurally invalid comments, duplicate
    /// comment identifiers and tables whose total overflows a `u64`.
    pub fn new(
        intent_distribution: Distribution,
        thematic_clusters: ThematicClusters,
        stakeholder_distribution: Distribution,
        comments: Vec<Comment>,
    ) -> Result<Self> {
        check_total("intentDistribution", &intent_distribution)?;
        check_total("stakeholderDistribution", &stakeholder_distribution)?;
        for (intent, themes) in thematic_clusters.iter() {
            check_total(&format!("thematicClusters.{intent}"), themes)?;
        }

        let mut seen = HashSet::with_capacity(comments.len());
        for comment in &comments {
            if let Some(reason) = comment.structural_problem() {
                return Err(Error::MalformedCorpus(format!(
                    "comment `{}`: {}",
                    comment.id, reason
                )));
            }
            if !seen.insert(comment.id.as_str()) {
                return Err(Error::MalformedCorpus(format!(
                    "duplicate comment id `{}`",
                    comment.id
                )));
            }
        }

        Ok(Self {
            intent_distribution,
            thematic_clusters,
            stakeholder_distribution,
            comments,
        })
    }

    /// Assemble known-good parts (built-in data) without validation.
    pub(crate) fn from_parts(
        intent_distribution: Distribution,
        thematic_clusters: ThematicClusters,
        stakeholder_distribution: Distribution,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            intent_distribution,
            thematic_clusters,
            stakeholder_distribution,
            comments,
        }
    }

    /// Parse a JSON corpus document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let corpus: Self =
            serde_json::from_str(json).map_err(|e| Error::MalformedCorpus(e.to_string()))?;
        debug!(
            comments = corpus.comments.len(),
            intents = corpus.intent_distribution.len(),
            stakeholders = corpus.stakeholder_distribution.len(),
            "Parsed corpus document"
        );
        Ok(corpus)
    }

    /// Read and parse a JSON corpus document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read corpus from {}", path.display()))?;
        let corpus = Self::from_json_str(&content)
            .map_err(|e| e.with_context(format!("Failed to load corpus from {}", path.display())))?;
        info!(
            path = %path.display(),
            comments = corpus.comments.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    pub fn intent_distribution(&self) -> &Distribution {
        &self.intent_distribution
    }

    pub fn thematic_clusters(&self) -> &ThematicClusters {
        &self.thematic_clusters
    }

    pub fn stakeholder_distribution(&self) -> &Distribution {
        &self.stakeholder_distribution
    }

    /// Comments in storage order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Theme distribution of one intent, if the clusters list it.
    pub fn themes_for(&self, intent: &str) -> Option<&Distribution> {
        self.thematic_clusters.get(intent)
    }

    pub fn comment(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Resolve an intent label strictly against the intent distribution.
    ///
    /// Filtering never needs this (unknown labels simply match nothing); it
    /// is for callers that want to reject a selection up front.
    pub fn require_intent(&self, intent: &str) -> Result<&Label> {
        self.intent_distribution
            .labels()
            .find(|label| label.as_str() == intent)
            .ok_or_else(|| Error::unknown_label("intent", intent))
    }

    /// Resolve a stakeholder label strictly against the stakeholder
    /// distribution.
    pub fn require_stakeholder(&self, stakeholder: &str) -> Result<&Label> {
        self.stakeholder_distribution
            .labels()
            .find(|label| label.as_str() == stakeholder)
            .ok_or_else(|| Error::unknown_label("stakeholder", stakeholder))
    }
}
