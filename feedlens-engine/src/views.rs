//! View models: the structured values each screen displays.
//!
//! Every builder here is a pure function of the corpus and the policy.

use feedlens_common::PolicyConfig;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    dominant_entry, minority_groups, percentage_breakdown, round_tenth, total_of, BalanceLabel,
    BiasLevel, Dominant, Share, StrengthTier,
};
use crate::corpus::{Comment, FeedbackCorpus};
use crate::label::{Distribution, Label};
use crate::query::{
    distinct_stakeholders, filter_comments, sort_comments, FilterCriteria, SortKey,
    StakeholderFilter,
};

// ============================================================================
// Dashboard
// ============================================================================

/// Headline numbers of the landing view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Total of the intent distribution
    pub total_comments: u64,
    /// Number of stakeholder categories
    pub stakeholder_types: usize,
    /// Comments scoring strictly above the high-priority threshold
    pub high_priority: usize,
    pub intent_breakdown: Vec<Share>,
}

pub fn dashboard_summary(corpus: &FeedbackCorpus, policy: &PolicyConfig) -> DashboardSummary {
    DashboardSummary {
        total_comments: total_of(corpus.intent_distribution()),
        stakeholder_types: corpus.stakeholder_distribution().len(),
        high_priority: corpus
            .comments()
            .iter()
            .filter(|c| c.strength_score > policy.high_priority_above)
            .count(),
        intent_breakdown: percentage_breakdown(corpus.intent_distribution()),
    }
}

// ============================================================================
// Intent
// ============================================================================

/// Theme decomposition of one intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentSummary {
    pub intent: Label,
    pub theme_breakdown: Vec<Share>,
    /// Sum of the intent's theme counts
    pub theme_total: u64,
    pub unique_themes: usize,
    pub top_theme: Option<Dominant>,
}

/// An intent the clusters do not list yields an empty summary.
pub fn intent_summary(corpus: &FeedbackCorpus, intent: &Label) -> IntentSummary {
    let empty = Distribution::new();
    let themes = corpus.themes_for(intent.as_str()).unwrap_or(&empty);

    IntentSummary {
        intent: intent.clone(),
        theme_breakdown: percentage_breakdown(themes),
        theme_total: total_of(themes),
        unique_themes: themes.len(),
        top_theme: dominant_entry(themes),
    }
}

// ============================================================================
// Thematic
// ============================================================================

/// A comment together with its strength band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub tier: StrengthTier,
}

impl RankedComment {
    pub fn new(comment: &Comment, policy: &PolicyConfig) -> Self {
        Self {
            comment: comment.clone(),
            tier: StrengthTier::classify(comment.strength_score, policy),
        }
    }
}

fn rank_all(comments: &[&Comment], policy: &PolicyConfig) -> Vec<RankedComment> {
    comments.iter().map(|c| RankedComment::new(c, policy)).collect()
}

/// Comments of one intent and theme, strongest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThematicSummary {
    pub intent: Label,
    pub theme: Label,
    pub comments: Vec<RankedComment>,
    /// Mean strength score, 0 when there are no comments
    pub average_strength: f64,
    /// Stakeholders counted over the matching comments
    pub stakeholder_breakdown: Vec<Share>,
}

pub fn thematic_summary(
    corpus: &FeedbackCorpus,
    intent: &Label,
    theme: &Label,
    policy: &PolicyConfig,
) -> ThematicSummary {
    let criteria = FilterCriteria::new()
        .with_intent(intent.clone())
        .with_theme(theme.clone());
    let matching = sort_comments(&filter_comments(corpus, &criteria), SortKey::Strength);

    let average_strength = if matching.is_empty() {
        0.0
    } else {
        matching.iter().map(|c| c.strength_score).sum::<f64>() / matching.len() as f64
    };
    let stakeholders = Distribution::tally(matching.iter().map(|c| &c.stakeholder));

    ThematicSummary {
        intent: intent.clone(),
        theme: theme.clone(),
        comments: rank_all(&matching, policy),
        average_strength,
        stakeholder_breakdown: percentage_breakdown(&stakeholders),
    }
}

// ============================================================================
// Bias
// ============================================================================

/// Representation analysis of the stakeholder distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasReport {
    pub stakeholder_breakdown: Vec<Share>,
    pub dominant: Option<Dominant>,
    pub bias_level: BiasLevel,
    pub balance: BalanceLabel,
    /// `100 - dominant percentage`, one decimal
    pub balance_score: f64,
    pub stakeholder_types: usize,
    pub minority_groups: usize,
    /// Dominant share strictly above the over-representation threshold
    pub over_represented: bool,
}

pub fn bias_report(corpus: &FeedbackCorpus, policy: &PolicyConfig) -> BiasReport {
    let stakeholders = corpus.stakeholder_distribution();
    let dominant = dominant_entry(stakeholders);
    let dominant_pct = dominant.as_ref().map_or(0.0, |d| d.percentage);

    BiasReport {
        stakeholder_breakdown: percentage_breakdown(stakeholders),
        bias_level: BiasLevel::classify(dominant_pct, policy),
        balance: BalanceLabel::classify(dominant_pct, policy),
        balance_score: round_tenth(100.0 - dominant_pct),
        stakeholder_types: stakeholders.len(),
        minority_groups: minority_groups(stakeholders, policy),
        over_represented: dominant_pct > policy.over_representation_above,
        dominant,
    }
}

// ============================================================================
// Comment List
// ============================================================================

/// User-controlled options of the comment list, on top of the view's
/// intent and theme selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListOptions {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub stakeholder: StakeholderFilter,
    #[serde(default)]
    pub sort: SortKey,
}

impl ListOptions {
    pub fn criteria(&self, intent: Option<&Label>, theme: Option<&Label>) -> FilterCriteria {
        FilterCriteria {
            intent: intent.cloned(),
            theme: theme.cloned(),
            stakeholder: self.stakeholder.clone(),
            search_term: self.search_term.clone(),
        }
    }
}

/// Filtered and sorted comments with the list's controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentListing {
    pub intent: Option<Label>,
    pub theme: Option<Label>,
    pub sort: SortKey,
    /// `all` followed by every stakeholder seen in the corpus
    pub stakeholder_options: Vec<StakeholderFilter>,
    pub comments: Vec<RankedComment>,
    pub count: usize,
}

/// The filtered, sorted comments behind a list view, borrowed from the
/// corpus.
pub fn list_comments<'a>(
    corpus: &'a FeedbackCorpus,
    intent: Option<&Label>,
    theme: Option<&Label>,
    options: &ListOptions,
) -> Vec<&'a Comment> {
    let filtered = filter_comments(corpus, &options.criteria(intent, theme));
    sort_comments(&filtered, options.sort)
}

pub fn comment_listing(
    corpus: &FeedbackCorpus,
    intent: Option<&Label>,
    theme: Option<&Label>,
    options: &ListOptions,
    policy: &PolicyConfig,
) -> CommentListing {
    let comments = list_comments(corpus, intent, theme, options);
    CommentListing {
        intent: intent.cloned(),
        theme: theme.cloned(),
        sort: options.sort,
        stakeholder_options: distinct_stakeholders(corpus),
        count: comments.len(),
        comments: rank_all(&comments, policy),
    }
}

// ============================================================================
// View Model
// ============================================================================

/// Whatever the current screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum ViewModel {
    Dashboard(DashboardSummary),
    Intent(IntentSummary),
    Thematic(ThematicSummary),
    Comments(CommentListing),
    Bias(BiasReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    #[test]
    fn test_dashboard_summary() {
        let corpus = FeedbackCorpus::sample();
        let summary = dashboard_summary(&corpus, &PolicyConfig::default());
        assert_eq!(summary.total_comments, 6500);
        assert_eq!(summary.stakeholder_types, 6);
        // 9.2, 8.9, 8.1, 9.0, 8.4
        assert_eq!(summary.high_priority, 5);
        assert_eq!(summary.intent_breakdown.len(), 5);
    }

    #[test]
    fn test_intent_summary() {
        let corpus = FeedbackCorpus::sample();
        let summary = intent_summary(&corpus, &label("request for clarification"));
        assert_eq!(summary.theme_total, 2000);
        assert_eq!(summary.unique_themes, 5);
        assert_eq!(summary.top_theme.unwrap().label, "compliance cost");
        assert_eq!(summary.theme_breakdown[0].percentage, 30.0);

        let unknown = intent_summary(&corpus, &label("praise"));
        assert_eq!(unknown.theme_total, 0);
        assert!(unknown.theme_breakdown.is_empty());
        assert!(unknown.top_theme.is_none());
    }

    #[test]
    fn test_thematic_summary() {
        let corpus = FeedbackCorpus::sample();
        let summary = thematic_summary(
            &corpus,
            &label("legal concern"),
            &label("compliance cost"),
            &PolicyConfig::default(),
        );
        assert_eq!(summary.comments.len(), 1);
        assert_eq!(summary.comments[0].comment.id, "comment_008");
        assert_eq!(summary.comments[0].tier, StrengthTier::Strong);
        assert!((summary.average_strength - 9.0).abs() < 1e-9);
        assert_eq!(summary.stakeholder_breakdown[0].label, "profitable organization");
        assert_eq!(summary.stakeholder_breakdown[0].percentage, 100.0);

        let empty = thematic_summary(
            &corpus,
            &label("objective"),
            &label("investor protection"),
            &PolicyConfig::default(),
        );
        assert!(empty.comments.is_empty());
        assert_eq!(empty.average_strength, 0.0);
    }

    #[test]
    fn test_bias_report() {
        let corpus = FeedbackCorpus::sample();
        let report = bias_report(&corpus, &PolicyConfig::default());
        let dominant = report.dominant.as_ref().unwrap();
        assert_eq!(dominant.label, "stock exchange");
        assert!((dominant.percentage - 60.606).abs() < 0.001);
        assert_eq!(report.bias_level, BiasLevel::High);
        assert_eq!(report.balance, BalanceLabel::Imbalanced);
        assert_eq!(report.balance_score, 39.4);
        assert_eq!(report.minority_groups, 4);
        assert!(report.over_represented);
    }

    #[test]
    fn test_bias_report_on_empty_distribution() {
        let corpus = FeedbackCorpus::new(
            Distribution::new(),
            Default::default(),
            Distribution::new(),
            Vec::new(),
        )
        .unwrap();
        let report = bias_report(&corpus, &PolicyConfig::default());
        assert!(report.dominant.is_none());
        assert_eq!(report.bias_level, BiasLevel::Low);
        assert_eq!(report.balance, BalanceLabel::Balanced);
        assert_eq!(report.balance_score, 100.0);
        assert!(!report.over_represented);
    }

    #[test]
    fn test_comment_listing_combines_selection_and_options() {
        let corpus = FeedbackCorpus::sample();
        let options = ListOptions {
            sort: SortKey::Strength,
            ..Default::default()
        };
        let listing = comment_listing(
            &corpus,
            Some(&label("supportive")),
            None,
            &options,
            &PolicyConfig::default(),
        );
        let ids: Vec<_> = listing.comments.iter().map(|r| r.comment.id.as_str()).collect();
        assert_eq!(ids, vec!["comment_001", "comment_010", "comment_006"]);
        assert_eq!(listing.count, 3);
        assert_eq!(listing.stakeholder_options.len(), 7);
    }

    #[test]
    fn test_view_model_serializes_tagged() {
        let corpus = FeedbackCorpus::sample();
        let model = ViewModel::Bias(bias_report(&corpus, &PolicyConfig::default()));
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["view"], "bias");
        assert_eq!(json["data"]["bias_level"], "High");
    }
}
