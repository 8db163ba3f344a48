//! Query engine: filter and rank comment subsets.
//!
//! Filtering keeps storage order; sorting is always stable and always
//! produces a new ordering, never touching its input.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use feedlens_common::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::corpus::{Comment, FeedbackCorpus};
use crate::label::Label;

// ============================================================================
// Stakeholder Filter
// ============================================================================

/// Sentinel text meaning "every stakeholder".
pub const ALL_STAKEHOLDERS: &str = "all";

/// Stakeholder criterion: the `all` sentinel or one exact label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StakeholderFilter {
    #[default]
    All,
    Only(Label),
}

impl StakeholderFilter {
    pub fn matches(&self, stakeholder: &Label) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => label == stakeholder,
        }
    }

    fn matches_only(&self, stakeholder: &Label) -> bool {
        matches!(self, Self::Only(label) if label == stakeholder)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_STAKEHOLDERS,
            Self::Only(label) => label.as_str(),
        }
    }
}

impl fmt::Display for StakeholderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakeholderFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ALL_STAKEHOLDERS {
            Ok(Self::All)
        } else {
            Label::new(s).map(Self::Only)
        }
    }
}

impl From<Label> for StakeholderFilter {
    fn from(label: Label) -> Self {
        Self::Only(label)
    }
}

impl Serialize for StakeholderFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StakeholderFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Filter Criteria
// ============================================================================

/// Conjunction of optional comment criteria. Absent criteria never exclude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub intent: Option<Label>,
    #[serde(default)]
    pub theme: Option<Label>,
    #[serde(default)]
    pub stakeholder: StakeholderFilter,
    /// Case-insensitive substring of the summary or of any keyword
    #[serde(default)]
    pub search_term: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, intent: Label) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_theme(mut self, theme: Label) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_stakeholder(mut self, stakeholder: StakeholderFilter) -> Self {
        self.stakeholder = stakeholder;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Lower-cased search needle; only an empty term counts as no term.
    fn needle(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether every active criterion matches `comment`.
    pub fn matches(&self, comment: &Comment) -> bool {
        self.matches_with(comment, self.needle().as_deref())
    }

    fn matches_with(&self, comment: &Comment, needle: Option<&str>) -> bool {
        let intent_ok = self.intent.as_ref().map_or(true, |i| *i == comment.intent);
        let theme_ok = self.theme.as_ref().map_or(true, |t| *t == comment.theme);
        let stakeholder_ok = self.stakeholder.matches(&comment.stakeholder);
        let search_ok = needle.map_or(true, |n| {
            comment.summary.to_lowercase().contains(n)
                || comment.keywords.iter().any(|k| k.to_lowercase().contains(n))
        });

        intent_ok && theme_ok && stakeholder_ok && search_ok
    }
}

/// Comments of the corpus matching `criteria`, in storage order.
pub fn filter_comments<'a>(corpus: &'a FeedbackCorpus, criteria: &FilterCriteria) -> Vec<&'a Comment> {
    filter_slice(corpus.comments(), criteria)
}

/// Filter any sequence of comments, keeping its order.
pub fn filter_slice<'a, I>(comments: I, criteria: &FilterCriteria) -> Vec<&'a Comment>
where
    I: IntoIterator<Item = &'a Comment>,
{
    let needle = criteria.needle();
    comments
        .into_iter()
        .filter(|c| criteria.matches_with(c, needle.as_deref()))
        .collect()
}

// ============================================================================
// Sorting
// ============================================================================

/// Ordering of a comment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest strength score first
    #[default]
    Strength,
    /// Stakeholder label, A to Z
    Stakeholder,
    /// Most recent first (best effort, see [`recency_key`])
    Recent,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Stakeholder => write!(f, "stakeholder"),
            Self::Recent => write!(f, "recent"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Ok(Self::Strength),
            "stakeholder" => Ok(Self::Stakeholder),
            "recent" => Ok(Self::Recent),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// A new, stably sorted ordering of `comments`.
pub fn sort_comments<'a>(comments: &[&'a Comment], key: SortKey) -> Vec<&'a Comment> {
    let mut sorted = comments.to_vec();
    match key {
        SortKey::Strength => {
            sorted.sort_by(|a, b| b.strength_score.total_cmp(&a.strength_score));
        }
        SortKey::Stakeholder => {
            sorted.sort_by(|a, b| collate(a.stakeholder.as_str(), b.stakeholder.as_str()));
        }
        SortKey::Recent => {
            sorted.sort_by(|a, b| recency_key(b).cmp(&recency_key(a)));
        }
    }
    sorted
}

/// Locale-style text comparison: case-insensitive first, and on a
/// case-only difference lowercase sorts before uppercase.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Recency of a comment, larger is more recent.
///
/// Identifiers are not timestamps. In the sample corpus they are zero-padded
/// sequence strings (`comment_007`), so the trailing number is only an
/// ordinal proxy for submission order. A real `submitted_at` always outranks
/// that proxy; comments with neither sort last.
pub fn recency_key(comment: &Comment) -> (Option<DateTime<Utc>>, Option<u64>) {
    (comment.submitted_at, id_ordinal(&comment.id))
}

/// Trailing decimal run of an identifier (`comment_007` → 7).
pub fn id_ordinal(id: &str) -> Option<u64> {
    let digits = id.len() - id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    id[id.len() - digits..].parse().ok()
}

/// The `all` sentinel followed by every stakeholder label found in the
/// comments, in first-seen order.
pub fn distinct_stakeholders(corpus: &FeedbackCorpus) -> Vec<StakeholderFilter> {
    let mut options = vec![StakeholderFilter::All];
    for comment in corpus.comments() {
        if !options.iter().any(|o| o.matches_only(&comment.stakeholder)) {
            options.push(StakeholderFilter::Only(comment.stakeholder.clone()));
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ids(comments: &[&Comment]) -> Vec<String> {
        comments.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_no_criteria_returns_everything_in_order() {
        let corpus = FeedbackCorpus::sample();
        let all = filter_comments(&corpus, &FilterCriteria::default());
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].id, "comment_001");
        assert_eq!(all[9].id, "comment_010");
    }

    #[test]
    fn test_stakeholder_filter_then_strength_sort() {
        let corpus = FeedbackCorpus::sample();
        let criteria = FilterCriteria::new()
            .with_stakeholder("stock exchange".parse().unwrap());

        let filtered = filter_comments(&corpus, &criteria);
        assert_eq!(ids(&filtered), vec!["comment_001", "comment_007"]);

        let sorted = sort_comments(&filtered, SortKey::Strength);
        assert_eq!(ids(&sorted), vec!["comment_001", "comment_007"]);
        assert!(sorted[0].strength_score > sorted[1].strength_score);
    }

    #[test]
    fn test_search_is_case_insensitive_over_summary_and_keywords() {
        let corpus = FeedbackCorpus::sample();

        // Only in comment_004's keywords ("SME impact")
        let by_keyword = filter_comments(&corpus, &FilterCriteria::new().with_search("sme"));
        assert_eq!(ids(&by_keyword), vec!["comment_004"]);

        // Summary text, different case
        let by_summary =
            filter_comments(&corpus, &FilterCriteria::new().with_search("NATURAL JUSTICE"));
        assert_eq!(ids(&by_summary), vec!["comment_008"]);
    }

    #[test]
    fn test_empty_search_is_ignored() {
        let corpus = FeedbackCorpus::sample();
        let criteria = FilterCriteria::new().with_search("");
        assert_eq!(filter_comments(&corpus, &criteria).len(), 10);
    }

    #[test]
    fn test_whitespace_search_is_a_real_term() {
        let corpus = FeedbackCorpus::sample();

        // Every summary contains a single space
        let one = filter_comments(&corpus, &FilterCriteria::new().with_search(" "));
        assert_eq!(one.len(), 10);

        // No summary or keyword contains three spaces in a row
        let three = filter_comments(&corpus, &FilterCriteria::new().with_search("   "));
        assert!(three.is_empty());
    }

    #[test]
    fn test_criteria_are_anded() {
        let corpus = FeedbackCorpus::sample();
        let criteria = FilterCriteria::new()
            .with_intent(Label::new("supportive").unwrap())
            .with_search("transparency");
        assert_eq!(ids(&filter_comments(&corpus, &criteria)), vec!["comment_006"]);

        let with_theme = FilterCriteria::new()
            .with_intent(Label::new("supportive").unwrap())
            .with_theme(Label::new("administrative burden").unwrap());
        assert_eq!(ids(&filter_comments(&corpus, &with_theme)), vec!["comment_010"]);
    }

    #[test]
    fn test_unknown_label_yields_empty() {
        let corpus = FeedbackCorpus::sample();
        let criteria = FilterCriteria::new().with_intent(Label::new("praise").unwrap());
        assert!(filter_comments(&corpus, &criteria).is_empty());
    }

    #[test]
    fn test_stakeholder_sort_is_alphabetical_and_stable() {
        let corpus = FeedbackCorpus::sample();
        let all = filter_comments(&corpus, &FilterCriteria::default());
        let sorted = sort_comments(&all, SortKey::Stakeholder);

        let stakeholders: Vec<_> = sorted.iter().map(|c| c.stakeholder.as_str()).collect();
        assert_eq!(stakeholders[0], "consulting firm");
        assert_eq!(stakeholders[9], "stock exchange");

        // Two individual investors keep their storage order
        let investors: Vec<_> = sorted
            .iter()
            .filter(|c| c.stakeholder == "individual investor")
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(investors, vec!["comment_005", "comment_009"]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let corpus = FeedbackCorpus::sample();
        let all = filter_comments(&corpus, &FilterCriteria::default());
        let before = ids(&all);
        let _ = sort_comments(&all, SortKey::Strength);
        assert_eq!(ids(&all), before);
    }

    #[test]
    fn test_recent_uses_id_ordinal() {
        let corpus = FeedbackCorpus::sample();
        let all = filter_comments(&corpus, &FilterCriteria::default());
        let sorted = sort_comments(&all, SortKey::Recent);
        assert_eq!(sorted[0].id, "comment_010");
        assert_eq!(sorted[9].id, "comment_001");
    }

    #[test]
    fn test_recent_prefers_real_timestamps() {
        let stamped = Comment::new("late", "objective", "transparency", "ngo", "x", 5.0)
            .unwrap()
            .with_submitted_at(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        let numbered = Comment::new("c_900", "objective", "transparency", "ngo", "y", 5.0).unwrap();
        let bare = Comment::new("zeta", "objective", "transparency", "ngo", "z", 5.0).unwrap();

        let list = vec![&bare, &numbered, &stamped];
        let sorted = sort_comments(&list, SortKey::Recent);
        assert_eq!(ids(&sorted), vec!["late", "c_900", "zeta"]);
    }

    #[test]
    fn test_id_ordinal() {
        assert_eq!(id_ordinal("comment_007"), Some(7));
        assert_eq!(id_ordinal("42"), Some(42));
        assert_eq!(id_ordinal("comment_x"), None);
        assert_eq!(id_ordinal(""), None);
        assert_eq!(id_ordinal("c99999999999999999999999"), None);
    }

    #[test]
    fn test_collate_case() {
        assert_eq!(collate("ngo", "NGO"), Ordering::Less);
        assert_eq!(collate("Bank", "agency"), Ordering::Greater);
        assert_eq!(collate("ngo", "ngo"), Ordering::Equal);
    }

    #[test]
    fn test_distinct_stakeholders() {
        let corpus = FeedbackCorpus::sample();
        let options: Vec<_> = distinct_stakeholders(&corpus)
            .iter()
            .map(|o| o.to_string())
            .collect();
        assert_eq!(
            options,
            vec![
                "all",
                "stock exchange",
                "profitable organization",
                "regulatory body",
                "consulting firm",
                "individual investor",
                "ngo",
            ]
        );
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("strength".parse::<SortKey>().unwrap(), SortKey::Strength);
        assert_eq!("Recent".parse::<SortKey>().unwrap(), SortKey::Recent);
        assert!("newest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Stakeholder.to_string(), "stakeholder");
    }

    #[test]
    fn test_stakeholder_filter_serde() {
        let all: StakeholderFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, StakeholderFilter::All);
        let one: StakeholderFilter = serde_json::from_str("\"ngo\"").unwrap();
        assert_eq!(serde_json::to_string(&one).unwrap(), "\"ngo\"");
        assert!(serde_json::from_str::<StakeholderFilter>("\"\"").is_err());
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        let intents = prop::option::of(prop::sample::select(vec![
            "supportive",
            "objective",
            "legal concern",
            "praise",
        ]));
        let stakeholders = prop::sample::select(vec!["all", "ngo", "stock exchange", "individual investor"]);
        let terms = prop::option::of(prop::sample::select(vec!["", "market", "SYSTEM", "zzz", "protection"]));
        (intents, stakeholders, terms).prop_map(|(intent, stakeholder, term)| FilterCriteria {
            intent: intent.map(|i| Label::new(i).unwrap()),
            theme: None,
            stakeholder: stakeholder.parse().unwrap(),
            search_term: term.map(str::to_string),
        })
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(criteria in arb_criteria()) {
            let corpus = FeedbackCorpus::sample();
            let once = filter_comments(&corpus, &criteria);
            let twice = filter_slice(once.iter().copied(), &criteria);
            prop_assert_eq!(ids(&once), ids(&twice));
        }

        #[test]
        fn prop_sort_is_stable(
            picks in prop::collection::vec(0usize..10, 0..20),
            key in prop::sample::select(vec![SortKey::Strength, SortKey::Stakeholder, SortKey::Recent]),
        ) {
            let corpus = FeedbackCorpus::sample();
            let input: Vec<&Comment> = picks.iter().map(|i| &corpus.comments()[*i]).collect();
            let positions: Vec<(usize, &Comment)> = input.iter().copied().enumerate().collect();

            let sorted = sort_comments(&input, key);
            prop_assert_eq!(sorted.len(), input.len());

            // Equal keys keep input order: walk the sorted list and check
            // that ties appear with increasing input positions.
            let mut used = vec![false; input.len()];
            let mut order = Vec::with_capacity(sorted.len());
            for c in &sorted {
                let pos = positions
                    .iter()
                    .find(|(p, other)| !used[*p] && std::ptr::eq(*other, *c))
                    .map(|(p, _)| *p)
                    .unwrap();
                used[pos] = true;
                order.push(pos);
            }
            for pair in order.windows(2) {
                let (a, b) = (input[pair[0]], input[pair[1]]);
                let tied = match key {
                    SortKey::Strength => a.strength_score == b.strength_score,
                    SortKey::Stakeholder => a.stakeholder == b.stakeholder,
                    SortKey::Recent => recency_key(a) == recency_key(b),
                };
                if tied {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }
    }
}
