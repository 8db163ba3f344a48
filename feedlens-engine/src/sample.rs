//! Built-in sample corpus: a securities-regulation consultation with five
//! intents, five themes per intent, six stakeholder types and ten comments.

use crate::corpus::{Comment, FeedbackCorpus};
use crate::label::{Distribution, Label, ThematicClusters};

fn table(pairs: &[(&'static str, u64)]) -> Distribution {
    pairs
        .iter()
        .map(|(label, count)| (Label::from_static(*label), *count))
        .collect()
}

fn comment(
    id: &'static str,
    labels: [&'static str; 3],
    summary: &'static str,
    keywords: [&'static str; 5],
    strength_score: f64,
) -> Comment {
    let [intent, theme, stakeholder] = labels;
    Comment {
        id: id.to_string(),
        intent: Label::from_static(intent),
        theme: Label::from_static(theme),
        stakeholder: Label::from_static(stakeholder),
        summary: summary.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        strength_score,
        submitted_at: None,
    }
}

impl FeedbackCorpus {
    /// The built-in sample corpus.
    pub fn sample() -> Self {
        let intent_distribution = table(&[
            ("supportive", 2000),
            ("objective", 1000),
            ("request for clarification", 2000),
            ("suggestion for modification", 500),
            ("legal concern", 1000),
        ]);

        let thematic_clusters: ThematicClusters = [
            (
                "supportive",
                table(&[
                    ("compliance cost", 500),
                    ("transparency", 450),
                    ("investor protection", 400),
                    ("administrative burden", 350),
                    ("market efficiency", 300),
                ]),
            ),
            (
                "objective",
                table(&[
                    ("transparency", 300),
                    ("compliance cost", 250),
                    ("administrative burden", 200),
                    ("investor protection", 150),
                    ("market efficiency", 100),
                ]),
            ),
            (
                "request for clarification",
                table(&[
                    ("compliance cost", 600),
                    ("administrative burden", 500),
                    ("transparency", 400),
                    ("investor protection", 300),
                    ("market efficiency", 200),
                ]),
            ),
            (
                "suggestion for modification",
                table(&[
                    ("administrative burden", 150),
                    ("compliance cost", 125),
                    ("transparency", 100),
                    ("investor protection", 75),
                    ("market efficiency", 50),
                ]),
            ),
            (
                "legal concern",
                table(&[
                    ("compliance cost", 300),
                    ("investor protection", 250),
                    ("transparency", 200),
                    ("administrative burden", 150),
                    ("market efficiency", 100),
                ]),
            ),
        ]
        .into_iter()
        .map(|(intent, themes)| (Label::from_static(intent), themes))
        .collect();

        let stakeholder_distribution = table(&[
            ("stock exchange", 4200),
            ("profitable organization", 1260),
            ("ngo", 315),
            ("individual investor", 630),
            ("regulatory body", 210),
            ("consulting firm", 315),
        ]);

        let comments = vec![
            comment(
                "comment_001",
                ["supportive", "compliance cost", "stock exchange"],
                "The proposed amendment provides a clear framework for compliance that will reduce operational costs by standardizing processes across exchanges. The phased implementation approach allows for smooth transition while maintaining market integrity.",
                ["compliance framework", "operational costs", "standardization", "phased implementation", "market integrity"],
                9.2,
            ),
            comment(
                "comment_002",
                ["objective", "transparency", "profitable organization"],
                "While the transparency requirements are comprehensive, the timeline for implementation may need adjustment to allow adequate system upgrades. The disclosure formats should align with international standards.",
                ["transparency requirements", "implementation timeline", "system upgrades", "disclosure formats", "international standards"],
                7.8,
            ),
            comment(
                "comment_003",
                ["legal concern", "investor protection", "regulatory body"],
                "The amendment may conflict with existing securities regulations regarding investor protection measures. Specific provisions need clarification to avoid regulatory overlap and ensure consistent enforcement.",
                ["securities regulations", "investor protection", "regulatory overlap", "enforcement consistency", "legal conflicts"],
                8.9,
            ),
            comment(
                "comment_004",
                ["request for clarification", "administrative burden", "consulting firm"],
                "The definition of \"material changes\" requires further clarification as it impacts reporting obligations. Small and medium enterprises may face disproportionate administrative burden without clear guidelines.",
                ["material changes", "reporting obligations", "SME impact", "administrative burden", "clear guidelines"],
                7.5,
            ),
            comment(
                "comment_005",
                ["suggestion for modification", "compliance cost", "individual investor"],
                "Suggest implementing a tiered compliance structure based on company size to reduce costs for smaller entities while maintaining robust oversight for larger corporations.",
                ["tiered compliance", "company size", "cost reduction", "smaller entities", "corporate oversight"],
                6.8,
            ),
            comment(
                "comment_006",
                ["supportive", "transparency", "ngo"],
                "The enhanced transparency requirements will significantly improve market confidence and enable better monitoring of corporate activities. This aligns with global best practices in corporate governance.",
                ["transparency requirements", "market confidence", "corporate monitoring", "global best practices", "corporate governance"],
                8.1,
            ),
            comment(
                "comment_007",
                ["objective", "market efficiency", "stock exchange"],
                "The proposed changes may impact trading volumes initially but should improve market efficiency in the long term. Real-time monitoring systems will need substantial upgrades.",
                ["trading volumes", "market efficiency", "long-term impact", "real-time monitoring", "system upgrades"],
                7.3,
            ),
            comment(
                "comment_008",
                ["legal concern", "compliance cost", "profitable organization"],
                "The retrospective application of certain provisions may violate principles of natural justice and impose unfair financial burden on companies that complied with previous regulations.",
                ["retrospective application", "natural justice", "financial burden", "previous regulations", "unfair impact"],
                9.0,
            ),
            comment(
                "comment_009",
                ["request for clarification", "investor protection", "individual investor"],
                "How will the new investor protection measures affect existing investment products? Clarity needed on grandfathering provisions and transition arrangements.",
                ["investor protection measures", "investment products", "grandfathering provisions", "transition arrangements", "existing products"],
                6.5,
            ),
            comment(
                "comment_010",
                ["supportive", "administrative burden", "regulatory body"],
                "The streamlined reporting mechanism will reduce administrative burden while improving data quality and regulatory oversight capabilities. Electronic filing systems should be standardized.",
                ["streamlined reporting", "administrative burden", "data quality", "regulatory oversight", "electronic filing"],
                8.4,
            ),
        ];

        Self::from_parts(
            intent_distribution,
            thematic_clusters,
            stakeholder_distribution,
            comments,
        )
    }
}
