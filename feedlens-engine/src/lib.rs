//! FeedLens Engine - analytics over categorized public-comment feedback.
//!
//! This crate provides:
//! - The immutable corpus store (distribution tables and comments)
//! - Aggregation: totals, percentage breakdowns, dominance, bias classification
//! - Comment filtering and sorting
//! - CSV export
//! - Navigation state and the view models each screen displays
//!
//! # Example
//!
//! ```
//! use feedlens_engine::{FeedbackCorpus, FeedbackEngine, NavigationState, ViewModel};
//! use feedlens_engine::views::ListOptions;
//!
//! let engine = FeedbackEngine::new(FeedbackCorpus::sample());
//! let view = engine.render(&NavigationState::new(), &ListOptions::default());
//! assert!(matches!(view, ViewModel::Dashboard(_)));
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod aggregate;
pub mod consistency;
pub mod corpus;
pub mod engine;
pub mod export;
pub mod label;
pub mod navigation;
pub mod query;
mod sample;
pub mod views;

pub use aggregate::{
    balance_label, bias_level, dominant_entry, minority_group_count, percentage_breakdown,
    total_of, BalanceLabel, BiasLevel, Dominant, Share, StrengthTier,
};
pub use consistency::{cluster_consistency, ClusterMismatch};
pub use corpus::{Comment, FeedbackCorpus};
pub use engine::{ExportBlob, FeedbackEngine};
pub use export::{export_file_name, to_delimited_text, EXPORT_HEADER};
pub use label::{Distribution, Label, LabelMap, ThematicClusters};
pub use navigation::{NavigationRequest, NavigationState, Screen, ViewKind};
pub use query::{distinct_stakeholders, filter_comments, sort_comments, FilterCriteria, SortKey, StakeholderFilter};
pub use views::ViewModel;
