//! Feedback engine.
//!
//! The entry point a presentation layer talks to: owns the shared corpus and
//! the policy, resolves navigation states into view models and produces
//! exports.

use std::sync::Arc;

use feedlens_common::config::DEFAULT_EXPORT_PREFIX;
use feedlens_common::{Config, Error, PolicyConfig, Result, ResultExt, Validate};
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::FeedbackCorpus;
use crate::export::{export_file_name, to_delimited_text};
use crate::label::Label;
use crate::navigation::{NavigationState, Screen};
use crate::views::{
    bias_report, comment_listing, dashboard_summary, intent_summary, list_comments,
    thematic_summary, BiasReport, CommentListing, DashboardSummary, IntentSummary, ListOptions,
    ThematicSummary, ViewModel,
};

/// A finished export: suggested file name and CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportBlob {
    pub file_name: String,
    pub content: String,
}

/// Read-only analytics over one corpus.
///
/// Cloning is cheap; clones share the corpus.
#[derive(Debug, Clone)]
pub struct FeedbackEngine {
    corpus: Arc<FeedbackCorpus>,
    policy: PolicyConfig,
    export_prefix: String,
}

impl FeedbackEngine {
    /// Create an engine with the default policy.
    pub fn new(corpus: FeedbackCorpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
            policy: PolicyConfig::default(),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    /// Build from configuration: validated policy, export prefix, and the
    /// configured corpus file or the built-in sample.
    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        let corpus = match &config.corpus.path {
            Some(path) => FeedbackCorpus::from_path(path).context("Failed to build engine")?,
            None => {
                info!("No corpus path configured, using the built-in sample");
                FeedbackCorpus::sample()
            }
        };

        Ok(Self::new(corpus)
            .with_policy(config.policy.clone())
            .with_export_prefix(config.export.file_prefix.clone()))
    }

    pub fn corpus(&self) -> &FeedbackCorpus {
        &self.corpus
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn dashboard(&self) -> DashboardSummary {
        dashboard_summary(&self.corpus, &self.policy)
    }

    pub fn intent_view(&self, intent: &Label) -> IntentSummary {
        intent_summary(&self.corpus, intent)
    }

    pub fn thematic_view(&self, intent: &Label, theme: &Label) -> ThematicSummary {
        thematic_summary(&self.corpus, intent, theme, &self.policy)
    }

    pub fn comment_list(
        &self,
        intent: Option<&Label>,
        theme: Option<&Label>,
        options: &ListOptions,
    ) -> CommentListing {
        comment_listing(&self.corpus, intent, theme, options, &self.policy)
    }

    pub fn bias_report(&self) -> BiasReport {
        bias_report(&self.corpus, &self.policy)
    }

    /// Resolve a navigation state into the model of its screen.
    ///
    /// `options` only affect the comment list.
    pub fn render(&self, state: &NavigationState, options: &ListOptions) -> ViewModel {
        let screen = state.screen();
        debug!(view = %state.view(), "Rendering view");

        match screen {
            Screen::Dashboard => ViewModel::Dashboard(self.dashboard()),
            Screen::IntentView { intent } => ViewModel::Intent(self.intent_view(&intent)),
            Screen::ThematicView { intent, theme } => {
                ViewModel::Thematic(self.thematic_view(&intent, &theme))
            }
            Screen::CommentListView { intent, theme } => ViewModel::Comments(self.comment_list(
                intent.as_ref(),
                theme.as_ref(),
                options,
            )),
            Screen::BiasView => ViewModel::Bias(self.bias_report()),
        }
    }

    /// Export the comment list the state and options select.
    pub fn export(&self, state: &NavigationState, options: &ListOptions) -> Result<ExportBlob> {
        let intent = state.selected_intent();
        let theme = state.selected_theme();
        let comments = list_comments(&self.corpus, intent, theme, options);

        let content = to_delimited_text(comments.iter().copied())?;
        let file_name = export_file_name(&self.export_prefix, intent, theme);
        info!(file = %file_name, rows = comments.len(), "Export ready");

        Ok(ExportBlob { file_name, content })
    }
}
