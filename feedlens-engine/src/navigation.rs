//! Navigation state: which view is active and what is selected.
//!
//! The state is a plain value. Every transition returns a new state and a
//! rejected transition leaves the old one untouched.

use std::fmt;
use std::str::FromStr;

use feedlens_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::label::Label;

/// The views a session can be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Dashboard,
    Intent,
    Thematic,
    Comments,
    Bias,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Intent => write!(f, "intent"),
            Self::Thematic => write!(f, "thematic"),
            Self::Comments => write!(f, "comments"),
            Self::Bias => write!(f, "bias"),
        }
    }
}

impl FromStr for ViewKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "intent" => Ok(Self::Intent),
            "thematic" => Ok(Self::Thematic),
            "comments" => Ok(Self::Comments),
            "bias" => Ok(Self::Bias),
            other => Err(Error::InvalidNavigation(format!("unknown view `{other}`"))),
        }
    }
}

/// A request to move to `view`, optionally selecting an intent and theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub view: ViewKind,
    #[serde(default)]
    pub intent: Option<Label>,
    #[serde(default)]
    pub theme: Option<Label>,
}

impl NavigationRequest {
    pub fn to(view: ViewKind) -> Self {
        Self {
            view,
            intent: None,
            theme: None,
        }
    }

    pub fn with_intent(mut self, intent: Label) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_theme(mut self, theme: Label) -> Self {
        self.theme = Some(theme);
        self
    }
}

/// A fully resolved screen with the parameters it needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    IntentView {
        intent: Label,
    },
    ThematicView {
        intent: Label,
        theme: Label,
    },
    CommentListView {
        intent: Option<Label>,
        theme: Option<Label>,
    },
    BiasView,
}

/// Current view plus the sticky intent and theme selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawNavigationState")]
pub struct NavigationState {
    view: ViewKind,
    selected_intent: Option<Label>,
    selected_theme: Option<Label>,
}

#[derive(Deserialize)]
struct RawNavigationState {
    #[serde(default)]
    view: ViewKind,
    #[serde(default)]
    selected_intent: Option<Label>,
    #[serde(default)]
    selected_theme: Option<Label>,
}

impl TryFrom<RawNavigationState> for NavigationState {
    type Error = Error;

    fn try_from(raw: RawNavigationState) -> Result<Self> {
        let state = Self {
            view: raw.view,
            selected_intent: raw.selected_intent,
            selected_theme: raw.selected_theme,
        };
        state.check()?;
        Ok(state)
    }
}

impl NavigationState {
    /// Initial state: the dashboard with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn selected_intent(&self) -> Option<&Label> {
        self.selected_intent.as_ref()
    }

    pub fn selected_theme(&self) -> Option<&Label> {
        self.selected_theme.as_ref()
    }

    /// Apply a navigation request.
    ///
    /// Supplied parameters replace stored ones and missing ones are kept.
    /// `Dashboard` and `Bias` clear both selections.
    pub fn navigate(&self, request: NavigationRequest) -> Result<Self> {
        let next = match request.view {
            ViewKind::Dashboard | ViewKind::Bias => Self {
                view: request.view,
                selected_intent: None,
                selected_theme: None,
            },
            view => Self {
                view,
                selected_intent: request.intent.or_else(|| self.selected_intent.clone()),
                selected_theme: request.theme.or_else(|| self.selected_theme.clone()),
            },
        };
        next.check()?;

        debug!(
            from = %self.view,
            to = %next.view,
            intent = next.selected_intent.as_ref().map(Label::as_str),
            theme = next.selected_theme.as_ref().map(Label::as_str),
            "Navigated"
        );
        Ok(next)
    }

    /// The view a back button leads to, keeping the selections.
    pub fn back(&self) -> Self {
        let view = match self.view {
            ViewKind::Comments if self.selected_theme.is_some() && self.selected_intent.is_some() => {
                ViewKind::Thematic
            }
            ViewKind::Comments if self.selected_intent.is_some() => ViewKind::Intent,
            ViewKind::Thematic => ViewKind::Intent,
            _ => ViewKind::Dashboard,
        };
        match view {
            ViewKind::Dashboard => Self::default(),
            view => Self {
                view,
                selected_intent: self.selected_intent.clone(),
                selected_theme: self.selected_theme.clone(),
            },
        }
    }

    /// Resolve the current view into a screen with its parameters.
    pub fn screen(&self) -> Screen {
        match (self.view, &self.selected_intent, &self.selected_theme) {
            (ViewKind::Intent, Some(intent), _) => Screen::IntentView {
                intent: intent.clone(),
            },
            (ViewKind::Thematic, Some(intent), Some(theme)) => Screen::ThematicView {
                intent: intent.clone(),
                theme: theme.clone(),
            },
            (ViewKind::Comments, intent, theme) => Screen::CommentListView {
                intent: intent.clone(),
                theme: theme.clone(),
            },
            (ViewKind::Bias, _, _) => Screen::BiasView,
            // Unreachable for checked states
            _ => Screen::Dashboard,
        }
    }

    fn check(&self) -> Result<()> {
        match self.view {
            ViewKind::Intent if self.selected_intent.is_none() => Err(Error::InvalidNavigation(
                "the intent view needs an intent".to_string(),
            )),
            ViewKind::Thematic if self.selected_intent.is_none() || self.selected_theme.is_none() => {
                Err(Error::InvalidNavigation(
                    "the thematic view needs an intent and a theme".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = NavigationState::new();
        assert_eq!(state.view(), ViewKind::Dashboard);
        assert_eq!(state.screen(), Screen::Dashboard);
        assert!(state.selected_intent().is_none());
    }

    #[test]
    fn test_drill_down_and_sticky_parameters() {
        let state = NavigationState::new()
            .navigate(NavigationRequest::to(ViewKind::Intent).with_intent(label("supportive")))
            .unwrap()
            .navigate(NavigationRequest::to(ViewKind::Thematic).with_theme(label("transparency")))
            .unwrap();
        assert_eq!(
            state.screen(),
            Screen::ThematicView {
                intent: label("supportive"),
                theme: label("transparency"),
            }
        );

        // New intent keeps the stored theme
        let switched = state
            .navigate(NavigationRequest::to(ViewKind::Intent).with_intent(label("objective")))
            .unwrap();
        assert_eq!(switched.selected_theme(), Some(&label("transparency")));
        assert_eq!(
            switched.screen(),
            Screen::IntentView {
                intent: label("objective")
            }
        );

        let comments = switched.navigate(NavigationRequest::to(ViewKind::Comments)).unwrap();
        assert_eq!(
            comments.screen(),
            Screen::CommentListView {
                intent: Some(label("objective")),
                theme: Some(label("transparency")),
            }
        );
    }

    #[test]
    fn test_dashboard_and_bias_clear_selections() {
        let state = NavigationState::new()
            .navigate(NavigationRequest::to(ViewKind::Intent).with_intent(label("supportive")))
            .unwrap();

        let bias = state.navigate(NavigationRequest::to(ViewKind::Bias)).unwrap();
        assert_eq!(bias.screen(), Screen::BiasView);
        assert!(bias.selected_intent().is_none());

        let home = state.navigate(NavigationRequest::to(ViewKind::Dashboard)).unwrap();
        assert_eq!(home, NavigationState::new());
    }

    #[test]
    fn test_missing_parameters_rejected() {
        let start = NavigationState::new();
        assert!(matches!(
            start.navigate(NavigationRequest::to(ViewKind::Intent)),
            Err(Error::InvalidNavigation(_))
        ));

        let intent_only = start
            .navigate(NavigationRequest::to(ViewKind::Intent).with_intent(label("supportive")))
            .unwrap();
        assert!(intent_only
            .navigate(NavigationRequest::to(ViewKind::Thematic))
            .is_err());
        assert_eq!(intent_only.view(), ViewKind::Intent);
    }

    #[test]
    fn test_comment_list_without_selection() {
        let all = NavigationState::new()
            .navigate(NavigationRequest::to(ViewKind::Comments))
            .unwrap();
        assert_eq!(
            all.screen(),
            Screen::CommentListView {
                intent: None,
                theme: None
            }
        );
        assert_eq!(all.back(), NavigationState::new());
    }

    #[test]
    fn test_back_walks_up() {
        let comments = NavigationState::new()
            .navigate(
                NavigationRequest::to(ViewKind::Comments)
                    .with_intent(label("supportive"))
                    .with_theme(label("transparency")),
            )
            .unwrap();

        let thematic = comments.back();
        assert_eq!(thematic.view(), ViewKind::Thematic);
        let intent = thematic.back();
        assert_eq!(intent.view(), ViewKind::Intent);
        assert_eq!(intent.selected_intent(), Some(&label("supportive")));
        assert_eq!(intent.back().view(), ViewKind::Dashboard);
        assert_eq!(NavigationState::new().back(), NavigationState::new());
    }

    #[test]
    fn test_serde_round_trip_and_validation() {
        let state = NavigationState::new()
            .navigate(NavigationRequest::to(ViewKind::Intent).with_intent(label("legal concern")))
            .unwrap();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"view\":\"intent\""));
        let parsed: NavigationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);

        let inconsistent = r#"{ "view": "thematic", "selected_intent": "supportive" }"#;
        assert!(serde_json::from_str::<NavigationState>(inconsistent).is_err());
    }

    #[test]
    fn test_view_kind_parsing() {
        assert_eq!("Bias".parse::<ViewKind>().unwrap(), ViewKind::Bias);
        assert!("settings".parse::<ViewKind>().is_err());
        assert_eq!(ViewKind::Comments.to_string(), "comments");
    }
}
