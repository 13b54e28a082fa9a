//! In-memory view state machine.
//!
//! `Loading` resolves to `Unauthenticated` or `Dashboard` once the stored
//! session has been checked. Tab navigation is only possible while signed in.

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Unauthenticated,
    Dashboard,
    Upload,
    History,
}

impl View {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, View::Dashboard | View::Upload | View::History)
    }

    /// Tab label for the authenticated views.
    pub fn tab_label(&self) -> Option<&'static str> {
        match self {
            View::Dashboard => Some("Dashboard"),
            View::Upload => Some("Upload Data"),
            View::History => Some("History"),
            View::Loading | View::Unauthenticated => None,
        }
    }

    pub const TABS: [View; 3] = [View::Dashboard, View::Upload, View::History];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stored session checked at startup.
    SessionChecked { authenticated: bool },
    LoggedIn,
    LoggedOut,
    Navigate(View),
    /// An upload finished or a history row was opened.
    DatasetSelected,
}

/// Next view for `transition`, or `None` if it does not apply in `current`.
pub fn next_view(current: View, transition: Transition) -> Option<View> {
    let next = match (current, transition) {
        (View::Loading, Transition::SessionChecked { authenticated: true }) => View::Dashboard,
        (View::Loading, Transition::SessionChecked { authenticated: false }) => View::Unauthenticated,
        (View::Unauthenticated, Transition::LoggedIn) => View::Dashboard,
        (v, Transition::LoggedOut) if v.is_authenticated() => View::Unauthenticated,
        (v, Transition::Navigate(target)) if v.is_authenticated() && target.is_authenticated() => target,
        (v, Transition::DatasetSelected) if v.is_authenticated() => View::Dashboard,
        _ => return None,
    };
    Some(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRouter {
    current: View,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self { current: View::Loading }
    }
}

impl ViewRouter {
    pub fn current(&self) -> View {
        self.current
    }

    /// Apply `transition`. Returns false and leaves the view unchanged if it
    /// is not valid from the current view.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match next_view(self.current, transition) {
            Some(next) => {
                if next != self.current {
                    info!("View {:?} -> {:?}", self.current, next);
                }
                self.current = next;
                true
            }
            None => false,
        }
    }
}
