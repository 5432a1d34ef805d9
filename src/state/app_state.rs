use crate::route::Route;
use crate::state::form::{FormController, FormMode};
use crate::state::list::ListController;
use crate::state::messages::{Action, Outcome, Ticket};
use crate::state::view::{FormView, ListView, View};
use liga_api::{EntityKind, Match, Player, Team};
use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }
}

#[derive(Debug, Default)]
pub struct NotificationState {
    current: Option<(Notification, Instant)>,
}

impl NotificationState {
    /// A newer notification replaces the one on screen.
    pub fn show(&mut self, notification: Notification, now: Instant) {
        self.current = Some((notification, now + NOTIFICATION_TTL));
    }

    /// Drops the notification once expired. Returns true when something changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, deadline)) if *deadline <= now => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(n, _)| n)
    }
}

// ---------------------------------------------------------------------------
// Active screen
// ---------------------------------------------------------------------------

pub enum Screen {
    TeamList(ListController<Team>),
    PlayerList(ListController<Player>),
    MatchList(ListController<Match>),
    TeamForm(FormController<Team>),
    PlayerForm(FormController<Player>),
    MatchForm(FormController<Match>),
}

impl Screen {
    /// Builds a fresh controller for `route`. Nothing carries over from the
    /// previous screen.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::List(EntityKind::Team) => Screen::TeamList(ListController::new()),
            Route::List(EntityKind::Player) => Screen::PlayerList(ListController::new()),
            Route::List(EntityKind::Match) => Screen::MatchList(ListController::new()),
            Route::New(kind) => Self::form(kind, FormMode::Create),
            Route::Edit(kind, id) => Self::form(kind, FormMode::Edit(id)),
        }
    }

    fn form(kind: EntityKind, mode: FormMode) -> Self {
        match kind {
            EntityKind::Team => Screen::TeamForm(FormController::new(mode)),
            EntityKind::Player => Screen::PlayerForm(FormController::new(mode)),
            EntityKind::Match => Screen::MatchForm(FormController::new(mode)),
        }
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        match self {
            Screen::TeamList(c) => c,
            Screen::PlayerList(c) => c,
            Screen::MatchList(c) => c,
            Screen::TeamForm(c) => c,
            Screen::PlayerForm(c) => c,
            Screen::MatchForm(c) => c,
        }
    }

    pub fn list(&self) -> Option<&dyn ListView> {
        match self {
            Screen::TeamList(c) => Some(c),
            Screen::PlayerList(c) => Some(c),
            Screen::MatchList(c) => Some(c),
            _ => None,
        }
    }

    pub fn list_mut(&mut self) -> Option<&mut dyn ListView> {
        match self {
            Screen::TeamList(c) => Some(c),
            Screen::PlayerList(c) => Some(c),
            Screen::MatchList(c) => Some(c),
            _ => None,
        }
    }

    pub fn form_view(&self) -> Option<&dyn FormView> {
        match self {
            Screen::TeamForm(c) => Some(c),
            Screen::PlayerForm(c) => Some(c),
            Screen::MatchForm(c) => Some(c),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut dyn FormView> {
        match self {
            Screen::TeamForm(c) => Some(c),
            Screen::PlayerForm(c) => Some(c),
            Screen::MatchForm(c) => Some(c),
            _ => None,
        }
    }

    pub fn activate(&mut self) -> Vec<Action> {
        self.view_mut().activate()
    }

    pub fn on_outcome(&mut self, outcome: Outcome) -> Vec<Action> {
        self.view_mut().on_outcome(outcome)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub route: Route,
    pub screen: Screen,
    /// Bumped on every navigation; stamps outgoing requests.
    pub ticket: Ticket,
    pub show_help: bool,
    pub show_logs: bool,
    pub notifications: NotificationState,
}

impl Default for AppState {
    fn default() -> Self {
        let route = Route::default();
        Self {
            route,
            screen: Screen::for_route(route),
            ticket: 0,
            show_help: false,
            show_logs: false,
            notifications: NotificationState::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_expires_after_ttl() {
        let mut state = NotificationState::default();
        let t0 = Instant::now();
        state.show(Notification::success("Team created"), t0);
        assert!(!state.expire(t0 + Duration::from_secs(1)));
        assert_eq!(state.current().map(|n| n.message.as_str()), Some("Team created"));
        assert!(state.expire(t0 + NOTIFICATION_TTL));
        assert!(state.current().is_none());
    }

    #[test]
    fn newer_notification_replaces_older() {
        let mut state = NotificationState::default();
        let t0 = Instant::now();
        state.show(Notification::success("first"), t0);
        state.show(Notification::error("second"), t0);
        assert_eq!(state.current().map(|n| n.level), Some(Level::Error));
    }

    #[test]
    fn routes_map_to_matching_screens() {
        assert!(matches!(Screen::for_route(Route::List(EntityKind::Match)), Screen::MatchList(_)));
        assert!(matches!(
            Screen::for_route(Route::Edit(EntityKind::Player, 2)),
            Screen::PlayerForm(ref f) if f.mode == FormMode::Edit(2)
        ));
        assert!(Screen::for_route(Route::New(EntityKind::Team)).form_view().is_some());
        assert!(Screen::for_route(Route::New(EntityKind::Team)).list().is_none());
    }
}
