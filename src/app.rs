use crate::route::Route;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Notification, Screen};
use crate::state::messages::{Action, NetworkRequest, Outcome, Ticket};
use liga_api::EntityKind;
use log::{debug, error, info};
use std::time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Teams,
    Players,
    Matches,
}

impl MenuItem {
    pub fn entity(self) -> EntityKind {
        match self {
            MenuItem::Teams => EntityKind::Team,
            MenuItem::Players => EntityKind::Player,
            MenuItem::Matches => EntityKind::Match,
        }
    }

    pub fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Team => MenuItem::Teams,
            EntityKind::Player => MenuItem::Players,
            EntityKind::Match => MenuItem::Matches,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        log::set_max_level(settings.log_level);
        tui_logger::set_default_level(settings.log_level);

        Self { state: AppState::new(), settings }
    }

    pub fn active_tab(&self) -> MenuItem {
        MenuItem::for_entity(self.state.route.entity())
    }

    // -----------------------------------------------------------------------
    // Navigation: every route change builds a fresh controller
    // -----------------------------------------------------------------------

    /// Opens `route` and returns the requests its controller needs.
    pub fn navigate(&mut self, route: Route) -> Vec<NetworkRequest> {
        info!("navigating to {route}");
        self.state.ticket += 1;
        self.state.route = route;
        self.state.screen = Screen::for_route(route);
        self.state.show_help = false;
        let actions = self.state.screen.activate();
        self.dispatch(actions)
    }

    pub fn reload(&mut self) -> Vec<NetworkRequest> {
        self.navigate(self.state.route)
    }

    /// Executes controller actions. Navigation replaces the screen, so
    /// anything queued after it belongs to the new view.
    pub fn dispatch(&mut self, actions: Vec<Action>) -> Vec<NetworkRequest> {
        let mut requests = Vec::new();
        for action in actions {
            match action {
                Action::Request(operation) => requests.push(NetworkRequest {
                    ticket: self.state.ticket,
                    operation,
                }),
                Action::Notify(notification) => self.notify(notification),
                Action::Navigate(route) => requests.extend(self.navigate(route)),
            }
        }
        requests
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_network_completed(&mut self, ticket: Ticket, outcome: Outcome) -> Vec<NetworkRequest> {
        if ticket != self.state.ticket {
            // The view that asked is gone; its continuation has nothing to update.
            debug!("dropping stale completion (ticket {ticket}, current {})", self.state.ticket);
            return Vec::new();
        }
        let actions = self.state.screen.on_outcome(outcome);
        self.dispatch(actions)
    }

    pub fn notify(&mut self, notification: Notification) {
        self.state.notifications.show(notification, Instant::now());
    }

    /// Returns true when the screen needs a redraw.
    pub fn on_tick(&mut self) -> bool {
        self.state.notifications.expire(Instant::now())
    }

    // -----------------------------------------------------------------------
    // Global toggles
    // -----------------------------------------------------------------------

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
        if let Err(e) = self.settings.save() {
            error!("could not persist settings: {e:#}");
        }
    }

    // -----------------------------------------------------------------------
    // List screen
    // -----------------------------------------------------------------------

    pub fn open_create(&mut self) -> Vec<NetworkRequest> {
        let kind = self.state.route.entity();
        self.navigate(Route::New(kind))
    }

    pub fn open_edit_selected(&mut self) -> Vec<NetworkRequest> {
        let Some(list) = self.state.screen.list() else {
            return Vec::new();
        };
        match list.selected_id() {
            Some(id) => {
                let kind = list.entity();
                self.navigate(Route::Edit(kind, id))
            }
            None => Vec::new(),
        }
    }

    pub fn answer_confirmation(&mut self, confirmed: bool) -> Vec<NetworkRequest> {
        let actions = match self.state.screen.list_mut() {
            Some(list) => list.answer_confirmation(confirmed),
            None => Vec::new(),
        };
        self.dispatch(actions)
    }

    // -----------------------------------------------------------------------
    // Form screen
    // -----------------------------------------------------------------------

    pub fn submit_form(&mut self) -> Vec<NetworkRequest> {
        let actions = match self.state.screen.form_mut() {
            Some(form) => form.submit(),
            None => Vec::new(),
        };
        self.dispatch(actions)
    }

    pub fn cancel_form(&mut self) -> Vec<NetworkRequest> {
        let actions = match self.state.screen.form_mut() {
            Some(form) => form.cancel(),
            None => Vec::new(),
        };
        self.dispatch(actions)
    }
}
