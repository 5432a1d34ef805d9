use crate::state::app_state::Notification;
use crate::state::confirm::ConfirmDialog;
use crate::state::entities::Schema;
use crate::state::messages::{Action, Operation, OperationKind, Outcome};
use crate::state::view::{ListView, View};
use liga_api::{Entity, EntityKind, Record, RecordId, Team};
use log::{debug, warn};

/// Linear scan of a loaded team collection. A missing id resolves to the
/// placeholder instead of failing.
pub fn team_name<'a>(teams: &'a [Team], id: RecordId, placeholder: &'a str) -> &'a str {
    teams
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.name.as_str())
        .unwrap_or(placeholder)
}

/// Loading lifecycle of one collection plus the team collection its rows
/// refer to. Teams are fetched first; the primary fetch is only issued once
/// they have arrived, so rows never render with unresolved names.
#[derive(Debug)]
pub struct ListController<T> {
    pub items: Vec<T>,
    pub teams: Vec<Team>,
    pub loading: bool,
    pub selected: usize,
    pub confirm: Option<ConfirmDialog<RecordId>>,
}

impl<T: Schema> Default for ListController<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            teams: Vec::new(),
            loading: true,
            selected: 0,
            confirm: None,
        }
    }
}

impl<T: Schema> ListController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the confirmation prompt for deleting `id`.
    pub fn confirm_delete(&mut self, id: RecordId) {
        let label = T::KIND.label();
        self.confirm = Some(
            ConfirmDialog::new(format!("Are you sure you want to delete this {label}?"), id)
                .with_title(format!(" Delete {label} ")),
        );
    }

    fn load_primary(&mut self) -> Vec<Action> {
        self.loading = true;
        vec![Action::Request(Operation::ListAll(T::KIND))]
    }

    fn on_primary_loaded(&mut self, records: Vec<Record>) {
        self.items = records.into_iter().filter_map(T::from_record).collect();
        self.loading = false;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn on_load_failed(&mut self, entity: EntityKind) -> Vec<Action> {
        self.loading = false;
        self.items.clear();
        self.selected = 0;
        vec![Action::Notify(Notification::error(format!(
            "Failed to load {}",
            entity.plural()
        )))]
    }
}

impl<T: Schema> View for ListController<T> {
    fn activate(&mut self) -> Vec<Action> {
        self.loading = true;
        if T::USES_TEAMS {
            vec![Action::Request(Operation::ListAll(EntityKind::Team))]
        } else {
            self.load_primary()
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) -> Vec<Action> {
        match outcome {
            Outcome::Listed(kind, records) if kind == T::KIND => {
                debug!("loaded {} {}", records.len(), kind.plural());
                self.on_primary_loaded(records);
                Vec::new()
            }
            Outcome::Listed(EntityKind::Team, records) if T::USES_TEAMS => {
                self.teams = records.into_iter().filter_map(Team::from_record).collect();
                self.load_primary()
            }
            Outcome::Failed { operation: OperationKind::List, entity, message } => {
                warn!("listing {} failed: {message}", entity.plural());
                self.on_load_failed(entity)
            }
            Outcome::Deleted(kind, id) if kind == T::KIND => {
                debug!("deleted {kind} {id}");
                let mut actions = vec![Action::Notify(Notification::success(format!(
                    "{} deleted",
                    capitalize(kind.label())
                )))];
                actions.extend(self.load_primary());
                actions
            }
            Outcome::Failed { operation: OperationKind::Delete, entity, message } => {
                warn!("deleting {entity} failed: {message}");
                vec![Action::Notify(Notification::error(format!("Failed to delete {entity}")))]
            }
            other => {
                debug!("list view ignoring {other:?}");
                Vec::new()
            }
        }
    }
}

impl<T: Schema> ListView for ListController<T> {
    fn entity(&self) -> EntityKind {
        T::KIND
    }

    fn columns(&self) -> &'static [&'static str] {
        T::COLUMNS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.items.iter().map(|item| item.row(&self.teams)).collect()
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn selected_id(&self) -> Option<RecordId> {
        self.items.get(self.selected).map(Entity::id)
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.confirm_delete(id);
        }
    }

    fn confirmation(&self) -> Option<&ConfirmDialog<RecordId>> {
        self.confirm.as_ref()
    }

    fn answer_confirmation(&mut self, confirmed: bool) -> Vec<Action> {
        let Some(dialog) = self.confirm.take() else {
            return Vec::new();
        };
        match dialog.resolve(confirmed) {
            Some(id) => vec![Action::Request(Operation::Delete(T::KIND, id))],
            None => Vec::new(),
        }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_state::Level;
    use liga_api::{Match, Player};

    fn team(id: RecordId, name: &str) -> Team {
        Team { id, name: name.into(), ..Default::default() }
    }

    fn records<T: Entity>(items: Vec<T>) -> Vec<Record> {
        items.into_iter().map(Entity::into_record).collect()
    }

    fn requests(actions: &[Action]) -> Vec<&Operation> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Request(op) => Some(op),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn team_list_fetches_only_teams() {
        let mut list = ListController::<Team>::new();
        let actions = list.activate();
        assert_eq!(actions, vec![Action::Request(Operation::ListAll(EntityKind::Team))]);
        assert!(list.loading);

        let actions = list.on_outcome(Outcome::Listed(
            EntityKind::Team,
            records(vec![team(1, "Real Madrid")]),
        ));
        assert!(actions.is_empty());
        assert!(!list.loading);
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn player_list_waits_for_teams_before_fetching_players() {
        let mut list = ListController::<Player>::new();
        let actions = list.activate();
        assert_eq!(actions, vec![Action::Request(Operation::ListAll(EntityKind::Team))]);

        let actions =
            list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(1, "Getafe")])));
        assert_eq!(actions, vec![Action::Request(Operation::ListAll(EntityKind::Player))]);
        assert!(list.loading, "still loading until players settle");

        let player = Player { id: 3, name: "Ana Ruiz".into(), team_id: 1, ..Default::default() };
        list.on_outcome(Outcome::Listed(EntityKind::Player, records(vec![player])));
        assert!(!list.loading);
        assert_eq!(list.rows()[0][3], "Getafe");
    }

    #[test]
    fn failed_team_fetch_clears_loading_and_leaves_list_empty() {
        let mut list = ListController::<Match>::new();
        list.activate();
        let actions = list.on_outcome(Outcome::Failed {
            operation: OperationKind::List,
            entity: EntityKind::Team,
            message: "connection refused".into(),
        });
        assert!(!list.loading);
        assert!(list.items.is_empty());
        assert!(requests(&actions).is_empty());
        assert!(matches!(
            &actions[0],
            Action::Notify(n) if n.level == Level::Error && n.message == "Failed to load teams"
        ));
    }

    #[test]
    fn failed_reload_does_not_keep_stale_rows() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(1, "Osasuna")])));
        list.on_outcome(Outcome::Failed {
            operation: OperationKind::List,
            entity: EntityKind::Team,
            message: "500".into(),
        });
        assert!(list.items.is_empty());
    }

    #[test]
    fn team_name_soft_fails() {
        let teams = vec![team(1, "Celta")];
        assert_eq!(team_name(&teams, 1, Match::MISSING_TEAM), "Celta");
        assert_eq!(team_name(&teams, 99, Match::MISSING_TEAM), "Unknown");
        assert_eq!(team_name(&[], 99, Player::MISSING_TEAM), "No team");
    }

    #[test]
    fn declined_confirmation_issues_no_delete() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(4, "Eibar")])));
        list.request_delete();
        assert!(list.confirmation().is_some());

        let actions = list.answer_confirmation(false);
        assert!(actions.is_empty());
        assert!(list.confirmation().is_none());
    }

    #[test]
    fn confirmed_delete_then_exactly_one_refetch() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(4, "Eibar")])));
        list.request_delete();

        let actions = list.answer_confirmation(true);
        assert_eq!(actions, vec![Action::Request(Operation::Delete(EntityKind::Team, 4))]);

        let actions = list.on_outcome(Outcome::Deleted(EntityKind::Team, 4));
        assert_eq!(requests(&actions), vec![&Operation::ListAll(EntityKind::Team)]);
        assert!(matches!(&actions[0], Action::Notify(n) if n.message == "Team deleted"));
    }

    #[test]
    fn refetch_after_delete_goes_through_loading() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(4, "Eibar")])));
        assert!(!list.is_loading());

        list.on_outcome(Outcome::Deleted(EntityKind::Team, 4));
        assert!(list.is_loading());

        list.on_outcome(Outcome::Listed(EntityKind::Team, Vec::new()));
        assert!(!list.is_loading());
        assert!(list.items.is_empty());
    }

    #[test]
    fn player_delete_refetches_players_not_teams() {
        let mut list = ListController::<Player>::new();
        let actions = list.on_outcome(Outcome::Deleted(EntityKind::Player, 2));
        assert_eq!(requests(&actions), vec![&Operation::ListAll(EntityKind::Player)]);
    }

    #[test]
    fn failed_delete_keeps_rows_and_does_not_retry() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(4, "Eibar")])));
        let actions = list.on_outcome(Outcome::Failed {
            operation: OperationKind::Delete,
            entity: EntityKind::Team,
            message: "409".into(),
        });
        assert!(requests(&actions).is_empty());
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn selection_is_clamped_after_reload() {
        let mut list = ListController::<Team>::new();
        list.on_outcome(Outcome::Listed(
            EntityKind::Team,
            records(vec![team(1, "A"), team(2, "B"), team(3, "C")]),
        ));
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected_id(), Some(3));

        list.on_outcome(Outcome::Listed(EntityKind::Team, records(vec![team(1, "A")])));
        assert_eq!(list.selected_id(), Some(1));
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize("match"), "Match");
        assert_eq!(capitalize(""), "");
    }
}
