use crate::route::Route;
use crate::state::app_state::Notification;
use crate::state::entities::Schema;
use crate::state::list::{capitalize, team_name};
use crate::state::messages::{Action, Operation, OperationKind, Outcome};
use crate::state::validation::{FieldInput, FieldKind, FieldSet};
use crate::state::view::{FormView, View};
use liga_api::{Entity, EntityKind, RecordId, Team};
use log::{debug, info, warn};
use std::marker::PhantomData;

/// Decided once when the form opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Create-or-edit controller for one record.
///
/// The team picker and the edit-mode record load are requested together and
/// may complete in either order.
#[derive(Debug)]
pub struct FormController<T> {
    pub mode: FormMode,
    pub fields: FieldSet,
    pub teams: Vec<Team>,
    pub submitting: bool,
    pub focus: usize,
    _record: PhantomData<T>,
}

impl<T: Schema> FormController<T> {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            fields: FieldSet::new(T::FIELDS),
            teams: Vec::new(),
            submitting: false,
            focus: 0,
            _record: PhantomData,
        }
    }

    fn back_to_list(&self) -> Action {
        Action::Navigate(Route::List(T::KIND))
    }

    fn focused(&self) -> Option<&FieldInput> {
        self.fields.fields.get(self.focus)
    }

    fn move_focus(&mut self, next: usize) {
        if let Some(field) = self.fields.fields.get_mut(self.focus) {
            field.touched = true;
        }
        self.focus = next;
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        if let Some(field) = self.fields.fields.get_mut(self.focus)
            && matches!(field.spec.kind, FieldKind::Text | FieldKind::Integer | FieldKind::DateTime)
        {
            edit(&mut field.value);
        }
    }
}

impl<T: Schema> View for FormController<T> {
    fn activate(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if T::USES_TEAMS {
            actions.push(Action::Request(Operation::ListAll(EntityKind::Team)));
        }
        if let FormMode::Edit(id) = self.mode {
            actions.push(Action::Request(Operation::GetById(T::KIND, id)));
        }
        actions
    }

    fn on_outcome(&mut self, outcome: Outcome) -> Vec<Action> {
        let label = T::KIND.label();
        match outcome {
            Outcome::Listed(EntityKind::Team, records) if T::USES_TEAMS => {
                self.teams = records.into_iter().filter_map(Team::from_record).collect();
                Vec::new()
            }
            Outcome::Fetched(record) => {
                if let Some(record) = T::from_record(record) {
                    self.fields.patch(record.field_values());
                }
                Vec::new()
            }
            Outcome::Created(record) if record.kind() == T::KIND => {
                info!("created {label} {}", record.id());
                vec![
                    Action::Notify(Notification::success(format!("{} created", capitalize(label)))),
                    self.back_to_list(),
                ]
            }
            Outcome::Updated(kind, id) if kind == T::KIND => {
                info!("updated {label} {id}");
                vec![
                    Action::Notify(Notification::success(format!("{} updated", capitalize(label)))),
                    self.back_to_list(),
                ]
            }
            Outcome::Failed { operation, entity, message } => {
                warn!("{operation:?} {entity} failed: {message}");
                match operation {
                    OperationKind::List => vec![Action::Notify(Notification::error(format!(
                        "Failed to load {}",
                        entity.plural()
                    )))],
                    // Nothing sensible to edit; leave the view.
                    OperationKind::Get => vec![
                        Action::Notify(Notification::error(format!("Failed to load {label}"))),
                        self.back_to_list(),
                    ],
                    OperationKind::Create | OperationKind::Update => {
                        self.submitting = false;
                        let verb = if operation == OperationKind::Create { "create" } else { "update" };
                        vec![Action::Notify(Notification::error(format!(
                            "Failed to {verb} {label}"
                        )))]
                    }
                    OperationKind::Delete => Vec::new(),
                }
            }
            other => {
                debug!("form view ignoring {other:?}");
                Vec::new()
            }
        }
    }
}

impl<T: Schema> FormView for FormController<T> {
    fn entity(&self) -> EntityKind {
        T::KIND
    }

    fn mode(&self) -> FormMode {
        self.mode
    }

    fn fields(&self) -> &[FieldInput] {
        &self.fields.fields
    }

    fn display_value(&self, index: usize) -> String {
        let Some(field) = self.fields.fields.get(index) else {
            return String::new();
        };
        match field.spec.kind {
            FieldKind::TeamRef => match field.value.parse::<RecordId>() {
                Ok(id) => team_name(&self.teams, id, T::MISSING_TEAM).to_string(),
                Err(_) if self.teams.is_empty() => "(no teams loaded)".to_string(),
                Err(_) => "(select a team)".to_string(),
            },
            FieldKind::Choice(_) if field.value.is_empty() => "(select)".to_string(),
            _ => field.value.clone(),
        }
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn focus_next(&mut self) {
        let len = self.fields.fields.len();
        self.move_focus((self.focus + 1) % len.max(1));
    }

    fn focus_prev(&mut self) {
        let len = self.fields.fields.len().max(1);
        self.move_focus((self.focus + len - 1) % len);
    }

    fn insert_char(&mut self, c: char) {
        self.edit_focused(|value| value.push(c));
    }

    fn backspace(&mut self) {
        self.edit_focused(|value| {
            value.pop();
        });
    }

    fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.focused() else {
            return;
        };
        let options: Vec<String> = match field.spec.kind {
            FieldKind::Choice(choices) => choices.iter().map(|c| (*c).to_string()).collect(),
            FieldKind::TeamRef => self.teams.iter().map(|t| t.id.to_string()).collect(),
            _ => return,
        };
        if options.is_empty() {
            return;
        }
        let next = match options.iter().position(|o| *o == field.value) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None if forward => 0,
            None => options.len() - 1,
        };
        let key = field.spec.key;
        self.fields.set(key, options[next].clone());
    }

    fn submit(&mut self) -> Vec<Action> {
        if self.submitting {
            return Vec::new();
        }
        if !self.fields.is_valid() {
            self.fields.mark_all_touched();
            return Vec::new();
        }
        if let Some(message) = T::cross_check(&self.fields) {
            return vec![Action::Notify(Notification::error(message))];
        }

        let id = match self.mode {
            FormMode::Create => 0,
            FormMode::Edit(id) => id,
        };
        let Some(record) = T::from_fields(id, &self.fields) else {
            self.fields.mark_all_touched();
            return Vec::new();
        };

        self.submitting = true;
        debug!("submitting {}: {:?}", T::KIND, self.fields.values());
        let operation = match self.mode {
            FormMode::Create => Operation::Create(record.into_record()),
            FormMode::Edit(id) => Operation::Update(id, record.into_record()),
        };
        vec![Action::Request(operation)]
    }

    fn cancel(&mut self) -> Vec<Action> {
        vec![self.back_to_list()]
    }
}
