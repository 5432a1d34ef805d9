use crate::state::confirm::ConfirmDialog;
use crate::state::form::FormMode;
use crate::state::messages::{Action, Outcome};
use crate::state::validation::FieldInput;
use liga_api::{EntityKind, RecordId};

/// Controller behind the active screen.
pub trait View {
    /// Called once when the screen is opened; returns the initial requests.
    fn activate(&mut self) -> Vec<Action>;

    /// Continuation for a completed request issued by this view.
    fn on_outcome(&mut self, outcome: Outcome) -> Vec<Action>;
}

/// Type-erased access to a list controller for key handling and drawing.
pub trait ListView: View {
    fn entity(&self) -> EntityKind;
    fn columns(&self) -> &'static [&'static str];
    fn rows(&self) -> Vec<Vec<String>>;
    fn is_loading(&self) -> bool;
    fn selected(&self) -> usize;
    fn selected_id(&self) -> Option<RecordId>;
    fn select_next(&mut self);
    fn select_prev(&mut self);
    fn request_delete(&mut self);
    fn confirmation(&self) -> Option<&ConfirmDialog<RecordId>>;
    fn answer_confirmation(&mut self, confirmed: bool) -> Vec<Action>;
}

/// Type-erased access to a form controller for key handling and drawing.
pub trait FormView: View {
    fn entity(&self) -> EntityKind;
    fn mode(&self) -> FormMode;
    fn fields(&self) -> &[FieldInput];
    /// Human-readable value for a field (team names instead of ids).
    fn display_value(&self, index: usize) -> String;
    fn focus(&self) -> usize;
    fn is_submitting(&self) -> bool;
    fn focus_next(&mut self);
    fn focus_prev(&mut self);
    fn insert_char(&mut self, c: char);
    fn backspace(&mut self);
    fn cycle_option(&mut self, forward: bool);
    fn submit(&mut self) -> Vec<Action>;
    fn cancel(&mut self) -> Vec<Action>;
}
