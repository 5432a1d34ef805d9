use crate::route::Route;
use crate::state::app_state::Notification;
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use liga_api::{EntityKind, Record, RecordId};

/// Generation number of the view that issued a request. Completions carrying
/// an older ticket belong to a view that has since been replaced.
pub type Ticket = u64;

/// One call against a collection endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ListAll(EntityKind),
    GetById(EntityKind, RecordId),
    Create(Record),
    Update(RecordId, Record),
    Delete(EntityKind, RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::ListAll(_) => OperationKind::List,
            Operation::GetById(..) => OperationKind::Get,
            Operation::Create(_) => OperationKind::Create,
            Operation::Update(..) => OperationKind::Update,
            Operation::Delete(..) => OperationKind::Delete,
        }
    }

    pub fn entity(&self) -> EntityKind {
        match self {
            Operation::ListAll(kind) | Operation::GetById(kind, _) | Operation::Delete(kind, _) => {
                *kind
            }
            Operation::Create(record) | Operation::Update(_, record) => record.kind(),
        }
    }
}

/// Result of an [`Operation`], delivered back to the view that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed(EntityKind, Vec<Record>),
    Fetched(Record),
    Created(Record),
    Updated(EntityKind, RecordId),
    Deleted(EntityKind, RecordId),
    Failed {
        operation: OperationKind,
        entity: EntityKind,
        message: String,
    },
}

/// What a controller asks the event loop to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Request(Operation),
    Notify(Notification),
    Navigate(Route),
}

#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub ticket: Ticket,
    pub operation: Operation,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    Completed { ticket: Ticket, outcome: Outcome },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
