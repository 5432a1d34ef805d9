use crate::state::messages::{NetworkRequest, NetworkResponse, Operation, Outcome};
use liga_api::client::{ApiResult, LigaApi};
use liga_api::{Entity, EntityKind, Match, Player, Record, RecordId, Team};
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_INTERVAL: Duration = Duration::from_millis(33);
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Shared between the request tasks and the spinner.
#[derive(Debug, Default)]
struct Activity {
    in_flight: AtomicUsize,
    last_failed: AtomicBool,
}

/// Runs each collection call on its own task and reports completions back to
/// the UI loop as they land. A call that never returns only holds up its own
/// completion. Calls are never cancelled once received.
pub struct NetworkWorker {
    client: LigaApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    activity: Arc<Activity>,
}

impl NetworkWorker {
    pub fn new(
        client: LigaApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            activity: Arc::new(Activity::default()),
        }
    }

    pub async fn run(mut self) {
        let spinner = tokio::spawn(animate_spinner(self.responses.clone(), self.activity.clone()));

        while let Some(request) = self.requests.recv().await {
            self.activity.in_flight.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(complete(
                self.client.clone(),
                request,
                self.responses.clone(),
                self.activity.clone(),
            ));
        }

        spinner.abort();
    }
}

async fn complete(
    client: LigaApi,
    NetworkRequest { ticket, operation }: NetworkRequest,
    responses: mpsc::Sender<NetworkResponse>,
    activity: Arc<Activity>,
) {
    let kind = operation.kind();
    let entity = operation.entity();
    debug!("{kind:?} {entity} (ticket {ticket})");

    let result = execute(&client, operation).await;
    activity.last_failed.store(result.is_err(), Ordering::SeqCst);
    activity.in_flight.fetch_sub(1, Ordering::SeqCst);

    let outcome = result.unwrap_or_else(|err| {
        warn!("{kind:?} {entity} failed: {err}");
        Outcome::Failed { operation: kind, entity, message: err.to_string() }
    });

    if let Err(e) = responses.send(NetworkResponse::Completed { ticket, outcome }).await {
        error!("Failed to send network response: {e}");
    }
}

async fn execute(client: &LigaApi, operation: Operation) -> ApiResult<Outcome> {
    match operation {
        Operation::ListAll(kind) => {
            let records = match kind {
                EntityKind::Team => list::<Team>(client).await?,
                EntityKind::Player => list::<Player>(client).await?,
                EntityKind::Match => list::<Match>(client).await?,
            };
            Ok(Outcome::Listed(kind, records))
        }
        Operation::GetById(kind, id) => {
            let record = match kind {
                EntityKind::Team => get::<Team>(client, id).await?,
                EntityKind::Player => get::<Player>(client, id).await?,
                EntityKind::Match => get::<Match>(client, id).await?,
            };
            Ok(Outcome::Fetched(record))
        }
        Operation::Create(record) => {
            let created = match record {
                Record::Team(t) => client.teams().create(&t).await?.into_record(),
                Record::Player(p) => client.players().create(&p).await?.into_record(),
                Record::Match(m) => client.matches().create(&m).await?.into_record(),
            };
            Ok(Outcome::Created(created))
        }
        Operation::Update(id, record) => {
            let kind = record.kind();
            match record {
                Record::Team(t) => client.teams().update(id, &t).await?,
                Record::Player(p) => client.players().update(id, &p).await?,
                Record::Match(m) => client.matches().update(id, &m).await?,
            }
            Ok(Outcome::Updated(kind, id))
        }
        Operation::Delete(kind, id) => {
            match kind {
                EntityKind::Team => client.teams().delete(id).await?,
                EntityKind::Player => client.players().delete(id).await?,
                EntityKind::Match => client.matches().delete(id).await?,
            }
            Ok(Outcome::Deleted(kind, id))
        }
    }
}

async fn list<T: Entity>(client: &LigaApi) -> ApiResult<Vec<Record>> {
    let items = client.collection::<T>().list_all().await?;
    Ok(items.into_iter().map(Entity::into_record).collect())
}

async fn get<T: Entity>(client: &LigaApi, id: RecordId) -> ApiResult<Record> {
    Ok(client.collection::<T>().get_by_id(id).await?.into_record())
}

/// Sole sender of `LoadingStateChanged`, so the final idle state can never be
/// overtaken by a late spinner frame.
async fn animate_spinner(responses: mpsc::Sender<NetworkResponse>, activity: Arc<Activity>) {
    let mut interval = tokio::time::interval(SPINNER_INTERVAL);
    let mut spinner_index = 0;
    let mut was_loading = false;

    loop {
        interval.tick().await;
        let loading_state = if activity.in_flight.load(Ordering::SeqCst) > 0 {
            let spinner_char = SPINNER_CHARS[spinner_index];
            spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
            was_loading = true;
            LoadingState { is_loading: true, spinner_char }
        } else if was_loading {
            spinner_index = 0;
            was_loading = false;
            let failed = activity.last_failed.load(Ordering::SeqCst);
            LoadingState { is_loading: false, spinner_char: if failed { ERROR_CHAR } else { ' ' } }
        } else {
            continue;
        };

        if responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await
            .is_err()
        {
            break;
        }
    }
}
