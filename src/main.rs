mod app;
mod components;
mod draw;
mod keys;
mod route;
mod state;
mod ui;

use crate::app::App;
use crate::route::Route;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use liga_api::client::LigaApi;
use log::{error, info};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Drives notification expiry.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    api_url: Option<String>,
    route: Option<String>,
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run(CliArgs),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = match parse_cli_args(std::env::args().skip(1)) {
        Ok(CliCommand::Run(args)) => args,
        Ok(CliCommand::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliCommand::Version) => {
            println!("liga-tui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    tui_logger::init_logger(log::LevelFilter::Trace)?;

    let mut settings = AppSettings::load();
    if let Some(url) = args.api_url {
        settings.api_url = url;
    }
    let start_route = args.route.as_deref().map(Route::parse).unwrap_or_default();
    let client = LigaApi::new(settings.api_url.clone());
    info!("using backend at {}", client.base_url());

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Tick thread
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        start_route,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    tick_task.abort();

    Ok(())
}

fn parse_cli_args(mut args: impl Iterator<Item = String>) -> Result<CliCommand, String> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "--api-url" => {
                parsed.api_url = Some(args.next().ok_or("--api-url needs a value")?);
            }
            "--route" => {
                parsed.route = Some(args.next().ok_or("--route needs a value")?);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(CliCommand::Run(parsed))
}

fn usage_text() -> &'static str {
    "liga-tui - manage football teams, players and matches

Usage:
  liga-tui [--api-url <url>] [--route <path>]
  liga-tui --help
  liga-tui --version

Options:
  --api-url <url>   Backend base URL (default http://localhost:5130)
  --route <path>    Start screen, e.g. /players or /matches/edit/3

Environment:
  LIGA_API_URL      Backend base URL
  LIGA_LOG_LEVEL    error, warn, info, debug or trace"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    start_route: Route,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, start_route, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    start_route: Route,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.navigate(start_route);
            send_all(network_requests, requests).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::Tick => app.lock().await.on_tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::Completed { ticket, outcome } => {
            let requests = app.lock().await.on_network_completed(ticket, outcome);
            send_all(network_requests, requests).await;
        }
    }
    !loading.is_loading
}

async fn send_all(network_requests: &mpsc::Sender<NetworkRequest>, requests: Vec<NetworkRequest>) {
    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("Failed to queue network request: {e}");
            break;
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort; also runs from the panic hook, so it never fails.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
