use crate::app::{App, MenuItem};
use crate::route::Route;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let requests = dispatch_key(&mut guard, key_event);
    drop(guard);

    for request in requests {
        if network_requests.send(request).await.is_err() {
            log::error!("network worker is gone; dropping request");
            break;
        }
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}

fn dispatch_key(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        quit();
    }

    if app.state.show_help {
        if matches!(key_event.code, KeyCode::Esc | Char('?') | Char('q')) {
            app.toggle_help();
        }
        return Vec::new();
    }

    // Text entry owns the keyboard while a form is open.
    if app.state.screen.form_view().is_some() {
        return form_keys(app, key_event);
    }

    if app
        .state
        .screen
        .list()
        .is_some_and(|list| list.confirmation().is_some())
    {
        return match key_event.code {
            Char('y') | Char('Y') | KeyCode::Enter => app.answer_confirmation(true),
            Char('n') | Char('N') | KeyCode::Esc => app.answer_confirmation(false),
            _ => Vec::new(),
        };
    }

    list_keys(app, key_event)
}

fn list_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        Char('q') => quit(),

        // Tab switching
        Char('1') => app.navigate(Route::List(MenuItem::Teams.entity())),
        Char('2') => app.navigate(Route::List(MenuItem::Players.entity())),
        Char('3') => app.navigate(Route::List(MenuItem::Matches.entity())),

        Char('j') | KeyCode::Down => {
            if let Some(list) = app.state.screen.list_mut() {
                list.select_next();
            }
            Vec::new()
        }
        Char('k') | KeyCode::Up => {
            if let Some(list) = app.state.screen.list_mut() {
                list.select_prev();
            }
            Vec::new()
        }
        Char('n') => app.open_create(),
        Char('e') | KeyCode::Enter => app.open_edit_selected(),
        Char('d') | KeyCode::Delete => {
            if let Some(list) = app.state.screen.list_mut() {
                list.request_delete();
            }
            Vec::new()
        }
        Char('r') => app.reload(),

        // Global
        Char('?') => {
            app.toggle_help();
            Vec::new()
        }
        Char('f') => {
            app.toggle_full_screen();
            Vec::new()
        }
        Char('"') => {
            app.toggle_show_logs();
            Vec::new()
        }

        _ => Vec::new(),
    }
}

fn form_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        KeyCode::Esc => return app.cancel_form(),
        KeyCode::Enter => return app.submit_form(),
        _ => {}
    }

    let Some(form) = app.state.screen.form_mut() else {
        return Vec::new();
    };
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.cycle_option(false),
        KeyCode::Right => form.cycle_option(true),
        KeyCode::Backspace => form.backspace(),
        Char(c) => form.insert_char(c),
        _ => {}
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use crate::state::app_state::AppState;
    use crate::state::messages::{Operation, Outcome};
    use liga_api::{Entity, EntityKind, Team};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn team_list_with(ids: &[u32]) -> App {
        let mut app = App { settings: AppSettings::default(), state: AppState::new() };
        app.navigate(Route::List(EntityKind::Team));
        let teams = ids
            .iter()
            .map(|&id| Team { id, name: format!("Team {id}"), ..Default::default() }.into_record())
            .collect();
        let ticket = app.state.ticket;
        app.on_network_completed(ticket, Outcome::Listed(EntityKind::Team, teams));
        app
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut app = team_list_with(&[4, 5]);
        dispatch_key(&mut app, press(Char('j')));
        assert!(dispatch_key(&mut app, press(Char('d'))).is_empty());

        let requests = dispatch_key(&mut app, press(Char('y')));
        let ops: Vec<_> = requests.into_iter().map(|r| r.operation).collect();
        assert_eq!(ops, vec![Operation::Delete(EntityKind::Team, 5)]);
    }

    #[test]
    fn declined_delete_issues_nothing() {
        let mut app = team_list_with(&[4]);
        dispatch_key(&mut app, press(Char('d')));
        assert!(dispatch_key(&mut app, press(KeyCode::Esc)).is_empty());
        assert!(app.state.screen.list().unwrap().confirmation().is_none());
    }

    #[test]
    fn typing_q_in_a_form_edits_the_field() {
        let mut app = team_list_with(&[]);
        dispatch_key(&mut app, press(Char('n')));
        dispatch_key(&mut app, press(Char('q')));
        let form = app.state.screen.form_view().unwrap();
        assert_eq!(form.fields()[0].value, "q");
    }

    #[test]
    fn number_keys_switch_collections() {
        let mut app = team_list_with(&[]);
        let requests = dispatch_key(&mut app, press(Char('3')));
        assert_eq!(app.active_tab(), MenuItem::Matches);
        assert_eq!(requests[0].operation, Operation::ListAll(EntityKind::Team));
    }
}
