// Copyright 2026 PosPrint Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Terminal UI event loop and key handling.
//!
//! Renders [`AppState`] into action affordances and translates key presses
//! into [`ControllerAction`]s. Guard notices for disabled affordances are
//! produced here, before any action reaches the controller; disabling an
//! affordance always suppresses its action.

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::widgets::ListState;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::draw::draw;
use crate::controller::ControllerAction;
use crate::state::{AppState, Notice};

const TICK: Duration = Duration::from_millis(100);

/// View-local state: list cursor and spinner tick.
#[derive(Debug, Default)]
pub struct ViewState {
    pub list_state: ListState,
    pub tick: usize,
}

/// Result of handling one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Quit,
    Action(ControllerAction),
}

/// Run the terminal UI until the user quits.
pub async fn run(state: Arc<AppState>, actions: mpsc::Sender<ControllerAction>) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &state, &actions).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &AppState,
    actions: &mpsc::Sender<ControllerAction>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let mut view = ViewState::default();

    loop {
        terminal.draw(|f| draw(f, state, &mut view))?;

        tokio::select! {
            _ = ticker.tick() => {
                view.tick = view.tick.wrapping_add(1);
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match on_key(key, state, &mut view) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Action(action) => {
                            if actions.send(action).await.is_err() {
                                break;
                            }
                        }
                        KeyOutcome::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            }
        }
    }

    Ok(())
}

/// Translate a key press against the current state into an outcome.
pub fn on_key(key: KeyEvent, state: &AppState, view: &mut ViewState) -> KeyOutcome {
    // A pending notice swallows the next key press.
    if state.notice().is_some() {
        state.clear_notice();
        return KeyOutcome::None;
    }

    if key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return KeyOutcome::Quit;
    }

    if state.is_busy() {
        debug!("Ignoring input while an operation is in flight");
        return KeyOutcome::None;
    }

    match key.code {
        KeyCode::Char('i') => KeyOutcome::Action(ControllerAction::Initialize),
        KeyCode::Char('s') => {
            if state.is_initialized() {
                KeyOutcome::Action(ControllerAction::Scan)
            } else {
                state.set_notice(Notice::error(
                    "Error",
                    "Bluetooth not enabled/not initialized.",
                ));
                KeyOutcome::None
            }
        }
        KeyCode::Char('p') => {
            if state.connected().is_some() {
                KeyOutcome::Action(ControllerAction::Print)
            } else {
                state.set_notice(Notice::error("Error", "No connected printer device."));
                KeyOutcome::None
            }
        }
        KeyCode::Up => {
            move_selection(state, view, -1);
            KeyOutcome::None
        }
        KeyCode::Down => {
            move_selection(state, view, 1);
            KeyOutcome::None
        }
        KeyCode::Enter => {
            let named = state.named_devices();
            match view.list_state.selected().and_then(|i| named.get(i)) {
                Some(device) => KeyOutcome::Action(ControllerAction::Connect {
                    address: device.address.clone(),
                }),
                None => KeyOutcome::None,
            }
        }
        _ => KeyOutcome::None,
    }
}

fn move_selection(state: &AppState, view: &mut ViewState, delta: isize) {
    let len = state.named_devices().len();
    if len == 0 {
        view.list_state.select(None);
        return;
    }
    let current = view.list_state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1) as usize;
    view.list_state.select(Some(next));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::DeviceDescriptor;
    use crate::state::NoticeKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn initialize_is_always_available() {
        let state = AppState::default();
        let mut view = ViewState::default();
        assert_eq!(
            on_key(press(KeyCode::Char('i')), &state, &mut view),
            KeyOutcome::Action(ControllerAction::Initialize)
        );
    }

    #[test]
    fn disabled_scan_produces_guard_notice_and_no_action() {
        let state = AppState::default();
        let mut view = ViewState::default();

        let outcome = on_key(press(KeyCode::Char('s')), &state, &mut view);
        assert_eq!(outcome, KeyOutcome::None);

        let notice = state.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.body, "Bluetooth not enabled/not initialized.");
    }

    #[test]
    fn disabled_print_produces_guard_notice_and_no_action() {
        let state = AppState::default();
        state.set_initialized(true);
        let mut view = ViewState::default();

        let outcome = on_key(press(KeyCode::Char('p')), &state, &mut view);
        assert_eq!(outcome, KeyOutcome::None);
        assert_eq!(state.notice().unwrap().body, "No connected printer device.");
    }

    #[test]
    fn pending_notice_swallows_next_key() {
        let state = AppState::default();
        state.set_initialized(true);
        state.set_notice(Notice::info("Bluetooth initialized", "ok"));
        let mut view = ViewState::default();

        // First press only dismisses the notice.
        let outcome = on_key(press(KeyCode::Char('s')), &state, &mut view);
        assert_eq!(outcome, KeyOutcome::None);
        assert!(state.notice().is_none());

        // Second press acts normally.
        let outcome = on_key(press(KeyCode::Char('s')), &state, &mut view);
        assert_eq!(outcome, KeyOutcome::Action(ControllerAction::Scan));
    }

    #[test]
    fn busy_suppresses_actions_but_not_quit() {
        let state = AppState::default();
        state.set_initialized(true);
        state.set_busy(true);
        let mut view = ViewState::default();

        assert_eq!(
            on_key(press(KeyCode::Char('s')), &state, &mut view),
            KeyOutcome::None
        );
        assert!(state.notice().is_none());
        assert_eq!(
            on_key(press(KeyCode::Char('q')), &state, &mut view),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn enter_connects_the_selected_named_device() {
        let state = AppState::default();
        state.set_devices(vec![
            DeviceDescriptor {
                name: Some("Printer A".into()),
                address: "AA:BB".into(),
            },
            DeviceDescriptor {
                name: Some("Printer B".into()),
                address: "CC:DD".into(),
            },
        ]);
        let mut view = ViewState::default();

        on_key(press(KeyCode::Down), &state, &mut view);
        on_key(press(KeyCode::Down), &state, &mut view);
        let outcome = on_key(press(KeyCode::Enter), &state, &mut view);
        assert_eq!(
            outcome,
            KeyOutcome::Action(ControllerAction::Connect {
                address: "CC:DD".into()
            })
        );
    }

    #[test]
    fn enter_with_no_devices_is_ignored() {
        let state = AppState::default();
        let mut view = ViewState::default();
        assert_eq!(
            on_key(press(KeyCode::Enter), &state, &mut view),
            KeyOutcome::None
        );
    }
}
