use crate::tui::app::{AppState, InputAction};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

/// Draw, read keys and tick until the user quits. Must run inside a tokio
/// runtime context so provider requests can be spawned.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        let view = app.view();
        terminal.draw(|f| ui::draw(f, app, &view))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Returns true when the app should exit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if matches!(code, KeyCode::Char('h') | KeyCode::Char('H')) && !app.amount_entry_active() {
        app.handle_input(InputAction::ToggleHistory);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    if app.history_open() {
        match code {
            KeyCode::Up => {
                app.handle_input(InputAction::HistoryUp);
            }
            KeyCode::Down => {
                app.handle_input(InputAction::HistoryDown);
            }
            KeyCode::Esc => {
                app.handle_input(InputAction::ToggleHistory);
            }
            _ => {}
        }
        return false;
    }
    if app.amount_entry_active() {
        match code {
            KeyCode::Esc => {
                app.handle_input(InputAction::AmountCancel);
            }
            KeyCode::Enter => {
                if app.handle_input(InputAction::AmountSubmit) {
                    app.tick();
                }
            }
            KeyCode::Backspace => {
                app.handle_input(InputAction::AmountBackspace);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                app.handle_input(InputAction::AmountIncBb);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                app.handle_input(InputAction::AmountDecBb);
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                app.handle_input(InputAction::AmountDigit(c as u8 - b'0'));
            }
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') => {
            if app.handle_input(InputAction::NewHand) {
                app.tick();
            }
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            if app.handle_input(InputAction::Fold) {
                app.tick();
            }
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            if app.handle_input(InputAction::CheckCall) {
                app.tick();
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.handle_input(InputAction::AmountOpen);
        }
        _ => {}
    }
    false
}
