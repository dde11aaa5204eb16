use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::entities::{Buttons, GameState};

/// One-shot game actions triggered by a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Pause,
    Resume,
    Restart,
    Quit,
}

/// Manages input polling and translates raw key events into held buttons and one-shot actions
pub struct InputManager {
    buttons: Buttons,
    oneshot_actions: Vec<InputAction>,
    /// Without keyboard enhancement the terminal never reports releases, so
    /// held keys only last until the next poll and rely on key repeat.
    release_on_poll: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputManager {
    pub fn new(reports_releases: bool) -> Self {
        Self {
            buttons: Buttons::default(),
            oneshot_actions: Vec::new(),
            release_on_poll: !reports_releases,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before reading buttons or actions
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();
        if self.release_on_poll {
            self.buttons = Buttons::default();
        }

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, game_state);
            }
        }

        Ok(())
    }

    /// Processes a key event and updates held buttons and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState) {
        match key_event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.handle_key_press(key_event, game_state);
            }
            KeyEventKind::Release => {
                self.set_button(key_event.code, false);
            }
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        let pause_key = matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P'));
        match game_state {
            GameState::Playing if pause_key => {
                self.oneshot_actions.push(InputAction::Pause);
            }
            GameState::Paused if pause_key => {
                self.oneshot_actions.push(InputAction::Resume);
            }
            GameState::GameOver
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) =>
            {
                self.oneshot_actions.push(InputAction::Restart);
            }
            GameState::Playing => {
                self.set_button(key_event.code, true);
            }
            _ => {}
        }
    }

    fn set_button(&mut self, code: KeyCode, pressed: bool) {
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                self.buttons.up = pressed;
                if pressed {
                    self.buttons.down = false;
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                self.buttons.down = pressed;
                if pressed {
                    self.buttons.up = false;
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.buttons.left = pressed;
                if pressed {
                    self.buttons.right = false;
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.buttons.right = pressed;
                if pressed {
                    self.buttons.left = false;
                }
            }
            KeyCode::Char(' ') => {
                self.buttons.a = pressed;
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.buttons.barrier = pressed;
            }
            _ => {}
        }
    }

    /// Buttons currently held, or none outside the Playing state
    pub fn buttons(&self, game_state: GameState) -> Buttons {
        if game_state == GameState::Playing {
            self.buttons
        } else {
            Buttons::default()
        }
    }

    /// One-shot actions gathered by the last `poll_events`
    pub fn actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }
}
