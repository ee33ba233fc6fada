use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Difficulty, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    /// Start a game, or restart after game over
    Start,
    ToggleTheme,
    SetDifficulty(Difficulty),
    CycleDifficulty,
    Quit,
    None,
}

/// What a key does while the leaderboard name prompt is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Push(char),
    Backspace,
    Submit,
    Skip,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Start,
            KeyCode::Char('t') | KeyCode::Char('T') => KeyAction::ToggleTheme,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::CycleDifficulty,
            KeyCode::Char('1') => KeyAction::SetDifficulty(Difficulty::Easy),
            KeyCode::Char('2') => KeyAction::SetDifficulty(Difficulty::Normal),
            KeyCode::Char('3') => KeyAction::SetDifficulty(Difficulty::Hard),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Keys while typing a name: every printable char is text, so `q` does not quit
    pub fn handle_prompt_key(&self, key: KeyEvent) -> PromptAction {
        if is_ctrl_c(&key) {
            return PromptAction::Quit;
        }

        match key.code {
            KeyCode::Enter => PromptAction::Submit,
            KeyCode::Esc => PromptAction::Skip,
            KeyCode::Backspace => PromptAction::Backspace,
            KeyCode::Char(c) if !c.is_control() => PromptAction::Push(c),
            _ => PromptAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::Turn(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::Turn(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::Turn(Direction::Left)
        );

        let s_upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(s_upper),
            KeyAction::Turn(Direction::Down)
        );
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char(' '))), KeyAction::Start);
        assert_eq!(handler.handle_key_event(press(KeyCode::Enter)), KeyAction::Start);
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('t'))),
            KeyAction::ToggleTheme
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('3'))),
            KeyAction::SetDifficulty(Difficulty::Hard)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('c'))),
            KeyAction::CycleDifficulty
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handler.handle_key_event(press(KeyCode::F(5))), KeyAction::None);
    }

    #[test]
    fn test_prompt_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_prompt_key(press(KeyCode::Char('q'))),
            PromptAction::Push('q')
        );
        assert_eq!(
            handler.handle_prompt_key(press(KeyCode::Backspace)),
            PromptAction::Backspace
        );
        assert_eq!(handler.handle_prompt_key(press(KeyCode::Enter)), PromptAction::Submit);
        assert_eq!(handler.handle_prompt_key(press(KeyCode::Esc)), PromptAction::Skip);
        assert_eq!(handler.handle_prompt_key(press(KeyCode::Tab)), PromptAction::None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_prompt_key(ctrl_c), PromptAction::Quit);
    }
}
