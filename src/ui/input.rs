use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Top,
    Bottom,
    StartSearch,
    StartFilter,
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
    ToggleDetail,
    Refresh,
    Reset,
    Help,
    ClosePopup,
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a login; submitted after the debounce delay.
    Search,
    /// Typing a repository filter; applied on every keystroke.
    Filter,
}

impl InputMode {
    pub fn is_editing(self) -> bool {
        self != InputMode::Normal
    }
}

pub fn map_key(key: KeyEvent, mode: InputMode) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if mode.is_editing() {
        return match key.code {
            KeyCode::Esc => Action::InputCancel,
            KeyCode::Enter => Action::InputConfirm,
            KeyCode::Backspace => Action::InputBackspace,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Up => Action::MoveUp,
            KeyCode::Down => Action::MoveDown,
            KeyCode::Char(c) if !ctrl => Action::InputChar(c),
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('r') if ctrl => Action::Refresh,
        KeyCode::Char('k') if ctrl => Action::StartSearch,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::Top,
        KeyCode::Char('G') | KeyCode::End => Action::Bottom,
        KeyCode::Char('s') => Action::StartSearch,
        KeyCode::Char('/') => Action::StartFilter,
        KeyCode::Char('x') => Action::Reset,
        KeyCode::Enter => Action::ToggleDetail,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Esc => Action::ClosePopup,
        _ => Action::None,
    }
}
