//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::{Filter, HttpMethod};

/// Tabs of the detail view
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DetailTab {
    #[default]
    Response,
    Request,
    Headers,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Response, DetailTab::Request, DetailTab::Headers];

    pub fn title(&self) -> &'static str {
        match self {
            DetailTab::Response => "Response",
            DetailTab::Request => "Request",
            DetailTab::Headers => "Headers",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            DetailTab::Response => 0,
            DetailTab::Request => 1,
            DetailTab::Headers => 2,
        }
    }

    pub fn next(&self) -> DetailTab {
        match self {
            DetailTab::Response => DetailTab::Request,
            DetailTab::Request => DetailTab::Headers,
            DetailTab::Headers => DetailTab::Response,
        }
    }
}

/// Input mode of the list screen
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Searching,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Search
    StartSearch,
    StopSearch,
    SearchChar(char),
    SearchBackspace,
    SetSearch(String),

    // Filter
    ToggleMethodFilter(HttpMethod),
    ToggleErrorsOnly,
    FilterBySelectedStatus,
    SetFilter(Filter),
    ClearFilter,

    // Exchange list
    SelectNext,
    SelectPrev,
    OpenDetail,

    // Detail view
    CloseDetail,
    SelectTab(DetailTab),
    NextTab,
    OpenUrlModal,
    CloseUrlModal,
    ScrollUp,
    ScrollDown,

    // Sharing
    ShareCurl,
    ShareFullRequest,
    /// Share the body or headers shown on the current tab
    ShareSection,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// What the UI currently shows, needed to map keys to events
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub input_mode: InputMode,
    pub detail_open: bool,
    pub url_modal_open: bool,
    pub show_help: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.url_modal_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('u') => {
                Some(UiEvent::CloseUrlModal)
            }
            _ => None,
        };
    }

    if ctx.detail_open {
        return handle_detail_keys(key);
    }

    match ctx.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
            KeyCode::Backspace => Some(UiEvent::SearchBackspace),
            KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
            _ => None,
        },
        InputMode::Normal => handle_list_keys(key),
    }
}

fn handle_list_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Enter => Some(UiEvent::OpenDetail),
        KeyCode::Char('g') => Some(UiEvent::ToggleMethodFilter(HttpMethod::GET)),
        KeyCode::Char('p') => Some(UiEvent::ToggleMethodFilter(HttpMethod::POST)),
        KeyCode::Char('u') => Some(UiEvent::ToggleMethodFilter(HttpMethod::PUT)),
        KeyCode::Char('a') => Some(UiEvent::ToggleMethodFilter(HttpMethod::PATCH)),
        KeyCode::Char('d') => Some(UiEvent::ToggleMethodFilter(HttpMethod::DELETE)),
        KeyCode::Char('h') => Some(UiEvent::ToggleMethodFilter(HttpMethod::HEAD)),
        KeyCode::Char('e') => Some(UiEvent::ToggleErrorsOnly),
        KeyCode::Char('s') => Some(UiEvent::FilterBySelectedStatus),
        KeyCode::Char('c') => Some(UiEvent::ClearFilter),
        _ => None,
    }
}

fn handle_detail_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(UiEvent::CloseDetail),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => Some(UiEvent::SelectTab(DetailTab::Response)),
        KeyCode::Char('2') => Some(UiEvent::SelectTab(DetailTab::Request)),
        KeyCode::Char('3') => Some(UiEvent::SelectTab(DetailTab::Headers)),
        KeyCode::Tab => Some(UiEvent::NextTab),
        KeyCode::Char('u') => Some(UiEvent::OpenUrlModal),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
        KeyCode::Char('c') => Some(UiEvent::ShareCurl),
        KeyCode::Char('f') => Some(UiEvent::ShareFullRequest),
        KeyCode::Char('y') => Some(UiEvent::ShareSection),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_list_keys() {
        let ctx = KeyContext::default();
        assert_eq!(key_to_ui_event(press(KeyCode::Char('/')), ctx), Some(UiEvent::StartSearch));
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('g')), ctx),
            Some(UiEvent::ToggleMethodFilter(HttpMethod::GET))
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), ctx), Some(UiEvent::OpenDetail));
    }

    #[test]
    fn test_search_mode_captures_chars() {
        let ctx = KeyContext {
            input_mode: InputMode::Searching,
            ..KeyContext::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx), Some(UiEvent::SearchChar('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::StopSearch));
    }

    #[test]
    fn test_modal_takes_priority_over_detail() {
        let ctx = KeyContext {
            detail_open: true,
            url_modal_open: true,
            ..KeyContext::default()
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::CloseUrlModal));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('2')), ctx), None);
    }

    #[test]
    fn test_detail_tab_keys() {
        let ctx = KeyContext {
            detail_open: true,
            ..KeyContext::default()
        };
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('3')), ctx),
            Some(UiEvent::SelectTab(DetailTab::Headers))
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::CloseDetail));
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(DetailTab::default(), DetailTab::Response);
        assert_eq!(DetailTab::Headers.next(), DetailTab::Response);
    }
}
