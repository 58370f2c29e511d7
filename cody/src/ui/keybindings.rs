//! Keybinding dispatcher for cody.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop whether to continue, quit, or hand a
//! session `Action` to the controller. The dispatcher branches first on
//! `state.mode` (overlays swallow all keys), then on the session's screen.
//!
//! The session is only read here. Anything that changes it is returned as
//! `KeyAction::Dispatch` so the controller stays the single writer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use cody_core::related::related_for_display;
use cody_core::{Action, Language, Screen, Session, TransitionError};

use crate::app::{AppState, Focus, Mode};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Apply this action to the session.
    Dispatch(Action),
}

/// Dispatches a key event to the handler matching the current mode and screen.
pub fn handle_key(key: KeyEvent, state: &mut AppState, session: &Session) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => {
            if key.code == KeyCode::F(1) {
                state.help_scroll = 0;
                state.mode = Mode::HelpOverlay;
                return KeyAction::Continue;
            }
            match session.screen {
                Screen::LanguageSelect => handle_language_select(key, state),
                Screen::Interview => handle_interview(key, state, session),
                Screen::Feedback => handle_feedback(key, state, session),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Language select
// ---------------------------------------------------------------------------

fn handle_language_select(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let count = Language::ALL.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.language_cursor = (state.language_cursor + 1) % count;
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.language_cursor = (state.language_cursor + count - 1) % count;
            KeyAction::Continue
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            state.language_cursor = idx;
            KeyAction::Dispatch(Action::ChooseLanguage(Language::ALL[idx]))
        }
        KeyCode::Enter => {
            let language = Language::ALL[state.language_cursor % count];
            KeyAction::Dispatch(Action::ChooseLanguage(language))
        }
        // Skipping keeps the default language.
        KeyCode::Esc => KeyAction::Dispatch(Action::ChooseLanguage(Language::default())),
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Interview
// ---------------------------------------------------------------------------

fn handle_interview(key: KeyEvent, state: &mut AppState, session: &Session) -> KeyAction {
    if let Some(action) = handle_interview_command(key, state, session) {
        return action;
    }
    match state.focus {
        Focus::ProblemInput => handle_problem_input(key, state, session),
        Focus::ChatInput => handle_chat_input(key, state, session),
        Focus::Editor => handle_editor(key, state),
    }
}

/// Ctrl chords, focus movement and chat scrolling, which work in every panel.
fn handle_interview_command(
    key: KeyEvent,
    state: &mut AppState,
    session: &Session,
) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Char('e') if ctrl => KeyAction::Dispatch(Action::EvaluateCode),
        KeyCode::Char('l') if ctrl => {
            KeyAction::Dispatch(Action::ChangeLanguage(session.language.next()))
        }
        KeyCode::Char('r') if ctrl => KeyAction::Dispatch(Action::Reset),
        KeyCode::Char('f') if ctrl => KeyAction::Dispatch(Action::CompleteInterview),
        KeyCode::Char('c') if ctrl => {
            state.mode = Mode::ConfirmQuit;
            KeyAction::Continue
        }
        KeyCode::Char('u') if ctrl => {
            state.problem_scroll = state.problem_scroll.saturating_sub(3);
            KeyAction::Continue
        }
        KeyCode::Char('d') if ctrl => {
            state.problem_scroll = state.problem_scroll.saturating_add(3);
            KeyAction::Continue
        }
        KeyCode::Tab if state.focus != Focus::Editor => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::PageUp if state.focus != Focus::Editor => {
            let page = state.chat_page();
            state.scroll_chat_up(page);
            KeyAction::Continue
        }
        KeyCode::PageDown if state.focus != Focus::Editor => {
            let page = state.chat_page();
            state.scroll_chat_down(page);
            KeyAction::Continue
        }
        KeyCode::Esc if state.focus == Focus::Editor => {
            state.focus = Focus::ChatInput;
            KeyAction::Continue
        }
        KeyCode::Esc => {
            state.mode = Mode::ConfirmQuit;
            KeyAction::Continue
        }
        _ => return None,
    };
    Some(action)
}

fn handle_problem_input(key: KeyEvent, state: &mut AppState, session: &Session) -> KeyAction {
    if key.code == KeyCode::Enter {
        if state.problem_input.is_blank() {
            return KeyAction::Continue;
        }
        // A second load would be rejected; keep the id for a retry.
        if session.is_loading_problem {
            state.set_notice(TransitionError::Busy.to_string());
            return KeyAction::Continue;
        }
        let text = state.problem_input.take();
        state.focus = Focus::ChatInput;
        return KeyAction::Dispatch(Action::RequestProblem { text });
    }
    edit_input_line(key, &mut state.problem_input);
    KeyAction::Continue
}

fn handle_chat_input(key: KeyEvent, state: &mut AppState, session: &Session) -> KeyAction {
    if key.code == KeyCode::Enter {
        if state.chat_input.is_blank() {
            return KeyAction::Continue;
        }
        // Keep the draft rather than lose it to a rejected send.
        if session.is_busy() {
            state.set_notice(TransitionError::Busy.to_string());
            return KeyAction::Continue;
        }
        let text = state.chat_input.take();
        state.chat_scroll_back = 0;
        return KeyAction::Dispatch(Action::SendMessage { text });
    }
    edit_input_line(key, &mut state.chat_input);
    KeyAction::Continue
}

fn edit_input_line(key: KeyEvent, input: &mut crate::app::InputLine) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}

fn handle_editor(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let page = usize::from(state.editor_viewport_height.max(1));
    let editor = &mut state.editor;
    let edited = match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            editor.insert(c);
            true
        }
        KeyCode::Enter => {
            editor.newline();
            true
        }
        KeyCode::Tab => {
            editor.indent();
            true
        }
        KeyCode::Backspace => {
            editor.backspace();
            true
        }
        KeyCode::Delete => {
            editor.delete();
            true
        }
        KeyCode::Left => {
            editor.left();
            false
        }
        KeyCode::Right => {
            editor.right();
            false
        }
        KeyCode::Up => {
            editor.up(1);
            false
        }
        KeyCode::Down => {
            editor.down(1);
            false
        }
        KeyCode::PageUp => {
            editor.up(page);
            false
        }
        KeyCode::PageDown => {
            editor.down(page);
            false
        }
        KeyCode::Home => {
            editor.home();
            false
        }
        KeyCode::End => {
            editor.end();
            false
        }
        _ => false,
    };
    if edited {
        KeyAction::Dispatch(Action::EditCode(state.editor.text()))
    } else {
        KeyAction::Continue
    }
}

/// Applies a bracketed paste to whichever input has focus.
pub fn handle_paste(text: &str, state: &mut AppState, session: &Session) -> KeyAction {
    if state.mode != Mode::Normal || session.screen != Screen::Interview {
        return KeyAction::Continue;
    }
    match state.focus {
        Focus::ProblemInput => state.problem_input.insert_str(text),
        Focus::ChatInput => state.chat_input.insert_str(text),
        Focus::Editor => {
            state.editor.insert_str(text);
            return KeyAction::Dispatch(Action::EditCode(state.editor.text()));
        }
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

fn handle_feedback(key: KeyEvent, state: &mut AppState, session: &Session) -> KeyAction {
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            let related = session
                .feedback
                .as_deref()
                .map(related_for_display)
                .unwrap_or_default();
            let idx = c as usize - '1' as usize;
            match related.into_iter().nth(idx) {
                Some(problem) => {
                    state.feedback_scroll = 0;
                    state.focus = Focus::ChatInput;
                    KeyAction::Dispatch(Action::SelectRelatedProblem { id: problem.id })
                }
                None => KeyAction::Continue,
            }
        }
        KeyCode::Char('n') => {
            state.feedback_scroll = 0;
            state.focus = Focus::ProblemInput;
            KeyAction::Dispatch(Action::Reset)
        }
        KeyCode::Char('g') => KeyAction::Dispatch(Action::GenerateFeedback),
        KeyCode::Char('j') | KeyCode::Down => {
            state.feedback_scroll = state.feedback_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.feedback_scroll = state.feedback_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::PageDown => {
            state.feedback_scroll = state.feedback_scroll.saturating_add(10);
            KeyAction::Continue
        }
        KeyCode::PageUp => {
            state.feedback_scroll = state.feedback_scroll.saturating_sub(10);
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            state.mode = Mode::ConfirmQuit;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc | KeyCode::F(1) => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

/// `y` quits; `n` or `Esc` returns to Normal mode.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Click-to-focus on the interview inputs and wheel scrolling.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState, session: &Session) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if session.screen == Screen::Interview => {
            let pos = Position::new(mouse.column, mouse.row);
            let [problem, chat, editor] = state.focus_rects;
            if problem.contains(pos) {
                state.focus = Focus::ProblemInput;
            } else if chat.contains(pos) {
                state.focus = Focus::ChatInput;
            } else if editor.contains(pos) {
                state.focus = Focus::Editor;
            }
        }
        MouseEventKind::ScrollUp => match (state.mode, session.screen) {
            (Mode::HelpOverlay, _) => state.help_scroll = state.help_scroll.saturating_sub(3),
            (_, Screen::Feedback) => {
                state.feedback_scroll = state.feedback_scroll.saturating_sub(3);
            }
            _ => state.scroll_chat_up(3),
        },
        MouseEventKind::ScrollDown => match (state.mode, session.screen) {
            (Mode::HelpOverlay, _) => state.help_scroll = state.help_scroll.saturating_add(3),
            (_, Screen::Feedback) => {
                state.feedback_scroll = state.feedback_scroll.saturating_add(3);
            }
            _ => state.scroll_chat_down(3),
        },
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    fn edit(code: &str) -> KeyAction {
        KeyAction::Dispatch(Action::EditCode(code.into()))
    }

    fn type_text(text: &str, state: &mut AppState, session: &Session) {
        for c in text.chars() {
            handle_key(key(KeyCode::Char(c)), state, session);
        }
    }

    #[test]
    fn enter_in_problem_input_requests_problem() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        type_text("242", &mut state, &session);
        let action = handle_key(key(KeyCode::Enter), &mut state, &session);
        let request = Action::RequestProblem { text: "242".into() };
        assert_eq!(action, KeyAction::Dispatch(request));
        assert!(state.problem_input.is_blank());
        assert_eq!(state.focus, Focus::ChatInput);
    }

    #[test]
    fn blank_problem_input_does_nothing() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        type_text("  ", &mut state, &session);
        let action = handle_key(key(KeyCode::Enter), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
    }

    #[test]
    fn problem_request_keeps_draft_while_loading() {
        let mut session = Session::default();
        session.is_loading_problem = true;
        let mut state = AppState::new(&session.code);
        type_text("49", &mut state, &session);

        let action = handle_key(key(KeyCode::Enter), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
        assert_eq!(state.problem_input.text(), "49");
        assert_eq!(state.focus, Focus::ProblemInput);
        assert!(state.notice().is_some());

        session.is_loading_problem = false;
        let action = handle_key(key(KeyCode::Enter), &mut state, &session);
        let request = Action::RequestProblem { text: "49".into() };
        assert_eq!(action, KeyAction::Dispatch(request));
        assert!(state.problem_input.is_blank());
    }

    #[test]
    fn chat_send_keeps_draft_while_busy() {
        let mut session = Session::default();
        let mut state = AppState::new(&session.code);
        state.focus = Focus::ChatInput;
        type_text("hash map?", &mut state, &session);

        session.is_awaiting_assistant = true;
        let action = handle_key(key(KeyCode::Enter), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
        assert_eq!(state.chat_input.text(), "hash map?");
        assert!(state.notice().is_some());

        session.is_awaiting_assistant = false;
        let text = "hash map?".to_owned();
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state, &session),
            KeyAction::Dispatch(Action::SendMessage { text })
        );
        assert!(state.chat_input.is_blank());
    }

    #[test]
    fn editor_keys_report_edits() {
        let session = Session::default();
        let mut state = AppState::new("x");
        state.focus = Focus::Editor;
        let action = handle_key(key(KeyCode::Char('y')), &mut state, &session);
        assert_eq!(action, edit("xy"));
        let action = handle_key(key(KeyCode::Left), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
        let action = handle_key(key(KeyCode::Tab), &mut state, &session);
        assert_eq!(action, edit("x    y"));
    }

    #[test]
    fn esc_leaves_editor_then_asks_to_quit() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        state.focus = Focus::Editor;
        handle_key(key(KeyCode::Esc), &mut state, &session);
        assert_eq!(state.focus, Focus::ChatInput);
        assert_eq!(state.mode, Mode::Normal);
        handle_key(key(KeyCode::Esc), &mut state, &session);
        assert_eq!(state.mode, Mode::ConfirmQuit);
        let action = handle_key(key(KeyCode::Char('y')), &mut state, &session);
        assert_eq!(action, KeyAction::Quit);
    }

    #[test]
    fn ctrl_chords_map_to_session_actions() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        state.focus = Focus::ChatInput;
        assert_eq!(
            handle_key(ctrl('e'), &mut state, &session),
            KeyAction::Dispatch(Action::EvaluateCode)
        );
        assert_eq!(
            handle_key(ctrl('l'), &mut state, &session),
            KeyAction::Dispatch(Action::ChangeLanguage(Language::Python))
        );
        assert_eq!(
            handle_key(ctrl('r'), &mut state, &session),
            KeyAction::Dispatch(Action::Reset)
        );
        assert_eq!(
            handle_key(ctrl('f'), &mut state, &session),
            KeyAction::Dispatch(Action::CompleteInterview)
        );
        assert!(
            state.chat_input.is_blank(),
            "chords are not typed into the input"
        );
    }

    #[test]
    fn tab_cycles_focus_outside_editor() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        handle_key(key(KeyCode::Tab), &mut state, &session);
        assert_eq!(state.focus, Focus::ChatInput);
        handle_key(key(KeyCode::Tab), &mut state, &session);
        assert_eq!(state.focus, Focus::Editor);
        handle_key(key(KeyCode::BackTab), &mut state, &session);
        assert_eq!(state.focus, Focus::ChatInput);
    }

    #[test]
    fn language_picker_moves_and_confirms() {
        let mut session = Session::default();
        session.screen = Screen::LanguageSelect;
        let mut state = AppState::new(&session.code);
        handle_key(key(KeyCode::Down), &mut state, &session);
        handle_key(key(KeyCode::Down), &mut state, &session);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state, &session),
            KeyAction::Dispatch(Action::ChooseLanguage(Language::ALL[2]))
        );
        handle_key(key(KeyCode::Up), &mut state, &session);
        handle_key(key(KeyCode::Up), &mut state, &session);
        handle_key(key(KeyCode::Up), &mut state, &session);
        assert_eq!(state.language_cursor, Language::ALL.len() - 1);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state, &session),
            KeyAction::Dispatch(Action::ChooseLanguage(Language::JavaScript))
        );
    }

    #[test]
    fn feedback_numbers_select_related_problems() {
        let mut session = Session::default();
        session.screen = Screen::Feedback;
        let report = concat!(
            "Related Problems:\n",
            "1. **\"Two Sum\" (LeetCode 1)**\n",
            "2. **\"3Sum\" (LeetCode 15)**"
        );
        session.feedback = Some(report.into());
        let mut state = AppState::new(&session.code);
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state, &session),
            KeyAction::Dispatch(Action::SelectRelatedProblem { id: "15".into() })
        );
        let action = handle_key(key(KeyCode::Char('3')), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state, &session),
            KeyAction::Dispatch(Action::Reset)
        );
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let session = Session::default();
        let mut state = AppState::new(&session.code);
        handle_key(key(KeyCode::F(1)), &mut state, &session);
        assert_eq!(state.mode, Mode::HelpOverlay);
        let action = handle_key(ctrl('r'), &mut state, &session);
        assert_eq!(action, KeyAction::Continue);
        handle_key(key(KeyCode::Char('j')), &mut state, &session);
        assert_eq!(state.help_scroll, 1);
        handle_key(key(KeyCode::Esc), &mut state, &session);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn paste_into_editor_reports_edit() {
        let session = Session::default();
        let mut state = AppState::new("");
        state.focus = Focus::Editor;
        let action = handle_paste("a\nb", &mut state, &session);
        assert_eq!(action, edit("a\nb"));
    }
}
