//! Central UI state for cody.
//!
//! Everything the terminal needs beyond the session itself: which input has
//! focus, the two single-line inputs, the code editor's cursor, scroll offsets,
//! and the transient status notice. The session is owned by the controller in
//! `main.rs`; this struct never holds a copy of it.

use ratatui::layout::Rect;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Help overlay shown above all panels.
    HelpOverlay,
    /// Quit confirmation dialog.
    ConfirmQuit,
}

/// Which interview panel receives typed characters.
///
/// Cycle order: `ProblemInput` → `ChatInput` → `Editor` → `ProblemInput`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Problem id / URL line at the top of the left column.
    #[default]
    ProblemInput,
    ChatInput,
    Editor,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::ProblemInput => Focus::ChatInput,
            Focus::ChatInput => Focus::Editor,
            Focus::Editor => Focus::ProblemInput,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::ProblemInput => Focus::Editor,
            Focus::ChatInput => Focus::ProblemInput,
            Focus::Editor => Focus::ChatInput,
        }
    }
}

/// Byte offset of the `char_idx`-th character of `s` (or `s.len()`).
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// A single-line text input with a character cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    text: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl InputLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let at = byte_index(&self.text, self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Inserts pasted text; newlines become spaces.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = byte_index(&self.text, self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = byte_index(&self.text, self.cursor);
            self.text.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Empties the input and returns what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Indentation inserted by Tab in the editor.
pub const INDENT: &str = "    ";

/// Multi-line code buffer with a (row, column) cursor.
///
/// The session's `code` is the source of truth; the editor mirrors it and
/// reports every edit back as `Action::EditCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEditor {
    lines: Vec<String>,
    row: usize,
    /// Cursor column in characters.
    col: usize,
    /// First visible line.
    pub scroll: usize,
}

impl Default for CodeEditor {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
        }
    }
}

impl CodeEditor {
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::default();
        editor.set_text(text);
        editor
    }

    /// Replaces the buffer and moves the cursor to the end of the first line.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.row = 0;
        self.col = self.lines[0].chars().count();
        self.scroll = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    pub fn insert(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\r') {
            self.insert(c);
        }
    }

    pub fn indent(&mut self) {
        self.insert_str(INDENT);
    }

    /// Splits the line at the cursor, carrying the current indentation over.
    pub fn newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        let indent: String = line
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        self.col = indent.chars().count();
        self.row += 1;
        self.lines.insert(self.row, indent + &rest);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn up(&mut self, rows: usize) {
        self.row = self.row.saturating_sub(rows);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub fn down(&mut self, rows: usize) {
        self.row = (self.row + rows).min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// Adjusts `scroll` so the cursor row is inside a viewport of `height` rows.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
    }
}

/// How many logic ticks a status notice stays up (4 s at 250 ms).
const NOTICE_TICKS: u8 = 16;

/// All mutable UI state passed through every render cycle.
#[derive(Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    pub focus: Focus,

    pub problem_input: InputLine,
    pub chat_input: InputLine,
    pub editor: CodeEditor,

    /// Lines scrolled up from the bottom of the chat. Zero follows new messages.
    pub chat_scroll_back: u16,
    pub problem_scroll: u16,
    pub feedback_scroll: u16,
    pub help_scroll: u16,

    /// Highlighted row on the language-select screen.
    pub language_cursor: usize,

    /// Inner height of the editor, cached after each render.
    pub editor_viewport_height: u16,
    /// Inner height of the chat panel, cached after each render.
    pub chat_viewport_height: u16,

    /// Outer rects of [problem input, chat input, editor], cached for
    /// click-to-focus.
    pub focus_rects: [Rect; 3],

    notice: Option<String>,
    notice_ticks: u8,
}

impl AppState {
    /// A fresh UI showing `code` in the editor.
    pub fn new(code: &str) -> Self {
        Self {
            editor: CodeEditor::from_text(code),
            ..Self::default()
        }
    }

    /// Shows `text` in the status bar for a few seconds.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
        self.notice_ticks = NOTICE_TICKS;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Called on every logic tick; expires the status notice.
    pub fn on_tick(&mut self) {
        if self.notice_ticks > 0 {
            self.notice_ticks -= 1;
            if self.notice_ticks == 0 {
                self.notice = None;
            }
        }
    }

    /// Reloads the editor when the session's code was replaced from outside
    /// (template on load, language switch, reset).
    pub fn sync_editor(&mut self, code: &str) {
        if self.editor.text() != code {
            self.editor.set_text(code);
        }
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_add(lines);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll_back = self.chat_scroll_back.saturating_sub(lines);
    }

    /// Half the chat viewport, at least one line.
    pub fn chat_page(&self) -> u16 {
        (self.chat_viewport_height / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_line_edits_at_cursor() {
        let mut input = InputLine::default();
        input.insert_str("tw sum");
        input.home();
        input.right();
        input.right();
        input.insert('o');
        assert_eq!(input.text(), "two sum");
        input.end();
        input.backspace();
        assert_eq!(input.text(), "two su");
        assert_eq!(input.take(), "two su");
        assert_eq!(input.cursor(), 0);
        assert!(input.is_blank());
    }

    #[test]
    fn input_line_handles_multibyte_chars() {
        let mut input = InputLine::default();
        input.insert_str("héllo");
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.text(), "hélo");
    }

    #[test]
    fn pasted_newlines_become_spaces() {
        let mut input = InputLine::default();
        input.insert_str("two\nsum");
        assert_eq!(input.text(), "two sum");
    }

    #[test]
    fn editor_round_trips_text() {
        let text = "# Write your solution here\ndef solution():\n    pass\n    return";
        assert_eq!(CodeEditor::from_text(text).text(), text);
    }

    #[test]
    fn newline_keeps_indentation() {
        let mut editor = CodeEditor::from_text("def f():");
        editor.end();
        editor.newline();
        editor.indent();
        editor.insert_str("return 1");
        editor.newline();
        editor.insert('x');
        assert_eq!(editor.text(), "def f():\n    return 1\n    x");
        assert_eq!(editor.cursor(), (2, 5));
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut editor = CodeEditor::from_text("ab\ncd");
        editor.down(1);
        editor.home();
        editor.backspace();
        assert_eq!(editor.text(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn delete_at_line_end_joins_next() {
        let mut editor = CodeEditor::from_text("ab\ncd");
        editor.end();
        editor.delete();
        assert_eq!(editor.text(), "abcd");
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut editor = CodeEditor::from_text("long line\nx\nanother long line");
        editor.end();
        editor.down(1);
        assert_eq!(editor.cursor(), (1, 1));
        editor.down(10);
        assert_eq!(editor.cursor(), (2, 1));
        editor.up(10);
        assert_eq!(editor.cursor(), (0, 1));
    }

    #[test]
    fn scroll_follows_cursor() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut editor = CodeEditor::from_text(&text);
        editor.down(20);
        editor.scroll_to_cursor(10);
        assert_eq!(editor.scroll, 11);
        editor.up(15);
        editor.scroll_to_cursor(10);
        assert_eq!(editor.scroll, 5);
    }

    #[test]
    fn sync_editor_only_reloads_on_external_change() {
        let mut state = AppState::new("// Write your solution here");
        state.editor.insert('!');
        let edited = state.editor.text();
        state.sync_editor(&edited);
        assert_eq!(state.editor.cursor(), (0, 28));

        state.sync_editor("# Write your solution here");
        assert_eq!(state.editor.text(), "# Write your solution here");
    }

    #[test]
    fn notice_expires_after_ticks() {
        let mut state = AppState::default();
        state.set_notice("Start an interview first!");
        for _ in 0..NOTICE_TICKS - 1 {
            state.on_tick();
        }
        assert_eq!(state.notice(), Some("Start an interview first!"));
        state.on_tick();
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn focus_cycles_both_ways() {
        let focus = Focus::default();
        assert_eq!(focus.next().next().next(), focus);
        assert_eq!(focus.prev(), Focus::Editor);
    }
}
