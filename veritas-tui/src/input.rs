use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// What a key press means to the UI, independent of current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    Newline,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ClearInput,
    ScrollUp(u16),
    ScrollDown(u16),
    Ignore,
}

/// Enter submits. Shift+Enter inserts a newline; Alt+Enter and Ctrl-J do the
/// same for terminals that cannot report Shift on Enter.
pub fn classify_key(key: &KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
        KeyCode::Char('j') if ctrl => KeyAction::Newline,
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            KeyAction::Newline
        }
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::PageUp => KeyAction::ScrollUp(5),
        KeyCode::PageDown => KeyAction::ScrollDown(5),
        KeyCode::Up => KeyAction::ScrollUp(1),
        KeyCode::Down => KeyAction::ScrollDown(1),
        KeyCode::Left => KeyAction::Left,
        KeyCode::Right => KeyAction::Right,
        KeyCode::Home => KeyAction::Home,
        KeyCode::End => KeyAction::End,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Delete => KeyAction::Delete,
        KeyCode::Esc => KeyAction::ClearInput,
        KeyCode::Char(ch) if !ctrl => KeyAction::Insert(ch),
        _ => KeyAction::Ignore,
    }
}

/// Multi-line claim editor. `cursor` is a byte offset that always sits on a
/// char boundary.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Replace the contents and park the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.text = normalize_newlines(text);
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert pasted text; CR and CRLF become `\n`.
    pub fn insert_str(&mut self, s: &str) {
        let s = normalize_newlines(s);
        self.text.insert_str(self.cursor, &s);
        self.cursor += s.len();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        while self.cursor > 0 && !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn right(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        self.cursor += 1;
        while self.cursor < self.text.len() && !self.text.is_char_boundary(self.cursor) {
            self.cursor += 1;
        }
    }

    /// Start of the current line.
    pub fn home(&mut self) {
        self.cursor = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
    }

    /// End of the current line.
    pub fn end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut prev = self.cursor.saturating_sub(1);
        while prev > 0 && !self.text.is_char_boundary(prev) {
            prev -= 1;
        }
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let start = self.cursor;
        let mut end = start + 1;
        while end < self.text.len() && !self.text.is_char_boundary(end) {
            end += 1;
        }
        self.text.drain(start..end);
    }

    /// Caret position as (line, display column) for terminal placement.
    /// Both saturate at `u16::MAX`.
    pub fn caret(&self) -> (u16, u16) {
        let before = &self.text[..self.cursor];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = UnicodeWidthStr::width(&before[line_start..]);
        (
            u16::try_from(row).unwrap_or(u16::MAX),
            u16::try_from(col).unwrap_or(u16::MAX),
        )
    }
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn enter_submits_and_modified_enter_inserts_newline() {
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyAction::Submit
        );
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::SHIFT)),
            KeyAction::Newline
        );
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::ALT)),
            KeyAction::Newline
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            KeyAction::Newline
        );
    }

    #[test]
    fn control_chords_quit_and_are_not_typed() {
        assert_eq!(
            classify_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            KeyAction::Ignore
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            KeyAction::Insert('Q')
        );
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut release = key(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(classify_key(&release), KeyAction::Ignore);
    }

    #[test]
    fn editing_respects_char_boundaries() {
        let mut input = InputBuffer::default();
        for ch in "héllo".chars() {
            input.insert_char(ch);
        }
        input.left();
        input.left();
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.text(), "éllo");
        input.delete();
        assert_eq!(input.text(), "llo");
        input.right();
        input.insert_char('!');
        assert_eq!(input.text(), "l!lo");
    }

    #[test]
    fn home_and_end_stay_on_the_current_line() {
        let mut input = InputBuffer::default();
        input.set("first\nsecond line");
        input.home();
        assert_eq!(input.caret(), (1, 0));
        input.insert_char('>');
        input.end();
        assert_eq!(input.caret(), (1, 12));
        assert_eq!(input.text(), "first\n>second line");
        assert_eq!(input.line_count(), 2);
    }

    #[test]
    fn paste_normalizes_carriage_returns() {
        let mut input = InputBuffer::default();
        input.insert_str("a\r\nb\rc");
        assert_eq!(input.text(), "a\nb\nc");
        assert_eq!(input.caret(), (2, 1));
    }

    #[test]
    fn caret_saturates_on_huge_paste() {
        let mut input = InputBuffer::default();
        input.insert_str(&"x\n".repeat(70_000));
        assert_eq!(input.caret(), (u16::MAX, 0));
    }

    #[test]
    fn caret_column_uses_display_width() {
        let mut input = InputBuffer::default();
        input.set("日本");
        assert_eq!(input.caret(), (0, 4));
    }

    #[test]
    fn blank_detection_ignores_whitespace_and_newlines() {
        let mut input = InputBuffer::default();
        assert!(input.is_blank());
        input.insert_str("  \n\t");
        assert!(input.is_blank());
        input.insert_char('x');
        assert!(!input.is_blank());
        input.clear();
        assert_eq!(input.text(), "");
    }
}
