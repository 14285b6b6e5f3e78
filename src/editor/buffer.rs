//! Line-addressed text buffer with cursor and breakpoints.
//!
//! Columns count `char`s, not bytes. After every mutation the cursor is
//! clamped to `[0, line_count) × [0, line_len]` and every breakpoint index
//! is inside `[0, line_count)`.

// Rust guideline compliant 2026-01

use std::collections::BTreeSet;

use crate::protocol::WindowSpec;

/// One editable or traced function body.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorWindow {
    /// Function or variable name.
    pub name: String,
    /// Interpreter window token.
    pub token: i64,
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    modified: bool,
    read_only: bool,
    tracer: bool,
    breakpoints: BTreeSet<usize>,
    current_line: Option<usize>,
}

impl EditorWindow {
    /// New writable window. An empty `lines` becomes one empty line.
    pub fn new(token: i64, name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            token,
            lines: non_empty(lines),
            cursor_row: 0,
            cursor_col: 0,
            modified: false,
            read_only: false,
            tracer: false,
            breakpoints: BTreeSet::new(),
            current_line: None,
        }
    }

    /// Build from an `OpenWindow` event.
    ///
    /// Breakpoints are seeded from the event's `stop` list; tracer windows
    /// start read-only with the cursor on the executing line.
    pub fn from_spec(spec: &WindowSpec) -> Self {
        let mut window = Self::new(spec.token, spec.name.clone(), spec.text.clone());
        window.tracer = spec.debugger;
        window.read_only = spec.debugger || spec.read_only;
        window.set_breakpoints(spec.stop.iter().copied());
        window.set_current_line(spec.current_row);
        if let Some(row) = window.current_line {
            window.cursor_row = row;
        }
        window
    }

    // === Accessors ===

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines, always at least one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of the cursor row.
    pub fn current_text(&self) -> &str {
        &self.lines[self.cursor_row]
    }

    /// `(row, col)` of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// True after any local edit since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Forget local modifications (after a successful save).
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// True when text mutations are refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Allow or refuse text mutations.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// True for windows showing a suspended frame.
    pub fn is_tracer(&self) -> bool {
        self.tracer
    }

    /// Switch between editor and tracer display.
    pub fn set_tracer(&mut self, tracer: bool) {
        self.tracer = tracer;
    }

    /// Breakpoint line indices, sorted.
    pub fn breakpoints(&self) -> &BTreeSet<usize> {
        &self.breakpoints
    }

    /// True if `line` has a breakpoint.
    pub fn has_breakpoint(&self, line: usize) -> bool {
        self.breakpoints.contains(&line)
    }

    /// Line the interpreter is executing, if any.
    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    // === Remote updates ===

    /// Mark the executing line. Out-of-range lines clear the marker.
    pub fn set_current_line(&mut self, line: Option<usize>) {
        self.current_line = line.filter(|&l| l < self.lines.len());
    }

    /// Replace all text, as from an `UpdateWindow` event.
    ///
    /// Breakpoints past the new end are dropped and the cursor is clamped.
    pub fn set_text(&mut self, lines: Vec<String>) {
        self.lines = non_empty(lines);
        let count = self.lines.len();
        self.breakpoints.retain(|&line| line < count);
        self.current_line = self.current_line.filter(|&line| line < count);
        self.modified = false;
        self.clamp_cursor();
    }

    /// Replace the breakpoint set, discarding out-of-range lines.
    pub fn set_breakpoints(&mut self, lines: impl IntoIterator<Item = usize>) {
        let count = self.lines.len();
        self.breakpoints = lines.into_iter().filter(|&line| line < count).collect();
    }

    /// Toggle a breakpoint. Returns true if it is now set.
    ///
    /// Allowed on read-only windows; breakpoints are not text.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        if line >= self.lines.len() {
            return false;
        }
        if self.breakpoints.remove(&line) {
            false
        } else {
            self.breakpoints.insert(line);
            true
        }
    }

    // === Cursor movement ===

    /// Move the cursor, clamping to the text.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor_row = row;
        self.cursor_col = col;
        self.clamp_cursor();
    }

    /// Up one row.
    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_cursor();
        }
    }

    /// Down one row.
    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_cursor();
        }
    }

    /// Left one char, wrapping to the end of the previous line.
    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.row_len(self.cursor_row);
        }
    }

    /// Right one char, wrapping to the start of the next line.
    pub fn move_right(&mut self) {
        if self.cursor_col < self.row_len(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    /// Start of line.
    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    /// End of line.
    pub fn move_end(&mut self) {
        self.cursor_col = self.row_len(self.cursor_row);
    }

    /// Up `rows` rows.
    pub fn page_up(&mut self, rows: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(rows);
        self.clamp_cursor();
    }

    /// Down `rows` rows.
    pub fn page_down(&mut self, rows: usize) {
        self.cursor_row = self.cursor_row.saturating_add(rows);
        self.clamp_cursor();
    }

    // === Mutations ===

    /// Insert a character at the cursor. `'\n'` splits the line.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_line();
        }
        if self.read_only {
            return false;
        }
        let at = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(at, ch);
        self.cursor_col += 1;
        self.modified = true;
        true
    }

    /// Insert a string at the cursor, char by char.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.chars() {
            changed |= self.insert_char(ch);
        }
        changed
    }

    /// Backspace. At column 0 the line joins the previous one and any
    /// breakpoint on the removed line is dropped.
    pub fn delete_back(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.row_len(self.cursor_row);
            self.lines[self.cursor_row].push_str(&removed);
            self.lines_removed(self.cursor_row + 1);
        } else {
            return false;
        }
        self.modified = true;
        self.clamp_cursor();
        true
    }

    /// Delete at the cursor. At end of line the next line joins this one.
    pub fn delete_forward(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let len = self.row_len(self.cursor_row);
        if self.cursor_col < len {
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, self.cursor_col);
            line.remove(at);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            self.lines_removed(self.cursor_row + 1);
        } else {
            return false;
        }
        self.modified = true;
        self.clamp_cursor();
        true
    }

    /// Split the cursor line at the cursor; the cursor moves to the new line.
    pub fn split_line(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = byte_index(line, self.cursor_col);
        let tail = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, tail);
        self.lines_inserted(self.cursor_row + 1);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.modified = true;
        true
    }

    // === Internals ===

    fn row_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        self.cursor_col = self.cursor_col.min(self.row_len(self.cursor_row));
    }

    /// Line `at` was removed: drop its breakpoint and shift later ones up.
    fn lines_removed(&mut self, at: usize) {
        self.breakpoints = self
            .breakpoints
            .iter()
            .filter(|&&line| line != at)
            .map(|&line| if line > at { line - 1 } else { line })
            .collect();
        self.current_line = match self.current_line {
            Some(line) if line == at => None,
            Some(line) if line > at => Some(line - 1),
            other => other,
        };
    }

    /// A line was inserted at `at`: shift breakpoints at or after it down.
    fn lines_inserted(&mut self, at: usize) {
        self.breakpoints = self
            .breakpoints
            .iter()
            .map(|&line| if line >= at { line + 1 } else { line })
            .collect();
        self.current_line = self.current_line.map(|line| if line >= at { line + 1 } else { line });
    }
}

fn non_empty(lines: Vec<String>) -> Vec<String> {
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Byte offset of char column `col`, or the end of the line.
pub(crate) fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(lines: &[&str]) -> EditorWindow {
        EditorWindow::new(1, "f", lines.iter().map(|s| (*s).to_string()).collect())
    }

    #[test]
    fn test_empty_text_gets_one_line() {
        let w = EditorWindow::new(1, "f", Vec::new());
        assert_eq!(w.line_count(), 1);
        assert_eq!(w.cursor(), (0, 0));
    }

    #[test]
    fn test_insert_and_split() {
        let mut w = window(&["ab"]);
        w.set_cursor(0, 1);
        assert!(w.insert_char('⍳'));
        assert_eq!(w.lines()[0], "a⍳b");
        assert!(w.split_line());
        assert_eq!(w.lines(), &["a⍳".to_string(), "b".to_string()]);
        assert_eq!(w.cursor(), (1, 0));
        assert!(w.is_modified());
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut w = window(&["ab", "cd"]);
        w.set_cursor(1, 0);
        assert!(w.delete_back());
        assert_eq!(w.lines(), &["abcd".to_string()]);
        assert_eq!(w.cursor(), (0, 2));
        w.set_cursor(0, 0);
        assert!(!w.delete_back());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut w = window(&["ab", "cd"]);
        w.set_cursor(0, 2);
        assert!(w.delete_forward());
        assert_eq!(w.lines(), &["abcd".to_string()]);
        w.move_end();
        assert!(!w.delete_forward());
    }

    #[test]
    fn test_read_only_refuses_edits_but_allows_breakpoints() {
        let mut w = window(&["x", "y"]);
        w.set_read_only(true);
        assert!(!w.insert_char('z'));
        assert!(!w.split_line());
        assert!(!w.delete_back());
        assert!(!w.delete_forward());
        assert!(!w.is_modified());
        assert!(w.toggle_breakpoint(1));
        assert!(w.has_breakpoint(1));
    }

    #[test]
    fn test_breakpoint_toggle_twice_is_identity() {
        let mut w = window(&["a", "b", "c"]);
        w.set_breakpoints([0]);
        let before = w.breakpoints().clone();
        w.toggle_breakpoint(2);
        w.toggle_breakpoint(2);
        assert_eq!(w.breakpoints(), &before);
        assert!(!w.toggle_breakpoint(7));
    }

    #[test]
    fn test_breakpoints_follow_line_edits() {
        let mut w = window(&["a", "b", "c"]);
        w.set_breakpoints([1, 2]);

        // Split line 0: both move down.
        w.set_cursor(0, 1);
        w.split_line();
        assert_eq!(w.breakpoints().iter().copied().collect::<Vec<_>>(), vec![2, 3]);

        // Join line 2 ("b") into line 1: its breakpoint is dropped.
        w.set_cursor(2, 0);
        w.delete_back();
        assert_eq!(w.breakpoints().iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(w.lines()[2], "c");
    }

    #[test]
    fn test_set_text_prunes_breakpoints_and_clamps() {
        let mut w = window(&["a", "b", "c", "d"]);
        w.set_breakpoints([0, 3]);
        w.set_cursor(3, 1);
        w.set_text(vec!["only".into(), "two".into()]);
        assert_eq!(w.breakpoints().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(w.cursor(), (1, 1));
        assert!(!w.is_modified());
    }

    #[test]
    fn test_from_spec_tracer() {
        let spec = WindowSpec {
            token: 4,
            name: "B".into(),
            text: vec!["B".into(), "1".into(), "2".into()],
            debugger: true,
            stop: vec![1, 9],
            current_row: Some(2),
            read_only: false,
        };
        let w = EditorWindow::from_spec(&spec);
        assert!(w.is_tracer());
        assert!(w.is_read_only());
        assert_eq!(w.current_line(), Some(2));
        assert_eq!(w.cursor(), (2, 0));
        assert_eq!(w.breakpoints().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_cursor_invariant_under_random_edits() {
        let mut w = window(&["alpha", "", "βγ"]);
        let mut seed: u64 = 0x5eed;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            match (seed >> 33) % 9 {
                0 => {
                    w.insert_char('x');
                }
                1 => {
                    w.insert_char('⍴');
                }
                2 => {
                    w.delete_back();
                }
                3 => {
                    w.delete_forward();
                }
                4 => {
                    w.split_line();
                }
                5 => w.move_left(),
                6 => w.move_right(),
                7 => w.move_up(),
                _ => w.move_down(),
            }
            let (row, col) = w.cursor();
            assert!(row < w.line_count());
            assert!(col <= w.lines()[row].chars().count());
            assert!(w.breakpoints().iter().all(|&b| b < w.line_count()));
        }
    }
}
