//! Name completion.
//!
//! The interpreter supplies a universe of names; [`complete`] narrows it to
//! the case-sensitive prefix matches in lexicographic order. With several
//! matches an [`AutocompleteState`] drives the popup: a selection cursor
//! that wraps in both directions and a fixed-height window that follows it.

// Rust guideline compliant 2026-01

/// Maximum rows the popup shows at once.
pub const POPUP_VISIBLE_ROWS: usize = 10;

/// Outcome of a completion trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matches; leave the input alone.
    None,
    /// Exactly one match; replace the prefix immediately.
    Single(String),
    /// Several matches, sorted; open the popup.
    Many(Vec<String>),
}

/// Filter `universe` to names starting with `prefix`.
pub fn complete(prefix: &str, universe: &[String]) -> Completion {
    let mut matches: Vec<String> = universe
        .iter()
        .filter(|name| name.starts_with(prefix))
        .cloned()
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Completion::None,
        1 => Completion::Single(matches.remove(0)),
        _ => Completion::Many(matches),
    }
}

/// Characters that may appear in a name.
pub fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '∆' | '⍙' | '⎕' | '#')
}

/// Char column where the name ending at `col` starts.
pub fn name_start(line: &str, col: usize) -> usize {
    let before: Vec<char> = line.chars().take(col).collect();
    let run = before.iter().rev().take_while(|&&ch| is_name_char(ch)).count();
    before.len() - run
}

/// Glyph or name under char column `col`, else the one just before it.
///
/// A name is returned whole; any other non-blank char stands alone.
pub fn token_at(line: &str, col: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    let solid = |i: usize| chars.get(i).is_some_and(|ch| !ch.is_whitespace());
    let pos = if solid(col) {
        col
    } else {
        col.checked_sub(1).filter(|&i| solid(i))?
    };
    let ch = chars[pos];
    if !is_name_char(ch) {
        return Some(ch.to_string());
    }
    let back = chars[..pos].iter().rev().take_while(|&&c| is_name_char(c)).count();
    let ahead = chars[pos..].iter().take_while(|&&c| is_name_char(c)).count();
    Some(chars[pos - back..pos + ahead].iter().collect())
}

/// Popup state for a multi-candidate completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteState {
    anchor: usize,
    prefix_len: usize,
    candidates: Vec<String>,
    selected: usize,
    offset: usize,
    open: bool,
}

impl AutocompleteState {
    /// Open over `candidates` for a prefix of `prefix_len` chars starting at
    /// char column `anchor`. Selection starts at the first candidate.
    pub fn new(anchor: usize, prefix_len: usize, candidates: Vec<String>) -> Self {
        let open = !candidates.is_empty();
        Self {
            anchor,
            prefix_len,
            candidates,
            selected: 0,
            offset: 0,
            open,
        }
    }

    /// Column where the prefix begins.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Length of the prefix the selection replaces.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// All candidates in display order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Index of the highlighted candidate.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted candidate.
    pub fn selected(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }

    /// Whether the popup is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hide the popup.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Advance the selection, wrapping to the first after the last.
    pub fn next(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.candidates.len();
        self.follow_selection();
    }

    /// Move the selection back, wrapping to the last before the first.
    pub fn prev(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.candidates.len() - 1);
        self.follow_selection();
    }

    /// First visible index and the visible slice.
    pub fn visible(&self) -> (usize, &[String]) {
        let end = (self.offset + POPUP_VISIBLE_ROWS).min(self.candidates.len());
        (self.offset, &self.candidates[self.offset..end])
    }

    fn follow_selection(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + POPUP_VISIBLE_ROWS {
            self.offset = self.selected + 1 - POPUP_VISIBLE_ROWS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_prefix_filter_sorted() {
        let universe = names(&["alpine", "beta", "alpha", "Alps", "alphabet", "alpha"]);
        assert_eq!(
            complete("alp", &universe),
            Completion::Many(names(&["alpha", "alphabet", "alpine"]))
        );
    }

    #[test]
    fn test_single_and_none() {
        let universe = names(&["alpha", "beta"]);
        assert_eq!(complete("be", &universe), Completion::Single("beta".into()));
        assert_eq!(complete("zz", &universe), Completion::None);
        assert_eq!(complete("ALP", &universe), Completion::None);
    }

    #[test]
    fn test_name_start() {
        assert_eq!(name_start("x←alp", 5), 2);
        assert_eq!(name_start("⎕IO", 3), 0);
        assert_eq!(name_start("1+ ", 3), 3);
    }

    #[test]
    fn test_token_at() {
        assert_eq!(token_at("⍳", 1).as_deref(), Some("⍳"));
        assert_eq!(token_at("a⍴b", 1).as_deref(), Some("⍴"));
        assert_eq!(token_at("x←total+1", 4).as_deref(), Some("total"));
        assert_eq!(token_at("⎕IO", 3).as_deref(), Some("⎕IO"));
        assert_eq!(token_at("1  2", 2), None);
        assert_eq!(token_at("", 0), None);
    }

    #[test]
    fn test_wraparound_law() {
        let mut state = AutocompleteState::new(0, 3, names(&["a", "b", "c", "d"]));
        for _ in 0..4 {
            state.next();
        }
        assert_eq!(state.selected_index(), 0);

        state.prev();
        assert_eq!(state.selected(), Some("d"));
        state.next();
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn test_forward_then_backward_is_identity() {
        let mut state = AutocompleteState::new(0, 1, names(&["a", "b", "c"]));
        state.next();
        let before = state.clone();
        state.next();
        state.prev();
        assert_eq!(state, before);
    }

    #[test]
    fn test_window_follows_selection() {
        let candidates: Vec<String> = (1..=50).map(|n| format!("scr{n}")).collect();
        let mut state = AutocompleteState::new(0, 3, candidates);
        assert_eq!(state.visible().1.len(), POPUP_VISIBLE_ROWS);

        for _ in 0..12 {
            state.next();
        }
        let (start, rows) = state.visible();
        assert_eq!(start, 3);
        assert_eq!(rows.last().map(String::as_str), state.selected());

        for _ in 0..10 {
            state.prev();
        }
        assert_eq!(state.visible().0, 2);

        // Wrap backwards from the top lands on the last page.
        let mut state = AutocompleteState::new(0, 3, (0..50).map(|n| n.to_string()).collect());
        state.prev();
        assert_eq!(state.visible().0, 40);
    }
}
