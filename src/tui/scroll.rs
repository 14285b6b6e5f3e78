//! Scrollable text viewport shared by every pane that shows more lines
//! than fit.
//!
//! # Design
//!
//! A [`ScrollView`] never owns content. Callers pass the total line count
//! and viewport height when they render, and get back the range to draw.
//! While `follow` is set the view sticks to the bottom, so appended lines
//! scroll into view; scrolling up clears it and scrolling back to the end
//! restores it.

// Rust guideline compliant 2026-01

use std::ops::Range;

/// Viewport position over some line-addressed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollView {
    offset: usize,
    height: usize,
    follow: bool,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::following()
    }
}

impl ScrollView {
    /// View pinned to the bottom (logs, transcripts).
    pub fn following() -> Self {
        Self {
            offset: 0,
            height: 0,
            follow: true,
        }
    }

    /// View pinned to the top (editors, lists).
    pub fn top() -> Self {
        Self {
            offset: 0,
            height: 0,
            follow: false,
        }
    }

    /// First visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Height from the last render.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True while pinned to the bottom.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Visible range for `total` lines in `height` rows.
    pub fn window(&mut self, total: usize, height: usize) -> Range<usize> {
        self.height = height;
        let max = total.saturating_sub(height);
        if self.follow {
            self.offset = max;
        }
        self.offset = self.offset.min(max);
        self.offset..(self.offset + height).min(total)
    }

    /// Scroll towards the start.
    pub fn up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = false;
    }

    /// Scroll towards the end; reaching it resumes following.
    pub fn down(&mut self, lines: usize, total: usize) {
        let max = total.saturating_sub(self.height);
        self.offset = self.offset.saturating_add(lines).min(max);
        if self.offset >= max && self.height > 0 {
            self.follow = true;
        }
    }

    /// Jump to the first line.
    pub fn to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    /// Jump to the end and follow.
    pub fn to_bottom(&mut self) {
        self.follow = true;
    }

    /// Adjust minimally so `row` is inside the viewport.
    pub fn ensure_visible(&mut self, row: usize) {
        self.follow = false;
        if row < self.offset {
            self.offset = row;
        } else if self.height > 0 && row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
    }

    /// Rows for one page, at least one.
    pub fn page(&self) -> usize {
        self.height.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_following_sticks_to_bottom() {
        let mut view = ScrollView::following();
        assert_eq!(view.window(3, 10), 0..3);
        assert_eq!(view.window(25, 10), 15..25);
        assert_eq!(view.window(26, 10), 16..26);
    }

    #[test]
    fn test_scroll_up_stops_following() {
        let mut view = ScrollView::following();
        view.window(50, 10);
        view.up(5);
        assert!(!view.is_following());
        assert_eq!(view.window(60, 10), 35..45);

        view.down(100, 60);
        assert!(view.is_following());
        assert_eq!(view.window(61, 10), 51..61);
    }

    #[test]
    fn test_ensure_visible_minimal() {
        let mut view = ScrollView::top();
        view.window(100, 10);
        view.ensure_visible(5);
        assert_eq!(view.offset(), 0);
        view.ensure_visible(12);
        assert_eq!(view.offset(), 3);
        view.ensure_visible(1);
        assert_eq!(view.offset(), 1);
    }

    #[test]
    fn test_top_and_bottom() {
        let mut view = ScrollView::following();
        view.window(40, 10);
        view.to_top();
        assert_eq!(view.window(40, 10), 0..10);
        view.to_bottom();
        assert_eq!(view.window(40, 10), 30..40);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut view = ScrollView::top();
        view.window(100, 10);
        view.ensure_visible(90);
        assert_eq!(view.window(20, 10), 10..20);
    }
}
