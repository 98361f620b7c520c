//! Reading session state: text, font size, pages and the current page

use crate::pagination::{build_pages, paginate, FontSize, Page};
use crate::resume::{resume_to_checkpoint, ResumeTarget};
use lexiread_config::ReaderConfig;
use lexiread_core::Checkpoint;
use serde::Serialize;
use std::time::Duration;

const RESUME_HIGHLIGHT: Duration = Duration::from_secs(15);

/// Direction of the most recent page turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    #[default]
    None,
    Forward,
    Backward,
}

impl PageDirection {
    fn from_delta(delta: isize) -> Self {
        match delta.signum() {
            1 => PageDirection::Forward,
            -1 => PageDirection::Backward,
            _ => PageDirection::None,
        }
    }
}

/// One open story in the reader
///
/// Pages are recomputed whenever the text or font size changes, and the
/// current page is pulled back inside the new page count.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    text: String,
    font: FontSize,
    font_step: u8,
    pages: Vec<Page>,
    current: usize,
    direction: PageDirection,
    highlight_duration: Duration,
}

impl ReadingSession {
    pub fn new(text: impl Into<String>, font: FontSize) -> Self {
        let text = text.into();
        let pages = build_pages(&text, font);
        Self {
            text,
            font,
            font_step: 5,
            pages,
            current: 0,
            direction: PageDirection::None,
            highlight_duration: RESUME_HIGHLIGHT,
        }
    }

    /// Opens `text` with the configured font size, step and resume highlight
    pub fn from_config(text: impl Into<String>, config: &ReaderConfig) -> Self {
        let mut session = Self::new(text, FontSize::new(config.default_font_size));
        session.font_step = config.font_size_step;
        session.highlight_duration = Duration::from_secs(config.resume_highlight_secs);
        session
    }

    /// How long a resumed word stays highlighted before it is cleared
    pub fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> FontSize {
        self.font
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        // build_pages never returns an empty list and `current` is kept in range
        &self.pages[self.current]
    }

    pub fn direction(&self) -> PageDirection {
        self.direction
    }

    pub fn is_first_page(&self) -> bool {
        self.current == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current + 1 >= self.pages.len()
    }

    /// Replaces the story text and reflows
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.reflow();
    }

    /// Changes the font size and reflows
    pub fn set_font_size(&mut self, font: FontSize) {
        if font == self.font {
            return;
        }
        self.font = font;
        self.reflow();
    }

    pub fn increase_font(&mut self) {
        self.set_font_size(self.font.step(i16::from(self.font_step)));
    }

    pub fn decrease_font(&mut self) {
        self.set_font_size(self.font.step(-i16::from(self.font_step)));
    }

    /// Turns `delta` pages; returns false when the move would leave the story
    pub fn paginate(&mut self, delta: isize) -> bool {
        let target = paginate(self.current, delta, self.pages.len());
        if target == self.current {
            return false;
        }
        self.current = target;
        self.direction = PageDirection::from_delta(delta);
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.paginate(1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginate(-1)
    }

    /// Jumps to a page, clamped into range
    pub fn go_to(&mut self, page: usize) {
        self.current = page.min(self.pages.len().saturating_sub(1));
        self.direction = PageDirection::None;
    }

    /// Checkpoint marking a word on the current page for the next visit
    ///
    /// Returns None if the page has no such word.
    pub fn mark_position(&self, word_index: usize) -> Option<Checkpoint> {
        (word_index < self.current_page().word_count())
            .then(|| Checkpoint::marked(self.current, word_index))
    }

    /// Snapshot of the current page, written when the reader leaves
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::at_page(self.current)
    }

    /// Moves to a saved checkpoint and returns where the reader landed
    pub fn resume(&mut self, checkpoint: &Checkpoint) -> ResumeTarget {
        let target = resume_to_checkpoint(&self.pages, checkpoint);
        self.go_to(target.page_index);
        target
    }

    fn reflow(&mut self) {
        self.pages = build_pages(&self.text, self.font);
        if self.current >= self.pages.len() {
            self.current = self.pages.len().saturating_sub(1);
            self.direction = PageDirection::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> String {
        (0..6)
            .map(|i| vec![format!("w{}", i); 100].join(" "))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_new_session_starts_on_first_page() {
        let session = ReadingSession::new(story(), FontSize::new(100));
        assert_eq!(session.page_count(), 6);
        assert_eq!(session.current_index(), 0);
        assert!(session.is_first_page());
        assert_eq!(session.direction(), PageDirection::None);
    }

    #[test]
    fn test_paginate_records_direction() {
        let mut session = ReadingSession::new(story(), FontSize::new(100));
        assert!(session.next_page());
        assert_eq!(session.direction(), PageDirection::Forward);
        assert!(session.previous_page());
        assert_eq!(session.direction(), PageDirection::Backward);
        assert!(!session.previous_page());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_font_change_clamps_current_page() {
        let mut session = ReadingSession::new(story(), FontSize::new(100));
        session.go_to(5);
        assert!(session.is_last_page());

        session.set_font_size(FontSize::new(1));
        assert_eq!(session.page_count(), 2);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_font_steps_from_config() {
        let config = ReaderConfig {
            default_font_size: 98,
            font_size_step: 5,
            ..ReaderConfig::default()
        };
        let mut session = ReadingSession::from_config(story(), &config);
        session.increase_font();
        assert_eq!(session.font_size().value(), 100);
        session.decrease_font();
        assert_eq!(session.font_size().value(), 95);
    }

    #[test]
    fn test_highlight_duration_from_config() {
        assert_eq!(
            ReadingSession::new(story(), FontSize::new(20)).highlight_duration(),
            Duration::from_secs(15)
        );

        let config = ReaderConfig {
            resume_highlight_secs: 4,
            ..ReaderConfig::default()
        };
        let session = ReadingSession::from_config(story(), &config);
        assert_eq!(session.highlight_duration(), Duration::from_secs(4));
    }

    #[test]
    fn test_set_text_reflows() {
        let mut session = ReadingSession::new(story(), FontSize::new(100));
        session.go_to(4);
        session.set_text("short story");
        assert_eq!(session.page_count(), 1);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_page().text(), "short story");
    }

    #[test]
    fn test_mark_position() {
        let mut session = ReadingSession::new(story(), FontSize::new(100));
        session.next_page();

        let checkpoint = session.mark_position(42).expect("word exists");
        assert_eq!(checkpoint, Checkpoint::marked(1, 42));
        assert!(session.mark_position(100).is_none());
    }

    #[test]
    fn test_checkpoint_and_resume() {
        let mut session = ReadingSession::new(story(), FontSize::new(100));
        session.go_to(3);
        let saved = session.checkpoint();
        assert_eq!(saved, Checkpoint::at_page(3));

        let mut reopened = ReadingSession::new(story(), FontSize::new(100));
        let target = reopened.resume(&saved);
        assert_eq!(target.page_index, 3);
        assert_eq!(target.word_index, None);
        assert_eq!(reopened.current_index(), 3);
    }
}
