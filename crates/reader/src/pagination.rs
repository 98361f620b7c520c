//! Word-budget pagination
//!
//! Page capacity is measured in words and shrinks linearly as the font
//! grows: 300 words at size 1, 120 words at size 100. Paragraphs are never
//! split across pages; a paragraph larger than the capacity gets a page of
//! its own.

use serde::Serialize;

/// Font size on the reader's 1-100 slider scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 20;

    /// Creates a font size, clamping to the slider range
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Moves the size by `delta`, staying inside the slider range
    pub fn step(&self, delta: i16) -> Self {
        let next = (i16::from(self.0) + delta).clamp(i16::from(Self::MIN), i16::from(Self::MAX));
        // Clamped into 1..=100 above
        Self(next as u8)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for FontSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Word capacity of a page at the given font size
///
/// `round(300 - ((font - 1) / 99) * 180)`
pub fn words_per_page(font: FontSize) -> usize {
    let scaled = (f64::from(font.value()) - 1.0) / 99.0 * 180.0;
    (300.0 - scaled).round() as usize
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whitespace-separated words, in order
pub fn tokenize_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Splits text on runs of newlines, trimming each paragraph and dropping
/// blank ones
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// One page of story text
///
/// Paragraphs on a page are separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    text: String,
    word_count: usize,
}

impl Page {
    fn new(text: String, word_count: usize) -> Self {
        Self { text, word_count }
    }

    /// A page with no text
    pub fn empty() -> Self {
        Self::new(String::new(), 0)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Words on this page; index `i` here is the page-relative word index
    pub fn words(&self) -> std::str::SplitWhitespace<'_> {
        self.text.split_whitespace()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split("\n\n").filter(|p| !p.is_empty())
    }

    /// Returns the word at a page-relative index
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words().nth(index)
    }
}

/// Packs paragraphs into pages for the given font size
///
/// Always returns at least one page; empty text yields a single empty page.
pub fn build_pages(text: &str, font: FontSize) -> Vec<Page> {
    let capacity = words_per_page(font);
    let mut pages = Vec::new();
    let mut buffer = String::new();
    let mut buffer_words = 0;

    for paragraph in split_paragraphs(text) {
        let paragraph_words = word_count(paragraph);

        if buffer_words + paragraph_words > capacity && !buffer.is_empty() {
            pages.push(Page::new(std::mem::take(&mut buffer), buffer_words));
            buffer_words = 0;
        }

        if !buffer.is_empty() {
            buffer.push_str("\n\n");
        }
        buffer.push_str(paragraph);
        buffer_words += paragraph_words;
    }

    if !buffer.is_empty() {
        pages.push(Page::new(buffer, buffer_words));
    }

    if pages.is_empty() {
        pages.push(Page::empty());
    }

    log::debug!(
        "Paginated {} words into {} page(s) at font size {} ({} words/page)",
        word_count(text),
        pages.len(),
        font,
        capacity
    );

    pages
}

/// Moves from `current` by `delta` pages
///
/// Returns `current` unchanged when the target falls outside
/// `[0, count - 1]`.
pub fn paginate(current: usize, delta: isize, count: usize) -> usize {
    match current.checked_add_signed(delta) {
        Some(target) if target < count => target,
        _ => current,
    }
}
