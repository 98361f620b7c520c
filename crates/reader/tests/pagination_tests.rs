//! Page layout properties across font sizes

use lexiread_core::Checkpoint;
use lexiread_reader::{
    build_pages, split_paragraphs, words_per_page, FontSize, ReadingSession,
};

/// Deterministic text with paragraphs of varying length
fn sample_text() -> String {
    let lengths = [12, 250, 40, 3, 90, 310, 75, 8, 140, 60, 1, 199];
    lengths
        .iter()
        .enumerate()
        .map(|(p, &n)| {
            (0..n)
                .map(|w| format!("p{}w{}", p, w))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n\n")
}

#[test]
fn paragraphs_survive_pagination_in_order() {
    let text = sample_text();
    let expected = split_paragraphs(&text);

    for size in [1, 20, 37, 64, 100] {
        let pages = build_pages(&text, FontSize::new(size));
        let rejoined: Vec<&str> = pages.iter().flat_map(|page| page.paragraphs()).collect();
        assert_eq!(rejoined, expected, "font size {}", size);
    }
}

#[test]
fn pages_respect_capacity_unless_single_paragraph() {
    let text = sample_text();

    for size in FontSize::MIN..=FontSize::MAX {
        let font = FontSize::new(size);
        let capacity = words_per_page(font);
        for page in build_pages(&text, font) {
            assert!(
                page.word_count() <= capacity || page.paragraphs().count() == 1,
                "font {} page with {} words over capacity {}",
                size,
                page.word_count(),
                capacity
            );
        }
    }
}

#[test]
fn page_count_does_not_shrink_as_font_grows() {
    let text = sample_text();
    let mut previous = 0;
    for size in FontSize::MIN..=FontSize::MAX {
        let count = build_pages(&text, FontSize::new(size)).len();
        assert!(count >= previous);
        previous = count;
    }
}

#[test]
fn resume_after_font_change_keeps_reader_in_story() {
    let text = sample_text();
    let mut session = ReadingSession::new(text.clone(), FontSize::new(100));
    let last = session.page_count() - 1;
    session.go_to(last);
    let checkpoint = session
        .mark_position(0)
        .expect("last page has words");

    let mut reopened = ReadingSession::new(text, FontSize::new(1));
    let target = reopened.resume(&checkpoint);
    assert!(target.page_index < reopened.page_count());
    assert_eq!(reopened.current_index(), target.page_index);
    assert_eq!(target.word_index, Some(0));
}

#[test]
fn saved_checkpoint_json_matches_stored_layout() {
    let session = ReadingSession::new(sample_text(), FontSize::default());
    let json = serde_json::to_value(session.checkpoint()).expect("serializes");
    assert_eq!(
        json,
        serde_json::json!({"page_number": 0, "word_index": null, "show_highlight": false})
    );

    let marked: Checkpoint =
        serde_json::from_str(r#"{"page_number": 2, "word_index": 7, "show_highlight": true}"#)
            .expect("deserializes");
    assert_eq!(marked, Checkpoint::marked(2, 7));
}
