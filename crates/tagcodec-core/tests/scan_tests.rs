//! Scanner state machine and segment splitting, independent of decoding.

use tagcodec_core::scan::{scalar_payload, segments, split_once, ScanState, Scanner, Step};
use tagcodec_core::CodecError;

/// Feed a whole string, returning every step.
fn run(input: &str) -> (Scanner, Vec<Step>) {
    let mut scanner = Scanner::new();
    let steps = input
        .char_indices()
        .map(|(i, ch)| scanner.step(i, ch).expect("scan failed"))
        .collect();
    (scanner, steps)
}

fn texts<'a>(segs: &[tagcodec_core::scan::Segment<'a>]) -> Vec<&'a str> {
    segs.iter().map(|s| s.text).collect()
}

// ============================================================================
// State transitions
// ============================================================================

#[test]
fn starts_scanning_container_at_depth_zero() {
    let scanner = Scanner::new();
    assert_eq!(scanner.state(), ScanState::ScanningContainer);
    assert_eq!(scanner.depth(), 0);
    assert!(scanner.finish(0).is_ok());
}

#[test]
fn tag_letter_enters_reading_tag() {
    let (scanner, _) = run("S");
    assert_eq!(scanner.state(), ScanState::ReadingTag('S'));
}

#[test]
fn scalar_opener_enters_delimited_scalar() {
    let (scanner, _) = run("S|");
    assert_eq!(
        scanner.state(),
        ScanState::ReadingDelimitedScalar { escaped: false }
    );
}

#[test]
fn backslash_sets_escape_flag() {
    let (scanner, _) = run("S|\\");
    assert_eq!(
        scanner.state(),
        ScanState::ReadingDelimitedScalar { escaped: true }
    );
    let (scanner, _) = run("S|\\|");
    assert_eq!(
        scanner.state(),
        ScanState::ReadingDelimitedScalar { escaped: false }
    );
}

#[test]
fn closing_delimiter_returns_to_container() {
    let (scanner, _) = run("S|abc|");
    assert_eq!(scanner.state(), ScanState::ScanningContainer);
}

#[test]
fn container_openers_track_depth() {
    let (scanner, _) = run("D{L[");
    assert_eq!(scanner.depth(), 2);
    let (scanner, _) = run("D{L[]");
    assert_eq!(scanner.depth(), 1);
    let (scanner, _) = run("D{L[]}");
    assert_eq!(scanner.depth(), 0);
}

#[test]
fn separators_reported_only_at_depth_zero() {
    let (_, steps) = run("I|1|,L[I|2|,I|3|]:N|x|");
    let seps: Vec<Step> = steps.into_iter().filter(|s| *s != Step::Payload).collect();
    assert_eq!(seps, vec![Step::Separator(','), Step::Separator(':')]);
}

#[test]
fn separators_inside_scalars_are_payload() {
    let (_, steps) = run("S|a,b:c|");
    assert!(steps.iter().all(|s| *s == Step::Payload));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn wrong_opener_for_tag_fails() {
    let mut scanner = Scanner::new();
    scanner.step(0, 'D').unwrap();
    let err = scanner.step(1, '[').unwrap_err();
    assert!(matches!(err, CodecError::Format { offset: 1, .. }));
}

#[test]
fn unknown_character_fails() {
    let mut scanner = Scanner::new();
    assert!(scanner.step(7, 'x').is_err());
}

#[test]
fn mismatched_closer_fails() {
    let mut scanner = Scanner::new();
    for (i, ch) in "L[".char_indices() {
        scanner.step(i, ch).unwrap();
    }
    assert!(scanner.step(2, '}').is_err());
}

#[test]
fn finish_rejects_open_state() {
    for input in ["D", "S|abc", "L[", "D{L[]"] {
        let (scanner, _) = run(input);
        assert!(scanner.finish(input.len()).is_err(), "{input:?} should not finish");
    }
}

// ============================================================================
// Segments
// ============================================================================

#[test]
fn empty_payload_has_no_segments() {
    assert!(segments("", 0, ',').unwrap().is_empty());
    assert!(segments("  ", 0, ',').unwrap().is_empty());
}

#[test]
fn single_segment() {
    let segs = segments("I|1|", 2, ',').unwrap();
    assert_eq!(texts(&segs), vec!["I|1|"]);
    assert_eq!(segs[0].offset, 2);
}

#[test]
fn nested_commas_do_not_split() {
    let segs = segments("L[I|1|,I|2|],D{S|a|:I|3|,S|b|:I|4|},S|x,y|", 0, ',').unwrap();
    assert_eq!(
        texts(&segs),
        vec!["L[I|1|,I|2|]", "D{S|a|:I|3|,S|b|:I|4|}", "S|x,y|"]
    );
}

#[test]
fn segment_offsets_are_absolute() {
    let segs = segments("I|1|,S|ab|,N|None|", 10, ',').unwrap();
    let offsets: Vec<usize> = segs.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![10, 15, 21]);
}

#[test]
fn segments_are_trimmed() {
    let segs = segments(" I|1| ,  I|2|", 0, ',').unwrap();
    assert_eq!(texts(&segs), vec!["I|1|", "I|2|"]);
    assert_eq!(segs[0].offset, 1);
    assert_eq!(segs[1].offset, 9);
}

#[test]
fn empty_segment_is_an_error() {
    assert!(segments("I|1|,,I|2|", 0, ',').is_err());
}

#[test]
fn colon_is_ignored_when_splitting_on_comma() {
    let segs = segments("S|a|:I|1|,S|b|:I|2|", 0, ',').unwrap();
    assert_eq!(texts(&segs), vec!["S|a|:I|1|", "S|b|:I|2|"]);
}

// ============================================================================
// Key/value split
// ============================================================================

#[test]
fn split_once_uses_first_top_level_colon() {
    let (k, v) = split_once("S|a:b|:D{S|c|:I|1|}", 4, ':').unwrap().unwrap();
    assert_eq!(k.text, "S|a:b|");
    assert_eq!(k.offset, 4);
    assert_eq!(v.text, "D{S|c|:I|1|}");
    assert_eq!(v.offset, 11);
}

#[test]
fn split_once_without_separator_is_none() {
    assert!(split_once("L[S|a|:I|1|]", 0, ':').unwrap().is_none());
}

#[test]
fn split_once_still_validates_the_rest() {
    assert!(split_once("S|a|:L[", 0, ':').is_err());
}

// ============================================================================
// Scalar payloads
// ============================================================================

#[test]
fn scalar_payload_strips_tag_and_delimiter() {
    assert_eq!(scalar_payload("S|hello|", 0).unwrap(), "hello");
    assert_eq!(scalar_payload("N|None|", 0).unwrap(), "None");
    assert_eq!(scalar_payload("S||", 0).unwrap(), "");
}

#[test]
fn scalar_payload_keeps_escapes() {
    assert_eq!(scalar_payload(r"S|a\|b|", 0).unwrap(), r"a\|b");
}

#[test]
fn scalar_payload_rejects_trailing_text() {
    match scalar_payload("I|1|2", 5) {
        Err(CodecError::Format { offset, .. }) => assert_eq!(offset, 9),
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn scalar_payload_rejects_unterminated() {
    assert!(scalar_payload("S|abc", 0).is_err());
    assert!(scalar_payload(r"S|abc\|", 0).is_err());
}
