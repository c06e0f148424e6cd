/// Property-Based Roundtrip Tests for the tagged format
///
/// Uses the `proptest` crate to generate random `Value` trees and verify that
/// `decode(encode(v)) == v` holds for all generated inputs.
///
/// Strategies generate:
/// - Random text (including every structural character and the escape character)
/// - Random integers across the full `i64` range
/// - Random finite reals (NaN is excluded because NaN != NaN)
/// - Random maps and sequences up to 4 levels deep, including empty ones
use proptest::prelude::*;
use tagcodec_core::{decode, encode, scan, Value};

// ============================================================================
// Strategies
// ============================================================================

/// Text biased towards the characters the format uses for structure.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        prop::string::string_regex("[a-z{}\\[\\]:,|\\\\ ]{0,16}").unwrap(),
        Just(String::new()),
        Just("N|None|".to_string()),
        Just("\\|".to_string()),
        Just("caf\u{00e9} \u{4f60}\u{597d}".to_string()),
        Just("line1\nline2".to_string()),
        any::<String>(),
    ]
}

/// Finite reals, whole and fractional.
fn arb_real() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        (-1_000_000i64..1_000_000i64).prop_map(|n| n as f64 / 100.0),
        Just(0.0),
        Just(-0.0),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_text().prop_map(Value::Text),
        any::<i64>().prop_map(Value::Integer),
        arb_real().prop_map(Value::Real),
        Just(Value::Null),
    ]
}

/// Recursive value trees. Map keys are unique by construction.
fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Sequence),
            prop::collection::vec((arb_text(), inner), 0..6)
                .prop_map(|pairs| pairs.into_iter().collect::<Value>()),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn decode_inverts_encode(v in arb_value()) {
        let text = encode(&v);
        let back = decode(&text).expect("encoded text must decode");
        prop_assert_eq!(back, v, "encoded: {}", text);
    }

    #[test]
    fn encode_is_deterministic(v in arb_value()) {
        prop_assert_eq!(encode(&v), encode(&v.clone()));
    }

    #[test]
    fn sequence_segments_match_element_count(items in prop::collection::vec(arb_value(), 1..8)) {
        let text = encode(&Value::Sequence(items.clone()));
        let payload = &text[2..text.len() - 1];
        let segments = scan::segments(payload, 2, ',').unwrap();
        prop_assert_eq!(segments.len(), items.len());
        for (seg, item) in segments.iter().zip(&items) {
            prop_assert_eq!(seg.text, encode(item));
        }
    }

    #[test]
    fn scalar_text_roundtrips_alone(s in arb_text()) {
        let v = Value::Text(s);
        prop_assert_eq!(decode(&encode(&v)).unwrap(), v);
    }

    #[test]
    fn garbage_never_panics(s in any::<String>()) {
        // Any result is fine; decoding must simply not panic.
        let _ = decode(&s);
    }
}
