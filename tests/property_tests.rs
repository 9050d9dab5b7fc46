//! Property-based tests for the matching engine
//! Uses proptest to generate random values and check invariants that hold for any input

use conform_rs::{check, test, Pattern, TypeTag, Value};
use proptest::prelude::*;

// Strategy for generating scalar values
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 _$]{0,20}".prop_map(Value::from),
    ]
}

// Strategy for generating nested values
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|fields| Value::object(fields)),
        ]
    })
}

// Strategy for generating well-formed patterns
fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    let leaf = prop_oneof![
        Just(Pattern::string()),
        Just(Pattern::number()),
        Just(Pattern::boolean()),
        Just(Pattern::null()),
        Just(Pattern::integer()),
        Just(Pattern::identifier_string()),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Pattern::array_of),
            inner.clone().prop_map(Pattern::object_hash),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|fields| Pattern::object(fields)),
        ]
    })
}

fn kind_pattern(tag: TypeTag) -> Option<Pattern> {
    match tag {
        TypeTag::String => Some(Pattern::string()),
        TypeTag::Number => Some(Pattern::number()),
        TypeTag::Boolean => Some(Pattern::boolean()),
        TypeTag::Function => Some(Pattern::function()),
        TypeTag::Undefined => Some(Pattern::undefined()),
        TypeTag::Object => None,
    }
}

proptest! {
    #[test]
    fn test_any_accepts_everything(value in value_strategy()) {
        prop_assert!(check(&value, &Pattern::any()).is_ok());
    }

    #[test]
    fn test_optional_accepts_undefined(inner in pattern_strategy()) {
        prop_assert!(test(&Value::Undefined, &Pattern::optional(inner)).unwrap());
    }

    #[test]
    fn test_primitive_kind_matches_iff_tag(value in scalar_strategy()) {
        if let Some(pattern) = kind_pattern(value.type_of()) {
            prop_assert!(test(&value, &pattern).unwrap());
        }
        for tag in [TypeTag::String, TypeTag::Number, TypeTag::Boolean, TypeTag::Undefined] {
            if tag != value.type_of() {
                let pattern = kind_pattern(tag).unwrap();
                prop_assert!(!test(&value, &pattern).unwrap());
            }
        }
    }

    #[test]
    fn test_int32_values_are_integers(n in any::<i32>()) {
        prop_assert!(test(&Value::from(n), &Pattern::integer()).unwrap());
    }

    #[test]
    fn test_fractions_are_not_integers(n in -1.0e9f64..1.0e9, frac in 0.01f64..0.99) {
        let value = Value::from(n.trunc() + frac);
        prop_assert!(!test(&value, &Pattern::integer()).unwrap());
    }

    #[test]
    fn test_out_of_range_integers_are_rejected(n in 2_147_483_648i64..1_i64 << 52) {
        prop_assert!(!test(&Value::from(n as f64), &Pattern::integer()).unwrap());
        prop_assert!(!test(&Value::from(-(n as f64) - 1.0), &Pattern::integer()).unwrap());
    }

    #[test]
    fn test_test_agrees_with_check(value in value_strategy()) {
        let pattern = Pattern::object_including([("a", Pattern::array_of(Pattern::number()))]);
        prop_assert_eq!(test(&value, &pattern).unwrap(), check(&value, &pattern).is_ok());
    }

    #[test]
    fn test_array_of_any_accepts_every_array(
        items in prop::collection::vec(value_strategy(), 0..8)
    ) {
        prop_assert!(test(&Value::from(items), &Pattern::array_of(Pattern::any())).unwrap());
    }

    #[test]
    fn test_exact_object_rejects_every_extra_key(key in "[a-z]{1,8}", extra in "[A-Z]{1,8}") {
        let pattern = Pattern::object([(key.as_str(), Pattern::any())]);
        let value = Value::object([(key.as_str(), Value::Null), (extra.as_str(), Value::Null)]);

        let err = check(&value, &pattern).unwrap_err();
        let mismatch = err.as_mismatch().unwrap();
        prop_assert_eq!(mismatch.reason(), "Unknown key");
        prop_assert_eq!(mismatch.path(), Some(extra));
    }
}
