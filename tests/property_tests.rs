//! Property-based tests for the wire format, field maps, context scoping,
//! and the severity gate.

use lumber::core::encode::json_line;
use lumber::core::{FieldMap, FieldValue, Level, LogConfig, LogContext, LogEvent};
use proptest::prelude::*;

fn arb_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Trace),
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warn),
        Just(Level::Error),
    ]
}

fn arb_field_value() -> impl Strategy<Value = FieldValue> {
    let leaf = prop_oneof![
        Just(FieldValue::Null),
        any::<bool>().prop_map(FieldValue::Bool),
        any::<i64>().prop_map(FieldValue::Int),
        any::<f64>().prop_map(FieldValue::Float),
        "[a-zA-Z0-9 _.-]{0,20}".prop_map(FieldValue::from),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::Seq),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..4)
                .prop_map(|entries| FieldValue::Map(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_json_line_is_always_valid_single_line_json(
        message in ".{0,100}",
        logger_name in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
        level in arb_level(),
        keys in prop::collection::hash_set("f_[a-z]{1,8}", 0..6),
        value in arb_field_value(),
    ) {
        let mut fields = FieldMap::new();
        for key in keys {
            fields.insert(key, value.clone());
        }
        let event = LogEvent::new(level, message.clone(), logger_name.clone())
            .with_fields(fields);

        let line = json_line(&event);
        prop_assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(parsed["level"].as_str(), Some(level.to_str()));
        prop_assert_eq!(parsed["logger"].as_str(), Some(logger_name.as_str()));
        prop_assert_eq!(parsed["message"].as_str(), Some(message.as_str()));
        prop_assert!(parsed["timestamp"].as_str().is_some());
    }

    #[test]
    fn prop_field_map_preserves_first_insertion_order(
        entries in prop::collection::vec(("[a-z]{1,10}", any::<i64>()), 0..20),
    ) {
        let mut map = FieldMap::new();
        let mut expected_order: Vec<String> = Vec::new();
        for (key, value) in &entries {
            if !expected_order.iter().any(|k| k == key) {
                expected_order.push(key.clone());
            }
            map.insert(key.clone(), *value);
        }

        let actual_order: Vec<String> = map.iter().map(|(k, _)| k.to_string()).collect();
        prop_assert_eq!(actual_order, expected_order);

        // Last write wins
        if let Some((key, value)) = entries.last() {
            prop_assert_eq!(map.get(key), Some(&FieldValue::Int(*value)));
        }
    }

    #[test]
    fn prop_context_scope_restores_previous_mapping(
        outer in prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..5),
        inner in prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..5),
    ) {
        let outer_map: FieldMap = outer.into_iter().collect();
        let inner_map: FieldMap = inner.into_iter().collect();

        let (before, after) = LogContext::bind_all(outer_map).run(|| {
            let before = LogContext::current();
            LogContext::bind_all(inner_map).run(|| {
                // inner scope may shadow freely
            });
            (before, LogContext::current())
        });
        prop_assert_eq!(before, after);
        prop_assert!(LogContext::current().is_empty());
    }

    #[test]
    fn prop_effective_level_matches_longest_prefix_oracle(
        overrides in prop::collection::vec(
            ("[abc](\\.[abc]){0,3}", arb_level()),
            0..8,
        ),
        source in "[abc](\\.[abc]){0,4}",
        min_level in arb_level(),
    ) {
        let mut builder = LogConfig::builder().min_level(min_level);
        for (package, level) in &overrides {
            builder = builder.package_level(package.clone(), *level);
        }
        let config = builder.build().unwrap();

        // Independent oracle: scan every override for exact or dotted-prefix
        // coverage and keep the longest match. `>=` makes a repeated package
        // last-write-wins, matching the builder.
        let mut expected = min_level;
        let mut best_len = 0;
        for (package, level) in &overrides {
            let covers = source == *package
                || source.starts_with(&format!("{}.", package));
            if covers && package.len() >= best_len {
                best_len = package.len();
                expected = *level;
            }
        }

        prop_assert_eq!(config.effective_level(&source), expected);
    }

    #[test]
    fn prop_severity_gate_is_monotonic_without_sampling(
        min_level in arb_level(),
        level in arb_level(),
    ) {
        let config = LogConfig::builder().min_level(min_level).build().unwrap();
        prop_assert_eq!(config.is_enabled("app", level), level >= min_level);
    }

    #[test]
    fn prop_level_display_from_str_roundtrip(level in arb_level()) {
        prop_assert_eq!(level.to_string().parse::<Level>(), Ok(level));
    }
}
