//! Property-based tests for severity_logger using proptest

use proptest::prelude::*;
use severity_logger::prelude::*;
use std::collections::BTreeSet;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Emergency),
        Just(Level::Alert),
        Just(Level::Critical),
        Just(Level::Error),
        Just(Level::Warning),
        Just(Level::Notice),
        Just(Level::Info),
        Just(Level::Debug),
        Just(Level::Trace),
    ]
}

fn any_mask() -> impl Strategy<Value = LevelMask> {
    prop_oneof![
        Just(LevelMask::ALL),
        Just(LevelMask::empty()),
        any::<u32>().prop_map(LevelMask::from_bits_retain),
        prop::collection::vec(any_level(), 0..5).prop_map(|levels| {
            levels
                .into_iter()
                .fold(LevelMask::empty(), |mask, level| mask | level)
        }),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Every level is a single bit
    #[test]
    fn test_level_is_power_of_two(level in any_level()) {
        prop_assert!(level.bits().is_power_of_two());
        prop_assert_eq!(Level::from_bits(level.bits()), Some(level));
    }

    /// Level names parse back to the same level
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let parsed: Level = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        let lower: Level = level.to_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(level, lower);
    }
}

#[test]
fn test_level_aliases() {
    assert_eq!(Level::FATAL, Level::Emergency);
    assert_eq!(Level::WARN, Level::Warning);
    assert_eq!(LevelMask::FATAL, LevelMask::EMERGENCY);
    assert_eq!(LevelMask::WARN, LevelMask::WARNING);
    assert_eq!(LevelMask::ALL.bits(), u32::MAX);
}

// ============================================================================
// Mask Tests
// ============================================================================

proptest! {
    /// Display output parses back to the same bits
    #[test]
    fn test_mask_display_roundtrip(mask in any_mask()) {
        let rendered = mask.to_string();
        let parsed: LevelMask = rendered.parse().unwrap();
        prop_assert_eq!(mask.bits(), parsed.bits());
    }

    /// A mask built from levels contains exactly those levels
    #[test]
    fn test_mask_levels_match_inputs(levels in prop::collection::btree_set(any_level().prop_map(Level::bits), 0..9)) {
        let mask = levels
            .iter()
            .fold(LevelMask::empty(), |mask, bits| mask | LevelMask::from_bits_retain(*bits));

        let contained: BTreeSet<u32> = mask.levels().into_iter().map(Level::bits).collect();
        prop_assert_eq!(contained, levels);
    }
}

// ============================================================================
// Logger Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A message reaches every appender iff its level intersects the mask
    #[test]
    fn test_delivery_iff_mask_intersects(
        mask in any_mask(),
        levels in prop::collection::vec(any_level(), 1..20),
    ) {
        let logger = Logger::with_level(mask);
        let first = MemoryAppender::new();
        let second = MemoryAppender::new();
        let first_handle = first.handle();
        let second_handle = second.handle();
        logger.set_appender("first", first).unwrap();
        logger.set_appender("second", second).unwrap();

        for level in &levels {
            logger.log_text(*level, "message").unwrap();
        }

        let expected: Vec<Level> = levels
            .iter()
            .copied()
            .filter(|level| mask.bits() & level.bits() != 0)
            .collect();
        prop_assert_eq!(first_handle.levels(), expected.clone());
        prop_assert_eq!(second_handle.levels(), expected);
    }

    /// Registered names are exactly the successful registrations
    #[test]
    fn test_registered_names_match_successes(names in prop::collection::vec("[a-d]{1,2}", 1..12)) {
        let logger = Logger::new();
        let mut accepted = Vec::new();

        for name in &names {
            match logger.set_appender(name.clone(), MemoryAppender::new()) {
                Ok(()) => accepted.push(name.clone()),
                Err(LoggerError::DuplicateAppender { name: rejected }) => {
                    prop_assert!(accepted.contains(&rejected));
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        let registered: Vec<String> = logger
            .get_appenders()
            .into_iter()
            .map(|info| info.name)
            .collect();
        prop_assert_eq!(registered, accepted);
    }

    /// Every appender is shut down exactly once however many were registered
    #[test]
    fn test_shutdown_hooks_run_once(count in 0usize..8) {
        let logger = Logger::new();
        let memory = MemoryAppender::new();
        let handle = memory.handle();
        for i in 0..count {
            logger.set_appender(format!("appender-{}", i), memory.labelled(i.to_string())).unwrap();
        }

        logger.shutdown().unwrap();
        prop_assert_eq!(handle.shutdown_count(), count);
    }
}
