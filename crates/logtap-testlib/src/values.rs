//! Random values for test fixtures

use rand::Rng;
use uuid::Uuid;

/// A random string made of a freshly generated UUID
pub fn random_string() -> String {
    Uuid::new_v4().to_string()
}

/// A random string starting with `prefix`
pub fn random_string_with_prefix(prefix: &str) -> String {
    format!("{}{}", prefix, random_string())
}

/// A freshly generated UUID
pub fn new_uuid_value() -> Uuid {
    Uuid::new_v4()
}

/// A random integer in `[0, max)`
///
/// # Panics
///
/// Panics if `max` is not positive.
pub fn random(max: i32) -> i32 {
    random_between(0, max)
}

/// A random integer in `[min, max)`
///
/// # Panics
///
/// Panics if `min >= max`.
pub fn random_between(min: i32, max: i32) -> i32 {
    rand::thread_rng().gen_range(min..max)
}

/// A random long integer in `[min, max)`
///
/// # Panics
///
/// Panics if `min >= max`.
pub fn long_random(min: i64, max: i64) -> i64 {
    rand::thread_rng().gen_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_random_strings_differ() {
        assert_ne!(random_string(), random_string());
    }

    #[test]
    fn test_prefix_is_kept() {
        let value = random_string_with_prefix("order-");
        assert!(value.starts_with("order-"));
        assert!(value.len() > "order-".len());
    }

    #[test]
    fn test_uuid_value_is_v4() {
        assert_eq!(new_uuid_value().get_version_num(), 4);
    }

    #[test]
    fn test_single_value_range() {
        assert_eq!(random(1), 0);
        assert_eq!(long_random(7, 8), 7);
    }

    #[test]
    #[should_panic]
    fn test_empty_range_panics() {
        random_between(5, 5);
    }

    proptest! {
        #[test]
        fn prop_random_between_stays_in_range(min in -1000i32..1000, span in 1i32..1000) {
            let value = random_between(min, min + span);
            prop_assert!(value >= min && value < min + span);
        }

        #[test]
        fn prop_long_random_stays_in_range(min in -1_000_000i64..1_000_000, span in 1i64..1_000_000) {
            let value = long_random(min, min + span);
            prop_assert!(value >= min && value < min + span);
        }
    }
}
