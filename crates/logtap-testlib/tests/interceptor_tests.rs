#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Interceptor Tests
//!
//! This test suite verifies capture and restoration around one logger.
//!
//! ## Scenarios Covered
//!
//! 1. Intercept then release restores level and parent-handler flag
//! 2. Captured records keep emission order
//! 3. Records before intercept and after release are excluded
//! 4. Records below the interception level are excluded
//! 5. Assertions are unavailable after release
//! 6. Dropping an interceptor releases the logger

mod common;

use common::{emit_info, unique_logger};
use logtap_testlib::{ErrorKind, Interceptor, Level, LevelFilter, Logger};
use proptest::prelude::*;

fn level_filter() -> impl Strategy<Value = LevelFilter> {
    prop_oneof![
        Just(LevelFilter::OFF),
        Just(LevelFilter::ERROR),
        Just(LevelFilter::WARN),
        Just(LevelFilter::INFO),
        Just(LevelFilter::DEBUG),
        Just(LevelFilter::TRACE),
    ]
}

proptest! {
    #[test]
    fn prop_release_restores_configuration(
        previous in proptest::option::of(level_filter()),
        use_parent in any::<bool>(),
        level in level_filter(),
    ) {
        let name = unique_logger("interceptor_tests.prop");
        let logger = Logger::get(name.as_str());
        logger.set_level(previous);
        logger.set_use_parent_handlers(use_parent);

        let mut interceptor = Interceptor::new(name.as_str(), level);
        interceptor.intercept().unwrap();
        prop_assert_eq!(logger.level(), Some(level));
        prop_assert!(!logger.use_parent_handlers());
        interceptor.release();

        prop_assert_eq!(logger.level(), previous);
        prop_assert_eq!(logger.use_parent_handlers(), use_parent);
        prop_assert!(logger.handlers().is_empty());
    }
}

#[test]
fn test_records_keep_emission_order() {
    // GIVEN an intercepted logger
    let name = unique_logger("interceptor_tests.order");
    let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::INFO);
    interceptor.intercept().unwrap();

    // WHEN several records are emitted
    emit_info(&name, &["first", "second", "third"]);
    Logger::get(name.as_str()).error("fourth");

    // THEN they are captured in order
    let log = interceptor.assert_log().unwrap();
    log.has_size(4);
    assert_eq!(log.text_output(), "first\nsecond\nthird\nfourth");
    log.record(3).is_error();
}

#[test]
fn test_records_outside_interception_are_excluded() {
    let name = unique_logger("interceptor_tests.window");
    let logger = Logger::get(name.as_str());
    logger.set_use_parent_handlers(false);
    let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::INFO);

    logger.info("before");
    interceptor.intercept().unwrap();
    logger.info("during");
    let log = interceptor.assert_log().unwrap();
    interceptor.release();
    logger.info("after");

    log.has_size(1);
    log.last_record().has_message_that().is_equal_to("during");
}

#[test]
fn test_fine_level_interception_excludes_finer_records() {
    // GIVEN an interceptor on "test.x" at debug level
    let mut interceptor = Interceptor::new("test.x", LevelFilter::DEBUG);
    interceptor.intercept().unwrap();

    // WHEN one record at debug and one at trace are emitted
    tracing::debug!(target: "test.x", "fine");
    tracing::trace!(target: "test.x", "finer");

    // THEN only the debug record is captured
    let log = interceptor.assert_log().unwrap();
    log.has_size(1);
    log.last_record().is_debug();
    log.last_record().has_message_that().is_equal_to("fine");
    log.last_record().has_logger_that().is_equal_to("test.x");
}

#[test]
fn test_intercept_enables_levels_below_inherited() {
    let mut interceptor = Interceptor::new("interceptor_tests.enable", LevelFilter::TRACE);
    interceptor.intercept().unwrap();

    tracing::trace!(target: "interceptor_tests.enable", retries = 3, "retrying");

    let log = interceptor.assert_log().unwrap();
    log.last_record().has_level_that().is_equal_to(Level::TRACE);
    log.last_record()
        .has_parameters_that()
        .contains_entry("retries", "3");
}

#[test]
fn test_assert_log_after_release_is_illegal_state() {
    let name = unique_logger("interceptor_tests.released");
    let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::INFO);
    interceptor.intercept().unwrap();
    interceptor.release();

    let err = interceptor.assert_log().err().unwrap();

    assert_eq!(err.kind(), ErrorKind::IllegalState);
    assert_eq!(err.code(), "ERR_ILLEGAL_STATE");
    assert!(err.to_string().contains("Please call `intercept()`"));
}

#[test]
fn test_release_twice_is_noop() {
    let name = unique_logger("interceptor_tests.twice");
    let logger = Logger::get(name.as_str());
    logger.set_level(Some(LevelFilter::WARN));
    let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::DEBUG);

    interceptor.intercept().unwrap();
    interceptor.release();
    interceptor.release();

    assert_eq!(logger.level(), Some(LevelFilter::WARN));
    assert!(logger.use_parent_handlers());
}

#[test]
fn test_interceptor_can_be_reused_after_release() {
    let name = unique_logger("interceptor_tests.reuse");
    let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::INFO);

    interceptor.intercept().unwrap();
    emit_info(&name, &["one"]);
    interceptor.release();

    interceptor.intercept().unwrap();
    emit_info(&name, &["two"]);

    let log = interceptor.assert_log().unwrap();
    log.has_size(1);
    log.first_record().has_message_that().is_equal_to("two");
}

#[test]
fn test_drop_releases_logger() {
    let name = unique_logger("interceptor_tests.drop");
    let logger = Logger::get(name.as_str());

    {
        let mut interceptor = Interceptor::new(name.as_str(), LevelFilter::DEBUG);
        interceptor.intercept().unwrap();
        assert_eq!(logger.handlers().len(), 1);
    }

    assert_eq!(logger.level(), None);
    assert!(logger.use_parent_handlers());
    assert!(logger.handlers().is_empty());
}

#[test]
fn test_error_field_is_captured() {
    let mut interceptor = Interceptor::new("interceptor_tests.error", LevelFilter::INFO);
    interceptor.intercept().unwrap();

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
    tracing::error!(
        target: "interceptor_tests.error",
        error = &err as &(dyn std::error::Error + 'static),
        "startup failed"
    );

    let log = interceptor.assert_log().unwrap();
    log.last_record()
        .has_error_that()
        .has_message_that()
        .contains("config missing");
}
