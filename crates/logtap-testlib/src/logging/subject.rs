//! Fluent assertions over captured log records
//!
//! A [`LogRecordSubject`] wraps an optional record. When the record is absent,
//! every accessor reports a [`NO_LOG_RECORD`] failure and hands back an inert
//! sub-subject, so a chain such as
//! `subject.has_message_that().contains("x")` reports one meaningful failure
//! instead of a second, confusing one.
//!
//! Failures go through a [`Check`]: by default they panic like `assert!`,
//! with [`Check::Collect`] they are recorded in a [`FailureCollector`].

use logtap_logging::{CapturedError, Level, LogRecord, Param};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Fact reported when a subject has no record to check
pub const NO_LOG_RECORD: &str = "no log record";

/// One line of an assertion failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    key: String,
    value: Option<String>,
}

impl Fact {
    pub fn simple(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// A failed assertion, described by its facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    facts: Vec<Fact>,
}

impl AssertionFailure {
    pub fn new(facts: Vec<Fact>) -> Self {
        Self { facts }
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Whether any fact has the given key
    pub fn has_fact(&self, key: &str) -> bool {
        self.facts.iter().any(|f| f.key == key)
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fact) in self.facts.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", fact)?;
        }
        Ok(())
    }
}

/// Accumulates failures instead of panicking on the first one
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Mutex<Vec<AssertionFailure>>,
}

impl FailureCollector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, failure: AssertionFailure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }

    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.failures().is_empty()
    }

    /// Panic listing every collected failure, if there are any
    pub fn assert_none(&self) {
        let failures = self.failures();
        if failures.is_empty() {
            return;
        }
        let report: Vec<String> = failures.iter().map(ToString::to_string).collect();
        panic!(
            "{} assertion(s) failed:\n{}",
            failures.len(),
            report.join("\n---\n")
        );
    }
}

/// Where assertion failures go
#[derive(Clone, Debug, Default)]
pub enum Check {
    /// Panic with the failure message
    #[default]
    Panic,
    /// Record the failure and carry on
    Collect(Arc<FailureCollector>),
    /// Drop the failure; used for inert subjects
    Ignore,
}

impl Check {
    pub fn fail(&self, failure: AssertionFailure) {
        match self {
            Check::Panic => panic!("{}", failure),
            Check::Collect(collector) => collector.record(failure),
            Check::Ignore => {}
        }
    }

    fn fail_comparison(&self, expected: impl fmt::Display, actual: impl fmt::Display, label: &str) {
        self.fail(AssertionFailure::new(vec![
            Fact::new("expected", expected.to_string()),
            Fact::new("but was", actual.to_string()),
            Fact::new("value of", label),
        ]));
    }
}

/// Assertions about a single log record
#[derive(Debug, Clone)]
pub struct LogRecordSubject {
    check: Check,
    actual: Option<LogRecord>,
}

impl LogRecordSubject {
    /// Subject that panics on failure
    pub fn assert_that(actual: Option<LogRecord>) -> Self {
        Self::new(Check::Panic, actual)
    }

    pub fn new(check: Check, actual: Option<LogRecord>) -> Self {
        Self { check, actual }
    }

    pub fn actual(&self) -> Option<&LogRecord> {
        self.actual.as_ref()
    }

    fn should_exist_but_does_not(&self) {
        self.check
            .fail(AssertionFailure::new(vec![Fact::simple(NO_LOG_RECORD)]));
    }

    /// Check that the record exists
    pub fn exists(&self) {
        if self.actual.is_none() {
            self.should_exist_but_does_not();
        }
    }

    /// Subject for the record message
    pub fn has_message_that(&self) -> StringSubject {
        match &self.actual {
            Some(record) => StringSubject::new(
                self.check.clone(),
                "record.message()",
                record.message(),
            ),
            None => {
                self.should_exist_but_does_not();
                StringSubject::new(Check::Ignore, "record.message()", "")
            }
        }
    }

    /// Subject for the name of the logger the record was emitted for
    pub fn has_logger_that(&self) -> StringSubject {
        match &self.actual {
            Some(record) => StringSubject::new(
                self.check.clone(),
                "record.logger()",
                record.logger().as_str(),
            ),
            None => {
                self.should_exist_but_does_not();
                StringSubject::new(Check::Ignore, "record.logger()", "")
            }
        }
    }

    /// Subject for the record level
    pub fn has_level_that(&self) -> LevelSubject {
        match &self.actual {
            Some(record) => LevelSubject::new(self.check.clone(), Some(record.level())),
            None => {
                self.should_exist_but_does_not();
                LevelSubject::new(Check::Ignore, None)
            }
        }
    }

    /// Check that the record was emitted at `DEBUG`
    pub fn is_debug(&self) {
        self.has_level_that().is_equal_to(Level::DEBUG);
    }

    /// Check that the record was emitted at `ERROR`
    pub fn is_error(&self) {
        self.has_level_that().is_equal_to(Level::ERROR);
    }

    /// Subject for the record parameters
    pub fn has_parameters_that(&self) -> ParametersSubject {
        match &self.actual {
            Some(record) => ParametersSubject::new(self.check.clone(), record.params().to_vec()),
            None => {
                self.should_exist_but_does_not();
                ParametersSubject::new(Check::Ignore, Vec::new())
            }
        }
    }

    /// Subject for the error associated with the record
    pub fn has_error_that(&self) -> ErrorSubject {
        match &self.actual {
            Some(record) => ErrorSubject::new(self.check.clone(), record.error().cloned()),
            None => {
                self.should_exist_but_does_not();
                ErrorSubject::new(Check::Ignore, None)
            }
        }
    }
}

/// Assertions about a string property
#[derive(Debug, Clone)]
pub struct StringSubject {
    check: Check,
    label: &'static str,
    actual: String,
}

impl StringSubject {
    pub fn new(check: Check, label: &'static str, actual: impl Into<String>) -> Self {
        Self {
            check,
            label,
            actual: actual.into(),
        }
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }

    fn fail_with(&self, key: &str, expected: &str) {
        self.check.fail(AssertionFailure::new(vec![
            Fact::new(key, format!("{:?}", expected)),
            Fact::new("but was", format!("{:?}", self.actual)),
            Fact::new("value of", self.label),
        ]));
    }

    pub fn is_equal_to(&self, expected: &str) {
        if self.actual != expected {
            self.fail_with("expected", expected);
        }
    }

    pub fn contains(&self, part: &str) {
        if !self.actual.contains(part) {
            self.fail_with("expected to contain", part);
        }
    }

    pub fn does_not_contain(&self, part: &str) {
        if self.actual.contains(part) {
            self.fail_with("expected not to contain", part);
        }
    }

    pub fn starts_with(&self, prefix: &str) {
        if !self.actual.starts_with(prefix) {
            self.fail_with("expected to start with", prefix);
        }
    }

    pub fn ends_with(&self, suffix: &str) {
        if !self.actual.ends_with(suffix) {
            self.fail_with("expected to end with", suffix);
        }
    }

    pub fn is_empty(&self) {
        if !self.actual.is_empty() {
            self.fail_with("expected", "");
        }
    }
}

/// Assertions about a record level
#[derive(Debug, Clone)]
pub struct LevelSubject {
    check: Check,
    actual: Option<Level>,
}

impl LevelSubject {
    pub fn new(check: Check, actual: Option<Level>) -> Self {
        Self { check, actual }
    }

    fn actual_text(&self) -> String {
        self.actual
            .map(|l| l.to_string())
            .unwrap_or_else(|| "<none>".to_string())
    }

    pub fn is_equal_to(&self, expected: Level) {
        if self.actual != Some(expected) {
            self.check
                .fail_comparison(expected, self.actual_text(), "record.level()");
        }
    }

    pub fn is_not_equal_to(&self, unexpected: Level) {
        if self.actual == Some(unexpected) {
            self.check.fail(AssertionFailure::new(vec![
                Fact::new("expected not to be", unexpected.to_string()),
                Fact::new("value of", "record.level()"),
            ]));
        }
    }

    /// Check that the level is `minimum` or more severe
    pub fn is_at_least(&self, minimum: Level) {
        let ok = matches!(self.actual, Some(level) if level <= minimum);
        if !ok {
            self.check.fail(AssertionFailure::new(vec![
                Fact::new("expected at least", minimum.to_string()),
                Fact::new("but was", self.actual_text()),
                Fact::new("value of", "record.level()"),
            ]));
        }
    }
}

/// Assertions about record parameters
#[derive(Debug, Clone)]
pub struct ParametersSubject {
    check: Check,
    actual: Vec<Param>,
}

impl ParametersSubject {
    pub fn new(check: Check, actual: Vec<Param>) -> Self {
        Self { check, actual }
    }

    fn actual_text(&self) -> String {
        let parts: Vec<String> = self.actual.iter().map(ToString::to_string).collect();
        format!("[{}]", parts.join(", "))
    }

    fn fail_with(&self, key: &str, expected: String) {
        self.check.fail(AssertionFailure::new(vec![
            Fact::new(key, expected),
            Fact::new("but was", self.actual_text()),
            Fact::new("value of", "record.params()"),
        ]));
    }

    pub fn is_empty(&self) {
        if !self.actual.is_empty() {
            self.fail_with("expected", "[]".to_string());
        }
    }

    pub fn has_length(&self, expected: usize) {
        if self.actual.len() != expected {
            self.fail_with("expected length", expected.to_string());
        }
    }

    pub fn contains_key(&self, name: &str) {
        if !self.actual.iter().any(|p| p.name == name) {
            self.fail_with("expected to contain key", name.to_string());
        }
    }

    pub fn contains_entry(&self, name: &str, value: &str) {
        if !self.actual.iter().any(|p| p.name == name && p.value == value) {
            self.fail_with("expected to contain", Param::new(name, value).to_string());
        }
    }

    /// Check the parameter values, in order
    pub fn contains_exactly_values(&self, expected: &[&str]) {
        let values: Vec<&str> = self.actual.iter().map(|p| p.value.as_str()).collect();
        if values != expected {
            self.fail_with("expected exactly", format!("{:?}", expected));
        }
    }
}

/// Assertions about the error attached to a record
#[derive(Debug, Clone)]
pub struct ErrorSubject {
    check: Check,
    actual: Option<CapturedError>,
}

impl ErrorSubject {
    pub fn new(check: Check, actual: Option<CapturedError>) -> Self {
        Self { check, actual }
    }

    pub fn is_present(&self) {
        if self.actual.is_none() {
            self.check.fail(AssertionFailure::new(vec![
                Fact::simple("expected an error"),
                Fact::new("value of", "record.error()"),
            ]));
        }
    }

    pub fn is_absent(&self) {
        if let Some(error) = &self.actual {
            self.check.fail(AssertionFailure::new(vec![
                Fact::simple("expected no error"),
                Fact::new("but was", error.to_string()),
                Fact::new("value of", "record.error()"),
            ]));
        }
    }

    /// Subject for the error message
    pub fn has_message_that(&self) -> StringSubject {
        match &self.actual {
            Some(error) => {
                StringSubject::new(self.check.clone(), "record.error().message()", error.message())
            }
            None => {
                self.is_present();
                StringSubject::new(Check::Ignore, "record.error().message()", "")
            }
        }
    }

    /// Check that some error in the source chain has the given message
    pub fn has_source_with_message(&self, message: &str) {
        let Some(error) = &self.actual else {
            self.is_present();
            return;
        };
        if !error.sources().iter().any(|s| s == message) {
            self.check.fail(AssertionFailure::new(vec![
                Fact::new("expected a source with message", format!("{:?}", message)),
                Fact::new("but sources were", format!("{:?}", error.sources())),
                Fact::new("value of", "record.error().sources()"),
            ]));
        }
    }
}
