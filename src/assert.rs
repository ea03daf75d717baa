//! Matcher protocol for test assertions.
use crate::error::Result;

pub trait SelfDescribing {
    /// Static description of what a passing value looks like.
    fn describe_expectation(&self) -> String;

    /// Explanation of the last failed match. Only meaningful after
    /// `matches` returned `Ok(false)`.
    fn describe_mismatch(&self) -> String;
}

pub trait Matcher<T: ?Sized>: SelfDescribing {
    /// Structural failures surface as `Err`; a failed match is `Ok(false)`.
    fn matches(&mut self, actual: &T) -> Result<bool>;
}

/// Panics with a hamcrest-style message when `actual` does not match.
#[track_caller]
pub fn assert_that<T: ?Sized, M: Matcher<T>>(actual: &T, mut matcher: M) {
    match matcher.matches(actual) {
        Ok(true) => {}
        Ok(false) => panic!("{}", failure_message(&matcher)),
        Err(error) => panic!("{error}"),
    }
}

pub fn failure_message<M: SelfDescribing + ?Sized>(matcher: &M) -> String {
    format!(
        "\nExpected: {}\n     but: {}",
        matcher.describe_expectation(),
        matcher.describe_mismatch()
    )
}
