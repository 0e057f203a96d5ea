//! Runtime invariant checks with a contract log.
//!
//! Production code asserts its invariants through [`assert_invariant!`]. Every
//! check is recorded per thread, so tests can verify afterwards that the code
//! path they drove actually exercised the invariants they care about.
//!
//! ```rust,ignore
//! use framegauge::invariants::contract_test;
//!
//! assert_invariant!(
//!     values.within_ranges(),
//!     "Published metrics stay within their clamp ranges",
//!     "engine::publish"
//! );
//!
//! #[test]
//! fn contract_publish() {
//!     // ... drive the engine ...
//!     contract_test("publish", &["Published metrics stay within their clamp ranges"]);
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

pub const METRICS_WITHIN_RANGES: &str = "Published metrics stay within their clamp ranges";
pub const READY_IS_AND_OF_FLAGS: &str = "Capture readiness equals the AND of all metric flags";
pub const DENSE_LEN_MATCHES_GEOMETRY: &str = "Dense luma length equals width times height";

thread_local! {
    static INVARIANT_LOG: RefCell<HashMap<String, u64>> = RefCell::new(HashMap::new());
}

/// Assert an invariant and record that it was checked.
///
/// # Panics
/// Panics if the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariants::__check_invariant($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariants::__check_invariant($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn __check_invariant(condition: bool, message: &str, context: Option<&str>) {
    INVARIANT_LOG.with(|log| {
        let mut log = log.borrow_mut();
        match log.get_mut(message) {
            Some(count) => *count += 1,
            None => {
                log.insert(message.to_string(), 1);
            }
        }
    });

    if !condition {
        panic!(
            "INVARIANT VIOLATION [{}]: {}",
            context.unwrap_or("unknown"),
            message
        );
    }
}

/// How many times an invariant was checked on this thread.
pub fn times_checked(message: &str) -> u64 {
    INVARIANT_LOG.with(|log| log.borrow().get(message).copied().unwrap_or(0))
}

/// Verify that the listed invariants were checked at least once on this thread.
///
/// # Panics
/// Panics naming every invariant that was never checked.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|invariant| times_checked(invariant) == 0)
        .collect();

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: invariants never checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

pub fn clear_invariant_log() {
    INVARIANT_LOG.with(|log| log.borrow_mut().clear());
}
