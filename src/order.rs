//! Execution ordering for test cases.
//!
//! Cases carrying the [`TEST_ORDER_TRAIT`] trait run in ascending order of
//! its value; cases without a usable value sort last. If no case carries
//! the trait, cases run in source-line order when every case knows its
//! line, otherwise in the order given. All sorts are stable, so ties keep
//! their original relative order.

/// Name of the trait that holds a case's explicit order value.
pub const TEST_ORDER_TRAIT: &str = "TestOrder";

/// What the orderer needs to know about a test case.
pub trait TestCaseInfo {
    /// Values recorded for the trait `name`, if the case has it.
    fn trait_values(&self, name: &str) -> Option<&[String]>;

    /// Line of the case in its source file, if known.
    fn line_number(&self) -> Option<u32>;
}

/// Order by explicit trait, falling back to source line, then to the input
/// order.
pub fn order_test_cases<T: TestCaseInfo>(mut cases: Vec<T>) -> Vec<T> {
    if cases
        .iter()
        .any(|case| case.trait_values(TEST_ORDER_TRAIT).is_some())
    {
        cases.sort_by_key(explicit_order);
    } else if cases.iter().all(|case| case.line_number().is_some()) {
        cases.sort_by_key(|case| case.line_number());
    }
    cases
}

/// Order by explicit trait only. Cases without it sort last.
pub fn order_by_trait<T: TestCaseInfo>(mut cases: Vec<T>) -> Vec<T> {
    cases.sort_by_key(explicit_order);
    cases
}

fn explicit_order<T: TestCaseInfo>(case: &T) -> i32 {
    case.trait_values(TEST_ORDER_TRAIT)
        .and_then(|values| values.first())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(i32::MAX)
}
