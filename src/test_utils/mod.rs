//! Shared test utilities for the vault and its driver.

pub mod fixtures;
pub mod logging;

pub use fixtures::{StateFixture, VaultFixture};
pub use logging::{TestLogger, init_test_tracing};

/// One row of a table-driven test.
#[derive(Debug, Clone)]
pub struct Case<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run every case through `test_fn`, logging input and outcome.
pub fn run_cases<I, E, F>(cases: Vec<Case<I, E>>, mut test_fn: F)
where
    I: std::fmt::Debug,
    E: std::fmt::Debug + PartialEq,
    F: FnMut(&I) -> E,
{
    for case in cases {
        let started = std::time::Instant::now();
        println!("[CASE] {} input={:?}", case.name, case.input);

        let actual = test_fn(&case.input);
        assert_eq!(actual, case.expected, "case '{}' failed", case.name);

        println!("[CASE] {} ok ({:?})", case.name, started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_cases_checks_each_row() {
        let mut seen = 0;
        run_cases(
            vec![
                Case {
                    name: "double one",
                    input: 1_u64,
                    expected: 2_u64,
                },
                Case {
                    name: "double zero",
                    input: 0,
                    expected: 0,
                },
            ],
            |n| {
                seen += 1;
                n * 2
            },
        );
        assert_eq!(seen, 2);
    }
}
