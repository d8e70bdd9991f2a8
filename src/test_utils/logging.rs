use std::sync::Once;
use std::time::Instant;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness writer.
///
/// Honors `RUST_LOG`; defaults to `skill_vault=debug`. Safe to call from
/// every test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skill_vault=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    steps: usize,
}

impl TestLogger {
    pub fn new(test_name: &str) -> Self {
        init_test_tracing();
        println!("\n{}", "=".repeat(60));
        println!("[TEST START] {test_name}");
        println!("{}", "=".repeat(60));
        Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            steps: 0,
        }
    }

    /// Log one numbered step of a scenario.
    pub fn step(&mut self, description: &str) {
        self.steps += 1;
        println!("[STEP {}] {description}", self.steps);
    }

    pub fn log_actual<T: std::fmt::Debug>(&self, label: &str, value: &T) {
        println!("[ACTUAL] {label}: {value:?}");
    }

    pub fn pass(&self) {
        println!(
            "[RESULT] {} PASSED after {} steps in {:?}",
            self.test_name,
            self.steps,
            self.start_time.elapsed()
        );
        println!("{}\n", "=".repeat(60));
    }
}
