use log::info;

use crate::suite::TestOutcome;

const COMMON_ISSUES: [&str; 4] = [
    "WebSocket server not running",
    "Wrong port (should be 8080)",
    "Missing command handlers",
    "Incorrect response format",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: &'static str,
    pub outcome: TestOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    results: Vec<TestResult>,
}

impl SuiteReport {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["=".repeat(50), "Test Results Summary:".to_string()];
        for result in &self.results {
            let status = if result.outcome.passed {
                "✓ PASS"
            } else {
                "✗ FAIL"
            };
            lines.push(format!("  {}: {status}", result.name));
        }

        lines.push(String::new());
        lines.push(format!(
            "Overall: {}/{} tests passed",
            self.passed(),
            self.total()
        ));

        if self.all_passed() {
            lines.push("🎉 All tests passed! Your WebSocket implementation is correct!".to_string());
        } else {
            lines.push("❌ Some tests failed. Check the errors above.".to_string());
            lines.push(String::new());
            lines.push("Common issues:".to_string());
            lines.extend(COMMON_ISSUES.iter().map(|issue| format!("- {issue}")));
        }
        lines
    }

    pub fn log_summary(&self) {
        info!("");
        for line in self.summary_lines() {
            info!("{line}");
        }
    }
}
