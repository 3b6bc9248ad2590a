// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Per-test artifact directory and run summary.
// Purpose: Keep suite reports and a canonical summary beside each test run.
// Dependencies: system-tests, serde, serde_jcs
// ============================================================================

//! ## Overview
//! [`TestReporter`] owns one directory per test: the configured run root
//! joined with the test name, or a stamped directory under cargo's test temp
//! dir. JSON artifacts are written in JCS form so reruns diff cleanly.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use system_tests::config::SystemTestConfig;

/// Canonical `summary.json` content.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    test_name: &'a str,
    status: &'a str,
    duration_ms: u128,
    notes: Vec<String>,
    artifacts: Vec<String>,
}

/// Writes artifacts and the closing summary for one test.
#[derive(Debug)]
pub struct TestReporter {
    root: PathBuf,
    test_name: String,
    started: Instant,
}

impl TestReporter {
    /// Creates the artifact directory for `test_name`.
    pub fn new(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let root = config
            .run_root
            .unwrap_or_else(|| {
                let pid = std::process::id();
                PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(format!("metrics-router-{pid}"))
            })
            .join(test_name);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            test_name: test_name.to_string(),
            started: Instant::now(),
        })
    }

    /// Writes `value` as canonical JSON and returns its path.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes `summary.json` with the final status.
    pub fn finish(&self, status: &str, notes: Vec<String>, artifacts: Vec<String>) -> io::Result<()> {
        let summary = RunSummary {
            test_name: &self.test_name,
            status,
            duration_ms: self.started.elapsed().as_millis(),
            notes,
            artifacts,
        };
        self.write_json("summary.json", &summary).map(drop)
    }
}
