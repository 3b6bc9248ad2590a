// system-tests/tests/suites/metrics_router_v3.rs
// ============================================================================
// Module: Metrics Router V3 Live Suite
// Description: Runs the metrics router suite against a configured service.
// Purpose: Verify every client operation against the real API.
// Dependencies: system-tests helpers, system-tests
// ============================================================================

//! Live metrics router suite. Configuration comes from
//! `METRICS_ROUTER_SYSTEM_TEST_CONFIG_FILE` or `metrics_router_v3.env` in the
//! workspace root; when neither exists every scenario is skipped.

use helpers::artifacts::TestReporter;
use system_tests::config::SystemTestConfig;
use system_tests::harness::RunContext;
use system_tests::suite::SuiteState;
use system_tests::suite::metrics_router_pipeline;

use crate::helpers;

#[test]
fn metrics_router_v3_suite() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("metrics_router_v3_suite")?;
    let config = SystemTestConfig::load()?;
    let config_file = config.config_file_or_default();

    let pipeline = metrics_router_pipeline()?;
    let state = SuiteState::new(&config_file).with_request_timeout(config.timeout);
    let mut context = RunContext::new(state);
    let report = pipeline.run(&mut context);
    let report_path = reporter.write_json("suite_report.json", &report)?;
    let artifacts = vec![report_path.display().to_string()];

    if report.all_skipped() {
        let reason = context.gate().skip_reason().unwrap_or("gate closed").to_string();
        reporter.finish("skipped", vec![reason], artifacts)?;
        return Ok(());
    }
    if let Err(failure) = report.ensure_success() {
        reporter.finish("fail", failure.failures.clone(), artifacts)?;
        return Err(failure.into());
    }
    reporter.finish(
        "pass",
        vec![format!("{} scenarios passed against {}", report.passed(), config_file.display())],
        artifacts,
    )?;
    Ok(())
}
