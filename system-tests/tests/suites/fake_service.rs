// system-tests/tests/suites/fake_service.rs
// ============================================================================
// Module: Fake Service Suite
// Description: Runs the metrics router suite against an in-process fake.
// Purpose: Exercise gating, links, aborts, and reporting without a live service.
// Dependencies: system-tests helpers, system-tests, tempfile
// ============================================================================

//! Metrics router suite runs against the fake service.

use std::path::Path;
use std::time::Duration;

use helpers::artifacts::TestReporter;
use helpers::fake_router::FakeRouter;
use helpers::fake_router::write_config;
use system_tests::harness::RunContext;
use system_tests::harness::ScenarioOutcome;
use system_tests::harness::SuiteReport;
use system_tests::suite::ConfigurationLoad;
use system_tests::suite::SuiteState;
use system_tests::suite::load_configuration;
use system_tests::suite::metrics_router_pipeline;

use crate::helpers;

/// Scenario names in execution order.
const EXPECTED_ORDER: [&str; 15] = [
    "load_configuration",
    "initialize_client",
    "create_target",
    "create_route",
    "list_targets",
    "get_target",
    "replace_target",
    "validate_target",
    "list_routes",
    "get_route",
    "replace_route",
    "get_settings",
    "replace_settings",
    "delete_route",
    "delete_target",
];

fn run_suite(config_path: &Path) -> Result<SuiteReport, Box<dyn std::error::Error>> {
    let pipeline = metrics_router_pipeline()?;
    let state = SuiteState::new(config_path).with_request_timeout(Some(Duration::from_secs(10)));
    let mut context = RunContext::new(state);
    Ok(pipeline.run(&mut context))
}

fn failed_error<'a>(report: &'a SuiteReport, name: &str) -> Option<&'a str> {
    match report.outcome(name) {
        Some(ScenarioOutcome::Failed {
            error,
        }) => Some(error.as_str()),
        _ => None,
    }
}

#[test]
fn full_suite_passes_against_fake_service() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("full_suite_passes_against_fake_service")?;
    let fake = FakeRouter::spawn()?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), fake.url())?;

    let report = run_suite(&config)?;
    let report_path = reporter.write_json("suite_report.json", &report)?;

    let names: Vec<&str> = report.scenarios.iter().map(|record| record.name.as_str()).collect();
    if names != EXPECTED_ORDER {
        return Err(format!("unexpected scenario order: {names:?}").into());
    }
    report.ensure_success()?;
    if report.passed() != EXPECTED_ORDER.len() {
        return Err(format!("expected 15 passes, got {}", report.passed()).into());
    }

    let requests = fake.requests();
    let operations: Vec<String> =
        requests.iter().map(|request| format!("{} {}", request.method, request.path)).collect();
    let expected = [
        "POST /api/v3/targets",
        "POST /api/v3/routes",
        "GET /api/v3/targets",
        "GET /api/v3/targets/target-1",
        "PUT /api/v3/targets/target-1",
        "POST /api/v3/targets/target-1/validate",
        "GET /api/v3/routes",
        "GET /api/v3/routes/route-2",
        "PUT /api/v3/routes/route-2",
        "GET /api/v3/settings",
        "PUT /api/v3/settings",
        "DELETE /api/v3/routes/route-2",
        "DELETE /api/v3/targets/target-1",
    ];
    if operations != expected {
        return Err(format!("unexpected request sequence: {operations:?}").into());
    }
    if !fake.target_ids().is_empty() || !fake.route_ids().is_empty() {
        return Err("suite left resources behind".into());
    }

    reporter.finish(
        "pass",
        vec!["all fifteen scenarios passed against the fake service".to_string()],
        vec![report_path.display().to_string()],
    )?;
    Ok(())
}

#[test]
fn linked_target_id_reaches_route_and_settings_bodies() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("linked_target_id_reaches_route_and_settings_bodies")?;
    let fake = FakeRouter::spawn()?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), fake.url())?;

    run_suite(&config)?.ensure_success()?;

    let requests = fake.requests();
    for (method, path) in [("POST", "/api/v3/routes"), ("PUT", "/api/v3/routes/route-2")] {
        let request = requests
            .iter()
            .find(|request| request.method == method && request.path == path)
            .ok_or_else(|| format!("missing {method} {path}"))?;
        let body: serde_json::Value = serde_json::from_str(&request.body)?;
        if body["rules"][0]["target_ids"] != serde_json::json!(["target-1"]) {
            return Err(format!("{method} {path} did not carry the linked target: {body}").into());
        }
    }
    let settings = requests
        .iter()
        .find(|request| request.method == "PUT" && request.path == "/api/v3/settings")
        .ok_or("missing settings replacement")?;
    let body: serde_json::Value = serde_json::from_str(&settings.body)?;
    if body["default_targets"] != serde_json::json!(["target-1"]) {
        return Err(format!("settings did not carry the linked target: {body}").into());
    }

    reporter.finish("pass", vec!["linked ids propagated".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn missing_configuration_skips_every_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("missing_configuration_skips_every_scenario")?;
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("metrics_router_v3.env");

    if !matches!(load_configuration(&config), ConfigurationLoad::Absent(_)) {
        return Err("absent file should not load".into());
    }
    let report = run_suite(&config)?;
    if !report.all_skipped() || report.skipped() != EXPECTED_ORDER.len() {
        return Err(format!("expected every scenario skipped: {report:?}").into());
    }
    report.ensure_success()?;
    let Some(ScenarioOutcome::Skipped {
        reason,
    }) = report.outcome("delete_target")
    else {
        return Err("delete_target should be skipped".into());
    };
    if !reason.contains("metrics_router_v3.env") {
        return Err(format!("skip reason should name the file: {reason}").into());
    }

    reporter.finish("pass", vec!["suite skipped cleanly".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn configuration_without_url_skips_without_requests() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("configuration_without_url_skips_without_requests")?;
    let fake = FakeRouter::spawn()?;
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("metrics_router_v3.env");
    std::fs::write(&config, "METRICS_ROUTER_AUTH_TYPE=noauth\n")?;

    let report = run_suite(&config)?;
    if !report.all_skipped() {
        return Err(format!("expected every scenario skipped: {report:?}").into());
    }
    if fake.request_count() != 0 {
        return Err("skipped suite must not contact the service".into());
    }

    reporter.finish("pass", vec!["url-less configuration skipped".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn unresolved_url_aborts_after_client_initialization() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("unresolved_url_aborts_after_client_initialization")?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), "https://{region}.metrics-router.cloud.ibm.com/api/v3")?;

    let report = run_suite(&config)?;
    if report.outcome("load_configuration") != Some(&ScenarioOutcome::Passed) {
        return Err("configuration should load".into());
    }
    if failed_error(&report, "initialize_client").is_none() {
        return Err("client initialization should fail".into());
    }
    if report.aborted() != 13 {
        return Err(format!("expected 13 aborted scenarios, got {}", report.aborted()).into());
    }
    let failure = report.ensure_success().err().ok_or("suite should fail")?;
    if failure.failures.len() != 14 {
        return Err(format!("expected 14 reported failures, got {}", failure.failures.len()).into());
    }

    reporter.finish("pass", vec!["fatal failure aborted the run".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn operation_failure_stays_local() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("operation_failure_stays_local")?;
    let fake = FakeRouter::spawn_with_fault("get_target", 400)?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), fake.url())?;

    let report = run_suite(&config)?;
    let error = failed_error(&report, "get_target").ok_or("get_target should fail")?;
    if !error.contains("get_target") {
        return Err(format!("failure should name the operation: {error}").into());
    }
    if report.failed() != 1 || report.passed() != 14 {
        return Err(format!("expected one local failure: {report:?}").into());
    }
    if !fake.target_ids().is_empty() {
        return Err("cleanup should still run after a local failure".into());
    }

    reporter.finish("pass", vec!["injected fault stayed local".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn failed_producer_fails_its_consumers() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("failed_producer_fails_its_consumers")?;
    let fake = FakeRouter::spawn_with_fault("create_target", 400)?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), fake.url())?;

    let report = run_suite(&config)?;
    for name in ["load_configuration", "initialize_client", "list_targets", "list_routes", "get_settings"] {
        if report.outcome(name) != Some(&ScenarioOutcome::Passed) {
            return Err(format!("{name} does not depend on the target and should pass").into());
        }
    }
    for name in ["create_route", "get_target", "replace_settings", "delete_route", "delete_target"] {
        let error = failed_error(&report, name).ok_or_else(|| format!("{name} should fail"))?;
        if !error.contains("was never produced") {
            return Err(format!("{name} should fail on a missing link: {error}").into());
        }
    }
    if report.failed() != 10 {
        return Err(format!("expected 10 failures, got {}", report.failed()).into());
    }
    if fake.request_count() != 4 {
        return Err(format!("consumers must not reach the service: {:?}", fake.requests()).into());
    }

    reporter.finish("pass", vec!["missing links failed consumers".to_string()], Vec::new())?;
    Ok(())
}

#[test]
fn foreign_entity_fails_get_target() -> Result<(), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new("foreign_entity_fails_get_target")?;
    let fake = FakeRouter::spawn_with_foreign_target()?;
    let dir = tempfile::tempdir()?;
    let config = write_config(dir.path(), fake.url())?;

    let report = run_suite(&config)?;
    let error = failed_error(&report, "get_target").ok_or("get_target should fail")?;
    if !error.contains("returned id target-foreign, expected target-1") {
        return Err(format!("failure should name the mismatched id: {error}").into());
    }
    if report.failed() != 1 || report.passed() != 14 {
        return Err(format!("only get_target should fail: {report:?}").into());
    }

    reporter.finish("pass", vec!["foreign entity rejected".to_string()], Vec::new())?;
    Ok(())
}
