//! Descriptor artifacts exchanged with the external renderer.
//!
//! Two descriptors are written into the results directory before rendering
//! (`executor.json` and `environment.properties`); one durable record is
//! written next to the rendered report afterwards (`record.json`). The record
//! is the only artifact that survives retention pruning, so historical
//! outcomes stay queryable after a generation's bulk content is gone.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Durable outcome record kept even after a generation is pruned.
pub const RECORD_FILE: &str = "record.json";

const EXECUTOR_FILE: &str = "executor.json";
const ENVIRONMENT_FILE: &str = "environment.properties";

/// CI provenance the renderer stamps onto the rendered report.
pub struct ExecutorInfo {
    pub report_name: String,
    pub report_generation_id: String,
    pub build_order: u64,
    pub build_url: String,
    pub report_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecutorJson {
    report_name: String,
    // type is required, otherwise the renderer fails with a NullPointerException
    #[serde(rename = "type")]
    executor_type: String,
    name: String,
    build_name: String,
    build_url: String,
    // required to open the previous report from the trend chart
    report_url: String,
    build_order: u64,
}

pub fn write_executor_json(results_dir: &Path, info: &ExecutorInfo) -> Result<()> {
    let data = ExecutorJson {
        report_name: info.report_name.clone(),
        executor_type: "github".to_string(),
        name: "GitHub Actions".to_string(),
        build_name: format!("Run {}", info.report_generation_id),
        build_url: info.build_url.clone(),
        report_url: info.report_url.clone(),
        build_order: info.build_order,
    };
    write_json(&results_dir.join(EXECUTOR_FILE), &data)
}

/// Writes the flat `key=value` environment descriptor in slice order. Keys
/// and values are expected to be simple tokens; no escaping is applied.
pub fn write_environment_file(results_dir: &Path, entries: &[(String, String)]) -> Result<()> {
    let body = entries
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let path = results_dir.join(ENVIRONMENT_FILE);
    fs::write(&path, body).with_context(|| format!("write {}", path.display()))
}

/// Aggregate counts from the renderer's `widgets/summary.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Statistic {
    pub failed: u64,
    pub broken: u64,
    pub skipped: u64,
    pub passed: u64,
    pub unknown: u64,
    pub total: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timing {
    pub start: i64,
    pub stop: i64,
    pub duration: i64,
    pub min_duration: i64,
    pub max_duration: i64,
    pub sum_duration: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Summary {
    pub statistic: Statistic,
    #[serde(default)]
    pub time: Timing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestResult {
    Pass,
    Fail,
    Unknown,
}

impl TestResult {
    pub fn from_statistic(statistic: &Statistic) -> Self {
        if statistic.failed + statistic.broken > 0 {
            Self::Fail
        } else if statistic.passed > 0 {
            Self::Pass
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Fail => "❌",
            Self::Unknown => "❔",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of the record that are known before rendering.
pub struct RecordBase {
    pub repo_name: String,
    pub git_hash: String,
    pub branch_name: String,
    pub report_generation_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordJson {
    repo_name: String,
    git_hash: String,
    branch_name: String,
    report_generation_id: String,
    test_result: TestResult,
    summary: Summary,
}

/// Computed outcome handed back for pipeline output publication. `failed`
/// counts broken cases too, matching the derivation rule.
pub struct RecordOutcome {
    pub test_result: TestResult,
    pub passed: u64,
    pub failed: u64,
    pub total: u64,
}

/// Reads the renderer's summary output, derives the test result, and writes
/// `record.json` alongside the rendered report. A missing or malformed
/// summary is fatal: the render is considered incomplete.
pub fn write_record_json(report_dir: &Path, base: &RecordBase) -> Result<RecordOutcome> {
    let summary_path = report_dir.join("widgets").join("summary.json");
    let content = fs::read_to_string(&summary_path)
        .with_context(|| format!("read renderer summary {}", summary_path.display()))?;
    let summary: Summary = serde_json::from_str(&content)
        .with_context(|| format!("parse renderer summary {}", summary_path.display()))?;

    let test_result = TestResult::from_statistic(&summary.statistic);
    let outcome = RecordOutcome {
        test_result,
        passed: summary.statistic.passed,
        failed: summary.statistic.failed + summary.statistic.broken,
        total: summary.statistic.total,
    };
    let record = RecordJson {
        repo_name: base.repo_name.clone(),
        git_hash: base.git_hash.clone(),
        branch_name: base.branch_name.clone(),
        report_generation_id: base.report_generation_id.clone(),
        test_result,
        summary,
    };
    write_json(&report_dir.join(RECORD_FILE), &record)?;
    Ok(outcome)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize JSON")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn statistic(failed: u64, broken: u64, passed: u64) -> Statistic {
        Statistic {
            failed,
            broken,
            passed,
            skipped: 0,
            unknown: 0,
            total: failed + broken + passed,
        }
    }

    #[test]
    fn derives_fail_when_any_test_failed_or_broke() {
        assert_eq!(
            TestResult::from_statistic(&statistic(1, 0, 5)),
            TestResult::Fail
        );
        assert_eq!(
            TestResult::from_statistic(&statistic(0, 2, 5)),
            TestResult::Fail
        );
    }

    #[test]
    fn derives_pass_when_only_passed_tests_exist() {
        assert_eq!(
            TestResult::from_statistic(&statistic(0, 0, 5)),
            TestResult::Pass
        );
    }

    #[test]
    fn derives_unknown_when_nothing_ran() {
        assert_eq!(
            TestResult::from_statistic(&statistic(0, 0, 0)),
            TestResult::Unknown
        );
    }

    #[test]
    fn writes_executor_json_with_mandatory_type_field() {
        let dir = TempDir::new().expect("tempdir");
        let info = ExecutorInfo {
            report_name: "e2e".to_string(),
            report_generation_id: "abc_7_100".to_string(),
            build_order: 7,
            build_url: "https://ci.example/runs/7".to_string(),
            report_url: "https://pages.example/e2e/abc_7_100".to_string(),
        };
        write_executor_json(dir.path(), &info).expect("write");

        let raw = fs::read_to_string(dir.path().join("executor.json")).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("parse");
        assert_eq!(value["type"], "github");
        assert_eq!(value["buildName"], "Run abc_7_100");
        assert_eq!(value["buildOrder"], 7);
        assert_eq!(value["reportName"], "e2e");
    }

    #[test]
    fn writes_environment_file_in_insertion_order() {
        let dir = TempDir::new().expect("tempdir");
        let entries = vec![
            ("GitRepo".to_string(), "widget-factory".to_string()),
            ("BranchName".to_string(), "main".to_string()),
        ];
        write_environment_file(dir.path(), &entries).expect("write");

        let raw = fs::read_to_string(dir.path().join("environment.properties")).expect("read");
        assert_eq!(raw, "GitRepo=widget-factory\nBranchName=main");
    }

    #[test]
    fn writes_record_from_renderer_summary() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("widgets")).expect("mkdir");
        fs::write(
            dir.path().join("widgets").join("summary.json"),
            r#"{
                "reportName": "Allure Report",
                "statistic": {"failed":1,"broken":1,"skipped":2,"passed":5,"unknown":0,"total":9},
                "time": {"start":10,"stop":90,"duration":80,"minDuration":1,"maxDuration":40,"sumDuration":75}
            }"#,
        )
        .expect("write summary");

        let base = RecordBase {
            repo_name: "widget-factory".to_string(),
            git_hash: "abc".to_string(),
            branch_name: "main".to_string(),
            report_generation_id: "abc_7_100".to_string(),
        };
        let outcome = write_record_json(dir.path(), &base).expect("record");

        assert_eq!(outcome.test_result, TestResult::Fail);
        assert_eq!(outcome.passed, 5);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.total, 9);

        let raw = fs::read_to_string(dir.path().join(RECORD_FILE)).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("parse");
        assert_eq!(value["testResult"], "FAIL");
        assert_eq!(value["repoName"], "widget-factory");
        assert_eq!(value["summary"]["statistic"]["total"], 9);
        assert_eq!(value["summary"]["time"]["sumDuration"], 75);
    }

    #[test]
    fn missing_summary_is_fatal() {
        let dir = TempDir::new().expect("tempdir");
        let base = RecordBase {
            repo_name: "widget-factory".to_string(),
            git_hash: "abc".to_string(),
            branch_name: "main".to_string(),
            report_generation_id: "abc_7_100".to_string(),
        };
        assert!(write_record_json(dir.path(), &base).is_err());
    }
}
