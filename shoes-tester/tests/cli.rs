use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "shoes-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_careers_writes_output() {
    let exe = env!("CARGO_BIN_EXE_shoes-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-careers", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available careers"));
    assert!(content.contains("doctor"));
    assert!(content.contains("chaos"));
}

#[test]
fn cli_runs_expert_lawyer_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_shoes-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--careers",
            "lawyer",
            "--policies",
            "expert",
            "--report",
            "json",
            "--iterations",
            "1",
            "--seeds",
            "1,LW-GAVEL10",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Step Into My Shoes Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let json_end = content.rfind(']').expect("json array");
    let report: serde_json::Value =
        serde_json::from_str(&content[..=json_end]).expect("parse report");
    let scenarios = report.as_array().expect("array");
    assert_eq!(scenarios.len(), 2);
    assert!(scenarios.iter().all(|s| s["scenario_name"] == "lawyer/expert"));
    assert!(scenarios.iter().all(|s| s["passed"] == true));
}

#[test]
fn cli_rejects_unknown_career() {
    let exe = env!("CARGO_BIN_EXE_shoes-tester");
    let output = Command::new(exe)
        .args(["--careers", "astronaut", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("astronaut"));
}
