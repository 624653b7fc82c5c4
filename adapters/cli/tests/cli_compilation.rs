use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "nightfall"])
        .status()
        .expect("failed to invoke cargo check for the nightfall CLI binary");

    assert!(status.success(), "cargo check --bin nightfall should succeed");
}

#[test]
fn bundled_scenario_runs_to_completion() {
    let scenario = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/siege.toml");
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "run",
            "--quiet",
            "--bin",
            "nightfall",
            "--",
            "--config",
            scenario,
            "--nights",
            "3",
            "--defence",
            "40",
        ])
        .output()
        .expect("failed to invoke cargo run for the nightfall CLI binary");

    assert!(output.status.success(), "the bundled scenario should run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|line| line.starts_with("night")).count(), 3);
}
