use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn hgtcov() -> Command {
    let mut cmd = Command::cargo_bin("hgtcov").unwrap();
    cmd.arg("--threads").arg("2");
    cmd
}

fn prefix(dir: &Path, name: &str) -> String {
    dir.join(name).to_str().unwrap().to_string()
}

fn sorted_lines(path: &str) -> Vec<String> {
    let mut lines: Vec<String> = fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

fn forward_args(cmd: &mut Command, prefix: &str) {
    cmd.args([
        "forward", "-n", "20", "-l", "200", "-g", "50", "-s", "5", "-r", "4", "-m", "1e-3",
        "--transfer", "1e-4", "-f", "20", "--maxl", "10", "--seed", "7", "--no-progress",
        "-p",
    ])
    .arg(prefix);
}

#[test]
fn test_forward_writes_outputs() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "fwd");

    let mut cmd = hgtcov();
    forward_args(&mut cmd, &prefix);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Forward replicates complete!"))
        .stdout(predicate::str::contains("Population Size: 20"))
        .stdout(predicate::str::contains("Random Seed: 7"));

    let d = fs::read_to_string(format!("{prefix}_d.csv")).unwrap();
    let lines: Vec<&str> = d.lines().collect();
    assert_eq!(lines[0], "replicate,ks,vd");
    assert_eq!(lines.len(), 5);

    // maxl 10 is raised to twice the fragment length
    let covs = fs::read_to_string(format!("{prefix}_covs.csv")).unwrap();
    let lines: Vec<&str> = covs.lines().collect();
    assert!(lines[0].starts_with("lag,scov_mean"));
    assert_eq!(lines.len(), 41);

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(format!("{prefix}_config.json")).unwrap())
            .unwrap();
    assert_eq!(config["maxl"], 40);
    assert_eq!(config["seed"], 7);
    assert_eq!(config["population"]["population_size"], 20);
}

#[test]
fn test_forward_seed_reproducible() {
    let temp = tempdir().unwrap();
    let first = prefix(temp.path(), "a");
    let second = prefix(temp.path(), "b");

    let mut cmd = hgtcov();
    forward_args(&mut cmd, &first);
    cmd.arg("--workers").arg("1").assert().success();

    let mut cmd = hgtcov();
    forward_args(&mut cmd, &second);
    cmd.arg("--workers").arg("3").assert().success();

    assert_eq!(
        sorted_lines(&format!("{first}_d.csv")),
        sorted_lines(&format!("{second}_d.csv"))
    );
}

#[test]
fn test_forward_from_config_file() {
    let temp = tempdir().unwrap();
    let first = prefix(temp.path(), "orig");
    let second = prefix(temp.path(), "again");

    let mut cmd = hgtcov();
    forward_args(&mut cmd, &first);
    cmd.assert().success();

    hgtcov()
        .args(["forward", "--no-progress", "--config"])
        .arg(format!("{first}_config.json"))
        .arg("-p")
        .arg(&second)
        .assert()
        .success()
        .stdout(predicate::str::contains("Population Size: 20"));

    assert_eq!(
        sorted_lines(&format!("{first}_d.csv")),
        sorted_lines(&format!("{second}_d.csv"))
    );
}

#[test]
fn test_forward_random_pairs() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "pairs");

    hgtcov()
        .args([
            "forward", "-n", "30", "-l", "100", "-g", "20", "--pairs", "15", "-r", "2", "-m",
            "1e-2", "--transfer", "0", "--maxl", "10", "--seed", "3", "--no-progress", "-p",
        ])
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Random Pairs: 15"));

    let d = fs::read_to_string(format!("{prefix}_d.csv")).unwrap();
    assert_eq!(d.lines().count(), 3);
}

#[test]
fn test_coalescent_writes_outputs() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "coal");

    hgtcov()
        .args([
            "coalescent", "-n", "50", "-l", "500", "-s", "3", "-r", "3", "-m", "1e-3",
            "--transfer", "1e-4", "-f", "20", "--maxl", "50", "--seed", "11", "--no-progress",
            "-p",
        ])
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Coalescent replicates complete!"))
        .stdout(predicate::str::contains("Generation Cap: 5000"));

    let d = fs::read_to_string(format!("{prefix}_d.csv")).unwrap();
    assert_eq!(d.lines().count(), 4);
    let covs = fs::read_to_string(format!("{prefix}_covs.csv")).unwrap();
    assert_eq!(covs.lines().count(), 51);

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(format!("{prefix}_config.json")).unwrap())
            .unwrap();
    assert_eq!(config["params"]["sample_size"], 3);
}

#[test]
fn test_coalescent_single_pair_variance_undefined() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "pair");

    hgtcov()
        .args([
            "coalescent", "-n", "20", "-l", "100", "-r", "2", "-m", "1e-2", "--transfer", "0",
            "--maxl", "5", "--seed", "5", "--no-progress", "-p",
        ])
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("VarD: undefined"));

    let d = fs::read_to_string(format!("{prefix}_d.csv")).unwrap();
    assert!(d.lines().skip(1).all(|line| line.ends_with(",NA")));
}

#[test]
fn test_trajectory_snapshots() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "traj");

    hgtcov()
        .args([
            "trajectory", "-n", "20", "-l", "100", "-g", "20", "--step", "5", "-s", "4", "-m",
            "1e-3", "--transfer", "0", "--maxl", "10", "--seed", "2", "--no-progress", "-p",
        ])
        .arg(&prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshots: 4"));

    let ks = fs::read_to_string(format!("{prefix}_ks.csv")).unwrap();
    let generations: Vec<&str> = ks
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(generations, ["5", "10", "15", "20"]);
    assert!(Path::new(&format!("{prefix}_covs.csv")).exists());
}

#[test]
fn test_kimura_requires_dna() {
    let temp = tempdir().unwrap();
    let prefix = prefix(temp.path(), "bad");

    hgtcov()
        .args([
            "forward", "--alphabet", "binary", "--kappa", "2.0", "-n", "10", "-l", "50", "-r",
            "1", "--no-progress", "-p",
        ])
        .arg(&prefix)
        .assert()
        .failure()
        .stderr(predicate::str::contains("four-state alphabet"));
}

#[test]
fn test_invalid_rate_rejected() {
    hgtcov()
        .args(["coalescent", "-m", "1.5", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid model parameters"));
}

#[test]
fn test_missing_config_file() {
    hgtcov()
        .args(["trajectory", "--config", "/nonexistent/run.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open config file"));
}

#[test]
fn test_unknown_alphabet_rejected() {
    hgtcov()
        .args(["forward", "--alphabet", "protein"])
        .assert()
        .failure();
}
