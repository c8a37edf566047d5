use ludo_cli::run;
use std::fs;
use std::path::{Path, PathBuf};

fn run_args(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(args, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

fn simulate(dir: &Path, name: &str, games: &str, seed: &str) -> PathBuf {
    let path = dir.join(name);
    let (code, _, err) = run_args(&[
        "ludo",
        "sim",
        "--games",
        games,
        "--seed",
        seed,
        "--players",
        "2",
        "--turn-limit",
        "20000",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "sim failed: {}", err);
    path
}

#[test]
fn replay_verifies_simulated_games() {
    let dir = tempfile::tempdir().unwrap();
    let path = simulate(dir.path(), "games.jsonl", "3", "21");
    let (code, out, err) = run_args(&["ludo", "replay", "--input", path.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr={}", err);
    assert!(out.contains("Replayed: 3 games, 0 mismatches"));
}

#[test]
fn replay_reports_tampered_moves() {
    let dir = tempfile::tempdir().unwrap();
    let path = simulate(dir.path(), "games.jsonl", "2", "8");
    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let game_id = lines[1]["game_id"].as_str().unwrap().to_string();
    lines[1]["moves"].as_array_mut().unwrap().pop();
    let tampered: String = lines.iter().map(|v| format!("{}\n", v)).collect();
    fs::write(&path, tampered).unwrap();

    let (code, out, err) = run_args(&["ludo", "replay", "--input", path.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(out.contains("Replayed: 1 games, 1 mismatches"));
    assert!(err.contains(&game_id), "stderr={}", err);
}

#[test]
fn replay_show_prints_one_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = simulate(dir.path(), "games.jsonl", "1", "2");
    let content = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    let game_id = value["game_id"].as_str().unwrap();
    let moves = value["moves"].as_array().unwrap().len();

    let (code, out, _) = run_args(&[
        "ludo",
        "replay",
        "--input",
        path.to_str().unwrap(),
        "--show",
        game_id,
    ]);
    assert_eq!(code, 0);
    assert!(out.starts_with(&format!("Game {} (2 players, seed 2)", game_id)));
    assert!(out.contains("Winner: P"));
    // header, one line per move, result line
    assert_eq!(out.lines().count(), moves + 2);

    let (code, _, err) = run_args(&[
        "ludo",
        "replay",
        "--input",
        path.to_str().unwrap(),
        "--show",
        "missing",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("Game missing not found"));
}

#[test]
fn replay_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("none.jsonl");
    let (code, _, err) = run_args(&["ludo", "replay", "--input", missing.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(err.contains("Failed to read"));
}

#[test]
fn stats_aggregates_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = simulate(dir.path(), "games.jsonl", "4", "30");
    let (code, out, err) = run_args(&["ludo", "stats", "--input", path.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr={}", err);
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["games"], 4);
    assert_eq!(summary["unfinished"], 0);
    let wins: u64 = summary["wins"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(wins, 4);
    assert!(summary["avg_moves"].as_f64().unwrap() > 0.0);
}

#[test]
fn stats_walks_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("day2");
    fs::create_dir_all(&nested).unwrap();
    simulate(dir.path(), "a.jsonl", "1", "1");
    simulate(&nested, "b.jsonl", "2", "2");
    let (code, out, _) = run_args(&["ludo", "stats", "--input", dir.path().to_str().unwrap()]);
    assert_eq!(code, 0);
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["games"], 3);
}

#[test]
fn stats_rejects_a_file_of_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(&path, "not json\n{\"game_id\":1}\n").unwrap();
    let (code, _, err) = run_args(&["ludo", "stats", "--input", path.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(err.contains("Skipped 2 corrupted record(s)"));
    assert!(err.contains("Invalid record"));
}
