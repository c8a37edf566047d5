use ludo_cli::run;
use ludo_engine::logger::GameRecord;
use std::fs;

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

fn records(path: &std::path::Path) -> Vec<GameRecord> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn sim_runs_n_games_and_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let (code, out, err) = run_args(&[
        "ludo",
        "sim",
        "--games",
        "3",
        "--seed",
        "1",
        "--players",
        "3",
        "--difficulty",
        "easy",
        "--turn-limit",
        "20000",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr={}", err);
    assert!(out.contains("Simulated: 3 games"));

    let recs = records(&path);
    assert_eq!(recs.len(), 3);
    for (i, rec) in recs.iter().enumerate() {
        assert_eq!(rec.seed, Some(1 + i as u64));
        assert_eq!(rec.players.len(), 3);
        assert!(rec.players.iter().all(|p| p.is_ai));
        assert!(rec.ts.is_some());
        assert!(rec.game_id.ends_with(&format!("-{:06}", i + 1)));
        assert!(rec.winner.is_some());
    }
}

#[test]
fn sim_is_reproducible_for_a_seed() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jsonl");
    let b = dir.path().join("b.jsonl");
    for path in [&a, &b] {
        let (code, _, _) = run_args(&[
            "ludo",
            "sim",
            "--games",
            "2",
            "--seed",
            "77",
            "--output",
            path.to_str().unwrap(),
        ]);
        assert_eq!(code, 0);
    }
    let (ra, rb) = (records(&a), records(&b));
    for (x, y) in ra.iter().zip(&rb) {
        assert_eq!(x.moves, y.moves);
        assert_eq!(x.winner, y.winner);
    }
}

#[test]
fn sim_creates_missing_output_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("games.jsonl");
    let (code, _, _) = run_args(&[
        "ludo",
        "sim",
        "--games",
        "1",
        "--seed",
        "5",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(records(&path).len(), 1);
}

#[test]
fn turn_limit_records_unfinished_games() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.jsonl");
    let (code, _, err) = run_args(&[
        "ludo",
        "sim",
        "--games",
        "2",
        "--seed",
        "3",
        "--turn-limit",
        "20",
        "--output",
        path.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert!(err.contains("2 game(s) reached the turn limit of 20 rolls"));
    let recs = records(&path);
    assert!(recs.iter().all(|r| r.winner.is_none() && r.rolls == 20));
    let line = fs::read_to_string(&path).unwrap();
    assert!(line.contains("\"winner\":null"));
}

#[test]
fn zero_games_is_an_error() {
    let (code, _, err) = run_args(&["ludo", "sim", "--games", "0"]);
    assert_eq!(code, 2);
    assert!(err.contains("games must be >= 1"));
}

#[test]
fn sim_without_output_only_reports() {
    let (code, out, _) = run_args(&["ludo", "sim", "--games", "1", "--seed", "9"]);
    assert_eq!(code, 0);
    assert!(out.contains("sim: games=1 players=2 difficulty=medium seed=9"));
    assert!(out.contains("Simulated: 1 games"));
}
