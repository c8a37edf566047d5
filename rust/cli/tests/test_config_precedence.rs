use ludo_cli::run;
use serde_json::Value;
use serial_test::serial;

const VARS: &[&str] = &[
    "LUDO_CONFIG",
    "LUDO_PLAYERS",
    "LUDO_DIFFICULTY",
    "LUDO_SEED",
    "LUDO_TURN_LIMIT",
];

fn clear_env() {
    for key in VARS {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

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

fn cfg() -> Value {
    let (code, out, err) = run_args(&["ludo", "cfg"]);
    assert_eq!(code, 0, "stderr={}", err);
    serde_json::from_str(&out).unwrap()
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let json = cfg();
    assert_eq!(json["players"]["value"], 2);
    assert_eq!(json["players"]["source"], "default");
    assert_eq!(json["difficulty"]["value"], "medium");
    assert_eq!(json["seed"]["value"], Value::Null);
    assert_eq!(json["turn_limit"]["value"], 2000);
    assert_eq!(json["turn_limit"]["source"], "default");
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ludo.toml");
    std::fs::write(&path, "players = 4\ndifficulty = \"hard\"\nseed = 456\n").unwrap();
    set_env("LUDO_CONFIG", path.to_str().unwrap());

    let json = cfg();
    assert_eq!(json["players"]["value"], 4);
    assert_eq!(json["players"]["source"], "file");
    assert_eq!(json["difficulty"]["value"], "hard");
    assert_eq!(json["seed"]["value"], 456);
    assert_eq!(json["seed"]["source"], "file");

    set_env("LUDO_SEED", "123");
    set_env("LUDO_DIFFICULTY", "easy");
    let json = cfg();
    assert_eq!(json["seed"]["value"], 123);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["difficulty"]["value"], "easy");
    assert_eq!(json["difficulty"]["source"], "env");
    assert_eq!(json["players"]["source"], "file");

    clear_env();
}

#[test]
#[serial]
fn flags_override_env() {
    clear_env();
    set_env("LUDO_PLAYERS", "4");
    set_env("LUDO_SEED", "99");
    let (code, out, _) = run_args(&["ludo", "sim", "--games", "1", "--players", "3"]);
    assert_eq!(code, 0);
    assert!(out.contains("players=3"));
    assert!(out.contains("seed=99"));
    clear_env();
}

#[test]
#[serial]
fn invalid_env_value_fails() {
    clear_env();
    set_env("LUDO_PLAYERS", "9");
    let (code, _, err) = run_args(&["ludo", "cfg"]);
    assert_eq!(code, 2);
    assert!(err.contains("players must be between 2 and 4"));

    set_env("LUDO_PLAYERS", "two");
    let (code, _, err) = run_args(&["ludo", "sim", "--games", "1"]);
    assert_eq!(code, 2);
    assert!(err.contains("Invalid players"));
    clear_env();
}

#[test]
#[serial]
fn unreadable_config_file_fails() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    set_env("LUDO_CONFIG", dir.path().join("missing.toml").to_str().unwrap());
    let (code, _, err) = run_args(&["ludo", "cfg"]);
    assert_eq!(code, 2);
    assert!(err.contains("cannot read config file"));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "players = \"many\"\n").unwrap();
    set_env("LUDO_CONFIG", bad.to_str().unwrap());
    let (code, _, err) = run_args(&["ludo", "cfg"]);
    assert_eq!(code, 2);
    assert!(err.contains("cannot parse config file"));
    clear_env();
}

#[test]
#[serial]
fn rng_is_deterministic_per_seed() {
    clear_env();
    let a = run_args(&["ludo", "rng", "--seed", "42"]);
    let b = run_args(&["ludo", "rng", "--seed", "42"]);
    assert_eq!(a.0, 0);
    assert_eq!(a.1, b.1);
    assert!(a.1.contains("RNG sample"));
}
