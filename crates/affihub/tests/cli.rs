#![allow(missing_docs)]

use std::process::{Command, Output};

use tempfile::TempDir;

fn affihub(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_affihub"))
        .args(args)
        .env("HOME", home.path())
        .env("AFFIHUB_DATA_DIR", home.path().join("data"))
        .env("AFFIHUB_LOGIN_LATENCY_MS", "0")
        .env("AFFIHUB_REGISTER_LATENCY_MS", "0")
        .env("AFFIHUB_UPGRADE_LATENCY_MS", "0")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn session_persists_between_runs() {
    let home = TempDir::new().unwrap();

    let out = affihub(&home, &["status"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Not signed in."));

    let out = affihub(&home, &["register", "--email", "alice@example.com", "--password", "pw"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Signed in as alice <alice@example.com> (Free)"));

    let out = affihub(&home, &["upgrade", "vip"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Welcome to VIP!"));

    let out = affihub(&home, &["status"]);
    assert!(stdout(&out).contains("Membership: VIP"));

    let out = affihub(&home, &["logout"]);
    assert!(out.status.success());
    assert!(!home.path().join("data").join("affihub_user.json").exists());
}

#[test]
fn anonymous_upgrade_fails() {
    let home = TempDir::new().unwrap();
    let out = affihub(&home, &["upgrade", "premium"]);
    assert!(!out.status.success());
    assert!(stdout(&out).contains("Sign in or register"));
}

#[test]
fn downgrade_is_rejected() {
    let home = TempDir::new().unwrap();
    assert!(affihub(&home, &["login", "--email", "a@b.com", "--password", "x"]).status.success());
    assert!(affihub(&home, &["upgrade", "vip"]).status.success());

    let out = affihub(&home, &["upgrade", "premium"]);
    assert!(!out.status.success());
    assert!(stdout(&out).contains("cannot move from vip to premium"));
}

#[test]
fn unknown_tier_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    let out = affihub(&home, &["upgrade", "gold"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("gold"));
}

#[test]
fn pricing_json_for_anonymous_visitor() {
    let home = TempDir::new().unwrap();
    let out = affihub(&home, &["pricing", "--yearly", "--json"]);
    assert!(out.status.success());
    let cards: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(cards.as_array().unwrap().len(), 3);
    assert_eq!(cards[0]["cta"]["kind"], "getStarted");
    assert_eq!(cards[1]["price"], "$99.99");
    assert_eq!(cards[2]["cta"]["tier"], "vip");
}

#[test]
fn content_locks_gated_reviews() {
    let home = TempDir::new().unwrap();
    let out = affihub(&home, &["content"]);
    let text = stdout(&out);
    assert!(text.contains("LOCKED: Premium Content"));
    assert!(text.contains("LOCKED: VIP Content"));
}
