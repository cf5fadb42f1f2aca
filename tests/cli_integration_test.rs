use assert_cmd::Command;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const VERDICTS: &str = indoc! {r#"
    {"text": "I love this, best ever", "sentiment": {"label": "5 stars", "score": 0.9}, "emotion": {"label": "joy", "score": 0.9}}
    {"text": "this sucks, hot garbage", "sentiment": {"label": "5 stars", "score": 0.9}, "emotion": {"label": "joy", "score": 0.9}}
    {"text": "maybe it's fine", "sentiment": {"label": "5 stars", "score": 0.9}, "emotion": {"label": "joy", "score": 0.9}}
    {"text": "so angry 😡", "sentiment": {"label": "1 star", "score": 0.7}, "emotion": {"label": "joy", "score": 0.3}}
"#};

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("verdicts.jsonl"), VERDICTS).unwrap();
    fs::write(
        temp.path().join("video.txt"),
        "I love this, best ever\nthis sucks, hot garbage\n\nmaybe it's fine\n",
    )
    .unwrap();
    temp
}

fn sentimap(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sentimap").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_analyze_json_report() {
    let temp = workspace();
    let assert = sentimap(&temp)
        .args([
            "analyze",
            "video.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "YouTube",
            "--locator",
            "abc123",
            "--format",
            "json",
            "--filter-axis",
            "sentiment",
            "--filter-label",
            "negative",
        ])
        .assert()
        .success();
    let report = json_stdout(assert.get_output());

    let analysis = &report["analyses"][0];
    assert_eq!(analysis["platform"], "Youtube");
    assert_eq!(analysis["locator"], "abc123");
    assert_eq!(analysis["comments_analyzed"], 3);
    assert_eq!(analysis["sentiment_stats"]["positive"], 33.3);
    assert_eq!(analysis["sentiment_stats"]["negative"], 33.3);
    assert_eq!(analysis["sentiment_stats"]["neutral"], 33.3);
    assert_eq!(analysis["emotion_stats"]["joy"], 100.0);
    assert_eq!(analysis["sample_comments"].as_array().unwrap().len(), 3);

    assert_eq!(report["lookup"]["label"], "negative");
    assert_eq!(
        report["lookup"]["records"][0]["text"],
        "this sucks, hot garbage"
    );

    assert_eq!(report["history"].as_array().unwrap().len(), 1);
    assert_eq!(report["platform_stats"]["youtube"]["total_comments"], 3);
    assert_eq!(report["platform_stats"]["reddit"]["total_analyses"], 0);
}

#[test]
fn test_analyze_multiple_files_builds_history() {
    let temp = workspace();
    fs::write(temp.path().join("thread.txt"), "so angry 😡\nunknown comment\n").unwrap();

    let assert = sentimap(&temp)
        .args([
            "analyze",
            "video.txt",
            "thread.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "reddit",
            "--format",
            "json",
            "--no-parallel",
        ])
        .assert()
        .success();
    let report = json_stdout(assert.get_output());

    let second = &report["analyses"][1];
    assert_eq!(second["analysis_id"], 1);
    assert_eq!(second["comments_analyzed"], 1);
    assert_eq!(second["comments_skipped"], 1);
    assert_eq!(second["skipped"][0]["index"], 1);
    assert_eq!(second["emotion_stats"]["neutral"], 100.0);

    let history = report["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["locator"], "thread.txt");
    assert_eq!(report["platform_stats"]["reddit"]["total_analyses"], 2);
    assert_eq!(report["platform_stats"]["reddit"]["total_comments"], 4);
}

#[test]
fn test_analyze_writes_output_file() {
    let temp = workspace();
    sentimap(&temp)
        .args([
            "analyze",
            "video.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "youtube",
            "--format",
            "json",
            "--output",
            "reports/out.json",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("reports/out.json")).unwrap();
    let report: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(report["analyses"][0]["comments_analyzed"], 3);
}

#[test]
fn test_analyze_terminal_output() {
    let temp = workspace();
    let assert = sentimap(&temp)
        .env("NO_COLOR", "1")
        .args([
            "analyze",
            "video.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "youtube",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(stdout.contains("Sentimap Analysis Report"));
    assert!(stdout.contains("Youtube"));
    assert!(stdout.contains("33.3%"));
}

#[test]
fn test_unsupported_platform_fails() {
    let temp = workspace();
    let assert = sentimap(&temp)
        .args([
            "analyze",
            "video.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "myspace",
        ])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unsupported platform"));
}

#[test]
fn test_unsupported_platform_with_locator_fails_before_reading() {
    let temp = workspace();
    let assert = sentimap(&temp)
        .args([
            "analyze",
            "missing.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "myspace",
            "--locator",
            "x",
        ])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unsupported platform"));
    assert!(!stderr.contains("cannot read"));
}

#[test]
fn test_batch_without_known_verdicts_fails() {
    let temp = workspace();
    fs::write(temp.path().join("strangers.txt"), "who is this\nnobody knows\n").unwrap();
    let assert = sentimap(&temp)
        .args([
            "analyze",
            "strangers.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "youtube",
        ])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("all 2 comments failed classification"));
}

#[test]
fn test_config_file_restricts_platforms() {
    let temp = workspace();
    fs::write(
        temp.path().join(".sentimap.toml"),
        "[platforms]\nsupported = [\"reddit\"]\n",
    )
    .unwrap();

    sentimap(&temp)
        .args([
            "analyze",
            "video.txt",
            "--verdicts",
            "verdicts.jsonl",
            "--platform",
            "youtube",
        ])
        .assert()
        .failure();
}

#[test]
fn test_init_creates_config_once() {
    let temp = TempDir::new().unwrap();
    sentimap(&temp).arg("init").assert().success();
    let written = fs::read_to_string(temp.path().join(".sentimap.toml")).unwrap();
    assert!(written.contains("sentiment_floor = 0.4"));

    sentimap(&temp).arg("init").assert().failure();
    sentimap(&temp).args(["init", "--force"]).assert().success();
}
