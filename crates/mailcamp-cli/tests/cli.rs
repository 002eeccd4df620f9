use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd(temp: &TempDir, db_path: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mailcamp");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("RUST_LOG")
        .args(["--db-path", db_path.to_str().expect("db path")]);
    cmd
}

fn run_cmd(temp: &TempDir, db_path: &Path, args: &[&str]) -> String {
    let output = cmd(temp, db_path).args(args).output().expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, db_path: &Path, args: &[&str]) -> Value {
    let output = cmd(temp, db_path)
        .arg("--json")
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn seed(temp: &TempDir, db_path: &Path) {
    let body = temp.path().join("body.txt");
    fs::write(&body, "Hello {{first_name}} from {{company}}, plan {{custom.plan}}.\n")
        .expect("write body");

    run_cmd(
        temp,
        db_path,
        &[
            "contact", "add", "--email", "Ada@Example.com", "--first-name", "Ada",
            "--company", "Engines", "--field", "plan=pro",
        ],
    );
    run_cmd(
        temp,
        db_path,
        &["contact", "add", "--email", "bob@example.com", "--first-name", "Bob"],
    );
    run_cmd(temp, db_path, &["list", "create", "early"]);
    run_cmd(temp, db_path, &["list", "create", "late"]);
    run_cmd(
        temp,
        db_path,
        &["list", "add", "early", "ada@example.com", "bob@example.com"],
    );
    run_cmd(temp, db_path, &["list", "add", "late", "bob@example.com"]);
    run_cmd(
        temp,
        db_path,
        &[
            "template", "add", "--name", "welcome", "--subject", "Hi {{first_name}}",
            "--body-file", body.to_str().expect("body path"),
        ],
    );
    run_cmd(
        temp,
        db_path,
        &[
            "campaign", "create", "--name", "launch", "--template", "welcome", "--list",
            "early", "--list", "late",
        ],
    );
}

#[test]
fn cli_campaign_send_flow() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);

    let contact = run_cmd_json(&temp, &db_path, &["contact", "show", "ADA@example.com"]);
    assert_eq!(contact["email"], "ada@example.com");
    assert_eq!(contact["custom_fields"]["plan"], "pro");

    let preview = run_cmd_json(
        &temp,
        &db_path,
        &["template", "preview", "welcome", "--contact", "ada@example.com"],
    );
    assert_eq!(preview["subject"], "Hi Ada");

    let output = run_cmd(&temp, &db_path, &["campaign", "send", "launch", "--stdout"]);
    assert!(output.contains("to: ada@example.com"));
    assert!(output.contains("Hello Ada from Engines, plan pro."));
    assert!(output.contains("Hello Bob from , plan ."));
    assert!(output.contains("campaign launch: 2 recipients, 2 sent, 0 failed"));

    let campaign = run_cmd_json(&temp, &db_path, &["campaign", "show", "launch"]);
    assert_eq!(campaign["status"], "sent");
    assert_eq!(campaign["total_recipients"], 2);
    assert_eq!(campaign["sent_count"], 2);
    assert_eq!(campaign["lists"], serde_json::json!(["early", "late"]));

    let logs = run_cmd_json(&temp, &db_path, &["logs", "ls", "--campaign", "launch"]);
    let entries = logs.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry["status"] == "sent"));
}

#[test]
fn cli_send_attaches_files() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);
    let attachment = temp.path().join("notes.txt");
    fs::write(&attachment, "abc").expect("write attachment");

    let output = run_cmd(
        &temp,
        &db_path,
        &[
            "campaign", "send", "launch", "--stdout", "--attach",
            attachment.to_str().expect("attachment path"),
        ],
    );
    assert_eq!(output.matches("attachment: notes.txt (3 bytes)").count(), 2);
}

#[test]
fn cli_send_unknown_campaign_exits_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");

    cmd(&temp, &db_path)
        .args(["campaign", "send", "missing", "--stdout"])
        .assert()
        .code(2);
}

#[test]
fn cli_send_with_deleted_list_marks_campaign_failed() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);
    run_cmd(&temp, &db_path, &["list", "rm", "late"]);

    cmd(&temp, &db_path)
        .args(["campaign", "send", "launch", "--stdout"])
        .assert()
        .code(3);

    let campaign = run_cmd_json(&temp, &db_path, &["campaign", "show", "launch"]);
    assert_eq!(campaign["status"], "failed");
    assert_eq!(campaign["sent_count"], 0);
    let logs = run_cmd_json(&temp, &db_path, &["logs", "ls"]);
    assert!(logs.as_array().expect("array").is_empty());
}

#[test]
fn cli_rejects_invalid_and_duplicate_contacts() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");

    cmd(&temp, &db_path)
        .args(["contact", "add", "--email", "not-an-email"])
        .assert()
        .code(3);

    run_cmd(&temp, &db_path, &["contact", "add", "--email", "ada@example.com"]);
    cmd(&temp, &db_path)
        .args(["contact", "add", "--email", "ADA@example.com"])
        .assert()
        .code(3);
}

#[test]
fn cli_smtp_send_without_config_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);

    cmd(&temp, &db_path)
        .args(["campaign", "send", "launch"])
        .assert()
        .code(3);
}

#[cfg(unix)]
#[test]
fn cli_stdout_backend_from_config() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);

    let config_path = temp.path().join("mailcamp.toml");
    fs::write(&config_path, "[delivery]\nbackend = \"stdout\"\n").expect("write config");
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600)).expect("chmod");

    let output = cmd(&temp, &db_path)
        .args(["--config", config_path.to_str().expect("config path")])
        .args(["campaign", "send", "launch"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("to: bob@example.com"));
}

#[test]
fn cli_logs_cleanup_rejects_out_of_range_window() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");

    let output = cmd(&temp, &db_path)
        .args(["logs", "cleanup", "--older-than-days", "4294967295"])
        .output()
        .expect("run command");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(!stderr.contains("panicked"), "unexpected panic: {stderr}");

    let cleaned = run_cmd_json(&temp, &db_path, &["logs", "cleanup", "--older-than-days", "0"]);
    assert_eq!(cleaned["deleted"], 0);
}

#[cfg(unix)]
#[test]
fn cli_campaign_show_lists_failures_from_last_run() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("mailcamp.sqlite3");
    seed(&temp, &db_path);

    let config_path = temp.path().join("mailcamp.toml");
    fs::write(
        &config_path,
        "[smtp]\nhost = \"127.0.0.1\"\nport = 1\nfrom = \"team@example.com\"\ntls = \"none\"\ntimeout_seconds = 2\n",
    )
    .expect("write config");
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600)).expect("chmod");
    let config = config_path.to_str().expect("config path");

    run_cmd(&temp, &db_path, &["--config", config, "campaign", "send", "launch"]);

    let campaign = run_cmd_json(
        &temp,
        &db_path,
        &["--config", config, "campaign", "show", "launch"],
    );
    assert_eq!(campaign["status"], "sent");
    assert_eq!(campaign["failed_count"], 2);
    let failures = campaign["failures"].as_array().expect("failures");
    let recipients: Vec<&str> = failures
        .iter()
        .map(|failure| failure["recipient"].as_str().expect("recipient"))
        .collect();
    assert_eq!(recipients, vec!["ada@example.com", "bob@example.com"]);
    assert!(failures
        .iter()
        .all(|failure| !failure["detail"].as_str().expect("detail").is_empty()));

    let human = run_cmd(&temp, &db_path, &["--config", config, "campaign", "show", "launch"]);
    assert!(human.contains("failed ada@example.com:"));
}
