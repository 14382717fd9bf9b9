use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

// Nothing listens on the discard port; any remote call would fail with the generation error.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn loinho() -> Command {
    let mut cmd = Command::cargo_bin("loinho").unwrap();
    cmd.env_remove("API_KEY")
        .env_remove("GEMINI_API_BASE")
        .env_remove("GEMINI_MODEL")
        .env_remove("LOINHO_PORT");
    cmd
}

#[test]
fn test_cli_help() {
    loinho()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: loinho"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("--api-key <API_KEY>"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_cli_serve_help() {
    loinho()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: loinho serve"))
        .stdout(predicate::str::contains("--port <PORT>"));
}

#[test]
fn test_cli_generate_help_lists_features() {
    loinho()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("message"))
        .stdout(predicate::str::contains("poem"))
        .stdout(predicate::str::contains("game"))
        .stdout(predicate::str::contains("advice"))
        .stdout(predicate::str::contains("--chat"));
}

#[test]
fn test_cli_no_command() {
    // clap exits with non-zero status when no command is given
    loinho()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: loinho"));
}

#[test]
fn test_catalog_needs_no_api_key() {
    loinho()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("feng-shui"))
        .stdout(predicate::str::contains("Khám phá Phong thủy"))
        .stdout(predicate::str::contains("Chúc buổi sáng"));
}

#[test]
fn test_missing_api_key_is_fatal() {
    loinho()
        .args(["generate", "advice", "health", "Làm sao để ngủ ngon?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY environment variable is not set"));
}

#[test]
fn test_serve_without_api_key_is_fatal() {
    loinho()
        .args(["serve", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY environment variable is not set"));
}

#[test]
fn test_empty_name_is_rejected_before_any_remote_call() {
    loinho()
        .env("API_KEY", "test-key")
        .env("GEMINI_API_BASE", UNREACHABLE_API)
        .args(["generate", "message", "--name", "  ", "--characteristics", "thích mèo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vui lòng nhập tên của nàng."))
        .stderr(predicate::str::contains("Không thể tạo nội dung").not());
}

#[test]
fn test_unknown_message_type_is_rejected_by_parser() {
    loinho()
        .env("API_KEY", "test-key")
        .args(["generate", "message", "--name", "Lan", "--type", "good-evening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown message type 'good-evening'"));
}

#[test]
fn test_creative_feature_is_not_an_advice_topic() {
    loinho()
        .env("API_KEY", "test-key")
        .args(["generate", "advice", "poem", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'poem' is not an advice topic"));
}

#[test]
fn test_remote_failure_surfaces_generation_error() {
    loinho()
        .env("API_KEY", "test-key")
        .env("GEMINI_API_BASE", UNREACHABLE_API)
        .args(["generate", "advice", "finance", "Lãi suất tiết kiệm?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Không thể tạo nội dung lúc này. Vui lòng kiểm tra lại thông tin và thử lại sau.",
        ));
}

#[test]
fn test_env_file_supplies_api_key() {
    let mut env_file = NamedTempFile::new().unwrap();
    writeln!(env_file, "API_KEY=from-file").unwrap();
    writeln!(env_file, "GEMINI_API_BASE={UNREACHABLE_API}").unwrap();

    // Getting past configuration to the validation step proves the key was loaded.
    loinho()
        .arg("--env-file")
        .arg(env_file.path())
        .args(["generate", "poem", "--name", "Lan", "--topic", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vui lòng nhập chủ đề cho bài thơ."));
}

#[test]
fn test_missing_env_file_is_reported() {
    loinho()
        .args(["--env-file", "/nonexistent/loinho.env", "catalog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load env file"));
}
