//! CLI integration tests
//!
//! Tests the vibessh binary using assert_cmd. Each test points
//! `VIBESSH_HOME` at a temporary directory so the real user config is
//! never touched.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vibessh(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vibessh")
        .expect("Failed to locate vibessh binary - ensure it's built before running tests");
    cmd.env("VIBESSH_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write_settings(home: &Path, program: &str) {
    fs::write(
        home.join("config.toml"),
        format!("[ssh]\nprogram = {:?}\n", program),
    )
    .unwrap();
}

const HOSTS: &str = r#"
[[hosts]]
name = "beta"
address = "10.0.0.2"
port = 2222
user = "ops"

[[hosts]]
name = "alpha"
address = "10.0.0.1"
"#;

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    vibessh(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("vibessh"))
        .stdout(predicate::str::contains("--register"));
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    vibessh(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vibessh"));
}

#[test]
fn test_cli_too_many_targets() {
    let home = TempDir::new().unwrap();
    vibessh(home.path())
        .args(["alpha", "beta"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_two_arguments_with_flag() {
    let home = TempDir::new().unwrap();
    vibessh(home.path())
        .args(["-v", "beta"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));

    vibessh(home.path()).arg("-q").assert().code(2);
}

#[test]
fn test_cli_register_with_target() {
    let home = TempDir::new().unwrap();
    vibessh(home.path())
        .args(["--register", "alpha"])
        .assert()
        .code(2);
}

#[test]
fn test_cli_missing_client() {
    let home = TempDir::new().unwrap();
    write_settings(home.path(), "vibessh-no-such-client");

    vibessh(home.path())
        .arg("alpha")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("vibessh-no-such-client not found"));
}

#[test]
fn test_cli_corrupt_settings() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[ssh\n").unwrap();

    vibessh(home.path())
        .arg("alpha")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config.toml"));
}

#[cfg(unix)]
mod dispatch {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// A stand-in ssh that records its arguments, one per line
    fn fake_ssh(home: &Path) -> std::path::PathBuf {
        let script = home.join("fake-ssh");
        fs::write(
            &script,
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$VIBESSH_TEST_ARGS\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        write_settings(home, script.to_str().unwrap());
        script
    }

    fn recorded_args(home: &Path) -> Vec<String> {
        fs::read_to_string(home.join("args.txt"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_cli_connects_to_matched_node() {
        let home = TempDir::new().unwrap();
        fake_ssh(home.path());
        fs::write(home.path().join("hosts.toml"), HOSTS).unwrap();

        vibessh(home.path())
            .env("VIBESSH_TEST_ARGS", home.path().join("args.txt"))
            .arg("be")
            .assert()
            .success();

        let args = recorded_args(home.path());
        assert_eq!(&args[args.len() - 3..], ["-p", "2222", "ops@10.0.0.2"]);
        assert!(args.contains(&"ControlMaster=auto".to_string()));
        assert!(args.contains(&"ControlPersist=10m".to_string()));
        assert!(home.path().join("ctrl").is_dir());
    }

    #[test]
    fn test_cli_unknown_target_passes_through() {
        let home = TempDir::new().unwrap();
        fake_ssh(home.path());

        vibessh(home.path())
            .env("VIBESSH_TEST_ARGS", home.path().join("args.txt"))
            .arg("unknown.example")
            .assert()
            .success();

        let args = recorded_args(home.path());
        assert_eq!(args.last().map(String::as_str), Some("unknown.example"));
        assert!(!args.iter().any(|a| a == "-p"));
    }

    #[test]
    fn test_cli_corrupt_hosts_falls_back_to_raw() {
        let home = TempDir::new().unwrap();
        fake_ssh(home.path());
        fs::write(home.path().join("hosts.toml"), "not [valid").unwrap();

        vibessh(home.path())
            .env("VIBESSH_TEST_ARGS", home.path().join("args.txt"))
            .arg("beta")
            .assert()
            .success();

        let args = recorded_args(home.path());
        assert_eq!(args.last().map(String::as_str), Some("beta"));
    }

    #[test]
    fn test_cli_exit_status_is_the_clients() {
        let home = TempDir::new().unwrap();
        let script = home.path().join("fake-ssh");
        fs::write(&script, "#!/bin/sh\nexit 255\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        write_settings(home.path(), script.to_str().unwrap());

        vibessh(home.path()).arg("alpha").assert().code(255);
    }
}
