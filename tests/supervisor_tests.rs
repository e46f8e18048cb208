//! Integration tests for child process supervision
//!
//! These spawn real OS processes, so every spec uses a command that is
//! cheap and available on the test platform.

use devtray::supervisor::{ProcessSupervisor, ServiceSpec};
use std::time::{Duration, Instant};

/// A service that keeps running until we stop it
fn long_running(name: &str) -> ServiceSpec {
    #[cfg(windows)]
    let command = vec![
        "cmd".to_string(),
        "/c".to_string(),
        "ping -n 60 127.0.0.1 > NUL".to_string(),
    ];
    #[cfg(not(windows))]
    let command = vec!["sleep".to_string(), "60".to_string()];

    ServiceSpec {
        name: name.to_string(),
        command,
        url: format!("http://localhost:4000/{}", name),
    }
}

/// A service that exits on its own almost immediately
fn short_lived(name: &str) -> ServiceSpec {
    #[cfg(windows)]
    let command = vec!["cmd".to_string(), "/c".to_string(), "exit 0".to_string()];
    #[cfg(not(windows))]
    let command = vec!["true".to_string()];

    ServiceSpec {
        name: name.to_string(),
        command,
        url: "http://localhost:5173/".to_string(),
    }
}

/// Poll `is_running` until it reports the expected value or the deadline hits
fn wait_for_running(supervisor: &ProcessSupervisor, name: &str, expected: bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if supervisor.is_running(name) == expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

#[test]
fn test_start_then_stop_reflects_liveness() {
    let supervisor = ProcessSupervisor::new(vec![long_running("svc")]);

    assert!(!supervisor.is_running("svc"));

    supervisor.start("svc").expect("start failed");
    assert!(supervisor.is_running("svc"));
    assert!(supervisor.pid("svc").is_some());

    supervisor.stop("svc").expect("stop failed");
    assert!(!supervisor.is_running("svc"));
    assert!(supervisor.pid("svc").is_none());
}

#[test]
fn test_start_is_idempotent() {
    let supervisor = ProcessSupervisor::new(vec![long_running("svc")]);

    supervisor.start("svc").expect("start failed");
    let first_pid = supervisor.pid("svc").expect("no pid after start");

    supervisor.start("svc").expect("second start failed");
    let second_pid = supervisor.pid("svc").expect("no pid after second start");

    assert_eq!(first_pid, second_pid, "second start spawned a new process");

    supervisor.stop("svc").expect("stop failed");
}

#[test]
fn test_stop_is_idempotent() {
    let supervisor = ProcessSupervisor::new(vec![long_running("svc")]);

    supervisor.stop("svc").expect("stop of idle service failed");
    assert!(!supervisor.is_running("svc"));

    supervisor.start("svc").expect("start failed");
    supervisor.stop("svc").expect("stop failed");
    supervisor.stop("svc").expect("repeated stop failed");
    assert!(!supervisor.is_running("svc"));
}

#[test]
fn test_self_termination_is_observed() {
    let supervisor = ProcessSupervisor::new(vec![short_lived("svc")]);

    supervisor.start("svc").expect("start failed");
    assert!(
        wait_for_running(&supervisor, "svc", false),
        "exited process still reported as running"
    );
}

#[test]
fn test_reap_clears_exited_handle() {
    let supervisor = ProcessSupervisor::new(vec![short_lived("svc")]);

    supervisor.start("svc").expect("start failed");

    // Let the process finish, then reconcile
    std::thread::sleep(Duration::from_secs(2));
    supervisor.reap();

    assert!(supervisor.pid("svc").is_none());
    let statuses = supervisor.statuses();
    assert_eq!(statuses.len(), 1);
    assert!(!statuses[0].running);
}

#[test]
fn test_restart_after_exit_spawns_again() {
    let supervisor = ProcessSupervisor::new(vec![short_lived("svc")]);

    supervisor.start("svc").expect("start failed");
    assert!(wait_for_running(&supervisor, "svc", false));

    // The slot is clear again, so start is allowed to respawn
    supervisor.start("svc").expect("restart failed");
}

#[test]
fn test_stop_all_leaves_nothing_running() {
    let supervisor = ProcessSupervisor::new(vec![long_running("alpha"), long_running("beta")]);

    supervisor.start("alpha").expect("start alpha failed");
    supervisor.start("beta").expect("start beta failed");
    assert!(supervisor.is_running("alpha"));
    assert!(supervisor.is_running("beta"));

    supervisor.stop_all();

    assert!(!supervisor.is_running("alpha"));
    assert!(!supervisor.is_running("beta"));
}

#[test]
fn test_unknown_service_is_an_error() {
    let supervisor = ProcessSupervisor::new(vec![long_running("svc")]);

    assert!(supervisor.start("nope").is_err());
    assert!(supervisor.stop("nope").is_err());
    assert!(!supervisor.is_running("nope"));
    assert!(supervisor.url_for("nope").is_none());
}

#[test]
fn test_statuses_preserve_registration_order() {
    let supervisor = ProcessSupervisor::new(vec![long_running("alpha"), long_running("beta")]);

    supervisor.start("beta").expect("start failed");

    let statuses = supervisor.statuses();
    assert_eq!(statuses[0].name, "alpha");
    assert!(!statuses[0].running);
    assert_eq!(statuses[1].name, "beta");
    assert!(statuses[1].running);

    supervisor.stop_all();
}

#[test]
fn test_spawn_failure_is_surfaced_not_fatal() {
    let spec = ServiceSpec {
        name: "ghost".to_string(),
        command: vec!["no-such-binary-devtray-test".to_string()],
        url: "http://localhost:9999/".to_string(),
    };
    let supervisor = ProcessSupervisor::new(vec![spec]);

    assert!(supervisor.start("ghost").is_err());
    assert!(!supervisor.is_running("ghost"));
}
