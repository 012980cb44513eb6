//! Integration tests against a real Docker daemon
//!
//! These validate the registered-name lifecycle end to end:
//! - `run` creates and starts a container carrying SERVICE_NAME
//! - `list` and `exec` find it by that name
//! - `stop --rm` stops and removes it

use regtool::containers::{ContainerEngine, Docker};
use regtool::service::{self, RunRequest, ServiceError};

fn docker_available() -> Option<Docker> {
    let docker = Docker::default();
    if docker.is_available() && docker.is_daemon_running() {
        Some(docker)
    } else {
        None
    }
}

fn unique_name(prefix: &str) -> String {
    format!(
        "{}{}",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    )
}

#[test]
#[ignore = "requires Docker daemon"]
fn test_registered_container_lifecycle() {
    let Some(docker) = docker_available() else {
        eprintln!("Skipping: Docker not available");
        return;
    };

    let name = unique_name("regtool-test-");
    let request = RunRequest {
        image: "alpine:latest".to_string(),
        registered_name: name.clone(),
        command: Some("sleep 300".to_string()),
        volumes: vec!["/tmp:/host-tmp:ro".to_string()],
    };

    let id = service::run(&docker, &request).unwrap();
    assert!(!id.is_empty());

    let listed = service::list_registered(&docker).unwrap();
    assert!(listed
        .iter()
        .any(|(n, image)| n == &name && image == "alpine:latest"));

    let mut out = Vec::new();
    let code = service::exec(
        &docker,
        &name,
        &["sh".to_string(), "-c".to_string(), "echo hello; exit 3".to_string()],
        false,
        &mut out,
    )
    .unwrap();
    assert_eq!(code, 3);
    assert_eq!(String::from_utf8_lossy(&out).trim(), "hello");

    let stopped = service::stop(&docker, &name, true, 1).unwrap();
    assert_eq!(stopped, 1);

    let result = service::stop(&docker, &name, true, 1);
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
