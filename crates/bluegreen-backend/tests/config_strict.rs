#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use bluegreen_backend::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
readiness:
  inital: false # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_INPUT");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 8080);
    assert_eq!(cfg.service.name, "backend");
    assert_eq!(cfg.service.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(cfg.metrics.namespace, "backend");
    assert!(cfg.readiness.initial);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9090"
service:
  name: "backend-green"
  version: "2.0.0"
metrics:
  namespace: ""
readiness:
  initial: false
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9090);
    assert_eq!(cfg.service.name, "backend-green");
    assert_eq!(cfg.service.version, "2.0.0");
    assert!(cfg.metrics.namespace.is_empty());
    assert!(!cfg.readiness.initial);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(err.to_string().contains("unsupported config version"));
}

#[test]
fn rejects_bad_listen_address() {
    let bad = r#"
version: 1
server:
  listen: "not-an-addr"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("server.listen"));
}

#[test]
fn rejects_bad_namespace() {
    let bad = r#"
version: 1
metrics:
  namespace: "9lives"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("metrics.namespace"));
}

#[test]
fn default_config_is_valid() {
    config::BackendConfig::default().validate().expect("defaults must validate");
}
