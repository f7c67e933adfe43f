use httpfs::config::{Config, DEFAULT_PORT, Transport};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.host, "localhost");
    assert_eq!(cfg.server.port, DEFAULT_PORT);
    assert_eq!(cfg.server.port, 1773);
    assert_eq!(cfg.server.transport, Transport::Tcp);
    assert!(!cfg.verbose);
    assert!(cfg.root_dir.ends_with("shared"));
}

#[test]
fn test_config_load_without_file_uses_defaults() {
    let cfg = Config::load(None).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml("server:\n  port: 8080\n").unwrap();

    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.host, "localhost");
    assert_eq!(cfg.root_dir, Config::default().root_dir);
}

#[test]
fn test_config_full_yaml() {
    let raw = "\
server:
  host: 0.0.0.0
  port: 5000
  transport: udp
  max_header_bytes: 1024
root_dir: /srv/files
verbose: true
";
    let cfg = Config::from_yaml(raw).unwrap();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 5000);
    assert_eq!(cfg.server.transport, Transport::Udp);
    assert_eq!(cfg.server.max_header_bytes, 1024);
    assert_eq!(cfg.root_dir, std::path::PathBuf::from("/srv/files"));
    assert!(cfg.verbose);
}

#[test]
fn test_config_rejects_unknown_transport() {
    assert!(Config::from_yaml("server:\n  transport: quic\n").is_err());
}

#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("httpfs.yaml");
    std::fs::write(&path, "server:\n  port: 9000\n").unwrap();

    let cfg = Config::load(Some(&path)).unwrap();
    assert_eq!(cfg.server.port, 9000);
}

#[test]
fn test_config_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    assert!(Config::from_file(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn test_prepare_root_creates_and_canonicalizes() {
    let dir = TempDir::new().unwrap();
    let mut cfg = Config {
        root_dir: dir.path().join("nested").join(".").join("shared"),
        ..Config::default()
    };

    cfg.prepare_root().unwrap();

    assert!(cfg.root_dir.is_absolute());
    assert!(cfg.root_dir.is_dir());
    assert_eq!(cfg.root_dir, dir.path().canonicalize().unwrap().join("nested").join("shared"));
}

#[test]
fn test_prepare_root_rejects_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();

    let mut cfg = Config {
        root_dir: file,
        ..Config::default()
    };
    assert!(cfg.prepare_root().is_err());
}
