// Configuration tests - verify config file loading and validation

use poolhttpd::application::config::loader::ConfigLoader;
use poolhttpd::application::config::models::HandlerKind;
use std::fs;
use std::time::Duration;

fn write_temp(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(format!("poolhttpd_{}_{}.toml", name, std::process::id()));
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_valid_config_file() {
    let path = write_temp(
        "valid",
        r#"
host = "127.0.0.1"
port = 8080
backlog = 32
thread_count = 8
read_timeout_ms = 2500
handler = "echo"
"#,
    );

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.handler, HandlerKind::Echo);

    let server_config = config.server_config();
    assert_eq!(server_config.bind_address.to_string(), "127.0.0.1:8080");
    assert_eq!(server_config.backlog, 32);
    assert_eq!(server_config.thread_count, 8);
    assert_eq!(server_config.read_timeout, Some(Duration::from_millis(2500)));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let path = write_temp("partial", "thread_count = 2\n");

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.thread_count, 2);
    assert_eq!(config.port, 5000);
    assert_eq!(config.backlog, 5);
    assert_eq!(config.handler, HandlerKind::NotFound);
}

#[test]
fn test_invalid_config_values() {
    let path = write_temp("zero_threads", "thread_count = 0\n");
    assert!(ConfigLoader::load(&path).is_err());

    let path = write_temp("port_zero", "port = 0\n");
    assert!(ConfigLoader::load(&path).is_err());

    let path = write_temp("port_range", "port = 65536\n");
    assert!(ConfigLoader::load(&path).is_err());
}

#[test]
fn test_malformed_config_file() {
    let path = write_temp("malformed", "port = \n");
    assert!(ConfigLoader::load(&path).is_err());

    let path = write_temp("unknown_handler", "handler = \"router\"\n");
    assert!(ConfigLoader::load(&path).is_err());
}
