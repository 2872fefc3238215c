//! Configuration loading tests
//!
//! Verify the priority order of configuration sources:
//! Command line arguments > Environment variables > Configuration file > Default values

use mcp_proxy::config::{ConfigError, ConfigOverrides, ProxyConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "MCP_PROXY_SERVER_COMMAND",
    "MCP_PROXY_SERVER_ARGS",
    "MCP_PROXY_LOG_LEVEL",
    "MCP_PROXY_INSPECT",
    "MCP_PROXY_CHANNEL_CAPACITY",
];

fn clear_env() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write config file");
    file
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let file = config_file(
        r#"{
            "server_command": "uv",
            "server_args": ["run", "mcp-simple-tool"],
            "server_env": {"mcp_debug": "1"},
            "inspect": false,
            "channel_capacity": 64
        }"#,
    );

    let config = ProxyConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server_command, "uv");
    assert_eq!(config.server_args, vec!["run", "mcp-simple-tool"]);
    assert_eq!(config.server_env.get("mcp_debug").map(String::as_str), Some("1"));
    assert!(!config.inspect);
    assert_eq!(config.channel_capacity, 64);

    // Values absent from the file keep their defaults
    assert_eq!(config.log_level, "info");
    assert_eq!(config.max_message_size, 8 * 1024 * 1024);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let result = ProxyConfig::load(Some(Path::new("/nonexistent/mcp-proxy-test.json")));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
#[serial]
fn test_invalid_file_is_an_error() {
    clear_env();
    let file = config_file(r#"{"channel_capacity": "not a number"}"#);
    assert!(ProxyConfig::load(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let file = config_file(
        r#"{
            "server_command": "python",
            "server_args": ["server.py"],
            "log_level": "warn",
            "channel_capacity": 8
        }"#,
    );

    env::set_var("MCP_PROXY_LOG_LEVEL", "debug");
    env::set_var("MCP_PROXY_SERVER_ARGS", "run mcp-simple-tool");
    env::set_var("MCP_PROXY_INSPECT", "false");
    env::set_var("MCP_PROXY_CHANNEL_CAPACITY", "32");

    let config = ProxyConfig::load(Some(file.path()));
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.server_command, "python");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.server_args, vec!["run", "mcp-simple-tool"]);
    assert!(!config.inspect);
    assert_eq!(config.channel_capacity, 32);
}

#[test]
#[serial]
fn test_command_line_overrides_everything() {
    clear_env();
    let file = config_file(r#"{"server_command": "python", "log_level": "warn"}"#);
    env::set_var("MCP_PROXY_SERVER_COMMAND", "node");
    env::set_var("MCP_PROXY_LOG_LEVEL", "debug");

    let config = ProxyConfig::load(Some(file.path()));
    clear_env();

    let config = config.unwrap().with_overrides(ConfigOverrides {
        server_command: Some("uv".to_string()),
        server_args: Some(vec!["run".to_string(), "mcp-simple-tool".to_string()]),
        log_level: Some("trace".to_string()),
        inspect: None,
    });

    assert_eq!(config.server_command, "uv");
    assert_eq!(config.server_args, vec!["run", "mcp-simple-tool"]);
    assert_eq!(config.log_level, "trace");
    assert!(config.inspect);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_environment_only() {
    clear_env();
    env::set_var("MCP_PROXY_SERVER_COMMAND", "mcp-server");

    // No explicit file; mcp-proxy.json is not present in the test directory
    let config = ProxyConfig::load(None);
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.server_command, "mcp-server");
    assert!(config.server_args.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_defaults_fail_validation_without_command() {
    clear_env();
    let config = ProxyConfig::load(None).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingRequiredValue(name)) if name == "server_command"
    ));
}
