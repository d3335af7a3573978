//! Configuration file loading and graceful degradation
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked #[serial] so they do not
//! race each other.

use serial_test::serial;
use soilcrop_common::config::{
    ConfigOverrides, ConfigSource, ServiceConfig, TomlConfig, DEFAULT_DATASET_URL,
};
use soilcrop_common::Error;
use std::env;
use std::fs;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured_log(source: &ConfigSource) -> String {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || source.log());

    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
        scorer_url = "http://scorer.internal:5000"
        port = 8088
        request_timeout_secs = 5

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    let config = ServiceConfig::resolve(ConfigOverrides {
        config_path: Some(path),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.scorer_url, "http://scorer.internal:5000");
    assert_eq!(config.predict_url(), "http://scorer.internal:5000/predict");
    assert_eq!(config.port, 8088);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.dataset_url, DEFAULT_DATASET_URL);
    assert!(matches!(&config.source, ConfigSource::File(p) if p.ends_with("config.toml")));

    let log = captured_log(&config.source);
    assert!(log.contains("INFO"), "{}", log);
    assert!(log.contains("Loaded configuration from"), "{}", log);
}

#[test]
fn test_explicit_config_file_missing_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = TomlConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_invalid_toml_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "port = \"not a number\"\n").unwrap();

    let result = TomlConfig::load(Some(&path));
    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_invalid_url_in_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "dataset_url = \"ftp://example.com/data.csv\"\n").unwrap();

    let result = ServiceConfig::resolve(ConfigOverrides {
        config_path: Some(path),
        ..Default::default()
    });
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_cli_override_beats_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "port = 8088\nhost = \"0.0.0.0\"\n").unwrap();

    let config = ServiceConfig::resolve(ConfigOverrides {
        config_path: Some(path),
        port: Some(9099),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.port, 9099);
    assert_eq!(config.host, "0.0.0.0");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_dir_is_searched() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("soilcrop")).unwrap();
    fs::write(
        dir.path().join("soilcrop").join("config.toml"),
        "scorer_url = \"http://from-user-config:5000\"\n",
    )
    .unwrap();

    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = TomlConfig::load(None).unwrap();

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(config.scorer_url.as_deref(), Some("http://from-user-config:5000"));
    assert_eq!(
        config.source,
        ConfigSource::File(dir.path().join("soilcrop").join("config.toml"))
    );
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_default_config_uses_defaults() {
    if std::path::Path::new("/etc/soilcrop/config.toml").exists() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = ServiceConfig::resolve(ConfigOverrides::default());

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    let config = config.unwrap();
    assert_eq!(config, ServiceConfig::default());
    assert_eq!(config.source, ConfigSource::CompiledDefaults);

    let log = captured_log(&config.source);
    assert!(log.contains("WARN"), "{}", log);
    assert!(log.contains("No config file found, using compiled defaults"), "{}", log);
}
