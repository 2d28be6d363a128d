use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use veritas_config::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, VeritasConfigLoader};

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn loads_file_and_expands_placeholders() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "veritas.yaml",
        r#"
version: "1"
llm:
  provider: gemini
  api_key: "${VERITAS_IT_KEY}"
  model: "gemini-2.5-pro"
logging:
  dir: "/tmp/veritas-it"
  format: json
"#,
    );

    temp_env::with_var("VERITAS_IT_KEY", Some("secret"), || {
        let config = VeritasConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.version.as_deref(), Some("1"));
        assert_eq!(config.llm.api_key, "secret");
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.base_url, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.logging.dir.as_deref(), Some("/tmp/veritas-it"));
        assert_eq!(config.logging.format, "json");
    });
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "veritas.yaml",
        "llm:\n  api_key: from-file\n  model: from-file-model\n",
    );

    temp_env::with_vars(
        [
            ("VERITAS__LLM__MODEL", Some("from-env-model")),
            ("VERITAS__LLM__TEMPERATURE", Some("0.5")),
        ],
        || {
            let config = VeritasConfigLoader::new().with_file(&p).load().unwrap();
            assert_eq!(config.llm.api_key, "from-file");
            assert_eq!(config.llm.model, "from-env-model");
            assert!((config.llm.temperature - 0.5).abs() < f32::EPSILON);
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.yaml");

    temp_env::with_vars(
        [("GEMINI_API_KEY", None::<&str>), ("API_KEY", Some("plain-api-key"))],
        || {
            let config = VeritasConfigLoader::new()
                .with_optional_file(&missing)
                .load()
                .expect("optional file may be absent");

            assert_eq!(config.llm.model, DEFAULT_GEMINI_MODEL);
            assert_eq!(config.logging.filter, "info");
            assert_eq!(config.require_api_key().unwrap(), "plain-api-key");
        },
    );
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = VeritasConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn unknown_provider_is_rejected() {
    let result = VeritasConfigLoader::new()
        .with_yaml_str("llm:\n  provider: openai\n")
        .load();
    assert!(result.is_err());
}
