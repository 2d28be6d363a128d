//! Loader for Veritas configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `VERITAS__`-prefixed
//! environment variables applied last (`VERITAS__LLM__MODEL=...` overrides
//! `llm.model`). String values may reference `${VAR}` placeholders, which are
//! expanded after merging. When the Gemini key is still unset after that, the
//! loader falls back to `GEMINI_API_KEY` and then `API_KEY`.
//!
//! ```yaml
//! version: "1"
//! llm:
//!   provider: gemini
//!   api_key: "${GEMINI_API_KEY}"
//!   model: gemini-2.5-flash
//!   temperature: 0.1
//! logging:
//!   dir: ~/.local/share/veritas
//!   format: text
//!   filter: info
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const API_KEY_FALLBACK_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Default, Deserialize)]
pub struct VeritasConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_endpoint")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_endpoint(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: default_log_format(),
            filter: default_log_filter(),
        }
    }
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_gemini_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.into()
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_log_format() -> String {
    "text".into()
}
fn default_log_filter() -> String {
    "info".into()
}

impl VeritasConfig {
    /// The Gemini API key, or an error naming the variables that were consulted.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self.llm.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Message(format!(
                "no Gemini API key configured; set llm.api_key or one of {}",
                API_KEY_FALLBACK_VARS.join(", ")
            )));
        }
        Ok(key)
    }
}

/// Where the loader looks when `VERITAS_CONFIG` is unset: `./veritas.yaml`
/// first, then `<config dir>/veritas/veritas.yaml`.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("veritas.yaml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("veritas").join("veritas.yaml"));
    }
    paths
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') || s.starts_with('~') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::full(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

// An unexpanded `${VAR}` means the variable was missing, which counts as unset.
fn apply_api_key_fallback(cfg: &mut VeritasConfig) {
    let current = cfg.llm.api_key.trim();
    if !current.is_empty() && !current.contains("${") {
        return;
    }
    cfg.llm.api_key = API_KEY_FALLBACK_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default();
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct VeritasConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VeritasConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VeritasConfigLoader {
    /// Start with no files; only `VERITAS__` env overrides.
    ///
    /// ```
    /// use veritas_config::{VeritasConfigLoader, DEFAULT_GEMINI_MODEL};
    ///
    /// let config = VeritasConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nllm:\n  api_key: abc")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.llm.api_key, "abc");
    /// assert_eq!(config.llm.model, DEFAULT_GEMINI_MODEL);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge the sources, apply `VERITAS__` env overrides, expand `${VAR}`
    /// placeholders, and materialise the typed configuration.
    ///
    /// ```
    /// use veritas_config::VeritasConfigLoader;
    ///
    /// let cfg = VeritasConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: gemini
    ///   api_key: "literal-key"
    ///   temperature: 0.3
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.llm.api_key, "literal-key");
    /// assert!((cfg.llm.temperature - 0.3).abs() < f32::EPSILON);
    /// assert_eq!(cfg.logging.format, "json");
    /// assert_eq!(cfg.logging.filter, "info");
    /// ```
    pub fn load(self) -> Result<VeritasConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("VERITAS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: VeritasConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        apply_api_key_fallback(&mut typed);

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("VERITAS_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${VERITAS_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_nested_objects() {
        temp_env::with_var("VERITAS_TEST_KEY", Some("k-123"), || {
            let mut v = json!({ "llm": { "api_key": "${VERITAS_TEST_KEY}", "temperature": 0.1 } });
            expand_env_in_value(&mut v);
            assert_eq!(v, json!({ "llm": { "api_key": "k-123", "temperature": 0.1 } }));
        });
    }

    #[test]
    fn expands_leading_tilde() {
        temp_env::with_var("HOME", Some("/home/tester"), || {
            let mut v = json!({ "logging": { "dir": "~/.local/share/veritas" } });
            expand_env_in_value(&mut v);
            assert_eq!(v["logging"]["dir"], json!("/home/tester/.local/share/veritas"));
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars(
            [("VERITAS_TEST_A", Some("${VERITAS_TEST_B}")), ("VERITAS_TEST_B", Some("${VERITAS_TEST_A}"))],
            || {
                let mut v = json!("x=${VERITAS_TEST_A}");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x="));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unresolved_placeholder_falls_back_to_gemini_key() {
        temp_env::with_vars(
            [("GEMINI_API_KEY", Some("from-gemini")), ("API_KEY", Some("from-api"))],
            || {
                let mut cfg = VeritasConfig::default();
                cfg.llm.api_key = "${VERITAS_TEST_UNSET_KEY}".into();
                apply_api_key_fallback(&mut cfg);
                assert_eq!(cfg.llm.api_key, "from-gemini");
            },
        );
    }

    #[test]
    fn explicit_key_is_not_replaced() {
        temp_env::with_var("GEMINI_API_KEY", Some("from-env"), || {
            let mut cfg = VeritasConfig::default();
            cfg.llm.api_key = "explicit".into();
            apply_api_key_fallback(&mut cfg);
            assert_eq!(cfg.llm.api_key, "explicit");
        });
    }

    #[test]
    fn missing_key_is_reported() {
        let cfg = VeritasConfig::default();
        let err = cfg.require_api_key().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
