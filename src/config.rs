use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::DEFAULT_BASE_URL;

pub const DEFAULT_MODEL: &str = "google/gemma-3-27b-it:free";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

pub const DEFAULT_MODELS: [&str; 5] = [
    "deepseek/deepseek-r1:free",
    "qwen/qwen3-235b-a22b:free",
    "google/gemini-2.0-flash-exp:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
    "google/gemma-3-27b-it:free",
];

const CONFIG_DIR_NAME: &str = "hc-assistant";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    /// Used when a request does not name a model.
    pub default_model: String,
    /// Choices offered by the form, in display order.
    pub models: Vec<String>,
    pub host: String,
    pub port: u16,
    pub max_iterations: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    openrouter_api_key: Option<String>,
    openrouter_base_url: Option<String>,
    default_model: Option<String>,
    models: Option<Vec<String>>,
    host: Option<String>,
    port: Option<u16>,
    max_iterations: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = match explicit_path {
            Some(path) if !path.is_file() => {
                bail!("Failed to load config {}: file does not exist", path.display());
            }
            Some(path) => path.to_path_buf(),
            None => discover_config_path()?,
        };
        let file_config = load_file_config(&config_path)?;

        dotenvy::dotenv().ok();

        let file_string = |select: fn(&RawFileConfig) -> Option<&String>| {
            file_config
                .as_ref()
                .and_then(select)
                .and_then(|value| non_empty(value).map(ToOwned::to_owned))
        };
        let file_api_key = file_string(|cfg| cfg.openrouter_api_key.as_ref());
        let file_base_url = file_string(|cfg| cfg.openrouter_base_url.as_ref());
        let file_model = file_string(|cfg| cfg.default_model.as_ref());
        let file_host = file_string(|cfg| cfg.host.as_ref());

        let models = validate_models(
            file_config.as_ref().and_then(|cfg| cfg.models.as_deref()),
            &config_path,
        )?;

        let max_iterations = match file_config.as_ref().and_then(|cfg| cfg.max_iterations) {
            Some(0) => {
                return Err(config_error(
                    &config_path,
                    "max_iterations",
                    "must be at least 1",
                ));
            }
            Some(value) => value,
            None => DEFAULT_MAX_ITERATIONS,
        };

        let port = match env_non_empty("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|err| anyhow!("Invalid value for PORT '{value}': {err}"))?,
            None => file_config
                .as_ref()
                .and_then(|cfg| cfg.port)
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            config_path,
            openrouter_api_key: env_non_empty("OPENROUTER_API_KEY").or(file_api_key),
            openrouter_base_url: env_non_empty("OPENROUTER_BASE_URL")
                .or(file_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_model: env_non_empty("HC_ASSISTANT_MODEL")
                .or(file_model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            models,
            host: env_non_empty("HOST")
                .or(file_host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            max_iterations,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn validate_models(raw: Option<&[String]>, config_path: &Path) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect());
    };

    let mut models = Vec::with_capacity(raw.len());
    for value in raw {
        let model = non_empty(value)
            .ok_or_else(|| config_error(config_path, "models", "entries must not be empty"))?;
        if !models.iter().any(|existing: &String| existing == model) {
            models.push(model.to_string());
        }
    }

    if models.is_empty() {
        return Err(config_error(
            config_path,
            "models",
            "at least one model is required",
        ));
    }

    Ok(models)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}
