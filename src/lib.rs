pub mod agent;
pub mod cli;
pub mod config;
pub mod http;
pub mod llm;
pub mod service;
pub mod web;

use agent::AgentConfig;
use anyhow::{Context, Result};
use axum::Router;
use cli::CliArgs;
use config::AppConfig;
use http::client::HttpClient;
use http::debug::HttpDebugConfig;
use llm::openrouter::OpenRouterProvider;
use service::PolicyAssistant;
use web::AppState;

pub async fn run(args: CliArgs) -> Result<()> {
    let mut config = AppConfig::load_with_path(args.config.as_deref())?;
    apply_cli_overrides(&mut config, &args);

    tracing::info!(
        config = %config.config_path.display(),
        model = %config.default_model,
        base_url = %config.openrouter_base_url,
        "loaded configuration"
    );

    let app = build_app(&config, HttpDebugConfig::from_verbose(args.verbose));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind web server on {addr}"))?;
    tracing::info!("serving on http://{addr}");

    axum::serve(listener, app)
        .await
        .context("web server stopped unexpectedly")
}

pub fn build_app(config: &AppConfig, debug: HttpDebugConfig) -> Router {
    let http = HttpClient::new(reqwest::Client::new(), debug);
    let provider = OpenRouterProvider::new(
        http,
        config.openrouter_api_key.clone(),
        config.openrouter_base_url.clone(),
    );
    let assistant = PolicyAssistant::new(provider, config.default_model.clone())
        .with_agent_config(AgentConfig {
            max_iterations: config.max_iterations,
        });

    web::router(AppState::new(assistant, config.models.clone()))
}

fn apply_cli_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(host) = args.host.as_deref() {
        config.host = host.to_string();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
}

#[cfg(test)]
mod tests {
    use super::apply_cli_overrides;
    use crate::cli::CliArgs;
    use crate::config::{AppConfig, DEFAULT_MODELS};
    use clap::Parser;
    use std::path::PathBuf;

    fn sample_config() -> AppConfig {
        AppConfig {
            config_path: PathBuf::from("/tmp/hc-assistant/config.toml"),
            openrouter_api_key: None,
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            default_model: "google/gemma-3-27b-it:free".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect(),
            host: "0.0.0.0".to_string(),
            port: 7860,
            max_iterations: 15,
        }
    }

    #[test]
    fn cli_flags_override_loaded_config() {
        let mut config = sample_config();
        let args =
            CliArgs::try_parse_from(["hc-assistant", "--host", "127.0.0.1", "--port", "9001"])
                .expect("parse");

        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9001);
    }

    #[test]
    fn absent_flags_keep_loaded_config() {
        let mut config = sample_config();
        let args = CliArgs::try_parse_from(["hc-assistant"]).expect("parse");

        apply_cli_overrides(&mut config, &args);
        assert_eq!(config, sample_config());
    }
}
