//! The question-answering entry point shared by the web form and tests.

use anyhow::{Context, Result};

use crate::agent::prompt::contains_forbidden_chars;
use crate::agent::tools::ToolRegistry;
use crate::agent::{
    AgentAnswer, AgentConfig, AgentProgressEvent, ModelSettings, run_question_with_events,
};
use crate::llm::provider::{ErrorKind, LlmError, LlmProvider};

pub const ERROR_MARKER: &str = "❌ Terjadi kesalahan:";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct AskRequest {
    pub question: String,
    /// `None` selects the assistant's default model.
    pub model: Option<String>,
    pub temperature: f32,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            model: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug)]
pub struct PolicyAssistant<P> {
    provider: P,
    tools: ToolRegistry,
    agent_config: AgentConfig,
    default_model: String,
}

impl<P: LlmProvider> PolicyAssistant<P> {
    pub fn new(provider: P, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            tools: ToolRegistry::with_default_tools(),
            agent_config: AgentConfig::default(),
            default_model: default_model.into(),
        }
    }

    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Answers the question, flattening any failure into a displayable string.
    pub async fn invoke(&self, request: &AskRequest) -> String {
        match self.try_invoke(request).await {
            Ok(answer) => answer.text,
            Err(err) => {
                tracing::error!(
                    kind = %error_kind(&err),
                    error = %format!("{err:#}"),
                    "question failed"
                );
                render_failure(&err)
            }
        }
    }

    pub async fn try_invoke(&self, request: &AskRequest) -> Result<AgentAnswer> {
        let settings = ModelSettings {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            temperature: request.temperature,
        };
        tracing::info!(
            model = %settings.model,
            temperature = settings.temperature,
            question_chars = request.question.chars().count(),
            "answering question"
        );

        let answer = run_question_with_events(
            &self.provider,
            &self.tools,
            &request.question,
            &settings,
            &self.agent_config,
            &mut log_progress,
        )
        .await
        .context("failed to answer question")?;

        if answer.stopped_early {
            tracing::warn!(iterations = answer.iterations, "agent hit its iteration limit");
        } else if contains_forbidden_chars(&answer.text) {
            tracing::warn!("answer contains characters the prompt asked the model to avoid");
        }

        Ok(answer)
    }
}

fn log_progress(event: AgentProgressEvent) {
    match event {
        AgentProgressEvent::StepStarted { step } => tracing::debug!(step, "agent step started"),
        AgentProgressEvent::ModelResponse { step, text } => {
            tracing::debug!(step, %text, "model replied");
        }
        AgentProgressEvent::ParseError { step, observation } => {
            tracing::info!(step, %observation, "model reply was not in ReAct format");
        }
        AgentProgressEvent::ToolRequest { step, name, input } => {
            tracing::info!(step, tool = %name, %input, "tool requested");
        }
        AgentProgressEvent::ToolResult {
            step,
            name,
            observation,
        } => tracing::debug!(step, tool = %name, %observation, "tool finished"),
    }
}

/// Finds the provider failure class anywhere in the error chain.
pub fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LlmError>())
        .map_or(ErrorKind::Configuration, LlmError::kind)
}

pub fn render_failure(err: &anyhow::Error) -> String {
    format!(
        "{ERROR_MARKER}\n{err:#}\n\nTraceback:\nkind: {}\n{err:?}",
        error_kind(err)
    )
}
