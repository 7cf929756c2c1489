use anyhow::{Context, Result};

use crate::agent::parser::{AgentAction, ParsedOutput, parse_react_output};
use crate::agent::prompt::{AgentStep, OBSERVATION_STOP, PromptContext};
use crate::agent::tools::ToolRegistry;
use crate::llm::provider::{ChatRequest, LlmProvider};

pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// Pseudo tool name recorded for steps whose reply could not be parsed.
const PARSE_ERROR_TOOL: &str = "_Exception";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_iterations: 15 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAnswer {
    pub text: String,
    pub iterations: usize,
    pub stopped_early: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentProgressEvent {
    StepStarted { step: usize },
    ModelResponse { step: usize, text: String },
    ParseError { step: usize, observation: String },
    ToolRequest { step: usize, name: String, input: String },
    ToolResult { step: usize, name: String, observation: String },
}

pub async fn run_question_with_events<P: LlmProvider, F: FnMut(AgentProgressEvent)>(
    provider: &P,
    tools: &ToolRegistry,
    question: &str,
    settings: &ModelSettings,
    config: &AgentConfig,
    on_event: &mut F,
) -> Result<AgentAnswer> {
    let mut steps: Vec<AgentStep> = Vec::new();

    for step in 1..=config.max_iterations {
        on_event(AgentProgressEvent::StepStarted { step });

        let messages = PromptContext {
            tools,
            question,
            steps: &steps,
        }
        .render();

        let output = provider
            .generate(ChatRequest {
                model: settings.model.clone(),
                temperature: settings.temperature,
                messages,
                stop: vec![OBSERVATION_STOP.to_string()],
            })
            .await
            .with_context(|| format!("model {} failed at agent step {step}", settings.model))?;

        on_event(AgentProgressEvent::ModelResponse {
            step,
            text: output.text.clone(),
        });

        match parse_react_output(&output.text) {
            Ok(ParsedOutput::Finish { output, .. }) => {
                return Ok(AgentAnswer {
                    text: output,
                    iterations: step,
                    stopped_early: false,
                });
            }
            Ok(ParsedOutput::Action(action)) => {
                on_event(AgentProgressEvent::ToolRequest {
                    step,
                    name: action.tool.clone(),
                    input: action.tool_input.clone(),
                });
                let observation = tools.dispatch(&action.tool, &action.tool_input);
                on_event(AgentProgressEvent::ToolResult {
                    step,
                    name: action.tool.clone(),
                    observation: observation.clone(),
                });
                steps.push(AgentStep {
                    action,
                    observation,
                });
            }
            Err(err) => {
                on_event(AgentProgressEvent::ParseError {
                    step,
                    observation: err.observation.clone(),
                });
                steps.push(AgentStep {
                    action: AgentAction {
                        tool: PARSE_ERROR_TOOL.to_string(),
                        tool_input: err.observation.clone(),
                        log: err.scratchpad_log().to_string(),
                    },
                    observation: err.observation,
                });
            }
        }
    }

    Ok(AgentAnswer {
        text: ITERATION_LIMIT_ANSWER.to_string(),
        iterations: config.max_iterations,
        stopped_early: true,
    })
}
