mod loop_impl;
pub mod parser;
pub mod prompt;
pub mod tools;

pub use loop_impl::{
    AgentAnswer, AgentConfig, AgentProgressEvent, ITERATION_LIMIT_ANSWER, ModelSettings,
    run_question_with_events,
};
