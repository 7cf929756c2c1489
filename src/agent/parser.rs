use std::sync::LazyLock;

use regex::Regex;

pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

pub const MISSING_ACTION_OBSERVATION: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";
pub const MISSING_ACTION_INPUT_OBSERVATION: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";
pub const INVALID_RESPONSE_OBSERVATION: &str = "Invalid or incomplete response";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("valid action regex")
});
static ACTION_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Action\s*\d*\s*:").expect("valid action-only regex"));
static ACTION_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[\s]*Action\s*\d*\s*Input\s*\d*\s*:").expect("valid action-input regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// Raw model text that produced this action.
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOutput {
    Action(AgentAction),
    Finish { output: String, log: String },
}

/// A model reply that fits neither the action nor the final-answer shape.
///
/// `observation` is what the loop feeds back to the model so it can correct itself.
/// When `send_to_llm` is set the raw reply goes into the scratchpad, otherwise the message does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub observation: String,
    pub llm_output: String,
    pub send_to_llm: bool,
}

impl ParseError {
    /// Text recorded as the step log for this failed reply.
    pub fn scratchpad_log(&self) -> &str {
        if self.send_to_llm {
            &self.llm_output
        } else {
            &self.message
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

pub fn parse_react_output(text: &str) -> Result<ParsedOutput, ParseError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = ACTION_RE.captures(text) {
        if includes_answer {
            return Err(ParseError {
                message: format!(
                    "Parsing LLM output produced both a final answer and a parse-able action:: {text}"
                ),
                observation: INVALID_RESPONSE_OBSERVATION.to_string(),
                llm_output: text.to_string(),
                send_to_llm: false,
            });
        }

        let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
        let tool_input = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .trim_matches(' ')
            .trim_matches('"');
        return Ok(ParsedOutput::Action(AgentAction {
            tool: tool.to_string(),
            tool_input: tool_input.to_string(),
            log: text.to_string(),
        }));
    }

    if includes_answer {
        let output = text
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        return Ok(ParsedOutput::Finish {
            output: output.to_string(),
            log: text.to_string(),
        });
    }

    let (observation, send_to_llm) = if !ACTION_ONLY_RE.is_match(text) {
        (MISSING_ACTION_OBSERVATION, true)
    } else if !ACTION_INPUT_RE.is_match(text) {
        (MISSING_ACTION_INPUT_OBSERVATION, true)
    } else {
        (INVALID_RESPONSE_OBSERVATION, false)
    };

    Err(ParseError {
        message: format!("Could not parse LLM output: `{text}`"),
        observation: observation.to_string(),
        llm_output: text.to_string(),
        send_to_llm,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        AgentAction, INVALID_RESPONSE_OBSERVATION, MISSING_ACTION_INPUT_OBSERVATION,
        MISSING_ACTION_OBSERVATION, ParsedOutput, parse_react_output,
    };

    #[test]
    fn parses_action_and_strips_quotes_from_input() {
        let text = "Thought: perlu cek kebijakan\nAction: get_company_policy_info\nAction Input: \"cuti tahunan\"";
        let parsed = parse_react_output(text).expect("action");

        assert_eq!(
            parsed,
            ParsedOutput::Action(AgentAction {
                tool: "get_company_policy_info".to_string(),
                tool_input: "cuti tahunan".to_string(),
                log: text.to_string(),
            })
        );
    }

    #[test]
    fn parses_numbered_action_labels() {
        let text = "Action 1: get_company_policy_info\nAction 1 Input: lembur";
        let Ok(ParsedOutput::Action(action)) = parse_react_output(text) else {
            panic!("expected action");
        };
        assert_eq!(action.tool, "get_company_policy_info");
        assert_eq!(action.tool_input, "lembur");
    }

    #[test]
    fn parses_final_answer_after_last_marker() {
        let text = "Thought: Saya tahu jawaban akhirnya.\nFinal Answer:  Manajer wajib menyetujui cuti. \n";
        let parsed = parse_react_output(text).expect("finish");

        assert_eq!(
            parsed,
            ParsedOutput::Finish {
                output: "Manajer wajib menyetujui cuti.".to_string(),
                log: text.to_string(),
            }
        );
    }

    #[test]
    fn rejects_final_answer_mixed_with_action() {
        let text = "Action: get_company_policy_info\nAction Input: cuti\nFinal Answer: selesai";
        let err = parse_react_output(text).expect_err("ambiguous output");

        assert!(err.message.starts_with(
            "Parsing LLM output produced both a final answer and a parse-able action:"
        ));
        assert_eq!(err.observation, INVALID_RESPONSE_OBSERVATION);
        assert_eq!(err.llm_output, text);
        assert_eq!(err.scratchpad_log(), err.message);
    }

    #[test]
    fn reports_missing_action() {
        let err = parse_react_output("Manajer wajib menyetujui cuti.").expect_err("no action");
        assert_eq!(err.observation, MISSING_ACTION_OBSERVATION);
        assert_eq!(
            err.message,
            "Could not parse LLM output: `Manajer wajib menyetujui cuti.`"
        );
    }

    #[test]
    fn reports_missing_action_input() {
        let err = parse_react_output("Thought: cek\nAction: get_company_policy_info")
            .expect_err("no action input");
        assert_eq!(err.observation, MISSING_ACTION_INPUT_OBSERVATION);
        assert_eq!(err.scratchpad_log(), "Thought: cek\nAction: get_company_policy_info");
    }

    #[test]
    fn input_before_action_is_invalid_response() {
        let text = "Action Input: cuti\nAction: get_company_policy_info";
        let err = parse_react_output(text).expect_err("labels out of order");

        assert_eq!(err.observation, INVALID_RESPONSE_OBSERVATION);
        assert!(!err.send_to_llm);
        assert_eq!(
            err.scratchpad_log(),
            "Could not parse LLM output: `Action Input: cuti\nAction: get_company_policy_info`"
        );
    }

    #[test]
    fn empty_reply_is_missing_action() {
        let err = parse_react_output("").expect_err("empty");
        assert_eq!(err.observation, MISSING_ACTION_OBSERVATION);
    }
}
