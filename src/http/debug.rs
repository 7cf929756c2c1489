use reqwest::header::{HeaderName, HeaderValue};

const MASK: &str = "***";

/// Headers whose values never reach the log.
const SECRET_HEADERS: [&str; 4] = ["authorization", "proxy-authorization", "cookie", "set-cookie"];

/// Provider traffic logging, switched on by `--verbose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    /// Prompts carry the whole system template and scratchpad, so bodies are clipped.
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            enabled: verbose,
            max_body_chars: 4_000,
        }
    }

    pub fn disabled() -> Self {
        Self::from_verbose(false)
    }
}

/// Renders a header value for the log, keeping only the auth scheme of credentials.
pub fn mask_header(name: &HeaderName, value: &HeaderValue) -> String {
    let Ok(text) = value.to_str() else {
        return "<non-utf8>".to_string();
    };
    let name = name.as_str();
    if !SECRET_HEADERS.contains(&name) {
        return text.to_string();
    }

    match text.split_once(' ') {
        Some((scheme, _)) if name.ends_with("authorization") => {
            format!("{scheme} {MASK}")
        }
        _ => MASK.to_string(),
    }
}

pub fn clip_body(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        None => body.to_string(),
        Some((cut, _)) => {
            let dropped = body[cut..].chars().count();
            format!("{}... <truncated {dropped} chars>", &body[..cut])
        }
    }
}
