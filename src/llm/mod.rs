pub mod openrouter;
pub mod provider;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
