use std::fmt;

pub const COMPANY_POLICY_TOOL: &str = "get_company_policy_info";

/// A named capability the agent may call with a single string input.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn invoke(&self, input: &str) -> String;
}

/// Placeholder policy lookup. Echoes the topic into a fixed sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyPolicyInfo;

impl Tool for CompanyPolicyInfo {
    fn name(&self) -> &str {
        COMPANY_POLICY_TOOL
    }

    fn description(&self) -> &str {
        "Get Company Policy"
    }

    fn invoke(&self, input: &str) -> String {
        get_company_policy_info(input)
    }
}

pub fn get_company_policy_info(topic: &str) -> String {
    format!(
        "Kebijakan untuk topik '{topic}' akan disusun berdasarkan ketentuan perusahaan yang berlaku."
    )
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn with_default_tools() -> Self {
        let mut registry = Self::default();
        registry.register(CompanyPolicyInfo);
        registry
    }

    /// Adds a tool, replacing any earlier tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.retain(|existing| existing.name() != tool.name());
        self.tools.push(Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Runs the named tool, or explains which names are valid.
    pub fn dispatch(&self, name: &str, input: &str) -> String {
        match self.get(name) {
            Some(tool) => tool.invoke(input),
            None => format!(
                "{name} is not a valid tool, try one of [{}].",
                self.names().join(", ")
            ),
        }
    }
}
