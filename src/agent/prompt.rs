use crate::agent::parser::AgentAction;
use crate::agent::tools::ToolRegistry;
use crate::llm::provider::ChatMessage;

const SYSTEM_TEMPLATE: &str = r#"Anda adalah konsultan perusahaan yang ingin membuat kebijakan perusahaan dalam bentuk tulisan dengan gaya formal dan tegas dengan kalimat perintah yang jelas untuk ditulis dalam peraturan perusahaan "hanya satu paragraph saja" juga memiliki banyak sekali action words yang menegaskan tugas seseorang atau suatu fungsi di perusahaan, Anda memiliki akses ke alat berikut:
{tools}

Nama-nama alat yang tersedia: {tool_names}

Ikuti format ini dengan ketat:

Thought: Anda harus selalu memikirkan apa yang harus dilakukan.
Action: Nama alat yang harus dipanggil. Harus salah satu dari [{tool_names}].
Action Input: Masukan ke alat (berupa string JSON).
Observation: Hasil dari alat.
... (ini Thought/Action/Action Input/Observation bisa berulang beberapa kali)
Thought: Saya tahu jawaban akhirnya.
Final Answer: Jawaban akhir untuk pertanyaan asli.

format jawaban:
tidak boleh menggunakan tanda " atau # @ ¥ *+=
"#;

/// Characters the system prompt tells the model to keep out of its final answer.
pub const FORBIDDEN_ANSWER_CHARS: [char; 7] = ['"', '#', '@', '¥', '*', '+', '='];

/// Stops generation before the model invents its own tool observation.
pub const OBSERVATION_STOP: &str = "\nObservation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleExample {
    pub input: &'static str,
    pub output: &'static str,
}

pub const STYLE_EXAMPLES: [StyleExample; 2] = [
    StyleExample {
        input: "direktur utama harus mengawasi pegawai di cxo office",
        output: "Direktur Utama wajib mengawasi kinerja seluruh pegawai di CXO Office, memberikan dukungan penuh dalam pelaksanaan tugas, dan segera melaporkan setiap temuan kesalahan, ketidaksesuaian, atau pelanggaran kepada komite etik perusahaan untuk ditindaklanjuti sesuai prosedur yang berlaku.",
    },
    StyleExample {
        input: "vp harus mengawasi bawahan mulai dari band 2 hingga band 6",
        output: "Wakil Presiden wajib mengawasi seluruh bawahan dengan rentang grade 2 hingga grade 6, menetapkan tugas secara jelas, dan memastikan kinerja setiap bawahan mencapai standar optimal yang telah ditetapkan perusahaan.",
    },
];

/// One completed iteration of the agent loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStep {
    pub action: AgentAction,
    pub observation: String,
}

/// Everything the model sees for one step. Built fresh each time.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub tools: &'a ToolRegistry,
    pub question: &'a str,
    pub steps: &'a [AgentStep],
}

impl PromptContext<'_> {
    /// Instructions first, then the style examples, then the live question.
    pub fn render(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 + STYLE_EXAMPLES.len() * 2);
        messages.push(ChatMessage::system(render_system_instructions(self.tools)));
        for example in &STYLE_EXAMPLES {
            messages.push(ChatMessage::user(example.input));
            messages.push(ChatMessage::assistant(example.output));
        }
        messages.push(ChatMessage::user(format!(
            "{}\n\n{}",
            self.question,
            format_scratchpad(self.steps)
        )));
        messages
    }
}

pub fn render_system_instructions(tools: &ToolRegistry) -> String {
    SYSTEM_TEMPLATE
        .replace("{tools}", &tools.render_descriptions())
        .replace("{tool_names}", &tools.names().join(", "))
}

pub fn format_scratchpad(steps: &[AgentStep]) -> String {
    let mut thoughts = String::new();
    for step in steps {
        thoughts.push_str(&step.action.log);
        thoughts.push_str("\nObservation: ");
        thoughts.push_str(&step.observation);
        thoughts.push_str("\nThought: ");
    }
    thoughts
}

pub fn contains_forbidden_chars(answer: &str) -> bool {
    answer.chars().any(|ch| FORBIDDEN_ANSWER_CHARS.contains(&ch))
}
