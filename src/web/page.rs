use std::fmt::Write as _;

pub const PAGE_TITLE: &str = "Telkom HC Assistant";

/// Values shown in the form, either defaults or the last submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView<'a> {
    pub models: &'a [String],
    pub question: &'a str,
    pub selected_model: Option<&'a str>,
    pub temperature: f32,
    pub answer: &'a str,
}

impl<'a> FormView<'a> {
    pub fn empty(models: &'a [String]) -> Self {
        Self {
            models,
            question: "",
            selected_model: None,
            temperature: crate::service::DEFAULT_TEMPERATURE,
            answer: "",
        }
    }
}

pub fn render_form(view: &FormView<'_>) -> String {
    let selected = view
        .selected_model
        .filter(|model| view.models.iter().any(|m| m.as_str() == *model))
        .or_else(|| view.models.first().map(String::as_str));

    let mut options = String::new();
    for model in view.models {
        let marker = if Some(model.as_str()) == selected {
            " selected"
        } else {
            ""
        };
        let model = escape_html(model);
        let _ = writeln!(
            options,
            r#"        <option value="{model}"{marker}>{model}</option>"#
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <form method="post" action="/">
    <label for="answer">Jawaban AI</label>
    <textarea id="answer" rows="10" readonly>
{answer}</textarea>
    <label for="question">Pertanyaan</label>
    <textarea id="question" name="question" rows="4" required>
{question}</textarea>
    <label for="model">Pilih Model</label>
    <select id="model" name="model">
{options}    </select>
    <label for="temperature">Temperature (Kreativitas)</label>
    <input type="range" id="temperature" name="temperature" min="0" max="1" step="0.1" value="{temperature}">
    <button type="submit">Kirim</button>
  </form>
</body>
</html>
"#,
        title = PAGE_TITLE,
        answer = escape_html(view.answer),
        question = escape_html(view.question),
        temperature = view.temperature,
    )
}

pub fn render_not_found(path: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title></head>\n<body><h1>404</h1><p>Halaman {} tidak ditemukan.</p><p><a href=\"/\">Kembali</a></p></body>\n</html>\n",
        escape_html(path)
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
