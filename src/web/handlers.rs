use axum::{
    extract::{Form, State, rejection::FormRejection},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::llm::provider::LlmProvider;
use crate::service::{AskRequest, DEFAULT_TEMPERATURE, ERROR_MARKER};

use super::AppState;
use super::page::{FormView, render_form, render_not_found};

/// Raw form fields. Everything is text so a bad value still renders the page.
#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
}

/// Empty means "use the default"; anything else must be a finite number.
fn parse_temperature(raw: Option<&str>) -> Result<f32, String> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(DEFAULT_TEMPERATURE);
    };
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("Temperature '{raw}' bukan angka yang valid.")),
    }
}

pub async fn show_form<P>(State(state): State<AppState<P>>) -> Html<String>
where
    P: LlmProvider + Send + Sync + 'static,
{
    Html(render_form(&FormView::empty(&state.models)))
}

pub async fn submit_form<P>(
    State(state): State<AppState<P>>,
    form: Result<Form<AskForm>, FormRejection>,
) -> Html<String>
where
    P: LlmProvider + Send + Sync + 'static,
{
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected form submission");
            let answer = format!("{ERROR_MARKER}\n{rejection}");
            let mut view = FormView::empty(&state.models);
            view.answer = &answer;
            return Html(render_form(&view));
        }
    };

    let model = form.model.filter(|model| !model.trim().is_empty());
    let (temperature, answer) = match parse_temperature(form.temperature.as_deref()) {
        Ok(temperature) => {
            let mut request =
                AskRequest::new(form.question.as_str()).with_temperature(temperature);
            if let Some(model) = &model {
                request = request.with_model(model.as_str());
            }
            (temperature, state.assistant.invoke(&request).await)
        }
        Err(reason) => {
            tracing::warn!(%reason, "rejected form submission");
            (DEFAULT_TEMPERATURE, format!("{ERROR_MARKER}\n{reason}"))
        }
    };

    Html(render_form(&FormView {
        models: &state.models,
        question: &form.question,
        selected_model: model.as_deref(),
        temperature,
        answer: &answer,
    }))
}

pub async fn not_found(uri: Uri) -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found(uri.path()))).into_response()
}
