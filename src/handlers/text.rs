use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    errors::Result,
    handlers::AppState,
    middleware::AuthenticatedUser,
    services::validate::{
        coerce_image_mime, require_field, require_size, MAX_CONTENT_BYTES, MAX_IMAGE_BYTES,
        MAX_TEXT_BYTES,
    },
};

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainFigureRequest {
    #[serde(rename = "imageBase64")]
    pub image_base64: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct ExplainFigureResponse {
    pub explanation: String,
}

pub async fn predict(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    require_field(&request.text, "Text")?;
    require_size(&request.text, MAX_TEXT_BYTES, "Text")?;

    state.quota.check_and_consume(&user.uid, &user.email).await?;

    // "@template" anywhere in the input switches to template-structure mode.
    let prompt = if request.text.to_lowercase().contains("@template") {
        let topic = strip_template_marker(&request.text);
        format!(
            "You are a professional writing assistant. Create a detailed template structure with sections for: {}",
            topic
        )
    } else {
        format!(
            "You are a helpful writing assistant. Continue the following text naturally with 1-2 sentences:\n\n{}",
            request.text
        )
    };

    let suggestion = state.generative.complete(&prompt).await?;
    Ok(Json(PredictResponse { suggestion }))
}

fn strip_template_marker(text: &str) -> String {
    static MARKER: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let marker = MARKER.get_or_init(|| regex::Regex::new("(?i)@template").expect("valid pattern"));
    marker.replace_all(text, "").trim().to_string()
}

pub async fn summarize(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>> {
    require_field(&request.content, "Content")?;
    require_size(&request.content, MAX_CONTENT_BYTES, "Content")?;

    state.quota.check_and_consume(&user.uid, &user.email).await?;

    let prompt = format!(
        "Summarize the following scientific text concisely:\n\n{}",
        request.content
    );
    let summary = state.generative.complete(&prompt).await?;
    Ok(Json(SummarizeResponse { summary }))
}

pub async fn explain_figure(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ExplainFigureRequest>,
) -> Result<Json<ExplainFigureResponse>> {
    require_field(&request.image_base64, "Image data")?;
    require_size(&request.image_base64, MAX_IMAGE_BYTES, "Image")?;

    let mime_type = coerce_image_mime(&request.mime_type).to_string();

    state.quota.check_and_consume(&user.uid, &user.email).await?;

    let explanation = state
        .generative
        .explain_image(
            "Please explain this scientific figure in detail.",
            &request.image_base64,
            &mime_type,
        )
        .await?;

    Ok(Json(ExplainFigureResponse { explanation }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_template_marker() {
        assert_eq!(
            strip_template_marker("@template grant proposal"),
            "grant proposal"
        );
        assert_eq!(
            strip_template_marker("methods @TEMPLATE section"),
            "methods  section"
        );
        assert_eq!(strip_template_marker("no marker"), "no marker");
    }
}
