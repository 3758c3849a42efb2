use std::collections::HashMap;

use axum::extract::{Path, Query, State};

use crate::{
    errors::{ApiError, Result},
    handlers::AppState,
};

/// NCBI E-utilities passthrough for GenBank records. Fills in the
/// `tool`/`email` parameters E-utilities asks polite clients to send.
pub async fn fetch_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String> {
    let rettype = params.get("rettype").map(String::as_str).unwrap_or("gb");
    let retmode = params.get("retmode").map(String::as_str).unwrap_or("text");

    let response = state
        .http
        .get(&state.config.genbank_url)
        .query(&[
            ("db", "nucleotide"),
            ("id", id.as_str()),
            ("rettype", rettype),
            ("retmode", retmode),
            ("tool", "bioscribe"),
            ("email", state.config.contact_email.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "NCBI efetch returned {}",
            response.status()
        )));
    }

    Ok(response.text().await?)
}
