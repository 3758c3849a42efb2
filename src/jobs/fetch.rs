use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::Config,
    errors::{ApiError, Result},
};

/// Normalized structure-prediction output.
#[derive(Debug, Clone, Serialize)]
pub struct StructureResult {
    #[serde(rename = "pdbStructure")]
    pub pdb_structure: String,
    #[serde(rename = "confidenceScore")]
    pub confidence_score: f64,
}

/// Retrieves the finished result of an EBI job in the named render
/// format (`aln-clustal_num`, `tree`, `out`). Fetch never retries: the
/// poll loop already confirmed readiness, so any failure here is a
/// genuine upstream fault and surfaces immediately.
pub async fn fetch_ebi_result(
    client: &Client,
    config: &Config,
    service: &str,
    job_id: &str,
    render: &str,
) -> Result<String> {
    let url = format!(
        "{}/{}/result/{}/{}",
        config.ebi_base_url, service, job_id, render
    );
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "{} result fetch returned {}",
            service,
            response.status()
        )));
    }

    Ok(response.text().await?)
}

pub async fn fetch_blast_result(client: &Client, config: &Config, rid: &str) -> Result<Value> {
    let response = client
        .get(&config.blast_url)
        .query(&[("CMD", "Get"), ("FORMAT_TYPE", "JSON2_S"), ("RID", rid)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "BLAST result fetch returned {}",
            response.status()
        )));
    }

    Ok(coerce_json(response.text().await?))
}

/// Generic text relays sometimes hand JSON back as a string body. Parse
/// when possible and fall back to the raw text; callers tolerate either
/// shape.
pub fn coerce_json(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}

pub async fn fetch_structure_result(
    client: &Client,
    config: &Config,
    job_id: &str,
) -> Result<StructureResult> {
    let url = format!("{}/jobs/{}/result", config.structure_base_url, job_id);
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "structure result fetch returned {}",
            response.status()
        )));
    }

    let body: Value = response.json().await?;
    let pdb = body["pdb"]
        .as_str()
        .ok_or_else(|| ApiError::Upstream("structure result missing pdb text".to_string()))?;

    Ok(StructureResult {
        pdb_structure: pdb.to_string(),
        confidence_score: body["confidence"].as_f64().unwrap_or(0.0),
    })
}
