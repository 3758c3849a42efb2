use reqwest::Client;

use crate::{config::Config, errors::Result};

use super::JobStatus;

/// Each upstream reports status in its own encoding. One parser per
/// format, selected by tool, replaces per-call-site string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFormat {
    /// Plain-text body from the EBI job dispatcher: `RUNNING`, `FINISHED`, ...
    EbiPlain,
    /// NCBI BLAST `FORMAT_OBJECT=SearchInfo` body containing a `Status=` line.
    BlastSearchInfo,
    /// JSON body with a `status` field from the structure-prediction service.
    StructureJson,
}

impl StatusFormat {
    pub fn classify(self, body: &str) -> JobStatus {
        match self {
            StatusFormat::EbiPlain => classify_ebi(body),
            StatusFormat::BlastSearchInfo => classify_blast(body),
            StatusFormat::StructureJson => classify_structure(body),
        }
    }
}

fn classify_ebi(body: &str) -> JobStatus {
    match body.trim() {
        "FINISHED" => JobStatus::Ready,
        "RUNNING" | "PENDING" | "QUEUED" => JobStatus::Pending,
        "FAILED" | "FAILURE" | "ERROR" | "NOT_FOUND" => {
            JobStatus::Failed(format!("EBI reported {}", body.trim()))
        }
        other => JobStatus::Unknown(truncate(other)),
    }
}

fn classify_blast(body: &str) -> JobStatus {
    let token = body
        .lines()
        .find_map(|line| line.trim().strip_prefix("Status="))
        .map(str::trim);

    match token {
        Some("WAITING") => JobStatus::Pending,
        Some("READY") => JobStatus::Ready,
        Some("FAILED") => JobStatus::Failed("BLAST reported failure".to_string()),
        // UNKNOWN is BLAST's own token for an expired or bogus RID.
        Some("UNKNOWN") => JobStatus::Failed("BLAST RID expired or not found".to_string()),
        Some(other) => JobStatus::Unknown(truncate(other)),
        None => JobStatus::Unknown(truncate(body)),
    }
}

fn classify_structure(body: &str) -> JobStatus {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return JobStatus::Unknown(truncate(body)),
    };

    match parsed["status"].as_str() {
        Some("PENDING") | Some("RUNNING") => JobStatus::Pending,
        Some("COMPLETED") => JobStatus::Ready,
        Some("FAILED") => JobStatus::Failed(
            parsed["message"]
                .as_str()
                .unwrap_or("structure prediction failed")
                .to_string(),
        ),
        Some(other) => JobStatus::Unknown(truncate(other)),
        None => JobStatus::Unknown(truncate(body)),
    }
}

// Keeps raw-payload diagnostics bounded in logs and error bodies.
fn truncate(raw: &str) -> String {
    raw.chars().take(200).collect()
}

pub async fn query_ebi_status(
    client: &Client,
    config: &Config,
    service: &str,
    job_id: &str,
) -> Result<JobStatus> {
    let url = format!("{}/{}/status/{}", config.ebi_base_url, service, job_id);
    let body = client.get(&url).send().await?.text().await?;
    Ok(StatusFormat::EbiPlain.classify(&body))
}

pub async fn query_blast_status(client: &Client, config: &Config, rid: &str) -> Result<JobStatus> {
    let body = client
        .get(&config.blast_url)
        .query(&[("CMD", "Get"), ("FORMAT_OBJECT", "SearchInfo"), ("RID", rid)])
        .send()
        .await?
        .text()
        .await?;
    Ok(StatusFormat::BlastSearchInfo.classify(&body))
}

pub async fn query_structure_status(
    client: &Client,
    config: &Config,
    job_id: &str,
) -> Result<JobStatus> {
    let url = format!("{}/jobs/{}", config.structure_base_url, job_id);
    let body = client.get(&url).send().await?.text().await?;
    Ok(StatusFormat::StructureJson.classify(&body))
}
