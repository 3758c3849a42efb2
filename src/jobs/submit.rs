use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;

use crate::{
    config::Config,
    errors::{ApiError, Result},
};

/// IUPAC nucleotide codes, including ambiguity letters. A sequence whose
/// letters all fall in this set is treated as nucleotide.
const NUCLEOTIDE_ALPHABET: &str = "ACGTURYKMSWBDHVN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlastSelection {
    pub program: &'static str,
    pub database: &'static str,
}

/// Picks BLAST program/database from the sequence content. Best-effort:
/// a short homopolymer like "AAAA" is a valid degenerate protein string
/// but still classifies as nucleotide here.
pub fn select_blast_program(sequence: &str) -> BlastSelection {
    let letters: String = sequence
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_uppercase();

    let is_nucleotide =
        !letters.is_empty() && letters.chars().all(|c| NUCLEOTIDE_ALPHABET.contains(c));

    if is_nucleotide {
        BlastSelection {
            program: "blastn",
            database: "nt",
        }
    } else {
        BlastSelection {
            program: "blastp",
            database: "swissprot",
        }
    }
}

/// Extracts the RID from a BLAST submission response. The server answers
/// with either an HTML page carrying a `RID = <token>` line or a JSON
/// object with a `RID` field.
pub fn extract_rid(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(rid) = parsed["RID"].as_str() {
            return Some(rid.trim().to_string());
        }
    }

    static RID_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = RID_PATTERN.get_or_init(|| Regex::new(r"RID = (\S+)").expect("valid pattern"));
    pattern
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}

async fn submit_ebi(
    client: &Client,
    config: &Config,
    service: &str,
    form: &[(&str, &str)],
) -> Result<String> {
    let url = format!("{}/{}/run", config.ebi_base_url, service);
    let response = client.post(&url).form(form).send().await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "{} submission returned {}",
            service,
            response.status()
        )));
    }

    // EBI answers the run call with the bare job id as plain text.
    let job_id = response.text().await?.trim().to_string();
    if job_id.is_empty() {
        return Err(ApiError::Upstream("no job id received".to_string()));
    }

    tracing::info!(service, job_id = %job_id, "submitted EBI job");
    Ok(job_id)
}

pub async fn submit_align(client: &Client, config: &Config, sequences: &str) -> Result<String> {
    submit_ebi(
        client,
        config,
        "clustalo",
        &[
            ("email", config.contact_email.as_str()),
            ("sequence", sequences),
            ("stype", "dna"),
            ("outfmt", "clustal_num"),
        ],
    )
    .await
}

pub async fn submit_tree(client: &Client, config: &Config, sequences: &str) -> Result<String> {
    submit_ebi(
        client,
        config,
        "simple_phylogeny",
        &[
            ("email", config.contact_email.as_str()),
            ("sequence", sequences),
            ("stype", "dna"),
            ("treeformat", "newick"),
        ],
    )
    .await
}

pub async fn submit_mafft(client: &Client, config: &Config, sequences: &str) -> Result<String> {
    submit_ebi(
        client,
        config,
        "mafft",
        &[
            ("email", config.contact_email.as_str()),
            ("sequence", sequences),
            ("format", "fasta"),
            ("outfmt", "clustal"),
        ],
    )
    .await
}

pub async fn submit_blast(
    client: &Client,
    config: &Config,
    sequence: &str,
) -> Result<(String, BlastSelection)> {
    let selection = select_blast_program(sequence);

    let response = client
        .post(&config.blast_url)
        .form(&[
            ("CMD", "Put"),
            ("PROGRAM", selection.program),
            ("DATABASE", selection.database),
            ("QUERY", sequence),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "BLAST submission returned {}",
            response.status()
        )));
    }

    let body = response.text().await?;
    let rid = extract_rid(&body)
        .ok_or_else(|| ApiError::Upstream("no RID received from BLAST server".to_string()))?;

    tracing::info!(rid = %rid, program = selection.program, "submitted BLAST job");
    Ok((rid, selection))
}

pub async fn submit_structure(client: &Client, config: &Config, sequence: &str) -> Result<String> {
    let url = format!("{}/jobs", config.structure_base_url);
    let response = client
        .post(&url)
        .json(&serde_json::json!({ "sequence": sequence }))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ApiError::Upstream(format!(
            "structure submission returned {}",
            response.status()
        )));
    }

    let body: serde_json::Value = response.json().await?;
    let job_id = body["job_id"]
        .as_str()
        .map(|id| id.to_string())
        .ok_or_else(|| ApiError::Upstream("no job id received".to_string()))?;

    tracing::info!(job_id = %job_id, "submitted structure-prediction job");
    Ok(job_id)
}
