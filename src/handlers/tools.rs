use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    errors::Result,
    handlers::AppState,
    jobs::{
        fetch, poll::poll_until_ready, status, submit, JobHandle, Tool,
    },
    middleware::AuthenticatedUser,
    services::validate::{require_field, require_size, MAX_SEQUENCE_BYTES},
};

#[derive(Debug, Deserialize)]
pub struct SequencesRequest {
    pub sequences: String,
}

#[derive(Debug, Deserialize)]
pub struct SequenceRequest {
    pub sequence: String,
}

#[derive(Debug, Serialize)]
pub struct AlignResponse {
    #[serde(rename = "alignedSequences")]
    pub aligned_sequences: String,
}

#[derive(Debug, Serialize)]
pub struct TreeResponse {
    pub tree: String,
    #[serde(rename = "treeFormat")]
    pub tree_format: &'static str,
}

/// Clustal Omega multiple sequence alignment.
pub async fn align(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SequencesRequest>,
) -> Result<Json<AlignResponse>> {
    require_field(&request.sequences, "Sequences")?;
    require_size(&request.sequences, MAX_SEQUENCE_BYTES, "Sequences")?;

    let job_id = submit::submit_align(&state.http, &state.config, &request.sequences).await?;
    let mut handle = JobHandle::new(Tool::Align, job_id.clone());

    poll_until_ready(
        &mut handle,
        state.config.ebi_poll.into(),
        || status::query_ebi_status(&state.http, &state.config, "clustalo", &job_id),
        |progress| tracing::debug!(job_id = %job_id, progress, "alignment job progress"),
    )
    .await?;

    let aligned_sequences =
        fetch::fetch_ebi_result(&state.http, &state.config, "clustalo", &job_id, "aln-clustal_num")
            .await?;

    Ok(Json(AlignResponse { aligned_sequences }))
}

/// Simple Phylogeny tree construction; result is Newick text.
pub async fn construct_tree(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SequencesRequest>,
) -> Result<Json<TreeResponse>> {
    require_field(&request.sequences, "Sequences")?;
    require_size(&request.sequences, MAX_SEQUENCE_BYTES, "Sequences")?;

    let job_id = submit::submit_tree(&state.http, &state.config, &request.sequences).await?;
    let mut handle = JobHandle::new(Tool::Tree, job_id.clone());

    poll_until_ready(
        &mut handle,
        state.config.ebi_poll.into(),
        || status::query_ebi_status(&state.http, &state.config, "simple_phylogeny", &job_id),
        |progress| tracing::debug!(job_id = %job_id, progress, "tree job progress"),
    )
    .await?;

    let tree =
        fetch::fetch_ebi_result(&state.http, &state.config, "simple_phylogeny", &job_id, "tree")
            .await?;

    Ok(Json(TreeResponse {
        tree,
        tree_format: "newick",
    }))
}

/// MAFFT multiple sequence alignment.
pub async fn mafft(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SequencesRequest>,
) -> Result<Json<AlignResponse>> {
    require_field(&request.sequences, "Sequences")?;
    require_size(&request.sequences, MAX_SEQUENCE_BYTES, "Sequences")?;

    let job_id = submit::submit_mafft(&state.http, &state.config, &request.sequences).await?;
    let mut handle = JobHandle::new(Tool::Mafft, job_id.clone());

    poll_until_ready(
        &mut handle,
        state.config.ebi_poll.into(),
        || status::query_ebi_status(&state.http, &state.config, "mafft", &job_id),
        |progress| tracing::debug!(job_id = %job_id, progress, "mafft job progress"),
    )
    .await?;

    let aligned_sequences =
        fetch::fetch_ebi_result(&state.http, &state.config, "mafft", &job_id, "out").await?;

    Ok(Json(AlignResponse { aligned_sequences }))
}

/// Full server-side BLAST flow: program selection, submission, polling,
/// JSON2_S result fetch.
pub async fn blast(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<Value>> {
    require_field(&request.sequence, "Sequence")?;
    require_size(&request.sequence, MAX_SEQUENCE_BYTES, "Sequence")?;

    let (rid, selection) =
        submit::submit_blast(&state.http, &state.config, &request.sequence).await?;
    let mut handle = JobHandle::new(Tool::Blast, rid.clone());

    poll_until_ready(
        &mut handle,
        state.config.blast_poll.into(),
        || status::query_blast_status(&state.http, &state.config, &rid),
        |progress| tracing::debug!(rid = %rid, progress, "BLAST job progress"),
    )
    .await?;

    let results = fetch::fetch_blast_result(&state.http, &state.config, &rid).await?;

    Ok(Json(json!({
        "results": results,
        "program": selection.program,
        "database": selection.database,
    })))
}

/// SwissModel-style structure prediction; longer poll interval.
pub async fn predict_structure(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<fetch::StructureResult>> {
    require_field(&request.sequence, "Sequence")?;
    require_size(&request.sequence, MAX_SEQUENCE_BYTES, "Sequence")?;

    let job_id = submit::submit_structure(&state.http, &state.config, &request.sequence).await?;
    let mut handle = JobHandle::new(Tool::Structure, job_id.clone());

    poll_until_ready(
        &mut handle,
        state.config.structure_poll.into(),
        || status::query_structure_status(&state.http, &state.config, &job_id),
        |progress| tracing::debug!(job_id = %job_id, progress, "structure job progress"),
    )
    .await?;

    let result = fetch::fetch_structure_result(&state.http, &state.config, &job_id).await?;
    Ok(Json(result))
}
