use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    errors::{ApiError, Result},
    handlers::AppState,
    middleware::AuthenticatedUser,
};

/// SSRF-guarded relay. The destination must exactly-prefix-match the
/// configured allow-list or the request never leaves the process.
/// Method, query parameters (minus the `url` meta-parameter), and body
/// pass through verbatim; upstream status, body, and `Set-Cookie` come
/// back unmodified so BLAST session semantics survive the hop.
pub async fn forward(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response> {
    let target = params
        .get("url")
        .cloned()
        .ok_or_else(|| ApiError::InvalidArgument("Missing target URL".to_string()))?;

    if !state
        .config
        .proxy_allow_list
        .iter()
        .any(|prefix| target.starts_with(prefix.as_str()))
    {
        return Err(ApiError::Forbidden);
    }

    let forwarded_params: Vec<(String, String)> = params
        .into_iter()
        .filter(|(key, _)| key != "url")
        .collect();

    let upstream_method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|_| ApiError::InvalidArgument("Unsupported method".to_string()))?;

    let mut request = state
        .http
        .request(upstream_method, &target)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("User-Agent", "Mozilla/5.0")
        .header("Origin", "https://blast.ncbi.nlm.nih.gov")
        .header("Referer", "https://blast.ncbi.nlm.nih.gov/");

    if method == Method::GET {
        request = request.query(&forwarded_params);
    } else if !body.is_empty() {
        request = request.body(body.to_vec());
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    // reqwest and axum sit on different http versions; bridge status and
    // cookie headers by value.
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    let mut headers = HeaderMap::new();
    for cookie in upstream.headers().get_all(reqwest::header::SET_COOKIE) {
        if let Ok(value) = HeaderValue::from_bytes(cookie.as_bytes()) {
            headers.append(header::SET_COOKIE, value);
        }
    }

    let body_text = upstream
        .text()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok((status, headers, body_text).into_response())
}
