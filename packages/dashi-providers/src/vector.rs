use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

/// Asks the nearest-neighbor index for catalog ids whose embedding is within
/// cosine distance of the embedded `query_text`. `restrict_to` narrows the
/// candidate space to an exact id set.
pub async fn matches(
	cfg: &dashi_config::VectorBackendConfig,
	query_text: &str,
	threshold: f32,
	restrict_to: Option<&[i64]>,
) -> Result<Vec<(i64, f32)>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut body = serde_json::json!({
		"model": cfg.model,
		"query": query_text,
		"threshold": threshold,
	});
	if let Some(ids) = restrict_to {
		body["restrict_to"] = serde_json::json!(ids);
	}
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	crate::parse_match_response(json)
}
