use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

/// Asks the lexical index for catalog ids whose text fields resemble
/// `keyword` above `threshold`.
pub async fn matches(
	cfg: &dashi_config::LexicalBackendConfig,
	keyword: &str,
	threshold: f32,
) -> Result<Vec<(i64, f32)>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"keyword": keyword,
		"threshold": threshold,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	crate::parse_match_response(json)
}
