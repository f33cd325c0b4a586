pub mod lexical;
pub mod vector;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};
		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}
	Ok(headers)
}

/// Both backend services answer with the same shape:
/// `{"matches": [{"id": <i64>, "similarity": <f32>}, ...]}`.
pub(crate) fn parse_match_response(json: Value) -> Result<Vec<(i64, f32)>> {
	let matches = json
		.get("matches")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Match response is missing matches array."))?;

	let mut out = Vec::with_capacity(matches.len());
	for item in matches {
		let id = item
			.get("id")
			.and_then(|v| v.as_i64())
			.ok_or_else(|| eyre::eyre!("Match item missing integer id."))?;
		let similarity = item
			.get("similarity")
			.and_then(|v| v.as_f64())
			.ok_or_else(|| eyre::eyre!("Match item missing numeric similarity."))?;
		out.push((id, similarity as f32));
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_matches_in_response_order() {
		let json = serde_json::json!({
			"matches": [
				{ "id": 9, "similarity": 0.6 },
				{ "id": 5, "similarity": 0.8 }
			]
		});
		let parsed = parse_match_response(json).expect("parse failed");

		assert_eq!(parsed, vec![(9, 0.6), (5, 0.8)]);
	}

	#[test]
	fn rejects_response_without_matches() {
		let json = serde_json::json!({ "results": [] });

		assert!(parse_match_response(json).is_err());
	}

	#[test]
	fn rejects_non_numeric_similarity() {
		let json = serde_json::json!({
			"matches": [{ "id": 1, "similarity": "high" }]
		});

		assert!(parse_match_response(json).is_err());
	}
}
