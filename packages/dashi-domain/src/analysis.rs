//! Heuristic extraction of search conditions from free-form query text.
//!
//! This is deliberately shallow: it recognizes a fixed vocabulary of
//! ingredients and cooking verbs and classifies them as required or excluded
//! from surrounding negation phrases. Anything smarter belongs to an external
//! language service.

use crate::condition::normalize_keyword;

const INGREDIENT_KEYWORDS: [&str; 7] = ["だし", "魚", "肉", "野菜", "豆腐", "油", "砂糖"];
const COOKING_KEYWORDS: [&str; 4] = ["煮る", "焼く", "蒸す", "揚げる"];
const NEGATIVE_INDICATORS: [&str; 5] = ["含まない", "使わない", "入っていない", "ない", "除く"];

const COMMON_KEYWORDS: [&str; 24] = [
	"だし",
	"醤油",
	"味噌",
	"砂糖",
	"塩",
	"酢",
	"油",
	"魚",
	"肉",
	"野菜",
	"豆腐",
	"米",
	"麺",
	"卵",
	"煮る",
	"焼く",
	"蒸す",
	"揚げる",
	"炒める",
	"春",
	"夏",
	"秋",
	"冬",
	"季節",
];
const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryComplexity {
	Simple,
	Moderate,
	Complex,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryAnalysis {
	pub suggested_required: Vec<String>,
	pub suggested_excluded: Vec<String>,
	pub confidence_score: f32,
	pub complexity: QueryComplexity,
}

pub fn analyze_query(query_text: &str) -> QueryAnalysis {
	let normalized = normalize_keyword(query_text);
	let context_negative =
		NEGATIVE_INDICATORS.iter().any(|indicator| normalized.contains(indicator));
	let mut suggested_required = Vec::new();
	let mut suggested_excluded = Vec::new();

	for keyword in INGREDIENT_KEYWORDS.iter().chain(COOKING_KEYWORDS.iter()) {
		if !normalized.contains(keyword) {
			continue;
		}
		if context_negative {
			suggested_excluded.push((*keyword).to_string());
		} else {
			suggested_required.push((*keyword).to_string());
		}
	}

	let hits = suggested_required.len() + suggested_excluded.len();
	let complexity = match hits {
		0..=1 => QueryComplexity::Simple,
		2..=3 => QueryComplexity::Moderate,
		_ => QueryComplexity::Complex,
	};
	let confidence_score = (hits as f32 * 0.2).min(0.8);

	QueryAnalysis { suggested_required, suggested_excluded, confidence_score, complexity }
}

/// Completion-style keyword suggestions for a partial input. Falls back to
/// the head of the common list when nothing matches.
pub fn suggest_keywords(partial_text: &str) -> Vec<String> {
	let normalized = normalize_keyword(partial_text);

	if normalized.is_empty() {
		return COMMON_KEYWORDS
			.iter()
			.take(MAX_SUGGESTIONS)
			.map(|keyword| (*keyword).to_string())
			.collect();
	}

	let matching: Vec<String> = COMMON_KEYWORDS
		.iter()
		.filter(|keyword| keyword.contains(normalized.as_str()))
		.take(MAX_SUGGESTIONS)
		.map(|keyword| (*keyword).to_string())
		.collect();

	if matching.is_empty() {
		COMMON_KEYWORDS
			.iter()
			.take(MAX_SUGGESTIONS)
			.map(|keyword| (*keyword).to_string())
			.collect()
	} else {
		matching
	}
}
