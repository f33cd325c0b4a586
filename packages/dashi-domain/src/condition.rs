use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
	Cascade,
	Parallel,
	LexicalOnly,
	VectorOnly,
}
impl Strategy {
	pub const ALL: [Self; 4] = [Self::Cascade, Self::Parallel, Self::LexicalOnly, Self::VectorOnly];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Cascade => "cascade",
			Self::Parallel => "parallel",
			Self::LexicalOnly => "lexical_only",
			Self::VectorOnly => "vector_only",
		}
	}
}

/// One query's worth of search parameters. Built once, never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchCondition {
	/// OR semantics: a candidate must match at least one of these when the
	/// list is non-empty.
	pub required_keywords: Vec<String>,
	pub required_similarity_threshold: f32,
	/// AND semantics: any hit above the excluded threshold rejects the
	/// candidate.
	pub excluded_keywords: Vec<String>,
	pub excluded_similarity_threshold: f32,
	/// Empty means no semantic signal was requested.
	pub semantic_query_text: String,
	pub vector_similarity_threshold: f32,
	pub lexical_weight: f32,
	pub vector_weight: f32,
	pub max_results: u32,
	pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionViolation {
	ThresholdOutOfRange { field: &'static str },
	NonFiniteWeight { field: &'static str },
	NegativeWeight { field: &'static str },
	ZeroWeightSum,
	ZeroMaxResults,
	BlankKeyword { field: &'static str },
	OverlappingKeyword { keyword: String },
}

impl Default for SearchCondition {
	fn default() -> Self {
		Self {
			required_keywords: Vec::new(),
			required_similarity_threshold: 0.1,
			excluded_keywords: Vec::new(),
			excluded_similarity_threshold: 0.1,
			semantic_query_text: String::new(),
			vector_similarity_threshold: 0.5,
			lexical_weight: 0.5,
			vector_weight: 0.5,
			max_results: 20,
			strategy: Strategy::Cascade,
		}
	}
}

impl SearchCondition {
	/// Seeds per-query defaults from the `[engine]` config section.
	pub fn from_config(cfg: &dashi_config::Config) -> Self {
		Self {
			required_similarity_threshold: cfg.engine.default_required_similarity_threshold,
			excluded_similarity_threshold: cfg.engine.default_excluded_similarity_threshold,
			vector_similarity_threshold: cfg.engine.default_vector_similarity_threshold,
			lexical_weight: cfg.engine.default_lexical_weight,
			vector_weight: cfg.engine.default_vector_weight,
			max_results: cfg.engine.default_max_results,
			..Self::default()
		}
	}

	pub fn with_strategy(&self, strategy: Strategy) -> Self {
		Self { strategy, ..self.clone() }
	}

	/// True when the condition carries no retrieval criteria at all. Not a
	/// validation failure: such a query answers with an empty, diagnosed
	/// response.
	pub fn is_empty_query(&self) -> bool {
		self.normalized_required_keywords().is_empty()
			&& self.semantic_query_text.trim().is_empty()
	}

	pub fn normalized_required_keywords(&self) -> Vec<String> {
		normalize_keywords(&self.required_keywords)
	}

	pub fn normalized_excluded_keywords(&self) -> Vec<String> {
		normalize_keywords(&self.excluded_keywords)
	}

	pub fn validate(&self) -> Result<(), ConditionViolation> {
		for (field, threshold) in [
			("required_similarity_threshold", self.required_similarity_threshold),
			("excluded_similarity_threshold", self.excluded_similarity_threshold),
			("vector_similarity_threshold", self.vector_similarity_threshold),
		] {
			if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
				return Err(ConditionViolation::ThresholdOutOfRange { field });
			}
		}

		for (field, weight) in
			[("lexical_weight", self.lexical_weight), ("vector_weight", self.vector_weight)]
		{
			if !weight.is_finite() {
				return Err(ConditionViolation::NonFiniteWeight { field });
			}
			if weight < 0.0 {
				return Err(ConditionViolation::NegativeWeight { field });
			}
		}

		if self.lexical_weight + self.vector_weight <= 0.0 {
			return Err(ConditionViolation::ZeroWeightSum);
		}
		if self.max_results == 0 {
			return Err(ConditionViolation::ZeroMaxResults);
		}

		for (field, keywords) in [
			("required_keywords", &self.required_keywords),
			("excluded_keywords", &self.excluded_keywords),
		] {
			if keywords.iter().any(|keyword| normalize_keyword(keyword).is_empty()) {
				return Err(ConditionViolation::BlankKeyword { field });
			}
		}

		let excluded: HashSet<String> =
			self.normalized_excluded_keywords().into_iter().collect();

		for keyword in self.normalized_required_keywords() {
			if excluded.contains(&keyword) {
				return Err(ConditionViolation::OverlappingKeyword { keyword });
			}
		}

		Ok(())
	}
}

/// NFKC-folds and trims a keyword so full-width/half-width variants match the
/// same index entries.
pub fn normalize_keyword(keyword: &str) -> String {
	keyword.nfkc().collect::<String>().trim().to_lowercase()
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for keyword in keywords {
		let normalized = normalize_keyword(keyword);

		if normalized.is_empty() {
			continue;
		}
		if seen.insert(normalized.clone()) {
			out.push(normalized);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn condition() -> SearchCondition {
		SearchCondition {
			required_keywords: vec!["卵".to_string()],
			semantic_query_text: "彩り豊かな卵料理".to_string(),
			..SearchCondition::default()
		}
	}

	#[test]
	fn default_condition_validates() {
		assert_eq!(condition().validate(), Ok(()));
	}

	#[test]
	fn rejects_threshold_above_one() {
		let mut cond = condition();

		cond.required_similarity_threshold = 1.5;

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::ThresholdOutOfRange {
				field: "required_similarity_threshold"
			})
		);
	}

	#[test]
	fn rejects_zero_threshold() {
		let mut cond = condition();

		cond.vector_similarity_threshold = 0.0;

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::ThresholdOutOfRange { field: "vector_similarity_threshold" })
		);
	}

	#[test]
	fn rejects_non_finite_weight() {
		let mut cond = condition();

		cond.lexical_weight = f32::NAN;

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::NonFiniteWeight { field: "lexical_weight" })
		);
	}

	#[test]
	fn rejects_all_zero_weights() {
		let mut cond = condition();

		cond.lexical_weight = 0.0;
		cond.vector_weight = 0.0;

		assert_eq!(cond.validate(), Err(ConditionViolation::ZeroWeightSum));
	}

	#[test]
	fn single_zero_weight_is_legal() {
		let mut cond = condition();

		cond.lexical_weight = 1.0;
		cond.vector_weight = 0.0;

		assert_eq!(cond.validate(), Ok(()));
	}

	#[test]
	fn rejects_zero_max_results() {
		let mut cond = condition();

		cond.max_results = 0;

		assert_eq!(cond.validate(), Err(ConditionViolation::ZeroMaxResults));
	}

	#[test]
	fn rejects_blank_keyword() {
		let mut cond = condition();

		cond.excluded_keywords = vec!["  ".to_string()];

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::BlankKeyword { field: "excluded_keywords" })
		);
	}

	#[test]
	fn rejects_keyword_in_both_lists() {
		let mut cond = condition();

		cond.excluded_keywords = vec!["卵".to_string()];

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::OverlappingKeyword { keyword: "卵".to_string() })
		);
	}

	#[test]
	fn overlap_check_folds_width_variants() {
		let mut cond = condition();

		cond.required_keywords = vec!["ｄａｓｈｉ".to_string()];
		cond.excluded_keywords = vec!["dashi".to_string()];

		assert_eq!(
			cond.validate(),
			Err(ConditionViolation::OverlappingKeyword { keyword: "dashi".to_string() })
		);
	}

	#[test]
	fn empty_query_detection_ignores_whitespace() {
		let cond = SearchCondition {
			semantic_query_text: "   ".to_string(),
			..SearchCondition::default()
		};

		assert!(cond.is_empty_query());
		assert!(!condition().is_empty_query());
	}

	#[test]
	fn normalized_keywords_dedupe_preserving_order() {
		let cond = SearchCondition {
			required_keywords: vec![
				"だし".to_string(),
				"卵".to_string(),
				"だし ".to_string(),
			],
			..SearchCondition::default()
		};

		assert_eq!(cond.normalized_required_keywords(), vec!["だし", "卵"]);
	}
}
