use uuid::Uuid;

/// Identifier of a record in the external catalog. The engine never owns or
/// mutates the entity behind it.
pub type EntityId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
	Lexical,
	Vector,
}
impl Signal {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lexical => "lexical",
			Self::Vector => "vector",
		}
	}
}

/// Which stage first produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStage {
	LexicalFilter,
	VectorRank,
	LexicalOnly,
	VectorOnly,
	ParallelMerge,
}
impl MatchStage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::LexicalFilter => "lexical_filter",
			Self::VectorRank => "vector_rank",
			Self::LexicalOnly => "lexical_only",
			Self::VectorOnly => "vector_only",
			Self::ParallelMerge => "parallel_merge",
		}
	}
}

/// Per-query working record for one catalog entity. `None` scores mean the
/// signal was never evaluated for this candidate; `Some(0.0)` means it was
/// evaluated and found nothing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Candidate {
	pub id: EntityId,
	pub lexical_score: Option<f32>,
	pub vector_score: Option<f32>,
	pub matched_keywords: Vec<String>,
	pub excluded_hits: Vec<String>,
	pub stage: MatchStage,
}
impl Candidate {
	pub fn new(id: EntityId, stage: MatchStage) -> Self {
		Self {
			id,
			lexical_score: None,
			vector_score: None,
			matched_keywords: Vec::new(),
			excluded_hits: Vec::new(),
			stage,
		}
	}
}

/// One ranked row of the final response.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchItem {
	pub id: EntityId,
	pub lexical_score: Option<f32>,
	pub vector_score: Option<f32>,
	pub combined_score: f32,
	/// 1-based.
	pub rank: u32,
	pub matched_keywords: Vec<String>,
	pub excluded_hits: Vec<String>,
	pub stage: MatchStage,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StageRecord {
	pub name: String,
	/// `None` when the incoming population is unknown (e.g. the first filter
	/// over the whole catalog).
	pub candidates_in: Option<u32>,
	pub candidates_out: u32,
	pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
	/// True when one signal of a parallel run was lost to a backend failure
	/// and the ranking covers only the surviving signal.
	pub partial: bool,
	pub degraded: Vec<Signal>,
	pub notes: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub trace_id: Uuid,
	pub items: Vec<SearchItem>,
	/// Candidates seen before truncation to `max_results`.
	pub total_matches: u32,
	pub stages: Vec<StageRecord>,
	pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strategy_enums_serialize_screaming_snake() {
		let json = serde_json::to_string(&MatchStage::ParallelMerge).expect("serialize failed");

		assert_eq!(json, "\"PARALLEL_MERGE\"");

		let signal: Signal = serde_json::from_str("\"LEXICAL\"").expect("deserialize failed");

		assert_eq!(signal, Signal::Lexical);
	}

	#[test]
	fn new_candidate_has_no_scores() {
		let candidate = Candidate::new(7, MatchStage::LexicalFilter);

		assert_eq!(candidate.lexical_score, None);
		assert_eq!(candidate.vector_score, None);
		assert!(candidate.matched_keywords.is_empty());
	}
}
