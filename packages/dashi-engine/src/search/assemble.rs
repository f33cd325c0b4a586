//! Shapes scored candidates into the externally visible response. No scoring
//! happens here.

use dashi_domain::{Diagnostics, SearchItem, SearchResponse, StageRecord};
use uuid::Uuid;

use super::score::ScoredCandidate;

pub(crate) fn assemble(
	trace_id: Uuid,
	scored: Vec<ScoredCandidate>,
	total_matches: u32,
	stages: Vec<StageRecord>,
	diagnostics: Diagnostics,
) -> SearchResponse {
	let items = scored
		.into_iter()
		.enumerate()
		.map(|(idx, entry)| {
			let ScoredCandidate { candidate, combined_score } = entry;

			SearchItem {
				id: candidate.id,
				lexical_score: candidate.lexical_score,
				vector_score: candidate.vector_score,
				combined_score,
				rank: idx as u32 + 1,
				matched_keywords: candidate.matched_keywords,
				excluded_hits: candidate.excluded_hits,
				stage: candidate.stage,
			}
		})
		.collect();

	SearchResponse { trace_id, items, total_matches, stages, diagnostics }
}

#[cfg(test)]
mod tests {
	use dashi_domain::{Candidate, MatchStage};

	use super::*;

	#[test]
	fn assigns_one_based_ranks_in_order() {
		let scored = vec![
			ScoredCandidate {
				candidate: Candidate::new(9, MatchStage::LexicalOnly),
				combined_score: 0.9,
			},
			ScoredCandidate {
				candidate: Candidate::new(4, MatchStage::LexicalOnly),
				combined_score: 0.4,
			},
		];
		let response =
			assemble(Uuid::new_v4(), scored, 2, Vec::new(), Diagnostics::default());

		assert_eq!(response.items[0].rank, 1);
		assert_eq!(response.items[0].id, 9);
		assert_eq!(response.items[1].rank, 2);
		assert_eq!(response.items[1].id, 4);
	}

	#[test]
	fn carries_provenance_through() {
		let mut candidate = Candidate::new(1, MatchStage::ParallelMerge);

		candidate.matched_keywords.push("卵".to_string());

		let response = assemble(
			Uuid::new_v4(),
			vec![ScoredCandidate { candidate, combined_score: 0.5 }],
			7,
			Vec::new(),
			Diagnostics::default(),
		);

		assert_eq!(response.total_matches, 7);
		assert_eq!(response.items[0].matched_keywords, vec!["卵"]);
		assert_eq!(response.items[0].stage, MatchStage::ParallelMerge);
	}
}
