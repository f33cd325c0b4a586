//! Pure score combination: weight renormalization over the signals a
//! candidate actually carries, deterministic ordering, truncation.

use std::cmp::Ordering;

use dashi_domain::{Candidate, SearchCondition};

#[derive(Debug)]
pub(crate) struct ScoredCandidate {
	pub candidate: Candidate,
	pub combined_score: f32,
}

/// Combines per-signal scores into one ranked list. Absent signals leave the
/// weight denominator, so single-signal and dual-signal candidates stay
/// comparable on the same [0, 1] scale. Ties break on lexical score, then
/// vector score, then discovery order.
pub(crate) fn combine(
	candidates: Vec<Candidate>,
	condition: &SearchCondition,
) -> Vec<ScoredCandidate> {
	let mut scored: Vec<ScoredCandidate> = candidates
		.into_iter()
		.map(|candidate| {
			let combined_score = combined_score(&candidate, condition);

			ScoredCandidate { candidate, combined_score }
		})
		.collect();

	scored.sort_by(|left, right| {
		cmp_f32_desc(left.combined_score, right.combined_score)
			.then_with(|| {
				cmp_opt_desc(left.candidate.lexical_score, right.candidate.lexical_score)
			})
			.then_with(|| cmp_opt_desc(left.candidate.vector_score, right.candidate.vector_score))
	});
	scored.truncate(condition.max_results as usize);

	scored
}

fn combined_score(candidate: &Candidate, condition: &SearchCondition) -> f32 {
	let mut weighted = 0.0_f32;
	let mut weight_sum = 0.0_f32;

	if let Some(score) = candidate.lexical_score {
		weighted += score * condition.lexical_weight;
		weight_sum += condition.lexical_weight;
	}
	if let Some(score) = candidate.vector_score {
		weighted += score * condition.vector_weight;
		weight_sum += condition.vector_weight;
	}

	if weight_sum <= 0.0 {
		return 0.0;
	}

	(weighted / weight_sum).clamp(0.0, 1.0)
}

fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn cmp_opt_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => cmp_f32_desc(a, b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
