mod assemble;
mod score;

pub(super) use assemble::assemble;
pub(super) use score::combine;

use std::{
	collections::{HashMap, HashSet},
	time::{Duration, Instant},
};

use dashi_domain::{
	Candidate, Diagnostics, EntityId, MatchStage, SearchCondition, SearchResponse, Signal,
	StageRecord, Strategy,
};
use tokio::time::timeout;
use uuid::Uuid;

use crate::{Engine, Error, Result, ScoredHit};

const STAGE_LEXICAL_FILTER: &str = "lexical_filter";
const STAGE_EXCLUSION_FILTER: &str = "exclusion_filter";
const STAGE_VECTOR_RANK: &str = "vector_rank";
const STAGE_VECTOR_SEARCH: &str = "vector_search";
const STAGE_PARALLEL_MERGE: &str = "parallel_merge";
const STAGE_SCORE_COMBINE: &str = "score_combine";

const NOTE_EMPTY_QUERY: &str =
	"Condition has no required keywords and no semantic query text; nothing to search.";
const NOTE_CASCADE_SHORT_CIRCUIT: &str =
	"Lexical stage produced no candidates; cascade short-circuited without invoking the vector backend.";
const NOTE_VECTOR_ONLY_EXCLUSIONS: &str =
	"Excluded keywords are not evaluated by the vector-only strategy.";
const NOTE_NO_SEMANTIC_QUERY: &str =
	"Semantic query text is empty; the vector signal was not requested.";

/// What the lexical side of a query produced: surviving candidates in
/// discovery order, the ids rejected by excluded keywords, and the stage
/// telemetry.
struct LexicalOutcome {
	candidates: Vec<Candidate>,
	excluded_ids: HashMap<EntityId, Vec<String>>,
	stages: Vec<StageRecord>,
}

impl Engine {
	/// Runs one query under its chosen strategy. Validation happens before
	/// any backend call; an empty condition answers with an empty, diagnosed
	/// response rather than an error. Dropping the returned future abandons
	/// any in-flight backend calls; no engine state needs cleanup.
	pub async fn execute(&self, condition: &SearchCondition) -> Result<SearchResponse> {
		condition.validate().map_err(Error::invalid_condition)?;

		let trace_id = Uuid::new_v4();

		if condition.is_empty_query() {
			tracing::debug!(trace_id = %trace_id, "Condition carries no retrieval criteria.");

			let mut diagnostics = Diagnostics::default();

			diagnostics.notes.push(NOTE_EMPTY_QUERY.to_string());

			return Ok(empty_response(trace_id, Vec::new(), diagnostics));
		}

		match condition.strategy {
			Strategy::LexicalOnly => self.lexical_only(trace_id, condition).await,
			Strategy::VectorOnly => self.vector_only(trace_id, condition).await,
			Strategy::Cascade => self.cascade(trace_id, condition).await,
			Strategy::Parallel => self.parallel(trace_id, condition).await,
		}
	}

	async fn lexical_only(
		&self,
		trace_id: Uuid,
		condition: &SearchCondition,
	) -> Result<SearchResponse> {
		let outcome = self.run_lexical_stage(condition, MatchStage::LexicalOnly).await?;

		Ok(finish(trace_id, outcome.candidates, condition, outcome.stages, Diagnostics::default()))
	}

	async fn vector_only(
		&self,
		trace_id: Uuid,
		condition: &SearchCondition,
	) -> Result<SearchResponse> {
		let mut diagnostics = Diagnostics::default();

		if !condition.excluded_keywords.is_empty() {
			diagnostics.notes.push(NOTE_VECTOR_ONLY_EXCLUSIONS.to_string());
		}

		let query_text = condition.semantic_query_text.trim();

		if query_text.is_empty() {
			diagnostics.notes.push(NOTE_NO_SEMANTIC_QUERY.to_string());

			return Ok(empty_response(trace_id, Vec::new(), diagnostics));
		}

		let started = Instant::now();
		let hits = self
			.vector_matches(query_text, condition.vector_similarity_threshold, None)
			.await?;
		let mut candidates = Vec::with_capacity(hits.len());
		let mut seen = HashSet::new();

		for hit in hits {
			if !seen.insert(hit.id) {
				continue;
			}

			let mut candidate = Candidate::new(hit.id, MatchStage::VectorOnly);

			candidate.vector_score = Some(hit.similarity.clamp(0.0, 1.0));
			candidates.push(candidate);
		}

		let stages = vec![StageRecord {
			name: STAGE_VECTOR_SEARCH.to_string(),
			candidates_in: None,
			candidates_out: candidates.len() as u32,
			elapsed_ms: elapsed_ms(started),
		}];

		Ok(finish(trace_id, candidates, condition, stages, diagnostics))
	}

	async fn cascade(&self, trace_id: Uuid, condition: &SearchCondition) -> Result<SearchResponse> {
		let outcome = self.run_lexical_stage(condition, MatchStage::LexicalFilter).await?;
		let LexicalOutcome { mut candidates, excluded_ids: _, mut stages } = outcome;
		let cap = self.cfg.engine.cascade_candidate_cap as usize;

		if candidates.len() > cap {
			tracing::debug!(
				trace_id = %trace_id,
				dropped = candidates.len() - cap,
				"Cascade candidate set capped."
			);
			candidates.truncate(cap);
		}

		if candidates.is_empty() {
			tracing::debug!(trace_id = %trace_id, "Lexical stage matched nothing; cascade short-circuits.");

			let mut diagnostics = Diagnostics::default();

			diagnostics.notes.push(NOTE_CASCADE_SHORT_CIRCUIT.to_string());

			return Ok(empty_response(trace_id, stages, diagnostics));
		}

		let query_text = condition.semantic_query_text.trim();

		if query_text.is_empty() {
			let mut diagnostics = Diagnostics::default();

			diagnostics.notes.push(NOTE_NO_SEMANTIC_QUERY.to_string());

			return Ok(finish(trace_id, candidates, condition, stages, diagnostics));
		}

		let started = Instant::now();
		let ids: Vec<EntityId> = candidates.iter().map(|candidate| candidate.id).collect();
		let hits = self
			.vector_matches(query_text, condition.vector_similarity_threshold, Some(&ids))
			.await?;
		let by_id: HashMap<EntityId, f32> =
			hits.into_iter().map(|hit| (hit.id, hit.similarity.clamp(0.0, 1.0))).collect();
		let mut ranked = Vec::with_capacity(by_id.len());

		for mut candidate in candidates {
			let Some(similarity) = by_id.get(&candidate.id) else {
				continue;
			};

			candidate.vector_score = Some(*similarity);
			candidate.stage = MatchStage::VectorRank;
			ranked.push(candidate);
		}

		stages.push(StageRecord {
			name: STAGE_VECTOR_RANK.to_string(),
			candidates_in: Some(ids.len() as u32),
			candidates_out: ranked.len() as u32,
			elapsed_ms: elapsed_ms(started),
		});

		Ok(finish(trace_id, ranked, condition, stages, Diagnostics::default()))
	}

	async fn parallel(&self, trace_id: Uuid, condition: &SearchCondition) -> Result<SearchResponse> {
		let run_lexical = !condition.normalized_required_keywords().is_empty()
			|| !condition.normalized_excluded_keywords().is_empty();
		let query_text = condition.semantic_query_text.trim();
		let run_vector = !query_text.is_empty();
		let lexical_fut = async {
			if run_lexical {
				Some(self.run_lexical_stage(condition, MatchStage::LexicalOnly).await)
			} else {
				None
			}
		};
		let vector_fut = async {
			if run_vector {
				let started = Instant::now();
				let result = self
					.vector_matches(query_text, condition.vector_similarity_threshold, None)
					.await;

				Some((result, elapsed_ms(started)))
			} else {
				None
			}
		};

		// The merge below only starts once both sides have settled.
		let (lexical_outcome, vector_outcome) = tokio::join!(lexical_fut, vector_fut);

		let mut diagnostics = Diagnostics::default();
		let mut failed: Vec<(Signal, Error)> = Vec::new();
		let mut lexical_side: Option<LexicalOutcome> = None;
		let mut vector_side: Option<(Vec<ScoredHit>, u64)> = None;

		match lexical_outcome {
			Some(Ok(outcome)) => lexical_side = Some(outcome),
			Some(Err(err)) => failed.push((Signal::Lexical, err)),
			None => {},
		}
		match vector_outcome {
			Some((Ok(hits), elapsed)) => vector_side = Some((hits, elapsed)),
			Some((Err(err), _)) => failed.push((Signal::Vector, err)),
			None => diagnostics.notes.push(NOTE_NO_SEMANTIC_QUERY.to_string()),
		}

		if lexical_side.is_none() && vector_side.is_none() {
			if let Some((_, err)) = failed.into_iter().next() {
				return Err(err);
			}

			diagnostics.notes.push(NOTE_EMPTY_QUERY.to_string());

			return Ok(empty_response(trace_id, Vec::new(), diagnostics));
		}

		for (signal, err) in &failed {
			tracing::warn!(
				trace_id = %trace_id,
				backend = signal.as_str(),
				error = %err,
				"Backend failed; continuing with the surviving signal."
			);
			diagnostics.partial = true;
			diagnostics.degraded.push(*signal);
			diagnostics.notes.push(format!("{} backend failed: {err}", signal.as_str()));
		}

		let merge_started = Instant::now();
		let mut stages = Vec::new();
		let mut candidates: Vec<Candidate> = Vec::new();
		let mut index: HashMap<EntityId, usize> = HashMap::new();
		let mut excluded_ids: HashMap<EntityId, Vec<String>> = HashMap::new();
		let mut merged_in = 0_u32;
		let lexical_ran = lexical_side.is_some();
		let vector_ran = vector_side.is_some();

		if let Some(outcome) = lexical_side {
			stages.extend(outcome.stages);
			excluded_ids = outcome.excluded_ids;
			merged_in += outcome.candidates.len() as u32;

			for candidate in outcome.candidates {
				index.insert(candidate.id, candidates.len());
				candidates.push(candidate);
			}
		}

		if let Some((hits, elapsed)) = vector_side {
			stages.push(StageRecord {
				name: STAGE_VECTOR_SEARCH.to_string(),
				candidates_in: None,
				candidates_out: hits.len() as u32,
				elapsed_ms: elapsed,
			});
			merged_in += hits.len() as u32;

			for hit in hits {
				if excluded_ids.contains_key(&hit.id) {
					continue;
				}

				let similarity = hit.similarity.clamp(0.0, 1.0);

				match index.get(&hit.id) {
					Some(&slot) => {
						let candidate = &mut candidates[slot];

						candidate.vector_score = Some(match candidate.vector_score {
							Some(existing) => existing.max(similarity),
							None => similarity,
						});
						candidate.stage = MatchStage::ParallelMerge;
					},
					None => {
						let mut candidate = Candidate::new(hit.id, MatchStage::VectorOnly);

						candidate.vector_score = Some(similarity);
						index.insert(hit.id, candidates.len());
						candidates.push(candidate);
					},
				}
			}
		}

		// "Not found by this method" becomes an explicit zero, but only when
		// both methods actually ran.
		if lexical_ran && vector_ran {
			for candidate in &mut candidates {
				if candidate.lexical_score.is_none() {
					candidate.lexical_score = Some(0.0);
				}
				if candidate.vector_score.is_none() {
					candidate.vector_score = Some(0.0);
				}
			}
		}

		stages.push(StageRecord {
			name: STAGE_PARALLEL_MERGE.to_string(),
			candidates_in: Some(merged_in),
			candidates_out: candidates.len() as u32,
			elapsed_ms: elapsed_ms(merge_started),
		});

		Ok(finish(trace_id, candidates, condition, stages, diagnostics))
	}

	/// Unions the required-keyword matches, then rejects every id that any
	/// excluded keyword hits above the excluded threshold.
	async fn run_lexical_stage(
		&self,
		condition: &SearchCondition,
		stage: MatchStage,
	) -> Result<LexicalOutcome> {
		let started = Instant::now();
		let mut candidates: Vec<Candidate> = Vec::new();
		let mut index: HashMap<EntityId, usize> = HashMap::new();

		for keyword in condition.normalized_required_keywords() {
			let hits =
				self.lexical_matches(&keyword, condition.required_similarity_threshold).await?;

			for hit in hits {
				let similarity = hit.similarity.clamp(0.0, 1.0);
				let slot = *index.entry(hit.id).or_insert_with(|| {
					candidates.push(Candidate::new(hit.id, stage));

					candidates.len() - 1
				});
				let candidate = &mut candidates[slot];

				candidate.lexical_score = Some(match candidate.lexical_score {
					Some(existing) => existing.max(similarity),
					None => similarity,
				});

				if !candidate.matched_keywords.contains(&keyword) {
					candidate.matched_keywords.push(keyword.clone());
				}
			}
		}

		let mut stages = vec![StageRecord {
			name: STAGE_LEXICAL_FILTER.to_string(),
			candidates_in: None,
			candidates_out: candidates.len() as u32,
			elapsed_ms: elapsed_ms(started),
		}];
		let excluded_keywords = condition.normalized_excluded_keywords();
		let mut excluded_ids: HashMap<EntityId, Vec<String>> = HashMap::new();

		if !excluded_keywords.is_empty() {
			let started = Instant::now();
			let before = candidates.len();

			for keyword in &excluded_keywords {
				let hits =
					self.lexical_matches(keyword, condition.excluded_similarity_threshold).await?;

				for hit in hits {
					let entry = excluded_ids.entry(hit.id).or_default();

					if !entry.contains(keyword) {
						entry.push(keyword.clone());
					}
				}
			}

			candidates.retain(|candidate| !excluded_ids.contains_key(&candidate.id));

			stages.push(StageRecord {
				name: STAGE_EXCLUSION_FILTER.to_string(),
				candidates_in: Some(before as u32),
				candidates_out: candidates.len() as u32,
				elapsed_ms: elapsed_ms(started),
			});
		}

		Ok(LexicalOutcome { candidates, excluded_ids, stages })
	}

	async fn lexical_matches(&self, keyword: &str, threshold: f32) -> Result<Vec<ScoredHit>> {
		let deadline = Duration::from_millis(self.cfg.engine.backend_timeout_ms);
		let call = self.backends.lexical.matches(&self.cfg.backends.lexical, keyword, threshold);

		match timeout(deadline, call).await {
			Ok(Ok(hits)) => Ok(hits),
			Ok(Err(err)) => Err(Error::BackendUnavailable {
				backend: Signal::Lexical.as_str(),
				message: err.to_string(),
			}),
			Err(_) => Err(Error::BackendUnavailable {
				backend: Signal::Lexical.as_str(),
				message: format!(
					"Call exceeded the {}ms deadline.",
					self.cfg.engine.backend_timeout_ms
				),
			}),
		}
	}

	async fn vector_matches(
		&self,
		query_text: &str,
		threshold: f32,
		restrict_to: Option<&[EntityId]>,
	) -> Result<Vec<ScoredHit>> {
		let deadline = Duration::from_millis(self.cfg.engine.backend_timeout_ms);
		let call = self.backends.vector.matches(
			&self.cfg.backends.vector,
			query_text,
			threshold,
			restrict_to,
		);

		match timeout(deadline, call).await {
			Ok(Ok(hits)) => Ok(hits),
			Ok(Err(err)) => Err(Error::BackendUnavailable {
				backend: Signal::Vector.as_str(),
				message: err.to_string(),
			}),
			Err(_) => Err(Error::BackendUnavailable {
				backend: Signal::Vector.as_str(),
				message: format!(
					"Call exceeded the {}ms deadline.",
					self.cfg.engine.backend_timeout_ms
				),
			}),
		}
	}
}

fn finish(
	trace_id: Uuid,
	candidates: Vec<Candidate>,
	condition: &SearchCondition,
	mut stages: Vec<StageRecord>,
	diagnostics: Diagnostics,
) -> SearchResponse {
	let started = Instant::now();
	let total_matches = candidates.len() as u32;
	let scored = combine(candidates, condition);

	stages.push(StageRecord {
		name: STAGE_SCORE_COMBINE.to_string(),
		candidates_in: Some(total_matches),
		candidates_out: scored.len() as u32,
		elapsed_ms: elapsed_ms(started),
	});

	assemble(trace_id, scored, total_matches, stages, diagnostics)
}

fn empty_response(
	trace_id: Uuid,
	stages: Vec<StageRecord>,
	diagnostics: Diagnostics,
) -> SearchResponse {
	SearchResponse { trace_id, items: Vec::new(), total_matches: 0, stages, diagnostics }
}

fn elapsed_ms(started: Instant) -> u64 {
	started.elapsed().as_millis() as u64
}
