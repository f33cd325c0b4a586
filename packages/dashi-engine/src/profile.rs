//! Strategy timing comparison. Read-only with respect to the engine: each
//! run is an ordinary `execute` call over the same condition with the
//! strategy overridden.

use std::time::Instant;

use dashi_domain::{SearchCondition, StageRecord, Strategy};
use time::OffsetDateTime;

use crate::{Engine, Error, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StrategyRun {
	pub strategy: Strategy,
	pub elapsed_ms: u64,
	pub result_count: u32,
	pub total_matches: u32,
	pub partial: bool,
	pub stages: Vec<StageRecord>,
	pub error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PerformanceReport {
	pub generated_at: OffsetDateTime,
	pub runs: Vec<StrategyRun>,
	pub recommended: Option<Strategy>,
	pub reason: String,
}

impl Engine {
	/// Runs every strategy once against the same condition and reports
	/// elapsed time and per-stage candidate counts. Runs are sequential so
	/// the timings do not contend with each other. A strategy that fails is
	/// recorded in its run rather than failing the comparison.
	pub async fn compare_strategies(
		&self,
		condition: &SearchCondition,
	) -> Result<PerformanceReport> {
		condition.validate().map_err(Error::invalid_condition)?;

		let mut runs = Vec::with_capacity(Strategy::ALL.len());

		for strategy in Strategy::ALL {
			let run_condition = condition.with_strategy(strategy);
			let started = Instant::now();

			match self.execute(&run_condition).await {
				Ok(response) => runs.push(StrategyRun {
					strategy,
					elapsed_ms: started.elapsed().as_millis() as u64,
					result_count: response.items.len() as u32,
					total_matches: response.total_matches,
					partial: response.diagnostics.partial,
					stages: response.stages,
					error: None,
				}),
				Err(err) => {
					tracing::warn!(
						strategy = strategy.as_str(),
						error = %err,
						"Strategy run failed during comparison."
					);
					runs.push(StrategyRun {
						strategy,
						elapsed_ms: started.elapsed().as_millis() as u64,
						result_count: 0,
						total_matches: 0,
						partial: false,
						stages: Vec::new(),
						error: Some(err.to_string()),
					});
				},
			}
		}

		let (recommended, reason) = recommend(&runs);

		Ok(PerformanceReport { generated_at: OffsetDateTime::now_utc(), runs, recommended, reason })
	}
}

fn recommend(runs: &[StrategyRun]) -> (Option<Strategy>, String) {
	let find = |strategy: Strategy| {
		runs.iter().find(|run| run.strategy == strategy && run.error.is_none())
	};
	let cascade = find(Strategy::Cascade);
	let parallel = find(Strategy::Parallel);

	if let (Some(cascade), Some(parallel)) = (cascade, parallel) {
		if parallel.result_count as f32 >= cascade.result_count as f32 * 0.8 {
			return (
				Some(Strategy::Parallel),
				"Parallel keeps result coverage while completing quickly.".to_string(),
			);
		}
		if (cascade.elapsed_ms as f32) < parallel.elapsed_ms as f32 * 1.5 {
			return (Some(Strategy::Cascade), "Cascade balances speed and precision.".to_string());
		}
	}

	match runs.iter().filter(|run| run.error.is_none()).min_by_key(|run| run.elapsed_ms) {
		Some(run) => (Some(run.strategy), "Fastest successful run.".to_string()),
		None => (None, "No strategy completed successfully.".to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run(strategy: Strategy, elapsed_ms: u64, result_count: u32, error: Option<&str>) -> StrategyRun {
		StrategyRun {
			strategy,
			elapsed_ms,
			result_count,
			total_matches: result_count,
			partial: false,
			stages: Vec::new(),
			error: error.map(str::to_string),
		}
	}

	#[test]
	fn prefers_parallel_when_coverage_holds() {
		let runs = vec![
			run(Strategy::Cascade, 10, 10, None),
			run(Strategy::Parallel, 30, 9, None),
			run(Strategy::LexicalOnly, 5, 4, None),
			run(Strategy::VectorOnly, 5, 4, None),
		];
		let (recommended, _) = recommend(&runs);

		assert_eq!(recommended, Some(Strategy::Parallel));
	}

	#[test]
	fn prefers_cascade_when_parallel_loses_coverage_but_cascade_is_quick() {
		let runs = vec![
			run(Strategy::Cascade, 10, 10, None),
			run(Strategy::Parallel, 10, 2, None),
			run(Strategy::LexicalOnly, 5, 4, None),
			run(Strategy::VectorOnly, 5, 4, None),
		];
		let (recommended, _) = recommend(&runs);

		assert_eq!(recommended, Some(Strategy::Cascade));
	}

	#[test]
	fn falls_back_to_fastest_successful_run() {
		let runs = vec![
			run(Strategy::Cascade, 100, 10, Some("down")),
			run(Strategy::Parallel, 90, 2, Some("down")),
			run(Strategy::LexicalOnly, 5, 4, None),
			run(Strategy::VectorOnly, 8, 4, None),
		];
		let (recommended, _) = recommend(&runs);

		assert_eq!(recommended, Some(Strategy::LexicalOnly));
	}

	#[test]
	fn reports_no_recommendation_when_everything_fails() {
		let runs = vec![
			run(Strategy::Cascade, 1, 0, Some("down")),
			run(Strategy::Parallel, 1, 0, Some("down")),
			run(Strategy::LexicalOnly, 1, 0, Some("down")),
			run(Strategy::VectorOnly, 1, 0, Some("down")),
		];
		let (recommended, reason) = recommend(&runs);

		assert_eq!(recommended, None);
		assert!(reason.contains("No strategy"));
	}
}
