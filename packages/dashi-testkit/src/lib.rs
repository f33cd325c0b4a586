//! In-memory backend doubles for engine tests: canned responses, injectable
//! failures and latency, and call counters for invocation assertions.

use std::{
	collections::HashMap,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};

use dashi_config::{
	Backends, Config, Engine, LexicalBackendConfig, VectorBackendConfig,
};
use dashi_engine::{BoxFuture, LexicalBackend, ScoredHit, VectorBackend};

pub fn hit(id: i64, similarity: f32) -> ScoredHit {
	ScoredHit { id, similarity }
}

/// A config literal with localhost endpoints; tests tweak fields directly.
pub fn test_config() -> Config {
	Config {
		engine: Engine {
			cascade_candidate_cap: 1000,
			backend_timeout_ms: 5_000,
			default_max_results: 20,
			default_required_similarity_threshold: 0.1,
			default_excluded_similarity_threshold: 0.1,
			default_vector_similarity_threshold: 0.5,
			default_lexical_weight: 0.5,
			default_vector_weight: 0.5,
		},
		backends: Backends {
			lexical: LexicalBackendConfig {
				provider_id: "canned-lexical".to_string(),
				api_base: "http://localhost:7700".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/lexical/match".to_string(),
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			vector: VectorBackendConfig {
				provider_id: "canned-vector".to_string(),
				api_base: "http://localhost:7710".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/vector/match".to_string(),
				model: "test-embed".to_string(),
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
	}
}

/// Lexical double with a fixed response table per keyword. Applies the
/// strictly-greater threshold the real n-gram index applies.
#[derive(Default)]
pub struct CannedLexicalBackend {
	responses: HashMap<String, Vec<ScoredHit>>,
	calls: AtomicUsize,
}
impl CannedLexicalBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_matches(mut self, keyword: &str, hits: Vec<ScoredHit>) -> Self {
		self.responses.insert(keyword.to_string(), hits);

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl LexicalBackend for CannedLexicalBackend {
	fn matches<'a>(
		&'a self,
		_cfg: &'a LexicalBackendConfig,
		keyword: &'a str,
		threshold: f32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let hits: Vec<ScoredHit> = self
			.responses
			.get(keyword)
			.map(|hits| hits.iter().copied().filter(|hit| hit.similarity > threshold).collect())
			.unwrap_or_default();

		Box::pin(async move { Ok(hits) })
	}
}

/// Vector double over one fixed hit list. Honors the similarity floor and an
/// optional id restriction, like the real nearest-neighbor service.
#[derive(Default)]
pub struct CannedVectorBackend {
	hits: Vec<ScoredHit>,
	calls: AtomicUsize,
}
impl CannedVectorBackend {
	pub fn new(hits: Vec<ScoredHit>) -> Self {
		Self { hits, calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl VectorBackend for CannedVectorBackend {
	fn matches<'a>(
		&'a self,
		_cfg: &'a VectorBackendConfig,
		_query_text: &'a str,
		threshold: f32,
		restrict_to: Option<&'a [i64]>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let hits: Vec<ScoredHit> = self
			.hits
			.iter()
			.copied()
			.filter(|hit| hit.similarity >= threshold)
			.filter(|hit| restrict_to.map(|ids| ids.contains(&hit.id)).unwrap_or(true))
			.collect();

		Box::pin(async move { Ok(hits) })
	}
}

pub struct FailingLexicalBackend {
	message: String,
	calls: AtomicUsize,
}
impl FailingLexicalBackend {
	pub fn new(message: &str) -> Self {
		Self { message: message.to_string(), calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl LexicalBackend for FailingLexicalBackend {
	fn matches<'a>(
		&'a self,
		_cfg: &'a LexicalBackendConfig,
		_keyword: &'a str,
		_threshold: f32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Err(color_eyre::eyre::eyre!(self.message.clone())) })
	}
}

pub struct FailingVectorBackend {
	message: String,
	calls: AtomicUsize,
}
impl FailingVectorBackend {
	pub fn new(message: &str) -> Self {
		Self { message: message.to_string(), calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl VectorBackend for FailingVectorBackend {
	fn matches<'a>(
		&'a self,
		_cfg: &'a VectorBackendConfig,
		_query_text: &'a str,
		_threshold: f32,
		_restrict_to: Option<&'a [i64]>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Err(color_eyre::eyre::eyre!(self.message.clone())) })
	}
}

/// Vector double that sleeps before answering, for deadline tests.
pub struct SlowVectorBackend {
	delay: Duration,
	hits: Vec<ScoredHit>,
	calls: AtomicUsize,
}
impl SlowVectorBackend {
	pub fn new(delay: Duration, hits: Vec<ScoredHit>) -> Self {
		Self { delay, hits, calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl VectorBackend for SlowVectorBackend {
	fn matches<'a>(
		&'a self,
		_cfg: &'a VectorBackendConfig,
		_query_text: &'a str,
		_threshold: f32,
		_restrict_to: Option<&'a [i64]>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let delay = self.delay;
		let hits = self.hits.clone();

		Box::pin(async move {
			tokio::time::sleep(delay).await;

			Ok(hits)
		})
	}
}
