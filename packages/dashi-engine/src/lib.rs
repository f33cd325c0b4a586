pub mod profile;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use profile::{PerformanceReport, StrategyRun};

use std::{future::Future, pin::Pin, sync::Arc};

use dashi_config::{Config, LexicalBackendConfig, VectorBackendConfig};
use dashi_domain::EntityId;
use dashi_providers::{lexical, vector};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One scored id as returned by either backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredHit {
	pub id: EntityId,
	pub similarity: f32,
}

/// Contract of the external lexical (character n-gram) index: given one
/// keyword and a similarity floor, return the matching ids with their
/// similarity in [0, 1].
pub trait LexicalBackend
where
	Self: Send + Sync,
{
	fn matches<'a>(
		&'a self,
		cfg: &'a LexicalBackendConfig,
		keyword: &'a str,
		threshold: f32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>>;
}

/// Contract of the external nearest-neighbor index: given query text and a
/// cosine-similarity floor, return matching ids, optionally restricted to an
/// exact candidate set.
pub trait VectorBackend
where
	Self: Send + Sync,
{
	fn matches<'a>(
		&'a self,
		cfg: &'a VectorBackendConfig,
		query_text: &'a str,
		threshold: f32,
		restrict_to: Option<&'a [EntityId]>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>>;
}

#[derive(Clone)]
pub struct Backends {
	pub lexical: Arc<dyn LexicalBackend>,
	pub vector: Arc<dyn VectorBackend>,
}

struct DefaultBackends;

impl LexicalBackend for DefaultBackends {
	fn matches<'a>(
		&'a self,
		cfg: &'a LexicalBackendConfig,
		keyword: &'a str,
		threshold: f32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		Box::pin(async move {
			let hits = lexical::matches(cfg, keyword, threshold).await?;

			Ok(hits.into_iter().map(|(id, similarity)| ScoredHit { id, similarity }).collect())
		})
	}
}

impl VectorBackend for DefaultBackends {
	fn matches<'a>(
		&'a self,
		cfg: &'a VectorBackendConfig,
		query_text: &'a str,
		threshold: f32,
		restrict_to: Option<&'a [EntityId]>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ScoredHit>>> {
		Box::pin(async move {
			let hits = vector::matches(cfg, query_text, threshold, restrict_to).await?;

			Ok(hits.into_iter().map(|(id, similarity)| ScoredHit { id, similarity }).collect())
		})
	}
}

impl Backends {
	pub fn new(lexical: Arc<dyn LexicalBackend>, vector: Arc<dyn VectorBackend>) -> Self {
		Self { lexical, vector }
	}
}

impl Default for Backends {
	fn default() -> Self {
		let backend = Arc::new(DefaultBackends);

		Self { lexical: backend.clone(), vector: backend }
	}
}

/// The hybrid ranking engine. Holds no per-query state: every `execute` call
/// works on its own values, so one engine can serve any number of concurrent
/// queries.
pub struct Engine {
	pub cfg: Config,
	pub backends: Backends,
}

impl Engine {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, backends: Backends::default() }
	}

	pub fn with_backends(cfg: Config, backends: Backends) -> Self {
		Self { cfg, backends }
	}
}
