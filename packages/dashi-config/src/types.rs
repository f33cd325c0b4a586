use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub engine: Engine,
	pub backends: Backends,
}

#[derive(Debug, Deserialize)]
pub struct Engine {
	/// Upper bound on the candidate-id set the cascade lexical stage may hand
	/// to the vector stage.
	pub cascade_candidate_cap: u32,
	/// Per-call deadline for every backend invocation.
	pub backend_timeout_ms: u64,
	pub default_max_results: u32,
	pub default_required_similarity_threshold: f32,
	pub default_excluded_similarity_threshold: f32,
	pub default_vector_similarity_threshold: f32,
	pub default_lexical_weight: f32,
	pub default_vector_weight: f32,
}

#[derive(Debug, Deserialize)]
pub struct Backends {
	pub lexical: LexicalBackendConfig,
	pub vector: VectorBackendConfig,
}

#[derive(Debug, Deserialize)]
pub struct LexicalBackendConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct VectorBackendConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
