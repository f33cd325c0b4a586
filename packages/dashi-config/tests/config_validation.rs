use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use dashi_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("dashi_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn expect_validation_error(cfg: &Config, needle: &str) {
	let err = dashi_config::validate(cfg).expect_err("Expected a validation error.");

	assert!(err.to_string().contains(needle), "Unexpected error: {err}");
}

#[test]
fn sample_config_is_valid() {
	assert!(dashi_config::validate(&base_config()).is_ok());
}

#[test]
fn cascade_candidate_cap_must_be_positive() {
	let mut cfg = base_config();

	cfg.engine.cascade_candidate_cap = 0;

	expect_validation_error(&cfg, "engine.cascade_candidate_cap must be greater than zero.");
}

#[test]
fn backend_timeout_must_be_positive() {
	let mut cfg = base_config();

	cfg.engine.backend_timeout_ms = 0;

	expect_validation_error(&cfg, "engine.backend_timeout_ms must be greater than zero.");
}

#[test]
fn default_max_results_must_be_positive() {
	let mut cfg = base_config();

	cfg.engine.default_max_results = 0;

	expect_validation_error(&cfg, "engine.default_max_results must be greater than zero.");
}

#[test]
fn default_thresholds_must_be_in_range() {
	let mut cfg = base_config();

	cfg.engine.default_required_similarity_threshold = 0.0;

	expect_validation_error(
		&cfg,
		"engine.default_required_similarity_threshold must be greater than zero and 1.0 or less.",
	);

	cfg = base_config();
	cfg.engine.default_vector_similarity_threshold = 1.5;

	expect_validation_error(
		&cfg,
		"engine.default_vector_similarity_threshold must be greater than zero and 1.0 or less.",
	);

	cfg = base_config();
	cfg.engine.default_excluded_similarity_threshold = f32::NAN;

	expect_validation_error(
		&cfg,
		"engine.default_excluded_similarity_threshold must be greater than zero and 1.0 or less.",
	);
}

#[test]
fn default_weights_must_be_finite_and_non_negative() {
	let mut cfg = base_config();

	cfg.engine.default_lexical_weight = f32::NAN;

	expect_validation_error(&cfg, "engine.default_lexical_weight must be a finite number.");

	cfg = base_config();
	cfg.engine.default_vector_weight = -0.1;

	expect_validation_error(&cfg, "engine.default_vector_weight must be zero or greater.");
}

#[test]
fn default_weights_require_at_least_one_positive() {
	let mut cfg = base_config();

	cfg.engine.default_lexical_weight = 0.0;
	cfg.engine.default_vector_weight = 0.0;

	expect_validation_error(&cfg, "At least one engine default weight must be greater than zero.");
}

#[test]
fn backend_api_key_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.backends.vector.api_key = "   ".to_string();

	expect_validation_error(&cfg, "backends.vector.api_key must be non-empty.");
}

#[test]
fn backend_api_base_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.backends.lexical.api_base = String::new();

	expect_validation_error(&cfg, "backends.lexical.api_base must be non-empty.");
}

#[test]
fn vector_model_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.backends.vector.model = String::new();

	expect_validation_error(&cfg, "backends.vector.model must be non-empty.");
}

#[test]
fn load_normalizes_api_base_trailing_slashes() {
	let payload = SAMPLE_CONFIG_TOML.replace(
		"api_base        = \"http://localhost:7700\"",
		"api_base        = \"http://localhost:7700///\"",
	);
	let path = write_temp_config(payload);
	let result = dashi_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected normalized config to load.");

	assert_eq!(cfg.backends.lexical.api_base, "http://localhost:7700");
}

#[test]
fn load_reports_missing_fields_as_parse_errors() {
	let payload = SAMPLE_CONFIG_TOML.replace("model           = \"recipe-embed-v1\"\n", "");
	let path = write_temp_config(payload);
	let result = dashi_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected missing model parse error.");
	let message = match err {
		Error::ParseConfig { source, .. } => source.to_string(),
		err => panic!("Expected parse config error, got {err}"),
	};

	assert!(message.contains("missing field `model`"), "Unexpected error: {message}");
}

#[test]
fn dashi_example_toml_is_valid() {
	let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

	path.push("../../dashi.example.toml");

	dashi_config::load(&path).expect("Expected dashi.example.toml to be a valid config.");
}
