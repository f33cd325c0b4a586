mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backends, Config, Engine, LexicalBackendConfig, VectorBackendConfig};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.engine.cascade_candidate_cap == 0 {
		return Err(Error::Validation {
			message: "engine.cascade_candidate_cap must be greater than zero.".to_string(),
		});
	}
	if cfg.engine.backend_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "engine.backend_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.engine.default_max_results == 0 {
		return Err(Error::Validation {
			message: "engine.default_max_results must be greater than zero.".to_string(),
		});
	}

	for (label, threshold) in [
		("engine.default_required_similarity_threshold", cfg.engine.default_required_similarity_threshold),
		("engine.default_excluded_similarity_threshold", cfg.engine.default_excluded_similarity_threshold),
		("engine.default_vector_similarity_threshold", cfg.engine.default_vector_similarity_threshold),
	] {
		if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero and 1.0 or less."),
			});
		}
	}

	for (label, weight) in [
		("engine.default_lexical_weight", cfg.engine.default_lexical_weight),
		("engine.default_vector_weight", cfg.engine.default_vector_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be zero or greater."),
			});
		}
	}

	if cfg.engine.default_lexical_weight + cfg.engine.default_vector_weight <= 0.0 {
		return Err(Error::Validation {
			message: "At least one engine default weight must be greater than zero.".to_string(),
		});
	}

	for (label, api_base, api_key, timeout_ms) in [
		(
			"backends.lexical",
			&cfg.backends.lexical.api_base,
			&cfg.backends.lexical.api_key,
			cfg.backends.lexical.timeout_ms,
		),
		(
			"backends.vector",
			&cfg.backends.vector.api_base,
			&cfg.backends.vector.api_key,
			cfg.backends.vector.timeout_ms,
		),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("{label}.api_base must be non-empty."),
			});
		}
		if api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("{label}.api_key must be non-empty."),
			});
		}
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.backends.vector.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "backends.vector.model must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in [&mut cfg.backends.lexical.api_base, &mut cfg.backends.vector.api_base] {
		while api_base.ends_with('/') {
			api_base.pop();
		}
	}
}
