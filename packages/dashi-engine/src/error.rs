use dashi_domain::ConditionViolation;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid search condition: {message}")]
	InvalidCondition { message: String },
	#[error("Backend unavailable ({backend}): {message}")]
	BackendUnavailable { backend: &'static str, message: String },
}

impl Error {
	pub(crate) fn invalid_condition(violation: ConditionViolation) -> Self {
		Self::InvalidCondition { message: violation_message(&violation) }
	}
}

pub(crate) fn violation_message(violation: &ConditionViolation) -> String {
	match violation {
		ConditionViolation::ThresholdOutOfRange { field } => {
			format!("{field} must be greater than zero and 1.0 or less.")
		},
		ConditionViolation::NonFiniteWeight { field } => {
			format!("{field} must be a finite number.")
		},
		ConditionViolation::NegativeWeight { field } => {
			format!("{field} must be zero or greater.")
		},
		ConditionViolation::ZeroWeightSum => {
			"At least one of lexical_weight and vector_weight must be greater than zero."
				.to_string()
		},
		ConditionViolation::ZeroMaxResults => "max_results must be greater than zero.".to_string(),
		ConditionViolation::BlankKeyword { field } => {
			format!("{field} must not contain blank entries.")
		},
		ConditionViolation::OverlappingKeyword { keyword } => {
			format!("Keyword {keyword:?} appears in both required and excluded lists.")
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overlap_message_names_the_keyword() {
		let err = Error::invalid_condition(ConditionViolation::OverlappingKeyword {
			keyword: "卵".to_string(),
		});

		assert!(err.to_string().contains("卵"));
		assert!(err.to_string().starts_with("Invalid search condition:"));
	}
}
