pub mod analysis;
pub mod condition;
pub mod presets;
pub mod result;

pub use analysis::{QueryAnalysis, QueryComplexity, analyze_query, suggest_keywords};
pub use condition::{ConditionViolation, SearchCondition, Strategy, normalize_keyword};
pub use presets::{preset, preset_names};
pub use result::{
	Candidate, Diagnostics, EntityId, MatchStage, SearchItem, SearchResponse, Signal, StageRecord,
};
