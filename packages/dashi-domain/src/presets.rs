//! Ready-made search conditions for the bundled demo scenarios.

use crate::condition::{SearchCondition, Strategy};

const PRESET_NAMES: [&str; 4] = ["卵料理専門", "華やか卵料理", "お吸い物風", "色鮮やか卵"];

pub fn preset_names() -> [&'static str; 4] {
	PRESET_NAMES
}

pub fn preset(name: &str) -> Option<SearchCondition> {
	match name {
		"卵料理専門" => Some(SearchCondition {
			required_keywords: vec!["卵".to_string()],
			excluded_keywords: vec!["肉".to_string(), "魚".to_string()],
			semantic_query_text: "色鮮やかで美しい卵料理".to_string(),
			lexical_weight: 0.4,
			vector_weight: 0.6,
			strategy: Strategy::Cascade,
			max_results: 15,
			..SearchCondition::default()
		}),
		"華やか卵料理" => Some(SearchCondition {
			required_keywords: vec!["卵".to_string()],
			semantic_query_text: "華やかで彩り豊かな卵料理".to_string(),
			lexical_weight: 0.6,
			vector_weight: 0.4,
			strategy: Strategy::Parallel,
			max_results: 15,
			..SearchCondition::default()
		}),
		"お吸い物風" => Some(SearchCondition {
			required_keywords: vec!["卵".to_string()],
			semantic_query_text: "上品でやさしい味の料理".to_string(),
			lexical_weight: 0.4,
			vector_weight: 0.6,
			strategy: Strategy::Cascade,
			max_results: 15,
			..SearchCondition::default()
		}),
		"色鮮やか卵" => Some(SearchCondition {
			required_keywords: vec!["卵".to_string()],
			semantic_query_text: "色とりどりで美しい卵料理".to_string(),
			lexical_weight: 0.5,
			vector_weight: 0.5,
			strategy: Strategy::Parallel,
			max_results: 20,
			..SearchCondition::default()
		}),
		_ => None,
	}
}
