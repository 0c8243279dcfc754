use serde::{Deserialize, Serialize};

use crate::{domain::PuzzleId, filters::FilterSelection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub filters: FilterSelection,
    pub puzzle_ids: Vec<PuzzleId>,
    pub game_state_filter_endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub puzzle_ids: Vec<PuzzleId>,
}
