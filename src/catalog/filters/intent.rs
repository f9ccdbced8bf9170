use crate::state::mvi::Intent;

use super::state::{ActiveCategory, Facet, SortMode};

/// User intents against the filter selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterIntent {
    ToggleFacet { facet: Facet, id: String },
    SetCategory(ActiveCategory),
    ClearCategory,
    SetPriceCeiling(f64),
    SetSearchTerm(String),
    SetSortMode(SortMode),
    /// Reset everything. `keep_category` preserves a route-sourced category.
    ClearAll { keep_category: bool },
}

impl Intent for FilterIntent {}
