//! Translation of a filter selection into product-search variables.

use serde::{Deserialize, Serialize};

use super::state::{Facet, FilterSelection, SortMode};

/// One `{key, ids}` entry of the backend `filterData` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterData {
    pub key: String,
    pub ids: Vec<i64>,
}

/// Variables of the product-search operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub filter_data: Vec<FilterData>,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    pub sort_by: SortMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// Facet entries in color, genre, size, age order, then the active
/// category. Facets with no numeric ids contribute nothing.
pub fn build_filter_data(selection: &FilterSelection) -> Vec<FilterData> {
    let mut filter_data: Vec<FilterData> = Facet::ALL
        .iter()
        .filter_map(|facet| {
            let ids = selection.facet(*facet).numeric_ids();
            (!ids.is_empty()).then(|| FilterData {
                key: facet.filter_key().to_string(),
                ids,
            })
        })
        .collect();

    if let Some(category) = &selection.category {
        filter_data.push(FilterData {
            key: "categoryId".to_string(),
            ids: vec![category.id],
        });
    }

    filter_data
}

impl ProductQuery {
    /// Variables for `page`, or `None` when the selection has no scoping
    /// signal at all (no facet, no category, blank search term).
    pub fn from_selection(selection: &FilterSelection, page: u32) -> Option<Self> {
        let filter_data = build_filter_data(selection);
        let search_term = selection.trimmed_search().map(str::to_string);

        if filter_data.is_empty() && search_term.is_none() {
            return None;
        }

        Some(Self {
            filter_data,
            page,
            max_price: (selection.price_ceiling > 0.0).then_some(selection.price_ceiling),
            min_price: None,
            sort_by: selection.sort,
            search_term,
        })
    }
}
