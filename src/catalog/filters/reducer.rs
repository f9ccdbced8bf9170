use crate::state::mvi::Reducer;

use super::intent::FilterIntent;
use super::state::FilterSelection;

/// Pure transitions of the filter selection. Pagination side effects are
/// handled by the coordinator around the dispatch call.
pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = FilterSelection;
    type Intent = FilterIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FilterIntent::ToggleFacet { facet, id } => {
                state.facet_mut(facet).toggle(&id);
                state
            }
            FilterIntent::SetCategory(category) => {
                state.category = Some(category);
                state
            }
            FilterIntent::ClearCategory => {
                state.category = None;
                state
            }
            FilterIntent::SetPriceCeiling(value) => {
                // NaN and negatives mean "no ceiling"
                state.price_ceiling = if value.is_finite() && value > 0.0 {
                    value
                } else {
                    0.0
                };
                state
            }
            FilterIntent::SetSearchTerm(term) => {
                state.search_term = term;
                state
            }
            FilterIntent::SetSortMode(mode) => {
                state.sort = mode;
                state
            }
            FilterIntent::ClearAll { keep_category } => FilterSelection {
                category: if keep_category { state.category } else { None },
                ..FilterSelection::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filters::state::{ActiveCategory, Facet, SortMode};

    #[test]
    fn toggle_adds_then_removes() {
        let state = FilterReducer::reduce(
            FilterSelection::default(),
            FilterIntent::ToggleFacet {
                facet: Facet::Size,
                id: "5".to_string(),
            },
        );
        assert!(state.sizes.contains("5"));

        let state = FilterReducer::reduce(
            state,
            FilterIntent::ToggleFacet {
                facet: Facet::Size,
                id: "5".to_string(),
            },
        );
        assert!(state.sizes.is_empty());
    }

    #[test]
    fn negative_price_means_no_ceiling() {
        let state = FilterReducer::reduce(FilterSelection::default(), FilterIntent::SetPriceCeiling(-3.0));
        assert_eq!(state.price_ceiling, 0.0);
        let state = FilterReducer::reduce(state, FilterIntent::SetPriceCeiling(f64::NAN));
        assert_eq!(state.price_ceiling, 0.0);
        let state = FilterReducer::reduce(state, FilterIntent::SetPriceCeiling(2500.0));
        assert_eq!(state.price_ceiling, 2500.0);
    }

    #[test]
    fn clear_all_can_keep_category() {
        let mut state = FilterSelection::default();
        state.category = Some(ActiveCategory::new("Remeras", 3));
        state.sort = SortMode::PriceDesc;
        state.colors.toggle("1");

        let kept = FilterReducer::reduce(state.clone(), FilterIntent::ClearAll { keep_category: true });
        assert_eq!(kept.category, Some(ActiveCategory::new("Remeras", 3)));
        assert!(kept.colors.is_empty());
        assert_eq!(kept.sort, SortMode::Newest);

        let cleared = FilterReducer::reduce(state, FilterIntent::ClearAll { keep_category: false });
        assert_eq!(cleared, FilterSelection::default());
    }
}
