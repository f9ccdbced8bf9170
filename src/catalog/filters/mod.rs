//! Shop listing filters and incremental pagination.

mod coordinator;
mod intent;
mod query;
mod reducer;
mod route;
mod state;

pub use coordinator::{
    FetchFailure, FetchMode, FetchOutcome, FilterCoordinator, PendingFetch, ProductSearch,
};
pub use intent::FilterIntent;
pub use query::{build_filter_data, FilterData, ProductQuery};
pub use reducer::FilterReducer;
pub use route::{Navigation, Navigator, RecordingNavigator, RouteError, ShopRoute};
pub use state::{ActiveCategory, Facet, FacetSet, FilterSelection, PageAccumulator, SortMode};
