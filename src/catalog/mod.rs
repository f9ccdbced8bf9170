//! Product browsing: listing filters, facet options, detail lookups and
//! slugs.

pub mod facets;
pub mod filters;
pub mod products;
pub mod slug;
pub mod types;

pub use facets::{FacetKind, FacetLoader, FacetOption, FacetOptionsState};
pub use products::{ProductCatalog, ProductRail, RailRelation};
pub use types::{Category, Product, ProductPage, ProductSummary, RailProduct};
