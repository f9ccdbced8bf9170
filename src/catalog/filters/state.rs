use serde::{Deserialize, Serialize};

use crate::catalog::slug::slug_from_name;
use crate::catalog::types::{Category, ProductPage, ProductSummary};
use crate::state::mvi::StoreState;

/// A filterable product attribute with a multi-select set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Color,
    Genre,
    Size,
    Age,
}

impl Facet {
    /// Order in which facets appear in the backend filter list.
    pub const ALL: [Facet; 4] = [Facet::Color, Facet::Genre, Facet::Size, Facet::Age];

    /// Backend `filterData` key.
    pub fn filter_key(&self) -> &'static str {
        match self {
            Facet::Color => "colorId",
            Facet::Genre => "genreId",
            Facet::Size => "sizeId",
            Facet::Age => "ageId",
        }
    }
}

/// Insertion-ordered set of opaque facet identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetSet(Vec<String>);

impl FacetSet {
    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        match self.0.iter().position(|existing| existing == id) {
            Some(index) => {
                self.0.remove(index);
            }
            None => self.0.push(id.to_string()),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Identifiers that parse as integers, in selection order.
    pub fn numeric_ids(&self) -> Vec<i64> {
        self.0
            .iter()
            .filter_map(|id| id.trim().parse::<i64>().ok())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price_asc")]
    PriceAsc,
    #[serde(rename = "price_desc")]
    PriceDesc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortMode::Newest),
            "price_asc" => Some(SortMode::PriceAsc),
            "price_desc" => Some(SortMode::PriceDesc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCategory {
    pub name: String,
    pub id: i64,
    /// Route segment under `/shop`.
    pub slug: String,
}

impl ActiveCategory {
    /// Category whose route segment is generated from its name.
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        let name = name.into();
        Self {
            slug: slug_from_name(&name),
            name,
            id,
        }
    }

    /// Whether both refer to the same backend category. Slugs are not
    /// compared since a stored slug may differ from the generated one.
    pub fn same_as(&self, other: &ActiveCategory) -> bool {
        self.id == other.id || self.name == other.name
    }
}

impl From<&Category> for ActiveCategory {
    fn from(category: &Category) -> Self {
        match category.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Self {
                name: category.name.clone(),
                id: category.id,
                slug: slug.to_string(),
            },
            _ => Self::new(category.name.clone(), category.id),
        }
    }
}

/// The set of active facet choices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub colors: FacetSet,
    pub genres: FacetSet,
    pub sizes: FacetSet,
    pub ages: FacetSet,
    pub category: Option<ActiveCategory>,
    /// 0 means no ceiling.
    pub price_ceiling: f64,
    pub search_term: String,
    pub sort: SortMode,
}

impl StoreState for FilterSelection {}

impl FilterSelection {
    pub fn facet(&self, facet: Facet) -> &FacetSet {
        match facet {
            Facet::Color => &self.colors,
            Facet::Genre => &self.genres,
            Facet::Size => &self.sizes,
            Facet::Age => &self.ages,
        }
    }

    pub fn facet_mut(&mut self, facet: Facet) -> &mut FacetSet {
        match facet {
            Facet::Color => &mut self.colors,
            Facet::Genre => &mut self.genres,
            Facet::Size => &mut self.sizes,
            Facet::Age => &mut self.ages,
        }
    }

    /// Search term with surrounding whitespace removed, `None` when blank.
    pub fn trimmed_search(&self) -> Option<&str> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Products gathered across "load more" fetches for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageAccumulator {
    products: Vec<ProductSummary>,
    current_page: u32,
    has_more: bool,
}

impl Default for PageAccumulator {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            current_page: 1,
            has_more: true,
        }
    }
}

impl PageAccumulator {
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    /// Next page to request.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace contents with the page fetched as `requested_page`.
    pub fn replace(&mut self, page: ProductPage, requested_page: u32) -> usize {
        self.products.clear();
        self.append(page, requested_page)
    }

    /// Append the unique items of the page fetched as `requested_page`.
    /// Returns how many items were added.
    pub fn append(&mut self, page: ProductPage, requested_page: u32) -> usize {
        let before = self.products.len();
        for product in page.products {
            if !self.products.iter().any(|existing| existing.id == product.id) {
                self.products.push(product);
            }
        }
        self.current_page = requested_page.saturating_add(1);
        self.has_more = page.is_products;
        self.products.len() - before
    }
}
