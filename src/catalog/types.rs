use serde::{Deserialize, Serialize};

/// Product card data returned by the product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One page of search results; `is_products` means "more pages exist".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    pub is_products: bool,
}

/// Card shown in a home-page rail, with the relation it was listed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub id: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub id: i64,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Age {
    pub id: i64,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub id: i64,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    pub image_path: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_main: bool,
}

/// Full product as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub ages: Vec<Age>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub details: Vec<Detail>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Image flagged as main, else the one with the lowest sort order.
    pub fn main_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_main)
            .or_else(|| self.images.iter().min_by_key(|img| img.sort_order))
    }
}
