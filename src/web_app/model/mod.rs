// web_app/model/mod.rs - Shared data models for client and server
//
// These structs mirror the JSON exchanged with the catalog REST backend and are
// used by the controller, the forms and the Leptos views alike.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::web_app::error::ValidationError;

/// Server-assigned product identifier
pub type ProductId = i32;

/// Product as returned by the backend (`GET /products`, `POST`, `PATCH`)
///
/// The backend serializes `price` as a decimal string; numbers are accepted too.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub stock: i32,
}

/// Product fields without an id: the body of a create or update request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: String,
}

impl ProductDraft {
    /// Combine the draft with the id the backend assigned (or kept)
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            stock: self.stock,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            image_url: product.image_url.clone(),
        }
    }
}

/// One page of the product listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub results: Vec<Product>,
    /// Link to the following page; `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
    /// Total number of matching products, when the backend reports it
    #[serde(default)]
    pub count: Option<u64>,
}

impl ProductPage {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Field selectable in the single-field filter form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    #[default]
    Name,
    Price,
    Stock,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Name, FilterField::Price, FilterField::Stock];

    /// Value used in `<select>` options and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Price => "price",
            FilterField::Stock => "stock",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        FilterField::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterField::Name => write!(f, "Name"),
            FilterField::Price => write!(f, "Price"),
            FilterField::Stock => write!(f, "Stock"),
        }
    }
}

/// Filter criteria applied to the product listing
///
/// Every field is optional; an all-`None` value means "no filter".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive "contains" match on the product name
    pub name: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
}

impl FilterCriteria {
    /// Build criteria from the single-field form (`field` + free text)
    ///
    /// Name matches by substring; price and stock match the exact value.
    /// Blank input yields empty criteria.
    pub fn by_field(field: FilterField, query: &str) -> Result<Self, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(FilterCriteria::default());
        }

        let criteria = match field {
            FilterField::Name => FilterCriteria {
                name: Some(query.to_string()),
                ..Default::default()
            },
            FilterField::Price => {
                let price = parse_decimal("price", query)?;
                FilterCriteria {
                    price_min: Some(price),
                    price_max: Some(price),
                    ..Default::default()
                }
            }
            FilterField::Stock => {
                let stock = parse_integer("stock", query)?;
                FilterCriteria {
                    stock_min: Some(stock),
                    stock_max: Some(stock),
                    ..Default::default()
                }
            }
        };
        Ok(criteria)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then(|| name.trim().to_string());
        self
    }

    pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_stock_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.stock_min = min;
        self.stock_max = max;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.stock_min.is_none()
            && self.stock_max.is_none()
    }

    /// Query-string pairs understood by the backend's filter set
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(min) = self.price_min {
            pairs.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.price_max {
            pairs.push(("price_max", max.to_string()));
        }
        if let Some(min) = self.stock_min {
            pairs.push(("stock_min", min.to_string()));
        }
        if let Some(max) = self.stock_max {
            pairs.push(("stock_max", max.to_string()));
        }
        pairs
    }

    /// Whether a product satisfies these criteria (same semantics as the backend)
    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = match self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(needle) => product.name.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        name_ok
            && self.price_min.map_or(true, |min| product.price >= min)
            && self.price_max.map_or(true, |max| product.price <= max)
            && self.stock_min.map_or(true, |min| product.stock >= min)
            && self.stock_max.map_or(true, |max| product.stock <= max)
    }
}

/// Parse a decimal typed into a form field
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidNumber { field })
}

/// Parse a whole number typed into a form field
pub fn parse_integer(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidNumber { field })
}

/// Session identity as reported by `GET /api/session/`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub isauthenticated: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Username/password pair sent to the login and register endpoints
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
