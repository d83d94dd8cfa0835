// fixtures/catalog.rs - Sample product catalog
//
// A small store inventory with a spread of prices and stock levels so that
// name, price and stock filters each select a distinct subset.

use rust_decimal::Decimal;

use crate::fixtures::CatalogFixture;
use crate::web_app::model::Product;

pub struct SampleCatalog;

/// (name, price in cents, stock)
const ITEMS: &[(&str, i64, i32)] = &[
    ("Wireless Headphones", 7999, 25),
    ("USB-C Cable", 1299, 300),
    ("Mechanical Keyboard", 12999, 40),
    ("Gaming Mouse Pro", 5999, 60),
    ("Standard Mouse", 1499, 120),
    ("Ergonomic Office Chair", 24999, 8),
    ("Gaming Chair", 19999, 5),
    ("Wi-Fi 6 Router", 8999, 0),
    ("Blue T-Shirt", 1999, 75),
    ("Red T-Shirt", 1999, 60),
    ("Desk Lamp", 3499, 30),
    ("Standing Desk", 39999, 3),
];

impl CatalogFixture for SampleCatalog {
    fn products() -> Vec<Product> {
        ITEMS
            .iter()
            .zip(1..)
            .map(|(&(name, cents, stock), id)| Product {
                id,
                name: name.to_string(),
                price: Decimal::new(cents, 2),
                image_url: format!("https://images.example.com/products/{}.jpg", slug(name)),
                stock,
            })
            .collect()
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
