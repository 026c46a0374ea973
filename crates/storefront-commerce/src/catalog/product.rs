//! Catalog product type.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{self, Money};
use serde::{Deserialize, Serialize};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// A product in the catalog.
///
/// Products are owned by the catalog source. The core shares them behind
/// `Arc` and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// List price.
    #[serde(with = "money::decimal")]
    pub price: Money,
    /// Sale price, when the product is discounted.
    #[serde(
        default,
        with = "money::decimal::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<Money>,
    /// Display category (e.g. "Electronics").
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Average rating in `[0, 5]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Shown on the home page.
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Create a product with the required fields.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            sale_price: None,
            category: category.into(),
            image: String::new(),
            description: String::new(),
            stock: 0,
            rating: None,
            featured: false,
        }
    }

    pub fn with_sale_price(mut self, sale_price: Money) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// The price actually charged.
    ///
    /// A sale price counts only when it is below the list price. A sale price
    /// of zero is still a sale price.
    pub fn effective_price(&self) -> Money {
        match self.sale_price {
            Some(sale) if sale.amount_cents < self.price.amount_cents => sale,
            _ => self.price,
        }
    }

    /// Check if the product is discounted.
    pub fn is_on_sale(&self) -> bool {
        self.effective_price() != self.price
    }

    /// Calculate the discount percentage if on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        if !self.is_on_sale() || self.price.amount_cents == 0 {
            return None;
        }
        let savings = self.price.amount_cents - self.effective_price().amount_cents;
        Some((savings as f64 / self.price.amount_cents as f64) * 100.0)
    }

    /// Check if any units are in stock.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check the catalog invariants on price, sale price and rating.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if !self.price.is_positive() {
            return Err(CommerceError::InvalidProduct(format!(
                "{}: price must be positive, got {}",
                self.id, self.price
            )));
        }
        if let Some(sale) = self.sale_price {
            if sale.currency != self.price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.price.currency.code().to_string(),
                    got: sale.currency.code().to_string(),
                });
            }
            if sale.is_negative() || sale.amount_cents >= self.price.amount_cents {
                return Err(CommerceError::InvalidProduct(format!(
                    "{}: sale price {} must be below list price {}",
                    self.id, sale, self.price
                )));
            }
        }
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(CommerceError::InvalidProduct(format!(
                    "{}: rating {} outside [0, {}]",
                    self.id, rating, MAX_RATING
                )));
            }
        }
        Ok(())
    }
}
