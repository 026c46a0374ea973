//! Storefront configuration.
//!
//! Loaded from TOML or JSON. Every section and field has a default, so an
//! empty file is a valid configuration.

use crate::cart::{
    Coupon, CouponTable, PricingEngine, PricingRules, DEFAULT_COUPON_CODE, DEFAULT_COUPON_PERCENT,
};
use crate::error::CommerceError;
use crate::money::{Currency, Money, CATALOG_CURRENCY};
use crate::search::{PriceRange, QueryState, QueryStateStore, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorefrontConfig {
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub query: QueryConfig,
}

/// Catalog service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// API root, e.g. `https://shop.example.com/api`.
    pub base_url: String,
    /// Products per grid page.
    pub page_size: u32,
    /// Timeout for a single catalog request.
    pub fetch_timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl CatalogConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Pricing settings. Amounts are in major units (`100.0` is $100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// ISO currency code.
    pub currency: String,
    pub free_shipping_threshold: f64,
    pub flat_shipping: f64,
    pub coupons: Vec<Coupon>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::USD.code().to_string(),
            free_shipping_threshold: 100.0,
            flat_shipping: 10.0,
            coupons: vec![Coupon::new(DEFAULT_COUPON_CODE, DEFAULT_COUPON_PERCENT)],
        }
    }
}

/// Default query settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 500.0,
        }
    }
}

impl StorefrontConfig {
    /// Load from a file. `.json` files are parsed as JSON, anything else as
    /// TOML. The result is validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CommerceError::Config(format!("{}: {e}", path.display())))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)
                .map_err(|e| CommerceError::Config(format!("{}: {e}", path.display())))?,
            _ => toml::from_str(&text)
                .map_err(|e| CommerceError::Config(format!("{}: {e}", path.display())))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(text).map_err(|e| CommerceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.catalog.page_size == 0 {
            return Err(CommerceError::Config("catalog.page_size must be at least 1".into()));
        }
        let currency = self.currency()?;
        if currency != CATALOG_CURRENCY {
            return Err(CommerceError::Config(format!(
                "pricing.currency {} does not match catalog prices in {}",
                currency.code(),
                CATALOG_CURRENCY.code()
            )));
        }
        if self.pricing.free_shipping_threshold < 0.0 || self.pricing.flat_shipping < 0.0 {
            return Err(CommerceError::Config("shipping amounts must not be negative".into()));
        }
        for coupon in &self.pricing.coupons {
            if coupon.code.trim().is_empty() {
                return Err(CommerceError::Config("coupon code must not be blank".into()));
            }
            if !(0.0..=100.0).contains(&coupon.percent) {
                return Err(CommerceError::Config(format!(
                    "coupon {} percent {} outside 0-100",
                    coupon.code, coupon.percent
                )));
            }
        }
        if self.query.min_price < 0.0 {
            return Err(CommerceError::Config("query.min_price must not be negative".into()));
        }
        self.price_range()?;
        Ok(())
    }

    pub fn currency(&self) -> Result<Currency, CommerceError> {
        Currency::from_code(&self.pricing.currency).ok_or_else(|| {
            CommerceError::Config(format!("unknown currency {}", self.pricing.currency))
        })
    }

    pub fn pricing_rules(&self) -> Result<PricingRules, CommerceError> {
        let currency = self.currency()?;
        Ok(PricingRules {
            currency,
            free_shipping_threshold: Money::from_decimal(self.pricing.free_shipping_threshold, currency),
            flat_shipping: Money::from_decimal(self.pricing.flat_shipping, currency),
            coupons: CouponTable::new(self.pricing.coupons.clone()),
        })
    }

    pub fn pricing_engine(&self) -> Result<PricingEngine, CommerceError> {
        self.pricing_rules().map(PricingEngine::new)
    }

    /// Default price range of the query.
    pub fn price_range(&self) -> Result<PriceRange, CommerceError> {
        let currency = self.currency()?;
        PriceRange::new(
            Money::from_decimal(self.query.min_price, currency),
            Money::from_decimal(self.query.max_price, currency),
        )
    }

    pub fn default_query(&self) -> Result<QueryState, CommerceError> {
        self.price_range().map(QueryState::with_price_range)
    }

    /// A query store seeded from this configuration.
    pub fn query_store(&self) -> Result<QueryStateStore, CommerceError> {
        Ok(QueryStateStore::new(self.default_query()?, self.catalog.page_size)
            .with_fetch_timeout(self.catalog.fetch_timeout()))
    }
}
