//! Catalog price pipeline: turns scraped product records into a report `Value`.
//!
//! Input records are what a listing scraper extracts per product (name, raw
//! price string, link, author). Fetching and HTML extraction happen elsewhere;
//! this module only does the arithmetic:
//!
//! 1. Validate and parse the raw price (`"1 250 lei"`, `"12.5 EUR"`, `"9,99 €"`).
//! 2. Convert between MDL and EUR with injectable [`Rates`].
//! 3. Keep items whose MDL price lies in `[min_price_mdl, max_price_mdl]`.
//! 4. Sum the kept EUR prices and stamp the report with a UTC time.
//!
//! Scraping is best-effort: missing names/links become `"N/A"`, a missing author
//! becomes `"Author not found."`, and items with unusable prices are skipped
//! with a warning. None of that leniency applies to the codec itself.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CodecError, Result};
use crate::types::Value;

/// Placeholder for a field the scraper could not find.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a product page without an author.
pub const AUTHOR_NOT_FOUND: &str = "Author not found.";

/// Currencies that appear on the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    /// Moldovan leu, shown as "lei" on listings.
    Mdl,
    Eur,
}

impl Currency {
    /// Recognize a currency label as printed next to a price.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "lei" | "mdl" => Some(Currency::Mdl),
            "eur" | "euro" | "€" => Some(Currency::Eur),
            _ => None,
        }
    }
}

/// Exchange rates used for conversion. Defaults to 19.5 MDL per EUR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    pub mdl_per_eur: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self { mdl_per_eur: 19.5 }
    }
}

impl Rates {
    /// Convert `amount` from one currency to another.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        match (from, to) {
            (Currency::Mdl, Currency::Eur) => amount / self.mdl_per_eur,
            (Currency::Eur, Currency::Mdl) => amount * self.mdl_per_eur,
            _ => amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.mdl_per_eur.is_finite() && self.mdl_per_eur > 0.0) {
            return Err(CodecError::Config(format!(
                "mdl_per_eur must be a positive number, got {}",
                self.mdl_per_eur
            )));
        }
        Ok(())
    }
}

/// Pipeline configuration. Every field is optional in JSON form.
///
/// ```
/// use tagcodec_core::CatalogConfig;
/// let config = CatalogConfig::from_json(r#"{"max_price_mdl": 300}"#).unwrap();
/// assert_eq!(config.min_price_mdl, 50.0);
/// assert_eq!(config.max_price_mdl, 300.0);
/// assert_eq!(config.rates.mdl_per_eur, 19.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub rates: Rates,
    pub min_price_mdl: f64,
    pub max_price_mdl: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            rates: Rates::default(),
            min_price_mdl: 50.0,
            max_price_mdl: 500.0,
        }
    }
}

impl CatalogConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.rates.validate()?;
        for (name, bound) in [
            ("min_price_mdl", self.min_price_mdl),
            ("max_price_mdl", self.max_price_mdl),
        ] {
            if !bound.is_finite() {
                return Err(CodecError::Config(format!(
                    "{name} must be a finite number, got {bound}"
                )));
            }
        }
        if self.min_price_mdl > self.max_price_mdl {
            return Err(CodecError::Config(format!(
                "min_price_mdl ({}) is greater than max_price_mdl ({})",
                self.min_price_mdl, self.max_price_mdl
            )));
        }
        Ok(())
    }
}

/// A product record as extracted from a listing. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub name: Option<String>,
    /// Raw price text, e.g. `"250 lei"`.
    pub price: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
}

/// Read a JSON array of product records.
pub fn read_products(json: &str) -> Result<Vec<Product>> {
    Ok(serde_json::from_str(json)?)
}

/// A validated price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: Currency,
}

/// Parse a listing price such as `"1 250 lei"`, `"12.5 EUR"`, or `"9,99 €"`.
///
/// The amount is digits with optional space (or no-break space) grouping and a
/// single `.` or `,` decimal mark; the currency label follows it. Returns `None`
/// for anything else.
pub fn parse_price(raw: &str) -> Option<Price> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ',' || c.is_whitespace()))
        .unwrap_or(raw.len());
    let (amount_text, label) = raw.split_at(split);

    let currency = Currency::parse(label)?;

    let digits: String = amount_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if digits.is_empty()
        || digits.matches('.').count() > 1
        || !digits.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    let amount: f64 = digits.parse().ok()?;
    Some(Price { amount, currency })
}

/// A product that passed validation and the price window.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub name: String,
    pub price_mdl: f64,
    pub price_eur: f64,
    pub link: String,
    pub author: String,
}

impl CatalogItem {
    pub fn to_value(&self) -> Value {
        Value::map()
            .with("name", self.name.as_str())
            .with("price_MDL", self.price_mdl)
            .with("price_EUR", self.price_eur)
            .with("link", self.link.as_str())
            .with("author", self.author.as_str())
    }
}

/// The pipeline result: kept items, their EUR total, and when it was computed.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub products: Vec<CatalogItem>,
    pub total_price_eur: f64,
    pub timestamp: DateTime<Utc>,
}

impl CatalogReport {
    /// The value handed to the codec:
    /// `{"filtered_products": [...], "total_price_EUR": Real, "timestamp": Text}`.
    pub fn to_value(&self) -> Value {
        Value::map()
            .with(
                "filtered_products",
                self.products.iter().map(CatalogItem::to_value).collect::<Value>(),
            )
            .with("total_price_EUR", self.total_price_eur)
            .with(
                "timestamp",
                self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
    }
}

/// Run the pipeline over scraped products.
///
/// Prices are rounded to cents after conversion; the total is the rounded sum
/// of the rounded EUR prices.
pub fn process(
    products: &[Product],
    config: &CatalogConfig,
    timestamp: DateTime<Utc>,
) -> Result<CatalogReport> {
    config.validate()?;

    let rates = &config.rates;
    let mut kept = Vec::new();
    for product in products {
        let name = field_or(product.name.as_deref(), NOT_AVAILABLE);

        let Some(raw) = product.price.as_deref() else {
            warn!(name = %name, "skipping product without a price");
            continue;
        };
        let Some(price) = parse_price(raw) else {
            warn!(name = %name, price = raw, "skipping product with invalid price");
            continue;
        };

        let price_mdl = round_cents(rates.convert(price.amount, price.currency, Currency::Mdl));
        if price_mdl < config.min_price_mdl || price_mdl > config.max_price_mdl {
            debug!(name = %name, price_mdl, "price outside window");
            continue;
        }
        let price_eur = round_cents(rates.convert(price.amount, price.currency, Currency::Eur));

        kept.push(CatalogItem {
            name,
            price_mdl,
            price_eur,
            link: field_or(product.link.as_deref(), NOT_AVAILABLE),
            author: field_or(product.author.as_deref(), AUTHOR_NOT_FOUND),
        });
    }

    let total_price_eur = round_cents(kept.iter().map(|item| item.price_eur).sum());
    info!(
        kept = kept.len(),
        scraped = products.len(),
        total_price_eur,
        "catalog processed"
    );

    Ok(CatalogReport {
        products: kept,
        total_price_eur,
        timestamp,
    })
}

fn field_or(field: Option<&str>, fallback: &str) -> String {
    match field.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
