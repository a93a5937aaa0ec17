//! Core data structures for unit-economics analysis.
//!
//! Defines the decoded report row, the summing ledger, product keys and the
//! immutable analysis result handed to the metrics engine and renderers.

use crate::constants::UNKNOWN_PRODUCT_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Numeric content of one report row
///
/// Cost fields are negative (money leaving), revenue fields positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub revenue: f64,
    pub discount_points: f64,
    pub partner_programs: f64,
    pub marketplace_commission: f64,
    pub ordered_items: f64,
    pub delivered_items: f64,
    pub returned_items: f64,
    pub logistics_cost: f64,
    pub acquiring_cost: f64,
    pub returns_cost: f64,
    pub additional_services_cost: f64,
    pub promotion_cost: f64,
    /// Per-unit cost price, only used to derive `cogs`
    pub unit_cost: f64,
    pub cogs: f64,
}

/// Sum of line items over a set of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub revenue: f64,
    pub discount_points: f64,
    pub partner_programs: f64,
    pub marketplace_commission: f64,
    pub ordered_items: f64,
    pub delivered_items: f64,
    pub returned_items: f64,
    pub logistics_cost: f64,
    pub acquiring_cost: f64,
    pub returns_cost: f64,
    pub additional_services_cost: f64,
    pub promotion_cost: f64,
    pub cogs: f64,
    /// Number of rows folded into this ledger
    pub rows: usize,
}

impl Ledger {
    /// Fold one decoded row into the ledger
    pub fn add(&mut self, item: &LineItem) {
        self.revenue += item.revenue;
        self.discount_points += item.discount_points;
        self.partner_programs += item.partner_programs;
        self.marketplace_commission += item.marketplace_commission;
        self.ordered_items += item.ordered_items;
        self.delivered_items += item.delivered_items;
        self.returned_items += item.returned_items;
        self.logistics_cost += item.logistics_cost;
        self.acquiring_cost += item.acquiring_cost;
        self.returns_cost += item.returns_cost;
        self.additional_services_cost += item.additional_services_cost;
        self.promotion_cost += item.promotion_cost;
        self.cogs += item.cogs;
        self.rows += 1;
    }

    /// Revenue plus discount points plus partner programs
    pub fn total_sales_revenue(&self) -> f64 {
        self.revenue + self.discount_points + self.partner_programs
    }

    /// Named numeric fields, in report order
    pub fn fields(&self) -> [(&'static str, f64); 13] {
        [
            ("revenue", self.revenue),
            ("discount_points", self.discount_points),
            ("partner_programs", self.partner_programs),
            ("marketplace_commission", self.marketplace_commission),
            ("ordered_items", self.ordered_items),
            ("delivered_items", self.delivered_items),
            ("returned_items", self.returned_items),
            ("logistics_cost", self.logistics_cost),
            ("acquiring_cost", self.acquiring_cost),
            ("returns_cost", self.returns_cost),
            ("additional_services_cost", self.additional_services_cost),
            ("promotion_cost", self.promotion_cost),
            ("cogs", self.cogs),
        ]
    }
}

impl AddAssign<&LineItem> for Ledger {
    fn add_assign(&mut self, item: &LineItem) {
        self.add(item);
    }
}

/// Grouping key for per-product ledgers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    /// Build a key from the first non-blank candidate, or the "Unknown" sentinel
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Self {
        candidates
            .into_iter()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .map(|candidate| Self(candidate.to_string()))
            .unwrap_or_else(Self::unknown)
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_PRODUCT_KEY.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_PRODUCT_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger scoped to a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLedger {
    pub key: ProductKey,
    /// Display name, not authoritative
    pub name: String,
    pub ledger: Ledger,
}

/// Where the table header was found in the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLocation {
    /// Zero-based line index of the header row
    pub line_index: usize,
    /// False when the fallback index was used
    pub detected: bool,
}

/// Outcome of analysing one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total: Ledger,
    /// Per-product ledgers in order of first occurrence
    pub products: Vec<ProductLedger>,
    pub header: HeaderLocation,
}

impl AnalysisResult {
    /// Number of data rows folded into the grand total
    pub fn row_count(&self) -> usize {
        self.total.rows
    }

    pub fn product(&self, key: &str) -> Option<&ProductLedger> {
        self.products.iter().find(|product| product.key.as_str() == key)
    }
}
