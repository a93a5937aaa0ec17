//! Folding decoded rows into grand-total and per-product ledgers.

use crate::config::ReportColumns;
use crate::decoder::{RawRow, decode_row, product_key, product_name};
use crate::models::{AnalysisResult, HeaderLocation, Ledger, ProductKey, ProductLedger};
use std::collections::HashMap;

/// Incremental ledger builder
///
/// Products keep the order in which their key was first seen. The display
/// name is the first non-empty name seen for the key.
#[derive(Debug, Default)]
pub struct Aggregator {
    total: Ledger,
    products: Vec<ProductLedger>,
    index: HashMap<ProductKey, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one row and add it to the total and its product bucket
    pub fn push(&mut self, row: &RawRow, columns: &ReportColumns) {
        let item = decode_row(row, columns);
        let key = product_key(row, columns);
        let name = product_name(row, columns);

        self.total += &item;

        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.products.push(ProductLedger {
                    key: key.clone(),
                    name: String::new(),
                    ledger: Ledger::default(),
                });
                self.index.insert(key, self.products.len() - 1);
                self.products.len() - 1
            }
        };

        let product = &mut self.products[slot];
        if product.name.is_empty() && !name.is_empty() {
            product.name = name.to_string();
        }
        product.ledger += &item;
    }

    pub fn finish(self, header: HeaderLocation) -> AnalysisResult {
        AnalysisResult {
            total: self.total,
            products: self.products,
            header,
        }
    }
}

/// Aggregate a full table of rows into an analysis result
pub fn aggregate<'a>(
    rows: impl IntoIterator<Item = &'a RawRow>,
    columns: &ReportColumns,
    header: HeaderLocation,
) -> AnalysisResult {
    let mut aggregator = Aggregator::new();
    for row in rows {
        aggregator.push(row, columns);
    }
    aggregator.finish(header)
}
