//! Row decoding from raw report cells into line items.
//!
//! Each row is looked up by column name; absent columns read as an empty
//! string and therefore as zero. Individual cost columns are folded into
//! their cost categories as soon as the row is decoded.

use crate::config::ReportColumns;
use crate::currency::parse_currency;
use crate::models::{LineItem, ProductKey};
use csv::StringRecord;
use std::collections::HashMap;

/// One table row keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Pair a CSV record with its header row
    ///
    /// Header names are trimmed and a leading BOM is dropped. The first
    /// column wins when a name repeats; cells beyond the header are ignored.
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        let mut cells = HashMap::with_capacity(headers.len());
        for (name, value) in headers.iter().zip(record.iter()) {
            let name = name.trim_start_matches('\u{feff}').trim();
            cells
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        Self { cells }
    }

    /// Build a row from column/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut cells = HashMap::new();
        for (name, value) in pairs {
            cells.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { cells }
    }

    /// Raw cell value, empty when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// Cell value parsed as a number
    pub fn number(&self, column: &str) -> f64 {
        parse_currency(self.get(column))
    }

    fn sum(&self, columns: &[&String]) -> f64 {
        columns.iter().map(|column| self.number(column)).sum()
    }
}

/// Decode one row into its numeric line item
pub fn decode_row(row: &RawRow, columns: &ReportColumns) -> LineItem {
    let delivered_items = row.number(&columns.delivered_items);
    let returned_items = row.number(&columns.returned_items);
    let unit_cost = row.number(&columns.unit_cost);

    LineItem {
        revenue: row.number(&columns.revenue),
        discount_points: row.number(&columns.discount_points),
        partner_programs: row.number(&columns.partner_programs),
        marketplace_commission: row.number(&columns.marketplace_commission),
        ordered_items: row.number(&columns.ordered_items),
        delivered_items,
        returned_items,
        logistics_cost: row.sum(&[
            &columns.shipment_processing,
            &columns.logistics,
            &columns.delivery_to_pickup_point,
            &columns.placement,
        ]),
        acquiring_cost: row.number(&columns.acquiring),
        returns_cost: row.sum(&[&columns.return_processing, &columns.reverse_logistics]),
        additional_services_cost: row.sum(&[
            &columns.disposal,
            &columns.seller_error_processing,
        ]),
        promotion_cost: row.sum(&[
            &columns.pay_per_click,
            &columns.pay_per_order,
            &columns.featured_listing,
            &columns.paid_brand,
        ]),
        unit_cost,
        cogs: -(unit_cost * (delivered_items - returned_items)),
    }
}

/// Product key of a row: SKU, then seller article, then "Unknown"
pub fn product_key(row: &RawRow, columns: &ReportColumns) -> ProductKey {
    ProductKey::from_candidates([row.get(&columns.sku), row.get(&columns.article)])
}

/// Display name of a row's product, trimmed
pub fn product_name<'a>(row: &'a RawRow, columns: &ReportColumns) -> &'a str {
    row.get(&columns.product_name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::columns as col;

    fn full_row() -> RawRow {
        RawRow::from_pairs([
            (col::SKU, "1001"),
            (col::PRODUCT_NAME, " Кружка "),
            (col::REVENUE, "1 000,00"),
            (col::DISCOUNT_POINTS, "50"),
            (col::PARTNER_PROGRAMS, "10"),
            (col::MARKETPLACE_COMMISSION, "-150"),
            (col::ACQUIRING, "-20"),
            (col::SHIPMENT_PROCESSING, "-1"),
            (col::LOGISTICS, "-2"),
            (col::DELIVERY_TO_PICKUP_POINT, "-3"),
            (col::PLACEMENT, "-4"),
            (col::RETURN_PROCESSING, "-5"),
            (col::REVERSE_LOGISTICS, "-6"),
            (col::DISPOSAL, "-7"),
            (col::SELLER_ERROR_PROCESSING, "-8"),
            (col::PAY_PER_CLICK, "-9"),
            (col::PAY_PER_ORDER, "-10"),
            (col::FEATURED_LISTING, "-11"),
            (col::PAID_BRAND, "-12"),
            (col::UNIT_COST, "100"),
            (col::ORDERED_ITEMS, "12"),
            (col::DELIVERED_ITEMS, "10"),
            (col::RETURNED_ITEMS, "2"),
        ])
    }

    #[test]
    fn test_cost_categories_are_grouped() {
        let item = decode_row(&full_row(), &ReportColumns::default());

        assert_eq!(item.revenue, 1000.0);
        assert_eq!(item.discount_points, 50.0);
        assert_eq!(item.partner_programs, 10.0);
        assert_eq!(item.marketplace_commission, -150.0);
        assert_eq!(item.acquiring_cost, -20.0);
        assert_eq!(item.logistics_cost, -10.0);
        assert_eq!(item.returns_cost, -11.0);
        assert_eq!(item.additional_services_cost, -15.0);
        assert_eq!(item.promotion_cost, -42.0);
        assert_eq!(item.ordered_items, 12.0);
        assert_eq!(item.delivered_items, 10.0);
        assert_eq!(item.returned_items, 2.0);
        assert_eq!(item.unit_cost, 100.0);
    }

    #[test]
    fn test_cogs_nets_out_returns() {
        let item = decode_row(&full_row(), &ReportColumns::default());
        assert_eq!(item.cogs, -800.0);
    }

    #[test]
    fn test_missing_and_malformed_cells_are_zero() {
        let row = RawRow::from_pairs([(col::REVENUE, "n/a"), (col::LOGISTICS, "-3,5")]);

        let item = decode_row(&row, &ReportColumns::default());

        assert_eq!(item.revenue, 0.0);
        assert_eq!(item.logistics_cost, -3.5);
        assert_eq!(item.promotion_cost, 0.0);
        assert_eq!(item.cogs, 0.0);
    }

    #[test]
    fn test_empty_row_decodes_to_zero() {
        let item = decode_row(&RawRow::default(), &ReportColumns::default());
        assert_eq!(item.revenue, 0.0);
        assert_eq!(item.logistics_cost, 0.0);
        assert_eq!(item.cogs, 0.0);
    }

    #[test]
    fn test_product_identity() {
        let columns = ReportColumns::default();
        let row = full_row();
        assert_eq!(product_key(&row, &columns).as_str(), "1001");
        assert_eq!(product_name(&row, &columns), "Кружка");

        let by_article = RawRow::from_pairs([(col::ARTICLE, "MUG-01")]);
        assert_eq!(product_key(&by_article, &columns).as_str(), "MUG-01");

        assert!(product_key(&RawRow::default(), &columns).is_unknown());
    }

    #[test]
    fn test_record_pairing_trims_headers() {
        let headers = StringRecord::from(vec!["\u{feff}SKU", " Выручка ", "SKU"]);
        let record = StringRecord::from(vec!["7", "12,5", "shadowed"]);

        let row = RawRow::from_record(&headers, &record);

        assert_eq!(row.get("SKU"), "7");
        assert_eq!(row.number("Выручка"), 12.5);
        assert_eq!(row.get("missing"), "");
    }

    #[test]
    fn test_short_record_leaves_columns_missing() {
        let headers = StringRecord::from(vec!["SKU", "Выручка"]);
        let record = StringRecord::from(vec!["7"]);

        let row = RawRow::from_record(&headers, &record);

        assert_eq!(row.get("Выручка"), "");
    }
}
