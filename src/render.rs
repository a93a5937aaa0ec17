//! Rendering of analysis results for the terminal and JSON output.
//!
//! The renderer only reads the analysis result; every figure shown is
//! recomputed from it by the metrics engine.

use crate::metrics::{Metrics, MetricsEngine, ProductMetrics};
use crate::models::{AnalysisResult, HeaderLocation, Ledger};
use colored::*;
use serde::Serialize;

/// Grand total and per-product figures ready for display
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub header: HeaderLocation,
    pub rows: usize,
    pub product_count: usize,
    pub total: Ledger,
    pub metrics: Metrics,
    pub products: Vec<ProductRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    #[serde(flatten)]
    pub product: ProductMetrics,
    pub ledger: Ledger,
}

impl Report {
    /// Compute all views; `top` keeps the products with the largest sales revenue
    pub fn build(result: &AnalysisResult, engine: &MetricsEngine, top: Option<usize>) -> Self {
        let mut products: Vec<ProductRow> = result
            .products
            .iter()
            .map(|product| ProductRow {
                product: engine.product(result, product),
                ledger: product.ledger,
            })
            .collect();

        if let Some(limit) = top {
            products.sort_by(|a, b| {
                b.product
                    .metrics
                    .total_sales_revenue
                    .total_cmp(&a.product.metrics.total_sales_revenue)
            });
            products.truncate(limit);
        }

        Self {
            header: result.header,
            rows: result.row_count(),
            product_count: result.products.len(),
            total: result.total,
            metrics: engine.grand_total(result),
            products,
        }
    }
}

/// Format a money amount with space-grouped thousands and two decimals
pub fn format_money(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && rounded.chars().any(|c| c != '0' && c != '.');
    format!("{}{},{}", if negative { "-" } else { "" }, grouped, fraction)
}

fn money(value: f64) -> ColoredString {
    let text = format_money(value);
    if value < 0.0 {
        text.as_str().bright_red()
    } else {
        text.as_str().bright_white()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Print the dashboard and product table to stdout
pub fn print_table(report: &Report) {
    let total = &report.total;
    let m = &report.metrics;

    println!("{}", "Unit Economics Summary".bright_green().bold());
    println!(
        "  {} {} rows, {} products (header at line {}{})",
        "Report:".bright_cyan(),
        report.rows,
        report.product_count,
        report.header.line_index,
        if report.header.detected { "" } else { ", fallback" }
    );

    println!("\n{}", "Revenue".bright_yellow());
    println!("  {:<28} {:>16}", "Revenue", money(total.revenue));
    println!("  {:<28} {:>16}", "Discount points", money(total.discount_points));
    println!("  {:<28} {:>16}", "Partner programs", money(total.partner_programs));
    println!("  {:<28} {:>16}", "Total sales revenue".bold(), money(m.total_sales_revenue));

    println!("\n{}", "Costs".bright_yellow());
    println!("  {:<28} {:>16}", "Marketplace commission", money(total.marketplace_commission));
    println!("  {:<28} {:>16}", "Logistics", money(total.logistics_cost));
    println!("  {:<28} {:>16}", "Acquiring", money(total.acquiring_cost));
    println!("  {:<28} {:>16}", "Returns", money(total.returns_cost));
    println!("  {:<28} {:>16}", "Additional services", money(total.additional_services_cost));
    println!("  {:<28} {:>16}", "Promotion and subscription", money(m.final_promotion_cost));
    println!("  {:<28} {:>16}", "Cross-docking", money(m.cross_docking));
    println!("  {:<28} {:>16}", "Cost of goods sold", money(total.cogs));
    println!("  {:<28} {:>16}", "Costs excluding COGS", money(m.costs_excluding_cogs));
    println!("  {:<28} {:>16}", "Total costs".bold(), money(m.total_costs_pre_tax));

    println!("\n{}", "Profit".bright_yellow());
    println!("  {:<28} {:>16}", "Profit before tax", money(m.profit_pre_tax));
    println!("  {:<28} {:>16}", "Income tax", money(m.income_tax));
    println!("  {:<28} {:>16}", "Net profit".bold(), money(m.profit));
    println!("  {:<28} {:>15.2}%", "Margin", m.margin);
    println!("  {:<28} {:>16}", "Average price", money(m.avg_price));
    if let Some(payout) = m.payout_to_factory {
        println!("  {:<28} {:>16}", "Payout to factory", money(payout));
    }
    println!(
        "  {:<28} {:>16}",
        "Units delivered / returned",
        format!("{} / {}", total.delivered_items, total.returned_items)
    );

    if report.products.is_empty() {
        return;
    }

    println!("\n{}", "Products".bright_yellow());
    println!(
        "  {:<14} {:<28} {:>14} {:>14} {:>14} {:>9} {:>12}",
        "SKU".bold(),
        "Name".bold(),
        "Sales".bold(),
        "Costs".bold(),
        "Profit".bold(),
        "Margin".bold(),
        "Avg price".bold()
    );
    for row in &report.products {
        let pm = &row.product.metrics;
        println!(
            "  {:<14} {:<28} {:>14} {:>14} {:>14} {:>8.2}% {:>12}",
            truncate(row.product.key.as_str(), 14).as_str().bright_cyan(),
            truncate(&row.product.name, 28),
            money(pm.total_sales_revenue),
            money(pm.total_costs_pre_tax),
            money(pm.profit),
            pm.margin,
            money(pm.avg_price)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusinessRules;
    use crate::models::{ProductKey, ProductLedger};

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0,00");
        assert_eq!(format_money(1234.5), "1 234,50");
        assert_eq!(format_money(-24990.0), "-24 990,00");
        assert_eq!(format_money(1_000_000.0), "1 000 000,00");
        assert_eq!(format_money(-0.001), "0,00");
        assert_eq!(format_money(999.999), "1 000,00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Кружка", 10), "Кружка");
        assert_eq!(truncate("Кружка керамическая", 7), "Кружка…");
    }

    fn product(key: &str, revenue: f64) -> ProductLedger {
        ProductLedger {
            key: ProductKey::from_candidates([key]),
            name: key.to_lowercase(),
            ledger: Ledger {
                revenue,
                rows: 1,
                ..Ledger::default()
            },
        }
    }

    #[test]
    fn test_top_keeps_largest_products() {
        let products = vec![product("A", 100.0), product("B", 300.0), product("C", 200.0)];
        let total = Ledger {
            revenue: 600.0,
            rows: 3,
            ..Ledger::default()
        };
        let result = AnalysisResult {
            total,
            products,
            header: HeaderLocation {
                line_index: 0,
                detected: true,
            },
        };
        let engine = MetricsEngine::new(BusinessRules::default(), false);

        let report = Report::build(&result, &engine, Some(2));
        let keys: Vec<&str> = report
            .products
            .iter()
            .map(|row| row.product.key.as_str())
            .collect();
        assert_eq!(keys, vec!["B", "C"]);
        assert_eq!(report.product_count, 3);

        let all = Report::build(&result, &engine, None);
        assert_eq!(all.products[0].product.key.as_str(), "A");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let result = AnalysisResult {
            total: Ledger::default(),
            products: vec![product("A", 10.0)],
            header: HeaderLocation {
                line_index: 5,
                detected: true,
            },
        };
        let report = Report::build(&result, &MetricsEngine::default(), None);

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["header"]["line_index"], 5);
        assert_eq!(json["products"][0]["key"], "A");
        assert!(json["products"][0]["metrics"].get("payout_to_factory").is_none());
        assert!(json["metrics"].get("payout_to_factory").is_some());
    }
}
