//! Derived financial metrics for a ledger.
//!
//! The same derivation runs for the grand total and for each product. Shared
//! costs (subscription fee and, optionally, ad spend) are allocated by the
//! product's share of grand-total sales revenue.
//!
//! Order of derivation:
//! 1. total sales revenue and revenue share
//! 2. cross-docking fee and subscription allocation
//! 3. ad spend (direct or redistributed) and final promotion cost
//! 4. pre-tax costs and profit
//! 5. income tax, profit, margin and average price

use crate::config::BusinessRules;
use crate::models::{AnalysisResult, Ledger, ProductKey, ProductLedger};
use serde::Serialize;

/// Grand-total figures needed for share-based allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationContext {
    pub grand_total_sales_revenue: f64,
    pub grand_total_promotion_cost: f64,
    pub distribute_ads_evenly: bool,
}

impl AllocationContext {
    pub fn from_total(total: &Ledger, distribute_ads_evenly: bool) -> Self {
        Self {
            grand_total_sales_revenue: total.total_sales_revenue(),
            grand_total_promotion_cost: total.promotion_cost,
            distribute_ads_evenly,
        }
    }
}

/// Metrics derived from one ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub total_sales_revenue: f64,
    pub revenue_share: f64,
    pub cross_docking: f64,
    pub subscription_allocation: f64,
    pub ad_spend: f64,
    pub final_promotion_cost: f64,
    pub total_costs_pre_tax: f64,
    pub costs_excluding_cogs: f64,
    pub profit_pre_tax: f64,
    pub income_tax: f64,
    pub profit: f64,
    /// Profit as a percentage of total sales revenue
    pub margin: f64,
    pub avg_price: f64,
    /// Only set for the grand-total view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_to_factory: Option<f64>,
}

/// Derive metrics for a ledger
///
/// Pure function of its inputs. `include_payout` adds the factory payout,
/// which only makes sense for the grand total.
pub fn derive_metrics(
    ledger: &Ledger,
    context: &AllocationContext,
    rules: &BusinessRules,
    include_payout: bool,
) -> Metrics {
    let total_sales_revenue = ledger.total_sales_revenue();

    let revenue_share = if context.grand_total_sales_revenue != 0.0 {
        total_sales_revenue / context.grand_total_sales_revenue
    } else {
        0.0
    };

    let cross_docking = -(total_sales_revenue * rules.cross_docking_rate);
    let subscription_allocation = -(rules.subscription_fee * revenue_share);

    let ad_spend = if context.distribute_ads_evenly {
        -(context.grand_total_promotion_cost.abs() * revenue_share)
    } else {
        ledger.promotion_cost
    };
    let final_promotion_cost = ad_spend + subscription_allocation;

    let total_costs_pre_tax = ledger.marketplace_commission
        + ledger.logistics_cost
        + ledger.acquiring_cost
        + ledger.returns_cost
        + ledger.additional_services_cost
        + ledger.cogs
        + final_promotion_cost
        + cross_docking;
    let costs_excluding_cogs = total_costs_pre_tax - ledger.cogs;

    let profit_pre_tax = total_sales_revenue + total_costs_pre_tax;

    // Losses never produce a tax rebate
    let income_tax = if profit_pre_tax > 0.0 {
        -(profit_pre_tax * rules.income_tax_rate)
    } else {
        0.0
    };
    let profit = profit_pre_tax + income_tax;

    let margin = if total_sales_revenue != 0.0 {
        profit / total_sales_revenue * 100.0
    } else {
        0.0
    };

    let avg_price = if ledger.delivered_items > 0.0 {
        total_sales_revenue / ledger.delivered_items
    } else {
        0.0
    };

    let payout_to_factory = include_payout.then(|| total_sales_revenue + costs_excluding_cogs);

    Metrics {
        total_sales_revenue,
        revenue_share,
        cross_docking,
        subscription_allocation,
        ad_spend,
        final_promotion_cost,
        total_costs_pre_tax,
        costs_excluding_cogs,
        profit_pre_tax,
        income_tax,
        profit,
        margin,
        avg_price,
        payout_to_factory,
    }
}

/// Metrics for one product, alongside its identity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetrics {
    pub key: ProductKey,
    pub name: String,
    pub metrics: Metrics,
}

/// Runs the derivation against an analysis result
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    rules: BusinessRules,
    distribute_ads_evenly: bool,
}

impl MetricsEngine {
    pub fn new(rules: BusinessRules, distribute_ads_evenly: bool) -> Self {
        Self {
            rules,
            distribute_ads_evenly,
        }
    }

    fn context(&self, result: &AnalysisResult) -> AllocationContext {
        AllocationContext::from_total(&result.total, self.distribute_ads_evenly)
    }

    /// Dashboard metrics for the whole report
    pub fn grand_total(&self, result: &AnalysisResult) -> Metrics {
        derive_metrics(&result.total, &self.context(result), &self.rules, true)
    }

    /// Metrics for a single product of the report
    pub fn product(&self, result: &AnalysisResult, product: &ProductLedger) -> ProductMetrics {
        ProductMetrics {
            key: product.key.clone(),
            name: product.name.clone(),
            metrics: derive_metrics(&product.ledger, &self.context(result), &self.rules, false),
        }
    }

    /// Metrics for every product, in report order
    pub fn products(&self, result: &AnalysisResult) -> Vec<ProductMetrics> {
        result
            .products
            .iter()
            .map(|product| self.product(result, product))
            .collect()
    }
}
