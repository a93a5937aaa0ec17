//! Configuration management and validation.
//!
//! Provides the business-rule constants used by the metrics engine, the
//! header-locator tuning and the report column names. Every field has a
//! default matching the Ozon unit-economics export, and any subset can be
//! overridden from a TOML file.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CROSS_DOCKING_RATE, FALLBACK_HEADER_INDEX,
    HEADER_SCAN_LINES, INCOME_TAX_RATE, SUBSCRIPTION_FEE, columns,
};
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Business-rule constants feeding the metrics derivation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRules {
    /// Flat subscription fee per reporting period, amortized by revenue share
    pub subscription_fee: f64,

    /// Cross-docking fee as a fraction of total sales revenue
    pub cross_docking_rate: f64,

    /// Income tax rate applied to positive pre-tax profit
    pub income_tax_rate: f64,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            subscription_fee: SUBSCRIPTION_FEE,
            cross_docking_rate: CROSS_DOCKING_RATE,
            income_tax_rate: INCOME_TAX_RATE,
        }
    }
}

/// Source column names of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportColumns {
    pub sku: String,
    pub article: String,
    pub product_name: String,

    pub revenue: String,
    pub discount_points: String,
    pub partner_programs: String,
    pub marketplace_commission: String,
    pub acquiring: String,

    pub shipment_processing: String,
    pub logistics: String,
    pub delivery_to_pickup_point: String,
    pub placement: String,

    pub return_processing: String,
    pub reverse_logistics: String,

    pub disposal: String,
    pub seller_error_processing: String,

    pub pay_per_click: String,
    pub pay_per_order: String,
    pub featured_listing: String,
    pub paid_brand: String,

    pub unit_cost: String,
    pub ordered_items: String,
    pub delivered_items: String,
    pub returned_items: String,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            sku: columns::SKU.to_string(),
            article: columns::ARTICLE.to_string(),
            product_name: columns::PRODUCT_NAME.to_string(),
            revenue: columns::REVENUE.to_string(),
            discount_points: columns::DISCOUNT_POINTS.to_string(),
            partner_programs: columns::PARTNER_PROGRAMS.to_string(),
            marketplace_commission: columns::MARKETPLACE_COMMISSION.to_string(),
            acquiring: columns::ACQUIRING.to_string(),
            shipment_processing: columns::SHIPMENT_PROCESSING.to_string(),
            logistics: columns::LOGISTICS.to_string(),
            delivery_to_pickup_point: columns::DELIVERY_TO_PICKUP_POINT.to_string(),
            placement: columns::PLACEMENT.to_string(),
            return_processing: columns::RETURN_PROCESSING.to_string(),
            reverse_logistics: columns::REVERSE_LOGISTICS.to_string(),
            disposal: columns::DISPOSAL.to_string(),
            seller_error_processing: columns::SELLER_ERROR_PROCESSING.to_string(),
            pay_per_click: columns::PAY_PER_CLICK.to_string(),
            pay_per_order: columns::PAY_PER_ORDER.to_string(),
            featured_listing: columns::FEATURED_LISTING.to_string(),
            paid_brand: columns::PAID_BRAND.to_string(),
            unit_cost: columns::UNIT_COST.to_string(),
            ordered_items: columns::ORDERED_ITEMS.to_string(),
            delivered_items: columns::DELIVERED_ITEMS.to_string(),
            returned_items: columns::RETURNED_ITEMS.to_string(),
        }
    }
}

impl ReportColumns {
    /// The two header substrings that identify the real table header
    pub fn header_markers(&self) -> [&str; 2] {
        [self.revenue.as_str(), self.discount_points.as_str()]
    }
}

/// Global configuration for report analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Business-rule constants
    pub rules: BusinessRules,

    /// Spread total ad spend across products by revenue share
    pub distribute_ads_evenly: bool,

    /// Number of leading lines searched for the header row
    pub header_scan_lines: usize,

    /// Header line index used when no marker line is found
    pub fallback_header_index: usize,

    /// Source column names
    pub columns: ReportColumns,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rules: BusinessRules::default(),
            distribute_ads_evenly: false,
            header_scan_lines: HEADER_SCAN_LINES,
            fallback_header_index: FALLBACK_HEADER_INDEX,
            columns: ReportColumns::default(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file, filling gaps with defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ReportError::read_failure(path, source))?;

        let config: ReportConfig =
            toml::from_str(&text).map_err(|source| ReportError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Location of the per-user configuration file, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the per-user configuration file, or defaults when there is none
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;

        if !rules.subscription_fee.is_finite() || rules.subscription_fee < 0.0 {
            return Err(ReportError::configuration(format!(
                "subscription_fee must be a non-negative number, got {}",
                rules.subscription_fee
            )));
        }

        for (name, rate) in [
            ("cross_docking_rate", rules.cross_docking_rate),
            ("income_tax_rate", rules.income_tax_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ReportError::configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }

        if self.header_scan_lines == 0 {
            return Err(ReportError::configuration(
                "header_scan_lines must be at least 1",
            ));
        }

        if self.columns.revenue.trim().is_empty() || self.columns.discount_points.trim().is_empty()
        {
            return Err(ReportError::configuration(
                "revenue and discount_points column names identify the header and cannot be empty",
            ));
        }

        Ok(())
    }

    /// Replace the business rules
    pub fn with_rules(mut self, rules: BusinessRules) -> Self {
        self.rules = rules;
        self
    }

    /// Enable or disable revenue-share distribution of ad spend
    pub fn with_distribute_ads_evenly(mut self, enabled: bool) -> Self {
        self.distribute_ads_evenly = enabled;
        self
    }

    /// Set the header scan window
    pub fn with_header_scan_lines(mut self, lines: usize) -> Self {
        self.header_scan_lines = lines;
        self
    }
}
