//! Application constants for the unit-economics analyzer
//!
//! This module contains the business-rule defaults, header-locator tuning
//! and the column names of the Ozon unit-economics export.

// =============================================================================
// Business Rules
// =============================================================================

/// Flat platform subscription fee per reporting period (RUB)
pub const SUBSCRIPTION_FEE: f64 = 24_990.0;

/// Modeled cross-docking fee as a share of total sales revenue
pub const CROSS_DOCKING_RATE: f64 = 0.015;

/// Income tax rate applied to positive pre-tax profit
pub const INCOME_TAX_RATE: f64 = 0.25;

// =============================================================================
// Header Location
// =============================================================================

/// Number of leading lines searched for the table header
pub const HEADER_SCAN_LINES: usize = 20;

/// Header line index assumed when no marker line is found
pub const FALLBACK_HEADER_INDEX: usize = 3;

/// Product key used for rows without any identifier
pub const UNKNOWN_PRODUCT_KEY: &str = "Unknown";

/// Default configuration file name inside the user config directory
pub const CONFIG_DIR_NAME: &str = "unit-economics";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Column Name Constants
// =============================================================================

/// Column names of the Ozon unit-economics report (Russian locale)
pub mod columns {
    // Product identity
    pub const SKU: &str = "SKU";
    pub const ARTICLE: &str = "Артикул";
    pub const PRODUCT_NAME: &str = "Название товара";

    // Revenue composition
    pub const REVENUE: &str = "Выручка";
    pub const DISCOUNT_POINTS: &str = "Баллы за скидки";
    pub const PARTNER_PROGRAMS: &str = "Программы партнёров";

    // Marketplace fees
    pub const MARKETPLACE_COMMISSION: &str = "Вознаграждение Ozon";
    pub const ACQUIRING: &str = "Эквайринг";

    // Logistics
    pub const SHIPMENT_PROCESSING: &str = "Обработка отправления";
    pub const LOGISTICS: &str = "Логистика";
    pub const DELIVERY_TO_PICKUP_POINT: &str = "Доставка до места выдачи";
    pub const PLACEMENT: &str = "Стоимость размещения";

    // Returns
    pub const RETURN_PROCESSING: &str = "Обработка возврата";
    pub const REVERSE_LOGISTICS: &str = "Обратная логистика";

    // Additional services
    pub const DISPOSAL: &str = "Утилизация";
    pub const SELLER_ERROR_PROCESSING: &str = "Обработка ошибок продавца";

    // Promotion
    pub const PAY_PER_CLICK: &str = "Оплата за клик";
    pub const PAY_PER_ORDER: &str = "Оплата за заказ";
    pub const FEATURED_LISTING: &str = "Звёздные товары";
    pub const PAID_BRAND: &str = "Платный бренд";

    // Units and cost of goods
    pub const UNIT_COST: &str = "Себестоимость";
    pub const ORDERED_ITEMS: &str = "Заказано товаров";
    pub const DELIVERED_ITEMS: &str = "Доставлено товаров";
    pub const RETURNED_ITEMS: &str = "Возвращено товаров";
}
