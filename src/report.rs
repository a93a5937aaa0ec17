//! Report pipeline: read, locate header, parse table, aggregate.
//!
//! Reading the file is the only asynchronous step. Once the text is in
//! memory, header location, CSV parsing and aggregation run synchronously in
//! a single pass.

use crate::aggregator::aggregate;
use crate::config::ReportConfig;
use crate::decoder::RawRow;
use crate::error::{ReportError, Result};
use crate::header::{locate_header, sniff_delimiter, table_text};
use crate::models::AnalysisResult;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

/// Analyse a report file
pub async fn parse_report(path: &Path, config: &ReportConfig) -> Result<AnalysisResult> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ReportError::read_failure(path, source))?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    analyse_bytes(&bytes, &path.display().to_string(), config)
}

/// Analyse a report from any async byte source
///
/// `name` identifies the source in errors and logs.
pub async fn parse_report_from_reader<R>(
    mut reader: R,
    name: &str,
    config: &ReportConfig,
) -> Result<AnalysisResult>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|source| ReportError::read_failure(name, source))?;

    analyse_bytes(&bytes, name, config)
}

fn analyse_bytes(bytes: &[u8], name: &str, config: &ReportConfig) -> Result<AnalysisResult> {
    let text = String::from_utf8_lossy(bytes);
    if is_blank(&text) {
        return Err(ReportError::empty_input(name));
    }
    parse_report_text(&text, config)
}

/// Analyse report text that is already in memory
pub fn parse_report_text(text: &str, config: &ReportConfig) -> Result<AnalysisResult> {
    if is_blank(text) {
        return Err(ReportError::empty_input("<text>"));
    }
    let text = text.trim_start_matches('\u{feff}');

    let header = locate_header(
        text,
        &config.columns.header_markers(),
        config.header_scan_lines,
        config.fallback_header_index,
    );

    let table = table_text(text, header.line_index);
    let header_line = table.lines().next().unwrap_or_default();
    let delimiter = sniff_delimiter(header_line);
    debug!("Using delimiter {:?}", delimiter as char);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(table.as_bytes());

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        match record {
            Ok(record) => rows.push(RawRow::from_record(&headers, &record)),
            Err(e) => {
                warn!("Skipping malformed CSV record: {}", e);
                skipped += 1;
            }
        }
    }

    info!(
        "Parsed {} rows ({} skipped), header at line {}{}",
        rows.len(),
        skipped,
        header.line_index,
        if header.detected { "" } else { " (fallback)" }
    );

    let result = aggregate(&rows, &config.columns, header);
    debug!("Aggregated {} products", result.products.len());
    Ok(result)
}

/// Only text with no characters besides a BOM counts as empty
fn is_blank(text: &str) -> bool {
    text.trim_start_matches('\u{feff}').is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusinessRules;
    use crate::metrics::MetricsEngine;
    use crate::models::Ledger;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "SKU,Название товара,Выручка,Баллы за скидки,Программы партнёров,\
Вознаграждение Ozon,Эквайринг,Обработка отправления,Логистика,Доставка до места выдачи,\
Стоимость размещения,Обработка возврата,Обратная логистика,Утилизация,Обработка ошибок продавца,\
Оплата за клик,Оплата за заказ,Звёздные товары,Платный бренд,Себестоимость,\
Заказано товаров,Доставлено товаров,Возвращено товаров";

    fn scenario_report() -> String {
        [
            "Юнит-экономика товаров",
            "Период: 01.09.2025 - 30.09.2025",
            "Продавец: ООО Ромашка",
            "Валюта: RUB",
            "",
            HEADER,
            "111,Кружка,1000,50,0,-150,-20,0,0,0,0,0,0,0,0,0,0,0,0,40,5,5,0",
        ]
        .join("\n")
    }

    #[test]
    fn test_end_to_end_single_product() {
        let result = parse_report_text(&scenario_report(), &ReportConfig::default()).unwrap();

        assert_eq!(result.header.line_index, 5);
        assert!(result.header.detected);
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.total.cogs, -200.0);

        let engine = MetricsEngine::new(BusinessRules::default(), false);
        let metrics = engine.grand_total(&result);

        assert_eq!(metrics.total_sales_revenue, 1050.0);
        assert!((metrics.cross_docking - -15.75).abs() < 1e-9);
        assert_eq!(metrics.subscription_allocation, -24_990.0);
        let expected_costs = -150.0 - 20.0 - 200.0 - 15.75 - 24_990.0;
        assert!((metrics.total_costs_pre_tax - expected_costs).abs() < 1e-6);
        assert!(metrics.profit_pre_tax < -20_000.0);
        assert_eq!(metrics.income_tax, 0.0);
        assert_eq!(metrics.profit, metrics.profit_pre_tax);
        assert!(metrics.margin < 0.0);
        assert_eq!(metrics.avg_price, 210.0);

        let product = &engine.products(&result)[0];
        assert_eq!(product.metrics.revenue_share, 1.0);
        assert_eq!(product.metrics.profit, metrics.profit);
    }

    #[test]
    fn test_semicolon_and_quoted_fields() {
        let text = "Отчёт\n\"SKU\";\"Название товара\";\"Выручка\";\"Баллы за скидки\"\r\n\
                    \"1\";\"Кружка; белая\";\"1 234,50\";\"10\"\r\n";

        let result = parse_report_text(text, &ReportConfig::default()).unwrap();

        assert_eq!(result.header.line_index, 1);
        let product = result.product("1").unwrap();
        assert_eq!(product.name, "Кружка; белая");
        assert_eq!(product.ledger.revenue, 1234.5);
        assert_eq!(product.ledger.discount_points, 10.0);
    }

    #[test]
    fn test_short_file_without_markers_degrades_to_zero() {
        let result = parse_report_text("a,b\n1,2", &ReportConfig::default()).unwrap();

        assert_eq!(result.header.line_index, 0);
        assert!(!result.header.detected);
        assert_eq!(result.total.revenue, 0.0);
        assert_eq!(result.products.len(), 1);
        assert!(result.products[0].key.is_unknown());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        for text in ["", "\u{feff}"] {
            let err = parse_report_text(text, &ReportConfig::default()).unwrap_err();
            assert!(matches!(err, ReportError::EmptyInput { .. }));
        }
    }

    #[test]
    fn test_whitespace_only_text_degrades_to_zero() {
        for text in ["\n", "\r\n\r\n", "\u{feff}\n\n"] {
            let result = parse_report_text(text, &ReportConfig::default()).unwrap();
            assert!(!result.header.detected);
            assert!(result.products.is_empty());
            assert_eq!(result.total, Ledger::default());
        }
    }

    #[test]
    fn test_reparse_is_identical() {
        let config = ReportConfig::default();
        let first = parse_report_text(&scenario_report(), &config).unwrap();
        let second = parse_report_text(&scenario_report(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_parse_report_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", scenario_report()).unwrap();

        let result = parse_report(file.path(), &ReportConfig::default())
            .await
            .unwrap();

        assert_eq!(result.row_count(), 1);
        assert_eq!(result.total.revenue, 1000.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let err = parse_report(Path::new("/no/such/report.csv"), &ReportConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn test_empty_file_is_empty_input() {
        let file = NamedTempFile::new().unwrap();

        let err = parse_report(file.path(), &ReportConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput { .. }));
    }

    #[tokio::test]
    async fn test_parse_from_reader() {
        let report = scenario_report();
        let result = parse_report_from_reader(report.as_bytes(), "upload", &ReportConfig::default())
            .await
            .unwrap();
        assert_eq!(result.products[0].name, "Кружка");
    }
}
