// src/fmp/models.rs
#![allow(dead_code)] // wire fields kept for completeness
use serde::{Deserialize, Serialize};

/// One entry of the FMP SEC filings listing
/// Example: https://financialmodelingprep.com/api/v3/sec_filings/AAPL?type=10-k&page=0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingRecord {
    #[serde(default)]
    pub symbol: String,
    /// FMP spells it this way, e.g. "2023-11-03 00:00:00"
    #[serde(rename = "fillingDate")]
    pub filling_date: String,
    #[serde(default)]
    pub accepted_date: Option<String>,
    #[serde(default)]
    pub cik: Option<String>,
    #[serde(rename = "type", default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// URL of the filing document itself
    pub final_link: String,
}

impl FilingRecord {
    /// Year component of the filing date ("2023" for "2023-11-03 00:00:00").
    pub fn filing_year(&self) -> &str {
        self.filling_date.split('-').next().unwrap_or_default()
    }
}

/// Annual balance sheet statement as returned by
/// https://financialmodelingprep.com/api/v3/balance-sheet-statement/AAPL?period=annual
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetStatement {
    pub date: String,
    pub symbol: String,
    pub reported_currency: Option<String>,
    pub calendar_year: Option<String>,
    pub period: Option<String>,

    pub cash_and_cash_equivalents: Option<f64>,
    pub short_term_investments: Option<f64>,
    pub net_receivables: Option<f64>,
    pub inventory: Option<f64>,
    pub total_current_assets: Option<f64>,
    pub property_plant_equipment_net: Option<f64>,
    pub goodwill: Option<f64>,
    pub intangible_assets: Option<f64>,
    pub long_term_investments: Option<f64>,
    pub total_non_current_assets: Option<f64>,
    pub total_assets: Option<f64>,

    pub account_payables: Option<f64>,
    pub short_term_debt: Option<f64>,
    pub deferred_revenue: Option<f64>,
    pub total_current_liabilities: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub total_non_current_liabilities: Option<f64>,
    pub total_liabilities: Option<f64>,

    pub common_stock: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub total_stockholders_equity: Option<f64>,
    pub total_liabilities_and_stockholders_equity: Option<f64>,

    pub total_debt: Option<f64>,
    pub net_debt: Option<f64>,
}

/// Number of line items reported per statement.
pub const LINE_ITEM_COUNT: usize = 24;

impl BalanceSheetStatement {
    /// Display label and value of every line item, in balance sheet order.
    pub fn line_items(&self) -> [(&'static str, Option<f64>); LINE_ITEM_COUNT] {
        [
            ("Cash And Cash Equivalents", self.cash_and_cash_equivalents),
            ("Short Term Investments", self.short_term_investments),
            ("Net Receivables", self.net_receivables),
            ("Inventory", self.inventory),
            ("Total Current Assets", self.total_current_assets),
            ("Property Plant Equipment Net", self.property_plant_equipment_net),
            ("Goodwill", self.goodwill),
            ("Intangible Assets", self.intangible_assets),
            ("Long Term Investments", self.long_term_investments),
            ("Total Non Current Assets", self.total_non_current_assets),
            ("Total Assets", self.total_assets),
            ("Account Payables", self.account_payables),
            ("Short Term Debt", self.short_term_debt),
            ("Deferred Revenue", self.deferred_revenue),
            ("Total Current Liabilities", self.total_current_liabilities),
            ("Long Term Debt", self.long_term_debt),
            ("Total Non Current Liabilities", self.total_non_current_liabilities),
            ("Total Liabilities", self.total_liabilities),
            ("Common Stock", self.common_stock),
            ("Retained Earnings", self.retained_earnings),
            ("Total Stockholders Equity", self.total_stockholders_equity),
            ("Total Liabilities And Stockholders Equity", self.total_liabilities_and_stockholders_equity),
            ("Total Debt", self.total_debt),
            ("Net Debt", self.net_debt),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filing_record_deserializes_fmp_shape() {
        let json = r#"[{
            "symbol": "AAPL",
            "fillingDate": "2023-11-03 00:00:00",
            "acceptedDate": "2023-11-02 18:08:27",
            "cik": "0000320193",
            "type": "10-K",
            "link": "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106-index.htm",
            "finalLink": "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm"
        }]"#;
        let records: Vec<FilingRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].form_type.as_deref(), Some("10-K"));
        assert_eq!(records[0].filing_year(), "2023");
        assert!(records[0].final_link.ends_with("aapl-20230930.htm"));
    }

    #[test]
    fn test_balance_sheet_statement_tolerates_missing_fields() {
        let json = r#"{"date": "2023-09-30", "symbol": "AAPL", "totalAssets": 352583000000, "totalLiabilities": 290437000000}"#;
        let statement: BalanceSheetStatement = serde_json::from_str(json).unwrap();
        assert_eq!(statement.total_assets, Some(352583000000.0));
        assert_eq!(statement.goodwill, None);
    }
}
