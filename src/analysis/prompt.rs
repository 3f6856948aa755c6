// src/analysis/prompt.rs
use crate::analysis::balance_sheet::BalanceSheet;

/// Fixed analysis checklist appended to every prompt.
pub const BALANCE_SHEET_INSTRUCTION: &str = "
Analyze the following balance sheet data and 10-K report section:
1. Evaluate the company's financial stability by analyzing assets, liabilities, and equity structure
2. Assess liquidity through current assets vs. current liabilities
3. Examine solvency via long-term debt ratios
4. Compare with previous years to identify trends
5. Provide a strategic assessment of financial leverage and capital structure

Provide a comprehensive analysis in a well-structured response.
";

/// Joins table, resource and instruction, in that order.
/// An absent or empty table drops the leading table block.
pub fn combine_prompt(instruction: &str, resource: &str, table: Option<&str>) -> String {
    match table {
        Some(table) if !table.is_empty() => {
            format!("{}\n\nResource: {}\n\nInstruction: {}", table, resource, instruction)
        }
        _ => format!("Resource: {}\n\nInstruction: {}", resource, instruction),
    }
}

/// Labelled table text as it appears at the top of the prompt.
pub fn balance_sheet_block(sheet: &BalanceSheet) -> String {
    format!("Balance sheet:\n{}", sheet.to_string().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::balance_sheet::tests::sample_sheet;

    #[test]
    fn test_table_comes_first() {
        let prompt = combine_prompt("Do it", "Risk factors text", Some("Balance sheet:\nTotal Assets  100\nTotal Liabilities  40"));
        assert_eq!(
            prompt,
            "Balance sheet:\nTotal Assets  100\nTotal Liabilities  40\n\nResource: Risk factors text\n\nInstruction: Do it"
        );
        // deterministic
        assert_eq!(prompt, combine_prompt("Do it", "Risk factors text", Some("Balance sheet:\nTotal Assets  100\nTotal Liabilities  40")));
    }

    #[test]
    fn test_without_table() {
        assert_eq!(combine_prompt("Do it", "text", None), "Resource: text\n\nInstruction: Do it");
        assert_eq!(combine_prompt("Do it", "text", Some("")), "Resource: text\n\nInstruction: Do it");
    }

    #[test]
    fn test_instruction_is_five_point_checklist() {
        assert!(BALANCE_SHEET_INSTRUCTION.starts_with("\nAnalyze the following"));
        assert!(BALANCE_SHEET_INSTRUCTION.ends_with("well-structured response.\n"));
        for n in 1..=5 {
            assert!(BALANCE_SHEET_INSTRUCTION.contains(&format!("\n{}. ", n)));
        }
    }

    #[test]
    fn test_balance_sheet_block_trims_table() {
        let block = balance_sheet_block(&sample_sheet());
        assert!(block.starts_with("Balance sheet:\n2023-09-30  2022-09-30\nTotal Assets"));
        assert!(block.ends_with("NaN"));
    }
}
