//! Output formatting utilities

use serde::Serialize;

/// Result of `verify-ledger`.
#[derive(Debug, Serialize)]
pub struct LedgerSummary {
    pub path: String,
    pub transactions: usize,
    pub head: Option<String>,
    pub verified: bool,
}

/// Print a single item as pretty JSON on stdout
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes() {
        let summary = LedgerSummary {
            path: "state.json".to_string(),
            transactions: 0,
            head: None,
            verified: true,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["transactions"], 0);
        assert!(value["head"].is_null());
    }
}
