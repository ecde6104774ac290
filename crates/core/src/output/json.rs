//! JSON output formatter

use crate::models::DocumentOutline;
use crate::output::FormatError;

/// Format outline data as pretty-printed JSON
pub fn format_json(data: &DocumentOutline) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::create_test_data;

    #[test]
    fn test_format_json() {
        let json = format_json(&create_test_data()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["books"][0]["name"], "창세기");
        assert_eq!(value["books"][0]["verses_per_chapter"]["2"], 25);
        assert_eq!(value["stats"]["verses"], 56);
        assert_eq!(value["diagnostics"][0]["kind"], "missing_book");
    }
}
