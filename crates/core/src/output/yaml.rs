//! YAML output formatter

use crate::models::DocumentOutline;
use crate::output::FormatError;

/// Format outline data as YAML
pub fn format_yaml(data: &DocumentOutline) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}
