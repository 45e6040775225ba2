//! Rule identifiers and display-name placeholders.

/// Label shown when the gateway did not say which rule fired.
pub const UNSPECIFIED_RULE_LABEL: &str = "Security Policy";

/// Placeholder display name for a rule whose real name is unknown.
pub fn placeholder_name(rule_id: &str) -> String {
    format!("Rule {}", rule_id)
}

/// Trimmed, non-empty rule id, or `None`.
pub fn normalize_rule_id(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder_name("abc-123"), "Rule abc-123");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_rule_id(None), None);
        assert_eq!(normalize_rule_id(Some("")), None);
        assert_eq!(normalize_rule_id(Some("   ")), None);
        assert_eq!(normalize_rule_id(Some(" r1 ")), Some("r1"));
    }
}
