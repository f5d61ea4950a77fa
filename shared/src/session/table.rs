//! Table binding - which physical table this browsing session sits at

use serde::{Deserialize, Serialize};

/// Optional table id; never holds an empty string
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub struct TableBinding(Option<String>);

impl From<Option<String>> for TableBinding {
    fn from(table_id: Option<String>) -> Self {
        Self::new(table_id)
    }
}

impl From<TableBinding> for Option<String> {
    fn from(binding: TableBinding) -> Self {
        binding.0
    }
}

impl TableBinding {
    pub fn new(table_id: Option<String>) -> Self {
        let mut binding = Self::default();
        binding.set(table_id);
        binding
    }

    /// Bind or clear; blank ids clear the binding
    pub fn set(&mut self, table_id: Option<String>) {
        self.0 = table_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.0.is_some()
    }

    /// Read the `table` parameter of a QR link query string (`table=12&lang=en`)
    pub fn from_query(query: &str) -> Self {
        let table = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "table")
            .map(|(_, value)| value.replace('+', " "));
        Self::new(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut binding = TableBinding::default();
        assert!(!binding.is_bound());

        binding.set(Some("12".to_string()));
        assert_eq!(binding.get(), Some("12"));

        binding.set(Some("   ".to_string()));
        assert_eq!(binding.get(), None);

        binding.set(Some("7".to_string()));
        binding.set(None);
        assert!(!binding.is_bound());
    }

    #[test]
    fn test_from_query() {
        assert_eq!(TableBinding::from_query("table=12").get(), Some("12"));
        assert_eq!(TableBinding::from_query("?lang=en&table=A4").get(), Some("A4"));
        assert_eq!(TableBinding::from_query("lang=en").get(), None);
        assert_eq!(TableBinding::from_query("table=").get(), None);
    }

    #[test]
    fn test_serializes_as_plain_option() {
        let json = serde_json::to_string(&TableBinding::new(Some("12".to_string()))).unwrap();
        assert_eq!(json, "\"12\"");
        let back: TableBinding = serde_json::from_str("null").unwrap();
        assert!(!back.is_bound());
        let blank: TableBinding = serde_json::from_str("\"\"").unwrap();
        assert!(!blank.is_bound());
    }
}
