//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu catalog entry, as supplied by the catalog collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Unit price in rupees
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// By-value snapshot of a menu item taken when it enters the cart
///
/// Later catalog edits never reach a snapshot that already exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemRef {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MenuItemRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            note: None,
        }
    }
}

impl From<&MenuItem> for MenuItemRef {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_decoupled_from_catalog() {
        let mut item = MenuItem {
            id: "naan".to_string(),
            name: "Butter Naan".to_string(),
            price: 40.0,
            description: String::new(),
            image: String::new(),
            tags: vec!["bread".to_string()],
            available: true,
        };
        let snapshot = MenuItemRef::from(&item);

        item.price = 55.0;
        item.name = "Garlic Naan".to_string();

        assert_eq!(snapshot.price, 40.0);
        assert_eq!(snapshot.name, "Butter Naan");
    }

    #[test]
    fn test_catalog_defaults() {
        let json = r#"{"id":"m1","name":"Lassi","price":80.0}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.available);
        assert!(item.tags.is_empty());
    }
}
