//! Data models shared with the catalog collaborator

pub mod menu_item;

pub use menu_item::{MenuItem, MenuItemRef};
