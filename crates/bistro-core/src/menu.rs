//! # Menu
//!
//! Category ordering and grouping for the menu page.
//!
//! Known categories come in a fixed sequence; anything else sorts ahead of
//! them, alphabetically by item name within its group.
//!
//! ```text
//!   rank 0: (unknown categories)
//!   rank 1: appetizers  → "Appetizers"
//!   rank 2: mains       → "Main Courses"
//!   rank 3: desserts    → "Desserts"
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::MenuItem;

/// Known categories in display order.
pub const CATEGORY_SEQUENCE: [&str; 3] = ["appetizers", "mains", "desserts"];

/// Sort rank for a category key. Unknown keys rank 0.
pub fn category_rank(category: &str) -> usize {
    CATEGORY_SEQUENCE
        .iter()
        .position(|known| *known == category)
        .map(|pos| pos + 1)
        .unwrap_or(0)
}

/// Display title for a category key.
///
/// ## Example
/// ```rust
/// use bistro_core::menu::category_title;
///
/// assert_eq!(category_title("mains"), "Main Courses");
/// assert_eq!(category_title("drinks"), "Drinks");
/// ```
pub fn category_title(category: &str) -> String {
    match category {
        "appetizers" => "Appetizers".to_string(),
        "mains" => "Main Courses".to_string(),
        "desserts" => "Desserts".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// A titled group of menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuCategory {
    pub key: String,
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// Sorts items by (category rank, name), the order the menu is shown in.
pub fn sort_items(items: &mut [MenuItem]) {
    items.sort_by(|a, b| {
        category_rank(&a.category)
            .cmp(&category_rank(&b.category))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Groups items by category, keeping the order in which each category
/// first appears.
pub fn group_by_category(items: Vec<MenuItem>) -> Vec<MenuCategory> {
    let mut groups: Vec<MenuCategory> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|g| g.key == item.category) {
            Some(group) => group.items.push(item),
            None => groups.push(MenuCategory {
                key: item.category.clone(),
                title: category_title(&item.category),
                items: vec![item],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn item(id: i64, name: &str, category: &str) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: None,
            price: Money::from_cents(500),
            image_url: None,
            category: category.to_string(),
            is_available: true,
        }
    }

    #[test]
    fn test_category_rank() {
        assert_eq!(category_rank("drinks"), 0);
        assert_eq!(category_rank("appetizers"), 1);
        assert_eq!(category_rank("mains"), 2);
        assert_eq!(category_rank("desserts"), 3);
    }

    #[test]
    fn test_sort_then_group() {
        let mut items = vec![
            item(1, "Tiramisu", "desserts"),
            item(2, "Steak", "mains"),
            item(3, "Bruschetta", "appetizers"),
            item(4, "Lemonade", "drinks"),
            item(5, "Carbonara", "mains"),
        ];
        sort_items(&mut items);
        let groups = group_by_category(items);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["drinks", "appetizers", "mains", "desserts"]);

        let mains: Vec<&str> = groups[2].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(mains, vec!["Carbonara", "Steak"]);
        assert_eq!(groups[2].title, "Main Courses");
        assert_eq!(groups[0].title, "Drinks");
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_category(Vec::new()).is_empty());
    }
}
