//! # Menu Repository
//!
//! Read access to the menu catalog, plus the inserts the seed tool needs.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bistro_core::menu;
use bistro_core::{MenuItem, Money};

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    name: String,
    description: Option<String>,
    price_cents: i64,
    image_url: Option<String>,
    category: String,
    is_available: bool,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            image_url: row.image_url,
            category: row.category,
            is_available: row.is_available,
        }
    }
}

/// Repository for menu database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Lists available items in menu order: category sequence, then name.
    pub async fn list_available(&self) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, image_url, category, is_available
            FROM menu_items
            WHERE is_available = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items: Vec<MenuItem> = rows.into_iter().map(MenuItem::from).collect();
        menu::sort_items(&mut items);

        debug!(count = items.len(), "Loaded available menu items");
        Ok(items)
    }

    /// Inserts a menu item with its given id.
    pub async fn insert(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = item.id, name = %item.name, "Inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, description, price_cents, image_url, category, is_available
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price.cents())
        .bind(&item.image_url)
        .bind(&item.category)
        .bind(item.is_available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the number of menu items (available or not).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn item(id: i64, name: &str, category: &str, is_available: bool) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: Some(format!("{name}, made fresh")),
            price: Money::from_cents(500 + id),
            image_url: None,
            category: category.to_string(),
            is_available,
        }
    }

    #[tokio::test]
    async fn test_list_available_in_menu_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let menu = db.menu();

        for item in [
            item(1, "Tiramisu", "desserts", true),
            item(2, "Steak", "mains", true),
            item(3, "Bruschetta", "appetizers", true),
            item(4, "Carbonara", "mains", true),
            item(5, "Lemonade", "drinks", true),
            item(6, "Soup of Yesterday", "appetizers", false),
        ] {
            menu.insert(&item).await.unwrap();
        }

        let names: Vec<String> = menu
            .list_available()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();

        assert_eq!(
            names,
            vec!["Lemonade", "Bruschetta", "Carbonara", "Steak", "Tiramisu"]
        );
        assert_eq!(menu.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_list_available_roundtrips_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut original = item(7, "Gelato", "desserts", true);
        original.image_url = Some("/img/gelato.jpg".to_string());
        db.menu().insert(&original).await.unwrap();

        assert_eq!(db.menu().list_available().await.unwrap(), vec![original]);
    }
}
