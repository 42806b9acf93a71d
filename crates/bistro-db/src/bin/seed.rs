//! # Seed Data Generator
//!
//! Populates the database with a starter menu and restaurant settings for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bistro_dev.db
//! cargo run -p bistro-db --bin seed
//!
//! # Specify database path and restaurant name
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro.db --name "Trattoria Roma"
//! ```

use std::env;

use bistro_core::{MenuItem, Money, RestaurantConfig};
use bistro_db::{Database, DbConfig};

/// Starter menu: (category, name, description, price in cents)
const MENU: &[(&str, &str, &str, i64)] = &[
    ("appetizers", "Bruschetta", "Grilled bread, tomato, basil, garlic", 795),
    ("appetizers", "Calamari Fritti", "Crispy squid with lemon aioli", 1150),
    ("appetizers", "Garden Salad", "Mixed greens, cherry tomato, balsamic", 695),
    ("mains", "Margherita Pizza", "San Marzano tomato, mozzarella, basil", 1000),
    ("mains", "Spaghetti Carbonara", "Guanciale, pecorino, egg yolk", 1495),
    ("mains", "Grilled Salmon", "Lemon butter, seasonal vegetables", 1895),
    ("mains", "Ribeye Steak", "12oz, rosemary potatoes", 2695),
    ("desserts", "Tiramisu", "Espresso, mascarpone, cocoa", 650),
    ("desserts", "Panna Cotta", "Vanilla bean, berry compote", 595),
    ("drinks", "Fresh Lemonade", "Squeezed to order", 395),
];

/// Inserts `menu` with ids 1.. and returns how many rows were stored.
/// Failed rows are reported and skipped.
async fn seed_menu(db: &Database, menu: &[(&str, &str, &str, i64)]) -> usize {
    let mut inserted = 0;
    for (idx, (category, name, description, price_cents)) in menu.iter().enumerate() {
        let item = MenuItem {
            id: idx as i64 + 1,
            name: name.to_string(),
            description: Some(description.to_string()),
            price: Money::from_cents(*price_cents),
            image_url: None,
            category: category.to_string(),
            is_available: true,
        };

        match db.menu().insert(&item).await {
            Ok(()) => inserted += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", item.name, e),
        }
    }
    inserted
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bistro_dev.db");
    let mut restaurant_name: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--name" | "-n" => {
                if i + 1 < args.len() {
                    restaurant_name = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bistro Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./bistro_dev.db)");
                println!("  -n, --name <NAME>   Restaurant name to store (default: fallback name)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bistro Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.menu().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} menu items", existing);
        println!("  Skipping menu seed to avoid duplicates.");
    } else {
        let inserted = seed_menu(&db, MENU).await;
        println!("✓ Inserted {} of {} menu items", inserted, MENU.len());
    }

    if let Some(name) = restaurant_name {
        let config = RestaurantConfig {
            restaurant_name: name,
            ..RestaurantConfig::fallback()
        };
        db.restaurant_config().insert(&config).await?;
        println!("✓ Stored restaurant config for {}", config.restaurant_name);
    }

    let current = db.restaurant_config().current().await?;
    println!();
    println!("Restaurant: {}", current.restaurant_name);
    println!("  Tax rate:     {}", current.tax_rate);
    println!("  Delivery fee: {}", current.delivery_fee);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_menu_counts_only_stored_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(seed_menu(&db, &MENU[..3]).await, 3);

        // Ids 1..=3 are taken now, so only the remaining rows go in.
        assert_eq!(seed_menu(&db, MENU).await, MENU.len() - 3);
        assert_eq!(db.menu().count().await.unwrap(), MENU.len() as i64);
    }
}
