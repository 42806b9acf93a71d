//! # Restaurant Configuration Repository
//!
//! The `restaurant_config` table keeps history; the row with the highest id
//! is the current configuration. An empty table means
//! [`RestaurantConfig::fallback`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::{Money, RestaurantConfig, TaxRate, Theme};

#[derive(Debug, sqlx::FromRow)]
struct RestaurantConfigRow {
    restaurant_name: String,
    tax_rate_bps: i64,
    delivery_fee_cents: i64,
    primary_color: String,
    secondary_color: String,
    text_color: String,
    background_color: String,
    accent_color: String,
}

impl TryFrom<RestaurantConfigRow> for RestaurantConfig {
    type Error = DbError;

    fn try_from(row: RestaurantConfigRow) -> DbResult<Self> {
        let bps = u32::try_from(row.tax_rate_bps)
            .map_err(|e| DbError::invalid_data("tax_rate_bps", e))?;

        Ok(RestaurantConfig {
            restaurant_name: row.restaurant_name,
            tax_rate: TaxRate::from_bps(bps),
            delivery_fee: Money::from_cents(row.delivery_fee_cents),
            theme: Theme {
                primary_color: row.primary_color,
                secondary_color: row.secondary_color,
                text_color: row.text_color,
                background_color: row.background_color,
                accent_color: row.accent_color,
            },
        })
    }
}

/// Repository for restaurant configuration.
#[derive(Debug, Clone)]
pub struct RestaurantConfigRepository {
    pool: SqlitePool,
}

impl RestaurantConfigRepository {
    /// Creates a new RestaurantConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantConfigRepository { pool }
    }

    /// Returns the latest configuration, or the fallback when none is stored.
    pub async fn current(&self) -> DbResult<RestaurantConfig> {
        let row: Option<RestaurantConfigRow> = sqlx::query_as(
            r#"
            SELECT
                restaurant_name, tax_rate_bps, delivery_fee_cents,
                primary_color, secondary_color, text_color, background_color, accent_color
            FROM restaurant_config
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => RestaurantConfig::try_from(row),
            None => {
                debug!("No restaurant config stored, using fallback");
                Ok(RestaurantConfig::fallback())
            }
        }
    }

    /// Stores a new configuration row, which becomes current.
    pub async fn insert(&self, config: &RestaurantConfig) -> DbResult<i64> {
        debug!(name = %config.restaurant_name, "Inserting restaurant config");

        let result = sqlx::query(
            r#"
            INSERT INTO restaurant_config (
                restaurant_name, tax_rate_bps, delivery_fee_cents,
                primary_color, secondary_color, text_color, background_color, accent_color
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&config.restaurant_name)
        .bind(config.tax_rate.bps() as i64)
        .bind(config.delivery_fee.cents())
        .bind(&config.theme.primary_color)
        .bind(&config.theme.secondary_color)
        .bind(&config.theme.text_color)
        .bind(&config.theme.background_color)
        .bind(&config.theme.accent_color)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_empty_table_uses_fallback() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let config = db.restaurant_config().current().await.unwrap();
        assert_eq!(config, RestaurantConfig::fallback());
    }

    #[tokio::test]
    async fn test_latest_row_wins() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.restaurant_config();

        let first = RestaurantConfig {
            restaurant_name: "Old Name".to_string(),
            ..RestaurantConfig::fallback()
        };
        let second = RestaurantConfig {
            restaurant_name: "Trattoria".to_string(),
            tax_rate: TaxRate::from_bps(1000),
            delivery_fee: Money::from_cents(250),
            ..RestaurantConfig::fallback()
        };
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        assert_eq!(repo.current().await.unwrap(), second);
    }
}
