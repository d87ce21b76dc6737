//! SQLite-backed row store.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use foodrecords_core::FoodId;
use foodrecords_inventory::{FoodInfo, FoodTypeInfo};

use super::r#trait::{FoodStore, StoreError};

/// Persistent row store over a SQLite file.
///
/// Two tables, `food_info` (keyed by `uuid`) and `food_type_info` (unkeyed).
/// A `seq` column preserves insertion order. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SqliteFoodStore {
    pool: SqlitePool,
}

impl SqliteFoodStore {
    /// Open (creating if needed) the database at `database_url` and make sure
    /// both tables exist.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid SQLite URL {database_url}"))?;
        Self::connect_with(options).await
    }

    /// Open (creating if needed) the database file at `path`.
    ///
    /// The path is used as-is, so `%` or `?` in a directory name are fine.
    pub async fn connect_file(path: &Path) -> anyhow::Result<Self> {
        Self::connect_with(SqliteConnectOptions::new().filename(path)).await
    }

    pub async fn connect_with(options: SqliteConnectOptions) -> anyhow::Result<Self> {
        let options = options.create_if_missing(true);
        let filename = options.get_filename().to_path_buf();

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite database at {filename:?}"))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database (one connection, gone when dropped).
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory SQLite URL")?;

        // Every in-memory connection is its own database, so keep exactly one
        // and never let the pool retire it.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS food_info (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                uuid            TEXT NOT NULL UNIQUE,
                food_name       TEXT NOT NULL,
                production_date TEXT NOT NULL,
                shelf_life      TEXT NOT NULL,
                expiration_date TEXT NOT NULL,
                tips            TEXT NOT NULL,
                food_type       TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create food_info table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS food_type_info (
                seq       INTEGER PRIMARY KEY AUTOINCREMENT,
                type_name TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create food_type_info table")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn food_from_row(row: &SqliteRow) -> Result<FoodInfo, StoreError> {
    let uuid: String = row.try_get("uuid")?;
    let uuid = FoodId::from_str(&uuid)
        .map_err(|e| StoreError::backend(format!("corrupt food_info row: {e}")))?;

    Ok(FoodInfo {
        food_name: row.try_get("food_name")?,
        production_date: row.try_get("production_date")?,
        shelf_life: row.try_get("shelf_life")?,
        expiration_date: row.try_get("expiration_date")?,
        uuid,
        tips: row.try_get("tips")?,
        food_type: row.try_get("food_type")?,
    })
}

#[async_trait]
impl FoodStore for SqliteFoodStore {
    async fn insert_food(&self, food: FoodInfo) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO food_info (
                uuid,
                food_name,
                production_date,
                shelf_life,
                expiration_date,
                tips,
                food_type
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(food.uuid.to_string())
        .bind(&food.food_name)
        .bind(&food.production_date)
        .bind(&food.shelf_life)
        .bind(&food.expiration_date)
        .bind(&food.tips)
        .bind(&food.food_type)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict(format!("food {}", food.uuid)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn all_foods(&self) -> Result<Vec<FoodInfo>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT uuid, food_name, production_date, shelf_life, expiration_date, tips, food_type
            FROM food_info
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(food_from_row).collect()
    }

    async fn remove_food(&self, food: &FoodInfo) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM food_info
            WHERE uuid = ?1
            "#,
        )
        .bind(food.uuid.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_food_type(&self, food_type: FoodTypeInfo) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO food_type_info (type_name)
            VALUES (?1)
            "#,
        )
        .bind(&food_type.type_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn all_food_types(&self) -> Result<Vec<FoodTypeInfo>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT type_name
            FROM food_type_info
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<FoodTypeInfo, StoreError> {
                Ok(FoodTypeInfo::new(row.try_get::<String, _>("type_name")?))
            })
            .collect()
    }

    async fn remove_food_type(&self, food_type: &FoodTypeInfo) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM food_type_info
            WHERE type_name = ?1
            "#,
        )
        .bind(&food_type.type_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str) -> FoodInfo {
        FoodInfo {
            food_name: name.to_string(),
            production_date: "2024-06-01".to_string(),
            shelf_life: "3 days".to_string(),
            expiration_date: "2024-06-04".to_string(),
            uuid: FoodId::new(),
            tips: "eat warm".to_string(),
            food_type: "Leftovers".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_every_column() {
        let store = SqliteFoodStore::in_memory().await.unwrap();
        let soup = food("Soup");
        store.insert_food(soup.clone()).await.unwrap();

        assert_eq!(store.all_foods().await.unwrap(), vec![soup]);
    }

    #[tokio::test]
    async fn duplicate_uuid_is_a_conflict() {
        let store = SqliteFoodStore::in_memory().await.unwrap();
        let soup = food("Soup");
        store.insert_food(soup.clone()).await.unwrap();

        let err = store.insert_food(soup).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
        assert_eq!(store.all_foods().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_twice_is_a_no_op() {
        let store = SqliteFoodStore::in_memory().await.unwrap();
        let soup = food("Soup");
        let rice = food("Rice");
        store.insert_food(soup.clone()).await.unwrap();
        store.insert_food(rice.clone()).await.unwrap();

        store.remove_food(&soup).await.unwrap();
        store.remove_food(&soup).await.unwrap();

        assert_eq!(store.all_foods().await.unwrap(), vec![rice]);
    }

    #[tokio::test]
    async fn food_types_keep_insertion_order() {
        let store = SqliteFoodStore::in_memory().await.unwrap();
        for name in ["Dairy", "Produce", "Dairy"] {
            store.insert_food_type(FoodTypeInfo::new(name)).await.unwrap();
        }
        store.remove_food_type(&FoodTypeInfo::new("Dairy")).await.unwrap();

        assert_eq!(
            store.all_food_types().await.unwrap(),
            vec![FoodTypeInfo::new("Produce")]
        );
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_its_only_connection() {
        let store = SqliteFoodStore::in_memory().await.unwrap();
        let options = store.pool().options();

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn file_path_is_not_url_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("odd%20name?mode=ro");
        std::fs::create_dir_all(&nested).unwrap();
        let path = nested.join("food.db");
        let soup = food("Soup");

        {
            let store = SqliteFoodStore::connect_file(&path).await.unwrap();
            store.insert_food(soup.clone()).await.unwrap();
            store.pool().close().await;
        }

        assert!(path.is_file());
        let reopened = SqliteFoodStore::connect_file(&path).await.unwrap();
        assert_eq!(reopened.all_foods().await.unwrap(), vec![soup]);
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("food.db").to_string_lossy());
        let soup = food("Soup");

        {
            let store = SqliteFoodStore::connect(&url).await.unwrap();
            store.insert_food(soup.clone()).await.unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteFoodStore::connect(&url).await.unwrap();
        assert_eq!(reopened.all_foods().await.unwrap(), vec![soup]);
    }
}
