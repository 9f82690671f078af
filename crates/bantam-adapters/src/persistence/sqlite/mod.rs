mod escalation_plan;
mod notification_plan;
mod person;
mod rotation_policy;
mod team;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use bantam_ports::error::PortError;

/// SQLite-backed store. Every record kind gets a `name`-keyed table with a
/// JSON `data` column, so records evolve without schema migrations.
#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    pub async fn new(url: &str) -> Result<Self, PortError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), PortError> {
        for table in [
            "people",
            "notification_plans",
            "teams",
            "escalation_plans",
            "rotation_policies",
        ] {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    name TEXT PRIMARY KEY,
                    data TEXT NOT NULL
                )"
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        }
        Ok(())
    }

    async fn put(&self, table: &str, name: &str, data: &str) -> Result<(), PortError> {
        sqlx::query(&format!(
            "INSERT INTO {table} (name, data) VALUES (?, ?)
             ON CONFLICT(name) DO UPDATE SET data = excluded.data"
        ))
        .bind(name)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, table: &str, name: &str) -> Result<Option<String>, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as(&format!("SELECT data FROM {table} WHERE name = ?"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(row.map(|(data,)| data))
    }

    async fn get_all(&self, table: &str) -> Result<Vec<String>, PortError> {
        let rows: Vec<(String,)> = sqlx::query_as(&format!("SELECT data FROM {table}"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(rows.into_iter().map(|(data,)| data).collect())
    }

    async fn remove(&self, table: &str, name: &str) -> Result<(), PortError> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE name = ?"))
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound);
        }
        Ok(())
    }

    fn decode<T: serde::de::DeserializeOwned>(data: &str) -> Result<T, PortError> {
        serde_json::from_str(data).map_err(|e| PortError::Persistence(e.to_string()))
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<String, PortError> {
        serde_json::to_string(value).map_err(|e| PortError::Persistence(e.to_string()))
    }
}
