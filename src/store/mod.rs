//! Singleton plan persistence over SQLite.
//!
//! There is exactly one logical record with no identity exposed to callers.
//! The plan is stored as a JSON document in a single-row table; every save
//! is a full-document replace, last writer wins.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tracing::debug;

mod migrations;

pub struct PlanStore {
    pool: SqlitePool,
}

impl PlanStore {
    /// Opens (creating if missing) the plan database at `path` and brings
    /// its schema up to date.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open plan database at {}", path.display()))?;
        migrations::run(&pool).await?;
        debug!("plan database ready at {}", path.display());
        Ok(Self { pool })
    }

    /// The raw stored document, or `None` when nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<Value>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT document FROM plan WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .context("failed to read stored plan")?;
        match row {
            None => Ok(None),
            Some((text,)) => {
                let document = serde_json::from_str(&text)
                    .context("stored plan document is not valid JSON")?;
                Ok(Some(document))
            }
        }
    }

    /// Merges the patch's top-level fields into the stored document (creating
    /// it from the patch when absent) and writes the result back wholesale.
    /// Returns the merged document.
    pub async fn upsert(&self, patch: &Value) -> Result<Value> {
        let mut document = self
            .load()
            .await?
            .unwrap_or_else(|| Value::Object(Map::new()));
        merge_top_level(&mut document, patch);
        self.write(&document).await?;
        Ok(document)
    }

    /// Persists and returns the first-read record: empty lists and a zeroed
    /// mortgage, to be filled in by normalization on the way out.
    pub async fn create_default(&self) -> Result<Value> {
        let document = default_document();
        self.write(&document).await?;
        debug!("created default plan record");
        Ok(document)
    }

    async fn write(&self, document: &Value) -> Result<()> {
        let text = serde_json::to_string(document).context("failed to serialize plan document")?;
        sqlx::query(
            "INSERT INTO plan (id, document) VALUES (1, ?) \
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
        )
        .bind(&text)
        .execute(&self.pool)
        .await
        .context("failed to write plan document")?;
        Ok(())
    }
}

/// Replaces each top-level field present in `patch` on `document`. Non-object
/// patches merge nothing; a non-object stored document is replaced outright.
fn merge_top_level(document: &mut Value, patch: &Value) {
    let Some(fields) = patch.as_object() else {
        return;
    };
    if !document.is_object() {
        *document = Value::Object(Map::new());
    }
    if let Value::Object(target) = document {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn default_document() -> Value {
    json!({
        "income": [],
        "expenses": [],
        "savings": [],
        "savingsYears": 1,
        "mortgage": {
            "current": 0,
            "future": 0,
            "downPayment": 0,
            "newMortgage": 0,
            "monthlyTax": 0,
            "monthlyInsurance": 0,
            "monthlyHOA": 0,
            "interestRate": 0,
            "financingYears": 30
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, PlanStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = PlanStore::open(dir.path().join("plan.sqlite"))
            .await
            .expect("open store");
        (dir, store)
    }

    #[tokio::test]
    async fn load_on_fresh_database_returns_none() {
        let (_dir, store) = temp_store().await;
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn upsert_creates_then_merges_top_level_fields() {
        let (_dir, store) = temp_store().await;

        let created = store
            .upsert(&json!({ "savingsYears": 3, "income": [] }))
            .await
            .unwrap();
        assert_eq!(created["savingsYears"], json!(3));

        // A later partial save replaces only the fields it carries.
        let merged = store
            .upsert(&json!({ "savingsYears": 5 }))
            .await
            .unwrap();
        assert_eq!(merged["savingsYears"], json!(5));
        assert_eq!(merged["income"], json!([]));

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn upsert_replaces_whole_top_level_lists() {
        let (_dir, store) = temp_store().await;
        store
            .upsert(&json!({ "income": [{ "id": "a", "name": "A", "amount": 1 }] }))
            .await
            .unwrap();
        let merged = store
            .upsert(&json!({ "income": [{ "id": "b", "name": "B", "amount": 2 }] }))
            .await
            .unwrap();
        assert_eq!(merged["income"].as_array().unwrap().len(), 1);
        assert_eq!(merged["income"][0]["id"], json!("b"));
    }

    #[tokio::test]
    async fn non_object_patch_merges_nothing() {
        let (_dir, store) = temp_store().await;
        store.upsert(&json!({ "savingsYears": 2 })).await.unwrap();
        let merged = store.upsert(&json!(17)).await.unwrap();
        assert_eq!(merged["savingsYears"], json!(2));
    }

    #[tokio::test]
    async fn create_default_persists_first_read_record() {
        let (_dir, store) = temp_store().await;
        let created = store.create_default().await.unwrap();
        assert_eq!(created["income"], json!([]));
        assert_eq!(created["mortgage"]["financingYears"], json!(30));
        assert_eq!(store.load().await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn store_survives_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("plan.sqlite");
        {
            let store = PlanStore::open(&path).await.unwrap();
            store.upsert(&json!({ "savingsYears": 4 })).await.unwrap();
        }
        let store = PlanStore::open(&path).await.unwrap();
        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored["savingsYears"], json!(4));
    }
}
