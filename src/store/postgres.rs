use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::page::PageRequest;
use super::{CashCard, CashCardStore, StoreError};

/// Relational store used when DATABASE_URL is configured.
pub struct PgCashCardStore {
    pool: PgPool,
}

impl PgCashCardStore {
    /// Connect and make sure the cash_card table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected to Postgres cash card store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cash_card (
                id BIGSERIAL PRIMARY KEY,
                amount NUMERIC NOT NULL,
                owner TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS cash_card_owner_idx ON cash_card (owner)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CashCardStore for PgCashCardStore {
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<CashCard>, StoreError> {
        let card = sqlx::query_as::<_, CashCard>(
            "SELECT id, amount, owner FROM cash_card WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<CashCard>, StoreError> {
        // ORDER BY text comes from the sort enums; only values are bound
        let sql = format!(
            "SELECT id, amount, owner FROM cash_card WHERE owner = $1 ORDER BY {} LIMIT $2 OFFSET $3",
            page.sort.to_order_clause(),
        );

        let cards = sqlx::query_as::<_, CashCard>(&sql)
            .bind(owner)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    async fn save(&self, card: CashCard) -> Result<CashCard, StoreError> {
        let saved = match card.id {
            Some(id) => {
                sqlx::query_as::<_, CashCard>(
                    "INSERT INTO cash_card (id, amount, owner) VALUES ($1, $2, $3) \
                     ON CONFLICT (id) DO UPDATE SET amount = EXCLUDED.amount, owner = EXCLUDED.owner \
                     RETURNING id, amount, owner",
                )
                .bind(id)
                .bind(card.amount)
                .bind(&card.owner)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CashCard>(
                    "INSERT INTO cash_card (amount, owner) VALUES ($1, $2) \
                     RETURNING id, amount, owner",
                )
                .bind(card.amount)
                .bind(&card.owner)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cash_card WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
