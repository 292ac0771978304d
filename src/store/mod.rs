mod cash_card;
mod memory;
mod page;
mod postgres;

pub use cash_card::CashCard;
pub use memory::InMemoryCashCardStore;
pub use page::{PageError, PageRequest, Sort, SortDirection, SortField};
pub use postgres::PgCashCardStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence contract for cash cards. Single-record reads and the lookups
/// ahead of mutations go through the combined id+owner query; handlers never
/// check ownership separately from existence.
#[async_trait]
pub trait CashCardStore: Send + Sync {
    /// Fetch one record only when both id and owner match.
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<CashCard>, StoreError>;

    /// Fetch one page of the owner's records in the requested order.
    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<CashCard>, StoreError>;

    /// Insert (id None) or replace (id Some), returning the stored record
    /// with its id filled in.
    async fn save(&self, card: CashCard) -> Result<CashCard, StoreError>;

    /// Remove a record by id. Ownership is resolved by the caller via
    /// find_by_id_and_owner before this runs.
    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    /// Liveness probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
