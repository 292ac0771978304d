use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cash card: a store-assigned id, a signed amount, and the username that
/// owns it. `id` is None only between construction and the first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CashCard {
    pub id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub owner: String,
}

impl CashCard {
    /// A not-yet-stored card. The owner always comes from the authenticated
    /// caller, never from a request body.
    pub fn new(amount: Decimal, owner: impl Into<String>) -> Self {
        Self {
            id: None,
            amount,
            owner: owner.into(),
        }
    }
}
