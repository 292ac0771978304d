use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::page::{PageRequest, SortDirection, SortField};
use super::{CashCard, CashCardStore, StoreError};

/// In-process store backing the database-less deployment and the test suite.
/// One RwLock keeps every operation atomic.
pub struct InMemoryCashCardStore {
    inner: RwLock<Inner>,
}

struct Inner {
    cards: HashMap<i64, CashCard>,
    next_id: i64,
}

impl InMemoryCashCardStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                cards: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryCashCardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CashCardStore for InMemoryCashCardStore {
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<CashCard>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.cards.get(&id).filter(|c| c.owner == owner).cloned())
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<CashCard>, StoreError> {
        let inner = self.inner.read().await;
        let mut cards: Vec<CashCard> = inner
            .cards
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect();

        // Same ordering as the relational store: requested field first, id
        // as the tiebreak, both following the requested direction.
        cards.sort_by(|a, b| {
            let ordering = match page.sort.field {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Amount => a.amount.cmp(&b.amount).then(a.id.cmp(&b.id)),
            };
            match page.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(cards
            .into_iter()
            .skip(start)
            .take(page.size as usize)
            .collect())
    }

    async fn save(&self, mut card: CashCard) -> Result<CashCard, StoreError> {
        let mut inner = self.inner.write().await;
        let id = match card.id {
            Some(id) => id,
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                card.id = Some(id);
                id
            }
        };
        inner.cards.insert(id, card.clone());
        Ok(card)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.cards.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
