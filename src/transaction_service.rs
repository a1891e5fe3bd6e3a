//! Transaction reads and writes for one view.
//!
//! Reads go through a [QueryCache] keyed by the page size. Every successful
//! write invalidates the whole cache, so the next read fetches the full list
//! again from the server.

use std::{cell::RefCell, rc::Rc};

use crate::{
    api::FinanceApi,
    cache::QueryCache,
    error::ApiError,
    models::{Transaction, TransactionDraft},
    session::SessionContext,
};

pub struct TransactionService<A> {
    api: Rc<A>,
    session: SessionContext,
    cache: RefCell<QueryCache<Option<u32>, Vec<Transaction>>>,
}

impl<A: FinanceApi> TransactionService<A> {
    pub fn new(api: Rc<A>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            cache: RefCell::new(QueryCache::default()),
        }
    }

    /// The transactions visible to the signed-in user, newest page first when
    /// `limit` is set.
    ///
    /// Fails with [ApiError::MissingSession] without touching the network
    /// when nobody is signed in.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<Transaction>, ApiError> {
        let session = self.session.require()?;

        if let Some(cached) = self.cache.borrow().get(&limit) {
            return Ok(cached);
        }

        let transactions = self.api.list_transactions(&session.token, limit).await?;
        tracing::debug!("Fetched {} transactions", transactions.len());
        self.cache.borrow_mut().insert(limit, transactions.clone());
        Ok(transactions)
    }

    pub async fn create(&self, draft: &TransactionDraft) -> Result<(), ApiError> {
        let session = self.session.require()?;
        self.api.create_transaction(&session.token, draft).await?;
        self.invalidate();
        Ok(())
    }

    pub async fn update(&self, id: i64, draft: &TransactionDraft) -> Result<(), ApiError> {
        let session = self.session.require()?;
        self.api.update_transaction(&session.token, id, draft).await?;
        self.invalidate();
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let session = self.session.require()?;
        self.api.delete_transaction(&session.token, id).await?;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&self) {
        let mut cache = self.cache.borrow_mut();
        if !cache.is_empty() {
            tracing::debug!("Invalidating cached transaction lists");
        }
        cache.invalidate_all();
    }
}
