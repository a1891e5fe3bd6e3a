//! In-memory stand-ins for the remote API and the browser storage.

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    rc::Rc,
};

use crate::{
    api::FinanceApi,
    error::ApiError,
    models::{
        AuthResponse, Category, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
        ProfileUpdate, RegisterRequest, StatsTable, Summary, Transaction, TransactionDraft, User,
    },
    session::{MemoryStore, SessionContext},
};

pub const PASSWORD: &str = "correct horse";

pub fn user() -> User {
    User {
        id: 1,
        name: "Awa".to_string(),
        email: "awa@example.com".to_string(),
        budget: None,
        profile_image: None,
    }
}

fn token_for(user: &User) -> String {
    format!("token-{}", user.id)
}

pub fn signed_out() -> SessionContext {
    SessionContext::new(Rc::new(MemoryStore::default()))
}

/// A session holding a token the fake API accepts.
pub fn signed_in(api: &FakeApi) -> SessionContext {
    let session = signed_out();
    let user = api.user.borrow().clone();
    session.save(&token_for(&user), &user).unwrap();
    session
}

/// A single-user API backed by vectors. Endpoints can be made to fail with a
/// 500 through [FakeApi::fail].
pub struct FakeApi {
    pub user: RefCell<User>,
    pub transactions: RefCell<Vec<Transaction>>,
    pub category_stats: RefCell<StatsTable>,
    pub monthly_stats: RefCell<StatsTable>,
    pub summary: RefCell<Option<Summary>>,
    pub registration_returns_user: Cell<bool>,
    calls: RefCell<Vec<&'static str>>,
    failing: RefCell<HashSet<&'static str>>,
    next_id: Cell<i64>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            user: RefCell::new(user()),
            transactions: RefCell::new(Vec::new()),
            category_stats: RefCell::new(StatsTable::default()),
            monthly_stats: RefCell::new(StatsTable::default()),
            summary: RefCell::new(None),
            registration_returns_user: Cell::new(true),
            calls: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
            next_id: Cell::new(1),
        }
    }
}

impl FakeApi {
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.borrow_mut().insert(endpoint);
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| **call == endpoint)
            .count()
    }

    fn record(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(endpoint);
        if self.failing.borrow().contains(endpoint) {
            return Err(ApiError::Server {
                status: 500,
                message: None,
            });
        }
        Ok(())
    }

    fn authorize(&self, endpoint: &'static str, token: &str) -> Result<(), ApiError> {
        self.record(endpoint)?;
        if token != token_for(&self.user.borrow()) {
            return Err(ApiError::Server {
                status: 401,
                message: Some("Unauthenticated.".to_string()),
            });
        }
        Ok(())
    }

    fn to_transaction(id: i64, draft: &TransactionDraft) -> Transaction {
        Transaction {
            id,
            title: draft.title.clone(),
            amount: draft.amount,
            kind: draft.kind.clone(),
            date: draft.date.clone(),
            category: Some(Category {
                name: draft.category_name.clone(),
            }),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            message: Some("Transaction introuvable".to_string()),
        }
    }
}

impl FinanceApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record("login")?;
        let user = self.user.borrow().clone();
        if request.email != user.email || request.password != PASSWORD {
            return Err(ApiError::Server {
                status: 401,
                message: Some("Identifiants invalides".to_string()),
            });
        }
        Ok(AuthResponse {
            access_token: Some(token_for(&user)),
            user: Some(user),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record("register")?;
        if request.email == self.user.borrow().email {
            return Err(ApiError::Server {
                status: 422,
                message: Some("Cet email est déjà utilisé".to_string()),
            });
        }
        let user = User {
            id: 2,
            name: request.name.clone(),
            email: request.email.clone(),
            budget: None,
            profile_image: None,
        };
        Ok(AuthResponse {
            access_token: Some(token_for(&user)),
            user: self.registration_returns_user.get().then_some(user),
        })
    }

    async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<ForgotPasswordResponse, ApiError> {
        self.record("forgot_password")?;
        Ok(ForgotPasswordResponse {
            success: request.email == self.user.borrow().email,
        })
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.authorize("me", token)?;
        Ok(self.user.borrow().clone())
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.authorize("update_profile", token)?;
        let mut user = self.user.borrow_mut();
        user.name = update.name.clone();
        if update.image.is_some() {
            user.profile_image = Some("avatar.png".to_string());
        }
        Ok(user.clone())
    }

    async fn list_transactions(
        &self,
        token: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.authorize("list_transactions", token)?;
        let transactions = self.transactions.borrow();
        let take = limit.map_or(transactions.len(), |limit| limit as usize);
        Ok(transactions.iter().rev().take(take).cloned().collect())
    }

    async fn create_transaction(
        &self,
        token: &str,
        draft: &TransactionDraft,
    ) -> Result<(), ApiError> {
        self.authorize("create_transaction", token)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.transactions
            .borrow_mut()
            .push(Self::to_transaction(id, draft));
        Ok(())
    }

    async fn update_transaction(
        &self,
        token: &str,
        id: i64,
        draft: &TransactionDraft,
    ) -> Result<(), ApiError> {
        self.authorize("update_transaction", token)?;
        let mut transactions = self.transactions.borrow_mut();
        let existing = transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(Self::not_found)?;
        *existing = Self::to_transaction(id, draft);
        Ok(())
    }

    async fn delete_transaction(&self, token: &str, id: i64) -> Result<(), ApiError> {
        self.authorize("delete_transaction", token)?;
        let mut transactions = self.transactions.borrow_mut();
        let before = transactions.len();
        transactions.retain(|t| t.id != id);
        if transactions.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn category_stats(&self, token: &str) -> Result<StatsTable, ApiError> {
        self.authorize("category_stats", token)?;
        Ok(self.category_stats.borrow().clone())
    }

    async fn monthly_stats(&self, token: &str) -> Result<StatsTable, ApiError> {
        self.authorize("monthly_stats", token)?;
        Ok(self.monthly_stats.borrow().clone())
    }

    async fn summary(&self, token: &str) -> Result<Option<Summary>, ApiError> {
        self.authorize("summary", token)?;
        Ok(*self.summary.borrow())
    }
}
