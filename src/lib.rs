//! Bankable Core
//!
//! Backend services for the Bankable demo banking app: accounts and
//! transactions, group saving goals, a virtual pet companion, customizable
//! home-screen widgets, financial health scoring, and a Finnhub market
//! data client. Persistence goes through a pluggable key-value store so
//! the in-memory backend used in tests can be swapped for a file-backed
//! one (or a real database) without touching the services.

pub mod accounts;
pub mod api;
pub mod error;
pub mod goals;
pub mod health;
pub mod market;
pub mod models;
pub mod pet;
pub mod storage;
pub mod widgets;

pub use error::{BankableError, Result};
pub use models::{Account, ProductType, Transaction, TransactionCategory, TransactionKind};
