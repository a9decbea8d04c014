//! Read-only sample account and transaction data
//!
//! The overview screens render static records; nothing here is mutated.

use crate::models::{
    Account, ProductType, Transaction, TransactionCategory, TransactionKind,
};
use chrono::{Datelike, Duration, Utc};
use lazy_static::lazy_static;
use uuid::Uuid;

/// Category keyword table — matched case-insensitively, partial in both
/// directions, so "grocery shopping" still resolves to Shopping.
const CATEGORY_KEYWORDS: &[(&str, TransactionCategory)] = &[
    ("food", TransactionCategory::Food),
    ("shopping", TransactionCategory::Shopping),
    ("monthly income", TransactionCategory::Income),
    ("salary", TransactionCategory::Income),
    ("leisure", TransactionCategory::Leisure),
    ("saving", TransactionCategory::Saving),
    ("utility", TransactionCategory::Utility),
    ("withdrawal", TransactionCategory::Withdrawal),
    ("interest", TransactionCategory::Interest),
    ("health", TransactionCategory::Health),
    ("transfer", TransactionCategory::Transfer),
    ("clothing", TransactionCategory::Clothing),
    ("mortgage", TransactionCategory::Mortgage),
];

/// Daily affirmations shown on the home dashboard.
pub const DAILY_AFFIRMATIONS: &[&str] = &[
    "Your financial choices today shape your tomorrow. You're on the right path!",
    "Small steps toward financial goals create big changes over time.",
    "You are building wealth with every mindful decision you make.",
    "Financial freedom is a journey, not a destination. Enjoy the process.",
    "Today's discipline becomes tomorrow's financial security.",
];

/// Resolve a free-form category string to a known category.
pub fn match_category(raw: &str) -> TransactionCategory {
    let normalized = raw.trim().to_lowercase();

    if normalized.is_empty() {
        return TransactionCategory::Other;
    }

    for (keyword, category) in CATEGORY_KEYWORDS {
        if normalized == *keyword {
            return *category;
        }
    }

    for (keyword, category) in CATEGORY_KEYWORDS {
        if normalized.contains(keyword) || keyword.contains(normalized.as_str()) {
            return *category;
        }
    }

    TransactionCategory::Other
}

/// Pick today's affirmation by day-of-year so the choice is stable for a day.
pub fn daily_affirmation() -> &'static str {
    let idx = Utc::now().ordinal0() as usize % DAILY_AFFIRMATIONS.len();
    DAILY_AFFIRMATIONS[idx]
}

lazy_static! {
    static ref SAMPLE_ACCOUNTS: Vec<Account> = build_sample_accounts();
    static ref SAMPLE_TRANSACTIONS: Vec<Transaction> = build_sample_transactions();
}

fn build_sample_accounts() -> Vec<Account> {
    vec![
        Account {
            account_id: Uuid::new_v4(),
            name: "Everyday Account".to_string(),
            product_type: ProductType::CurrentAccount,
            masked_number: "•••• 4821".to_string(),
            balance: 2_450.32,
            currency: "GBP".to_string(),
        },
        Account {
            account_id: Uuid::new_v4(),
            name: "Rainy Day Savings".to_string(),
            product_type: ProductType::Savings,
            masked_number: "•••• 9034".to_string(),
            balance: 7_612.90,
            currency: "GBP".to_string(),
        },
        Account {
            account_id: Uuid::new_v4(),
            name: "Rewards Credit Card".to_string(),
            product_type: ProductType::CreditCard,
            masked_number: "•••• 1177".to_string(),
            balance: -479.45,
            currency: "GBP".to_string(),
        },
    ]
}

fn build_sample_transactions() -> Vec<Transaction> {
    let current = SAMPLE_ACCOUNTS[0].account_id;
    let now = Utc::now();

    let rows: &[(&str, &str, f64, TransactionKind, i64)] = &[
        ("Grocery Store", "shopping", 45.67, TransactionKind::Outflow, 1),
        ("Salary Deposit", "monthly income", 2_500.00, TransactionKind::Inflow, 2),
        ("Electric Bill", "utility", 78.90, TransactionKind::Outflow, 3),
        ("Cinema Tickets", "leisure", 21.50, TransactionKind::Outflow, 4),
        ("Savings Transfer", "saving", 150.00, TransactionKind::Outflow, 5),
        ("Account Interest", "interest", 4.12, TransactionKind::Inflow, 9),
    ];

    rows.iter()
        .map(|(description, category, amount, kind, days_ago)| Transaction {
            transaction_id: Uuid::new_v4(),
            account_id: current,
            description: description.to_string(),
            category: match_category(category),
            amount: *amount,
            kind: *kind,
            occurred_at: now - Duration::days(*days_ago),
        })
        .collect()
}

/// All sample accounts (read-only).
pub fn sample_accounts() -> &'static [Account] {
    &SAMPLE_ACCOUNTS
}

/// Sum of balances across all sample accounts.
pub fn total_balance() -> f64 {
    SAMPLE_ACCOUNTS.iter().map(|a| a.balance).sum()
}

/// The most recent sample transactions, newest first.
pub fn recent_transactions(count: usize) -> Vec<Transaction> {
    let mut txs: Vec<Transaction> = SAMPLE_TRANSACTIONS.clone();
    txs.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    txs.truncate(count);
    txs
}
