//! Core data models shared across the banking core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Inflow,
    Outflow,
}

/// Product types carried by sample accounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    CurrentAccount,
    Savings,
    CreditCard,
    Overdraft,
}

/// Spending categories recognised on transactions.
///
/// Free-form category strings from upstream data are matched
/// case-insensitively, with partial matching in both directions
/// (e.g. "grocery shopping" resolves to `Shopping`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Food,
    Shopping,
    Income,
    Leisure,
    Saving,
    Utility,
    Withdrawal,
    Interest,
    Health,
    Transfer,
    Clothing,
    Mortgage,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

//
// ================= Account =================
//

/// A read-only display record for a user's account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub name: String,
    pub product_type: ProductType,
    /// Masked account number suitable for display (e.g. "•••• 4821")
    pub masked_number: String,
    pub balance: f64,
    pub currency: String,
}

//
// ================= Transaction =================
//

/// A read-only display record for a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub description: String,
    pub category: TransactionCategory,
    pub amount: f64,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionKind::Inflow => "inflow",
            TransactionKind::Outflow => "outflow",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductType::CurrentAccount => "Personal Current Account",
            ProductType::Savings => "Savings",
            ProductType::CreditCard => "Credit Card",
            ProductType::Overdraft => "Overdraft",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} {:.2} {}",
            self.name, self.product_type, self.masked_number, self.balance, self.currency
        )
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTolerance::Low => "Low",
            RiskTolerance::Medium => "Medium",
            RiskTolerance::High => "High",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_display_line() {
        let account = Account {
            account_id: Uuid::new_v4(),
            name: "Everyday Account".to_string(),
            product_type: ProductType::CurrentAccount,
            masked_number: "•••• 4821".to_string(),
            balance: 2_450.32,
            currency: "GBP".to_string(),
        };

        let line = account.to_string();
        assert_eq!(
            line,
            "Everyday Account (Personal Current Account) •••• 4821 2450.32 GBP"
        );
    }
}
