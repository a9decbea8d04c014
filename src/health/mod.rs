//! Financial health scoring
//!
//! Deterministic weighted score over a user's financial profile. The
//! visible contract is a 0-100 score, a category at the >50 threshold,
//! and a list of recommendations for the weak areas.

use crate::error::BankableError;
use crate::models::RiskTolerance;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Subscore weights (sum to 1.0)
const WEIGHT_SAVINGS_RATE: f64 = 0.25;
const WEIGHT_DEBT_TO_INCOME: f64 = 0.25;
const WEIGHT_ESSENTIAL_RATIO: f64 = 0.20;
const WEIGHT_CUSHION: f64 = 0.20;
const WEIGHT_UTILIZATION: f64 = 0.10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    SelfEmployed,
    Contract,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IncomeSection {
    pub monthly_gross_income: f64,
    pub monthly_net_income: f64,
    pub employment_type: Option<EmploymentType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebtSection {
    pub total_debt: f64,
    pub monthly_debt_payment: f64,
    /// Credit utilization as a percentage (0-100)
    pub credit_utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExpensesSection {
    pub monthly_essential_expenses: f64,
    pub monthly_discretionary: f64,
    pub monthly_subscriptions: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SavingsSection {
    pub total_savings: f64,
    pub monthly_savings: f64,
    pub liquid_assets: f64,
    pub investment_value: f64,
}

/// Everything the health calculator asks for
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FinancialProfile {
    pub income: IncomeSection,
    pub debt: DebtSection,
    pub expenses: ExpensesSection,
    pub savings: SavingsSection,
    pub risk_tolerance: Option<RiskTolerance>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    Healthy,
    NeedsImprovement,
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthCategory::Healthy => "Healthy",
            HealthCategory::NeedsImprovement => "Needs Improvement",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscores {
    pub savings_rate: f64,
    pub debt_to_income: f64,
    pub essential_ratio: f64,
    pub emergency_cushion: f64,
    pub credit_utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: f64,
    pub category: HealthCategory,
    pub subscores: Subscores,
    pub recommendations: Vec<String>,
}

/// Compute the financial health score for a profile.
pub fn calculate_health(profile: &FinancialProfile) -> Result<HealthReport> {
    validate(profile)?;

    let income = profile.income.monthly_net_income;

    // Saving 20%+ of net income scores full marks
    let savings_rate = ratio_score(profile.savings.monthly_savings, income, 0.20);

    // Debt payments: 0% of income is ideal, 40%+ scores zero
    let debt_to_income = inverse_ratio_score(profile.debt.monthly_debt_payment, income, 0.40);

    // Essentials at half of income or less is ideal, at 100%+ scores zero
    let essential_ratio = band_score(
        profile.expenses.monthly_essential_expenses,
        income,
        0.50,
        1.00,
    );

    // Six months of essentials in liquid assets is a full cushion
    let emergency_cushion = ratio_score(
        profile.savings.liquid_assets,
        profile.expenses.monthly_essential_expenses,
        6.0,
    );

    // Utilization at 30% or less is ideal, 100% scores zero
    let credit_utilization =
        band_score(profile.debt.credit_utilization, 100.0, 0.30, 1.00);

    let subscores = Subscores {
        savings_rate,
        debt_to_income,
        essential_ratio,
        emergency_cushion,
        credit_utilization,
    };

    let score = (savings_rate * WEIGHT_SAVINGS_RATE
        + debt_to_income * WEIGHT_DEBT_TO_INCOME
        + essential_ratio * WEIGHT_ESSENTIAL_RATIO
        + emergency_cushion * WEIGHT_CUSHION
        + credit_utilization * WEIGHT_UTILIZATION)
        .clamp(0.0, 100.0);

    let category = if score > 50.0 {
        HealthCategory::Healthy
    } else {
        HealthCategory::NeedsImprovement
    };

    debug!(score = score, category = %category, "Health score computed");

    Ok(HealthReport {
        score: (score * 100.0).round() / 100.0,
        category,
        recommendations: recommendations(&subscores, category),
        subscores,
    })
}

fn validate(profile: &FinancialProfile) -> Result<()> {
    let fields = [
        ("monthly_gross_income", profile.income.monthly_gross_income),
        ("monthly_net_income", profile.income.monthly_net_income),
        ("total_debt", profile.debt.total_debt),
        ("monthly_debt_payment", profile.debt.monthly_debt_payment),
        ("credit_utilization", profile.debt.credit_utilization),
        (
            "monthly_essential_expenses",
            profile.expenses.monthly_essential_expenses,
        ),
        ("monthly_discretionary", profile.expenses.monthly_discretionary),
        ("monthly_subscriptions", profile.expenses.monthly_subscriptions),
        ("total_savings", profile.savings.total_savings),
        ("monthly_savings", profile.savings.monthly_savings),
        ("liquid_assets", profile.savings.liquid_assets),
        ("investment_value", profile.savings.investment_value),
    ];

    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(BankableError::ValidationError(format!(
                "{} must be a non-negative number",
                name
            )));
        }
    }
    Ok(())
}

/// Score where `value / base >= full_at` earns 100, scaling linearly.
/// A zero base scores zero (no income means no savings rate).
fn ratio_score(value: f64, base: f64, full_at: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    ((value / base) / full_at * 100.0).clamp(0.0, 100.0)
}

/// Score where `value / base == 0` earns 100 and `>= zero_at` earns 0.
fn inverse_ratio_score(value: f64, base: f64, zero_at: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    (100.0 - (value / base) / zero_at * 100.0).clamp(0.0, 100.0)
}

/// Full marks at or below `ideal`, zero at or above `worst`, linear between.
fn band_score(value: f64, base: f64, ideal: f64, worst: f64) -> f64 {
    if base <= 0.0 {
        return 0.0;
    }
    let ratio = value / base;
    if ratio <= ideal {
        100.0
    } else if ratio >= worst {
        0.0
    } else {
        (worst - ratio) / (worst - ideal) * 100.0
    }
}

fn recommendations(subscores: &Subscores, category: HealthCategory) -> Vec<String> {
    let mut recs = Vec::new();

    if subscores.savings_rate < 50.0 {
        recs.push("Aim to save at least 20% of your net income each month.".to_string());
    }
    if subscores.debt_to_income < 50.0 {
        recs.push("Your debt payments take a large share of income; consider consolidating or paying down high-interest debt first.".to_string());
    }
    if subscores.essential_ratio < 50.0 {
        recs.push("Essential spending is high relative to income; review recurring bills for savings.".to_string());
    }
    if subscores.emergency_cushion < 50.0 {
        recs.push("Build an emergency fund covering at least 3-6 months of essentials.".to_string());
    }
    if subscores.credit_utilization < 50.0 {
        recs.push("Keep credit utilization under 30% of your limit.".to_string());
    }

    if recs.is_empty() {
        recs.push(match category {
            HealthCategory::Healthy => "Keep up the good work!".to_string(),
            HealthCategory::NeedsImprovement => {
                "Consider budgeting improvements.".to_string()
            }
        });
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_profile() -> FinancialProfile {
        FinancialProfile {
            income: IncomeSection {
                monthly_gross_income: 4_000.0,
                monthly_net_income: 3_000.0,
                employment_type: Some(EmploymentType::FullTime),
            },
            debt: DebtSection {
                total_debt: 2_000.0,
                monthly_debt_payment: 100.0,
                credit_utilization: 10.0,
            },
            expenses: ExpensesSection {
                monthly_essential_expenses: 1_200.0,
                monthly_discretionary: 400.0,
                monthly_subscriptions: 50.0,
            },
            savings: SavingsSection {
                total_savings: 15_000.0,
                monthly_savings: 700.0,
                liquid_assets: 9_000.0,
                investment_value: 5_000.0,
            },
            risk_tolerance: Some(RiskTolerance::Medium),
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let profile = healthy_profile();
        let a = calculate_health(&profile).unwrap();
        let b = calculate_health(&profile).unwrap();
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_healthy_profile_scores_healthy() {
        let report = calculate_health(&healthy_profile()).unwrap();
        assert!(report.score > 50.0);
        assert_eq!(report.category, HealthCategory::Healthy);
        assert_eq!(report.recommendations, vec!["Keep up the good work!"]);
    }

    #[test]
    fn test_struggling_profile_needs_improvement() {
        let profile = FinancialProfile {
            income: IncomeSection {
                monthly_gross_income: 2_000.0,
                monthly_net_income: 1_700.0,
                employment_type: Some(EmploymentType::PartTime),
            },
            debt: DebtSection {
                total_debt: 20_000.0,
                monthly_debt_payment: 800.0,
                credit_utilization: 95.0,
            },
            expenses: ExpensesSection {
                monthly_essential_expenses: 1_600.0,
                monthly_discretionary: 200.0,
                monthly_subscriptions: 80.0,
            },
            savings: SavingsSection {
                total_savings: 100.0,
                monthly_savings: 0.0,
                liquid_assets: 100.0,
                investment_value: 0.0,
            },
            risk_tolerance: None,
        };

        let report = calculate_health(&profile).unwrap();
        assert!(report.score <= 50.0);
        assert_eq!(report.category, HealthCategory::NeedsImprovement);
        assert!(report.recommendations.len() >= 3);
    }

    #[test]
    fn test_score_stays_in_range() {
        let zeroed = FinancialProfile::default();
        let report = calculate_health(&zeroed).unwrap();
        assert!((0.0..=100.0).contains(&report.score));

        let report = calculate_health(&healthy_profile()).unwrap();
        assert!((0.0..=100.0).contains(&report.score));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let mut profile = healthy_profile();
        profile.savings.monthly_savings = -5.0;
        assert!(matches!(
            calculate_health(&profile),
            Err(BankableError::ValidationError(_))
        ));

        let mut profile = healthy_profile();
        profile.income.monthly_net_income = f64::NAN;
        assert!(calculate_health(&profile).is_err());
    }

    #[test]
    fn test_zero_income_scores_income_ratios_at_zero() {
        let mut profile = healthy_profile();
        profile.income.monthly_net_income = 0.0;

        let report = calculate_health(&profile).unwrap();
        assert_eq!(report.subscores.savings_rate, 0.0);
        assert_eq!(report.subscores.debt_to_income, 0.0);
    }

    #[test]
    fn test_band_score_edges() {
        assert_eq!(band_score(30.0, 100.0, 0.30, 1.00), 100.0);
        assert_eq!(band_score(100.0, 100.0, 0.30, 1.00), 0.0);
        let mid = band_score(65.0, 100.0, 0.30, 1.00);
        assert!(mid > 0.0 && mid < 100.0);
    }
}
