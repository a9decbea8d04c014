//! Group savings goals
//!
//! Goals are shared savings targets with contributions from multiple
//! members. The full goal list is persisted as a single JSON blob under a
//! fixed key, mirroring the app's local-storage layout.

use crate::error::BankableError;
use crate::storage::KeyValueStore;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Storage key for the serialized goal list
pub const GOALS_STORAGE_KEY: &str = "group_saving_goals";

/// A user-defined group savings target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub goal_id: Uuid,
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Progress towards the target as a percentage, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// Service managing the goal list and its persistence
pub struct GoalService {
    store: Arc<dyn KeyValueStore>,
    goals: RwLock<Vec<Goal>>,
}

impl GoalService {
    /// Load goals from storage, seeding sample goals when the key is
    /// missing and falling back to them when the blob fails to parse.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let goals = match store.get(GOALS_STORAGE_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Goal>>(&blob) {
                Ok(goals) => goals,
                Err(e) => {
                    warn!(error = %e, "Stored goals failed to parse, using defaults");
                    default_goals()
                }
            },
            Ok(None) => default_goals(),
            Err(e) => {
                warn!(error = %e, "Goal storage read failed, using defaults");
                default_goals()
            }
        };

        info!(goal_count = goals.len(), "Goal service ready");

        Ok(Self {
            store,
            goals: RwLock::new(goals),
        })
    }

    /// Create a new goal with the owner as its only member.
    pub async fn create(&self, name: &str, target: f64, owner: &str) -> Result<Goal> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BankableError::ValidationError(
                "goal name must not be blank".to_string(),
            ));
        }
        validate_amount(target, "target")?;

        let owner = owner.trim();
        let goal = Goal {
            goal_id: Uuid::new_v4(),
            name: name.to_string(),
            target,
            current: 0.0,
            members: vec![if owner.is_empty() { "You" } else { owner }.to_string()],
            created_at: Utc::now(),
        };

        let mut goals = self.goals.write().await;
        goals.push(goal.clone());
        self.persist(&goals).await?;

        info!(goal_id = %goal.goal_id, name = %goal.name, "Goal created");
        Ok(goal)
    }

    /// Contribute to a goal. `current` is capped at `target`.
    pub async fn contribute(&self, goal_id: Uuid, amount: f64) -> Result<Goal> {
        validate_amount(amount, "contribution")?;

        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.goal_id == goal_id)
            .ok_or_else(|| BankableError::NotFound(format!("goal {}", goal_id)))?;

        goal.current = (goal.current + amount).min(goal.target);
        let updated = goal.clone();
        self.persist(&goals).await?;

        info!(
            goal_id = %updated.goal_id,
            current = updated.current,
            target = updated.target,
            "Contribution recorded"
        );
        Ok(updated)
    }

    /// Add a member to a goal. Duplicates are ignored.
    pub async fn add_member(&self, goal_id: Uuid, member: &str) -> Result<Goal> {
        let member = member.trim();
        if member.is_empty() {
            return Err(BankableError::ValidationError(
                "member name must not be blank".to_string(),
            ));
        }

        let mut goals = self.goals.write().await;
        let goal = goals
            .iter_mut()
            .find(|g| g.goal_id == goal_id)
            .ok_or_else(|| BankableError::NotFound(format!("goal {}", goal_id)))?;

        if !goal.members.iter().any(|m| m == member) {
            goal.members.push(member.to_string());
        }
        let updated = goal.clone();
        self.persist(&goals).await?;

        Ok(updated)
    }

    /// Delete a goal by id. Removes exactly one entry.
    pub async fn delete(&self, goal_id: Uuid) -> Result<()> {
        let mut goals = self.goals.write().await;

        let before = goals.len();
        goals.retain(|g| g.goal_id != goal_id);

        if goals.len() == before {
            return Err(BankableError::NotFound(format!("goal {}", goal_id)));
        }
        self.persist(&goals).await?;

        info!(goal_id = %goal_id, "Goal deleted");
        Ok(())
    }

    pub async fn get(&self, goal_id: Uuid) -> Result<Goal> {
        let goals = self.goals.read().await;
        goals
            .iter()
            .find(|g| g.goal_id == goal_id)
            .cloned()
            .ok_or_else(|| BankableError::NotFound(format!("goal {}", goal_id)))
    }

    pub async fn list(&self) -> Vec<Goal> {
        self.goals.read().await.clone()
    }

    async fn persist(&self, goals: &[Goal]) -> Result<()> {
        let blob = serde_json::to_string(goals)?;
        self.store.set(GOALS_STORAGE_KEY, blob).await
    }
}

fn validate_amount(amount: f64, what: &str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BankableError::ValidationError(format!(
            "{} must be a positive number",
            what
        )));
    }
    Ok(())
}

/// Sample goals seeded on first run
fn default_goals() -> Vec<Goal> {
    vec![
        Goal {
            goal_id: Uuid::new_v4(),
            name: "Summer Holiday".to_string(),
            target: 2_000.0,
            current: 1_500.0,
            members: vec!["JD".to_string(), "AS".to_string(), "MT".to_string()],
            created_at: Utc::now(),
        },
        Goal {
            goal_id: Uuid::new_v4(),
            name: "New Gaming Console".to_string(),
            target: 500.0,
            current: 350.0,
            members: vec!["JD".to_string(), "RK".to_string()],
            created_at: Utc::now(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    async fn fresh_service() -> GoalService {
        GoalService::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_seeds_default_goals() {
        let service = fresh_service().await;
        let goals = service.list().await;

        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].name, "Summer Holiday");
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = fresh_service().await;

        let result = service.create("   ", 100.0, "You").await;
        assert!(matches!(result, Err(BankableError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_non_positive_target_rejected() {
        let service = fresh_service().await;

        assert!(service.create("Car", 0.0, "You").await.is_err());
        assert!(service.create("Car", -50.0, "You").await.is_err());
        assert!(service.create("Car", f64::NAN, "You").await.is_err());
    }

    #[tokio::test]
    async fn test_create_starts_empty_with_owner() {
        let service = fresh_service().await;

        let goal = service.create("Car", 10_000.0, "You").await.unwrap();
        assert_eq!(goal.current, 0.0);
        assert_eq!(goal.members, vec!["You".to_string()]);
    }

    #[tokio::test]
    async fn test_contribution_caps_at_target() {
        let service = fresh_service().await;
        let goal = service.create("Bike", 300.0, "You").await.unwrap();

        let updated = service.contribute(goal.goal_id, 250.0).await.unwrap();
        assert_eq!(updated.current, 250.0);

        let updated = service.contribute(goal.goal_id, 999.0).await.unwrap();
        assert_eq!(updated.current, 300.0);
        assert!(updated.is_complete());
    }

    #[tokio::test]
    async fn test_contribute_unknown_goal() {
        let service = fresh_service().await;

        let result = service.contribute(Uuid::new_v4(), 10.0).await;
        assert!(matches!(result, Err(BankableError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let service = fresh_service().await;
        let goal = service.create("Bike", 300.0, "You").await.unwrap();

        let before = service.list().await.len();
        service.delete(goal.goal_id).await.unwrap();

        let after = service.list().await;
        assert_eq!(after.len(), before - 1);
        assert!(after.iter().all(|g| g.goal_id != goal.goal_id));

        // Deleting again is NotFound
        assert!(service.delete(goal.goal_id).await.is_err());
    }

    #[tokio::test]
    async fn test_add_member_dedupes() {
        let service = fresh_service().await;
        let goal = service.create("Trip", 500.0, "You").await.unwrap();

        service.add_member(goal.goal_id, "AS").await.unwrap();
        let updated = service.add_member(goal.goal_id, "AS").await.unwrap();

        assert_eq!(updated.members, vec!["You".to_string(), "AS".to_string()]);
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        let goal_id = {
            let service = GoalService::load(store.clone()).await.unwrap();
            let goal = service.create("Boat", 5_000.0, "You").await.unwrap();
            service.contribute(goal.goal_id, 100.0).await.unwrap();
            goal.goal_id
        };

        // A fresh service over the same store sees the saved state
        let reloaded = GoalService::load(store).await.unwrap();
        let goal = reloaded.get(goal_id).await.unwrap();
        assert_eq!(goal.current, 100.0);
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back_to_defaults() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        store
            .set(GOALS_STORAGE_KEY, "not json at all".to_string())
            .await
            .unwrap();

        let service = GoalService::load(store).await.unwrap();
        assert_eq!(service.list().await.len(), 2);
    }

    #[test]
    fn test_progress_percent_caps() {
        let mut goal = default_goals().remove(0);
        goal.current = goal.target * 2.0;
        assert_eq!(goal.progress_percent(), 100.0);
    }
}
