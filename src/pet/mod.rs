//! Virtual-pet gamification engine
//!
//! The pet is a small state machine: stats decay over time while the pet
//! is awake, care actions push them back up, and saving money earns
//! points spendable on outfits and partner rewards. Decay is driven by an
//! explicit `tick(seconds)` so callers own the clock.

use crate::error::BankableError;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Per-second decay rates while the pet is awake
const HUNGER_DECAY_PER_SEC: f64 = 0.1;
const HAPPINESS_DECAY_PER_SEC: f64 = 0.05;
const ENERGY_DECAY_PER_SEC: f64 = 0.08;

/// Coins awarded on each level-up
const LEVEL_UP_COINS: u64 = 50;

/// Points earned per currency unit saved
const POINTS_PER_UNIT_SAVED: f64 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PetStats {
    pub happiness: f64,
    pub hunger: f64,
    pub energy: f64,
    pub coins: u64,
    pub level: u32,
    pub xp: u64,
}

impl Default for PetStats {
    fn default() -> Self {
        Self {
            happiness: 80.0,
            hunger: 70.0,
            energy: 90.0,
            coins: 100,
            level: 1,
            xp: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSlot {
    Hat,
    Shirt,
    Accessory,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outfit {
    pub outfit_id: &'static str,
    pub name: &'static str,
    pub slot: OutfitSlot,
    pub price: u64,
    pub owned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub achievement_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// A partner reward redeemable with points
#[derive(Debug, Clone, Serialize)]
pub struct Reward {
    pub reward_id: &'static str,
    pub name: &'static str,
    pub partner: &'static str,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u64,
}

fn outfit_catalog() -> Vec<Outfit> {
    vec![
        Outfit { outfit_id: "party-hat", name: "Party Hat", slot: OutfitSlot::Hat, price: 50, owned: true },
        Outfit { outfit_id: "cool-shades", name: "Cool Shades", slot: OutfitSlot::Accessory, price: 100, owned: false },
        Outfit { outfit_id: "summer-shirt", name: "Summer Shirt", slot: OutfitSlot::Shirt, price: 75, owned: false },
        Outfit { outfit_id: "winter-scarf", name: "Winter Scarf", slot: OutfitSlot::Accessory, price: 80, owned: false },
        Outfit { outfit_id: "crown", name: "Crown", slot: OutfitSlot::Hat, price: 200, owned: false },
        Outfit { outfit_id: "bow-tie", name: "Bow Tie", slot: OutfitSlot::Accessory, price: 60, owned: false },
    ]
}

fn achievement_catalog() -> Vec<Achievement> {
    vec![
        Achievement {
            achievement_id: "best-friend",
            name: "Best Friend",
            description: "Reach 100% happiness",
            unlocked: false,
        },
        Achievement {
            achievement_id: "fashionista",
            name: "Fashionista",
            description: "Own 3 outfits",
            unlocked: false,
        },
    ]
}

/// Redeemable reward catalog
pub const REWARD_CATALOG: &[Reward] = &[
    Reward { reward_id: "coffee-voucher", name: "Free Coffee", partner: "Costa", price: 400 },
    Reward { reward_id: "cinema-ticket", name: "2-for-1 Cinema Ticket", partner: "Odeon", price: 750 },
    Reward { reward_id: "amazon-5", name: "£5 Amazon Voucher", partner: "Amazon", price: 1_000 },
];

/// Friends shown on the points leaderboard
const FRIENDS: &[(&str, u64)] = &[
    ("Sarah", 1_250),
    ("Mike", 980),
    ("Emma", 1_500),
    ("John", 750),
];

#[derive(Debug, Clone, Serialize)]
pub struct VirtualPet {
    pub stats: PetStats,
    pub sleeping: bool,
    pub points: u64,
    pub wardrobe: Vec<Outfit>,
    pub worn_outfit: Option<String>,
    pub achievements: Vec<Achievement>,
    pub redeemed_rewards: Vec<String>,
}

impl Default for VirtualPet {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualPet {
    pub fn new() -> Self {
        Self {
            stats: PetStats::default(),
            sleeping: false,
            points: 500,
            wardrobe: outfit_catalog(),
            worn_outfit: None,
            achievements: achievement_catalog(),
            redeemed_rewards: Vec::new(),
        }
    }

    /// Apply wall-clock decay. No decay while the pet sleeps.
    pub fn tick(&mut self, seconds: f64) {
        if self.sleeping || seconds <= 0.0 {
            return;
        }

        self.stats.hunger = (self.stats.hunger - HUNGER_DECAY_PER_SEC * seconds).max(0.0);
        self.stats.happiness = (self.stats.happiness - HAPPINESS_DECAY_PER_SEC * seconds).max(0.0);
        self.stats.energy = (self.stats.energy - ENERGY_DECAY_PER_SEC * seconds).max(0.0);
    }

    /// Feed the pet. No effect at full hunger.
    pub fn feed(&mut self) {
        if self.stats.hunger >= 100.0 {
            return;
        }

        self.stats.hunger = (self.stats.hunger + 20.0).min(100.0);
        self.stats.happiness = (self.stats.happiness + 5.0).min(100.0);
        self.stats.xp += 5;
        self.after_action();
    }

    /// Play with the pet. No effect at full happiness.
    pub fn play(&mut self) {
        if self.stats.happiness >= 100.0 {
            return;
        }

        self.stats.happiness = (self.stats.happiness + 15.0).min(100.0);
        self.stats.energy = (self.stats.energy - 5.0).max(0.0);
        self.stats.xp += 3;
        self.after_action();
    }

    /// Toggle sleep. Falling asleep restores energy.
    pub fn toggle_sleep(&mut self) {
        self.sleeping = !self.sleeping;
        if self.sleeping {
            self.stats.energy = (self.stats.energy + 50.0).min(100.0);
        }
    }

    /// Buy an outfit from the wardrobe catalog.
    pub fn buy_outfit(&mut self, outfit_id: &str) -> Result<()> {
        let price = {
            let outfit = self
                .wardrobe
                .iter()
                .find(|o| o.outfit_id == outfit_id)
                .ok_or_else(|| BankableError::NotFound(format!("outfit {}", outfit_id)))?;

            if outfit.owned {
                return Err(BankableError::ValidationError(format!(
                    "outfit {} already owned",
                    outfit_id
                )));
            }
            outfit.price
        };

        if self.stats.coins < price {
            return Err(BankableError::ValidationError(format!(
                "not enough coins for outfit {} ({} needed, {} held)",
                outfit_id, price, self.stats.coins
            )));
        }

        self.stats.coins -= price;
        self.stats.xp += 10;
        if let Some(outfit) = self.wardrobe.iter_mut().find(|o| o.outfit_id == outfit_id) {
            outfit.owned = true;
        }

        info!(outfit_id = %outfit_id, "Outfit purchased");
        self.after_action();
        Ok(())
    }

    /// Dress the pet in an owned outfit.
    pub fn wear(&mut self, outfit_id: &str) -> Result<()> {
        let outfit = self
            .wardrobe
            .iter()
            .find(|o| o.outfit_id == outfit_id)
            .ok_or_else(|| BankableError::NotFound(format!("outfit {}", outfit_id)))?;

        if !outfit.owned {
            return Err(BankableError::ValidationError(format!(
                "outfit {} is not owned",
                outfit_id
            )));
        }

        self.worn_outfit = Some(outfit_id.to_string());
        self.stats.happiness = (self.stats.happiness + 10.0).min(100.0);
        self.stats.xp += 2;
        self.after_action();
        Ok(())
    }

    /// Record money saved: awards points and cheers the pet up.
    pub fn record_saving(&mut self, amount: f64) -> Result<u64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BankableError::ValidationError(
                "saved amount must be a positive number".to_string(),
            ));
        }

        let earned = (amount * POINTS_PER_UNIT_SAVED).round() as u64;
        self.points += earned;
        self.stats.happiness = (self.stats.happiness + 5.0).min(100.0);
        self.after_action();

        info!(earned = earned, total = self.points, "Saving recorded");
        Ok(earned)
    }

    /// Redeem a partner reward with points.
    pub fn redeem_reward(&mut self, reward_id: &str) -> Result<Reward> {
        let reward = REWARD_CATALOG
            .iter()
            .find(|r| r.reward_id == reward_id)
            .cloned()
            .ok_or_else(|| BankableError::NotFound(format!("reward {}", reward_id)))?;

        if self.points < reward.price {
            return Err(BankableError::ValidationError(format!(
                "not enough points for {} ({} needed, {} held)",
                reward.name, reward.price, self.points
            )));
        }

        self.points -= reward.price;
        self.redeemed_rewards.push(reward.reward_id.to_string());

        info!(reward_id = %reward.reward_id, "Reward redeemed");
        Ok(reward)
    }

    /// Friends leaderboard including the user, sorted by points descending.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = FRIENDS
            .iter()
            .map(|(name, points)| LeaderboardEntry {
                name: name.to_string(),
                points: *points,
            })
            .collect();

        entries.push(LeaderboardEntry {
            name: "You".to_string(),
            points: self.points,
        });

        entries.sort_by(|a, b| b.points.cmp(&a.points));
        entries
    }

    fn after_action(&mut self) {
        self.check_level_up();
        self.check_achievements();
    }

    fn check_level_up(&mut self) {
        loop {
            let xp_needed = self.stats.level as u64 * 100;
            if self.stats.xp < xp_needed {
                break;
            }
            self.stats.xp -= xp_needed;
            self.stats.level += 1;
            self.stats.coins += LEVEL_UP_COINS;

            info!(level = self.stats.level, "Pet levelled up");
        }
    }

    fn check_achievements(&mut self) {
        let happiness_maxed = self.stats.happiness >= 100.0;
        let owned_outfits = self.wardrobe.iter().filter(|o| o.owned).count();

        for achievement in &mut self.achievements {
            if achievement.unlocked {
                continue;
            }
            let unlocked = match achievement.achievement_id {
                "best-friend" => happiness_maxed,
                "fashionista" => owned_outfits >= 3,
                _ => false,
            };
            if unlocked {
                achievement.unlocked = true;
                info!(achievement = %achievement.name, "Achievement unlocked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_rates_and_floor() {
        let mut pet = VirtualPet::new();

        pet.tick(100.0);
        assert_eq!(pet.stats.hunger, 60.0);
        assert_eq!(pet.stats.happiness, 75.0);
        assert_eq!(pet.stats.energy, 82.0);

        // Long decay floors everything at 0
        pet.tick(1_000_000.0);
        assert_eq!(pet.stats.hunger, 0.0);
        assert_eq!(pet.stats.happiness, 0.0);
        assert_eq!(pet.stats.energy, 0.0);
    }

    #[test]
    fn test_no_decay_while_sleeping() {
        let mut pet = VirtualPet::new();
        pet.toggle_sleep();

        let before = pet.stats;
        pet.tick(500.0);
        assert_eq!(pet.stats, before);
    }

    #[test]
    fn test_feed_caps_and_noop_when_full() {
        let mut pet = VirtualPet::new();

        pet.feed();
        assert_eq!(pet.stats.hunger, 90.0);
        assert_eq!(pet.stats.happiness, 85.0);
        assert_eq!(pet.stats.xp, 5);

        pet.feed();
        assert_eq!(pet.stats.hunger, 100.0);

        // Full: nothing moves, no xp awarded
        let before = pet.stats;
        pet.feed();
        assert_eq!(pet.stats, before);
    }

    #[test]
    fn test_play_drains_energy_with_floor() {
        let mut pet = VirtualPet::new();
        pet.stats.energy = 3.0;

        pet.play();
        assert_eq!(pet.stats.energy, 0.0);
        assert_eq!(pet.stats.happiness, 95.0);
        assert_eq!(pet.stats.xp, 3);
    }

    #[test]
    fn test_sleep_restores_energy_capped() {
        let mut pet = VirtualPet::new();
        pet.stats.energy = 70.0;

        pet.toggle_sleep();
        assert!(pet.sleeping);
        assert_eq!(pet.stats.energy, 100.0);

        pet.toggle_sleep();
        assert!(!pet.sleeping);
    }

    #[test]
    fn test_level_up_awards_coins() {
        let mut pet = VirtualPet::new();
        pet.stats.xp = 98;

        pet.feed(); // +5 xp crosses 100
        assert_eq!(pet.stats.level, 2);
        assert_eq!(pet.stats.xp, 3);
        assert_eq!(pet.stats.coins, 150);
    }

    #[test]
    fn test_buy_outfit_requires_coins() {
        let mut pet = VirtualPet::new();

        // Crown costs 200, starting coins are 100
        let result = pet.buy_outfit("crown");
        assert!(matches!(result, Err(BankableError::ValidationError(_))));

        pet.buy_outfit("summer-shirt").unwrap();
        assert_eq!(pet.stats.coins, 25);
        assert_eq!(pet.stats.xp, 10);

        // Already owned
        assert!(pet.buy_outfit("summer-shirt").is_err());
        assert!(pet.buy_outfit("no-such-outfit").is_err());
    }

    #[test]
    fn test_wear_requires_ownership() {
        let mut pet = VirtualPet::new();

        assert!(pet.wear("crown").is_err());

        // Party hat is owned from the start
        pet.wear("party-hat").unwrap();
        assert_eq!(pet.worn_outfit.as_deref(), Some("party-hat"));
        assert_eq!(pet.stats.happiness, 90.0);
    }

    #[test]
    fn test_fashionista_achievement() {
        let mut pet = VirtualPet::new();
        pet.stats.coins = 1_000;

        pet.buy_outfit("cool-shades").unwrap();
        pet.buy_outfit("bow-tie").unwrap();

        // Party hat was already owned, so the third purchase makes three
        let fashionista = pet
            .achievements
            .iter()
            .find(|a| a.achievement_id == "fashionista")
            .unwrap();
        assert!(fashionista.unlocked);
    }

    #[test]
    fn test_best_friend_achievement() {
        let mut pet = VirtualPet::new();
        pet.stats.happiness = 99.0;

        pet.play();
        assert_eq!(pet.stats.happiness, 100.0);

        let best_friend = pet
            .achievements
            .iter()
            .find(|a| a.achievement_id == "best-friend")
            .unwrap();
        assert!(best_friend.unlocked);
    }

    #[test]
    fn test_record_saving_awards_points() {
        let mut pet = VirtualPet::new();

        let earned = pet.record_saving(4.5).unwrap();
        assert_eq!(earned, 45);
        assert_eq!(pet.points, 545);

        assert!(pet.record_saving(0.0).is_err());
        assert!(pet.record_saving(f64::INFINITY).is_err());
    }

    #[test]
    fn test_redeem_reward() {
        let mut pet = VirtualPet::new();

        // 500 starting points cover the coffee, not the voucher
        assert!(pet.redeem_reward("amazon-5").is_err());

        let reward = pet.redeem_reward("coffee-voucher").unwrap();
        assert_eq!(reward.partner, "Costa");
        assert_eq!(pet.points, 100);
        assert_eq!(pet.redeemed_rewards, vec!["coffee-voucher".to_string()]);

        assert!(pet.redeem_reward("no-such-reward").is_err());
    }

    #[test]
    fn test_leaderboard_sorted_desc() {
        let mut pet = VirtualPet::new();
        pet.points = 1_300;

        let board = pet.leaderboard();
        assert_eq!(board.len(), 5);
        assert_eq!(board[0].name, "Emma");
        assert_eq!(board[1].name, "You");
        for pair in board.windows(2) {
            assert!(pair[0].points >= pair[1].points);
        }
    }

    #[test]
    fn test_stats_stay_in_range_under_mixed_use() {
        let mut pet = VirtualPet::new();

        for _ in 0..50 {
            pet.feed();
            pet.play();
            pet.tick(30.0);
        }

        assert!((0.0..=100.0).contains(&pet.stats.happiness));
        assert!((0.0..=100.0).contains(&pet.stats.hunger));
        assert!((0.0..=100.0).contains(&pet.stats.energy));
    }
}
