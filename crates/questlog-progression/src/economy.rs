//! Reward economy: XP-to-gold ratio, daily focus bonus, leisure rewards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::Player;

/// Gold awarded per quest is the base XP divided by this, rounded down.
pub const GOLD_PER_XP_DIVISOR: u32 = 2;

/// Extra XP, in percent, for quests in the day's focus category.
pub const FOCUS_BONUS_PERCENT: u32 = 25;

/// Gold paid for a quest worth `base_xp`.
///
/// Computed from the base value so the focus bonus never changes gold.
#[must_use]
pub const fn gold_for_xp(base_xp: u32) -> u64 {
    (base_xp / GOLD_PER_XP_DIVISOR) as u64
}

/// XP for a focus-category quest: `round(base_xp * 1.25)`, halves round up.
#[must_use]
pub const fn apply_focus_bonus(base_xp: u32) -> u32 {
    let scaled = base_xp as u64 * (100 + FOCUS_BONUS_PERCENT) as u64;
    let rounded = (scaled + 50) / 100;
    if rounded > u32::MAX as u64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Economy error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconomyError {
    /// Insufficient funds
    #[error("Insufficient funds: need {needed}, have {have}")]
    InsufficientFunds {
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Reward not found in the catalog
    #[error("Reward not found: {0}")]
    RewardNotFound(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// A leisure reward the player can buy with gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeisureReward {
    /// Display name
    pub name: String,
    /// Price in gold
    pub cost: u64,
}

impl LeisureReward {
    /// Creates a new reward.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: u64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

/// Looks up a reward by name, ignoring case.
pub fn find_reward<'a>(
    catalog: &'a [LeisureReward],
    name: &str,
) -> EconomyResult<&'a LeisureReward> {
    catalog
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| EconomyError::RewardNotFound(name.to_string()))
}

/// Adds gold to the player.
#[must_use]
pub fn credit_gold(mut player: Player, amount: u64) -> Player {
    player.gold = player.gold.saturating_add(amount);
    player
}

/// Buys a reward, deducting its cost.
///
/// This is the only place gold is ever subtracted. The input snapshot is
/// never modified, so a failed purchase leaves nothing to roll back.
pub fn redeem_reward(player: &Player, reward: &LeisureReward) -> EconomyResult<Player> {
    if player.gold < reward.cost {
        return Err(EconomyError::InsufficientFunds {
            needed: reward.cost,
            have: player.gold,
        });
    }
    let mut updated = player.clone();
    updated.gold -= reward.cost;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gold_is_half_of_base_xp_rounded_down() {
        assert_eq!(gold_for_xp(10), 5);
        assert_eq!(gold_for_xp(75), 37);
        assert_eq!(gold_for_xp(500), 250);
    }

    #[test]
    fn test_focus_bonus_rounding() {
        assert_eq!(apply_focus_bonus(100), 125);
        assert_eq!(apply_focus_bonus(10), 13); // 12.5 rounds up
        assert_eq!(apply_focus_bonus(15), 19); // 18.75
        assert_eq!(apply_focus_bonus(13), 16); // 16.25
        assert_eq!(apply_focus_bonus(0), 0);
        assert_eq!(apply_focus_bonus(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_redeem_deducts_cost() {
        let player = Player {
            gold: 120,
            ..Player::new()
        };
        let reward = LeisureReward::new("Movie night", 100);
        let updated = redeem_reward(&player, &reward).expect("Should afford");
        assert_eq!(updated.gold, 20);
        assert_eq!(player.gold, 120);
    }

    #[test]
    fn test_redeem_insufficient_funds() {
        let player = Player {
            gold: 30,
            ..Player::new()
        };
        let reward = LeisureReward::new("Game hour", 50);
        let result = redeem_reward(&player, &reward);
        assert_eq!(
            result,
            Err(EconomyError::InsufficientFunds {
                needed: 50,
                have: 30
            })
        );
    }

    #[test]
    fn test_find_reward_ignores_case() {
        let catalog = vec![
            LeisureReward::new("Coffee break", 20),
            LeisureReward::new("Movie night", 100),
        ];
        let found = find_reward(&catalog, "movie NIGHT").expect("Should find");
        assert_eq!(found.cost, 100);
        assert!(matches!(
            find_reward(&catalog, "Spa day"),
            Err(EconomyError::RewardNotFound(_))
        ));
    }

    #[test]
    fn test_credit_gold_saturates() {
        let player = Player {
            gold: u64::MAX - 1,
            ..Player::new()
        };
        assert_eq!(credit_gold(player, 10).gold, u64::MAX);
    }
}
