//! Leveling and XP.
//!
//! Leaving level `n` costs `n * 100` XP. XP that overflows a threshold
//! carries into the next level, so a single large award can level up
//! several times.

use serde::{Deserialize, Serialize};

use crate::player::Player;

/// XP cost per level step.
pub const XP_PER_LEVEL: u32 = 100;

/// XP required to advance from `level` to `level + 1`.
///
/// Level 0 is not a valid level and is treated as level 1.
#[must_use]
pub const fn next_level_threshold(level: u32) -> u32 {
    let level = if level == 0 { 1 } else { level };
    level.saturating_mul(XP_PER_LEVEL)
}

/// Level-ups produced by a single XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUps {
    /// Level before the award
    pub from_level: u32,
    /// Number of levels gained
    pub count: u32,
}

impl LevelUps {
    /// True if no level was gained.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Each newly reached level, in order.
    pub fn new_levels(&self) -> impl Iterator<Item = u32> {
        let from_level = self.from_level;
        (1..=self.count).map(move |step| from_level.saturating_add(step))
    }
}

/// Adds XP to a player and applies every level-up it pays for.
///
/// An award of 0 leaves the player untouched.
#[must_use]
pub fn apply_xp(mut player: Player, xp_delta: u32) -> (Player, LevelUps) {
    player.level = player.level.max(1);
    let from_level = player.level;

    if xp_delta == 0 {
        return (
            player,
            LevelUps {
                from_level,
                count: 0,
            },
        );
    }

    player.xp = player.xp.saturating_add(xp_delta);

    let mut count = 0;
    while player.level < u32::MAX {
        let threshold = next_level_threshold(player.level);
        if player.xp < threshold {
            break;
        }
        player.xp -= threshold;
        player.level += 1;
        count += 1;
    }

    (player, LevelUps { from_level, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player_at(level: u32, xp: u32) -> Player {
        Player {
            level,
            xp,
            ..Player::new()
        }
    }

    #[test]
    fn test_threshold_scales_with_level() {
        assert_eq!(next_level_threshold(1), 100);
        assert_eq!(next_level_threshold(2), 200);
        assert_eq!(next_level_threshold(7), 700);
        assert_eq!(next_level_threshold(0), 100);
    }

    #[test]
    fn test_exact_threshold_levels_up_with_zero_remainder() {
        for level in 1..20 {
            let (player, ups) = apply_xp(player_at(level, 0), next_level_threshold(level));
            assert_eq!(player.level, level + 1);
            assert_eq!(player.xp, 0);
            assert_eq!(ups.count, 1);
        }
    }

    #[test]
    fn test_below_threshold_only_accumulates() {
        let (player, ups) = apply_xp(player_at(1, 20), 50);
        assert_eq!(player.level, 1);
        assert_eq!(player.xp, 70);
        assert!(ups.is_empty());
    }

    #[test]
    fn test_large_award_stops_when_next_threshold_not_met() {
        // 250 pays for level 1 (100); the remaining 150 is short of level 2's 200.
        let (player, ups) = apply_xp(player_at(1, 0), 250);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 150);
        assert_eq!(ups.count, 1);
    }

    #[test]
    fn test_multiple_level_ups_in_one_award() {
        // 100 + 200 + 300 = 600, plus 50 remainder
        let (player, ups) = apply_xp(player_at(1, 0), 650);
        assert_eq!(player.level, 4);
        assert_eq!(player.xp, 50);
        assert_eq!(ups.count, 3);
        assert_eq!(ups.new_levels().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_award_is_noop() {
        let before = player_at(4, 33);
        let (after, ups) = apply_xp(before.clone(), 0);
        assert_eq!(after, before);
        assert!(ups.is_empty());
        assert_eq!(ups.new_levels().count(), 0);
    }

    /// XP spent reaching `level` from level 1.
    fn banked_xp(level: u32) -> u64 {
        (1..level).map(|l| u64::from(next_level_threshold(l))).sum()
    }

    proptest! {
        #[test]
        fn prop_xp_stays_below_threshold(
            level in 1u32..200,
            xp_frac in 0u32..100,
            delta in 0u32..100_000,
        ) {
            let start_xp = next_level_threshold(level) * xp_frac / 100;
            let (player, ups) = apply_xp(player_at(level, start_xp), delta);
            prop_assert!(player.xp < next_level_threshold(player.level));
            prop_assert_eq!(player.level, level + ups.count);
        }

        #[test]
        fn prop_total_xp_is_conserved(level in 1u32..50, delta in 0u32..50_000) {
            let total_before = banked_xp(level);
            let (player, _) = apply_xp(player_at(level, 0), delta);
            let total_after = banked_xp(player.level) + u64::from(player.xp);
            prop_assert_eq!(total_after, total_before + u64::from(delta));
        }
    }
}
