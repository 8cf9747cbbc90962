//! Seeded rolls for actor decisions.
//!
//! A mob's generator for a turn is built from the game seed, the turn number
//! and the mob's id alone, so a game started from a fixed seed replays
//! identically whatever order the lighting pass finishes in.
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::entity::EntityId;

/// Generator for every roll `mob` makes on `turn`.
pub fn turn_rng(game_seed: u64, turn: u64, mob: EntityId) -> StdRng {
    let mut seed = <StdRng as SeedableRng>::Seed::default();
    seed[..8].copy_from_slice(&game_seed.to_le_bytes());
    seed[8..16].copy_from_slice(&turn.to_le_bytes());
    seed[16..20].copy_from_slice(&mob.0.to_le_bytes());
    StdRng::from_seed(seed)
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn rolls(game_seed: u64, turn: u64, mob: u32) -> Vec<u32> {
        let mut rng = turn_rng(game_seed, turn, EntityId(mob));
        (0..16).map(|_| rng.gen_range(0..9)).collect()
    }

    #[test]
    fn same_inputs_same_rolls() {
        assert_eq!(rolls(42, 7, 3), rolls(42, 7, 3));
    }

    #[test]
    fn seed_turn_and_mob_each_change_the_rolls() {
        let base = rolls(42, 7, 3);
        assert_ne!(base, rolls(43, 7, 3));
        assert_ne!(base, rolls(42, 8, 3));
        assert_ne!(base, rolls(42, 7, 4));
    }
}
