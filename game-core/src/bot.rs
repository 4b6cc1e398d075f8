//! Move selection for automated players.
//!
//! The shipped policy is a uniform random pick among the legal candidates:
//! no lookahead and no preference for words that leave opponents stuck.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::Game;

pub struct RandomBot;

impl RandomBot {
    pub fn choose_move<'a, R: Rng + ?Sized>(
        candidates: &[&'a str],
        rng: &mut R,
    ) -> Option<&'a str> {
        candidates.choose(rng).copied()
    }

    /// Picks a word for the player currently on turn, `None` when they are stuck.
    pub fn select_move<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Option<String> {
        let player = game.state.current_player()?;
        let candidates = game.legal_candidates(Some(&player.id));
        Self::choose_move(&candidates, rng).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_choose_from_empty_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(RandomBot::choose_move(&[], &mut rng).is_none());
    }

    #[test]
    fn test_choice_is_a_candidate_and_covers_all() {
        let candidates = ["tiger", "toad", "tulip"];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let choice = RandomBot::choose_move(&candidates, &mut rng).unwrap();
            assert!(candidates.contains(&choice));
            seen.insert(choice);
        }
        assert_eq!(seen.len(), candidates.len());
    }

    #[test]
    fn test_same_seed_same_choice() {
        let candidates = ["tiger", "toad", "tulip", "tuba", "twig"];
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(
                RandomBot::choose_move(&candidates, &mut a),
                RandomBot::choose_move(&candidates, &mut b)
            );
        }
    }
}
