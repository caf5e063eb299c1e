//! Test suite for the ephemeral transition model
//! Validates the aging, expiration, and turn-order invariants

use ephemeral_ttt::{Cell, EphemeralGame, Lifespans, Player};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn game(grid_size: usize, lifespan_x: u32, lifespan_o: u32) -> EphemeralGame {
    EphemeralGame::new(grid_size, Lifespans::new(lifespan_x, lifespan_o).unwrap()).unwrap()
}

mod age_invariants {
    use super::*;

    #[test]
    fn test_no_piece_outlives_its_lifespan() {
        // Random play; after every successful step each occupied cell's age
        // must be strictly below its owner's lifespan.
        let lifespans = Lifespans::new(3, 5).unwrap();
        let mut game = EphemeralGame::new(3, lifespans).unwrap().with_seed(7);
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..50 {
            game.reset(None);
            for _ in 0..20 {
                let legal = game.legal_actions();
                if legal.is_empty() {
                    break;
                }
                let coord = legal[rng.random_range(0..legal.len())];
                let (snap, _, done) = game.step(coord).unwrap();
                for (i, owner) in snap.owners.iter().enumerate() {
                    match owner {
                        Some(player) => {
                            assert!(snap.ages[i] < lifespans.for_player(*player));
                            assert_eq!(snap.cells[i], player.to_cell());
                        }
                        None => {
                            assert_eq!(snap.ages[i], 0);
                            assert_eq!(snap.cells[i], Cell::Empty);
                        }
                    }
                }
                if done {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_lifespan_two_piece_expires_after_two_further_moves() {
        let mut game = game(3, 2, 2);
        game.reset(Some(Player::X));

        game.step((0, 0)).unwrap();
        let (snap, _, _) = game.step((1, 1)).unwrap();
        assert_eq!(snap.cells[0], Cell::X);
        assert_eq!(snap.ages[0], 1);

        let (snap, _, _) = game.step((2, 2)).unwrap();
        assert_eq!(snap.cells[0], Cell::Empty);
        assert!(game.legal_actions().contains(&(0, 0)));
    }

    #[test]
    fn test_asymmetric_lifespans_expire_independently() {
        let mut game = game(3, 2, 6);
        game.reset(Some(Player::X));

        game.step((0, 0)).unwrap(); // X
        game.step((1, 1)).unwrap(); // O
        let (snap, _, _) = game.step((2, 2)).unwrap(); // X's first piece expires

        assert_eq!(snap.cells[0], Cell::Empty);
        assert_eq!(snap.cells[4], Cell::O);
        assert_eq!(snap.ages[4], 1);
    }
}

mod expiration_ordering {
    use super::*;

    #[test]
    fn test_expiration_is_applied_before_placement() {
        // With lifespan 1 the opponent may claim the exact cell the previous
        // piece occupied, because that piece expires during the same turn.
        let mut game = game(3, 1, 1);
        game.reset(Some(Player::X));
        game.step((0, 0)).unwrap();

        let (snap, reward, done) = game.step((0, 0)).unwrap();
        assert_eq!(reward, 0.0);
        assert!(!done);
        assert_eq!(snap.cells[0], Cell::O);
        assert_eq!(snap.occupied_count(), 1);
    }

    #[test]
    fn test_win_denied_when_line_piece_expires_first() {
        // X builds the top row but the first piece expires on the turn
        // before completion, so no line exists.
        let mut game = game(3, 3, 6);
        game.reset(Some(Player::X));
        game.step((0, 0)).unwrap(); // X, expires during move 4
        game.step((2, 2)).unwrap(); // O
        game.step((0, 1)).unwrap(); // X
        game.step((2, 1)).unwrap(); // O
        let (snap, reward, done) = game.step((0, 2)).unwrap(); // X

        assert_eq!(snap.cells[0], Cell::Empty);
        assert_eq!(reward, 0.0);
        assert!(!done);
        assert!(!game.check_win(Player::X));
    }

    #[test]
    fn test_top_row_win_with_ample_lifespans() {
        let mut game = game(3, 6, 6);
        game.reset(Some(Player::X));
        for coord in [(0, 0), (1, 1), (0, 1), (1, 0)] {
            game.step(coord).unwrap();
        }
        let (snap, reward, done) = game.step((0, 2)).unwrap();

        assert_eq!(reward, 1.0);
        assert!(done);
        assert_eq!(snap.to_move, Player::X);
        assert!(game.check_win(Player::X));
    }
}

mod action_legality {
    use super::*;

    #[test]
    fn test_legal_and_occupied_partition_the_grid() {
        let mut game = game(4, 5, 5);
        game.reset(Some(Player::X));
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            let legal = game.legal_actions();
            if legal.is_empty() {
                break;
            }
            let coord = legal[rng.random_range(0..legal.len())];
            let (snap, _, done) = game.step(coord).unwrap();
            assert_eq!(game.legal_actions().len() + snap.occupied_count(), 16);
            if done {
                break;
            }
        }
    }

    #[test]
    fn test_occupied_probe_changes_nothing() {
        let mut game = game(3, 6, 6);
        game.reset(Some(Player::X));
        let (after_move, _, _) = game.step((1, 1)).unwrap();

        for _ in 0..3 {
            let (snap, reward, done) = game.step((1, 1)).unwrap();
            assert_eq!(reward, -0.1);
            assert!(!done);
            assert_eq!(snap, after_move);
        }
        assert_eq!(game.current_player(), Player::O);
    }

    #[test]
    fn test_out_of_bounds_is_an_error_not_a_penalty() {
        let mut game = game(3, 6, 6);
        game.reset(Some(Player::X));
        assert!(game.step((0, 3)).is_err());
        assert!(game.step((3, 0)).is_err());
        assert!(game.step((usize::MAX, 0)).is_err());
        // The failed calls must not have mutated anything
        assert_eq!(game.snapshot().occupied_count(), 0);
        assert_eq!(game.snapshot().move_count, 0);
    }
}

mod determinism {
    use super::*;

    #[test]
    fn test_identical_move_sequences_produce_identical_states() {
        let moves = [(0, 0), (1, 1), (0, 1), (1, 0), (2, 2), (2, 0)];
        let mut a = game(3, 4, 4);
        let mut b = game(3, 4, 4);
        a.reset(Some(Player::X));
        b.reset(Some(Player::X));

        for coord in moves {
            let (snap_a, reward_a, done_a) = a.step(coord).unwrap();
            let (snap_b, reward_b, done_b) = b.step(coord).unwrap();
            assert_eq!(snap_a, snap_b);
            assert_eq!(reward_a, reward_b);
            assert_eq!(done_a, done_b);
        }
    }
}
