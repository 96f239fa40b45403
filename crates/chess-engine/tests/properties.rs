//! Property tests over random playouts from the starting position.

use chess_engine::{analyze, GameState};
use proptest::prelude::*;

/// Plays up to `choices.len()` moves, picking each by index into the legal list.
/// Returns the game and a snapshot taken before every move.
fn playout(choices: &[usize]) -> (GameState, Vec<GameState>) {
    let mut game = GameState::new();
    let mut history = Vec::new();
    for &choice in choices {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        history.push(game.snapshot());
        game.make_move(moves[choice % moves.len()]);
    }
    (game, history)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn legal_moves_never_leave_own_king_attacked(
        choices in prop::collection::vec(any::<usize>(), 0..40)
    ) {
        let (mut game, _) = playout(&choices);
        let mover = game.side_to_move();
        for m in game.legal_moves().iter() {
            game.make_move(*m);
            let king = game.king_square(mover);
            prop_assert!(
                !analyze(game.board(), king, mover).in_check,
                "{} leaves the {} king attacked on\n{}",
                m,
                mover,
                game.board()
            );
            game.undo_move();
        }
    }

    #[test]
    fn make_then_undo_restores_position(
        choices in prop::collection::vec(any::<usize>(), 0..40)
    ) {
        let (mut game, _) = playout(&choices);
        let before = game.snapshot();
        for m in game.legal_moves().iter() {
            game.make_move(*m);
            game.undo_move();
            prop_assert_eq!(&game, &before);
        }
    }

    #[test]
    fn chained_undo_retraces_every_position(
        choices in prop::collection::vec(any::<usize>(), 0..60)
    ) {
        let (mut game, history) = playout(&choices);
        for expected in history.iter().rev() {
            game.undo_move();
            prop_assert_eq!(&game, expected);
        }
        prop_assert_eq!(game, GameState::new());
    }

    #[test]
    fn kings_tracked_through_playout(
        choices in prop::collection::vec(any::<usize>(), 0..60)
    ) {
        let (game, _) = playout(&choices);
        for color in [chess_core::Color::White, chess_core::Color::Black] {
            prop_assert_eq!(game.board().find_king(color), Some(game.king_square(color)));
        }
    }

    #[test]
    fn terminal_flags_match_move_count(
        choices in prop::collection::vec(any::<usize>(), 0..80)
    ) {
        let (mut game, _) = playout(&choices);
        let moves = game.get_valid_moves();
        let in_check = game.in_check();
        prop_assert_eq!(game.checkmate(), moves.is_empty() && in_check);
        prop_assert_eq!(game.stalemate(), moves.is_empty() && !in_check);
    }
}
