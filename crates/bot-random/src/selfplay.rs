//! The self-play loop.
//!
//! Each turn hands a snapshot and the legal moves to a [`SearchWorker`] and
//! polls it, the way an interactive front end would between frames. An
//! abstaining or misbehaving chooser falls back to a random legal move so the
//! game never stalls.

use crate::config::{ChooserKind, SelfPlayConfig};
use anyhow::Context;
use chess_core::Color;
use chess_engine::{
    random_move, Abstain, GameState, MoveChooser, RandomChooser, SearchWorker, WorkerPoll,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// How a self-play game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    PlyLimit,
}

fn make_chooser(kind: ChooserKind, seed: Option<u64>, turn: u64) -> Box<dyn MoveChooser> {
    match kind {
        ChooserKind::Random => match seed {
            Some(seed) => Box::new(RandomChooser::seeded(seed.wrapping_add(turn))),
            None => Box::new(RandomChooser::new()),
        },
        ChooserKind::Abstain => Box::new(Abstain),
    }
}

/// Plays one game and returns the final position with its outcome.
pub fn play(config: &SelfPlayConfig) -> anyhow::Result<(GameState, Outcome)> {
    let mut game = GameState::new();
    let mut fallback = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let mut turn: u64 = 0;

    loop {
        let moves = game.get_valid_moves();
        if game.checkmate() {
            let winner = game.side_to_move().opposite();
            info!(plies = game.move_log().len(), %winner, "checkmate");
            return Ok((game, Outcome::Checkmate { winner }));
        }
        if game.stalemate() {
            info!(plies = game.move_log().len(), "stalemate");
            return Ok((game, Outcome::Stalemate));
        }
        if game.move_log().len() >= config.max_plies as usize {
            info!(plies = game.move_log().len(), "ply limit reached");
            return Ok((game, Outcome::PlyLimit));
        }

        turn += 1;
        let kind = config.chooser_for(game.white_to_move());
        let chooser = make_chooser(kind, config.seed, turn);
        let mut worker = SearchWorker::spawn(chooser, game.snapshot(), moves.as_slice().to_vec())?;

        let takeback = config
            .takeback_every
            .is_some_and(|n| turn % u64::from(n) == 0);
        if takeback && !game.move_log().is_empty() {
            // Position changes under the search; its answer no longer applies.
            worker.cancel();
            game.undo_move();
            debug!(turn, plies = game.move_log().len(), "took back a move");
            continue;
        }

        let chosen = loop {
            match worker.try_result()? {
                WorkerPoll::Thinking => thread::sleep(poll_interval),
                WorkerPoll::Chose(m) => break Some(m),
                WorkerPoll::NoMove | WorkerPoll::Cancelled => break None,
            }
        };
        let m = match chosen {
            Some(m) => m,
            None => {
                debug!(turn, "no move from chooser, falling back to random");
                random_move(moves.as_slice(), &mut fallback)
                    .context("no legal moves in a non-terminal position")?
            }
        };

        game.make_move(m);
        info!(ply = game.move_log().len(), side = %m.piece_moved.color, mv = %m, "played");
    }
}
