//! Opponent move selection and the background worker that runs it.
//!
//! A [`MoveChooser`] gets an owned snapshot of the game and the legal moves
//! for it, and either picks one or abstains. [`SearchWorker`] runs a chooser
//! on its own thread so the caller's loop never blocks on it; the caller
//! polls for the answer and can cancel a search whose position no longer
//! applies.

use crate::GameState;
use chess_core::Move;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the search worker.
#[derive(Debug, Error)]
pub enum ChooserError {
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] io::Error),

    /// The worker thread exited without answering, usually a panic in the chooser.
    #[error("search thread exited without an answer")]
    Disconnected,

    #[error("search result was already taken")]
    AlreadyTaken,
}

/// Picks a move for the side to move.
pub trait MoveChooser: Send + 'static {
    /// Returns one of `moves`, or `None` to signal "no preference".
    fn choose(&mut self, game: &GameState, moves: &[Move]) -> Option<Move>;
}

impl<C: MoveChooser + ?Sized> MoveChooser for Box<C> {
    fn choose(&mut self, game: &GameState, moves: &[Move]) -> Option<Move> {
        (**self).choose(game, moves)
    }
}

/// Uniformly random choice from the legal moves. Returns `None` only if `moves` is empty.
pub fn random_move<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

/// Chooses uniformly at random.
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn new() -> Self {
        RandomChooser {
            rng: StdRng::from_entropy(),
        }
    }

    /// A chooser that makes the same choices for the same seed.
    pub fn seeded(seed: u64) -> Self {
        RandomChooser {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveChooser for RandomChooser {
    fn choose(&mut self, _game: &GameState, moves: &[Move]) -> Option<Move> {
        random_move(moves, &mut self.rng)
    }
}

/// Never has a preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct Abstain;

impl MoveChooser for Abstain {
    fn choose(&mut self, _game: &GameState, _moves: &[Move]) -> Option<Move> {
        None
    }
}

/// What a poll of [`SearchWorker`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPoll {
    /// No answer yet.
    Thinking,
    /// The chooser picked this move from the supplied list.
    Chose(Move),
    /// The chooser abstained, or answered with a move outside the list.
    NoMove,
    /// [`SearchWorker::cancel`] was called; any answer is ignored.
    Cancelled,
}

/// A one-shot search running on its own thread.
///
/// The worker owns its snapshot and move list. It never joins on drop or on
/// cancel; a cancelled thread finishes on its own and its answer is dropped.
pub struct SearchWorker {
    rx: Receiver<Option<Move>>,
    moves: Vec<Move>,
    cancelled: Arc<AtomicBool>,
    taken: bool,
}

impl SearchWorker {
    /// Starts `chooser` on a snapshot of the game and its legal moves.
    pub fn spawn<C: MoveChooser>(
        mut chooser: C,
        game: GameState,
        moves: Vec<Move>,
    ) -> Result<Self, ChooserError> {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let worker_moves = moves.clone();
        let ply = game.move_log().len();

        thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || {
                let choice = chooser.choose(&game, &worker_moves);
                if flag.load(Ordering::Acquire) {
                    debug!(ply, "search finished after cancel, dropping answer");
                    return;
                }
                // Receiver gone means the worker handle was dropped.
                let _ = tx.send(choice);
            })?;

        debug!(ply, moves = moves.len(), "search worker spawned");
        Ok(SearchWorker {
            rx,
            moves,
            cancelled,
            taken: false,
        })
    }

    /// Checks for an answer without blocking.
    pub fn try_result(&mut self) -> Result<WorkerPoll, ChooserError> {
        if self.is_cancelled() {
            return Ok(WorkerPoll::Cancelled);
        }
        if self.taken {
            return Err(ChooserError::AlreadyTaken);
        }
        match self.rx.try_recv() {
            Ok(choice) => Ok(self.accept(choice)),
            Err(TryRecvError::Empty) => Ok(WorkerPoll::Thinking),
            Err(TryRecvError::Disconnected) => Err(ChooserError::Disconnected),
        }
    }

    /// Blocks until the worker answers.
    pub fn wait(mut self) -> Result<WorkerPoll, ChooserError> {
        if self.is_cancelled() {
            return Ok(WorkerPoll::Cancelled);
        }
        if self.taken {
            return Err(ChooserError::AlreadyTaken);
        }
        let choice = self.rx.recv().map_err(|_| ChooserError::Disconnected)?;
        Ok(self.accept(choice))
    }

    fn accept(&mut self, choice: Option<Move>) -> WorkerPoll {
        self.taken = true;
        let Some(chosen) = choice else {
            debug!("chooser abstained");
            return WorkerPoll::NoMove;
        };
        match self.moves.iter().find(|m| **m == chosen) {
            Some(m) => {
                debug!(mv = %m, "chooser answered");
                WorkerPoll::Chose(*m)
            }
            None => {
                warn!(mv = %chosen, "chooser answered with a move outside the legal list");
                WorkerPoll::NoMove
            }
        }
    }

    /// Stops waiting for this search. Later polls report [`WorkerPoll::Cancelled`].
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            debug!("search worker cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Color, ColoredPiece, Piece, Square};
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    struct Fixed(Move);

    impl MoveChooser for Fixed {
        fn choose(&mut self, _game: &GameState, _moves: &[Move]) -> Option<Move> {
            Some(self.0)
        }
    }

    /// Waits for a go signal before answering.
    struct Gated {
        go: Receiver<()>,
    }

    impl Gated {
        fn new() -> (Self, Sender<()>) {
            let (tx, rx) = mpsc::channel();
            (Gated { go: rx }, tx)
        }
    }

    impl MoveChooser for Gated {
        fn choose(&mut self, _game: &GameState, moves: &[Move]) -> Option<Move> {
            let _ = self.go.recv();
            moves.first().copied()
        }
    }

    fn start() -> (GameState, Vec<Move>) {
        let game = GameState::new();
        let moves = game.legal_moves().into_vec();
        (game, moves)
    }

    fn poll_until_done(worker: &mut SearchWorker) -> WorkerPoll {
        loop {
            match worker.try_result().unwrap() {
                WorkerPoll::Thinking => thread::sleep(Duration::from_millis(1)),
                other => return other,
            }
        }
    }

    #[test]
    fn random_move_picks_from_list() {
        let (_, moves) = start();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let m = random_move(&moves, &mut rng).unwrap();
            assert!(moves.contains(&m));
        }
        assert_eq!(random_move(&[], &mut rng), None);
    }

    #[test]
    fn seeded_chooser_is_deterministic() {
        let (game, moves) = start();
        let mut a = RandomChooser::seeded(42);
        let mut b = RandomChooser::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.choose(&game, &moves), b.choose(&game, &moves));
        }
    }

    #[test]
    fn worker_returns_chosen_move() {
        let (game, moves) = start();
        let mut worker = SearchWorker::spawn(RandomChooser::seeded(1), game, moves.clone()).unwrap();
        match poll_until_done(&mut worker) {
            WorkerPoll::Chose(m) => assert!(moves.contains(&m)),
            other => panic!("unexpected poll result {:?}", other),
        }
        assert!(matches!(worker.try_result(), Err(ChooserError::AlreadyTaken)));
    }

    #[test]
    fn boxed_chooser_runs_on_worker() {
        let (game, moves) = start();
        let chooser: Box<dyn MoveChooser> = Box::new(Fixed(moves[3]));
        let worker = SearchWorker::spawn(chooser, game, moves.clone()).unwrap();
        assert_eq!(worker.wait().unwrap(), WorkerPoll::Chose(moves[3]));
    }

    #[test]
    fn worker_reports_abstention() {
        let (game, moves) = start();
        let worker = SearchWorker::spawn(Abstain, game, moves).unwrap();
        assert_eq!(worker.wait().unwrap(), WorkerPoll::NoMove);
    }

    #[test]
    fn move_outside_list_is_discarded() {
        let (game, moves) = start();
        let bogus = Move::new(
            Square::new(6, 4),
            Square::new(3, 4),
            ColoredPiece::new(Color::White, Piece::Pawn),
            None,
        );
        let worker = SearchWorker::spawn(Fixed(bogus), game, moves).unwrap();
        assert_eq!(worker.wait().unwrap(), WorkerPoll::NoMove);
    }

    #[test]
    fn thinking_until_chooser_answers() {
        let (game, moves) = start();
        let (chooser, go) = Gated::new();
        let mut worker = SearchWorker::spawn(chooser, game, moves.clone()).unwrap();
        assert_eq!(worker.try_result().unwrap(), WorkerPoll::Thinking);
        go.send(()).unwrap();
        assert_eq!(poll_until_done(&mut worker), WorkerPoll::Chose(moves[0]));
    }

    #[test]
    fn cancel_suppresses_answer() {
        let (game, moves) = start();
        let (chooser, go) = Gated::new();
        let mut worker = SearchWorker::spawn(chooser, game, moves).unwrap();
        worker.cancel();
        assert!(worker.is_cancelled());
        go.send(()).unwrap();
        assert_eq!(worker.try_result().unwrap(), WorkerPoll::Cancelled);
        assert_eq!(worker.wait().unwrap(), WorkerPoll::Cancelled);
    }

    #[test]
    fn worker_snapshot_is_independent() {
        let mut game = GameState::new();
        let moves = game.legal_moves().into_vec();
        let (chooser, go) = Gated::new();
        let worker = SearchWorker::spawn(chooser, game.snapshot(), moves.clone()).unwrap();
        game.make_move_notation("e2e4").unwrap();
        game.undo_move();
        go.send(()).unwrap();
        assert_eq!(worker.wait().unwrap(), WorkerPoll::Chose(moves[0]));
    }
}
