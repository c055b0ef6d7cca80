//! Core game state and logic

use crate::board::{Board, Offset};
use crate::clock::PausableClock;
use crate::piece::Piece;
use crate::score::{Score, LOCK_BONUS};
use crate::tetromino::PieceKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Where every new piece enters the board
pub const SPAWN_OFFSET: Offset = Offset::new(3, 0);

/// How long the game over screen lingers before the session ends
const GAME_OVER_LINGER: Duration = Duration::from_secs(2);

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateLeft,
    RotateRight,
    Hold,
    Pause,
}

/// Reported by [`Game::update`] when the session is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The game over linger expired; the game has already reset itself
    Finished { score: u64 },
}

/// Outcome of a single lock-in
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub lines_cleared: u32,
    pub points: u64,
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Current falling piece
    pub current: Piece,
    /// Top-left of the current piece's mask
    pub position: Offset,
    /// Piece that spawns after the current one locks
    pub next: Piece,
    /// Held piece, if any
    pub held: Option<PieceKind>,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// Gravity timer; after game over it times the linger instead
    tick: PausableClock,
    /// Piece and bonus randomness
    rng: ChaCha8Rng,
}

impl Game {
    /// Create a new game seeded from the OS
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a new game with a fixed seed for a reproducible sequence
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let current = Piece::random(&mut rng);
        let next = Piece::random(&mut rng);
        tracing::debug!(seed, "new game");

        Self {
            board: Board::new(),
            current,
            position: SPAWN_OFFSET,
            next,
            held: None,
            score: Score::new(),
            state: GameState::Playing,
            tick: PausableClock::new(),
            rng,
        }
    }

    /// Start a fresh session, keeping the random stream
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current = Piece::random(&mut self.rng);
        self.next = Piece::random(&mut self.rng);
        self.position = SPAWN_OFFSET;
        self.held = None;
        self.score = Score::new();
        self.state = GameState::Playing;
        self.tick = PausableClock::new();
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) {
        match self.state {
            GameState::GameOver => {}
            GameState::Paused => {
                if action == Action::Pause {
                    self.toggle_pause();
                }
            }
            GameState::Playing => match action {
                Action::MoveLeft => self.shift(-1),
                Action::MoveRight => self.shift(1),
                Action::SoftDrop => self.soft_drop(),
                Action::HardDrop => {
                    self.hard_drop();
                }
                Action::RotateLeft => self.rotate(Piece::rotate_left, Piece::rotate_right),
                Action::RotateRight => self.rotate(Piece::rotate_right, Piece::rotate_left),
                Action::Hold => self.hold(),
                Action::Pause => self.toggle_pause(),
            },
        }
    }

    /// Advance time by `delta` (call every frame)
    pub fn update(&mut self, delta: Duration) -> Option<GameEvent> {
        self.tick.advance(delta);

        match self.state {
            GameState::GameOver => {
                if self.tick.elapsed() >= GAME_OVER_LINGER {
                    let score = self.score.points;
                    tracing::info!(score, "game finished");
                    self.reset();
                    return Some(GameEvent::Finished { score });
                }
            }
            GameState::Playing => {
                if self.tick.elapsed() >= self.score.fall_speed() {
                    self.soft_drop();
                    self.tick.restart();
                }
            }
            GameState::Paused => {}
        }
        None
    }

    /// Check the current piece at an arbitrary offset
    fn fits_at(&self, piece: &Piece, offset: Offset) -> bool {
        self.board.is_placement_valid(piece.mask(), offset)
    }

    fn current_fits(&self) -> bool {
        self.fits_at(&self.current, self.position)
    }

    fn shift(&mut self, dx: i32) {
        self.position.x += dx;
        if !self.current_fits() {
            self.position.x -= dx;
        }
    }

    fn rotate(&mut self, turn: fn(&mut Piece), undo: fn(&mut Piece)) {
        turn(&mut self.current);
        if !self.current_fits() {
            undo(&mut self.current);
        }
    }

    /// Move down one row, locking the piece if it cannot move
    fn soft_drop(&mut self) {
        self.position.y += 1;
        if !self.current_fits() {
            self.position.y -= 1;
            self.lock_in();
        }
    }

    /// Drop straight to the resting row and lock
    fn hard_drop(&mut self) -> LockReport {
        self.position = self.landing_offset();
        self.lock_in()
    }

    /// Lowest valid offset below the current piece in its column
    pub fn landing_offset(&self) -> Offset {
        let mut landing = self.position;
        while self.fits_at(&self.current, Offset::new(landing.x, landing.y + 1)) {
            landing.y += 1;
        }
        landing
    }

    fn hold(&mut self) {
        match self.held {
            None => {
                // The queued piece takes over at the current offset
                if !self.fits_at(&self.next, self.position) {
                    return;
                }
                self.held = Some(self.current.kind);
                self.current = std::mem::replace(&mut self.next, Piece::random(&mut self.rng));
            }
            Some(kind) => {
                let previous = std::mem::replace(&mut self.current, Piece::new(kind));
                if self.current_fits() {
                    self.held = Some(previous.kind);
                } else {
                    self.current = previous;
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        self.tick.toggle_pause();
        self.state = match self.state {
            GameState::Paused => GameState::Playing,
            _ => GameState::Paused,
        };
    }

    /// Write the current piece into the board and bring in the next one
    fn lock_in(&mut self) -> LockReport {
        self.board
            .stamp(self.current.mask(), self.position, self.current.color());

        let lines_cleared = self.board.clear_completed_rows() as u32;
        let bonus = self.rng.gen_range(LOCK_BONUS);
        let points = self.score.add_lock(lines_cleared, bonus);
        self.tick.restart();

        tracing::debug!(
            kind = ?self.current.kind,
            x = self.position.x,
            y = self.position.y,
            lines_cleared,
            points,
            "piece locked"
        );

        let next = Piece::random(&mut self.rng);
        self.current = std::mem::replace(&mut self.next, next);
        self.position = SPAWN_OFFSET;

        // Check for top out
        if !self.current_fits() {
            tracing::info!(score = self.score.points, lines = self.score.lines, "game over");
            self.state = GameState::GameOver;
        }

        LockReport {
            lines_cleared,
            points,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
