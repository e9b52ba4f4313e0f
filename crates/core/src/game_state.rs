//! Game state module - the session object driving one game
//!
//! `GameState` owns the board, the active and next piece, the counters and
//! both timers. It moves through [`Phase::Start`] → [`Phase::Playing`] ⇄
//! [`Phase::Clearing`] → [`Phase::Over`]. Hosts feed it discrete
//! [`GameAction`]s and elapsed time; renderers read a [`GameSnapshot`].

use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::{Board, LockOutcome, RowList};
use crate::config::GameConfig;
use crate::events::{GameEvent, EVENT_CAPACITY};
use crate::pieces::{try_rotate, Piece};
use crate::rng::PieceQueue;
use crate::scoring::{drop_score, level_for_lines, line_clear_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::timers::Timers;
use crate::types::{GameAction, Phase, PieceKind};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Piece>,
    next: Option<PieceKind>,
    queue: PieceQueue,
    phase: Phase,
    /// Monotonic game id (increments on every begin).
    episode_id: u32,
    score: u32,
    level: u32,
    lines: u32,
    best_score: u32,
    /// Best score raised since the last `NewBest` event.
    best_dirty: bool,
    /// Rows captured at lock time, removed when the clear delay expires.
    clearing: RowList,
    timers: Timers,
    events: ArrayVec<GameEvent, EVENT_CAPACITY>,
}

impl GameState {
    /// Create a game sitting on the start screen
    pub fn new(config: GameConfig) -> Self {
        Self {
            queue: PieceQueue::new(config.seed, config.randomizer),
            config,
            board: Board::new(),
            active: None,
            next: None,
            phase: Phase::Start,
            episode_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            best_score: 0,
            best_dirty: false,
            clearing: RowList::new(),
            timers: Timers::new(),
            events: ArrayVec::new(),
        }
    }

    /// Seed the best score loaded by the host.
    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = best;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_kind(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scripted scenarios.
    ///
    /// Nothing re-checks the active piece against the new cells, so callers
    /// normally follow up with [`GameState::force_spawn`].
    #[cfg(any(test, feature = "testing"))]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Rows waiting to be removed (bottom to top); empty outside `Clearing`.
    pub fn clearing_rows(&self) -> &[usize] {
        &self.clearing
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Current gravity period
    pub fn gravity_interval_ms(&self) -> u32 {
        self.config.gravity.interval_ms(self.level)
    }

    /// Take all buffered events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: GameEvent) {
        let _ = self.events.try_push(event);
    }

    /// Begin a game if on the start screen or after game over.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Start | Phase::Over => {
                self.begin();
                true
            }
            Phase::Playing | Phase::Clearing => false,
        }
    }

    /// Fresh board, zeroed counters, new pieces, `Playing`.
    fn begin(&mut self) {
        self.board.clear();
        self.active = None;
        self.clearing.clear();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.best_dirty = false;
        // Only one gravity driver exists; a new game always restarts it.
        self.timers.reset();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.phase = Phase::Playing;

        self.next = Some(self.queue.draw());
        self.emit(GameEvent::Started {
            episode: self.episode_id,
        });
        debug!(episode = self.episode_id, "game started");
        self.spawn_next();
    }

    /// Promote the next piece to active and draw a new next piece.
    ///
    /// Returns false (and ends the game) if the spawned piece is blocked.
    fn spawn_next(&mut self) -> bool {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.queue.draw(),
        };
        self.next = Some(self.queue.draw());
        self.spawn_kind(kind)
    }

    fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        let piece = Piece::spawn(kind);
        if !self.board.is_legal(&piece.shape, piece.x, piece.y) {
            debug!(kind = kind.as_str(), "spawn blocked");
            self.game_over();
            return false;
        }
        self.active = Some(piece);
        self.phase = Phase::Playing;
        true
    }

    /// Replace the active piece with a fresh spawn of `kind`.
    ///
    /// Follows the normal spawn rule: a blocked spawn ends the game. Only
    /// honored while playing.
    #[cfg(any(test, feature = "testing"))]
    pub fn force_spawn(&mut self, kind: PieceKind) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.spawn_kind(kind)
    }

    /// Choose the kind that will spawn after the active piece.
    #[cfg(any(test, feature = "testing"))]
    pub fn set_next(&mut self, kind: PieceKind) {
        self.next = Some(kind);
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.shifted(dx, dy);
        if self.board.is_legal(&moved.shape, moved.x, moved.y) {
            self.active = Some(moved);
            return true;
        }

        false
    }

    /// Try to rotate the active piece with wall kicks
    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        match try_rotate(&active, clockwise, |shape, x, y| board.is_legal(shape, x, y)) {
            Some((rotated, _kick)) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Move down one row for a point; restarts the gravity timer.
    pub fn soft_drop(&mut self) -> bool {
        if !self.try_move(0, 1) {
            return false;
        }
        self.add_score(drop_score(1, false));
        self.timers.restart_gravity();
        true
    }

    /// Drop to the lowest legal row, two points per row, then lock.
    ///
    /// Returns the number of rows descended.
    pub fn hard_drop(&mut self) -> Option<u32> {
        if self.phase != Phase::Playing {
            return None;
        }
        let active = self.active?;

        let distance = self.drop_distance(&active);
        self.active = Some(active.shifted(0, distance as i8));
        self.add_score(drop_score(distance, true));
        self.lock_active();
        Some(distance)
    }

    fn drop_distance(&self, piece: &Piece) -> u32 {
        let mut distance: i8 = 0;
        while self
            .board
            .is_legal(&piece.shape, piece.x, piece.y + distance + 1)
        {
            distance += 1;
        }
        distance as u32
    }

    /// Row the active piece would land on (for ghost rendering)
    pub fn ghost_y(&self) -> Option<i8> {
        if self.phase != Phase::Playing {
            return None;
        }
        let active = self.active?;
        Some(active.y + self.drop_distance(&active) as i8)
    }

    /// One gravity step: fall a row, or lock if blocked.
    pub fn gravity_step(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        if !self.try_move(0, 1) {
            self.lock_active();
        }
    }

    /// Stamp the active piece and run line detection.
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let outcome = self.board.lock(&piece.shape, piece.x, piece.y, piece.kind);
        self.emit(GameEvent::Locked { kind: piece.kind });

        if outcome == LockOutcome::Overflow {
            debug!(kind = piece.kind.as_str(), "locked above the board");
            self.game_over();
            return;
        }

        let full = self.board.full_rows();
        if full.is_empty() {
            self.flush_best();
            self.spawn_next();
        } else {
            debug!(rows = ?full.as_slice(), "rows full, clearing");
            self.clearing = full;
            self.timers.start_clear(self.config.line_clear_delay_ms);
            self.phase = Phase::Clearing;
            self.flush_best();
        }
    }

    /// Commit the pending line clear once the blink delay is over.
    fn finish_clear(&mut self) {
        let removed = self.board.compact(&self.clearing) as u32;
        self.clearing.clear();

        let points = line_clear_score(removed as usize, self.level);
        self.add_score(points);
        self.lines += removed;
        self.emit(GameEvent::LinesCleared {
            count: removed,
            points,
        });

        let level = level_for_lines(self.lines);
        if level != self.level {
            self.level = level;
            self.timers.restart_gravity();
            self.emit(GameEvent::LevelUp { level });
            debug!(
                level,
                gravity_ms = self.gravity_interval_ms(),
                "level up"
            );
        }

        self.flush_best();
        self.phase = Phase::Playing;
        self.spawn_next();
    }

    fn game_over(&mut self) {
        self.phase = Phase::Over;
        self.active = None;
        self.clearing.clear();
        self.timers.reset();
        self.flush_best();
        self.emit(GameEvent::GameOver { score: self.score });
        debug!(score = self.score, lines = self.lines, "game over");
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.best_score {
            self.best_score = self.score;
            self.best_dirty = true;
        }
    }

    fn flush_best(&mut self) {
        if self.best_dirty {
            self.best_dirty = false;
            self.emit(GameEvent::NewBest {
                score: self.best_score,
            });
        }
    }

    /// Advance the session clock by `elapsed_ms`.
    ///
    /// While playing, gravity fires once per elapsed period; while clearing,
    /// the blink delay counts down and then the clear is committed.
    /// Returns true if the board or active piece changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase {
            Phase::Playing => {
                self.timers.accumulate_gravity(elapsed_ms);
                let mut changed = false;
                while self.phase == Phase::Playing
                    && self.timers.take_gravity_step(self.gravity_interval_ms())
                {
                    self.gravity_step();
                    changed = true;
                }
                changed
            }
            Phase::Clearing => {
                if self.timers.advance_clear(elapsed_ms) {
                    self.finish_clear();
                    true
                } else {
                    false
                }
            }
            Phase::Start | Phase::Over => false,
        }
    }

    /// Apply a game action
    ///
    /// Outside of play, `Start`, `HardDrop` and `Restart` begin a new game.
    /// `Restart` also abandons a game in progress. Everything else is only
    /// honored while playing; rejected actions return false.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match (self.phase, action) {
            (Phase::Start | Phase::Over, GameAction::Start | GameAction::HardDrop) => {
                self.start()
            }
            (_, GameAction::Restart) => {
                debug!(from = self.phase.as_str(), score = self.score, "restart");
                self.begin();
                true
            }
            (Phase::Playing, GameAction::MoveLeft) => self.try_move(-1, 0),
            (Phase::Playing, GameAction::MoveRight) => self.try_move(1, 0),
            (Phase::Playing, GameAction::SoftDrop) => self.soft_drop(),
            (Phase::Playing, GameAction::HardDrop) => self.hard_drop().is_some(),
            (Phase::Playing, GameAction::RotateCw) => self.try_rotate(true),
            (Phase::Playing, GameAction::RotateCcw) => self.try_rotate(false),
            _ => false,
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = match self.phase {
            Phase::Playing => self.active.map(ActiveSnapshot::from),
            _ => None,
        };
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.best_score = self.best_score;
        out.clearing_rows = [false; crate::types::BOARD_HEIGHT as usize];
        for &y in self.clearing.iter() {
            out.clearing_rows[y] = true;
        }
        out.clear_progress = if self.phase == Phase::Clearing {
            self.timers.clear_progress()
        } else {
            0.0
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
