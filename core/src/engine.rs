use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Interval between two calls to [`GameState::tick`], in milliseconds.
pub const TICK_INTERVAL_MS: u32 = 1000;

/// Delay before a mismatched selection is turned face down again, in milliseconds.
pub const RESET_DELAY_MS: u32 = 1000;

/// Progress of a pair-matching turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Idle,
    AwaitingSecond(Coord2),
    /// Two mismatched cards are up; nothing is selectable until the reset lands.
    Locked(Coord2, Coord2),
}

impl Default for TurnState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Delayed action the caller must deliver back through [`GameState::complete_reset`].
///
/// Tickets are bound to the game they were issued by, a ticket delivered after
/// a new game has started is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTicket {
    epoch: u64,
    cells: SmallVec<[Coord2; 2]>,
}

impl ResetTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub const fn delay_ms(&self) -> u32 {
        RESET_DELAY_MS
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    Applied,
    /// The ticket belongs to another game or was already applied.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    layout: BoardLayout,
    cells: Array2<CellState>,
    epoch: u64,
    turn: TurnState,
    attempts_left: CellCount,
    correct_count: CellCount,
    total_guesses: Saturating<u32>,
    score: Saturating<u32>,
    elapsed_seconds: Saturating<u32>,
    game_over: bool,
}

impl GameState {
    pub fn new(layout: BoardLayout) -> Self {
        Self::with_epoch(layout, 0)
    }

    pub(crate) fn with_epoch(layout: BoardLayout, epoch: u64) -> Self {
        let size = layout.size();
        let attempts_left = match layout.mode() {
            GameMode::PairMatch => 0,
            GameMode::TargetHunt => layout.total_cells() / 2,
        };
        // a hunt with no attempts to spend is over before it starts
        let game_over = layout.mode() == GameMode::TargetHunt && attempts_left == 0;
        Self {
            layout,
            cells: Array2::default(size.to_nd_index()),
            epoch,
            turn: TurnState::Idle,
            attempts_left,
            correct_count: 0,
            total_guesses: Saturating(0),
            score: Saturating(0),
            elapsed_seconds: Saturating(0),
            game_over,
        }
    }

    /// Validates `config` and deals a fresh board with `generator`.
    pub fn new_game<G: BoardGenerator>(config: &GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        let layout = generator.generate(config)?;
        Ok(Self::new(layout))
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn mode(&self) -> GameMode {
        self.layout.mode()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn target(&self) -> Option<&str> {
        self.layout.target()
    }

    /// State of the card at `coords`, `None` outside the board.
    pub fn cell_at(&self, coords: Coord2) -> Option<CellState> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Symbol of a card that is currently face up.
    pub fn symbol_at(&self, coords: Coord2) -> Option<&str> {
        match self.cell_at(coords) {
            Some(cell) if cell.is_face_up() => Some(self.layout.symbol_at(coords)),
            _ => None,
        }
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn first_selection(&self) -> Option<Coord2> {
        match self.turn {
            TurnState::Idle => None,
            TurnState::AwaitingSecond(first) | TurnState::Locked(first, _) => Some(first),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.turn, TurnState::Locked(..))
    }

    pub fn attempts_left(&self) -> CellCount {
        self.attempts_left
    }

    pub fn correct_count(&self) -> CellCount {
        self.correct_count
    }

    pub fn total_guesses(&self) -> u32 {
        self.total_guesses.0
    }

    pub fn score(&self) -> u32 {
        self.score.0
    }

    /// Score reported on the results page: points when hunting, mismatched guesses when pairing.
    pub fn final_score(&self) -> u32 {
        match self.mode() {
            GameMode::PairMatch => self.total_guesses(),
            GameMode::TargetHunt => self.score(),
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds.0
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            mode: self.mode(),
            score: self.final_score(),
            elapsed_seconds: self.elapsed_seconds(),
            guesses: self.total_guesses(),
        }
    }

    /// Whether a selection at `coords` would be accepted right now.
    pub fn can_select_at(&self, coords: Coord2) -> bool {
        if self.game_over {
            return false;
        }
        let Some(cell) = self.cell_at(coords) else {
            return false;
        };
        match (self.mode(), cell) {
            (_, CellState::Resolved | CellState::PendingReset) => false,
            (GameMode::PairMatch, _) => !self.is_locked(),
            (GameMode::TargetHunt, state) => self.attempts_left > 0 && !state.is_face_up(),
        }
    }

    pub fn select_cell(&mut self, coords: Coord2) -> Result<SelectionResult> {
        let coords = self.layout.validate_coords(coords)?;

        if !self.can_select_at(coords) {
            return Ok(SelectionResult::Ignored);
        }

        Ok(match self.mode() {
            GameMode::PairMatch => self.select_pair(coords),
            GameMode::TargetHunt => self.select_target(coords),
        })
    }

    fn select_pair(&mut self, coords: Coord2) -> SelectionResult {
        use SelectionResult::*;

        let first = match self.turn {
            TurnState::Idle => {
                self.cells[coords.to_nd_index()] = CellState::Revealed;
                self.turn = TurnState::AwaitingSecond(coords);
                return AwaitingSecond;
            }
            TurnState::AwaitingSecond(first) if first == coords => return AwaitingSecond,
            TurnState::AwaitingSecond(first) => first,
            TurnState::Locked(..) => return Ignored,
        };

        if self.layout[first] == self.layout[coords] {
            self.cells[first.to_nd_index()] = CellState::Resolved;
            self.cells[coords.to_nd_index()] = CellState::Resolved;
            self.correct_count += 2;
            self.turn = TurnState::Idle;

            if self.correct_count == self.layout.total_cells() {
                self.end_game();
            }
            Match {
                game_over: self.game_over,
            }
        } else {
            self.cells[first.to_nd_index()] = CellState::PendingReset;
            self.cells[coords.to_nd_index()] = CellState::PendingReset;
            self.total_guesses += Saturating(1);
            self.turn = TurnState::Locked(first, coords);
            Mismatch {
                reset: self.ticket([first, coords].into_iter().collect()),
            }
        }
    }

    fn select_target(&mut self, coords: Coord2) -> SelectionResult {
        let hit = self.layout.is_target_at(coords);

        let reset = if hit {
            self.cells[coords.to_nd_index()] = CellState::Resolved;
            self.score += Saturating(u32::from(self.attempts_left));
            None
        } else {
            self.cells[coords.to_nd_index()] = CellState::PendingReset;
            Some(self.ticket(SmallVec::from_elem(coords, 1)))
        };

        self.attempts_left -= 1;
        if self.attempts_left == 0 {
            self.end_game();
        }

        SelectionResult::Hunted(HuntOutcome {
            hit,
            score: self.score(),
            attempts_left: self.attempts_left,
            game_over: self.game_over,
            reset,
        })
    }

    /// Turns the cards named by `ticket` face down again and unlocks the turn.
    pub fn complete_reset(&mut self, ticket: &ResetTicket) -> ResetOutcome {
        if ticket.epoch != self.epoch {
            log::warn!(
                "Dropping reset from game {} while game {} is active",
                ticket.epoch,
                self.epoch
            );
            return ResetOutcome::Stale;
        }

        let mut applied = false;
        for &coords in ticket.cells() {
            if let Some(cell) = self.cells.get_mut(coords.to_nd_index()) {
                if *cell == CellState::PendingReset {
                    *cell = CellState::Hidden;
                    applied = true;
                }
            }
        }

        if let TurnState::Locked(first, second) = self.turn {
            if ticket.cells() == [first, second] {
                self.turn = TurnState::Idle;
            }
        }

        if applied {
            ResetOutcome::Applied
        } else {
            ResetOutcome::Stale
        }
    }

    /// Advances the clock by one second while the game is running.
    pub fn tick(&mut self) {
        if !self.game_over {
            self.elapsed_seconds += Saturating(1);
        }
    }

    fn ticket(&self, cells: SmallVec<[Coord2; 2]>) -> ResetTicket {
        ResetTicket {
            epoch: self.epoch,
            cells,
        }
    }

    fn end_game(&mut self) {
        if !self.game_over {
            log::debug!(
                "Game {} over after {}s, final score {}",
                self.epoch,
                self.elapsed_seconds(),
                self.final_score()
            );
            self.game_over = true;
        }
    }
}

/// Owns the running game and hands out a fresh epoch and seed for every new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    seed: u64,
    games_started: u64,
    state: GameState,
}

impl BoardEngine {
    pub fn new(seed: u64, config: &GameConfig) -> Result<Self> {
        let generator = RandomBoardGenerator::new(derive_seed(seed, 1));
        let layout = generator.generate(config)?;
        Ok(Self {
            seed,
            games_started: 1,
            state: GameState::with_epoch(layout, 1),
        })
    }

    /// Replaces the running game. Reset tickets issued before this call become stale.
    pub fn new_game(&mut self, config: &GameConfig) -> Result<&GameState> {
        let generator = RandomBoardGenerator::new(derive_seed(self.seed, self.games_started + 1));
        self.new_game_with(config, generator)
    }

    pub fn new_game_with<G: BoardGenerator>(
        &mut self,
        config: &GameConfig,
        generator: G,
    ) -> Result<&GameState> {
        config.validate()?;
        let layout = generator.generate(config)?;
        self.start(layout);
        Ok(&self.state)
    }

    /// Replaces the running game with a fixed layout.
    pub fn start(&mut self, layout: BoardLayout) -> &GameState {
        self.games_started += 1;
        self.state = GameState::with_epoch(layout, self.games_started);
        log::debug!(
            "Started {:?} game {} on a {:?} board",
            self.state.mode(),
            self.games_started,
            self.state.size()
        );
        &self.state
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn select_cell(&mut self, coords: Coord2) -> Result<SelectionResult> {
        self.state.select_cell(coords)
    }

    pub fn complete_reset(&mut self, ticket: &ResetTicket) -> ResetOutcome {
        self.state.complete_reset(ticket)
    }

    pub fn tick(&mut self) {
        self.state.tick();
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}

fn derive_seed(seed: u64, game: u64) -> u64 {
    seed.wrapping_add(game.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
