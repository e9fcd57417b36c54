#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Index;
use hashbrown::{HashMap, HashSet};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use preferences::*;
pub use results::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod preferences;
mod results;
mod types;

/// Face shown on every card that is not turned up.
pub const HIDDEN_FACE: &str = "❓";

/// Default palette used by both game modes.
pub const FRUITS: [&str; 8] = ["🍎", "🍌", "🍇", "🍉", "🍊", "🍒", "🍍", "🍑"];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Turn up two cards at a time looking for equal symbols.
    PairMatch,
    /// Turn up single cards looking for one designated symbol with limited attempts.
    TargetHunt,
}

impl Default for GameMode {
    fn default() -> Self {
        Self::PairMatch
    }
}

/// Ordered set of distinct symbols a board is filled from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette(Vec<String>);

impl Palette {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    pub fn fruits() -> Self {
        Self::new(FRUITS)
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.0.len());
        !self.0.iter().all(|symbol| seen.insert(symbol.as_str()))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::fruits()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board size as `(rows, cols)`.
    pub size: Coord2,
    pub mode: GameMode,
    pub palette: Palette,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord2 = (4, 4);

    pub fn new(size: Coord2, mode: GameMode, palette: Palette) -> Self {
        Self {
            size,
            mode,
            palette,
        }
    }

    pub fn pair_match() -> Self {
        Self::new(Self::DEFAULT_SIZE, GameMode::PairMatch, Palette::fruits())
    }

    pub fn target_hunt() -> Self {
        Self::new(Self::DEFAULT_SIZE, GameMode::TargetHunt, Palette::fruits())
    }

    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::PairMatch => Self::pair_match(),
            GameMode::TargetHunt => Self::target_hunt(),
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Attempts granted at the start of a target hunt.
    pub const fn initial_attempts(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn validate(&self) -> Result<()> {
        let total_cells = self.total_cells();
        if total_cells == 0 {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        if self.palette.is_empty() {
            return Err(ConfigIssue::EmptyPalette.into());
        }
        if self.palette.has_duplicates() {
            return Err(ConfigIssue::DuplicateSymbol.into());
        }
        if matches!(self.mode, GameMode::PairMatch) {
            if total_cells % 2 != 0 {
                return Err(ConfigIssue::OddCellCount.into());
            }
            if self.palette.len() < usize::from(total_cells / 2) {
                return Err(ConfigIssue::PaletteTooSmall.into());
            }
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::pair_match()
    }
}

/// Symbols dealt onto a board, plus the target symbol when hunting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    mode: GameMode,
    symbols: Array2<String>,
    target: Option<String>,
}

impl BoardLayout {
    /// Builds a fixed layout from row slices, checking the invariants of `mode`.
    pub fn from_rows(mode: GameMode, rows: &[&[&str]], target: Option<&str>) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != col_count) {
            return Err(ConfigIssue::ShapeMismatch.into());
        }
        let size = (
            Coord::try_from(row_count).map_err(|_| ConfigIssue::ShapeMismatch)?,
            Coord::try_from(col_count).map_err(|_| ConfigIssue::ShapeMismatch)?,
        );
        let symbols = rows
            .iter()
            .flat_map(|row| row.iter().map(|&symbol| String::from(symbol)))
            .collect();

        Self::from_symbols(mode, size, symbols, target.map(String::from))
    }

    /// Builds a layout from row-major `symbols`, checking the invariants of `mode`.
    pub fn from_symbols(
        mode: GameMode,
        size: Coord2,
        symbols: Vec<String>,
        target: Option<String>,
    ) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ConfigIssue::EmptyBoard.into());
        }
        let symbols = Array2::from_shape_vec(size.to_nd_index(), symbols)
            .map_err(|_| ConfigIssue::ShapeMismatch)?;

        let layout = match mode {
            GameMode::PairMatch => Self {
                mode,
                symbols,
                target: None,
            },
            GameMode::TargetHunt => Self {
                mode,
                symbols,
                target,
            },
        };
        layout.validate()?;
        Ok(layout)
    }

    fn validate(&self) -> Result<()> {
        match self.mode {
            GameMode::PairMatch => {
                if self.symbols.len() % 2 != 0 {
                    return Err(ConfigIssue::OddCellCount.into());
                }
                if self.symbol_counts().values().any(|&count| count != 2) {
                    return Err(ConfigIssue::UnpairedSymbol.into());
                }
            }
            GameMode::TargetHunt => {
                let target = self.target.as_deref().ok_or(ConfigIssue::MissingTarget)?;
                if !self.symbols.iter().any(|symbol| symbol == target) {
                    return Err(ConfigIssue::MissingTarget.into());
                }
            }
        }
        Ok(())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.symbols.dim();
        // `from_symbols` only accepts shapes built from `Coord` values
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn symbol_at(&self, coords: Coord2) -> &str {
        &self[coords]
    }

    pub fn is_target_at(&self, coords: Coord2) -> bool {
        self.target() == Some(self.symbol_at(coords))
    }

    /// Number of times each symbol occurs on the board.
    pub fn symbol_counts(&self) -> HashMap<&str, CellCount> {
        let mut counts = HashMap::new();
        for symbol in self.symbols.iter() {
            *counts.entry(symbol.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl Index<Coord2> for BoardLayout {
    type Output = String;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.symbols[coords.to_nd_index()]
    }
}

/// Result of a single target-hunt flip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuntOutcome {
    pub hit: bool,
    pub score: u32,
    pub attempts_left: CellCount,
    pub game_over: bool,
    /// Present on a miss: the flipped card must be hidden again once the delay elapses.
    pub reset: Option<ResetTicket>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionResult {
    /// The selection had no effect on the game.
    Ignored,
    /// First card of a pair is up, waiting for the second.
    AwaitingSecond,
    Match {
        game_over: bool,
    },
    /// Both cards stay up and selection is locked until `reset` is applied.
    Mismatch {
        reset: ResetTicket,
    },
    Hunted(HuntOutcome),
}

impl SelectionResult {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub fn reset_ticket(&self) -> Option<&ResetTicket> {
        match self {
            Self::Mismatch { reset } => Some(reset),
            Self::Hunted(outcome) => outcome.reset.as_ref(),
            _ => None,
        }
    }

    pub fn ends_game(&self) -> bool {
        match self {
            Self::Match { game_over } => *game_over,
            Self::Hunted(outcome) => outcome.game_over,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_match_rejects_odd_boards() {
        let config = GameConfig::new((3, 3), GameMode::PairMatch, Palette::fruits());
        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfig(ConfigIssue::OddCellCount))
        );
    }

    #[test]
    fn target_hunt_accepts_odd_boards() {
        let config = GameConfig::new((3, 3), GameMode::TargetHunt, Palette::fruits());
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.initial_attempts(), 4);
    }

    #[test]
    fn empty_palette_is_rejected_in_both_modes() {
        for mode in [GameMode::PairMatch, GameMode::TargetHunt] {
            let config = GameConfig::new((4, 4), mode, Palette::new::<_, &str>([]));
            assert_eq!(
                config.validate(),
                Err(GameError::InvalidConfig(ConfigIssue::EmptyPalette))
            );
        }
    }

    #[test]
    fn palette_must_cover_every_pair() {
        let config = GameConfig::new((4, 4), GameMode::PairMatch, Palette::new(["🍎", "🍌"]));
        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfig(ConfigIssue::PaletteTooSmall))
        );
    }

    #[test]
    fn duplicate_palette_symbols_are_rejected() {
        let config = GameConfig::new((1, 2), GameMode::PairMatch, Palette::new(["🍎", "🍎"]));
        assert_eq!(
            config.validate(),
            Err(GameError::InvalidConfig(ConfigIssue::DuplicateSymbol))
        );
    }

    #[test]
    fn layout_from_rows_checks_pairs() {
        let unpaired = BoardLayout::from_rows(GameMode::PairMatch, &[&["🍎", "🍌"]], None);
        assert_eq!(
            unpaired,
            Err(GameError::InvalidConfig(ConfigIssue::UnpairedSymbol))
        );

        let ragged = BoardLayout::from_rows(GameMode::PairMatch, &[&["🍎", "🍎"], &["🍌"]], None);
        assert_eq!(
            ragged,
            Err(GameError::InvalidConfig(ConfigIssue::ShapeMismatch))
        );
    }

    #[test]
    fn layout_from_rows_requires_target_on_board() {
        let missing =
            BoardLayout::from_rows(GameMode::TargetHunt, &[&["🍎", "🍎"]], Some("🍌"));
        assert_eq!(
            missing,
            Err(GameError::InvalidConfig(ConfigIssue::MissingTarget))
        );

        let layout =
            BoardLayout::from_rows(GameMode::TargetHunt, &[&["🍎", "🍌"]], Some("🍌")).unwrap();
        assert_eq!(layout.size(), (1, 2));
        assert!(layout.is_target_at((0, 1)));
        assert_eq!(layout.validate_coords((1, 0)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = GameConfig::target_hunt();
        let json = serde_json::to_string(&config).unwrap();
        let restored: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
