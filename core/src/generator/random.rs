use alloc::string::String;
use alloc::vec::Vec;

use super::*;

/// Generation strategy that shuffles a fully built multiset of symbols, so every seed deals a
/// valid board in a single pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &GameConfig) -> Result<BoardLayout> {
        use rand::prelude::*;

        config.validate()?;

        let total_cells = usize::from(config.total_cells());
        let palette = config.palette.symbols();
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let (mut symbols, target) = match config.mode {
            GameMode::PairMatch => {
                // larger palettes only contribute a random subset of their symbols
                let chosen: Vec<&String> = palette.choose_multiple(&mut rng, total_cells / 2).collect();
                let symbols: Vec<String> = chosen
                    .into_iter()
                    .flat_map(|symbol| [symbol.clone(), symbol.clone()])
                    .collect();
                (symbols, None)
            }
            GameMode::TargetHunt => {
                let target = palette
                    .choose(&mut rng)
                    .cloned()
                    .ok_or(ConfigIssue::EmptyPalette)?;
                let mut symbols = Vec::with_capacity(total_cells);
                symbols.push(target.clone());
                for _ in 1..total_cells {
                    let index = rng.random_range(0..palette.len());
                    symbols.push(palette[index].clone());
                }
                (symbols, Some(target))
            }
        };
        symbols.shuffle(&mut rng);

        let layout = BoardLayout::from_symbols(config.mode, config.size, symbols, target)?;
        log::debug!(
            "Dealt {:?} board {:?} from seed {}",
            config.mode,
            config.size,
            self.seed
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_boards_hold_every_symbol_exactly_twice() {
        for seed in 0..64 {
            let layout = RandomBoardGenerator::new(seed)
                .generate(&GameConfig::pair_match())
                .unwrap();
            let counts = layout.symbol_counts();
            assert_eq!(counts.len(), 8);
            assert!(counts.values().all(|&count| count == 2), "seed {seed}");
        }
    }

    #[test]
    fn pair_boards_sample_large_palettes() {
        let palette = Palette::new(["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]);
        let config = GameConfig::new((2, 3), GameMode::PairMatch, palette);

        let layout = RandomBoardGenerator::new(11).generate(&config).unwrap();
        let counts = layout.symbol_counts();
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&count| count == 2));
    }

    #[test]
    fn hunt_boards_always_contain_the_target() {
        for seed in 0..64 {
            let layout = RandomBoardGenerator::new(seed)
                .generate(&GameConfig::target_hunt())
                .unwrap();
            let target = layout.target().expect("hunt boards carry a target");
            assert!(Palette::fruits().contains(target));
            assert!(layout.symbol_counts()[target] >= 1, "seed {seed}");
            assert_eq!(layout.total_cells(), 16);
        }
    }

    #[test]
    fn same_seed_deals_the_same_board() {
        let config = GameConfig::pair_match();
        let a = RandomBoardGenerator::new(42).generate(&config).unwrap();
        let b = RandomBoardGenerator::new(42).generate(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_configs_are_rejected_before_dealing() {
        let config = GameConfig::new((1, 3), GameMode::PairMatch, Palette::fruits());
        assert_eq!(
            RandomBoardGenerator::new(0).generate(&config),
            Err(GameError::InvalidConfig(ConfigIssue::OddCellCount))
        );
    }

    #[test]
    fn new_game_deals_a_fresh_state() {
        let state = GameState::new_game(&GameConfig::pair_match(), RandomBoardGenerator::new(5))
            .unwrap();
        assert_eq!(state.size(), (4, 4));
        assert_eq!(state.correct_count(), 0);
        assert_eq!(state.total_guesses(), 0);
        assert_eq!(state.first_selection(), None);
        assert!(!state.is_game_over());
    }

    #[test]
    fn fixed_generator_deals_its_layout() {
        let layout = BoardLayout::from_rows(GameMode::PairMatch, &[&["🍎", "🍎"]], None).unwrap();
        let config = GameConfig::new((1, 2), GameMode::PairMatch, Palette::fruits());
        let dealt = FixedBoardGenerator(layout.clone()).generate(&config).unwrap();
        assert_eq!(dealt, layout);
    }
}
