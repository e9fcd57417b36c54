use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: &GameConfig) -> Result<BoardLayout>;
}

/// Deals a fixed layout. Fails when the layout's mode or size differs from the config.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator(pub BoardLayout);

impl BoardGenerator for FixedBoardGenerator {
    fn generate(self, config: &GameConfig) -> Result<BoardLayout> {
        if self.0.mode() != config.mode || self.0.size() != config.size {
            log::warn!(
                "Fixed {:?} layout of size {:?} does not fit a {:?} config of size {:?}",
                self.0.mode(),
                self.0.size(),
                config.mode,
                config.size
            );
            return Err(ConfigIssue::ShapeMismatch.into());
        }
        Ok(self.0)
    }
}
