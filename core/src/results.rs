use alloc::string::String;
use core::fmt::{self, Display, Formatter, Write};
use serde::{Deserialize, Serialize};

use crate::GameMode;

/// Final figures shown in the game-over dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub mode: GameMode,
    pub score: u32,
    pub elapsed_seconds: u32,
    pub guesses: u32,
}

impl Display for GameSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.mode {
            GameMode::TargetHunt => {
                write!(f, "Score: {}, Time: {}s", self.score, self.elapsed_seconds)
            }
            GameMode::PairMatch => {
                write!(f, "Time: {}s, Guesses: {}", self.elapsed_seconds, self.guesses)
            }
        }
    }
}

/// Redirect to the page that records a finished game for a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsLink {
    host: String,
    user_id: String,
    score: u32,
}

impl ResultsLink {
    pub const DEFAULT_HOST: &'static str = "quiz-appservice.bleksi.com";

    pub fn new(user_id: impl Into<String>, score: u32) -> Self {
        Self {
            host: Self::DEFAULT_HOST.into(),
            user_id: user_id.into(),
            score,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

impl Display for ResultsLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "https://{}/quiz-redirect?user-id=", self.host)?;
        write_query_value(f, &self.user_id)?;
        write!(f, "&score={}", self.score)
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn write_query_value(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                f.write_char(char::from(byte))?
            }
            _ => write!(f, "%{byte:02X}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn link_points_at_quiz_redirect() {
        let link = ResultsLink::new("f47ac10b-58cc-4372-a567-0e02b2c3d479", 12);
        assert_eq!(
            link.to_string(),
            "https://quiz-appservice.bleksi.com/quiz-redirect?user-id=f47ac10b-58cc-4372-a567-0e02b2c3d479&score=12"
        );
    }

    #[test]
    fn link_escapes_user_id() {
        let link = ResultsLink::new("a b&c", 0).with_host("localhost:8080");
        assert_eq!(
            link.to_string(),
            "https://localhost:8080/quiz-redirect?user-id=a%20b%26c&score=0"
        );
    }

    #[test]
    fn summary_text_follows_mode() {
        let hunt = GameSummary {
            mode: GameMode::TargetHunt,
            score: 14,
            elapsed_seconds: 9,
            guesses: 0,
        };
        assert_eq!(hunt.to_string(), "Score: 14, Time: 9s");

        let pairs = GameSummary {
            mode: GameMode::PairMatch,
            score: 3,
            elapsed_seconds: 41,
            guesses: 3,
        };
        assert_eq!(pairs.to_string(), "Time: 41s, Guesses: 3");
    }
}
