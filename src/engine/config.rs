// Tunable constants for one game. Defaults match the shipped page.
use super::Cue;
use crate::error::ConfigError;

pub const DEFAULT_MAX_ROUNDS: u32 = 10;
pub const DEFAULT_HIGHLIGHT_MS: u32 = 300;
pub const DEFAULT_GAP_MS: u32 = 150;
pub const DEFAULT_FEEDBACK_MS: u32 = 200;
pub const DEFAULT_ROUND_ADVANCE_DELAY_MS: u32 = 1000;
pub const DEFAULT_INITIAL_START_DELAY_MS: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Alphabet the sequence is drawn from.
    pub cues: Vec<Cue>,
    /// Rounds to clear before the clue unlocks.
    pub max_rounds: u32,
    /// How long each played-back cue stays lit.
    pub highlight_ms: u32,
    /// Dark pause after a played-back cue.
    pub gap_ms: u32,
    /// How long a player press stays lit.
    pub feedback_ms: u32,
    pub round_advance_delay_ms: u32,
    pub initial_start_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cues: Cue::ALL.to_vec(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            gap_ms: DEFAULT_GAP_MS,
            feedback_ms: DEFAULT_FEEDBACK_MS,
            round_advance_delay_ms: DEFAULT_ROUND_ADVANCE_DELAY_MS,
            initial_start_delay_ms: DEFAULT_INITIAL_START_DELAY_MS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cues.is_empty() {
            return Err(ConfigError::EmptyCueSet);
        }
        for (i, cue) in self.cues.iter().enumerate() {
            if self.cues[..i].contains(cue) {
                return Err(ConfigError::DuplicateCue(cue.id()));
            }
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        Ok(())
    }

    /// Time from one played-back cue lighting up to the next.
    pub fn playback_step_ms(&self) -> u32 {
        self.highlight_ms.saturating_add(self.gap_ms)
    }

    /// Parse a (possibly partial) JSON override; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cues.len(), 4);
        assert_eq!(cfg.max_rounds, 10);
        assert_eq!(cfg.playback_step_ms(), 450);
    }

    #[test]
    fn rejects_empty_and_duplicate_cue_sets() {
        let empty = GameConfig {
            cues: vec![],
            ..GameConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyCueSet)));

        let dup = GameConfig {
            cues: vec![Cue::Skull, Cue::Candle, Cue::Skull],
            ..GameConfig::default()
        };
        assert!(matches!(dup.validate(), Err(ConfigError::DuplicateCue("skull"))));
    }

    #[test]
    fn rejects_zero_rounds() {
        let cfg = GameConfig {
            max_rounds: 0,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NoRounds)));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_override_keeps_missing_defaults() {
        let cfg = GameConfig::from_json(r#"{"max_rounds": 3, "cues": ["skull", "cross"]}"#).unwrap();
        assert_eq!(cfg.max_rounds, 3);
        assert_eq!(cfg.cues, vec![Cue::Skull, Cue::Cross]);
        assert_eq!(cfg.highlight_ms, DEFAULT_HIGHLIGHT_MS);
        assert_eq!(cfg.initial_start_delay_ms, DEFAULT_INITIAL_START_DELAY_MS);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_override_is_validated() {
        assert!(matches!(
            GameConfig::from_json(r#"{"max_rounds": 0}"#),
            Err(ConfigError::NoRounds)
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"cues": ["tamale"]}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
