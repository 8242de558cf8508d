// Cue alphabet and the injectable generators that extend the sequence.
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::CueParseError;

/// One of the four calavera buttons the player has to repeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Cue {
    Marigold,
    Skull,
    Candle,
    Cross,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Marigold, Cue::Skull, Cue::Candle, Cue::Cross];

    /// DOM id of the button and the name used across the wasm boundary.
    pub fn id(self) -> &'static str {
        match self {
            Cue::Marigold => "marigold",
            Cue::Skull => "skull",
            Cue::Candle => "candle",
            Cue::Cross => "cross",
        }
    }

    /// Tone played while the cue is lit (E4, A4, G4, C4).
    pub fn tone_hz(self) -> f32 {
        match self {
            Cue::Marigold => 329.63,
            Cue::Skull => 440.00,
            Cue::Candle => 392.00,
            Cue::Cross => 261.63,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Cue {
    type Err = CueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Cue::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(name))
            .ok_or_else(|| CueParseError(name.to_string()))
    }
}

/// Picks the cue appended at the start of every round.
///
/// `cues` is the configured alphabet and is never empty (checked by
/// [`GameConfig::validate`](super::GameConfig::validate)).
pub trait CueSource {
    fn next_cue(&mut self, cues: &[Cue]) -> Cue;
}

/// Uniform, independent draws; immediate repeats are allowed.
#[derive(Clone, Debug)]
pub struct RandomCues<R> {
    rng: R,
}

impl<R: Rng> RandomCues<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomCues<ChaCha8Rng> {
    /// Deterministic stream, same seed gives the same game.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded from the platform entropy source (`crypto.getRandomValues` in the browser).
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> CueSource for RandomCues<R> {
    fn next_cue(&mut self, cues: &[Cue]) -> Cue {
        cues[self.rng.gen_range(0..cues.len())]
    }
}

/// Replays a fixed script, wrapping around when it runs out. Entries outside
/// the configured set are skipped; if none fit, the first configured cue is used.
#[derive(Clone, Debug)]
pub struct ScriptedCues {
    script: Vec<Cue>,
    cursor: usize,
}

impl ScriptedCues {
    pub fn new(script: impl IntoIterator<Item = Cue>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl CueSource for ScriptedCues {
    fn next_cue(&mut self, cues: &[Cue]) -> Cue {
        for _ in 0..self.script.len() {
            let cue = self.script[self.cursor % self.script.len()];
            self.cursor += 1;
            if cues.contains(&cue) {
                return cue;
            }
        }
        cues[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_ids_case_insensitively() {
        assert_eq!("marigold".parse::<Cue>(), Ok(Cue::Marigold));
        assert_eq!(" Skull ".parse::<Cue>(), Ok(Cue::Skull));
        assert_eq!("CROSS".parse::<Cue>(), Ok(Cue::Cross));
        for cue in Cue::ALL {
            assert_eq!(cue.to_string().parse::<Cue>(), Ok(cue));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "tamale".parse::<Cue>().unwrap_err();
        assert_eq!(err, CueParseError("tamale".into()));
        assert!(err.to_string().contains("tamale"));
    }

    #[test]
    fn seeded_source_is_deterministic() {
        let mut a = RandomCues::seeded(7);
        let mut b = RandomCues::seeded(7);
        let xs: Vec<Cue> = (0..32).map(|_| a.next_cue(&Cue::ALL)).collect();
        let ys: Vec<Cue> = (0..32).map(|_| b.next_cue(&Cue::ALL)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_source_stays_inside_the_configured_set() {
        let mut src = RandomCues::seeded(99);
        let subset = [Cue::Candle, Cue::Cross];
        for _ in 0..200 {
            assert!(subset.contains(&src.next_cue(&subset)));
        }
    }

    #[test]
    fn random_source_eventually_draws_every_cue() {
        let mut src = RandomCues::seeded(1);
        let drawn: Vec<Cue> = (0..400).map(|_| src.next_cue(&Cue::ALL)).collect();
        for cue in Cue::ALL {
            assert!(drawn.contains(&cue), "{cue} never drawn");
        }
    }

    #[test]
    fn scripted_source_skips_cues_outside_the_set() {
        let subset = [Cue::Skull, Cue::Candle];
        let mut src = ScriptedCues::new([Cue::Marigold, Cue::Candle, Cue::Cross]);
        assert_eq!(src.next_cue(&subset), Cue::Candle);
        assert_eq!(src.next_cue(&subset), Cue::Candle);

        let mut none_fit = ScriptedCues::new([Cue::Marigold]);
        assert_eq!(none_fit.next_cue(&subset), Cue::Skull);
        assert_eq!(ScriptedCues::new(Vec::new()).next_cue(&subset), Cue::Skull);
    }

    #[test]
    fn scripted_source_wraps() {
        let mut src = ScriptedCues::new([Cue::Skull, Cue::Skull, Cue::Cross]);
        let got: Vec<Cue> = (0..5).map(|_| src.next_cue(&Cue::ALL)).collect();
        assert_eq!(got, vec![Cue::Skull, Cue::Skull, Cue::Cross, Cue::Skull, Cue::Skull]);
    }
}
