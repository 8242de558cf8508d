//! Sequence engine: the turn-based state machine behind the calavera memory game.
//!
//! The engine owns the [`GameState`] and decides every transition:
//!
//! ```text
//! Idle -> Presenting -> AwaitingInput -> RoundComplete -> Presenting (next round)
//!                                   \                \-> Won  (after max_rounds)
//!                                    \-> Lost
//! ```
//!
//! It performs no I/O. Operations return the [`Command`]s the host has to carry
//! out (light a cue, play a sound, arm a timer). Timers come back through
//! [`SequenceEngine::fire`] and are ignored once a newer game has started.
use tracing::{debug, info, trace};

mod command;
mod config;
mod cue;
mod timeline;

pub use command::{Command, Outcome, Presenter, Scheduler, SessionToken, Timer, TimerKind, dispatch};
pub use config::GameConfig;
pub use cue::{Cue, CueSource, RandomCues, ScriptedCues};
pub use timeline::Timeline;

pub const LOSE_MESSAGE: &str = "I thought you were smart...";
pub const WIN_MESSAGE: &str = "You did it! Your memory is as sharp as a tack, just like Grandma's.";
pub const UNLOCKED_LABEL: &str = "CLUE UNLOCKED!";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    #[default]
    Idle,
    Presenting,
    AwaitingInput,
    RoundComplete,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Everything that changes during one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Cues to repeat, one appended per round.
    pub sequence: Vec<Cue>,
    /// Presses so far this round; a prefix of `sequence` until a mistake.
    pub player_input: Vec<Cue>,
    pub round: u32,
    pub phase: Phase,
}

pub struct SequenceEngine<S> {
    config: GameConfig,
    state: GameState,
    source: S,
    session: SessionToken,
    bonus_unlocked: bool,
    bonus_open: bool,
}

impl<S: CueSource> SequenceEngine<S> {
    pub fn new(config: GameConfig, source: S) -> Result<Self, crate::error::ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: GameState::default(),
            source,
            session: SessionToken::default(),
            bonus_unlocked: false,
            bonus_open: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn sequence(&self) -> &[Cue] {
        &self.state.sequence
    }

    pub fn player_input(&self) -> &[Cue] {
        &self.state.player_input
    }

    pub fn session(&self) -> SessionToken {
        self.session
    }

    /// Set once the final round has been cleared in any game of this engine.
    pub fn bonus_unlocked(&self) -> bool {
        self.bonus_unlocked
    }

    /// Reset and arm the first round. Timers from the previous game are
    /// cancelled and, should any still fire, rejected by session.
    pub fn start_game(&mut self) -> Vec<Command> {
        self.session = self.session.next();
        self.state = GameState::default();
        self.bonus_open = false;
        debug!(session = self.session.0, "starting game");

        vec![
            Command::CancelPendingTimers,
            Command::SetStartButtonVisible(false),
            Command::ShowMessage(String::new()),
            Command::SetRoundLabel(round_label(0)),
            Command::ShowBonusOverlay(false),
            self.schedule(self.config.initial_start_delay_ms, TimerKind::AdvanceRound),
        ]
    }

    /// Extend the sequence by one cue and replay it, or finish the game once
    /// `max_rounds` have been cleared. Only acts in Idle or RoundComplete.
    pub fn advance_round(&mut self) -> Vec<Command> {
        if !matches!(self.state.phase, Phase::Idle | Phase::RoundComplete) {
            trace!(phase = ?self.state.phase, "advance ignored");
            return Vec::new();
        }
        if self.state.round >= self.config.max_rounds {
            return self.celebrate();
        }

        self.state.round += 1;
        self.state.player_input.clear();
        let cue = self.draw_cue();
        self.state.sequence.push(cue);
        self.state.phase = Phase::Presenting;
        debug!(round = self.state.round, %cue, "round begins");

        let mut commands = vec![Command::SetRoundLabel(round_label(self.state.round))];
        commands.extend(self.playback_step(0));
        commands
    }

    /// Present `sequence[index]` and arm the next step; past the end, hand the
    /// turn to the player. Only meaningful while presenting.
    pub fn playback_step(&mut self, index: usize) -> Vec<Command> {
        if self.state.phase != Phase::Presenting {
            return Vec::new();
        }
        match self.state.sequence.get(index) {
            Some(&cue) => vec![
                Command::PresentCue {
                    cue,
                    duration_ms: self.config.highlight_ms,
                },
                self.schedule(self.config.playback_step_ms(), TimerKind::PlaybackStep(index + 1)),
            ],
            None => {
                self.state.phase = Phase::AwaitingInput;
                debug!(round = self.state.round, "awaiting input");
                Vec::new()
            }
        }
    }

    /// Record a press. Ignored outside `AwaitingInput` and for cues outside
    /// the configured set.
    pub fn submit_input(&mut self, cue: Cue) -> Vec<Command> {
        if self.state.phase != Phase::AwaitingInput {
            trace!(%cue, phase = ?self.state.phase, "input ignored");
            return Vec::new();
        }
        if !self.config.cues.contains(&cue) {
            trace!(%cue, "cue not in configured set");
            return Vec::new();
        }

        self.state.player_input.push(cue);
        let index = self.state.player_input.len() - 1;
        let mut commands = vec![Command::PresentCue {
            cue,
            duration_ms: self.config.feedback_ms,
        }];

        if self.state.sequence.get(index) != Some(&cue) {
            self.state.phase = Phase::Lost;
            info!(round = self.state.round, index, %cue, "wrong cue, game lost");
            commands.extend([
                Command::PlayOutcomeSound(Outcome::Lose),
                Command::ShowMessage(LOSE_MESSAGE.to_string()),
                Command::SetStartButtonVisible(true),
            ]);
        } else if self.state.player_input.len() == self.state.sequence.len() {
            self.state.phase = Phase::RoundComplete;
            debug!(round = self.state.round, "round complete");
            commands.push(self.schedule(self.config.round_advance_delay_ms, TimerKind::AdvanceRound));
        }
        commands
    }

    /// Entry point for timers armed by earlier commands.
    pub fn fire(&mut self, timer: Timer) -> Vec<Command> {
        if timer.session != self.session {
            trace!(stale = timer.session.0, current = self.session.0, "dropping stale timer");
            return Vec::new();
        }
        match timer.kind {
            TimerKind::AdvanceRound => self.advance_round(),
            TimerKind::PlaybackStep(index) => self.playback_step(index),
        }
    }

    /// Close the clue overlay after a win.
    pub fn dismiss_bonus(&mut self) -> Vec<Command> {
        if self.state.phase != Phase::Won || !self.bonus_open {
            return Vec::new();
        }
        self.bonus_open = false;
        vec![
            Command::ShowBonusOverlay(false),
            Command::ShowMessage(WIN_MESSAGE.to_string()),
            Command::SetStartButtonVisible(true),
        ]
    }

    /// Next cue from the source, clamped to the configured set.
    fn draw_cue(&mut self) -> Cue {
        let cue = self.source.next_cue(&self.config.cues);
        if self.config.cues.contains(&cue) {
            cue
        } else {
            trace!(%cue, "source produced a cue outside the configured set");
            self.config.cues[0]
        }
    }

    fn celebrate(&mut self) -> Vec<Command> {
        self.state.phase = Phase::Won;
        self.bonus_unlocked = true;
        self.bonus_open = true;
        info!(rounds = self.state.round, "all rounds cleared, clue unlocked");
        vec![
            Command::PlayOutcomeSound(Outcome::Win),
            Command::SetRoundLabel(UNLOCKED_LABEL.to_string()),
            Command::ShowMessage(String::new()),
            Command::SetStartButtonVisible(false),
            Command::ShowBonusOverlay(true),
        ]
    }

    fn schedule(&self, delay_ms: u32, kind: TimerKind) -> Command {
        Command::Schedule {
            delay_ms,
            timer: Timer {
                session: self.session,
                kind,
            },
        }
    }
}

fn round_label(round: u32) -> String {
    format!("Round {round}")
}
