//! Commands emitted by the engine and the host capabilities that carry them out.
//!
//! The engine never touches the DOM, audio or timers. Every transition returns
//! a batch of [`Command`]s; a host applies them in order with [`dispatch`].
use super::Cue;
use crate::error::AdapterError;

/// Game generation. Bumped on every start so timers from an earlier game can
/// be recognised and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionToken(pub u64);

impl SessionToken {
    pub fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Leave Idle / RoundComplete: extend the sequence or finish the game.
    AdvanceRound,
    /// Present the cue at this index of the sequence (or hand over to the player).
    PlaybackStep(usize),
}

/// A delayed callback, tagged with the session that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timer {
    pub session: SessionToken,
    pub kind: TimerKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win,
    Lose,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Drop every timer the host still holds.
    CancelPendingTimers,
    /// Light the cue and play its tone; the host unlights it after `duration_ms`.
    PresentCue { cue: Cue, duration_ms: u32 },
    /// Replace the message line. Empty text clears it.
    ShowMessage(String),
    SetRoundLabel(String),
    SetStartButtonVisible(bool),
    PlayOutcomeSound(Outcome),
    ShowBonusOverlay(bool),
    Schedule { delay_ms: u32, timer: Timer },
}

/// Visual and audio side of the host.
pub trait Presenter {
    fn present_cue(&mut self, cue: Cue, duration_ms: u32) -> Result<(), AdapterError>;
    fn show_message(&mut self, text: &str) -> Result<(), AdapterError>;
    fn set_round_label(&mut self, text: &str) -> Result<(), AdapterError>;
    fn set_start_button_visible(&mut self, visible: bool) -> Result<(), AdapterError>;
    fn play_outcome_sound(&mut self, outcome: Outcome) -> Result<(), AdapterError>;
    fn show_bonus_overlay(&mut self, visible: bool) -> Result<(), AdapterError>;
}

/// Timer side of the host. Fired timers go back into
/// [`SequenceEngine::fire`](super::SequenceEngine::fire).
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, timer: Timer) -> Result<(), AdapterError>;
    fn cancel_all(&mut self) -> Result<(), AdapterError>;
}

/// Apply `commands` in emission order, stopping at the first failure.
pub fn dispatch<P, S>(commands: Vec<Command>, presenter: &mut P, scheduler: &mut S) -> Result<(), AdapterError>
where
    P: Presenter + ?Sized,
    S: Scheduler + ?Sized,
{
    for command in commands {
        match command {
            Command::CancelPendingTimers => scheduler.cancel_all()?,
            Command::PresentCue { cue, duration_ms } => presenter.present_cue(cue, duration_ms)?,
            Command::ShowMessage(text) => presenter.show_message(&text)?,
            Command::SetRoundLabel(text) => presenter.set_round_label(&text)?,
            Command::SetStartButtonVisible(visible) => presenter.set_start_button_visible(visible)?,
            Command::PlayOutcomeSound(outcome) => presenter.play_outcome_sound(outcome)?,
            Command::ShowBonusOverlay(visible) => presenter.show_bonus_overlay(visible)?,
            Command::Schedule { delay_ms, timer } => scheduler.schedule(delay_ms, timer)?,
        }
    }
    Ok(())
}
