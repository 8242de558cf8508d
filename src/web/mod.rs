//! Browser host for the sequence engine.
//!
//! Expects the page to provide one button per cue (id = [`Cue::id`], class
//! `calavera-button`), `start-btn`, `round-display`, `message-area`,
//! `clue-modal` and `close-clue-btn`. Lit buttons get the `lit` class and the
//! clue modal is hidden with the `hidden` class.
use std::cell::RefCell;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, trace};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window, window};

use crate::engine::{
    Command, Cue, GameConfig, Outcome, Presenter, RandomCues, Scheduler, SequenceEngine, Timer,
    dispatch,
};
use crate::error::AdapterError;

mod audio;

const START_BUTTON_ID: &str = "start-btn";
const ROUND_DISPLAY_ID: &str = "round-display";
const MESSAGE_AREA_ID: &str = "message-area";
const CLUE_MODAL_ID: &str = "clue-modal";
const CLOSE_CLUE_ID: &str = "close-clue-btn";
const LIT_CLASS: &str = "lit";
const HIDDEN_CLASS: &str = "hidden";

struct DomPresenter {
    win: Window,
    doc: Document,
    round_display: Element,
    message_area: Element,
    start_button: HtmlElement,
    clue_modal: Element,
    tones: audio::Tones,
}

impl DomPresenter {
    fn lookup(win: Window, doc: Document, cues: &[Cue]) -> Result<Self, AdapterError> {
        for cue in cues {
            element(&doc, cue.id())?;
        }
        let start_button = element(&doc, START_BUTTON_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AdapterError::MissingElement(START_BUTTON_ID.into()))?;
        Ok(Self {
            round_display: element(&doc, ROUND_DISPLAY_ID)?,
            message_area: element(&doc, MESSAGE_AREA_ID)?,
            clue_modal: element(&doc, CLUE_MODAL_ID)?,
            start_button,
            tones: audio::Tones::new()?,
            win,
            doc,
        })
    }
}

impl Presenter for DomPresenter {
    fn present_cue(&mut self, cue: Cue, duration_ms: u32) -> Result<(), AdapterError> {
        let button = element(&self.doc, cue.id())?;
        button.class_list().add_1(LIT_CLASS).map_err(AdapterError::js)?;
        self.tones.cue(cue.tone_hz(), duration_ms)?;

        let unlight = Closure::once_into_js(move || {
            let _ = button.class_list().remove_1(LIT_CLASS);
        });
        self.win
            .set_timeout_with_callback_and_timeout_and_arguments_0(unlight.unchecked_ref(), timeout(duration_ms))
            .map_err(AdapterError::js)?;
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<(), AdapterError> {
        self.message_area.set_text_content(Some(text));
        Ok(())
    }

    fn set_round_label(&mut self, text: &str) -> Result<(), AdapterError> {
        self.round_display.set_text_content(Some(text));
        Ok(())
    }

    fn set_start_button_visible(&mut self, visible: bool) -> Result<(), AdapterError> {
        let display = if visible { "block" } else { "none" };
        self.start_button
            .style()
            .set_property("display", display)
            .map_err(AdapterError::js)
    }

    fn play_outcome_sound(&mut self, outcome: Outcome) -> Result<(), AdapterError> {
        match outcome {
            Outcome::Win => self.tones.win(),
            Outcome::Lose => self.tones.lose(),
        }
    }

    fn show_bonus_overlay(&mut self, visible: bool) -> Result<(), AdapterError> {
        let classes = self.clue_modal.class_list();
        let toggled = if visible {
            classes.remove_1(HIDDEN_CLASS)
        } else {
            classes.add_1(HIDDEN_CLASS)
        };
        toggled.map_err(AdapterError::js)
    }
}

/// Live `setTimeout` handles, keyed by the timer they carry.
#[derive(Debug, Default)]
struct TimerHandles {
    live: Vec<(Timer, i32)>,
}

impl TimerHandles {
    fn armed(&mut self, timer: Timer, handle: i32) {
        self.live.push((timer, handle));
    }

    /// Forget the handle of a timer whose callback ran. Equal timers fire in
    /// arming order, so the oldest entry is the one that fired.
    fn fired(&mut self, timer: Timer) -> Option<i32> {
        let pos = self.live.iter().position(|(t, _)| *t == timer)?;
        Some(self.live.remove(pos).1)
    }

    fn drain(&mut self) -> impl Iterator<Item = i32> + '_ {
        self.live.drain(..).map(|(_, handle)| handle)
    }

    fn len(&self) -> usize {
        self.live.len()
    }
}

/// `setTimeout` scheduler for the current game, cleared on restart.
struct WindowScheduler {
    win: Window,
    handles: TimerHandles,
}

impl Scheduler for WindowScheduler {
    fn schedule(&mut self, delay_ms: u32, timer: Timer) -> Result<(), AdapterError> {
        let callback = Closure::once_into_js(move || on_timer(timer));
        let handle = self
            .win
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout(delay_ms))
            .map_err(AdapterError::js)?;
        self.handles.armed(timer, handle);
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<(), AdapterError> {
        for handle in self.handles.drain() {
            self.win.clear_timeout_with_handle(handle);
        }
        Ok(())
    }
}

struct WebGame {
    engine: SequenceEngine<RandomCues<ChaCha8Rng>>,
    presenter: DomPresenter,
    scheduler: WindowScheduler,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = RefCell::new(None);
}

/// Run an engine operation against the mounted game and apply what it emits.
fn with_game<F>(op: F) -> Result<(), AdapterError>
where
    F: FnOnce(&mut WebGame) -> Vec<Command>,
{
    GAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        let game = slot.as_mut().ok_or(AdapterError::NotMounted)?;
        let commands = op(game);
        dispatch(commands, &mut game.presenter, &mut game.scheduler)
    })
}

fn on_timer(timer: Timer) {
    let fired = with_game(|game| {
        game.scheduler.handles.fired(timer);
        trace!(pending = game.scheduler.handles.len(), "timer fired");
        game.engine.fire(timer)
    });
    if let Err(err) = fired {
        error!(%err, ?timer, "timer dispatch failed");
    }
}

fn on_start() {
    if let Err(err) = start() {
        error!(%err, "start failed");
    }
}

fn on_cue(cue: Cue) {
    if let Err(err) = submit(cue) {
        error!(%err, %cue, "input dispatch failed");
    }
}

fn on_close_clue() {
    if let Err(err) = dismiss() {
        error!(%err, "closing clue failed");
    }
}

pub(crate) fn is_mounted() -> bool {
    GAME.with(|cell| cell.borrow().is_some())
}

/// Wire the page and create a fresh engine. Mounting again swaps the engine
/// (and its config) without adding a second set of listeners.
pub(crate) fn mount(config: GameConfig) -> Result<(), JsValue> {
    let engine = SequenceEngine::new(config, RandomCues::from_entropy())?;

    if is_mounted() {
        GAME.with(|cell| -> Result<(), AdapterError> {
            if let Some(game) = cell.borrow_mut().as_mut() {
                game.scheduler.cancel_all()?;
                game.engine = engine;
            }
            Ok(())
        })?;
        debug!("engine replaced on mounted page");
        return Ok(());
    }

    let win = window().ok_or(AdapterError::NoBrowser("no window"))?;
    let doc = win.document().ok_or(AdapterError::NoBrowser("no document"))?;
    let presenter = DomPresenter::lookup(win.clone(), doc.clone(), &engine.config().cues)?;

    on_click(&doc, START_BUTTON_ID, on_start)?;
    on_click(&doc, CLOSE_CLUE_ID, on_close_clue)?;
    // Every button present gets a listener so a later remount may widen the cue set.
    for cue in Cue::ALL {
        if doc.get_element_by_id(cue.id()).is_some() {
            on_click(&doc, cue.id(), move || on_cue(cue))?;
        }
    }

    let game = WebGame {
        engine,
        presenter,
        scheduler: WindowScheduler {
            win,
            handles: TimerHandles::default(),
        },
    };
    GAME.with(|cell| *cell.borrow_mut() = Some(game));
    debug!("calavera game mounted");
    Ok(())
}

pub(crate) fn start() -> Result<(), AdapterError> {
    with_game(|game| {
        game.presenter.tones.resume();
        game.engine.start_game()
    })
}

pub(crate) fn submit(cue: Cue) -> Result<(), AdapterError> {
    with_game(|game| game.engine.submit_input(cue))
}

pub(crate) fn dismiss() -> Result<(), AdapterError> {
    with_game(|game| game.engine.dismiss_bonus())
}

#[cfg(feature = "serde_json")]
pub(crate) fn snapshot() -> Result<crate::engine::GameState, AdapterError> {
    GAME.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|game| game.engine.state().clone())
            .ok_or(AdapterError::NotMounted)
    })
}

fn on_click<F>(doc: &Document, id: &str, handler: F) -> Result<(), AdapterError>
where
    F: Fn() + 'static,
{
    let target = element(doc, id)?;
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| handler()) as Box<dyn FnMut(_)>);
    target
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(AdapterError::js)?;
    closure.forget();
    Ok(())
}

fn element(doc: &Document, id: &str) -> Result<Element, AdapterError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| AdapterError::MissingElement(id.to_string()))
}

fn timeout(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SessionToken, TimerKind};

    fn timer(kind: TimerKind) -> Timer {
        Timer {
            session: SessionToken::default(),
            kind,
        }
    }

    #[test]
    fn fired_timers_release_their_handle() {
        let mut handles = TimerHandles::default();
        handles.armed(timer(TimerKind::AdvanceRound), 1);
        handles.armed(timer(TimerKind::PlaybackStep(1)), 2);
        handles.armed(timer(TimerKind::PlaybackStep(2)), 3);

        assert_eq!(handles.fired(timer(TimerKind::PlaybackStep(1))), Some(2));
        assert_eq!(handles.fired(timer(TimerKind::AdvanceRound)), Some(1));
        assert_eq!(handles.len(), 1);
        assert_eq!(handles.drain().collect::<Vec<_>>(), vec![3]);
        assert_eq!(handles.len(), 0);
    }

    #[test]
    fn duplicate_timers_release_oldest_first_and_unknown_ones_are_ignored() {
        let mut handles = TimerHandles::default();
        handles.armed(timer(TimerKind::AdvanceRound), 7);
        handles.armed(timer(TimerKind::AdvanceRound), 8);

        assert_eq!(handles.fired(timer(TimerKind::PlaybackStep(0))), None);
        assert_eq!(handles.fired(timer(TimerKind::AdvanceRound)), Some(7));
        assert_eq!(handles.fired(timer(TimerKind::AdvanceRound)), Some(8));
        assert_eq!(handles.fired(timer(TimerKind::AdvanceRound)), None);
    }
}
