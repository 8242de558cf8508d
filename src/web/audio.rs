// Web Audio tones for cues and the end-of-game jingles.
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::error::AdapterError;

const CUE_GAIN: f32 = 0.5;
const SILENT: f32 = 0.0001;
const LOSE_HZ: f32 = 100.0;
const LOSE_SECS: f64 = 0.5;
// C5, E5, G5 entering 100ms apart.
const WIN_ARPEGGIO: [(f32, f64); 3] = [(523.25, 0.0), (659.25, 0.1), (783.99, 0.2)];
const WIN_SECS: f64 = 0.5;

pub(crate) struct Tones {
    ctx: AudioContext,
}

impl Tones {
    pub(crate) fn new() -> Result<Self, AdapterError> {
        let ctx = AudioContext::new().map_err(audio_err)?;
        Ok(Self { ctx })
    }

    /// Browsers keep a fresh context suspended until a user gesture.
    pub(crate) fn resume(&self) {
        let _ = self.ctx.resume();
    }

    /// Sine tone fading out over `duration_ms`.
    pub(crate) fn cue(&self, hz: f32, duration_ms: u32) -> Result<(), AdapterError> {
        let now = self.ctx.current_time();
        let end = now + f64::from(duration_ms) / 1000.0;
        let gain = self.gain()?;
        let param = gain.gain();
        param.set_value_at_time(CUE_GAIN, now).map_err(audio_err)?;
        param.exponential_ramp_to_value_at_time(SILENT, end).map_err(audio_err)?;

        let osc = self.oscillator(hz, OscillatorType::Sine, &gain)?;
        osc.start_with_when(now).map_err(audio_err)?;
        osc.stop_with_when(end).map_err(audio_err)?;
        Ok(())
    }

    pub(crate) fn win(&self) -> Result<(), AdapterError> {
        let now = self.ctx.current_time();
        let gain = self.gain()?;
        let param = gain.gain();
        param.set_value_at_time(0.0, now).map_err(audio_err)?;
        param.linear_ramp_to_value_at_time(0.5, now + 0.1).map_err(audio_err)?;
        param.linear_ramp_to_value_at_time(0.1, now + WIN_SECS).map_err(audio_err)?;

        for (hz, offset) in WIN_ARPEGGIO {
            let osc = self.oscillator(hz, OscillatorType::Triangle, &gain)?;
            osc.start_with_when(now + offset).map_err(audio_err)?;
            osc.stop_with_when(now + WIN_SECS).map_err(audio_err)?;
        }
        Ok(())
    }

    pub(crate) fn lose(&self) -> Result<(), AdapterError> {
        let now = self.ctx.current_time();
        let gain = self.gain()?;
        let param = gain.gain();
        param.set_value_at_time(CUE_GAIN, now).map_err(audio_err)?;
        param.exponential_ramp_to_value_at_time(SILENT, now + LOSE_SECS).map_err(audio_err)?;

        let osc = self.oscillator(LOSE_HZ, OscillatorType::Sine, &gain)?;
        osc.start_with_when(now).map_err(audio_err)?;
        osc.stop_with_when(now + LOSE_SECS).map_err(audio_err)?;
        Ok(())
    }

    fn gain(&self) -> Result<GainNode, AdapterError> {
        let gain = self.ctx.create_gain().map_err(audio_err)?;
        gain.connect_with_audio_node(&self.ctx.destination()).map_err(audio_err)?;
        Ok(gain)
    }

    fn oscillator(&self, hz: f32, kind: OscillatorType, into: &GainNode) -> Result<OscillatorNode, AdapterError> {
        let osc = self.ctx.create_oscillator().map_err(audio_err)?;
        osc.set_type(kind);
        osc.frequency().set_value(hz);
        osc.connect_with_audio_node(into).map_err(audio_err)?;
        Ok(osc)
    }
}

fn audio_err(value: wasm_bindgen::JsValue) -> AdapterError {
    AdapterError::Audio(format!("{value:?}"))
}
