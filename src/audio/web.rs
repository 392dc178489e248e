//! Web Audio backend: one gain node per track plus one per one-shot voice,
//! every note a short-lived oscillator shaped by an ADSR envelope.

use web_sys::{AudioContext, GainNode, OscillatorType};

use super::{SoundBackend, TrackId, Voice};
use crate::error::{Result, SceneError};

const TRACK_DB: f64 = -26.0;
const STING_DB: f64 = -12.0;
const CHIME_DB: f64 = -10.0;

fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

#[derive(Debug, Clone, Copy)]
struct Envelope {
    attack: f64,
    decay: f64,
    sustain: f64, // fraction of peak
    release: f64,
    wave: OscillatorType,
}

impl Envelope {
    fn for_voice(voice: Voice) -> Self {
        match voice {
            Voice::Track(_) => Envelope { attack: 0.01, decay: 0.2, sustain: 0.5, release: 1.0, wave: OscillatorType::Triangle },
            Voice::Sting => Envelope { attack: 0.01, decay: 0.1, sustain: 0.2, release: 0.4, wave: OscillatorType::Triangle },
            Voice::Chime => Envelope { attack: 0.01, decay: 0.2, sustain: 0.1, release: 0.2, wave: OscillatorType::Sine },
        }
    }
}

pub struct WebAudio {
    ctx: AudioContext,
    tracks: Vec<GainNode>, // indexed by TrackId::index
    sting: GainNode,
    chime: GainNode,
}

impl WebAudio {
    /// Must be called from a user gesture, browsers keep the context
    /// suspended otherwise.
    pub fn new(track_count: usize) -> Result<Self> {
        let ctx = AudioContext::new().map_err(|e| SceneError::Audio(format!("{e:?}")))?;
        let _ = ctx.resume()?;
        let mut tracks = Vec::with_capacity(track_count);
        for _ in 0..track_count {
            tracks.push(bus(&ctx, 0.0)?);
        }
        let sting = bus(&ctx, db_to_gain(STING_DB))?;
        let chime = bus(&ctx, db_to_gain(CHIME_DB))?;
        Ok(Self { ctx, tracks, sting, chime })
    }

    fn voice_bus(&self, voice: Voice) -> Option<&GainNode> {
        match voice {
            Voice::Track(t) => self.tracks.get(t.index()),
            Voice::Sting => Some(&self.sting),
            Voice::Chime => Some(&self.chime),
        }
    }

    fn schedule_note(&self, voice: Voice, frequency: f64, at: f64, duration: f64) -> Result<()> {
        let Some(out) = self.voice_bus(voice) else {
            return Ok(());
        };
        let env = Envelope::for_voice(voice);
        let osc = self.ctx.create_oscillator()?;
        osc.set_type(env.wave);
        osc.frequency().set_value(frequency as f32);

        let amp = self.ctx.create_gain()?;
        let gain = amp.gain();
        let release_at = at + duration.max(env.attack + env.decay);
        gain.set_value_at_time(0.0, at)?;
        gain.linear_ramp_to_value_at_time(1.0, at + env.attack)?;
        gain.linear_ramp_to_value_at_time(env.sustain as f32, at + env.attack + env.decay)?;
        gain.set_value_at_time(env.sustain as f32, release_at)?;
        gain.linear_ramp_to_value_at_time(0.0, release_at + env.release)?;

        osc.connect_with_audio_node(&amp)?;
        amp.connect_with_audio_node(out)?;
        osc.start_with_when(at)?;
        osc.stop_with_when(release_at + env.release)?;
        Ok(())
    }
}

fn bus(ctx: &AudioContext, gain: f64) -> Result<GainNode> {
    let node = ctx.create_gain()?;
    node.gain().set_value(gain as f32);
    node.connect_with_audio_node(&ctx.destination())?;
    Ok(node)
}

impl SoundBackend for WebAudio {
    fn now(&self) -> f64 {
        self.ctx.current_time()
    }

    fn play_note(&mut self, voice: Voice, frequency: f64, at: f64, duration: f64) {
        if let Err(e) = self.schedule_note(voice, frequency, at, duration) {
            log::warn!("note dropped: {e}");
        }
    }

    fn ramp_track(&mut self, track: TrackId, level: f64, at: f64, duration: f64) {
        let Some(node) = self.tracks.get(track.index()) else {
            return;
        };
        let param = node.gain();
        let target = (level * db_to_gain(TRACK_DB)) as f32;
        let scheduled = param
            .cancel_scheduled_values(at)
            .and_then(|p| p.set_value_at_time(p.value(), at))
            .and_then(|p| p.linear_ramp_to_value_at_time(target, at + duration));
        if let Err(e) = scheduled {
            log::warn!("track ramp on {track:?} failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_gain() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-12);
        assert!(db_to_gain(TRACK_DB) < db_to_gain(STING_DB));
    }
}
