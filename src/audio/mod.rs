//! Generative audio: an ambient loop, one melodic loop per special track,
//! short stings for cats and a chime for hearts.
//!
//! `AudioEngine` owns the musical logic (sequencer, mixer, stings) and talks
//! to the sound hardware through `SoundBackend`. The browser backend lives in
//! `web`; `RecordingBackend` captures the same calls for headless runs.

pub mod mixer;
pub mod sequencer;
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::fauna::Breed;
use mixer::{FadeState, Mixer, Ramp};
use sequencer::{note_frequency, Melody, StepClock, AMBIENT, SPECIALS};

/// How far ahead of the audio clock notes are scheduled.
const LOOKAHEAD_SECONDS: f64 = 0.2;
/// Delay before the first sequencer step so it is never scheduled in the past.
const START_DELAY_SECONDS: f64 = 0.05;
const STING_SPACING_SECONDS: f64 = 0.1;
const CHIME_NOTE: &str = "C6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackId {
    Ambient,
    Special(usize),
}

impl TrackId {
    pub fn index(self) -> usize {
        match self {
            TrackId::Ambient => 0,
            TrackId::Special(i) => i + 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => TrackId::Ambient,
            i => TrackId::Special(i - 1),
        }
    }
}

/// Which instrument a note is played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Track(TrackId),
    Sting,
    Chime,
}

pub trait SoundBackend {
    /// Audio clock in seconds.
    fn now(&self) -> f64;
    fn play_note(&mut self, voice: Voice, frequency: f64, at: f64, duration: f64);
    /// Ramp a track to `level` (0..=1 of its nominal volume) over `duration`
    /// seconds, replacing any ramp in progress.
    fn ramp_track(&mut self, track: TrackId, level: f64, at: f64, duration: f64);
}

pub struct AudioEngine {
    backend: Box<dyn SoundBackend>,
    mixer: Mixer,
    clock: StepClock,
    tracks: Vec<&'static Melody>, // indexed by TrackId::index
}

impl AudioEngine {
    /// Builds every loop (all silent) and fades the ambient track in.
    pub fn new(backend: Box<dyn SoundBackend>, bpm: f64) -> Self {
        let now = backend.now();
        let tracks: Vec<&'static Melody> = std::iter::once(&AMBIENT).chain(SPECIALS.iter()).collect();
        let mut engine = Self {
            backend,
            mixer: Mixer::new(SPECIALS.len()),
            clock: StepClock::new(now + START_DELAY_SECONDS, bpm),
            tracks,
        };
        let ramp = engine.mixer.fade_in_ambient(now);
        engine.apply(&[ramp]);
        log::info!("audio ready: ambient + {} special tracks", SPECIALS.len());
        engine
    }

    pub fn now(&self) -> f64 {
        self.backend.now()
    }

    pub fn current(&self) -> TrackId {
        self.mixer.current()
    }

    pub fn special_tracks(&self) -> usize {
        self.mixer.specials()
    }

    pub fn track_state(&self, track: TrackId) -> FadeState {
        self.mixer.state(track, self.now())
    }

    pub fn track_level(&self, track: TrackId) -> f64 {
        self.mixer.level(track, self.now())
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Schedules every loop step that falls inside the lookahead window.
    /// Silent tracks keep playing so they stay in phase.
    pub fn pump(&mut self) {
        let now = self.now();
        let step_seconds = self.clock.step_seconds();
        for (step, start) in self.clock.due(now, now + LOOKAHEAD_SECONDS) {
            for (index, melody) in self.tracks.iter().enumerate() {
                for (note, at) in melody.notes_at(step, start, step_seconds) {
                    if let Some(freq) = note_frequency(note) {
                        self.backend
                            .play_note(Voice::Track(TrackId::from_index(index)), freq, at, step_seconds);
                    }
                }
            }
        }
    }

    /// Three-note arpeggio for the clicked breed. Never blocks.
    pub fn trigger_sting(&mut self, breed: Breed) {
        let now = self.now();
        let sixteenth = self.clock.step_seconds() / 2.0;
        for (i, note) in breed.sting_notes().iter().enumerate() {
            if let Some(freq) = note_frequency(note) {
                self.backend
                    .play_note(Voice::Sting, freq, now + i as f64 * STING_SPACING_SECONDS, sixteenth);
            }
        }
    }

    pub fn chime(&mut self) {
        let now = self.now();
        let eighth = self.clock.step_seconds();
        if let Some(freq) = note_frequency(CHIME_NOTE) {
            self.backend.play_note(Voice::Chime, freq, now, eighth);
        }
    }

    /// Cross-fades to `track`, or back to ambient if `track` is already on.
    pub fn switch_to(&mut self, track: TrackId) {
        let now = self.now();
        if !self.mixer.knows(track) {
            log::warn!("switch to unknown track {track:?} ignored");
            return;
        }
        let ramps = self.mixer.switch_to(track, now);
        log::debug!("track switch requested {track:?}, now playing {:?}", self.mixer.current());
        self.apply(&ramps);
    }

    /// Used when the scene is rebuilt: specials out fast, ambient back in.
    pub fn reset_to_ambient(&mut self) {
        let now = self.now();
        let ramps = self.mixer.reset(now);
        self.apply(&ramps);
    }

    fn apply(&mut self, ramps: &[Ramp]) {
        for r in ramps {
            self.backend.ramp_track(r.track, r.level, r.at, r.duration);
        }
    }
}

// --- Headless backend ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub voice: Voice,
    pub frequency: f64,
    pub at: f64,
    pub duration: f64,
}

#[derive(Debug, Default)]
pub struct SoundLog {
    pub time: f64,
    pub notes: Vec<NoteEvent>,
    pub ramps: Vec<Ramp>,
}

impl SoundLog {
    pub fn notes_on(&self, voice: Voice) -> Vec<NoteEvent> {
        self.notes.iter().copied().filter(|n| n.voice == voice).collect()
    }
}

/// Backend that records everything instead of making sound. Clones share
/// the same log and clock.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<SoundLog>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Rc<RefCell<SoundLog>> {
        Rc::clone(&self.log)
    }

    pub fn advance(&self, seconds: f64) {
        self.log.borrow_mut().time += seconds;
    }
}

impl SoundBackend for RecordingBackend {
    fn now(&self) -> f64 {
        self.log.borrow().time
    }

    fn play_note(&mut self, voice: Voice, frequency: f64, at: f64, duration: f64) {
        self.log.borrow_mut().notes.push(NoteEvent { voice, frequency, at, duration });
    }

    fn ramp_track(&mut self, track: TrackId, level: f64, at: f64, duration: f64) {
        self.log.borrow_mut().ramps.push(Ramp { track, level, at, duration });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (AudioEngine, RecordingBackend) {
        let backend = RecordingBackend::new();
        (AudioEngine::new(Box::new(backend.clone()), 100.0), backend)
    }

    #[test]
    fn test_track_ids_round_trip_through_index() {
        assert_eq!(TrackId::from_index(0), TrackId::Ambient);
        assert_eq!(TrackId::from_index(3), TrackId::Special(2));
        assert_eq!(TrackId::Special(2).index(), 3);
    }

    #[test]
    fn test_starts_with_ambient_fading_in() {
        let (audio, backend) = engine();
        assert_eq!(audio.current(), TrackId::Ambient);
        assert_eq!(audio.track_state(TrackId::Ambient), FadeState::FadingIn);
        assert_eq!(audio.track_state(TrackId::Special(0)), FadeState::Idle);
        let log = backend.log();
        assert_eq!(log.borrow().ramps.len(), 1);
        backend.advance(0.25);
        assert!((audio.track_level(TrackId::Ambient) - 0.25).abs() < 1e-12);
        backend.advance(0.75);
        assert_eq!(audio.track_state(TrackId::Ambient), FadeState::Audible);
        assert_eq!(audio.track_level(TrackId::Ambient), 1.0);
    }

    #[test]
    fn test_cross_fade_levels_mid_switch() {
        let (mut audio, backend) = engine();
        assert_eq!(audio.special_tracks(), SPECIALS.len());
        backend.advance(1.0);
        audio.switch_to(TrackId::Special(2));
        backend.advance(0.4);
        assert!((audio.track_level(TrackId::Ambient) - 0.6).abs() < 1e-12);
        assert!((audio.track_level(TrackId::Special(2)) - 0.4).abs() < 1e-12);
        // reversing mid-fade starts from the level reached so far
        audio.switch_to(TrackId::Special(2));
        backend.advance(0.5);
        assert!((audio.track_level(TrackId::Special(2)) - 0.2).abs() < 1e-12);
        assert!((audio.track_level(TrackId::Ambient) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_tempo_still_schedules() {
        let backend = RecordingBackend::new();
        let mut audio = AudioEngine::new(Box::new(backend.clone()), 0.0);
        audio.pump();
        assert!(!backend.log().borrow().notes.is_empty());
    }

    #[test]
    fn test_sting_is_a_spaced_arpeggio() {
        let (mut audio, backend) = engine();
        audio.trigger_sting(Breed::Calico);
        let stings = backend.log().borrow().notes_on(Voice::Sting);
        assert_eq!(stings.len(), 3);
        let expected: Vec<f64> = ["E5", "G5", "B5"].iter().filter_map(|n| note_frequency(n)).collect();
        assert_eq!(stings.iter().map(|n| n.frequency).collect::<Vec<_>>(), expected);
        assert!((stings[2].at - stings[0].at - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_switching_twice_returns_to_ambient() {
        let (mut audio, backend) = engine();
        backend.advance(1.0);
        audio.switch_to(TrackId::Special(1));
        assert_eq!(audio.current(), TrackId::Special(1));
        backend.advance(0.3);
        audio.switch_to(TrackId::Special(1));
        assert_eq!(audio.current(), TrackId::Ambient);
        backend.advance(1.0);
        assert_eq!(audio.track_state(TrackId::Ambient), FadeState::Audible);
        assert_eq!(audio.track_state(TrackId::Special(1)), FadeState::Idle);
    }

    #[test]
    fn test_pump_schedules_every_track_once_per_step() {
        let (mut audio, backend) = engine();
        audio.pump();
        let first = backend.log().borrow().notes.len();
        assert!(first > 0);
        audio.pump(); // same clock time: nothing new
        assert_eq!(backend.log().borrow().notes.len(), first);
        backend.advance(0.3);
        audio.pump();
        assert!(backend.log().borrow().notes.len() > first);
        let log = backend.log();
        let log = log.borrow();
        assert!(log.notes.iter().any(|n| n.voice == Voice::Track(TrackId::Special(3))));
    }
}
