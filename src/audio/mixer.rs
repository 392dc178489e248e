//! Track fades as explicit state machines.
//!
//! The browser evaluates gain ramps on its own clock; `Mixer` keeps a mirror
//! of every ramp so the current state of any track can be queried for an
//! arbitrary time without touching the audio subsystem.

use super::TrackId;

/// Seconds for a regular track switch.
pub const FADE_SECONDS: f64 = 1.0;
/// Seconds used to silence special tracks when the scene is rebuilt.
pub const RESET_FADE_SECONDS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Idle,
    FadingIn,
    Audible,
    FadingOut,
}

/// Linear ramp of a track level (0 = silent, 1 = full track volume).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fader {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Fader {
    pub fn silent() -> Self {
        Self { from: 0.0, to: 0.0, start: 0.0, duration: 0.0 }
    }

    pub fn level(&self, now: f64) -> f64 {
        if self.duration <= 0.0 || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = (now - self.start) / self.duration;
        self.from + (self.to - self.from) * t
    }

    /// Starts a new ramp from wherever the level is at `now`; any ramp still
    /// in flight is replaced.
    pub fn ramp_to(&mut self, target: f64, now: f64, duration: f64) {
        self.from = self.level(now);
        self.to = target;
        self.start = now;
        self.duration = duration.max(0.0);
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn state(&self, now: f64) -> FadeState {
        let in_flight = now < self.start + self.duration && self.from != self.to;
        match (in_flight, self.to > self.from) {
            (true, true) => FadeState::FadingIn,
            (true, false) => FadeState::FadingOut,
            (false, _) if self.to > 0.0 => FadeState::Audible,
            (false, _) => FadeState::Idle,
        }
    }
}

/// A ramp the backend has to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub track: TrackId,
    pub level: f64,
    pub at: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct Mixer {
    faders: Vec<Fader>, // index 0 is ambient, then the specials
    current: TrackId,
}

impl Mixer {
    /// All tracks silent and `current` pointing at ambient; call
    /// `fade_in_ambient` to make it audible.
    pub fn new(specials: usize) -> Self {
        Self { faders: vec![Fader::silent(); specials + 1], current: TrackId::Ambient }
    }

    pub fn specials(&self) -> usize {
        self.faders.len() - 1
    }

    pub fn current(&self) -> TrackId {
        self.current
    }

    pub fn knows(&self, track: TrackId) -> bool {
        track.index() < self.faders.len()
    }

    pub fn level(&self, track: TrackId, now: f64) -> f64 {
        self.faders.get(track.index()).map_or(0.0, |f| f.level(now))
    }

    pub fn state(&self, track: TrackId, now: f64) -> FadeState {
        self.faders.get(track.index()).map_or(FadeState::Idle, |f| f.state(now))
    }

    /// Tracks whose level is above silence at `now`.
    pub fn audible(&self, now: f64) -> Vec<TrackId> {
        (0..self.faders.len())
            .map(TrackId::from_index)
            .filter(|t| self.level(*t, now) > 0.0)
            .collect()
    }

    fn ramp(&mut self, track: TrackId, level: f64, now: f64, duration: f64) -> Ramp {
        self.faders[track.index()].ramp_to(level, now, duration);
        Ramp { track, level, at: now, duration }
    }

    pub fn fade_in_ambient(&mut self, now: f64) -> Ramp {
        self.current = TrackId::Ambient;
        self.ramp(TrackId::Ambient, 1.0, now, FADE_SECONDS)
    }

    /// Selecting the current track again toggles back to ambient; any other
    /// track replaces the current one. Unknown tracks are ignored.
    pub fn switch_to(&mut self, target: TrackId, now: f64) -> Vec<Ramp> {
        if !self.knows(target) {
            return Vec::new();
        }
        let previous = self.current;
        if target == TrackId::Ambient && previous == TrackId::Ambient {
            return vec![self.fade_in_ambient(now)];
        }
        let next = if target == previous { TrackId::Ambient } else { target };
        let out = self.ramp(previous, 0.0, now, FADE_SECONDS);
        let into = self.ramp(next, 1.0, now, FADE_SECONDS);
        self.current = next;
        vec![out, into]
    }

    /// Quickly silences every special track and brings ambient back.
    pub fn reset(&mut self, now: f64) -> Vec<Ramp> {
        let sounding: Vec<TrackId> = (1..self.faders.len())
            .map(TrackId::from_index)
            .filter(|t| self.faders[t.index()].target() > 0.0 || self.level(*t, now) > 0.0)
            .collect();
        let mut ramps: Vec<Ramp> = sounding
            .into_iter()
            .map(|t| self.ramp(t, 0.0, now, RESET_FADE_SECONDS))
            .collect();
        ramps.push(self.fade_in_ambient(now));
        ramps
    }
}
