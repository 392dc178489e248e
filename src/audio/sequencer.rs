//! Looping melodies on a shared eighth-note step clock.
//!
//! Each step of a melody holds zero or more notes. An empty step is a rest;
//! a step with several notes splits its duration evenly between them
//! (two notes become sixteenths, three become triplets).

/// One melodic loop.
pub struct Melody {
    pub name: &'static str,
    pub steps: &'static [&'static [&'static str]],
}

impl Melody {
    /// Notes sounding in `step` as `(note, start_time)` pairs.
    pub fn notes_at(&self, step: u64, step_start: f64, step_seconds: f64) -> Vec<(&'static str, f64)> {
        if self.steps.is_empty() {
            return Vec::new();
        }
        let notes = self.steps[(step % self.steps.len() as u64) as usize];
        let slot = step_seconds / notes.len().max(1) as f64;
        notes
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, step_start + i as f64 * slot))
            .collect()
    }
}

pub static AMBIENT: Melody = Melody {
    name: "ambient",
    steps: &[
        &["D4", "A4"], &["F#4"], &["D4"], &[], &["A4"], &["F#4"], &["D4"],
        &["A4", "E5"], &["C#5"], &["A4"], &[], &["E5"], &["C#5"], &["A4"],
        &["B4", "F#5"], &["D5"], &["B4"], &[], &["F#5"], &["D5"], &["B4"],
        &["G4", "D5"], &["B4"], &["G4"], &[], &["D5"], &["B4"], &["G4"],
    ],
};

/// Special tracks: one per standard cat, the last one for the hidden cat.
pub static SPECIALS: [Melody; 4] = [
    Melody {
        name: "calico",
        steps: &[&["G4", "D5", "B5"], &[], &["G5"], &["D5"], &["B4"], &[], &["C5", "G5", "E5"], &[]],
    },
    Melody {
        name: "siamese",
        steps: &[&["A3", "E4"], &["C4"], &["G4"], &[], &["D4", "A4"], &["F4"], &["C5"], &[]],
    },
    Melody {
        name: "white-beige",
        steps: &[&["F4", "C5"], &[], &["A4"], &[], &["A#3", "F4"], &[], &["D4"], &[]],
    },
    Melody {
        name: "orange-face",
        steps: &[&["E4", "B4"], &["G#4"], &[], &["A4"], &["E4"], &["G#4"], &[]],
    },
];

/// Equal-tempered frequency of a note name such as `A4`, `F#5` or `Bb3`.
pub fn note_frequency(name: &str) -> Option<f64> {
    let mut chars = name.chars();
    let semitone: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave) = match rest.as_bytes().first()? {
        b'#' => (1, &rest[1..]),
        b'b' => (-1, &rest[1..]),
        _ => (0, rest),
    };
    let octave: i32 = octave.parse().ok()?;
    let midi = 12 * (octave + 1) + semitone + accidental;
    Some(440.0 * 2f64.powf(f64::from(midi - 69) / 12.0))
}

// --- Step clock -------------------------------------------------------------

pub const DEFAULT_BPM: f64 = 100.0;

/// Eighth-note grid anchored at `origin` (audio clock seconds).
#[derive(Debug, Clone)]
pub struct StepClock {
    origin: f64,
    step_seconds: f64,
    next_step: u64,
}

impl StepClock {
    /// A tempo that is not a positive finite number falls back to
    /// `DEFAULT_BPM`; `due` would never terminate otherwise.
    pub fn new(origin: f64, bpm: f64) -> Self {
        let bpm = if bpm.is_finite() && bpm > 0.0 {
            bpm
        } else {
            log::warn!("invalid tempo {bpm} bpm, using {DEFAULT_BPM}");
            DEFAULT_BPM
        };
        Self { origin, step_seconds: 30.0 / bpm, next_step: 0 }
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    pub fn step_time(&self, step: u64) -> f64 {
        self.origin + step as f64 * self.step_seconds
    }

    /// Steps starting before `horizon` that have not been handed out yet.
    /// Steps that already lie in the past of `now` are skipped, so a stalled
    /// tab does not burst out a backlog of notes.
    pub fn due(&mut self, now: f64, horizon: f64) -> Vec<(u64, f64)> {
        if self.step_time(self.next_step) < now {
            let behind = ((now - self.origin) / self.step_seconds).ceil().max(0.0) as u64;
            self.next_step = self.next_step.max(behind);
        }
        let mut out = Vec::new();
        while self.step_time(self.next_step) < horizon {
            out.push((self.next_step, self.step_time(self.next_step)));
            self.next_step += 1;
        }
        out
    }
}
