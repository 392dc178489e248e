// Cats: idle animation (tail, head tilt, blinking), sound stings and the
// hidden orange-faced cat that climbs out of the ground.

use std::f64::consts::{PI, TAU};

use super::{FrameContext, Point};
use crate::audio::TrackId;
use crate::paint::{Paint, Painter};

/// Click radius around a cat's anchor point.
pub const HIT_RADIUS: f64 = 50.0;
/// Frames a cat stays mute after a sting (~400ms at 60fps).
pub const STING_COOLDOWN_FRAMES: u64 = 24;

const TAIL_STEP: f64 = 0.05;
// Tail drives sin(θ) and head tilt drives sin(0.7θ); 20π is a period of both.
const TAIL_PERIOD: f64 = 20.0 * PI;
const HEAD_TILT: f64 = 0.08;
const BLINK_FRAMES: i32 = 5;
const RISE_DEPTH: f64 = 30.0;
const RISE_STEP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breed {
    Siamese,
    Calico,
    WhiteBeige,
    OrangeFace, // easter egg
}

impl Breed {
    /// Arpeggio played when this breed is clicked.
    pub fn sting_notes(self) -> [&'static str; 3] {
        match self {
            Breed::Siamese => ["C5", "E5", "G5"],
            Breed::Calico => ["E5", "G5", "B5"],
            Breed::WhiteBeige => ["G5", "B5", "D6"],
            Breed::OrangeFace => ["D5", "F#5", "A5"],
        }
    }

    fn style(self) -> &'static BreedStyle {
        match self {
            Breed::Siamese => &SIAMESE,
            Breed::Calico => &CALICO,
            Breed::WhiteBeige => &WHITE_BEIGE,
            Breed::OrangeFace => &ORANGE_FACE,
        }
    }
}

// --- Per-breed drawing table -------------------------------------------------

struct BreedStyle {
    tail: &'static str,
    body: (&'static str, &'static str), // radial gradient inner, outer
    head: &'static str,
    ears: (&'static str, &'static str), // left, right
    mask: Option<&'static str>,         // face overlay
    patches: Option<(&'static str, &'static str)>,
}

static SIAMESE: BreedStyle = BreedStyle {
    tail: "#a08d7e",
    body: ("#f2e6d9", "#d4c3b5"),
    head: "#f2e6d9",
    ears: ("#654321", "#654321"),
    mask: Some("#a08d7e"),
    patches: None,
};

static CALICO: BreedStyle = BreedStyle {
    tail: "#D2691E",
    body: ("#ffffff", "#e8e8e8"),
    head: "#ffffff",
    ears: ("#f2b28c", "#000000"),
    mask: None,
    patches: Some(("#000000", "#D2691E")),
};

static WHITE_BEIGE: BreedStyle = BreedStyle {
    tail: "#e3d5c8",
    body: ("#ffffff", "#e8e8e8"),
    head: "#ffffff",
    ears: ("#f2b28c", "#f2b28c"),
    mask: None,
    patches: Some(("#e3d5c8", "#d4c3b5")),
};

static ORANGE_FACE: BreedStyle = BreedStyle {
    tail: "#ffA500",
    body: ("#ffffff", "#e8e8e8"),
    head: "#ffffff",
    ears: ("#ffA500", "#ffA500"),
    mask: Some("#ffA500"),
    patches: None,
};

// --- Blink timer -------------------------------------------------------------

/// Counts down to zero, stays shut for `BLINK_FRAMES`, then re-arms.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    countdown: i32,
}

impl Blink {
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        Self { countdown: rng.i32(100..300) }
    }

    pub fn update(&mut self, rng: &mut fastrand::Rng) {
        self.countdown -= 1;
        if self.countdown <= -BLINK_FRAMES {
            self.countdown = rng.i32(150..450);
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.countdown <= 0
    }

    pub fn countdown(&self) -> i32 {
        self.countdown
    }
}

#[derive(Debug, Clone, Copy)]
struct Patch {
    x: f64,
    y: f64,
    size: f64,
    rot: f64,
}

pub struct Cat {
    pub x: f64,
    pub y: f64,
    pub breed: Breed,
    pub scale: f64,
    pub facing_right: bool,
    pub tail_sway: f64,
    pub head_tilt: f64,
    pub blink: Blink,
    pub track: Option<TrackId>,
    patches: [Patch; 2],
    rest_y: Option<f64>, // set while an easter-egg cat is still climbing
    sting_ready_at: u64,
}

impl Cat {
    pub fn new(x: f64, y: f64, breed: Breed, scale: f64, facing_right: bool, rng: &mut fastrand::Rng) -> Self {
        Self {
            x,
            y,
            breed,
            scale,
            facing_right,
            tail_sway: rng.f64() * TAU,
            head_tilt: 0.0,
            blink: Blink::new(rng),
            track: None,
            patches: [
                Patch { x: -5.0, y: -8.0, size: 10.0, rot: rng.f64() * PI },
                Patch { x: 15.0, y: 5.0, size: 8.0, rot: rng.f64() * PI },
            ],
            rest_y: None,
            sting_ready_at: 0,
        }
    }

    /// The hidden cat starts below `ground_level` and climbs up to it.
    pub fn easter_egg(x: f64, ground_level: f64, facing_right: bool, rng: &mut fastrand::Rng) -> Self {
        let mut cat = Self::new(x, ground_level + RISE_DEPTH, Breed::OrangeFace, 0.8, facing_right, rng);
        cat.rest_y = Some(ground_level);
        cat
    }

    pub fn is_easter_egg(&self) -> bool {
        self.breed == Breed::OrangeFace
    }

    pub fn is_rising(&self) -> bool {
        self.rest_y.is_some()
    }

    pub fn contains(&self, p: Point) -> bool {
        Point::new(self.x, self.y).distance(p) < HIT_RADIUS
    }

    /// Arms the sting cooldown and reports whether a sting may play now.
    pub fn try_sting(&mut self, frame: u64) -> bool {
        if frame < self.sting_ready_at {
            return false;
        }
        self.sting_ready_at = frame + STING_COOLDOWN_FRAMES;
        true
    }

    pub fn update(&mut self, _ctx: &FrameContext, rng: &mut fastrand::Rng) {
        if let Some(rest) = self.rest_y {
            self.y -= RISE_STEP;
            if self.y <= rest {
                self.y = rest;
                self.rest_y = None;
            }
        }
        self.tail_sway = (self.tail_sway + TAIL_STEP).rem_euclid(TAIL_PERIOD);
        self.head_tilt = (self.tail_sway * 0.7).sin() * HEAD_TILT;
        self.blink.update(rng);
    }

    pub fn draw(&self, p: &mut dyn Painter) {
        let style = self.breed.style();
        p.save();
        p.translate(self.x, self.y);
        p.scale(self.scale * if self.facing_right { 1.0 } else { -1.0 }, self.scale);

        // tail
        p.begin_path();
        p.move_to(-25.0, -5.0);
        p.quadratic_curve_to(-50.0 + self.tail_sway.sin() * 5.0, -40.0, -35.0, -15.0);
        p.set_line_width(4.0);
        p.set_stroke(style.tail);
        p.stroke();

        // body
        p.set_fill(&Paint::Radial {
            inner: (0.0, 0.0, 5.0),
            outer: (0.0, 0.0, 30.0),
            stops: vec![(0.0, style.body.0), (1.0, style.body.1)],
        });
        p.begin_path();
        p.ellipse(0.0, 0.0, 28.0, 20.0, 0.0);
        p.fill();
        if let Some((first, second)) = style.patches {
            draw_patch(p, &self.patches[0], first);
            draw_patch(p, &self.patches[1], second);
        }

        // head
        p.save();
        p.rotate(self.head_tilt);
        let (hx, hy) = (20.0, -15.0);
        p.set_fill(&Paint::color(style.head));
        p.begin_path();
        p.arc(hx, hy, 15.0, 0.0, TAU);
        p.fill();
        draw_ears(p, hx, hy, style.ears);
        self.draw_face(p, hx, hy, style.mask);
        p.restore();

        p.restore();
    }

    fn draw_face(&self, p: &mut dyn Painter, hx: f64, hy: f64, mask: Option<&str>) {
        if let Some(color) = mask {
            p.set_fill(&Paint::color(color));
            p.begin_path();
            p.ellipse(hx, hy, 16.0, 15.0, 0.0);
            p.fill();
        }
        if self.blink.is_blinking() {
            p.set_stroke("#000");
            p.set_line_width(1.0);
            p.begin_path();
            p.move_to(hx - 7.0, hy);
            p.line_to(hx - 3.0, hy);
            p.move_to(hx + 3.0, hy);
            p.line_to(hx + 7.0, hy);
            p.stroke();
        } else {
            p.set_fill(&Paint::color("#000"));
            p.begin_path();
            p.arc(hx - 5.0, hy, 2.0, 0.0, TAU);
            p.arc(hx + 5.0, hy, 2.0, 0.0, TAU);
            p.fill();
        }
    }
}

fn draw_patch(p: &mut dyn Painter, patch: &Patch, color: &str) {
    p.set_fill(&Paint::color(color));
    p.begin_path();
    p.ellipse(patch.x, patch.y, patch.size, patch.size * 0.7, patch.rot);
    p.fill();
}

fn draw_ears(p: &mut dyn Painter, hx: f64, hy: f64, (left, right): (&str, &str)) {
    p.set_fill(&Paint::color(left));
    p.begin_path();
    p.move_to(hx - 15.0, hy - 5.0);
    p.line_to(hx - 5.0, hy - 20.0);
    p.line_to(hx, hy - 5.0);
    p.fill();

    p.set_fill(&Paint::color(right));
    p.begin_path();
    p.move_to(hx + 15.0, hy - 5.0);
    p.line_to(hx + 5.0, hy - 20.0);
    p.line_to(hx, hy - 5.0);
    p.fill();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FrameContext {
        FrameContext {
            frame: 0,
            pointer: Point::new(0.0, 0.0),
            width: 800.0,
            height: 600.0,
            ground_level: 530.0,
        }
    }

    #[test]
    fn test_blink_holds_for_fixed_duration_then_rearms() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut blink = Blink::new(&mut rng);
        let mut shut = 0;
        while !blink.is_blinking() {
            blink.update(&mut rng);
        }
        while blink.is_blinking() {
            shut += 1;
            blink.update(&mut rng);
        }
        assert_eq!(shut, BLINK_FRAMES);
        assert!((150..450).contains(&blink.countdown()));
    }

    #[test]
    fn test_sting_cooldown_drops_rapid_repeats() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut cat = Cat::new(0.0, 0.0, Breed::Calico, 0.8, true, &mut rng);
        assert!(cat.try_sting(10));
        assert!(!cat.try_sting(11));
        assert!(!cat.try_sting(10 + STING_COOLDOWN_FRAMES - 1));
        assert!(cat.try_sting(10 + STING_COOLDOWN_FRAMES));
    }

    #[test]
    fn test_easter_egg_climbs_to_ground() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut cat = Cat::easter_egg(300.0, 530.0, false, &mut rng);
        assert_eq!(cat.y, 560.0);
        for _ in 0..59 {
            cat.update(&ctx(), &mut rng);
        }
        assert!(cat.is_rising());
        cat.update(&ctx(), &mut rng);
        assert_eq!(cat.y, 530.0);
        assert!(!cat.is_rising());
        cat.update(&ctx(), &mut rng);
        assert_eq!(cat.y, 530.0);
    }

    #[test]
    fn test_head_tilt_continuous_across_tail_wrap() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut cat = Cat::new(0.0, 0.0, Breed::Siamese, 0.9, false, &mut rng);
        cat.tail_sway = TAIL_PERIOD - 0.01;
        let before = tilt_at(cat.tail_sway);
        cat.update(&ctx(), &mut rng);
        assert!(cat.tail_sway < 0.05);
        assert!((cat.head_tilt - before).abs() < 0.01);
    }

    #[test]
    fn test_sting_sets_differ_per_breed() {
        assert_eq!(Breed::Calico.sting_notes(), ["E5", "G5", "B5"]);
        assert_ne!(Breed::Siamese.sting_notes(), Breed::WhiteBeige.sting_notes());
    }

    #[test]
    fn test_tail_phase_accumulates() {
        let mut rng = fastrand::Rng::with_seed(6);
        let mut cat = Cat::new(0.0, 0.0, Breed::WhiteBeige, 0.85, true, &mut rng);
        let t0 = cat.tail_sway;
        for _ in 0..1000 {
            cat.update(&ctx(), &mut rng);
        }
        let expected = (t0 + 1000.0 * TAIL_STEP).rem_euclid(TAU);
        let actual = cat.tail_sway.rem_euclid(TAU);
        let gap = (actual - expected).abs();
        assert!(gap.min(TAU - gap) < 1e-9, "{actual} vs {expected}");
        assert!((cat.head_tilt - tilt_at(cat.tail_sway)).abs() < 1e-12);
    }

    fn tilt_at(tail: f64) -> f64 {
        (tail * 0.7).sin() * HEAD_TILT
    }
}
