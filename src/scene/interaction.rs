// Pointer handling: orientation target on move, hit-testing on click.

use super::fauna::Cat;
use super::hearts::Heart;
use super::{Point, Scene, EASTER_EGG_TRACK};

/// Hearts released by a clicked cat.
pub const CAT_HEART_BURST: usize = 5;

/// What a click ended up touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickOutcome {
    pub cats_hit: usize,
    pub sunflowers_hit: usize,
    pub revealed_easter_egg: bool,
}

impl ClickOutcome {
    pub fn is_empty(&self) -> bool {
        self.cats_hit == 0 && self.sunflowers_hit == 0
    }
}

impl Scene {
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
    }

    /// Cats are tested first; if any cat is hit the sunflowers are left
    /// alone. Every entity within range reacts, there is no early exit.
    pub fn pointer_clicked(&mut self, x: f64, y: f64) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();
        if self.audio.is_none() {
            return outcome;
        }
        let at = Point::new(x, y);

        for i in 0..self.cats.len() {
            if !self.cats[i].contains(at) {
                continue;
            }
            outcome.cats_hit += 1;
            let frame = self.frame;
            let cat = &mut self.cats[i];
            let (cx, cy, breed, track) = (cat.x, cat.y, cat.breed, cat.track);
            let sting = cat.try_sting(frame);
            if let Some(audio) = self.audio.as_mut() {
                if sting {
                    audio.trigger_sting(breed);
                }
                if let Some(track) = track {
                    audio.switch_to(track);
                }
            }
            for _ in 0..CAT_HEART_BURST {
                self.spawn_heart(cx, cy);
            }
        }
        if outcome.cats_hit > 0 {
            log::debug!("click at ({x:.0}, {y:.0}) hit {} cat(s)", outcome.cats_hit);
            return outcome;
        }

        for i in 0..self.sunflowers.len() {
            let flower = &self.sunflowers[i];
            if !flower.contains(at) {
                continue;
            }
            outcome.sunflowers_hit += 1;
            let (fx, fy) = (flower.x, flower.y);
            if flower.special && !self.easter_egg_revealed {
                self.reveal_easter_egg(fx);
                outcome.revealed_easter_egg = true;
            } else {
                self.spawn_heart(fx, fy);
            }
        }
        outcome
    }

    /// The hidden cat climbs out of the ground under the special sunflower,
    /// facing the middle of the screen.
    fn reveal_easter_egg(&mut self, x: f64) {
        let facing_right = x < self.width / 2.0;
        let mut cat = Cat::easter_egg(x, self.ground_level, facing_right, &mut self.rng);
        if self.audio.as_ref().is_some_and(|a| a.mixer().knows(EASTER_EGG_TRACK)) {
            cat.track = Some(EASTER_EGG_TRACK);
        }
        self.cats.push(cat);
        self.easter_egg_revealed = true;
        log::info!("easter egg cat revealed at x={x:.0}");
    }

    fn spawn_heart(&mut self, x: f64, y: f64) {
        self.hearts.push(Heart::spawn(x, y, &mut self.rng));
        if let Some(audio) = self.audio.as_mut() {
            audio.chime();
        }
    }
}
