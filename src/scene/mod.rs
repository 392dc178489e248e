//! Scene director: owns every entity, runs the per-frame update/draw pass
//! and rebuilds the layout on start and resize.
//!
//! Draw order, back to front: stars, shooting stars, ground, fireflies, then
//! cats and sunflowers together sorted by `y` (higher on screen = farther
//! away = drawn first), then hearts, then the typewriter text.

pub mod celestial;
pub mod fauna;
pub mod flora;
pub mod hearts;
pub mod interaction;

use crate::audio::{AudioEngine, TrackId};
use crate::config::SceneConfig;
use crate::paint::{Paint, Painter};
use crate::typewriter::Typewriter;
use celestial::{Firefly, ShootingStar, Star};
use fauna::{Breed, Cat};
use flora::Sunflower;
use hearts::Heart;

pub use interaction::ClickOutcome;

const BASE_SUNFLOWER_SIZE: f64 = 20.0;

/// Standard cats: (fraction of width, breed, scale, facing right).
const CAT_LAYOUT: [(f64, Breed, f64, bool); 3] = [
    (0.20, Breed::Calico, 0.8, true),
    (0.70, Breed::Siamese, 0.9, false),
    (0.90, Breed::WhiteBeige, 0.85, true),
];
/// Track of the hidden cat; the standard cats use 0..CAT_LAYOUT.len().
pub const EASTER_EGG_TRACK: TrackId = TrackId::Special(3);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Everything an entity may read during its update.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub frame: u64,
    pub pointer: Point,
    pub width: f64,
    pub height: f64,
    pub ground_level: f64,
}

/// Entry of the depth-sorted pass.
#[derive(Debug, Clone, Copy)]
enum Actor {
    Cat(usize),
    Flower(usize),
}

pub struct Scene {
    config: SceneConfig,
    width: f64,
    height: f64,
    ground_level: f64,
    frame: u64,
    pointer: Point,
    rng: fastrand::Rng,

    stars: Vec<Star>,
    shooting_stars: Vec<ShootingStar>,
    fireflies: Vec<Firefly>,
    sunflowers: Vec<Sunflower>,
    cats: Vec<Cat>,
    hearts: Vec<Heart>,
    easter_egg_revealed: bool,

    typewriter: Typewriter,
    audio: Option<AudioEngine>,
}

impl Scene {
    pub fn new(config: SceneConfig, width: f64, height: f64, seed: u64) -> Self {
        let typewriter = Typewriter::new(config.greeting.clone(), config.typing_cadence);
        let mut scene = Self {
            config,
            width: 0.0,
            height: 0.0,
            ground_level: 0.0,
            frame: 0,
            pointer: Point::new(width / 2.0, height / 2.0),
            rng: fastrand::Rng::with_seed(seed),
            stars: Vec::new(),
            shooting_stars: Vec::new(),
            fireflies: Vec::new(),
            sunflowers: Vec::new(),
            cats: Vec::new(),
            hearts: Vec::new(),
            easter_egg_revealed: false,
            typewriter,
            audio: None,
        };
        scene.initialize(width, height);
        scene
    }

    /// Clears and repopulates every entity collection for the given viewport.
    /// A viewport without width leaves the scene empty.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.ground_level = height - self.config.ground_margin;
        self.stars.clear();
        self.shooting_stars.clear();
        self.fireflies.clear();
        self.sunflowers.clear();
        self.cats.clear();
        self.hearts.clear();
        self.easter_egg_revealed = false;
        if !(width.is_finite() && width > 0.0) {
            log::warn!("viewport width {width} is unusable, scene left empty");
            return;
        }

        let count = self.config.sunflower_count;
        let spacing = width / (count + 1) as f64;
        let special = count / 2;
        let half = width / 2.0;
        for i in 0..count {
            let x = spacing * (i + 1) as f64 + (self.rng.f64() - 0.5) * 30.0;
            let y = self.ground_level - (self.rng.f64() * 180.0 + 80.0);
            let size = BASE_SUNFLOWER_SIZE - ((x - half).abs() / half) * 8.0 + self.rng.f64() * 5.0;
            let flower = Sunflower::new(x, y, size, i == special, self.pointer, &mut self.rng);
            self.sunflowers.push(flower);
        }
        for _ in 0..self.config.star_count {
            self.stars.push(Star::spawn(&mut self.rng, width, self.ground_level));
        }
        for _ in 0..self.config.firefly_count {
            self.fireflies.push(Firefly::spawn(&mut self.rng, width, self.ground_level));
        }
        for _ in 0..self.config.shooting_star_count {
            self.shooting_stars.push(ShootingStar::spawn(&mut self.rng, width, height));
        }
        for (i, (fx, breed, scale, facing_right)) in CAT_LAYOUT.into_iter().enumerate() {
            let mut cat = Cat::new(width * fx, self.ground_level, breed, scale, facing_right, &mut self.rng);
            if self.audio.is_some() {
                cat.track = Some(TrackId::Special(i));
            }
            self.cats.push(cat);
        }
        log::debug!(
            "scene initialized {}x{}: {} sunflowers, {} cats",
            width,
            height,
            self.sunflowers.len(),
            self.cats.len()
        );
    }

    /// Called once the start gesture has unlocked audio. Rebuilds the scene
    /// so the cats pick up their tracks.
    pub fn attach_audio(&mut self, engine: AudioEngine) {
        self.audio = Some(engine);
        self.initialize(self.width, self.height);
        log::info!("scene started");
    }

    pub fn is_ready(&self) -> bool {
        self.audio.is_some()
    }

    /// Full rebuild after a viewport change.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.frame = 0;
        if let Some(audio) = self.audio.as_mut() {
            audio.reset_to_ambient();
        }
        self.initialize(width, height);
        self.typewriter.set_lines(self.config.greeting.clone());
        log::info!("scene resized to {width}x{height}");
    }

    pub fn set_poem(&mut self, lines: Vec<String>) {
        self.typewriter.set_lines(lines);
    }

    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            frame: self.frame,
            pointer: self.pointer,
            width: self.width,
            height: self.height,
            ground_level: self.ground_level,
        }
    }

    /// One display refresh. Does nothing until audio is attached.
    pub fn tick(&mut self, p: &mut dyn Painter) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        audio.pump();

        p.clear_rect(0.0, 0.0, self.width, self.height);
        self.frame += 1;
        let ctx = self.frame_context();

        for star in &mut self.stars {
            star.update();
            star.draw(p);
        }
        for s in &mut self.shooting_stars {
            s.update(&ctx, &mut self.rng);
            s.draw(p);
        }
        self.draw_ground(p);
        for f in &mut self.fireflies {
            f.update(&ctx);
            f.draw(p);
        }

        for actor in self.depth_order() {
            match actor {
                Actor::Cat(i) => {
                    let cat = &mut self.cats[i];
                    cat.update(&ctx, &mut self.rng);
                    cat.draw(p);
                }
                Actor::Flower(i) => {
                    let flower = &mut self.sunflowers[i];
                    flower.update(&ctx);
                    flower.draw(p, &ctx);
                }
            }
        }

        for heart in &mut self.hearts {
            heart.update();
            heart.draw(p);
        }
        self.hearts.retain(|h| !h.is_expired());

        self.typewriter.advance(self.frame);
        self.typewriter.render(p, self.width);
    }

    /// Cats then sunflowers, stably sorted by y so ties keep that order.
    fn depth_order(&self) -> Vec<Actor> {
        let mut actors: Vec<(f64, Actor)> = self
            .cats
            .iter()
            .enumerate()
            .map(|(i, c)| (c.y, Actor::Cat(i)))
            .chain(self.sunflowers.iter().enumerate().map(|(i, s)| (s.y, Actor::Flower(i))))
            .collect();
        actors.sort_by(|a, b| a.0.total_cmp(&b.0));
        actors.into_iter().map(|(_, a)| a).collect()
    }

    fn draw_ground(&self, p: &mut dyn Painter) {
        p.set_fill(&Paint::Linear {
            from: (0.0, self.ground_level),
            to: (0.0, self.height),
            stops: vec![(0.0, "#183114"), (1.0, "#0f1f0c")],
        });
        p.fill_rect(0.0, self.ground_level, self.width, self.height);
    }

    // --- Read access -----------------------------------------------------------

    pub fn frame(&self) -> u64 {
        self.frame
    }
    pub fn pointer(&self) -> Point {
        self.pointer
    }
    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn ground_level(&self) -> f64 {
        self.ground_level
    }
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting_stars
    }
    pub fn fireflies(&self) -> &[Firefly] {
        &self.fireflies
    }
    pub fn sunflowers(&self) -> &[Sunflower] {
        &self.sunflowers
    }
    pub fn cats(&self) -> &[Cat] {
        &self.cats
    }
    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }
    pub fn easter_egg_revealed(&self) -> bool {
        self.easter_egg_revealed
    }
    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }
    pub fn audio(&self) -> Option<&AudioEngine> {
        self.audio.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingBackend;
    use crate::paint::{DrawCall, Recording};

    fn started(width: f64, height: f64) -> Scene {
        let mut scene = Scene::new(SceneConfig::default(), width, height, 42);
        scene.attach_audio(AudioEngine::new(Box::new(RecordingBackend::new()), 100.0));
        scene
    }

    #[test]
    fn test_initialize_populates_layout() {
        let scene = started(1000.0, 800.0);
        assert_eq!(scene.ground_level(), 730.0);
        assert_eq!(scene.sunflowers().len(), 11);
        assert_eq!(scene.sunflowers().iter().filter(|s| s.special).count(), 1);
        assert!(scene.sunflowers()[5].special);
        assert_eq!(scene.stars().len(), 150);
        assert_eq!(scene.fireflies().len(), 20);
        assert_eq!(scene.shooting_stars().len(), 2);
        let breeds: Vec<_> = scene.cats().iter().map(|c| c.breed).collect();
        assert_eq!(breeds, vec![Breed::Calico, Breed::Siamese, Breed::WhiteBeige]);
        assert_eq!(scene.cats()[1].x, 700.0);
        assert_eq!(scene.cats()[2].track, Some(TrackId::Special(2)));
    }

    #[test]
    fn test_cats_have_no_track_before_audio() {
        let scene = Scene::new(SceneConfig::default(), 1000.0, 800.0, 1);
        assert!(scene.cats().iter().all(|c| c.track.is_none()));
    }

    #[test]
    fn test_zero_width_is_a_noop() {
        let mut scene = started(0.0, 600.0);
        assert!(scene.sunflowers().is_empty());
        assert!(scene.cats().is_empty());
        let mut rec = Recording::new();
        scene.tick(&mut rec);
        assert_eq!(scene.frame(), 1);
    }

    #[test]
    fn test_tick_waits_for_audio() {
        let mut scene = Scene::new(SceneConfig::default(), 800.0, 600.0, 3);
        let mut rec = Recording::new();
        scene.tick(&mut rec);
        assert_eq!(scene.frame(), 0);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn test_depth_pass_draws_in_y_order() {
        let mut scene = started(1000.0, 800.0);
        let mut rec = Recording::new();
        scene.tick(&mut rec);
        // cats and sunflower heads are the only translated entities
        let ys: Vec<f64> = rec
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Translate(_, y) => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys.len(), 14);
        assert!(ys.windows(2).all(|w| w[0] <= w[1]), "{ys:?}");
    }

    #[test]
    fn test_sort_does_not_reorder_collections() {
        let mut scene = started(1000.0, 800.0);
        let before: Vec<f64> = scene.sunflowers().iter().map(|s| s.x).collect();
        scene.tick(&mut Recording::new());
        let after: Vec<f64> = scene.sunflowers().iter().map(|s| s.x).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_resize_rebuilds_and_resets_text() {
        let mut scene = started(1000.0, 800.0);
        scene.set_poem(vec!["um".into(), "dois".into()]);
        scene.tick(&mut Recording::new());
        scene.resize(500.0, 400.0);
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.ground_level(), 330.0);
        assert_eq!(scene.typewriter().target(), &["Você é o meu sol"]);
        assert_eq!(scene.typewriter().displayed(), &[""]);
        assert_eq!(scene.audio().map(|a| a.current()), Some(TrackId::Ambient));
    }
}
