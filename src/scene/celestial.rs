// Background particles: twinkling stars, shooting stars and fireflies.
// None of these react to input.

use std::f64::consts::TAU;

use super::FrameContext;
use crate::paint::{Paint, Painter};

pub struct Star {
    pub x: f64,
    pub y: f64,
    radius: f64,
    base_opacity: f64,
    pub opacity: f64,
    fade_dir: f64, // +1 brightening, -1 dimming
}

impl Star {
    const TWINKLE_STEP: f64 = 0.005;
    const MIN_OPACITY: f64 = 0.1;
    const SWING: f64 = 0.3; // how far above its base a star may brighten

    pub fn spawn(rng: &mut fastrand::Rng, width: f64, ground_level: f64) -> Self {
        let base_opacity = rng.f64() * 0.5 + 0.2;
        Self {
            x: rng.f64() * width,
            y: rng.f64() * ground_level,
            radius: rng.f64() * 1.5 + 0.5,
            base_opacity,
            opacity: base_opacity,
            fade_dir: if rng.bool() { 1.0 } else { -1.0 },
        }
    }

    pub fn update(&mut self) {
        self.opacity += Self::TWINKLE_STEP * self.fade_dir;
        if self.opacity > self.base_opacity + Self::SWING || self.opacity < Self::MIN_OPACITY {
            self.fade_dir = -self.fade_dir;
        }
    }

    pub fn draw(&self, p: &mut dyn Painter) {
        p.begin_path();
        p.arc(self.x, self.y, self.radius, 0.0, TAU);
        p.set_fill(&Paint::color(format!("rgba(255, 255, 255, {})", self.opacity)));
        p.fill();
    }
}

pub struct ShootingStar {
    pub x: f64,
    pub y: f64,
    len: f64,
    speed: f64,
    size: f64,
}

impl ShootingStar {
    pub fn spawn(rng: &mut fastrand::Rng, width: f64, height: f64) -> Self {
        Self {
            x: rng.f64() * width * 1.5,
            y: rng.f64() * height * 0.2,
            len: rng.f64() * 80.0 + 10.0,
            speed: rng.f64() * 5.0 + 3.0,
            size: rng.f64() + 0.5,
        }
    }

    /// Slides left; once the whole streak has left the screen it re-enters
    /// from the right edge at a fresh height in the top fifth of the sky.
    pub fn update(&mut self, ctx: &FrameContext, rng: &mut fastrand::Rng) {
        self.x -= self.speed;
        if self.x < -self.len {
            self.x = ctx.width + self.len;
            self.y = rng.f64() * ctx.height * 0.2;
        }
    }

    pub fn draw(&self, p: &mut dyn Painter) {
        p.begin_path();
        p.move_to(self.x, self.y);
        p.line_to(self.x + self.len, self.y);
        p.set_stroke("rgba(255, 255, 255, 1)");
        p.set_line_width(self.size);
        p.stroke();
    }
}

pub struct Firefly {
    pub x: f64,
    pub y: f64,
    radius: f64,
    speed_x: f64,
    speed_y: f64,
    pub opacity: f64,
    blink_speed: f64,
    phase: f64,
}

impl Firefly {
    pub fn spawn(rng: &mut fastrand::Rng, width: f64, ground_level: f64) -> Self {
        Self {
            x: rng.f64() * width,
            y: ground_level - rng.f64() * (ground_level * 0.4),
            radius: rng.f64() * 2.0 + 1.0,
            speed_x: (rng.f64() - 0.5) * 0.5,
            speed_y: (rng.f64() - 0.5) * 0.5,
            opacity: 0.0,
            blink_speed: 0.02 + rng.f64() * 0.03,
            phase: rng.f64() * TAU,
        }
    }

    /// Drifts inside the band just above the ground and glows with
    /// `|sin(phase + frame * blink_speed)|`.
    pub fn update(&mut self, ctx: &FrameContext) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        if self.x > ctx.width || self.x < 0.0 {
            self.speed_x = -self.speed_x;
        }
        if self.y > ctx.ground_level || self.y < ctx.ground_level * 0.6 {
            self.speed_y = -self.speed_y;
        }
        self.opacity = (self.phase + ctx.frame as f64 * self.blink_speed).sin().abs();
    }

    pub fn draw(&self, p: &mut dyn Painter) {
        let glow = format!("rgba(255, 255, 150, {})", self.opacity);
        p.begin_path();
        p.arc(self.x, self.y, self.radius, 0.0, TAU);
        p.set_fill(&Paint::color(glow.clone()));
        p.set_shadow(&glow, 10.0);
        p.fill();
        p.set_shadow("transparent", 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Point;

    fn ctx(frame: u64) -> FrameContext {
        FrameContext {
            frame,
            pointer: Point::new(0.0, 0.0),
            width: 800.0,
            height: 600.0,
            ground_level: 530.0,
        }
    }

    #[test]
    fn test_star_opacity_stays_in_band() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut star = Star::spawn(&mut rng, 800.0, 530.0);
        for _ in 0..2_000 {
            star.update();
            assert!(star.opacity >= Star::MIN_OPACITY - 2.0 * Star::TWINKLE_STEP);
            assert!(star.opacity <= star.base_opacity + Star::SWING + 2.0 * Star::TWINKLE_STEP);
        }
    }

    #[test]
    fn test_shooting_star_wraps_to_right_edge() {
        let mut rng = fastrand::Rng::with_seed(11);
        let mut s = ShootingStar::spawn(&mut rng, 800.0, 600.0);
        s.x = -s.len + 0.5;
        s.update(&ctx(1), &mut rng);
        assert_eq!(s.x, 800.0 + s.len);
        assert!(s.y >= 0.0 && s.y < 120.0);
    }

    #[test]
    fn test_firefly_opacity_follows_frame_phase() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut f = Firefly::spawn(&mut rng, 800.0, 530.0);
        for frame in 1..=40u64 {
            f.update(&ctx(frame));
            let expected = (f.phase + frame as f64 * f.blink_speed).sin().abs();
            assert!((f.opacity - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_firefly_bounces_off_left_edge() {
        let mut rng = fastrand::Rng::with_seed(9);
        let mut f = Firefly::spawn(&mut rng, 800.0, 530.0);
        f.x = 0.1;
        f.speed_x = -0.2;
        f.update(&ctx(1));
        assert!(f.speed_x > 0.0);
    }
}
