// Sunflowers: heads ease toward the pointer, stems sway.

use std::f64::consts::{PI, TAU};

use super::{FrameContext, Point};
use crate::paint::{Paint, Painter};

/// Fraction of the remaining angular distance closed each frame.
pub const TURN_RATE: f64 = 0.03;
const PETALS: usize = 16;

/// Map any angle into (-π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

pub struct Sunflower {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub angle: f64, // head orientation, always wrapped into (-π, π]
    pub sway: f64,  // sway phase in [0, 2π)
    pub sway_speed: f64,
    pub special: bool,
}

impl Sunflower {
    pub fn new(x: f64, y: f64, size: f64, special: bool, pointer: Point, rng: &mut fastrand::Rng) -> Self {
        let mut flower = Self {
            x,
            y,
            size,
            angle: 0.0,
            sway: rng.f64() * PI,
            sway_speed: rng.f64() * 0.008 + 0.002,
            special,
        };
        flower.angle = flower.target_angle(pointer);
        flower
    }

    pub fn target_angle(&self, pointer: Point) -> f64 {
        (pointer.y - self.y).atan2(pointer.x - self.x)
    }

    pub fn contains(&self, p: Point) -> bool {
        Point::new(self.x, self.y).distance(p) < self.size * 2.0
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let diff = wrap_angle(self.target_angle(ctx.pointer) - self.angle);
        self.angle = wrap_angle(self.angle + diff * TURN_RATE);
        self.sway = (self.sway + self.sway_speed).rem_euclid(TAU);
    }

    fn stem_top(&self) -> (f64, f64) {
        (self.x + self.sway.sin() * 5.0, self.y)
    }

    pub fn draw(&self, p: &mut dyn Painter, ctx: &FrameContext) {
        let (top_x, top_y) = self.stem_top();
        let ground = ctx.ground_level;

        p.begin_path();
        p.move_to(self.x, ground);
        p.quadratic_curve_to(self.x, (self.y + ground) / 2.0, top_x, top_y);
        p.set_stroke("#285c1e");
        p.set_line_width(self.size / 8.0);
        p.stroke();

        p.save();
        p.translate(top_x, top_y);
        p.rotate(self.angle);

        let petal_len = self.size * 2.5;
        let petal_w = self.size * 0.8;
        let petal_fill = Paint::Linear {
            from: (0.0, 0.0),
            to: (petal_len, 0.0),
            stops: vec![(0.0, "#FFD700"), (1.0, "#FFA500")],
        };
        p.set_stroke("#DAA520");
        p.set_line_width(0.5);
        for i in 0..PETALS {
            p.save();
            p.rotate(i as f64 * TAU / PETALS as f64);
            p.set_fill(&petal_fill);
            p.begin_path();
            p.move_to(self.size * 0.4, 0.0);
            p.quadratic_curve_to(self.size, petal_w / 2.0, petal_len, 0.0);
            p.quadratic_curve_to(self.size, -petal_w / 2.0, self.size * 0.4, 0.0);
            p.fill();
            p.stroke();
            p.restore();
        }

        p.set_fill(&Paint::Radial {
            inner: (0.0, 0.0, 1.0),
            outer: (0.0, 0.0, self.size),
            stops: vec![(0.0, "#53351B"), (0.8, "#654321")],
        });
        p.begin_path();
        p.arc(0.0, 0.0, self.size, 0.0, TAU);
        p.fill();
        p.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_pointer(pointer: Point) -> FrameContext {
        FrameContext {
            frame: 0,
            pointer,
            width: 800.0,
            height: 600.0,
            ground_level: 530.0,
        }
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-12);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_turns_the_short_way_across_pi() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut f = Sunflower::new(0.0, 0.0, 20.0, false, Point::new(1.0, 0.0), &mut rng);
        f.angle = PI - 0.1;
        // target just past -π: shortest path crosses π, not back through zero
        let ctx = ctx_with_pointer(Point::new(-1.0, -0.1));
        let target = f.target_angle(ctx.pointer);
        let before = wrap_angle(target - f.angle).abs();
        f.update(&ctx);
        let after = wrap_angle(target - f.angle).abs();
        assert!(before < 0.3);
        assert!((after - before * (1.0 - TURN_RATE)).abs() < 1e-9);
    }

    #[test]
    fn test_hit_radius_is_twice_size() {
        let mut rng = fastrand::Rng::with_seed(1);
        let f = Sunflower::new(100.0, 100.0, 20.0, false, Point::new(0.0, 0.0), &mut rng);
        assert!(f.contains(Point::new(139.0, 100.0)));
        assert!(!f.contains(Point::new(140.0, 100.0)));
    }

    #[test]
    fn test_sway_phase_accumulates() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut f = Sunflower::new(200.0, 300.0, 20.0, false, Point::new(0.0, 0.0), &mut rng);
        let (s0, speed) = (f.sway, f.sway_speed);
        let ctx = ctx_with_pointer(Point::new(0.0, 0.0));
        for _ in 0..1000 {
            f.update(&ctx);
        }
        let expected = (s0 + 1000.0 * speed).rem_euclid(TAU);
        assert!(wrap_angle(f.sway - expected).abs() < 1e-9, "{} vs {}", f.sway, expected);
        assert!((0.0..TAU).contains(&f.sway));
    }

    #[test]
    fn test_orientation_converges_without_overshoot() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut f = Sunflower::new(0.0, 0.0, 20.0, false, Point::new(0.0, 0.0), &mut rng);
        f.angle = -2.5;
        let ctx = ctx_with_pointer(Point::new(100.0, 50.0));
        let target = f.target_angle(ctx.pointer);
        let mut prev = wrap_angle(target - f.angle);
        for _ in 0..2000 {
            f.update(&ctx);
            let diff = wrap_angle(target - f.angle);
            assert!(diff.abs() <= prev.abs() * (1.0 - TURN_RATE) + 1e-12);
            // never crosses to the other side of the target
            assert!(diff.abs() < 1e-12 || diff.signum() == prev.signum());
            prev = diff;
        }
        assert!(prev.abs() < 1e-9);
    }
}
