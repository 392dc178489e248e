// Hearts float up from clicked cats and sunflowers and fade out linearly.

use crate::paint::{Paint, Painter};

pub const MAX_LIFE: u32 = 200;

#[derive(Debug, Clone)]
pub struct Heart {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    speed_x: f64,
    speed_y: f64,
    pub life: u32,
}

impl Heart {
    pub fn spawn(x: f64, y: f64, rng: &mut fastrand::Rng) -> Self {
        Self {
            x,
            y,
            size: rng.f64() * 15.0 + 15.0,
            speed_y: rng.f64() * 0.8 + 0.4,
            speed_x: rng.f64() - 0.5,
            life: 0,
        }
    }

    pub fn update(&mut self) {
        self.y -= self.speed_y;
        self.x += self.speed_x;
        self.life = (self.life + 1).min(MAX_LIFE);
    }

    /// 1 at birth, 0 once `MAX_LIFE` updates have elapsed.
    pub fn opacity(&self) -> f64 {
        1.0 - f64::from(self.life) / f64::from(MAX_LIFE)
    }

    pub fn is_expired(&self) -> bool {
        self.life >= MAX_LIFE
    }

    pub fn draw(&self, p: &mut dyn Painter) {
        let alpha = self.opacity();
        p.save();
        p.set_global_alpha(alpha);
        p.set_font(&format!("{}px Arial", self.size));
        p.set_fill(&Paint::color(format!("rgba(255, 105, 180, {alpha})")));
        p.fill_text("❤️", self.x, self.y);
        p.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_is_linear_and_strictly_decreasing() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut heart = Heart::spawn(10.0, 10.0, &mut rng);
        let mut last = heart.opacity();
        assert_eq!(last, 1.0);
        for n in 1..=MAX_LIFE {
            heart.update();
            let now = heart.opacity();
            assert!(now < last);
            assert!((now - (1.0 - n as f64 / MAX_LIFE as f64)).abs() < 1e-12);
            last = now;
        }
        assert_eq!(heart.opacity(), 0.0);
        assert!(heart.is_expired());
    }

    #[test]
    fn test_drifts_upward() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut heart = Heart::spawn(10.0, 100.0, &mut rng);
        heart.update();
        assert!(heart.y < 100.0);
    }
}
