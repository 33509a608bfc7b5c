use eframe::egui::{self, Color32};
use rand::Rng;

pub const DEFAULT_PARTICLE_COUNT: usize = 50;

/// Base colours of the particles; alpha is chosen per particle.
const PALETTE: [(u8, u8, u8); 3] = [(0, 133, 124), (201, 169, 98), (0, 107, 100)];

/// Shared "float" keyframes: (percent, translate x, translate y, opacity).
const FLOAT_KEYFRAMES: [(f32, f32, f32, f32); 5] = [
    (0.0, 0.0, 0.0, 0.5),
    (0.25, 10.0, -20.0, 1.0),
    (0.5, -10.0, -40.0, 0.5),
    (0.75, 5.0, -20.0, 1.0),
    (1.0, 0.0, 0.0, 0.5),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Diameter in pixels (2..6)
    pub size: f32,
    pub rgb: (u8, u8, u8),
    /// Base alpha (0.2..0.7)
    pub alpha: f32,
    /// Position as a fraction of the container (0..1)
    pub anchor: egui::Vec2,
    /// One animation cycle in seconds (10..20)
    pub period: f32,
    /// Seconds before the animation starts (0..5)
    pub delay: f32,
}

/// Offset and opacity multiplier at one instant of a particle's animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub offset: egui::Vec2,
    pub opacity: f32,
}

impl Particle {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            size: rng.random::<f32>() * 4.0 + 2.0,
            rgb: PALETTE[rng.random_range(0..PALETTE.len())],
            alpha: rng.random::<f32>() * 0.5 + 0.2,
            anchor: egui::vec2(rng.random::<f32>(), rng.random::<f32>()),
            period: rng.random::<f32>() * 10.0 + 10.0,
            delay: rng.random::<f32>() * 5.0,
        }
    }

    /// Animation state `elapsed` seconds after the particles were created.
    /// Before the delay has passed the particle rests unanimated.
    pub fn frame(&self, elapsed: f32) -> ParticleFrame {
        let t = elapsed - self.delay;
        if t < 0.0 {
            return ParticleFrame {
                offset: egui::Vec2::ZERO,
                opacity: 1.0,
            };
        }
        let phase = (t / self.period).fract();
        let (x, y, opacity) = sample_keyframes(phase);
        ParticleFrame {
            offset: egui::vec2(x, y),
            opacity,
        }
    }

    pub fn color(&self, opacity: f32) -> Color32 {
        let (r, g, b) = self.rgb;
        let a = (self.alpha * opacity).clamp(0.0, 1.0);
        Color32::from_rgba_unmultiplied(r, g, b, (a * 255.0) as u8)
    }
}

fn sample_keyframes(phase: f32) -> (f32, f32, f32) {
    for pair in FLOAT_KEYFRAMES.windows(2) {
        let (p0, x0, y0, o0) = pair[0];
        let (p1, x1, y1, o1) = pair[1];
        if phase <= p1 {
            let t = crate::effects::ease_in_out((phase - p0) / (p1 - p0));
            return (
                x0 + (x1 - x0) * t,
                y0 + (y1 - y0) * t,
                o0 + (o1 - o0) * t,
            );
        }
    }
    let (_, x, y, o) = FLOAT_KEYFRAMES[FLOAT_KEYFRAMES.len() - 1];
    (x, y, o)
}

/// Particles floating over the title slide's background.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn generate(count: usize, rng: &mut impl Rng) -> Self {
        Self {
            particles: (0..count).map(|_| Particle::random(rng)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect, elapsed: f32, scale: f32) {
        for particle in &self.particles {
            let frame = particle.frame(elapsed);
            let anchor = rect.min + rect.size() * particle.anchor;
            let center = anchor + frame.offset * scale;
            painter.circle_filled(
                center,
                particle.size * scale / 2.0,
                particle.color(frame.opacity),
            );
        }
    }
}
