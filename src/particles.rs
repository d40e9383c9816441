use rand::Rng;
use std::f64::consts::TAU;

/// Downward acceleration applied to every particle, px/s^2.
pub const GRAVITY: f64 = 24.0;
/// Live-entity cap; overflow discards oldest first.
pub const MAX_PARTICLES: usize = 240;

const ANGLE_JITTER_RAD: f64 = 0.22;
const SPEED_RANGE: std::ops::Range<f64> = 40.0..180.0;
const LIFE_RANGE_MS: std::ops::Range<f64> = 320.0..700.0;
const SIZE_RANGE: std::ops::Range<f64> = 3.0..9.0;
const HUE_JITTER: f64 = 16.0;
const ALPHA_RANGE: std::ops::Range<f64> = 0.65..1.0;

/// Ephemeral visual-feedback entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub life_ms: f64,
    pub max_life_ms: f64,
    pub size: f64,
    pub hue: f64,
    pub alpha: f64,
}

impl Particle {
    /// Fraction of lifetime remaining, for fade-out rendering.
    pub fn life_fraction(&self) -> f64 {
        if self.max_life_ms <= 0.0 {
            0.0
        } else {
            (self.life_ms / self.max_life_ms).clamp(0.0, 1.0)
        }
    }
}

/// Pool of live particles with spawn/advance/cull semantics.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawns `count` particles radiating from (x, y) at evenly spaced
    /// angles with small random jitter on angle, speed, lifetime, size,
    /// hue, and alpha.
    pub fn spawn_burst(&mut self, x: f64, y: f64, hue: f64, count: usize) {
        self.spawn_burst_with(&mut rand::thread_rng(), x, y, hue, count);
    }

    pub fn spawn_burst_with<R: Rng>(&mut self, rng: &mut R, x: f64, y: f64, hue: f64, count: usize) {
        if count == 0 {
            return;
        }
        let step = TAU / count as f64;
        for i in 0..count {
            let angle = step * i as f64 + rng.gen_range(-ANGLE_JITTER_RAD..ANGLE_JITTER_RAD);
            let speed = rng.gen_range(SPEED_RANGE);
            let life = rng.gen_range(LIFE_RANGE_MS);

            self.particles.push(Particle {
                id: self.next_id,
                x,
                y,
                vel_x: angle.cos() * speed,
                vel_y: angle.sin() * speed,
                life_ms: life,
                max_life_ms: life,
                size: rng.gen_range(SIZE_RANGE),
                hue: hue + rng.gen_range(-HUE_JITTER..HUE_JITTER),
                alpha: rng.gen_range(ALPHA_RANGE),
            });
            self.next_id += 1;
        }

        // Oldest first on overflow.
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Integrates one frame: position by velocity, gravity on the
    /// vertical velocity, lifetime down by `delta_ms`; entities whose
    /// lifetime reaches zero are removed.
    pub fn advance(&mut self, delta_ms: f64) {
        let dt = delta_ms / 1000.0;
        self.particles.retain_mut(|p| {
            p.x += p.vel_x * dt;
            p.y += p.vel_y * dt;
            p.vel_y += GRAVITY * dt;
            p.life_ms -= delta_ms;
            p.life_ms > 0.0
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
