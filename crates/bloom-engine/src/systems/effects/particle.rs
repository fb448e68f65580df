//! Particle bursts: short-lived sprites spawned together and cleared together.

use glam::Vec2;
use serde::Serialize;

/// Unique (per burst owner) particle identifier, stable for keyed rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ParticleId(pub u32);

/// A single particle. Only the spawn point is stored; motion is derived from
/// the burst age at render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub id: ParticleId,
    pub origin: Vec2,
}

/// Rendered state of a particle partway through its flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleDrift {
    pub pos: Vec2,
    pub scale: f32,
    pub alpha: f32,
}

impl Particle {
    /// Position/scale/alpha after flying toward `target` for fraction `t`
    /// of the burst lifetime. Ease-out: fast start, soft landing.
    pub fn drift(&self, target: Vec2, t: f32) -> ParticleDrift {
        let t = t.clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        ParticleDrift {
            pos: self.origin.lerp(target, eased),
            scale: 1.0 - eased,
            alpha: 1.0 - eased,
        }
    }
}

/// The live particle set. Spawning replaces the previous burst; clearing
/// always empties the whole set.
#[derive(Debug, Clone, Default)]
pub struct ParticleBurst {
    particles: Vec<Particle>,
    spawned_at_ms: Option<f64>,
    next_id: u32,
}

impl ParticleBurst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles at `origin`, all sharing the spawn time.
    pub fn spawn(&mut self, origin: Vec2, count: usize, now_ms: f64) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let id = ParticleId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            self.particles.push(Particle { id, origin });
        }
        self.spawned_at_ms = Some(now_ms);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawned_at_ms = None;
    }

    /// Milliseconds since the current burst spawned.
    pub fn age_ms(&self, now_ms: f64) -> Option<f64> {
        self.spawned_at_ms.map(|t| (now_ms - t).max(0.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_creates_particles_at_origin() {
        let mut burst = ParticleBurst::new();
        burst.spawn(Vec2::new(10.0, 20.0), 15, 100.0);
        assert_eq!(burst.len(), 15);
        assert!(burst.iter().all(|p| p.origin == Vec2::new(10.0, 20.0)));
        assert_eq!(burst.age_ms(350.0), Some(250.0));
    }

    #[test]
    fn ids_are_unique_across_bursts() {
        let mut burst = ParticleBurst::new();
        burst.spawn(Vec2::ZERO, 3, 0.0);
        let first: Vec<_> = burst.iter().map(|p| p.id).collect();
        burst.spawn(Vec2::ZERO, 3, 0.0);
        assert_eq!(burst.len(), 3, "spawn replaces the previous burst");
        assert!(burst.iter().all(|p| !first.contains(&p.id)));
    }

    #[test]
    fn clear_empties_everything() {
        let mut burst = ParticleBurst::new();
        burst.spawn(Vec2::ZERO, 5, 0.0);
        burst.clear();
        assert!(burst.is_empty());
        assert_eq!(burst.age_ms(10.0), None);
    }

    #[test]
    fn drift_lands_on_target_and_vanishes() {
        let p = Particle { id: ParticleId(0), origin: Vec2::new(0.0, 0.0) };
        let target = Vec2::new(100.0, 0.0);

        let start = p.drift(target, 0.0);
        assert_eq!(start.pos, Vec2::ZERO);
        assert_eq!(start.alpha, 1.0);

        let mid = p.drift(target, 0.5);
        assert!(mid.pos.x > 50.0, "ease-out covers more than half the way by midpoint");

        let end = p.drift(target, 2.0);
        assert_eq!(end.pos, target);
        assert_eq!(end.scale, 0.0);
    }
}
