//! Visual effects. Currently only particle bursts.

mod particle;

pub use particle::{Particle, ParticleBurst, ParticleDrift, ParticleId};
