use std::time::Duration;

use crate::{
    foundation::error::{FxError, FxResult},
    pool::particle::{BatchId, Origin, Particle, ParticleSnapshot},
};

/// Bounded owner of every live particle.
///
/// Two populations share the pool: the continuous field (seeded once, never grows or
/// shrinks afterwards) and any number of burst batches, each inserted and removed as a
/// whole. Nothing outside the pool holds a reference to a particle; renderers only ever
/// see [`ParticleSnapshot`]s.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    capacity: usize,
    particles: Vec<Particle>,
    field_seeded: bool,
    next_batch: u64,
}

impl ParticlePool {
    /// Empty pool that will never hold more than `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            particles: Vec::with_capacity(capacity.min(4096)),
            field_seeded: false,
            next_batch: 0,
        }
    }

    /// Maximum number of particles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remaining room.
    pub fn free(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    /// Whether the continuous field has been seeded.
    pub fn has_field(&self) -> bool {
        self.field_seeded
    }

    /// Seed the continuous field. Allowed once per session.
    pub fn seed_field(&mut self, particles: Vec<Particle>) -> FxResult<usize> {
        if self.field_seeded {
            return Err(FxError::validation("particle field is already seeded"));
        }
        if particles.len() > self.free() {
            return Err(FxError::validation(format!(
                "particle field of {} does not fit the pool ({} free of {})",
                particles.len(),
                self.free(),
                self.capacity
            )));
        }
        let n = particles.len();
        self.particles.extend(particles.into_iter().map(|mut p| {
            p.origin = Origin::Field;
            p
        }));
        self.field_seeded = true;
        Ok(n)
    }

    /// Insert a whole burst batch, or nothing if it does not fit.
    pub fn insert_batch(&mut self, particles: Vec<Particle>) -> FxResult<BatchId> {
        if particles.len() > self.free() {
            return Err(FxError::validation(format!(
                "batch of {} does not fit the pool ({} free of {})",
                particles.len(),
                self.free(),
                self.capacity
            )));
        }
        let id = BatchId(self.next_batch);
        self.next_batch += 1;
        self.particles.extend(particles.into_iter().map(|mut p| {
            p.origin = Origin::Batch(id);
            p
        }));
        Ok(id)
    }

    /// Remove every particle of `id`. Returns how many were removed.
    pub fn remove_batch(&mut self, id: BatchId) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.origin != Origin::Batch(id));
        before - self.particles.len()
    }

    /// Remove every burst particle, keeping the field. Returns how many were removed.
    pub fn clear_batches(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.origin == Origin::Field);
        before - self.particles.len()
    }

    /// Drop everything, including the field, so a later mount seeds afresh.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.field_seeded = false;
    }

    /// Number of live particles in batch `id`.
    pub fn batch_len(&self, id: BatchId) -> usize {
        self.particles
            .iter()
            .filter(|p| p.origin == Origin::Batch(id))
            .count()
    }

    /// Ids of live batches, oldest first.
    pub fn batch_ids(&self) -> Vec<BatchId> {
        let mut ids: Vec<BatchId> = self
            .particles
            .iter()
            .filter_map(|p| match p.origin {
                Origin::Batch(id) => Some(id),
                Origin::Field => None,
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Field particles.
    pub fn field(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.origin == Origin::Field)
    }

    /// Field particles, mutably, for the per-frame update.
    pub fn field_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles
            .iter_mut()
            .filter(|p| p.origin == Origin::Field)
    }

    /// Every live particle.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Render data for this frame, produced lazily in insertion order.
    ///
    /// Particles whose fixed lifetime has run out are skipped even if their batch has not
    /// been swept yet.
    pub fn snapshots(&self, now: Duration) -> impl Iterator<Item = ParticleSnapshot> + '_ {
        self.particles
            .iter()
            .filter(move |p| !p.is_expired(now))
            .map(move |p| p.snapshot(now))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pool/store.rs"]
mod tests;
