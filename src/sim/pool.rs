//! Fixed-capacity slot pools for falling objects and particles
//!
//! Slots are pre-allocated and reused so the steady-state tick never allocates.
//! A slot's payload is only reachable while the slot is active, and acquiring a
//! slot always overwrites the whole payload, so stale data from a previous
//! occupant can never be observed.

use super::state::{FallingObject, Particle};

/// Index of a slot within its pool
pub type SlotId = usize;

#[derive(Debug, Clone)]
struct Slot<T> {
    active: bool,
    item: T,
}

/// Growable arena of reusable slots, scanned in fixed slot order
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    /// Every slot below this index is known to be active
    first_free_hint: usize,
    active_count: usize,
}

impl<T: Default> Pool<T> {
    /// Pre-allocate `capacity` inactive slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot {
            active: false,
            item: T::default(),
        });
        Self {
            slots,
            first_free_hint: 0,
            active_count: 0,
        }
    }

    /// Occupy the first inactive slot with `item`, growing by one slot when full
    pub fn acquire(&mut self, item: T) -> SlotId {
        let free = self.slots[self.first_free_hint..]
            .iter()
            .position(|s| !s.active)
            .map(|offset| self.first_free_hint + offset);

        let id = match free {
            Some(id) => {
                self.slots[id] = Slot { active: true, item };
                id
            }
            None => {
                self.slots.push(Slot { active: true, item });
                log::debug!("Pool grew to {} slots", self.slots.len());
                self.slots.len() - 1
            }
        };

        self.first_free_hint = id + 1;
        self.active_count += 1;
        id
    }
}

impl<T> Pool<T> {
    /// Mark one slot inactive; releasing an inactive slot is a no-op
    pub fn release(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id) {
            if slot.active {
                slot.active = false;
                self.active_count -= 1;
                self.first_free_hint = self.first_free_hint.min(id);
            }
        }
    }

    /// Mark every slot inactive (capacity is kept)
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.first_free_hint = 0;
        self.active_count = 0;
    }

    /// Active payload at `id`, if the slot is occupied
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id)
            .filter(|s| s.active)
            .map(|s| &s.item)
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.slots.get(id).is_some_and(|s| s.active)
    }

    /// Total slots, active or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Active slots in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(id, s)| (id, &s.item))
    }

    /// Visit every active slot in slot order, releasing those for which `f`
    /// returns [`SlotAction::Release`] or stopping early on [`SlotAction::Halt`].
    ///
    /// Releasing the visited slot never shifts other slots, so no slot is
    /// skipped or visited twice.
    pub fn for_each_active(&mut self, mut f: impl FnMut(SlotId, &mut T) -> SlotAction) {
        for id in 0..self.slots.len() {
            if !self.slots[id].active {
                continue;
            }
            match f(id, &mut self.slots[id].item) {
                SlotAction::Keep => {}
                SlotAction::Release => self.release(id),
                SlotAction::ReleaseAndHalt => {
                    self.release(id);
                    return;
                }
            }
        }
    }
}

/// Outcome of visiting one slot in [`Pool::for_each_active`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Keep,
    Release,
    /// Release this slot and stop the sweep
    ReleaseAndHalt,
}

/// The two pools owned by the simulation
#[derive(Debug, Clone)]
pub struct EntityPool {
    pub objects: Pool<FallingObject>,
    pub particles: Pool<Particle>,
}

impl EntityPool {
    pub fn new(object_capacity: usize, particle_capacity: usize) -> Self {
        Self {
            objects: Pool::with_capacity(object_capacity),
            particles: Pool::with_capacity(particle_capacity),
        }
    }

    /// Deactivate every object and particle (used on start and home)
    pub fn release_all(&mut self) {
        self.objects.release_all();
        self.particles.release_all();
    }
}
