// system.rs - System registry with signature-matched entity sets
//
// A system is a caller-defined unit of per-tick logic; the core never
// invokes it. What the registry maintains per system is the required
// signature and the set of entities currently satisfying it, re-evaluated
// in full on every signature change.

use crate::ecs::{EntityId, Signature};
use std::any::{self, Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Marker for types registrable as systems.
///
/// Deliberately an explicit opt-in (unlike [`Component`](crate::ecs::Component)):
/// a system type is a behavioral unit the caller drives each tick, not
/// arbitrary data.
pub trait System: 'static {}

/// Matched entities of a system, ordered for deterministic iteration.
pub type EntitySet = BTreeSet<EntityId>;

/// Handle assigned to each registered system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SystemHandle(u32);

impl SystemHandle {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the raw index backing this handle.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SystemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur while registering or looking up a system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("system '{type_name}' is already registered")]
    DuplicateSystem { type_name: &'static str },

    #[error("system '{type_name}' is not registered")]
    NotRegistered { type_name: &'static str },
}

struct RegisteredSystem {
    instance: Box<dyn Any>,
    signature: Signature,
    entities: EntitySet,
}

/// Holds one instance per registered system type plus its matched set.
pub struct SystemRegistry {
    systems: Vec<RegisteredSystem>,
    by_type: HashMap<TypeId, SystemHandle>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Construct and store exactly one instance of `S`.
    ///
    /// The required signature starts empty; callers set it once via
    /// [`SystemRegistry::set_signature`] before entities exist.
    pub fn register<S: System + Default>(&mut self) -> Result<SystemHandle, SystemError> {
        let key = TypeId::of::<S>();
        if self.by_type.contains_key(&key) {
            return Err(SystemError::DuplicateSystem {
                type_name: any::type_name::<S>(),
            });
        }

        let handle = SystemHandle::new(self.systems.len() as u32);
        self.by_type.insert(key, handle);
        self.systems.push(RegisteredSystem {
            instance: Box::new(S::default()),
            signature: Signature::EMPTY,
            entities: EntitySet::new(),
        });
        Ok(handle)
    }

    /// Record the required signature for `S`.
    ///
    /// Re-setting is allowed but only affects matching going forward;
    /// entities already in the matched set are not re-evaluated until
    /// their own signature next changes.
    pub fn set_signature<S: System>(&mut self, signature: Signature) -> Result<(), SystemError> {
        let handle = self.handle_of::<S>()?;
        self.systems[handle.index() as usize].signature = signature;
        Ok(())
    }

    /// Handle previously assigned to `S`.
    pub fn handle_of<S: System>(&self) -> Result<SystemHandle, SystemError> {
        self.by_type
            .get(&TypeId::of::<S>())
            .copied()
            .ok_or(SystemError::NotRegistered {
                type_name: any::type_name::<S>(),
            })
    }

    /// Borrow the registered instance of `S`.
    pub fn get<S: System>(&self) -> Result<&S, SystemError> {
        let handle = self.handle_of::<S>()?;
        Ok(self.systems[handle.index() as usize]
            .instance
            .downcast_ref::<S>()
            .expect("instance type matches registration"))
    }

    /// Mutably borrow the registered instance of `S`.
    pub fn get_mut<S: System>(&mut self) -> Result<&mut S, SystemError> {
        let handle = self.handle_of::<S>()?;
        Ok(self.systems[handle.index() as usize]
            .instance
            .downcast_mut::<S>()
            .expect("instance type matches registration"))
    }

    /// Matched entities of `S`.
    pub fn entities<S: System>(&self) -> Result<&EntitySet, SystemError> {
        let handle = self.handle_of::<S>()?;
        Ok(&self.systems[handle.index() as usize].entities)
    }

    /// Matched entities of the system behind `handle`.
    pub fn entities_at(&self, handle: SystemHandle) -> Option<&EntitySet> {
        self.systems
            .get(handle.index() as usize)
            .map(|system| &system.entities)
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Drop `entity` from every matched set unconditionally.
    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for system in &mut self.systems {
            system.entities.remove(&entity);
        }
    }

    /// Re-evaluate `entity` against every system's requirement.
    ///
    /// Membership is recomputed from scratch: the entity is in a matched
    /// set iff its signature is a superset of the system's. Removal of a
    /// non-member is idempotent.
    pub fn signature_changed(&mut self, entity: EntityId, entity_signature: Signature) {
        for system in &mut self.systems {
            if entity_signature.contains(system.signature) {
                system.entities.insert(entity);
            } else {
                system.entities.remove(&entity);
            }
        }
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Physics;
    impl System for Physics {}

    #[derive(Default)]
    struct Render {
        frames: u32,
    }
    impl System for Render {}

    fn entity(raw: u32) -> EntityId {
        EntityId::from_raw(raw)
    }

    #[test]
    fn register_returns_distinct_handles() {
        let mut registry = SystemRegistry::new();
        let a = registry.register::<Physics>().unwrap();
        let b = registry.register::<Render>().unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.handle_of::<Physics>().unwrap(), a);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = SystemRegistry::new();
        registry.register::<Physics>().unwrap();
        assert!(matches!(
            registry.register::<Physics>(),
            Err(SystemError::DuplicateSystem { .. })
        ));
    }

    #[test]
    fn use_before_registration_is_rejected() {
        let mut registry = SystemRegistry::new();
        assert!(matches!(
            registry.set_signature::<Physics>(Signature::EMPTY),
            Err(SystemError::NotRegistered { .. })
        ));
        assert!(matches!(
            registry.get::<Physics>(),
            Err(SystemError::NotRegistered { .. })
        ));
    }

    #[test]
    fn instance_state_is_retained() {
        let mut registry = SystemRegistry::new();
        registry.register::<Render>().unwrap();
        registry.get_mut::<Render>().unwrap().frames = 7;
        assert_eq!(registry.get::<Render>().unwrap().frames, 7);
    }

    #[test]
    fn matching_follows_signature_superset() {
        let mut registry = SystemRegistry::new();
        let handle = registry.register::<Physics>().unwrap();
        let required = Signature::EMPTY.with(0).with(1);
        registry.set_signature::<Physics>(required).unwrap();

        let e = entity(1);

        // Partial signature: not matched.
        registry.signature_changed(e, Signature::EMPTY.with(0));
        assert!(!registry.entities::<Physics>().unwrap().contains(&e));

        // Superset: matched.
        registry.signature_changed(e, Signature::EMPTY.with(0).with(1).with(5));
        assert!(registry.entities::<Physics>().unwrap().contains(&e));
        assert!(registry.entities_at(handle).unwrap().contains(&e));

        // Requirement lost again: removed.
        registry.signature_changed(e, Signature::EMPTY.with(1));
        assert!(!registry.entities::<Physics>().unwrap().contains(&e));

        // Removing a non-member is idempotent.
        registry.signature_changed(e, Signature::EMPTY);
        assert!(!registry.entities::<Physics>().unwrap().contains(&e));
    }

    #[test]
    fn entity_destroyed_clears_all_sets() {
        let mut registry = SystemRegistry::new();
        registry.register::<Physics>().unwrap();
        registry.register::<Render>().unwrap();
        registry.set_signature::<Physics>(Signature::EMPTY.with(0)).unwrap();
        registry.set_signature::<Render>(Signature::EMPTY.with(1)).unwrap();

        let e = entity(2);
        registry.signature_changed(e, Signature::EMPTY.with(0).with(1));
        assert!(registry.entities::<Physics>().unwrap().contains(&e));
        assert!(registry.entities::<Render>().unwrap().contains(&e));

        registry.entity_destroyed(e);
        assert!(!registry.entities::<Physics>().unwrap().contains(&e));
        assert!(!registry.entities::<Render>().unwrap().contains(&e));
    }

    #[test]
    fn empty_requirement_matches_any_entity() {
        let mut registry = SystemRegistry::new();
        registry.register::<Physics>().unwrap();

        let e = entity(9);
        registry.signature_changed(e, Signature::EMPTY);
        assert!(registry.entities::<Physics>().unwrap().contains(&e));
    }
}
