// component.rs - Type-erased per-type component storage
//
// Component types are identified by small sequential ids assigned at
// registration time, per world rather than process-wide, so independent
// worlds never share type-id state. Each registered type gets its own
// sparse map from entity id to value; the maps sit behind a trait object
// whose only cross-type operation is "purge this entity", which keeps
// downcasting confined to one helper.

use crate::ecs::{EntityId, MAX_COMPONENT_TYPES};
use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use thiserror::Error;

/// Id assigned to a component type on registration.
///
/// Doubles as the type's bit position in [`Signature`](crate::ecs::Signature)
/// masks, so values stay below [`MAX_COMPONENT_TYPES`].
pub type ComponentTypeId = u32;

/// Marker for values that can be attached to entities.
///
/// Components are opaque to the core; any plain owned data qualifies, so
/// the trait is blanket-implemented rather than opted into.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// Errors from component registration and access.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("component type '{type_name}' is already registered")]
    DuplicateRegistration { type_name: &'static str },

    #[error("component type budget exhausted ({max} types)")]
    TypeBudgetExhausted { max: usize },

    #[error("component type '{type_name}' used before registration")]
    Unregistered { type_name: &'static str },

    #[error("entity {entity} already has a '{type_name}' component")]
    DuplicateComponent {
        entity: EntityId,
        type_name: &'static str,
    },

    #[error("entity {entity} has no '{type_name}' component")]
    MissingComponent {
        entity: EntityId,
        type_name: &'static str,
    },
}

/// Cross-type interface over per-type stores.
///
/// Entity destruction is the only operation the store collection needs to
/// fan out without knowing concrete types; everything else goes through
/// the typed path below.
trait ErasedStore {
    fn entity_destroyed(&mut self, entity: EntityId);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse map of one component type, keyed by entity id.
struct SparseStore<T> {
    entries: HashMap<EntityId, T>,
}

impl<T: Component> SparseStore<T> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Component> ErasedStore for SparseStore<T> {
    fn entity_destroyed(&mut self, entity: EntityId) {
        self.entries.remove(&entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Collection of per-type component stores with the type-id registry.
pub struct ComponentStore {
    type_ids: HashMap<TypeId, ComponentTypeId>,
    stores: HashMap<ComponentTypeId, Box<dyn ErasedStore>>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self {
            type_ids: HashMap::new(),
            stores: HashMap::new(),
        }
    }

    /// Register `T` and allocate its type id.
    ///
    /// Type ids are sequential starting at 0 and never reused, so the
    /// registered-type count is also the next id. Registering the same
    /// type twice, or registering past the signature width, is an error.
    pub fn register<T: Component>(&mut self) -> Result<ComponentTypeId, ComponentError> {
        let key = TypeId::of::<T>();
        if self.type_ids.contains_key(&key) {
            return Err(ComponentError::DuplicateRegistration {
                type_name: any::type_name::<T>(),
            });
        }
        if self.type_ids.len() >= MAX_COMPONENT_TYPES {
            return Err(ComponentError::TypeBudgetExhausted {
                max: MAX_COMPONENT_TYPES,
            });
        }

        let type_id = self.type_ids.len() as ComponentTypeId;
        self.type_ids.insert(key, type_id);
        self.stores
            .insert(type_id, Box::new(SparseStore::<T>::new()));
        Ok(type_id)
    }

    /// Type id assigned to `T` at registration.
    pub fn type_id<T: Component>(&self) -> Result<ComponentTypeId, ComponentError> {
        self.type_ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(ComponentError::Unregistered {
                type_name: any::type_name::<T>(),
            })
    }

    /// Number of registered component types.
    pub fn type_count(&self) -> usize {
        self.type_ids.len()
    }

    /// Attach a `T` value to `entity`.
    ///
    /// An entity holds at most one component per type; a second insert is
    /// rejected and the existing value is left intact.
    pub fn insert<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
    ) -> Result<(), ComponentError> {
        let store = self.store_mut::<T>()?;
        if store.entries.contains_key(&entity) {
            return Err(ComponentError::DuplicateComponent {
                entity,
                type_name: any::type_name::<T>(),
            });
        }
        store.entries.insert(entity, value);
        Ok(())
    }

    /// Detach the `T` value from `entity`, if any.
    ///
    /// Removing an absent component is a no-op (returns `Ok(false)`) so
    /// destroy paths stay simple; only the registration check can fail.
    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Result<bool, ComponentError> {
        let store = self.store_mut::<T>()?;
        Ok(store.entries.remove(&entity).is_some())
    }

    /// Borrow the `T` value attached to `entity`.
    pub fn get<T: Component>(&self, entity: EntityId) -> Result<&T, ComponentError> {
        self.store::<T>()?
            .entries
            .get(&entity)
            .ok_or(ComponentError::MissingComponent {
                entity,
                type_name: any::type_name::<T>(),
            })
    }

    /// Mutably borrow the `T` value attached to `entity`.
    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<&mut T, ComponentError> {
        self.store_mut::<T>()?
            .entries
            .get_mut(&entity)
            .ok_or(ComponentError::MissingComponent {
                entity,
                type_name: any::type_name::<T>(),
            })
    }

    /// Whether `entity` holds a `T`. Unregistered types read as `false`.
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.store::<T>()
            .map(|store| store.entries.contains_key(&entity))
            .unwrap_or(false)
    }

    /// Purge `entity` from every registered type's store.
    ///
    /// Runs for all types regardless of which ones the entity actually
    /// held; this is what keeps destruction leak-free.
    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for store in self.stores.values_mut() {
            store.entity_destroyed(entity);
        }
    }

    fn store<T: Component>(&self) -> Result<&SparseStore<T>, ComponentError> {
        let type_id = self.type_id::<T>()?;
        let erased = self
            .stores
            .get(&type_id)
            .expect("store exists for every registered type id");
        Ok(erased
            .as_any()
            .downcast_ref::<SparseStore<T>>()
            .expect("store type matches registration"))
    }

    fn store_mut<T: Component>(&mut self) -> Result<&mut SparseStore<T>, ComponentError> {
        let type_id = Self::type_id::<T>(self)?;
        let erased = self
            .stores
            .get_mut(&type_id)
            .expect("store exists for every registered type id");
        Ok(erased
            .as_any_mut()
            .downcast_mut::<SparseStore<T>>()
            .expect("store type matches registration"))
    }
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health {
        value: i32,
    }

    fn entity(raw: u32) -> EntityId {
        EntityId::from_raw(raw)
    }

    #[test]
    fn type_ids_are_sequential() {
        let mut store = ComponentStore::new();
        assert_eq!(store.register::<Position>().unwrap(), 0);
        assert_eq!(store.register::<Health>().unwrap(), 1);
        assert_eq!(store.type_id::<Position>().unwrap(), 0);
        assert_eq!(store.type_count(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut store = ComponentStore::new();
        store.register::<Position>().unwrap();
        assert!(matches!(
            store.register::<Position>(),
            Err(ComponentError::DuplicateRegistration { .. })
        ));
    }

    #[test]
    fn unregistered_type_is_rejected() {
        let mut store = ComponentStore::new();
        assert!(matches!(
            store.insert(entity(1), Health { value: 1 }),
            Err(ComponentError::Unregistered { .. })
        ));
        assert!(!store.has::<Health>(entity(1)));
    }

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut store = ComponentStore::new();
        store.register::<Position>().unwrap();
        let e = entity(1);

        store.insert(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(store.has::<Position>(e));
        assert_eq!(*store.get::<Position>(e).unwrap(), Position { x: 1.0, y: 2.0 });

        store.get_mut::<Position>(e).unwrap().x = 5.0;
        assert_eq!(store.get::<Position>(e).unwrap().x, 5.0);

        assert!(store.remove::<Position>(e).unwrap());
        assert!(!store.has::<Position>(e));
        assert!(matches!(
            store.get::<Position>(e),
            Err(ComponentError::MissingComponent { .. })
        ));
    }

    #[test]
    fn duplicate_insert_keeps_existing_value() {
        let mut store = ComponentStore::new();
        store.register::<Health>().unwrap();
        let e = entity(1);

        store.insert(e, Health { value: 10 }).unwrap();
        assert!(matches!(
            store.insert(e, Health { value: 99 }),
            Err(ComponentError::DuplicateComponent { .. })
        ));
        assert_eq!(store.get::<Health>(e).unwrap().value, 10);
    }

    #[test]
    fn remove_of_absent_component_is_a_noop() {
        let mut store = ComponentStore::new();
        store.register::<Health>().unwrap();

        assert!(!store.remove::<Health>(entity(7)).unwrap());
        assert!(!store.has::<Health>(entity(7)));
    }

    #[test]
    fn entity_destroyed_purges_every_store() {
        let mut store = ComponentStore::new();
        store.register::<Position>().unwrap();
        store.register::<Health>().unwrap();
        let e = entity(3);

        store.insert(e, Position { x: 0.0, y: 0.0 }).unwrap();
        // e never held Health; the purge must still be safe for that store.
        store.entity_destroyed(e);

        assert!(!store.has::<Position>(e));
        assert!(!store.has::<Health>(e));
    }
}
