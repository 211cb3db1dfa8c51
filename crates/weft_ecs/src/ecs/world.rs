// world.rs - World facade composing the entity, component and system registries
//
// Every public operation runs to completion before returning; component
// add/remove recomputes the entity's signature and re-evaluates system
// membership in the same call. The world is single-threaded by design and
// exclusively owns all three registries.

use crate::ecs::{
    Component, ComponentError, ComponentStore, ComponentTypeId, EntityId, EntityRegistry,
    EntitySet, Signature, System, SystemError, SystemHandle, SystemRegistry,
};
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by [`World`] operations.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    System(#[from] SystemError),

    /// A component mutation addressed an entity that is not live. Reads
    /// stay tolerant: signatures come back empty and component access
    /// reports `MissingComponent`.
    #[error("entity {0} is not alive")]
    DeadEntity(EntityId),
}

/// The facade tying entities, components and systems together.
pub struct World {
    entities: EntityRegistry,
    components: ComponentStore,
    systems: SystemRegistry,
    names: HashMap<String, EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityRegistry::new(),
            components: ComponentStore::new(),
            systems: SystemRegistry::new(),
            names: HashMap::new(),
        }
    }

    // --- entity interface ---

    /// Create a new entity with an empty signature.
    pub fn create_entity(&mut self) -> EntityId {
        self.entities.create()
    }

    /// Create a new entity and index it under `name`.
    ///
    /// One id per name; registering an existing name rebinds it.
    pub fn create_entity_named(&mut self, name: impl Into<String>) -> EntityId {
        let entity = self.entities.create();
        self.names.insert(name.into(), entity);
        entity
    }

    /// Look up an entity by the name it was created under.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Destroy an entity and purge it everywhere.
    ///
    /// All stages run unconditionally: identity bookkeeping, every
    /// component store, every system's matched set, and the name index.
    /// Destroying a non-live id is a no-op returning `false`.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        let was_live = self.entities.destroy(entity);
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        self.names.retain(|_, id| *id != entity);
        if was_live {
            tracing::trace!(entity = entity.to_raw(), "destroyed entity");
        }
        was_live
    }

    /// Signature of `entity`; empty for non-live ids.
    pub fn signature(&self, entity: EntityId) -> Signature {
        self.entities.signature(entity)
    }

    /// Iterate all live entity ids in unspecified order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- component interface ---

    /// Register component type `T`, allocating its signature bit.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentTypeId, WorldError> {
        let type_id = self.components.register::<T>()?;
        tracing::debug!(
            type_name = std::any::type_name::<T>(),
            type_id,
            "registered component type"
        );
        Ok(type_id)
    }

    /// Attach `value` to `entity` and re-evaluate system membership.
    ///
    /// If the store insert fails the signature and matched sets are left
    /// untouched.
    pub fn add_component<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
    ) -> Result<(), WorldError> {
        if !self.entities.is_live(entity) {
            return Err(WorldError::DeadEntity(entity));
        }
        let type_id = self.components.type_id::<T>()?;
        self.components.insert(entity, value)?;

        let signature = self.entities.signature(entity).with(type_id);
        self.entities.set_signature(entity, signature);
        self.systems.signature_changed(entity, signature);
        Ok(())
    }

    /// Detach `T` from `entity`, if present, and re-evaluate membership.
    ///
    /// Removing an absent component is a no-op, mirroring the store.
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Result<(), WorldError> {
        if !self.entities.is_live(entity) {
            return Err(WorldError::DeadEntity(entity));
        }
        let type_id = self.components.type_id::<T>()?;
        if self.components.remove::<T>(entity)? {
            let mut signature = self.entities.signature(entity);
            signature.clear(type_id);
            self.entities.set_signature(entity, signature);
            self.systems.signature_changed(entity, signature);
        }
        Ok(())
    }

    /// Borrow the `T` attached to `entity`.
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Result<&T, WorldError> {
        Ok(self.components.get::<T>(entity)?)
    }

    /// Mutably borrow the `T` attached to `entity`.
    pub fn get_component_mut<T: Component>(
        &mut self,
        entity: EntityId,
    ) -> Result<&mut T, WorldError> {
        Ok(self.components.get_mut::<T>(entity)?)
    }

    /// Whether `entity` holds a `T`. Never fails.
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.components.has::<T>(entity)
    }

    // --- system interface ---

    /// Register system type `S`, constructing its single instance.
    pub fn register_system<S: System + Default>(&mut self) -> Result<SystemHandle, WorldError> {
        let handle = self.systems.register::<S>()?;
        tracing::debug!(
            type_name = std::any::type_name::<S>(),
            handle = handle.index(),
            "registered system"
        );
        Ok(handle)
    }

    /// Record the component signature `S` requires.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> Result<(), WorldError> {
        Ok(self.systems.set_signature::<S>(signature)?)
    }

    /// Borrow the registered instance of `S`.
    pub fn get_system<S: System>(&self) -> Result<&S, WorldError> {
        Ok(self.systems.get::<S>()?)
    }

    /// Mutably borrow the registered instance of `S`.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S, WorldError> {
        Ok(self.systems.get_mut::<S>()?)
    }

    /// Entities currently matching `S`'s required signature.
    pub fn system_entities<S: System>(&self) -> Result<&EntitySet, WorldError> {
        Ok(self.systems.entities::<S>()?)
    }

    /// Entities matching the system behind `handle`.
    pub fn system_entities_at(&self, handle: SystemHandle) -> Option<&EntitySet> {
        self.systems.entities_at(handle)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
