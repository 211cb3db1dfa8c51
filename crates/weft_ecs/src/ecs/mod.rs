//! Entity Component System core types.
//!
//! The design follows a manager-per-concern split: `EntityRegistry` hands
//! out recycled ids and tracks per-entity signatures, `ComponentStore`
//! owns one sparse map per registered component type behind a type-erased
//! purge interface, and `SystemRegistry` keeps the set of entities whose
//! signature satisfies each system's requirement. `World` composes the
//! three so that every component add/remove re-evaluates system
//! membership before the call returns.

mod component;
mod entity;
mod signature;
mod system;
mod world;

pub use component::{Component, ComponentError, ComponentStore, ComponentTypeId};
pub use entity::{EntityId, EntityRegistry};
pub use signature::{Signature, MAX_COMPONENT_TYPES};
pub use system::{EntitySet, System, SystemError, SystemHandle, SystemRegistry};
pub use world::{World, WorldError};
