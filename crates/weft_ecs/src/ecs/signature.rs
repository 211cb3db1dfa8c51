use crate::ecs::ComponentTypeId;
use std::fmt;

/// Maximum number of distinct component types a world can register.
///
/// Signatures are a fixed-width `u64` bitmask, so the type count is capped
/// at the mask width. Registration fails fast once the budget is spent
/// instead of wrapping bit positions.
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Bitmask over registered component types.
///
/// Bit `i` set means "component type with id `i`". The same type is used
/// for what an entity *has* and what a system *requires*; membership
/// testing is the superset check in [`Signature::contains`].
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    /// Signature with no component bits set.
    pub const EMPTY: Signature = Signature(0);

    /// Builder-style variant of [`Signature::set`].
    #[must_use]
    pub fn with(mut self, type_id: ComponentTypeId) -> Self {
        self.set(type_id);
        self
    }

    /// Set the bit for `type_id`.
    pub fn set(&mut self, type_id: ComponentTypeId) {
        debug_assert!((type_id as usize) < MAX_COMPONENT_TYPES);
        self.0 |= 1u64 << type_id;
    }

    /// Clear the bit for `type_id`.
    pub fn clear(&mut self, type_id: ComponentTypeId) {
        debug_assert!((type_id as usize) < MAX_COMPONENT_TYPES);
        self.0 &= !(1u64 << type_id);
    }

    /// Whether the bit for `type_id` is set.
    #[inline]
    pub fn test(&self, type_id: ComponentTypeId) -> bool {
        self.0 & (1u64 << type_id) != 0
    }

    /// Superset test: every bit of `required` is also set in `self`.
    #[inline]
    pub fn contains(&self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    /// Whether no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw mask value.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Reconstruct from a raw mask value.
    #[inline]
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#018x})", self.0)
    }
}
