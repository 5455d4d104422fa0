// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Arena and cache of every mapping of one mapper.
//!
//! Mappings refer to each other by [`MappingId`], an index into the slot
//! arena, so recursive type graphs never need reference cycles. A slot is
//! reserved before its mapping is built; a second request for the same key
//! while the first is still building receives the reserved id and is
//! recorded as a deferred hand-out.
//!
//! | Slot | Meaning |
//! |------|---------|
//! | `Building` | placeholder, mapping under construction |
//! | `Complete` | finished mapping |
//! | `Alias` | resolved to another existing mapping |
//! | `Failed` | no mapping, diagnostics already reported or no strategy |

use bitflags::bitflags;
use proc_macro2::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::mapper::{config::ConfigScope, mappings::Mapping, symbols::TypeId};

/// Stable reference to a mapping slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(u32);

impl MappingId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// How a mapping request may be satisfied and stored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MappingBuildingOptions: u8 {
        /// Resolve nested configuration against the requesting method.
        const KEEP_USER_SYMBOL = 1 << 0;
        /// Cache the result so later requests reuse it.
        const MARK_AS_REUSABLE = 1 << 1;
        /// Skip the derived type switch builder.
        const IGNORE_DERIVED_TYPES = 1 << 2;
    }
}

impl Default for MappingBuildingOptions {
    fn default() -> Self {
        Self::MARK_AS_REUSABLE
    }
}

/// Identity of a mapping request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeMappingKey {
    pub source:          TypeId,
    pub target:          TypeId,
    pub existing_target: bool,
    pub scope:           ConfigScope,
    pub ignore_derived:  bool
}

/// Why a mapping could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFailure {
    /// No builder applies; the caller decides what to report.
    NoStrategy,
    /// A builder applied but failed and already reported diagnostics.
    Reported
}

#[derive(Debug)]
enum Slot {
    Building(TypeMappingKey),
    Complete(Mapping),
    Alias(MappingId),
    Failed
}

#[derive(Debug, Default)]
pub struct MappingRegistry {
    slots:    Vec<Slot>,
    cache:    FxHashMap<TypeMappingKey, MappingId>,
    deferred: Vec<(MappingId, Span)>,
    promoted: FxHashSet<MappingId>
}

impl MappingRegistry {
    /// Cached id for `key`, following aliases.
    #[must_use]
    pub fn find(&self, key: &TypeMappingKey) -> Option<MappingId> {
        self.cache.get(key).map(|&id| self.resolve(id))
    }

    /// Reserve a placeholder slot; `cache` makes it visible to [`Self::find`].
    pub fn reserve(&mut self, key: TypeMappingKey, cache: bool) -> MappingId {
        let id = MappingId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.slots.push(Slot::Building(key));
        if cache {
            self.cache.insert(key, id);
        }
        id
    }

    /// Store a finished mapping that needs no placeholder.
    pub fn register(&mut self, key: TypeMappingKey, mapping: Mapping) -> MappingId {
        let id = self.reserve(key, true);
        self.complete(id, mapping);
        id
    }

    /// # Panics
    ///
    /// Panics if the slot is not a placeholder.
    pub fn complete(&mut self, id: MappingId, mapping: Mapping) {
        let slot = &mut self.slots[id.index()];
        assert!(
            matches!(slot, Slot::Building(_)),
            "mapping slot {id:?} completed twice"
        );
        *slot = Slot::Complete(mapping);
    }

    /// Point a placeholder at another mapping.
    pub fn alias(&mut self, id: MappingId, to: MappingId) {
        self.slots[id.index()] = Slot::Alias(to);
    }

    /// Mark a placeholder as failed.
    ///
    /// With `forget` the cache entry is dropped so a later request may try
    /// again under a different configuration.
    pub fn fail(&mut self, id: MappingId, forget: bool) {
        if forget && let Slot::Building(key) = &self.slots[id.index()] {
            let key = *key;
            if self.cache.get(&key) == Some(&id) {
                self.cache.remove(&key);
            }
        }
        self.slots[id.index()] = Slot::Failed;
    }

    #[must_use]
    pub fn resolve(&self, mut id: MappingId) -> MappingId {
        while let Slot::Alias(next) = self.slots[id.index()] {
            id = next;
        }
        id
    }

    #[must_use]
    pub fn try_get(&self, id: MappingId) -> Option<&Mapping> {
        match &self.slots[self.resolve(id).index()] {
            Slot::Complete(mapping) => Some(mapping),
            _ => None
        }
    }

    /// # Panics
    ///
    /// Panics when the mapping is not complete; emission only visits
    /// mappings whose whole dependency graph completed.
    #[must_use]
    pub fn get(&self, id: MappingId) -> &Mapping {
        self.try_get(id)
            .unwrap_or_else(|| panic!("mapping {id:?} used before it was completed"))
    }

    #[must_use]
    pub fn is_building(&self, id: MappingId) -> bool {
        matches!(self.slots[self.resolve(id).index()], Slot::Building(_))
    }

    #[must_use]
    pub fn is_failed(&self, id: MappingId) -> bool {
        matches!(self.slots[self.resolve(id).index()], Slot::Failed)
    }

    pub fn record_deferred(&mut self, id: MappingId, span: Span) {
        self.deferred.push((id, span));
    }

    /// Ids handed out while their mapping was still building.
    #[must_use]
    pub fn deferred(&self) -> &[(MappingId, Span)] {
        &self.deferred
    }

    /// Force a mapping to be emitted as its own function.
    pub fn promote(&mut self, id: MappingId) {
        self.promoted.insert(self.resolve(id));
    }

    #[must_use]
    pub fn is_promoted(&self, id: MappingId) -> bool {
        self.promoted.contains(&self.resolve(id))
    }

    /// Attach the body of a declared user method.
    ///
    /// # Panics
    ///
    /// Panics if `user` is not a declared user mapping or already has one.
    pub fn set_delegate(&self, user: MappingId, delegate: MappingId) {
        match self.get(user) {
            Mapping::User(mapping) => mapping.set_delegate(delegate),
            other => panic!("delegate set on non-user mapping {other:?}")
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::mappings::{DirectKind, DirectMapping};

    fn key(source: u32, target: u32) -> TypeMappingKey {
        TypeMappingKey {
            source:          TypeId(source),
            target:          TypeId(target),
            existing_target: false,
            scope:           ConfigScope::Default,
            ignore_derived:  false
        }
    }

    fn direct(source: u32, target: u32) -> Mapping {
        Mapping::Direct(DirectMapping::new(TypeId(source), TypeId(target), DirectKind::Move))
    }

    #[test]
    fn cached_placeholder_is_found_while_building() {
        let mut registry = MappingRegistry::default();
        let id = registry.reserve(key(0, 1), true);
        assert_eq!(registry.find(&key(0, 1)), Some(id));
        assert!(registry.is_building(id));
        registry.complete(id, direct(0, 1));
        assert!(registry.try_get(id).is_some());
    }

    #[test]
    fn uncached_placeholder_is_invisible() {
        let mut registry = MappingRegistry::default();
        registry.reserve(key(0, 1), false);
        assert_eq!(registry.find(&key(0, 1)), None);
    }

    #[test]
    fn forgetting_failure_drops_cache_entry() {
        let mut registry = MappingRegistry::default();
        let forgotten = registry.reserve(key(0, 1), true);
        registry.fail(forgotten, true);
        assert_eq!(registry.find(&key(0, 1)), None);

        let kept = registry.reserve(key(2, 3), true);
        registry.fail(kept, false);
        assert_eq!(registry.find(&key(2, 3)), Some(kept));
        assert!(registry.is_failed(kept));
    }

    #[test]
    fn aliases_resolve_to_target() {
        let mut registry = MappingRegistry::default();
        let real = registry.register(key(0, 1), direct(0, 1));
        let alias = registry.reserve(key(0, 1), false);
        registry.alias(alias, real);
        assert_eq!(registry.resolve(alias), real);
        assert!(registry.try_get(alias).is_some());
    }

    #[test]
    #[should_panic(expected = "completed twice")]
    fn completing_twice_panics() {
        let mut registry = MappingRegistry::default();
        let id = registry.register(key(0, 1), direct(0, 1));
        registry.complete(id, direct(0, 1));
    }

    #[test]
    fn default_options_are_reusable() {
        assert_eq!(
            MappingBuildingOptions::default(),
            MappingBuildingOptions::MARK_AS_REUSABLE
        );
    }
}
