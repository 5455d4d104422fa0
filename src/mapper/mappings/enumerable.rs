// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Element-wise mappings over collections, maps and iterators.
//!
//! | Mapping | Shape |
//! |---------|-------|
//! | [`EnumerableMapping`] | `source.into_iter().map(..).collect::<T>()` |
//! | [`QueryableProjectionMapping`] | `source.into_iter().map(..)`, element body inlined |
//! | [`DictionaryMapping`] | `source.into_iter().map(\|(k, v)\| (..)).collect::<T>()` |
//! | [`ExistingEnumerableMapping`] | `target.extend(..)` |

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext, Emitter,
        syntax::{Expr, Pat, Stmt}
    },
    symbols::TypeId
};

/// How an iterator is obtained from the source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterSource {
    /// Owned collection, `into_iter()`.
    IntoIter,
    /// Borrowed collection, `iter()`.
    Iter,
    /// The source already is an iterator.
    Itself
}

impl IterSource {
    fn apply(self, source: Expr) -> Expr {
        match self {
            Self::IntoIter => source.method("into_iter", Vec::new()),
            Self::Iter => source.method("iter", Vec::new()),
            Self::Itself => source
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumerableMapping {
    source:  TypeId,
    target:  TypeId,
    element: MappingId,
    iter:    IterSource
}

impl EnumerableMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, element: MappingId, iter: IterSource) -> Self {
        Self {
            source,
            target,
            element,
            iter
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    #[must_use]
    pub fn element(&self) -> MappingId {
        self.element
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let iter = self.iter.apply(ctx.source);
        let target = em.type_tokens(self.target);
        em.map_element(iter, self.element, ctx.scope)
            .method_turbofish("collect", target, Vec::new())
    }
}

/// Lazy projection into `impl Iterator<Item = T>`.
#[derive(Debug, Clone)]
pub struct QueryableProjectionMapping {
    source:  TypeId,
    target:  TypeId,
    element: MappingId,
    iter:    IterSource
}

impl QueryableProjectionMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, element: MappingId, iter: IterSource) -> Self {
        Self {
            source,
            target,
            element,
            iter
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    #[must_use]
    pub fn element(&self) -> MappingId {
        self.element
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let iter = self.iter.apply(ctx.source);
        em.project_element(iter, self.element, ctx.scope)
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryMapping {
    source: TypeId,
    target: TypeId,
    key:    MappingId,
    value:  MappingId,
    iter:   IterSource
}

impl DictionaryMapping {
    #[must_use]
    pub fn new(
        source: TypeId,
        target: TypeId,
        key: MappingId,
        value: MappingId,
        iter: IterSource
    ) -> Self {
        Self {
            source,
            target,
            key,
            value,
            iter
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    #[must_use]
    pub fn key(&self) -> MappingId {
        self.key
    }

    #[must_use]
    pub fn value(&self) -> MappingId {
        self.value
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let iter = self.iter.apply(ctx.source);
        let target = em.type_tokens(self.target);
        let scope = em.new_scope(ctx.scope);
        let key_name = em.new_name(scope, "key");
        let value_name = em.new_name(scope, "value");
        let key = em.build(self.key, BuildContext::new(Expr::ident(&key_name), scope));
        let value = em.build(self.value, BuildContext::new(Expr::ident(&value_name), scope));
        let entry = Pat::Tuple(vec![Pat::ident(&key_name), Pat::ident(&value_name)]);
        iter.method("map", vec![Expr::closure(entry, Expr::Tuple(vec![key, value]))])
            .method_turbofish("collect", target, Vec::new())
    }
}

/// Appends mapped elements to an existing collection.
#[derive(Debug, Clone)]
pub struct ExistingEnumerableMapping {
    source:  TypeId,
    target:  TypeId,
    element: MappingId,
    iter:    IterSource
}

impl ExistingEnumerableMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, element: MappingId, iter: IterSource) -> Self {
        Self {
            source,
            target,
            element,
            iter
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    #[must_use]
    pub fn element(&self) -> MappingId {
        self.element
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        let iter = self.iter.apply(ctx.source);
        let elements = em.map_element(iter, self.element, ctx.scope);
        vec![Stmt::Expr(target.method("extend", vec![elements]))]
    }
}
