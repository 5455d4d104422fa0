// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Calls to methods of the mapper itself.

use std::cell::OnceCell;

use proc_macro2::Ident;

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext,
        syntax::{Expr, Stmt}
    },
    symbols::TypeId
};

/// A method of the `#[mappings]` block with a mapping signature.
///
/// Implemented methods are called as they are. Declared methods are called
/// the same way, and their body is generated from the delegate mapping,
/// which is attached once the method's own mapping has been built.
#[derive(Debug, Clone)]
pub struct UserMapping {
    source:      TypeId,
    target:      TypeId,
    name:        Ident,
    existing:    bool,
    implemented: bool,
    /// Index of the method in its mapper.
    method:      usize,
    delegate:    OnceCell<MappingId>
}

impl UserMapping {
    #[must_use]
    pub fn new(
        source: TypeId,
        target: TypeId,
        name: Ident,
        existing: bool,
        implemented: bool,
        method: usize
    ) -> Self {
        Self {
            source,
            target,
            name,
            existing,
            implemented,
            method,
            delegate: OnceCell::new()
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
    pub fn name(&self) -> &Ident {
        &self.name
    }

    #[must_use]
    pub fn is_existing_target(&self) -> bool {
        self.existing
    }

    #[must_use]
    pub fn is_implemented(&self) -> bool {
        self.implemented
    }

    #[must_use]
    pub fn method(&self) -> usize {
        self.method
    }

    #[must_use]
    pub fn delegate(&self) -> Option<MappingId> {
        self.delegate.get().copied()
    }

    /// # Panics
    ///
    /// Panics when the delegate was already set.
    pub fn set_delegate(&self, delegate: MappingId) {
        if self.delegate.set(delegate).is_err() {
            panic!("delegate mapping of `{}` set twice", self.name);
        }
    }

    #[must_use]
    pub fn build(&self, ctx: BuildContext) -> Expr {
        Expr::call_self(&self.name, vec![ctx.source])
    }

    #[must_use]
    pub fn build_existing(&self, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        vec![Stmt::Expr(Expr::call_self(&self.name, vec![
            ctx.source,
            target.mutable_ref()
        ]))]
    }
}
