// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Single-expression mappings.

use proc_macro2::TokenStream;
use quote::quote;

use crate::mapper::{
    descriptors::MappingId,
    emit::{BuildContext, Emitter, syntax::Expr},
    symbols::TypeId
};

/// How a value of the target type is obtained from the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectKind {
    /// Owned value handed through unchanged.
    Move,
    /// `*source` for `Copy` types behind a reference.
    Copy,
    /// `source.clone()` for other types behind a reference.
    Clone
}

#[derive(Debug, Clone)]
pub struct DirectMapping {
    source:   TypeId,
    target:   TypeId,
    pub kind: DirectKind
}

impl DirectMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, kind: DirectKind) -> Self {
        Self {
            source,
            target,
            kind
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
    pub fn build(&self, ctx: BuildContext) -> Expr {
        match self.kind {
            DirectKind::Move => ctx.source,
            DirectKind::Copy => ctx.source.deref(),
            DirectKind::Clone => ctx.source.clone_value()
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConversionKind {
    /// `Target::from(source)` for lossless primitive conversions.
    From(TokenStream),
    /// `source as Target`.
    Cast(TokenStream),
    /// `source.to_string()`.
    ToString
}

/// Primitive conversion, optionally dereferencing a borrowed `Copy` source.
#[derive(Debug, Clone)]
pub struct ConversionMapping {
    source:       TypeId,
    target:       TypeId,
    kind:         ConversionKind,
    deref_source: bool
}

impl ConversionMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, kind: ConversionKind, deref_source: bool) -> Self {
        Self {
            source,
            target,
            kind,
            deref_source
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
    pub fn build(&self, ctx: BuildContext) -> Expr {
        let source = if self.deref_source {
            ctx.source.deref()
        } else {
            ctx.source
        };
        match &self.kind {
            ConversionKind::From(target) => Expr::call(quote! { #target::from }, vec![source]),
            ConversionKind::Cast(target) => source.cast(target.clone()),
            ConversionKind::ToString => source.method("to_string", Vec::new())
        }
    }
}

/// Single-argument constructor such as a `From` impl or `fn new(p) -> Self`.
#[derive(Debug, Clone)]
pub struct ConstructorMapping {
    source:    TypeId,
    target:    TypeId,
    /// Callable path, e.g. `<Email as ::std::convert::From<String>>::from`.
    call:      TokenStream,
    /// The parameter is `Option<Source>`.
    wrap_some: bool
}

impl ConstructorMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, call: TokenStream, wrap_some: bool) -> Self {
        Self {
            source,
            target,
            call,
            wrap_some
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
    pub fn build(&self, ctx: BuildContext) -> Expr {
        let argument = if self.wrap_some {
            ctx.source.some()
        } else {
            ctx.source
        };
        Expr::call(self.call.clone(), vec![argument])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxShape {
    /// `T -> Box<U>`
    Wrap,
    /// `Box<T> -> U`
    Unwrap,
    /// `Box<T> -> Box<U>`
    Rewrap,
    /// `&Box<T> -> U` through `&T`
    UnwrapRef
}

#[derive(Debug, Clone)]
pub struct BoxMapping {
    source: TypeId,
    target: TypeId,
    inner:  MappingId,
    shape:  BoxShape
}

impl BoxMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, inner: MappingId, shape: BoxShape) -> Self {
        Self {
            source,
            target,
            inner,
            shape
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
    pub fn inner(&self) -> MappingId {
        self.inner
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let source = match self.shape {
            BoxShape::Wrap => ctx.source.clone(),
            BoxShape::Unwrap | BoxShape::Rewrap => ctx.source.clone().deref(),
            BoxShape::UnwrapRef => ctx.source.clone().deref().deref().reference()
        };
        let inner = em.build(self.inner, ctx.with_source(source));
        match self.shape {
            BoxShape::Wrap | BoxShape::Rewrap => {
                Expr::call(quote! { ::std::boxed::Box::new }, vec![inner])
            }
            BoxShape::Unwrap | BoxShape::UnwrapRef => inner
        }
    }
}
