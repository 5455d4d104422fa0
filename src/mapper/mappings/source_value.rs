// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Values assigned to a single target member.

use proc_macro2::Ident;
use quote::quote;

use crate::mapper::{
    descriptors::MappingId,
    emit::{BuildContext, Emitter, syntax::Expr},
    symbols::MemberPath
};

/// What happens when a nullable source feeds a non-nullable member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullHandling {
    /// Types already agree on nullability.
    None,
    /// `expect` with the message.
    Unwrap(String),
    UnwrapOrDefault,
    /// Existing targets keep their value.
    SkipIfNone
}

#[derive(Debug, Clone)]
pub enum SourceValue {
    /// Read from a source member path and converted by `mapping`.
    Mapped {
        path:     MemberPath,
        borrowed: bool,
        mapping:  MappingId,
        null:     NullHandling
    },
    /// Type checked constant, already wrapped for the target.
    Constant(Expr),
    /// Zero-argument value provider on the mapper.
    MethodProvided { method: Ident, wrap_some: bool },
    /// `Default::default()` for ignored members and invalid constants.
    Default
}

impl SourceValue {
    /// Nested mapping used to convert the value, if any.
    #[must_use]
    pub fn mapping(&self) -> Option<MappingId> {
        match self {
            Self::Mapped {
                mapping, ..
            } => Some(*mapping),
            _ => None
        }
    }

    /// Path read from the source.
    #[must_use]
    pub fn path(&self) -> Option<&MemberPath> {
        match self {
            Self::Mapped {
                path, ..
            } => Some(path),
            _ => None
        }
    }

    /// Raw member value before null handling and conversion.
    pub fn read(&self, em: &mut Emitter<'_>, ctx: &BuildContext) -> Option<Expr> {
        let Self::Mapped {
            path,
            borrowed,
            ..
        } = self
        else {
            return None;
        };
        Some(em.member_getter(path, ctx.source.clone(), *borrowed, ctx.scope))
    }

    /// Final value expression for the member.
    pub fn build(&self, em: &mut Emitter<'_>, ctx: &BuildContext) -> Expr {
        match self {
            Self::Mapped {
                mapping,
                null,
                ..
            } => {
                let value = self.read(em, ctx).unwrap_or_else(Expr::default_value);
                match null {
                    NullHandling::None | NullHandling::SkipIfNone => {
                        em.build(*mapping, ctx.with_source(value))
                    }
                    NullHandling::Unwrap(message) => {
                        let value =
                            value.method("expect", vec![Expr::verbatim(quote! { #message })]);
                        em.build(*mapping, ctx.with_source(value))
                    }
                    NullHandling::UnwrapOrDefault => em
                        .map_option(value, *mapping, ctx.scope)
                        .method("unwrap_or_default", Vec::new())
                }
            }
            Self::Constant(expr) => expr.clone(),
            Self::MethodProvided {
                method,
                wrap_some
            } => {
                let call = Expr::call_self(method, Vec::new());
                if *wrap_some { call.some() } else { call }
            }
            Self::Default => Expr::default_value()
        }
    }
}
