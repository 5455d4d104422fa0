// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Minimal expression tree for generated bodies.
//!
//! Mappings build [`Expr`] values instead of raw token streams so that
//! wrappers can be peeled when they cancel out: `*&source.id` prints as
//! `source.id`, and cloning `&source.name` prints as `source.name.clone()`.
//! Printing lives in [`super::tokens`].

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    /// Pre-built tokens: paths, literals, user expressions.
    Verbatim(TokenStream),
    Field {
        base:   Box<Expr>,
        member: syn::Member
    },
    MethodCall {
        receiver:  Box<Expr>,
        method:    Ident,
        turbofish: Option<TokenStream>,
        args:      Vec<Expr>
    },
    Call {
        func: TokenStream,
        args: Vec<Expr>
    },
    Closure {
        param: Pat,
        body:  Box<Expr>
    },
    Struct {
        path:   TokenStream,
        fields: Vec<(syn::Member, Expr)>
    },
    Tuple(Vec<Expr>),
    Ref(Box<Expr>),
    RefMut(Box<Expr>),
    Deref(Box<Expr>),
    Cast {
        expr: Box<Expr>,
        ty:   TokenStream
    },
    Eq(Box<Expr>, Box<Expr>),
    Match {
        scrutinee: Box<Expr>,
        arms:      Vec<Arm>
    },
    /// `if c1 { b1 } else if c2 { b2 } else { otherwise }`.
    IfChain {
        branches:  Vec<(Expr, Expr)>,
        otherwise: Box<Expr>
    },
    Block(Vec<Stmt>),
    Panic(String)
}

#[derive(Debug, Clone)]
pub struct Arm {
    pub pat:               Pat,
    pub guard:             Option<Expr>,
    pub body:              Expr,
    /// Emit `#[allow(unreachable_patterns)]` on the arm.
    pub allow_unreachable: bool
}

impl Arm {
    #[must_use]
    pub fn new(pat: Pat, body: Expr) -> Self {
        Self {
            pat,
            guard: None,
            body,
            allow_unreachable: false
        }
    }

    #[must_use]
    pub fn with_guard(mut self, guard: Expr) -> Self {
        self.guard = Some(guard);
        self
    }

    #[must_use]
    pub fn unreachable_allowed(mut self) -> Self {
        self.allow_unreachable = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum Pat {
    Wild,
    Ident(Ident),
    /// Literal or unit path.
    Verbatim(TokenStream),
    TupleStruct {
        path:  TokenStream,
        elems: Vec<Pat>
    },
    Struct {
        path:   TokenStream,
        fields: Vec<(syn::Member, Pat)>,
        rest:   bool
    },
    Tuple(Vec<Pat>)
}

impl Pat {
    #[must_use]
    pub fn ident(name: &str) -> Self {
        Self::Ident(Ident::new(name, Span::call_site()))
    }

    /// `Some(inner)`.
    #[must_use]
    pub fn some(inner: Self) -> Self {
        Self::TupleStruct {
            path:  quote! { ::std::option::Option::Some },
            elems: vec![inner]
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        place: Expr,
        value: Expr
    },
    /// `if let a = x && let b = y { .. }` when `chained`, nested `if let`
    /// blocks otherwise.
    IfLet {
        bindings: Vec<(Pat, Expr)>,
        chained:  bool,
        then:     Vec<Stmt>
    }
}

impl Expr {
    #[must_use]
    pub fn ident(name: &str) -> Self {
        Self::Ident(Ident::new(name, Span::call_site()))
    }

    #[must_use]
    pub fn verbatim(tokens: TokenStream) -> Self {
        Self::Verbatim(tokens)
    }

    #[must_use]
    pub fn call(func: TokenStream, args: Vec<Self>) -> Self {
        Self::Call {
            func,
            args
        }
    }

    /// `Self::name(args)`.
    #[must_use]
    pub fn call_self(name: &Ident, args: Vec<Self>) -> Self {
        Self::call(quote! { Self::#name }, args)
    }

    #[must_use]
    pub fn some(self) -> Self {
        Self::call(quote! { ::std::option::Option::Some }, vec![self])
    }

    #[must_use]
    pub fn default_value() -> Self {
        Self::call(quote! { ::std::default::Default::default }, Vec::new())
    }

    #[must_use]
    pub fn field(self, member: syn::Member) -> Self {
        Self::Field {
            base: Box::new(self),
            member
        }
    }

    #[must_use]
    pub fn method(self, name: &str, args: Vec<Self>) -> Self {
        Self::MethodCall {
            receiver: Box::new(self),
            method: Ident::new(name, Span::call_site()),
            turbofish: None,
            args
        }
    }

    /// `self.name::<turbofish>(args)`.
    #[must_use]
    pub fn method_turbofish(self, name: &str, turbofish: TokenStream, args: Vec<Self>) -> Self {
        Self::MethodCall {
            receiver: Box::new(self),
            method: Ident::new(name, Span::call_site()),
            turbofish: Some(turbofish),
            args
        }
    }

    #[must_use]
    pub fn closure(param: Pat, body: Self) -> Self {
        Self::Closure {
            param,
            body: Box::new(body)
        }
    }

    #[must_use]
    pub fn reference(self) -> Self {
        Self::Ref(Box::new(self))
    }

    #[must_use]
    pub fn reference_mut(self) -> Self {
        Self::RefMut(Box::new(self))
    }

    /// `&mut self` for a place; `&mut *x` collapses to `x`.
    #[must_use]
    pub fn mutable_ref(self) -> Self {
        match self {
            Self::Deref(inner) => *inner,
            other => other.reference_mut()
        }
    }

    /// `*self`; `*&x` collapses to `x`.
    #[must_use]
    pub fn deref(self) -> Self {
        match self {
            Self::Ref(inner) => *inner,
            other => Self::Deref(Box::new(other))
        }
    }

    /// `self.clone()`; cloning `&x` clones `x` directly.
    #[must_use]
    pub fn clone_value(self) -> Self {
        match self {
            Self::Ref(inner) => inner.method("clone", Vec::new()),
            other => other.method("clone", Vec::new())
        }
    }

    #[must_use]
    pub fn cast(self, ty: TokenStream) -> Self {
        Self::Cast {
            expr: Box::new(self),
            ty
        }
    }

    #[must_use]
    pub fn equals(self, other: Self) -> Self {
        Self::Eq(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn matches(scrutinee: Self, arms: Vec<Arm>) -> Self {
        Self::Match {
            scrutinee: Box::new(scrutinee),
            arms
        }
    }

    #[must_use]
    pub fn if_chain(branches: Vec<(Self, Self)>, otherwise: Self) -> Self {
        Self::IfChain {
            branches,
            otherwise: Box::new(otherwise)
        }
    }

    /// Whether evaluating the expression twice is harmless and cheap.
    #[must_use]
    pub fn is_place(&self) -> bool {
        match self {
            Self::Ident(_) => true,
            Self::Field {
                base, ..
            } => base.is_place(),
            Self::Deref(inner) | Self::Ref(inner) => inner.is_place(),
            _ => false
        }
    }

    /// Last identifier or field name, used to name element bindings.
    #[must_use]
    pub fn name_hint(&self) -> Option<String> {
        match self {
            Self::Ident(ident) => Some(ident.to_string()),
            Self::Field {
                member: syn::Member::Named(ident),
                ..
            } => Some(ident.to_string()),
            Self::Ref(inner) | Self::Deref(inner) | Self::RefMut(inner) => inner.name_hint(),
            Self::MethodCall {
                receiver, ..
            } => receiver.name_hint(),
            _ => None
        }
    }
}
