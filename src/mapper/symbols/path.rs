// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Member access chains such as `order.customer.name`.
//!
//! A [`MemberPath`] is a non-empty list of resolved fields starting at a
//! declared struct. Intermediate hops may go through `Option`, `Box` or a
//! shared reference; `Box` and `&` are transparent to field access, while an
//! `Option` hop turns the rest of the chain into `map`/`and_then` calls.
//!
//! | Mode | Leaf `T` | Leaf `Option<T>` | Any nullable hop |
//! |------|----------|------------------|------------------|
//! | owned | `T` | `Option<T>` | `Option<T>` |
//! | borrowed | `&T` | `Option<&T>` | `Option<&T>` |

use super::{
    model::{Member, TypeModel},
    types::{TypeId, TypeKind}
};
use crate::{
    mapper::emit::syntax::{Expr, Pat, Stmt},
    utils::names::{ScopeId, UniqueNameBuilder}
};

#[derive(Debug, Clone)]
pub struct MemberPath {
    root:     TypeId,
    segments: Vec<Member>
}

impl PartialEq for MemberPath {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.name == b.name)
    }
}

/// Declared struct behind `Option`, `Box` and `&` layers.
fn holder(model: &TypeModel, mut ty: TypeId) -> Option<TypeId> {
    loop {
        match model.kind(ty) {
            TypeKind::Option(inner) | TypeKind::Boxed(inner) | TypeKind::Ref(inner) => ty = *inner,
            TypeKind::Struct(_) => return Some(ty),
            _ => return None
        }
    }
}

fn member_named<'m>(model: &'m TypeModel, ty: TypeId, name: &str) -> Option<&'m Member> {
    let holder = holder(model, ty)?;
    model.members(holder)?.iter().find(|m| m.name == name)
}

impl MemberPath {
    /// Resolve an explicit chain of member names starting at `root`.
    #[must_use]
    pub fn resolve(model: &TypeModel, root: TypeId, names: &[String]) -> Option<Self> {
        let root = holder(model, root)?;
        if names.is_empty() {
            return None;
        }
        let mut current = root;
        let mut segments = Vec::with_capacity(names.len());
        for name in names {
            let member = member_named(model, current, name)?;
            current = member.ty;
            segments.push(member.clone());
        }
        Some(Self {
            root,
            segments
        })
    }

    /// Find the source for a target member name.
    ///
    /// An exact member match wins; otherwise `engine_power` is split on
    /// underscores and matched against nested members such as
    /// `engine.power`, preferring the longest leading segment.
    #[must_use]
    pub fn find(model: &TypeModel, root: TypeId, name: &str) -> Option<Self> {
        let root = holder(model, root)?;
        if let Some(member) = member_named(model, root, name) {
            return Some(Self {
                root,
                segments: vec![member.clone()]
            });
        }
        let parts: Vec<&str> = name.split('_').filter(|p| !p.is_empty()).collect();
        if parts.len() < 2 {
            return None;
        }
        let mut segments = Vec::new();
        flatten(model, root, &parts, &mut segments).then_some(Self {
            root,
            segments
        })
    }

    #[must_use]
    pub fn root(&self) -> TypeId {
        self.root
    }

    #[must_use]
    pub fn segments(&self) -> &[Member] {
        &self.segments
    }

    /// Name of the first member.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.segments[0].name
    }

    #[must_use]
    pub fn leaf(&self) -> &Member {
        &self.segments[self.segments.len() - 1]
    }

    /// Dotted spelling, `engine.power`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Whether any hop before the leaf is nullable.
    #[must_use]
    pub fn has_nullable_hop(&self, model: &TypeModel) -> bool {
        self.segments[..self.segments.len() - 1]
            .iter()
            .any(|s| model.is_nullable(s.ty))
    }

    /// Final state of the access chain: whether it went through an optional
    /// hop, and the type it yields inside that option.
    fn shape(&self, model: &TypeModel) -> (bool, TypeId) {
        let mut optional = false;
        let mut current = self.root;
        for segment in &self.segments {
            if model.is_nullable(current) {
                optional = true;
                current = model.non_nullable(current);
            }
            current = if optional {
                model.non_nullable(segment.ty)
            } else {
                segment.ty
            };
        }
        (optional, current)
    }

    /// Type produced by [`Self::getter`].
    pub fn value_type(&self, model: &mut TypeModel, borrowed: bool) -> TypeId {
        let (optional, current) = self.shape(model);
        match (borrowed, optional) {
            (false, false) => current,
            (false, true) => model.nullable(current),
            (true, true) => {
                let reference = model.reference(current);
                model.nullable(reference)
            }
            (true, false) if model.is_nullable(current) => {
                let inner = model.non_nullable(current);
                let reference = model.reference(inner);
                model.nullable(reference)
            }
            (true, false) => model.reference(current)
        }
    }

    /// Expression reading the member from `source`.
    ///
    /// Owned getters move out of `source`; borrowed getters expect `source`
    /// to be a reference and never move.
    pub fn getter(
        &self,
        model: &TypeModel,
        source: Expr,
        borrowed: bool,
        names: &mut UniqueNameBuilder,
        scope: ScopeId
    ) -> Expr {
        let mut expr = source;
        let mut optional = false;
        let mut current = self.root;
        let mut previous = None::<&str>;
        for segment in &self.segments {
            if model.is_nullable(current) {
                if borrowed && !optional {
                    expr = expr.method("as_ref", Vec::new());
                }
                optional = true;
                current = model.non_nullable(current);
            }
            if optional {
                let closure_scope = names.new_scope(scope);
                let binding = names.new_name(closure_scope, previous.unwrap_or("value"));
                let access = Expr::ident(&binding).field(segment.member.clone());
                let nullable = model.is_nullable(segment.ty);
                let (method, body) = match (borrowed, nullable) {
                    (false, true) => ("and_then", access),
                    (false, false) => ("map", access),
                    (true, true) => ("and_then", access.method("as_ref", Vec::new())),
                    (true, false) => ("map", access.reference())
                };
                expr = expr.method(method, vec![Expr::closure(Pat::ident(&binding), body)]);
                current = model.non_nullable(segment.ty);
            } else {
                expr = expr.field(segment.member.clone());
                current = segment.ty;
            }
            previous = Some(segment.name.as_str());
        }
        match (borrowed, optional) {
            (true, false) if model.is_nullable(current) => expr.method("as_ref", Vec::new()),
            (true, false) => expr.reference(),
            _ => expr
        }
    }

    /// Statement assigning `value` to the member of the `target` place.
    ///
    /// Optional intermediate members are entered with `as_mut`; when they
    /// are `None` the assignment is skipped.
    pub fn setter(
        &self,
        model: &TypeModel,
        target: Expr,
        value: Expr,
        chained: bool,
        names: &mut UniqueNameBuilder,
        scope: ScopeId
    ) -> Stmt {
        let mut place = target;
        let mut bindings = Vec::new();
        let (leaf, hops) = self
            .segments
            .split_last()
            .unwrap_or_else(|| unreachable!("member paths are never empty"));
        for segment in hops {
            place = place.field(segment.member.clone());
            if model.is_nullable(segment.ty) {
                let binding = names.new_name(scope, &segment.name);
                bindings.push((
                    Pat::some(Pat::ident(&binding)),
                    place.method("as_mut", Vec::new())
                ));
                place = Expr::ident(&binding);
            }
        }
        let assign = Stmt::Assign {
            place: place.field(leaf.member.clone()),
            value
        };
        if bindings.is_empty() {
            assign
        } else {
            Stmt::IfLet {
                bindings,
                chained,
                then: vec![assign]
            }
        }
    }
}

fn flatten(model: &TypeModel, current: TypeId, parts: &[&str], acc: &mut Vec<Member>) -> bool {
    if parts.is_empty() {
        return true;
    }
    for take in (1..=parts.len()).rev() {
        let candidate = parts[..take].join("_");
        let Some(member) = member_named(model, current, &candidate) else {
            continue;
        };
        acc.push(member.clone());
        if flatten(model, member.ty, &parts[take..], acc) {
            return true;
        }
        acc.pop();
    }
    false
}
