// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Member-by-member construction and update of declared structs.

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext, Emitter,
        syntax::{Expr, Pat, Stmt}
    },
    mappings::source_value::{NullHandling, SourceValue},
    symbols::{MemberPath, TypeId}
};

#[derive(Debug, Clone)]
pub struct MemberAssignment {
    pub member: syn::Member,
    pub value:  SourceValue
}

/// `Target { a: .., b: .. }` built from the source members.
#[derive(Debug, Clone)]
pub struct MemberwiseMapping {
    source:      TypeId,
    target:      TypeId,
    assignments: Vec<MemberAssignment>
}

impl MemberwiseMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, assignments: Vec<MemberAssignment>) -> Self {
        Self {
            source,
            target,
            assignments
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
    pub fn assignments(&self) -> &[MemberAssignment] {
        &self.assignments
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let fields = self
            .assignments
            .iter()
            .map(|assignment| (assignment.member.clone(), assignment.value.build(em, &ctx)))
            .collect();
        Expr::Struct {
            path: em.type_tokens(self.target),
            fields
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExistingMemberAssignment {
    pub target: MemberPath,
    pub value:  SourceValue
}

/// Assignments into the members of an existing target.
#[derive(Debug, Clone)]
pub struct ExistingMemberwiseMapping {
    source:      TypeId,
    target:      TypeId,
    assignments: Vec<ExistingMemberAssignment>
}

impl ExistingMemberwiseMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, assignments: Vec<ExistingMemberAssignment>) -> Self {
        Self {
            source,
            target,
            assignments
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
    pub fn assignments(&self) -> &[ExistingMemberAssignment] {
        &self.assignments
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        let mut stmts = Vec::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            let stmt = match &assignment.value {
                SourceValue::Mapped {
                    mapping,
                    null: NullHandling::SkipIfNone,
                    ..
                } => {
                    let Some(value) = assignment.value.read(em, &ctx) else {
                        continue;
                    };
                    let scope = em.new_scope(ctx.scope);
                    let binding = em.new_name(scope, &assignment.target.leaf().name);
                    let inner = BuildContext::new(Expr::ident(&binding), scope);
                    let converted = em.build(*mapping, inner);
                    let assign =
                        em.member_setter(&assignment.target, target.clone(), converted, scope);
                    Stmt::IfLet {
                        bindings: vec![(Pat::some(Pat::ident(&binding)), value)],
                        chained:  false,
                        then:     vec![assign]
                    }
                }
                value => {
                    let value = value.build(em, &ctx);
                    em.member_setter(&assignment.target, target.clone(), value, ctx.scope)
                }
            };
            stmts.push(stmt);
        }
        stmts
    }
}

/// Mapping ids a list of source values depends on.
pub(crate) fn value_dependencies<'v>(
    values: impl Iterator<Item = &'v SourceValue>
) -> impl Iterator<Item = MappingId> {
    values.filter_map(SourceValue::mapping)
}
