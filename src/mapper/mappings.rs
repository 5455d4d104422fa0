// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved mappings.
//!
//! [`Mapping`] is a closed sum over every strategy the builders can choose.
//! Variants reference nested mappings by [`MappingId`] and never own them,
//! which keeps recursive type graphs representable without cycles.
//!
//! # Variants
//!
//! | Variant | Protocol | Emitted as |
//! |---------|----------|------------|
//! | `Direct` | new | move, `*x` or `x.clone()` |
//! | `Conversion` | new | `T::from(x)`, `x as T`, `x.to_string()` |
//! | `Constructor` | new | `T::from(x)` / `T::new(x)` |
//! | `Nullable` | new | `Some`, `map`, `expect`, `unwrap_or_default` |
//! | `Boxed` | new | `Box::new`, `*x` |
//! | `Enumerable` | new | `into_iter().map(..).collect()` |
//! | `Queryable` | new | `into_iter().map(..)` |
//! | `Dictionary` | new | key and value projection |
//! | `Memberwise` | new | struct literal, helper method |
//! | `Enum` / `EnumToString` / `StringToEnum` | new | `match`, helper method |
//! | `DerivedSwitch` | new | `match` over variants, helper method |
//! | `User` | both | call of a mapper method |
//! | `Existing*` | existing | statements mutating the target |

pub mod derived;
pub mod enumerable;
pub mod enums;
pub mod memberwise;
pub mod nullable;
pub mod simple;
pub mod source_value;
pub mod user;

pub use derived::{
    DerivedExistingTargetTypeSwitchMapping, DerivedTypeMapping, DerivedTypeSwitchMapping,
    Discriminator
};
pub use enumerable::{
    DictionaryMapping, EnumerableMapping, ExistingEnumerableMapping, IterSource,
    QueryableProjectionMapping
};
pub use enums::{EnumArm, EnumMapping, EnumToStringMapping, PayloadField, StringToEnumMapping};
pub use memberwise::{
    ExistingMemberAssignment, ExistingMemberwiseMapping, MemberAssignment, MemberwiseMapping
};
pub use nullable::{ExistingNullableMapping, NullableMapping, NullableShape};
pub use simple::{
    BoxMapping, BoxShape, ConstructorMapping, ConversionKind, ConversionMapping, DirectKind,
    DirectMapping
};
pub use source_value::{NullHandling, SourceValue};
pub use user::UserMapping;

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext, Emitter,
        syntax::{Expr, Stmt}
    },
    symbols::TypeId
};

#[derive(Debug, Clone)]
pub enum Mapping {
    Direct(DirectMapping),
    Conversion(ConversionMapping),
    Constructor(ConstructorMapping),
    Nullable(NullableMapping),
    Boxed(BoxMapping),
    Enumerable(EnumerableMapping),
    Queryable(QueryableProjectionMapping),
    Dictionary(DictionaryMapping),
    Memberwise(MemberwiseMapping),
    Enum(EnumMapping),
    EnumToString(EnumToStringMapping),
    StringToEnum(StringToEnumMapping),
    DerivedSwitch(DerivedTypeSwitchMapping),
    User(UserMapping),
    ExistingMemberwise(ExistingMemberwiseMapping),
    ExistingEnumerable(ExistingEnumerableMapping),
    ExistingNullable(ExistingNullableMapping),
    ExistingDerivedSwitch(DerivedExistingTargetTypeSwitchMapping)
}

impl Mapping {
    #[must_use]
    pub fn source(&self) -> TypeId {
        match self {
            Self::Direct(m) => m.source(),
            Self::Conversion(m) => m.source(),
            Self::Constructor(m) => m.source(),
            Self::Nullable(m) => m.source(),
            Self::Boxed(m) => m.source(),
            Self::Enumerable(m) => m.source(),
            Self::Queryable(m) => m.source(),
            Self::Dictionary(m) => m.source(),
            Self::Memberwise(m) => m.source(),
            Self::Enum(m) => m.source(),
            Self::EnumToString(m) => m.source(),
            Self::StringToEnum(m) => m.source(),
            Self::DerivedSwitch(m) => m.source(),
            Self::User(m) => m.source(),
            Self::ExistingMemberwise(m) => m.source(),
            Self::ExistingEnumerable(m) => m.source(),
            Self::ExistingNullable(m) => m.source(),
            Self::ExistingDerivedSwitch(m) => m.source()
        }
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        match self {
            Self::Direct(m) => m.target(),
            Self::Conversion(m) => m.target(),
            Self::Constructor(m) => m.target(),
            Self::Nullable(m) => m.target(),
            Self::Boxed(m) => m.target(),
            Self::Enumerable(m) => m.target(),
            Self::Queryable(m) => m.target(),
            Self::Dictionary(m) => m.target(),
            Self::Memberwise(m) => m.target(),
            Self::Enum(m) => m.target(),
            Self::EnumToString(m) => m.target(),
            Self::StringToEnum(m) => m.target(),
            Self::DerivedSwitch(m) => m.target(),
            Self::User(m) => m.target(),
            Self::ExistingMemberwise(m) => m.target(),
            Self::ExistingEnumerable(m) => m.target(),
            Self::ExistingNullable(m) => m.target(),
            Self::ExistingDerivedSwitch(m) => m.target()
        }
    }

    /// Whether the mapping mutates an existing target.
    #[must_use]
    pub fn is_existing_target(&self) -> bool {
        match self {
            Self::User(m) => m.is_existing_target(),
            Self::ExistingMemberwise(_)
            | Self::ExistingEnumerable(_)
            | Self::ExistingNullable(_)
            | Self::ExistingDerivedSwitch(_) => true,
            _ => false
        }
    }

    /// Whether references to the mapping call a generated helper method
    /// instead of inlining its body.
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(
            self,
            Self::Memberwise(_)
                | Self::Enum(_)
                | Self::EnumToString(_)
                | Self::StringToEnum(_)
                | Self::DerivedSwitch(_)
                | Self::ExistingMemberwise(_)
                | Self::ExistingDerivedSwitch(_)
        )
    }

    /// Nested mappings referenced by this one.
    #[must_use]
    pub fn dependencies(&self) -> Vec<MappingId> {
        match self {
            Self::Direct(_)
            | Self::Conversion(_)
            | Self::Constructor(_)
            | Self::EnumToString(_)
            | Self::StringToEnum(_)
            | Self::User(_) => Vec::new(),
            Self::Nullable(m) => vec![m.inner()],
            Self::Boxed(m) => vec![m.inner()],
            Self::ExistingNullable(m) => vec![m.inner()],
            Self::Enumerable(m) => vec![m.element()],
            Self::Queryable(m) => vec![m.element()],
            Self::ExistingEnumerable(m) => vec![m.element()],
            Self::Dictionary(m) => vec![m.key(), m.value()],
            Self::Memberwise(m) => {
                memberwise::value_dependencies(m.assignments().iter().map(|a| &a.value)).collect()
            }
            Self::ExistingMemberwise(m) => {
                memberwise::value_dependencies(m.assignments().iter().map(|a| &a.value)).collect()
            }
            Self::Enum(m) => m.dependencies().collect(),
            Self::DerivedSwitch(m) => m.arms().iter().map(|arm| arm.mapping).collect(),
            Self::ExistingDerivedSwitch(m) => m.arms().iter().map(|arm| arm.mapping).collect()
        }
    }

    /// Value expression of a new instance mapping.
    ///
    /// # Panics
    ///
    /// Panics for existing target mappings.
    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        match self {
            Self::Direct(m) => m.build(ctx),
            Self::Conversion(m) => m.build(ctx),
            Self::Constructor(m) => m.build(ctx),
            Self::Nullable(m) => m.build(em, ctx),
            Self::Boxed(m) => m.build(em, ctx),
            Self::Enumerable(m) => m.build(em, ctx),
            Self::Queryable(m) => m.build(em, ctx),
            Self::Dictionary(m) => m.build(em, ctx),
            Self::Memberwise(m) => m.build(em, ctx),
            Self::Enum(m) => m.build(em, ctx),
            Self::EnumToString(m) => m.build(em, ctx),
            Self::StringToEnum(m) => m.build(em, ctx),
            Self::DerivedSwitch(m) => m.build(em, ctx),
            Self::User(m) if !m.is_existing_target() => m.build(ctx),
            other => panic!("existing target mapping {other:?} used as a value")
        }
    }

    /// Statements of an existing target mapping; `target` is a place of
    /// the target type.
    ///
    /// # Panics
    ///
    /// Panics for new instance mappings.
    pub fn build_existing(
        &self,
        em: &mut Emitter<'_>,
        ctx: BuildContext,
        target: Expr
    ) -> Vec<Stmt> {
        match self {
            Self::ExistingMemberwise(m) => m.build(em, ctx, target),
            Self::ExistingEnumerable(m) => m.build(em, ctx, target),
            Self::ExistingNullable(m) => m.build(em, ctx, target),
            Self::ExistingDerivedSwitch(m) => m.build(em, ctx, target),
            Self::User(m) if m.is_existing_target() => m.build_existing(ctx, target),
            other => panic!("new instance mapping {other:?} used on an existing target")
        }
    }
}
