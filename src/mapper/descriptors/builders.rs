// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Ordered strategies for turning a request into a [`Mapping`].
//!
//! Each builder inspects the request and either declines or commits. Once
//! a builder commits its outcome is final, even when it failed; later
//! builders are not consulted.
//!
//! | Order | New instance | Existing target |
//! |-------|--------------|-----------------|
//! | 1 | user method | user method |
//! | 2 | derived type switch | derived type switch |
//! | 3 | direct assignment | nullable |
//! | 4 | nullable | collection extend |
//! | 5 | box | memberwise |
//! | 6 | constructor | |
//! | 7 | conversion | |
//! | 8 | enumerable | |
//! | 9 | queryable | |
//! | 10 | dictionary | |
//! | 11 | memberwise | |
//! | 12 | enum | |

mod conversion;
mod derived;
mod direct;
mod enumerable;
mod enums;
mod memberwise;
mod nullable;
mod source_value;
mod user;

use self::{
    conversion::{ConstructorBuilder, ConversionBuilder},
    derived::DerivedTypeBuilder,
    direct::DirectBuilder,
    enumerable::{DictionaryBuilder, EnumerableBuilder, QueryableBuilder},
    enums::EnumBuilder,
    memberwise::MemberwiseBuilder,
    nullable::{BoxBuilder, NullableBuilder},
    user::UserMethodBuilder
};
use super::{
    context::MappingBuilderContext,
    registry::{BuildFailure, MappingId}
};
use crate::mapper::mappings::Mapping;

/// Outcome of one builder.
#[derive(Debug)]
pub enum Built {
    /// The builder does not apply; try the next one.
    Declined,
    Mapping(Mapping),
    /// Reuse an existing mapping.
    Delegate(MappingId),
    /// The builder applied and reported why it could not finish.
    Failed
}

impl From<BuildFailure> for Built {
    /// A nested request without strategy lets the next builder try; a
    /// reported failure is final.
    fn from(failure: BuildFailure) -> Self {
        match failure {
            BuildFailure::NoStrategy => Self::Declined,
            BuildFailure::Reported => Self::Failed
        }
    }
}

pub trait MappingBuilder {
    fn name(&self) -> &'static str;

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built;
}

pub const NEW_INSTANCE_CHAIN: &[&dyn MappingBuilder] = &[
    &UserMethodBuilder,
    &DerivedTypeBuilder,
    &DirectBuilder,
    &NullableBuilder,
    &BoxBuilder,
    &ConstructorBuilder,
    &ConversionBuilder,
    &EnumerableBuilder,
    &QueryableBuilder,
    &DictionaryBuilder,
    &MemberwiseBuilder,
    &EnumBuilder
];

pub const EXISTING_TARGET_CHAIN: &[&dyn MappingBuilder] = &[
    &UserMethodBuilder,
    &DerivedTypeBuilder,
    &NullableBuilder,
    &EnumerableBuilder,
    &MemberwiseBuilder
];
