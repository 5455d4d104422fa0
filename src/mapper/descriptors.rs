// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapping resolution for one mapper.
//!
//! A [`DescriptorBuilder`] turns the methods of a `#[mappings]` impl into a
//! [`MapperDescriptor`]: every declared method gets a body mapping, every
//! implemented method becomes reusable for nested conversions, and every
//! problem ends up in the descriptor's diagnostics.
//!
//! # Resolution
//!
//! ```text
//! request (source, target, protocol, scope, options)
//!   │
//!   ├─ cache hit ────────────────► id (deferred if still building)
//!   │
//!   └─ reserve slot
//!        └─ builder chain, first applicable wins
//!             ├─ Mapping ─────────► complete slot
//!             ├─ Delegate(other) ─► alias slot
//!             ├─ Failed ──────────► failed slot, diagnostics reported
//!             └─ none applies ────► failed slot, caller reports
//! ```
//!
//! Nested requests inherit the requesting method's configuration only when
//! asked to ([`MappingBuildingOptions::KEEP_USER_SYMBOL`]); otherwise they
//! resolve against the mapper defaults, which makes them shareable between
//! methods.

mod builders;
mod context;
#[cfg(test)]
pub(crate) mod fixture;
mod registry;

pub use context::{
    DescriptorBuilder, MapperDescriptor, MappingBuilderContext, MappingRequest, UserMethod,
    ValueProvider, describe
};
pub use registry::{
    BuildFailure, MappingBuildingOptions, MappingId, MappingRegistry, TypeMappingKey
};
