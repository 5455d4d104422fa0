// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared helpers for code generation.
//!
//! - [`names`] allocates collision-free identifiers inside generated bodies
//! - [`pluralizer`] derives singular element names from collection names

pub mod names;
pub mod pluralizer;
