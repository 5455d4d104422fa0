// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapper-wide options given as `#[mapper(...)]` arguments.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro2::TokenStream;
use syn::{Lit, Meta};

use crate::mapper::config::MappingConversionType;

/// How enum variants are matched.
///
/// | Strategy | Attribute value | Matches on |
/// |----------|-----------------|------------|
/// | `ByName` | `"by_name"` | variant identifier |
/// | `ByValue` | `"by_value"` | discriminant of fieldless enums |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumStrategy {
    #[default]
    ByName,

    ByValue
}

impl FromMeta for EnumStrategy {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value.to_lowercase().as_str() {
            "by_name" | "name" => Ok(Self::ByName),
            "by_value" | "value" => Ok(Self::ByValue),
            _ => Err(darling::Error::unknown_value(value))
        }
    }
}

/// Rust edition of the consuming crate.
///
/// Only used to decide which syntax generated code may rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Edition {
    E2015,
    E2018,
    E2021,
    #[default]
    E2024
}

impl Edition {
    #[must_use]
    pub fn supports_let_chains(self) -> bool {
        self >= Self::E2024
    }
}

impl FromMeta for Edition {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "2015" => Ok(Self::E2015),
            "2018" => Ok(Self::E2018),
            "2021" => Ok(Self::E2021),
            "2024" => Ok(Self::E2024),
            _ => Err(darling::Error::unknown_value(value))
        }
    }

    fn from_value(value: &Lit) -> darling::Result<Self> {
        match value {
            Lit::Str(text) => Self::from_string(&text.value()),
            Lit::Int(int) => Self::from_string(int.base10_digits()),
            _ => Err(darling::Error::unexpected_lit_type(value))
        }
    }
}

/// `disabled_conversions(explicit_cast, to_string)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionList(pub MappingConversionType);

impl Default for ConversionList {
    fn default() -> Self {
        Self(MappingConversionType::empty())
    }
}

impl FromMeta for ConversionList {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let mut flags = MappingConversionType::empty();
        for item in items {
            let NestedMeta::Meta(Meta::Path(path)) = item else {
                errors.push(darling::Error::unsupported_format("literal").with_span(item));
                continue;
            };
            let name = path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();
            match MappingConversionType::from_conversion_name(&name) {
                Some(flag) => flags |= flag,
                None => errors.push(darling::Error::unknown_value(&name).with_span(path))
            }
        }
        errors.finish_with(Self(flags))
    }
}

/// Arguments of the `#[mapper(...)]` attribute.
#[derive(Debug, Clone, FromMeta)]
#[darling(default)]
pub struct MapperArgs {
    pub enum_strategy: EnumStrategy,

    /// Compare variant names case-insensitively.
    pub enum_ignore_case: bool,

    /// Clone values of the mapper's own types member by member instead of
    /// calling `Clone::clone`.
    pub use_deep_cloning: bool,

    /// Panic when a `None` has to become a non-optional value.
    pub throw_on_mapping_null_mismatch: bool,

    /// Panic instead of defaulting when an optional source member feeds a
    /// non-optional target member.
    pub throw_on_property_mapping_null_mismatch: bool,

    pub edition: Edition,

    pub disabled_conversions: ConversionList
}

impl Default for MapperArgs {
    fn default() -> Self {
        Self {
            enum_strategy: EnumStrategy::default(),
            enum_ignore_case: false,
            use_deep_cloning: false,
            throw_on_mapping_null_mismatch: true,
            throw_on_property_mapping_null_mismatch: false,
            edition: Edition::default(),
            disabled_conversions: ConversionList::default()
        }
    }
}

impl MapperArgs {
    /// Parse the raw attribute arguments.
    ///
    /// # Errors
    ///
    /// Returns darling errors for unknown keys or malformed values.
    pub fn parse(tokens: TokenStream) -> darling::Result<Self> {
        let items = NestedMeta::parse_meta_list(tokens)?;
        Self::from_list(&items)
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    #[test]
    fn empty_arguments_use_defaults() {
        let args = MapperArgs::parse(quote! {}).unwrap();
        assert_eq!(args.enum_strategy, EnumStrategy::ByName);
        assert!(args.throw_on_mapping_null_mismatch);
        assert!(!args.use_deep_cloning);
        assert_eq!(args.edition, Edition::E2024);
    }

    #[test]
    fn parses_all_options() {
        let args = MapperArgs::parse(quote! {
            enum_strategy = "by_value",
            enum_ignore_case,
            use_deep_cloning,
            throw_on_mapping_null_mismatch = false,
            edition = "2021",
            disabled_conversions(explicit_cast, to_string)
        })
        .unwrap();
        assert_eq!(args.enum_strategy, EnumStrategy::ByValue);
        assert!(args.enum_ignore_case);
        assert!(args.use_deep_cloning);
        assert!(!args.throw_on_mapping_null_mismatch);
        assert!(!args.edition.supports_let_chains());
        assert_eq!(
            args.disabled_conversions.0,
            MappingConversionType::EXPLICIT_CAST | MappingConversionType::TO_STRING
        );
    }

    #[test]
    fn edition_accepts_integer_literal() {
        let args = MapperArgs::parse(quote! { edition = 2018 }).unwrap();
        assert_eq!(args.edition, Edition::E2018);
    }

    #[test]
    fn unknown_conversion_is_rejected() {
        assert!(MapperArgs::parse(quote! { disabled_conversions(teleport) }).is_err());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(MapperArgs::parse(quote! { enum_strategy = "by_vibes" }).is_err());
    }
}
