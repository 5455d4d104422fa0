// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved mapping configuration.
//!
//! Attribute arguments are parsed by [`super::parse`]; this module turns
//! them into the immutable [`MappingConfiguration`] consulted by builders.
//! There is one mapper-wide default plus one configuration per declared
//! method, which inherits the defaults and adds the method's own
//! attributes. [`ConfigScope`] selects between them and is part of every
//! mapping cache key, so a per-method member rename never leaks into a
//! mapping reused elsewhere.

use bitflags::bitflags;
use proc_macro2::Span;

use super::{
    parse::{EnumStrategy, MapperArgs, MemberValueArg, MethodDirectives},
    symbols::{TypeId, TypeModel}
};

bitflags! {
    /// Conversion strategies that may be used for implicit mappings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MappingConversionType: u16 {
        const CONSTRUCTOR = 1 << 0;
        const IMPLICIT_CAST = 1 << 1;
        const EXPLICIT_CAST = 1 << 2;
        const TO_STRING = 1 << 3;
        const ENUM_TO_ENUM = 1 << 4;
        const ENUM_TO_STRING = 1 << 5;
        const STRING_TO_ENUM = 1 << 6;
        const ENUMERABLE = 1 << 7;
        const DICTIONARY = 1 << 8;
        const QUERYABLE = 1 << 9;
        const ALL = Self::CONSTRUCTOR.bits()
            | Self::IMPLICIT_CAST.bits()
            | Self::EXPLICIT_CAST.bits()
            | Self::TO_STRING.bits()
            | Self::ENUM_TO_ENUM.bits()
            | Self::ENUM_TO_STRING.bits()
            | Self::STRING_TO_ENUM.bits()
            | Self::ENUMERABLE.bits()
            | Self::DICTIONARY.bits()
            | Self::QUERYABLE.bits();
    }
}

impl MappingConversionType {
    /// Flag named by an attribute argument such as `explicit_cast`.
    #[must_use]
    pub fn from_conversion_name(name: &str) -> Option<Self> {
        let flag = match name {
            "constructor" => Self::CONSTRUCTOR,
            "implicit_cast" => Self::IMPLICIT_CAST,
            "explicit_cast" => Self::EXPLICIT_CAST,
            "to_string" => Self::TO_STRING,
            "enum_to_enum" => Self::ENUM_TO_ENUM,
            "enum_to_string" => Self::ENUM_TO_STRING,
            "string_to_enum" => Self::STRING_TO_ENUM,
            "enumerable" => Self::ENUMERABLE,
            "dictionary" => Self::DICTIONARY,
            "queryable" => Self::QUERYABLE,
            _ => return None
        };
        Some(flag)
    }
}

/// Which configuration a mapping request resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigScope {
    Default,
    /// Index of the declared method in the mapper.
    Method(usize)
}

/// Explicit `source -> target` variant pair.
#[derive(Debug, Clone)]
pub struct EnumValueMapping {
    pub source: syn::Path,
    pub target: syn::Path,
    pub span:   Span
}

#[derive(Debug, Clone, Default)]
pub struct EnumMappingConfiguration {
    pub strategy:    EnumStrategy,
    pub ignore_case: bool,
    pub fallback:    Option<syn::Expr>,
    pub explicit:    Vec<EnumValueMapping>
}

#[derive(Debug, Clone)]
pub struct MemberMappingConfiguration {
    pub source: Vec<String>,
    pub target: Vec<String>,
    pub span:   Span
}

#[derive(Debug, Clone)]
pub enum MemberValue {
    Constant(syn::Expr),
    /// Name of a value provider method.
    Method(String)
}

#[derive(Debug, Clone)]
pub struct MemberValueMappingConfiguration {
    pub target: Vec<String>,
    pub value:  MemberValue,
    pub span:   Span
}

#[derive(Debug, Clone, Default)]
pub struct MembersMappingConfiguration {
    pub ignored_sources: Vec<String>,
    pub ignored_targets: Vec<String>,
    pub explicit:        Vec<MemberMappingConfiguration>,
    pub values:          Vec<MemberValueMappingConfiguration>
}

impl MembersMappingConfiguration {
    #[must_use]
    pub fn is_source_ignored(&self, name: &str) -> bool {
        self.ignored_sources.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_target_ignored(&self, name: &str) -> bool {
        self.ignored_targets.iter().any(|n| n == name)
    }

    /// Whether any member is configured explicitly.
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        !self.ignored_sources.is_empty()
            || !self.ignored_targets.is_empty()
            || !self.explicit.is_empty()
            || !self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DerivedTypeMappingConfiguration {
    pub source:              Option<TypeId>,
    pub target:              TypeId,
    pub discriminator_value: Option<syn::Expr>,
    /// Member path overriding the mapping-wide discriminator.
    pub member:              Option<Vec<String>>,
    pub span:                Span
}

#[derive(Debug, Clone)]
pub struct DerivedTypesMappingConfiguration {
    pub discriminator:    Option<Vec<String>>,
    pub allow_duplicates: bool,
    pub mappings:         Vec<DerivedTypeMappingConfiguration>,
    pub span:             Span
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SupportedFeatures {
    /// `if let a = x && let b = y` is available.
    pub let_chains: bool
}

#[derive(Debug, Clone)]
pub struct MappingConfiguration {
    pub conversions: MappingConversionType,
    pub enums: EnumMappingConfiguration,
    pub members: MembersMappingConfiguration,
    pub derived_types: Option<DerivedTypesMappingConfiguration>,
    pub use_deep_cloning: bool,
    pub throw_on_mapping_null_mismatch: bool,
    pub throw_on_property_mapping_null_mismatch: bool,
    pub supported_features: SupportedFeatures
}

impl MappingConfiguration {
    /// Mapper-wide defaults.
    #[must_use]
    pub fn from_mapper(args: &MapperArgs) -> Self {
        Self {
            conversions: MappingConversionType::ALL.difference(args.disabled_conversions.0),
            enums: EnumMappingConfiguration {
                strategy: args.enum_strategy,
                ignore_case: args.enum_ignore_case,
                ..EnumMappingConfiguration::default()
            },
            members: MembersMappingConfiguration::default(),
            derived_types: None,
            use_deep_cloning: args.use_deep_cloning,
            throw_on_mapping_null_mismatch: args.throw_on_mapping_null_mismatch,
            throw_on_property_mapping_null_mismatch: args.throw_on_property_mapping_null_mismatch,
            supported_features: SupportedFeatures {
                let_chains: args.edition.supports_let_chains()
            }
        }
    }

    /// Configuration of one declared method on top of `defaults`.
    #[must_use]
    pub fn for_method(
        defaults: &Self,
        directives: &MethodDirectives,
        model: &mut TypeModel
    ) -> Self {
        let mut config = defaults.clone();
        if let Some(args) = &directives.enum_args {
            if let Some(strategy) = args.strategy {
                config.enums.strategy = strategy;
            }
            if let Some(ignore_case) = args.ignore_case {
                config.enums.ignore_case = ignore_case;
            }
            config.enums.fallback = args.fallback.as_ref().map(|f| f.0.clone());
        }
        config.enums.explicit = directives
            .enum_values
            .iter()
            .map(|entry| EnumValueMapping {
                source: entry.value.source.clone(),
                target: entry.value.target.clone(),
                span:   entry.span
            })
            .collect();

        let members = &mut config.members;
        members.ignored_sources = directives.ignore_sources.iter().map(|s| s.value()).collect();
        members.ignored_targets = directives.ignore_targets.iter().map(|s| s.value()).collect();
        members.explicit = directives
            .properties
            .iter()
            .map(|entry| MemberMappingConfiguration {
                source: split_path(&entry.value.source),
                target: split_path(&entry.value.target),
                span:   entry.span
            })
            .collect();
        members.values = directives
            .values
            .iter()
            .map(|entry| MemberValueMappingConfiguration {
                target: split_path(&entry.value.target),
                value:  match &entry.value.value {
                    MemberValueArg::Constant(expr) => MemberValue::Constant(expr.clone()),
                    MemberValueArg::Method(name) => MemberValue::Method(name.clone())
                },
                span:   entry.span
            })
            .collect();

        let derived: Vec<_> = directives
            .derived
            .iter()
            .map(|entry| DerivedTypeMappingConfiguration {
                source:              entry
                    .value
                    .source
                    .as_ref()
                    .map(|ty| model.resolve_type(&ty.0, None)),
                target:              model.resolve_type(&entry.value.target.0, None),
                discriminator_value: entry.value.value.as_ref().map(|v| v.0.clone()),
                member:              entry.value.member.as_deref().map(split_path),
                span:                entry.span
            })
            .collect();
        config.derived_types = match &directives.derived_types {
            Some(header) => Some(DerivedTypesMappingConfiguration {
                discriminator:    header.value.discriminator.as_deref().map(split_path),
                allow_duplicates: header.value.allow_duplicates,
                mappings:         derived,
                span:             header.span
            }),
            None if !derived.is_empty() => Some(DerivedTypesMappingConfiguration {
                discriminator:    None,
                allow_duplicates: false,
                span:             derived[0].span,
                mappings:         derived
            }),
            None => None
        };
        config
    }

    #[must_use]
    pub fn is_conversion_enabled(&self, conversion: MappingConversionType) -> bool {
        self.conversions.contains(conversion)
    }
}

/// `"engine.power"` into `["engine", "power"]`.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Default configuration plus one configuration per declared method.
#[derive(Debug, Clone)]
pub struct MapperConfigs {
    default: MappingConfiguration,
    methods: Vec<MappingConfiguration>
}

impl MapperConfigs {
    #[must_use]
    pub fn new(default: MappingConfiguration, methods: Vec<MappingConfiguration>) -> Self {
        Self {
            default,
            methods
        }
    }

    /// # Panics
    ///
    /// Panics when `scope` names a method that was never configured.
    #[must_use]
    pub fn get(&self, scope: ConfigScope) -> &MappingConfiguration {
        match scope {
            ConfigScope::Default => &self.default,
            ConfigScope::Method(index) => &self.methods[index]
        }
    }

    #[must_use]
    pub fn default_config(&self) -> &MappingConfiguration {
        &self.default
    }
}
