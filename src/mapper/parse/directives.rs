// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapping attributes placed on individual methods.
//!
//! | Attribute | Arguments | Effect |
//! |-----------|-----------|--------|
//! | `map_property` | `source = "a.b", target = "c"` | explicit member pair |
//! | `map_ignore_source` | `"name", ...` | source member is not mapped |
//! | `map_ignore_target` | `"name", ...` | target member gets `Default::default()` |
//! | `map_value` | `target = "x", value = <expr>` or `use_method = "f"` | constant or provided value |
//! | `map_derived_types` | `discriminator = "kind", allow_duplicates` | switch options |
//! | `map_derived_type` | `source = A, target = B` or `target = B, value = <expr>` | one switch arm |
//! | `map_enum` | `strategy = "by_value", ignore_case, fallback = E::X` | enum options |
//! | `map_enum_value` | `source = A::X, target = B::Y` | explicit variant pair |

use darling::FromMeta;
use proc_macro2::Span;
use quote::ToTokens;
use syn::{Attribute, Expr, Lit, LitStr, Token, punctuated::Punctuated, spanned::Spanned};

use super::mapper_args::EnumStrategy;

/// Names of every attribute consumed from mapping methods.
pub const MAPPING_ATTRIBUTES: &[&str] = &[
    "map_property",
    "map_ignore_source",
    "map_ignore_target",
    "map_value",
    "map_derived_types",
    "map_derived_type",
    "map_enum",
    "map_enum_value"
];

/// Parsed value together with the span of its attribute.
#[derive(Debug, Clone)]
pub struct WithSpan<T> {
    pub value: T,
    pub span:  Span
}

/// Any expression, including string literals.
#[derive(Debug, Clone)]
pub struct ValueExpr(pub Expr);

impl FromMeta for ValueExpr {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        Ok(Self(expr.clone()))
    }
}

/// A type given either as a path or as a string.
#[derive(Debug, Clone)]
pub struct TypeArg(pub syn::Type);

impl FromMeta for TypeArg {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Lit(lit) => match &lit.lit {
                Lit::Str(text) => text.parse().map(Self).map_err(darling::Error::from),
                other => Err(darling::Error::unexpected_lit_type(other))
            },
            other => syn::parse2(other.to_token_stream())
                .map(Self)
                .map_err(darling::Error::from)
        }
    }
}

#[derive(Debug, Clone, FromMeta)]
pub struct MapPropertyArgs {
    pub source: String,
    pub target: String
}

/// Where a `map_value` gets its value from.
#[derive(Debug, Clone)]
pub enum MemberValueArg {
    Constant(Expr),
    Method(String)
}

#[derive(Debug, Clone)]
pub struct MapValueArgs {
    pub target: String,
    pub value:  MemberValueArg
}

#[derive(FromMeta)]
struct RawMapValueArgs {
    target:     String,
    value:      Option<ValueExpr>,
    use_method: Option<String>
}

impl FromMeta for MapValueArgs {
    fn from_list(items: &[darling::ast::NestedMeta]) -> darling::Result<Self> {
        let raw = RawMapValueArgs::from_list(items)?;
        let value = match (raw.value, raw.use_method) {
            (Some(value), None) => MemberValueArg::Constant(value.0),
            (None, Some(method)) => MemberValueArg::Method(method),
            (Some(_), Some(_)) => {
                return Err(darling::Error::custom(
                    "`value` and `use_method` are mutually exclusive"
                ));
            }
            (None, None) => return Err(darling::Error::missing_field("value"))
        };
        Ok(Self {
            target: raw.target,
            value
        })
    }
}

#[derive(Debug, Clone, Default, FromMeta)]
#[darling(default)]
pub struct MapDerivedTypesArgs {
    /// Member path whose value selects the derived type.
    pub discriminator:    Option<String>,
    pub allow_duplicates: bool
}

#[derive(Debug, Clone, FromMeta)]
pub struct MapDerivedTypeArgs {
    pub source: Option<TypeArg>,
    pub target: TypeArg,
    /// Discriminator value selecting this entry.
    pub value:  Option<ValueExpr>,
    /// Discriminator member overriding the mapping-wide one.
    pub member: Option<String>
}

#[derive(Debug, Clone, Default, FromMeta)]
pub struct MapEnumArgs {
    pub strategy:    Option<EnumStrategy>,
    pub ignore_case: Option<bool>,
    pub fallback:    Option<ValueExpr>
}

#[derive(Debug, Clone)]
pub struct MapEnumValueArgs {
    pub source: syn::Path,
    pub target: syn::Path
}

#[derive(FromMeta)]
struct RawMapEnumValueArgs {
    source: ValueExpr,
    target: ValueExpr
}

fn expect_path(expr: &Expr) -> darling::Result<syn::Path> {
    match expr {
        Expr::Path(path) => Ok(path.path.clone()),
        other => Err(darling::Error::custom("expected an enum variant path").with_span(other))
    }
}

impl FromMeta for MapEnumValueArgs {
    fn from_list(items: &[darling::ast::NestedMeta]) -> darling::Result<Self> {
        let raw = RawMapEnumValueArgs::from_list(items)?;
        Ok(Self {
            source: expect_path(&raw.source.0)?,
            target: expect_path(&raw.target.0)?
        })
    }
}

/// All mapping attributes of one method.
#[derive(Debug, Clone, Default)]
pub struct MethodDirectives {
    pub properties:     Vec<WithSpan<MapPropertyArgs>>,
    pub ignore_sources: Vec<LitStr>,
    pub ignore_targets: Vec<LitStr>,
    pub values:         Vec<WithSpan<MapValueArgs>>,
    pub derived_types:  Option<WithSpan<MapDerivedTypesArgs>>,
    pub derived:        Vec<WithSpan<MapDerivedTypeArgs>>,
    pub enum_args:      Option<MapEnumArgs>,
    pub enum_values:    Vec<WithSpan<MapEnumValueArgs>>
}

impl MethodDirectives {
    /// Split `attrs` into mapping directives and the attributes to keep.
    ///
    /// # Errors
    ///
    /// Returns every malformed mapping attribute at once.
    pub fn parse(attrs: &[Attribute]) -> darling::Result<(Self, Vec<Attribute>)> {
        let mut directives = Self::default();
        let mut kept = Vec::new();
        let mut errors = darling::Error::accumulator();

        for attr in attrs {
            let Some(name) = attr.path().get_ident().map(ToString::to_string) else {
                kept.push(attr.clone());
                continue;
            };
            if !MAPPING_ATTRIBUTES.contains(&name.as_str()) {
                kept.push(attr.clone());
                continue;
            }
            let span = attr.span();
            let meta = &attr.meta;
            match name.as_str() {
                "map_property" => {
                    if let Some(value) = errors.handle(MapPropertyArgs::from_meta(meta)) {
                        directives.properties.push(WithSpan {
                            value,
                            span
                        });
                    }
                }
                "map_ignore_source" => {
                    if let Some(names) = errors.handle(string_list(attr)) {
                        directives.ignore_sources.extend(names);
                    }
                }
                "map_ignore_target" => {
                    if let Some(names) = errors.handle(string_list(attr)) {
                        directives.ignore_targets.extend(names);
                    }
                }
                "map_value" => {
                    if let Some(value) = errors.handle(
                        MapValueArgs::from_meta(meta).map_err(|e| e.with_span(attr))
                    ) {
                        directives.values.push(WithSpan {
                            value,
                            span
                        });
                    }
                }
                "map_derived_types" => {
                    let parsed = match meta {
                        syn::Meta::Path(_) => Ok(MapDerivedTypesArgs::default()),
                        _ => MapDerivedTypesArgs::from_meta(meta)
                    };
                    if let Some(value) = errors.handle(parsed) {
                        directives.derived_types = Some(WithSpan {
                            value,
                            span
                        });
                    }
                }
                "map_derived_type" => {
                    if let Some(value) = errors.handle(MapDerivedTypeArgs::from_meta(meta)) {
                        directives.derived.push(WithSpan {
                            value,
                            span
                        });
                    }
                }
                "map_enum" => {
                    if let Some(value) = errors.handle(MapEnumArgs::from_meta(meta)) {
                        directives.enum_args = Some(value);
                    }
                }
                "map_enum_value" => {
                    if let Some(value) = errors.handle(MapEnumValueArgs::from_meta(meta)) {
                        directives.enum_values.push(WithSpan {
                            value,
                            span
                        });
                    }
                }
                _ => kept.push(attr.clone())
            }
        }
        errors.finish_with((directives, kept))
    }

    /// Whether the method carries any mapping attribute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.ignore_sources.is_empty()
            && self.ignore_targets.is_empty()
            && self.values.is_empty()
            && self.derived_types.is_none()
            && self.derived.is_empty()
            && self.enum_args.is_none()
            && self.enum_values.is_empty()
    }
}

fn string_list(attr: &Attribute) -> darling::Result<Vec<LitStr>> {
    attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)
        .map(|names| names.into_iter().collect())
        .map_err(darling::Error::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::ToTokens;
    use syn::parse_quote;

    use super::*;

    fn parse(method: syn::ImplItemFn) -> darling::Result<(MethodDirectives, Vec<Attribute>)> {
        MethodDirectives::parse(&method.attrs)
    }

    #[test]
    fn keeps_foreign_attributes() {
        let (directives, kept) = parse(parse_quote! {
            #[inline]
            #[map_ignore_source("a", "b")]
            #[doc = "maps things"]
            fn f(a: A) -> B {}
        })
        .unwrap();
        assert_eq!(kept.len(), 2);
        let ignored: Vec<_> = directives.ignore_sources.iter().map(LitStr::value).collect();
        assert_eq!(ignored, vec!["a", "b"]);
    }

    #[test]
    fn map_value_accepts_constant_or_method() {
        let (directives, _) = parse(parse_quote! {
            #[map_value(target = "label", value = "fixed")]
            #[map_value(target = "count", use_method = "next_count")]
            fn f(a: A) -> B {}
        })
        .unwrap();
        assert!(matches!(
            &directives.values[0].value.value,
            MemberValueArg::Constant(Expr::Lit(_))
        ));
        assert!(matches!(
            &directives.values[1].value.value,
            MemberValueArg::Method(name) if name == "next_count"
        ));
    }

    #[test]
    fn map_value_requires_exactly_one_source() {
        assert!(
            parse(parse_quote! {
                #[map_value(target = "x")]
                fn f(a: A) -> B {}
            })
            .is_err()
        );
        assert!(
            parse(parse_quote! {
                #[map_value(target = "x", value = 1, use_method = "f")]
                fn f(a: A) -> B {}
            })
            .is_err()
        );
    }

    #[test]
    fn derived_type_accepts_paths_and_strings() {
        let (directives, _) = parse(parse_quote! {
            #[map_derived_types(discriminator = "kind")]
            #[map_derived_type(source = Circle, target = "CircleDto")]
            #[map_derived_type(target = SquareDto, value = Kind::Square)]
            fn f(a: A) -> B {}
        })
        .unwrap();
        let header = directives.derived_types.unwrap();
        assert_eq!(header.value.discriminator.as_deref(), Some("kind"));
        assert_eq!(directives.derived.len(), 2);
        let first = &directives.derived[0].value;
        assert_eq!(first.target.0.to_token_stream().to_string(), "CircleDto");
        assert!(directives.derived[1].value.source.is_none());
    }

    #[test]
    fn enum_value_requires_paths() {
        let (directives, _) = parse(parse_quote! {
            #[map_enum(strategy = "by_value", fallback = Shade::Unknown)]
            #[map_enum_value(source = Color::Red, target = Shade::Crimson)]
            fn f(a: A) -> B {}
        })
        .unwrap();
        let args = directives.enum_args.unwrap();
        assert_eq!(args.strategy, Some(EnumStrategy::ByValue));
        assert!(args.fallback.is_some());
        assert_eq!(
            directives.enum_values[0].value.target.to_token_stream().to_string(),
            "Shade :: Crimson"
        );
        assert!(
            parse(parse_quote! {
                #[map_enum_value(source = "Red", target = Shade::Crimson)]
                fn f(a: A) -> B {}
            })
            .is_err()
        );
    }

    #[test]
    fn bare_derived_types_marker_uses_defaults() {
        let (directives, _) = parse(parse_quote! {
            #[map_derived_types]
            fn f(a: A) -> B {}
        })
        .unwrap();
        assert!(!directives.derived_types.as_ref().unwrap().value.allow_duplicates);
        assert!(!directives.is_empty());
    }
}
