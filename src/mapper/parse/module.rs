// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The annotated module.

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::{Attribute, Generics, ImplItem, Item, ItemImpl, ItemMod, Type, spanned::Spanned};

use super::method::MethodDef;

/// A `#[mappings]` impl block.
#[derive(Debug, Clone)]
pub struct MapperDef {
    /// Attributes of the impl block without `#[mappings]`.
    pub attrs:       Vec<Attribute>,
    pub generics:    Generics,
    pub self_ty:     Box<Type>,
    pub methods:     Vec<MethodDef>,
    /// Non-method items, re-emitted unchanged.
    pub passthrough: Vec<ImplItem>,
    pub span:        Span
}

impl MapperDef {
    fn from_item_impl(item: ItemImpl) -> darling::Result<Self> {
        if let Some((_, path, _)) = &item.trait_ {
            return Err(
                darling::Error::custom("`#[mappings]` must be placed on an inherent impl block")
                    .with_span(path)
            );
        }
        let span = item.self_ty.span();
        let mut errors = darling::Error::accumulator();
        let mut methods = Vec::new();
        let mut passthrough = Vec::new();
        for impl_item in item.items {
            match errors.handle(MethodDef::from_impl_item(&impl_item)) {
                Some(Some(method)) => methods.push(method),
                Some(None) => passthrough.push(impl_item),
                None => {}
            }
        }
        errors.finish_with(Self {
            attrs: item
                .attrs
                .into_iter()
                .filter(|attr| !is_mappings_attr(attr))
                .collect(),
            generics: item.generics,
            self_ty: item.self_ty,
            methods,
            passthrough,
            span
        })
    }

    /// Wrap generated items in an impl block for the mapper type.
    #[must_use]
    pub fn render(&self, items: &[TokenStream]) -> TokenStream {
        let attrs = &self.attrs;
        let self_ty = &self.self_ty;
        let passthrough = &self.passthrough;
        let (impl_generics, _, where_clause) = self.generics.split_for_impl();
        quote! {
            #(#attrs)*
            impl #impl_generics #self_ty #where_clause {
                #(#passthrough)*
                #(#items)*
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ModuleItem {
    Plain(Item),
    Mapper(MapperDef)
}

/// The module carrying `#[mapper]`.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    pub attrs: Vec<Attribute>,
    pub vis:   syn::Visibility,
    pub ident: syn::Ident,
    pub items: Vec<ModuleItem>
}

impl ModuleDef {
    /// # Errors
    ///
    /// Fails for `mod name;` declarations and malformed mapping impls.
    pub fn from_item_mod(item: ItemMod) -> darling::Result<Self> {
        let Some((_, content)) = item.content else {
            return Err(darling::Error::custom(
                "`#[mapper]` needs an inline module with a body"
            )
            .with_span(&item.ident));
        };
        let mut errors = darling::Error::accumulator();
        let mut items = Vec::with_capacity(content.len());
        for content_item in content {
            match content_item {
                Item::Impl(impl_item) if impl_item.attrs.iter().any(is_mappings_attr) => {
                    if let Some(mapper) = errors.handle(MapperDef::from_item_impl(impl_item)) {
                        items.push(ModuleItem::Mapper(mapper));
                    }
                }
                other => items.push(ModuleItem::Plain(other))
            }
        }
        errors.finish_with(Self {
            attrs: item.attrs,
            vis: item.vis,
            ident: item.ident,
            items
        })
    }

    /// Items outside of `#[mappings]` blocks.
    #[must_use]
    pub fn plain_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ModuleItem::Plain(item) => Some(item.clone()),
                ModuleItem::Mapper(_) => None
            })
            .collect()
    }

    pub fn mappers(&self) -> impl Iterator<Item = &MapperDef> {
        self.items.iter().filter_map(|item| match item {
            ModuleItem::Mapper(mapper) => Some(mapper),
            ModuleItem::Plain(_) => None
        })
    }

    /// Re-assemble the module, replacing each mapper with its generated impl.
    ///
    /// `generated` holds one token stream per mapper, in declaration order.
    #[must_use]
    pub fn render(&self, generated: Vec<TokenStream>) -> TokenStream {
        let mut generated = generated.into_iter();
        let items: Vec<TokenStream> = self
            .items
            .iter()
            .map(|item| match item {
                ModuleItem::Plain(item) => item.to_token_stream(),
                ModuleItem::Mapper(_) => generated.next().unwrap_or_default()
            })
            .collect();
        let attrs = &self.attrs;
        let vis = &self.vis;
        let ident = &self.ident;
        quote! {
            #(#attrs)*
            #vis mod #ident {
                #(#items)*
            }
        }
    }
}

fn is_mappings_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("mappings")
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn module(tokens: TokenStream) -> darling::Result<ModuleDef> {
        ModuleDef::from_item_mod(syn::parse2(tokens).unwrap())
    }

    #[test]
    fn separates_mappers_from_plain_items() {
        let def = module(quote! {
            mod mapping {
                pub struct Car { pub name: String }
                pub struct CarDto { pub name: String }
                pub struct CarMapper;

                #[mappings]
                impl CarMapper {
                    pub fn to_dto(car: Car) -> CarDto;
                }
            }
        })
        .unwrap();
        assert_eq!(def.plain_items().len(), 3);
        let mappers: Vec<_> = def.mappers().collect();
        assert_eq!(mappers.len(), 1);
        assert_eq!(mappers[0].methods.len(), 1);
        assert!(mappers[0].attrs.is_empty());
    }

    #[test]
    fn rejects_out_of_line_modules() {
        assert!(module(quote! { mod mapping; }).is_err());
    }

    #[test]
    fn rejects_trait_impls() {
        let result = module(quote! {
            mod mapping {
                struct M;
                #[mappings]
                impl Clone for M { fn clone(&self) -> Self { M } }
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn render_replaces_mapper_in_place() {
        let def = module(quote! {
            pub mod mapping {
                pub struct A;
                #[mappings]
                impl M {}
                pub struct B;
            }
        })
        .unwrap();
        let rendered = def.render(vec![quote! { impl M { fn generated() {} } }]);
        let expected = quote! {
            pub mod mapping {
                pub struct A;
                impl M { fn generated() {} }
                pub struct B;
            }
        };
        assert_eq!(rendered.to_string(), expected.to_string());
    }
}
