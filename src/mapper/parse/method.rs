// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Methods inside a `#[mappings]` impl block.
//!
//! A method without a body is a declared mapping whose body is generated. A
//! method with a body is user code: when its signature has a mapping shape
//! it is reused wherever that mapping is needed, and zero-argument methods
//! may provide values for `#[map_value(use_method = "...")]`.

use proc_macro2::Span;
use syn::{
    Attribute, Block, FnArg, ForeignItemFn, Ident, ImplItem, Pat, ReturnType, Signature, Type,
    Visibility, spanned::Spanned
};

use super::directives::MethodDirectives;

/// Which shape a mapping signature has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureShape {
    /// `fn(source: S) -> T`
    NewInstance,
    /// `fn(source: S, target: &mut T)`
    ExistingTarget
}

/// Parameter names and types of a mapping-shaped signature.
#[derive(Debug, Clone)]
pub struct MappingSignature {
    pub shape:       SignatureShape,
    pub source_name: Ident,
    pub source_ty:   Type,
    /// Return type, or the referent of the `&mut` parameter.
    pub target_ty:   Type,
    pub target_name: Option<Ident>
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Attributes other than the mapping directives.
    pub attrs:      Vec<Attribute>,
    pub vis:        Visibility,
    pub sig:        Signature,
    pub body:       Option<Block>,
    pub directives: MethodDirectives
}

impl MethodDef {
    /// Parse a method from an impl item.
    ///
    /// Returns `Ok(None)` for items that are not methods. Body-less methods
    /// reach the macro as verbatim tokens and are re-parsed here.
    ///
    /// # Errors
    ///
    /// Returns errors from malformed mapping attributes.
    pub fn from_impl_item(item: &ImplItem) -> darling::Result<Option<Self>> {
        let (attrs, vis, sig, body) = match item {
            ImplItem::Fn(function) => (
                &function.attrs,
                function.vis.clone(),
                function.sig.clone(),
                Some(function.block.clone())
            ),
            ImplItem::Verbatim(tokens) => match syn::parse2::<ForeignItemFn>(tokens.clone()) {
                Ok(function) => {
                    return Self::from_parts(&function.attrs, function.vis, function.sig, None)
                        .map(Some);
                }
                Err(_) => return Ok(None)
            },
            _ => return Ok(None)
        };
        Self::from_parts(attrs, vis, sig, body).map(Some)
    }

    fn from_parts(
        attrs: &[Attribute],
        vis: Visibility,
        sig: Signature,
        body: Option<Block>
    ) -> darling::Result<Self> {
        let (directives, attrs) = MethodDirectives::parse(attrs)?;
        Ok(Self {
            attrs,
            vis,
            sig,
            body,
            directives
        })
    }

    #[must_use]
    pub fn name(&self) -> &Ident {
        &self.sig.ident
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.sig.ident.span()
    }

    #[must_use]
    pub fn is_declared(&self) -> bool {
        self.body.is_none()
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.sig.generics.params.is_empty()
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        self.sig.asyncness.is_some()
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.sig.inputs.len()
    }

    /// Return type, `None` for `()`.
    #[must_use]
    pub fn return_type(&self) -> Option<&Type> {
        match &self.sig.output {
            ReturnType::Default => None,
            ReturnType::Type(_, ty) => match ty.as_ref() {
                Type::Tuple(tuple) if tuple.elems.is_empty() => None,
                ty => Some(ty)
            }
        }
    }

    /// Mapping shape of the signature, if it has one.
    #[must_use]
    pub fn mapping_signature(&self) -> Option<MappingSignature> {
        if self.is_generic() || self.is_async() {
            return None;
        }
        let mut inputs = self.sig.inputs.iter();
        let (source_name, source_ty) = typed_argument(inputs.next()?)?;
        match (inputs.next(), self.return_type()) {
            (None, Some(target)) => Some(MappingSignature {
                shape: SignatureShape::NewInstance,
                source_name,
                source_ty,
                target_ty: target.clone(),
                target_name: None
            }),
            (Some(argument), None) if inputs.next().is_none() => {
                let (target_name, target_ty) = typed_argument(argument)?;
                let Type::Reference(reference) = target_ty else {
                    return None;
                };
                reference.mutability?;
                Some(MappingSignature {
                    shape: SignatureShape::ExistingTarget,
                    source_name,
                    source_ty,
                    target_ty: (*reference.elem).clone(),
                    target_name: Some(target_name)
                })
            }
            _ => None
        }
    }

    /// Span of the whole signature for diagnostics.
    #[must_use]
    pub fn signature_span(&self) -> Span {
        self.sig.span()
    }
}

fn typed_argument(argument: &FnArg) -> Option<(Ident, Type)> {
    let FnArg::Typed(typed) = argument else {
        return None;
    };
    let Pat::Ident(pat) = typed.pat.as_ref() else {
        return None;
    };
    Some((pat.ident.clone(), (*typed.ty).clone()))
}

#[cfg(test)]
mod tests {
    use quote::{ToTokens, quote};
    use syn::{ItemImpl, parse_quote};

    use super::*;

    fn methods(item: ItemImpl) -> Vec<MethodDef> {
        item.items
            .iter()
            .filter_map(|i| MethodDef::from_impl_item(i).unwrap())
            .collect()
    }

    #[test]
    fn declared_methods_are_parsed_from_verbatim_tokens() {
        let item: ItemImpl = syn::parse2(quote! {
            impl CarMapper {
                #[map_ignore_target("id")]
                pub fn to_dto(car: Car) -> CarDto;
                fn helper(value: u32) -> u64 { value.into() }
                const LIMIT: u32 = 3;
            }
        })
        .unwrap();
        let methods = methods(item);
        assert_eq!(methods.len(), 2);
        assert!(methods[0].is_declared());
        assert!(!methods[1].is_declared());
        assert_eq!(methods[0].directives.ignore_targets.len(), 1);
        assert!(methods[0].attrs.is_empty());
    }

    #[test]
    fn recognizes_new_instance_signature() {
        let method: syn::ImplItemFn = parse_quote! {
            fn to_dto(car: &Car) -> CarDto {}
        };
        let def = MethodDef::from_impl_item(&ImplItem::Fn(method)).unwrap().unwrap();
        let sig = def.mapping_signature().unwrap();
        assert_eq!(sig.shape, SignatureShape::NewInstance);
        assert_eq!(sig.source_name, "car");
        assert_eq!(sig.source_ty.to_token_stream().to_string(), "& Car");
    }

    #[test]
    fn recognizes_existing_target_signature() {
        let method: syn::ImplItemFn = parse_quote! {
            fn update(car: Car, target: &mut CarDto) {}
        };
        let def = MethodDef::from_impl_item(&ImplItem::Fn(method)).unwrap().unwrap();
        let sig = def.mapping_signature().unwrap();
        assert_eq!(sig.shape, SignatureShape::ExistingTarget);
        assert_eq!(sig.target_ty.to_token_stream().to_string(), "CarDto");
        assert_eq!(sig.target_name.unwrap(), "target");
    }

    #[test]
    fn rejects_non_mapping_shapes() {
        let shapes: Vec<syn::ImplItemFn> = vec![
            parse_quote! { fn provider() -> u32 { 1 } },
            parse_quote! { fn generic<T>(value: T) -> T { value } },
            parse_quote! { fn shared(car: Car, target: &CarDto) {} },
            parse_quote! { fn method(&self, car: Car) -> CarDto {} },
            parse_quote! { async fn load(id: u32) -> Car {} }
        ];
        for method in shapes {
            let def = MethodDef::from_impl_item(&ImplItem::Fn(method)).unwrap().unwrap();
            assert!(def.mapping_signature().is_none(), "{}", def.name());
        }
    }
}
