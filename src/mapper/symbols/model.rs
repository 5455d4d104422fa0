// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Interned type arena built from the items of the annotated module.
//!
//! Construction runs in two passes: first every non-generic struct and enum
//! name is declared so that fields can refer to types declared later, then
//! fields, variants and single-argument constructors are resolved.

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use rustc_hash::FxHashMap;
use syn::{
    Expr, Fields, GenericArgument, Ident, ImplItem, Item, ItemEnum, ItemImpl, ItemStruct, Lit,
    PathArguments, ReturnType, Type, TypeParamBound, UnOp
};

use super::types::{CollectionKind, MapKind, Primitive, TypeId, TypeKind};

/// How the fields of a struct or variant are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    Named,
    Unnamed,
    Unit
}

/// A field of a struct or enum variant.
#[derive(Debug, Clone)]
pub struct Member {
    /// Field name, or the position for tuple fields.
    pub name:   String,
    pub member: syn::Member,
    pub ty:     TypeId
}

/// Derived traits the generator cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct Derives {
    pub copy:    bool,
    pub clone:   bool,
    pub default: bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorKind {
    /// `impl From<P> for T`.
    From,
    /// Associated `fn name(p: P) -> Self`.
    Function(Ident)
}

/// Single-argument way of producing a declared type.
#[derive(Debug, Clone)]
pub struct Constructor {
    pub kind:      ConstructorKind,
    pub parameter: TypeId
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub ident:        Ident,
    pub style:        FieldStyle,
    pub members:      Vec<Member>,
    pub derives:      Derives,
    pub constructors: Vec<Constructor>
}

#[derive(Debug, Clone)]
pub struct Variant {
    pub ident:        Ident,
    pub style:        FieldStyle,
    pub members:      Vec<Member>,
    /// Evaluated discriminant when every preceding one is a literal.
    pub discriminant: Option<i128>
}

impl Variant {
    /// Payload type of a single-field tuple variant.
    #[must_use]
    pub fn newtype_payload(&self) -> Option<TypeId> {
        match (self.style, self.members.as_slice()) {
            (FieldStyle::Unnamed, [member]) => Some(member.ty),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub ident:        Ident,
    pub variants:     Vec<Variant>,
    pub derives:      Derives,
    pub constructors: Vec<Constructor>
}

impl EnumDecl {
    #[must_use]
    pub fn is_unit_only(&self) -> bool {
        self.variants.iter().all(|v| v.style == FieldStyle::Unit)
    }

    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.ident == name)
    }
}

/// Arena of every type the mapper can talk about.
#[derive(Debug, Default)]
pub struct TypeModel {
    kinds:    Vec<TypeKind>,
    tokens:   Vec<TokenStream>,
    interned: FxHashMap<TypeKind, TypeId>,
    structs:  Vec<StructDecl>,
    enums:    Vec<EnumDecl>,
    declared: FxHashMap<String, TypeId>
}

impl TypeModel {
    /// Build the model from the items of a module.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed derive attributes.
    pub fn from_items(items: &[Item]) -> darling::Result<Self> {
        let mut model = Self::default();
        for item in items {
            match item {
                Item::Struct(item) if item.generics.params.is_empty() => {
                    model.declare_struct(item)?;
                }
                Item::Enum(item) if item.generics.params.is_empty() => {
                    model.declare_enum(item)?;
                }
                _ => {}
            }
        }
        for item in items {
            match item {
                Item::Struct(item) if item.generics.params.is_empty() => model.resolve_struct(item),
                Item::Enum(item) if item.generics.params.is_empty() => model.resolve_enum(item),
                Item::Impl(item) if !is_mappings_impl(item) => model.register_constructors(item),
                _ => {}
            }
        }
        Ok(model)
    }

    fn declare_struct(&mut self, item: &ItemStruct) -> darling::Result<()> {
        let derives = parse_derives(&item.attrs)?;
        let style = field_style(&item.fields);
        self.structs.push(StructDecl {
            ident: item.ident.clone(),
            style,
            members: Vec::new(),
            derives,
            constructors: Vec::new()
        });
        let kind = TypeKind::Struct(self.structs.len() - 1);
        let id = self.intern_spelled(kind, item.ident.to_token_stream());
        self.declared.insert(item.ident.to_string(), id);
        Ok(())
    }

    fn declare_enum(&mut self, item: &ItemEnum) -> darling::Result<()> {
        let derives = parse_derives(&item.attrs)?;
        self.enums.push(EnumDecl {
            ident: item.ident.clone(),
            variants: Vec::new(),
            derives,
            constructors: Vec::new()
        });
        let kind = TypeKind::Enum(self.enums.len() - 1);
        let id = self.intern_spelled(kind, item.ident.to_token_stream());
        self.declared.insert(item.ident.to_string(), id);
        Ok(())
    }

    fn resolve_struct(&mut self, item: &ItemStruct) {
        let Some(&id) = self.declared.get(&item.ident.to_string()) else {
            return;
        };
        let members = self.resolve_fields(&item.fields, Some(id));
        if let TypeKind::Struct(index) = self.kinds[id.index()] {
            self.structs[index].members = members;
        }
    }

    fn resolve_enum(&mut self, item: &ItemEnum) {
        let Some(&id) = self.declared.get(&item.ident.to_string()) else {
            return;
        };
        let mut next = Some(0i128);
        let mut variants = Vec::with_capacity(item.variants.len());
        for variant in &item.variants {
            let discriminant = match &variant.discriminant {
                Some((_, expr)) => literal_discriminant(expr),
                None => next
            };
            next = discriminant.and_then(|d| d.checked_add(1));
            variants.push(Variant {
                ident: variant.ident.clone(),
                style: field_style(&variant.fields),
                members: self.resolve_fields(&variant.fields, Some(id)),
                discriminant
            });
        }
        if let TypeKind::Enum(index) = self.kinds[id.index()] {
            self.enums[index].variants = variants;
        }
    }

    fn resolve_fields(&mut self, fields: &Fields, self_ty: Option<TypeId>) -> Vec<Member> {
        fields
            .iter()
            .enumerate()
            .map(|(position, field)| {
                let member = match &field.ident {
                    Some(ident) => syn::Member::Named(ident.clone()),
                    None => syn::Member::Unnamed(syn::Index::from(position))
                };
                let name = field
                    .ident
                    .as_ref()
                    .map_or_else(|| position.to_string(), ToString::to_string);
                Member {
                    name,
                    member,
                    ty: self.resolve_type(&field.ty, self_ty)
                }
            })
            .collect()
    }

    fn register_constructors(&mut self, item: &ItemImpl) {
        let Some(owner) = self.resolve_declared(&item.self_ty) else {
            return;
        };
        if let Some((None, path, _)) = &item.trait_ {
            let Some(segment) = path.segments.last() else {
                return;
            };
            if segment.ident != "From" {
                return;
            }
            if let [parameter] = type_arguments(&segment.arguments).as_slice() {
                let parameter = self.resolve_type(parameter, Some(owner));
                self.push_constructor(owner, ConstructorKind::From, parameter);
            }
            return;
        }
        if item.trait_.is_some() {
            return;
        }
        for impl_item in &item.items {
            let ImplItem::Fn(function) = impl_item else {
                continue;
            };
            let sig = &function.sig;
            if sig.asyncness.is_some() || !sig.generics.params.is_empty() || sig.inputs.len() != 1 {
                continue;
            }
            let Some(syn::FnArg::Typed(argument)) = sig.inputs.first() else {
                continue;
            };
            let ReturnType::Type(_, output) = &sig.output else {
                continue;
            };
            if self.resolve_type(output, Some(owner)) != owner {
                continue;
            }
            let parameter = self.resolve_type(&argument.ty, Some(owner));
            self.push_constructor(owner, ConstructorKind::Function(sig.ident.clone()), parameter);
        }
    }

    fn push_constructor(&mut self, owner: TypeId, kind: ConstructorKind, parameter: TypeId) {
        let constructor = Constructor {
            kind,
            parameter
        };
        match self.kinds[owner.index()] {
            TypeKind::Struct(index) => self.structs[index].constructors.push(constructor),
            TypeKind::Enum(index) => self.enums[index].constructors.push(constructor),
            _ => {}
        }
    }

    fn resolve_declared(&self, ty: &Type) -> Option<TypeId> {
        let Type::Path(path) = ty else {
            return None;
        };
        let ident = path.path.get_ident()?;
        self.declared.get(&ident.to_string()).copied()
    }

    /// Resolve a `syn` type into the arena; `Self` maps to `self_ty`.
    pub fn resolve_type(&mut self, ty: &Type, self_ty: Option<TypeId>) -> TypeId {
        match ty {
            Type::Paren(inner) => self.resolve_type(&inner.elem, self_ty),
            Type::Group(inner) => self.resolve_type(&inner.elem, self_ty),
            Type::Tuple(tuple) if tuple.elems.is_empty() => self.intern(TypeKind::Unit),
            Type::Reference(reference) if reference.mutability.is_none() => {
                let inner = self.resolve_type(&reference.elem, self_ty);
                self.intern(TypeKind::Ref(inner))
            }
            Type::ImplTrait(bounds) => match iterator_item(&bounds.bounds) {
                Some(item) => {
                    let item = self.resolve_type(item, self_ty);
                    self.intern(TypeKind::Iter(item))
                }
                None => self.opaque(ty)
            },
            Type::Path(path) if path.qself.is_none() => self
                .resolve_path(&path.path, self_ty)
                .unwrap_or_else(|| self.opaque(ty)),
            _ => self.opaque(ty)
        }
    }

    fn resolve_path(&mut self, path: &syn::Path, self_ty: Option<TypeId>) -> Option<TypeId> {
        let segment = path.segments.last()?;
        let name = segment.ident.to_string();
        let arguments = type_arguments(&segment.arguments);
        let single = path.segments.len() == 1 && path.leading_colon.is_none();

        if arguments.is_empty() {
            if single && name == "Self" {
                return self_ty;
            }
            if single && let Some(&declared) = self.declared.get(&name) {
                return Some(declared);
            }
            return Primitive::from_ident(&name).map(|p| self.intern(TypeKind::Primitive(p)));
        }

        let kind = match (name.as_str(), arguments.as_slice()) {
            ("Option", [inner]) => TypeKind::Option(self.resolve_type(inner, self_ty)),
            ("Box", [inner]) => TypeKind::Boxed(self.resolve_type(inner, self_ty)),
            (collection, [element]) => {
                let kind = CollectionKind::from_ident(collection)?;
                TypeKind::Collection(kind, self.resolve_type(element, self_ty))
            }
            (map, [key, value, ..]) => {
                let kind = MapKind::from_ident(map)?;
                let key = self.resolve_type(key, self_ty);
                let value = self.resolve_type(value, self_ty);
                TypeKind::Map(kind, key, value)
            }
            _ => return None
        };
        Some(self.intern(kind))
    }

    fn opaque(&mut self, ty: &Type) -> TypeId {
        let tokens = ty.to_token_stream();
        let key = normalize_tokens(&tokens);
        self.intern_spelled(TypeKind::Opaque(key), tokens)
    }

    /// Intern a structural kind, spelling it from its components.
    ///
    /// # Panics
    ///
    /// Panics for [`TypeKind::Opaque`] and declaration kinds that were never
    /// registered; those are only created while reading the module.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let tokens = self.spell(&kind);
        self.intern_spelled(kind, tokens)
    }

    fn intern_spelled(&mut self, kind: TypeKind, tokens: TokenStream) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = TypeId(u32::try_from(self.kinds.len()).unwrap_or(u32::MAX));
        self.kinds.push(kind.clone());
        self.tokens.push(tokens);
        self.interned.insert(kind, id);
        id
    }

    fn spell(&self, kind: &TypeKind) -> TokenStream {
        match kind {
            TypeKind::Unit => quote! { () },
            TypeKind::Primitive(Primitive::String) => quote! { ::std::string::String },
            TypeKind::Primitive(primitive) => {
                let ident = Ident::new(primitive.name(), Span::call_site());
                quote! { #ident }
            }
            TypeKind::Option(inner) => {
                let inner = self.tokens(*inner);
                quote! { ::std::option::Option<#inner> }
            }
            TypeKind::Boxed(inner) => {
                let inner = self.tokens(*inner);
                quote! { ::std::boxed::Box<#inner> }
            }
            TypeKind::Ref(inner) => {
                let inner = self.tokens(*inner);
                quote! { &#inner }
            }
            TypeKind::Collection(collection, element) => {
                let path: syn::Path = syn::parse_str(collection.path()).unwrap_or_else(|_| {
                    syn::Path::from(Ident::new(collection.name(), Span::call_site()))
                });
                let element = self.tokens(*element);
                quote! { #path<#element> }
            }
            TypeKind::Map(map, key, value) => {
                let path: syn::Path = syn::parse_str(map.path())
                    .unwrap_or_else(|_| syn::Path::from(Ident::new(map.name(), Span::call_site())));
                let key = self.tokens(*key);
                let value = self.tokens(*value);
                quote! { #path<#key, #value> }
            }
            TypeKind::Iter(item) => {
                let item = self.tokens(*item);
                quote! { impl ::std::iter::Iterator<Item = #item> }
            }
            TypeKind::Struct(_) | TypeKind::Enum(_) | TypeKind::Opaque(_) => {
                panic!("declared and opaque types are spelled at registration: {kind:?}")
            }
        }
    }

    #[must_use]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.kinds[id.index()]
    }

    /// Tokens spelling the type in generated code.
    #[must_use]
    pub fn tokens(&self, id: TypeId) -> &TokenStream {
        &self.tokens[id.index()]
    }

    /// Human readable spelling for diagnostics and panic messages.
    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        match self.kind(id) {
            TypeKind::Unit => "()".to_string(),
            TypeKind::Primitive(primitive) => primitive.name().to_string(),
            TypeKind::Option(inner) => format!("Option<{}>", self.display(*inner)),
            TypeKind::Boxed(inner) => format!("Box<{}>", self.display(*inner)),
            TypeKind::Ref(inner) => format!("&{}", self.display(*inner)),
            TypeKind::Collection(collection, element) => {
                format!("{}<{}>", collection.name(), self.display(*element))
            }
            TypeKind::Map(map, key, value) => {
                format!("{}<{}, {}>", map.name(), self.display(*key), self.display(*value))
            }
            TypeKind::Iter(item) => format!("impl Iterator<Item = {}>", self.display(*item)),
            TypeKind::Struct(index) => self.structs[*index].ident.to_string(),
            TypeKind::Enum(index) => self.enums[*index].ident.to_string(),
            TypeKind::Opaque(spelling) => spelling.clone()
        }
    }

    /// Type declared in the module under `name`.
    #[must_use]
    pub fn declared(&self, name: &str) -> Option<TypeId> {
        self.declared.get(name).copied()
    }

    #[must_use]
    pub fn is_nullable(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Option(_))
    }

    /// `T` for `Option<T>`, the type itself otherwise.
    #[must_use]
    pub fn non_nullable(&self, id: TypeId) -> TypeId {
        match self.kind(id) {
            TypeKind::Option(inner) => *inner,
            _ => id
        }
    }

    /// `Option<T>` for `T`; nullable types are returned unchanged.
    pub fn nullable(&mut self, id: TypeId) -> TypeId {
        if self.is_nullable(id) {
            id
        } else {
            self.intern(TypeKind::Option(id))
        }
    }

    pub fn reference(&mut self, id: TypeId) -> TypeId {
        self.intern(TypeKind::Ref(id))
    }

    /// Referenced type of `&T`.
    #[must_use]
    pub fn referent(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Ref(inner) => Some(*inner),
            _ => None
        }
    }

    #[must_use]
    pub fn struct_decl(&self, id: TypeId) -> Option<&StructDecl> {
        match self.kind(id) {
            TypeKind::Struct(index) => self.structs.get(*index),
            _ => None
        }
    }

    #[must_use]
    pub fn enum_decl(&self, id: TypeId) -> Option<&EnumDecl> {
        match self.kind(id) {
            TypeKind::Enum(index) => self.enums.get(*index),
            _ => None
        }
    }

    /// Members of a declared struct.
    #[must_use]
    pub fn members(&self, id: TypeId) -> Option<&[Member]> {
        self.struct_decl(id).map(|decl| decl.members.as_slice())
    }

    #[must_use]
    pub fn constructors(&self, id: TypeId) -> &[Constructor] {
        if let Some(decl) = self.struct_decl(id) {
            return &decl.constructors;
        }
        self.enum_decl(id).map_or(&[], |decl| decl.constructors.as_slice())
    }

    /// Whether values of the type can be duplicated by a plain copy.
    #[must_use]
    pub fn is_copy(&self, id: TypeId) -> bool {
        match self.kind(id) {
            TypeKind::Unit | TypeKind::Ref(_) => true,
            TypeKind::Primitive(primitive) => primitive.is_copy(),
            TypeKind::Option(inner) => self.is_copy(*inner),
            TypeKind::Struct(index) => self.structs[*index].derives.copy,
            TypeKind::Enum(index) => self.enums[*index].derives.copy,
            _ => false
        }
    }

    /// Whether the type is one of the user's own declarations.
    #[must_use]
    pub fn is_declared(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Struct(_) | TypeKind::Enum(_))
    }

    /// Whether `.clone()` is available. Opaque types are assumed to be.
    #[must_use]
    pub fn is_cloneable(&self, id: TypeId) -> bool {
        match self.kind(id) {
            TypeKind::Iter(_) => false,
            TypeKind::Option(inner) | TypeKind::Boxed(inner) | TypeKind::Collection(_, inner) => {
                self.is_cloneable(*inner)
            }
            TypeKind::Map(_, key, value) => self.is_cloneable(*key) && self.is_cloneable(*value),
            TypeKind::Struct(index) => self.structs[*index].derives.clone,
            TypeKind::Enum(index) => self.enums[*index].derives.clone,
            TypeKind::Unit | TypeKind::Primitive(_) | TypeKind::Ref(_) | TypeKind::Opaque(_) => true
        }
    }

    /// Whether `Default::default()` is available. Opaque types are assumed
    /// not to be.
    #[must_use]
    pub fn has_default(&self, id: TypeId) -> bool {
        match self.kind(id) {
            TypeKind::Unit
            | TypeKind::Primitive(_)
            | TypeKind::Option(_)
            | TypeKind::Collection(..)
            | TypeKind::Map(..) => true,
            TypeKind::Boxed(inner) => self.has_default(*inner),
            TypeKind::Struct(index) => self.structs[*index].derives.default,
            TypeKind::Enum(index) => self.enums[*index].derives.default,
            TypeKind::Ref(_) | TypeKind::Iter(_) | TypeKind::Opaque(_) => false
        }
    }

    /// Whether a module declaration appears anywhere inside the type.
    #[must_use]
    pub fn contains_declared(&self, id: TypeId) -> bool {
        match self.kind(id) {
            TypeKind::Struct(_) | TypeKind::Enum(_) => true,
            TypeKind::Option(inner)
            | TypeKind::Boxed(inner)
            | TypeKind::Ref(inner)
            | TypeKind::Iter(inner)
            | TypeKind::Collection(_, inner) => self.contains_declared(*inner),
            TypeKind::Map(_, key, value) => {
                self.contains_declared(*key) || self.contains_declared(*value)
            }
            TypeKind::Unit | TypeKind::Primitive(_) | TypeKind::Opaque(_) => false
        }
    }
}

fn is_mappings_impl(item: &ItemImpl) -> bool {
    item.attrs.iter().any(|attr| attr.path().is_ident("mappings"))
}

fn field_style(fields: &Fields) -> FieldStyle {
    match fields {
        Fields::Named(_) => FieldStyle::Named,
        Fields::Unnamed(_) => FieldStyle::Unnamed,
        Fields::Unit => FieldStyle::Unit
    }
}

fn parse_derives(attrs: &[syn::Attribute]) -> darling::Result<Derives> {
    let mut derives = Derives::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let paths = attr
            .parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated
            )
            .map_err(darling::Error::from)?;
        for path in paths {
            let Some(segment) = path.segments.last() else {
                continue;
            };
            match segment.ident.to_string().as_str() {
                "Copy" => derives.copy = true,
                "Clone" => derives.clone = true,
                "Default" => derives.default = true,
                _ => {}
            }
        }
    }
    Ok(derives)
}

fn literal_discriminant(expr: &Expr) -> Option<i128> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(int) => int.base10_parse().ok(),
            _ => None
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            literal_discriminant(&unary.expr).and_then(i128::checked_neg)
        }
        Expr::Paren(inner) => literal_discriminant(&inner.expr),
        Expr::Group(inner) => literal_discriminant(&inner.expr),
        _ => None
    }
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(bracketed) => bracketed
            .args
            .iter()
            .filter_map(|argument| match argument {
                GenericArgument::Type(ty) => Some(ty),
                _ => None
            })
            .collect(),
        _ => Vec::new()
    }
}

fn iterator_item(
    bounds: &syn::punctuated::Punctuated<TypeParamBound, syn::Token![+]>
) -> Option<&Type> {
    bounds.iter().find_map(|bound| {
        let TypeParamBound::Trait(bound) = bound else {
            return None;
        };
        let segment = bound.path.segments.last()?;
        if segment.ident != "Iterator" {
            return None;
        }
        let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
            return None;
        };
        arguments.args.iter().find_map(|argument| match argument {
            GenericArgument::AssocType(assoc) if assoc.ident == "Item" => Some(&assoc.ty),
            _ => None
        })
    })
}

/// Token spelling without the spaces `TokenStream::to_string` inserts.
#[must_use]
pub fn normalize_tokens(tokens: &TokenStream) -> String {
    let mut text = tokens.to_string();
    let replacements = [
        (" :: ", "::"),
        (":: ", "::"),
        (" < ", "<"),
        (" <", "<"),
        ("< ", "<"),
        (" >", ">"),
        (" , ", ", "),
        ("& ", "&")
    ];
    for (from, to) in replacements {
        text = text.replace(from, to);
    }
    text
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    use super::*;

    fn model(file: syn::File) -> TypeModel {
        TypeModel::from_items(&file.items).unwrap()
    }

    #[test]
    fn resolves_forward_references_between_structs() {
        let model = model(parse_quote! {
            struct Car { engine: Engine, owner: Option<Box<Person>> }
            struct Engine { power: u32 }
            struct Person { name: String }
        });
        let car = model.declared("Car").unwrap();
        let members = model.members(car).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(Some(members[0].ty), model.declared("Engine"));
        assert_eq!(model.display(members[1].ty), "Option<Box<Person>>");
    }

    #[test]
    fn same_shape_interns_once() {
        let model = model(parse_quote! {
            struct A { x: Vec<Option<i32>>, y: std::vec::Vec<Option<i32>> }
        });
        let members = model.members(model.declared("A").unwrap()).unwrap();
        assert_eq!(members[0].ty, members[1].ty);
    }

    #[test]
    fn unknown_types_are_opaque() {
        let model = model(parse_quote! {
            struct A { id: uuid::Uuid, at: chrono::DateTime<chrono::Utc> }
        });
        let members = model.members(model.declared("A").unwrap()).unwrap();
        assert_eq!(model.display(members[0].ty), "uuid::Uuid");
        assert_eq!(model.display(members[1].ty), "chrono::DateTime<chrono::Utc>");
    }

    #[test]
    fn enum_discriminants_continue_from_literals() {
        let model = model(parse_quote! {
            enum Level { Low = -1, Mid, High = 10, Max }
        });
        let decl = model.enum_decl(model.declared("Level").unwrap()).unwrap();
        let values: Vec<_> = decl.variants.iter().map(|v| v.discriminant).collect();
        assert_eq!(values, vec![Some(-1), Some(0), Some(10), Some(11)]);
        assert!(decl.is_unit_only());
    }

    #[test]
    fn newtype_variants_expose_payload() {
        let model = model(parse_quote! {
            enum Shape { Circle(Circle), Named { r: f64 } }
            struct Circle { r: f64 }
        });
        let decl = model.enum_decl(model.declared("Shape").unwrap()).unwrap();
        assert_eq!(decl.variants[0].newtype_payload(), model.declared("Circle"));
        assert_eq!(decl.variants[1].newtype_payload(), None);
    }

    #[test]
    fn registers_single_argument_constructors() {
        let model = model(parse_quote! {
            struct Email(String);
            struct Price { cents: i64 }
            impl From<String> for Email {
                fn from(value: String) -> Self { Self(value) }
            }
            impl Price {
                fn from_cents(cents: i64) -> Self { Self { cents } }
                fn zero() -> Self { Self { cents: 0 } }
            }
        });
        let email = model.declared("Email").unwrap();
        assert_eq!(model.constructors(email).len(), 1);
        assert_eq!(model.constructors(email)[0].kind, ConstructorKind::From);
        let price = model.declared("Price").unwrap();
        assert_eq!(model.constructors(price).len(), 1);
    }

    #[test]
    fn copy_detection_uses_derives() {
        let model = model(parse_quote! {
            #[derive(Clone, Copy)]
            struct Point { x: i32 }
            #[derive(Clone)]
            struct Name { value: String }
        });
        assert!(model.is_copy(model.declared("Point").unwrap()));
        assert!(!model.is_copy(model.declared("Name").unwrap()));
    }

    #[test]
    fn impl_iterator_is_a_lazy_sequence() {
        let mut model = TypeModel::default();
        let ty: Type = parse_quote!(impl Iterator<Item = u8>);
        let id = model.resolve_type(&ty, None);
        assert!(matches!(model.kind(id), TypeKind::Iter(_)));
    }
}
