// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Code generation from resolved mappings.
//!
//! The [`Emitter`] walks the mapping graph of one mapper and produces the
//! bodies of declared methods plus private helper methods. Mappings that
//! read as a single expression are inlined at each use; struct, enum and
//! derived type mappings become helpers named after their target type and
//! are emitted once, in first-use order.
//!
//! # Example Output
//!
//! ```rust,ignore
//! impl CarMapper {
//!     pub fn to_dto(car: Car) -> CarDto {
//!         CarDto {
//!             name: car.name,
//!             engine: Self::map_to_engine_dto(car.engine),
//!             tags: car.tags
//!         }
//!     }
//!
//!     #[allow(unused_variables)]
//!     fn map_to_engine_dto(source: Engine) -> EngineDto {
//!         EngineDto { power: u64::from(source.power) }
//!     }
//! }
//! ```

pub mod syntax;
pub mod tokens;

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use rustc_hash::{FxHashMap, FxHashSet};

use self::syntax::{Expr, Stmt};
use crate::{
    mapper::{
        config::SupportedFeatures,
        descriptors::{MapperDescriptor, MappingId, MappingRegistry},
        mappings::{DirectKind, Mapping},
        parse::{MapperDef, MethodDef, SignatureShape},
        symbols::{MemberPath, TypeId, TypeKind, TypeModel}
    },
    utils::names::{ScopeId, UniqueNameBuilder, is_identifier}
};

/// Source expression and naming scope handed down while building.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub source: Expr,
    pub scope:  ScopeId
}

impl BuildContext {
    #[must_use]
    pub fn new(source: Expr, scope: ScopeId) -> Self {
        Self {
            source,
            scope
        }
    }

    /// Same scope, different source.
    #[must_use]
    pub fn with_source(&self, source: Expr) -> Self {
        Self {
            source,
            scope: self.scope
        }
    }
}

pub struct Emitter<'a> {
    model:        &'a TypeModel,
    registry:     &'a MappingRegistry,
    features:     SupportedFeatures,
    /// Method names of the mapper impl.
    method_names: UniqueNameBuilder,
    helpers:      FxHashMap<MappingId, Ident>,
    queue:        Vec<MappingId>,
    /// Binding names of the function being emitted.
    names:        UniqueNameBuilder,
    inline_stack: Vec<MappingId>
}

impl<'a> Emitter<'a> {
    pub fn new<'n>(
        model: &'a TypeModel,
        registry: &'a MappingRegistry,
        features: SupportedFeatures,
        reserved: impl IntoIterator<Item = &'n Ident>
    ) -> Self {
        let mut method_names = UniqueNameBuilder::new();
        let root = method_names.root();
        for name in reserved {
            method_names.reserve(root, name.to_string());
        }
        Self {
            model,
            registry,
            features,
            method_names,
            helpers: FxHashMap::default(),
            queue: Vec::new(),
            names: UniqueNameBuilder::new(),
            inline_stack: Vec::new()
        }
    }

    #[must_use]
    pub fn model(&self) -> &'a TypeModel {
        self.model
    }

    #[must_use]
    pub fn type_tokens(&self, id: TypeId) -> TokenStream {
        self.model.tokens(id).clone()
    }

    /// Path of a declared type, looking through a reference.
    #[must_use]
    pub fn declared_path(&self, id: TypeId) -> TokenStream {
        let id = self.model.referent(id).unwrap_or(id);
        self.model.tokens(id).clone()
    }

    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        self.model.display(id)
    }

    /// Snake case fragment naming a type, `engine_dto` for `EngineDto`.
    #[must_use]
    pub fn type_hint(&self, id: TypeId) -> String {
        match self.model.kind(id) {
            TypeKind::Struct(_) | TypeKind::Enum(_) => self.model.display(id).to_case(Case::Snake),
            TypeKind::Primitive(primitive) => primitive.name().to_lowercase(),
            TypeKind::Option(inner) | TypeKind::Boxed(inner) | TypeKind::Ref(inner) => {
                self.type_hint(*inner)
            }
            TypeKind::Collection(kind, element) => {
                format!("{}_{}", self.type_hint(*element), kind.name().to_case(Case::Snake))
            }
            TypeKind::Map(kind, ..) => kind.name().to_case(Case::Snake),
            TypeKind::Iter(item) => format!("{}_iter", self.type_hint(*item)),
            TypeKind::Unit | TypeKind::Opaque(_) => "value".to_string()
        }
    }

    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.names.new_scope(parent)
    }

    /// Fresh binding name; hints that are not identifiers become `value`.
    pub fn new_name(&mut self, scope: ScopeId, hint: &str) -> String {
        let hint = if is_identifier(hint) { hint } else { "value" };
        self.names.new_name(scope, hint)
    }

    pub fn member_getter(
        &mut self,
        path: &MemberPath,
        source: Expr,
        borrowed: bool,
        scope: ScopeId
    ) -> Expr {
        path.getter(self.model, source, borrowed, &mut self.names, scope)
    }

    pub fn member_setter(
        &mut self,
        path: &MemberPath,
        target: Expr,
        value: Expr,
        scope: ScopeId
    ) -> Stmt {
        let chained = self.features.let_chains;
        path.setter(self.model, target, value, chained, &mut self.names, scope)
    }

    /// Value of mapping `id` applied to `ctx.source`.
    ///
    /// Helper-backed mappings are called; everything else is inlined.
    pub fn build(&mut self, id: MappingId, ctx: BuildContext) -> Expr {
        let registry = self.registry;
        let id = registry.resolve(id);
        let mapping = registry.get(id);
        if let Mapping::User(user) = mapping {
            return user.build(ctx);
        }
        if self.needs_helper(id, mapping) {
            let name = self.helper(id);
            return Expr::call_self(&name, vec![ctx.source]);
        }
        self.build_inline(id, ctx)
    }

    /// Body of mapping `id` without going through its helper.
    pub fn build_inline(&mut self, id: MappingId, ctx: BuildContext) -> Expr {
        let registry = self.registry;
        let id = registry.resolve(id);
        let mapping = registry.get(id);
        self.inline_stack.push(id);
        let expr = mapping.build(self, ctx);
        self.inline_stack.pop();
        expr
    }

    /// Statements applying existing target mapping `id`.
    pub fn build_existing(&mut self, id: MappingId, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        let registry = self.registry;
        let id = registry.resolve(id);
        let mapping = registry.get(id);
        if let Mapping::User(user) = mapping {
            return user.build_existing(ctx, target);
        }
        if self.needs_helper(id, mapping) {
            let name = self.helper(id);
            return vec![Stmt::Expr(Expr::call_self(&name, vec![
                ctx.source,
                target.mutable_ref()
            ]))];
        }
        self.build_existing_inline(id, ctx, target)
    }

    pub fn build_existing_inline(
        &mut self,
        id: MappingId,
        ctx: BuildContext,
        target: Expr
    ) -> Vec<Stmt> {
        let registry = self.registry;
        let id = registry.resolve(id);
        let mapping = registry.get(id);
        self.inline_stack.push(id);
        let stmts = mapping.build_existing(self, ctx, target);
        self.inline_stack.pop();
        stmts
    }

    fn needs_helper(&self, id: MappingId, mapping: &Mapping) -> bool {
        mapping.is_method() || self.registry.is_promoted(id) || self.inline_stack.contains(&id)
    }

    /// Apply element mapping `id` to every element of the iterator `source`.
    pub fn map_element(&mut self, source: Expr, id: MappingId, scope: ScopeId) -> Expr {
        self.map_with(source, id, scope, true, false)
    }

    /// Apply mapping `id` inside an `Option`.
    pub fn map_option(&mut self, source: Expr, id: MappingId, scope: ScopeId) -> Expr {
        self.map_with(source, id, scope, false, false)
    }

    /// Like [`Self::map_element`], with the element mapping inlined into the
    /// closure unless that would recurse.
    pub fn project_element(&mut self, source: Expr, id: MappingId, scope: ScopeId) -> Expr {
        self.map_with(source, id, scope, true, true)
    }

    fn map_with(
        &mut self,
        source: Expr,
        id: MappingId,
        scope: ScopeId,
        element: bool,
        inline: bool
    ) -> Expr {
        let registry = self.registry;
        let id = registry.resolve(id);
        let mapping = registry.get(id);
        if let Mapping::Direct(direct) = mapping {
            return match direct.kind {
                DirectKind::Move => source,
                DirectKind::Copy => source.method("copied", Vec::new()),
                DirectKind::Clone => source.method("cloned", Vec::new())
            };
        }
        let scope = self.new_scope(scope);
        let hint = source.name_hint();
        let name = if element {
            self.names.new_for_enumeration(scope, hint.as_deref())
        } else {
            self.new_name(scope, hint.as_deref().unwrap_or("value"))
        };
        let ctx = BuildContext::new(Expr::ident(&name), scope);
        let inline =
            inline && !matches!(mapping, Mapping::User(_)) && !self.inline_stack.contains(&id);
        let body = if inline {
            self.build_inline(id, ctx)
        } else {
            self.build(id, ctx)
        };
        source.method("map", vec![closure_or_path(&name, body)])
    }

    /// Name of the helper method of mapping `id`, queueing it for emission.
    fn helper(&mut self, id: MappingId) -> Ident {
        if let Some(name) = self.helpers.get(&id) {
            return name.clone();
        }
        let registry = self.registry;
        let mapping = registry.get(id);
        let base = if mapping.is_existing_target() {
            format!("update_{}", self.type_hint(mapping.target()))
        } else {
            format!("map_to_{}", self.type_hint(mapping.target()))
        };
        let root = self.method_names.root();
        let name = Ident::new(&self.method_names.new_name(root, &base), Span::call_site());
        tracing::trace!(?id, helper = %name, "queued helper method");
        self.helpers.insert(id, name.clone());
        self.queue.push(id);
        name
    }

    /// Start a new function body with `parameters` already bound.
    fn begin_function(&mut self, parameters: &[String]) -> ScopeId {
        self.names = UniqueNameBuilder::new();
        self.inline_stack.clear();
        let root = self.names.root();
        for parameter in parameters {
            self.names.reserve(root, parameter.clone());
        }
        root
    }

    /// Whether every mapping reachable from `id` was completed.
    ///
    /// Calls of other user methods end the walk; their own bodies are
    /// checked separately.
    fn is_complete(&self, id: MappingId) -> bool {
        let mut seen = FxHashSet::default();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let next = self.registry.resolve(next);
            if !seen.insert(next) {
                continue;
            }
            let Some(mapping) = self.registry.try_get(next) else {
                return false;
            };
            if !matches!(mapping, Mapping::User(_)) {
                pending.extend(mapping.dependencies());
            }
        }
        true
    }

    fn emit_method(&mut self, method: &MethodDef, user: Option<MappingId>) -> TokenStream {
        let attrs = &method.attrs;
        let vis = &method.vis;
        let sig = &method.sig;
        if let Some(body) = &method.body {
            return quote! { #(#attrs)* #vis #sig #body };
        }
        let delegate = user
            .and_then(|id| match self.registry.try_get(id) {
                Some(Mapping::User(user)) => user.delegate(),
                _ => None
            })
            .filter(|&delegate| self.is_complete(delegate));
        let (Some(delegate), Some(signature)) = (delegate, method.mapping_signature()) else {
            return quote! {
                #(#attrs)*
                #[allow(unused_variables)]
                #vis #sig {
                    ::std::unimplemented!()
                }
            };
        };
        let mut parameters = vec![signature.source_name.to_string()];
        parameters.extend(signature.target_name.as_ref().map(ToString::to_string));
        let scope = self.begin_function(&parameters);
        let ctx = BuildContext::new(Expr::Ident(signature.source_name.clone()), scope);
        let body = match (signature.shape, &signature.target_name) {
            (SignatureShape::ExistingTarget, Some(target)) => {
                let target = Expr::Ident(target.clone()).deref();
                let stmts = self.build_existing_inline(delegate, ctx, target);
                quote! { #(#stmts)* }
            }
            _ => {
                let expr = self.build_inline(delegate, ctx);
                quote! { #expr }
            }
        };
        quote! {
            #(#attrs)*
            #vis #sig {
                #body
            }
        }
    }

    fn emit_helper(&mut self, id: MappingId) -> TokenStream {
        let registry = self.registry;
        let mapping = registry.get(id);
        let name = self.helper(id);
        let source = self.type_tokens(mapping.source());
        let target = self.type_tokens(mapping.target());
        let scope = self.begin_function(&["source".to_string(), "target".to_string()]);
        let ctx = BuildContext::new(Expr::ident("source"), scope);
        if mapping.is_existing_target() {
            let stmts = self.build_existing_inline(id, ctx, Expr::ident("target").deref());
            quote! {
                #[allow(unused_variables)]
                fn #name(source: #source, target: &mut #target) {
                    #(#stmts)*
                }
            }
        } else {
            let body = self.build_inline(id, ctx);
            quote! {
                #[allow(unused_variables)]
                fn #name(source: #source) -> #target {
                    #body
                }
            }
        }
    }

    /// Helper methods queued so far, including those queued while emitting.
    fn emit_helpers(&mut self) -> Vec<TokenStream> {
        let mut items = Vec::new();
        let mut cursor = 0;
        while cursor < self.queue.len() {
            let id = self.queue[cursor];
            cursor += 1;
            items.push(self.emit_helper(id));
        }
        items
    }
}

/// `|x| f(x)` is passed as `f`.
fn closure_or_path(name: &str, body: Expr) -> Expr {
    if let Expr::Call {
        func,
        args
    } = &body
        && let [Expr::Ident(argument)] = args.as_slice()
        && argument == name
    {
        return Expr::verbatim(func.clone());
    }
    Expr::closure(syntax::Pat::ident(name), body)
}

/// Generated impl block of one mapper.
#[must_use]
pub fn emit_mapper(
    model: &TypeModel,
    mapper: &MapperDef,
    descriptor: &MapperDescriptor
) -> TokenStream {
    let mut emitter = Emitter::new(
        model,
        &descriptor.registry,
        descriptor.features,
        mapper.methods.iter().map(MethodDef::name)
    );
    let mut items: Vec<TokenStream> = mapper
        .methods
        .iter()
        .enumerate()
        .map(|(index, method)| {
            let user = descriptor.user_mappings.get(index).copied().flatten();
            emitter.emit_method(method, user)
        })
        .collect();
    items.extend(emitter.emit_helpers());
    mapper.render(&items)
}
