// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::fmt::Display;

use proc_macro2::{Ident, Span};
use tracing::{debug, trace};

use super::{
    builders::{Built, EXISTING_TARGET_CHAIN, NEW_INSTANCE_CHAIN},
    registry::{BuildFailure, MappingBuildingOptions, MappingId, MappingRegistry, TypeMappingKey}
};
use crate::mapper::{
    config::{
        ConfigScope, MapperConfigs, MappingConfiguration, MappingConversionType, SupportedFeatures
    },
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    mappings::{Mapping, UserMapping},
    parse::{MapperArgs, MapperDef, MethodDef, SignatureShape},
    symbols::{TypeId, TypeModel}
};

/// Everything the emitter needs to generate one mapper.
#[derive(Debug)]
pub struct MapperDescriptor {
    pub registry:      MappingRegistry,
    /// User mapping of each method by method index, `None` for methods that
    /// are not mappings.
    pub user_mappings: Vec<Option<MappingId>>,
    pub diagnostics:   Diagnostics,
    pub features:      SupportedFeatures
}

/// A method with a mapping signature.
#[derive(Debug, Clone)]
pub struct UserMethod {
    pub index:       usize,
    pub name:        Ident,
    pub source:      TypeId,
    pub target:      TypeId,
    pub existing:    bool,
    pub implemented: bool,
    pub span:        Span,
    pub mapping:     MappingId
}

/// An implemented method as seen by `#[map_value(use = "...")]`.
#[derive(Debug, Clone)]
pub struct ValueProvider {
    pub name:        Ident,
    pub return_type: Option<TypeId>,
    pub is_async:    bool,
    pub is_generic:  bool,
    pub parameters:  usize
}

impl ValueProvider {
    #[must_use]
    pub fn is_candidate(&self) -> bool {
        !self.is_async && !self.is_generic && self.parameters == 0 && self.return_type.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MappingRequest {
    pub source:   TypeId,
    pub target:   TypeId,
    pub existing: bool,
    pub scope:    ConfigScope,
    pub options:  MappingBuildingOptions,
    pub span:     Span,
    /// Declared method whose body is being resolved.
    pub user:     Option<usize>
}

impl MappingRequest {
    #[must_use]
    pub fn key(&self) -> TypeMappingKey {
        TypeMappingKey {
            source:          self.source,
            target:          self.target,
            existing_target: self.existing,
            scope:           self.scope,
            ignore_derived:  self
                .options
                .contains(MappingBuildingOptions::IGNORE_DERIVED_TYPES)
        }
    }

    #[must_use]
    pub fn is_reusable(&self) -> bool {
        self.options.contains(MappingBuildingOptions::MARK_AS_REUSABLE)
    }
}

/// Resolves the mappings of one mapper.
pub struct DescriptorBuilder<'a> {
    model:         &'a mut TypeModel,
    configs:       &'a MapperConfigs,
    registry:      MappingRegistry,
    diagnostics:   Diagnostics,
    user_methods:  Vec<UserMethod>,
    providers:     Vec<ValueProvider>,
    user_mappings: Vec<Option<MappingId>>
}

impl<'a> DescriptorBuilder<'a> {
    /// Register the mapper's methods.
    ///
    /// Implemented mapping methods are usable by nested requests right away;
    /// declared ones receive their body in [`Self::build`].
    #[must_use]
    pub fn new(model: &'a mut TypeModel, mapper: &MapperDef, configs: &'a MapperConfigs) -> Self {
        let mut builder = Self {
            model,
            configs,
            registry: MappingRegistry::default(),
            diagnostics: Diagnostics::default(),
            user_methods: Vec::new(),
            providers: Vec::new(),
            user_mappings: Vec::with_capacity(mapper.methods.len())
        };
        for (index, method) in mapper.methods.iter().enumerate() {
            builder.add_method(index, method);
        }
        builder
    }

    fn add_method(&mut self, index: usize, method: &MethodDef) {
        let mapping = match method.mapping_signature() {
            Some(signature) => {
                let source = self.model.resolve_type(&signature.source_ty, None);
                let target = self.model.resolve_type(&signature.target_ty, None);
                let existing = signature.shape == SignatureShape::ExistingTarget;
                Some(self.register_user_method(index, method, source, target, existing))
            }
            None => {
                if method.is_declared() {
                    self.diagnostics.report(
                        DiagnosticKind::UnsupportedMappingMethodSignature,
                        method.signature_span(),
                        &[method.name()]
                    );
                }
                None
            }
        };
        self.user_mappings.push(mapping);
        if !method.is_declared() {
            let return_type = method
                .return_type()
                .map(|ty| self.model.resolve_type(ty, None));
            self.providers.push(ValueProvider {
                name: method.name().clone(),
                return_type,
                is_async: method.is_async(),
                is_generic: method.is_generic(),
                parameters: method.parameter_count()
            });
        }
    }

    fn register_user_method(
        &mut self,
        index: usize,
        method: &MethodDef,
        source: TypeId,
        target: TypeId,
        existing: bool
    ) -> MappingId {
        let implemented = !method.is_declared();
        let key = TypeMappingKey {
            source,
            target,
            existing_target: existing,
            scope: ConfigScope::Default,
            ignore_derived: false
        };
        let mapping = Mapping::User(UserMapping::new(
            source,
            target,
            method.name().clone(),
            existing,
            implemented,
            index
        ));
        // First method with a signature owns the cache entry.
        let id = if self.registry.find(&key).is_some() {
            let id = self.registry.reserve(key, false);
            self.registry.complete(id, mapping);
            id
        } else {
            self.registry.register(key, mapping)
        };
        self.user_methods.push(UserMethod {
            index,
            name: method.name().clone(),
            source,
            target,
            existing,
            implemented,
            span: method.signature_span(),
            mapping: id
        });
        id
    }

    /// Resolve the body of every declared method.
    #[must_use]
    pub fn build(mut self) -> MapperDescriptor {
        self.build_declared_bodies();
        self.promote_deferred();
        MapperDescriptor {
            registry:      self.registry,
            user_mappings: self.user_mappings,
            diagnostics:   self.diagnostics,
            features:      self.configs.default_config().supported_features
        }
    }

    fn build_declared_bodies(&mut self) {
        for position in 0..self.user_methods.len() {
            let method = self.user_methods[position].clone();
            if method.implemented {
                continue;
            }
            let request = MappingRequest {
                source:   method.source,
                target:   method.target,
                existing: method.existing,
                scope:    ConfigScope::Method(method.index),
                options:  MappingBuildingOptions::KEEP_USER_SYMBOL,
                span:     method.span,
                user:     Some(method.index)
            };
            match self.build_request(request) {
                Ok(delegate) => {
                    debug!(method = %method.name, "declared mapping resolved");
                    self.registry.set_delegate(method.mapping, delegate);
                }
                Err(BuildFailure::NoStrategy) => {
                    let source = self.model.display(method.source);
                    let target = self.model.display(method.target);
                    self.diagnostics.report(
                        DiagnosticKind::CouldNotCreateMapping,
                        method.span,
                        &[&source, &target]
                    );
                }
                Err(BuildFailure::Reported) => {}
            }
        }
    }

    /// Mappings handed out while building are reached through a cycle and
    /// must be emitted as functions.
    fn promote_deferred(&mut self) {
        let deferred: Vec<MappingId> = self.registry.deferred().iter().map(|(id, _)| *id).collect();
        for id in deferred {
            if let Some(mapping) = self.registry.try_get(id)
                && !matches!(mapping, Mapping::User(_))
            {
                trace!(id = id.index(), "promoting recursive mapping to a helper");
                self.registry.promote(id);
            }
        }
    }

    fn resolve(&mut self, request: MappingRequest) -> Result<MappingId, BuildFailure> {
        if request.is_reusable()
            && let Some(id) = self.registry.find(&request.key())
        {
            if self.registry.is_failed(id) {
                return Err(BuildFailure::Reported);
            }
            if self.registry.is_building(id) {
                debug!(id = id.index(), "mapping requested while building");
                self.registry.record_deferred(id, request.span);
            }
            return Ok(id);
        }
        self.build_request(request)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn build_request(&mut self, request: MappingRequest) -> Result<MappingId, BuildFailure> {
        let id = self.registry.reserve(request.key(), request.is_reusable());
        let chain = if request.existing {
            EXISTING_TARGET_CHAIN
        } else {
            NEW_INSTANCE_CHAIN
        };
        for builder in chain {
            let built = builder.build(&mut MappingBuilderContext {
                builder: self,
                request
            });
            match built {
                Built::Declined => {}
                Built::Mapping(mapping) => {
                    trace!(builder = builder.name(), "mapping built");
                    self.registry.complete(id, mapping);
                    return Ok(id);
                }
                Built::Delegate(other) => {
                    trace!(builder = builder.name(), "mapping delegated");
                    self.registry.alias(id, other);
                    return Ok(other);
                }
                Built::Failed => {
                    self.registry.fail(id, false);
                    return Err(BuildFailure::Reported);
                }
            }
        }
        self.registry.fail(id, true);
        Err(BuildFailure::NoStrategy)
    }
}

/// View of the builder handed to each [`super::builders::MappingBuilder`].
pub struct MappingBuilderContext<'b, 'a> {
    builder: &'b mut DescriptorBuilder<'a>,
    request: MappingRequest
}

impl<'a> MappingBuilderContext<'_, 'a> {
    #[must_use]
    pub fn request(&self) -> &MappingRequest {
        &self.request
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.request.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.request.target
    }

    #[must_use]
    pub fn is_existing(&self) -> bool {
        self.request.existing
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.request.span
    }

    #[must_use]
    pub fn options(&self) -> MappingBuildingOptions {
        self.request.options
    }

    /// Configuration of the request's scope.
    #[must_use]
    pub fn config(&self) -> &'a MappingConfiguration {
        let configs: &'a MapperConfigs = self.builder.configs;
        configs.get(self.request.scope)
    }

    #[must_use]
    pub fn is_conversion_enabled(&self, conversion: MappingConversionType) -> bool {
        self.config().is_conversion_enabled(conversion)
    }

    #[must_use]
    pub fn model(&self) -> &TypeModel {
        self.builder.model
    }

    pub fn model_mut(&mut self) -> &mut TypeModel {
        self.builder.model
    }

    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        self.builder.model.display(id)
    }

    /// Nested new-instance mapping with default options.
    pub fn find_or_build(
        &mut self,
        source: TypeId,
        target: TypeId
    ) -> Result<MappingId, BuildFailure> {
        self.nested(source, target, false, MappingBuildingOptions::default())
    }

    pub fn find_or_build_with(
        &mut self,
        source: TypeId,
        target: TypeId,
        options: MappingBuildingOptions
    ) -> Result<MappingId, BuildFailure> {
        self.nested(source, target, false, options)
    }

    /// Nested existing-target mapping with default options.
    pub fn find_or_build_existing(
        &mut self,
        source: TypeId,
        target: TypeId
    ) -> Result<MappingId, BuildFailure> {
        self.nested(source, target, true, MappingBuildingOptions::default())
    }

    pub fn find_or_build_existing_with(
        &mut self,
        source: TypeId,
        target: TypeId,
        options: MappingBuildingOptions
    ) -> Result<MappingId, BuildFailure> {
        self.nested(source, target, true, options)
    }

    fn nested(
        &mut self,
        source: TypeId,
        target: TypeId,
        existing: bool,
        options: MappingBuildingOptions
    ) -> Result<MappingId, BuildFailure> {
        let scope = if options.contains(MappingBuildingOptions::KEEP_USER_SYMBOL) {
            self.request.scope
        } else {
            ConfigScope::Default
        };
        self.builder.resolve(MappingRequest {
            source,
            target,
            existing,
            scope,
            options,
            span: self.request.span,
            user: None
        })
    }

    pub fn report(&mut self, kind: DiagnosticKind, span: Span, args: &[&dyn Display]) {
        self.builder.diagnostics.report(kind, span, args);
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.builder.diagnostics.push(diagnostic);
    }

    /// User mapping applicable to the request, skipping the method whose
    /// body is being built.
    ///
    /// While building a declared method's body only implemented methods are
    /// considered, so two declared methods never resolve to each other.
    /// With [`MappingBuildingOptions::IGNORE_DERIVED_TYPES`] methods carrying
    /// a derived type configuration are skipped.
    #[must_use]
    pub fn user_mapping(
        &self,
        source: TypeId,
        target: TypeId,
        existing: bool
    ) -> Option<MappingId> {
        let current = self.request.user;
        let ignore_derived = self
            .request
            .options
            .contains(MappingBuildingOptions::IGNORE_DERIVED_TYPES);
        let configs = self.builder.configs;
        self.builder
            .user_methods
            .iter()
            .find(|method| {
                method.source == source
                    && method.target == target
                    && method.existing == existing
                    && current != Some(method.index)
                    && (current.is_none() || method.implemented)
                    && !(ignore_derived
                        && configs
                            .get(ConfigScope::Method(method.index))
                            .derived_types
                            .is_some())
            })
            .map(|method| method.mapping)
    }

    #[must_use]
    pub fn providers(&self) -> &[ValueProvider] {
        &self.builder.providers
    }
}

/// Resolve every mapping of `mapper` under the mapper-wide `args`.
pub fn describe(model: &mut TypeModel, mapper: &MapperDef, args: &MapperArgs) -> MapperDescriptor {
    let defaults = MappingConfiguration::from_mapper(args);
    let methods = mapper
        .methods
        .iter()
        .map(|method| MappingConfiguration::for_method(&defaults, &method.directives, model))
        .collect();
    let configs = MapperConfigs::new(defaults, methods);
    DescriptorBuilder::new(model, mapper, &configs).build()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::quote;

    use super::*;
    use crate::mapper::descriptors::fixture::Described;

    #[test]
    fn nested_mappings_are_cached_and_reused() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Engine { pub power: u32 }
                pub struct EngineDto { pub power: u32 }
                pub struct Car { pub front: Engine, pub back: Engine }
                pub struct CarDto { pub front: EngineDto, pub back: EngineDto }
                pub struct CarMapper;

                #[mappings]
                impl CarMapper {
                    pub fn to_dto(car: Car) -> CarDto;
                }
            }
        });
        let Mapping::Memberwise(car) = described.delegate("to_dto") else {
            panic!("expected memberwise mapping");
        };
        let nested: Vec<_> = car
            .assignments()
            .iter()
            .filter_map(|assignment| assignment.value.mapping())
            .collect();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0], nested[1]);
        assert!(!described.descriptor.diagnostics.has_errors());
    }

    #[test]
    fn resolution_is_deterministic() {
        let tokens = quote! {
            mod mapping {
                pub struct A { pub b: B, pub items: Vec<B> }
                pub struct B { pub name: String }
                pub struct ADto { pub b: BDto, pub items: Vec<BDto> }
                pub struct BDto { pub name: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(a: A) -> ADto;
                    pub fn b_to_dto(b: B) -> BDto;
                }
            }
        };
        let first = Described::new(tokens.clone());
        let second = Described::new(tokens);
        assert_eq!(first.descriptor.registry.len(), second.descriptor.registry.len());
        assert_eq!(first.expand(), second.expand());
    }

    #[test]
    fn mutually_recursive_types_terminate() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Holder { pub a: A }
                pub struct HolderDto { pub a: ADto }
                pub struct A { pub b: Option<Box<B>> }
                pub struct B { pub a: Option<Box<A>> }
                pub struct ADto { pub b: Option<Box<BDto>> }
                pub struct BDto { pub a: Option<Box<ADto>> }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(holder: Holder) -> HolderDto;
                }
            }
        });
        assert!(!described.descriptor.diagnostics.has_errors());
        assert!(!described.descriptor.registry.deferred().is_empty());
        let output = described.expand();
        assert!(output.contains("fn map_to_a_dto"), "{output}");
        assert!(output.contains("fn map_to_b_dto"), "{output}");
    }

    #[test]
    fn self_referencing_type_uses_the_declared_method() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Node { pub parent: Option<Box<Node>>, pub children: Vec<Node> }
                pub struct NodeDto { pub parent: Option<Box<NodeDto>>, pub children: Vec<NodeDto> }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(node: Node) -> NodeDto;
                }
            }
        });
        assert!(!described.descriptor.diagnostics.has_errors());
        let output = described.expand();
        assert!(output.contains("map (Self :: to_dto)"), "{output}");
    }

    #[test]
    fn unsupported_signature_is_reported() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn broken(a: i32, b: i32, c: i32) -> i64;
                }
            }
        });
        assert_eq!(
            described.count(DiagnosticKind::UnsupportedMappingMethodSignature),
            1
        );
        assert_eq!(described.descriptor.user_mappings, vec![None]);
    }

    #[test]
    fn missing_strategy_reports_could_not_create_mapping() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn convert(value: uuid::Uuid) -> std::time::Duration;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::CouldNotCreateMapping), 1);
    }

    #[test]
    fn declared_method_prefers_implemented_method_with_same_signature() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Celsius { pub degrees: f64 }
                pub struct Fahrenheit { pub degrees: f64 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn convert(value: Celsius) -> Fahrenheit {
                        Fahrenheit { degrees: value.degrees * 1.8 + 32.0 }
                    }
                    pub fn to_fahrenheit(value: Celsius) -> Fahrenheit;
                }
            }
        });
        let Mapping::User(user) = described.delegate("to_fahrenheit") else {
            panic!("expected delegation to the implemented method");
        };
        assert_eq!(user.name(), "convert");
    }

    #[test]
    fn value_providers_are_collected_from_implemented_methods() {
        let mut model = TypeModel::default();
        let module = crate::mapper::parse::ModuleDef::from_item_mod(syn::parse_quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    fn now() -> i64 { 0 }
                    async fn later() -> i64 { 0 }
                    fn scaled(x: i64) -> i64 { x }
                }
            }
        })
        .unwrap();
        let mapper = module.mappers().next().unwrap();
        let configs = MapperConfigs::new(
            MappingConfiguration::from_mapper(&MapperArgs::default()),
            Vec::new()
        );
        let builder = DescriptorBuilder::new(&mut model, mapper, &configs);
        let candidates: Vec<_> = builder
            .providers
            .iter()
            .filter(|p| p.is_candidate())
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(candidates, vec!["now"]);
    }
}
