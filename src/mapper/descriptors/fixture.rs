// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved mapper built from a module token stream, for unit tests.

use proc_macro2::TokenStream;

use super::{MapperDescriptor, describe};
use crate::mapper::{
    diagnostics::DiagnosticKind,
    emit::emit_mapper,
    mappings::Mapping,
    parse::{MapperArgs, MapperDef, ModuleDef},
    symbols::TypeModel
};

pub struct Described {
    pub module:     ModuleDef,
    pub model:      TypeModel,
    pub descriptor: MapperDescriptor
}

impl Described {
    /// Resolve the first mapper of `tokens` with default arguments.
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_args(tokens, &MapperArgs::default())
    }

    pub fn with_args(tokens: TokenStream, args: &MapperArgs) -> Self {
        let item: syn::ItemMod = syn::parse2(tokens).expect("module");
        let module = ModuleDef::from_item_mod(item).expect("module definition");
        let mut model = TypeModel::from_items(&module.plain_items()).expect("type model");
        let mapper = module.mappers().next().expect("a #[mappings] impl");
        let descriptor = describe(&mut model, mapper, args);
        Self {
            module,
            model,
            descriptor
        }
    }

    pub fn mapper(&self) -> &MapperDef {
        self.module.mappers().next().expect("a #[mappings] impl")
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.descriptor.diagnostics.count(kind)
    }

    /// Error messages in report order.
    pub fn errors(&self) -> Vec<String> {
        self.descriptor
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .map(|d| d.render())
            .collect()
    }

    fn method_index(&self, name: &str) -> usize {
        self.mapper()
            .methods
            .iter()
            .position(|m| m.name() == name)
            .unwrap_or_else(|| panic!("no method `{name}`"))
    }

    /// Mapping a declared method's body resolved to.
    pub fn delegate(&self, name: &str) -> &Mapping {
        let index = self.method_index(name);
        let id = self.descriptor.user_mappings[index].expect("mapping method");
        let Mapping::User(user) = self.descriptor.registry.get(id) else {
            panic!("`{name}` is not a user mapping");
        };
        let delegate = user.delegate().expect("resolved body");
        self.descriptor.registry.get(delegate)
    }

    /// Generated impl block as a token string.
    pub fn expand(&self) -> String {
        emit_mapper(&self.model, self.mapper(), &self.descriptor).to_string()
    }
}
