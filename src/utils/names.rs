// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Scoped unique identifier allocation.
//!
//! Generated bodies introduce closure parameters, match bindings and loop
//! variables. Each of those must not shadow a name that is still visible, so
//! every allocation checks the requesting scope and all of its parents.
//!
//! Scopes live in an arena owned by [`UniqueNameBuilder`] and are addressed
//! by [`ScopeId`]. A child scope sees every name of its ancestors; siblings
//! never see each other, so two separate closures may both use `x`.
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`UniqueNameBuilder::reserve`] | mark a name as taken in one scope |
//! | [`UniqueNameBuilder::new_name`] | `name`, then `name1`, `name2`, ... |
//! | [`UniqueNameBuilder::new_scope`] | child scope linked to a parent |
//! | [`UniqueNameBuilder::new_for_enumeration`] | singular name for an element |

use convert_case::{Case, Casing};
use rustc_hash::FxHashSet;

use super::pluralizer::to_singular;

/// Words that cannot be used as binding names in generated code.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield"
];

const DEFAULT_ELEMENT_NAME: &str = "item";

/// Handle to a scope inside a [`UniqueNameBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    used:   FxHashSet<String>
}

/// Arena of nested naming scopes.
#[derive(Debug)]
pub struct UniqueNameBuilder {
    scopes: Vec<Scope>
}

impl Default for UniqueNameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueNameBuilder {
    /// Builder with a single root scope that already holds the keywords.
    #[must_use]
    pub fn new() -> Self {
        let root = Scope {
            parent: None,
            used:   KEYWORDS.iter().map(ToString::to_string).collect()
        };
        Self {
            scopes: vec![root]
        }
    }

    #[must_use]
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child of `parent`.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
            used:   FxHashSet::default()
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn reserve(&mut self, scope: ScopeId, name: impl Into<String>) {
        self.scopes[scope.0].used.insert(name.into());
    }

    /// Whether `name` is taken in `scope` or any ancestor.
    #[must_use]
    pub fn is_used(&self, scope: ScopeId, name: &str) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let entry = &self.scopes[id.0];
            if entry.used.contains(name) {
                return true;
            }
            current = entry.parent;
        }
        false
    }

    /// Allocate `name` or the first free `name1`, `name2`, ... in `scope`.
    pub fn new_name(&mut self, scope: ScopeId, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut suffix = 0usize;
        while self.is_used(scope, &candidate) {
            suffix += 1;
            candidate = format!("{name}{suffix}");
        }
        self.reserve(scope, candidate.clone());
        candidate
    }

    /// Allocate a name for one element of a collection called `source_name`.
    ///
    /// `orders` becomes `order`, `line_items` becomes `line_item`. Names
    /// without a plural form fall back to `item`.
    pub fn new_for_enumeration(&mut self, scope: ScopeId, source_name: Option<&str>) -> String {
        let singular = source_name
            .map(|name| name.to_case(Case::Snake))
            .and_then(|name| to_singular(&name))
            .filter(|name| !name.is_empty() && is_identifier(name));
        let base = singular.as_deref().unwrap_or(DEFAULT_ELEMENT_NAME);
        self.new_name(scope, base)
    }
}

/// Whether `name` is a plain ASCII identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
