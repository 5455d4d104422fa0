// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! User-facing diagnostics produced while resolving mappings.
//!
//! Resolution never aborts on the first problem. Builders report into a
//! [`Diagnostics`] sink and keep going so a single expansion shows every
//! broken member at once. At the end of the expansion errors become
//! `compile_error!` invocations spanned at the offending method or
//! attribute; warnings are kept for inspection but not emitted, since
//! stable proc macros cannot raise warnings.
//!
//! | Code | Kind | Severity |
//! |------|------|----------|
//! | OM001 | could not create mapping | error |
//! | OM002 | could not map member | error |
//! | OM003 | source member not found | error (warning for existing targets) |
//! | OM004 | source member not mapped | warning |
//! | OM005..OM006 | configured member not found | error |
//! | OM007..OM011 | constant and provided values | error |
//! | OM012..OM017 | derived types | error |
//! | OM018..OM021 | enums | error / warning |
//! | OM022..OM023 | signatures, nested targets | error |

use std::fmt::Display;

use proc_macro2::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    CouldNotCreateMapping,
    CouldNotMapMember,
    SourceMemberNotFound,
    SourceMemberNotMapped,
    ConfiguredMappingSourceMemberNotFound,
    ConfiguredMappingTargetMemberNotFound,
    CannotMapValueNullToNonNullable,
    MapValueTypeMismatch,
    MapValueUnsupportedType,
    MapValueReferencedMethodNotFound,
    MapValueMethodTypeMismatch,
    DerivedSourceTypeDuplicated,
    DerivedSourceTypeIsNotAssignableToParameterType,
    DerivedTargetTypeIsNotAssignableToReturnType,
    DerivedTypeDiscriminatorNotFound,
    DerivedTypeDiscriminatorMissing,
    DerivedSourceTypeRequired,
    EnumSourceValueNotMapped,
    EnumTargetValueNotMapped,
    EnumMappingStrategyByValueNotSupported,
    EnumConfiguredValueNotFound,
    UnsupportedMappingMethodSignature,
    NestedTargetMemberNotSupported
}

impl DiagnosticKind {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::CouldNotCreateMapping => "OM001",
            Self::CouldNotMapMember => "OM002",
            Self::SourceMemberNotFound => "OM003",
            Self::SourceMemberNotMapped => "OM004",
            Self::ConfiguredMappingSourceMemberNotFound => "OM005",
            Self::ConfiguredMappingTargetMemberNotFound => "OM006",
            Self::CannotMapValueNullToNonNullable => "OM007",
            Self::MapValueTypeMismatch => "OM008",
            Self::MapValueUnsupportedType => "OM009",
            Self::MapValueReferencedMethodNotFound => "OM010",
            Self::MapValueMethodTypeMismatch => "OM011",
            Self::DerivedSourceTypeDuplicated => "OM012",
            Self::DerivedSourceTypeIsNotAssignableToParameterType => "OM013",
            Self::DerivedTargetTypeIsNotAssignableToReturnType => "OM014",
            Self::DerivedTypeDiscriminatorNotFound => "OM015",
            Self::DerivedTypeDiscriminatorMissing => "OM016",
            Self::DerivedSourceTypeRequired => "OM017",
            Self::EnumSourceValueNotMapped => "OM018",
            Self::EnumTargetValueNotMapped => "OM019",
            Self::EnumMappingStrategyByValueNotSupported => "OM020",
            Self::EnumConfiguredValueNotFound => "OM021",
            Self::UnsupportedMappingMethodSignature => "OM022",
            Self::NestedTargetMemberNotSupported => "OM023"
        }
    }

    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::SourceMemberNotMapped | Self::EnumTargetValueNotMapped => Severity::Warning,
            _ => Severity::Error
        }
    }

    /// Message template; `{0}`, `{1}`, ... are replaced by the arguments.
    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::CouldNotCreateMapping => "could not create mapping from `{0}` to `{1}`",
            Self::CouldNotMapMember => {
                "could not map member `{0}` of type `{1}` to member `{2}` of type `{3}`"
            }
            Self::SourceMemberNotFound => {
                "no source member found for target member `{0}` of `{1}` in source `{2}`"
            }
            Self::SourceMemberNotMapped => {
                "source member `{0}` of `{1}` is not mapped to any target member"
            }
            Self::ConfiguredMappingSourceMemberNotFound => {
                "configured source member `{0}` was not found on `{1}`"
            }
            Self::ConfiguredMappingTargetMemberNotFound => {
                "configured target member `{0}` was not found on `{1}`"
            }
            Self::CannotMapValueNullToNonNullable => {
                "cannot assign `None` to non-nullable member `{0}`"
            }
            Self::MapValueTypeMismatch => {
                "cannot assign constant value `{0}` of type `{1}` to `{2}`"
            }
            Self::MapValueUnsupportedType => "constant values of kind `{0}` are not supported",
            Self::MapValueReferencedMethodNotFound => {
                "referenced value provider `{0}` was not found; expected a non-generic, non-async function without parameters that returns a value"
            }
            Self::MapValueMethodTypeMismatch => {
                "value provider `{0}` returns `{1}` which cannot be assigned to `{2}`"
            }
            Self::DerivedSourceTypeDuplicated => {
                "derived source type `{0}` is configured more than once"
            }
            Self::DerivedSourceTypeIsNotAssignableToParameterType => {
                "derived source type `{0}` is not a variant payload of parameter type `{1}`"
            }
            Self::DerivedTargetTypeIsNotAssignableToReturnType => {
                "derived target type `{0}` is not a variant payload of return type `{1}`"
            }
            Self::DerivedTypeDiscriminatorNotFound => {
                "discriminator member `{0}` was not found on `{1}`"
            }
            Self::DerivedTypeDiscriminatorMissing => {
                "derived type `{0}` declares a discriminator value but the mapping has no discriminator member"
            }
            Self::DerivedSourceTypeRequired => {
                "derived type mapping to `{0}` needs a `source` type or a discriminator `value`"
            }
            Self::EnumSourceValueNotMapped => {
                "enum variant `{0}` of `{1}` has no counterpart in `{2}`"
            }
            Self::EnumTargetValueNotMapped => {
                "enum variant `{0}` of `{1}` is never produced from `{2}`"
            }
            Self::EnumMappingStrategyByValueNotSupported => {
                "mapping `{0}` to `{1}` by value needs fieldless enums"
            }
            Self::EnumConfiguredValueNotFound => "`{0}` is not a variant of `{1}`",
            Self::UnsupportedMappingMethodSignature => {
                "unsupported mapping method signature for `{0}`; expected `fn(Source) -> Target` or `fn(Source, &mut Target)`"
            }
            Self::NestedTargetMemberNotSupported => {
                "nested target member `{0}` can only be configured for existing-target mappings"
            }
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind:     DiagnosticKind,
    pub severity: Severity,
    pub span:     Span,
    pub message:  String,
    pub help:     Option<String>
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, span: Span, args: &[&dyn Display]) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            span,
            message: format_template(kind.template(), args),
            help: None
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Rendered text including the code and help line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = format!("{} [{}]", self.message, self.kind.code());
        if let Some(help) = &self.help {
            text.push_str("\n  = help: ");
            text.push_str(help);
        }
        text
    }

    #[must_use]
    pub fn to_darling(&self) -> darling::Error {
        darling::Error::from(syn::Error::new(self.span, self.render()))
    }
}

fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut message = template.to_string();
    for (index, arg) in args.iter().enumerate() {
        message = message.replace(&format!("{{{index}}}"), &arg.to_string());
    }
    message
}

/// Ordered sink of diagnostics for one mapper.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = diagnostic.kind.code(),
            severity = ?diagnostic.severity,
            message = %diagnostic.message,
            "diagnostic reported"
        );
        self.items.push(diagnostic);
    }

    pub fn report(&mut self, kind: DiagnosticKind, span: Span, args: &[&dyn Display]) {
        self.push(Diagnostic::new(kind, span, args));
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn formats_positional_arguments() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::CouldNotCreateMapping,
            Span::call_site(),
            &[&"Car", &"CarDto"]
        );
        assert_eq!(diagnostic.message, "could not create mapping from `Car` to `CarDto`");
        assert!(diagnostic.is_error());
    }

    #[test]
    fn render_appends_code_and_help() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::SourceMemberNotFound,
            Span::call_site(),
            &[&"value", &"B", &"A"]
        )
        .with_help("add `#[map_ignore_target(\"value\")]`");
        assert_eq!(
            diagnostic.render(),
            "no source member found for target member `value` of `B` in source `A` [OM003]\n  = help: add `#[map_ignore_target(\"value\")]`"
        );
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.report(
            DiagnosticKind::SourceMemberNotMapped,
            Span::call_site(),
            &[&"id", &"A"]
        );
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.count(DiagnosticKind::SourceMemberNotMapped), 1);
    }

    #[test]
    fn codes_are_unique() {
        use DiagnosticKind::*;

        let kinds = [
            CouldNotCreateMapping,
            CouldNotMapMember,
            SourceMemberNotFound,
            SourceMemberNotMapped,
            ConfiguredMappingSourceMemberNotFound,
            ConfiguredMappingTargetMemberNotFound,
            CannotMapValueNullToNonNullable,
            MapValueTypeMismatch,
            MapValueUnsupportedType,
            MapValueReferencedMethodNotFound,
            MapValueMethodTypeMismatch,
            DerivedSourceTypeDuplicated,
            DerivedSourceTypeIsNotAssignableToParameterType,
            DerivedTargetTypeIsNotAssignableToReturnType,
            DerivedTypeDiscriminatorNotFound,
            DerivedTypeDiscriminatorMissing,
            DerivedSourceTypeRequired,
            EnumSourceValueNotMapped,
            EnumTargetValueNotMapped,
            EnumMappingStrategyByValueNotSupported,
            EnumConfiguredValueNotFound,
            UnsupportedMappingMethodSignature,
            NestedTargetMemberNotSupported
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }
}
