// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Configured member values: constants and value providers.
//!
//! Constants are checked against the member type where the literal kind
//! makes that possible; anything else is emitted verbatim and left to the
//! compiler.

use proc_macro2::Span;
use quote::{ToTokens, quote};
use syn::{Lit, LitFloat, UnOp};

use crate::mapper::{
    descriptors::context::MappingBuilderContext,
    diagnostics::DiagnosticKind,
    emit::syntax::Expr,
    mappings::SourceValue,
    symbols::{Primitive, TypeId, TypeKind, model::normalize_tokens}
};

/// Why a constant does not fit its member.
enum ConstantError {
    /// Literal of the named kind cannot initialize the member type.
    Mismatch(&'static str),
    Unsupported(&'static str)
}

/// Value of `#[map_value(target = .., value = ..)]`.
///
/// `None` into a non-optional member is reported and replaced by
/// `Default::default()`, or a panic when the member has no default. Other
/// invalid constants return `None` after reporting.
pub fn constant_value(
    ctx: &mut MappingBuilderContext<'_, '_>,
    member: &str,
    target: TypeId,
    value: &syn::Expr,
    span: Span
) -> Option<SourceValue> {
    let model = ctx.model();
    let base = model.non_nullable(target);
    let nullable = base != target;

    if is_none(value) {
        if nullable {
            return Some(SourceValue::Constant(Expr::verbatim(
                quote! { ::std::option::Option::None }
            )));
        }
        ctx.report(DiagnosticKind::CannotMapValueNullToNonNullable, span, &[&member]);
        if ctx.model().has_default(target) {
            return Some(SourceValue::Default);
        }
        let message = format!("{member} was configured as None but is not optional");
        return Some(SourceValue::Constant(Expr::Panic(message)));
    }
    let inner = some_payload(value).filter(|_| nullable).unwrap_or(value);

    let checked = typed_constant(ctx, base, inner);
    let expr = reported(ctx, value, target, span, checked)?;
    if nullable {
        Some(SourceValue::Constant(expr.some()))
    } else {
        Some(SourceValue::Constant(expr))
    }
}

/// Check a discriminator constant against the type of the member it is
/// compared with.
///
/// Returns `false` after reporting when the constant can never match.
pub fn discriminator_fits(
    ctx: &mut MappingBuilderContext<'_, '_>,
    member: TypeId,
    value: &syn::Expr,
    span: Span
) -> bool {
    let base = ctx.model().non_nullable(member);
    let nullable = base != member;
    if nullable && is_none(value) {
        return true;
    }
    let inner = some_payload(value).filter(|_| nullable).unwrap_or(value);
    let checked = typed_constant(ctx, base, inner);
    reported(ctx, value, member, span, checked).is_some()
}

fn reported(
    ctx: &mut MappingBuilderContext<'_, '_>,
    value: &syn::Expr,
    target: TypeId,
    span: Span,
    checked: Result<Expr, ConstantError>
) -> Option<Expr> {
    match checked {
        Ok(expr) => Some(expr),
        Err(ConstantError::Mismatch(kind)) => {
            let (shown, ty) = (normalize_tokens(&value.to_token_stream()), ctx.display(target));
            ctx.report(DiagnosticKind::MapValueTypeMismatch, span, &[&shown, &kind, &ty]);
            None
        }
        Err(ConstantError::Unsupported(kind)) => {
            ctx.report(DiagnosticKind::MapValueUnsupportedType, span, &[&kind]);
            None
        }
    }
}

fn is_none(value: &syn::Expr) -> bool {
    matches!(value, syn::Expr::Path(path) if path.path.is_ident("None"))
}

/// `x` of `Some(x)`.
fn some_payload(value: &syn::Expr) -> Option<&syn::Expr> {
    let syn::Expr::Call(call) = value else {
        return None;
    };
    let syn::Expr::Path(func) = call.func.as_ref() else {
        return None;
    };
    match (func.path.is_ident("Some"), call.args.len()) {
        (true, 1) => call.args.first(),
        _ => None
    }
}

fn typed_constant(
    ctx: &MappingBuilderContext<'_, '_>,
    base: TypeId,
    value: &syn::Expr
) -> Result<Expr, ConstantError> {
    let model = ctx.model();
    let primitive = match model.kind(base) {
        TypeKind::Primitive(primitive) => Some(*primitive),
        _ => None
    };
    let verbatim = || Expr::verbatim(value.to_token_stream());

    match value {
        syn::Expr::Lit(lit) => literal(&lit.lit, primitive, model.kind(base), false),
        syn::Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match unary.expr.as_ref() {
            syn::Expr::Lit(lit) => literal(&lit.lit, primitive, model.kind(base), true)
                .map(|expr| Expr::verbatim(quote! { -#expr })),
            _ => Ok(verbatim())
        },
        syn::Expr::Array(_) | syn::Expr::Repeat(_) => Err(ConstantError::Unsupported("array")),
        syn::Expr::Tuple(_) => Err(ConstantError::Unsupported("tuple")),
        syn::Expr::Path(path) if path.path.segments.len() >= 2 => {
            let segments: Vec<_> = path.path.segments.iter().collect();
            let owner = segments[segments.len() - 2].ident.to_string();
            let variant = segments[segments.len() - 1].ident.to_string();
            let Some(declared) = model.declared(&owner) else {
                return Ok(verbatim());
            };
            let Some(decl) = model.enum_decl(declared) else {
                return Ok(verbatim());
            };
            if declared != base || decl.variant(&variant).is_none() {
                return Err(ConstantError::Mismatch("enum variant"));
            }
            Ok(verbatim())
        }
        _ => Ok(verbatim())
    }
}

fn literal(
    lit: &Lit,
    primitive: Option<Primitive>,
    kind: &TypeKind,
    negated: bool
) -> Result<Expr, ConstantError> {
    let signed = |p: Primitive| p.is_float() || (p.is_integer() && p.name().starts_with('i'));
    match lit {
        Lit::Int(int) => match primitive {
            Some(p) if negated && !signed(p) => Err(ConstantError::Mismatch("negative integer")),
            Some(p) if p.is_integer() && suffix_fits(int.suffix(), p) => {
                Ok(Expr::verbatim(int.to_token_stream()))
            }
            Some(p) if p.is_float() && int.suffix().is_empty() => {
                let float = LitFloat::new(&format!("{}.0", int.base10_digits()), int.span());
                Ok(Expr::verbatim(float.to_token_stream()))
            }
            _ => Err(ConstantError::Mismatch("integer"))
        },
        Lit::Float(float) => match primitive {
            Some(p) if p.is_float() && suffix_fits(float.suffix(), p) => {
                Ok(Expr::verbatim(float.to_token_stream()))
            }
            _ => Err(ConstantError::Mismatch("float"))
        },
        _ if negated => Err(ConstantError::Mismatch("negated literal")),
        Lit::Str(text) => match (primitive, kind) {
            (Some(Primitive::String), _) => Ok(Expr::call(
                quote! { ::std::string::String::from },
                vec![Expr::verbatim(text.to_token_stream())]
            )),
            (None, TypeKind::Ref(_)) => Ok(Expr::verbatim(text.to_token_stream())),
            _ => Err(ConstantError::Mismatch("string"))
        },
        Lit::Bool(flag) => match primitive {
            Some(Primitive::Bool) => Ok(Expr::verbatim(flag.to_token_stream())),
            _ => Err(ConstantError::Mismatch("bool"))
        },
        Lit::Char(ch) => match primitive {
            Some(Primitive::Char) => Ok(Expr::verbatim(ch.to_token_stream())),
            _ => Err(ConstantError::Mismatch("char"))
        },
        Lit::ByteStr(_) | Lit::CStr(_) => Err(ConstantError::Unsupported("byte string")),
        other => Ok(Expr::verbatim(other.to_token_stream()))
    }
}

fn suffix_fits(suffix: &str, primitive: Primitive) -> bool {
    suffix.is_empty() || suffix == primitive.name()
}

/// Value of `#[map_value(target = .., use_method = ..)]`.
///
/// The provider must be a parameterless, non-generic, non-async associated
/// function of the mapper returning the member type or its non-optional
/// form.
pub fn provided_value(
    ctx: &mut MappingBuilderContext<'_, '_>,
    name: &str,
    target: TypeId,
    span: Span
) -> Option<SourceValue> {
    let base = ctx.model().non_nullable(target);
    let candidates: Vec<_> = ctx
        .providers()
        .iter()
        .filter(|provider| provider.name == name && provider.is_candidate())
        .map(|provider| (provider.name.clone(), provider.return_type))
        .collect();
    if candidates.is_empty() {
        ctx.report(DiagnosticKind::MapValueReferencedMethodNotFound, span, &[&name]);
        return None;
    }
    for (method, returns) in &candidates {
        if *returns == Some(target) {
            return Some(SourceValue::MethodProvided {
                method:    method.clone(),
                wrap_some: false
            });
        }
        if base != target && *returns == Some(base) {
            return Some(SourceValue::MethodProvided {
                method:    method.clone(),
                wrap_some: true
            });
        }
    }
    let returns = candidates[0]
        .1
        .map_or_else(|| String::from("()"), |ty| ctx.display(ty));
    let ty = ctx.display(target);
    ctx.report(DiagnosticKind::MapValueMethodTypeMismatch, span, &[&name, &returns, &ty]);
    None
}
