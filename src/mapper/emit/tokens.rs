// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `ToTokens` for the generated expression tree.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use super::syntax::{Arm, Expr, Pat, Stmt};

/// Receivers and unary operands that must be wrapped in parentheses.
fn needs_parens(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Cast { .. }
            | Expr::Ref(_)
            | Expr::RefMut(_)
            | Expr::Deref(_)
            | Expr::Closure { .. }
            | Expr::Match { .. }
            | Expr::Eq(..)
            | Expr::IfChain { .. }
            | Expr::Block(_)
    )
}

struct Operand<'a>(&'a Expr);

impl ToTokens for Operand<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let inner = self.0;
        if needs_parens(inner) && !matches!(inner, Expr::Ref(_) | Expr::Deref(_)) {
            tokens.extend(quote! { (#inner) });
        } else {
            inner.to_tokens(tokens);
        }
    }
}

struct Receiver<'a>(&'a Expr);

impl ToTokens for Receiver<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self.0 {
            // Method calls and field access auto-deref.
            Expr::Deref(inner) if !needs_parens(inner) => inner.to_tokens(tokens),
            inner if needs_parens(inner) => tokens.extend(quote! { (#inner) }),
            inner => inner.to_tokens(tokens)
        }
    }
}

impl ToTokens for Expr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expanded = match self {
            Self::Ident(ident) => quote! { #ident },
            Self::Verbatim(verbatim) => verbatim.clone(),
            Self::Field {
                base,
                member
            } => {
                let base = Receiver(base);
                quote! { #base.#member }
            }
            Self::MethodCall {
                receiver,
                method,
                turbofish,
                args
            } => {
                let receiver = Receiver(receiver);
                match turbofish {
                    Some(turbofish) => quote! { #receiver.#method::<#turbofish>(#(#args),*) },
                    None => quote! { #receiver.#method(#(#args),*) }
                }
            }
            Self::Call {
                func,
                args
            } => quote! { #func(#(#args),*) },
            Self::Closure {
                param,
                body
            } => quote! { |#param| #body },
            Self::Struct {
                path,
                fields
            } => {
                let fields = fields.iter().map(|(member, value)| quote! { #member: #value });
                quote! { #path { #(#fields),* } }
            }
            Self::Tuple(elems) => quote! { (#(#elems),*) },
            Self::Ref(inner) => {
                let inner = Operand(inner);
                quote! { &#inner }
            }
            Self::RefMut(inner) => {
                let inner = Operand(inner);
                quote! { &mut #inner }
            }
            Self::Deref(inner) => {
                let inner = Operand(inner);
                quote! { *#inner }
            }
            Self::Cast {
                expr,
                ty
            } => {
                let expr = Operand(expr);
                quote! { #expr as #ty }
            }
            Self::Eq(left, right) => {
                let left = Operand(left);
                let right = Operand(right);
                quote! { #left == #right }
            }
            Self::Match {
                scrutinee,
                arms
            } => quote! { match #scrutinee { #(#arms)* } },
            Self::IfChain {
                branches,
                otherwise
            } => if_chain(branches, otherwise),
            Self::Block(stmts) => quote! { { #(#stmts)* } },
            Self::Panic(message) => quote! { ::std::panic!("{}", #message) }
        };
        tokens.extend(expanded);
    }
}

impl ToTokens for Arm {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let pat = &self.pat;
        let body = &self.body;
        let attr = self
            .allow_unreachable
            .then(|| quote! { #[allow(unreachable_patterns)] });
        let guard = self.guard.as_ref().map(|guard| quote! { if #guard });
        tokens.extend(quote! { #attr #pat #guard => #body, });
    }
}

impl ToTokens for Pat {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expanded = match self {
            Self::Wild => quote! { _ },
            Self::Ident(ident) => quote! { #ident },
            Self::Verbatim(verbatim) => verbatim.clone(),
            Self::TupleStruct {
                path,
                elems
            } => quote! { #path(#(#elems),*) },
            Self::Struct {
                path,
                fields,
                rest
            } => {
                let rest = rest.then(|| quote! { .. });
                if fields.is_empty() {
                    quote! { #path { #rest } }
                } else {
                    let fields = fields.iter().map(|(member, pat)| quote! { #member: #pat });
                    quote! { #path { #(#fields,)* #rest } }
                }
            }
            Self::Tuple(elems) => quote! { (#(#elems),*) }
        };
        tokens.extend(expanded);
    }
}

impl ToTokens for Stmt {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let expanded = match self {
            Self::Expr(expr @ (Expr::Match { .. } | Expr::Block(_) | Expr::IfChain { .. })) => {
                quote! { #expr }
            }
            Self::Expr(expr) => quote! { #expr; },
            Self::Assign {
                place,
                value
            } => quote! { #place = #value; },
            Self::IfLet {
                bindings,
                chained,
                then
            } => if_let(bindings, *chained, then)
        };
        tokens.extend(expanded);
    }
}

/// Branch bodies are always braced; blocks are not wrapped twice.
fn braced(body: &Expr) -> TokenStream {
    match body {
        Expr::Block(_) => quote! { #body },
        other => quote! { { #other } }
    }
}

fn if_chain(branches: &[(Expr, Expr)], otherwise: &Expr) -> TokenStream {
    let mut tokens = TokenStream::new();
    for (index, (condition, body)) in branches.iter().enumerate() {
        if index > 0 {
            tokens.extend(quote! { else });
        }
        let body = braced(body);
        tokens.extend(quote! { if #condition #body });
    }
    let otherwise = braced(otherwise);
    if branches.is_empty() {
        otherwise
    } else {
        quote! { #tokens else #otherwise }
    }
}

fn if_let(bindings: &[(Pat, Expr)], chained: bool, then: &[Stmt]) -> TokenStream {
    if chained {
        let mut conditions = TokenStream::new();
        for (index, (pat, value)) in bindings.iter().enumerate() {
            if index > 0 {
                conditions.extend(quote! { && });
            }
            conditions.extend(quote! { let #pat = #value });
        }
        return quote! { if #conditions { #(#then)* } };
    }
    match bindings.split_first() {
        Some(((pat, value), rest)) => {
            let inner = if_let(rest, false, then);
            quote! { if let #pat = #value { #inner } }
        }
        None => quote! { #(#then)* }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::quote;

    use super::*;

    fn render(tokens: &impl ToTokens) -> String {
        tokens.to_token_stream().to_string()
    }

    #[test]
    fn casts_are_parenthesized_as_receivers() {
        let expr = Expr::ident("x")
            .cast(quote! { i64 })
            .method("to_string", Vec::new());
        assert_eq!(render(&expr), "(x as i64) . to_string ()");
    }

    #[test]
    fn deref_receiver_relies_on_auto_deref() {
        let expr = Expr::ident("target")
            .deref()
            .method("extend", vec![Expr::ident("items")]);
        assert_eq!(render(&expr), "target . extend (items)");
    }

    #[test]
    fn chained_if_let_uses_let_chains() {
        let stmt = Stmt::IfLet {
            bindings: vec![
                (Pat::some(Pat::ident("a")), Expr::ident("x")),
                (Pat::some(Pat::ident("b")), Expr::ident("y"))
            ],
            chained:  true,
            then:     vec![Stmt::Expr(Expr::ident("z"))]
        };
        let expected = quote! {
            if let ::std::option::Option::Some(a) = x && let ::std::option::Option::Some(b) = y { z; }
        };
        assert_eq!(render(&stmt), expected.to_string());
    }

    #[test]
    fn unchained_if_let_nests() {
        let stmt = Stmt::IfLet {
            bindings: vec![
                (Pat::ident("a"), Expr::ident("x")),
                (Pat::ident("b"), Expr::ident("y"))
            ],
            chained:  false,
            then:     Vec::new()
        };
        let expected = quote! { if let a = x { if let b = y {} } };
        assert_eq!(render(&stmt), expected.to_string());
    }

    #[test]
    fn if_chain_ends_with_else_block() {
        let expr = Expr::if_chain(
            vec![(Expr::ident("a"), Expr::ident("x")), (Expr::ident("b"), Expr::ident("y"))],
            Expr::Panic("none".into())
        );
        let expected = quote! {
            if a { x } else if b { y } else { ::std::panic!("{}", "none") }
        };
        assert_eq!(render(&expr), expected.to_string());
    }

    #[test]
    fn unreachable_arm_carries_allow_attribute() {
        let arm = Arm::new(Pat::Wild, Expr::Panic("no mapping".into())).unreachable_allowed();
        let expected = quote! {
            #[allow(unreachable_patterns)] _ => ::std::panic!("{}", "no mapping"),
        };
        assert_eq!(render(&arm), expected.to_string());
    }
}
