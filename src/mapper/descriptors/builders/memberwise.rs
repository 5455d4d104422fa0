// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Member-by-member mapping between declared structs.
//!
//! Each target member takes its value from the first rule that applies:
//!
//! | Rule | Source |
//! |------|--------|
//! | `#[map_ignore_target]` | `Default::default()` |
//! | `#[map_value]` | constant or value provider |
//! | `#[map_property]` | configured source path |
//! | automatic | member of the same name, or a flattened `a_b` path |
//!
//! When several target members read overlapping source paths, every read
//! but the last one clones, so no member is moved twice. Existing targets
//! are updated in place and may configure nested target paths.

use proc_macro2::Span;

use super::{
    Built, MappingBuilder,
    source_value::{constant_value, provided_value}
};
use crate::mapper::{
    config::{MemberValue, MembersMappingConfiguration},
    descriptors::{BuildFailure, context::MappingBuilderContext},
    diagnostics::{Diagnostic, DiagnosticKind, Severity},
    mappings::{
        ExistingMemberAssignment, ExistingMemberwiseMapping, Mapping, MemberAssignment,
        MemberwiseMapping, NullHandling, SourceValue
    },
    symbols::{Member, MemberPath, TypeId}
};

pub struct MemberwiseBuilder;

impl MappingBuilder for MemberwiseBuilder {
    fn name(&self) -> &'static str {
        "memberwise"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let source_base = model.referent(source).unwrap_or(source);
        let Some(source_members) = model.struct_decl(source_base).map(|d| d.members.clone())
        else {
            return Built::Declined;
        };
        let Some(target_members) = model.struct_decl(target).map(|d| d.members.clone()) else {
            return Built::Declined;
        };
        let shape = Shape {
            source_base,
            source_members,
            target_members
        };
        if ctx.is_existing() {
            existing_target(ctx, &shape)
        } else {
            new_instance(ctx, &shape)
        }
    }
}

struct Shape {
    source_base:    TypeId,
    source_members: Vec<Member>,
    target_members: Vec<Member>
}

/// Value of one target member before the borrow analysis.
enum Planned {
    Value(SourceValue),
    /// Read from the source; `member` is the target member receiving it.
    Read { path: MemberPath, member: Member }
}

fn new_instance(ctx: &mut MappingBuilderContext<'_, '_>, shape: &Shape) -> Built {
    let members = &ctx.config().members;
    let target = ctx.target();
    let mut failed = false;

    for (path, span) in configured_targets(members) {
        let joined = path.join(".");
        if path.len() > 1 {
            ctx.report(DiagnosticKind::NestedTargetMemberNotSupported, span, &[&joined]);
            failed = true;
        } else if !shape.target_members.iter().any(|m| path.first() == Some(&m.name)) {
            let owner = ctx.display(target);
            ctx.report(DiagnosticKind::ConfiguredMappingTargetMemberNotFound, span, &[
                &joined, &owner
            ]);
            failed = true;
        }
    }

    let mut planned = Vec::with_capacity(shape.target_members.len());
    for member in &shape.target_members {
        let name = member.name.as_str();
        let plan = if members.is_target_ignored(name) {
            Some(Planned::Value(SourceValue::Default))
        } else if let Some(entry) = members.values.iter().find(|v| v.target == [name]) {
            configured_value(ctx, member, &entry.value, entry.span).map(Planned::Value)
        } else if let Some(entry) = members.explicit.iter().find(|e| e.target == [name]) {
            configured_path(ctx, shape.source_base, &entry.source, entry.span).map(|path| {
                Planned::Read {
                    path,
                    member: member.clone()
                }
            })
        } else {
            match automatic_path(ctx, members, shape.source_base, name) {
                Some(path) => Some(Planned::Read {
                    path,
                    member: member.clone()
                }),
                None => {
                    let diagnostic = missing_source(ctx, name);
                    ctx.push(diagnostic);
                    None
                }
            }
        };
        match plan {
            Some(plan) => planned.push((member.member.clone(), plan)),
            None => failed = true
        }
    }

    let Some(values) = resolve_reads(ctx, shape, planned, false) else {
        return Built::Failed;
    };
    if failed {
        return Built::Failed;
    }
    let assignments = values
        .into_iter()
        .map(|(member, value)| MemberAssignment {
            member,
            value
        })
        .collect();
    Built::Mapping(Mapping::Memberwise(MemberwiseMapping::new(
        ctx.source(),
        target,
        assignments
    )))
}

fn existing_target(ctx: &mut MappingBuilderContext<'_, '_>, shape: &Shape) -> Built {
    let members = &ctx.config().members;
    let target = ctx.target();
    let mut failed = false;
    let mut planned = Vec::new();

    for (path, span) in configured_targets(members) {
        if MemberPath::resolve(ctx.model(), target, path).is_none() {
            let (joined, owner) = (path.join("."), ctx.display(target));
            ctx.report(DiagnosticKind::ConfiguredMappingTargetMemberNotFound, span, &[
                &joined, &owner
            ]);
            failed = true;
        }
    }

    for member in &shape.target_members {
        let name = member.name.as_str();
        if members.is_target_ignored(name) {
            continue;
        }
        if configured_targets(members).any(|(path, _)| path.first() == Some(&member.name)) {
            continue;
        }
        let Some(target_path) = MemberPath::resolve(ctx.model(), target, &[member.name.clone()])
        else {
            continue;
        };
        match automatic_path(ctx, members, shape.source_base, name) {
            Some(path) => planned.push((target_path, Planned::Read {
                path,
                member: member.clone()
            })),
            None => {
                let diagnostic = missing_source(ctx, name).with_severity(Severity::Warning);
                ctx.push(diagnostic);
            }
        }
    }

    for entry in &members.values {
        let Some(target_path) = MemberPath::resolve(ctx.model(), target, &entry.target) else {
            continue;
        };
        let leaf = target_path.leaf().clone();
        match configured_value(ctx, &leaf, &entry.value, entry.span) {
            Some(value) => planned.push((target_path, Planned::Value(value))),
            None => failed = true
        }
    }
    for entry in &members.explicit {
        let Some(target_path) = MemberPath::resolve(ctx.model(), target, &entry.target) else {
            continue;
        };
        match configured_path(ctx, shape.source_base, &entry.source, entry.span) {
            Some(path) => {
                let member = target_path.leaf().clone();
                planned.push((target_path, Planned::Read {
                    path,
                    member
                }));
            }
            None => failed = true
        }
    }

    let Some(values) = resolve_reads(ctx, shape, planned, true) else {
        return Built::Failed;
    };
    if failed {
        return Built::Failed;
    }
    let assignments = values
        .into_iter()
        .map(|(target, value)| ExistingMemberAssignment {
            target,
            value
        })
        .collect();
    Built::Mapping(Mapping::ExistingMemberwise(ExistingMemberwiseMapping::new(
        ctx.source(),
        target,
        assignments
    )))
}

/// Target paths named by `#[map_value]` and `#[map_property]`.
fn configured_targets(
    members: &MembersMappingConfiguration
) -> impl Iterator<Item = (&[String], Span)> + '_ {
    members
        .values
        .iter()
        .map(|v| (v.target.as_slice(), v.span))
        .chain(members.explicit.iter().map(|e| (e.target.as_slice(), e.span)))
}

fn configured_value(
    ctx: &mut MappingBuilderContext<'_, '_>,
    member: &Member,
    value: &MemberValue,
    span: Span
) -> Option<SourceValue> {
    match value {
        MemberValue::Constant(expr) => constant_value(ctx, &member.name, member.ty, expr, span),
        MemberValue::Method(method) => provided_value(ctx, method, member.ty, span)
    }
}

fn configured_path(
    ctx: &mut MappingBuilderContext<'_, '_>,
    source_base: TypeId,
    names: &[String],
    span: Span
) -> Option<MemberPath> {
    let path = MemberPath::resolve(ctx.model(), source_base, names);
    if path.is_none() {
        let (joined, owner) = (names.join("."), ctx.display(source_base));
        ctx.report(DiagnosticKind::ConfiguredMappingSourceMemberNotFound, span, &[
            &joined, &owner
        ]);
    }
    path
}

fn automatic_path(
    ctx: &MappingBuilderContext<'_, '_>,
    members: &MembersMappingConfiguration,
    source_base: TypeId,
    name: &str
) -> Option<MemberPath> {
    MemberPath::find(ctx.model(), source_base, name)
        .filter(|path| !members.is_source_ignored(path.root_name()))
}

fn missing_source(ctx: &MappingBuilderContext<'_, '_>, name: &str) -> Diagnostic {
    let (target, source) = (ctx.display(ctx.target()), ctx.display(ctx.source()));
    Diagnostic::new(DiagnosticKind::SourceMemberNotFound, ctx.span(), &[
        &name, &target, &source
    ])
    .with_help(format!("add `#[map_ignore_target(\"{name}\")]` to ignore it"))
}

/// Turn planned reads into mapped values.
///
/// A path is borrowed when a later read shares its prefix, and everything
/// is borrowed when the source itself is. Source members read by no target member
/// are reported as unmapped. Returns `None` when a member could not be
/// converted.
fn resolve_reads<T>(
    ctx: &mut MappingBuilderContext<'_, '_>,
    shape: &Shape,
    planned: Vec<(T, Planned)>,
    existing: bool
) -> Option<Vec<(T, SourceValue)>> {
    let source_borrowed = ctx.model().referent(ctx.source()).is_some();
    let reads: Vec<&MemberPath> = planned
        .iter()
        .filter_map(|(_, plan)| match plan {
            Planned::Read {
                path, ..
            } => Some(path),
            Planned::Value(_) => None
        })
        .collect();
    let borrowed: Vec<bool> = reads
        .iter()
        .enumerate()
        .map(|(index, path)| {
            source_borrowed
                || reads
                    .iter()
                    .enumerate()
                    .any(|(other, candidate)| other > index && overlaps(path, candidate))
        })
        .collect();

    let members = &ctx.config().members;
    for member in &shape.source_members {
        let used = reads.iter().any(|path| path.root_name() == member.name);
        if !used && !members.is_source_ignored(&member.name) {
            let owner = ctx.display(shape.source_base);
            ctx.report(DiagnosticKind::SourceMemberNotMapped, ctx.span(), &[
                &member.name,
                &owner
            ]);
        }
    }

    let mut failed = false;
    let mut values = Vec::with_capacity(planned.len());
    let mut borrowed = borrowed.into_iter();
    for (target, plan) in planned {
        match plan {
            Planned::Value(value) => values.push((target, value)),
            Planned::Read {
                path,
                member
            } => {
                let borrow = borrowed.next().unwrap_or(source_borrowed);
                match mapped_value(ctx, shape, path, borrow, &member, existing) {
                    Some(value) => values.push((target, value)),
                    None => failed = true
                }
            }
        }
    }
    (!failed).then_some(values)
}

/// One path is a prefix of the other.
fn overlaps(a: &MemberPath, b: &MemberPath) -> bool {
    a.segments()
        .iter()
        .zip(b.segments())
        .all(|(x, y)| x.name == y.name)
}

fn mapped_value(
    ctx: &mut MappingBuilderContext<'_, '_>,
    shape: &Shape,
    path: MemberPath,
    borrowed: bool,
    member: &Member,
    existing: bool
) -> Option<SourceValue> {
    let value_ty = path.value_type(ctx.model_mut(), borrowed);
    let model = ctx.model();
    let mismatch = model.is_nullable(value_ty) && !model.is_nullable(member.ty);
    let (from, null) = if mismatch {
        let inner = model.non_nullable(value_ty);
        let null = if existing {
            NullHandling::SkipIfNone
        } else if ctx.config().throw_on_property_mapping_null_mismatch
            || !model.has_default(member.ty)
        {
            NullHandling::Unwrap(format!(
                "{}.{} is None and cannot be mapped to {}.{}",
                model.display(shape.source_base),
                path.full_name(),
                model.display(ctx.target()),
                member.name
            ))
        } else {
            NullHandling::UnwrapOrDefault
        };
        (inner, null)
    } else {
        (value_ty, NullHandling::None)
    };

    match ctx.find_or_build(from, member.ty) {
        Ok(mapping) => Some(SourceValue::Mapped {
            path,
            borrowed,
            mapping,
            null
        }),
        Err(BuildFailure::NoStrategy) => {
            let (source_name, source_ty) = (path.full_name(), ctx.display(from));
            let target_ty = ctx.display(member.ty);
            ctx.report(DiagnosticKind::CouldNotMapMember, ctx.span(), &[
                &source_name,
                &source_ty,
                &member.name,
                &target_ty
            ]);
            None
        }
        Err(BuildFailure::Reported) => None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quote::quote;

    use crate::mapper::{
        descriptors::fixture::Described, diagnostics::DiagnosticKind, parse::MapperArgs
    };

    #[test]
    fn members_are_matched_by_name_and_flattened() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Engine { pub power: u32 }
                pub struct Car { pub name: String, pub engine: Engine }
                pub struct CarDto { pub name: String, pub engine_power: u64 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(car: Car) -> CarDto;
                }
            }
        })
        .expand();
        assert!(output.contains("name : car . name"), "{output}");
        assert!(output.contains("engine_power : u64 :: from (car . engine . power)"), "{output}");
    }

    #[test]
    fn missing_source_member_is_one_error_with_help() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct A {}
                pub struct B { pub value: i32 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_b(a: A) -> B;
                }
            }
        });
        let errors = described.errors();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(described.count(DiagnosticKind::SourceMemberNotFound), 1);
        assert!(errors[0].contains("#[map_ignore_target(\"value\")]"), "{}", errors[0]);
    }

    #[test]
    fn unmapped_source_members_are_warnings() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct User { pub name: String, pub password: String }
                pub struct UserDto { pub name: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(user: User) -> UserDto;
                }
            }
        });
        assert!(described.errors().is_empty());
        assert_eq!(described.count(DiagnosticKind::SourceMemberNotMapped), 1);
    }

    #[test]
    fn configured_members_are_used() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct User { pub full_name: String, pub secret: String, pub age: u8 }
                pub struct UserDto {
                    pub name:  String,
                    pub note:  String,
                    pub age:   u8,
                    pub cache: Vec<u8>
                }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_property(source = "full_name", target = "name")]
                    #[map_value(target = "note", value = "none")]
                    #[map_ignore_source("secret")]
                    #[map_ignore_target("cache")]
                    pub fn to_dto(user: User) -> UserDto;
                }
            }
        })
        .expand();
        assert!(output.contains("name : user . full_name"), "{output}");
        assert!(
            output.contains("note : :: std :: string :: String :: from (\"none\")"),
            "{output}"
        );
        assert!(output.contains("cache : :: std :: default :: Default :: default ()"), "{output}");
    }

    #[test]
    fn null_constant_into_required_member_falls_back_to_default() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Source { pub id: u32 }
                pub struct Target { pub id: u32, pub label: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_value(target = "label", value = None)]
                    pub fn convert(source: Source) -> Target;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::CannotMapValueNullToNonNullable), 1);
        assert_eq!(described.errors().len(), 1);
        let output = described.expand();
        assert!(!output.contains("unimplemented"), "{output}");
        assert!(output.contains("id : source . id"), "{output}");
        assert!(output.contains("label : :: std :: default :: Default :: default ()"), "{output}");
    }

    #[test]
    fn null_constant_without_default_panics_at_run_time() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Source { pub id: u32 }
                pub struct Target { pub id: u32, pub owner: uuid::Uuid }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_value(target = "owner", value = None)]
                    pub fn convert(source: Source) -> Target;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::CannotMapValueNullToNonNullable), 1);
        let output = described.expand();
        assert!(!output.contains("unimplemented"), "{output}");
        assert!(output.contains("owner : :: std :: panic !"), "{output}");
    }

    #[test]
    fn value_providers_are_checked() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Source { pub id: u32 }
                pub struct Target {
                    pub id: u32,
                    pub created: Option<i64>,
                    pub label: String,
                    pub other: u8
                }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    fn now() -> i64 { 0 }

                    #[map_value(target = "created", use_method = "now")]
                    #[map_value(target = "label", use_method = "now")]
                    #[map_value(target = "other", use_method = "missing")]
                    pub fn convert(source: Source) -> Target;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::MapValueMethodTypeMismatch), 1);
        assert_eq!(described.count(DiagnosticKind::MapValueReferencedMethodNotFound), 1);
        assert_eq!(described.errors().len(), 2);
    }

    #[test]
    fn value_provider_result_is_wrapped_for_optional_members() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Source { pub id: u32 }
                pub struct Target { pub id: u32, pub created: Option<i64> }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    fn now() -> i64 { 0 }

                    #[map_value(target = "created", use_method = "now")]
                    pub fn convert(source: Source) -> Target;
                }
            }
        })
        .expand();
        assert!(output.contains("Some (Self :: now ())"), "{output}");
    }

    #[test]
    fn overlapping_paths_are_borrowed() {
        let output = Described::new(quote! {
            mod mapping {
                #[derive(Clone)]
                pub struct Address { pub city: String }
                pub struct Person { pub address: Address }
                pub struct PersonDto { pub address: Address, pub address_city: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(person: Person) -> PersonDto;
                }
            }
        })
        .expand();
        assert!(output.contains("address : person . address . clone ()"), "{output}");
        assert!(output.contains("address_city : person . address . city }"), "{output}");
    }

    #[test]
    fn nullable_members_unwrap_or_default_when_allowed() {
        let args = MapperArgs {
            throw_on_property_mapping_null_mismatch: false,
            ..MapperArgs::default()
        };
        let output = Described::with_args(
            quote! {
                mod mapping {
                    pub struct Source { pub name: Option<String> }
                    pub struct Target { pub name: String }
                    pub struct Mapper;

                    #[mappings]
                    impl Mapper {
                        pub fn convert(source: Source) -> Target;
                    }
                }
            },
            &args
        )
        .expand();
        assert!(output.contains("source . name . unwrap_or_default ()"), "{output}");
    }

    #[test]
    fn existing_targets_are_updated_in_place() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Patch { pub name: Option<String>, pub age: u8 }
                pub struct Profile { pub name: String, pub age: u8, pub id: u64 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn apply(patch: Patch, target: &mut Profile);
                }
            }
        });
        assert!(described.errors().is_empty(), "{:?}", described.errors());
        assert_eq!(described.count(DiagnosticKind::SourceMemberNotFound), 1);
        let output = described.expand();
        assert!(output.contains("Some (name) = patch . name"), "{output}");
        assert!(output.contains("target . age = patch . age ;"), "{output}");
    }

    #[test]
    fn nested_targets_need_an_existing_target() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Engine { pub power: u32 }
                pub struct Source { pub power: u32 }
                pub struct Car { pub engine: Engine }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_property(source = "power", target = "engine.power")]
                    pub fn build(source: Source) -> Car;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::NestedTargetMemberNotSupported), 1);
    }
}
