// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{Built, MappingBuilder};
use crate::mapper::descriptors::context::MappingBuilderContext;

/// Calls a mapper method with the exact signature.
pub struct UserMethodBuilder;

impl MappingBuilder for UserMethodBuilder {
    fn name(&self) -> &'static str {
        "user method"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        ctx.user_mapping(ctx.source(), ctx.target(), ctx.is_existing())
            .map_or(Built::Declined, Built::Delegate)
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use crate::mapper::descriptors::fixture::Described;

    #[test]
    fn nested_members_call_implemented_methods() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Money { pub cents: i64 }
                pub struct Order { pub total: Money }
                pub struct OrderDto { pub total: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(order: Order) -> OrderDto;
                    fn format_money(money: Money) -> String {
                        format!("{}.{:02}", money.cents / 100, money.cents % 100)
                    }
                }
            }
        });
        assert!(described.errors().is_empty(), "{:?}", described.errors());
        let output = described.expand();
        assert!(output.contains("Self :: format_money (order . total)"), "{output}");
    }

    #[test]
    fn declared_methods_call_each_other_for_nested_members() {
        let described = Described::new(quote! {
            mod mapping {
                pub struct Engine { pub power: u32 }
                pub struct EngineDto { pub power: u32 }
                pub struct Car { pub engine: Engine }
                pub struct CarDto { pub engine: EngineDto }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn car_to_dto(car: Car) -> CarDto;
                    pub fn engine_to_dto(engine: Engine) -> EngineDto;
                }
            }
        });
        assert!(described.errors().is_empty(), "{:?}", described.errors());
        let output = described.expand();
        assert!(output.contains("Self :: engine_to_dto (car . engine)"), "{output}");
    }
}
