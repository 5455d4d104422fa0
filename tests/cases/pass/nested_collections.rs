// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod orders {
    pub struct Line {
        pub sku:      String,
        pub quantity: u16
    }

    pub struct LineDto {
        pub sku:      String,
        pub quantity: u32
    }

    pub struct Customer {
        pub name: String
    }

    pub struct CustomerDto {
        pub name: String
    }

    pub struct Order {
        pub lines:    Vec<Line>,
        pub customer: Option<Customer>,
        pub note:     Option<String>
    }

    pub struct OrderDto {
        pub lines:    Vec<LineDto>,
        pub customer: Option<CustomerDto>,
        pub note:     String
    }

    pub struct OrderMapper;

    #[mappings]
    impl OrderMapper {
        pub fn to_dto(order: Order) -> OrderDto;
    }
}

use orders::{Customer, Line, Order, OrderMapper};

fn main() {
    let order = Order {
        lines:    vec![
            Line {
                sku:      "A-1".to_string(),
                quantity: 2
            },
            Line {
                sku:      "B-7".to_string(),
                quantity: 5
            },
        ],
        customer: Some(Customer {
            name: "Ada".to_string()
        }),
        note:     None
    };

    let dto = OrderMapper::to_dto(order);
    assert_eq!(dto.lines.len(), 2);
    assert_eq!(dto.lines[1].sku, "B-7");
    assert_eq!(dto.lines[1].quantity, 5u32);
    assert_eq!(dto.customer.map(|customer| customer.name), Some("Ada".to_string()));
    assert_eq!(dto.note, "");
}
