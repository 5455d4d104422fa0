// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT
#![allow(dead_code)]
use object_mapper::mapper;

#[mapper]
mod values {
    pub struct A {}

    pub struct B {
        pub value: i32
    }

    pub struct Mapper;

    #[mappings]
    impl Mapper {
        pub fn to_b(a: A) -> B;
    }
}

fn main() {}
