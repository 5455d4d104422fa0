// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT
#![allow(dead_code)]
use object_mapper::mapper;

#[mapper]
mod colors {
    pub enum Color {
        Red,
        Green
    }

    pub enum Shade {
        Red
    }

    pub struct ColorMapper;

    #[mappings]
    impl ColorMapper {
        pub fn to_shade(color: Color) -> Shade;
    }
}

fn main() {}
