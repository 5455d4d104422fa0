// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT
#![allow(dead_code)]
use object_mapper::mapper;

#[mapper]
mod shapes {
    pub struct Circle {
        pub radius: f64
    }

    pub struct CircleDto {
        pub radius: f64
    }

    pub enum Shape {
        Circle(Circle)
    }

    pub enum ShapeDto {
        Circle(CircleDto)
    }

    pub struct ShapeMapper;

    #[mappings]
    impl ShapeMapper {
        #[map_derived_type(source = Circle, target = CircleDto)]
        #[map_derived_type(source = Circle, target = CircleDto)]
        pub fn to_dto(shape: Shape) -> ShapeDto;
    }
}

fn main() {}
