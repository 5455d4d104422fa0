// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod shapes {
    pub struct Circle {
        pub radius: f32
    }

    pub struct Square {
        pub side: f32
    }

    pub struct CircleDto {
        pub radius: f64
    }

    pub struct SquareDto {
        pub side: f64
    }

    pub enum Shape {
        Circle(Circle),
        Square(Square)
    }

    pub enum ShapeDto {
        Circle(CircleDto),
        Square(SquareDto)
    }

    pub struct ShapeMapper;

    #[mappings]
    impl ShapeMapper {
        #[map_derived_type(source = Circle, target = CircleDto)]
        #[map_derived_type(source = Square, target = SquareDto)]
        pub fn to_dto(shape: Shape) -> ShapeDto;
    }
}

use shapes::{Circle, Shape, ShapeDto, ShapeMapper, Square};

fn main() {
    let circle = ShapeMapper::to_dto(Shape::Circle(Circle {
        radius: 1.5
    }));
    assert!(matches!(circle, ShapeDto::Circle(dto) if dto.radius == 1.5));

    let square = ShapeMapper::to_dto(Shape::Square(Square {
        side: 2.0
    }));
    assert!(matches!(square, ShapeDto::Square(dto) if dto.side == 2.0));
}
