// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod profiles {
    pub struct Patch {
        pub name: Option<String>,
        pub age:  u8
    }

    pub struct Profile {
        pub id:   u64,
        pub name: String,
        pub age:  u8
    }

    pub struct ProfileMapper;

    #[mappings]
    impl ProfileMapper {
        pub fn apply(patch: Patch, target: &mut Profile);
    }
}

#[mapper]
mod shapes {
    pub struct Circle {
        pub radius: f64
    }

    pub struct Square {
        pub side: f64
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
        pub fn update(shape: Shape, target: &mut ShapeDto);
    }
}

use profiles::{Patch, Profile, ProfileMapper};
use shapes::{Circle, CircleDto, Shape, ShapeDto, ShapeMapper, Square, SquareDto};

fn main() {
    let mut profile = Profile {
        id:   7,
        name: "Grace".to_string(),
        age:  30
    };

    ProfileMapper::apply(
        Patch {
            name: None,
            age:  31
        },
        &mut profile
    );
    assert_eq!(profile.name, "Grace");
    assert_eq!(profile.age, 31);

    ProfileMapper::apply(
        Patch {
            name: Some("Ada".to_string()),
            age:  36
        },
        &mut profile
    );
    assert_eq!(profile.id, 7);
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.age, 36);

    let mut circle = ShapeDto::Circle(CircleDto {
        radius: 1.0
    });
    ShapeMapper::update(
        Shape::Circle(Circle {
            radius: 4.5
        }),
        &mut circle
    );
    assert!(matches!(circle, ShapeDto::Circle(ref dto) if dto.radius == 4.5));

    let mut square = ShapeDto::Square(SquareDto {
        side: 1.0
    });
    ShapeMapper::update(
        Shape::Square(Square {
            side: 3.0
        }),
        &mut square
    );
    assert!(matches!(square, ShapeDto::Square(ref dto) if dto.side == 3.0));
}
