// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod colors {
    #[derive(Debug, PartialEq)]
    pub enum Color {
        Red,
        Green,
        Violet
    }

    #[derive(Debug, PartialEq)]
    pub enum Shade {
        Red,
        Green,
        Unknown
    }

    #[derive(Debug, PartialEq)]
    pub enum Status {
        Active,
        Disabled
    }

    #[derive(Debug, PartialEq)]
    pub enum StatusDto {
        ACTIVE,
        Off
    }

    pub struct ColorMapper;

    #[mappings]
    impl ColorMapper {
        #[map_enum(fallback = Shade::Unknown)]
        pub fn to_shade(color: Color) -> Shade;

        #[map_enum(ignore_case = true)]
        #[map_enum_value(source = Status::Disabled, target = StatusDto::Off)]
        pub fn to_status_dto(status: Status) -> StatusDto;

        pub fn color_name(color: Color) -> String;

        pub fn parse_color(name: String) -> Color;
    }
}

use colors::{Color, ColorMapper, Shade, Status, StatusDto};

fn main() {
    assert_eq!(ColorMapper::to_shade(Color::Green), Shade::Green);
    assert_eq!(ColorMapper::to_shade(Color::Violet), Shade::Unknown);

    assert_eq!(ColorMapper::to_status_dto(Status::Active), StatusDto::ACTIVE);
    assert_eq!(ColorMapper::to_status_dto(Status::Disabled), StatusDto::Off);

    assert_eq!(ColorMapper::color_name(Color::Red), "Red");
    assert_eq!(ColorMapper::parse_color("Violet".to_string()), Color::Violet);
}
