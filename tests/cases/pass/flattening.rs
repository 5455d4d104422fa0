// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod cars {
    pub struct Engine {
        pub power: u32
    }

    pub struct Car {
        pub name:   String,
        pub engine: Engine,
        pub tags:   Vec<String>
    }

    pub struct CarDto {
        pub name:         String,
        pub engine_power: u64,
        pub tags:         Vec<String>
    }

    pub struct CarMapper;

    #[mappings]
    impl CarMapper {
        pub fn to_dto(car: Car) -> CarDto;
    }
}

use cars::{Car, CarMapper, Engine};

fn main() {
    let car = Car {
        name:   "Roadster".to_string(),
        engine: Engine {
            power: 300
        },
        tags:   vec!["electric".to_string()]
    };

    let dto = CarMapper::to_dto(car);
    assert_eq!(dto.name, "Roadster");
    assert_eq!(dto.engine_power, 300u64);
    assert_eq!(dto.tags, vec!["electric".to_string()]);
}
