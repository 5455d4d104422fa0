// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use object_mapper::mapper;

#[mapper]
mod accounts {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    pub struct Account {
        pub name:   String,
        pub secret: String
    }

    pub struct AccountDto {
        pub id:         Uuid,
        pub name:       String,
        pub status:     String,
        pub score:      f64,
        pub created_at: Option<DateTime<Utc>>,
        pub cache:      Vec<u8>
    }

    pub struct AccountMapper;

    #[mappings]
    impl AccountMapper {
        #[map_value(target = "id", use_method = "new_id")]
        #[map_value(target = "status", value = "active")]
        #[map_value(target = "score", value = 10)]
        #[map_value(target = "created_at", use_method = "now")]
        #[map_ignore_source("secret")]
        #[map_ignore_target("cache")]
        pub fn to_dto(account: Account) -> AccountDto;

        fn new_id() -> Uuid {
            Uuid::now_v7()
        }

        fn now() -> DateTime<Utc> {
            Utc::now()
        }
    }
}

use accounts::{Account, AccountMapper};

fn main() {
    let dto = AccountMapper::to_dto(Account {
        name:   "ops".to_string(),
        secret: "hunter2".to_string()
    });
    assert_eq!(dto.name, "ops");
    assert_eq!(dto.status, "active");
    assert_eq!(dto.score, 10.0);
    assert!(dto.created_at.is_some());
    assert!(dto.cache.is_empty());
    assert_eq!(dto.id.get_version_num(), 7);
}
