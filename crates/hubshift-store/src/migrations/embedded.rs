//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_users_and_shifts",
            sql: include_str!("../../migrations/001_users_and_shifts.sql"),
        },
        Migration {
            id: "002_marketplace",
            sql: include_str!("../../migrations/002_marketplace.sql"),
        },
        Migration {
            id: "003_strikes",
            sql: include_str!("../../migrations/003_strikes.sql"),
        },
    ]
}
