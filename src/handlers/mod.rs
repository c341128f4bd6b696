pub mod auth;
pub mod journal;
pub mod products;
pub mod profile;
pub mod sales;
pub mod stores;
pub mod uploads;
pub mod warehouses;
pub mod withdrawals;
