//! Repository layer for the menu service.
//!
//! All database access goes through repository types so handlers stay
//! free of SQL.

pub mod drinks;

pub use drinks::DrinksRepository;
