//! Shared types for the board server: wire formats, caller identity,
//! capacity ceilings and page arithmetic.

pub mod api;
pub mod limits;
pub mod models;
pub mod pagination;
