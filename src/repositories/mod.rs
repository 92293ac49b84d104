// src/repositories/mod.rs
//! Store access for users and events. Every value is bound, never interpolated.

pub mod events;
pub mod users;
