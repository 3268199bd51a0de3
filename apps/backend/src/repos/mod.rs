//! Repository traits for the domain layer.

pub mod rooms;
