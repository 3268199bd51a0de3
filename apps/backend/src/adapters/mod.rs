//! Storage adapters behind [`crate::repos::rooms::RoomStore`].

pub mod rooms_mem;
pub mod rooms_sea;
