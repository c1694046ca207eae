//! Domain services: stores, the draw engine and supporting pieces.

pub mod auth;
pub mod draw;
pub mod draw_log;
pub mod export;
pub mod participants;
pub mod session;
pub mod settings;
pub mod store;
