//! Route modules, one per surface area.

pub mod auth;
pub mod draw;
pub mod intake;
pub mod pages;
pub mod participants;
pub mod settings;
