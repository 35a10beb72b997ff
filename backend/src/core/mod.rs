//! Core time handling

pub mod time;
