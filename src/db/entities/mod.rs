//! Database entities

pub mod screams;
