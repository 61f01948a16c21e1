//! Command implementations for the `edsar` binary.

pub mod commands;
