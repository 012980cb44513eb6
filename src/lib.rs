//! regtool: address containers by their registrar service name

pub mod cli;
pub mod containers;
pub mod service;
