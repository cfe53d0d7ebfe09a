pub mod commands;
pub mod ports;
pub mod services;
