pub mod layout;
pub mod manifest;
pub mod network_config;
pub mod tools;
