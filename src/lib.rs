pub mod android;
pub mod core;
