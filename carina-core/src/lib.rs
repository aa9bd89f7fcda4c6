//! Carina Core
//!
//! Configuration values and declarative schemas shared by Carina providers

pub mod resource;
pub mod schema;
