//! Configuration management for the pet
//!
//! - **startup**: PetConfig, the JSON record read once at launch

pub mod startup;

pub use startup::PetConfig;
