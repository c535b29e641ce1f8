// Core domain layer
pub mod assembler;
pub mod classifier;
pub mod css_pipeline;
pub mod interfaces;
pub mod models;
pub mod services;

pub use classifier::Route;
pub use interfaces::*;
pub use models::*;
pub use services::*;
