//! Watch recommendations from a language model, and a loop for checking how
//! well those predictions matched the viewer's real reactions.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AppError, AppResult};
