// Shared Kernel
// Cross-cutting concerns used by every module

pub mod errors; // Shared error types
pub mod utils; // Logging helpers

// Re-exports for convenience
pub use errors::{AppError, AppResult};
pub use utils::logger::init_logger;
