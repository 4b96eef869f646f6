//! Error types for the classification pipeline.
//!
//! [`FoodError`] covers every fault that may leave a pipeline component:
//! unreadable uploads, model faults, configuration problems and I/O. Faults of
//! the external nutrition providers are a separate type
//! ([`crate::nutrition::ProviderError`]) because they are always recovered
//! inside the nutrition resolver and never reach callers.
//!
//! # Usage
//!
//! ```rust
//! use foodlens::core::errors::{FoodError, ProcessingStage};
//!
//! let error = FoodError::processing(
//!     ProcessingStage::Resize,
//!     "target size must be non-zero",
//!     std::io::Error::new(std::io::ErrorKind::InvalidInput, "zero width"),
//! );
//! assert!(error.to_string().contains("resize"));
//!
//! let contract = FoodError::invalid_input("category name must not be empty");
//! assert!(!contract.is_decode_error());
//! ```

pub mod constructors;
pub mod types;

pub use constructors::SimpleError;
pub use types::{FoodError, ProcessingStage};

/// Convenient result alias for pipeline operations.
pub type FoodResult<T> = Result<T, FoodError>;
