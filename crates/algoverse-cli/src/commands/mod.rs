//! Command implementations.

pub mod extract;
pub mod make;

pub use self::extract::execute_extract;
pub use self::make::execute_make;
