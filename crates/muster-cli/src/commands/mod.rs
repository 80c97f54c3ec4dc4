//! Command implementations.

pub mod extract;
pub mod fetch;
pub mod summary;

pub use self::extract::execute_extract;
pub use self::fetch::execute_fetch;
pub use self::summary::execute_summary;
