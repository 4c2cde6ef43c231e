pub mod types;
pub mod envelope;

pub use types::*;
pub use envelope::*;
