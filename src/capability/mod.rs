//! Narrow interfaces over the host environment.
//!
//! The pipeline never touches a browser global, a filesystem or a wall clock
//! directly. Everything it needs from the outside world comes through one of
//! these traits, so a pipeline can be driven entirely by fakes.

pub mod clock;
pub mod page;
pub mod store;

pub use clock::*;
pub use page::*;
pub use store::*;
