//! Core Components
//!
//! Request building, HTTP transport, handler dispatch and the clock.

pub mod clock;
pub mod dispatch;
pub mod request;
pub mod transport;

pub use clock::*;
pub use dispatch::*;
pub use request::*;
pub use transport::*;
