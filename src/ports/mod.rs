//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters in the
//! infrastructure layer.

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::AgentRepository;
