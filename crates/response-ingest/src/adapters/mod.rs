//! Adapters Layer
//!
//! In-memory implementations of the outbound ports. The runtime binary
//! provides the filesystem and HTTP ones.

pub mod memory_store;
pub mod memory_transport;

pub use memory_store::{MemoryObjectStore, StoreOperation};
pub use memory_transport::MemoryTransport;
