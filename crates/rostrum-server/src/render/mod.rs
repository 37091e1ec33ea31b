//! Render input management.
//!
//! - [`data`]: the snapshot type and loading from disk
//! - [`store`]: shared storage with lock-free reads and serialized updates
//! - [`factory`]: per-request renderer assembly

pub mod data;
pub mod factory;
pub mod store;

pub use data::{RenderData, RenderDataUpdate};
pub use factory::RendererFactory;
pub use store::RenderDataStore;
