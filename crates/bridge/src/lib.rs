//! # uvpack bridge
//!
//! Host-facing half of the UV island packing bridge.
//!
//! - **Host traits**: [`MeshScene`], [`PolygonMesh`], [`EditableMesh`]
//! - **Extraction**: turns per-corner host UVs into the packer's
//!   deduplicated vertex/face graph
//! - **Write-back**: stores solved UVs on the originating corners
//! - **Command**: [`PackCommand`] ties extraction, the engine run and
//!   write-back together
//! - **In-memory host**: [`MemoryScene`] for headless use and tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uvpack_bridge::{MemoryMesh, MemoryScene, LayerFlags, PackArgs, PackCommand};
//! use uvpack_core::NullMonitor;
//!
//! let mut scene = MemoryScene::new()
//!     .with_layer(MemoryMesh::grid("Texture", 8, 8, 0.01), LayerFlags::ACTIVE_EDIT);
//! let report = PackCommand::new(PackArgs::default())
//!     .execute(&mut scene, engine, &mut NullMonitor)?;
//! ```

pub mod command;
pub mod extract;
pub mod host;
pub mod memory;
pub mod writeback;

// Re-exports
pub use command::{CommandSettings, PackArgs, PackCommand, PackReport, DEFAULT_UV_MAP};
pub use extract::{extract_mesh, extract_uvs, Corner, Extraction, ExtractionBuilder};
pub use host::{
    active_layers, editable_layers, EditableMesh, HostError, HostResult, LayerFlags, MapId,
    MeshScene, PointId, PolygonId, PolygonMesh,
};
pub use memory::{MemoryLayer, MemoryMesh, MemoryScene};
pub use uvpack_core::{Error, Result};
pub use writeback::{write_back, WriteBackStats};
