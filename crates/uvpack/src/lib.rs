//! # uvpack
//!
//! Drives an external UV island packing engine from a host mesh editor.
//!
//! This crate provides:
//! - **Core**: wire types, the engine seam, a threaded executor with
//!   progress relay and cancellation, island transform reconstruction
//! - **Bridge**: host mesh traits, UV extraction, write-back and the pack
//!   command
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uvpack::{PackArgs, PackCommand, NullMonitor};
//!
//! let args = PackArgs::from_json(r#"{"orient": false}"#)?;
//! let report = PackCommand::new(args).execute(&mut scene, engine, &mut NullMonitor)?;
//! println!("packed {} islands", report.islands_packed);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support for the core types

/// Wire types, engine seam, executor and transforms.
pub use uvpack_core as core;

/// Host traits, extraction, write-back and the pack command.
pub use uvpack_bridge as bridge;

// Re-export commonly used types at root level
pub use uvpack_bridge::{CommandSettings, MemoryScene, MeshScene, PackArgs, PackCommand, PackReport};
pub use uvpack_core::{
    Error, NullMonitor, PackEngine, PackParams, ProgressMonitor, Result, ResultCode,
};
