//! Engine adapter module - hosts the embedded doomgeneric WASM build.
//!
//! The embedded engine is an opaque capability: everything else in the
//! application reaches it through four narrow operations (push-key, tick,
//! read-framebuffer, private-filesystem access) owned by [`DoomAdapter`].
//! The adapter also wires the engine's outbound callbacks (audio, quit) to
//! host collaborators via [`EngineHooks`].
//!
//! # Module structure
//!
//! - [`vfs`]: the engine's private in-memory filesystem
//! - [`queue`]: bounded ring buffer for pending key events
//! - [`hooks`]: outbound callback surface exposed to the engine
//! - [`wasm`]: wasmtime-backed engine instance
//! - [`adapter`]: lifecycle owner and the four primitives

pub mod adapter;
pub mod error;
pub mod hooks;
pub mod queue;
pub mod vfs;
pub mod wasm;

pub use adapter::{DoomAdapter, EngineBackend, WasmAdapter};
pub use error::LoadError;
pub use hooks::{EngineHooks, NullHooks};
pub use queue::KeyQueue;
pub use vfs::{Stat, Vfs};
pub use wasm::WasmBackend;

/// Path the WAD is mounted at inside the private filesystem.
pub const WAD_MOUNT_PATH: &str = "/doom1.wad";

/// Directory the engine's saves land in inside the private filesystem.
pub const SAVE_VFS_DIR: &str = "/";
