//! Lifecycle owner for the embedded engine.
//!
//! [`DoomAdapter`] is the sole holder of the engine capability. Every other
//! component goes through its narrow surface: `push_key`, `tick`,
//! `read_frame_into`, and private-filesystem access. All per-tick
//! operations degrade to no-ops before load and after shutdown so the hot
//! path never needs defensive error handling.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use tui_doom_types::{save_slot_file_name, KeyEvent, RgbaFrame};

use crate::error::LoadError;
use crate::hooks::EngineHooks;
use crate::queue::KeyQueue;
use crate::vfs::Vfs;
use crate::wasm::WasmBackend;
use crate::{SAVE_VFS_DIR, WAD_MOUNT_PATH};

/// The four primitives the adapter needs from an engine instance.
///
/// Production uses the wasmtime backend; tests substitute a fake.
pub trait EngineBackend {
    /// Advance the engine by exactly one logical frame.
    fn advance(&mut self);
    /// Copy the current frame into `frame`; never fails.
    fn read_frame_into(&mut self, frame: &mut RgbaFrame);
    /// Deliver one key event to the engine's input layer.
    fn push_key_event(&mut self, event: KeyEvent);
    fn vfs(&self) -> &Vfs;
    fn vfs_mut(&mut self) -> &mut Vfs;
}

pub struct DoomAdapter<B> {
    backend: Option<B>,
    queue: KeyQueue,
}

pub type WasmAdapter = DoomAdapter<WasmBackend>;

impl<B> std::fmt::Debug for DoomAdapter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoomAdapter")
            .field("loaded", &self.backend.is_some())
            .finish()
    }
}

impl<B: EngineBackend> DoomAdapter<B> {
    /// An adapter with no engine behind it; every operation is a no-op.
    pub fn uninitialized() -> Self {
        Self {
            backend: None,
            queue: KeyQueue::new(),
        }
    }

    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Some(backend),
            queue: KeyQueue::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.backend.is_some()
    }

    /// Advance one frame. Key events pushed before this call are delivered
    /// to this tick, in order; events pushed afterwards wait for the next.
    pub fn tick(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        while let Some(event) = self.queue.pop() {
            backend.push_key_event(event);
        }
        backend.advance();
    }

    /// Copy the current frame, or an all-black frame before initialization
    /// so a caller rendering a loading screen never needs a null check.
    pub fn read_frame_into(&mut self, frame: &mut RgbaFrame) {
        match self.backend.as_mut() {
            Some(backend) => backend.read_frame_into(frame),
            None => frame.clear(),
        }
    }

    /// Enqueue a key event; silently dropped when the ring is full or the
    /// engine is not loaded.
    pub fn push_key(&mut self, pressed: bool, code: u8) {
        if self.backend.is_none() {
            return;
        }
        self.queue.push(KeyEvent { pressed, code });
    }

    /// Private-filesystem access for the save reconciler.
    pub fn fs(&self) -> Option<&Vfs> {
        self.backend.as_ref().map(|b| b.vfs())
    }

    pub fn fs_mut(&mut self) -> Option<&mut Vfs> {
        self.backend.as_mut().map(|b| b.vfs_mut())
    }

    /// Drop the engine. Subsequent ticks and key pushes are no-ops, which
    /// keeps teardown races harmless.
    pub fn shutdown(&mut self) {
        self.backend = None;
    }
}

impl DoomAdapter<WasmBackend> {
    /// Read the WAD and engine module, pre-mount the WAD and any durable
    /// saves into the private filesystem, and run the engine's startup.
    pub fn load(
        wasm_path: &Path,
        wad_path: &Path,
        preloaded_saves: &BTreeMap<u8, Vec<u8>>,
        hooks: Box<dyn EngineHooks>,
    ) -> Result<Self, LoadError> {
        let wad = fs::read(wad_path).map_err(|source| LoadError::Wad {
            path: wad_path.to_path_buf(),
            source,
        })?;
        let wasm = fs::read(wasm_path).map_err(|e| {
            LoadError::Engine(format!("cannot read engine module {wasm_path:?}: {e}"))
        })?;

        let mut vfs = Vfs::new();
        vfs.create_file("/", WAD_MOUNT_PATH.trim_start_matches('/'), &wad);
        for (&slot, bytes) in preloaded_saves {
            let name = save_slot_file_name(slot);
            vfs.create_file(SAVE_VFS_DIR, &name, bytes);
            debug!("preloaded save slot {slot} ({} bytes)", bytes.len());
        }

        let argv = ["doomgeneric", "-iwad", WAD_MOUNT_PATH];
        let backend = WasmBackend::instantiate(&wasm, vfs, hooks, &argv)?;
        Ok(Self::with_backend(backend))
    }
}
