//! wasmtime-backed engine instance.
//!
//! The doomgeneric module is expected to export `doomgeneric_Create`,
//! `doomgeneric_Tick`, `DG_GetFrameBuffer`, `DG_PushKeyEvent`, `malloc`
//! and `memory`, and to import (module `env`) the host clock, the private
//! filesystem syscalls, the audio callbacks and the quit notification.

use std::time::Instant;

use log::warn;
use wasmtime::{Caller, Engine, Instance, Linker, Memory, Module, Store, TypedFunc};

use tui_doom_types::{RgbaFrame, DOOM_RES_X, DOOM_RES_Y};

use crate::adapter::EngineBackend;
use crate::error::LoadError;
use crate::hooks::EngineHooks;
use crate::vfs::Vfs;

/// Host-side state reachable from every imported function.
pub struct HostState {
    vfs: Vfs,
    hooks: Box<dyn EngineHooks>,
    started: Instant,
}

pub struct WasmBackend {
    store: Store<HostState>,
    memory: Memory,
    tick: TypedFunc<(), ()>,
    get_frame_buffer: TypedFunc<(), i32>,
    push_key_event: TypedFunc<(i32, i32), ()>,
}

impl WasmBackend {
    /// Instantiate the engine and run its startup routine.
    ///
    /// The VFS must already contain the WAD and any preloaded saves; the
    /// engine reads them during `doomgeneric_Create`.
    pub fn instantiate(
        wasm_bytes: &[u8],
        vfs: Vfs,
        hooks: Box<dyn EngineHooks>,
        argv: &[&str],
    ) -> Result<Self, LoadError> {
        let engine = Engine::default();
        let module = Module::new(&engine, wasm_bytes).map_err(engine_err)?;

        let mut store = Store::new(
            &engine,
            HostState {
                vfs,
                hooks,
                started: Instant::now(),
            },
        );

        let mut linker = Linker::<HostState>::new(&engine);
        link_host_imports(&mut linker).map_err(engine_err)?;

        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(engine_err)?;

        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| LoadError::Engine("module does not export memory".into()))?;
        let create = instance
            .get_typed_func::<(i32, i32), ()>(&mut store, "doomgeneric_Create")
            .map_err(engine_err)?;
        let tick = instance
            .get_typed_func::<(), ()>(&mut store, "doomgeneric_Tick")
            .map_err(engine_err)?;
        let get_frame_buffer = instance
            .get_typed_func::<(), i32>(&mut store, "DG_GetFrameBuffer")
            .map_err(engine_err)?;
        let push_key_event = instance
            .get_typed_func::<(i32, i32), ()>(&mut store, "DG_PushKeyEvent")
            .map_err(engine_err)?;

        let argv_ptr = write_argv(&mut store, &instance, memory, argv)?;
        create
            .call(&mut store, (argv.len() as i32, argv_ptr))
            .map_err(engine_err)?;

        Ok(Self {
            store,
            memory,
            tick,
            get_frame_buffer,
            push_key_event,
        })
    }
}

impl EngineBackend for WasmBackend {
    fn advance(&mut self) {
        if let Err(e) = self.tick.call(&mut self.store, ()) {
            warn!("engine tick trapped: {e}");
        }
    }

    fn read_frame_into(&mut self, frame: &mut RgbaFrame) {
        let ptr = match self.get_frame_buffer.call(&mut self.store, ()) {
            Ok(ptr) => ptr,
            Err(e) => {
                warn!("DG_GetFrameBuffer trapped: {e}");
                frame.clear();
                return;
            }
        };
        let bytes = guest_range(ptr, DOOM_RES_X * DOOM_RES_Y * 4)
            .and_then(|range| self.memory.data(&self.store).get(range));
        match bytes {
            Some(bytes) => frame.fill_from_argb_le_bytes(bytes),
            None => {
                warn!("framebuffer pointer {ptr:#x} out of bounds");
                frame.clear();
            }
        }
    }

    fn push_key_event(&mut self, event: tui_doom_types::KeyEvent) {
        let pressed = i32::from(event.pressed);
        if let Err(e) = self
            .push_key_event
            .call(&mut self.store, (pressed, event.code as i32))
        {
            warn!("DG_PushKeyEvent trapped: {e}");
        }
    }

    fn vfs(&self) -> &Vfs {
        &self.store.data().vfs
    }

    fn vfs_mut(&mut self) -> &mut Vfs {
        &mut self.store.data_mut().vfs
    }
}

fn engine_err(e: impl std::fmt::Display) -> LoadError {
    LoadError::Engine(e.to_string())
}

/// Copy argv into guest memory via the module's own allocator and return a
/// pointer to the NUL-terminated string array.
fn write_argv(
    store: &mut Store<HostState>,
    instance: &Instance,
    memory: Memory,
    argv: &[&str],
) -> Result<i32, LoadError> {
    let malloc = instance
        .get_typed_func::<i32, i32>(&mut *store, "malloc")
        .map_err(engine_err)?;

    let mut ptrs = Vec::with_capacity(argv.len());
    for arg in argv {
        let ptr = malloc
            .call(&mut *store, arg.len() as i32 + 1)
            .map_err(engine_err)?;
        memory
            .write(&mut *store, ptr as usize, arg.as_bytes())
            .map_err(engine_err)?;
        memory
            .write(&mut *store, ptr as usize + arg.len(), &[0])
            .map_err(engine_err)?;
        ptrs.push(ptr);
    }

    let array = malloc
        .call(&mut *store, (ptrs.len() as i32 + 1) * 4)
        .map_err(engine_err)?;
    for (i, ptr) in ptrs.iter().enumerate() {
        memory
            .write(&mut *store, array as usize + i * 4, &ptr.to_le_bytes())
            .map_err(engine_err)?;
    }
    memory
        .write(&mut *store, array as usize + ptrs.len() * 4, &[0; 4])
        .map_err(engine_err)?;

    Ok(array)
}

fn caller_memory(caller: &mut Caller<'_, HostState>) -> Option<Memory> {
    caller.get_export("memory")?.into_memory()
}

/// Byte range in guest memory. Guest pointers arrive as raw i32; negative
/// values and end-of-range overflow are both rejected here, before any
/// slice arithmetic.
fn guest_range(ptr: i32, len: usize) -> Option<std::ops::Range<usize>> {
    let start = usize::try_from(ptr).ok()?;
    let end = start.checked_add(len)?;
    Some(start..end)
}

fn guest_str(caller: &mut Caller<'_, HostState>, ptr: i32, len: i32) -> Option<String> {
    let memory = caller_memory(caller)?;
    let range = guest_range(ptr, usize::try_from(len).ok()?)?;
    let bytes = memory.data(&caller).get(range)?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

fn link_host_imports(linker: &mut Linker<HostState>) -> anyhow::Result<()> {
    linker.func_wrap("env", "host_get_ticks_ms", |caller: Caller<'_, HostState>| {
        caller.data().started.elapsed().as_millis() as i32
    })?;

    linker.func_wrap("env", "host_init_audio", |mut caller: Caller<'_, HostState>| {
        caller.data_mut().hooks.init_audio();
    })?;

    linker.func_wrap(
        "env",
        "host_shutdown_audio",
        |mut caller: Caller<'_, HostState>| {
            caller.data_mut().hooks.shutdown_audio();
        },
    )?;

    linker.func_wrap(
        "env",
        "host_play_sound",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32, volume: i32| {
            if let Some(name) = guest_str(&mut caller, ptr, len) {
                let volume = volume.clamp(0, 127) as u8;
                caller.data_mut().hooks.play_sound(&name, volume);
            }
        },
    )?;

    linker.func_wrap(
        "env",
        "host_play_music",
        |mut caller: Caller<'_, HostState>, ptr: i32, len: i32, looping: i32| {
            if let Some(name) = guest_str(&mut caller, ptr, len) {
                caller.data_mut().hooks.play_music(&name, looping != 0);
            }
        },
    )?;

    linker.func_wrap("env", "host_stop_music", |mut caller: Caller<'_, HostState>| {
        caller.data_mut().hooks.stop_music();
    })?;

    linker.func_wrap(
        "env",
        "host_set_music_volume",
        |mut caller: Caller<'_, HostState>, volume: i32| {
            let volume = volume.clamp(0, 127) as u8;
            caller.data_mut().hooks.set_music_volume(volume);
        },
    )?;

    linker.func_wrap("env", "host_quit", |mut caller: Caller<'_, HostState>| {
        caller.data_mut().hooks.request_quit();
    })?;

    linker.func_wrap(
        "env",
        "fs_size",
        |mut caller: Caller<'_, HostState>, path_ptr: i32, path_len: i32| -> i64 {
            let Some(path) = guest_str(&mut caller, path_ptr, path_len) else {
                return -1;
            };
            match caller.data().vfs.stat(&path) {
                Some(stat) if !stat.is_dir => stat.size as i64,
                _ => -1,
            }
        },
    )?;

    linker.func_wrap(
        "env",
        "fs_read",
        |mut caller: Caller<'_, HostState>,
         path_ptr: i32,
         path_len: i32,
         buf_ptr: i32,
         buf_len: i32|
         -> i32 {
            let Some(path) = guest_str(&mut caller, path_ptr, path_len) else {
                return -1;
            };
            let Some(memory) = caller_memory(&mut caller) else {
                return -1;
            };
            let Ok(buf_len) = usize::try_from(buf_len) else {
                return -1;
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            let Some(bytes) = state.vfs.read_file(&path) else {
                return -1;
            };
            let n = bytes.len().min(buf_len);
            let Some(dst) = guest_range(buf_ptr, n).and_then(|range| data.get_mut(range)) else {
                return -1;
            };
            dst.copy_from_slice(&bytes[..n]);
            n as i32
        },
    )?;

    linker.func_wrap(
        "env",
        "fs_write",
        |mut caller: Caller<'_, HostState>,
         path_ptr: i32,
         path_len: i32,
         buf_ptr: i32,
         len: i32|
         -> i32 {
            let Some(path) = guest_str(&mut caller, path_ptr, path_len) else {
                return -1;
            };
            let Some(memory) = caller_memory(&mut caller) else {
                return -1;
            };
            let Ok(byte_len) = usize::try_from(len) else {
                return -1;
            };
            let (data, state) = memory.data_and_store_mut(&mut caller);
            let Some(src) = guest_range(buf_ptr, byte_len).and_then(|range| data.get(range)) else {
                return -1;
            };
            if state.vfs.write_file(&path, src) {
                len
            } else {
                -1
            }
        },
    )?;

    Ok(())
}
