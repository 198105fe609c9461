//! Terminal DOOM runner.
//!
//! Integration glue between the embedded doomgeneric engine, the terminal,
//! the keyboard/mouse, durable save storage, and the external audio
//! player. The loop runs at the engine's native ~35 Hz: drain input into
//! the engine, advance one frame, blit pixels into terminal cells, draw,
//! and reconcile saves on an interval.

use std::cell::Cell;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use log::{debug, info};

use tui_doom::audio::AudioRegistry;
use tui_doom::cli;
use tui_doom::dlog;
use tui_doom::engine::{EngineHooks, LoadError, WasmAdapter};
use tui_doom::input::{map_mouse_button, should_quit, KeyBridge, MouseTurn};
use tui_doom::saves;
use tui_doom::term::{blit, FrameBuffer, TerminalRenderer};
use tui_doom::types::{RgbaFrame, SAVE_SYNC_INTERVAL_MS, TICK_MS};

/// Callbacks handed to the engine: audio delegates to the player registry,
/// quit raises a flag the tick loop checks.
struct HostHooks {
    audio: AudioRegistry,
    quit: Rc<Cell<bool>>,
}

impl EngineHooks for HostHooks {
    fn init_audio(&mut self) {
        self.audio.init_audio();
    }

    fn shutdown_audio(&mut self) {
        self.audio.shutdown_audio();
    }

    fn play_sound(&mut self, name: &str, volume: u8) {
        self.audio.play_sound(name, volume);
    }

    fn play_music(&mut self, name: &str, looping: bool) {
        self.audio.play_music(name, looping);
    }

    fn stop_music(&mut self) {
        self.audio.stop_music();
    }

    fn set_music_volume(&mut self, volume: u8) {
        self.audio.set_music_volume(volume);
    }

    fn request_quit(&mut self) {
        self.quit.set(true);
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match cli::parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            cli::print_usage();
            return ExitCode::from(2);
        }
    };
    if opts.show_help {
        cli::print_usage();
        return ExitCode::SUCCESS;
    }

    let save_dir = match saves::resolve_save_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: cannot create save directory: {e}");
            return ExitCode::FAILURE;
        }
    };
    dlog::init(&save_dir);

    match run(&opts, &save_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &cli::CliOptions, save_dir: &Path) -> Result<()> {
    let preloaded = saves::preload(save_dir);
    info!(
        "starting: wad {:?}, {} preloaded save slot(s)",
        opts.wad,
        preloaded.len()
    );

    let quit = Rc::new(Cell::new(false));
    let hooks = HostHooks {
        audio: AudioRegistry::new(save_dir),
        quit: Rc::clone(&quit),
    };
    let mut adapter = WasmAdapter::load(&opts.wasm, &opts.wad, &preloaded, Box::new(hooks))?;

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = play(&mut adapter, &mut term, save_dir, &quit);
    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn play(
    adapter: &mut WasmAdapter,
    term: &mut TerminalRenderer,
    save_dir: &Path,
    quit: &Rc<Cell<bool>>,
) -> Result<()> {
    let mut bridge = KeyBridge::new();
    let mut mouse = MouseTurn::new();
    let mut frame = RgbaFrame::new();

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(cols, rows);

    let tick_duration = Duration::from_millis(TICK_MS);
    let sync_interval = Duration::from_millis(SAVE_SYNC_INTERVAL_MS);
    let mut last_tick = Instant::now();
    let mut last_sync = Instant::now();

    while !quit.get() {
        // Input with timeout until the next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(&key) {
                        break;
                    }
                    for ev in bridge.on_key(&key, now) {
                        adapter.push_key(ev.pressed, ev.code);
                    }
                }
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        for ev in mouse.on_move(m.column, now) {
                            adapter.push_key(ev.pressed, ev.code);
                        }
                    }
                    MouseEventKind::Down(button) => {
                        if let Some(code) = map_mouse_button(button) {
                            adapter.push_key(true, code);
                        }
                    }
                    MouseEventKind::Up(button) => {
                        if let Some(code) = map_mouse_button(button) {
                            adapter.push_key(false, code);
                        }
                    }
                    _ => {}
                },
                Event::Resize(w, h) => {
                    fb.resize(w, h);
                    term.invalidate();
                }
                _ => {}
            }
        }

        // Tick: releases first, then advance, read, blit, draw.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let now = last_tick;

            for ev in bridge.update(now) {
                adapter.push_key(ev.pressed, ev.code);
            }
            if let Some(ev) = mouse.update(now) {
                adapter.push_key(ev.pressed, ev.code);
            }

            adapter.tick();
            adapter.read_frame_into(&mut frame);
            blit(&frame, &mut fb);
            term.draw_swap(&mut fb)?;

            if last_sync.elapsed() >= sync_interval {
                last_sync = Instant::now();
                if let Some(vfs) = adapter.fs() {
                    let report = saves::sync(vfs, save_dir);
                    if !report.synced.is_empty() {
                        debug!("periodic sync wrote slots {:?}", report.synced);
                    }
                }
            }
        }
    }

    // Shutdown: release anything still held, deliver it, then one final
    // save reconciliation before the engine goes away.
    for ev in bridge.drain() {
        adapter.push_key(ev.pressed, ev.code);
    }
    if let Some(ev) = mouse.drain() {
        adapter.push_key(ev.pressed, ev.code);
    }
    adapter.tick();

    if let Some(vfs) = adapter.fs() {
        let report = saves::sync(vfs, save_dir);
        debug!("final sync wrote slots {:?}", report.synced);
    }
    adapter.shutdown();
    Ok(())
}

fn report_failure(e: &anyhow::Error) {
    eprintln!("error: {e:#}");
    if let Some(load) = e.downcast_ref::<LoadError>() {
        eprintln!();
        match load {
            LoadError::Wad { path, .. } => {
                eprintln!("Could not load the WAD file {path:?}.");
                eprintln!("The shareware episode is freely available as doom1.wad;");
                eprintln!("point --wad at it or place it in the current directory.");
            }
            LoadError::Engine(_) => {
                eprintln!("The engine module could not be started. Make sure doom.wasm");
                eprintln!("is present (or set DOOM_WASM to its location).");
            }
        }
    }
}
