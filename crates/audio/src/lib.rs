//! Audio playback via external player processes.
//!
//! The engine's audio callbacks are satisfied by spawning one short-lived
//! media-player process per sound effect and one long-lived process for
//! music. The registry owns every child handle it spawns: finished sound
//! players are reaped opportunistically, music is replaced on change, and
//! shutdown forcibly terminates whatever is still running. A spawn failure
//! means that one sound simply does not play; the game continues.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use log::{debug, warn};
use thiserror::Error;

use tui_doom_engine::EngineHooks;

/// Default player; overridable with `DOOM_AUDIO_PLAYER`.
const DEFAULT_PLAYER: &str = "ffplay";

#[derive(Debug, Error)]
#[error("failed to spawn audio player {player:?}: {source}")]
pub struct AudioSpawnError {
    player: String,
    #[source]
    source: std::io::Error,
}

/// Owns every audio child process for the lifetime of the audio subsystem.
pub struct AudioRegistry {
    player: String,
    assets_dir: PathBuf,
    sounds: Vec<Child>,
    music: Option<Child>,
    music_volume: u8,
    enabled: bool,
}

impl AudioRegistry {
    /// Registry using the `DOOM_AUDIO_PLAYER` override or the default
    /// player, with assets under `{base}/sounds` and `{base}/music`.
    pub fn new(base_dir: &Path) -> Self {
        let player = std::env::var("DOOM_AUDIO_PLAYER")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER.to_string());
        Self::with_player(&player, base_dir)
    }

    pub fn with_player(player: &str, base_dir: &Path) -> Self {
        Self {
            player: player.to_string(),
            assets_dir: base_dir.to_path_buf(),
            sounds: Vec::new(),
            music: None,
            music_volume: 127,
            enabled: false,
        }
    }

    pub fn active_sounds(&self) -> usize {
        self.sounds.len()
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_some()
    }

    fn reap_finished(&mut self) {
        self.sounds
            .retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_))));
    }

    fn spawn(&self, path: &Path, looping: bool, volume: u8) -> Result<Child, AudioSpawnError> {
        let mut cmd = Command::new(&self.player);
        if self.player == DEFAULT_PLAYER {
            cmd.arg("-nodisp")
                .arg("-autoexit")
                .arg("-loglevel")
                .arg("quiet")
                .arg("-volume")
                .arg(scale_volume(volume).to_string());
            if looping {
                // ffplay: 0 means loop forever.
                cmd.arg("-loop").arg("0");
            }
        }
        cmd.arg(path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd.spawn().map_err(|source| AudioSpawnError {
            player: self.player.clone(),
            source,
        })
    }

    fn asset(&self, kind: &str, name: &str, ext: &str) -> Option<PathBuf> {
        let path = self.assets_dir.join(kind).join(format!("{name}.{ext}"));
        if path.is_file() {
            Some(path)
        } else {
            debug!("no audio asset for {name:?} at {path:?}");
            None
        }
    }

    /// Terminate everything still running and clear the registry.
    pub fn shutdown(&mut self) {
        for mut child in self.sounds.drain(..) {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(mut child) = self.music.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.enabled = false;
    }
}

impl EngineHooks for AudioRegistry {
    fn init_audio(&mut self) {
        self.enabled = true;
        debug!("audio init: player {:?}", self.player);
    }

    fn shutdown_audio(&mut self) {
        self.shutdown();
    }

    fn play_sound(&mut self, name: &str, volume: u8) {
        if !self.enabled {
            return;
        }
        self.reap_finished();
        let Some(path) = self.asset("sounds", name, "wav") else {
            return;
        };
        match self.spawn(&path, false, volume) {
            Ok(child) => self.sounds.push(child),
            Err(e) => warn!("{e}"),
        }
    }

    fn play_music(&mut self, name: &str, looping: bool) {
        if !self.enabled {
            return;
        }
        self.stop_music();
        let Some(path) = self.asset("music", name, "mp3") else {
            return;
        };
        match self.spawn(&path, looping, self.music_volume) {
            Ok(child) => self.music = Some(child),
            Err(e) => warn!("{e}"),
        }
    }

    fn stop_music(&mut self) {
        if let Some(mut child) = self.music.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn set_music_volume(&mut self, volume: u8) {
        // Applies to the next spawn; running players cannot be adjusted.
        self.music_volume = volume.min(127);
    }
}

impl Drop for AudioRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Engine volume 0..=127 to player volume 0..=100.
fn scale_volume(volume: u8) -> u32 {
    (u32::from(volume.min(127)) * 100) / 127
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry_with_assets(player: &str) -> (AudioRegistry, TempDir) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sounds")).unwrap();
        fs::create_dir_all(dir.path().join("music")).unwrap();
        fs::write(dir.path().join("sounds/pistol.wav"), b"RIFF").unwrap();
        fs::write(dir.path().join("music/e1m1.mp3"), b"ID3").unwrap();
        (AudioRegistry::with_player(player, dir.path()), dir)
    }

    #[test]
    fn volume_scaling_covers_the_range() {
        assert_eq!(scale_volume(0), 0);
        assert_eq!(scale_volume(127), 100);
        assert_eq!(scale_volume(255), 100);
        assert!(scale_volume(64) > 40 && scale_volume(64) < 60);
    }

    #[test]
    fn sounds_do_not_play_before_init() {
        let (mut audio, _dir) = registry_with_assets("true");
        audio.play_sound("pistol", 100);
        assert_eq!(audio.active_sounds(), 0);
    }

    #[test]
    fn play_sound_spawns_and_tracks_a_child() {
        let (mut audio, _dir) = registry_with_assets("true");
        audio.init_audio();
        audio.play_sound("pistol", 100);
        assert_eq!(audio.active_sounds(), 1);
        audio.shutdown();
        assert_eq!(audio.active_sounds(), 0);
    }

    #[test]
    fn missing_asset_skips_the_spawn() {
        let (mut audio, _dir) = registry_with_assets("true");
        audio.init_audio();
        audio.play_sound("nosuchsfx", 100);
        assert_eq!(audio.active_sounds(), 0);
    }

    #[test]
    fn spawn_failure_is_swallowed() {
        let (mut audio, _dir) = registry_with_assets("definitely-not-a-player-binary");
        audio.init_audio();
        audio.play_sound("pistol", 100);
        assert_eq!(audio.active_sounds(), 0);
    }

    #[test]
    fn music_change_replaces_the_previous_child() {
        let (mut audio, _dir) = registry_with_assets("true");
        audio.init_audio();
        audio.play_music("e1m1", true);
        assert!(audio.music_playing());
        audio.play_music("e1m1", false);
        assert!(audio.music_playing());
        audio.stop_music();
        assert!(!audio.music_playing());
    }
}
