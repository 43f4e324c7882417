// Keyclack Playback
// Fire-and-forget sample playback through an external player process

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::SoundMap;

/// Default player binary, looked up on PATH
pub const DEFAULT_PLAYER: &str = "paplay";

/// Default directory holding the sound samples
pub const DEFAULT_ASSETS_DIR: &str = "./assets";

/// Login uid whose audio session is borrowed when running as root
pub const DEFAULT_SESSION_UID: u32 = 1000;

/// Result type for playback operations
pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can play a sample by filename.
///
/// Implementations must not block on the sample finishing.
pub trait Player {
    fn play(&mut self, file: &str) -> PlaybackResult<()>;
}

/// Environment pointing a spawned player at a user's audio session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEnv {
    vars: Vec<(String, String)>,
}

impl SessionEnv {
    /// No overrides; the player inherits our environment
    pub fn inherit() -> Self {
        Self { vars: Vec::new() }
    }

    /// Runtime dir and PulseAudio socket of the given uid
    pub fn for_uid(uid: u32) -> Self {
        Self {
            vars: vec![
                ("XDG_RUNTIME_DIR".to_string(), format!("/run/user/{}", uid)),
                (
                    "PULSE_SERVER".to_string(),
                    format!("unix:/run/user/{}/pulse/native", uid),
                ),
            ],
        }
    }

    /// Borrow `uid`'s session only when running as root.
    ///
    /// root has no audio session of its own, so without these the player
    /// cannot reach the sound server.
    pub fn detect(uid: u32) -> Self {
        if is_root() {
            Self::for_uid(uid)
        } else {
            Self::inherit()
        }
    }

    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }
}

/// Whether the effective uid is 0
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// A fully resolved player invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCommand {
    pub program: String,
    pub path: PathBuf,
    pub env: Vec<(String, String)>,
}

impl PlaybackCommand {
    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(&self.path)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

/// Shell-equivalent form, e.g. `paplay './assets/a.wav' &`
impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' &", self.program, self.path.display())
    }
}

/// A spawned player process nobody waits on.
#[derive(Debug)]
pub struct PlaybackJob {
    child: Child,
}

impl PlaybackJob {
    /// Non-blocking check; collects the exit status once the player ends.
    pub fn is_finished(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }
}

/// Player that spawns one external process per sample.
///
/// Concurrency is unbounded: fast typing overlaps as many players as there
/// are presses. Finished children are reaped on the next `play` call.
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    assets_dir: PathBuf,
    session: SessionEnv,
    jobs: Vec<PlaybackJob>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, assets_dir: impl Into<PathBuf>, session: SessionEnv) -> Self {
        Self {
            program: program.into(),
            assets_dir: assets_dir.into(),
            session,
            jobs: Vec::new(),
        }
    }

    /// Invocation that would be spawned for `file`
    pub fn command_for(&self, file: &str) -> PlaybackCommand {
        PlaybackCommand {
            program: self.program.clone(),
            path: self.assets_dir.join(file),
            env: self.session.vars().to_vec(),
        }
    }

    /// Drop bookkeeping for players that have exited
    pub fn reap(&mut self) {
        self.jobs.retain_mut(|job| !job.is_finished());
    }
}

impl Player for CommandPlayer {
    fn play(&mut self, file: &str) -> PlaybackResult<()> {
        self.reap();

        let command = self.command_for(file);
        let child = command
            .to_command()
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                command: command.to_string(),
                source,
            })?;
        log::trace!("Spawned player pid {}: {}", child.id(), command);
        self.jobs.push(PlaybackJob { child });
        Ok(())
    }
}

/// Mapped samples that are not present in `assets_dir`.
pub fn missing_assets(sounds: &SoundMap, assets_dir: &Path) -> Vec<String> {
    sounds
        .files()
        .into_iter()
        .filter(|file| !assets_dir.join(file).is_file())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_matches_shell_form() {
        let player = CommandPlayer::new("paplay", "./assets", SessionEnv::inherit());
        let command = player.command_for("a.wav");
        assert_eq!(command.to_string(), "paplay './assets/a.wav' &");
        assert_eq!(command.path, PathBuf::from("./assets/a.wav"));
    }

    #[test]
    fn test_command_keeps_spaces_in_one_argument() {
        let player = CommandPlayer::new("aplay", "/usr/share/clack", SessionEnv::inherit());
        let command = player.command_for("caps lock.wav");
        assert_eq!(command.path, PathBuf::from("/usr/share/clack/caps lock.wav"));
        let args: Vec<_> = command.to_command().get_args().map(|a| a.to_owned()).collect();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_session_env_for_uid() {
        let env = SessionEnv::for_uid(1000);
        assert_eq!(
            env.vars(),
            &[
                ("XDG_RUNTIME_DIR".to_string(), "/run/user/1000".to_string()),
                (
                    "PULSE_SERVER".to_string(),
                    "unix:/run/user/1000/pulse/native".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_session_env_detect_follows_euid() {
        let env = SessionEnv::detect(1000);
        if is_root() {
            assert_eq!(env, SessionEnv::for_uid(1000));
        } else {
            assert!(env.vars().is_empty());
        }
    }

    #[test]
    fn test_command_carries_session_env() {
        let player = CommandPlayer::new("paplay", "./assets", SessionEnv::for_uid(1001));
        let command = player.command_for("q.wav");
        assert!(command
            .env
            .iter()
            .any(|(k, v)| k == "XDG_RUNTIME_DIR" && v == "/run/user/1001"));
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let mut player = CommandPlayer::new(
            "/nonexistent/keyclack-player",
            "./assets",
            SessionEnv::inherit(),
        );
        match player.play("a.wav") {
            Err(PlaybackError::Spawn { command, .. }) => {
                assert!(command.contains("./assets/a.wav"));
            }
            Ok(()) => panic!("Spawning a nonexistent player succeeded"),
        }
        assert_eq!(player.jobs.len(), 0);
    }

    #[test]
    fn test_jobs_are_reaped() {
        // `true` ignores its argument and exits immediately
        let mut player = CommandPlayer::new("true", "./assets", SessionEnv::inherit());
        player.play("a.wav").unwrap();
        assert_eq!(player.jobs.len(), 1);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while player.jobs.len() > 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
            player.reap();
        }
        assert_eq!(player.jobs.len(), 0);
    }

    #[test]
    fn test_missing_assets() {
        let dir = std::env::temp_dir().join(format!("keyclack-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.wav"), b"RIFF").unwrap();

        let mut sounds = SoundMap::new();
        sounds.insert(crate::Key::A, "a.wav");
        sounds.insert(crate::Key::B, "b.wav");

        assert_eq!(missing_assets(&sounds, &dir), vec!["b.wav".to_string()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
