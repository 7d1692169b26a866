use crate::core::config::Config;
use crate::core::store::LocalStore;
use crate::error::{Result, StingrayError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

pub const RUNTIME_BINARY: &str = "docker";
const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";
const EMULATOR_APPS_DIR: &str = "/opt/stingray/apps";
const SOUND_DEVICE: &str = "/dev/snd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
}

impl Mount {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(host: P, container: S) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }
}

/// One `run` of the emulator container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub image: String,
    pub env: Vec<(String, String)>,
    pub mounts: Vec<Mount>,
    pub devices: Vec<String>,
    pub group_add: Option<String>,
    pub command: Vec<String>,
}

pub trait ContainerRuntime {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioDevice {
    pub card: u32,
    pub device: u32,
}

impl Default for AudioDevice {
    fn default() -> Self {
        Self { card: 1, device: 0 }
    }
}

pub fn emulator_invocation(config: &Config, store: &LocalStore, audio: AudioDevice) -> Invocation {
    let mut env = Vec::new();
    if let Ok(display) = std::env::var("DISPLAY") {
        env.push(("DISPLAY".to_string(), display));
    }

    Invocation {
        image: config.container_image.clone(),
        env,
        mounts: vec![
            Mount::new(X11_SOCKET_DIR, X11_SOCKET_DIR),
            Mount::new(store.apps_dir(), EMULATOR_APPS_DIR),
        ],
        devices: vec![SOUND_DEVICE.to_string()],
        group_add: audio_group_id(Path::new("/etc/group")),
        command: vec![
            "stingray_runner".to_string(),
            format!("--audiocard-number={}", audio.card),
            format!("--audiodevice-number={}", audio.device),
        ],
    }
}

/// Mounts the user's app and the apps directory at the same absolute paths
/// under `/tmp/mnt/apps` and `/tmp/mnt/dist`, then runs `install_app`.
pub fn install_invocation(config: &Config, store: &LocalStore, app_dir: &Path) -> Invocation {
    let apps_dir = store.apps_dir();
    let app_target = format!("/tmp/mnt/apps{}", app_dir.display());
    let dist_target = format!("/tmp/mnt/dist{}", apps_dir.display());

    Invocation {
        image: config.container_image.clone(),
        mounts: vec![
            Mount::new(app_dir, app_target.clone()),
            Mount::new(apps_dir, dist_target.clone()),
        ],
        command: vec![
            "install_app".to_string(),
            "-o".to_string(),
            dist_target,
            app_target,
        ],
        ..Invocation::default()
    }
}

/// Numeric id of the `audio` group from an `/etc/group` style file.
pub fn audio_group_id(group_file: &Path) -> Option<String> {
    let content = std::fs::read_to_string(group_file).ok()?;
    parse_group_id(&content, "audio")
}

fn parse_group_id(content: &str, group: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let mut fields = line.split(':');
        if fields.next()? != group {
            return None;
        }
        let gid = fields.nth(1)?.trim();
        (!gid.is_empty()).then(|| gid.to_string())
    })
}

pub struct DockerRuntime {
    binary: PathBuf,
    working_dir: PathBuf,
}

impl DockerRuntime {
    pub fn new<P: Into<PathBuf>, W: Into<PathBuf>>(binary: P, working_dir: W) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Locate `docker` on `PATH`.
    pub fn detect(store: &LocalStore) -> Result<Self> {
        let binary = which::which(RUNTIME_BINARY).map_err(|_| StingrayError::RuntimeNotFound {
            name: RUNTIME_BINARY.to_string(),
        })?;
        Ok(Self::new(binary, store.root()))
    }

    pub fn args(invocation: &Invocation) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["run".into()];

        for (key, value) in &invocation.env {
            args.push("-e".into());
            args.push(format!("{key}={value}").into());
        }
        for mount in &invocation.mounts {
            let mut volume = mount.host.clone().into_os_string();
            volume.push(":");
            volume.push(&mount.container);
            args.push("-v".into());
            args.push(volume);
        }
        if let Some(group) = &invocation.group_add {
            args.push("--group-add".into());
            args.push(group.into());
        }
        for device in &invocation.devices {
            args.push("--device".into());
            args.push(device.into());
        }

        args.push(invocation.image.as_str().into());
        args.extend(invocation.command.iter().map(OsString::from));
        args
    }
}

impl ContainerRuntime for DockerRuntime {
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
        let args = Self::args(invocation);
        log::debug!("{} {:?}", self.binary.display(), args);

        Command::new(&self.binary)
            .args(&args)
            .current_dir(&self.working_dir)
            .status()
            .map_err(|e| StingrayError::RuntimeError {
                message: format!("failed to start {}: {e}", self.binary.display()),
            })
    }
}

#[cfg(all(test, unix))]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;

    /// Records invocations instead of spawning a container.
    pub struct RecordingRuntime {
        pub invocations: RefCell<Vec<Invocation>>,
        code: i32,
    }

    impl RecordingRuntime {
        pub fn exiting_with(code: i32) -> Self {
            Self {
                invocations: RefCell::new(Vec::new()),
                code,
            }
        }
    }

    impl ContainerRuntime for RecordingRuntime {
        fn run(&self, invocation: &Invocation) -> Result<ExitStatus> {
            self.invocations.borrow_mut().push(invocation.clone());
            Ok(ExitStatus::from_raw(self.code << 8))
        }
    }
}
