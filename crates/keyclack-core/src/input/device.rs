// Keyclack Input Layer - Device Discovery
// udev keyboard enumeration and evdev device handles

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use evdev::Device;

use super::event::EVENT_SIZE;
use super::source::{classify_read, EventSource, ReadOutcome};

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors that can occur while locating or opening a keyboard
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to query udev: {0}")]
    Udev(#[source] io::Error),

    #[error("Could not find keyboard device")]
    NotFound,

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Keyboard candidate reported by udev, for listing
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Position in udev enumeration order
    pub index: usize,
    /// Device node, e.g. /dev/input/event3
    pub path: PathBuf,
    /// Device name, if the node could be opened
    pub name: Option<String>,
    /// Why the node could not be opened
    pub error: Option<String>,
}

/// Poll timeout between cancellation checks
const POLL_TIMEOUT_MS: i32 = 100;

/// What `poll` reported for the device fd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Timeout,
    Readable,
    /// POLLHUP/POLLERR/POLLNVAL: the device is gone
    HungUp,
}

/// An opened keyboard event device.
///
/// The file descriptor is closed when this is dropped.
pub struct KeyboardDevice {
    device: Device,
    path: PathBuf,
    name: String,
    buf: [u8; EVENT_SIZE],
}

impl KeyboardDevice {
    /// Open a device node and query its name.
    ///
    /// `evdev::Device::open` asks for read-write access first and falls back
    /// to read-only, so a node we may only read still opens. Nothing is ever
    /// written to the fd.
    pub fn open(path: &Path) -> DeviceResult<Self> {
        let device = Device::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let name = device.name().unwrap_or("Unknown").to_string();
        Ok(Self {
            device,
            path: path.to_path_buf(),
            name,
            buf: [0u8; EVENT_SIZE],
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait up to `timeout_ms` for the device to become readable.
    fn wait_readable(&self, timeout_ms: i32) -> io::Result<Readiness> {
        let mut pfd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let result = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        if result == 0 {
            return Ok(Readiness::Timeout);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Ok(Readiness::HungUp);
        }
        Ok(Readiness::Readable)
    }
}

impl EventSource for KeyboardDevice {
    fn next_record(&mut self) -> io::Result<ReadOutcome> {
        match self.wait_readable(POLL_TIMEOUT_MS) {
            Ok(Readiness::Timeout) => return Ok(ReadOutcome::Idle),
            Ok(Readiness::HungUp) => return Ok(ReadOutcome::Closed),
            Ok(Readiness::Readable) => {}
            Err(e) => return classify_read(Err(e), &self.buf),
        }

        let n = unsafe {
            libc::read(
                self.device.as_raw_fd(),
                self.buf.as_mut_ptr() as *mut libc::c_void,
                EVENT_SIZE,
            )
        };
        let result = if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        };
        classify_read(result, &self.buf)
    }
}

/// Device nodes udev tags as keyboards, in enumeration order.
///
/// The udev context is released before returning. Entries without a device
/// node (the parent `inputN` devices) are skipped.
pub fn keyboard_candidates() -> DeviceResult<Vec<PathBuf>> {
    let mut enumerator = udev::Enumerator::new().map_err(DeviceError::Udev)?;
    enumerator
        .match_subsystem("input")
        .map_err(DeviceError::Udev)?;
    enumerator
        .match_property("ID_INPUT_KEYBOARD", "1")
        .map_err(DeviceError::Udev)?;

    let paths = enumerator
        .scan_devices()
        .map_err(DeviceError::Udev)?
        .filter_map(|device| device.devnode().map(Path::to_path_buf))
        .collect();
    Ok(paths)
}

/// Return the first candidate `open` succeeds on, trying them in order.
///
/// Open failures (usually permission denied) are logged and the scan moves
/// on to the next candidate. Later candidates are not touched once one opens.
pub fn first_openable<T, F>(
    candidates: impl IntoIterator<Item = PathBuf>,
    mut open: F,
) -> DeviceResult<T>
where
    F: FnMut(&Path) -> DeviceResult<T>,
{
    for path in candidates {
        match open(&path) {
            Ok(device) => return Ok(device),
            Err(e) => log::debug!("Skipping keyboard candidate: {}", e),
        }
    }
    Err(DeviceError::NotFound)
}

/// Open the first udev keyboard that can be opened.
pub fn locate_keyboard() -> DeviceResult<KeyboardDevice> {
    let device = first_openable(keyboard_candidates()?, KeyboardDevice::open)?;
    println!(
        "Found keyboard: {} (device: {})",
        device.name(),
        device.path().display()
    );
    Ok(device)
}

/// Open an explicitly configured device node, bypassing discovery.
pub fn open_keyboard(path: &Path) -> DeviceResult<KeyboardDevice> {
    let device = KeyboardDevice::open(path)?;
    println!(
        "Using keyboard: {} (device: {})",
        device.name(),
        device.path().display()
    );
    Ok(device)
}

/// List every udev keyboard candidate and whether it opens.
///
/// This is useful for the --list-devices CLI flag.
pub fn list_keyboards() -> DeviceResult<Vec<DeviceInfo>> {
    let infos = keyboard_candidates()?
        .into_iter()
        .enumerate()
        .map(|(index, path)| match KeyboardDevice::open(&path) {
            Ok(device) => DeviceInfo {
                index,
                name: Some(device.name().to_string()),
                error: None,
                path,
            },
            Err(DeviceError::Open { source, .. }) => DeviceInfo {
                index,
                name: None,
                error: Some(source.to_string()),
                path,
            },
            Err(e) => DeviceInfo {
                index,
                name: None,
                error: Some(e.to_string()),
                path,
            },
        })
        .collect();
    Ok(infos)
}
