//! Child process supervision
//!
//! Owns the handle slot for every managed service. The invariant is at most
//! one live OS process per service name: a handle is registered on spawn and
//! cleared whenever an exit is observed, whether from an explicit stop or an
//! external kill. The slot table sits behind a mutex because it is touched
//! from both the UI thread (startup, menu Exit) and the poller thread.

use crate::config::ServiceConfig;
use crate::error::{AppError, Result};
use log::{debug, info, warn};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Process creation flags (Windows): new process group, no console window
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Static description of one managed service
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub command: Vec<String>,
    pub url: String,
}

impl From<&ServiceConfig> for ServiceSpec {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            name: config.name.clone(),
            command: config.command.clone(),
            url: config.url.clone(),
        }
    }
}

/// Liveness snapshot for one service, recomputed each poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub url: String,
    pub running: bool,
}

/// One service slot: its spec plus the live handle, if any
struct Slot {
    spec: ServiceSpec,
    child: Option<Child>,
}

/// Supervises the named child processes
pub struct ProcessSupervisor {
    slots: Mutex<Vec<Slot>>,
}

impl ProcessSupervisor {
    /// Create a supervisor for the given services, none running yet
    pub fn new(specs: Vec<ServiceSpec>) -> Self {
        let slots = specs
            .into_iter()
            .map(|spec| Slot { spec, child: None })
            .collect();

        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Spawn the service if it is not already running. Idempotent: a second
    /// call while the process is live is a no-op.
    pub fn start(&self, name: &str) -> Result<()> {
        let mut slots = self.lock_slots();
        let slot = Self::slot_mut(&mut slots, name)?;

        if slot_is_running(slot) {
            debug!("Service '{}' already running, start is a no-op", name);
            return Ok(());
        }

        let child = spawn_service(&slot.spec)?;
        info!("Started '{}' (pid {})", name, child.id());
        slot.child = Some(child);

        Ok(())
    }

    /// Terminate the service and wait for it to exit, then clear the slot.
    /// A stop when nothing is running just leaves the slot cleared.
    pub fn stop(&self, name: &str) -> Result<()> {
        let mut slots = self.lock_slots();
        let slot = Self::slot_mut(&mut slots, name)?;

        if let Some(mut child) = slot.child.take() {
            let pid = child.id();
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("Service '{}' (pid {}) already exited: {}", name, pid, status);
                }
                _ => {
                    // Termination is fire-and-forget; liveness is re-checked
                    // on the next poll regardless of the outcome here.
                    if let Err(e) = child.kill() {
                        warn!("Could not terminate '{}' (pid {}): {}", name, pid, e);
                    }
                    let _ = child.wait();
                    info!("Stopped '{}' (pid {})", name, pid);
                }
            }
        }

        Ok(())
    }

    /// True iff a handle is registered and the OS reports the process alive.
    /// Observing an exit clears the stale handle.
    pub fn is_running(&self, name: &str) -> bool {
        let mut slots = self.lock_slots();
        match Self::slot_mut(&mut slots, name) {
            Ok(slot) => slot_is_running(slot),
            Err(_) => false,
        }
    }

    /// Clear every registered handle whose process has exited
    pub fn reap(&self) {
        let mut slots = self.lock_slots();
        for slot in slots.iter_mut() {
            let was_registered = slot.child.is_some();
            if was_registered && !slot_is_running(slot) {
                info!("Service '{}' exited unexpectedly", slot.spec.name);
            }
        }
    }

    /// Stop every running service (the Exit path)
    pub fn stop_all(&self) {
        let mut slots = self.lock_slots();
        for slot in slots.iter_mut() {
            if let Some(mut child) = slot.child.take() {
                let pid = child.id();
                if !matches!(child.try_wait(), Ok(Some(_))) {
                    if let Err(e) = child.kill() {
                        warn!("Could not terminate '{}' (pid {}): {}", slot.spec.name, pid, e);
                    }
                    let _ = child.wait();
                }
                info!("Stopped '{}' (pid {})", slot.spec.name, pid);
            }
        }
    }

    /// Ordered liveness snapshot for menu building
    pub fn statuses(&self) -> Vec<ServiceStatus> {
        let mut slots = self.lock_slots();
        slots
            .iter_mut()
            .map(|slot| ServiceStatus {
                name: slot.spec.name.clone(),
                url: slot.spec.url.clone(),
                running: slot_is_running(slot),
            })
            .collect()
    }

    /// URL of the named service, if registered
    pub fn url_for(&self, name: &str) -> Option<String> {
        let slots = self.lock_slots();
        slots
            .iter()
            .find(|s| s.spec.name == name)
            .map(|s| s.spec.url.clone())
    }

    /// PID of the live process for the named service, if any
    pub fn pid(&self, name: &str) -> Option<u32> {
        let mut slots = self.lock_slots();
        let slot = Self::slot_mut(&mut slots, name).ok()?;
        if slot_is_running(slot) {
            slot.child.as_ref().map(|c| c.id())
        } else {
            None
        }
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, Vec<Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn slot_mut<'a>(slots: &'a mut Vec<Slot>, name: &str) -> Result<&'a mut Slot> {
        slots
            .iter_mut()
            .find(|s| s.spec.name == name)
            .ok_or_else(|| AppError::ProcessError(format!("unknown service '{}'", name)))
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Poll the slot's handle, clearing it if the process has exited
fn slot_is_running(slot: &mut Slot) -> bool {
    match slot.child.as_mut() {
        None => false,
        Some(child) => match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!("Service '{}' exited: {}", slot.spec.name, status);
                slot.child = None;
                false
            }
            Err(e) => {
                // Cannot determine state; keep the handle and retry next poll
                warn!("try_wait failed for '{}': {}", slot.spec.name, e);
                true
            }
        },
    }
}

/// Spawn the service command in its own process group with no console window
fn spawn_service(spec: &ServiceSpec) -> Result<Child> {
    let (program, args) = spec
        .command
        .split_first()
        .ok_or_else(|| AppError::ConfigError(format!("empty command for '{}'", spec.name)))?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(windows)]
    command.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);

    #[cfg(unix)]
    command.process_group(0);

    command
        .spawn()
        .map_err(|e| AppError::ProcessError(format!("failed to spawn '{}': {}", spec.name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_spec_from_config() {
        let config = ServiceConfig {
            name: "backend".to_string(),
            command: vec!["cmd".to_string()],
            url: "http://localhost:4000/".to_string(),
            open_on_start: false,
        };

        let spec = ServiceSpec::from(&config);
        assert_eq!(spec.name, "backend");
        assert_eq!(spec.url, "http://localhost:4000/");
    }

    #[test]
    fn test_empty_command_is_config_error() {
        let spec = ServiceSpec {
            name: "broken".to_string(),
            command: Vec::new(),
            url: String::new(),
        };

        assert!(matches!(
            spawn_service(&spec),
            Err(AppError::ConfigError(_))
        ));
    }
}
