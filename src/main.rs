//! Dev-Stack Tray Launcher - Main Entry Point
//!
//! Starts the backend and frontend dev servers, opens the frontend in the
//! default browser, and parks a tray icon whose menu tracks service liveness.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use devtray::browser;
use devtray::config::{ConfigManager, LauncherConfig};
use devtray::error::{AppError, Result};
use devtray::logging::{init_logging, parse_log_level, LoggingConfig};
use devtray::poller::StatusPoller;
use devtray::supervisor::{ProcessSupervisor, ServiceSpec, ServiceStatus};
use devtray::tray::{MenuAction, MenuBuilder, TrayIconManager};
use log::{error, info, warn};
use muda::MenuEvent as MudaMenuEvent;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[cfg(windows)]
use windows::Win32::Foundation::{BOOL, HWND};
#[cfg(windows)]
use windows::Win32::System::Console::{
    SetConsoleCtrlHandler, CTRL_BREAK_EVENT, CTRL_CLOSE_EVENT, CTRL_C_EVENT,
};
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
};

/// Global shutdown flag for Ctrl+C and console-close handling
static SHUTDOWN_FLAG: AtomicBool = AtomicBool::new(false);

/// Console control handler for Ctrl+C, Ctrl+Break, and close events
#[cfg(windows)]
unsafe extern "system" fn console_ctrl_handler(ctrl_type: u32) -> BOOL {
    match ctrl_type {
        x if x == CTRL_C_EVENT || x == CTRL_BREAK_EVENT || x == CTRL_CLOSE_EVENT => {
            info!("Received shutdown signal (type: {})", ctrl_type);
            SHUTDOWN_FLAG.store(true, Ordering::SeqCst);
            BOOL::from(true)
        }
        _ => BOOL::from(false),
    }
}

/// Main application state
struct App {
    config: LauncherConfig,
    supervisor: Arc<ProcessSupervisor>,
    tray_manager: Option<TrayIconManager>,
    menu_builder: MenuBuilder,
    poller: Option<StatusPoller>,
    running: bool,
}

impl App {
    /// Create a new application instance; no processes are spawned yet
    fn new(config: LauncherConfig) -> Self {
        let specs: Vec<ServiceSpec> = config.services.iter().map(ServiceSpec::from).collect();
        let supervisor = Arc::new(ProcessSupervisor::new(specs));

        Self {
            config,
            supervisor,
            tray_manager: None,
            menu_builder: MenuBuilder::new(),
            poller: None,
            running: true,
        }
    }

    /// Initialize the application: tray icon first, then the services.
    /// Validating the icon resource before any spawn means a missing icon
    /// cannot leave orphaned dev servers behind.
    fn init(&mut self) -> Result<()> {
        let menu = self.menu_builder.build(&self.supervisor.statuses())?;
        self.tray_manager = Some(TrayIconManager::new(
            &self.config.general.icon_path,
            menu,
        )?);

        for service in &self.config.services {
            if let Err(e) = self.supervisor.start(&service.name) {
                // Recoverable: the menu item simply stays disabled
                error!("Failed to start '{}': {}", service.name, e);
            }
        }

        // Give the servers a moment before pointing a browser at them
        std::thread::sleep(Duration::from_millis(self.config.general.browser_delay_ms));

        for service in &self.config.services {
            if service.open_on_start {
                if let Err(e) = browser::open_url(&service.url) {
                    warn!("{}", e);
                }
            }
        }

        self.poller = Some(StatusPoller::start(
            Arc::clone(&self.supervisor),
            Duration::from_millis(self.config.general.poll_interval_ms),
        ));

        info!("Launcher initialized");
        Ok(())
    }

    /// Handle a resolved menu action
    fn handle_menu_action(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::OpenUrl(name) => {
                if let Some(url) = self.supervisor.url_for(&name) {
                    browser::open_url(&url)?;
                }
            }
            MenuAction::Exit => {
                info!("Exit requested");
                self.running = false;
            }
        }
        Ok(())
    }

    /// Rebuild the menu and tooltip from a fresh liveness snapshot
    fn refresh_menu(&mut self, statuses: &[ServiceStatus]) -> Result<()> {
        let menu = self.menu_builder.build(statuses)?;
        if let Some(ref mut tray) = self.tray_manager {
            tray.update_menu(menu);
            let running = statuses.iter().filter(|s| s.running).count();
            tray.update_tooltip(running, statuses.len())?;
        }
        Ok(())
    }

    /// Run the main event loop until Exit
    fn run(&mut self) -> Result<()> {
        info!("Starting main event loop");

        let menu_channel = MudaMenuEvent::receiver();

        #[cfg(windows)]
        let mut msg = MSG::default();

        while self.running && !SHUTDOWN_FLAG.load(Ordering::SeqCst) {
            // Process Windows messages
            #[cfg(windows)]
            unsafe {
                while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            }

            // Process menu events
            if let Ok(event) = menu_channel.try_recv() {
                if let Some(action) = self.menu_builder.handle_event(&event) {
                    if let Err(e) = self.handle_menu_action(action) {
                        error!("Menu action error: {}", e);
                    }
                }
            }

            // Process liveness snapshots from the poller
            if let Some(statuses) = self.poller.as_ref().and_then(|p| p.try_recv_status()) {
                if let Err(e) = self.refresh_menu(&statuses) {
                    error!("Menu refresh error: {}", e);
                }
            }

            // Sleep to prevent busy loop
            std::thread::sleep(Duration::from_millis(50));
        }

        Ok(())
    }

    /// Shutdown: stop the poller, then the child processes, then the tray
    fn shutdown(&mut self) {
        info!("Shutting down launcher");

        if let Some(mut poller) = self.poller.take() {
            poller.shutdown();
        }

        self.supervisor.stop_all();
        self.tray_manager.take();
    }
}

fn run_launcher() -> Result<()> {
    let config_manager = ConfigManager::new();
    let config = config_manager.load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}, using defaults", e);
        LauncherConfig::default()
    });

    let log_config = LoggingConfig {
        level: parse_log_level(&config.logging.level),
        log_dir: config_manager.log_dir(),
        max_file_size: config.logging.max_file_size,
        max_files: config.logging.max_files,
    };
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    #[cfg(windows)]
    unsafe {
        if let Err(e) = SetConsoleCtrlHandler(Some(console_ctrl_handler), true) {
            warn!("Failed to set console control handler: {:?}", e);
        }
    }

    info!("Dev-stack tray launcher starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config);
    app.init()?;
    let result = app.run();
    app.shutdown();

    info!("Dev-stack tray launcher stopped");
    result
}

fn main() -> ExitCode {
    match run_launcher() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AppError::IconNotFound(_)) => {
            // Fatal before Running: no children have been spawned yet
            eprintln!("{}", e);
            error!("{}", e);
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Launcher error: {}", e);
            error!("Launcher error: {}", e);
            ExitCode::from(1)
        }
    }
}
