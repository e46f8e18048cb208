//! System tray icon management

use crate::error::{AppError, Result};
use image::GenericImageView;
use log::{debug, info};
use muda::Menu;
use std::path::Path;
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Base tooltip text
const TOOLTIP: &str = "Progress Dashboard";

/// Manages the system tray icon
pub struct TrayIconManager {
    tray_icon: TrayIcon,
}

impl TrayIconManager {
    /// Create the tray icon from the given image file. A missing or
    /// unreadable image is fatal; there is no fallback icon.
    pub fn new(icon_path: &Path, menu: Menu) -> Result<Self> {
        let icon = load_icon(icon_path)?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(TOOLTIP)
            .with_menu(Box::new(menu))
            .build()?;

        info!("Tray icon created from {:?}", icon_path);

        Ok(Self { tray_icon })
    }

    /// Replace the context menu
    pub fn update_menu(&mut self, menu: Menu) {
        self.tray_icon.set_menu(Some(Box::new(menu)));
    }

    /// Refresh the tooltip with the current service counts
    pub fn update_tooltip(&mut self, running: usize, total: usize) -> Result<()> {
        let tooltip = format!("{} ({}/{} running)", TOOLTIP, running, total);
        self.tray_icon.set_tooltip(Some(&tooltip))?;
        debug!("Tooltip updated: {}", tooltip);
        Ok(())
    }
}

/// Load the tray icon image from disk
fn load_icon(path: &Path) -> Result<Icon> {
    if !path.exists() {
        return Err(AppError::IconNotFound(path.to_path_buf()));
    }

    let img = image::open(path)
        .map_err(|e| AppError::TrayIconFailed(format!("Failed to load image: {}", e)))?;

    let (width, height) = img.dimensions();
    let rgba = img.into_rgba8().into_raw();

    Icon::from_rgba(rgba, width, height)
        .map_err(|e| AppError::TrayIconFailed(format!("Failed to create icon: {}", e)))
}
