//! Default-browser URL opening

use crate::error::{AppError, Result};
use log::info;

/// Open the URL with the OS default browser, detached from our process.
/// Nothing is read back; failures only surface in the log.
pub fn open_url(url: &str) -> Result<()> {
    info!("Opening {} in default browser", url);
    open::that_detached(url)
        .map_err(|e| AppError::BrowserError(format!("could not open {}: {}", url, e)))
}
