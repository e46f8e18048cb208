use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppError {
    TrayIconFailed(String),
    IconNotFound(PathBuf),
    ProcessError(String),
    ConfigError(String),
    BrowserError(String),
    IoError(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::TrayIconFailed(msg) => write!(f, "Tray icon creation failed: {}", msg),
            AppError::IconNotFound(path) => write!(f, "Icon not found: {}", path.display()),
            AppError::ProcessError(msg) => write!(f, "Process error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::BrowserError(msg) => write!(f, "Browser error: {}", msg),
            AppError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<muda::Error> for AppError {
    fn from(err: muda::Error) -> Self {
        AppError::TrayIconFailed(err.to_string())
    }
}

impl From<tray_icon::Error> for AppError {
    fn from(err: tray_icon::Error) -> Self {
        AppError::TrayIconFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
