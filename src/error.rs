use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Outlook error: {0}")]
    Outlook(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Tray error: {0}")]
    Tray(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Login has been cancelled")]
    LoginCancelled,
}

impl AppError {
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Self::Auth(msg.into())
    }

    pub fn outlook<S: Into<String>>(msg: S) -> Self {
        Self::Outlook(msg.into())
    }

    pub fn browser<S: Into<String>>(msg: S) -> Self {
        Self::Browser(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        Self::Notification(msg.into())
    }

    pub fn tray<S: Into<String>>(msg: S) -> Self {
        Self::Tray(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Io(_) | Self::Json(_) | Self::Network(_) | Self::Anyhow(_) => false,
            Self::Auth(_)
            | Self::Outlook(_)
            | Self::Browser(_)
            | Self::Notification(_)
            | Self::Tray(_)
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::NotFound(_)
            | Self::LoginCancelled => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Io(_) => "File operation failed".to_string(),
                Self::Json(_) => "Configuration file is not valid JSON".to_string(),
                Self::Network(_) => "Network request failed".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_accept_str_and_string() {
        assert!(matches!(AppError::auth("expired"), AppError::Auth(m) if m == "expired"));
        assert!(matches!(
            AppError::invalid_input(String::from("bad time")),
            AppError::InvalidInput(m) if m == "bad time"
        ));
    }

    #[test]
    fn test_safe_string_redacts_transport_errors() {
        let io = AppError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/home/someone/.local/share/alarm-clock/config.json",
        ));
        assert!(!io.is_pii_safe());
        assert_eq!(io.to_safe_string(), "File operation failed");

        let outlook = AppError::outlook("GetReminders returned 500");
        assert!(outlook.is_pii_safe());
        assert_eq!(outlook.to_safe_string(), "Outlook error: GetReminders returned 500");
    }

    #[test]
    fn test_login_cancelled_message() {
        assert_eq!(AppError::LoginCancelled.to_string(), "Login has been cancelled");
    }
}
