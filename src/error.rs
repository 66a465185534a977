//! Application error type.
//!
//! Exit code conventions:
//! - 2: configuration/usage problems (missing env var, bad flags)
//! - 3: query execution failures (connectivity, SQL syntax)
//! - 4: data-quality/runtime problems (empty dataset, non-numeric year)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Configuration/usage error (exit code 2).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Query execution error (exit code 3). Propagated unmodified, no retry.
    pub fn query(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Data-quality error (exit code 4).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Whether this error is a data-quality notice rather than a fatal
    /// configuration/query failure. The two output artifacts (panels and the
    /// open-transit listing) fail independently on data-quality notices.
    pub fn is_data_quality(&self) -> bool {
        self.exit_code == 4
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
