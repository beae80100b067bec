#[derive(thiserror::Error, Debug)]
pub enum HstsError {
    #[error("cannot retrieve source {source_ref}: {message}")]
    Fetch { source_ref: String, message: String },
    #[error("malformed preload list: {0}")]
    PreloadFormat(String),
    #[error("malformed known hosts database at line {line}: {message}")]
    KnownHostsFormat { line: usize, message: String },
    #[error("duplicate key {0}")]
    DuplicateKey(String),
    #[error("cannot write {path}: {message}")]
    Write { path: String, message: String },
    #[error("invalid configuration {path}: {message}")]
    Config { path: String, message: String },
}

impl HstsError {
    pub fn code(&self) -> &'static str {
        match self {
            HstsError::Fetch { .. } => "FETCH_ERROR",
            HstsError::PreloadFormat(_) | HstsError::KnownHostsFormat { .. } => "FORMAT_ERROR",
            HstsError::DuplicateKey(_) => "DUPLICATE_KEY",
            HstsError::Write { .. } => "WRITE_ERROR",
            HstsError::Config { .. } => "CONFIG_ERROR",
        }
    }

    pub fn fetch(source_ref: &str, message: impl ToString) -> Self {
        HstsError::Fetch {
            source_ref: source_ref.to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(path: &std::path::Path, message: impl ToString) -> Self {
        HstsError::Write {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Machine code for any error surfaced to the CLI boundary.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<HstsError>())
        .map(HstsError::code)
        .unwrap_or("IO_ERROR")
}
