use std::env;
use std::path::PathBuf;

/// Get the path to the Tutor directory (~/.tutor)
pub fn tutor_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".tutor")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".tutor")
    }
}

/// Get the path to the default SQLite database (~/.tutor/tutor.db)
pub fn database_file() -> PathBuf {
    tutor_dir().join("tutor.db")
}
