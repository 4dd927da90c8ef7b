//! Oracle client library detection and priming.
//!
//! The driver needs the vendor client library on the loader path before the
//! first connection. An installation root can come from the connection
//! configuration or from `ORACLE_HOME`; when one is found, the library is
//! loaded with global symbol visibility and held for the process lifetime so
//! later driver calls resolve against it. Without a configured root the
//! driver's own system-wide discovery is left to do its job.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Static reference to the Oracle client library (loaded via libloading)
static ORACLE_CLIENT: OnceLock<Mutex<Option<libloading::Library>>> = OnceLock::new();

/// Oracle client library filename per platform
#[cfg(target_os = "macos")]
const ORACLE_LIB_NAME: &str = "libclntsh.dylib";
#[cfg(target_os = "windows")]
const ORACLE_LIB_NAME: &str = "oci.dll";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const ORACLE_LIB_NAME: &str = "libclntsh.so";

/// Expands a leading `~/` against the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolves the Oracle client installation root.
///
/// An explicit override wins; otherwise the `ORACLE_HOME` environment
/// variable is consulted. `None` means no root is configured anywhere.
pub fn resolve_client_dir(custom_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path_str) = custom_path {
        return Some(expand_home(path_str));
    }

    match std::env::var("ORACLE_HOME") {
        Ok(path_str) if !path_str.is_empty() => Some(expand_home(&path_str)),
        _ => None,
    }
}

/// Locates the client library inside an installation root.
///
/// Instant Client unpacks the library into the root itself; a full client or
/// server home keeps it under `lib/`.
fn locate_library(client_dir: &Path) -> Option<PathBuf> {
    let direct = client_dir.join(ORACLE_LIB_NAME);
    if direct.is_file() {
        return Some(direct);
    }
    let under_lib = client_dir.join("lib").join(ORACLE_LIB_NAME);
    if under_lib.is_file() {
        return Some(under_lib);
    }
    None
}

/// Primes the Oracle client library for the configured installation root.
///
/// Exports `ORACLE_HOME` and the platform loader path, then loads the library
/// with RTLD_GLOBAL so the driver finds the already-loaded symbols. A missing
/// library under an explicitly configured root is an error; a root picked up
/// from the environment only logs a warning, and no configured root at all is
/// a no-op. Priming once is enough; repeat calls return immediately.
pub fn prime(custom_path: Option<&str>) -> Result<(), String> {
    if is_primed() {
        log::debug!("Oracle client already primed, skipping");
        return Ok(());
    }

    let client_dir = match resolve_client_dir(custom_path) {
        Some(dir) => dir,
        None => {
            log::debug!("No Oracle client root configured, relying on system lookup");
            return Ok(());
        }
    };

    std::env::set_var("ORACLE_HOME", client_dir.as_os_str());

    let lib_path = match locate_library(&client_dir) {
        Some(path) => path,
        None if custom_path.is_some() => {
            return Err(format!(
                "Oracle client library not found under: {}. Please install Oracle Instant Client.",
                client_dir.display()
            ));
        }
        None => {
            log::warn!(
                "ORACLE_HOME is set but no client library found under: {:?}",
                client_dir
            );
            return Ok(());
        }
    };

    // The loader path must be exported BEFORE the library is loaded so the
    // driver resolves against the same installation later
    let lib_dir = lib_path.parent().unwrap_or(&client_dir);
    #[cfg(target_os = "macos")]
    {
        std::env::set_var("DYLD_LIBRARY_PATH", lib_dir.as_os_str());
        log::info!("Set DYLD_LIBRARY_PATH to: {:?}", lib_dir);
    }
    #[cfg(target_os = "linux")]
    {
        std::env::set_var("LD_LIBRARY_PATH", lib_dir.as_os_str());
        log::info!("Set LD_LIBRARY_PATH to: {:?}", lib_dir);
    }

    // RTLD_GLOBAL makes the symbols visible to the driver's own lookup
    #[cfg(unix)]
    let library = unsafe {
        use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};
        let unix_lib = UnixLibrary::open(Some(&lib_path), RTLD_NOW | RTLD_GLOBAL)
            .map_err(|e| format!("Failed to load Oracle client library: {}", e))?;
        libloading::Library::from(unix_lib)
    };

    #[cfg(not(unix))]
    let library = unsafe {
        libloading::Library::new(&lib_path)
            .map_err(|e| format!("Failed to load Oracle client library: {}", e))?
    };

    let mutex = ORACLE_CLIENT.get_or_init(|| Mutex::new(None));
    let mut guard = mutex
        .lock()
        .map_err(|e| format!("Failed to acquire lock on Oracle client: {}", e))?;
    *guard = Some(library);

    log::info!(
        "Oracle client library loaded with RTLD_GLOBAL from: {:?}",
        lib_path
    );
    Ok(())
}

/// Checks if the Oracle client library has been loaded by `prime`.
pub fn is_primed() -> bool {
    if let Some(mutex) = ORACLE_CLIENT.get() {
        if let Ok(guard) = mutex.lock() {
            return guard.is_some();
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_override() {
        let custom = "/opt/oracle/instantclient";
        let dir = resolve_client_dir(Some(custom)).unwrap();
        assert_eq!(dir.to_string_lossy(), custom);
    }

    #[test]
    fn test_resolve_expands_tilde() {
        let dir = resolve_client_dir(Some("~/oracle/instantclient")).unwrap();
        if let Some(home) = dirs::home_dir() {
            assert!(dir.starts_with(home));
        }
        assert!(dir.ends_with("oracle/instantclient"));
    }
}
