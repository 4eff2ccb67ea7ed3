//! Small filesystem helpers shared by the settings and credentials files.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write `content` through a temp file and rename it into place.
///
/// On unix the file is created 0600 and its parent directory tightened to 0700.
pub fn write_private_atomic(path: &Path, content: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::debug!(dir = %parent.display(), "failed to set directory permissions: {}", e);
            }
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&tmp_path)?;
        // mode() only applies on create
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

/// Move an unreadable file aside as `<name>.corrupt` so defaults can load.
pub fn preserve_corrupt(path: &Path, content: &str) {
    let mut corrupt = path.as_os_str().to_owned();
    corrupt.push(".corrupt");
    let corrupt_path = Path::new(&corrupt);
    if fs::rename(path, corrupt_path).is_err() {
        let _ = fs::write(corrupt_path, content);
    }
}
