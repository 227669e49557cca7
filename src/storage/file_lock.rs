use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::core::error::{Error, ErrorKind, Result};

/// Single writer guarantee for one store directory
pub struct FileLock {
    pub file: File,
}

impl FileLock {
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path)?;

        #[cfg(unix)]
        {
            use libc::{LOCK_EX, LOCK_NB, flock};
            use std::os::unix::io::AsRawFd;

            let fd = file.as_raw_fd();
            // SAFETY: fd is owned by `file`, which outlives this call.
            let rc = unsafe { flock(fd, LOCK_EX | LOCK_NB) };
            if rc != 0 {
                return Err(Error::new(
                    ErrorKind::InvalidState,
                    format!("store at {} is already open", lock_path.display()),
                ));
            }
        }

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use libc::{LOCK_UN, flock};
            use std::os::unix::io::AsRawFd;

            let fd = self.file.as_raw_fd();
            // SAFETY: fd is still owned by `self.file`.
            unsafe {
                flock(fd, LOCK_UN);
            }
        }
    }
}
