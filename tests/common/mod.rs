//! Shared helpers for the CLI integration tests: scripted stand-ins for the
//! compiler under test and the build program, staged inside temp trees.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable shell script and returns its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("script should be written");
    let mut perms = fs::metadata(&path)
        .expect("script metadata should be readable")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("script should be made executable");
    path
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

/// A compiler stand-in that appends each invocation's argv to `log` and
/// echoes the fixture file back on stdout.
pub fn logging_cat_compiler(dir: &Path, log: &Path) -> PathBuf {
    write_script(
        dir,
        "compiler467",
        &format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> {}\ncat \"$1\"\n",
            log.display()
        ),
    )
}
