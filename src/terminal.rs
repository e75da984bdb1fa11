//! Spawns the configured terminal command, double-forked so it survives
//! the window manager's own death without being reparented to it.

use std::ffi::CString;

use log::warn;

/// Forks twice: the first child calls `setsid` (so it becomes its own
/// session leader and any `SIGCHLD` from the second fork goes to it, not
/// to us) and forks again to `execvp` the terminal, then exits immediately
/// so we don't have to wait for the terminal itself. We only wait on the
/// first fork.
pub fn spawn(command: &str) {
    let path = match CString::new(command) {
        Ok(path) => path,
        Err(_) => {
            warn!("terminal command {:?} contains a NUL byte", command);
            return;
        }
    };

    unsafe {
        match libc::fork() {
            -1 => warn!("fork failed spawning terminal"),
            0 => {
                if libc::setsid() == -1 {
                    libc::_exit(1);
                }
                match libc::fork() {
                    -1 => libc::_exit(1),
                    0 => {
                        let argv: [*const libc::c_char; 2] = [path.as_ptr(), std::ptr::null()];
                        libc::execvp(path.as_ptr(), argv.as_ptr());
                        libc::_exit(1);
                    }
                    _ => libc::_exit(0),
                }
            }
            pid => {
                let mut status = 0;
                libc::waitpid(pid, &mut status, 0);
            }
        }
    }
}
