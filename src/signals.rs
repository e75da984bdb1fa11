//! Signal handling: SIGINT/SIGTERM/SIGSEGV set a flag the event loop checks
//! after every interrupted wait, the Rust-native replacement for a raw
//! global `volatile sig_atomic_t`.

use std::sync::atomic::{AtomicI32, Ordering};

static SIGCODE: AtomicI32 = AtomicI32::new(0);

extern "C" fn handler(sig: libc::c_int) {
    SIGCODE.store(sig, Ordering::SeqCst);
}

/// Installs the handler for SIGINT, SIGTERM and SIGSEGV. Returns `Err` if
/// any `signal(2)` call fails.
pub fn install() -> Result<(), &'static str> {
    for sig in [libc::SIGINT, libc::SIGTERM, libc::SIGSEGV] {
        let prev = unsafe { libc::signal(sig, handler as libc::sighandler_t) };
        if prev == libc::SIG_ERR {
            return Err("signal");
        }
    }
    Ok(())
}

/// The last-caught signal, or 0 if none has arrived yet.
pub fn caught() -> i32 {
    SIGCODE.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caught_starts_at_zero() {
        assert_eq!(caught(), 0);
    }
}
