use parking_lot::{Mutex, MutexGuard, const_mutex};

static FORM_LOCK: Mutex<()> = const_mutex(());

/// Held while a test reads or writes the process-wide form.
pub type FormGuard = MutexGuard<'static, ()>;

/// Serialise tests that depend on the process-wide form.
///
/// Tests run on parallel threads within one binary; any test that calls
/// `set_form` or manifests without an explicit form must hold this guard.
pub fn lock_form() -> FormGuard {
    FORM_LOCK.lock()
}
