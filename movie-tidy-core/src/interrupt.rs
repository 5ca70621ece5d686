use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag for a run, plus whether the operator is being prompted.
///
/// The signal handler uses the prompt state to decide between stopping
/// after the current file and exiting right away.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    requested: Arc<AtomicBool>,
    prompting: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Returns true while a [`PromptGuard`] is alive.
    pub fn prompt_active(&self) -> bool {
        self.prompting.load(Ordering::SeqCst)
    }
}

/// RAII helper that marks the selection prompt as active while in scope.
pub struct PromptGuard<'a> {
    interrupt: &'a Interrupt,
}

impl<'a> PromptGuard<'a> {
    pub fn activate(interrupt: &'a Interrupt) -> Self {
        interrupt.prompting.store(true, Ordering::SeqCst);
        Self { interrupt }
    }
}

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        self.interrupt.prompting.store(false, Ordering::SeqCst);
    }
}
