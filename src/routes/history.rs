use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Navigation seam between session logic and whatever presents views.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// In-memory navigation history; the last entry is the current location.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            entries: Mutex::new(vec![initial.to_string()]),
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(super::paths::ROOT)
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.lock().last().cloned().unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        debug!("navigate to {path}");
        let mut entries = self.lock();
        if entries.last().map(String::as_str) != Some(path) {
            entries.push(path.to_string());
        }
    }
}
