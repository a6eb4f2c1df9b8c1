use std::sync::Mutex;

/// Host hook for location changes the core forces on the UI.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Keeps the most recent forced navigation for hosts that poll instead of
/// reacting immediately.
#[derive(Default)]
pub struct PendingNavigation {
    target: Mutex<Option<String>>,
}

impl PendingNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<String> {
        self.target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Navigator for PendingNavigation {
    fn navigate(&self, path: &str) {
        log::debug!("Navigation requested: {}", path);
        *self
            .target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_navigation_keeps_latest() {
        let pending = PendingNavigation::new();
        assert_eq!(pending.take(), None);

        pending.navigate("/student");
        pending.navigate("/login");
        assert_eq!(pending.take().as_deref(), Some("/login"));
        assert_eq!(pending.take(), None);
    }
}
