use log::{debug, info};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn suppressed(&self, class_label: &str, reason: &str) {
        debug!("suppressed {}: {}", class_label, reason);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
