use crate::ui::messages;
use std::fmt;
use tracing::debug;

/// Narrates browser actions: printed with `--annotate-actions`, logged otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotator {
    enabled: bool,
}

impl Annotator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn annotate<T: fmt::Display>(&self, msg: T) {
        if self.enabled {
            messages::step(&msg);
        }
        debug!("{msg}");
    }
}
