use crate::models::{MODEL_OPTIONS, ModelOption, position};

/// Overlay list of the catalog. Highlight wraps at both ends.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModelPicker {
    open: bool,
    highlighted: usize,
}

impl ModelPicker {
    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub(crate) fn open(&mut self, current: ModelOption) {
        self.open = true;
        self.highlighted = position(current.id).unwrap_or(0);
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn move_up(&mut self) {
        self.highlighted = if self.highlighted == 0 {
            MODEL_OPTIONS.len() - 1
        } else {
            self.highlighted - 1
        };
    }

    pub(crate) fn move_down(&mut self) {
        self.highlighted = (self.highlighted + 1) % MODEL_OPTIONS.len();
    }

    pub(crate) fn confirm(&mut self) -> ModelOption {
        self.open = false;
        MODEL_OPTIONS[self.highlighted % MODEL_OPTIONS.len()]
    }
}
