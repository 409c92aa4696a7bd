//! The handful of page elements the bootstrap writes to.

use std::cell::{Cell, RefCell};

use log::error;

use crate::config::BootConfig;

/// Text sink keyed by element id.
pub trait Page {
    /// Replace the text of element `id`. Returns false when the element does
    /// not exist, which is not an error: pages without a status widget still boot.
    fn set_element_text(&self, id: &str, text: &str) -> bool;
}

impl<T: Page + ?Sized> Page for &T {
    fn set_element_text(&self, id: &str, text: &str) -> bool {
        (**self).set_element_text(id, text)
    }
}

impl<T: Page + ?Sized> Page for std::rc::Rc<T> {
    fn set_element_text(&self, id: &str, text: &str) -> bool {
        (**self).set_element_text(id, text)
    }
}

/// Write a fatal message to the error element and mirror it to the log.
pub fn report_failure(page: &impl Page, config: &BootConfig, message: &str) {
    error!("{message}");
    if !page.set_element_text(&config.error_element_id, message) {
        error!("error element `{}` missing from page", config.error_element_id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    Assets,
    Graphics,
}

impl LoadingStage {
    pub fn label(self) -> &'static str {
        match self {
            LoadingStage::Assets => "assets",
            LoadingStage::Graphics => "graphics",
        }
    }
}

pub fn show_stage(page: &impl Page, config: &BootConfig, stage: LoadingStage) {
    page.set_element_text(&config.status_element_id, stage.label());
}

/// Lets only the first crash report through.
#[derive(Debug, Default)]
pub struct CrashLatch {
    tripped: Cell<bool>,
}

impl CrashLatch {
    pub const fn new() -> Self {
        Self {
            tripped: Cell::new(false),
        }
    }

    /// True exactly once: for the first caller.
    pub fn trip(&self) -> bool {
        !self.tripped.replace(true)
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.get()
    }
}

/// Page double that keeps every write, plus a fixed set of existing elements.
#[derive(Debug, Default)]
pub struct RecordingPage {
    elements: Vec<String>,
    writes: RefCell<Vec<(String, String)>>,
}

impl RecordingPage {
    pub fn with_elements(ids: &[&str]) -> Self {
        Self {
            elements: ids.iter().map(|id| id.to_string()).collect(),
            writes: RefCell::default(),
        }
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.borrow().clone()
    }

    /// Last text written to `id`.
    pub fn text(&self, id: &str) -> Option<String> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|(el, _)| el == id)
            .map(|(_, text)| text.clone())
    }
}

impl Page for RecordingPage {
    fn set_element_text(&self, id: &str, text: &str) -> bool {
        if !self.elements.iter().any(|el| el == id) {
            return false;
        }
        self.writes
            .borrow_mut()
            .push((id.to_string(), text.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_goes_to_error_element() {
        let cfg = BootConfig::default();
        let page = RecordingPage::with_elements(&["errorreason", "loadingcomponent"]);

        report_failure(&page, &cfg, "Error fetching assets: boom");
        assert_eq!(
            page.text("errorreason").as_deref(),
            Some("Error fetching assets: boom")
        );
        assert_eq!(page.text("loadingcomponent"), None);
    }

    #[test]
    fn missing_elements_are_tolerated() {
        let cfg = BootConfig::default();
        let page = RecordingPage::default();

        report_failure(&page, &cfg, "nothing to write to");
        show_stage(&page, &cfg, LoadingStage::Assets);
        assert!(page.writes().is_empty());
    }

    #[test]
    fn stages_write_labels() {
        let cfg = BootConfig::default();
        let page = RecordingPage::with_elements(&["loadingcomponent"]);

        show_stage(&page, &cfg, LoadingStage::Assets);
        show_stage(&page, &cfg, LoadingStage::Graphics);
        assert_eq!(
            page.writes(),
            vec![
                ("loadingcomponent".to_string(), "assets".to_string()),
                ("loadingcomponent".to_string(), "graphics".to_string()),
            ]
        );
    }

    #[test]
    fn crash_latch_trips_once() {
        let latch = CrashLatch::new();
        assert!(!latch.is_tripped());
        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(latch.is_tripped());
    }
}
