use asset_bootstrap::Page;
use wasm_bindgen::JsCast;

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Writes straight into the live document.
pub(super) struct DomPage;

impl Page for DomPage {
    fn set_element_text(&self, id: &str, text: &str) -> bool {
        let Some(el) = document().and_then(|d| d.get_element_by_id(id)) else {
            return false;
        };
        match el.dyn_ref::<web_sys::HtmlElement>() {
            Some(html) => html.set_inner_text(text),
            None => el.set_text_content(Some(text)),
        }
        true
    }
}

pub(super) fn element_text(id: &str) -> Option<String> {
    document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.text_content())
}
