use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::{
    foundation::error::{ConfettiError, ConfettiResult},
    stage::{backend::Stage, stylesheet::STYLE_MARKER_ATTR},
};

// A browser page has one document, so one flag covers the whole runtime.
static STYLESHEET_INSTALLED: AtomicBool = AtomicBool::new(false);

/// [`Stage`] over the browser DOM.
#[derive(Clone, Debug)]
pub struct DomStage {
    document: Document,
}

impl DomStage {
    /// Stage over `window.document`.
    pub fn new() -> ConfettiResult<Self> {
        let window = web_sys::window().ok_or_else(|| ConfettiError::stage("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| ConfettiError::stage("window has no document"))?;
        Ok(Self { document })
    }

    /// Stage over a specific document.
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }
}

fn js_err(err: JsValue) -> ConfettiError {
    ConfettiError::stage(format!("{err:?}"))
}

impl Stage for DomStage {
    type Node = HtmlElement;

    fn create_element(&self, tag: &str) -> ConfettiResult<HtmlElement> {
        self.document
            .create_element(tag)
            .map_err(js_err)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ConfettiError::stage(format!("<{tag}> is not an HTML element")))
    }

    fn append_child(&self, parent: &HtmlElement, child: &HtmlElement) -> ConfettiResult<()> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn clear_children(&self, node: &HtmlElement) -> ConfettiResult<()> {
        node.set_inner_html("");
        Ok(())
    }

    fn add_class(&self, node: &HtmlElement, class: &str) -> ConfettiResult<()> {
        node.class_list().add_1(class).map_err(js_err)
    }

    fn set_property(&self, node: &HtmlElement, name: &str, value: &str) -> ConfettiResult<()> {
        node.style().set_property(name, value).map_err(js_err)
    }

    fn has_stylesheet(&self) -> bool {
        if STYLESHEET_INSTALLED.load(Ordering::Relaxed) {
            return true;
        }
        matches!(
            self.document
                .query_selector(&format!("style[{STYLE_MARKER_ATTR}]")),
            Ok(Some(_))
        )
    }

    fn install_stylesheet(&self, css: &str) -> ConfettiResult<()> {
        let style = self.document.create_element("style").map_err(js_err)?;
        style.set_attribute(STYLE_MARKER_ATTR, "").map_err(js_err)?;
        style.set_text_content(Some(css));
        let head = self
            .document
            .head()
            .ok_or_else(|| ConfettiError::stage("document has no <head>"))?;
        head.append_child(&style).map_err(js_err)?;
        STYLESHEET_INSTALLED.store(true, Ordering::Relaxed);
        Ok(())
    }
}
