use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;

use crate::web_error_handling::JsResult;


// Implemented for `EventTarget`, so it is available on elements and on the websocket alike.
pub trait WebEventTargetExt {
    // Listeners live as long as the page: they are registered once at startup and never removed,
    // so leaking the closure is fine. An `Err` returned from the listener is thrown into JS.
    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()>;
}

impl WebEventTargetExt for web_sys::EventTarget {
    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()> {
        let closure = Closure::<dyn FnMut(E) -> JsResult<()>>::new(listener);
        self.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

pub trait WebElementExt {
    fn set_hidden(&self, hidden: bool) -> JsResult<()>;
    fn is_hidden(&self) -> bool;
}

impl WebElementExt for web_sys::Element {
    fn set_hidden(&self, hidden: bool) -> JsResult<()> {
        self.class_list().toggle_with_force("hidden", hidden)?;
        Ok(())
    }

    fn is_hidden(&self) -> bool { self.class_list().contains("hidden") }
}

// `data-column` of the clicked element, if it is a column at all. Text nodes and SVG elements
// have no dataset and count as "outside".
pub fn column_attribute(target: Option<web_sys::EventTarget>) -> Option<String> {
    target?.dyn_into::<web_sys::HtmlElement>().ok()?.dataset().get("column")
}
