//! DOM-backed implementations of the core's geometry, marker and style
//! capabilities.

use shipwake_core::{GeometryProvider, MarkerSink, StyleSink};
use shipwake_protocol::{MarkerPosition, Rect};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, Window};

use crate::BridgeError;

fn client_rect(el: &Element) -> Option<Rect> {
    if !el.is_connected() {
        return None;
    }
    let r = el.get_bounding_client_rect();
    Some(Rect::from_edges(r.left(), r.top(), r.right(), r.bottom()))
}

pub(crate) fn element_by_id(document: &Document, id: &str) -> Result<Element, BridgeError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| BridgeError::MissingElement(id.to_owned()))
}

/// Reads layout from live elements. A detached element reports no
/// geometry, which the tracker treats as "not ready".
pub(crate) struct DomGeometry {
    pub(crate) window: Window,
    pub(crate) document: Document,
    pub(crate) anchor: Element,
    pub(crate) container: Element,
    pub(crate) path: Option<Element>,
    pub(crate) entry_selector: String,
}

impl GeometryProvider for DomGeometry {
    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn anchor_rect(&self) -> Option<Rect> {
        client_rect(&self.anchor)
    }

    fn container_rect(&self) -> Option<Rect> {
        client_rect(&self.container)
    }

    fn path_rect(&self) -> Option<Rect> {
        self.path.as_ref().and_then(client_rect)
    }

    fn entry_rects(&self) -> Vec<Rect> {
        let Ok(nodes) = self.document.query_selector_all(&self.entry_selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| client_rect(&el))
            .collect()
    }
}

/// Absolutely positioned ship element inside the container.
pub(crate) struct DomMarker {
    style: CssStyleDeclaration,
}

impl DomMarker {
    pub(crate) fn new(element: Element) -> Result<Self, BridgeError> {
        let element = element
            .dyn_into::<HtmlElement>()
            .map_err(|_| BridgeError::NotHtml("marker"))?;
        Ok(Self {
            style: element.style(),
        })
    }
}

impl MarkerSink for DomMarker {
    fn place_marker(&mut self, position: &MarkerPosition) {
        // A failed style write leaves the ship where it was.
        let _ = self
            .style
            .set_property("left", &format!("{}px", position.left()));
        let _ = self
            .style
            .set_property("top", &format!("{}px", position.top()));
        let _ = self.style.set_property(
            "transform",
            &format!("translate(-50%, -50%) rotate({}deg)", -position.heading_deg),
        );
    }
}

/// Inline style of `<html>`, where the theme's custom properties live.
pub(crate) struct RootStyle {
    style: CssStyleDeclaration,
}

impl RootStyle {
    pub(crate) fn new(document: &Document) -> Result<Self, BridgeError> {
        let root = document
            .document_element()
            .ok_or(BridgeError::NoDocument)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| BridgeError::NotHtml("document root"))?;
        Ok(Self {
            style: root.style(),
        })
    }
}

impl StyleSink for RootStyle {
    fn set_property(&mut self, name: &str, value: &str) {
        let _ = self.style.set_property(name, value);
    }
}
