mod dom;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use shipwake_core::{
    ConfigError, GeometryProvider, ScrollTracker, ThemeMode, ThemeSwitcher, ViewportEvent,
    WakeConfig, build_curve,
};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

use dom::{DomGeometry, DomMarker, RootStyle, element_by_id};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    MissingElement(String),
    #[error("{0} is not an HTML element")]
    NotHtml(&'static str),
    #[error("invalid mount options: {0}")]
    Options(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("DOM call failed: {0}")]
    Dom(String),
}

/// Element ids and selectors the page uses for the timeline. Every field
/// has a default matching the portfolio markup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    pub anchor_id: String,
    pub container_id: String,
    /// `<svg>` the voyage path is drawn in. Its `<path>` child gets the
    /// curve data after each relayout.
    pub path_id: Option<String>,
    pub marker_id: String,
    pub entry_selector: String,
    pub config: WakeConfig,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            anchor_id: "hackathons".into(),
            container_id: "timeline".into(),
            path_id: Some("voyage-path".into()),
            marker_id: "ship".into(),
            entry_selector: ".timeline-card".into(),
            config: WakeConfig::default(),
        }
    }
}

impl MountOptions {
    pub fn from_json(json: Option<&str>) -> Result<Self, BridgeError> {
        let options: MountOptions = match json {
            Some(s) if !s.trim().is_empty() => serde_json::from_str(s)?,
            _ => MountOptions::default(),
        };
        options.config.validate()?;
        Ok(options)
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

struct Voyage {
    tracker: ScrollTracker,
    geometry: DomGeometry,
    marker: DomMarker,
    path_svg: Option<Element>,
    /// Layout generation the `<path>` was last drawn for.
    drawn: u64,
}

impl Voyage {
    fn handle(&mut self, event: ViewportEvent) {
        self.tracker
            .handle_event(event, &self.geometry, &mut self.marker);
        // A dirty layout may be rebuilt by any event, not just the one that
        // dirtied it. Resizes change the element width the viewBox spans.
        let generation = self.tracker.layout_generation();
        if needs_redraw(self.drawn, generation, event) && self.draw_path() {
            self.drawn = generation;
        }
    }

    /// Copy the current curve into the page's `<svg><path/></svg>`, one
    /// user unit per CSS px so the path lines up with the marker. Returns
    /// `false` when there is nothing to draw yet.
    fn draw_path(&self) -> bool {
        let (Some(svg), Some(sampler)) = (&self.path_svg, self.tracker.sampler()) else {
            return false;
        };
        let curve = sampler.curve();
        let width = self
            .geometry
            .path_rect()
            .map_or(0.0, |r| r.w)
            .max(1.0);
        let height = curve.extent.max(1.0);
        for (name, value) in [
            ("viewBox", format!("{} 0 {width} {height}", -width / 2.0)),
            ("width", width.to_string()),
            ("height", height.to_string()),
            ("preserveAspectRatio", "none".to_owned()),
        ] {
            let _ = svg.set_attribute(name, &value);
        }
        if let Ok(Some(path)) = svg.query_selector("path") {
            let _ = path.set_attribute("d", &curve.to_svg_path());
        }
        true
    }
}

fn needs_redraw(drawn: u64, generation: u64, event: ViewportEvent) -> bool {
    generation != drawn || (generation > 0 && event == ViewportEvent::Resize)
}

/// Scroll-driven ship for the hackathon timeline.
///
/// Constructing it measures the timeline, positions the ship and starts
/// listening to `scroll`/`resize`. Calling `free()` from JavaScript
/// removes the listeners.
#[wasm_bindgen]
pub struct ShipWake {
    voyage: Rc<RefCell<Voyage>>,
    window: Window,
    on_scroll: Closure<dyn FnMut()>,
    on_resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl ShipWake {
    /// `options` is an optional JSON object overriding [`MountOptions`].
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<ShipWake, JsError> {
        MountOptions::from_json(options.as_deref())
            .and_then(Self::mount)
            .map_err(|e| {
                web_sys::console::error_1(&format!("shipwake: mount failed: {e}").into());
                JsError::from(e)
            })
    }

    /// Scroll progress in `[0, 1]` at the last update.
    pub fn progress(&self) -> f64 {
        self.voyage.borrow().tracker.progress()
    }

    /// Index of the last timeline entry the ship has passed, or -1.
    #[wasm_bindgen(js_name = activeEntry)]
    pub fn active_entry(&self) -> i32 {
        self.voyage
            .borrow()
            .tracker
            .active_entry()
            .map_or(-1, |i| i32::try_from(i).unwrap_or(i32::MAX))
    }

    /// Call after timeline cards are added, removed or resized.
    pub fn relayout(&self) {
        self.voyage.borrow_mut().handle(ViewportEvent::LayoutChanged);
    }

    /// SVG path data of the current curve, if one has been built.
    #[wasm_bindgen(js_name = curvePath)]
    pub fn curve_path(&self) -> Option<String> {
        self.voyage
            .borrow()
            .tracker
            .sampler()
            .map(|s| s.curve().to_svg_path())
    }
}

impl ShipWake {
    fn mount(options: MountOptions) -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
        let document = window.document().ok_or(BridgeError::NoDocument)?;

        let geometry = DomGeometry {
            anchor: element_by_id(&document, &options.anchor_id)?,
            container: element_by_id(&document, &options.container_id)?,
            path: match &options.path_id {
                Some(id) => Some(element_by_id(&document, id)?),
                None => None,
            },
            entry_selector: options.entry_selector.clone(),
            window: window.clone(),
            document: document.clone(),
        };
        let marker = DomMarker::new(element_by_id(&document, &options.marker_id)?)?;
        let path_svg = geometry.path.clone();

        let voyage = Rc::new(RefCell::new(Voyage {
            tracker: ScrollTracker::new(options.config),
            geometry,
            marker,
            path_svg,
            drawn: 0,
        }));
        voyage.borrow_mut().handle(ViewportEvent::Mount);

        let wake = Self {
            on_scroll: listener(&voyage, ViewportEvent::Scroll),
            on_resize: listener(&voyage, ViewportEvent::Resize),
            voyage,
            window,
        };
        // On error `wake` is dropped, which unregisters whatever was added.
        wake.window
            .add_event_listener_with_callback("scroll", wake.on_scroll.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::Dom(format!("{e:?}")))?;
        wake.window
            .add_event_listener_with_callback("resize", wake.on_resize.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::Dom(format!("{e:?}")))?;
        Ok(wake)
    }
}

fn listener(voyage: &Rc<RefCell<Voyage>>, event: ViewportEvent) -> Closure<dyn FnMut()> {
    let voyage = Rc::clone(voyage);
    Closure::new(move || {
        if let Ok(mut v) = voyage.try_borrow_mut() {
            v.handle(event);
        }
    })
}

impl Drop for ShipWake {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

/// Light/dark switch writing CSS custom properties onto `<html>`.
#[wasm_bindgen]
pub struct ThemeToggle {
    switcher: ThemeSwitcher<RootStyle>,
}

#[wasm_bindgen]
impl ThemeToggle {
    /// Applies the light theme immediately.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ThemeToggle, JsError> {
        let document = web_sys::window()
            .ok_or(BridgeError::NoWindow)?
            .document()
            .ok_or(BridgeError::NoDocument)?;
        Ok(Self {
            switcher: ThemeSwitcher::new(RootStyle::new(&document)?),
        })
    }

    /// Flip the theme; returns `"light"` or `"dark"`.
    pub fn toggle(&mut self) -> String {
        let mode = self.switcher.toggle_theme();
        web_sys::console::debug_1(&format!("shipwake: theme {mode}").into());
        mode.to_string()
    }

    pub fn mode(&self) -> String {
        self.switcher.mode().to_string()
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.switcher.mode() == ThemeMode::Dark
    }
}

/// SVG path data for a timeline of `entry_count` cards spanning `extent`
/// px, using the default curve constants.
#[wasm_bindgen(js_name = curvePath)]
pub fn curve_path(entry_count: usize, extent: f64) -> String {
    build_curve(entry_count, extent).to_svg_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_portfolio_markup() {
        let options = MountOptions::from_json(None).unwrap();
        assert_eq!(options, MountOptions::default());
        assert_eq!(options.anchor_id, "hackathons");
        assert_eq!(MountOptions::from_json(Some("  ")).unwrap(), options);
    }

    #[test]
    fn options_override_ids_and_config() {
        let options = MountOptions::from_json(Some(
            r#"{"marker_id":"boat","path_id":null,"config":{"tracker":{"scroll_offset":60.0}}}"#,
        ))
        .unwrap();
        assert_eq!(options.marker_id, "boat");
        assert_eq!(options.path_id, None);
        assert_eq!(options.container_id, "timeline");
        assert_eq!(options.config.tracker.scroll_offset, 60.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = MountOptions::from_json(Some(r#"{"config":{"curve":{"period":-1}}}"#))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn path_redraws_after_any_rebuild_and_on_resize() {
        // Mount found no cards: nothing to draw yet.
        assert!(!needs_redraw(0, 0, ViewportEvent::Mount));
        assert!(!needs_redraw(0, 0, ViewportEvent::Resize));
        // First measurable scroll rebuilt the curve.
        assert!(needs_redraw(0, 1, ViewportEvent::Scroll));
        assert!(!needs_redraw(1, 1, ViewportEvent::Scroll));
        assert!(needs_redraw(1, 1, ViewportEvent::Resize));
        assert!(needs_redraw(1, 2, ViewportEvent::LayoutChanged));
    }

    #[test]
    fn exported_curve_path() {
        assert!(curve_path(3, 400.0).contains('Q'));
        assert!(!curve_path(3, 0.0).contains('Q'));
        assert!(curve_path(5, 1e300).starts_with('M'));
    }
}
