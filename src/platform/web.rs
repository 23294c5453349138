//! Browser bindings
//!
//! `DomSurface` renders each ball as an absolutely positioned `div` inside
//! the physics container.

use glam::Vec2;
use slotmap::SlotMap;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::physics::BodyPose;
use crate::render::{BallSurface, BallVisual, Bounds, ElementHandle};
use crate::settings::Settings;

/// Id of the optional inline settings block
pub const SETTINGS_ELEMENT_ID: &str = "bingo-settings";

/// Ball elements living inside a container element
pub struct DomSurface {
    container: HtmlElement,
    /// `None` when the element could not be created
    elements: SlotMap<ElementHandle, Option<HtmlElement>>,
}

impl DomSurface {
    pub fn new(container: HtmlElement) -> Self {
        Self {
            container,
            elements: SlotMap::with_key(),
        }
    }

    /// Current size of the container
    pub fn bounds(&self) -> Bounds {
        container_bounds(&self.container)
    }

    fn build_ball(&self, label: u8, visual: &BallVisual, position: Vec2) -> Option<HtmlElement> {
        let document = self.container.owner_document()?;
        let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        el.set_class_name("ball");
        el.set_text_content(Some(&label.to_string()));

        let size = format!("{}px", visual.diameter);
        let style = el.style();
        for (name, value) in [
            ("position", "absolute"),
            ("width", size.as_str()),
            ("height", size.as_str()),
            ("line-height", size.as_str()),
            ("border-radius", "50%"),
            ("background-color", visual.color),
            ("color", "#fff"),
            ("font-weight", "bold"),
            ("text-align", "center"),
            ("z-index", "15"),
            ("pointer-events", "none"),
        ] {
            style.set_property(name, value).ok()?;
        }
        apply_pose(
            &el,
            &BodyPose {
                position,
                angle: 0.0,
            },
        );

        self.container.append_child(&el).ok()?;
        Some(el)
    }
}

impl BallSurface for DomSurface {
    fn create_ball(&mut self, label: u8, visual: &BallVisual, position: Vec2) -> ElementHandle {
        let el = self.build_ball(label, visual, position);
        if el.is_none() {
            log::error!("Could not create element for ball {}", label);
        }
        self.elements.insert(el)
    }

    fn place(&mut self, element: ElementHandle, pose: &BodyPose) {
        if let Some(Some(el)) = self.elements.get(element) {
            apply_pose(el, pose);
        }
    }

    fn is_attached(&self, element: ElementHandle) -> bool {
        matches!(self.elements.get(element), Some(Some(el)) if el.is_connected())
    }

    fn remove(&mut self, element: ElementHandle) {
        if let Some(Some(el)) = self.elements.remove(element) {
            el.remove();
        }
    }
}

fn apply_pose(el: &HtmlElement, pose: &BodyPose) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{}px", pose.position.x));
    let _ = style.set_property("top", &format!("{}px", pose.position.y));
    let _ = style.set_property(
        "transform",
        &format!("translate(-50%, -50%) rotate({}deg)", pose.angle_degrees()),
    );
}

/// Size of an element's box in CSS pixels
pub fn container_bounds(el: &HtmlElement) -> Bounds {
    let rect = el.get_bounding_client_rect();
    Bounds::new(rect.width() as f32, rect.height() as f32)
}

/// Settings from the page's inline JSON block, or defaults
pub fn settings_from_page(document: &Document) -> Settings {
    let Some(text) = document
        .get_element_by_id(SETTINGS_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return Settings::default();
    };
    match Settings::from_json(&text) {
        Ok(settings) => {
            log::info!("Loaded settings from #{}", SETTINGS_ELEMENT_ID);
            settings
        }
        Err(err) => {
            log::warn!("Ignoring #{}: {}", SETTINGS_ELEMENT_ID, err);
            Settings::default()
        }
    }
}
