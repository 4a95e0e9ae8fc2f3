use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Class marking elements that open the wallpaper modal. Selector marker
/// only, never used for styling.
pub const DEFAULT_TRIGGER_CLASS: &str = "open-wallpaper-modal";

pub const WALLPAPER_ID_KEY: &str = "wallpaper-id";
pub const COLLECTION_ID_KEY: &str = "collection-id";

/// A node on the host page: an id, a set of classes, and a string dataset.
/// Elements are owned by the page for as long as the page is rendered; the
/// loader never creates or destroys them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub dataset: HashMap<String, String>,
}

impl Element {
    pub fn new(id: &str) -> Self {
        Element {
            id: id.to_string(),
            classes: Vec::new(),
            dataset: HashMap::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.dataset.insert(key.to_string(), value.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }
}

/// Identifiers read off the activating element. Values pass through
/// unmodified; a missing dataset entry stays `None` and is later omitted
/// from the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub wallpaper_id: Option<String>,
    pub collection_id: Option<String>,
}

impl Activation {
    fn from_element(element: &Element) -> Self {
        Activation {
            wallpaper_id: element.data(WALLPAPER_ID_KEY).map(str::to_string),
            collection_id: element.data(COLLECTION_ID_KEY).map(str::to_string),
        }
    }
}

/// Minimal host-page model. The delegate is registered once on the document
/// and class membership is tested at dispatch time, so elements inserted
/// after registration still activate.
#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
    delegate_class: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn insert(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn remove(&mut self, id: &str) {
        self.elements.remove(id);
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Register the delegated trigger handler. Calling again replaces the
    /// previous registration.
    pub fn delegate(&mut self, trigger_class: &str) {
        self.delegate_class = Some(trigger_class.to_string());
    }

    /// Route a click through the delegate. Returns an [`Activation`] when the
    /// clicked element currently carries the trigger class, `None` otherwise
    /// (unknown element, no delegate, or class not present).
    pub fn click(&self, element_id: &str) -> Option<Activation> {
        let class = self.delegate_class.as_deref()?;
        let element = self.elements.get(element_id)?;
        if element.has_class(class) {
            Some(Activation::from_element(element))
        } else {
            None
        }
    }
}
