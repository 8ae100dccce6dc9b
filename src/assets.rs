//! Image assets keyed by logical name
//!
//! The store hands out browser-managed `HtmlImageElement`s; decoding happens
//! asynchronously in the browser, so consumers only receive an image once it
//! has finished loading and draw a flat fallback shape until then.

use std::collections::HashMap;

use web_sys::HtmlImageElement;

/// Drawable images by logical name ("ship", "asteroid", "can", "moon",
/// "earth")
#[derive(Default)]
pub struct AssetStore {
    images: HashMap<String, HtmlImageElement>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image by URL; the browser loads it in the background
    pub fn insert(&mut self, name: &str, url: &str) {
        match HtmlImageElement::new() {
            Ok(img) => {
                img.set_src(url);
                self.images.insert(name.to_string(), img);
            }
            Err(e) => log::warn!("failed to create image element for {name}: {e:?}"),
        }
    }

    /// Fetch an image, only once it is fully loaded and non-empty
    pub fn get(&self, name: &str) -> Option<&HtmlImageElement> {
        self.images
            .get(name)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    /// Standard sprite set for the game
    pub fn with_default_sprites() -> Self {
        let mut store = Self::new();
        for name in ["ship", "asteroid", "can", "moon", "earth"] {
            store.insert(name, &format!("assets/{name}.png"));
        }
        store
    }
}
