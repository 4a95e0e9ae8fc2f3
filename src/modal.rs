/// Owner object for the singleton wallpaper modal.
///
/// The page has exactly one of these; all writes to the content region and
/// all visibility changes go through it instead of a global element lookup.
#[derive(Debug, Default)]
pub struct WallpaperModal {
    content: String,
    visible: bool,
    error: Option<String>,
}

impl WallpaperModal {
    pub fn new() -> Self {
        WallpaperModal::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the content region wholesale. Clears any error left by an
    /// earlier failed activation.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.error = None;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Record a failed activation. Content and visibility are untouched.
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }
}
