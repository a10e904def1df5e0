/// The parameters of a window, consumed once when the window is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowCreateInfo {
    /// The title of the window.
    ///
    /// **Default:** `""`
    pub title: String,

    /// The initial width of the window, in pixels.
    ///
    /// **Default:** `640`
    pub width: u32,

    /// The initial height of the window, in pixels.
    ///
    /// **Default:** `480`
    pub height: u32,

    /// Whether the window should be resizable by the user.
    ///
    /// **Default:** `false`
    pub resizable: bool,

    /// Whether the window class should allow closing the window from its title bar.
    ///
    /// When `false`, the class only carries the "no close" style.
    ///
    /// **Default:** `true`
    pub closable: bool,

    /// Whether debugging facilities were requested for the window.
    ///
    /// **Default:** `false`
    pub debug: bool,
}

impl WindowCreateInfo {
    /// Creates a new [`WindowCreateInfo`] with the given title and the default values for
    /// everything else.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for WindowCreateInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: 640,
            height: 480,
            resizable: false,
            closable: true,
            debug: false,
        }
    }
}
