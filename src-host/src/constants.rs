//! Application-wide constants
//!
//! Single source of truth for viewport presets, storage locations and
//! provider defaults used by the host.

/// Viewport presets offered in settings
pub mod viewports {
    use design_schema::Viewport;

    pub const DESKTOP: Viewport = Viewport::new(1440.0, 1024.0);
    pub const TABLET: Viewport = Viewport::new(768.0, 1024.0);
    pub const MOBILE: Viewport = Viewport::new(390.0, 844.0);
}

/// Default values for settings
pub mod defaults {
    /// Provider used until the user picks one
    pub const PROVIDER: &str = "Anthropic";
}

/// Settings storage
pub mod paths {
    /// Directory created under the platform config dir
    pub const APP_DIR: &str = "draftsmith";
    pub const SETTINGS_FILE: &str = "settings.json";
}

/// Generation limits
pub mod limits {
    /// Progress messages are sent at most every this many new characters
    pub const PROGRESS_STEP_CHARS: usize = 256;
}
