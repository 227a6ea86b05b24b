//! Render constants
//!
//! Fixed system defaults used as the last tier of every resolution chain.

use design_schema::Rgba;

/// Fonts
pub mod fonts {
    /// Family used when the requested family cannot be loaded
    pub const FALLBACK_FAMILY: &str = "Inter";
    /// Style used when the requested style cannot be loaded
    pub const FALLBACK_STYLE: &str = "Regular";

    /// Fonts every host installation is assumed to have
    pub const INSTALLED: &[(&str, &[&str])] = &[
        (
            "Inter",
            &[
                "Thin",
                "Extra Light",
                "Light",
                "Regular",
                "Medium",
                "Semi Bold",
                "Bold",
                "Extra Bold",
                "Black",
            ],
        ),
        ("Roboto", &["Regular", "Medium", "Bold"]),
    ];
}

/// Default property values
pub mod defaults {
    use super::Rgba;

    /// Size of a freshly created frame or shape
    pub const NODE_SIZE: f64 = 100.0;
    /// Font size of a freshly created text node
    pub const HOST_FONT_SIZE: f64 = 12.0;
    /// Font size applied when a text element names none
    pub const FONT_SIZE: f64 = 16.0;
    /// Smallest extent an auto-layout frame may end up with on either axis
    pub const MIN_EXTENT: f64 = 1.0;

    /// Host default fill for rectangles and ellipses (#D9D9D9), also used
    /// when a paint names neither a variable nor a color
    pub const SHAPE_FILL: Rgba = Rgba::rgb(0.851, 0.851, 0.851);
    /// Stroke and text color used when a paint names neither
    pub const INK: Rgba = Rgba::BLACK;
    /// Shadow color when an effect names none
    pub const SHADOW: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.25,
    };
    pub const SHADOW_OFFSET_Y: f64 = 4.0;
    pub const EFFECT_RADIUS: f64 = 4.0;
}
