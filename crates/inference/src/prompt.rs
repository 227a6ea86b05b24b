//! System prompt construction
//!
//! The prompt has two mutually exclusive modes. When the host document carries
//! a design system the model only sees token *names* and is told literal
//! colors and spacing are errors. Otherwise it gets a fallback palette and is
//! told to use literal values.
//!
//! Building is pure: identical inputs always yield identical text.

use std::fmt::Write as _;

use design_schema::{Rgba, Viewport};
use design_tokens::{DesignSystemSnapshot, LetterSpacing, LineHeight, TextStyle};
use serde::{Deserialize, Serialize};

/// Deepest nesting the model is asked to produce
pub const MAX_NESTING_DEPTH: usize = 6;

/// Named fallback color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    /// `#RRGGBB`
    pub hex: String,
}

impl PaletteColor {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
        }
    }
}

/// Colors offered to the model when no design system exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<PaletteColor>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                PaletteColor::new("Primary", "#18A0FB"),
                PaletteColor::new("Secondary", "#7B61FF"),
                PaletteColor::new("Background", "#FFFFFF"),
                PaletteColor::new("Surface", "#F5F5F5"),
                PaletteColor::new("Text", "#1E1E1E"),
                PaletteColor::new("Text Secondary", "#6B6B6B"),
                PaletteColor::new("Border", "#E0E0E0"),
                PaletteColor::new("Success", "#14AE5C"),
                PaletteColor::new("Warning", "#FFCD29"),
                PaletteColor::new("Error", "#F24822"),
            ],
        }
    }
}

impl Palette {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

const OUTPUT_FORMAT: &str = r#"You are a senior product designer generating UI screens for a visual design tool.

## OUTPUT FORMAT
Respond with a single JSON object and nothing else. No markdown, no code fences, no commentary before or after the JSON.
The root object MUST have a "name" (string) and a "children" (array) field.

## SCHEMA
Root:
{
  "name": string,
  "layoutMode": "VERTICAL" | "HORIZONTAL" | "NONE",
  "primaryAxisAlignItems": "MIN" | "CENTER" | "MAX" | "SPACE_BETWEEN",
  "counterAxisAlignItems": "MIN" | "CENTER" | "MAX" | "BASELINE",
  "padding" | "paddingTop" | "paddingRight" | "paddingBottom" | "paddingLeft": number,
  "itemSpacing": number,
  "fills": [Paint],
  "children": [Element]
}

Element (every element):
{
  "type": "FRAME" | "TEXT" | "RECTANGLE" | "ELLIPSE" | "LINE" | "INSTANCE",
  "name": string,
  "width": number, "height": number,
  "layoutSizingHorizontal": "FIXED" | "HUG" | "FILL",
  "layoutSizingVertical": "FIXED" | "HUG" | "FILL",
  "layoutPositioning": "AUTO" | "ABSOLUTE", "x": number, "y": number,
  "fills": [Paint], "strokes": [Paint], "strokeWeight": number,
  "cornerRadius": number, "opacity": number, "effects": [Effect]
}
FRAME adds the root's layout fields ("layoutMode", alignment, padding, "itemSpacing", "clipsContent") and "children".
TEXT adds: "characters": string, "fontFamily": string, "fontWeight": 100-900, "fontSize": number,
  "lineHeight": number, "letterSpacing": number, "textAlignHorizontal": "LEFT" | "CENTER" | "RIGHT" | "JUSTIFIED".
INSTANCE adds: "componentKey": string, "componentName": string, "componentProperties": object, "children".

Paint: { "type": "SOLID", "color": { "r": 0-1, "g": 0-1, "b": 0-1, "a": 0-1 }, "opacity": 0-1 }
  or { "type": "GRADIENT_LINEAR", "gradientStops": [{ "position": 0-1, "color": {...} }] }
Effect: { "type": "DROP_SHADOW" | "INNER_SHADOW", "color": {...}, "offset": { "x": number, "y": number }, "radius": number, "spread": number }
     or { "type": "LAYER_BLUR" | "BACKGROUND_BLUR", "radius": number }
All color channels are in the 0-1 range, never 0-255."#;

const SIZING_RULES: &str = r#"## SIZING RULES
- Every auto-layout frame sizes each axis with "FIXED", "HUG" or "FILL".
- "HUG" wraps the content. Use it for buttons, tags and text containers.
- "FILL" expands to the space available in the parent. Use it for full-width sections, inputs and cards inside a column.
- "FIXED" needs an explicit width or height. Use it for icons, avatars and images.
- Never leave an auto-layout frame without content AND without a fixed size; it collapses to nothing.
- "STRETCH" is not a valid "counterAxisAlignItems" value. To make a child span the cross axis, give the child "FILL" on that axis."#;

const TOKEN_USAGE_RULES: &str = r#"## MANDATORY DESIGN TOKEN USAGE
This file has a design system. You MUST use it:
- Every fill and stroke uses "colorVariable" with an exact color token name from the list above. Do not write a "color" value.
- Every padding and gap uses "paddingVariable" / "paddingTopVariable" / ... and "itemSpacingVariable" with a spacing token name. Do not write raw numbers.
- Every TEXT element uses "textStyleName" with a text style name from the list above instead of font properties.
- Use INSTANCE with the listed "componentKey" whenever a listed component fits.
A literal color, padding or spacing value where a token exists is an error."#;

const PALETTE_USAGE: &str = "Use these colors as literal \"color\" values. Stay within this palette \
                             unless the request explicitly asks for other colors.";

/// Build the system instruction text sent to the model.
///
/// `snapshot` selects token mode when it has at least one entry in any
/// category. `palette` is only consulted in fallback mode; `None` uses the
/// default palette. Non-empty `instructions` are appended last, verbatim.
pub fn build_prompt(
    viewport: Viewport,
    snapshot: Option<&DesignSystemSnapshot>,
    instructions: &str,
    palette: Option<&Palette>,
) -> String {
    let mut prompt = String::with_capacity(8 * 1024);

    prompt.push_str(OUTPUT_FORMAT);
    prompt.push_str("\n\n");
    prompt.push_str(SIZING_RULES);
    prompt.push_str("\n\n");
    write_viewport(&mut prompt, viewport);

    let token_mode = snapshot.filter(|s| !s.is_empty());
    match token_mode {
        Some(snapshot) => {
            write_design_system(&mut prompt, snapshot);
            prompt.push_str(TOKEN_USAGE_RULES);
            prompt.push_str("\n\n");
        }
        None => {
            let default_palette;
            let palette = match palette.filter(|p| !p.is_empty()) {
                Some(palette) => palette,
                None => {
                    default_palette = Palette::default();
                    &default_palette
                }
            };
            write_palette(&mut prompt, palette);
        }
    }

    write_rules(&mut prompt, token_mode.is_some());

    let instructions = instructions.trim();
    if !instructions.is_empty() {
        prompt.push_str("\n\n## ADDITIONAL INSTRUCTIONS\n");
        prompt.push_str(instructions);
    }

    prompt
}

fn write_viewport(prompt: &mut String, viewport: Viewport) {
    let _ = writeln!(prompt, "## TARGET VIEWPORT");
    let _ = writeln!(
        prompt,
        "The root frame is exactly {} x {} pixels. Design for this width; content may be shorter than the height.",
        format_number(viewport.width),
        format_number(viewport.height)
    );
    let _ = writeln!(
        prompt,
        "Do not set \"width\" or \"height\" on the root; it is sized to the viewport automatically.\n"
    );
}

fn write_design_system(prompt: &mut String, snapshot: &DesignSystemSnapshot) {
    let _ = writeln!(prompt, "## DESIGN SYSTEM");

    if !snapshot.colors.is_empty() {
        let _ = writeln!(prompt, "\n### Color tokens (use with \"colorVariable\")");
        for color in &snapshot.colors {
            match &color.description {
                Some(description) if !description.trim().is_empty() => {
                    let _ = writeln!(prompt, "- {}: {}", color.name, description.trim());
                }
                _ => {
                    let _ = writeln!(prompt, "- {}", color.name);
                }
            }
        }
    }

    if !snapshot.spacing.is_empty() {
        let _ = writeln!(
            prompt,
            "\n### Spacing tokens (use with \"paddingVariable\" and \"itemSpacingVariable\")"
        );
        for spacing in &snapshot.spacing {
            let _ = writeln!(prompt, "- {}: {}px", spacing.name, format_number(spacing.value));
        }
    }

    if !snapshot.text_styles.is_empty() {
        let _ = writeln!(prompt, "\n### Text styles (use with \"textStyleName\")");
        for style in &snapshot.text_styles {
            let _ = writeln!(prompt, "- {}: {}", style.name, describe_text_style(style));
        }
    }

    if !snapshot.components.is_empty() {
        let _ = writeln!(
            prompt,
            "\n### Components (use as INSTANCE with \"componentKey\")"
        );
        for component in &snapshot.components {
            let _ = writeln!(prompt, "- {} (key: {})", component.name, component.key);
        }
    }

    prompt.push('\n');
}

fn describe_text_style(style: &TextStyle) -> String {
    let mut text = format!(
        "{} {}, {}px",
        style.font.family,
        style.font.style,
        format_number(style.font_size)
    );
    match style.line_height {
        Some(LineHeight::Pixels(px)) => {
            let _ = write!(text, ", line height {}px", format_number(px));
        }
        Some(LineHeight::Percent(pct)) => {
            let _ = write!(text, ", line height {}%", format_number(pct));
        }
        Some(LineHeight::Auto) | None => {}
    }
    match style.letter_spacing {
        Some(LetterSpacing::Pixels(px)) if px != 0.0 => {
            let _ = write!(text, ", letter spacing {}px", format_number(px));
        }
        Some(LetterSpacing::Percent(pct)) if pct != 0.0 => {
            let _ = write!(text, ", letter spacing {}%", format_number(pct));
        }
        _ => {}
    }
    text
}

fn write_palette(prompt: &mut String, palette: &Palette) {
    let _ = writeln!(prompt, "## COLOR PALETTE");
    for entry in &palette.colors {
        match Rgba::from_hex(&entry.hex) {
            Some(color) => {
                let _ = writeln!(
                    prompt,
                    "- {}: {{ \"r\": {:.3}, \"g\": {:.3}, \"b\": {:.3} }} ({})",
                    entry.name,
                    color.r,
                    color.g,
                    color.b,
                    color.to_hex()
                );
            }
            None => log::warn!("Skipping palette color {:?}: invalid hex {:?}", entry.name, entry.hex),
        }
    }
    let _ = writeln!(prompt, "{}\n", PALETTE_USAGE);
}

fn write_rules(prompt: &mut String, token_mode: bool) {
    let mut rules = vec![
        "Output valid JSON only. The response is parsed by a machine.".to_string(),
        "Use realistic content: real labels, names, prices and dates. Never \"Lorem ipsum\".".to_string(),
        "Interactive elements are at least 44px tall.".to_string(),
        "Body text is at least 14px; captions at least 12px.".to_string(),
        format!(
            "Nest at most {} levels deep. Prefer fewer, well-structured frames over deep wrappers.",
            MAX_NESTING_DEPTH
        ),
        "Give every element a short descriptive \"name\".".to_string(),
        "Use auto-layout (\"layoutMode\") for every frame that contains children, unless absolute positioning is required.".to_string(),
    ];
    if token_mode {
        rules.push("Reference design tokens by their exact names as listed.".to_string());
    } else {
        rules.push("Use palette colors for fills, strokes and text.".to_string());
    }

    let _ = writeln!(prompt, "## RULES");
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, rule);
    }
}

/// Integers without a trailing `.0`
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_tokens::{ColorToken, Component, FontName, SpacingToken};

    fn viewport() -> Viewport {
        Viewport::new(1440.0, 1024.0)
    }

    fn snapshot() -> DesignSystemSnapshot {
        DesignSystemSnapshot {
            colors: vec![ColorToken {
                id: "VariableID:1".into(),
                name: "Primary/500".into(),
                collection: "Tokens".into(),
                value: Rgba::rgb(0.2, 0.4, 1.0),
                is_token: true,
                description: None,
            }],
            spacing: vec![SpacingToken {
                id: "VariableID:2".into(),
                name: "Spacing/md".into(),
                collection: "Tokens".into(),
                value: 16.0,
                is_token: true,
                description: None,
            }],
            text_styles: vec![TextStyle {
                id: "S:1".into(),
                name: "Typography/Body/Regular".into(),
                font: FontName::new("Inter", "Regular"),
                font_size: 16.0,
                line_height: Some(LineHeight::Pixels(24.0)),
                letter_spacing: None,
                description: None,
            }],
            components: vec![Component {
                key: "abc123".into(),
                name: "Button/Primary".into(),
                description: None,
            }],
        }
    }

    #[test]
    fn test_fallback_mode_uses_palette() {
        let palette = Palette {
            colors: vec![PaletteColor::new("primary", "#18A0FB")],
        };
        let prompt = build_prompt(viewport(), None, "", Some(&palette));
        assert!(prompt.contains("#18A0FB"));
        assert!(prompt.contains("\"r\": 0.094"));
        assert!(!prompt.contains("MANDATORY"));
    }

    #[test]
    fn test_empty_snapshot_is_fallback_mode() {
        let prompt = build_prompt(viewport(), Some(&DesignSystemSnapshot::default()), "", None);
        assert!(prompt.contains("## COLOR PALETTE"));
        assert!(prompt.contains("#18A0FB"));
        assert!(!prompt.contains("MANDATORY"));
    }

    #[test]
    fn test_token_mode_lists_names_not_hex() {
        let prompt = build_prompt(viewport(), Some(&snapshot()), "", None);
        assert!(prompt.contains("## MANDATORY DESIGN TOKEN USAGE"));
        assert!(prompt.contains("- Primary/500\n"));
        assert!(!prompt.contains("#3366FF"));
        assert!(prompt.contains("- Spacing/md: 16px"));
        assert!(prompt.contains("Typography/Body/Regular: Inter Regular, 16px, line height 24px"));
        assert!(prompt.contains("Button/Primary (key: abc123)"));
        assert!(!prompt.contains("## COLOR PALETTE"));
    }

    #[test]
    fn test_instructions_come_last() {
        let prompt = build_prompt(viewport(), None, "  Use a dark theme.  ", None);
        assert!(prompt.ends_with("## ADDITIONAL INSTRUCTIONS\nUse a dark theme."));
        let rules = prompt.find("## RULES").unwrap();
        let extra = prompt.find("## ADDITIONAL INSTRUCTIONS").unwrap();
        assert!(rules < extra);
    }

    #[test]
    fn test_empty_instructions_omitted() {
        let prompt = build_prompt(viewport(), None, "   ", None);
        assert!(!prompt.contains("ADDITIONAL INSTRUCTIONS"));
    }

    #[test]
    fn test_viewport_and_rules_always_present() {
        let prompt = build_prompt(Viewport::new(390.0, 844.0), Some(&snapshot()), "", None);
        assert!(prompt.contains("exactly 390 x 844 pixels"));
        assert!(prompt.contains("## SIZING RULES"));
        assert!(prompt.contains("1. Output valid JSON only."));
        assert!(prompt.contains("\"name\""));
    }

    #[test]
    fn test_deterministic() {
        let snap = snapshot();
        let a = build_prompt(viewport(), Some(&snap), "extra", None);
        let b = build_prompt(viewport(), Some(&snap), "extra", None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_palette_entry_skipped() {
        let palette = Palette {
            colors: vec![
                PaletteColor::new("Broken", "#12"),
                PaletteColor::new("Ok", "#000000"),
            ],
        };
        let prompt = build_prompt(viewport(), None, "", Some(&palette));
        assert!(!prompt.contains("- Broken"));
        assert!(prompt.contains("- Ok"));
    }
}
