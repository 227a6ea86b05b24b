//! Typography: text styles and the font fallback chain

use design_schema::TextProps;
use design_tokens::{FontName, LetterSpacing, LineHeight};

use crate::constants::{defaults, fonts};
use crate::resolve::Resolver;
use crate::scene::{NodeId, Property, SceneError, SceneHost};
use crate::warning::WarningKind;

/// Apply the typography of a text element.
///
/// A resolvable text style wins and is applied by reference. Otherwise the
/// direct font properties are used, loading the first font of the chain
/// (requested family and style, fallback family with the requested style,
/// fallback family and style) that the host has.
pub fn apply_typography(
    host: &mut dyn SceneHost,
    resolver: &mut Resolver<'_>,
    node: &NodeId,
    name: &str,
    text: &TextProps,
) -> Result<(), SceneError> {
    if let Some(style_name) = text.text_style_name.as_deref() {
        if apply_text_style(host, resolver, node, name, style_name)? {
            return Ok(());
        }
    }

    let font = load_font_chain(host, resolver, name, text)?;
    host.set_property(node, Property::FontName(font))?;
    host.set_property(
        node,
        Property::FontSize(text.font_size.unwrap_or(defaults::FONT_SIZE).max(1.0)),
    )?;
    if let Some(line_height) = text.line_height {
        host.set_property(node, Property::LineHeight(LineHeight::Pixels(line_height)))?;
    }
    if let Some(letter_spacing) = text.letter_spacing {
        host.set_property(
            node,
            Property::LetterSpacing(LetterSpacing::Pixels(letter_spacing)),
        )?;
    }
    Ok(())
}

/// Returns whether the style was applied
fn apply_text_style(
    host: &mut dyn SceneHost,
    resolver: &mut Resolver<'_>,
    node: &NodeId,
    name: &str,
    style_name: &str,
) -> Result<bool, SceneError> {
    let Some(style) = resolver.index().find_text_style(style_name) else {
        resolver.warn(WarningKind::TextStyle, name, style_name, "direct font properties");
        return Ok(false);
    };

    if let Err(e) = host.load_font(&style.font) {
        log::debug!("Font for style '{}' failed to load: {}", style.name, e);
        resolver.warn(
            WarningKind::TextStyle,
            name,
            style_name,
            "direct font properties",
        );
        return Ok(false);
    }
    host.set_property(node, Property::TextStyle(style.id.clone()))?;
    Ok(true)
}

/// Load the first available font of the fallback chain
pub fn load_font_chain(
    host: &mut dyn SceneHost,
    resolver: &mut Resolver<'_>,
    name: &str,
    text: &TextProps,
) -> Result<FontName, SceneError> {
    let family = text
        .font_family
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(fonts::FALLBACK_FAMILY);
    let style = text
        .requested_style()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fonts::FALLBACK_STYLE.to_string());

    let requested = FontName::new(family, style.trim());
    let mut chain = vec![
        requested.clone(),
        FontName::new(fonts::FALLBACK_FAMILY, style.trim()),
        FontName::new(fonts::FALLBACK_FAMILY, fonts::FALLBACK_STYLE),
    ];
    chain.dedup();

    let mut last_error = None;
    for candidate in chain {
        match host.load_font(&candidate) {
            Ok(()) => {
                if candidate != requested {
                    resolver.warn(
                        WarningKind::Font,
                        name,
                        requested.to_string(),
                        candidate.to_string(),
                    );
                }
                return Ok(candidate);
            }
            Err(e) => {
                log::debug!("Font {} unavailable: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or(SceneError::FontUnavailable(requested)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryScene;
    use crate::scene::NodeKind;
    use design_schema::FontWeight;
    use design_tokens::{DesignSystemData, TextStyle, TokenIndex, IndexLimits};

    fn text(family: Option<&str>, weight: Option<u16>) -> TextProps {
        TextProps {
            characters: "Hello".into(),
            font_family: family.map(String::from),
            font_weight: weight.map(FontWeight::Numeric),
            ..Default::default()
        }
    }

    #[test]
    fn test_requested_font_loads() {
        let mut scene = MemoryScene::default();
        let index = TokenIndex::empty();
        let mut resolver = Resolver::new(&index);
        let font = load_font_chain(&mut scene, &mut resolver, "Title", &text(Some("Roboto"), Some(700)))
            .unwrap();
        assert_eq!(font, FontName::new("Roboto", "Bold"));
        assert!(resolver.warnings().is_empty());
    }

    #[test]
    fn test_family_falls_back_keeping_style() {
        let mut scene = MemoryScene::default();
        let index = TokenIndex::empty();
        let mut resolver = Resolver::new(&index);
        let font = load_font_chain(
            &mut scene,
            &mut resolver,
            "Title",
            &text(Some("Comic Sans"), Some(600)),
        )
        .unwrap();
        assert_eq!(font, FontName::new("Inter", "Semi Bold"));
        assert_eq!(resolver.warnings()[0].kind, WarningKind::Font);
        assert_eq!(resolver.warnings()[0].reference, "Comic Sans Semi Bold");
    }

    #[test]
    fn test_last_resort_font() {
        let mut scene =
            MemoryScene::default().with_fonts([FontName::new("Inter", "Regular")]);
        let index = TokenIndex::empty();
        let mut resolver = Resolver::new(&index);
        let font =
            load_font_chain(&mut scene, &mut resolver, "Title", &text(None, Some(900))).unwrap();
        assert_eq!(font, FontName::new("Inter", "Regular"));
    }

    #[test]
    fn test_no_font_at_all_is_an_error() {
        let mut scene = MemoryScene::default().with_fonts([]);
        let index = TokenIndex::empty();
        let mut resolver = Resolver::new(&index);
        let result = load_font_chain(&mut scene, &mut resolver, "Title", &text(None, None));
        assert!(matches!(result, Err(SceneError::FontUnavailable(_))));
    }

    #[test]
    fn test_style_substring_applies_by_reference() {
        let data = DesignSystemData {
            text_styles: vec![TextStyle {
                id: "S:body".into(),
                name: "Typography/Body/Regular".into(),
                font: FontName::new("Inter", "Regular"),
                font_size: 16.0,
                line_height: Some(LineHeight::Pixels(24.0)),
                letter_spacing: None,
                description: None,
            }],
            ..Default::default()
        };
        let index = TokenIndex::build(&data, &IndexLimits::default()).unwrap();
        let mut scene = MemoryScene::new(data);
        let node = scene.create_node(NodeKind::Text).unwrap();
        let mut resolver = Resolver::new(&index);
        let props = TextProps {
            text_style_name: Some("body".into()),
            ..text(None, None)
        };
        apply_typography(&mut scene, &mut resolver, &node, "Body", &props).unwrap();

        let read = scene.read_node(&node).unwrap();
        let data = read.text.unwrap();
        assert_eq!(data.text_style_id.as_deref(), Some("S:body"));
        assert_eq!(data.font_size, 16.0);
        assert!(resolver.warnings().is_empty());
    }

    #[test]
    fn test_unknown_style_uses_direct_properties() {
        let mut scene = MemoryScene::default();
        let node = scene.create_node(NodeKind::Text).unwrap();
        let index = TokenIndex::empty();
        let mut resolver = Resolver::new(&index);
        let props = TextProps {
            text_style_name: Some("Heading/XL".into()),
            font_size: Some(32.0),
            ..text(None, Some(700))
        };
        apply_typography(&mut scene, &mut resolver, &node, "Title", &props).unwrap();

        let data = scene.read_node(&node).unwrap().text.unwrap();
        assert_eq!(data.font, FontName::new("Inter", "Bold"));
        assert_eq!(data.font_size, 32.0);
        assert_eq!(data.text_style_id, None);
        assert_eq!(resolver.warnings()[0].kind, WarningKind::TextStyle);
    }
}
