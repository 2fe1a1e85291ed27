use tiny_skia::Color;

/// Paint state for one shape, computed right before drawing it and
/// discarded afterwards. `None` fill/stroke means "do not paint".
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPaint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

/// Walk from `node` up through its ancestors and return the first
/// non-empty value for `name`, checking the direct attribute before the
/// inline `style` declaration block at each level. Nearest ancestor wins.
pub fn resolve_inherited<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    for ancestor in node.ancestors().filter(|n| n.is_element()) {
        if let Some(value) = ancestor.attribute(name) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
        if let Some(style) = ancestor.attribute("style") {
            if let Some(value) = style_declaration(style, name) {
                return Some(value);
            }
        }
    }
    None
}

/// Resolve `name` with inheritance, following a `currentColor` result
/// through the `color` property once. No further indirection.
pub fn resolve_property<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    let value = resolve_inherited(node, name)?;
    if value.eq_ignore_ascii_case("currentColor") {
        return resolve_inherited(node, "color");
    }
    Some(value)
}

/// Resolve fill, stroke and stroke-width for a shape, applying the
/// defaults: fill black when absent, no stroke when absent, width 1.
pub fn resolve_paint(node: roxmltree::Node<'_, '_>) -> ResolvedPaint {
    let fill = match resolve_property(node, "fill") {
        Some(v) if v.eq_ignore_ascii_case("none") => None,
        Some(v) => Some(parse_color(v).unwrap_or_else(|| {
            tracing::debug!(value = v, "unparsable fill, using black");
            black()
        })),
        None => Some(black()),
    };

    let stroke = match resolve_property(node, "stroke") {
        Some(v) if v.eq_ignore_ascii_case("none") => None,
        Some(v) => {
            let color = parse_color(v);
            if color.is_none() {
                tracing::debug!(value = v, "unparsable stroke, skipping");
            }
            color
        }
        None => None,
    };

    let stroke_width = resolve_property(node, "stroke-width")
        .and_then(|v| v.parse::<svgtypes::Length>().ok())
        .map(|l| l.number as f32)
        .filter(|w| w.is_finite())
        .unwrap_or(1.0);

    ResolvedPaint {
        fill,
        stroke,
        stroke_width,
    }
}

fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

fn parse_color(value: &str) -> Option<Color> {
    let c = value.parse::<svgtypes::Color>().ok()?;
    Some(Color::from_rgba8(c.red, c.green, c.blue, c.alpha))
}

/// Extract the value of `name` from an inline style block
/// (`name: value; other: ...`).
fn style_declaration<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    for declaration in style.split(';') {
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };
        if key.trim() == name {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_doc<R>(xml: &str, f: impl FnOnce(roxmltree::Document<'_>) -> R) -> R {
        f(roxmltree::Document::parse(xml).unwrap())
    }

    fn named<'a, 'i>(doc: &'a roxmltree::Document<'i>, tag: &str) -> roxmltree::Node<'a, 'i> {
        doc.descendants()
            .find(|n| n.tag_name().name() == tag)
            .unwrap()
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        with_doc(
            r#"<svg fill="blue"><g fill="green"><rect/></g></svg>"#,
            |doc| {
                let rect = named(&doc, "rect");
                assert_eq!(resolve_inherited(rect, "fill"), Some("green"));
            },
        );
    }

    #[test]
    fn test_attribute_beats_style_on_same_element() {
        with_doc(r#"<svg><rect fill="red" style="fill: blue"/></svg>"#, |doc| {
            let rect = named(&doc, "rect");
            assert_eq!(resolve_inherited(rect, "fill"), Some("red"));
        });
    }

    #[test]
    fn test_style_declaration_found_and_trimmed() {
        with_doc(
            r#"<svg><rect style="stroke-width: 3 ; fill:  teal;"/></svg>"#,
            |doc| {
                let rect = named(&doc, "rect");
                assert_eq!(resolve_inherited(rect, "fill"), Some("teal"));
                assert_eq!(resolve_inherited(rect, "stroke-width"), Some("3"));
            },
        );
    }

    #[test]
    fn test_empty_attribute_falls_through() {
        with_doc(r#"<svg fill="purple"><rect fill="  "/></svg>"#, |doc| {
            let rect = named(&doc, "rect");
            assert_eq!(resolve_inherited(rect, "fill"), Some("purple"));
        });
    }

    #[test]
    fn test_current_color_follows_color_property() {
        with_doc(
            r##"<svg color="#ff0000"><g><rect fill="currentColor"/></g></svg>"##,
            |doc| {
                let rect = named(&doc, "rect");
                assert_eq!(resolve_property(rect, "fill"), Some("#ff0000"));
            },
        );
    }

    #[test]
    fn test_current_color_without_color_is_absent() {
        with_doc(r#"<svg><rect fill="currentcolor"/></svg>"#, |doc| {
            let rect = named(&doc, "rect");
            assert_eq!(resolve_property(rect, "fill"), None);
            // The caller default then kicks in: black fill.
            let paint = resolve_paint(rect);
            assert_eq!(paint.fill, Some(black()));
        });
    }

    #[test]
    fn test_fill_defaults_to_black() {
        with_doc(r#"<svg><rect/></svg>"#, |doc| {
            let paint = resolve_paint(named(&doc, "rect"));
            assert_eq!(paint.fill, Some(black()));
            assert!(paint.stroke.is_none());
            assert_eq!(paint.stroke_width, 1.0);
        });
    }

    #[test]
    fn test_explicit_none_disables_painting() {
        with_doc(
            r#"<svg><rect fill="none" stroke="none" stroke-width="4"/></svg>"#,
            |doc| {
                let paint = resolve_paint(named(&doc, "rect"));
                assert!(paint.fill.is_none());
                assert!(paint.stroke.is_none());
            },
        );
    }

    #[test]
    fn test_stroke_width_parse_failure_defaults_to_one() {
        with_doc(r#"<svg><rect stroke="red" stroke-width="wide"/></svg>"#, |doc| {
            let paint = resolve_paint(named(&doc, "rect"));
            assert_eq!(paint.stroke_width, 1.0);
            assert!(paint.stroke.is_some());
        });
    }

    #[test]
    fn test_named_colors_parse() {
        with_doc(r#"<svg><rect fill="teal"/></svg>"#, |doc| {
            let paint = resolve_paint(named(&doc, "rect"));
            assert_eq!(paint.fill, Some(Color::from_rgba8(0, 128, 128, 255)));
        });
    }

    #[test]
    fn test_unknown_color_name_falls_back_to_black() {
        with_doc(
            r#"<svg><rect fill="notacolor" stroke="alsonotacolor"/></svg>"#,
            |doc| {
                let paint = resolve_paint(named(&doc, "rect"));
                // Unparsable fill behaves like an absent one; an
                // unparsable stroke is skipped entirely.
                assert_eq!(paint.fill, Some(black()));
                assert!(paint.stroke.is_none());
            },
        );
    }
}
