//! Headless SVG renderer.
//!
//! Maintains one group per annotation (controls, content, and an optional
//! ghost inserted between them) and serializes the whole layer to an SVG
//! document string on demand.

use std::collections::HashMap;
use uuid::Uuid;

use super::{Appearance, HandleKind, HandlePlacement, Renderer};

const HANDLE_RADIUS: f64 = 4.0;

#[derive(Debug, Clone, Default)]
struct AnnotationGroup {
    controls: String,
    content: String,
    ghost: Option<String>,
    ghost_matrix: Option<[f64; 6]>,
}

/// SVG-string renderer; the order annotations were first mounted in is the
/// document z-order.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    groups: HashMap<Uuid, AnnotationGroup>,
    order: Vec<Uuid>,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn group_mut(&mut self, uuid: Uuid) -> &mut AnnotationGroup {
        if !self.groups.contains_key(&uuid) {
            self.order.push(uuid);
        }
        self.groups.entry(uuid).or_default()
    }

    /// Whether a ghost copy is currently shown for the annotation.
    pub fn has_ghost(&self, uuid: Uuid) -> bool {
        self.groups
            .get(&uuid)
            .map(|g| g.ghost.is_some())
            .unwrap_or(false)
    }

    /// The current ghost transform, if a ghost is being dragged.
    pub fn ghost_matrix(&self, uuid: Uuid) -> Option<[f64; 6]> {
        self.groups.get(&uuid).and_then(|g| g.ghost_matrix)
    }

    /// Number of mounted annotations.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serializes the layer as a complete SVG document.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        for uuid in &self.order {
            let group = &self.groups[uuid];
            svg.push_str(&format!("<g data-annotation=\"{uuid}\">"));
            svg.push_str(&group.controls);
            if let Some(ghost) = &group.ghost {
                let transform = group
                    .ghost_matrix
                    .map(|m| {
                        format!(
                            " transform=\"matrix({} {} {} {} {} {})\"",
                            m[0], m[1], m[2], m[3], m[4], m[5]
                        )
                    })
                    .unwrap_or_default();
                svg.push_str(&format!("<g class=\"ghost\"{transform}>"));
                svg.push_str(ghost);
                svg.push_str("</g>");
            }
            svg.push_str(&group.content);
            svg.push_str("</g>");
        }
        svg.push_str("</svg>");
        svg
    }

    fn appearance_markup(appearance: &Appearance) -> String {
        let mut out = String::new();
        for path in &appearance.paths {
            let mut attrs = format!("d=\"{}\"", path.data);
            match path.stroke {
                Some(color) => {
                    attrs.push_str(&format!(
                        " stroke=\"{}\" stroke-width=\"{}\"",
                        color.to_css(),
                        path.stroke_width
                    ));
                }
                None => attrs.push_str(" stroke=\"none\""),
            }
            if !path.dash.is_empty() {
                let dashes: Vec<String> = path.dash.iter().map(|d| d.to_string()).collect();
                attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dashes.join(" ")));
            }
            match path.fill {
                Some(color) => attrs.push_str(&format!(" fill=\"{}\"", color.to_css())),
                None => attrs.push_str(" fill=\"none\""),
            }
            if path.pick_helper {
                attrs.push_str(" pointer-events=\"stroke\" class=\"pick\"");
            }
            out.push_str(&format!("<path {attrs}/>"));
        }
        for img in &appearance.images {
            let rotation = if img.rotation.abs() > 1e-9 {
                format!(
                    " transform=\"rotate({} {} {})\"",
                    img.rotation.to_degrees(),
                    img.x + img.width / 2.0,
                    img.y + img.height / 2.0
                )
            } else {
                String::new()
            };
            out.push_str(&format!(
                "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{rotation}/>",
                img.href, img.x, img.y, img.width, img.height
            ));
        }
        for text in &appearance.texts {
            let rotation = if text.rotation.abs() > 1e-9 {
                format!(
                    " transform=\"rotate({} {} {})\"",
                    text.rotation.to_degrees(),
                    text.rotation_center.x,
                    text.rotation_center.y
                )
            } else {
                String::new()
            };
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\"{rotation}>{}</text>",
                text.origin.x,
                text.origin.y,
                text.font_size,
                text.color.to_css(),
                xml_escape(&text.text)
            ));
        }
        out
    }

    fn controls_markup(handles: &[HandlePlacement]) -> String {
        let mut out = String::from("<g class=\"controls\">");
        for handle in handles {
            let class = match handle.kind {
                HandleKind::Corner(name) => name.as_str().to_string(),
                HandleKind::Rotate => "rotate".to_string(),
                HandleKind::Vertex(index) => format!("v{index}"),
            };
            out.push_str(&format!(
                "<circle class=\"handle {class}\" cx=\"{}\" cy=\"{}\" r=\"{HANDLE_RADIUS}\"/>",
                handle.at.x, handle.at.y
            ));
        }
        out.push_str("</g>");
        out
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Renderer for SvgRenderer {
    fn mount_controls(&mut self, uuid: Uuid, handles: &[HandlePlacement]) {
        let markup = Self::controls_markup(handles);
        self.group_mut(uuid).controls = markup;
    }

    fn update_content(&mut self, uuid: Uuid, appearance: &Appearance) {
        let markup = Self::appearance_markup(appearance);
        self.group_mut(uuid).content = markup;
    }

    fn show_ghost(&mut self, uuid: Uuid, appearance: &Appearance) {
        let markup = Self::appearance_markup(appearance);
        let group = self.group_mut(uuid);
        group.ghost = Some(markup);
        group.ghost_matrix = None;
    }

    fn move_ghost(&mut self, uuid: Uuid, matrix: [f64; 6]) {
        if let Some(group) = self.groups.get_mut(&uuid) {
            if group.ghost.is_some() {
                group.ghost_matrix = Some(matrix);
            }
        }
    }

    fn remove_ghost(&mut self, uuid: Uuid) {
        if let Some(group) = self.groups.get_mut(&uuid) {
            group.ghost = None;
            group.ghost_matrix = None;
        }
    }

    fn remove(&mut self, uuid: Uuid) {
        self.groups.remove(&uuid);
        self.order.retain(|id| *id != uuid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;

    #[test]
    fn ghost_sits_between_controls_and_content() {
        let mut renderer = SvgRenderer::new();
        let uuid = Uuid::new_v4();

        renderer.mount_controls(uuid, &[]);
        let mut appearance = Appearance::new();
        appearance.stroke("M 0 0 L 1 1".into(), Color::BLACK, 2.0, &[]);
        renderer.update_content(uuid, &appearance);
        renderer.show_ghost(uuid, &appearance);
        renderer.move_ghost(uuid, [1.0, 0.0, 0.0, 1.0, 5.0, 5.0]);

        let svg = renderer.to_svg(100.0, 100.0);
        let controls = svg.find("class=\"controls\"").unwrap();
        let ghost = svg.find("class=\"ghost\"").unwrap();
        assert!(controls < ghost);
        assert!(svg.contains("matrix(1 0 0 1 5 5)"));

        renderer.remove_ghost(uuid);
        assert!(!renderer.to_svg(100.0, 100.0).contains("ghost"));
    }

    #[test]
    fn remove_drops_the_group() {
        let mut renderer = SvgRenderer::new();
        let uuid = Uuid::new_v4();
        renderer.mount_controls(uuid, &[]);
        assert_eq!(renderer.len(), 1);
        renderer.remove(uuid);
        assert!(renderer.is_empty());
    }
}
