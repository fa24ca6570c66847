//! Text layout seam.
//!
//! Text measurement depends on the host's font stack and is treated as a
//! black box: given text, a maximum width, and a font size, it returns
//! per-line boxes relative to a chosen pivot. [`MonospaceMeasure`] is a
//! self-contained implementation for headless use and tests.

use super::Point;

/// Pivot the returned line boxes are positioned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPivot {
    /// Lines grow down-right from the pivot.
    #[default]
    TopLeft,
    /// The text block is centered on the pivot.
    Center,
    /// The block's bottom edge sits on the pivot.
    BottomMargin,
}

/// One laid-out line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    pub text: String,
    /// Position of the line's top-left corner relative to the pivot.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

/// External text-measurement service.
pub trait TextMeasure {
    /// Wraps `text` into lines no wider than `max_width` at `font_size`,
    /// positioned relative to `pivot`.
    fn layout(
        &self,
        text: &str,
        max_width: f64,
        font_size: f64,
        pivot: LayoutPivot,
    ) -> Vec<LineBox>;
}

/// Fixed-advance measurer for headless rendering and tests.
#[derive(Debug, Clone)]
pub struct MonospaceMeasure {
    /// Glyph advance as a fraction of the font size.
    pub advance_ratio: f64,
    /// Line height as a fraction of the font size.
    pub line_height_ratio: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl MonospaceMeasure {
    fn wrap(&self, text: &str, max_width: f64, font_size: f64) -> Vec<String> {
        let advance = font_size * self.advance_ratio;
        let max_chars = ((max_width / advance).floor() as usize).max(1);

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            if paragraph.is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate_len = if current.is_empty() {
                    word.chars().count()
                } else {
                    current.chars().count() + 1 + word.chars().count()
                };
                if candidate_len <= max_chars {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                } else {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    // Hard-break words longer than a line.
                    let mut rest: Vec<char> = word.chars().collect();
                    while rest.len() > max_chars {
                        lines.push(rest.drain(..max_chars).collect());
                    }
                    current = rest.into_iter().collect();
                }
            }
            lines.push(current);
        }
        lines
    }
}

impl TextMeasure for MonospaceMeasure {
    fn layout(
        &self,
        text: &str,
        max_width: f64,
        font_size: f64,
        pivot: LayoutPivot,
    ) -> Vec<LineBox> {
        let advance = font_size * self.advance_ratio;
        let line_height = font_size * self.line_height_ratio;
        let lines = self.wrap(text, max_width, font_size);

        let block_height = line_height * lines.len() as f64;
        let block_width = lines
            .iter()
            .map(|l| l.chars().count() as f64 * advance)
            .fold(0.0, f64::max);

        let (dx, dy) = match pivot {
            LayoutPivot::TopLeft => (0.0, 0.0),
            LayoutPivot::Center => (-block_width / 2.0, -block_height / 2.0),
            LayoutPivot::BottomMargin => (0.0, -block_height),
        };

        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let width = text.chars().count() as f64 * advance;
                LineBox {
                    text,
                    origin: Point::new(dx, dy + i as f64 * line_height),
                    width,
                    height: line_height,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_max_width() {
        let measure = MonospaceMeasure::default();
        // 10px font, 0.6 advance => 6px per char, 60px max => 10 chars per line
        let lines = measure.layout("alpha beta gamma", 60.0, 10.0, LayoutPivot::TopLeft);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "alpha beta");
        assert_eq!(lines[1].text, "gamma");
        assert_eq!(lines[1].origin.y, 12.0);
    }

    #[test]
    fn center_pivot_offsets_block() {
        let measure = MonospaceMeasure::default();
        let lines = measure.layout("ab", 100.0, 10.0, LayoutPivot::Center);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].origin.x, -6.0);
        assert_eq!(lines[0].origin.y, -6.0);
    }
}
