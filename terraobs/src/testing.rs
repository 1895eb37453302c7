//! Test fixtures: compose token-stream frames without hand-counting tokens.

use terrawire::{DataKind, SubjectKind, DEFAULT_SEPARATOR};

/// Builds one subject frame (and recursively its children) and renders it
/// to a wire string. Attribute and element counts are derived from what
/// was added, so built frames always satisfy the grammar.
pub struct FrameBuilder {
    id: i32,
    kind: SubjectKind,
    /// (key, data kind code, value) triples in insertion order.
    attributes: Vec<(String, i32, String)>,
    children: Vec<FrameBuilder>,
}

impl FrameBuilder {
    pub fn new(id: i32, kind: SubjectKind) -> Self {
        Self {
            id,
            kind,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn number(mut self, key: &str, value: f64) -> Self {
        self.attributes
            .push((key.to_string(), DataKind::Number.code(), value.to_string()));
        self
    }

    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.attributes
            .push((key.to_string(), DataKind::Text.code(), value.to_string()));
        self
    }

    pub fn boolean(mut self, key: &str, value: bool) -> Self {
        self.attributes
            .push((key.to_string(), DataKind::Bool.code(), value.to_string()));
        self
    }

    pub fn position(self, x: f64, y: f64) -> Self {
        self.number("x", x).number("y", y)
    }

    pub fn child(mut self, child: FrameBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Render the frame with the default separator.
    pub fn render(&self) -> String {
        self.render_with(DEFAULT_SEPARATOR)
    }

    pub fn render_with(&self, separator: char) -> String {
        let mut tokens = Vec::new();
        self.push_tokens(&mut tokens);
        tokens.join(&separator.to_string())
    }

    fn push_tokens(&self, tokens: &mut Vec<String>) {
        tokens.push(self.id.to_string());
        tokens.push(self.kind.code().to_string());
        tokens.push(self.attributes.len().to_string());
        tokens.push(self.children.len().to_string());
        for (key, code, value) in &self.attributes {
            tokens.push(key.clone());
            tokens.push(code.to_string());
            tokens.push(value.clone());
        }
        for child in &self.children {
            child.push_tokens(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_frame_layout() {
        let frame = FrameBuilder::new(7, SubjectKind::Cell).number("temp", 36.6);
        assert_eq!(frame.render(), "7;1;1;0;temp;1;36.6");
    }

    #[test]
    fn test_nested_frame_layout() {
        let frame = FrameBuilder::new(1, SubjectKind::CellularSpace)
            .child(FrameBuilder::new(2, SubjectKind::Cell))
            .child(FrameBuilder::new(3, SubjectKind::Cell).text("cover", "forest"));
        assert_eq!(frame.render(), "1;2;0;2;2;1;0;0;3;1;1;0;cover;3;forest");
    }

    #[test]
    fn test_custom_separator() {
        let frame = FrameBuilder::new(7, SubjectKind::Cell);
        assert_eq!(frame.render_with(':'), "7:1:0:0");
    }
}
