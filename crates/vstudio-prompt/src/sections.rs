//! Section composition shared by the image and video assemblers.

/// Separator placed between prompt sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Ordered collection of rendered sections.
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a titled section.
    pub fn section(&mut self, title: &str, body: impl AsRef<str>) -> &mut Self {
        self.sections
            .push(format!("{}:\n{}", title, body.as_ref().trim_end()));
        self
    }

    /// Append a titled section when a body is present.
    pub fn optional(&mut self, title: &str, body: Option<impl AsRef<str>>) -> &mut Self {
        if let Some(body) = body {
            self.section(title, body);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn build(&self) -> String {
        self.sections.join(SECTION_SEPARATOR)
    }
}

/// Render a bulleted list, one item per line.
pub(crate) fn bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
