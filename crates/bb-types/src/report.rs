use std::fmt;

/// Sections of a progress report, stored by the backend as one pipe-delimited
/// string.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReportContent {
    sections: Vec<String>,
}

pub const SECTION_SEPARATOR: char = '|';

impl ReportContent {
    /// Split on `|`, trimming each section and dropping blank ones.
    pub fn parse(raw: &str) -> Self {
        let sections = raw
            .split(SECTION_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Append a section. Pipes inside the text would split it on the next
    /// parse, so they are replaced with `/`.
    pub fn push(&mut self, section: impl Into<String>) {
        let section = section.into().replace(SECTION_SEPARATOR, "/");
        let section = section.trim();
        if !section.is_empty() {
            self.sections.push(section.to_string());
        }
    }
}

impl From<Vec<String>> for ReportContent {
    fn from(sections: Vec<String>) -> Self {
        let mut content = ReportContent::default();
        for section in sections {
            content.push(section);
        }
        content
    }
}

impl fmt::Display for ReportContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SECTION_SEPARATOR)?;
            }
            f.write_str(section)?;
        }
        Ok(())
    }
}
