//! Rendered document tree handed to the display layer.

use serde::Serialize;

use crate::models::{AccentColor, Template};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const EMPTY_HEADING: &str = "Your resume preview will appear here";
pub const EMPTY_HINT: &str = "Start filling out the form to see your resume take shape";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Document {
    /// Nothing to show yet: neither name nor email has been entered.
    Empty { heading: String, hint: String },

    /// `standard` and `formal`: header on top, sections stacked below.
    SingleColumn {
        template: Template,
        accent: AccentColor,
        header: Header,
        sections: Vec<Section>,
    },

    /// `sidebar`: colored sidebar next to a main column.
    TwoColumn {
        accent: AccentColor,
        sidebar: Sidebar,
        main: Vec<Section>,
    },
}

impl Document {
    pub fn empty() -> Self {
        Document::Empty {
            heading: EMPTY_HEADING.to_string(),
            hint: EMPTY_HINT.to_string(),
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self, Document::Empty { .. })
    }

    /// Every section in reading order, sidebar first for two-column layouts.
    pub fn sections(&self) -> Vec<&Section> {
        match self {
            Document::Empty { .. } => Vec::new(),
            Document::SingleColumn { sections, .. } => sections.iter().collect(),
            Document::TwoColumn { sidebar, main, .. } => {
                sidebar.sections.iter().chain(main.iter()).collect()
            }
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections().into_iter().find(|s| s.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub contact: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub background: AccentColor,
    pub header: Header,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Projects,
    Education,
    Certifications,
    Skills,
    Languages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub accent: AccentColor,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Text(String),
    Items(Vec<Item>),
    Tags(Vec<String>),
}

impl SectionBody {
    pub fn items(&self) -> &[Item] {
        match self {
            SectionBody::Items(items) => items,
            _ => &[],
        }
    }
}

/// One entry of a repeated group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,
    pub subtitle: Option<String>,
    /// Right-aligned duration or year.
    pub meta: Option<String>,
    pub bullets: Vec<String>,
}
