use std::fmt;

use serde::{Deserialize, Serialize};

/// Accent color used when the user has not picked one.
pub const DEFAULT_ACCENT: &str = "#2563eb";

// ────────────────────────────────────────────────────────────────────────────
// Selection state
// ────────────────────────────────────────────────────────────────────────────

/// Layout strategy for the rendered document.
///
/// `standard` and `formal` share a single-column structure; `sidebar` splits the
/// page into a colored sidebar and a main column. The names the first version of
/// the builder used (`modern`, `classic`, `creative`) are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    #[serde(alias = "modern")]
    Standard,
    #[serde(alias = "classic")]
    Formal,
    #[serde(alias = "creative")]
    Sidebar,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Standard => "standard",
            Template::Formal => "formal",
            Template::Sidebar => "sidebar",
        }
    }

    /// Parses a template name, falling back to `Standard` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "formal" | "classic" => Template::Formal,
            "sidebar" | "creative" => Template::Sidebar,
            _ => Template::Standard,
        }
    }

    pub fn is_two_column(&self) -> bool {
        matches!(self, Template::Sidebar)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque accent color. Not validated; whatever the picker sends is threaded
/// through to section headers and the sidebar background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccentColor(pub String);

impl AccentColor {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::default()
        } else {
            Self(value.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT.to_string())
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Repeated groups
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of repeated groups a résumé can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Experience,
    Education,
    Project,
    Certification,
}

impl Group {
    pub const ALL: [Group; 4] = [
        Group::Experience,
        Group::Education,
        Group::Project,
        Group::Certification,
    ];

    /// Prefix used for this group's repeated field names (`exp_title[]`, ...).
    pub fn prefix(&self) -> &'static str {
        match self {
            Group::Experience => "exp",
            Group::Education => "edu",
            Group::Project => "proj",
            Group::Certification => "cert",
        }
    }

    /// Field names in schema order. The first one is the primary field.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Group::Experience => &["title", "company", "duration", "description"],
            Group::Education => &["degree", "institution", "year"],
            Group::Project => &["name", "description", "link"],
            Group::Certification => &["name", "issuer", "year"],
        }
    }

    pub fn primary_field(&self) -> &'static str {
        self.fields()[0]
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }

    /// Key of a field in the flat representation, e.g. `exp_title[]`.
    pub fn field_key(&self, field: &str) -> String {
        format!("{}_{}[]", self.prefix(), field)
    }

    /// Parses a repeated field name (`edu_year[]`) into its group and field.
    pub fn parse_field_key(key: &str) -> Option<(Group, &'static str)> {
        let stem = key.strip_suffix("[]")?;
        let (prefix, field) = stem.split_once('_')?;
        let group = Group::from_prefix(prefix)?;
        group
            .fields()
            .iter()
            .find(|&&f| f == field)
            .map(|&f| (group, f))
    }

    pub fn from_prefix(prefix: &str) -> Option<Group> {
        Group::ALL.into_iter().find(|g| g.prefix() == prefix)
    }

    /// Accepts both the URL form (`experience`) and the field prefix (`exp`).
    pub fn from_name(name: &str) -> Option<Group> {
        match name {
            "experience" | "exp" => Some(Group::Experience),
            "education" | "edu" => Some(Group::Education),
            "project" | "projects" | "proj" => Some(Group::Project),
            "certification" | "certifications" | "cert" => Some(Group::Certification),
            _ => None,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Group::Experience => "experience",
            Group::Education => "education",
            Group::Project => "project",
            Group::Certification => "certification",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    /// Free text; lines may start with a `•` bullet glyph.
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

/// Uniform field access over the four entry shapes, driven by `Group::fields`.
pub trait GroupEntry: Default + Clone {
    const GROUP: Group;

    fn field(&self, name: &str) -> &str;
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    fn primary(&self) -> &str {
        self.field(Self::GROUP.primary_field())
    }

    /// An entry is rendered only when its primary field carries text.
    fn is_present(&self) -> bool {
        !self.primary().trim().is_empty()
    }
}

impl GroupEntry for Experience {
    const GROUP: Group = Group::Experience;

    fn field(&self, name: &str) -> &str {
        match name {
            "title" => &self.title,
            "company" => &self.company,
            "duration" => &self.duration,
            "description" => &self.description,
            _ => "",
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "company" => Some(&mut self.company),
            "duration" => Some(&mut self.duration),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

impl GroupEntry for Education {
    const GROUP: Group = Group::Education;

    fn field(&self, name: &str) -> &str {
        match name {
            "degree" => &self.degree,
            "institution" => &self.institution,
            "year" => &self.year,
            _ => "",
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "degree" => Some(&mut self.degree),
            "institution" => Some(&mut self.institution),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

impl GroupEntry for Project {
    const GROUP: Group = Group::Project;

    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "description" => &self.description,
            "link" => &self.link,
            _ => "",
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "link" => Some(&mut self.link),
            _ => None,
        }
    }
}

impl GroupEntry for Certification {
    const GROUP: Group = Group::Certification;

    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "issuer" => &self.issuer,
            "year" => &self.year,
            _ => "",
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "issuer" => Some(&mut self.issuer),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

/// Scalar field names in the order the form presents them.
pub const SCALAR_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "location",
    "linkedin",
    "website",
    "summary",
    "skills",
    "languages",
];

/// A snapshot of everything the user has entered. Rebuilt on every edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    /// Comma-separated.
    pub skills: Option<String>,
    /// Comma-separated, rendered as-is.
    pub languages: Option<String>,

    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,

    pub template: Template,
    pub accent_color: AccentColor,
}

impl ResumeRecord {
    pub fn scalar(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "location" => &self.location,
            "linkedin" => &self.linkedin,
            "website" => &self.website,
            "summary" => &self.summary,
            "skills" => &self.skills,
            "languages" => &self.languages,
            _ => return None,
        };
        value.as_deref()
    }

    /// Sets a scalar field, normalizing blank input to `None`.
    /// Returns `false` if `name` is not a scalar field.
    pub fn set_scalar(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "location" => &mut self.location,
            "linkedin" => &mut self.linkedin,
            "website" => &mut self.website,
            "summary" => &mut self.summary,
            "skills" => &mut self.skills,
            "languages" => &mut self.languages,
            _ => return false,
        };
        *slot = non_blank(value);
        true
    }

    /// Number of entries stored for a group, present or not.
    pub fn group_len(&self, group: Group) -> usize {
        match group {
            Group::Experience => self.experience.len(),
            Group::Education => self.education.len(),
            Group::Project => self.projects.len(),
            Group::Certification => self.certifications.len(),
        }
    }

    /// Value of `field` for the entry at `index`, across all group shapes.
    pub fn entry_field(&self, group: Group, index: usize, field: &str) -> Option<&str> {
        match group {
            Group::Experience => self.experience.get(index).map(|e| e.field(field)),
            Group::Education => self.education.get(index).map(|e| e.field(field)),
            Group::Project => self.projects.get(index).map(|e| e.field(field)),
            Group::Certification => self.certifications.get(index).map(|e| e.field(field)),
        }
    }

    /// Writes `value` (trimmed) into `field` of entry `index`, growing the group
    /// with blank entries up to `index` if needed. Returns `false` if the group
    /// has no such field.
    pub fn set_entry_field(&mut self, group: Group, index: usize, field: &str, value: &str) -> bool {
        if !group.has_field(field) {
            return false;
        }
        match group {
            Group::Experience => write_field(&mut self.experience, index, field, value),
            Group::Education => write_field(&mut self.education, index, field, value),
            Group::Project => write_field(&mut self.projects, index, field, value),
            Group::Certification => write_field(&mut self.certifications, index, field, value),
        }
    }

    /// Grows a group with blank entries until it holds at least `len`.
    pub fn ensure_group_len(&mut self, group: Group, len: usize) {
        match group {
            Group::Experience => grow(&mut self.experience, len),
            Group::Education => grow(&mut self.education, len),
            Group::Project => grow(&mut self.projects, len),
            Group::Certification => grow(&mut self.certifications, len),
        }
    }

    /// Drops entries whose primary field is blank, keeping order.
    pub fn retain_present(&mut self) {
        self.experience.retain(|e| e.is_present());
        self.education.retain(|e| e.is_present());
        self.projects.retain(|e| e.is_present());
        self.certifications.retain(|e| e.is_present());
    }

    /// Both `name` and `email` blank means there is nothing worth rendering yet.
    pub fn is_blank_identity(&self) -> bool {
        is_blank(&self.name) && is_blank(&self.email)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn grow<E: GroupEntry>(entries: &mut Vec<E>, len: usize) {
    if entries.len() < len {
        entries.resize_with(len, E::default);
    }
}

fn write_field<E: GroupEntry>(entries: &mut Vec<E>, index: usize, field: &str, value: &str) -> bool {
    grow(entries, index + 1);
    match entries[index].field_mut(field) {
        Some(slot) => {
            *slot = value.trim().to_string();
            true
        }
        None => false,
    }
}

/// Trims `value`, mapping empty and whitespace-only input to `None`.
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
