//! Draft form: the editable input surface with its repeated sections.
//!
//! Each repeated group is an ordered list of entry slots. A slot carries a
//! process-unique [`EntryId`] so the UI can address it, but positions are what
//! order entries: removing one closes the gap and every later slot moves up.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::codec::RepeatCounts;
use crate::form::collector::InputSurface;
use crate::models::{AccentColor, Group, ResumeRecord, Template, SCALAR_FIELDS};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown section '{0}'")]
    UnknownGroup(String),

    #[error("No {group} entry at position {position}")]
    NoSuchEntry { group: Group, position: usize },

    #[error("No entry with id {0}")]
    UnknownEntry(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a repeated group. `values` is aligned with `Group::fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySlot {
    pub id: EntryId,
    pub values: Vec<String>,
}

impl EntrySlot {
    fn blank(group: Group) -> Self {
        Self {
            id: EntryId::new(),
            values: vec![String::new(); group.fields().len()],
        }
    }

    pub fn get(&self, group: Group, field: &str) -> Option<&str> {
        let index = group.fields().iter().position(|f| *f == field)?;
        self.values.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftForm {
    scalars: BTreeMap<&'static str, String>,
    template: Template,
    accent_color: AccentColor,
    groups: BTreeMap<Group, Vec<EntrySlot>>,
}

impl Default for DraftForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftForm {
    /// An empty form with no repeated entries.
    pub fn new() -> Self {
        Self {
            scalars: SCALAR_FIELDS.iter().map(|&f| (f, String::new())).collect(),
            template: Template::default(),
            accent_color: AccentColor::default(),
            groups: Group::ALL.into_iter().map(|g| (g, Vec::new())).collect(),
        }
    }

    /// The form as first presented: one blank experience and one blank
    /// education entry.
    pub fn with_starter_sections() -> Self {
        let mut form = Self::new();
        form.add_entry(Group::Experience);
        form.add_entry(Group::Education);
        form
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn accent_color(&self) -> &AccentColor {
        &self.accent_color
    }

    pub fn entries(&self, group: Group) -> &[EntrySlot] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    fn entries_mut(&mut self, group: Group) -> &mut Vec<EntrySlot> {
        self.groups.entry(group).or_default()
    }

    // ── Section lifecycle ──────────────────────────────────────────────────

    /// Appends a blank entry to `group`. Nothing else in the form changes.
    pub fn add_entry(&mut self, group: Group) -> EntryId {
        let slot = EntrySlot::blank(group);
        let id = slot.id;
        self.entries_mut(group).push(slot);
        debug!("Added {group} entry {id}");
        id
    }

    /// Removes the entry at `position`, shifting later entries up by one.
    pub fn remove_entry(&mut self, group: Group, position: usize) -> Result<EntrySlot, FormError> {
        let entries = self.entries_mut(group);
        if position >= entries.len() {
            return Err(FormError::NoSuchEntry { group, position });
        }
        let removed = entries.remove(position);
        debug!("Removed {group} entry {} at position {position}", removed.id);
        Ok(removed)
    }

    /// Removes an entry by id, wherever it currently sits.
    pub fn remove_by_id(&mut self, id: EntryId) -> Result<(Group, usize), FormError> {
        let (group, position) = self.position_of(id).ok_or(FormError::UnknownEntry(id))?;
        self.remove_entry(group, position)?;
        Ok((group, position))
    }

    pub fn position_of(&self, id: EntryId) -> Option<(Group, usize)> {
        self.groups.iter().find_map(|(group, entries)| {
            entries
                .iter()
                .position(|slot| slot.id == id)
                .map(|position| (*group, position))
        })
    }

    // ── Edits ──────────────────────────────────────────────────────────────

    /// Sets a scalar field, or the `template` / `color` selection.
    pub fn set_scalar(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        match name {
            "template" => self.template = Template::from_name(value),
            "color" => self.accent_color = AccentColor::new(value),
            _ => {
                let slot = self
                    .scalars
                    .get_mut(name)
                    .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
                *slot = value.to_string();
            }
        }
        Ok(())
    }

    pub fn set_entry_field(
        &mut self,
        group: Group,
        position: usize,
        field: &str,
        value: &str,
    ) -> Result<(), FormError> {
        let index = group
            .fields()
            .iter()
            .position(|f| *f == field)
            .ok_or_else(|| FormError::UnknownField(group.field_key(field)))?;
        let slot = self
            .entries_mut(group)
            .get_mut(position)
            .ok_or(FormError::NoSuchEntry { group, position })?;
        slot.values[index] = value.to_string();
        Ok(())
    }

    /// Clears every value and section, then restores the starter sections.
    /// Template and color selection are kept.
    pub fn reset(&mut self) {
        let template = self.template;
        let accent_color = self.accent_color.clone();
        *self = Self::with_starter_sections();
        self.template = template;
        self.accent_color = accent_color;
    }

    /// Rebuilds the form from a stored record: recreates exactly `counts`
    /// entries per group, then writes every value back.
    pub fn refill(&mut self, record: &ResumeRecord, counts: &RepeatCounts) {
        *self = Self::new();

        for group in Group::ALL {
            for _ in 0..counts.get(group) {
                self.add_entry(group);
            }
        }

        for &name in SCALAR_FIELDS {
            if let Some(value) = record.scalar(name) {
                self.scalars.insert(name, value.to_string());
            }
        }
        self.template = record.template;
        self.accent_color = record.accent_color.clone();

        for group in Group::ALL {
            let entries = self.entries_mut(group);
            for (position, slot) in entries.iter_mut().enumerate() {
                for (index, field) in group.fields().iter().enumerate() {
                    if let Some(value) = record.entry_field(group, position, field) {
                        slot.values[index] = value.to_string();
                    }
                }
            }
        }
    }
}

impl InputSurface for DraftForm {
    /// Scalars first, then every entry's fields, entry by entry.
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = SCALAR_FIELDS
            .iter()
            .map(|&name| {
                let value = self.scalars.get(name).cloned().unwrap_or_default();
                (name.to_string(), value)
            })
            .collect();

        fields.push(("template".to_string(), self.template.as_str().to_string()));
        fields.push(("color".to_string(), self.accent_color.as_str().to_string()));

        for (group, entries) in &self.groups {
            for slot in entries {
                for (field, value) in group.fields().iter().zip(&slot.values) {
                    fields.push((group.field_key(field), value.clone()));
                }
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::collector::collect;

    fn titles(form: &DraftForm) -> Vec<String> {
        collect(form)
            .experience
            .into_iter()
            .map(|e| e.title)
            .collect()
    }

    #[test]
    fn test_add_entry_leaves_everything_else_alone() {
        let mut form = DraftForm::with_starter_sections();
        form.set_scalar("name", "Ada").unwrap();
        form.set_entry_field(Group::Education, 0, "degree", "BSc")
            .unwrap();

        form.add_entry(Group::Project);

        let record = collect(&form);
        assert_eq!(record.name.as_deref(), Some("Ada"));
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].degree, "BSc");
        assert_eq!(record.experience.len(), 1);
        assert_eq!(record.projects.len(), 1);
    }

    #[test]
    fn test_removal_renumbers_positions() {
        let mut form = DraftForm::new();
        for title in ["zero", "one", "two"] {
            form.add_entry(Group::Experience);
            let last = form.entries(Group::Experience).len() - 1;
            form.set_entry_field(Group::Experience, last, "title", title)
                .unwrap();
        }
        let third_id = form.entries(Group::Experience)[2].id;

        form.remove_entry(Group::Experience, 1).unwrap();

        assert_eq!(titles(&form), vec!["zero", "two"]);
        assert_eq!(
            form.position_of(third_id),
            Some((Group::Experience, 1))
        );
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut form = DraftForm::new();
        assert!(matches!(
            form.remove_entry(Group::Certification, 0),
            Err(FormError::NoSuchEntry { position: 0, .. })
        ));
    }

    #[test]
    fn test_remove_by_id() {
        let mut form = DraftForm::new();
        let first = form.add_entry(Group::Project);
        let second = form.add_entry(Group::Project);

        assert_eq!(form.remove_by_id(first).unwrap(), (Group::Project, 0));
        assert_eq!(form.position_of(second), Some((Group::Project, 0)));
        assert!(matches!(
            form.remove_by_id(first),
            Err(FormError::UnknownEntry(_))
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut form = DraftForm::new();
        let a = form.add_entry(Group::Experience);
        let b = form.add_entry(Group::Experience);
        let c = form.add_entry(Group::Education);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_alignment_after_mixed_operations() {
        let mut form = DraftForm::with_starter_sections();
        form.add_entry(Group::Experience);
        form.add_entry(Group::Certification);
        form.set_entry_field(Group::Experience, 1, "company", "Acme")
            .unwrap();
        form.remove_entry(Group::Experience, 0).unwrap();
        form.add_entry(Group::Experience);
        form.remove_entry(Group::Education, 0).unwrap();

        let pairs = form.fields();
        for group in Group::ALL {
            let lengths: Vec<usize> = group
                .fields()
                .iter()
                .map(|f| {
                    let key = group.field_key(f);
                    pairs.iter().filter(|(k, _)| *k == key).count()
                })
                .collect();
            assert!(
                lengths.windows(2).all(|w| w[0] == w[1]),
                "{group} columns out of line: {lengths:?}"
            );
            assert_eq!(lengths[0], form.entries(group).len());
        }

        let record = collect(&form);
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].company, "Acme");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut form = DraftForm::with_starter_sections();
        assert!(matches!(
            form.set_scalar("salary", "1"),
            Err(FormError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_entry_field(Group::Education, 0, "gpa", "4.0"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_reset_restores_starter_sections_and_keeps_selection() {
        let mut form = DraftForm::new();
        form.set_scalar("name", "Ada").unwrap();
        form.set_scalar("template", "sidebar").unwrap();
        form.add_entry(Group::Project);

        form.reset();

        let record = collect(&form);
        assert_eq!(record.name, None);
        assert_eq!(record.template, Template::Sidebar);
        assert_eq!(form.entries(Group::Experience).len(), 1);
        assert_eq!(form.entries(Group::Education).len(), 1);
        assert!(form.entries(Group::Project).is_empty());
    }

    #[test]
    fn test_refill_recreates_counts_and_values() {
        let mut source = DraftForm::new();
        source.set_scalar("email", "ada@example.com").unwrap();
        source.set_scalar("color", "#059669").unwrap();
        for _ in 0..3 {
            source.add_entry(Group::Certification);
        }
        source
            .set_entry_field(Group::Certification, 2, "issuer", "Society")
            .unwrap();
        let record = collect(&source);

        let mut form = DraftForm::with_starter_sections();
        form.refill(&record, &RepeatCounts::of(&record));

        assert!(form.entries(Group::Experience).is_empty());
        assert_eq!(form.entries(Group::Certification).len(), 3);
        assert_eq!(
            form.entries(Group::Certification)[2].get(Group::Certification, "issuer"),
            Some("Society")
        );
        assert_eq!(collect(&form), record);
    }
}
