//! Field collection: turns the current name/value pairs of an input surface
//! into a `ResumeRecord` snapshot.
//!
//! Repeated fields (`exp_title[]`, `edu_year[]`, ...) fill entries by position:
//! the n-th `exp_company[]` value lands in the n-th experience entry, whatever
//! order the surface yields fields in. Scalars are last-write-wins.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{AccentColor, Group, ResumeRecord, Template};

/// Anything that can report its current fields as ordered name/value pairs.
/// Repeated names appear once per entry, in entry order.
pub trait InputSurface {
    fn fields(&self) -> Vec<(String, String)>;
}

impl InputSurface for [(String, String)] {
    fn fields(&self) -> Vec<(String, String)> {
        self.to_vec()
    }
}

impl InputSurface for Vec<(String, String)> {
    fn fields(&self) -> Vec<(String, String)> {
        self.clone()
    }
}

/// Snapshots every field on the surface. Entries with a blank primary field are
/// kept so their positions survive a save/load cycle.
pub fn collect<S: InputSurface + ?Sized>(surface: &S) -> ResumeRecord {
    let mut record = ResumeRecord::default();
    let mut next_index: HashMap<(Group, &'static str), usize> = HashMap::new();

    for (name, value) in surface.fields() {
        if let Some((group, field)) = Group::parse_field_key(&name) {
            let index = next_index.entry((group, field)).or_insert(0);
            record.set_entry_field(group, *index, field, &value);
            *index += 1;
            continue;
        }

        match name.as_str() {
            "template" => record.template = Template::from_name(&value),
            "color" => record.accent_color = AccentColor::new(value),
            other => {
                if !record.set_scalar(other, &value) {
                    debug!("Ignoring unknown form field '{other}'");
                }
            }
        }
    }

    record
}

/// Preview variant of [`collect`]: drops every entry whose primary field is
/// blank. Secondary fields never decide whether a row exists, so an entry is
/// kept or dropped whole.
pub fn collect_non_empty<S: InputSurface + ?Sized>(surface: &S) -> ResumeRecord {
    let mut record = collect(surface);
    record.retain_present();
    record
}
