pub mod resume;

pub use resume::{
    non_blank, AccentColor, Certification, Education, Experience, Group, GroupEntry, Project,
    ResumeRecord, Template, SCALAR_FIELDS,
};
