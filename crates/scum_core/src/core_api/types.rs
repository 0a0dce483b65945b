use crate::property::{PropertyKind, PropertyValue};

/// A row of the `prisoner` table. Only the columns this tool reads are
/// mapped; `body_simulation` is the only one ever written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prisoner {
    pub id: i64,
    pub user_profile_id: Option<i64>,
    pub body_simulation: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPrisoner {
    pub id: i64,
    pub name: Option<String>,
}

impl LocalPrisoner {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillEntry {
    pub name: String,
    pub level: i64,
    pub experience: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillChange {
    pub name: String,
    pub previous_level: i64,
    pub previous_experience: i64,
    pub level: i64,
    pub experience: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub name: String,
    pub property: PropertyKind,
    pub value_offset: usize,
    pub previous: PropertyValue,
    pub written: PropertyValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditReport {
    pub prisoner_id: i64,
    pub attributes: Vec<AttributeChange>,
    pub skills: Vec<SkillChange>,
}
