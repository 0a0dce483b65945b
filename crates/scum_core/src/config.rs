use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::property::{PropertyKind, PropertyValue};

pub const MAX_SKILL_LEVEL: i64 = 3;
pub const MAX_SKILL_EXPERIENCE: i64 = 10_000_000;

const DEFAULT_ATTRIBUTES: [(&str, f64); 4] = [
    ("BaseStrength", 8.0),
    ("BaseConstitution", 5.0),
    ("BaseDexterity", 5.0),
    ("BaseIntelligence", 5.0),
];

const DEFAULT_SKILLS: [&str; 23] = [
    "BoxingSkill",
    "AwarenessSkill",
    "RiflesSkill",
    "SnipingSkill",
    "CamouflageSkill",
    "SurvivalSkill",
    "MeleeWeaponsSkill",
    "HandgunSkill",
    "RunningSkill",
    "EnduranceSkill",
    "TacticsSkill",
    "CookingSkill",
    "ThieverySkill",
    "ArcherySkill",
    "DrivingSkill",
    "EngineeringSkill",
    "DemolitionSkill",
    "MedicalSkill",
    "MotorcycleSkill",
    "StealthSkill",
    "AviationSkill",
    "ResistanceSkill",
    "FarmingSkill",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeTarget {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub property: PropertyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillTarget {
    pub level: i64,
    pub experience: i64,
}

/// What to write into a prisoner: body simulation attributes, applied in
/// order, and skill overrides keyed by skill name. Skills that are not listed
/// are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditPlan {
    #[serde(default)]
    pub attributes: Vec<AttributeTarget>,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillTarget>,
}

impl Default for EditPlan {
    /// Everything maxed out.
    fn default() -> Self {
        let attributes = DEFAULT_ATTRIBUTES
            .iter()
            .map(|&(name, value)| AttributeTarget {
                name: name.to_string(),
                value,
                property: PropertyKind::DoubleProperty,
            })
            .collect();
        let skills = DEFAULT_SKILLS
            .iter()
            .map(|&name| {
                (
                    name.to_string(),
                    SkillTarget {
                        level: MAX_SKILL_LEVEL,
                        experience: MAX_SKILL_EXPERIENCE,
                    },
                )
            })
            .collect();

        Self { attributes, skills }
    }
}

impl EditPlan {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, CoreError> {
        let json = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Config,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), CoreError> {
        for attribute in &self.attributes {
            if attribute.name.is_empty() {
                return Err(CoreError::new(
                    CoreErrorCode::Config,
                    "attribute names must not be empty",
                ));
            }
            if !attribute.value.is_finite() {
                return Err(CoreError::new(
                    CoreErrorCode::Config,
                    format!("attribute {} has a non-finite value", attribute.name),
                ));
            }
            PropertyValue::encode(attribute.property, attribute.value).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Config,
                    format!("attribute {}: {}", attribute.name, e.message),
                )
            })?;
        }
        Ok(())
    }

    /// Notes for values outside the ranges the game is known to accept. These
    /// are reported, never enforced.
    pub fn range_warnings(&self) -> Vec<String> {
        let mut out = Vec::new();

        for attribute in &self.attributes {
            if let Some((min, max)) = documented_attribute_range(&attribute.name) {
                if attribute.value < min || attribute.value > max {
                    out.push(format!(
                        "{} = {} is outside the documented range {min}..={max}",
                        attribute.name, attribute.value
                    ));
                }
            }
        }

        for (name, target) in &self.skills {
            if !(0..=MAX_SKILL_LEVEL).contains(&target.level) {
                out.push(format!(
                    "{name} level {} is outside 0..={MAX_SKILL_LEVEL}",
                    target.level
                ));
            }
            if !(0..=MAX_SKILL_EXPERIENCE).contains(&target.experience) {
                out.push(format!(
                    "{name} experience {} is outside 0..={MAX_SKILL_EXPERIENCE}",
                    target.experience
                ));
            }
        }

        out
    }
}

fn documented_attribute_range(name: &str) -> Option<(f64, f64)> {
    match name {
        "BaseStrength" => Some((1.0, 8.0)),
        "BaseConstitution" | "BaseDexterity" | "BaseIntelligence" => Some((1.0, 5.0)),
        _ => None,
    }
}

/// `%LOCALAPPDATA%\SCUM\Saved\SaveFiles\SCUM.db`, where the game keeps its
/// single player database.
pub fn default_database_path() -> Result<PathBuf, CoreError> {
    let local_app_data = env::var_os("LOCALAPPDATA").ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::Config,
            "LOCALAPPDATA is not set; pass the database path with --db",
        )
    })?;

    Ok(PathBuf::from(local_app_data)
        .join("SCUM")
        .join("Saved")
        .join("SaveFiles")
        .join("SCUM.db"))
}
