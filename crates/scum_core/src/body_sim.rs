//! In-place patching of the `prisoner.body_simulation` blob.
//!
//! The blob is an undocumented serialization. Each property we care about is
//! stored as its name, [`KEY_PADDING`] bytes, the type tag, [`VALUE_PADDING`]
//! bytes, then the little-endian value. Fields are found by searching for the
//! first occurrence of the name and every offset after that is assumed fixed,
//! so the type tag is checked before anything is written.

use crate::core_api::{CoreError, CoreErrorCode};
use crate::layout::{ByteRange, FieldLayout};
use crate::property::{PropertyType, PropertyValue};

pub const KEY_PADDING: usize = 5;
pub const VALUE_PADDING: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPatch {
    pub layout: FieldLayout,
    pub previous: PropertyValue,
    pub written: PropertyValue,
}

pub fn locate_field(
    blob: &[u8],
    name: &[u8],
    ty: &PropertyType,
) -> Result<FieldLayout, CoreError> {
    let label = String::from_utf8_lossy(name);
    if name.is_empty() {
        return Err(CoreError::new(
            CoreErrorCode::InvalidInput,
            "field name must not be empty",
        ));
    }

    let name_start = find_first(blob, name).ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::FieldNotFound,
            format!("field {label} not found in body simulation"),
        )
    })?;
    let name_range = ByteRange::new(name_start, name.len());

    let type_tag = ByteRange::new(name_range.end + KEY_PADDING, ty.tag.len());
    if !type_tag.fits(blob.len()) || &blob[type_tag.as_range()] != ty.tag {
        let found = blob
            .get(type_tag.start..type_tag.end.min(blob.len()))
            .map(String::from_utf8_lossy)
            .unwrap_or_default();
        return Err(CoreError::new(
            CoreErrorCode::TypeMismatch,
            format!(
                "field {label} at offset {name_start}: expected type tag {}, found {found:?}",
                ty.kind
            ),
        ));
    }

    let value = ByteRange::new(type_tag.end + VALUE_PADDING, ty.width);
    if !value.fits(blob.len()) {
        return Err(CoreError::new(
            CoreErrorCode::Truncated,
            format!(
                "field {label} value needs bytes {}..{}, blob is {} bytes",
                value.start,
                value.end,
                blob.len()
            ),
        ));
    }

    tracing::debug!(
        field = %label,
        name_offset = name_start,
        value_offset = value.start,
        "located body simulation field"
    );

    Ok(FieldLayout {
        name: name_range,
        type_tag,
        value,
    })
}

pub fn read_field(
    blob: &[u8],
    name: &[u8],
    ty: &PropertyType,
) -> Result<PropertyValue, CoreError> {
    let layout = locate_field(blob, name, ty)?;
    PropertyValue::decode(ty.kind, &blob[layout.value.as_range()])
}

/// Overwrites the value of `name` with `value` encoded as `ty`.
///
/// Only the `ty.width` bytes of the value window change. On error the blob is
/// left exactly as it was.
pub fn patch_field(
    blob: &mut [u8],
    name: &[u8],
    value: f64,
    ty: &PropertyType,
) -> Result<FieldPatch, CoreError> {
    let written = PropertyValue::encode(ty.kind, value)?;
    let layout = locate_field(blob, name, ty)?;
    let window = layout.value.as_range();
    let previous = PropertyValue::decode(ty.kind, &blob[window.clone()])?;

    blob[window].copy_from_slice(&written.to_bytes());

    Ok(FieldPatch {
        layout,
        previous,
        written,
    })
}

fn find_first(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
