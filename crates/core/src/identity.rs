use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::color::{ColorKey, NormalizedHex};
use crate::CoreError;

/// Per-user replacements for catalog display fields. `None` falls back to the
/// catalog value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideFields {
    pub custom_code: Option<String>,
    pub custom_name_zh: Option<String>,
    pub custom_name_en: Option<String>,
    pub custom_hex_color: Option<NormalizedHex>,
    pub piece_id: Option<String>,
    pub notes: Option<String>,
}

impl OverrideFields {
    /// Carries every display field itself, so the catalog is not needed.
    pub fn is_complete(&self) -> bool {
        self.custom_code.is_some() && self.custom_hex_color.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One field of a partial override update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key absent: keep whatever is stored.
    Keep,
    /// Explicit empty value: revert to the catalog default.
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl Patch<String> {
    /// `None` is an absent key, `Some("")` an explicit clear.
    pub fn from_wire(value: Option<String>) -> Self {
        match value {
            None => Patch::Keep,
            Some(v) if v.is_empty() => Patch::Clear,
            Some(v) => Patch::Set(v),
        }
    }
}

impl<T> Patch<T> {
    fn merge_into(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) => *slot = Some(v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverridePatch {
    pub custom_code: Patch<String>,
    pub custom_name_zh: Patch<String>,
    pub custom_name_en: Patch<String>,
    pub custom_hex_color: Patch<NormalizedHex>,
    pub piece_id: Patch<String>,
    pub notes: Patch<String>,
}

/// Wire shape of an override update; absent keys and empty strings mean
/// different things.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideInput {
    pub custom_code: Option<String>,
    pub custom_name_zh: Option<String>,
    pub custom_name_en: Option<String>,
    pub custom_hex_color: Option<String>,
    pub piece_id: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<OverrideInput> for OverridePatch {
    type Error = CoreError;

    fn try_from(input: OverrideInput) -> Result<Self, CoreError> {
        let custom_hex_color = match Patch::from_wire(input.custom_hex_color) {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(raw) => Patch::Set(NormalizedHex::parse(&raw)?),
        };
        Ok(Self {
            custom_code: Patch::from_wire(input.custom_code),
            custom_name_zh: Patch::from_wire(input.custom_name_zh),
            custom_name_en: Patch::from_wire(input.custom_name_en),
            custom_hex_color,
            piece_id: Patch::from_wire(input.piece_id),
            notes: Patch::from_wire(input.notes),
        })
    }
}

impl OverridePatch {
    pub fn piece_id(value: impl Into<String>) -> Self {
        Self {
            piece_id: Patch::Set(value.into()),
            ..Self::default()
        }
    }

    pub fn merge_into(self, fields: &mut OverrideFields) {
        self.custom_code.merge_into(&mut fields.custom_code);
        self.custom_name_zh.merge_into(&mut fields.custom_name_zh);
        self.custom_name_en.merge_into(&mut fields.custom_name_en);
        self.custom_hex_color.merge_into(&mut fields.custom_hex_color);
        self.piece_id.merge_into(&mut fields.piece_id);
        self.notes.merge_into(&mut fields.notes);
    }
}

/// What a client renders for one inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayIdentity {
    pub code: String,
    pub hex_color: NormalizedHex,
    pub piece_label: String,
    pub notes: Option<String>,
    pub name_zh: Option<String>,
    pub name_en: Option<String>,
}

/// Layers a user's override over the catalog entry for `key`.
///
/// A catalog miss is only tolerated when the override is complete; otherwise
/// it surfaces as [`CoreError::ColorNotFound`].
pub fn resolve(
    key: &ColorKey,
    catalog: Option<&CatalogEntry>,
    overrides: Option<&OverrideFields>,
) -> Result<DisplayIdentity, CoreError> {
    let empty = OverrideFields::default();
    let ov = overrides.unwrap_or(&empty);

    let (code, hex_color, name_zh, name_en) = match catalog {
        Some(entry) => (
            ov.custom_code.clone().unwrap_or_else(|| entry.code.clone()),
            ov.custom_hex_color.clone().unwrap_or_else(|| entry.hex.clone()),
            ov.custom_name_zh.clone().or_else(|| entry.name_zh.clone()),
            ov.custom_name_en.clone().or_else(|| entry.name_en.clone()),
        ),
        None => match (&ov.custom_code, &ov.custom_hex_color) {
            (Some(code), Some(hex)) => (
                code.clone(),
                hex.clone(),
                ov.custom_name_zh.clone(),
                ov.custom_name_en.clone(),
            ),
            _ => {
                return Err(CoreError::ColorNotFound {
                    hex: key.hex.to_string(),
                    brand: key.brand.to_string(),
                });
            }
        },
    };

    let piece_label = ov.piece_id.clone().unwrap_or_else(|| code.clone());

    Ok(DisplayIdentity {
        code,
        hex_color,
        piece_label,
        notes: ov.notes.clone(),
        name_zh,
        name_en,
    })
}
