pub mod catalog;
pub mod code;
pub mod coalesce;
pub mod color;
pub mod error;
pub mod identity;
pub mod ids;
pub mod visibility;

pub use catalog::{CatalogEntry, CatalogIndex};
pub use code::{compare_codes, family_of};
pub use coalesce::CoalescingQueue;
pub use color::{BrandId, ColorKey, NormalizedHex};
pub use error::CoreError;
pub use identity::{DisplayIdentity, OverrideFields, OverrideInput, OverridePatch, Patch};
pub use ids::*;
pub use visibility::{HideTarget, VisibilityFilter};
