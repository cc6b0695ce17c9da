use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    #[error("invalid brand: {0:?}")]
    InvalidBrand(String),

    #[error("duplicate catalog entry for {hex} in brand {brand}")]
    DuplicateCatalogEntry { hex: String, brand: String },

    #[error("brand {brand} uses code {code} for both {first} and {second}")]
    DuplicateCatalogCode {
        brand: String,
        code: String,
        first: String,
        second: String,
    },

    #[error("color not found: {hex} in brand {brand}")]
    ColorNotFound { hex: String, brand: String },
}
