//! Features Module - Model input schema and encoding
//!
//! Layout (column order + version), the versioned vector type, the scaler
//! and the encoder that ties them to `RawInput`.

pub mod layout;
pub mod vector;
pub mod scaler;
pub mod encoder;


// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo, feature_name};
pub use vector::FeatureVector;
pub use scaler::StandardScaler;
pub use encoder::{CategoryCodes, FeatureEncoder};
