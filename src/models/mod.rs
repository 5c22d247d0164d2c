pub mod detection;
pub mod variant;

pub use detection::*;
pub use variant::*;

use std::collections::BTreeMap;

/// Gene symbol → affected drugs, supplied by the external rule/config layer.
///
/// Shared read-only across requests; a variant in a gene tied to three
/// drugs counts once for each of them.
pub type GeneDrugMap = BTreeMap<String, Vec<String>>;
