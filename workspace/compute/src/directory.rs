use model::{RowId, Vendor};
use std::collections::HashMap;

/// Label shown for a contract whose vendor is not in the loaded list.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Vendor id -> name lookup over the currently loaded vendors.
///
/// When ids repeat, the first vendor in list order wins.
#[derive(Debug, Default, Clone)]
pub struct VendorDirectory<'a> {
    names: HashMap<&'a RowId, &'a str>,
}

impl<'a> VendorDirectory<'a> {
    pub fn new(vendors: &'a [Vendor]) -> Self {
        let mut names = HashMap::with_capacity(vendors.len());
        for vendor in vendors {
            names.entry(&vendor.id).or_insert(vendor.name.as_str());
        }
        Self { names }
    }

    /// Never fails: unknown or missing ids yield [`UNKNOWN_VENDOR`].
    pub fn name_of(&self, id: Option<&RowId>) -> &'a str {
        id.and_then(|id| self.names.get(id).copied())
            .unwrap_or(UNKNOWN_VENDOR)
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.names.contains_key(id)
    }
}
