use serde::{Deserialize, Serialize};

/// Description of a fiber network design.
///
/// ```json
/// {
///     "design_name": "Upper Road",
///     "backbone": [
///         { "name": "BB 1", "duct": "2x 7-way microduct", "install_method": "directional bore",
///           "microducts": 7, "vaults": ["HE", "FVAULT 1", "FVAULT 2"] }
///     ],
///     "drops": [
///         { "demarc": "FDEMARC 12", "alignment": "D12 duct", "bb_vault": "FVAULT 2", "splice_vault": "FVAULT 1" }
///     ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Name of the design.
    pub design_name: String,
    /// Free text description.
    #[serde(default)]
    pub design_description: String,
    /// Author of the design.
    #[serde(default)]
    pub design_author: String,
    /// Backbone alignments. The first vault of the first alignment is the head end.
    pub backbone: Vec<BackboneConfig>,
    /// Fiber drops to route through the backbone.
    #[serde(default)]
    pub drops: Vec<DropConfig>,
}

/// Backbone duct alignment connecting a list of vaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackboneConfig {
    /// Name of the alignment feature.
    pub name: String,
    /// Duct product.
    pub duct: String,
    /// Installation method, e.g. trenching or directional bore.
    pub install_method: String,
    /// Number of microducts in the duct.
    #[serde(default = "default_microducts")]
    pub microducts: u32,
    /// Vaults along the alignment, upstream vault first.
    pub vaults: Vec<String>,
}

/// Fiber drop from a customer demarcation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    /// Name of the demarc feature. Also identifies the drop.
    pub demarc: String,
    /// Name of the drop alignment feature from the demarc to the backbone vault.
    #[serde(default)]
    pub alignment: Option<String>,
    /// Backbone vault the drop enters.
    pub bb_vault: String,
    /// Vault where the drop is spliced to the trunk fiber.
    pub splice_vault: String,
}

impl DropConfig {
    /// Whether the drop alignment is existing fiber rather than a new duct.
    pub fn uses_existing_fiber(&self) -> bool {
        self.alignment.as_deref().is_some_and(|alignment| {
            let alignment = alignment.to_lowercase();
            ["fiber", "existing", "empty"]
                .iter()
                .any(|marker| alignment.contains(marker))
        })
    }

    /// Short name of the drop duct: the first word of the alignment name.
    pub fn duct_name(&self) -> Option<&str> {
        self.alignment.as_deref()?.split_whitespace().next()
    }
}

fn default_microducts() -> u32 {
    1
}
