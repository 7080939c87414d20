use std::collections::{BTreeMap, BTreeSet};

use geofib_types::Position;
use serde::{Deserialize, Serialize};

/// Identifier of a vault in a [`FiberManager`](super::FiberManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaultId(pub(crate) usize);

impl VaultId {
    /// Index of the vault in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Vault (or handhole, pedestal) of a fiber network.
///
/// Vaults form a tree rooted at the head end. Each vault except the head end is connected to its parent by a piece
/// of a backbone alignment containing `microducts` microducts.
#[derive(Debug, Clone, PartialEq)]
pub struct Vault {
    name: String,
    location: Position,
    parent: Option<VaultId>,
    children: BTreeMap<String, VaultId>,
    path_to_parent: Vec<Position>,
    microducts: u32,
    splices: BTreeSet<String>,
    trunk_carries: BTreeSet<String>,
    duct_carries: BTreeSet<String>,
}

impl Vault {
    pub(crate) fn new(name: String, location: Position) -> Self {
        Self {
            name,
            location,
            parent: None,
            children: BTreeMap::new(),
            path_to_parent: vec![],
            microducts: 0,
            splices: BTreeSet::new(),
            trunk_carries: BTreeSet::new(),
            duct_carries: BTreeSet::new(),
        }
    }

    /// Unique name of the vault.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surveyed location.
    pub fn location(&self) -> Position {
        self.location
    }

    /// Next vault towards the head end. `None` for the head end.
    pub fn parent(&self) -> Option<VaultId> {
        self.parent
    }

    /// Vaults whose parent is this vault, by name.
    pub fn children(&self) -> &BTreeMap<String, VaultId> {
        &self.children
    }

    /// Part of the backbone alignment going from this vault to its parent.
    pub fn path_to_parent(&self) -> &[Position] {
        &self.path_to_parent
    }

    /// Number of microducts between this vault and its parent.
    pub fn microducts(&self) -> u32 {
        self.microducts
    }

    /// Drops spliced to the trunk fiber in this vault.
    pub fn splices(&self) -> &BTreeSet<String> {
        &self.splices
    }

    /// Drops whose trunk fiber strand passes through this vault on the way to the head end.
    pub fn trunk_carries(&self) -> &BTreeSet<String> {
        &self.trunk_carries
    }

    /// Drops occupying the duct between this vault and its parent.
    pub fn duct_carries(&self) -> &BTreeSet<String> {
        &self.duct_carries
    }

    pub(crate) fn attach(&mut self, parent: VaultId, path_to_parent: Vec<Position>, microducts: u32) {
        self.parent = Some(parent);
        self.path_to_parent = path_to_parent;
        self.microducts = microducts;
    }

    pub(crate) fn add_child(&mut self, name: String, id: VaultId) {
        self.children.insert(name, id);
    }

    pub(crate) fn add_splice(&mut self, drop: &str) {
        self.splices.insert(drop.to_string());
    }

    pub(crate) fn carry_trunk(&mut self, drop: &str) {
        self.trunk_carries.insert(drop.to_string());
    }

    pub(crate) fn carry_duct(&mut self, drop: &str) {
        self.duct_carries.insert(drop.to_string());
    }
}

/// Reporting view of a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultSummary {
    /// Vault name.
    pub name: String,
    /// Surveyed location.
    pub location: Position,
    /// Name of the parent vault, `None` for the head end.
    pub parent: Option<String>,
    /// Number of microducts to the parent.
    pub microducts: u32,
    /// Drops spliced in the vault.
    pub splices: Vec<String>,
    /// Number of trunk fiber strands passing through the vault.
    pub trunk_width: usize,
    /// Number of drops in the duct to the parent.
    pub duct_width: usize,
    /// Drops in the duct to the parent.
    pub duct_carries: Vec<String>,
}
