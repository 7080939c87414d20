use std::collections::BTreeSet;

use geofib_types::geo::GeoPoint;
use geofib_types::{Contour, Position};

use crate::error::GeofibError;
use crate::fiber::vault::{Vault, VaultId, VaultSummary};
use crate::source::CoordinateSource;

/// Tree of vaults of a fiber network and the drops routed through it.
///
/// Vaults are created on first reference by name; their locations come from the coordinate source. Backbone
/// alignments connect consecutive vaults into a tree with a single head end, and each fiber drop marks the vaults
/// it passes through.
#[derive(Debug)]
pub struct FiberManager<S> {
    source: S,
    vaults: Vec<Vault>,
    index: ahash::HashMap<String, VaultId>,
}

impl<S: CoordinateSource> FiberManager<S> {
    /// Creates an empty network over the given survey features.
    pub fn new(source: S) -> Self {
        Self {
            source,
            vaults: vec![],
            index: Default::default(),
        }
    }

    /// Survey features of the network.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Vault with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id was issued by another manager.
    pub fn vault(&self, id: VaultId) -> &Vault {
        &self.vaults[id.0]
    }

    /// Id of the vault with the given name, if it was created.
    pub fn vault_id(&self, name: &str) -> Option<VaultId> {
        self.index.get(name).copied()
    }

    /// Vault with the given name, if it was created.
    pub fn vault_by_name(&self, name: &str) -> Option<&Vault> {
        self.vault_id(name).map(|id| self.vault(id))
    }

    /// Iterates over all vaults in creation order.
    pub fn vaults(&self) -> impl Iterator<Item = (VaultId, &Vault)> {
        self.vaults.iter().enumerate().map(|(index, vault)| (VaultId(index), vault))
    }

    /// Number of vaults.
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    /// Whether no vault was created yet.
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Returns the id of the vault with the given name, creating the vault at the location of the feature with this
    /// name if needed.
    pub fn vault_or_create(&mut self, name: &str) -> Result<VaultId, GeofibError> {
        if let Some(id) = self.vault_id(name) {
            return Ok(id);
        }

        let location = self.source.location(name)?;
        let id = VaultId(self.vaults.len());
        self.vaults.push(Vault::new(name.to_string(), location));
        self.index.insert(name.to_string(), id);

        log::debug!("Created vault {name} at {location}");
        Ok(id)
    }

    /// Connects `child` to `parent` along `alignment`.
    ///
    /// Both vaults are snapped onto the alignment, and the part of the alignment between the two snapped points
    /// becomes the path from the child to the parent, running from the child to the parent whatever the direction of
    /// the alignment is.
    pub fn set_parent(
        &mut self,
        child: VaultId,
        parent: VaultId,
        alignment: &[Position],
        microducts: u32,
    ) -> Result<(), GeofibError> {
        let child_vault = self.vault(child);
        let parent_vault = self.vault(parent);

        if let Some(existing) = child_vault.parent() {
            return Err(GeofibError::Structure(format!(
                "{} already has parent {}, cannot set {}",
                child_vault.name(),
                self.vault(existing).name(),
                parent_vault.name()
            )));
        }
        if parent_vault.children().contains_key(child_vault.name()) {
            return Err(GeofibError::Structure(format!(
                "{} already has child {}",
                parent_vault.name(),
                child_vault.name()
            )));
        }
        if self.ancestor_chain(parent, &BTreeSet::new()).contains(&child) {
            return Err(GeofibError::Structure(format!(
                "{} is upstream of {}, cannot make it a child",
                child_vault.name(),
                parent_vault.name()
            )));
        }

        let contour = Contour::new(alignment.to_vec());
        let child_position = contour.project(&child_vault.location())?;
        let parent_position = contour.project(&parent_vault.location())?;
        let path = contour.substring(child_position, parent_position)?;

        log::debug!(
            "Vault {} connected to {} with {microducts} microducts",
            child_vault.name(),
            parent_vault.name()
        );

        let child_name = child_vault.name().to_string();
        self.vaults[parent.0].add_child(child_name, child);
        self.vaults[child.0].attach(parent, path, microducts);
        Ok(())
    }

    /// Registers a backbone alignment: the named alignment connects the vaults in the given order, each vault being
    /// the parent of the next one.
    pub fn set_alignment<N: AsRef<str>>(
        &mut self,
        name: &str,
        microducts: u32,
        vault_names: &[N],
    ) -> Result<(), GeofibError> {
        if vault_names.is_empty() {
            return Err(GeofibError::Structure(format!("alignment {name} has no vaults")));
        }

        let alignment = self.source.require(name)?.to_vec();
        self.check_alignment(name, vault_names)?;

        let ids = vault_names
            .iter()
            .map(|vault| self.vault_or_create(vault.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        for pair in ids.windows(2) {
            self.set_parent(pair[1], pair[0], &alignment, microducts)?;
        }

        Ok(())
    }

    /// Marks `vault` as the splice point of the drop: the drop's trunk strand runs from the vault to the head end.
    pub fn set_splicepoint_for(&mut self, vault: VaultId, drop: &str) {
        self.vaults[vault.0].add_splice(drop);

        let mut current = Some(vault);
        while let Some(id) = current {
            self.vaults[id.0].carry_trunk(drop);
            current = self.vault(id).parent();
        }
    }

    /// The vault and its ancestors up to the head end, nearest first. The chain ends before the first vault whose
    /// name is in `stop`.
    pub fn ancestor_chain(&self, vault: VaultId, stop: &BTreeSet<String>) -> Vec<VaultId> {
        let mut chain = vec![];
        let mut current = Some(vault);
        while let Some(id) = current {
            let vault = self.vault(id);
            if stop.contains(vault.name()) {
                break;
            }

            chain.push(id);
            current = vault.parent();
        }

        chain
    }

    /// Names of the vault and all its ancestors.
    pub fn ancestor_names(&self, vault: VaultId) -> BTreeSet<String> {
        self.ancestor_chain(vault, &BTreeSet::new())
            .into_iter()
            .map(|id| self.vault(id).name().to_string())
            .collect()
    }

    /// Marks the ducts from each vault of the chain to its parent as used by the drop and returns the concatenated
    /// paths of these ducts.
    pub fn mark_duct_usage(&mut self, chain: &[VaultId], drop: &str) -> Vec<Position> {
        let mut path = vec![];
        for id in chain {
            let vault = &mut self.vaults[id.0];
            vault.carry_duct(drop);
            path.extend_from_slice(vault.path_to_parent());
        }

        path
    }

    /// The only vault without a parent.
    pub fn head_end(&self) -> Result<VaultId, GeofibError> {
        let mut roots = self.vaults().filter(|(_, vault)| vault.parent().is_none());
        match (roots.next(), roots.next()) {
            (Some((id, _)), None) => Ok(id),
            (None, _) => Err(GeofibError::Structure("network has no head end".to_string())),
            (Some((_, first)), Some((_, second))) => Err(GeofibError::Structure(format!(
                "network has more than one head end: {}, {}",
                first.name(),
                second.name()
            ))),
        }
    }

    /// Routes a fiber drop and returns its physical path.
    ///
    /// The drop starts at the `demarc` feature and follows the drop duct `alignment` (if any, whichever end is closer
    /// to the demarc first) to `bb_vault`. From there it runs in the backbone ducts up to the nearest vault shared with
    /// the path of `splice_vault` to the head end, and down to `splice_vault`, where it is spliced to the trunk. The
    /// drop is identified by the demarc name.
    pub fn add_fiber_drop(
        &mut self,
        demarc: &str,
        alignment: Option<&[Position]>,
        bb_vault: &str,
        splice_vault: &str,
    ) -> Result<Vec<Position>, GeofibError> {
        let start = self.source.location(demarc)?;
        let mut route = vec![start];

        if let Some(alignment) = alignment {
            match (alignment.first(), alignment.last()) {
                (Some(first), Some(last)) if start.degree_distance_sq(last) < start.degree_distance_sq(first) => {
                    route.extend(alignment.iter().rev())
                }
                _ => route.extend_from_slice(alignment),
            }
        }

        let bb = self.backbone_vault(bb_vault)?;
        let splice = self.backbone_vault(splice_vault)?;

        let bb_ancestors = self.ancestor_names(bb);
        let splice_ancestors = self.ancestor_names(splice);
        let common: BTreeSet<String> = bb_ancestors.intersection(&splice_ancestors).cloned().collect();
        if common.is_empty() {
            return Err(GeofibError::Structure(format!(
                "drop {demarc}: vaults {bb_vault} and {splice_vault} are not connected"
            )));
        }

        self.set_splicepoint_for(splice, demarc);
        let bb_chain = self.ancestor_chain(bb, &common);
        let bb_path = self.mark_duct_usage(&bb_chain, demarc);
        let splice_chain = self.ancestor_chain(splice, &common);
        let mut splice_path = self.mark_duct_usage(&splice_chain, demarc);
        splice_path.reverse();

        log::debug!(
            "Drop {demarc} uses {} ducts from {bb_vault} and {} ducts to {splice_vault}",
            bb_chain.len(),
            splice_chain.len()
        );

        route.extend(bb_path);
        route.extend(splice_path);
        Ok(route)
    }

    /// Number of trunk fiber strands passing through the vault.
    pub fn trunk_width(&self, vault: VaultId) -> usize {
        self.vault(vault).trunk_carries().len()
    }

    /// Number of drops in the duct from the vault to its parent.
    pub fn duct_width(&self, vault: VaultId) -> usize {
        self.vault(vault).duct_carries().len()
    }

    /// Summaries of all vaults, sorted by name.
    pub fn summaries(&self) -> Vec<VaultSummary> {
        let mut summaries: Vec<_> = self
            .vaults()
            .map(|(id, vault)| VaultSummary {
                name: vault.name().to_string(),
                location: vault.location(),
                parent: vault.parent().map(|parent| self.vault(parent).name().to_string()),
                microducts: vault.microducts(),
                splices: vault.splices().iter().cloned().collect(),
                trunk_width: self.trunk_width(id),
                duct_width: self.duct_width(id),
                duct_carries: vault.duct_carries().iter().cloned().collect(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    // Everything `set_parent` rejects for the pairs of the alignment, checked before any vault is created or
    // connected.
    fn check_alignment<N: AsRef<str>>(&self, name: &str, vault_names: &[N]) -> Result<(), GeofibError> {
        let mut seen = BTreeSet::new();
        for vault in vault_names {
            let vault = vault.as_ref();
            if !seen.insert(vault) {
                return Err(GeofibError::Structure(format!(
                    "vault {vault} appears more than once in alignment {name}"
                )));
            }
            if self.vault_id(vault).is_none() {
                self.source.location(vault)?;
            }
        }

        let Some((upstream, children)) = vault_names.split_first() else {
            return Ok(());
        };
        let upstream_names = match self.vault_id(upstream.as_ref()) {
            Some(id) => self.ancestor_names(id),
            None => BTreeSet::new(),
        };

        for child in children {
            let child = child.as_ref();
            let Some(id) = self.vault_id(child) else {
                continue;
            };

            if let Some(parent) = self.vault(id).parent() {
                return Err(GeofibError::Structure(format!(
                    "{child} already has parent {}, cannot add it to alignment {name}",
                    self.vault(parent).name()
                )));
            }
            if upstream_names.contains(child) {
                return Err(GeofibError::Structure(format!(
                    "{child} is upstream of {}, cannot add it to alignment {name}",
                    upstream.as_ref()
                )));
            }
        }

        Ok(())
    }

    fn backbone_vault(&self, name: &str) -> Result<VaultId, GeofibError> {
        self.vault_id(name)
            .ok_or_else(|| GeofibError::Structure(format!("vault {name} is not on any backbone alignment")))
    }
}
