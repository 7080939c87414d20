//! Fiber network design: backbone ducts, vaults and drops described by a [`DesignConfig`].

mod config;

pub use config::{BackboneConfig, DesignConfig, DropConfig};
use geofib_types::{Contour, Position};
use serde::{Deserialize, Serialize};

use crate::error::GeofibError;
use crate::fiber::{FiberManager, VaultSummary};
use crate::source::CoordinateSource;

/// Calculated design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    /// Name of the design.
    pub name: String,
    /// Description of the design.
    pub description: String,
    /// Author of the design.
    pub author: String,
    /// Name of the head end vault.
    pub head_end: String,
    /// Backbone duct segments in configuration order.
    pub backbone: Vec<SegmentReport>,
    /// Drops in configuration order.
    pub drops: Vec<DropReport>,
    /// All vaults, sorted by name.
    pub vaults: Vec<VaultSummary>,
}

/// Duct segment of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    /// Name of the alignment feature.
    pub alignment: String,
    /// Label of the segment: its name followed by the length, e.g. `BB 1 - 430 FT`.
    pub label: String,
    /// Duct product.
    pub product: Option<String>,
    /// Installation method.
    pub install_method: Option<String>,
    /// Geodesic length rounded up to 10 feet. `None` for single point features.
    pub length_feet: Option<f64>,
    /// Alignment geometry.
    pub path: Vec<Position>,
}

/// Routed fiber drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropReport {
    /// Demarc name, identifying the drop.
    pub demarc: String,
    /// New drop duct, if the drop does not use existing fiber.
    pub duct: Option<SegmentReport>,
    /// Whether the drop alignment is existing fiber.
    pub uses_existing_fiber: bool,
    /// Physical path of the drop from the demarc to the splice vault.
    pub route: Vec<Position>,
}

/// Calculation of a fiber network design over survey features.
#[derive(Debug)]
pub struct Design<S> {
    config: DesignConfig,
    manager: FiberManager<S>,
}

impl<S: CoordinateSource> Design<S> {
    /// Creates a new design over the survey features of `source`.
    pub fn new(config: DesignConfig, source: S) -> Self {
        Self {
            config,
            manager: FiberManager::new(source),
        }
    }

    /// Design configuration.
    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    /// Vault network of the design. It is populated by [`Design::calculate`].
    pub fn manager(&self) -> &FiberManager<S> {
        &self.manager
    }

    /// Builds the backbone vault tree, routes all drops and reports the result.
    ///
    /// Fails if a feature named in the configuration is missing from the source or the backbone does not form a
    /// single tree.
    pub fn calculate(&mut self) -> Result<DesignReport, GeofibError> {
        let mut backbone = Vec::with_capacity(self.config.backbone.len());
        for segment in &self.config.backbone {
            if segment.vaults.is_empty() {
                return Err(GeofibError::Structure(format!(
                    "backbone segment {} has no vaults",
                    segment.name
                )));
            }

            backbone.push(self.segment(
                &segment.name,
                None,
                Some(segment.duct.as_str()),
                Some(segment.install_method.as_str()),
            )?);
            self.manager
                .set_alignment(&segment.name, segment.microducts, segment.vaults.as_slice())?;
        }

        let head_end = self.manager.head_end()?;

        let mut drops = Vec::with_capacity(self.config.drops.len());
        for drop in &self.config.drops {
            let uses_existing_fiber = drop.uses_existing_fiber();
            let path = match &drop.alignment {
                Some(alignment) => Some(self.manager.source().require(alignment)?.to_vec()),
                None => None,
            };
            // existing fiber is routed along its alignment but needs no new duct
            let duct = match (&drop.alignment, uses_existing_fiber) {
                (Some(alignment), false) => Some(self.segment(alignment, drop.duct_name(), None, None)?),
                _ => None,
            };

            let route = self.manager.add_fiber_drop(
                &drop.demarc,
                path.as_deref(),
                &drop.bb_vault,
                &drop.splice_vault,
            )?;

            drops.push(DropReport {
                demarc: drop.demarc.clone(),
                duct,
                uses_existing_fiber,
                route,
            });
        }

        let report = DesignReport {
            name: self.config.design_name.clone(),
            description: self.config.design_description.clone(),
            author: self.config.design_author.clone(),
            head_end: self.manager.vault(head_end).name().to_string(),
            backbone,
            drops,
            vaults: self.manager.summaries(),
        };

        log::info!(
            "Calculated design {}: {} backbone segments, {} vaults, {} drops",
            report.name,
            report.backbone.len(),
            report.vaults.len(),
            report.drops.len()
        );

        Ok(report)
    }

    fn segment(
        &self,
        alignment: &str,
        label: Option<&str>,
        product: Option<&str>,
        install_method: Option<&str>,
    ) -> Result<SegmentReport, GeofibError> {
        let path = self
            .manager
            .source()
            .coordinates(alignment)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| GeofibError::MissingFeature(format!("segment {alignment}")))?
            .to_vec();

        let length_feet =
            (path.len() > 1).then(|| round_up_to_ten(Contour::new(path.clone()).geodesic_length_feet()));
        let name = label.unwrap_or(alignment);
        let label = match length_feet {
            Some(length) => format!("{name} - {length} FT"),
            None => name.to_string(),
        };

        Ok(SegmentReport {
            alignment: alignment.to_string(),
            label,
            product: product.map(String::from),
            install_method: install_method.map(String::from),
            length_feet,
            path,
        })
    }
}

fn round_up_to_ten(feet: f64) -> f64 {
    10.0 * (feet / 10.0).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geofib_types::geo::NewGeoPoint;
    use geofib_types::latlon;

    type Source = ahash::HashMap<String, Vec<Position>>;

    fn source() -> Source {
        let mut source = Source::default();
        let start = latlon!(37.0, -122.0);
        let west = |feet: f64| start.displace(feet, 270.0);
        let mut add = |name: &str, points: Vec<Position>| {
            source.insert(name.to_string(), points);
        };

        add("BB 1", vec![start, west(497.0), west(994.0)]);
        add("HE", vec![start]);
        add("FV1", vec![west(497.0)]);
        add("FV2", vec![west(994.0)]);
        add("FDEMARC 1", vec![west(994.0).displace(60.0, 0.0)]);
        add("D1 duct 1.25in", vec![west(994.0), west(994.0).displace(58.0, 0.0)]);
        add("FDEMARC 2", vec![west(497.0).displace(30.0, 180.0)]);
        add("D2 existing fiber", vec![west(497.0), west(497.0).displace(30.0, 180.0)]);
        source
    }

    fn config(json: &str) -> DesignConfig {
        serde_json::from_str(json).unwrap()
    }

    const DESIGN: &str = r#"{
        "design_name": "Upper Road",
        "design_author": "J. Smith",
        "backbone": [
            {"name": "BB 1", "duct": "7-way microduct", "install_method": "bore", "microducts": 7,
             "vaults": ["HE", "FV1", "FV2"]}
        ],
        "drops": [
            {"demarc": "FDEMARC 1", "alignment": "D1 duct 1.25in", "bb_vault": "FV2", "splice_vault": "FV1"},
            {"demarc": "FDEMARC 2", "alignment": "D2 existing fiber", "bb_vault": "FV1", "splice_vault": "FV1"}
        ]
    }"#;

    #[test]
    fn calculate_design() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut design = Design::new(config(DESIGN), source());
        let report = design.calculate().unwrap();

        assert_eq!(report.name, "Upper Road");
        assert_eq!(report.author, "J. Smith");
        assert_eq!(report.head_end, "HE");

        let segment = &report.backbone[0];
        assert_eq!(segment.length_feet, Some(1000.0));
        assert_eq!(segment.label, "BB 1 - 1000 FT");
        assert_eq!(segment.product.as_deref(), Some("7-way microduct"));
        assert_eq!(segment.install_method.as_deref(), Some("bore"));

        let new_duct = &report.drops[0];
        assert!(!new_duct.uses_existing_fiber);
        let duct = new_duct.duct.as_ref().unwrap();
        assert_eq!(duct.label, "D1 - 60 FT");
        assert_eq!(duct.product, None);
        // demarc, then the drop duct starting from its end closer to the demarc
        assert_eq!(new_duct.route[1], duct.path[1]);
        assert_eq!(new_duct.route[2], duct.path[0]);

        let existing = &report.drops[1];
        assert!(existing.uses_existing_fiber);
        assert!(existing.duct.is_none());
        // demarc, then the existing fiber from the demarc end to FV1
        assert_eq!(existing.route.len(), 3);
        assert_eq!(existing.route[1], existing.route[0]);
        assert_eq!(existing.route[2], report.vaults[0].location);

        let names: Vec<_> = report.vaults.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["FV1", "FV2", "HE"]);
        assert_eq!(report.vaults[0].trunk_width, 2);
        assert_eq!(report.vaults[0].splices, ["FDEMARC 1", "FDEMARC 2"]);
        assert_eq!(report.vaults[1].duct_carries, ["FDEMARC 1"]);
        assert_eq!(report.vaults[1].microducts, 7);
        assert_eq!(report.vaults[2].trunk_width, 2);

        assert_eq!(design.manager().len(), 3);
    }

    #[test]
    fn missing_features() {
        let mut design = Design::new(
            config(r#"{"design_name": "x", "backbone": [{"name": "BB 9", "duct": "d", "install_method": "m", "vaults": ["HE"]}]}"#),
            source(),
        );
        assert_matches!(design.calculate(), Err(GeofibError::MissingFeature(_)));

        let mut design = Design::new(
            config(
                r#"{"design_name": "x",
                    "backbone": [{"name": "BB 1", "duct": "d", "install_method": "m", "vaults": ["HE", "FV1"]}],
                    "drops": [{"demarc": "FDEMARC 1", "alignment": "D9 duct", "bb_vault": "FV1", "splice_vault": "HE"}]}"#,
            ),
            source(),
        );
        assert_matches!(design.calculate(), Err(GeofibError::MissingFeature(_)));
    }

    #[test]
    fn backbone_must_be_one_tree() {
        let mut design = Design::new(
            config(
                r#"{"design_name": "x", "backbone": [
                    {"name": "BB 1", "duct": "d", "install_method": "m", "vaults": ["HE", "FV1"]},
                    {"name": "BB 1", "duct": "d", "install_method": "m", "vaults": ["FV2"]}
                ]}"#,
            ),
            source(),
        );
        assert_matches!(design.calculate(), Err(GeofibError::Structure(_)));

        let mut design = Design::new(
            config(r#"{"design_name": "x", "backbone": [{"name": "BB 1", "duct": "d", "install_method": "m", "vaults": []}]}"#),
            source(),
        );
        assert_matches!(design.calculate(), Err(GeofibError::Structure(_)));
    }

    #[test]
    fn lengths_round_up() {
        assert_eq!(round_up_to_ten(0.0), 0.0);
        assert_eq!(round_up_to_ten(0.1), 10.0);
        assert_eq!(round_up_to_ten(430.0), 430.0);
        assert_eq!(round_up_to_ten(430.01), 440.0);
    }
}
