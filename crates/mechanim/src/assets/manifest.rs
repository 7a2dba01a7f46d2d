//! JSON-described mechanisms.
//!
//! A manifest lists the steps of a mechanism with their sites (base offsets
//! around a step origin), bonds, atoms, arrows and captions. Every site
//! reference is checked when the manifest is loaded, so drawing never has
//! to deal with a missing site.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::config::ViewConfig;
use crate::api::mechanism::Mechanism;
use crate::api::painter::{Atom, Bond, Molecule, Painter};
use crate::api::sites::{SiteLayout, SiteMap, StepSites};
use crate::core::color::Rgb;
use crate::core::math::{Orientation, Point3D};
use crate::renderer::primitives::BondKind;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid mechanism manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mechanism `{0}` has no steps")]
    NoSteps(String),
    #[error("step {step} references unknown site `{site}`")]
    UnknownSite { step: usize, site: String },
}

/// Top-level manifest, deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanismManifest {
    pub title: String,
    #[serde(default)]
    pub config: ViewConfig,
    pub steps: Vec<StepDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub title: String,
    /// Translation applied after rotating each site offset.
    #[serde(default)]
    pub origin: Point3D,
    /// Site name → base offset `[x, y, z]`.
    pub sites: BTreeMap<String, Point3D>,
    #[serde(default)]
    pub bonds: Vec<BondDescriptor>,
    #[serde(default)]
    pub atoms: Vec<AtomDescriptor>,
    #[serde(default)]
    pub arrows: Vec<ArrowDescriptor>,
    /// Sites whose atom label is not drawn in this step.
    #[serde(default)]
    pub hidden_labels: Vec<String>,
    #[serde(default)]
    pub captions: Vec<CaptionDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondDescriptor {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: BondKind,
    /// Hex color; the style's bond color when absent.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomDescriptor {
    pub site: String,
    pub color: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub size: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrowDescriptor {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Bend as a fraction of the arrow length; 0 draws a straight arrow.
    #[serde(default)]
    pub curve: f32,
}

/// Text at a fixed logical screen position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionDescriptor {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl MechanismManifest {
    /// Parse a manifest from a JSON string without validating it.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check that there is at least one step and that every site reference
    /// names a site of its own step.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.steps.is_empty() {
            return Err(ManifestError::NoSteps(self.title.clone()));
        }
        for (index, step) in self.steps.iter().enumerate() {
            let check = |site: &str| {
                if step.sites.contains_key(site) {
                    Ok(())
                } else {
                    Err(ManifestError::UnknownSite { step: index, site: site.to_string() })
                }
            };
            for bond in &step.bonds {
                check(&bond.from)?;
                check(&bond.to)?;
            }
            for atom in &step.atoms {
                check(&atom.site)?;
            }
            for arrow in &step.arrows {
                check(&arrow.from)?;
                check(&arrow.to)?;
            }
            for site in &step.hidden_labels {
                check(site)?;
            }
        }
        Ok(())
    }
}

struct ResolvedArrow {
    from: String,
    to: String,
    color: Option<Rgb>,
    curve: f32,
}

struct ResolvedStep {
    title: String,
    origin: Point3D,
    offsets: Vec<(String, Point3D)>,
    bonds: Vec<(String, String, BondKind, Option<Rgb>)>,
    atoms: Vec<(String, Rgb, String, Option<f32>)>,
    arrows: Vec<ResolvedArrow>,
    hidden_labels: HashSet<String>,
    captions: Vec<CaptionDescriptor>,
}

/// Optional colors fall back to the style default (`None`) when invalid.
fn optional_color(color: Option<String>) -> Option<Rgb> {
    let hex = color?;
    match Rgb::from_hex(&hex) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("{}; using the style color", e);
            None
        }
    }
}

impl ResolvedStep {
    fn resolve(step: StepDescriptor) -> Self {
        Self {
            title: step.title,
            origin: step.origin,
            offsets: step.sites.into_iter().collect(),
            bonds: step
                .bonds
                .into_iter()
                .map(|b| (b.from, b.to, b.kind, optional_color(b.color)))
                .collect(),
            atoms: step
                .atoms
                .into_iter()
                .map(|a| (a.site, Rgb::parse_or(&a.color, Rgb::CARBON), a.label, a.size))
                .collect(),
            arrows: step
                .arrows
                .into_iter()
                .map(|a| ResolvedArrow {
                    from: a.from,
                    to: a.to,
                    color: optional_color(a.color),
                    curve: a.curve,
                })
                .collect(),
            hidden_labels: step.hidden_labels.into_iter().collect(),
            captions: step.captions,
        }
    }
}

/// Sites of one manifest step, tagged with the step they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestSites {
    pub step: usize,
    pub sites: StepSites,
}

/// A [`Mechanism`] backed by a validated manifest.
///
/// Colors are resolved once at load. Invalid ones are logged and replaced
/// with a default so a typo never stops the diagram from drawing.
pub struct ManifestMechanism {
    title: String,
    config: ViewConfig,
    steps: Vec<ResolvedStep>,
}

impl ManifestMechanism {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Self::from_manifest(MechanismManifest::from_json(json)?)
    }

    pub fn from_manifest(manifest: MechanismManifest) -> Result<Self, ManifestError> {
        manifest.validate()?;
        log::debug!("manifest: loaded `{}` with {} steps", manifest.title, manifest.steps.len());
        Ok(Self {
            title: manifest.title,
            config: manifest.config,
            steps: manifest.steps.into_iter().map(ResolvedStep::resolve).collect(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Mechanism for ManifestMechanism {
    type Sites = ManifestSites;

    fn config(&self) -> ViewConfig {
        self.config.clone()
    }

    fn step_count(&self) -> usize {
        self.steps.len()
    }

    fn step_title(&self, step: usize) -> &str {
        self.steps.get(step).map(|s| s.title.as_str()).unwrap_or("")
    }

    fn sites(&self, step: usize, orientation: Orientation) -> ManifestSites {
        let Some(resolved) = self.steps.get(step) else {
            return ManifestSites { step, sites: StepSites::default() };
        };
        let layout = SiteLayout::new(resolved.origin, orientation);
        let map = SiteMap::from_offsets(
            &layout,
            resolved.offsets.iter().map(|(name, offset)| (name.as_str(), *offset)),
        );
        ManifestSites {
            step,
            sites: StepSites {
                sites: map,
                hidden_labels: resolved.hidden_labels.clone(),
            },
        }
    }

    fn draw(&self, sites: &ManifestSites, painter: &mut Painter) {
        let Some(step) = self.steps.get(sites.step) else {
            return;
        };
        let placed = &sites.sites;

        let mut molecule = Molecule::new();
        for (from, to, kind, color) in &step.bonds {
            if let (Some(a), Some(b)) = (placed.sites.get(from), placed.sites.get(to)) {
                molecule.push_bond(Bond { from: a, to: b, kind: *kind, color: *color });
            }
        }
        for (site, color, label, size) in &step.atoms {
            if let Some(at) = placed.sites.get(site) {
                let label = if placed.label_hidden(site) { "" } else { label.as_str() };
                molecule.push_atom(Atom { at, color: *color, label, size: *size });
            }
        }
        painter.molecule(molecule);

        for arrow in &step.arrows {
            if let (Some(a), Some(b)) = (placed.sites.get(&arrow.from), placed.sites.get(&arrow.to)) {
                if arrow.curve == 0.0 {
                    painter.arrow(a, b, arrow.color);
                } else {
                    painter.curved_arrow(a, b, arrow.curve, arrow.color);
                }
            }
        }
        for caption in &step.captions {
            painter.caption(&caption.text, Vec2::new(caption.x, caption.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Projector;
    use crate::renderer::recorder::{CommandRecorder, DrawCommand};
    use crate::renderer::style::RenderStyle;

    const WATER: &str = r##"{
        "title": "Water",
        "config": { "auto_rotate": false },
        "steps": [
            {
                "title": "Bent water",
                "origin": [0, 0, 0],
                "sites": {
                    "O": [0, 0, 0],
                    "H1": [-30, 20, 0],
                    "H2": [30, 20, 0]
                },
                "bonds": [
                    { "from": "O", "to": "H1" },
                    { "from": "O", "to": "H2", "kind": "dashed", "color": "#ef4444" }
                ],
                "atoms": [
                    { "site": "O", "color": "#ef4444", "label": "O" },
                    { "site": "H1", "color": "#cbd5e1", "label": "H", "size": 12 },
                    { "site": "H2", "color": "not-a-color", "label": "H", "size": 12 }
                ],
                "arrows": [{ "from": "H2", "to": "O", "curve": 0.3 }],
                "hidden_labels": ["H1"],
                "captions": [{ "text": "H2O", "x": 10, "y": 20 }]
            }
        ]
    }"##;

    #[test]
    fn parse_and_validate() {
        let mechanism = ManifestMechanism::from_json(WATER).unwrap();
        assert_eq!(mechanism.title(), "Water");
        assert_eq!(mechanism.step_count(), 1);
        assert_eq!(mechanism.step_title(0), "Bent water");
        assert!(!mechanism.config().auto_rotate);
    }

    #[test]
    fn empty_mechanism_is_rejected() {
        let err = ManifestMechanism::from_json(r#"{ "title": "Nothing", "steps": [] }"#).err().unwrap();
        assert!(matches!(err, ManifestError::NoSteps(ref t) if t == "Nothing"));
    }

    #[test]
    fn unknown_site_is_rejected() {
        let json = r#"{
            "title": "Broken",
            "steps": [
                { "title": "a", "sites": { "C": [0, 0, 0] } },
                { "title": "b", "sites": { "C": [0, 0, 0] }, "bonds": [{ "from": "C", "to": "X" }] }
            ]
        }"#;
        match ManifestMechanism::from_json(json) {
            Err(ManifestError::UnknownSite { step, site }) => {
                assert_eq!(step, 1);
                assert_eq!(site, "X");
            }
            other => panic!("expected UnknownSite, got {:?}", other.err()),
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            ManifestMechanism::from_json("{ \"title\": 3 }"),
            Err(ManifestError::Json(_))
        ));
    }

    #[test]
    fn sites_follow_orientation() {
        let mechanism = ManifestMechanism::from_json(WATER).unwrap();
        let flat = mechanism.sites(0, Orientation::default());
        assert_eq!(flat.sites.sites.get("H1"), Some(Point3D::new(-30.0, 20.0, 0.0)));
        assert!(flat.sites.label_hidden("H1"));

        let turned = mechanism.sites(0, Orientation::yaw(std::f32::consts::PI));
        let h1 = turned.sites.sites.get("H1").unwrap();
        assert!((h1.x - 30.0).abs() < 1e-4);
    }

    #[test]
    fn draw_hides_labels_and_resolves_colors() {
        let mechanism = ManifestMechanism::from_json(WATER).unwrap();
        let sites = mechanism.sites(0, Orientation::default());
        let style = RenderStyle::default();
        let mut rec = CommandRecorder::new();
        {
            let mut painter = Painter::new(&mut rec, &style, Projector::new(Vec2::ZERO, style.depth_k));
            mechanism.draw(&sites, &mut painter);
        }

        // H1's label is hidden
        let texts: Vec<&str> = rec.texts().collect();
        assert_eq!(texts, vec!["O", "H", "H2O"]);

        let atom_colors: Vec<Rgb> = rec
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { gradient, .. } => Some(gradient.inner),
                _ => None,
            })
            .collect();
        assert_eq!(atom_colors, vec![Rgb::OXYGEN, Rgb::HYDROGEN, Rgb::CARBON]);

        // dashed bond restored; arrow head drawn last before the caption
        assert!(rec.line_dash().is_empty());
        assert!(rec.commands().iter().any(|c| matches!(c, DrawCommand::Polygon { .. })));
    }
}
