//! Sodium borohydride reduction of acetaldehyde to ethanol.
//!
//! Offsets are in diagram units around the origin. The carbonyl lies in the
//! xy plane with the oxygen to the left; hydride arrives from the right and
//! slightly in front (negative z), so the attack angle shows as the
//! diagram turns.

use glam::Vec2;
use mechanim::{
    BondKind, Mechanism, Molecule, Orientation, Painter, Point3D, Rgb, SiteLayout, ViewConfig,
};

const STEP_TITLES: [&str; 5] = [
    "Hydride approaches the carbonyl carbon",
    "Transition state",
    "Tetrahedral alkoxide",
    "Protonation by water",
    "Ethanol",
];

const CAPTIONS: [&str; 5] = [
    "BH4- delivers H- to the electrophilic carbon",
    "C-H forming, B-H breaking, C=O pi bond weakening",
    "Carbon is now sp3; oxygen carries the negative charge",
    "The alkoxide takes a proton from water",
    "Net result: aldehyde reduced to a primary alcohol",
];

const HYDROGEN_SIZE: f32 = 11.0;
const BORON_SIZE: f32 = 20.0;

/// Carbonyl carbon and its substituents. `hydride` is the hydrogen that
/// ends up on carbon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carbonyl {
    pub c: Point3D,
    pub o: Point3D,
    pub h: Point3D,
    pub methyl: Point3D,
    pub hydride: Point3D,
}

/// Boron with its three spectator hydrogens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Borane {
    pub b: Point3D,
    pub h: [Point3D; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Water {
    pub o: Point3D,
    /// Hydrogen transferred to the alkoxide.
    pub h_donor: Point3D,
    pub h: Point3D,
}

/// Placed sites, one variant per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReductionSites {
    Approach { carbonyl: Carbonyl, borane: Borane },
    TransitionState { carbonyl: Carbonyl, borane: Borane },
    Alkoxide { carbonyl: Carbonyl, borane: Borane },
    Protonation { carbonyl: Carbonyl, water: Water },
    Alcohol { carbonyl: Carbonyl, water: Water },
}

pub struct CarbonylReduction {
    show_byproducts: bool,
}

impl CarbonylReduction {
    pub fn new() -> Self {
        Self { show_byproducts: true }
    }

    /// Whether departing BH3 and hydroxide stay on screen after they
    /// leave the substrate.
    pub fn with_byproducts(mut self, show: bool) -> Self {
        self.show_byproducts = show;
        self
    }
}

impl Default for CarbonylReduction {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigonal carbonyl with the hydride `gap` units out along the attack line.
fn carbonyl(layout: &SiteLayout, tetrahedral: bool, hydride_gap: f32) -> Carbonyl {
    // substituents fold back once the carbon is sp3
    let fold = if tetrahedral { 14.0 } else { 0.0 };
    Carbonyl {
        c: layout.at(-30.0, 0.0, 0.0),
        o: layout.at(-85.0, 0.0, 0.0),
        h: layout.at(-5.0, 42.0, fold),
        methyl: layout.at(-5.0, -42.0, fold),
        hydride: layout.at(5.0 + hydride_gap, 0.0, -32.0 - hydride_gap * 0.3),
    }
}

fn borane(layout: &SiteLayout, dx: f32) -> Borane {
    let b = Point3D::new(75.0 + dx, 0.0, -45.0);
    Borane {
        b: layout.place(b),
        h: [
            layout.place(b + Point3D::new(22.0, -30.0, -8.0)),
            layout.place(b + Point3D::new(22.0, 30.0, -8.0)),
            layout.place(b + Point3D::new(26.0, 0.0, 30.0)),
        ],
    }
}

fn water(layout: &SiteLayout, donated: bool) -> Water {
    let o = Point3D::new(-160.0, 22.0, 0.0);
    let h_donor = if donated {
        Point3D::new(-100.0, -38.0, 6.0)
    } else {
        Point3D::new(-128.0, 12.0, 0.0)
    };
    Water {
        o: layout.place(o),
        h_donor: layout.place(h_donor),
        h: layout.place(o + Point3D::new(-18.0, 26.0, 10.0)),
    }
}

/// The substrate: carbonyl bonds and atoms, plus the C-H(hydride) bond
/// when `hydride` is given. Callers add whatever else is bonded to it so
/// every bond is stroked before any atom glyph.
fn carbonyl_molecule<'a>(carbonyl: &Carbonyl, co: BondKind, hydride: Option<BondKind>, o_label: &'a str) -> Molecule<'a> {
    let mut molecule = Molecule::new()
        .bond(carbonyl.c, carbonyl.o, co)
        .bond(carbonyl.c, carbonyl.h, BondKind::Single)
        .bond(carbonyl.c, carbonyl.methyl, BondKind::Single)
        .atom(carbonyl.c, Rgb::CARBON, "C")
        .atom(carbonyl.o, Rgb::OXYGEN, o_label)
        .sized_atom(carbonyl.h, Rgb::HYDROGEN, "H", HYDROGEN_SIZE)
        .atom(carbonyl.methyl, Rgb::CARBON, "CH3");
    if let Some(kind) = hydride {
        molecule = molecule.bond(carbonyl.c, carbonyl.hydride, kind);
    }
    molecule
}

impl CarbonylReduction {
    fn draw_borane(&self, painter: &mut Painter, borane: &Borane, hydride: Option<(Point3D, BondKind)>, label: &str) {
        let mut molecule = Molecule::new();
        for h in &borane.h {
            molecule = molecule
                .bond(borane.b, *h, BondKind::Single)
                .sized_atom(*h, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
        }
        if let Some((h, kind)) = hydride {
            molecule = molecule.bond(borane.b, h, kind);
        }
        painter.molecule(molecule.sized_atom(borane.b, Rgb::BORON, label, BORON_SIZE));
    }

    fn draw_water(&self, painter: &mut Painter, water: &Water, donor: BondKind, o_label: &str) {
        let molecule = Molecule::new()
            .bond(water.o, water.h_donor, donor)
            .bond(water.o, water.h, BondKind::Single)
            .atom(water.o, Rgb::OXYGEN, o_label)
            .sized_atom(water.h, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
        painter.molecule(molecule);
    }

    fn draw_hydride(&self, painter: &mut Painter, at: Point3D, label: &str) {
        painter.atom_sized(at, Rgb::HYDROGEN, label, HYDROGEN_SIZE);
    }
}

impl Mechanism for CarbonylReduction {
    type Sites = ReductionSites;

    fn config(&self) -> ViewConfig {
        ViewConfig {
            rotation_step: 0.006,
            pitch: 0.12,
            ..ViewConfig::default()
        }
    }

    fn step_count(&self) -> usize {
        STEP_TITLES.len()
    }

    fn step_title(&self, step: usize) -> &str {
        STEP_TITLES.get(step).copied().unwrap_or("")
    }

    fn sites(&self, step: usize, orientation: Orientation) -> ReductionSites {
        let layout = SiteLayout::new(Point3D::ZERO, orientation);
        match step {
            0 => ReductionSites::Approach {
                carbonyl: carbonyl(&layout, false, 45.0),
                borane: borane(&layout, 15.0),
            },
            1 => ReductionSites::TransitionState {
                carbonyl: carbonyl(&layout, false, 18.0),
                borane: borane(&layout, 0.0),
            },
            2 => ReductionSites::Alkoxide {
                carbonyl: carbonyl(&layout, true, 0.0),
                borane: borane(&layout, 60.0),
            },
            3 => ReductionSites::Protonation {
                carbonyl: carbonyl(&layout, true, 0.0),
                water: water(&layout, false),
            },
            _ => ReductionSites::Alcohol {
                carbonyl: carbonyl(&layout, true, 0.0),
                water: water(&layout, true),
            },
        }
    }

    fn draw(&self, sites: &ReductionSites, painter: &mut Painter) {
        let step = match *sites {
            ReductionSites::Approach { carbonyl, borane } => {
                painter.molecule(carbonyl_molecule(&carbonyl, BondKind::Double, None, "O"));
                self.draw_borane(painter, &borane, Some((carbonyl.hydride, BondKind::Single)), "B");
                self.draw_hydride(painter, carbonyl.hydride, "H");
                painter.curved_arrow(carbonyl.hydride, carbonyl.c, 0.35, None);
                painter.curved_arrow((carbonyl.c + carbonyl.o) * 0.5, carbonyl.o, -0.4, None);
                0
            }
            ReductionSites::TransitionState { carbonyl, borane } => {
                painter.molecule(carbonyl_molecule(&carbonyl, BondKind::Double, Some(BondKind::Dashed), "O"));
                self.draw_borane(painter, &borane, Some((carbonyl.hydride, BondKind::Dashed)), "B");
                // partial hydride carries no label
                self.draw_hydride(painter, carbonyl.hydride, "");
                1
            }
            ReductionSites::Alkoxide { carbonyl, borane } => {
                let substrate = carbonyl_molecule(&carbonyl, BondKind::Single, Some(BondKind::Single), "O-")
                    .sized_atom(carbonyl.hydride, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
                painter.molecule(substrate);
                if self.show_byproducts {
                    self.draw_borane(painter, &borane, None, "BH3");
                }
                2
            }
            ReductionSites::Protonation { carbonyl, water } => {
                let substrate = carbonyl_molecule(&carbonyl, BondKind::Single, Some(BondKind::Single), "O-")
                    .sized_atom(carbonyl.hydride, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
                painter.molecule(substrate);
                self.draw_water(painter, &water, BondKind::Single, "O");
                painter.atom_sized(water.h_donor, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
                painter.curved_arrow(carbonyl.o, water.h_donor, 0.3, None);
                painter.curved_arrow((water.o + water.h_donor) * 0.5, water.o, 0.4, None);
                3
            }
            ReductionSites::Alcohol { carbonyl, water } => {
                let alcohol = carbonyl_molecule(&carbonyl, BondKind::Single, Some(BondKind::Single), "O")
                    .bond(carbonyl.o, water.h_donor, BondKind::Single)
                    .sized_atom(carbonyl.hydride, Rgb::HYDROGEN, "H", HYDROGEN_SIZE)
                    .sized_atom(water.h_donor, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
                painter.molecule(alcohol);
                if self.show_byproducts {
                    let hydroxide = Molecule::new()
                        .bond(water.o, water.h, BondKind::Single)
                        .atom(water.o, Rgb::OXYGEN, "O-")
                        .sized_atom(water.h, Rgb::HYDROGEN, "H", HYDROGEN_SIZE);
                    painter.molecule(hydroxide);
                }
                4
            }
        };
        painter.caption(CAPTIONS[step], Vec2::new(16.0, 16.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mechanim::{CommandRecorder, DrawCommand, MechanismView};

    fn render(mechanism: CarbonylReduction, step: usize) -> CommandRecorder {
        let mut view = MechanismView::new(mechanism);
        view.resize(800.0, 600.0, 1.0);
        view.set_step(step);
        let mut rec = CommandRecorder::new();
        view.render_frame(&mut rec);
        rec
    }

    #[test]
    fn five_steps_with_titles() {
        let m = CarbonylReduction::new();
        assert_eq!(m.step_count(), 5);
        assert_eq!(m.step_title(0), "Hydride approaches the carbonyl carbon");
        assert_eq!(m.step_title(4), "Ethanol");
        assert_eq!(m.step_title(9), "");
    }

    #[test]
    fn each_step_has_its_own_variant() {
        let m = CarbonylReduction::new();
        let o = Orientation::default();
        assert!(matches!(m.sites(0, o), ReductionSites::Approach { .. }));
        assert!(matches!(m.sites(1, o), ReductionSites::TransitionState { .. }));
        assert!(matches!(m.sites(2, o), ReductionSites::Alkoxide { .. }));
        assert!(matches!(m.sites(3, o), ReductionSites::Protonation { .. }));
        assert!(matches!(m.sites(4, o), ReductionSites::Alcohol { .. }));
    }

    #[test]
    fn hydride_closes_in_on_carbon() {
        let m = CarbonylReduction::new();
        let gap = |step| match m.sites(step, Orientation::default()) {
            ReductionSites::Approach { carbonyl, .. }
            | ReductionSites::TransitionState { carbonyl, .. }
            | ReductionSites::Alkoxide { carbonyl, .. } => carbonyl.c.distance(carbonyl.hydride),
            _ => unreachable!(),
        };
        assert!(gap(0) > gap(1));
        assert!(gap(1) > gap(2));
    }

    #[test]
    fn carbonyl_is_double_then_single() {
        let m = CarbonylReduction::new();
        let count_co_lines = |step| {
            let rec = render(CarbonylReduction::new(), step);
            let (c, o) = match m.sites(step, Orientation::default()) {
                ReductionSites::Approach { carbonyl, .. } | ReductionSites::Alkoxide { carbonyl, .. } => {
                    (carbonyl.c, carbonyl.o)
                }
                _ => unreachable!(),
            };
            // C and O share y = 0, so every C-O stroke is nearly horizontal
            // and spans their x distance
            let span = (c.x - o.x).abs();
            rec.lines()
                .filter(|(a, b, _)| ((a.x - b.x).abs() - span).abs() < 1.0 && (a.y - b.y).abs() < 1.0)
                .count()
        };
        assert_eq!(count_co_lines(0), 2);
        assert_eq!(count_co_lines(2), 1);
    }

    #[test]
    fn transition_state_hides_hydride_label_and_dashes() {
        let rec = render(CarbonylReduction::new(), 1);
        let h_labels = rec.texts().filter(|t| *t == "H").count();
        // aldehyde H plus three on boron; the partial hydride is unlabeled
        assert_eq!(h_labels, 4);
        assert_eq!(rec.lines().filter(|(_, _, dash)| !dash.is_empty()).count(), 2);
        assert!(rec.line_dash().is_empty());
    }

    #[test]
    fn bonds_never_cover_atom_glyphs() {
        // steps without electron arrows, whose tails legitimately start on atoms
        for step in [2, 4] {
            let rec = render(CarbonylReduction::new(), step);
            let commands = rec.commands();
            for (i, cmd) in commands.iter().enumerate() {
                let DrawCommand::Circle { center, .. } = cmd else { continue };
                let late = commands[i + 1..].iter().any(|later| match later {
                    DrawCommand::Line { from, to, .. } => {
                        from.distance(*center) < 0.5 || to.distance(*center) < 0.5
                    }
                    _ => false,
                });
                assert!(!late, "step {}: bond stroked over the atom at {:?}", step, center);
            }
        }
    }

    #[test]
    fn alcohol_oxygen_carries_the_donated_proton() {
        let rec = render(CarbonylReduction::new(), 4);
        assert!(rec.texts().any(|t| t == "O"));
        assert!(rec.texts().any(|t| t == "O-"));
        // C-O, C-H, C-CH3, C-H(hydride), O-H, then the hydroxide's O-H
        assert_eq!(rec.lines().count(), 6);
    }

    #[test]
    fn byproducts_are_optional() {
        let shown = render(CarbonylReduction::new(), 2);
        let hidden = render(CarbonylReduction::new().with_byproducts(false), 2);
        assert_eq!(shown.circles().count(), hidden.circles().count() + 4);
        assert!(shown.texts().any(|t| t == "BH3"));
        assert!(!hidden.texts().any(|t| t == "BH3"));
    }

    #[test]
    fn approach_step_draws_electron_arrows() {
        let rec = render(CarbonylReduction::new(), 0);
        let heads = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count();
        assert_eq!(heads, 2);
        assert!(rec.texts().any(|t| t == CAPTIONS[0]));
    }

    #[test]
    fn every_step_renders_finite_geometry_while_turning() {
        let mut view = MechanismView::new(CarbonylReduction::new());
        view.resize(640.0, 480.0, 2.0);
        let mut rec = CommandRecorder::new();
        for step in 0..5 {
            view.set_step(step);
            for _ in 0..50 {
                rec.clear();
                view.render_frame(&mut rec);
                assert!(rec.lines().all(|(a, b, _)| a.is_finite() && b.is_finite()));
                assert!(rec.circles().all(|(c, r)| c.is_finite() && r > 0.0));
            }
        }
    }
}
