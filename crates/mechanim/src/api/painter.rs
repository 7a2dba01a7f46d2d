//! Drawing context handed to [`Mechanism::draw`](super::mechanism::Mechanism::draw).

use glam::Vec2;

use crate::core::color::Rgb;
use crate::core::math::{Point3D, Projector};
use crate::renderer::primitives::{self, BondKind};
use crate::renderer::style::RenderStyle;
use crate::renderer::surface::{Surface, TextAlign, TextStyle};

/// A bond between two placed sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub from: Point3D,
    pub to: Point3D,
    pub kind: BondKind,
    /// Overrides the style's bond color.
    pub color: Option<Rgb>,
}

impl Bond {
    pub fn new(from: Point3D, to: Point3D, kind: BondKind) -> Self {
        Self { from, to, kind, color: None }
    }
}

/// An atom glyph at a placed site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom<'a> {
    pub at: Point3D,
    pub color: Rgb,
    /// Text drawn on the glyph. Empty draws no text.
    pub label: &'a str,
    /// Radius at unit scale. `None` uses the style's atom size.
    pub size: Option<f32>,
}

/// One molecule's bonds and atoms, drawn bonds-first so atoms cover the
/// bond ends.
#[derive(Debug, Clone, Default)]
pub struct Molecule<'a> {
    bonds: Vec<Bond>,
    atoms: Vec<Atom<'a>>,
}

impl<'a> Molecule<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond(mut self, from: Point3D, to: Point3D, kind: BondKind) -> Self {
        self.bonds.push(Bond::new(from, to, kind));
        self
    }

    pub fn colored_bond(mut self, from: Point3D, to: Point3D, kind: BondKind, color: Rgb) -> Self {
        self.bonds.push(Bond { from, to, kind, color: Some(color) });
        self
    }

    pub fn atom(mut self, at: Point3D, color: Rgb, label: &'a str) -> Self {
        self.atoms.push(Atom { at, color, label, size: None });
        self
    }

    pub fn sized_atom(mut self, at: Point3D, color: Rgb, label: &'a str, size: f32) -> Self {
        self.atoms.push(Atom { at, color, label, size: Some(size) });
        self
    }

    pub fn push_bond(&mut self, bond: Bond) {
        self.bonds.push(bond);
    }

    pub fn push_atom(&mut self, atom: Atom<'a>) {
        self.atoms.push(atom);
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

/// Surface, style and projector for one frame.
pub struct Painter<'a> {
    surface: &'a mut dyn Surface,
    style: &'a RenderStyle,
    projector: Projector,
}

impl<'a> Painter<'a> {
    pub fn new(surface: &'a mut dyn Surface, style: &'a RenderStyle, projector: Projector) -> Self {
        Self { surface, style, projector }
    }

    pub fn style(&self) -> &RenderStyle {
        self.style
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Screen position of a placed site.
    pub fn project(&self, p: Point3D) -> Vec2 {
        self.projector.project(p).pos
    }

    pub fn bond(&mut self, from: Point3D, to: Point3D, kind: BondKind) {
        primitives::draw_bond(&mut *self.surface, &self.projector, self.style, from, to, kind, None);
    }

    pub fn bond_colored(&mut self, from: Point3D, to: Point3D, kind: BondKind, color: Rgb) {
        primitives::draw_bond(&mut *self.surface, &self.projector, self.style, from, to, kind, Some(color));
    }

    pub fn atom(&mut self, at: Point3D, color: Rgb, label: &str) {
        self.atom_sized(at, color, label, self.style.atom_size);
    }

    pub fn atom_sized(&mut self, at: Point3D, color: Rgb, label: &str, size: f32) {
        primitives::draw_atom(&mut *self.surface, &self.projector, self.style, at, color, label, size);
    }

    /// Straight arrow between two placed sites, in the style's arrow color
    /// unless `color` is given.
    pub fn arrow(&mut self, from: Point3D, to: Point3D, color: Option<Rgb>) {
        let (a, b) = (self.project(from), self.project(to));
        let color = color.unwrap_or(self.style.arrow_color);
        primitives::draw_arrow(&mut *self.surface, self.style, a, b, color);
    }

    /// Curved arrow between two placed sites. See
    /// [`draw_curved_arrow`](primitives::draw_curved_arrow) for `bend`.
    pub fn curved_arrow(&mut self, from: Point3D, to: Point3D, bend: f32, color: Option<Rgb>) {
        let (a, b) = (self.project(from), self.project(to));
        let color = color.unwrap_or(self.style.arrow_color);
        primitives::draw_curved_arrow(&mut *self.surface, self.style, a, b, bend, color);
    }

    /// Left-aligned text at a fixed logical screen position (not rotated).
    pub fn caption(&mut self, text: &str, at: Vec2) {
        if text.is_empty() {
            return;
        }
        let style = TextStyle {
            color: self.style.caption_color,
            size_px: self.style.caption_font_px,
            bold: false,
            align: TextAlign::Left,
        };
        self.surface.fill_text(text, at, &style);
    }

    /// Draw all bonds of `molecule`, then all of its atoms.
    pub fn molecule(&mut self, molecule: Molecule<'_>) {
        for bond in &molecule.bonds {
            primitives::draw_bond(
                &mut *self.surface,
                &self.projector,
                self.style,
                bond.from,
                bond.to,
                bond.kind,
                bond.color,
            );
        }
        for atom in &molecule.atoms {
            let size = atom.size.unwrap_or(self.style.atom_size);
            self.atom_sized(atom.at, atom.color, atom.label, size);
        }
    }
}
