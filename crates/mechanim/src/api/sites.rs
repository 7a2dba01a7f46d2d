//! Named atom positions for one step of a mechanism.

use std::collections::{HashMap, HashSet};

use crate::core::math::{Orientation, Point3D};

/// Places base offsets around a step origin under the current orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteLayout {
    pub origin: Point3D,
    pub orientation: Orientation,
}

impl SiteLayout {
    pub fn new(origin: Point3D, orientation: Orientation) -> Self {
        Self { origin, orientation }
    }

    /// Rotate `offset` and translate it to the layout origin.
    pub fn place(&self, offset: Point3D) -> Point3D {
        self.orientation.place(offset, self.origin)
    }

    /// Shorthand for `place(Point3D::new(x, y, z))`.
    pub fn at(&self, x: f32, y: f32, z: f32) -> Point3D {
        self.place(Point3D::new(x, y, z))
    }
}

/// String-keyed site positions, rebuilt every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteMap {
    sites: HashMap<String, Point3D>,
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map by placing every `(name, offset)` pair with `layout`.
    pub fn from_offsets<'a, I>(layout: &SiteLayout, offsets: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Point3D)>,
    {
        let sites = offsets
            .into_iter()
            .map(|(name, offset)| (name.to_string(), layout.place(offset)))
            .collect();
        Self { sites }
    }

    /// Insert a site, replacing any previous position under that name.
    pub fn insert(&mut self, name: impl Into<String>, at: Point3D) {
        self.sites.insert(name.into(), at);
    }

    pub fn get(&self, name: &str) -> Option<Point3D> {
        self.sites.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sites.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point3D)> {
        self.sites.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A site map plus the per-step flags that travel with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSites {
    pub sites: SiteMap,
    /// Sites whose atom label is not drawn in this step.
    pub hidden_labels: HashSet<String>,
}

impl StepSites {
    pub fn new(sites: SiteMap) -> Self {
        Self { sites, hidden_labels: HashSet::new() }
    }

    pub fn hide_label(mut self, site: impl Into<String>) -> Self {
        self.hidden_labels.insert(site.into());
        self
    }

    pub fn label_hidden(&self, site: &str) -> bool {
        self.hidden_labels.contains(site)
    }
}
