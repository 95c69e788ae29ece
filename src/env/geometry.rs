use serde::{Deserialize, Serialize};

/// Region of the wall a module renders into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Source of the current wall geometry, read at instantiation time.
pub trait GeometryProvider {
    fn current_geometry(&self) -> Geometry;
}

/// Geometry that never changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedGeometry(pub Geometry);

impl GeometryProvider for FixedGeometry {
    fn current_geometry(&self) -> Geometry {
        self.0
    }
}
