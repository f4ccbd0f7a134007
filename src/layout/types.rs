//! Core types for the layout engine

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// One of the three grid axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in the order the resolver processes them (height, width, depth)
    pub const RESOLUTION_ORDER: [Axis; 3] = [Axis::Y, Axis::X, Axis::Z];

    /// The two axes perpendicular to this one
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Minimum corner of a block, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    /// Copy of this position shifted by `delta` along `axis`
    pub fn offset(&self, axis: Axis, delta: f64) -> Position {
        let mut moved = *self;
        moved.set(axis, self.get(axis) + delta);
        moved
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Position, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.z - other.z).abs() < tolerance
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Extent of a block along each axis, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimensions {
    /// Create dimensions, rejecting non-positive or non-finite extents
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, LayoutError> {
        let dims = Self {
            width,
            height,
            depth,
        };
        dims.validate()?;
        Ok(dims)
    }

    /// A 1x1x1 grid cell
    pub fn unit() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }

    /// Extent along `axis` (X = width, Y = height, Z = depth)
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    pub fn set_along(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.width = value,
            Axis::Y => self.height = value,
            Axis::Z => self.depth = value,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(LayoutError::InvalidDimensions {
                width: self.width,
                height: self.height,
                depth: self.depth,
            })
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::unit()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Stable identifier of a block or text label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Category of a sellable unit. Informational only; geometry ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Apartment,
    Store,
    Office,
    Parking,
}

impl BlockKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "apartment" => Some(Self::Apartment),
            "store" => Some(Self::Store),
            "office" => Some(Self::Office),
            "parking" => Some(Self::Parking),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::Store => "store",
            Self::Office => "office",
            Self::Parking => "parking",
        }
    }
}

/// Sale status of a unit. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl BlockStatus {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "available" => Some(Self::Available),
            "reserved" => Some(Self::Reserved),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }
}

/// A positioned, axis-aligned cuboid representing a sellable unit
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub position: Position,
    pub dimensions: Dimensions,
    pub kind: BlockKind,
    pub status: BlockStatus,
    /// Display name shown on the unit
    pub name: Option<String>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, position: Position, dimensions: Dimensions) -> Self {
        Self {
            id: id.into(),
            position,
            dimensions,
            kind: BlockKind::default(),
            status: BlockStatus::default(),
            name: None,
        }
    }

    /// Unit block at `position`
    pub fn unit(id: impl Into<BlockId>, position: Position) -> Self {
        Self::new(id, position, Dimensions::unit())
    }

    pub fn with_kind(mut self, kind: BlockKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_status(mut self, status: BlockStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Coordinate of the face on the positive side of `axis`
    pub fn max_along(&self, axis: Axis) -> f64 {
        self.position.get(axis) + self.dimensions.along(axis)
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A floating text label. Purely cosmetic, never collides with blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub id: BlockId,
    pub content: String,
    pub position: Position,
    pub color: String,
    pub size: f64,
}

impl TextLabel {
    pub fn new(id: impl Into<BlockId>, content: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            position,
            color: "#333333".to_string(),
            size: 1.0,
        }
    }
}

/// Normal of a clicked block face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceNormal {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FaceNormal {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Axis of the component with the largest magnitude and its sign.
    ///
    /// Ties resolve in X, Y, Z order. Returns `None` for a zero normal.
    pub fn dominant(&self) -> Option<(Axis, f64)> {
        let mut best: Option<(Axis, f64)> = None;
        for (axis, value) in [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)] {
            if !value.is_finite() || value == 0.0 {
                continue;
            }
            match best {
                Some((_, b)) if b.abs() >= value.abs() => {}
                _ => best = Some((axis, value)),
            }
        }
        best.map(|(axis, value)| (axis, value.signum()))
    }
}

impl From<[f64; 3]> for FaceNormal {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Ephemeral record of a block's dimension change
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionChange {
    pub block: BlockId,
    pub old: Dimensions,
    pub new: Dimensions,
    pub position: Position,
}

/// Positions computed by the resolver, keyed by block, in discovery order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Displacements {
    order: Vec<BlockId>,
    positions: HashMap<BlockId, Position>,
}

impl Displacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new position, keeping the original discovery slot on overwrite
    pub fn insert(&mut self, id: BlockId, position: Position) {
        if !self.positions.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.positions.insert(id, position);
    }

    pub fn get(&self, id: &BlockId) -> Option<&Position> {
        self.positions.get(id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockId, &Position)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.positions.get(id).map(|p| (id, p)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> + '_ {
        self.order.iter()
    }
}
