//! Geometric predicates over axis-aligned blocks
//!
//! Everything here is pure. Tolerances are passed in explicitly so the
//! same predicates serve the resolver (configurable) and callers that
//! just want the defaults from [`super::config`].

use super::types::{Axis, Block, Dimensions, Position};

/// Axis-aligned bounds of a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    pub fn new(position: Position, dimensions: Dimensions) -> Self {
        Self {
            min: position,
            max: Position::new(
                position.x + dimensions.width,
                position.y + dimensions.height,
                position.z + dimensions.depth,
            ),
        }
    }

    pub fn of(block: &Block) -> Self {
        Self::new(block.position, block.dimensions)
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Position::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Position::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Inflated interval test on a single axis
    pub fn overlaps_on(&self, other: &Bounds, axis: Axis, epsilon: f64) -> bool {
        self.min.get(axis) < other.max.get(axis) + epsilon
            && self.max.get(axis) + epsilon > other.min.get(axis)
    }

    /// Length of the shared interval on `axis`; negative when separated
    pub fn penetration(&self, other: &Bounds, axis: Axis) -> f64 {
        self.max.get(axis).min(other.max.get(axis)) - self.min.get(axis).max(other.min.get(axis))
    }
}

/// Bounds enclosing every block, or `None` for an empty slice
pub fn bounds_of_all<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Option<Bounds> {
    blocks
        .into_iter()
        .map(Bounds::of)
        .reduce(|acc, b| acc.union(&b))
}

/// True iff the blocks' inflated bounds overlap on all three axes.
///
/// Flush contact (zero gap) counts as overlap. A block never overlaps itself.
pub fn overlaps(a: &Block, b: &Block, epsilon: f64) -> bool {
    if a.id == b.id {
        return false;
    }
    overlaps_on(a, b, &[Axis::X, Axis::Y, Axis::Z], epsilon)
}

/// Inflated overlap restricted to `axes`
pub fn overlaps_on(a: &Block, b: &Block, axes: &[Axis], epsilon: f64) -> bool {
    let (ba, bb) = (Bounds::of(a), Bounds::of(b));
    axes.iter().all(|&axis| ba.overlaps_on(&bb, axis, epsilon))
}

/// True iff `upper`'s bottom face rests on `lower`'s top face
pub fn is_directly_above(upper: &Block, lower: &Block, epsilon: f64) -> bool {
    if upper.id == lower.id {
        return false;
    }
    overlaps_on(upper, lower, &[Axis::X, Axis::Z], epsilon)
        && (upper.position.y - lower.max_along(Axis::Y)).abs() < epsilon
}

/// True iff `right` sits flush against the +X face of `left`
pub fn is_touching_right(right: &Block, left: &Block, epsilon: f64, touch: f64) -> bool {
    right.id != left.id
        && is_flush_against(
            right.position,
            right.dimensions,
            left.position,
            left.dimensions,
            Axis::X,
            epsilon,
            touch,
        )
}

/// True iff `front` sits flush against the +Z face of `back`
pub fn is_touching_front(front: &Block, back: &Block, epsilon: f64, touch: f64) -> bool {
    front.id != back.id
        && is_flush_against(
            front.position,
            front.dimensions,
            back.position,
            back.dimensions,
            Axis::Z,
            epsilon,
            touch,
        )
}

/// Was a box at `target` resting against the positive `axis` face of the
/// box at `source`?
///
/// The boxes must overlap (inflated) on the two other axes and the target's
/// minimum on `axis` must lie within `touch` of the source's maximum. On X
/// and Z the target must also start strictly beyond the source's own
/// minimum; on Y resting on top is enough.
pub fn is_flush_against(
    target: Position,
    target_dims: Dimensions,
    source: Position,
    source_dims: Dimensions,
    axis: Axis,
    epsilon: f64,
    touch: f64,
) -> bool {
    let (t, s) = (Bounds::new(target, target_dims), Bounds::new(source, source_dims));
    let [a, b] = axis.others();
    if !(t.overlaps_on(&s, a, epsilon) && t.overlaps_on(&s, b, epsilon)) {
        return false;
    }
    let flush = (t.min.get(axis) - s.max.get(axis)).abs() < touch;
    match axis {
        Axis::Y => flush,
        Axis::X | Axis::Z => flush && t.min.get(axis) > s.min.get(axis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{OVERLAP_EPSILON, TOUCH_TOLERANCE};

    fn unit(id: &str, x: f64, y: f64, z: f64) -> Block {
        Block::unit(id, Position::new(x, y, z))
    }

    #[test]
    fn test_overlap_penetrating() {
        let a = unit("a", 0.0, 0.0, 0.0);
        let b = unit("b", 0.5, 0.5, 0.5);
        assert!(overlaps(&a, &b, OVERLAP_EPSILON));
    }

    #[test]
    fn test_overlap_flush_counts() {
        let a = unit("a", 0.0, 0.0, 0.0);
        let b = unit("b", 1.0, 0.0, 0.0);
        assert!(overlaps(&a, &b, OVERLAP_EPSILON));
    }

    #[test]
    fn test_overlap_separated() {
        let a = unit("a", 0.0, 0.0, 0.0);
        let b = unit("b", 1.01, 0.0, 0.0);
        assert!(!overlaps(&a, &b, OVERLAP_EPSILON));
    }

    #[test]
    fn test_overlap_symmetric() {
        let blocks = [
            unit("a", 0.0, 0.0, 0.0),
            unit("b", 1.0, 0.0, 0.0),
            unit("c", 0.3, 1.0, 0.9),
            unit("d", 5.0, 5.0, 5.0),
            Block::new("e", Position::new(-1.0, 0.0, 0.0), Dimensions::new(3.0, 0.5, 2.0).unwrap()),
        ];
        for a in &blocks {
            for b in &blocks {
                assert_eq!(
                    overlaps(a, b, OVERLAP_EPSILON),
                    overlaps(b, a, OVERLAP_EPSILON),
                    "asymmetric overlap for {} / {}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_block_never_overlaps_itself() {
        let a = unit("a", 2.0, 0.0, 1.0);
        assert!(!overlaps(&a, &a, OVERLAP_EPSILON));
    }

    #[test]
    fn test_directly_above_flush_stack() {
        let lower = unit("lower", 0.0, 0.0, 0.0);
        let upper = unit("upper", 0.0, 1.0, 0.0);
        assert!(is_directly_above(&upper, &lower, OVERLAP_EPSILON));
        assert!(!is_directly_above(&lower, &upper, OVERLAP_EPSILON));
    }

    #[test]
    fn test_directly_above_gap_rejected() {
        let lower = unit("lower", 0.0, 0.0, 0.0);
        let upper = unit("upper", 0.0, 1.2, 0.0);
        assert!(!is_directly_above(&upper, &lower, OVERLAP_EPSILON));
    }

    #[test]
    fn test_directly_above_needs_footprint_overlap() {
        let lower = unit("lower", 0.0, 0.0, 0.0);
        let upper = unit("upper", 3.0, 1.0, 0.0);
        assert!(!is_directly_above(&upper, &lower, OVERLAP_EPSILON));
    }

    #[test]
    fn test_touching_right_tolerance_boundary() {
        let left = unit("left", 0.0, 0.0, 0.0);
        assert!(is_touching_right(&unit("r", 1.0, 0.0, 0.0), &left, OVERLAP_EPSILON, TOUCH_TOLERANCE));
        assert!(is_touching_right(&unit("r", 1.05, 0.0, 0.0), &left, OVERLAP_EPSILON, TOUCH_TOLERANCE));
        assert!(is_touching_right(&unit("r", 0.95, 0.0, 0.0), &left, OVERLAP_EPSILON, TOUCH_TOLERANCE));
        assert!(!is_touching_right(&unit("r", 1.2, 0.0, 0.0), &left, OVERLAP_EPSILON, TOUCH_TOLERANCE));
    }

    #[test]
    fn test_touching_right_is_directional() {
        let a = unit("a", 0.0, 0.0, 0.0);
        let b = unit("b", 1.0, 0.0, 0.0);
        assert!(is_touching_right(&b, &a, OVERLAP_EPSILON, TOUCH_TOLERANCE));
        assert!(!is_touching_right(&a, &b, OVERLAP_EPSILON, TOUCH_TOLERANCE));
    }

    #[test]
    fn test_touching_front() {
        let back = unit("back", 0.0, 0.0, 0.0);
        let front = unit("front", 0.0, 0.0, 1.0);
        let offset = unit("offset", 0.0, 2.0, 1.0);
        assert!(is_touching_front(&front, &back, OVERLAP_EPSILON, TOUCH_TOLERANCE));
        assert!(!is_touching_front(&offset, &back, OVERLAP_EPSILON, TOUCH_TOLERANCE));
    }

    #[test]
    fn test_bounds_center_and_union() {
        let a = Bounds::of(&unit("a", 0.0, 0.0, 0.0));
        let b = Bounds::of(&unit("b", 2.0, 0.0, 0.0));
        assert_eq!(a.center(), Position::new(0.5, 0.5, 0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Position::new(0.0, 0.0, 0.0));
        assert_eq!(u.max, Position::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_bounds_of_all() {
        assert_eq!(bounds_of_all(&[] as &[Block]), None);
        let blocks = [unit("a", 0.0, 0.0, 0.0), unit("b", 0.0, 4.0, -1.0)];
        let all = bounds_of_all(&blocks).unwrap();
        assert_eq!(all.min, Position::new(0.0, 0.0, -1.0));
        assert_eq!(all.max, Position::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn test_penetration() {
        let a = Bounds::of(&unit("a", 0.0, 0.0, 0.0));
        let b = Bounds::of(&unit("b", 0.75, 0.0, 0.0));
        assert!((a.penetration(&b, Axis::X) - 0.25).abs() < 1e-9);
        let c = Bounds::of(&unit("c", 3.0, 0.0, 0.0));
        assert!(a.penetration(&c, Axis::X) < 0.0);
    }
}
