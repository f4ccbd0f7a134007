//! Lint checks for layout defects.
//!
//! Runs after a script has been applied to catch layouts that are
//! geometrically inconsistent: interpenetrating blocks, blocks below the
//! ground plane, unsupported blocks and exact duplicates. The resolver
//! can leave such states behind when it stops at its iteration cap.

use std::fmt;

use super::config::LayoutConfig;
use super::geometry::Bounds;
use super::store::LayoutStore;
use super::types::{Axis, Block};

/// A lint warning about a layout defect
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    BelowGround,
    Floating,
    Duplicate,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::BelowGround => write!(f, "below-ground"),
            LintCategory::Floating => write!(f, "floating"),
            LintCategory::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on a layout.
pub fn check(store: &LayoutStore, config: &LayoutConfig) -> Vec<LintWarning> {
    let blocks: Vec<&Block> = store.iter().collect();
    let mut warnings = Vec::new();
    check_pairs(&blocks, config, &mut warnings);
    check_ground(&blocks, config, &mut warnings);
    check_support(&blocks, config, &mut warnings);
    warnings
}

/// Overlaps and duplicates. A pair is reported once, as a duplicate if it
/// is one.
fn check_pairs(blocks: &[&Block], config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.position.approx_eq(&b.position, config.overlap_epsilon)
                && a.dimensions == b.dimensions
            {
                warnings.push(LintWarning {
                    category: LintCategory::Duplicate,
                    message: format!(
                        "'{}' and '{}' occupy the same cell at {}",
                        a.id, b.id, a.position
                    ),
                });
                continue;
            }

            let (ba, bb) = (Bounds::of(a), Bounds::of(b));
            let depth = [Axis::X, Axis::Y, Axis::Z]
                .iter()
                .map(|&axis| ba.penetration(&bb, axis))
                .fold(f64::INFINITY, f64::min);
            if depth > config.touch_tolerance {
                warnings.push(LintWarning {
                    category: LintCategory::Overlap,
                    message: format!("'{}' and '{}' overlap by {:.2}", a.id, b.id, depth),
                });
            }
        }
    }
}

fn check_ground(blocks: &[&Block], config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    for block in blocks {
        if block.position.y < -config.overlap_epsilon {
            warnings.push(LintWarning {
                category: LintCategory::BelowGround,
                message: format!("'{}' is below ground at y = {}", block.id, block.position.y),
            });
        }
    }
}

/// Blocks above ground need something under their footprint
fn check_support(blocks: &[&Block], config: &LayoutConfig, warnings: &mut Vec<LintWarning>) {
    for block in blocks {
        if block.position.y <= config.overlap_epsilon {
            continue;
        }
        let bounds = Bounds::of(block);
        let supported = blocks.iter().any(|other| {
            if other.id == block.id {
                return false;
            }
            let below = Bounds::of(other);
            bounds.penetration(&below, Axis::X) > config.overlap_epsilon
                && bounds.penetration(&below, Axis::Z) > config.overlap_epsilon
                && (bounds.min.y - below.max.y).abs() < config.touch_tolerance
        });
        if !supported {
            warnings.push(LintWarning {
                category: LintCategory::Floating,
                message: format!("'{}' at {} has nothing beneath it", block.id, block.position),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::Position;

    fn store_of(blocks: &[(&str, [f64; 3])]) -> LayoutStore {
        let mut store = LayoutStore::new();
        for (id, pos) in blocks {
            store.upsert(Block::unit(*id, Position::from(*pos))).unwrap();
        }
        store
    }

    fn categories(store: &LayoutStore) -> Vec<LintCategory> {
        check(store, &LayoutConfig::default())
            .into_iter()
            .map(|w| w.category)
            .collect()
    }

    #[test]
    fn test_clean_stack() {
        let store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [0.0, 1.0, 0.0]), ("c", [1.0, 0.0, 0.0])]);
        assert!(categories(&store).is_empty());
    }

    #[test]
    fn test_flush_contact_is_not_overlap() {
        let store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [1.05, 0.0, 0.0])]);
        assert!(categories(&store).is_empty());
    }

    #[test]
    fn test_penetration_is_overlap() {
        let store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [0.5, 0.0, 0.0])]);
        assert_eq!(categories(&store), vec![LintCategory::Overlap]);
    }

    #[test]
    fn test_duplicate_reported_once() {
        let store = store_of(&[("a", [0.0, 0.0, 0.0]), ("b", [0.0, 0.0, 0.0])]);
        assert_eq!(categories(&store), vec![LintCategory::Duplicate]);
    }

    #[test]
    fn test_below_ground_and_floating() {
        let store = store_of(&[("low", [0.0, -1.0, 0.0]), ("high", [5.0, 3.0, 0.0])]);
        assert_eq!(
            categories(&store),
            vec![LintCategory::BelowGround, LintCategory::Floating]
        );
    }

    #[test]
    fn test_warning_display() {
        let store = store_of(&[("high", [0.0, 2.0, 0.0])]);
        let warnings = check(&store, &LayoutConfig::default());
        assert_eq!(
            warnings[0].to_string(),
            "[floating] 'high' at (0, 2, 0) has nothing beneath it"
        );
    }
}
