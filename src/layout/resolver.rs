//! Displacement propagation after a block is resized
//!
//! When a block grows or shrinks in place, every block that was resting
//! against one of its positive faces (top, right, front) moves by the same
//! amount along that axis, and the push travels on to whatever was resting
//! against *those* blocks. Contacts are always judged on the positions the
//! blocks had before the resize; new positions accumulate in a separate
//! working map and are committed in one batch.
//!
//! Propagation runs in passes. Each pass takes the blocks moved by the
//! previous pass and pushes their own dependents. Resolution stops when a
//! pass moves nothing or after `max_iterations` passes, whichever comes
//! first. Hitting the cap is not an error: the partial result is returned
//! and flagged as not converged.

use std::collections::{HashMap, HashSet};

use super::config::{LayoutConfig, ShrinkPolicy};
use super::error::LayoutError;
use super::geometry::is_flush_against;
use super::store::LayoutStore;
use super::types::{Axis, BlockId, DimensionChange, Dimensions, Displacements, Position};

/// Outcome of resolving one dimension change
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// New positions of every displaced block, in discovery order
    pub displacements: Displacements,
    /// Propagation passes run after the first-order push
    pub passes: usize,
    /// False when the iteration cap stopped resolution while blocks that
    /// still had dependents were moving
    pub converged: bool,
}

impl Resolution {
    fn empty() -> Self {
        Self {
            displacements: Displacements::new(),
            passes: 0,
            converged: true,
        }
    }
}

/// A block that moved and now pushes its own dependents
#[derive(Debug, Clone)]
struct Push {
    source: BlockId,
    axis: Axis,
    delta: f64,
}

/// Pre-resize placement of a block
#[derive(Debug, Clone, Copy)]
struct Footprint {
    position: Position,
    dimensions: Dimensions,
}

/// Working state for one resolution
struct Propagation<'a> {
    config: &'a LayoutConfig,
    /// Store order, so discovery is deterministic
    order: Vec<BlockId>,
    original: HashMap<BlockId, Footprint>,
    pending: HashMap<BlockId, Position>,
    moved: HashSet<(BlockId, Axis)>,
    anchor: BlockId,
    displacements: Displacements,
}

impl<'a> Propagation<'a> {
    fn new(config: &'a LayoutConfig, store: &LayoutStore, anchor: &BlockId) -> Self {
        let order: Vec<BlockId> = store.iter().map(|b| b.id.clone()).collect();
        let original = store
            .iter()
            .map(|b| {
                (
                    b.id.clone(),
                    Footprint {
                        position: b.position,
                        dimensions: b.dimensions,
                    },
                )
            })
            .collect();
        let pending = store.iter().map(|b| (b.id.clone(), b.position)).collect();

        Self {
            config,
            order,
            original,
            pending,
            moved: HashSet::new(),
            anchor: anchor.clone(),
            displacements: Displacements::new(),
        }
    }

    /// Push every not-yet-moved block resting against `source`'s positive
    /// `axis` face. Returns the new pushes and whether any block moved by
    /// more than the progress tolerance.
    fn push_from(
        &mut self,
        source: &BlockId,
        footprint: Footprint,
        axis: Axis,
        delta: f64,
    ) -> (Vec<Push>, bool) {
        let mut pushes = Vec::new();
        let mut progress = false;

        let targets: Vec<BlockId> = self
            .order
            .iter()
            .filter(|target| self.rests_on(target, source, footprint, axis))
            .cloned()
            .collect();

        for target in &targets {
            let Some(before) = self.original.get(target) else {
                continue;
            };
            let current = self.pending.get(target).copied().unwrap_or(before.position);
            let next = current.offset(axis, delta);
            if (next.get(axis) - current.get(axis)).abs() > self.config.progress_epsilon {
                progress = true;
            }

            self.pending.insert(target.clone(), next);
            self.displacements.insert(target.clone(), next);
            self.moved.insert((target.clone(), axis));
            pushes.push(Push {
                source: target.clone(),
                axis,
                delta,
            });
        }

        (pushes, progress)
    }

    /// Was `target` resting against `source`'s positive `axis` face, and
    /// is it still free to move on that axis?
    fn rests_on(&self, target: &BlockId, source: &BlockId, footprint: Footprint, axis: Axis) -> bool {
        if target == source || *target == self.anchor {
            return false;
        }
        if self.moved.contains(&(target.clone(), axis)) {
            return false;
        }
        let Some(before) = self.original.get(target) else {
            return false;
        };
        is_flush_against(
            before.position,
            before.dimensions,
            footprint.position,
            footprint.dimensions,
            axis,
            self.config.overlap_epsilon,
            self.config.touch_tolerance,
        )
    }

    /// Would `push` still move anything if another pass ran?
    fn has_dependents(&self, push: &Push) -> bool {
        if push.delta.abs() <= self.config.progress_epsilon {
            return false;
        }
        let Some(&footprint) = self.original.get(&push.source) else {
            return false;
        };
        self.order
            .iter()
            .any(|target| self.rests_on(target, &push.source, footprint, push.axis))
    }
}

/// Computes and commits displacement chains
#[derive(Debug, Clone)]
pub struct Resolver {
    config: LayoutConfig,
}

impl Resolver {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Signed displacement for a change from `old` to `new` along one axis
    fn delta(&self, old: f64, new: f64) -> f64 {
        let delta = new - old;
        match self.config.shrink_policy {
            ShrinkPolicy::Follow => delta,
            ShrinkPolicy::PushAway => delta.abs(),
        }
    }

    /// Compute the displacements caused by `change` without touching the store.
    ///
    /// Assumes `change.new` is valid; [`resolve_displacement`](Self::resolve_displacement)
    /// checks that before calling in.
    pub fn resolve(&self, store: &LayoutStore, change: &DimensionChange) -> Resolution {
        let mut state = Propagation::new(&self.config, store, &change.block);
        let source = Footprint {
            position: change.position,
            dimensions: change.old,
        };

        // First-order effects of the resize itself, height first, then width, depth
        let mut frontier = Vec::new();
        for axis in Axis::RESOLUTION_ORDER {
            let delta = self.delta(change.old.along(axis), change.new.along(axis));
            if delta.abs() <= self.config.progress_epsilon {
                continue;
            }
            let (pushes, _) = state.push_from(&change.block, source, axis, delta);
            frontier.extend(pushes);
        }

        if frontier.is_empty() {
            return Resolution::empty();
        }

        let mut passes = 0;
        while !frontier.is_empty() && passes < self.config.max_iterations {
            passes += 1;
            let mut next = Vec::new();
            let mut progress = false;

            for push in &frontier {
                let Some(&footprint) = state.original.get(&push.source) else {
                    continue;
                };
                let (pushes, moved) = state.push_from(&push.source, footprint, push.axis, push.delta);
                progress |= moved;
                next.extend(pushes);
            }

            log::debug!(
                "resolve {}: pass {} moved {} block(s)",
                change.block,
                passes,
                next.len()
            );

            if !progress {
                next.clear();
            }
            frontier = next;
        }

        // Blocks pushed in the last allowed pass may have nothing resting on them
        let converged = !frontier.iter().any(|push| state.has_dependents(push));
        if !converged {
            log::warn!(
                "resolve {}: stopped after {} passes with {} block(s) still moving; layout may overlap",
                change.block,
                passes,
                frontier.len()
            );
        }

        Resolution {
            displacements: state.displacements,
            passes,
            converged,
        }
    }

    /// Resolve a dimension change of `id` from `old` to `new` and commit it:
    /// the new dimensions and every displacement are applied in one batch.
    pub fn resolve_displacement(
        &self,
        store: &mut LayoutStore,
        id: &BlockId,
        old: Dimensions,
        new: Dimensions,
    ) -> Result<Resolution, LayoutError> {
        new.validate()?;
        let block = store.require(id)?;
        let change = DimensionChange {
            block: id.clone(),
            old,
            new,
            position: block.position,
        };

        let resolution = self.resolve(store, &change);

        store.update_dimensions(id, new)?;
        store.apply(&resolution.displacements)?;

        log::info!(
            "resized {} from {} to {}: {} block(s) displaced in {} pass(es)",
            id,
            old,
            new,
            resolution.displacements.len(),
            resolution.passes
        );

        Ok(resolution)
    }

    /// Resize `id` to `new`, taking the old dimensions from the store
    pub fn resize(
        &self,
        store: &mut LayoutStore,
        id: &BlockId,
        new: Dimensions,
    ) -> Result<Resolution, LayoutError> {
        let old = store.require(id)?.dimensions;
        self.resolve_displacement(store, id, old, new)
    }
}
