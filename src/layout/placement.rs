//! Turning "add a block here" requests into committed blocks

use super::config::{LayoutConfig, NegativeFace};
use super::error::LayoutError;
use super::store::LayoutStore;
use super::types::{Block, BlockId, BlockKind, BlockStatus, Dimensions, FaceNormal, Position};

/// Places new blocks on the grid.
///
/// Requests that land on an occupied cell are silently ignored: a duplicate
/// click must not create a second block. New blocks never displace others.
#[derive(Debug, Clone)]
pub struct Placement {
    tolerance: f64,
    negative_face: NegativeFace,
}

impl Placement {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            tolerance: config.placement_tolerance,
            negative_face: config.negative_face,
        }
    }

    /// Id of an existing block whose position is within tolerance of `position`
    pub fn occupant<'s>(&self, store: &'s LayoutStore, position: &Position) -> Option<&'s BlockId> {
        store
            .iter()
            .find(|b| b.position.approx_eq(position, self.tolerance))
            .map(|b| &b.id)
    }

    /// Add a unit block at a grid cell.
    ///
    /// Blocks on the ground floor are stores, everything above is an apartment.
    pub fn add_block_at(&self, store: &mut LayoutStore, position: Position) -> Option<Block> {
        if let Some(existing) = self.occupant(store, &position) {
            log::debug!("cell {} already holds {}, ignoring", position, existing);
            return None;
        }

        let kind = if position.y == 0.0 {
            BlockKind::Store
        } else {
            BlockKind::Apartment
        };
        let id = store.next_block_id();
        let block = Block::unit(id, position)
            .with_kind(kind)
            .with_status(BlockStatus::Available);

        self.commit(store, block)
    }

    /// Cell a unit block would take against the face of `source` whose
    /// normal is `normal`. The dominant component of the normal picks the face.
    ///
    /// On a positive face the offset is the source's extent. On a negative
    /// face it follows [`NegativeFace`].
    pub fn adjacent_cell(
        &self,
        store: &LayoutStore,
        source: &BlockId,
        normal: FaceNormal,
    ) -> Result<Position, LayoutError> {
        let (axis, sign) = normal.dominant().ok_or(LayoutError::InvalidFaceNormal {
            x: normal.x,
            y: normal.y,
            z: normal.z,
        })?;
        let src = store.require(source)?;

        let offset = if sign > 0.0 {
            src.dimensions.along(axis)
        } else {
            match self.negative_face {
                NegativeFace::SourceExtent => -src.dimensions.along(axis),
                NegativeFace::Flush => -Dimensions::unit().along(axis),
            }
        };
        Ok(src.position.offset(axis, offset))
    }

    /// Add a unit block against the face of `source` whose normal is `normal`.
    ///
    /// Returns `Ok(None)` when the cell is occupied or would be underground.
    pub fn add_block_adjacent_to_face(
        &self,
        store: &mut LayoutStore,
        source: &BlockId,
        normal: FaceNormal,
    ) -> Result<Option<Block>, LayoutError> {
        let position = self.adjacent_cell(store, source, normal)?;
        if position.y < 0.0 {
            log::debug!("cell {} next to {} is underground, ignoring", position, source);
            return Ok(None);
        }
        Ok(self.add_block_at(store, position))
    }

    /// Add a fully specified block, e.g. one declared by name in a script.
    ///
    /// Same collision guard as [`add_block_at`](Self::add_block_at); a clash
    /// of ids is an error rather than a silent skip.
    pub fn add_block(&self, store: &mut LayoutStore, block: Block) -> Result<Option<Block>, LayoutError> {
        if store.contains(&block.id) {
            return Err(LayoutError::duplicate(block.id.as_str()));
        }
        block.dimensions.validate()?;
        if let Some(existing) = self.occupant(store, &block.position) {
            log::debug!(
                "cell {} already holds {}, ignoring {}",
                block.position,
                existing,
                block.id
            );
            return Ok(None);
        }
        Ok(self.commit(store, block))
    }

    fn commit(&self, store: &mut LayoutStore, block: Block) -> Option<Block> {
        match store.upsert(block.clone()) {
            Ok(()) => Some(block),
            Err(e) => {
                log::warn!("could not place {}: {}", block.id, e);
                None
            }
        }
    }
}
