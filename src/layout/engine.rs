//! Executes layout scripts against a store
//!
//! This is the caller side of the core: it routes each command to the
//! placement controller or the resolver and applies the policies that live
//! outside them, such as keeping blocks above ground.

use std::fmt;

use thiserror::Error;

use crate::parser::ast::{
    AddCommand, BlockDecl, Command, Extent, Modifier, ModifierValue, ResizeSpec, Script, Span,
    Spanned, TextDecl,
};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::placement::Placement;
use super::resolver::Resolver;
use super::store::LayoutStore;
use super::types::{
    Axis, Block, BlockId, BlockKind, BlockStatus, Dimensions, FaceNormal, Position, TextLabel,
};

/// A layout error tied to the command that caused it
#[derive(Debug, Error)]
#[error("{error}")]
pub struct CommandError {
    pub span: Span,
    #[source]
    pub error: LayoutError,
}

/// What a command did to the layout
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReport {
    Added { id: BlockId, position: Position },
    /// Placement landed on an occupied or underground cell
    Skipped { position: Position },
    Resized {
        id: BlockId,
        dimensions: Dimensions,
        displaced: Vec<BlockId>,
        passes: usize,
        converged: bool,
    },
    Moved { id: BlockId, position: Position },
    Removed { id: BlockId },
    Labeled { id: BlockId },
}

impl fmt::Display for CommandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandReport::Added { id, position } => write!(f, "added {} at {}", id, position),
            CommandReport::Skipped { position } => write!(f, "skipped {}", position),
            CommandReport::Resized {
                id,
                dimensions,
                displaced,
                passes,
                converged,
            } => {
                write!(f, "resized {} to {}", id, dimensions)?;
                if !displaced.is_empty() {
                    let ids: Vec<&str> = displaced.iter().map(|d| d.as_str()).collect();
                    write!(f, ", displaced {}", ids.join(", "))?;
                }
                if *passes > 0 {
                    write!(f, " ({} passes)", passes)?;
                }
                if !converged {
                    write!(f, " [iteration cap reached]")?;
                }
                Ok(())
            }
            CommandReport::Moved { id, position } => write!(f, "moved {} to {}", id, position),
            CommandReport::Removed { id } => write!(f, "removed {}", id),
            CommandReport::Labeled { id } => write!(f, "labeled {}", id),
        }
    }
}

/// Routes script commands to placement and resolution
#[derive(Debug, Clone)]
pub struct Engine {
    config: LayoutConfig,
    placement: Placement,
    resolver: Resolver,
}

impl Engine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
            placement: Placement::new(config),
            resolver: Resolver::new(config),
        }
    }

    /// Run every command in order, stopping at the first error
    pub fn execute(
        &self,
        store: &mut LayoutStore,
        script: &Script,
    ) -> Result<Vec<CommandReport>, CommandError> {
        script
            .commands
            .iter()
            .map(|cmd| {
                self.apply(store, &cmd.node).map_err(|error| CommandError {
                    span: cmd.span.clone(),
                    error,
                })
            })
            .collect()
    }

    /// Run a single command
    pub fn apply(&self, store: &mut LayoutStore, command: &Command) -> Result<CommandReport, LayoutError> {
        match command {
            Command::Block(decl) => self.declare_block(store, decl),
            Command::Add(AddCommand::At(p)) => {
                let position = Position::from(p.node);
                Ok(match self.placement.add_block_at(store, position) {
                    Some(block) => CommandReport::Added {
                        id: block.id,
                        position: block.position,
                    },
                    None => CommandReport::Skipped { position },
                })
            }
            Command::Add(AddCommand::NextTo { source, normal }) => {
                let source_id = BlockId::new(source.node.as_str());
                let normal = FaceNormal::from(normal.node);
                let added = self
                    .placement
                    .add_block_adjacent_to_face(store, &source_id, normal)?;
                Ok(match added {
                    Some(block) => CommandReport::Added {
                        id: block.id,
                        position: block.position,
                    },
                    None => CommandReport::Skipped {
                        position: self.placement.adjacent_cell(store, &source_id, normal)?,
                    },
                })
            }
            Command::Resize(r) => {
                let id = BlockId::new(r.target.node.as_str());
                let old = store.require(&id)?.dimensions;
                let new = match &r.spec.node {
                    ResizeSpec::To([w, h, d]) => Dimensions::new(*w, *h, *d)?,
                    ResizeSpec::Extent { extent, value } => {
                        let mut dims = old;
                        dims.set_along(extent_axis(*extent), *value);
                        dims.validate()?;
                        dims
                    }
                };
                self.resize(store, &id, old, new)
            }
            Command::Move(m) => {
                let id = BlockId::new(m.target.node.as_str());
                let position = self.grounded(Position::from(m.position.node));
                store.update_position(&id, position)?;
                Ok(CommandReport::Moved { id, position })
            }
            Command::Remove(name) => {
                let id = BlockId::new(name.node.as_str());
                if store.remove(&id).is_some() || store.remove_text(&id).is_some() {
                    Ok(CommandReport::Removed { id })
                } else {
                    Err(LayoutError::unknown_block(id.as_str(), store.suggest(id.as_str())))
                }
            }
            Command::Text(decl) => self.declare_text(store, decl),
        }
    }

    /// Resize and commit, then keep displaced blocks above ground
    fn resize(
        &self,
        store: &mut LayoutStore,
        id: &BlockId,
        old: Dimensions,
        new: Dimensions,
    ) -> Result<CommandReport, LayoutError> {
        let resolution = self.resolver.resolve_displacement(store, id, old, new)?;

        for (moved, position) in resolution.displacements.iter() {
            let grounded = self.grounded(*position);
            if grounded != *position {
                store.update_position(moved, grounded)?;
            }
        }

        Ok(CommandReport::Resized {
            id: id.clone(),
            dimensions: new,
            displaced: resolution.displacements.ids().cloned().collect(),
            passes: resolution.passes,
            converged: resolution.converged,
        })
    }

    fn grounded(&self, mut position: Position) -> Position {
        if self.config.clamp_to_ground && position.y < 0.0 {
            position.y = 0.0;
        }
        position
    }

    fn declare_block(&self, store: &mut LayoutStore, decl: &BlockDecl) -> Result<CommandReport, LayoutError> {
        let position = Position::from(decl.position.node);
        let dimensions = match &decl.size {
            Some(size) => {
                let [w, h, d] = size.node;
                Dimensions::new(w, h, d)?
            }
            None => Dimensions::unit(),
        };
        let kind = if position.y == 0.0 {
            BlockKind::Store
        } else {
            BlockKind::Apartment
        };
        let id = BlockId::new(decl.name.node.as_str());
        if store.get_text(&id).is_some() {
            return Err(LayoutError::duplicate(id.as_str()));
        }
        let mut block = Block::new(id, position, dimensions).with_kind(kind);

        for m in &decl.modifiers {
            apply_block_modifier(&mut block, &m.node)?;
        }

        Ok(match self.placement.add_block(store, block)? {
            Some(block) => CommandReport::Added {
                id: block.id,
                position: block.position,
            },
            None => CommandReport::Skipped { position },
        })
    }

    /// Labels share the block id space; redeclaring a label replaces it
    fn declare_text(&self, store: &mut LayoutStore, decl: &TextDecl) -> Result<CommandReport, LayoutError> {
        let id = BlockId::new(decl.name.node.as_str());
        if store.contains(&id) {
            return Err(LayoutError::duplicate(id.as_str()));
        }
        let mut text = TextLabel::new(
            id.clone(),
            decl.content.node.clone(),
            Position::from(decl.position.node),
        );
        for m in &decl.modifiers {
            apply_text_modifier(&mut text, &m.node)?;
        }
        store.upsert_text(text);
        Ok(CommandReport::Labeled { id })
    }
}

fn extent_axis(extent: Extent) -> Axis {
    match extent {
        Extent::Width => Axis::X,
        Extent::Height => Axis::Y,
        Extent::Depth => Axis::Z,
    }
}

fn value_text(value: &Spanned<ModifierValue>) -> String {
    match &value.node {
        ModifierValue::Number(n) => n.to_string(),
        other => other.as_text().unwrap_or_default().to_string(),
    }
}

fn apply_block_modifier(block: &mut Block, modifier: &Modifier) -> Result<(), LayoutError> {
    let key = modifier.key.node.as_str();
    let value = &modifier.value;
    match key {
        "kind" | "type" => {
            block.kind = value
                .node
                .as_text()
                .and_then(BlockKind::from_name)
                .ok_or_else(|| {
                    LayoutError::invalid_modifier(
                        key,
                        value_text(value),
                        "apartment, store, office or parking",
                    )
                })?;
        }
        "status" => {
            block.status = value
                .node
                .as_text()
                .and_then(BlockStatus::from_name)
                .ok_or_else(|| {
                    LayoutError::invalid_modifier(key, value_text(value), "available, reserved or sold")
                })?;
        }
        "name" => {
            block.name = Some(value_text(value));
        }
        other => {
            log::warn!("ignoring unknown block modifier '{}' on {}", other, block.id);
        }
    }
    Ok(())
}

fn apply_text_modifier(text: &mut TextLabel, modifier: &Modifier) -> Result<(), LayoutError> {
    let key = modifier.key.node.as_str();
    let value = &modifier.value;
    match key {
        "color" => {
            text.color = value
                .node
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| LayoutError::invalid_modifier(key, value_text(value), "a color"))?;
        }
        "size" => {
            text.size = value
                .node
                .as_number()
                .filter(|s| *s > 0.0)
                .ok_or_else(|| {
                    LayoutError::invalid_modifier(key, value_text(value), "a positive number")
                })?;
        }
        other => {
            log::warn!("ignoring unknown text modifier '{}' on {}", other, text.id);
        }
    }
    Ok(())
}
