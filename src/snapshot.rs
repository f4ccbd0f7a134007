//! Serializable view of a layout
//!
//! Blocks and text labels are flattened into plain records so a layout can
//! be written out as JSON or TOML and loaded back into a store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{
    Block, BlockId, BlockKind, BlockStatus, Dimensions, LayoutError, LayoutStore, Position,
    TextLabel,
};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("invalid snapshot: {0}")]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub status: BlockStatus,
    pub position: [f64; 3],
    #[serde(default)]
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: BlockId,
    pub content: String,
    pub position: [f64; 3],
    pub color: String,
    pub size: f64,
}

/// Every block and label of a layout, in store order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<TextRecord>,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id.clone(),
            name: block.name.clone(),
            kind: block.kind,
            status: block.status,
            position: block.position.to_array(),
            dimensions: block.dimensions,
        }
    }
}

impl From<&TextLabel> for TextRecord {
    fn from(text: &TextLabel) -> Self {
        Self {
            id: text.id.clone(),
            content: text.content.clone(),
            position: text.position.to_array(),
            color: text.color.clone(),
            size: text.size,
        }
    }
}

impl LayoutSnapshot {
    pub fn from_store(store: &LayoutStore) -> Self {
        Self {
            blocks: store.iter().map(BlockRecord::from).collect(),
            texts: store.texts().iter().map(TextRecord::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String, SnapshotError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(content)?)
    }

    /// One line per block, then one per label
    pub fn to_text(&self) -> String {
        let blocks = self.blocks.iter().map(|b| {
            let mut line = format!(
                "{} {} at {} size {}",
                b.id,
                b.kind.as_str(),
                Position::from(b.position),
                b.dimensions
            );
            if b.status != BlockStatus::Available {
                line.push_str(&format!(" [{}]", b.status.as_str()));
            }
            if let Some(name) = &b.name {
                line.push_str(&format!(" \"{}\"", name));
            }
            line
        });
        let texts = self.texts.iter().map(|t| {
            format!(
                "{} text \"{}\" at {}",
                t.id,
                t.content,
                Position::from(t.position)
            )
        });
        blocks.chain(texts).collect::<Vec<_>>().join("\n")
    }

    /// Rebuild a store, validating every block
    pub fn into_store(self) -> Result<LayoutStore, SnapshotError> {
        let mut store = LayoutStore::new();
        for record in self.blocks {
            if store.contains(&record.id) {
                return Err(LayoutError::duplicate(record.id.as_str()).into());
            }
            let mut block = Block::new(record.id, Position::from(record.position), record.dimensions)
                .with_kind(record.kind)
                .with_status(record.status);
            block.name = record.name;
            store.upsert(block)?;
        }
        for record in self.texts {
            let mut text = TextLabel::new(record.id, record.content, Position::from(record.position));
            text.color = record.color;
            text.size = record.size;
            store.upsert_text(text);
        }
        Ok(store)
    }
}
