use crate::*;
use serde::Deserialize;
use std::path::Path;

/// One block entry of a JSON case file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub width: float,
    pub height: float,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub neighbor: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("failed to read case file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed case file: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BlockDef> for Block {
    fn from(def: BlockDef) -> Self {
        Block::builder()
            .name(def.name)
            .width(def.width)
            .height(def.height)
            .location(
                def.preferred_location
                    .as_deref()
                    .map(Location::parse)
                    .unwrap_or_default(),
            )
            .maybe_neighbor(def.neighbor)
            .build()
    }
}

pub fn load_blocks<P: AsRef<Path>>(path: P) -> Result<Vec<Block>, CaseError> {
    let content = std::fs::read_to_string(path)?;
    let defs: Vec<BlockDef> = serde_json::from_str(&content)?;
    Ok(defs.into_iter().map(Block::from).collect())
}
