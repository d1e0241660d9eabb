//! Import of the older JSON layout description.
//!
//! Only cell data is imported. Module metadata and any other unknown
//! fields are ignored.

use std::collections::HashSet;

use geometry::prelude::*;
use serde::Deserialize;
use tracing::Level;
use upc::{Metal, NormalizedCell, ParsePlacementError, Placement, Silicon};

use crate::buffer::Buffer;

/// An error importing a legacy JSON layout.
#[derive(Debug, thiserror::Error)]
pub enum LegacyImportError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("malformed legacy layout")]
    Json(#[from] serde_json::Error),
    /// A placement string contains an unknown character.
    #[error("bad placement string at {coord}")]
    Placement {
        /// The cell.
        coord: CellCoord,
        /// The parse failure.
        #[source]
        source: ParsePlacementError,
    },
    /// A silicon kind is not one of `n`, `p`, `npn` or `pnp`.
    #[error("unknown silicon kind `{kind}` at {coord}")]
    UnknownKind {
        /// The cell.
        coord: CellCoord,
        /// The kind as written.
        kind: String,
    },
    /// A cell has no packed encoding, such as a MOSFET linking off its axes
    /// or a via over a MOSFET.
    #[error("cell at {0} cannot be encoded")]
    Unencodable(CellCoord),
    /// A coordinate appears more than once.
    #[error("cell at {0} appears more than once")]
    DuplicateCell(CellCoord),
}

#[derive(Debug, Deserialize)]
struct LegacyLayout {
    #[serde(default)]
    cells: Vec<LegacyCell>,
}

#[derive(Debug, Deserialize)]
struct LegacyCell {
    x: i32,
    y: i32,
    #[serde(default)]
    metal: Option<LegacyMetal>,
    #[serde(default)]
    silicon: Option<LegacySilicon>,
}

#[derive(Debug, Deserialize)]
struct LegacyMetal {
    #[serde(default)]
    placement: String,
    #[serde(default)]
    via: bool,
}

#[derive(Debug, Deserialize)]
struct LegacySilicon {
    kind: String,
    #[serde(default)]
    placement: String,
    #[serde(default)]
    gate: String,
    #[serde(default)]
    horizontal: bool,
}

impl LegacyCell {
    fn to_cell(&self) -> Result<NormalizedCell, LegacyImportError> {
        let coord = CellCoord::new(self.x, self.y);
        let parse = |s: &str| {
            s.parse::<Placement>()
                .map_err(|source| LegacyImportError::Placement { coord, source })
        };

        let metal = match &self.metal {
            None => Metal::None,
            Some(m) => Metal::Trace {
                has_via: m.via,
                placement: parse(&m.placement)?,
            },
        };

        let si = match &self.silicon {
            None => Silicon::None,
            Some(s) => match s.kind.to_ascii_lowercase().as_str() {
                "n" => Silicon::np(true, parse(&s.placement)?),
                "p" => Silicon::np(false, parse(&s.placement)?),
                kind @ ("npn" | "pnp") => Silicon::Mosfet {
                    is_npn: kind == "npn",
                    is_horizontal: s.horizontal,
                    gate_placement: parse(&s.gate)?,
                    ec_placement: parse(&s.placement)?,
                },
                _ => {
                    return Err(LegacyImportError::UnknownKind {
                        coord,
                        kind: s.kind.clone(),
                    })
                }
            },
        };

        let cell = NormalizedCell::new(metal, si);
        if cell.denormalize().normalize() != cell {
            return Err(LegacyImportError::Unencodable(coord));
        }
        Ok(cell)
    }
}

/// Imports a legacy JSON layout.
///
/// Links that the neighboring cell does not return are pruned with a warning.
pub fn import_legacy_json(json: &str) -> Result<Buffer, LegacyImportError> {
    let _guard = tracing::span!(Level::DEBUG, "importing legacy layout").entered();
    let layout: LegacyLayout = serde_json::from_str(json)?;

    let mut buffer = Buffer::new();
    let mut seen = HashSet::with_capacity(layout.cells.len());
    for legacy in layout.cells.iter() {
        let coord = CellCoord::new(legacy.x, legacy.y);
        if !seen.insert(coord) {
            return Err(LegacyImportError::DuplicateCell(coord));
        }
        buffer.put(coord, legacy.to_cell()?);
    }

    let pruned = buffer.prune_dangling_links();
    if pruned > 0 {
        tracing::warn!(pruned, "pruned dangling links from legacy layout");
    }
    tracing::info!(cells = buffer.cell_count(), "imported legacy layout");
    Ok(buffer)
}

impl Buffer {
    /// Imports a legacy JSON layout. See [`import_legacy_json`].
    #[inline]
    pub fn from_legacy_json(json: &str) -> Result<Buffer, LegacyImportError> {
        import_legacy_json(json)
    }
}
