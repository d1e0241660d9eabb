//! The binary and base64 buffer formats.
//!
//! ```text
//! magic   b"UPCB"
//! version u8
//! count   u32 LE
//! count × { x: i32 LE, y: i32 LE, cell: [u8; 4] }   sorted by (x, y)
//! ```

use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use byteorder::{LittleEndian, ReadBytesExt};
use geometry::prelude::*;
use tracing::Level;
use upc::{InvalidUpc, Upc, UPC_BYTES};

use crate::buffer::Buffer;

/// The leading bytes of a serialized buffer.
pub const MAGIC: [u8; 4] = *b"UPCB";

/// The format version written by [`Buffer::to_bytes`].
pub const VERSION: u8 = 1;

const HEADER_BYTES: usize = MAGIC.len() + 1 + 4;
const ENTRY_BYTES: usize = 4 + 4 + UPC_BYTES;

/// An error decoding a serialized buffer.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The data does not start with [`MAGIC`].
    #[error("not a serialized buffer: bad magic {0:?}")]
    BadMagic([u8; 4]),
    /// The format version is not supported.
    #[error("unsupported buffer format version {0}")]
    UnsupportedVersion(u8),
    /// The data ended before the declared number of cells.
    #[error("serialized buffer is truncated")]
    Truncated,
    /// Bytes remain after the last cell.
    #[error("{0} unexpected trailing bytes after the last cell")]
    TrailingBytes(usize),
    /// A cell holds an invalid bit pattern.
    #[error("cell at {coord} is invalid")]
    InvalidCell {
        /// The cell.
        coord: CellCoord,
        /// The decoding failure.
        #[source]
        source: InvalidUpc,
    },
    /// A cell is stored explicitly as empty.
    #[error("cell at {0} is stored but empty")]
    EmptyCell(CellCoord),
    /// A coordinate appears more than once.
    #[error("cell at {0} appears more than once")]
    DuplicateCell(CellCoord),
    /// The text is not valid base64.
    #[error("invalid base64")]
    Base64(#[from] base64::DecodeError),
}

impl From<std::io::Error> for DecodeError {
    fn from(_: std::io::Error) -> Self {
        // Reads from an in-memory cursor only fail at end of input.
        Self::Truncated
    }
}

impl Buffer {
    /// Serializes every non-empty cell.
    ///
    /// The output depends only on the set of non-empty cells, not on the
    /// order of the edits that produced them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let cells = self.sorted_cells();
        let mut out = Vec::with_capacity(HEADER_BYTES + ENTRY_BYTES * cells.len());
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&(cells.len() as u32).to_le_bytes());
        for (coord, cell) in cells {
            out.extend_from_slice(&coord.x.to_le_bytes());
            out.extend_from_slice(&coord.y.to_le_bytes());
            out.extend_from_slice(&cell.0);
        }
        out
    }

    /// Deserializes a buffer written by [`Buffer::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Buffer, DecodeError> {
        let _guard = tracing::span!(Level::DEBUG, "decoding buffer", len = bytes.len()).entered();
        let mut reader = Cursor::new(bytes);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(DecodeError::BadMagic(magic));
        }
        let version = reader.read_u8()?;
        if version != VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let count = reader.read_u32::<LittleEndian>()? as usize;
        if count > bytes.len().saturating_sub(HEADER_BYTES) / ENTRY_BYTES {
            return Err(DecodeError::Truncated);
        }

        let mut buffer = Buffer::new();
        for _ in 0..count {
            let x = reader.read_i32::<LittleEndian>()?;
            let y = reader.read_i32::<LittleEndian>()?;
            let mut cell = [0u8; UPC_BYTES];
            reader.read_exact(&mut cell)?;

            let coord = CellCoord::new(x, y);
            let cell = Upc(cell);
            if let Err(source) = cell.try_normalize() {
                return Err(DecodeError::InvalidCell { coord, source });
            }
            if cell.is_empty() {
                return Err(DecodeError::EmptyCell(coord));
            }
            if !buffer.set_cell(coord, cell).is_empty() {
                return Err(DecodeError::DuplicateCell(coord));
            }
        }

        let trailing = bytes.len() - reader.position() as usize;
        if trailing > 0 {
            return Err(DecodeError::TrailingBytes(trailing));
        }
        tracing::info!(cells = count, chunks = buffer.chunk_count(), "decoded buffer");
        Ok(buffer)
    }

    /// Serializes the buffer as standard, padded base64.
    pub fn to_base64_string(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Deserializes a buffer written by [`Buffer::to_base64_string`].
    pub fn from_base64_string(text: &str) -> Result<Buffer, DecodeError> {
        let bytes = STANDARD.decode(text.trim())?;
        Self::from_bytes(&bytes)
    }
}
