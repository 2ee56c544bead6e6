//! Single-line transfer strings for ASCII layouts.
//!
//! A transfer string reads `cellwise:v1:<columns>x<rows>:<payload>`, where the
//! payload is unpadded base64 over a JSON list of glyph rows.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use cellwise_world::{query, LayoutError, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "cellwise";
const SNAPSHOT_VERSION: &str = "v1";
/// Leading `domain:version` pair of every transfer string.
pub(crate) const SNAPSHOT_HEADER: &str = "cellwise:v1";

/// Width and height of a layout grid, written `columns x rows`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GridSize {
    /// Cells along the x axis.
    pub(crate) columns: u32,
    /// Cells along the z axis.
    pub(crate) rows: u32,
}

impl GridSize {
    fn of(glyphs: &[String]) -> Result<Self, LayoutTransferError> {
        let width = glyphs.first().map_or(0, |row| row.chars().count());
        let too_large = || LayoutTransferError::InvalidDimensions(format!("{width}x{}", glyphs.len()));
        Ok(Self {
            columns: u32::try_from(width).map_err(|_| too_large())?,
            rows: u32::try_from(glyphs.len()).map_err(|_| too_large())?,
        })
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = LayoutTransferError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutTransferError::InvalidDimensions(text.to_owned());
        let (columns, rows) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
        let size = Self {
            columns: columns.trim().parse().map_err(|_| invalid())?,
            rows: rows.trim().parse().map_err(|_| invalid())?,
        };
        if size.columns == 0 || size.rows == 0 {
            return Err(invalid());
        }
        Ok(size)
    }
}

/// Snapshot of a map layout as ASCII rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutSnapshot {
    /// Grid the rows cover.
    pub(crate) size: GridSize,
    /// Glyph rows, one per z coordinate.
    pub(crate) glyphs: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    rows: Vec<String>,
}

impl LayoutSnapshot {
    /// Captures the current layout of `world`.
    pub(crate) fn capture(world: &World) -> Result<Self, LayoutTransferError> {
        Self::from_rows(query::render_layout(world))
    }

    /// Builds a snapshot from glyph rows, checking that they form a rectangle.
    pub(crate) fn from_rows(glyphs: Vec<String>) -> Result<Self, LayoutTransferError> {
        let size = GridSize::of(&glyphs)?;
        if size.columns == 0 || size.rows == 0 {
            return Err(LayoutTransferError::EmptyPayload);
        }
        let width = size.columns as usize;
        if let Some(row) = glyphs.iter().position(|row| row.chars().count() != width) {
            return Err(LayoutTransferError::RaggedRow(row));
        }
        Ok(Self { size, glyphs })
    }

    /// Encodes the snapshot as a transfer string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let json = serde_json::to_vec(&Payload {
            rows: self.glyphs.clone(),
        })
        .map_err(LayoutTransferError::InvalidPayload)?;
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}:{}",
            self.size,
            STANDARD_NO_PAD.encode(json)
        ))
    }

    /// Parses a transfer string produced by [`LayoutSnapshot::encode`].
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut fields = value.splitn(4, ':');
        let mut field = |name: &'static str| {
            fields
                .next()
                .filter(|field| !field.is_empty())
                .ok_or(LayoutTransferError::MissingField(name))
        };
        let domain = field("domain")?;
        let version = field("version")?;
        let declared: GridSize = field("dimensions")?.parse()?;
        let payload = field("payload")?;

        match (domain, version) {
            (SNAPSHOT_DOMAIN, SNAPSHOT_VERSION) => {}
            (SNAPSHOT_DOMAIN, other) => {
                return Err(LayoutTransferError::UnsupportedVersion(other.to_owned()))
            }
            (other, _) => return Err(LayoutTransferError::InvalidPrefix(other.to_owned())),
        }

        let bytes = STANDARD_NO_PAD
            .decode(payload)
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let Payload { rows } =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;
        let snapshot = Self::from_rows(rows)?;
        if snapshot.size != declared {
            return Err(LayoutTransferError::DimensionMismatch {
                declared,
                found: snapshot.size,
            });
        }
        Ok(snapshot)
    }

    /// Rebuilds a world from the snapshot.
    pub(crate) fn to_world(&self) -> Result<World, LayoutTransferError> {
        World::from_layout(&self.glyphs.join("\n")).map_err(LayoutTransferError::InvalidLayout)
    }
}

/// Ways a transfer string can fail to encode or decode.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// Nothing to encode or decode.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// A `:`-separated field is absent or blank.
    #[error("layout string has no {0}")]
    MissingField(&'static str),
    /// The string was produced by something else.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The string comes from another format version.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions field is not `<columns>x<rows>` with both above zero.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The declared dimensions disagree with the rows.
    #[error("layout declares {declared} but contains {found}")]
    DimensionMismatch {
        /// Size written in the string.
        declared: GridSize,
        /// Size of the decoded rows.
        found: GridSize,
    },
    /// A row differs in width from the first row.
    #[error("row {0} differs in width from the first row")]
    RaggedRow(usize),
    /// The payload is not base64.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload is not a JSON row list.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The rows use glyphs the world does not know.
    #[error("layout is not valid: {0}")]
    InvalidLayout(#[source] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> World {
        World::from_layout("WWWW\nW.SW\nWi.W\nWWWW\n").expect("layout")
    }

    #[test]
    fn round_trip_preserves_every_glyph() {
        let world = ring();
        let snapshot = LayoutSnapshot::capture(&world).expect("capture");
        let encoded = snapshot.encode().expect("encode");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:4x4:")));

        let decoded = LayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
        let rebuilt = decoded.to_world().expect("world rebuilds");
        assert_eq!(query::render_layout(&rebuilt), query::render_layout(&world));
    }

    #[test]
    fn rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            LayoutSnapshot::decode("blueprint:v1:4x4:AAAA"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "blueprint"
        ));
        assert!(matches!(
            LayoutSnapshot::decode("cellwise:v2:4x4:AAAA"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            LayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn names_the_missing_field() {
        assert!(matches!(
            LayoutSnapshot::decode("cellwise:v1:4x4"),
            Err(LayoutTransferError::MissingField("payload"))
        ));
        assert!(matches!(
            LayoutSnapshot::decode("cellwise::4x4:AAAA"),
            Err(LayoutTransferError::MissingField("version"))
        ));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let snapshot = LayoutSnapshot::capture(&ring()).expect("capture");
        let encoded = snapshot.encode().expect("encode");
        let tampered = encoded.replacen("4x4", "5x4", 1);
        match LayoutSnapshot::decode(&tampered) {
            Err(LayoutTransferError::DimensionMismatch { declared, found }) => {
                assert_eq!(declared.to_string(), "5x4");
                assert_eq!(found, snapshot.size);
            }
            other => panic!("expected a dimension mismatch, got {other:?}"),
        }
        assert!(matches!(
            LayoutSnapshot::decode("cellwise:v1:0x4:AAAA"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn ragged_rows_are_refused() {
        let rows = vec!["...".to_owned(), "..".to_owned()];
        assert!(matches!(
            LayoutSnapshot::from_rows(rows),
            Err(LayoutTransferError::RaggedRow(1))
        ));
    }
}
