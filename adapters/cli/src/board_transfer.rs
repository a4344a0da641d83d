#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use fuseblocks_core::{GridSnapshot, TileSeed};
use serde::{Deserialize, Serialize};

const BOARD_DOMAIN: &str = "fuse";
const BOARD_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded board payload.
pub(crate) const BOARD_HEADER: &str = "fuse:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Portable capture of a settled board, ready for clipboard transfer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardTransfer {
    /// Settled grid state carried by the board string.
    pub snapshot: GridSnapshot,
}

impl BoardTransfer {
    /// Encodes the board into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializablePayload {
            tiles: self.snapshot.tiles().to_vec(),
        };
        let json = serde_json::to_vec(&payload).expect("board snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{BOARD_HEADER}:{}x{}:{encoded}",
            self.snapshot.columns(),
            self.snapshot.rows()
        )
    }

    /// Decodes a board from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, BoardTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BoardTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(BoardTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(BoardTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(BoardTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(BoardTransferError::MissingPayload)?;

        if domain != BOARD_DOMAIN {
            return Err(BoardTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != BOARD_VERSION {
            return Err(BoardTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(BoardTransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(BoardTransferError::InvalidPayload)?;

        let expected = u64::from(columns) * u64::from(rows);
        let found = decoded.tiles.len() as u64;
        if expected != found {
            return Err(BoardTransferError::MismatchedTileCount { expected, found });
        }

        Ok(Self {
            snapshot: GridSnapshot::new(columns, rows, decoded.tiles),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializablePayload {
    tiles: Vec<TileSeed>,
}

/// Errors that can occur while decoding board transfer strings.
#[derive(Debug)]
pub(crate) enum BoardTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded board.
    MissingPrefix,
    /// The encoded board did not contain a version segment.
    MissingVersion,
    /// The encoded board did not include grid dimensions.
    MissingDimensions,
    /// The encoded board did not include the payload segment.
    MissingPayload,
    /// The encoded board used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded board used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded board.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The payload's tile count does not cover the declared dimensions.
    MismatchedTileCount {
        /// Number of cells implied by the dimension segment.
        expected: u64,
        /// Number of tiles carried by the payload.
        found: u64,
    },
}

impl fmt::Display for BoardTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "board string was empty"),
            Self::MissingPrefix => write!(f, "board string is missing the prefix"),
            Self::MissingVersion => write!(f, "board string is missing the version"),
            Self::MissingDimensions => write!(f, "board string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "board string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "board prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "board version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode board payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse board payload: {error}")
            }
            Self::MismatchedTileCount { expected, found } => {
                write!(f, "board payload holds {found} tiles where {expected} were expected")
            }
        }
    }
}

impl Error for BoardTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), BoardTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| BoardTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| BoardTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| BoardTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(BoardTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuseblocks_core::{TileColor, TileIdentity};

    #[test]
    fn round_trip_empty_board() {
        let transfer = BoardTransfer {
            snapshot: GridSnapshot::new(4, 2, vec![TileSeed::empty(); 8]),
        };

        let encoded = transfer.encode();
        assert!(encoded.starts_with(&format!("{BOARD_HEADER}:4x2:")));

        let decoded = BoardTransfer::decode(&encoded).expect("board decodes");
        assert_eq!(transfer, decoded);
    }

    #[test]
    fn round_trip_populated_board() {
        let red = TileIdentity::colored(TileColor::Red);
        let tiles = vec![
            TileSeed::movable(red),
            TileSeed::empty(),
            TileSeed::wall(),
            TileSeed::anchored(red),
            TileSeed::empty(),
            TileSeed::movable(TileIdentity::numbered(3)),
        ];
        let transfer = BoardTransfer {
            snapshot: GridSnapshot::new(3, 2, tiles),
        };

        let encoded = transfer.encode();
        assert!(encoded.starts_with(&format!("{BOARD_HEADER}:3x2:")));

        let decoded = BoardTransfer::decode(&encoded).expect("board decodes");
        assert_eq!(transfer, decoded);
    }

    #[test]
    fn foreign_domains_are_rejected() {
        let error = BoardTransfer::decode("tiles:v1:2x1:AAAA").expect_err("prefix must fail");
        assert!(matches!(error, BoardTransferError::InvalidPrefix(_)));
    }

    #[test]
    fn truncated_strings_are_rejected() {
        let error = BoardTransfer::decode("fuse:v1").expect_err("truncation must fail");
        assert!(matches!(error, BoardTransferError::MissingDimensions));
    }

    #[test]
    fn mismatched_tile_counts_are_rejected() {
        let transfer = BoardTransfer {
            snapshot: GridSnapshot::new(3, 1, vec![TileSeed::empty(); 2]),
        };

        let error = BoardTransfer::decode(&transfer.encode()).expect_err("count must fail");
        assert!(matches!(
            error,
            BoardTransferError::MismatchedTileCount {
                expected: 3,
                found: 2,
            }
        ));
    }
}
