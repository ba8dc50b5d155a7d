//! The `Movie` entity and its screening-room classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const TITLE_MIN_LEN: usize = 2;
pub const TITLE_MAX_LEN: usize = 100;

pub const SUMMARY_MIN_LEN: usize = 10;
pub const SUMMARY_MAX_LEN: usize = 500;

/// Column cap on `movies.poster_uri`.
pub const POSTER_URI_MAX_LEN: usize = 150;

/// Shortest runtime a movie may be registered with, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 10;

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

pub const ROOM_STANDARD: &str = "Standard";
pub const ROOM_3D: &str = "3D";
pub const ROOM_IMAX: &str = "Imax";

/// All valid room classifications, in declaration order.
pub const VALID_ROOMS: &[&str] = &[ROOM_STANDARD, ROOM_3D, ROOM_IMAX];

/// Kind of screening room a movie is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Room {
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "Imax")]
    Imax,
}

impl Room {
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::Standard => ROOM_STANDARD,
            Room::ThreeD => ROOM_3D,
            Room::Imax => ROOM_IMAX,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Room {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROOM_STANDARD => Ok(Room::Standard),
            ROOM_3D => Ok(Room::ThreeD),
            ROOM_IMAX => Ok(Room::Imax),
            other => Err(CoreError::Validation(format!(
                "Invalid room '{}'. Valid rooms: {}",
                other,
                VALID_ROOMS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A movie record.
///
/// `id` is assigned by the store on insert; entities built from a create
/// request carry `0` until then.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub summary: String,
    pub poster_uri: String,
    pub release_date: Timestamp,
    pub off_theaters_date: Timestamp,
    pub room: Room,
    pub duration: chrono::Duration,
}
