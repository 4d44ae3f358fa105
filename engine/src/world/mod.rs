//! World Module
//!
//! Contains the gallery's static description and its one moving fixture.
//!
//! ## Default Gallery
//! An 18m x 30m hall, 10.5m high, centred on the origin with the floor at
//! y = 0. The entrance is in the front wall (+Z) and a divider splits the hall
//! a little behind its middle.

pub mod door;
pub mod layout;
pub mod room;

pub use door::{DOOR_BLOCKER_LABEL, Door, DoorConfig, DoorState};
pub use layout::{GalleryLayout, LayoutConfig};
pub use room::{RoomBounds, RoomError};
