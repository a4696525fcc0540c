//! Constants used throughout the datamonster core crate.
//!
//! Game rules that the sheet enforces (slot counts, track lengths, template values) live here so
//! validation, drafts and the CLI agree on them.

/// Number of disorder slots on a survivor sheet.
pub const DISORDER_SLOTS: usize = 3;

/// Boxes on the Hunt XP track.
pub const HUNT_XP_BOXES: i32 = 16;

/// Boxes on the courage and understanding tracks.
pub const MILESTONE_TRACK_BOXES: i32 = 9;

/// Insanity at or above this value marks a survivor as insane.
pub const INSANE_THRESHOLD: i32 = 3;

/// Name given to freshly created survivors.
pub const NEW_SURVIVOR_NAME: &str = "Meat";

/// Lantern year a freshly created survivor is born in.
pub const NEW_SURVIVOR_BIRTH: i32 = 1;

/// Starting survival for a freshly created survivor.
pub const NEW_SURVIVOR_SURVIVAL: i32 = 1;

/// Starting movement for a freshly created survivor.
pub const NEW_SURVIVOR_MOVEMENT: i32 = 5;
