use serde::Serialize;

/// Focus length a fresh install starts with (25 minutes).
pub const INITIAL_FOCUS_SESSION_LENGTH: u32 = 25 * 60;

/// Break length is fixed (5 minutes); only the focus length is adjustable.
pub const BREAK_SESSION_LENGTH: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Phase {
    #[strum(serialize = "Focus Session")]
    Focus,
    #[strum(serialize = "Break Time")]
    Break,
}

/// Mutable timer state, owned by the background process for its lifetime.
///
/// Nothing here survives a restart; the adjustable focus length and the
/// music URL live in [`crate::config::Preferences`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub seconds_remaining: u32,
    pub phase: Phase,
    pub running: bool,
    pub editing: bool,
    pub focus_session_length: u32,
    pub completed_focus_count: u32,
    pub music_enabled: bool,
    pub music_active: bool,
}

impl SessionState {
    pub fn new(focus_session_length: u32) -> Self {
        Self {
            seconds_remaining: focus_session_length,
            phase: Phase::Focus,
            running: false,
            editing: false,
            focus_session_length,
            completed_focus_count: 0,
            music_enabled: false,
            music_active: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(INITIAL_FOCUS_SESSION_LENGTH)
    }
}

/// Point-in-time copy of the session state plus derived statistics,
/// returned to `getTime` callers. Field names match the wire protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub seconds_remaining: u32,
    pub running: bool,
    pub phase: Phase,
    pub completed_focus_count: u32,
    pub today_count: u32,
    pub weekly_average: f64,
    pub music_enabled: bool,
    pub music_active: bool,
    pub focus_session_length: u32,
}
