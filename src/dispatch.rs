use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::effect::Effect;
use crate::session::Snapshot;
use crate::timer::Timer;

/// Inbound request, tagged by its `action` field. Unknown fields are
/// ignored; clients may attach extras the background does not read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    StartTimer,
    PauseTimer {
        #[serde(default)]
        stop_music_on_pause: bool,
    },
    ResetTimer,
    SetTime {
        time: u32,
        default_time: u32,
    },
    StartEditing,
    StopEditing,
    ToggleMusic {
        is_music_on: bool,
    },
    GetTime,
}

impl Command {
    /// Parse a decoded request object. Unknown actions and malformed
    /// requests come back as `None` and are dropped without an error
    /// response.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// Route one command to the state machine. `getTime` is the only command
/// that produces a response.
pub fn dispatch(timer: &mut Timer, command: Command, today: NaiveDate) -> (Vec<Effect>, Option<Snapshot>) {
    match command {
        Command::StartTimer => (timer.start(), None),
        Command::PauseTimer { stop_music_on_pause } => (timer.pause(stop_music_on_pause), None),
        Command::ResetTimer => (timer.reset(), None),
        Command::SetTime { time, default_time } => (timer.set_time(time, default_time), None),
        Command::StartEditing => (timer.start_editing(), None),
        Command::StopEditing => (timer.stop_editing(), None),
        Command::ToggleMusic { is_music_on } => (timer.toggle_music(is_music_on), None),
        Command::GetTime => (Vec::new(), Some(timer.snapshot(today))),
    }
}
