use chrono::NaiveDate;

use crate::effect::{Effect, BREAK_OVER_MESSAGE, FOCUS_COMPLETE_MESSAGE};
use crate::session::{Phase, SessionState, Snapshot, BREAK_SESSION_LENGTH};
use crate::stats::DailyStats;

/// The background timer state machine.
///
/// Every operation is a pure transition: it mutates the owned state and
/// returns the side effects the caller should perform. No I/O happens
/// here, and "today" is an argument so tests can pin the calendar.
#[derive(Debug, Default)]
pub struct Timer {
    pub state: SessionState,
    pub stats: DailyStats,
    resume_after_edit: bool,
}

impl Timer {
    pub fn new(focus_session_length: u32) -> Self {
        Self {
            state: SessionState::new(focus_session_length),
            stats: DailyStats::new(),
            resume_after_edit: false,
        }
    }

    /// One second elapsed. No-op unless the countdown is live; a zero
    /// crossing performs exactly one phase transition and auto-chains
    /// into the next session.
    pub fn tick(&mut self, today: NaiveDate) -> Vec<Effect> {
        if !self.state.running || self.state.editing {
            return Vec::new();
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        if self.state.seconds_remaining == 0 {
            self.handle_session_end(today)
        } else {
            Vec::new()
        }
    }

    fn handle_session_end(&mut self, today: NaiveDate) -> Vec<Effect> {
        self.state.running = false;
        let mut effects = match self.state.phase {
            Phase::Focus => self.switch_to_break(today),
            Phase::Break => self.switch_to_focus(),
        };
        // The system never idles between phases.
        effects.extend(self.start());
        effects
    }

    fn switch_to_break(&mut self, today: NaiveDate) -> Vec<Effect> {
        self.state.phase = Phase::Break;
        self.state.seconds_remaining = BREAK_SESSION_LENGTH;
        self.state.completed_focus_count += 1;
        self.stats.record_completion(today, today);
        vec![Effect::Notify(FOCUS_COMPLETE_MESSAGE)]
    }

    fn switch_to_focus(&mut self) -> Vec<Effect> {
        self.state.phase = Phase::Focus;
        self.state.seconds_remaining = self.state.focus_session_length;
        vec![Effect::Notify(BREAK_OVER_MESSAGE)]
    }

    pub fn start(&mut self) -> Vec<Effect> {
        if self.state.running || self.state.editing {
            return Vec::new();
        }
        self.state.running = true;
        self.play_music_if_enabled()
    }

    /// Stop the countdown. Music only stops when the caller asks, which
    /// is how the "keep music on pause" preference reaches the core.
    pub fn pause(&mut self, stop_music: bool) -> Vec<Effect> {
        self.state.running = false;
        if stop_music && self.state.music_active {
            self.state.music_active = false;
            vec![Effect::StopMusic]
        } else {
            Vec::new()
        }
    }

    pub fn reset(&mut self) -> Vec<Effect> {
        self.state.running = false;
        self.state.phase = Phase::Focus;
        self.state.seconds_remaining = self.state.focus_session_length;
        Vec::new()
    }

    /// Overwrite the countdown and the default focus length. Range
    /// validation is the caller's job; the new default is persisted via
    /// an effect.
    pub fn set_time(&mut self, seconds: u32, new_default: u32) -> Vec<Effect> {
        self.state.seconds_remaining = seconds;
        self.state.focus_session_length = new_default;
        self.state.phase = Phase::Focus;
        vec![Effect::SaveDefaultFocusTime(new_default)]
    }

    /// Suspend ticking while the displayed time is being edited,
    /// remembering whether to resume afterwards.
    pub fn start_editing(&mut self) -> Vec<Effect> {
        self.resume_after_edit = self.state.running;
        self.state.editing = true;
        self.state.running = false;
        Vec::new()
    }

    pub fn stop_editing(&mut self) -> Vec<Effect> {
        self.state.editing = false;
        if self.resume_after_edit {
            self.resume_after_edit = false;
            self.start()
        } else {
            Vec::new()
        }
    }

    pub fn toggle_music(&mut self, on: bool) -> Vec<Effect> {
        self.state.music_enabled = on;
        if on {
            self.play_music_if_enabled()
        } else if self.state.music_active {
            self.state.music_active = false;
            vec![Effect::StopMusic]
        } else {
            Vec::new()
        }
    }

    // Duplicate-start guard: at most one PlayMusic while music is
    // believed active.
    fn play_music_if_enabled(&mut self) -> Vec<Effect> {
        if self.state.music_enabled && !self.state.music_active {
            self.state.music_active = true;
            vec![Effect::PlayMusic]
        } else {
            Vec::new()
        }
    }

    /// Immutable copy of the state plus derived statistics; never
    /// mutates.
    pub fn snapshot(&self, today: NaiveDate) -> Snapshot {
        Snapshot {
            seconds_remaining: self.state.seconds_remaining,
            running: self.state.running,
            phase: self.state.phase,
            completed_focus_count: self.state.completed_focus_count,
            today_count: self.stats.today_count(today),
            weekly_average: self.stats.weekly_average(),
            music_enabled: self.state.music_enabled,
            music_active: self.state.music_active,
            focus_session_length: self.state.focus_session_length,
        }
    }
}
