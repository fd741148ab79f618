use std::io;
use std::process::Command;

use tracing::{debug, warn};

use crate::config::{PrefsStore, Preferences};

pub const NOTIFICATION_TITLE: &str = "MindfulMinutes";
pub const NOTIFICATION_ICON: &str = "mindful-pomodoro";

pub const FOCUS_COMPLETE_MESSAGE: &str = "Focus session completed! Time for a 5-minute break.";
pub const BREAK_OVER_MESSAGE: &str = "Break time over! Ready for another focus session?";

/// Side effect requested by a state transition. Transitions stay pure by
/// returning these instead of touching collaborators directly; the
/// [`EffectRunner`] performs them fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(&'static str),
    PlayMusic,
    StopMusic,
    SaveDefaultFocusTime(u32),
}

/// Desktop notification emitter. Failures are logged by the runner and
/// never fed back into the timer.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, icon: &str) -> io::Result<()>;
}

/// Ambient music playback. Implementations must tolerate `stop` without a
/// preceding `play`; the timer guards against duplicate `play` calls.
pub trait MusicPlayer {
    fn play(&self, url: &str) -> io::Result<()>;
    fn stop(&self) -> io::Result<()>;
}

/// Notifier that shells out to `notify-send`, spawned without waiting.
#[derive(Debug, Default)]
pub struct NotifySend;

impl Notifier for NotifySend {
    fn notify(&self, title: &str, message: &str, icon: &str) -> io::Result<()> {
        Command::new("notify-send")
            .arg("--app-name")
            .arg(title)
            .arg("--icon")
            .arg(icon)
            .arg(title)
            .arg(message)
            .spawn()
            .map(|_| ())
    }
}

/// Plays music by opening the configured URL in the default browser. The
/// tab is not ours to close, so `stop` is a best-effort no-op.
#[derive(Debug, Default)]
pub struct BrowserMusicPlayer;

impl MusicPlayer for BrowserMusicPlayer {
    fn play(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }

    fn stop(&self) -> io::Result<()> {
        debug!("browser playback cannot be stopped remotely; leaving the tab to the user");
        Ok(())
    }
}

/// Executes effects against the collaborators. Every arm is
/// fire-and-forget: a failed notification or playback attempt is logged
/// and the state transition that requested it stands.
pub struct EffectRunner<S: PrefsStore> {
    notifier: Box<dyn Notifier>,
    player: Box<dyn MusicPlayer>,
    prefs: S,
}

impl<S: PrefsStore> EffectRunner<S> {
    pub fn new(notifier: Box<dyn Notifier>, player: Box<dyn MusicPlayer>, prefs: S) -> Self {
        Self {
            notifier,
            player,
            prefs,
        }
    }

    pub fn run(&self, effects: &[Effect]) {
        for effect in effects {
            self.run_one(effect);
        }
    }

    fn run_one(&self, effect: &Effect) {
        match effect {
            Effect::Notify(message) => {
                if let Err(e) = self
                    .notifier
                    .notify(NOTIFICATION_TITLE, message, NOTIFICATION_ICON)
                {
                    warn!("notification failed: {e}");
                }
            }
            Effect::PlayMusic => {
                // The URL is read at play time so a preference edit
                // applies to the next play.
                let url = self.prefs.load().music_url;
                if url.is_empty() {
                    debug!("music enabled but no music URL configured; skipping playback");
                } else if let Err(e) = self.player.play(&url) {
                    warn!("music playback failed: {e}");
                }
            }
            Effect::StopMusic => {
                if let Err(e) = self.player.stop() {
                    warn!("stopping music failed: {e}");
                }
            }
            Effect::SaveDefaultFocusTime(seconds) => {
                let prefs = Preferences {
                    default_focus_time: *seconds,
                    ..self.prefs.load()
                };
                if let Err(e) = self.prefs.save(&prefs) {
                    warn!("saving default focus time failed: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilePrefsStore;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recording {
        notifications: RefCell<Vec<String>>,
        plays: RefCell<Vec<String>>,
        stops: RefCell<u32>,
    }

    struct RecordingNotifier<'a>(&'a Recording);

    impl Notifier for RecordingNotifier<'_> {
        fn notify(&self, _title: &str, message: &str, _icon: &str) -> io::Result<()> {
            self.0.notifications.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    struct RecordingPlayer<'a>(&'a Recording);

    impl MusicPlayer for RecordingPlayer<'_> {
        fn play(&self, url: &str) -> io::Result<()> {
            self.0.plays.borrow_mut().push(url.to_string());
            Ok(())
        }

        fn stop(&self) -> io::Result<()> {
            *self.0.stops.borrow_mut() += 1;
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _: &str, _: &str, _: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no notify daemon"))
        }
    }

    fn store_with_url(dir: &tempfile::TempDir, url: &str) -> FilePrefsStore {
        let store = FilePrefsStore::with_path(dir.path().join("prefs.json"));
        let prefs = Preferences {
            music_url: url.to_string(),
            ..Preferences::default()
        };
        store.save(&prefs).unwrap();
        store
    }

    #[test]
    fn test_notify_effect_reaches_notifier() {
        let dir = tempdir().unwrap();
        let rec: &'static Recording = Box::leak(Box::new(Recording::default()));
        let runner = EffectRunner::new(
            Box::new(RecordingNotifier(rec)),
            Box::new(RecordingPlayer(rec)),
            store_with_url(&dir, ""),
        );

        runner.run(&[Effect::Notify(FOCUS_COMPLETE_MESSAGE)]);
        assert_eq!(
            rec.notifications.borrow().as_slice(),
            &[FOCUS_COMPLETE_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_play_music_uses_configured_url() {
        let dir = tempdir().unwrap();
        let rec: &'static Recording = Box::leak(Box::new(Recording::default()));
        let runner = EffectRunner::new(
            Box::new(RecordingNotifier(rec)),
            Box::new(RecordingPlayer(rec)),
            store_with_url(&dir, "https://example.com/lofi"),
        );

        runner.run(&[Effect::PlayMusic, Effect::StopMusic]);
        assert_eq!(
            rec.plays.borrow().as_slice(),
            &["https://example.com/lofi".to_string()]
        );
        assert_eq!(*rec.stops.borrow(), 1);
    }

    #[test]
    fn test_play_music_without_url_is_skipped() {
        let dir = tempdir().unwrap();
        let rec: &'static Recording = Box::leak(Box::new(Recording::default()));
        let runner = EffectRunner::new(
            Box::new(RecordingNotifier(rec)),
            Box::new(RecordingPlayer(rec)),
            store_with_url(&dir, ""),
        );

        runner.run(&[Effect::PlayMusic]);
        assert!(rec.plays.borrow().is_empty());
    }

    #[test]
    fn test_save_default_focus_time_preserves_other_prefs() {
        let dir = tempdir().unwrap();
        let rec: &'static Recording = Box::leak(Box::new(Recording::default()));
        let store = store_with_url(&dir, "https://example.com/lofi");
        let runner = EffectRunner::new(
            Box::new(RecordingNotifier(rec)),
            Box::new(RecordingPlayer(rec)),
            store,
        );

        runner.run(&[Effect::SaveDefaultFocusTime(600)]);

        let reloaded = FilePrefsStore::with_path(dir.path().join("prefs.json")).load();
        assert_eq!(reloaded.default_focus_time, 600);
        assert_eq!(reloaded.music_url, "https://example.com/lofi");
    }

    #[test]
    fn test_notifier_failure_does_not_panic() {
        let dir = tempdir().unwrap();
        let rec: &'static Recording = Box::leak(Box::new(Recording::default()));
        let runner = EffectRunner::new(
            Box::new(FailingNotifier),
            Box::new(RecordingPlayer(rec)),
            store_with_url(&dir, ""),
        );

        runner.run(&[Effect::Notify(BREAK_OVER_MESSAGE)]);
    }
}
