//! Application controller.
//!
//! Owns the active screen, the alarm table and the alarm sound, and glues
//! them together: button gestures open and drive the alarm editor, a
//! confirmed edit re-registers the alarm, and a fired alarm rings and
//! brings the clock face back.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::alarm::{Alarm, AlarmId, AlarmManager, AlarmSpec};
use crate::audio::Audio;
use crate::clock::{CivilDateTime, Network, TimeSource, WallClock};
use crate::error::Result;
use crate::settings::{AlarmConfig, AppConfig};
use crate::ui::{ButtonEvent, Canvas, ClockView, SetAlarmOutcome, SetAlarmView, Style};

/// Identity of the single user-configurable alarm.
pub const ALARM1: AlarmId = AlarmId("alarm1");

/// The screen currently shown.
pub enum Screen {
    Clock(ClockView),
    SetAlarm(SetAlarmView),
}

impl Screen {
    pub fn is_clock(&self) -> bool {
        matches!(self, Screen::Clock(_))
    }
}

pub struct App<P, D, N, W> {
    style: Style,
    config: AppConfig,
    screen: Screen,
    alarms: AlarmManager,
    audio: Audio<P, D>,
    time: TimeSource<N, W>,
    /// Local time as of the last [`App::refresh_time`].
    now: CivilDateTime,
    /// Config committed by the editor and not yet handed out for saving.
    saved: Option<AppConfig>,
}

impl<P, D, N, W> App<P, D, N, W>
where
    P: OutputPin,
    D: DelayNs,
    N: Network,
    W: WallClock,
{
    /// Start on the clock face and register alarm 1 if it is enabled.
    pub fn new(
        style: Style,
        config: AppConfig,
        audio: Audio<P, D>,
        mut time: TimeSource<N, W>,
    ) -> Result<Self> {
        let now = time.local_now();
        let mut app = Self {
            screen: Screen::Clock(ClockView::new(&style)),
            style,
            config,
            alarms: AlarmManager::new(),
            audio,
            time,
            now,
            saved: None,
        };
        app.register_alarm()?;
        Ok(app)
    }

    /// Re-read local time. Call once per tick before anything else.
    pub fn refresh_time(&mut self) -> CivilDateTime {
        self.now = self.time.local_now();
        self.now
    }

    /// Handle a gesture that made it past the dimmer.
    pub fn on_input(&mut self, event: ButtonEvent, now_ms: u32) -> Result<()> {
        // silencing the alarm wins over navigation
        if self.audio.is_playing(now_ms) {
            return self.audio.stop(now_ms);
        }

        match &mut self.screen {
            Screen::Clock(_) => {
                info!("Screen: set alarm");
                self.screen = Screen::SetAlarm(SetAlarmView::new(&self.style, self.config.alarm1));
            }
            Screen::SetAlarm(view) => {
                if let Some(outcome) = view.on_input(event) {
                    self.finish_edit(outcome)?;
                }
            }
        }
        Ok(())
    }

    /// Fire due alarms. Returns `true` if any alarm rang this tick.
    pub fn check_alarms(&mut self, now_ms: u32) -> Result<bool> {
        let fired = self.alarms.tick(self.now);
        if fired.is_empty() {
            return Ok(false);
        }

        for alarm in &fired {
            info!("Alarm {} fired (due {})", alarm.id, alarm.at);
        }
        self.audio.play(now_ms)?;
        self.show_clock();
        Ok(true)
    }

    /// Bring the panel up to date with the current screen.
    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        match &mut self.screen {
            Screen::Clock(view) => {
                view.set_time(self.now.hour(), self.now.minute());
                view.render(canvas)
            }
            Screen::SetAlarm(view) => view.render(canvas),
        }
    }

    /// Config committed since the last call, if it changed.
    pub fn take_saved_config(&mut self) -> Option<AppConfig> {
        self.saved.take()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn alarms(&self) -> &AlarmManager {
        &self.alarms
    }

    pub fn now(&self) -> CivilDateTime {
        self.now
    }

    pub fn is_ringing(&mut self, now_ms: u32) -> bool {
        self.audio.is_playing(now_ms)
    }

    pub fn time_source(&self) -> &TimeSource<N, W> {
        &self.time
    }

    pub fn time_source_mut(&mut self) -> &mut TimeSource<N, W> {
        &mut self.time
    }

    fn finish_edit(&mut self, outcome: SetAlarmOutcome) -> Result<()> {
        let edited: AlarmConfig = outcome.config();
        match outcome {
            SetAlarmOutcome::Configured(_) => info!("Alarm 1 configured: {}", edited),
            SetAlarmOutcome::Aborted(_) => info!("Alarm 1 edit left: {}", edited),
        }

        if edited != self.config.alarm1 {
            self.config.alarm1 = edited;
            self.saved = Some(self.config);
        }
        self.register_alarm()?;
        self.show_clock();
        Ok(())
    }

    fn register_alarm(&mut self) -> Result<()> {
        let AlarmConfig { hour, minute, enabled } = self.config.alarm1;
        if !enabled {
            self.alarms.cancel(ALARM1);
            return Ok(());
        }

        let spec = AlarmSpec::TimeOfDay { hour, minute, second: 0 };
        let alarm = Alarm::new(ALARM1, spec, true, self.now)?;
        self.alarms.add(alarm)
    }

    fn show_clock(&mut self) {
        if !self.screen.is_clock() {
            info!("Screen: clock");
            self.screen = Screen::Clock(ClockView::new(&self.style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::to_epoch;
    use crate::config::{AUDIO_DURATION_MS, UTC_OFFSET_S};
    use crate::testing::{NoDelay, Offline, RecordingCanvas, RecordingPin, SettableClock};
    use crate::ui::{ButtonAction, ButtonId};

    type TestApp = App<RecordingPin, NoDelay, Offline, SettableClock>;

    /// UTC epoch for a local wall time on 2024-01-15.
    fn utc_for_local(hour: u8, minute: u8, second: u8) -> i64 {
        to_epoch(CivilDateTime::new(2024, 1, 15, hour, minute, second).unwrap()) - UTC_OFFSET_S
    }

    fn app(config: AppConfig, clock: &SettableClock) -> TestApp {
        let audio = Audio::new(RecordingPin::default(), NoDelay::default()).unwrap();
        let time = TimeSource::new(Offline, clock.clone());
        App::new(Style::default(), config, audio, time).unwrap()
    }

    fn enabled(hour: u8, minute: u8) -> AppConfig {
        AppConfig { alarm1: AlarmConfig { hour, minute, enabled: true } }
    }

    fn click() -> ButtonEvent {
        ButtonEvent { button: ButtonId::PRIMARY, action: ButtonAction::Click }
    }

    fn long_press() -> ButtonEvent {
        ButtonEvent { button: ButtonId::PRIMARY, action: ButtonAction::LongPress }
    }

    #[test]
    fn starts_on_clock_with_alarm_registered_when_enabled() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let a = app(enabled(7, 30), &clock);
        assert!(a.screen().is_clock());
        let alarm = a.alarms().get(ALARM1).unwrap();
        assert_eq!((alarm.target().hour(), alarm.target().minute()), (7, 30));
        assert!(alarm.is_repeating());
    }

    #[test]
    fn disabled_alarm_is_not_registered() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let a = app(AppConfig::default(), &clock);
        assert!(a.alarms().is_empty());
    }

    #[test]
    fn input_on_clock_opens_editor() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let mut a = app(AppConfig::default(), &clock);
        a.on_input(click(), 0).unwrap();
        assert!(matches!(a.screen(), Screen::SetAlarm(_)));
    }

    #[test]
    fn confirming_edit_registers_alarm_and_reports_config() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let mut a = app(AppConfig::default(), &clock);

        a.on_input(click(), 0).unwrap();
        a.on_input(long_press(), 0).unwrap(); // hour
        a.on_input(long_press(), 0).unwrap(); // minute
        a.on_input(long_press(), 0).unwrap(); // on/off
        a.on_input(click(), 0).unwrap();
        a.on_input(long_press(), 0).unwrap(); // confirm

        assert!(a.screen().is_clock());
        assert!(a.config().alarm1.enabled);
        assert!(a.alarms().get(ALARM1).is_some());
        assert_eq!(a.take_saved_config(), Some(*a.config()));
        assert_eq!(a.take_saved_config(), None);
    }

    #[test]
    fn aborting_unchanged_edit_saves_nothing() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let mut a = app(enabled(7, 30), &clock);
        a.on_input(click(), 0).unwrap();
        a.on_input(click(), 0).unwrap();

        assert!(a.screen().is_clock());
        assert_eq!(a.take_saved_config(), None);
        assert!(a.alarms().get(ALARM1).is_some());
    }

    #[test]
    fn aborting_keeps_minute_not_offered_by_editor() {
        let clock = SettableClock::at(utc_for_local(5, 0, 0));
        let config = enabled(6, 45);
        let mut a = app(config, &clock);
        a.on_input(click(), 0).unwrap();
        a.on_input(click(), 0).unwrap();

        assert!(a.screen().is_clock());
        assert_eq!(*a.config(), config);
        assert_eq!(a.take_saved_config(), None);
        let alarm = a.alarms().get(ALARM1).unwrap();
        assert_eq!((alarm.target().hour(), alarm.target().minute()), (6, 45));
    }

    #[test]
    fn confirming_without_spinning_minute_keeps_it() {
        let clock = SettableClock::at(utc_for_local(5, 0, 0));
        let mut a = app(enabled(6, 45), &clock);

        a.on_input(click(), 0).unwrap();
        a.on_input(long_press(), 0).unwrap(); // hour
        a.on_input(click(), 0).unwrap(); // 06 -> 07
        a.on_input(long_press(), 0).unwrap(); // minute
        a.on_input(long_press(), 0).unwrap(); // on/off
        a.on_input(long_press(), 0).unwrap(); // confirm

        assert_eq!(a.config().alarm1, AlarmConfig { hour: 7, minute: 45, enabled: true });
        assert_eq!(a.take_saved_config(), Some(enabled(7, 45)));
        let alarm = a.alarms().get(ALARM1).unwrap();
        assert_eq!((alarm.target().hour(), alarm.target().minute()), (7, 45));
    }

    #[test]
    fn disabling_cancels_alarm() {
        let clock = SettableClock::at(utc_for_local(6, 0, 0));
        let mut a = app(enabled(7, 30), &clock);

        a.on_input(click(), 0).unwrap();
        for _ in 0..3 {
            a.on_input(long_press(), 0).unwrap();
        }
        a.on_input(click(), 0).unwrap(); // on -> off
        a.on_input(long_press(), 0).unwrap();

        assert!(!a.config().alarm1.enabled);
        assert!(a.alarms().is_empty());
    }

    #[test]
    fn alarm_rings_and_returns_to_clock() {
        let clock = SettableClock::at(utc_for_local(7, 29, 59));
        let mut a = app(enabled(7, 30), &clock);
        a.on_input(click(), 0).unwrap();
        assert!(!a.screen().is_clock());

        assert!(!a.check_alarms(0).unwrap());

        clock.set(utc_for_local(7, 30, 0));
        a.refresh_time();
        assert!(a.check_alarms(1000).unwrap());
        assert!(a.screen().is_clock());
        assert!(a.is_ringing(1000));

        // rescheduled for tomorrow, so it does not ring again
        assert!(!a.check_alarms(1010).unwrap());
        assert_eq!(a.alarms().get(ALARM1).unwrap().target().day(), 16);
    }

    #[test]
    fn input_while_ringing_only_silences() {
        let clock = SettableClock::at(utc_for_local(7, 29, 59));
        let mut a = app(enabled(7, 30), &clock);
        clock.set(utc_for_local(7, 30, 0));
        a.refresh_time();
        a.check_alarms(0).unwrap();

        a.on_input(click(), 100).unwrap();
        assert!(!a.is_ringing(100));
        assert!(a.screen().is_clock());

        a.on_input(click(), 200).unwrap();
        assert!(matches!(a.screen(), Screen::SetAlarm(_)));
    }

    #[test]
    fn ringing_times_out_by_itself() {
        let clock = SettableClock::at(utc_for_local(7, 29, 59));
        let mut a = app(enabled(7, 30), &clock);
        clock.set(utc_for_local(7, 30, 0));
        a.refresh_time();
        a.check_alarms(0).unwrap();
        assert!(!a.is_ringing(AUDIO_DURATION_MS));

        a.on_input(click(), AUDIO_DURATION_MS).unwrap();
        assert!(matches!(a.screen(), Screen::SetAlarm(_)));
    }

    #[test]
    fn clock_face_shows_local_time() {
        let clock = SettableClock::at(utc_for_local(9, 5, 0));
        let style = Style::default();
        let mut a = app(AppConfig::default(), &clock);
        let mut canvas = RecordingCanvas::default();
        a.render(&mut canvas).unwrap();
        assert_eq!(canvas.texts_in(style.color), ["09:05"]);

        clock.set(utc_for_local(9, 6, 0));
        a.refresh_time();
        a.render(&mut canvas).unwrap();
        assert_eq!(canvas.texts_in(style.background), ["09:05"]);
        assert_eq!(canvas.texts_in(style.color), ["09:05", "09:06"]);
    }
}
