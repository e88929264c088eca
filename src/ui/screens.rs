//! The two screens of the clock: the time face and the alarm editor.

use core::fmt::Write;

use embedded_graphics::primitives::Rectangle;

use super::display::Canvas;
use super::widgets::{union, Container, Label, Spinner, TextView, Underline, Widget};
use super::{ButtonAction, ButtonEvent, Style};
use crate::error::Result;
use crate::settings::AlarmConfig;

fn two_digits(value: u8) -> Label {
    let mut label = Label::new();
    // two digits always fit
    let _ = write!(label, "{:02}", value);
    label
}

// ClockView

/// Large `HH:MM` readout.
pub struct ClockView {
    container: Container<TextView>,
}

impl ClockView {
    pub fn new(style: &Style) -> Self {
        Self {
            container: Container::new(style, TextView::new(style.text(10, 50, 4))),
        }
    }

    pub fn set_time(&mut self, hour: u8, minute: u8) {
        let mut text = Label::new();
        let _ = write!(text, "{:02}:{:02}", hour, minute);
        self.container.children_mut().set_text(&text);
    }

    pub fn text(&self) -> &str {
        self.container.children().text()
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.container.render(canvas)
    }

    pub fn invalidate(&mut self) {
        self.container.invalidate();
    }
}

// SetAlarmView

/// Which field of the alarm editor receives clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Focus {
    #[default]
    None,
    Hour,
    Minute,
    OnOff,
}

/// How an editing session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetAlarmOutcome {
    /// Long press on the last field confirmed the edit.
    Configured(AlarmConfig),
    /// Click with nothing focused left the editor.
    Aborted(AlarmConfig),
}

impl SetAlarmOutcome {
    pub fn config(&self) -> AlarmConfig {
        match *self {
            SetAlarmOutcome::Configured(config) | SetAlarmOutcome::Aborted(config) => config,
        }
    }
}

/// Widgets of the alarm editor, in paint order.
pub struct SetAlarmFields {
    title: TextView,
    hour: Underline<Spinner<u8, 24>>,
    colon: TextView,
    minute: Underline<Spinner<u8, 6>>,
    on_off: Underline<Spinner<bool, 2>>,
}

impl SetAlarmFields {
    fn new(style: &Style, config: &AlarmConfig) -> Self {
        let title = TextView::with_text(style.text(10, 10, 1), "Set Alarm 1");

        let hours = (0..24).map(|h| (two_digits(h), h));
        let hour: Spinner<u8, 24> = Spinner::new(style.text(10, 50, 4), hours, Some(config.hour));
        let colon_left = 10 + hour.bounds().size.width as i32;
        let colon = TextView::with_text(style.text(colon_left, 50, 4), ":");

        let minute_left = colon_left + colon.bounds().size.width as i32;
        let minutes = (0..60).step_by(10).map(|m| (two_digits(m), m));
        let minute: Spinner<u8, 6> = Spinner::new(style.text(minute_left, 50, 4), minutes, Some(config.minute));

        let switch = [(label("On "), true), (label("Off"), false)];
        let on_off: Spinner<bool, 2> = Spinner::new(style.text(10, 100, 1), switch, Some(config.enabled));

        Self {
            title,
            hour: Underline::new(*style, hour, false),
            colon,
            minute: Underline::new(*style, minute, false),
            on_off: Underline::new(*style, on_off, false),
        }
    }

    fn show_focus(&mut self, focus: Focus) {
        self.hour.set_underline(focus == Focus::Hour);
        self.minute.set_underline(focus == Focus::Minute);
        self.on_off.set_underline(focus == Focus::OnOff);
    }

    pub fn hour(&self) -> &Underline<Spinner<u8, 24>> {
        &self.hour
    }

    pub fn minute(&self) -> &Underline<Spinner<u8, 6>> {
        &self.minute
    }

    pub fn on_off(&self) -> &Underline<Spinner<bool, 2>> {
        &self.on_off
    }
}

fn label(text: &str) -> Label {
    let mut label = Label::new();
    let _ = label.push_str(text);
    label
}

impl Widget for SetAlarmFields {
    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.title.render(canvas)?;
        self.hour.render(canvas)?;
        self.colon.render(canvas)?;
        self.minute.render(canvas)?;
        self.on_off.render(canvas)
    }

    fn bounds(&self) -> Rectangle {
        [
            self.hour.bounds(),
            self.colon.bounds(),
            self.minute.bounds(),
            self.on_off.bounds(),
        ]
        .into_iter()
        .fold(self.title.bounds(), union)
    }

    fn invalidate(&mut self) {
        self.title.invalidate();
        self.hour.invalidate();
        self.colon.invalidate();
        self.minute.invalidate();
        self.on_off.invalidate();
    }
}

/// Alarm editor. Long press walks the focus through hour, minute and
/// on/off and then confirms; click spins the focused field.
///
/// Only fields that were spun take the spinner's value. A stored value
/// that is not among the options (e.g. minute 45) survives untouched
/// unless the user spins that field.
pub struct SetAlarmView {
    fields: Container<SetAlarmFields>,
    focus: Focus,
    /// Config the editor was opened with, returned on abort.
    original: AlarmConfig,
    config: AlarmConfig,
}

impl SetAlarmView {
    pub fn new(style: &Style, config: AlarmConfig) -> Self {
        let fields = SetAlarmFields::new(style, &config);
        Self {
            fields: Container::new(style, fields),
            focus: Focus::None,
            original: config,
            config,
        }
    }

    /// Handle a gesture. Returns `Some` when the editing session is over.
    pub fn on_input(&mut self, event: ButtonEvent) -> Option<SetAlarmOutcome> {
        match event.action {
            ButtonAction::LongPress => {
                let (next, outcome) = match self.focus {
                    Focus::None => (Focus::Hour, None),
                    Focus::Hour => (Focus::Minute, None),
                    Focus::Minute => (Focus::OnOff, None),
                    Focus::OnOff => {
                        self.original = self.config;
                        (Focus::None, Some(SetAlarmOutcome::Configured(self.config)))
                    }
                };
                debug!("alarm editor focus {:?}", next);
                self.focus = next;
                self.fields.children_mut().show_focus(next);
                outcome
            }
            ButtonAction::Click => {
                let fields = self.fields.children_mut();
                match self.focus {
                    Focus::None => return Some(SetAlarmOutcome::Aborted(self.original)),
                    Focus::Hour => {
                        if let Some(hour) = fields.hour.child_mut().spin() {
                            self.config.hour = hour;
                        }
                    }
                    Focus::Minute => {
                        if let Some(minute) = fields.minute.child_mut().spin() {
                            self.config.minute = minute;
                        }
                    }
                    Focus::OnOff => {
                        if let Some(enabled) = fields.on_off.child_mut().spin() {
                            self.config.enabled = enabled;
                        }
                    }
                }
                None
            }
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn config(&self) -> AlarmConfig {
        self.config
    }

    pub fn fields(&self) -> &SetAlarmFields {
        self.fields.children()
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.fields.render(canvas)
    }

    pub fn invalidate(&mut self) {
        self.fields.invalidate();
    }
}
