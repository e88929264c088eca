//! View-tree building blocks.
//!
//! Every node redraws incrementally: a [`TextView`] only touches the panel
//! when its text changed, an [`Underline`] only when its flag flipped, and
//! a [`Container`] clears the screen once. Nothing here allocates.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::{String, Vec};

use super::display::Canvas;
use super::input_logic::select_next_wrapping;
use super::{ButtonEvent, Style, TextStyle};
use crate::config::TEXT_CAPACITY;
use crate::error::Result;

/// A node of the view tree.
pub trait Widget {
    /// Deliver a button gesture. Leaves ignore it by default.
    fn on_input(&mut self, _event: ButtonEvent) {}

    /// Bring the panel up to date with this node's state.
    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()>;

    /// Area covered by the node's current content.
    fn bounds(&self) -> Rectangle;

    /// Forget what was drawn so the next render repaints everything.
    fn invalidate(&mut self) {}
}

/// Smallest rectangle covering both `a` and `b`.
pub fn union(a: Rectangle, b: Rectangle) -> Rectangle {
    if a.is_zero_sized() {
        return b;
    }
    if b.is_zero_sized() {
        return a;
    }
    let left = a.top_left.x.min(b.top_left.x);
    let top = a.top_left.y.min(b.top_left.y);
    let right = (a.top_left.x + a.size.width as i32).max(b.top_left.x + b.size.width as i32);
    let bottom = (a.top_left.y + a.size.height as i32).max(b.top_left.y + b.size.height as i32);
    Rectangle::new(
        Point::new(left, top),
        Size::new((right - left) as u32, (bottom - top) as u32),
    )
}

// TextView

pub type Text = String<TEXT_CAPACITY>;

/// Single line of text at a fixed anchor.
pub struct TextView {
    style: TextStyle,
    text: Text,
    rendered: Text,
}

impl TextView {
    pub fn new(style: TextStyle) -> Self {
        Self {
            style,
            text: Text::new(),
            rendered: Text::new(),
        }
    }

    pub fn with_text(style: TextStyle, text: &str) -> Self {
        let mut view = Self::new(style);
        view.set_text(text);
        view
    }

    /// Replace the desired text. Characters beyond the label capacity
    /// are dropped.
    pub fn set_text(&mut self, text: &str) {
        if self.text.as_str() == text {
            return;
        }
        self.text.clear();
        for c in text.chars() {
            if self.text.push(c).is_err() {
                warn!("label truncated to {=usize} bytes", TEXT_CAPACITY);
                break;
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text currently on the panel.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.rendered
    }
}

impl Widget for TextView {
    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        if !self.is_dirty() {
            return Ok(());
        }

        let TextStyle { style, origin, scale } = self.style;
        if !self.rendered.is_empty() {
            canvas.draw_text(origin, &self.rendered, style.font, style.background, scale)?;
        }
        if !self.text.is_empty() {
            canvas.draw_text(origin, &self.text, style.font, style.color, scale)?;
        }
        self.rendered = self.text.clone();
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        let font = self.style.style.font;
        let scale = u32::from(self.style.scale);
        let advance = font.character_size.width + font.character_spacing;
        let chars = self.text.chars().count() as u32;
        Rectangle::new(
            self.style.origin,
            Size::new(advance * scale * chars, font.character_size.height * scale),
        )
    }

    fn invalidate(&mut self) {
        self.rendered.clear();
    }
}

// Spinner

pub type Label = String<8>;

/// Cycles through a fixed list of labelled values on every input.
pub struct Spinner<T, const N: usize> {
    text: TextView,
    options: Vec<(Label, T), N>,
    selected: usize,
}

impl<T: Copy + PartialEq, const N: usize> Spinner<T, N> {
    /// Build a spinner showing `initial`. If `initial` is not one of the
    /// options, the first option is shown instead.
    pub fn new<I>(style: TextStyle, options: I, initial: Option<T>) -> Self
    where
        I: IntoIterator<Item = (Label, T)>,
    {
        let mut list = Vec::new();
        for option in options {
            if list.push(option).is_err() {
                warn!("spinner holds at most {=usize} options", N);
                break;
            }
        }

        let selected = match initial {
            Some(value) => match list.iter().position(|(_, v)| *v == value) {
                Some(index) => index,
                None => {
                    warn!("spinner initial value not among options, using first");
                    0
                }
            },
            None => 0,
        };

        let mut spinner = Self {
            text: TextView::new(style),
            options: list,
            selected,
        };
        spinner.show_selected();
        spinner
    }

    /// Advance to the next option, wrapping after the last one, and
    /// return the newly selected value.
    pub fn spin(&mut self) -> Option<T> {
        if self.options.is_empty() {
            return None;
        }
        self.selected = select_next_wrapping(self.selected, self.options.len());
        self.show_selected();
        self.selected_value()
    }

    pub fn selected_value(&self) -> Option<T> {
        self.options.get(self.selected).map(|(_, value)| *value)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn text_view(&self) -> &TextView {
        &self.text
    }

    fn show_selected(&mut self) {
        if let Some((label, _)) = self.options.get(self.selected) {
            self.text.set_text(label);
        }
    }
}

impl<T: Copy + PartialEq, const N: usize> Widget for Spinner<T, N> {
    fn on_input(&mut self, _event: ButtonEvent) {
        self.spin();
    }

    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.text.render(canvas)
    }

    fn bounds(&self) -> Rectangle {
        self.text.bounds()
    }

    fn invalidate(&mut self) {
        self.text.invalidate();
    }
}

// Underline

/// Focus indicator: a line under `child` that can be toggled.
pub struct Underline<W> {
    child: W,
    style: Style,
    underline: bool,
    rendered: bool,
}

impl<W: Widget> Underline<W> {
    pub fn new(style: Style, child: W, underline: bool) -> Self {
        Self {
            child,
            style,
            underline,
            rendered: false,
        }
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    pub fn child(&self) -> &W {
        &self.child
    }

    pub fn child_mut(&mut self) -> &mut W {
        &mut self.child
    }
}

impl<W: Widget> Widget for Underline<W> {
    fn on_input(&mut self, event: ButtonEvent) {
        self.child.on_input(event);
    }

    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.child.render(canvas)?;

        if self.rendered == self.underline {
            return Ok(());
        }

        let area = self.child.bounds();
        let color: Rgb565 = if self.underline {
            self.style.color
        } else {
            self.style.background
        };
        let start = Point::new(area.top_left.x, area.top_left.y + area.size.height as i32);
        canvas.draw_hline(start, area.size.width, color)?;
        self.rendered = self.underline;
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        let area = self.child.bounds();
        // one extra row for the line itself
        Rectangle::new(area.top_left, area.size + Size::new(0, 1))
    }

    fn invalidate(&mut self) {
        self.child.invalidate();
        self.rendered = false;
    }
}

// Container

/// Paints the background once, then leaves drawing to its children.
pub struct Container<W> {
    background: Rgb565,
    needs_paint: bool,
    children: W,
}

impl<W: Widget> Container<W> {
    pub fn new(style: &Style, children: W) -> Self {
        Self {
            background: style.background,
            needs_paint: true,
            children,
        }
    }

    pub fn children(&self) -> &W {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut W {
        &mut self.children
    }
}

impl<W: Widget> Widget for Container<W> {
    fn on_input(&mut self, event: ButtonEvent) {
        self.children.on_input(event);
    }

    fn render(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        if self.needs_paint {
            canvas.clear(self.background)?;
            self.needs_paint = false;
        }
        self.children.render(canvas)
    }

    fn bounds(&self) -> Rectangle {
        self.children.bounds()
    }

    fn invalidate(&mut self) {
        self.needs_paint = true;
        self.children.invalidate();
    }
}
