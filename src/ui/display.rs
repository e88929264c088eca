//! Drawing seam between widgets and the TFT driver.
//!
//! Widgets only need three primitives: clear, text and horizontal line.
//! [`GraphicsCanvas`] provides them on top of any `embedded-graphics`
//! RGB565 draw target, drawing scaled text by blowing each font pixel up
//! into a `scale x scale` block.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::error::{Error, Result};

/// Minimal display driver interface used by the view tree.
pub trait Canvas {
    /// Fill the whole screen.
    fn clear(&mut self, color: Rgb565) -> Result<()>;

    /// Draw `text` with its top-left corner at `origin`. Only glyph
    /// pixels are painted, so redrawing in the background colour erases.
    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &'static MonoFont<'static>,
        color: Rgb565,
        scale: u8,
    ) -> Result<()>;

    /// One-pixel horizontal line of `length` pixels starting at `origin`.
    fn draw_hline(&mut self, origin: Point, length: u32, color: Rgb565) -> Result<()>;
}

/// [`Canvas`] over an `embedded-graphics` draw target.
pub struct GraphicsCanvas<D> {
    target: D,
}

impl<D> GraphicsCanvas<D> {
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D: DrawTarget<Color = Rgb565>> Canvas for GraphicsCanvas<D> {
    fn clear(&mut self, color: Rgb565) -> Result<()> {
        self.target.clear(color).map_err(|_| Error::Display)
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        font: &'static MonoFont<'static>,
        color: Rgb565,
        scale: u8,
    ) -> Result<()> {
        let style = MonoTextStyle::new(font, color);
        let text = Text::with_baseline(text, origin, style, Baseline::Top);

        if scale <= 1 {
            text.draw(&mut self.target).map_err(|_| Error::Display)?;
        } else {
            let mut scaled = Scaled {
                inner: &mut self.target,
                origin,
                scale: u32::from(scale),
            };
            text.draw(&mut scaled).map_err(|_| Error::Display)?;
        }
        Ok(())
    }

    fn draw_hline(&mut self, origin: Point, length: u32, color: Rgb565) -> Result<()> {
        if length == 0 {
            return Ok(());
        }
        let end = origin + Point::new(length as i32 - 1, 0);
        Line::new(origin, end)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .map_err(|_| Error::Display)
    }
}

/// Draw target that magnifies everything around `origin`.
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D: DrawTarget> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.inner.bounding_box()
    }
}

impl<D: DrawTarget> DrawTarget for Scaled<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new(self.scale, self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + (point - self.origin) * self.scale as i32;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    #[test]
    fn hline_spans_length() {
        let mut canvas = GraphicsCanvas::new(MockDisplay::<Rgb565>::new());
        canvas.draw_hline(Point::new(2, 3), 4, Rgb565::RED).unwrap();
        canvas.draw_hline(Point::new(0, 0), 0, Rgb565::RED).unwrap();

        let drawn = canvas.target().affected_area();
        assert_eq!(drawn, Rectangle::new(Point::new(2, 3), Size::new(4, 1)));
    }

    #[test]
    fn scaled_text_covers_scaled_cell() {
        let mut canvas = GraphicsCanvas::new(MockDisplay::<Rgb565>::new());
        canvas
            .draw_text(Point::new(0, 0), "|", &FONT_6X10, Rgb565::WHITE, 3)
            .unwrap();

        let area = canvas.target().affected_area();
        assert!(area.size.height > 10);
        assert_eq!(area.size.width % 3, 0);
        assert!(area.top_left.x + area.size.width as i32 <= 18);
        assert!(area.top_left.y + area.size.height as i32 <= 30);
    }
}
