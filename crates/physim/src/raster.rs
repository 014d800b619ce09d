//! Off-screen raster output.
//!
//! [`Canvas`] wraps a [`tiny_skia::Pixmap`] and exposes the handful of
//! primitives the simulations need: thick lines, filled polygons and
//! circles. Text is not rasterised; a [`Frame`] carries its [`Label`]s next
//! to the canvas so the presenting layer can typeset them with its own fonts.
//!
//! Snapshots are encoded with the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageResult, RgbImage};
use tiny_skia::{
    Color, FillRule, LineCap, Paint, Path as SkPath, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::sim::Dimensions;
use crate::vector::Vec2;

/// Coordinates are clamped to this distance from the origin before
/// rasterising. tiny-skia drops paths whose bounds overflow its fixed-point
/// range.
const COORD_LIMIT: f64 = 1.0e6;

/// An RGB colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.r, self.g, self.b, 255);
        paint.anti_alias = false;
        paint
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, 255)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

/// An opaque RGB raster, origin top-left.
///
/// Drawing is aliased so every pixel holds exactly one of the colours
/// drawn. Shapes outside the canvas are clipped; non-finite coordinates
/// skip the shape.
///
/// # Example
///
/// ```rust
/// use physim::{Canvas, Dimensions, Rgb, Vec2};
///
/// let mut canvas = Canvas::new(Dimensions::new(20, 10)?);
/// canvas.fill(Rgb::WHITE);
/// canvas.line(Vec2::new(0.0, 5.0), Vec2::new(19.0, 5.0), 1, Rgb::BLACK);
///
/// assert_eq!(canvas.pixel(10, 5), Some(Rgb::BLACK));
/// assert_eq!(canvas.pixel(10, 0), Some(Rgb::WHITE));
/// assert_eq!(canvas.pixel(20, 0), None);
/// # Ok::<(), physim::PhysicsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Creates a black canvas.
    ///
    /// # Panics
    ///
    /// Only if `dimensions` exceed [`MAX_SIDE`](crate::MAX_SIDE), which
    /// [`Dimensions::new`] rules out.
    pub fn new(dimensions: Dimensions) -> Self {
        let mut pixmap = Pixmap::new(dimensions.width(), dimensions.height())
            .expect("validated dimensions should always fit a pixmap");
        pixmap.fill(Rgb::BLACK.into());
        Self { pixmap }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The backing pixmap.
    #[inline]
    pub const fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Colour at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixmap
            .pixel(x, y)
            .map(|p| Rgb::new(p.red(), p.green(), p.blue()))
    }

    /// Number of pixels with exactly `color`.
    pub fn count(&self, color: Rgb) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .filter(|p| Rgb::new(p.red(), p.green(), p.blue()) == color)
            .count()
    }

    /// Paints every pixel.
    pub fn fill(&mut self, color: Rgb) {
        self.pixmap.fill(color.into());
    }

    /// Draws a line with square caps `thickness` pixels wide.
    pub fn line(&mut self, from: Vec2, to: Vec2, thickness: u32, color: Rgb) {
        self.polyline(&[from, to], thickness, color);
    }

    /// Draws connected line segments through `points`.
    pub fn polyline(&mut self, points: &[Vec2], thickness: u32, color: Rgb) {
        if let Some(path) = open_path(points) {
            self.stroke(&path, f64::from(thickness.max(1)), color);
        }
    }

    /// Fills a polygon with the even-odd rule.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let Some(mut builder) = start_path(points) else {
            return;
        };
        builder.close();
        if let Some(path) = builder.finish() {
            self.pixmap.fill_path(
                &path,
                &color.paint(),
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }
    }

    /// Fills a disc.
    pub fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgb) {
        if let Some(path) = circle_path(center, radius) {
            self.pixmap.fill_path(
                &path,
                &color.paint(),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Draws a circle outline `thickness` pixels wide, inside the radius.
    pub fn circle_outline(&mut self, center: Vec2, radius: f64, thickness: u32, color: Rgb) {
        let width = f64::from(thickness.max(1)).min(radius);
        if let Some(path) = circle_path(center, radius - width / 2.0) {
            self.stroke(&path, width, color);
        }
    }

    fn stroke(&mut self, path: &SkPath, width: f64, color: Rgb) {
        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Square,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &color.paint(), &stroke, Transform::identity(), None);
    }

    /// Copies the canvas into an [`RgbImage`].
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            self.pixel(x, y).unwrap_or_default().into()
        })
    }

    /// Writes the canvas as a binary PPM (P6) image.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `writer`.
    pub fn write_ppm<W: Write>(&self, writer: W) -> ImageResult<()> {
        let image = self.to_rgb_image();
        PnmEncoder::new(writer)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
    }

    /// Saves the canvas to `path` as `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or encoding fails.
    pub fn save(&self, path: &Path, format: SnapshotFormat) -> ImageResult<()> {
        match format {
            SnapshotFormat::Png => self.to_rgb_image().save_with_format(path, ImageFormat::Png),
            SnapshotFormat::Ppm => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_ppm(&mut writer)?;
                writer.flush()?;
                Ok(())
            }
        }
    }
}

/// Image formats a [`Canvas`] can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotFormat {
    /// Portable Network Graphics.
    Png,
    /// Binary portable pixmap (P6).
    Ppm,
}

impl SnapshotFormat {
    /// Format named by the file extension of `path`, ignoring case.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use physim::SnapshotFormat;
    ///
    /// assert_eq!(SnapshotFormat::from_path(Path::new("out/frame.PNG")), Some(SnapshotFormat::Png));
    /// assert_eq!(SnapshotFormat::from_path(Path::new("frame.ppm")), Some(SnapshotFormat::Ppm));
    /// assert_eq!(SnapshotFormat::from_path(Path::new("frame.jpg")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(Self::Png),
            "ppm" => Some(Self::Ppm),
            _ => None,
        }
    }
}

fn point(v: Vec2) -> Option<(f32, f32)> {
    if !v.is_finite() {
        return None;
    }
    Some((
        v.x.clamp(-COORD_LIMIT, COORD_LIMIT) as f32,
        v.y.clamp(-COORD_LIMIT, COORD_LIMIT) as f32,
    ))
}

fn start_path(points: &[Vec2]) -> Option<PathBuilder> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    let (x, y) = point(*first)?;
    builder.move_to(x, y);
    for p in rest {
        let (x, y) = point(*p)?;
        builder.line_to(x, y);
    }
    Some(builder)
}

fn open_path(points: &[Vec2]) -> Option<SkPath> {
    if points.len() < 2 {
        return None;
    }
    start_path(points)?.finish()
}

fn circle_path(center: Vec2, radius: f64) -> Option<SkPath> {
    let (x, y) = point(center)?;
    if radius <= 0.0 || !radius.is_finite() {
        return None;
    }
    PathBuilder::from_circle(x, y, radius as f32)
}

/// A line of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// The text.
    pub text: String,
}

impl Label {
    /// Creates a label.
    pub fn new(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }
}

/// What `draw` produces: the raster plus the text to overlay on it.
#[derive(Debug, Clone)]
pub struct Frame {
    canvas: Canvas,
    labels: Vec<Label>,
}

impl Frame {
    /// Creates an empty frame.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            canvas: Canvas::new(dimensions),
            labels: Vec::new(),
        }
    }

    /// Clears the canvas to `background` and drops all labels.
    pub fn clear(&mut self, background: Rgb) {
        self.canvas.fill(background);
        self.labels.clear();
    }

    /// Adds a text label.
    pub fn label(&mut self, x: i32, y: i32, text: impl Into<String>) {
        self.labels.push(Label::new(x, y, text));
    }

    /// The raster.
    #[inline]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable access to the raster.
    #[inline]
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// The text labels, in drawing order.
    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn canvas(w: u32, h: u32) -> Canvas {
        let mut c = Canvas::new(Dimensions::new(w, h).unwrap());
        c.fill(Rgb::WHITE);
        c
    }

    #[test]
    fn test_new_canvas_is_black() {
        let c = Canvas::new(Dimensions::new(4, 3).unwrap());
        assert_eq!((c.width(), c.height()), (4, 3));
        assert_eq!(c.count(Rgb::BLACK), 12);
        assert_eq!(c.pixel(4, 0), None);
        assert_eq!(c.pixel(0, 3), None);
    }

    #[test]
    fn test_horizontal_line() {
        let mut c = canvas(10, 10);
        c.line(Vec2::new(2.0, 4.0), Vec2::new(7.0, 4.0), 1, RED);
        for x in 2..=6 {
            assert_eq!(c.pixel(x, 4), Some(RED));
        }
        assert_eq!(c.pixel(0, 4), Some(Rgb::WHITE));
        assert_eq!(c.pixel(9, 4), Some(Rgb::WHITE));
        assert_eq!(c.pixel(4, 2), Some(Rgb::WHITE));
        assert_eq!(c.pixel(4, 6), Some(Rgb::WHITE));
    }

    #[test]
    fn test_thick_line() {
        let mut c = canvas(20, 20);
        c.line(Vec2::new(4.0, 10.0), Vec2::new(16.0, 10.0), 5, RED);
        assert_eq!(c.pixel(10, 8), Some(RED));
        assert_eq!(c.pixel(10, 11), Some(RED));
        assert_eq!(c.pixel(10, 14), Some(Rgb::WHITE));
        assert_eq!(c.pixel(10, 5), Some(Rgb::WHITE));
    }

    #[test]
    fn test_drawing_is_aliased() {
        let mut c = canvas(30, 30);
        c.line(Vec2::new(1.0, 3.0), Vec2::new(28.0, 25.0), 3, RED);
        c.fill_circle(Vec2::new(15.0, 15.0), 6.5, Rgb::BLACK);
        let other = 30 * 30 - c.count(RED) - c.count(Rgb::BLACK) - c.count(Rgb::WHITE);
        assert_eq!(other, 0);
        assert!(c.count(RED) > 0);
    }

    #[test]
    fn test_fill_rectangle_polygon() {
        let mut c = canvas(10, 10);
        let rect = [
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 5.0),
            Vec2::new(2.0, 5.0),
        ];
        c.fill_polygon(&rect, RED);
        assert_eq!(c.pixel(2, 2), Some(RED));
        assert_eq!(c.pixel(5, 4), Some(RED));
        assert_eq!(c.pixel(7, 3), Some(Rgb::WHITE));
        assert_eq!(c.pixel(3, 6), Some(Rgb::WHITE));
        assert_eq!(c.pixel(0, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_degenerate_shapes_are_ignored() {
        let mut c = canvas(5, 5);
        c.fill_polygon(&[Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0)], RED);
        c.polyline(&[Vec2::new(1.0, 1.0)], 3, RED);
        c.fill_circle(Vec2::new(2.0, 2.0), 0.0, RED);
        c.fill_circle(Vec2::new(2.0, 2.0), f64::NAN, RED);
        assert_eq!(c.count(RED), 0);
    }

    #[test]
    fn test_circle_and_outline() {
        let mut c = canvas(41, 41);
        c.fill_circle(Vec2::new(20.5, 20.5), 10.0, RED);
        assert_eq!(c.pixel(20, 20), Some(RED));
        assert_eq!(c.pixel(28, 20), Some(RED));
        assert_eq!(c.pixel(32, 20), Some(Rgb::WHITE));

        c.circle_outline(Vec2::new(20.5, 20.5), 10.0, 2, Rgb::BLACK);
        assert_eq!(c.pixel(29, 20), Some(Rgb::BLACK));
        assert_eq!(c.pixel(20, 20), Some(RED));
        assert_eq!(c.pixel(32, 20), Some(Rgb::WHITE));
    }

    #[test]
    fn test_line_far_off_canvas_is_clipped() {
        let mut c = canvas(10, 10);
        c.line(Vec2::new(-1e12, 5.0), Vec2::new(1e12, 5.0), 1, RED);
        for x in 0..10 {
            assert_eq!(c.pixel(x, 5), Some(RED));
        }

        c.line(Vec2::new(0.0, 0.0), Vec2::new(f64::NAN, 3.0), 1, Rgb::BLACK);
        c.line(Vec2::new(50.0, 50.0), Vec2::new(80.0, 90.0), 1, Rgb::BLACK);
        assert_eq!(c.count(Rgb::BLACK), 0);
    }

    #[test]
    fn test_shapes_at_extreme_coordinates() {
        let mut c = canvas(4, 4);
        let quad = [
            Vec2::new(-1e15, -1e15),
            Vec2::new(1e15, -1e15),
            Vec2::new(1e15, 1e15),
            Vec2::new(-1e15, 1e15),
        ];
        c.fill_polygon(&quad, RED);
        assert_eq!(c.count(RED), 16);

        let mut c = canvas(4, 4);
        for center in [
            Vec2::new(1e19, 2.0),
            Vec2::new(2.0, -2.83e31),
            Vec2::new(f64::MAX, f64::MAX),
            Vec2::new(f64::INFINITY, 0.0),
        ] {
            c.fill_circle(center, 25.0, RED);
            c.circle_outline(center, 25.0, 2, RED);
            c.line(Vec2::new(2.0, 0.0), center, 3, RED);
        }
        // Nothing reaches the bottom-left corner
        assert_eq!(c.pixel(0, 3), Some(Rgb::WHITE));
    }

    #[test]
    fn test_rgb_image_copy() {
        let mut c = canvas(3, 2);
        c.fill_polygon(
            &[
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            RED,
        );
        let image = c.to_rgb_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &image::Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(2, 1), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn test_write_ppm() {
        let c = canvas(3, 2);
        let mut bytes = Vec::new();
        c.write_ppm(&mut bytes).unwrap();

        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[255; 3 * 2 * 3]));

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, c.to_rgb_image());
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut c = canvas(8, 4);
        c.line(Vec2::new(0.0, 2.0), Vec2::new(8.0, 2.0), 1, RED);

        for (name, format) in [("frame.png", SnapshotFormat::Png), ("frame.ppm", SnapshotFormat::Ppm)] {
            let path = dir.path().join(name);
            c.save(&path, format).unwrap();
            let decoded = image::open(&path).unwrap().to_rgb8();
            assert_eq!(decoded, c.to_rgb_image());
        }
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("frame.ppm");
        assert!(canvas(2, 2).save(&path, SnapshotFormat::Ppm).is_err());
    }

    #[test]
    fn test_frame_clear_drops_labels() {
        let mut frame = Frame::new(Dimensions::new(8, 8).unwrap());
        frame.label(1, 2, "hello");
        assert_eq!(frame.labels(), &[Label::new(1, 2, "hello")]);

        frame.clear(Rgb::WHITE);
        assert!(frame.labels().is_empty());
        assert_eq!(frame.canvas().count(Rgb::WHITE), 64);
    }
}
