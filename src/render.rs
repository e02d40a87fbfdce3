//! Low-level PDF rendering utilities.
//!
//! This module provides low-level abstractions over [`printpdf`][]:  A [`Renderer`][] creates a
//! document with one or more pages.  A [`Page`][] has one or more layers, all of the same size.
//! A [`Layer`][] can be used to access its [`Area`][].
//!
//! An [`Area`][] is a view on a full layer or on a part of a layer.  It can be used to draw
//! lines, filled shapes and text.  For multi-line text, you can create a [`TextSection`][] from
//! an [`Area`][].
//!
//! All text is rendered with the PDF built-in fonts, so strings must be representable in the
//! Windows-1252 encoding.  Use [`sanitize_text`][] to replace characters outside that range
//! before printing.
//!
//! [`printpdf`]: https://docs.rs/printpdf/latest/printpdf
//! [`Renderer`]: struct.Renderer.html
//! [`Page`]: struct.Page.html
//! [`Layer`]: struct.Layer.html
//! [`Area`]: struct.Area.html
//! [`TextSection`]: struct.TextSection.html
//! [`sanitize_text`]: fn.sanitize_text.html

use std::cell;
use std::io;
use std::ops;
use std::rc;

use crate::error::{Error, ErrorKind};
use crate::fonts;
use crate::style::{Color, LineStyle, Style};
use crate::{Mm, Position, Size};

/// A position relative to the top left corner of a layer.
struct LayerPosition(Position);

impl LayerPosition {
    pub fn from_area(area: &Area<'_>, position: Position) -> Self {
        Self(position + area.origin)
    }
}

/// A position relative to the bottom left corner of a layer ("user space" in PDF terms).
struct UserSpacePosition(Position);

impl UserSpacePosition {
    pub fn from_layer(layer: &Layer<'_>, position: LayerPosition) -> Self {
        Self(Position::new(
            position.0.x,
            layer.page.size.height - position.0.y,
        ))
    }
}

impl From<UserSpacePosition> for printpdf::Point {
    fn from(pos: UserSpacePosition) -> printpdf::Point {
        printpdf::Point::new(pos.0.x.into(), pos.0.y.into())
    }
}

impl ops::Deref for UserSpacePosition {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A decoded image registered with the document.
///
/// *Only available if the `images` feature is enabled.*
#[cfg(feature = "images")]
#[derive(Clone, Debug)]
pub struct ImageRef {
    id: printpdf::XObjectId,
    width_px: usize,
    height_px: usize,
}

#[cfg(feature = "images")]
impl ImageRef {
    /// Returns the aspect ratio (width over height) of the image.
    pub fn aspect_ratio(&self) -> f32 {
        self.width_px as f32 / self.height_px as f32
    }
}

/// Renders a PDF document with one or more pages.
pub struct Renderer {
    doc: printpdf::PdfDocument,
    // invariant: pages.len() >= 1
    pages: Vec<Page>,
}

impl Renderer {
    /// Creates a new PDF document renderer with one page of the given size and the given title.
    pub fn new(size: impl Into<Size>, title: impl AsRef<str>) -> Result<Renderer, Error> {
        let size = size.into();
        let mut doc = printpdf::PdfDocument::new(title.as_ref());
        let layer = printpdf::Layer::new("Layer 1");
        let layer_id = doc.add_layer(&layer);
        let ops = vec![
            printpdf::Op::BeginLayer {
                layer_id: layer_id.clone(),
            },
            printpdf::Op::EndLayer {
                layer_id: layer_id.clone(),
            },
        ];
        let page = printpdf::PdfPage::new(size.width.into(), size.height.into(), ops);
        doc.pages.push(page);

        let page_idx = doc.pages.len() - 1;
        let page = Page::new(page_idx, layer_id, size);

        Ok(Renderer {
            doc,
            pages: vec![page],
        })
    }

    /// Adds a new page with the given size to the document.
    pub fn add_page(&mut self, size: impl Into<Size>) {
        let size = size.into();
        let layer = printpdf::Layer::new("Layer 1");
        let layer_id = self.doc.add_layer(&layer);
        let ops = vec![
            printpdf::Op::BeginLayer {
                layer_id: layer_id.clone(),
            },
            printpdf::Op::EndLayer {
                layer_id: layer_id.clone(),
            },
        ];
        let page = printpdf::PdfPage::new(size.width.into(), size.height.into(), ops);
        self.doc.pages.push(page);
        let page_idx = self.doc.pages.len() - 1;
        self.pages.push(Page::new(page_idx, layer_id, size))
    }

    /// Returns the number of pages in this document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Returns a page of this document.
    pub fn get_page(&self, idx: usize) -> Option<&Page> {
        self.pages.get(idx)
    }

    /// Returns the first page of this document.
    pub fn first_page(&self) -> &Page {
        &self.pages[0]
    }

    /// Returns the last page of this document.
    pub fn last_page(&self) -> &Page {
        &self.pages[self.pages.len() - 1]
    }

    /// Decodes the given image data and registers it with the document.
    ///
    /// *Only available if the `images` feature is enabled.*
    #[cfg(feature = "images")]
    pub fn add_image(&mut self, data: &[u8]) -> Result<ImageRef, Error> {
        let mut warnings = Vec::new();
        let raw = printpdf::RawImage::decode_from_bytes(data, &mut warnings)
            .map_err(|err| Error::new(format!("Failed to decode image: {}", err), ErrorKind::InvalidData))?;
        let width_px = raw.width;
        let height_px = raw.height;
        let id = self.doc.add_image(&raw);
        Ok(ImageRef {
            id,
            width_px,
            height_px,
        })
    }

    /// Writes this PDF document to a writer.
    pub fn write(mut self, w: impl io::Write) -> Result<(), Error> {
        for page in &self.pages {
            let page_idx = page.page_idx;
            let mut new_ops: Vec<printpdf::Op> = Vec::new();
            let layers_vec = page.layers.0.borrow();
            for layer_rc in layers_vec.iter() {
                let mut layer = layer_rc.borrow_mut();
                if let Some(layer_obj) = layer.layer_obj.take() {
                    let id = self.doc.add_layer(&layer_obj);
                    layer.layer_id = id;
                }
                new_ops.push(printpdf::Op::BeginLayer {
                    layer_id: layer.layer_id.clone(),
                });
                new_ops.extend(layer.ops.clone());
                new_ops.push(printpdf::Op::EndLayer {
                    layer_id: layer.layer_id.clone(),
                });
            }
            if page_idx < self.doc.pages.len() {
                self.doc.pages[page_idx].ops = new_ops;
            } else {
                let pdf_page = printpdf::PdfPage::new(
                    page.size.width.into(),
                    page.size.height.into(),
                    new_ops,
                );
                self.doc.pages.push(pdf_page);
            }
        }

        let mut warnings = Vec::new();
        let opts = printpdf::serialize::PdfSaveOptions::default();
        let mut buf = io::BufWriter::new(w);
        self.doc.save_writer(&mut buf, &opts, &mut warnings);
        Ok(())
    }
}

/// A page of a PDF document.
pub struct Page {
    page_idx: usize,
    size: Size,
    layers: Layers,
}

impl Page {
    fn new(page_idx: usize, layer_id: printpdf::LayerInternalId, size: Size) -> Page {
        Page {
            page_idx,
            size,
            layers: Layers::new(layer_id),
        }
    }

    /// Returns the size of this page.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the number of layers on this page.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the first layer of this page.
    pub fn first_layer(&self) -> Layer<'_> {
        Layer::new(self, self.layers.first())
    }

    /// Returns the last layer of this page.
    pub fn last_layer(&self) -> Layer<'_> {
        Layer::new(self, self.layers.last())
    }
}

#[derive(Debug)]
struct Layers(cell::RefCell<Vec<rc::Rc<cell::RefCell<LayerData>>>>);

impl Layers {
    pub fn new(layer_id: printpdf::LayerInternalId) -> Self {
        Self(
            vec![rc::Rc::from(cell::RefCell::new(LayerData::from_id(
                layer_id,
            )))]
            .into(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn first(&self) -> rc::Rc<cell::RefCell<LayerData>> {
        self.0.borrow().first().unwrap().clone()
    }

    pub fn last(&self) -> rc::Rc<cell::RefCell<LayerData>> {
        self.0.borrow().last().unwrap().clone()
    }
}

/// A layer of a page of a PDF document.
#[derive(Clone)]
pub struct Layer<'p> {
    page: &'p Page,
    data: rc::Rc<cell::RefCell<LayerData>>,
}

impl<'p> Layer<'p> {
    fn new(page: &'p Page, data: rc::Rc<cell::RefCell<LayerData>>) -> Layer<'p> {
        Layer { page, data }
    }

    /// Returns a drawable area for this layer.
    pub fn area(&self) -> Area<'p> {
        Area::new(self.clone(), Position::default(), self.page.size)
    }

    fn add_line_shape<I>(&self, points: I)
    where
        I: IntoIterator<Item = LayerPosition>,
    {
        let line_points: Vec<_> = points
            .into_iter()
            .map(|pos| printpdf::LinePoint {
                p: self.transform_position(pos).into(),
                bezier: false,
            })
            .collect();
        let line = printpdf::Line {
            points: line_points,
            is_closed: false,
        };
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::DrawLine { line });
    }

    fn add_polygon<I>(&self, points: I, mode: printpdf::PaintMode)
    where
        I: IntoIterator<Item = LayerPosition>,
    {
        let ring_points: Vec<_> = points
            .into_iter()
            .map(|pos| printpdf::LinePoint {
                p: self.transform_position(pos).into(),
                bezier: false,
            })
            .collect();
        let polygon = printpdf::Polygon {
            rings: vec![printpdf::PolygonRing {
                points: ring_points,
            }],
            mode,
            winding_order: printpdf::WindingOrder::NonZero,
        };
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::DrawPolygon { polygon });
    }

    #[cfg(feature = "images")]
    fn add_image(&self, image: &ImageRef, position: LayerPosition, size: Size) {
        // With the DPI pinned to 72, one image pixel equals one PDF point, so the scale
        // factors are simply the target size in points over the pixel dimensions.
        let pos = self.transform_position(position);
        let width_pt: printpdf::Pt = size.width.into();
        let height_pt: printpdf::Pt = size.height.into();
        let transform = printpdf::XObjectTransform {
            translate_x: Some(pos.x.into()),
            translate_y: Some(pos.y.into()),
            rotate: None,
            scale_x: Some(width_pt.0 / image.width_px as f32),
            scale_y: Some(height_pt.0 / image.height_px as f32),
            dpi: Some(72.0),
        };
        self.data.borrow_mut().ops.push(printpdf::Op::UseXobject {
            id: image.id.clone(),
            transform,
        });
    }

    fn set_fill_color(&self, color: Color) {
        if self.data.borrow().update_fill_color(color) {
            self.data
                .borrow_mut()
                .ops
                .push(printpdf::Op::SetFillColor { col: color.into() });
        }
    }

    fn set_outline_thickness(&self, thickness: Mm) {
        if self.data.borrow().update_outline_thickness(thickness) {
            self.data
                .borrow_mut()
                .ops
                .push(printpdf::Op::SetOutlineThickness {
                    pt: printpdf::Pt::from(thickness),
                });
        }
    }

    fn set_outline_color(&self, color: Color) {
        if self.data.borrow().update_outline_color(color) {
            self.data
                .borrow_mut()
                .ops
                .push(printpdf::Op::SetOutlineColor { col: color.into() });
        }
    }

    fn set_text_cursor(&self, cursor: LayerPosition) {
        let cursor = self.transform_position(cursor);
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::SetTextCursor { pos: cursor.into() });
    }

    fn begin_text_section(&self) {
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::StartTextSection);
    }

    fn end_text_section(&self) {
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::EndTextSection);
    }

    fn add_line_break(&self) {
        self.data.borrow_mut().ops.push(printpdf::Op::AddLineBreak);
    }

    fn set_line_height(&self, line_height: Mm) {
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::SetLineHeight {
                lh: printpdf::Pt::from(line_height),
            });
    }

    fn set_font(&self, font: printpdf::BuiltinFont, font_size: u8) {
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::SetFontSizeBuiltinFont {
                size: printpdf::Pt(f32::from(font_size)),
                font,
            });
    }

    fn write_text(&self, s: &str, font: printpdf::BuiltinFont) {
        let items = vec![printpdf::TextItem::Text(s.to_string())];
        self.data
            .borrow_mut()
            .ops
            .push(printpdf::Op::WriteTextBuiltinFont { items, font });
    }

    /// Transforms the given position that is relative to the upper left corner of the layer to a
    /// position that is relative to the lower left corner of the layer (as used by `printpdf`).
    fn transform_position(&self, position: LayerPosition) -> UserSpacePosition {
        UserSpacePosition::from_layer(self, position)
    }
}

#[derive(Debug)]
struct LayerData {
    layer_id: printpdf::LayerInternalId,
    layer_obj: Option<printpdf::Layer>,
    ops: Vec<printpdf::Op>,
    fill_color: cell::Cell<Color>,
    outline_color: cell::Cell<Color>,
    outline_thickness: cell::Cell<Mm>,
}

impl LayerData {
    pub fn from_id(layer_id: printpdf::LayerInternalId) -> Self {
        Self {
            layer_id,
            layer_obj: None,
            ops: Vec::new(),
            fill_color: Color::rgb(0, 0, 0).into(),
            outline_color: Color::rgb(0, 0, 0).into(),
            outline_thickness: Mm::from(printpdf::Pt(1.0)).into(),
        }
    }

    pub fn update_fill_color(&self, color: Color) -> bool {
        self.fill_color.replace(color) != color
    }

    pub fn update_outline_color(&self, color: Color) -> bool {
        self.outline_color.replace(color) != color
    }

    pub fn update_outline_thickness(&self, thickness: Mm) -> bool {
        self.outline_thickness.replace(thickness) != thickness
    }
}

/// A view on an area of a PDF layer that can be drawn on.
///
/// It is defined by the layer that is drawn on and the origin and the size of the area.
#[derive(Clone)]
pub struct Area<'p> {
    layer: Layer<'p>,
    origin: Position,
    size: Size,
}

impl<'p> Area<'p> {
    fn new(layer: Layer<'p>, origin: Position, size: Size) -> Area<'p> {
        Area {
            layer,
            origin,
            size,
        }
    }

    /// Returns the size of this area.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Adds the given offset to the area, reducing the drawable area.
    pub fn add_offset(&mut self, offset: impl Into<Position>) {
        let offset = offset.into();
        self.origin.x += offset.x;
        self.origin.y += offset.y;
        self.size.width -= offset.x;
        self.size.height -= offset.y;
    }

    /// Sets the width of this area.
    pub fn set_width(&mut self, width: Mm) {
        self.size.width = width;
    }

    /// Sets the height of this area.
    pub fn set_height(&mut self, height: Mm) {
        self.size.height = height;
    }

    /// Draws a line with the given points and the given line style.
    ///
    /// The points are relative to the upper left corner of the area.
    pub fn draw_line<I>(&self, points: I, line_style: LineStyle)
    where
        I: IntoIterator<Item = Position>,
    {
        self.layer.set_outline_thickness(line_style.thickness());
        self.layer.set_outline_color(line_style.color());
        self.layer
            .add_line_shape(points.into_iter().map(|pos| self.position(pos)));
    }

    /// Fills the given rectangle with the given color.
    ///
    /// The position is relative to the upper left corner of the area.
    pub fn fill_rect(&self, position: Position, size: Size, color: Color) {
        self.layer.set_fill_color(color);
        let points = rect_points(position, size);
        self.layer.add_polygon(
            points.into_iter().map(|pos| self.position(pos)),
            printpdf::PaintMode::Fill,
        );
    }

    /// Strokes the outline of the given rectangle with the given line style.
    pub fn stroke_rect(&self, position: Position, size: Size, line_style: LineStyle) {
        self.layer.set_outline_thickness(line_style.thickness());
        self.layer.set_outline_color(line_style.color());
        let points = rect_points(position, size);
        self.layer.add_polygon(
            points.into_iter().map(|pos| self.position(pos)),
            printpdf::PaintMode::Stroke,
        );
    }

    /// Fills a rectangle with rounded corners.
    ///
    /// The corner radius is clamped to half of the smaller rectangle dimension.
    pub fn fill_rounded_rect(&self, position: Position, size: Size, radius: Mm, color: Color) {
        let radius = radius.min(size.width * 0.5).min(size.height * 0.5);
        if radius.0 <= 0.0 {
            self.fill_rect(position, size, color);
            return;
        }
        self.layer.set_fill_color(color);
        let points = rounded_rect_points(position, size, radius);
        self.layer.add_polygon(
            points.into_iter().map(|pos| self.position(pos)),
            printpdf::PaintMode::Fill,
        );
    }

    /// Fills a circular dot with the given center and radius.
    pub fn fill_dot(&self, center: Position, radius: Mm, color: Color) {
        self.layer.set_fill_color(color);
        let segments = 16;
        let points = (0..segments).map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Position::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        });
        self.layer.add_polygon(
            points.map(|pos| self.position(pos)),
            printpdf::PaintMode::Fill,
        );
    }

    /// Draws an image into the given rectangle of this area.
    ///
    /// *Only available if the `images` feature is enabled.*
    ///
    /// The position is relative to the upper left corner of the area and refers to the upper
    /// left corner of the image.
    #[cfg(feature = "images")]
    pub fn draw_image(&self, image: &ImageRef, position: Position, size: Size) {
        // printpdf anchors images at their lower left corner.
        let anchor = Position::new(position.x, position.y + size.height);
        self.layer.add_image(image, self.position(anchor), size);
    }

    /// Tries to draw the given string at the given position and returns `true` if the area was
    /// large enough to draw the string.
    ///
    /// The position is relative to the upper left corner of the area.
    pub fn print_str<S: AsRef<str>>(
        &self,
        font_cache: &fonts::FontCache,
        position: Position,
        style: Style,
        s: S,
    ) -> Result<bool, Error> {
        if let Some(mut section) =
            self.text_section(font_cache, position, style.metrics(font_cache))
        {
            section.print_str(s, style)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Creates a new text section at the given position if the text section fits in this area.
    ///
    /// The given metrics are only used to calculate the line height of the section.  The
    /// position is relative to the upper left corner of the area.
    pub fn text_section<'f>(
        &self,
        font_cache: &'f fonts::FontCache,
        position: Position,
        metrics: fonts::Metrics,
    ) -> Option<TextSection<'f, 'p>> {
        let mut area = self.clone();
        area.add_offset(position);
        TextSection::new(font_cache, area, metrics)
    }

    /// Returns a position relative to the top left corner of this area.
    fn position(&self, position: Position) -> LayerPosition {
        LayerPosition::from_area(self, position)
    }
}

fn rect_points(position: Position, size: Size) -> Vec<Position> {
    vec![
        position,
        Position::new(position.x + size.width, position.y),
        Position::new(position.x + size.width, position.y + size.height),
        Position::new(position.x, position.y + size.height),
    ]
}

fn rounded_rect_points(position: Position, size: Size, radius: Mm) -> Vec<Position> {
    // Corner arcs are approximated with straight segments, which is indistinguishable at
    // typical radii of a few millimeters.
    let steps = 6;
    let corners = [
        // (center, start angle) in top-left coordinates, clockwise.
        (
            Position::new(position.x + size.width - radius, position.y + radius),
            -0.5 * std::f32::consts::PI,
        ),
        (
            Position::new(
                position.x + size.width - radius,
                position.y + size.height - radius,
            ),
            0.0,
        ),
        (
            Position::new(position.x + radius, position.y + size.height - radius),
            0.5 * std::f32::consts::PI,
        ),
        (
            Position::new(position.x + radius, position.y + radius),
            std::f32::consts::PI,
        ),
    ];
    let mut points = Vec::with_capacity(4 * (steps + 1));
    for (center, start) in corners {
        for i in 0..=steps {
            let angle = start + 0.5 * std::f32::consts::PI * i as f32 / steps as f32;
            points.push(Position::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    }
    points
}

/// A text section that is drawn on an area of a PDF layer.
pub struct TextSection<'f, 'p> {
    font_cache: &'f fonts::FontCache,
    area: Area<'p>,
    is_first: bool,
    metrics: fonts::Metrics,
    font: Option<(printpdf::BuiltinFont, u8)>,
}

impl<'f, 'p> TextSection<'f, 'p> {
    fn new(
        font_cache: &'f fonts::FontCache,
        area: Area<'p>,
        metrics: fonts::Metrics,
    ) -> Option<TextSection<'f, 'p>> {
        if metrics.glyph_height > area.size.height {
            return None;
        }

        area.layer.begin_text_section();
        area.layer.set_line_height(metrics.line_height);

        Some(TextSection {
            font_cache,
            area,
            is_first: true,
            metrics,
            font: None,
        })
    }

    fn set_text_cursor(&self) {
        let cursor = self.area.position(Position::new(0, self.metrics.ascent));
        self.area.layer.set_text_cursor(cursor);
    }

    fn set_font(&mut self, font: printpdf::BuiltinFont, font_size: u8) {
        if self.font != Some((font, font_size)) {
            self.font = Some((font, font_size));
            self.area.layer.set_font(font, font_size);
        }
    }

    /// Tries to add a new line and returns `true` if the area was large enough to fit the new
    /// line.
    #[must_use]
    pub fn add_newline(&mut self) -> bool {
        if self.metrics.line_height > self.area.size.height {
            false
        } else {
            self.area.layer.add_line_break();
            self.area.add_offset((0, self.metrics.line_height));
            true
        }
    }

    /// Prints the given string with the given style.
    ///
    /// Returns an error if the string contains characters outside the Windows-1252 range.
    pub fn print_str(&mut self, s: impl AsRef<str>, style: Style) -> Result<(), Error> {
        let s = s.as_ref();
        encode_win1252(s)?;

        if self.is_first {
            self.set_text_cursor();
            self.is_first = false;
        }

        let font = style.font(self.font_cache);
        let builtin = self.font_cache.builtin_font(font);
        self.area.layer.set_fill_color(style.color());
        self.set_font(builtin, style.font_size());
        self.area.layer.write_text(s, builtin);
        Ok(())
    }
}

impl<'f, 'p> Drop for TextSection<'f, 'p> {
    fn drop(&mut self) {
        self.area.layer.end_text_section();
    }
}

/// Encodes the given string using the Windows-1252 encoding for use with built-in PDF fonts,
/// returning an error if it contains unsupported characters.
pub fn encode_win1252(s: &str) -> Result<Vec<u8>, Error> {
    let mut out: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars() {
        let b = match c as u32 {
            0x00..=0x7F => Some(c as u8),
            0xA0..=0xFF => Some(c as u8),
            0x20AC => Some(0x80),
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85),
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95),
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        };
        match b {
            Some(b) => out.push(b),
            None => {
                return Err(Error::new(
                    format!("Unsupported character for built-in font: {:?}", c),
                    ErrorKind::UnsupportedEncoding,
                ))
            }
        }
    }
    Ok(out)
}

/// Replaces characters that cannot be rendered with the built-in PDF fonts.
///
/// Common emoji and typographic symbols found in analysis texts are mapped to plain
/// replacements, everything else outside the Windows-1252 range is dropped.
pub fn sanitize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2713}' | '\u{2705}' => out.push_str("OK"),
            '\u{26A0}' | '\u{FE0F}' => out.push('!'),
            '\u{2717}' | '\u{274C}' => out.push('X'),
            '\u{2192}' => out.push_str("->"),
            '\u{00A0}' => out.push(' '),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            c if encode_win1252(&c.to_string()).is_ok() => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{helvetica_family, FontCache};
    use crate::style::Style;
    use crate::{Position, Size};

    fn renderer() -> Renderer {
        Renderer::new(Size::a4(), "test").expect("failed to create renderer")
    }

    #[test]
    fn test_new_renderer_has_one_page() {
        let r = renderer();
        assert_eq!(r.page_count(), 1);
        assert_eq!(r.first_page().layer_count(), 1);
    }

    #[test]
    fn test_add_page() {
        let mut r = renderer();
        r.add_page(Size::new(100.0, 100.0));
        assert_eq!(r.page_count(), 2);
        assert_eq!(r.last_page().size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_write_produces_pdf() {
        let cache = FontCache::new(helvetica_family().unwrap());
        let mut r = renderer();
        {
            let page = r.first_page();
            let area = page.first_layer().area();
            area.fill_rect(Position::new(10, 10), Size::new(50.0, 20.0), Color::rgb(10, 34, 64));
            area.fill_rounded_rect(
                Position::new(10, 40),
                Size::new(50.0, 20.0),
                crate::Mm(4.0),
                Color::rgb(245, 247, 250),
            );
            area.fill_dot(Position::new(20, 80), crate::Mm(2.0), Color::rgb(46, 125, 50));
            area.print_str(&cache, Position::new(10, 100), Style::new(), "Hola")
                .unwrap();
        }
        let mut buf = Vec::new();
        r.write(&mut buf).unwrap();
        assert!(buf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_text_section_rejects_overflow() {
        let cache = FontCache::new(helvetica_family().unwrap());
        let r = renderer();
        let page = r.first_page();
        let mut area = page.first_layer().area();
        area.set_height(crate::Mm(1.0));
        let style = Style::new().with_font_size(14);
        assert!(area
            .text_section(&cache, Position::default(), style.metrics(&cache))
            .is_none());
    }

    #[test]
    fn test_encode_win1252() {
        assert_eq!(encode_win1252("abc").unwrap(), vec![0x61, 0x62, 0x63]);
        assert_eq!(encode_win1252("ó").unwrap(), vec![0xF3]);
        assert_eq!(encode_win1252("€").unwrap(), vec![0x80]);
        assert!(encode_win1252("✓").is_err());
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("Año: ✓ cumplido"), "Año: OK cumplido");
        assert_eq!(sanitize_text("a → b"), "a -> b");
        assert_eq!(sanitize_text("“cita”"), "\"cita\"");
        assert_eq!(sanitize_text("emoji \u{1F600} fuera"), "emoji  fuera");
    }
}
