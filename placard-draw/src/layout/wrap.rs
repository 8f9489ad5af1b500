use crate::error::Result;
use crate::graphics::text::{self, ELLIPSIS};
use crate::graphics::FontSpec;
use crate::render::{FontMetrics, TextBounds};

/// Output of [`wrap`]: display lines ready for the layout engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wrapped {
    pub lines: Vec<String>,

    /// How many width units (see [`text::char_units`]) fit on one line
    pub max_units: usize,

    /// Measurement of the whole sanitized string, before wrapping.
    /// Right alignment keys off this width.
    pub measured: TextBounds,

    /// `true` if lines were dropped to respect the line limit
    pub truncated: bool,
}
impl Wrapped {
    /// Nothing to draw. Not an error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Breaks `raw` into lines no wider than `max_width` pixels, at most `max_lines` of them.
///
/// The string is measured once and the width is spread evenly over its characters,
/// counting a three-byte character as two ASCII ones. Lines are then cut by character
/// count, not by measuring each glyph. For proportional fonts the wrap points are
/// approximate; that is the accepted cost of measuring once.
///
/// When lines have to be dropped and the last line we keep is full, its last three
/// characters give way to [`ELLIPSIS`].
pub fn wrap<M: FontMetrics + ?Sized>(
    metrics: &M,
    font: &FontSpec,
    raw: &str,
    max_width: u32,
    max_lines: usize,
) -> Result<Wrapped> {
    let sanitized = text::sanitize(raw);
    if sanitized.is_empty() || max_lines == 0 {
        return Ok(Wrapped::empty());
    }

    let measured = metrics.measure(font, &sanitized)?;
    let total_units = text::units(&sanitized);
    let total_width = measured.width();
    if total_units == 0 || total_width <= 0 {
        log::debug!("nothing to wrap: {total_units} units, {total_width}px");
        return Ok(Wrapped::empty());
    }

    let unit_width = total_width as f64 / total_units as f64;
    let max_units = (max_width as f64 / unit_width).floor() as usize;

    let mut lines = Vec::new();
    let mut rest = sanitized.as_str();
    while text::units(rest) > max_units {
        let mut cut = text::prefix_within(rest, max_units);
        if cut == 0 {
            // a single character wider than the line; it still has to go somewhere
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (line, tail) = rest.split_at(cut);
        lines.push(line.to_owned());
        rest = tail;
    }
    if !rest.is_empty() {
        lines.push(rest.to_owned());
    }

    let truncated = lines.len() > max_lines;
    if truncated {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            if text::units(last) >= max_units {
                let keep = last.chars().count().saturating_sub(ELLIPSIS.len());
                *last = last.chars().take(keep).chain(ELLIPSIS.chars()).collect();
            }
        }
    }

    log::debug!(
        "wrapped {} units into {} line(s) of at most {max_units} (truncated: {truncated})",
        total_units,
        lines.len()
    );

    Ok(Wrapped {
        lines,
        max_units,
        measured,
        truncated,
    })
}
