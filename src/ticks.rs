//! Tick mark location and label grouping.
//!
//! Tick marks and their labels share one colour. A tick mark is the stroke
//! of tick-coloured pixels crossing (or touching) an axis line; every other
//! tick-coloured pixel belongs to a label glyph, even when the label is
//! written right against the end of its tick. Each tick then collects the
//! glyphs lying next to it on the side of the axis away from the curve.

use image::Luma;

use crate::axes::{Axes, Axis, AxisLine};
use crate::classify::{ClassMap, PixelClass};
use crate::config::ExtractConfig;
use crate::digits::{read_label, LabelCluster};
use crate::error::ExtractError;
use crate::geom::{blobs, Blob, PixelRect};

/// A tick mark on one axis together with its label glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub axis: Axis,
    /// Pixel coordinate along the axis: column on the horizontal axis,
    /// row on the vertical axis.
    pub position: f64,
    /// Bounding box of the tick pixels.
    pub bounds: PixelRect,
    pub label: LabelCluster,
}

impl TickMark {
    /// Decode the label into its value.
    pub fn read(self, min_score: f64) -> Result<TickLabel, ExtractError> {
        match read_label(&self.label, min_score) {
            Ok(value) => Ok(TickLabel { value, mark: self }),
            Err(e) => Err(ExtractError::UnreadableLabel {
                axis: self.axis,
                position: self.position,
                reason: e.to_string(),
            }),
        }
    }
}

/// A tick mark with its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub value: u64,
    pub mark: TickMark,
}

/// Tick marks of both axes, each ordered by ascending position.
#[derive(Debug, Clone, Default)]
pub struct AxisTicks {
    pub horizontal: Vec<TickMark>,
    pub vertical: Vec<TickMark>,
}

/// Which side of an axis line labels are written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Below a horizontal axis, left of a vertical axis.
    Low,
    /// Above a horizontal axis, right of a vertical axis.
    High,
}

/// Tick pieces merged along one axis, before labels are attached.
#[derive(Debug, Clone)]
struct BareTick {
    axis: Axis,
    start: u32,
    end: u32,
    bounds: PixelRect,
}

/// A tick plus the glyphs claimed for its label.
struct Group {
    tick: BareTick,
    glyphs: Vec<usize>,
}

/// Find the tick marks of both axes and the label cluster of each.
pub fn locate_ticks(
    map: &ClassMap,
    axes: &Axes,
    config: &ExtractConfig,
) -> Result<AxisTicks, ExtractError> {
    let mut glyph_mask = map.mask(PixelClass::TickMarker);
    let tick_blobs = blobs(&glyph_mask);

    // ── Tick strokes ──────────────────────────────────────
    let mut pieces: Vec<(Axis, u32, u32, PixelRect)> = Vec::new();
    for blob in &tick_blobs {
        let on_h = crossing_stroke(map, blob, &axes.horizontal, config);
        let on_v = crossing_stroke(map, blob, &axes.vertical, config);
        let (axis, stroke) = match (on_h.is_empty(), on_v.is_empty()) {
            (false, false) => {
                // At the origin: a tick crosses its axis, so it is
                // elongated perpendicular to it.
                let both = bounding(on_h.iter().chain(&on_v));
                if both.height() >= both.width() {
                    (Axis::Horizontal, on_h)
                } else {
                    (Axis::Vertical, on_v)
                }
            }
            (false, true) => (Axis::Horizontal, on_h),
            (true, false) => (Axis::Vertical, on_v),
            (true, true) => continue,
        };
        for &(x, y) in &stroke {
            glyph_mask.put_pixel(x, y, Luma([0]));
        }
        let bounds = bounding(stroke.iter());
        let (start, end) = match axis {
            Axis::Horizontal => (bounds.min_x, bounds.max_x),
            Axis::Vertical => (bounds.min_y, bounds.max_y),
        };
        pieces.push((axis, start, end, bounds));
    }

    // Whatever is not a tick stroke is a label glyph, including the part of
    // a label that touches its tick.
    let blobs = blobs(&glyph_mask);
    let mut ticks = merge_pieces(&pieces, Axis::Horizontal, config.tick_gap);
    ticks.extend(merge_pieces(&pieces, Axis::Vertical, config.tick_gap));
    log::debug!(
        "ticks: {} blobs, {} tick marks, {} glyph candidates",
        tick_blobs.len(),
        ticks.len(),
        blobs.len()
    );

    // ── Attach labels ─────────────────────────────────────
    let h_side = label_side(map, &axes.horizontal);
    let v_side = label_side(map, &axes.vertical);
    let candidate = |blob: &Blob, axis: Axis| match axis {
        Axis::Horizontal => on_side(&blob.bounds, &axes.horizontal, h_side),
        Axis::Vertical => on_side(&blob.bounds, &axes.vertical, v_side),
    };
    let radius = config.label_radius(map.width(), map.height());

    let mut claimed = vec![false; blobs.len()];
    let mut groups: Vec<Group> = Vec::with_capacity(ticks.len());
    for tick in ticks {
        let nearest = blobs
            .iter()
            .enumerate()
            .filter(|(i, b)| !claimed[*i] && candidate(b, tick.axis))
            .map(|(i, b)| (i, tick.bounds.gap(&b.bounds)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((glyph, _)) = nearest else {
            return Err(ExtractError::UnlabeledTick {
                axis: tick.axis,
                position: midpoint(tick.start, tick.end),
            });
        };
        claimed[glyph] = true;
        groups.push(Group {
            tick,
            glyphs: vec![glyph],
        });
    }

    // Remaining glyphs (further digits of multi-digit labels) join the
    // closest group; repeat since every join widens a group.
    loop {
        let mut changed = false;
        for (i, blob) in blobs.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            let closest = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| candidate(blob, g.tick.axis))
                .map(|(gi, g)| (gi, group_gap(g, &blobs, &blob.bounds)))
                .filter(|&(_, d)| d <= radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((gi, _)) = closest {
                groups[gi].glyphs.push(i);
                claimed[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut out = AxisTicks::default();
    for group in groups {
        let pixels: Vec<(u32, u32)> = group
            .glyphs
            .iter()
            .flat_map(|&g| blobs[g].pixels.iter().copied())
            .collect();
        let position = midpoint(group.tick.start, group.tick.end);
        let label = LabelCluster::from_pixels(&pixels).ok_or(ExtractError::UnlabeledTick {
            axis: group.tick.axis,
            position,
        })?;
        let mark = TickMark {
            axis: group.tick.axis,
            position,
            bounds: group.tick.bounds,
            label,
        };
        match mark.axis {
            Axis::Horizontal => out.horizontal.push(mark),
            Axis::Vertical => out.vertical.push(mark),
        }
    }
    Ok(out)
}

/// Pixels of `blob` forming a stroke across `line`.
///
/// Seeds are blob pixels within `tick_gap` of the line or right next to an
/// axis pixel on the line side, inside the drawn span widened by the band.
/// From there the stroke grows away from the line one level at a time,
/// staying within the seeds' extent along the axis, and stops at the band
/// edge or where the blob widens (the top of a label touching the tick).
fn crossing_stroke(map: &ClassMap, blob: &Blob, line: &AxisLine, config: &ExtractConfig) -> Vec<(u32, u32)> {
    let band = config.tick_band;
    let lo = line.span.start().saturating_sub(band);
    let hi = line.span.end().saturating_add(band);
    let to_xy = |along: u32, across: u32| match line.axis {
        Axis::Horizontal => (along, across),
        Axis::Vertical => (across, along),
    };
    let class_at = |along: u32, across: u32| {
        let (x, y) = to_xy(along, across);
        (x < map.width() && y < map.height()).then(|| map.get(x, y))
    };
    let is_tick = |along: u32, across: u32| class_at(along, across) == Some(PixelClass::TickMarker);

    let mut seeds: Vec<(u32, u32)> = Vec::new();
    for &(x, y) in &blob.pixels {
        let (along, across) = match line.axis {
            Axis::Horizontal => (x, y),
            Axis::Vertical => (y, x),
        };
        let dist = across.abs_diff(line.index);
        if dist > band || along < lo || along > hi {
            continue;
        }
        let toward = if across < line.index { across + 1 } else { across.saturating_sub(1) };
        let touches_axis = dist > 0 && class_at(along, toward) == Some(PixelClass::AxisLine);
        if dist <= config.tick_gap || touches_axis {
            seeds.push((along, across));
        }
    }
    let (Some(a0), Some(a1)) = (
        seeds.iter().map(|s| s.0).min(),
        seeds.iter().map(|s| s.0).max(),
    ) else {
        return Vec::new();
    };
    let near = seeds.iter().map(|s| s.1).min().unwrap_or(line.index);
    let far = seeds.iter().map(|s| s.1).max().unwrap_or(line.index);

    let mut stroke = seeds;
    for outward in [false, true] {
        let mut level = if outward { far } else { near };
        loop {
            let next = if outward { level.checked_add(1) } else { level.checked_sub(1) };
            let Some(next) = next.filter(|n| n.abs_diff(line.index) <= band) else {
                break;
            };
            let widens = a0.checked_sub(1).is_some_and(|a| is_tick(a, next)) || is_tick(a1 + 1, next);
            let row: Vec<u32> = (a0..=a1).filter(|&a| is_tick(a, next)).collect();
            if widens || row.is_empty() {
                break;
            }
            stroke.extend(row.into_iter().map(|a| (a, next)));
            level = next;
        }
    }
    stroke.into_iter().map(|(along, across)| to_xy(along, across)).collect()
}

fn bounding<'a>(pixels: impl Iterator<Item = &'a (u32, u32)>) -> PixelRect {
    let mut bounds: Option<PixelRect> = None;
    for &(x, y) in pixels {
        match bounds.as_mut() {
            Some(b) => b.include(x, y),
            None => bounds = Some(PixelRect::point(x, y)),
        }
    }
    bounds.unwrap_or(PixelRect::point(0, 0))
}

/// Merge the tick pieces of one axis whose extents are at most `gap`
/// pixels apart. Result is ordered by position.
fn merge_pieces(pieces: &[(Axis, u32, u32, PixelRect)], axis: Axis, gap: u32) -> Vec<BareTick> {
    let mut mine: Vec<&(Axis, u32, u32, PixelRect)> =
        pieces.iter().filter(|p| p.0 == axis).collect();
    mine.sort_by_key(|p| (p.1, p.2));

    let mut out: Vec<BareTick> = Vec::new();
    for &&(_, start, end, bounds) in &mine {
        if let Some(last) = out.last_mut() {
            if start <= last.end.saturating_add(gap).saturating_add(1) {
                last.end = last.end.max(end);
                last.bounds = last.bounds.union(&bounds);
                continue;
            }
        }
        out.push(BareTick {
            axis,
            start,
            end,
            bounds,
        });
    }
    out
}

/// The side of the axis holding fewer curve pixels. Ties go low.
fn label_side(map: &ClassMap, line: &AxisLine) -> Side {
    let (mut low, mut high) = (0u64, 0u64);
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.get(x, y) != PixelClass::Curve {
                continue;
            }
            match line.axis {
                Axis::Horizontal if y > line.index => low += 1,
                Axis::Horizontal if y < line.index => high += 1,
                Axis::Vertical if x < line.index => low += 1,
                Axis::Vertical if x > line.index => high += 1,
                _ => {}
            }
        }
    }
    if low <= high {
        Side::Low
    } else {
        Side::High
    }
}

/// Whether a box lies entirely on `side` of the axis line.
fn on_side(bounds: &PixelRect, line: &AxisLine, side: Side) -> bool {
    match (line.axis, side) {
        (Axis::Horizontal, Side::Low) => bounds.min_y > line.index,
        (Axis::Horizontal, Side::High) => bounds.max_y < line.index,
        (Axis::Vertical, Side::Low) => bounds.max_x < line.index,
        (Axis::Vertical, Side::High) => bounds.min_x > line.index,
    }
}

fn group_gap(group: &Group, blobs: &[Blob], bounds: &PixelRect) -> f64 {
    group
        .glyphs
        .iter()
        .map(|&g| blobs[g].bounds.gap(bounds))
        .fold(group.tick.bounds.gap(bounds), f64::min)
}

fn midpoint(start: u32, end: u32) -> f64 {
    (start as f64 + end as f64) / 2.0
}
