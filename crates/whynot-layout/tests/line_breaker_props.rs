//! Property tests for the greedy line breaker.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::rc::Rc;
use whynot_common::image::LoadedImage;
use whynot_layout::{MeasuredContent, MeasuredInline, Rect, break_lines, split_line};

/// Build units from `(width, space)` pairs; every third unit overshoots
/// left by a pixel, like an italic glyph.
fn units(spec: &[(u8, u8)]) -> Vec<MeasuredInline> {
    let placeholder = Rc::new(LoadedImage::transparent(0, 0));
    spec.iter()
        .enumerate()
        .map(|(i, &(width, space))| {
            let width = i32::from(width) + 1;
            let left = if i % 3 == 2 { -1 } else { 0 };
            MeasuredInline {
                bounds: Rect::new(left, -10, width, 3),
                advance: width,
                space_width: i32::from(space % 16),
                content: MeasuredContent::Image(Rc::clone(&placeholder)),
            }
        })
        .collect()
}

#[quickcheck]
fn prop_split_line_makes_progress(spec: Vec<(u8, u8)>, max_width: u16) -> TestResult {
    if spec.is_empty() {
        return TestResult::discard();
    }
    let units = units(&spec);
    let max_width = i32::from(max_width).max(1);
    let (count, _) = split_line(&units, max_width, 0);
    TestResult::from_bool(count >= 1 && count <= units.len())
}

#[quickcheck]
fn prop_break_lines_consumes_every_unit(spec: Vec<(u8, u8)>, max_width: u16) -> bool {
    let units = units(&spec);
    let lines = break_lines(&units, i32::from(max_width).max(1), 0);
    lines.iter().map(|(count, _)| count).sum::<usize>() == units.len()
        && lines.iter().all(|(count, _)| *count >= 1)
}

#[quickcheck]
fn prop_multi_unit_lines_fit(spec: Vec<(u8, u8)>, max_width: u16, spacing: u8) -> bool {
    let units = units(&spec);
    let max_width = i32::from(max_width).max(1);
    break_lines(&units, max_width, i32::from(spacing % 8))
        .iter()
        .all(|(count, bounds)| *count == 1 || bounds.max.x <= max_width)
}

#[quickcheck]
fn prop_lines_start_at_zero(spec: Vec<(u8, u8)>, max_width: u16) -> bool {
    let units = units(&spec);
    break_lines(&units, i32::from(max_width).max(1), 0)
        .iter()
        .all(|(_, bounds)| bounds.min.x == 0)
}
