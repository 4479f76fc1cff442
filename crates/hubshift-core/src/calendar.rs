//! Day view layout for the hub calendar
//!
//! Positions are linear in minutes from the start of the visible window:
//! `offset = (t - day_start) / (day_end - day_start) * height`.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::HubError;
use crate::model::Shift;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Visible slice of a day, `[day_start, day_end)`, drawn `height` pixels tall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindow {
    day_start: NaiveTime,
    day_end: NaiveTime,
    height: f64,
}

impl DayWindow {
    pub fn new(day_start: NaiveTime, day_end: NaiveTime, height: f64) -> Result<Self, HubError> {
        if day_end <= day_start {
            return Err(HubError::InvalidTimeRange {
                reason: format!("Calendar window {} - {} is empty", day_start, day_end),
            });
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(HubError::InvalidInput {
                reason: format!("Calendar height must be positive, got {}", height),
            });
        }
        Ok(Self {
            day_start,
            day_end,
            height,
        })
    }

    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    pub fn day_end(&self) -> NaiveTime {
        self.day_end
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn span_minutes(&self) -> i64 {
        minute_of_day(self.day_end) - minute_of_day(self.day_start)
    }

    /// Pixel offset for a minute count measured from `day_start`
    fn offset_for(&self, minutes: i64) -> f64 {
        minutes as f64 / self.span_minutes() as f64 * self.height
    }
}

impl Default for DayWindow {
    /// 06:00 to 23:59 at one pixel per minute
    fn default() -> Self {
        let day_start = NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN);
        let day_end = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
        Self {
            day_start,
            day_end,
            height: (minute_of_day(day_end) - minute_of_day(day_start)) as f64,
        }
    }
}

fn minute_of_day(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 60 + i64::from(t.minute())
}

/// Offset of the "now" line, or `None` when `now` is outside the window
pub fn time_indicator_offset(now: NaiveTime, window: &DayWindow) -> Option<f64> {
    if now < window.day_start || now >= window.day_end {
        return None;
    }
    let elapsed = minute_of_day(now) - minute_of_day(window.day_start);
    Some(window.offset_for(elapsed))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftBlock {
    pub shift_id: Uuid,
    pub title: String,
    pub top: f64,
    pub height: f64,
    pub label: String,
    /// The block was cut at the window edge
    pub clipped: bool,
}

/// Place a shift in the window
///
/// Shifts that start before the window are clipped at the top; shifts that
/// end after it, or cross midnight, are clipped at the bottom. A shift that
/// never overlaps the window has no block.
pub fn shift_block(shift: &Shift, window: &DayWindow) -> Option<ShiftBlock> {
    let window_start = minute_of_day(window.day_start);
    let window_end = minute_of_day(window.day_end);

    let start = minute_of_day(shift.start_time);
    let mut end = minute_of_day(shift.end_time);
    if end <= start {
        end += MINUTES_PER_DAY;
    }

    let visible_start = start.max(window_start);
    let visible_end = end.min(window_end);
    if visible_end <= visible_start {
        return None;
    }

    Some(ShiftBlock {
        shift_id: shift.id,
        title: shift.title.clone(),
        top: window.offset_for(visible_start - window_start),
        height: window.offset_for(visible_end - visible_start),
        label: format_time_range(shift.start_time, shift.end_time),
        clipped: visible_start != start || visible_end != end,
    })
}

/// Blocks for every shift that overlaps the window, in start order
pub fn layout_day(shifts: &[Shift], window: &DayWindow) -> Vec<ShiftBlock> {
    let mut blocks: Vec<ShiftBlock> = shifts
        .iter()
        .filter_map(|shift| shift_block(shift, window))
        .collect();
    blocks.sort_by(|a, b| a.top.total_cmp(&b.top));
    blocks
}

/// `9:00 AM`
pub fn format_time(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// `9:00 AM – 5:00 PM`
pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} \u{2013} {}", format_time(start), format_time(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewShift;
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window() -> DayWindow {
        // 08:00 - 20:00 at 2px per minute
        DayWindow::new(hm(8, 0), hm(20, 0), 1440.0).unwrap()
    }

    fn shift(start: NaiveTime, end: NaiveTime) -> Shift {
        Shift::from_new(
            Uuid::now_v7(),
            NewShift {
                title: "Floor staff".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
                start_time: start,
                end_time: end,
                hourly_rate_cents: 3000,
                requires_rsa: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_indicator_interpolates() {
        let w = window();
        assert_eq!(time_indicator_offset(hm(8, 0), &w), Some(0.0));
        assert_eq!(time_indicator_offset(hm(14, 0), &w), Some(720.0));
        assert_eq!(time_indicator_offset(hm(7, 59), &w), None);
        assert_eq!(time_indicator_offset(hm(20, 0), &w), None);
    }

    #[test]
    fn test_block_inside_window() {
        let block = shift_block(&shift(hm(9, 0), hm(17, 0)), &window()).unwrap();
        assert_eq!(block.top, 120.0);
        assert_eq!(block.height, 960.0);
        assert_eq!(block.label, "9:00 AM \u{2013} 5:00 PM");
        assert!(!block.clipped);
    }

    #[test]
    fn test_overnight_block_clipped_to_window_end() {
        let block = shift_block(&shift(hm(18, 0), hm(2, 0)), &window()).unwrap();
        assert_eq!(block.top, 480.0);
        assert_eq!(block.height, 240.0);
        assert!(block.clipped);
    }

    #[test]
    fn test_block_outside_window() {
        assert!(shift_block(&shift(hm(21, 0), hm(23, 0)), &window()).is_none());
        assert!(shift_block(&shift(hm(5, 0), hm(8, 0)), &window()).is_none());
    }

    #[test]
    fn test_layout_orders_by_start() {
        let w = window();
        let blocks = layout_day(
            &[shift(hm(15, 0), hm(19, 0)), shift(hm(9, 30), hm(12, 0))],
            &w,
        );
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].top < blocks[1].top);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(hm(0, 5)), "12:05 AM");
        assert_eq!(format_time(hm(12, 0)), "12:00 PM");
        assert_eq!(format_time_range(hm(21, 30), hm(1, 0)), "9:30 PM \u{2013} 1:00 AM");
    }

    #[test]
    fn test_rejects_empty_window() {
        assert!(DayWindow::new(hm(10, 0), hm(10, 0), 100.0).is_err());
        assert!(DayWindow::new(hm(8, 0), hm(10, 0), 0.0).is_err());
    }
}
