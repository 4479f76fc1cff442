//! Shift posting and the hub calendar

use chrono::{NaiveDate, NaiveTime};
use hubshift_core::calendar::{layout_day, time_indicator_offset, DayWindow, ShiftBlock};
use hubshift_core::model::{NewShift, Role, Shift, User};
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use serde::Serialize;
use std::time::Instant;

use super::require_role;

/// Post a new open shift for the signed-in hub
///
/// ## Errors
///
/// - `Forbidden`: the user is not acting as a hub
/// - `InvalidInput` / `InvalidTimeRange`: rejected shift fields
pub async fn create_shift(repo: &dyn Repository, user: &User, new: NewShift) -> Result<Shift> {
    log_op_start!("create_shift", user_id = %user.id);
    let start = Instant::now();

    let result = create_shift_impl(repo, user, new).await.map_err(|e| {
        log_op_error!(
            "create_shift",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "create_shift",
        duration_ms = start.elapsed().as_millis() as u64,
        shift_id = %result.id
    );
    Ok(result)
}

async fn create_shift_impl(repo: &dyn Repository, user: &User, new: NewShift) -> Result<Shift> {
    require_role(user, Role::Hub)?;
    let shift = Shift::from_new(user.id, new)?;
    repo.insert_shift(&shift).await?;
    Ok(shift)
}

pub async fn list_shifts(
    repo: &dyn Repository,
    user: &User,
    date: Option<NaiveDate>,
) -> Result<Vec<Shift>> {
    require_role(user, Role::Hub)?;
    repo.list_shifts_for_hub(user.id, date).await
}

/// Day view for the hub calendar
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub height: f64,
    pub blocks: Vec<ShiftBlock>,
    /// Offset of the current-time line; absent on other days or outside the window
    pub now_offset: Option<f64>,
}

/// Lay out one day of the hub's shifts
///
/// `now` is the local date and time used for the current-time indicator.
pub async fn calendar_day(
    repo: &dyn Repository,
    user: &User,
    date: NaiveDate,
    window: DayWindow,
    now: Option<(NaiveDate, NaiveTime)>,
) -> Result<CalendarDay> {
    require_role(user, Role::Hub)?;
    let shifts = repo.list_shifts_for_hub(user.id, Some(date)).await?;

    let now_offset = now
        .filter(|(today, _)| *today == date)
        .and_then(|(_, time)| time_indicator_offset(time, &window));

    Ok(CalendarDay {
        date,
        day_start: window.day_start(),
        day_end: window.day_end(),
        height: window.height(),
        blocks: layout_day(&shifts, &window),
        now_offset,
    })
}
