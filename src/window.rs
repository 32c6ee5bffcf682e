use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};

// Windowing-related types live here to keep the collector focused.

/// Half-open UTC range `[start, end)`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TimeWindow {
  start: DateTime<Utc>,
  end: DateTime<Utc>,
}

impl TimeWindow {
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
    if start >= end {
      bail!(
        "window start must be before end (got {} .. {})",
        iso_offset(start),
        iso_offset(end)
      );
    }
    Ok(Self { start, end })
  }

  pub fn start(&self) -> DateTime<Utc> {
    self.start
  }

  pub fn end(&self) -> DateTime<Utc> {
    self.end
  }

  /// `start <= ts < end`
  pub fn contains(&self, ts: DateTime<Utc>) -> bool {
    self.start <= ts && ts < self.end
  }
}

/// Monday 00:00 UTC of the week containing `dt`.
fn start_of_week(dt: DateTime<Utc>) -> DateTime<Utc> {
  let weekday = dt.weekday().num_days_from_monday() as i64;
  let day = (dt - Duration::days(weekday)).date_naive();
  Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::default()))
}

/// The seven days ending at the most recent week boundary before `now`.
pub fn previous_week(now: DateTime<Utc>) -> TimeWindow {
  let end = start_of_week(now);
  TimeWindow {
    start: end - Duration::days(7),
    end,
  }
}

/// Render as RFC3339 with an explicit `+00:00` offset (report header form).
/// Sub-second precision is kept only when present.
pub fn iso_offset(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Render as RFC3339 with a trailing `Z` (API query form).
pub fn iso_zulu(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an instant given on the command line.
/// Accepts RFC3339 (any offset, normalized to UTC) or a naive `%Y-%m-%dT%H:%M:%S`
/// / `%Y-%m-%d` value interpreted as UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
  let s = raw.trim();

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }

  if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
    return Ok(Utc.from_utc_datetime(&ndt));
  }

  let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .with_context(|| format!("invalid timestamp '{}': expected RFC3339 or YYYY-MM-DD", raw))?;

  Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::default())))
}

/// Parse an API timestamp such as `updated_at`. Returns None when unparseable.
pub fn parse_api_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Resolve the effective window from optional explicit bounds and an optional `now` override.
pub fn resolve_window(since: Option<&str>, until: Option<&str>, now: Option<DateTime<Utc>>) -> Result<TimeWindow> {
  match (since, until) {
    (Some(s), Some(u)) => TimeWindow::new(parse_instant(s)?, parse_instant(u)?),
    (None, None) => Ok(previous_week(now.unwrap_or_else(Utc::now))),
    _ => bail!("--since and --until must be given together"),
  }
}
