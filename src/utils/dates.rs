use chrono::NaiveDate;

/// First and last day of a month, or `None` for an impossible month.
pub fn month_bounds(mes: u32, anio: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(anio, mes, 1)?;
    let next = if mes == 12 {
        NaiveDate::from_ymd_opt(anio + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(anio, mes + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        assert_eq!(month_bounds(2, 2028), Some((date(2028, 2, 1), date(2028, 2, 29))));
        assert_eq!(month_bounds(12, 2026), Some((date(2026, 12, 1), date(2026, 12, 31))));
    }

    #[test]
    fn month_bounds_reject_invalid_month() {
        assert_eq!(month_bounds(0, 2026), None);
        assert_eq!(month_bounds(13, 2026), None);
    }
}
