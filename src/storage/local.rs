//! Local file export

use chrono::{DateTime, Local, TimeZone};

pub const EXPORT_MIME: &str = "application/json";

/// `animation_<YYYY-MM-DD_HH-MM-SS>.json` for the given moment
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("animation_{}.json", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Export name stamped with the local wall clock
pub fn export_file_name_now() -> String {
    export_file_name(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_export_file_name_is_zero_padded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(export_file_name(&at), "animation_2024-03-07_09-05-02.json");
    }
}
