use chrono::{DateTime, Local, TimeZone};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait ToLocalString {
    /// Formats the instant in the local time zone.
    fn to_local_string(&self) -> String;

    /// Hours and minutes in the local time zone.
    fn to_local_time_string(&self) -> String;
}

impl<Tz: TimeZone> ToLocalString for DateTime<Tz> {
    fn to_local_string(&self) -> String {
        self.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
    }

    fn to_local_time_string(&self) -> String {
        self.with_timezone(&Local).format("%H:%M").to_string()
    }
}
