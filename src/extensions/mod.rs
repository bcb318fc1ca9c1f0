pub mod date_time_ext;
pub mod duration_ext;
