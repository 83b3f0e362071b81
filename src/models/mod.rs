pub mod identity;
pub mod log_record;
pub mod work_mode;
