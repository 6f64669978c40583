pub mod error;
pub mod month_range;
pub mod observation;
pub mod raw_record;
pub mod role;
