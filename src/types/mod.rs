pub mod activity;
pub mod palette;
