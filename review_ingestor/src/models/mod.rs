pub mod app_info;
pub mod entity;
pub mod raw_review;
pub mod request_params;
pub mod review;
