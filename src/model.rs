pub mod catalog;
pub mod draft;
pub mod error_body;
pub mod login_object;
pub mod submission_record;
