pub mod analyze;
pub mod compare;
pub mod grade;
pub mod init;
pub mod list;
pub mod validate;
