pub mod dashboard;
pub mod history;
pub mod login;
pub mod upload;
