pub mod accounts;
pub mod form;
pub mod login;
