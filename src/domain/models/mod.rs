pub mod file;
pub mod identity;
pub mod policy;
pub mod request;
