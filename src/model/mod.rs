pub mod leave_request;
pub mod policy;
pub mod role;
pub mod user;
