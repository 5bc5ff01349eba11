pub mod access_log;
pub mod identity;

pub use access_log::AccessLog;
pub use identity::IdentityMiddleware;
