mod core;
mod index_admin;
mod ops;

pub use self::core::Collection;
pub use self::index_admin::IndexKind;
