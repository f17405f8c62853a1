pub mod api;
pub mod record;
pub mod sync;
pub mod vault;
