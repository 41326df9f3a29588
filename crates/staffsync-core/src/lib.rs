pub mod commit;
pub mod db;
pub mod dedupe;
pub mod diff;
pub mod error;
pub mod export;
pub mod normalize;
pub mod plan;
pub mod record;
pub mod schema;
pub mod selection;
pub mod store;
pub mod validation;
