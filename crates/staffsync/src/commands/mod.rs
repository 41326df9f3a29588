use clap::ValueEnum;
use staffsync_core::schema::EntityKind;

pub mod export;
pub mod import;

/// CLI-facing names of the importable collections.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Employee,
    OfficeContact,
}

impl EntityArg {
    pub fn kind(self) -> EntityKind {
        match self {
            EntityArg::Employee => EntityKind::Employee,
            EntityArg::OfficeContact => EntityKind::OfficeContact,
        }
    }
}
