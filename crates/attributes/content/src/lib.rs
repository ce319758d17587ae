//! Data-driven attribute content and loaders.
//!
//! This crate turns data files into the reference data `attribute-core` runs on:
//! - Attribute templates (data-driven via RON, formulas reference children by name)
//! - Character blueprints (data-driven via RON)
//! - Graph configuration (data-driven via TOML)
//! - Persisted attribute records (bincode files, one per character)
//!
//! Specs are plain data; resolving them against a registry turns names into
//! [`attribute_core::TemplateId`]s once, at load time.

pub mod specs;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub mod store;

pub use specs::{
    AttributeEntrySpec, CharacterSpec, FormulaSpec, TemplateSpec, build_registry,
};

#[cfg(feature = "loaders")]
pub use loaders::{CharacterLoader, ConfigLoader, ContentFactory, TemplateLoader};

#[cfg(feature = "loaders")]
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore, SavedCharacter, StoreError};
