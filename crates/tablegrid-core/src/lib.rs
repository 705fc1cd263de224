//! tablegrid-core: Backend-independent table reconstruction.
//!
//! This crate turns a rendered page image plus positioned text tokens into
//! rectangular grids of cell strings. Ruling lines are isolated with
//! directional morphology ([`mask`]), grouped into table regions
//! ([`region`]) and split into cells ([`cell`]). Tokens are mapped from
//! document units to pixels ([`mapping`]) and attached to cells by strict
//! containment ([`assign`]). Tables without borders are clustered from
//! their tokens ([`borderless`]). Cells become a grid in [`assemble`], and
//! [`pipeline`] runs all of it per page.

pub mod assemble;
pub mod assign;
pub mod borderless;
pub mod cell;
pub mod discovery;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod mask;
pub mod pipeline;
pub mod region;
pub mod settings;
pub mod token;
pub mod words;

pub use assemble::{TableGrid, assemble_table};
pub use cell::Cell;
pub use discovery::{BorderlessCells, CellDiscovery, CellStrategy, RegionContext, RuledCells};
pub use error::{ExtractResult, ExtractWarning, ExtractWarningCode, GridError};
pub use geometry::{BBox, PixelBox, ScaleFactor};
pub use mask::LineMasks;
pub use pipeline::{PageInput, TableExtractor, TableRecord};
pub use settings::{
    AssemblySettings, BorderlessSettings, CellSettings, DiscoveryMode, GridSettings,
    LineMaskSettings,
};
pub use token::{Glyph, Token};
pub use words::{WordExtractor, WordOptions};
