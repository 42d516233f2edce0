//! Tile mosaic assembly
//!
//! Turns the set of currently loaded map tiles into a single raster plus the
//! geographic extent of that raster. The raster is what gets uploaded to the
//! embedding service; the extent lets the segmentation model translate map
//! clicks into image pixels.
//!
//! # Layout
//!
//! ```text
//!   grid x:  min_x      min_x+1     ...    max_x
//!          ┌──────────┬──────────┬──────┬──────────┐  ◄ north edge: row min_y
//!          │ (0, 0)   │ (ts, 0)  │      │          │
//!          ├──────────┼──────────┼──────┼──────────┤
//!          │ (0, ts)  │ (ts, ts) │      │          │
//!          └──────────┴──────────┴──────┴──────────┘  ◄ south edge: row max_y + 1
//!          ▲ west edge: column min_x       east edge: column max_x + 1 ▲
//! ```
//!
//! Each tile `(x, y)` lands at pixel offset
//! `((x - min_x) * tile_size, (y - min_y) * tile_size)`. Cells without a tile,
//! or whose tile has no imagery, stay transparent.

mod builder;
mod types;

pub use builder::{build_mosaic, Mosaic, MosaicBuilder, DEFAULT_MAX_PIXELS};
pub use types::{DuplicatePolicy, GridBounds, MosaicError, Tile, DEFAULT_TILE_SIZE};
