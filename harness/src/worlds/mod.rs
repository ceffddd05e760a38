//! Concrete walkability backings for the harness runner.

pub mod tile_grid;
