//! CSV export of an annotated grid.
//!
//! One record per cell in row-major order under the header
//! `row,col,x,y,cost,obstacle`.  Infinite costs are written as `inf`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{Grid, GridResult};

/// Writes grids as CSV to any `io::Write` sink.
pub struct GridCsvWriter<W: Write> {
    writer: Writer<W>,
}

impl GridCsvWriter<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> GridResult<Self> {
        Ok(Self { writer: Writer::from_path(path)? })
    }
}

impl<W: Write> GridCsvWriter<W> {
    pub fn from_writer(sink: W) -> Self {
        Self { writer: Writer::from_writer(sink) }
    }

    /// Header plus one record per cell, then flush.
    pub fn write_grid(&mut self, grid: &Grid) -> GridResult<()> {
        self.writer.write_record(["row", "col", "x", "y", "cost", "obstacle"])?;
        let cols = grid.cols();
        for (i, cell) in grid.cells().iter().enumerate() {
            self.writer.write_record(&[
                (i / cols).to_string(),
                (i % cols).to_string(),
                cell.x.to_string(),
                cell.y.to_string(),
                cell.cost.to_string(),
                (cell.obstacle as u8).to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Recover the underlying sink.
    pub fn into_inner(self) -> GridResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::GridError::Io(e.into_error()))
    }
}
