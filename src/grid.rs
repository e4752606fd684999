//! Rectangular surface holding at most one cell per site.

use crate::cell::Cell;
use crate::config::Config;
use crate::gene::Gene;
use crate::surface::Surface;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors building, loading or saving a grid
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("site ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("{width}x{height} grid has too many sites")]
    Dimensions { width: usize, height: usize },
    #[error("snapshot has {found} sites, expected {expected}")]
    SiteCount { expected: usize, found: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Population snapshot on a `width x height` grid.
///
/// Sites are stored row-major; traversal visits occupied sites in that order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    sites: Vec<Option<Cell>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let sites = site_count(width, height)?;
        Ok(Self {
            width,
            height,
            sites: vec![None; sites],
        })
    }

    /// Fill a grid from the sampling parameters in `config`
    pub fn random<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<Self, GridError> {
        let surface = &config.surface;
        let genes = &config.genes;
        let mut grid = Self::new(surface.width, surface.height)?;

        for site in grid.sites.iter_mut() {
            if !rng.gen_bool(surface.initial_density) {
                continue;
            }
            let length = rng.gen_range(genes.min_length..=genes.max_length);
            let gene = Gene::random(rng, length, genes.defect_bias);
            let score = if surface.max_score > 0.0 {
                rng.gen_range(0.0..surface.max_score)
            } else {
                0.0
            };
            let age = rng.gen_range(0..=surface.max_age);
            *site = Some(Cell::new(gene).with_score(score).with_age(age));
        }

        log::debug!(
            "Sampled {}x{} grid: population={}",
            grid.width,
            grid.height,
            grid.population()
        );
        Ok(grid)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Put a cell on a site, returning whatever was there
    pub fn place(&mut self, x: usize, y: usize, cell: Cell) -> Result<Option<Cell>, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.sites[idx].replace(cell))
    }

    /// Cell at a site, if any
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).ok().and_then(|idx| self.sites[idx].as_ref())
    }

    /// Build a grid by filling sites in row-major order
    pub fn from_cells<I>(width: usize, height: usize, cells: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Self::new(width, height)?;
        let capacity = grid.sites.len();
        for (idx, cell) in cells.into_iter().enumerate() {
            if idx >= capacity {
                return Err(GridError::OutOfBounds {
                    x: idx % width.max(1),
                    y: idx / width.max(1),
                    width,
                    height,
                });
            }
            grid.sites[idx] = Some(cell);
        }
        Ok(grid)
    }

    /// Save snapshot to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), GridError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load snapshot from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let json = std::fs::read_to_string(path)?;
        let grid: Grid = serde_json::from_str(&json)?;
        let expected = site_count(grid.width, grid.height)?;
        if grid.sites.len() != expected {
            return Err(GridError::SiteCount {
                expected,
                found: grid.sites.len(),
            });
        }
        Ok(grid)
    }
}

fn site_count(width: usize, height: usize) -> Result<usize, GridError> {
    width
        .checked_mul(height)
        .ok_or(GridError::Dimensions { width, height })
}

impl Surface for Grid {
    type Cell = Cell;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn population(&self) -> usize {
        self.sites.iter().filter(|s| s.is_some()).count()
    }

    fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&Cell),
    {
        for cell in self.sites.iter().flatten() {
            f(cell);
        }
    }

    fn enumerate_all(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.sites.iter().flatten()
    }

    fn map_size(&self) -> usize {
        self.sites.len()
    }
}
