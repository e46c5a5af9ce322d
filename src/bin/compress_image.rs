//! Compress a grayscale image with truncated SVDs and plot its singular value spectrum.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use svd_compression::config::CompressionDemo;
use svd_compression::image_matrix::{image_grid, load_grayscale, matrix_to_gray};
use svd_compression::plot::{plot_cumulative_energy, plot_singular_values};
use svd_compression::spectrum::cumulative_energy;
use svd_compression::{RelDiff, SVDTraits, SvdCompressionError, SVD};

pub fn main() -> Result<()> {
    env_logger::init();

    let demo = CompressionDemo::default();

    let mat = load_grayscale(&demo.image_path)
        .with_context(|| format!("Could not load {}", demo.image_path.display()))?;
    let svd = SVD::<f64>::compute_from(mat.view()).context("Could not compute the SVD")?;

    info!(
        "Dimensions: U={:?}, S={}, Vt={:?}",
        svd.u.dim(),
        svd.s.len(),
        svd.vt.dim()
    );

    fs::create_dir_all(&demo.output_dir)
        .with_context(|| format!("Could not create {}", demo.output_dir.display()))?;

    // The original image comes first in the grid, then one tile per rank.
    let mut tiles = vec![matrix_to_gray(mat.view())?];
    for &rank in &demo.ranks {
        match svd.reconstruct(rank) {
            Ok(approx) => {
                info!(
                    "Rank {:>4}: relative error {:1.3E}",
                    rank,
                    f64::rel_diff_fro(approx.view(), mat.view())
                );
                tiles.push(matrix_to_gray(approx.view())?);
            }
            Err(err @ SvdCompressionError::RankError { .. }) => {
                warn!("Skipping reconstruction: {}", err)
            }
            Err(err) => return Err(err.into()),
        }
    }

    let grid = image_grid(&tiles, demo.grid_columns)?;
    grid.save(demo.reconstructions_path())
        .with_context(|| format!("Could not write {}", demo.reconstructions_path().display()))?;

    plot_singular_values(demo.singular_values_path(), svd.s.view(), &demo.ranks)?;

    let energy = cumulative_energy(svd.s.view());
    plot_cumulative_energy(demo.cumulative_energy_path(), energy.view(), &demo.ranks)?;

    info!("Wrote plots to {}", demo.output_dir.display());
    Ok(())
}
