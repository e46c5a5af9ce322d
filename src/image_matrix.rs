//! Conversion between grayscale images and matrices.

use crate::types::{Result, SvdCompressionError};
use image::{imageops, GrayImage, Luma};
use log::debug;
use ndarray::{Array2, ArrayView2};
use std::path::Path;

/// Load an image from `path` and convert it to a matrix of luma values in `[0, 255]`.
///
/// Row `i` of the matrix is row `i` of the image, counted from the top.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let img = image::open(path.as_ref())?.into_luma8();
    debug!(
        "Loaded {} as {}x{} grayscale image",
        path.as_ref().display(),
        img.height(),
        img.width()
    );
    Ok(gray_to_matrix(&img))
}

pub fn gray_to_matrix(img: &GrayImage) -> Array2<f64> {
    Array2::from_shape_fn(
        (img.height() as usize, img.width() as usize),
        |(row, col)| f64::from(img.get_pixel(col as u32, row as u32)[0]),
    )
}

/// Convert a matrix back to a grayscale image.
///
/// Values are rounded and clamped to `[0, 255]`, since low-rank reconstructions
/// overshoot the range of the original pixels.
pub fn matrix_to_gray(mat: ArrayView2<f64>) -> Result<GrayImage> {
    let (height, width) = (to_u32(mat.nrows())?, to_u32(mat.ncols())?);
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let value = mat[[y as usize, x as usize]];
        Luma([value.round().clamp(0.0, 255.0) as u8])
    }))
}

/// Paste equally sized `tiles` into a grid with `columns` tiles per row.
///
/// Tiles are placed row by row. Unused cells of the last row stay black.
pub fn image_grid(tiles: &[GrayImage], columns: usize) -> Result<GrayImage> {
    let first = tiles
        .first()
        .ok_or_else(|| SvdCompressionError::ShapeError("no tiles to arrange".to_string()))?;
    if columns == 0 {
        return Err(SvdCompressionError::ShapeError(
            "grid needs at least one column".to_string(),
        ));
    }

    let (tile_width, tile_height) = first.dimensions();
    if let Some(other) = tiles.iter().find(|tile| tile.dimensions() != (tile_width, tile_height)) {
        return Err(SvdCompressionError::ShapeError(format!(
            "tile of size {:?} does not match {:?}",
            other.dimensions(),
            (tile_width, tile_height)
        )));
    }

    let rows = (tiles.len() + columns - 1) / columns;
    let grid_width = tile_width
        .checked_mul(to_u32(columns)?)
        .ok_or_else(|| grid_too_large(columns, rows))?;
    let grid_height = tile_height
        .checked_mul(to_u32(rows)?)
        .ok_or_else(|| grid_too_large(columns, rows))?;
    let mut grid = GrayImage::new(grid_width, grid_height);

    for (index, tile) in tiles.iter().enumerate() {
        let x = i64::from(tile_width) * (index % columns) as i64;
        let y = i64::from(tile_height) * (index / columns) as i64;
        imageops::replace(&mut grid, tile, x, y);
    }

    Ok(grid)
}

fn grid_too_large(columns: usize, rows: usize) -> SvdCompressionError {
    SvdCompressionError::ShapeError(format!("grid of {}x{} tiles is too large", rows, columns))
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| SvdCompressionError::ShapeError(format!("dimension {} too large", value)))
}
