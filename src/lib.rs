//! Low-rank image compression with the singular value decomposition.
//!
//! The core of the crate is [`svd::reconstruct`], the rank $r$ reconstruction
//! $U_{:,1:r}\,\mathrm{diag}(\sigma_1,\dots,\sigma_r)\,V^H_{1:r,:}$ of a matrix from its SVD.
//! Around it sit the pieces of the demo programs in `src/bin`: spectrum statistics,
//! the geometry of a 2x2 SVD, grayscale image conversion, plotting and zip extraction.

pub mod archive;
pub mod config;
pub mod geometry;
pub mod image_matrix;
pub mod plot;
pub mod random_matrix;
pub mod spectrum;
pub mod svd;
pub mod types;

pub enum CompressionType {
    /// Adaptive compression with a specified tolerance
    ADAPTIVE(f64),
    /// Rank based compression with specified rank
    RANK(usize),
}

pub use archive::extract_archive;
pub use geometry::{GeometryStage, PlanarSVD};
pub use random_matrix::RandomMatrix;
pub use spectrum::{cumulative_energy, rank_for_energy};
pub use svd::{reconstruct, SVDTraits, SVD};
pub use types::{RelDiff, Result, SvdCompressionError};
