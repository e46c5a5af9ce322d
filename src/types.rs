//! Error type, result alias and norm helpers shared by all modules.

use ndarray::{ArrayView1, ArrayView2};
use ndarray_linalg::error::LinalgError;
use ndarray_linalg::Norm;
use thiserror::Error;

pub use ndarray_linalg::{c32, c64, Lapack, Scalar};

#[derive(Error, Debug)]
pub enum SvdCompressionError {
    #[error("Lapack Error: {0}")]
    LinalgError(#[from] LinalgError),
    #[error("SVD did not return the {0} factor")]
    MissingFactor(&'static str),
    #[error("Rank {rank} outside of the admissible range 1..={max_rank}")]
    RankError { rank: usize, max_rank: usize },
    #[error("Incompatible factor shapes: {0}")]
    ShapeError(String),
    #[error("Tolerance {0} outside of the admissible range")]
    ToleranceError(f64),
    #[error("Could not compress to desired tolerance")]
    CompressionError,
    #[error("Image Error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Archive Error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),
    #[error("Plotting failed: {0}")]
    PlotError(String),
}

pub type Result<T> = std::result::Result<T, SvdCompressionError>;

/// Frobenius norm of a matrix.
///
/// The entrywise l2 norm of a two dimensional array is its Frobenius norm, so
/// this does not need to go through LAPACK.
pub fn norm_fro<A: Scalar + Lapack>(mat: ArrayView2<A>) -> A::Real {
    mat.norm_l2()
}

pub trait RelDiff {
    type A: Scalar + Lapack;

    /// Return the relative Frobenius norm difference of `first` and `second`.
    fn rel_diff_fro(
        first: ArrayView2<Self::A>,
        second: ArrayView2<Self::A>,
    ) -> <<Self as RelDiff>::A as Scalar>::Real;

    /// Return the relative l2 vector norm difference of `first` and `second`.
    fn rel_diff_l2(
        first: ArrayView1<Self::A>,
        second: ArrayView1<Self::A>,
    ) -> <<Self as RelDiff>::A as Scalar>::Real;
}

macro_rules! rel_diff_impl {
    ($scalar:ty) => {
        impl RelDiff for $scalar {
            type A = $scalar;
            fn rel_diff_fro(
                first: ArrayView2<Self::A>,
                second: ArrayView2<Self::A>,
            ) -> <<Self as RelDiff>::A as Scalar>::Real {
                let diff = first.to_owned() - &second;
                norm_fro(diff.view()) / norm_fro(second)
            }

            fn rel_diff_l2(
                first: ArrayView1<Self::A>,
                second: ArrayView1<Self::A>,
            ) -> <<Self as RelDiff>::A as Scalar>::Real {
                let diff = first.to_owned() - &second;
                diff.norm_l2() / second.norm_l2()
            }
        }
    };
}

rel_diff_impl!(f32);
rel_diff_impl!(f64);
rel_diff_impl!(c32);
rel_diff_impl!(c64);
