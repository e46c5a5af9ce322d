//! Random test matrices with a prescribed singular value spectrum.

use crate::types::{Lapack, Result, Scalar, SvdCompressionError};
use ndarray::{Array, Array1, Array2, ArrayView1};
use ndarray_linalg::{JobSvd, SVDDCInto};
use num::complex::Complex;
use num::traits::cast::cast;
use num::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

pub trait RandomMatrix
where
    Self: Scalar + Lapack,
{
    /// Generate a random Gaussian matrix.
    ///
    /// # Arguments
    ///
    /// * `dimension`: Tuple (rows, cols) specifying the number of rows and columns.
    /// * `rng`: The random number generator to use.
    fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<Self>;

    /// Generate a random matrix with orthonormal rows or columns.
    ///
    /// If m >= n the returned matrix has orthonormal columns, otherwise it
    /// has orthonormal rows.
    fn random_orthogonal_matrix<R: Rng>(
        dimension: (usize, usize),
        rng: &mut R,
    ) -> Result<Array2<Self>> {
        let (m, n) = dimension;
        let transposed = n > m;

        // The left singular vectors of a tall Gaussian matrix are orthonormal.
        let shape = if transposed { (n, m) } else { (m, n) };
        let (u, _, _) = Self::random_gaussian(shape, rng).svddc_into(JobSvd::Some)?;
        let u = u.ok_or(SvdCompressionError::MissingFactor("U"))?;

        if transposed {
            Ok(u.t().map(|item| item.conj()))
        } else {
            Ok(u)
        }
    }

    /// Generate a random matrix `U diag(singvals) V^H` with the given singular values.
    ///
    /// The number of singular values must equal `min(m, n)`.
    fn random_matrix_with_singular_values<R: Rng>(
        dimension: (usize, usize),
        singvals: ArrayView1<f64>,
        rng: &mut R,
    ) -> Result<Array2<Self>> {
        let min_dim = std::cmp::min(dimension.0, dimension.1);
        if singvals.len() != min_dim {
            return Err(SvdCompressionError::ShapeError(format!(
                "expected {} singular values for a {}x{} matrix, got {}",
                min_dim,
                dimension.0,
                dimension.1,
                singvals.len()
            )));
        }

        let u = Self::random_orthogonal_matrix((dimension.0, min_dim), rng)?;
        let vt = Self::random_orthogonal_matrix((min_dim, dimension.1), rng)?;
        let sigma: Array1<Self> = singvals.map(|&item| Self::from_real(Self::real(item)));

        Ok(u.dot(&Array2::from_diag(&sigma).dot(&vt)))
    }

    /// Generate a random approximate low-rank matrix.
    ///
    /// The singular values are logarithmically distributed between
    /// `sigma_max` and `sigma_min`.
    ///
    /// # Arguments
    ///
    /// * `dimension`: Tuple (rows, cols) specifying the number of rows and columns.
    /// * `sigma_max`: Maximum singular value.
    /// * `sigma_min`: Minimum singular value.
    /// * `rng`: The random number generator to use.
    fn random_approximate_low_rank_matrix<R: Rng>(
        dimension: (usize, usize),
        sigma_max: f64,
        sigma_min: f64,
        rng: &mut R,
    ) -> Result<Array2<Self>> {
        if !(sigma_min > 0.0 && sigma_min < sigma_max) {
            return Err(SvdCompressionError::ToleranceError(sigma_min));
        }

        let min_dim = std::cmp::min(dimension.0, dimension.1);
        let singvals = Array::geomspace(sigma_max, sigma_min, min_dim)
            .ok_or(SvdCompressionError::ToleranceError(sigma_min))?;

        Self::random_matrix_with_singular_values(dimension, singvals.view(), rng)
    }
}

macro_rules! random_matrix_impl {
    ($scalar:ty, $gaussian:ident) => {
        impl RandomMatrix for $scalar {
            fn random_gaussian<R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<$scalar> {
                $gaussian(dimension, rng)
            }
        }
    };
}

random_matrix_impl!(f32, random_gaussian_real);
random_matrix_impl!(f64, random_gaussian_real);
random_matrix_impl!(Complex<f32>, random_gaussian_complex);
random_matrix_impl!(Complex<f64>, random_gaussian_complex);

fn sample_normal<T: Float, R: Rng>(rng: &mut R) -> T {
    let value: f64 = StandardNormal.sample(rng);
    cast::<f64, T>(value).unwrap_or_else(T::zero)
}

fn random_gaussian_real<T: Float, R: Rng>(dimension: (usize, usize), rng: &mut R) -> Array2<T> {
    Array2::from_shape_simple_fn(dimension, || sample_normal(rng))
}

fn random_gaussian_complex<T: Float, R: Rng>(
    dimension: (usize, usize),
    rng: &mut R,
) -> Array2<Complex<T>> {
    Array2::from_shape_simple_fn(dimension, || {
        let re = sample_normal(rng);
        let im = sample_normal(rng);
        Complex::new(re, im)
    })
}
