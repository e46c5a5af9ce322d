//! Singular value decompositions and their low-rank reconstruction.
//!
//! The thin SVD of a matrix $A\in\mathbb{C}^{m\times n}$ is $A = U\Sigma V^H$, where
//! $U\in\mathbb{C}^{m\times k}$ has orthonormal columns, $V^H\in\mathbb{C}^{k\times n}$ has
//! orthonormal rows and $\Sigma = \mathrm{diag}(\sigma_1, \dots, \sigma_k)$ with
//! $\sigma_1\geq\sigma_2\geq\dots\geq\sigma_k\geq 0$. Here $k=\min\{m, n\}$.
//!
//! Keeping only the first $r$ columns of $U$, the first $r$ singular values and the
//! first $r$ rows of $V^H$ gives the best rank $r$ approximation of $A$ in the
//! Frobenius norm (Eckart-Young). The residual of this approximation is
//! $\left(\sum_{i>r}\sigma_i^2\right)^{1/2}$ and therefore non-increasing in $r$.

use crate::types::{c32, c64, norm_fro, Lapack, Result, Scalar, SvdCompressionError};
use crate::CompressionType;
use itertools::Itertools;
use log::debug;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use ndarray_linalg::{JobSvd, SVDDCInto};
use num::{ToPrimitive, Zero};

pub struct SVD<A: Scalar> {
    /// The U matrix
    pub u: Array2<A>,
    /// The array of singular values
    pub s: Array1<A::Real>,
    /// The vt matrix
    pub vt: Array2<A>,
}

/// Reconstruct the rank `rank` approximation `u[:, :rank] diag(s[:rank]) vt[:rank, :]`.
///
/// The factors must satisfy `u.ncols() == s.len() == vt.nrows()` and `rank` must lie in
/// `1..=s.len()`. Out of range ranks are an error rather than being clamped.
///
/// The singular values are assumed to be non-negative and sorted in descending order
/// and the factors to be orthonormal. These preconditions are not checked here, see
/// [`SVDTraits::check_singular_values`].
pub fn reconstruct<A: Scalar>(
    u: ArrayView2<A>,
    s: ArrayView1<A::Real>,
    vt: ArrayView2<A>,
    rank: usize,
) -> Result<Array2<A>> {
    check_factor_shapes(u, s, vt)?;

    let max_rank = s.len();
    if rank == 0 || rank > max_rank {
        return Err(SvdCompressionError::RankError { rank, max_rank });
    }

    Ok(scaled_product(
        u.slice(s![.., 0..rank]),
        s.slice(s![0..rank]),
        vt.slice(s![0..rank, ..]),
    ))
}

fn check_factor_shapes<A: Scalar>(
    u: ArrayView2<A>,
    s: ArrayView1<A::Real>,
    vt: ArrayView2<A>,
) -> Result<()> {
    if u.ncols() != s.len() || vt.nrows() != s.len() {
        return Err(SvdCompressionError::ShapeError(format!(
            "u is {}x{}, s has length {}, vt is {}x{}",
            u.nrows(),
            u.ncols(),
            s.len(),
            vt.nrows(),
            vt.ncols()
        )));
    }
    Ok(())
}

// u * diag(s) * vt, scaling the rows of vt instead of forming diag(s).
fn scaled_product<A: Scalar>(
    u: ArrayView2<A>,
    s: ArrayView1<A::Real>,
    vt: ArrayView2<A>,
) -> Array2<A> {
    let mut scaled_vt = vt.to_owned();

    Zip::from(scaled_vt.axis_iter_mut(Axis(0)))
        .and(s)
        .for_each(|mut row, &s_elem| row.map_inplace(|item| *item *= A::from_real(s_elem)));

    u.dot(&scaled_vt)
}

/// Traits for the singular value decomposition
pub trait SVDTraits {
    type A: Scalar + Lapack;

    /// Number of rows
    fn nrows(&self) -> usize {
        self.get_u().nrows()
    }

    /// Number of columns
    fn ncols(&self) -> usize {
        self.get_vt().ncols()
    }

    /// Number of retained singular values
    fn rank(&self) -> usize {
        self.get_s().len()
    }

    /// Convert the SVD to a matrix
    fn to_mat(&self) -> Array2<Self::A> {
        scaled_product(self.get_u(), self.get_s(), self.get_vt())
    }

    /// Return the rank `rank` reconstruction of the decomposed matrix.
    fn reconstruct(&self, rank: usize) -> Result<Array2<Self::A>> {
        reconstruct(self.get_u(), self.get_s(), self.get_vt(), rank)
    }

    /// Frobenius norm of `original` minus the rank `rank` reconstruction.
    fn residual_fro(
        &self,
        original: ArrayView2<Self::A>,
        rank: usize,
    ) -> Result<<Self::A as Scalar>::Real> {
        let approx = self.reconstruct(rank)?;
        if approx.dim() != original.dim() {
            return Err(SvdCompressionError::ShapeError(format!(
                "reconstruction is {:?}, original is {:?}",
                approx.dim(),
                original.dim()
            )));
        }
        Ok(norm_fro((approx - &original).view()))
    }

    /// Return true if the singular values are non-negative and sorted descending.
    fn check_singular_values(&self) -> bool {
        let s = self.get_s();
        s.iter().all(|&item| item >= <Self::A as Scalar>::Real::zero())
            && s.iter().tuple_windows().all(|(first, second)| first >= second)
    }

    /// Compress by giving a target rank
    fn compress_svd_rank(&self, rank: usize) -> Result<SVD<Self::A>> {
        let (u, s, vt) = (self.get_u(), self.get_s(), self.get_vt());

        let max_rank = s.len();
        if rank == 0 || rank > max_rank {
            return Err(SvdCompressionError::RankError { rank, max_rank });
        }

        debug!("Truncating SVD from rank {} to rank {}", max_rank, rank);

        Ok(SVD {
            u: u.slice(s![.., 0..rank]).into_owned(),
            s: s.slice(s![0..rank]).into_owned(),
            vt: vt.slice(s![0..rank, ..]).into_owned(),
        })
    }

    /// Compress by specifying a relative tolerance
    ///
    /// Keeps the leading singular values with $\sigma_i / \sigma_1 \geq$ `tol`.
    fn compress_svd_tolerance(&self, tol: f64) -> Result<SVD<Self::A>> {
        if !((0.0..1.0).contains(&tol)) {
            return Err(SvdCompressionError::ToleranceError(tol));
        }

        let s = self.get_s();
        let first = match s.get(0) {
            Some(&first) => first,
            None => return Err(SvdCompressionError::CompressionError),
        };

        let pos = s
            .iter()
            .position(|&item| (item / first).to_f64().map_or(false, |ratio| ratio < tol));

        match pos {
            Some(index) => self.compress_svd_rank(index),
            None => Err(SvdCompressionError::CompressionError),
        }
    }

    /// Compress the SVD by rank or tolerance
    fn compress(&self, compression_type: CompressionType) -> Result<SVD<Self::A>> {
        match compression_type {
            CompressionType::ADAPTIVE(tol) => self.compress_svd_tolerance(tol),
            CompressionType::RANK(rank) => self.compress_svd_rank(rank),
        }
    }

    /// Compute the thin SVD of a given array
    fn compute_from(arr: ArrayView2<Self::A>) -> Result<SVD<Self::A>>;

    /// Return the U matrix
    fn get_u(&self) -> ArrayView2<Self::A>;

    /// Return the singular values
    fn get_s(&self) -> ArrayView1<<Self::A as Scalar>::Real>;

    /// Return the Vt matrix
    fn get_vt(&self) -> ArrayView2<Self::A>;
}

macro_rules! svd_impl {
    ($scalar:ty) => {
        impl SVDTraits for SVD<$scalar> {
            type A = $scalar;

            fn compute_from(arr: ArrayView2<Self::A>) -> Result<SVD<Self::A>> {
                let (u, s, vt) = arr.to_owned().svddc_into(JobSvd::Some)?;
                let u = u.ok_or(SvdCompressionError::MissingFactor("U"))?;
                let vt = vt.ok_or(SvdCompressionError::MissingFactor("Vt"))?;

                debug!(
                    "Computed SVD of {}x{} matrix: U={:?}, S={}, Vt={:?}",
                    arr.nrows(),
                    arr.ncols(),
                    u.dim(),
                    s.len(),
                    vt.dim()
                );

                Ok(SVD { u, s, vt })
            }

            fn get_u(&self) -> ArrayView2<Self::A> {
                self.u.view()
            }

            fn get_s(&self) -> ArrayView1<<Self::A as Scalar>::Real> {
                self.s.view()
            }

            fn get_vt(&self) -> ArrayView2<Self::A> {
                self.vt.view()
            }
        }
    };
}

svd_impl!(f32);
svd_impl!(f64);
svd_impl!(c32);
svd_impl!(c64);

#[cfg(test)]
mod tests {

    use super::*;
    use crate::random_matrix::RandomMatrix;
    use crate::types::RelDiff;
    use ndarray::array;

    macro_rules! svd_round_trip_tests {
        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_approximate_low_rank_matrix($dim, 1.0, 1E-3, &mut rng).unwrap();

            let svd = SVD::<$scalar>::compute_from(mat.view()).unwrap();
            let k = std::cmp::min($dim.0, $dim.1);

            assert_eq!(svd.rank(), k);
            assert!(svd.check_singular_values());
            assert!(<$scalar>::rel_diff_fro(svd.to_mat().view(), mat.view()) < $tol);
            assert!(<$scalar>::rel_diff_fro(svd.reconstruct(k).unwrap().view(), mat.view()) < $tol);
        }
            )*
        };
    }

    macro_rules! residual_monotonicity_tests {
        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_approximate_low_rank_matrix($dim, 1.0, 1E-3, &mut rng).unwrap();
            let svd = SVD::<$scalar>::compute_from(mat.view()).unwrap();
            let norm = norm_fro(mat.view());

            let residuals: Vec<_> = (1..=svd.rank())
                .map(|rank| svd.residual_fro(mat.view(), rank).unwrap())
                .collect();

            for (first, second) in residuals.iter().tuple_windows() {
                assert!(*second <= *first + $tol * norm);
            }
        }
            )*
        };
    }

    macro_rules! reconstruction_shape_tests {
        ($($name:ident: $scalar:ty, $dim:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_gaussian($dim, &mut rng);
            let svd = SVD::<$scalar>::compute_from(mat.view()).unwrap();

            for rank in 1..=svd.rank() {
                assert_eq!(svd.reconstruct(rank).unwrap().dim(), $dim);
            }
        }
            )*
        };
    }

    macro_rules! rank_one_tests {
        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_gaussian($dim, &mut rng);
            let svd = SVD::<$scalar>::compute_from(mat.view()).unwrap();

            let sigma = <$scalar>::from_real(svd.s[0]);
            let outer = svd
                .u
                .column(0)
                .insert_axis(Axis(1))
                .dot(&svd.vt.row(0).insert_axis(Axis(0)))
                .mapv(|item| item * sigma);

            let actual = svd.reconstruct(1).unwrap();
            assert!(<$scalar>::rel_diff_fro(actual.view(), outer.view()) < $tol);
        }
            )*
        };
    }

    macro_rules! rank_bound_tests {
        ($($name:ident: $scalar:ty, $dim:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_gaussian($dim, &mut rng);
            let svd = SVD::<$scalar>::compute_from(mat.view()).unwrap();
            let k = svd.rank();

            assert!(matches!(
                svd.reconstruct(0),
                Err(SvdCompressionError::RankError { rank: 0, max_rank }) if max_rank == k
            ));
            assert!(matches!(
                svd.reconstruct(k + 1),
                Err(SvdCompressionError::RankError { rank, max_rank }) if rank == k + 1 && max_rank == k
            ));
        }
            )*
        };
    }

    macro_rules! svd_compression_by_rank_tests {
        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let rank: usize = 20;

            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_approximate_low_rank_matrix($dim, 1.0, 1E-10, &mut rng).unwrap();

            let svd = SVD::<$scalar>::compute_from(mat.view())
                .unwrap()
                .compress(CompressionType::RANK(rank))
                .unwrap();

            assert_eq!(svd.u.len_of(Axis(1)), rank);
            assert_eq!(svd.vt.len_of(Axis(0)), rank);
            assert_eq!(svd.to_mat().dim(), $dim);
            assert!(<$scalar>::rel_diff_fro(svd.to_mat().view(), mat.view()) < $tol);
        }
            )*
        };
    }

    macro_rules! svd_compression_by_tol_tests {
        ($($name:ident: $scalar:ty, $dim:expr, $tol:expr,)*) => {
            $(
        #[test]
        fn $name() {
            let mut rng = rand::thread_rng();
            let mat = <$scalar>::random_approximate_low_rank_matrix($dim, 1.0, 1E-10, &mut rng).unwrap();

            let svd = SVD::<$scalar>::compute_from(mat.view())
                .unwrap()
                .compress(CompressionType::ADAPTIVE($tol))
                .unwrap();

            assert!(<$scalar>::rel_diff_fro(svd.to_mat().view(), mat.view()) < 10.0 * $tol);
            assert!(svd.rank() < std::cmp::min($dim.0, $dim.1));
        }
            )*
        };
    }

    svd_round_trip_tests! {
        test_svd_round_trip_f32_thin: f32, (100, 50), 1E-5,
        test_svd_round_trip_c32_thin: c32, (100, 50), 1E-5,
        test_svd_round_trip_f64_thin: f64, (100, 50), 1E-12,
        test_svd_round_trip_c64_thin: c64, (100, 50), 1E-12,
        test_svd_round_trip_f32_thick: f32, (50, 100), 1E-5,
        test_svd_round_trip_c32_thick: c32, (50, 100), 1E-5,
        test_svd_round_trip_f64_thick: f64, (50, 100), 1E-12,
        test_svd_round_trip_c64_thick: c64, (50, 100), 1E-12,
    }

    residual_monotonicity_tests! {
        test_residual_monotone_f32: f32, (60, 30), 1E-5,
        test_residual_monotone_c32: c32, (30, 60), 1E-5,
        test_residual_monotone_f64: f64, (60, 30), 1E-12,
        test_residual_monotone_c64: c64, (30, 60), 1E-12,
    }

    reconstruction_shape_tests! {
        test_reconstruction_shape_f64_thin: f64, (12, 5),
        test_reconstruction_shape_f64_thick: f64, (5, 12),
        test_reconstruction_shape_c64_square: c64, (7, 7),
    }

    rank_one_tests! {
        test_rank_one_f32: f32, (20, 10), 1E-5,
        test_rank_one_f64: f64, (20, 10), 1E-12,
        test_rank_one_c64: c64, (10, 20), 1E-12,
    }

    rank_bound_tests! {
        test_rank_bounds_f32: f32, (8, 6),
        test_rank_bounds_f64: f64, (6, 8),
        test_rank_bounds_c32: c32, (8, 6),
        test_rank_bounds_c64: c64, (6, 8),
    }

    svd_compression_by_rank_tests! {
        test_svd_compression_by_rank_f32_thin: f32, (100, 50), 1E-4,
        test_svd_compression_by_rank_c32_thin: c32, (100, 50), 1E-4,
        test_svd_compression_by_rank_f64_thin: f64, (100, 50), 1E-4,
        test_svd_compression_by_rank_c64_thin: c64, (100, 50), 1E-4,
        test_svd_compression_by_rank_f32_thick: f32, (50, 100), 1E-4,
        test_svd_compression_by_rank_c32_thick: c32, (50, 100), 1E-4,
        test_svd_compression_by_rank_f64_thick: f64, (50, 100), 1E-4,
        test_svd_compression_by_rank_c64_thick: c64, (50, 100), 1E-4,
    }

    svd_compression_by_tol_tests! {
        test_svd_compression_by_tol_f32_thin: f32, (100, 50), 1E-4,
        test_svd_compression_by_tol_c32_thin: c32, (100, 50), 1E-4,
        test_svd_compression_by_tol_f64_thin: f64, (100, 50), 1E-4,
        test_svd_compression_by_tol_c64_thin: c64, (100, 50), 1E-4,
        test_svd_compression_by_tol_f32_thick: f32, (50, 100), 1E-4,
        test_svd_compression_by_tol_c32_thick: c32, (50, 100), 1E-4,
        test_svd_compression_by_tol_f64_thick: f64, (50, 100), 1E-4,
        test_svd_compression_by_tol_c64_thick: c64, (50, 100), 1E-4,
    }

    #[test]
    fn test_reconstruct_diagonal_factorization() {
        let u = array![[1.0, 0.0], [0.0, 1.0]];
        let s = array![3.0, 1.0];
        let vt = array![[1.0, 0.0], [0.0, 1.0]];

        let first = reconstruct(u.view(), s.view(), vt.view(), 1).unwrap();
        let second = reconstruct(u.view(), s.view(), vt.view(), 2).unwrap();

        assert_eq!(first, array![[3.0, 0.0], [0.0, 0.0]]);
        assert_eq!(second, array![[3.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_reconstruct_is_deterministic() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((30, 20), &mut rng);
        let svd = SVD::<f64>::compute_from(mat.view()).unwrap();

        for rank in [1, 7, 20] {
            assert_eq!(svd.reconstruct(rank).unwrap(), svd.reconstruct(rank).unwrap());
        }
    }

    #[test]
    fn test_reconstruct_rejects_mismatched_factors() {
        let u = Array2::<f64>::zeros((4, 3));
        let s = Array1::<f64>::ones(2);
        let vt = Array2::<f64>::zeros((2, 5));

        let result = reconstruct(u.view(), s.view(), vt.view(), 1);
        assert!(matches!(result, Err(SvdCompressionError::ShapeError(_))));
    }

    #[test]
    fn test_residual_matches_discarded_singular_values() {
        let mut rng = rand::thread_rng();
        let singvals = array![4.0, 3.0, 2.0, 1.0];
        let mat = f64::random_matrix_with_singular_values((9, 4), singvals.view(), &mut rng).unwrap();
        let svd = SVD::<f64>::compute_from(mat.view()).unwrap();

        let residual = svd.residual_fro(mat.view(), 2).unwrap();
        let expected = (2.0_f64.powi(2) + 1.0_f64.powi(2)).sqrt();
        assert!((residual - expected).abs() < 1E-12);
    }

    #[test]
    fn test_residual_rejects_other_shape() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((6, 4), &mut rng);
        let other = f64::random_gaussian((4, 6), &mut rng);
        let svd = SVD::<f64>::compute_from(mat.view()).unwrap();

        assert!(matches!(
            svd.residual_fro(other.view(), 2),
            Err(SvdCompressionError::ShapeError(_))
        ));
    }

    #[test]
    fn test_check_singular_values_detects_unsorted_values() {
        let svd = SVD::<f64> {
            u: Array2::eye(3),
            s: array![1.0, 2.0, 0.5],
            vt: Array2::eye(3),
        };
        assert!(!svd.check_singular_values());

        let svd = SVD::<f64> {
            u: Array2::eye(2),
            s: array![1.0, -0.5],
            vt: Array2::eye(2),
        };
        assert!(!svd.check_singular_values());
    }

    #[test]
    fn test_compression_rejects_invalid_tolerance() {
        let mut rng = rand::thread_rng();
        let mat = f64::random_gaussian((10, 5), &mut rng);
        let svd = SVD::<f64>::compute_from(mat.view()).unwrap();

        assert!(matches!(
            svd.compress(CompressionType::ADAPTIVE(1.5)),
            Err(SvdCompressionError::ToleranceError(_))
        ));
        assert!(matches!(
            svd.compress(CompressionType::RANK(6)),
            Err(SvdCompressionError::RankError { rank: 6, max_rank: 5 })
        ));
    }

    #[test]
    fn test_compression_fails_when_tolerance_is_not_reached() {
        let svd = SVD::<f64> {
            u: Array2::eye(3),
            s: array![1.0, 0.9, 0.8],
            vt: Array2::eye(3),
        };
        assert!(matches!(
            svd.compress(CompressionType::ADAPTIVE(0.5)),
            Err(SvdCompressionError::CompressionError)
        ));
    }
}
