//! The action of a 2x2 SVD on the unit circle.
//!
//! A real 2x2 matrix $A = U\Sigma V^T$ maps the unit circle in three steps: the
//! rotation $V^T$ leaves the circle in place but turns the canonical basis, the scaling
//! $\Sigma$ stretches it into an axis aligned ellipse with half axes $\sigma_1, \sigma_2$,
//! and the rotation $U$ turns the ellipse into its final position.

use ndarray::{array, Array1, Array2};
use std::f64::consts::PI;

/// Counter-clockwise rotation by `theta` radians.
pub fn rotation(theta: f64) -> Array2<f64> {
    let (sin, cos) = theta.sin_cos();
    array![[cos, -sin], [sin, cos]]
}

/// `samples` points of the unit circle as the columns of a 2 x `samples` matrix.
///
/// The angles are evenly spaced on $[0, 2\pi]$ including both end points, so the
/// first and last column coincide and the curve is closed when drawn.
pub fn unit_circle(samples: usize) -> Array2<f64> {
    let t = Array1::linspace(0.0, 2.0 * PI, samples);
    Array2::from_shape_fn((2, samples), |(coord, index)| match coord {
        0 => t[index].cos(),
        _ => t[index].sin(),
    })
}

/// One intermediate picture of the decomposition.
pub struct GeometryStage {
    /// Caption of the stage
    pub label: String,
    /// Transformed points, one per column
    pub points: Array2<f64>,
    /// Images of the canonical basis vectors, one per column
    pub basis: Array2<f64>,
}

/// The factors $U$, $\Sigma$ and $V$ of a real 2x2 matrix built from two rotation angles.
pub struct PlanarSVD {
    pub theta_v_deg: f64,
    pub theta_u_deg: f64,
    pub sigma: (f64, f64),
    pub u: Array2<f64>,
    pub v: Array2<f64>,
}

impl PlanarSVD {
    /// Factors with $V = R(\theta_V)$, $U = R(\theta_U)$ and $\Sigma = \mathrm{diag}(\sigma_1, \sigma_2)$.
    pub fn from_angles(theta_v_deg: f64, theta_u_deg: f64, sigma: (f64, f64)) -> Self {
        Self {
            theta_v_deg,
            theta_u_deg,
            sigma,
            u: rotation(theta_u_deg.to_radians()),
            v: rotation(theta_v_deg.to_radians()),
        }
    }

    pub fn sigma_mat(&self) -> Array2<f64> {
        Array2::from_diag(&array![self.sigma.0, self.sigma.1])
    }

    /// The composed matrix $U\Sigma V^T$.
    pub fn to_mat(&self) -> Array2<f64> {
        self.u.dot(&self.sigma_mat().dot(&self.v.t()))
    }

    /// Apply $V^T$, $\Sigma$ and $U$ to `points` one after the other.
    ///
    /// Returns four stages, starting with the untransformed points.
    pub fn stages(&self, points: &Array2<f64>) -> Vec<GeometryStage> {
        let vt = self.v.t().to_owned();
        let sigma_vt = self.sigma_mat().dot(&vt);
        let u_sigma_vt = self.u.dot(&sigma_vt);

        let transforms = [
            ("Unit circle".to_string(), Array2::eye(2)),
            (
                format!("Step 1: after V^T, rotation by {}°", self.theta_v_deg),
                vt,
            ),
            (
                format!(
                    "Step 2: after Sigma, scaling (s1={}, s2={})",
                    self.sigma.0, self.sigma.1
                ),
                sigma_vt,
            ),
            (
                format!("Step 3: after U, rotation by {}°", self.theta_u_deg),
                u_sigma_vt,
            ),
        ];

        transforms
            .into_iter()
            .map(|(label, transform)| GeometryStage {
                label,
                points: transform.dot(points),
                basis: transform,
            })
            .collect()
    }
}
