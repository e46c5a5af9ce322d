//! Fixed parameters of the demo programs.

use std::path::PathBuf;

/// Image compression demo.
pub struct CompressionDemo {
    pub image_path: PathBuf,
    pub output_dir: PathBuf,
    /// Ranks of the reconstructions shown next to the original
    pub ranks: Vec<usize>,
    /// Number of tiles per row in the reconstruction grid
    pub grid_columns: usize,
}

impl Default for CompressionDemo {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("data").join("dog.jpeg"),
            output_dir: PathBuf::from("results"),
            ranks: vec![10, 30, 150],
            grid_columns: 2,
        }
    }
}

impl CompressionDemo {
    pub fn reconstructions_path(&self) -> PathBuf {
        self.output_dir.join("image_recons.png")
    }

    pub fn singular_values_path(&self) -> PathBuf {
        self.output_dir.join("sigma_v_r.png")
    }

    pub fn cumulative_energy_path(&self) -> PathBuf {
        self.output_dir.join("cum_sum.png")
    }
}

/// Geometry demo.
pub struct GeometryDemo {
    pub theta_v_deg: f64,
    pub theta_u_deg: f64,
    pub sigma: (f64, f64),
    pub circle_samples: usize,
    pub output_path: PathBuf,
}

impl Default for GeometryDemo {
    fn default() -> Self {
        Self {
            theta_v_deg: 45.0,
            theta_u_deg: -30.0,
            sigma: (2.0, 0.8),
            circle_samples: 400,
            output_path: PathBuf::from("results").join("svd_geometry.png"),
        }
    }
}

/// Location of the point cloud archive, relative to the working directory.
pub struct ArchiveLayout {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        let data = PathBuf::from("data");
        Self {
            archive: data.join("Point cloud LIDAR (Toronto 3D).zip"),
            destination: data.join("LIDAR data"),
        }
    }
}
