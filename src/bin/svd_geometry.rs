//! Draw how a 2x2 SVD maps the unit circle, one factor at a time.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use svd_compression::config::GeometryDemo;
use svd_compression::geometry::{unit_circle, PlanarSVD};
use svd_compression::plot::plot_geometry_stages;

pub fn main() -> Result<()> {
    env_logger::init();

    let demo = GeometryDemo::default();

    let planar = PlanarSVD::from_angles(demo.theta_v_deg, demo.theta_u_deg, demo.sigma);
    let stages = planar.stages(&unit_circle(demo.circle_samples));

    if let Some(parent) = demo.output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }

    plot_geometry_stages(&demo.output_path, &stages)?;

    info!(
        "Wrote {} stages of U Sigma V^T = {:?} to {}",
        stages.len(),
        planar.to_mat().into_raw_vec(),
        demo.output_path.display()
    );
    Ok(())
}
