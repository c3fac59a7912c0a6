use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use floating_core::{CameraConfig, FlyCamera, FrameInput, Mat4, Vec3, Vec4};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floating-cli", about = "Inspect the camera math without opening a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON camera config; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the active camera config
    Info,
    /// Print the camera basis and the matrices for one camera pose
    Mvp {
        /// Yaw in degrees (-90 looks down -z)
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        yaw: f32,
        /// Pitch in degrees, positive looks down
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        /// Camera position as x,y,z
        #[arg(long, default_value = "0,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
        pos: Vec3,
    },
    /// Sweep yaw/pitch and verify view inverses and near/far plane depths
    Check {
        /// Samples per angle
        #[arg(short, long, default_value = "24")]
        steps: u32,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {} components", parts.len())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("loading camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("floating-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("core: {}", floating_core::crate_info());
            println!(
                "projection: fov={} near={} far={} aspect={:.3}",
                config.fov_degrees, config.near, config.far, config.aspect
            );
            println!(
                "motion: sensitivity={} speed={} roam_radius={}",
                config.sensitivity, config.speed, config.roam_radius
            );
        }
        Commands::Mvp { yaw, pitch, pos } => {
            let mut camera = FlyCamera::new(config);
            camera.yaw = yaw.to_radians();
            camera.pitch = pitch
                .to_radians()
                .clamp(-FlyCamera::PITCH_LIMIT, FlyCamera::PITCH_LIMIT);
            camera.position = pos;

            let output = camera.advance(&FrameInput::default())?;
            let cam = output.camera;
            println!("pos: ({:.3}, {:.3}, {:.3})", cam.pos.x, cam.pos.y, cam.pos.z);
            println!("i:   ({:.3}, {:.3}, {:.3})", cam.i.x, cam.i.y, cam.i.z);
            println!("j:   ({:.3}, {:.3}, {:.3})", cam.j.x, cam.j.y, cam.j.z);
            println!("k:   ({:.3}, {:.3}, {:.3})", cam.k.x, cam.k.y, cam.k.z);
            println!("\nmodel:\n{}", Mat4::model(camera.config.model_translation));
            println!("view:\n{}", cam.view_matrix()?);
            println!("projection:\n{}", camera.config.projection()?);
            println!("mvp (column-major upload):\n{}", output.mvp);
        }
        Commands::Check { steps } => {
            let report = sweep(&config, steps.max(1))?;
            println!(
                "checked {} poses: worst inverse residual {:.2e}, worst near depth error {:.2e}",
                report.poses, report.worst_residual, report.worst_depth
            );
            if report.failures > 0 {
                anyhow::bail!("{} poses failed the consistency check", report.failures);
            }
            println!("OK");
        }
    }

    Ok(())
}

struct SweepReport {
    poses: usize,
    failures: usize,
    worst_residual: f32,
    worst_depth: f32,
}

/// Runs every yaw/pitch pair through the view and projection pipeline.
fn sweep(config: &CameraConfig, steps: u32) -> anyhow::Result<SweepReport> {
    let _span = tracing::info_span!("sweep", steps).entered();
    let projection = config.projection()?;
    let near = (projection * Vec4::new(0.0, 0.0, -config.near, 1.0)).perspective_divide();
    let worst_depth = (near.z + 1.0).abs();

    let mut report = SweepReport {
        poses: 0,
        failures: 0,
        worst_residual: 0.0,
        worst_depth,
    };

    for y in 0..steps {
        for p in 0..=steps {
            let mut camera = FlyCamera::new(config.clone());
            camera.yaw = TAU * y as f32 / steps as f32;
            camera.pitch = -FlyCamera::PITCH_LIMIT
                + 2.0 * FlyCamera::PITCH_LIMIT * p as f32 / steps as f32;
            report.poses += 1;

            let residual = camera
                .camera()
                .and_then(|c| c.view_matrix())
                .and_then(|view| Ok((view, view.inverse()?)))
                .map(|(view, inverse)| (inverse * view).max_abs_diff(&Mat4::IDENTITY));
            match residual {
                Ok(r) => report.worst_residual = report.worst_residual.max(r),
                Err(e) => {
                    tracing::warn!(yaw = camera.yaw, pitch = camera.pitch, "pose failed: {e}");
                    report.failures += 1;
                }
            }
        }
    }
    Ok(report)
}
