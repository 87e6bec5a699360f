//! Ember command line renderer.
//!
//! Renders one of the built-in scenes to a plain PPM file.

mod scenes;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ember_renderer::{render_parallel, Hittable, RenderConfig, DEFAULT_BUCKET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Command line options.
#[derive(Parser, Debug)]
#[command(author, version, about = "Offline Monte Carlo path tracer", long_about = None)]
struct Args {
    /// Number of render threads (positive integer, default 1)
    #[arg(allow_negative_numbers = true)]
    threads: Option<String>,

    /// Built-in scene index (1-7)
    #[arg(default_value_t = 1)]
    scene: usize,

    /// Output PPM path
    #[arg(long, short = 'o', value_name = "FILE", default_value = "image.ppm")]
    output: PathBuf,

    /// Override the scene's samples per pixel
    #[arg(long, value_name = "NUM")]
    samples: Option<u32>,

    /// Override the image width; height follows the scene's aspect ratio
    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Parse the thread count, falling back to one on bad input.
fn thread_count(arg: Option<&str>) -> usize {
    let Some(arg) = arg else {
        return 1;
    };

    match arg.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            log::warn!("Invalid thread count '{arg}', using 1");
            1
        }
    }
}

/// Create the output file.
fn open_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let threads = thread_count(args.threads.as_deref());

    let Some((name, build)) = scenes::find(args.scene) else {
        bail!("Unknown scene {} (expected 1-{})", args.scene, scenes::SCENES.len());
    };

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut scene = build(&mut rng);
    log::info!(
        "Built scene '{}' with {} objects in {:.2?}",
        name,
        scene.world.len(),
        start.elapsed()
    );
    log::debug!("Scene bounds: {:?}", scene.world.bounding_box());

    if let Some(width) = args.width {
        scene.camera = scene.camera.with_aspect_ratio(scene.aspect_ratio, width);
    }
    if let Some(samples) = args.samples {
        scene.camera.samples_per_pixel = samples;
    }
    scene.camera.initialize();

    let config = RenderConfig {
        background: scene.background,
        seed: args.seed,
        bucket_size: DEFAULT_BUCKET_SIZE,
    };

    // Opened before rendering so a bad path fails fast
    let mut writer = open_output(&args.output)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to create render thread pool")?;
    let image = pool.install(|| render_parallel(&scene.camera, &scene.world, &config));

    image
        .write_ppm(&mut writer)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_count() {
        assert_eq!(thread_count(None), 1);
        assert_eq!(thread_count(Some("4")), 4);
        assert_eq!(thread_count(Some("0")), 1);
        assert_eq!(thread_count(Some("-2")), 1);
        assert_eq!(thread_count(Some("many")), 1);
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["ember", "8", "7", "-o", "box.ppm", "--samples", "4"]);
        assert_eq!(args.threads.as_deref(), Some("8"));
        assert_eq!(args.scene, 7);
        assert_eq!(args.output, PathBuf::from("box.ppm"));
        assert_eq!(args.samples, Some(4));
        assert_eq!(args.width, None);

        let args = Args::parse_from(["ember"]);
        assert_eq!(args.threads, None);
        assert_eq!(args.scene, 1);
        assert_eq!(args.output, PathBuf::from("image.ppm"));
    }

    #[test]
    fn test_open_output() {
        let dir = std::env::temp_dir().join(format!("ember_cli_out_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        assert!(open_output(&dir.join("image.ppm")).is_ok());

        let err = open_output(&dir.join("missing").join("image.ppm")).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_negative_thread_count_falls_back() {
        let args = Args::try_parse_from(["ember", "-2"]).unwrap();
        assert_eq!(args.threads.as_deref(), Some("-2"));
        assert_eq!(args.scene, 1);
        assert_eq!(thread_count(args.threads.as_deref()), 1);

        let args = Args::try_parse_from(["ember", "-2", "3", "-o", "out.ppm"]).unwrap();
        assert_eq!(thread_count(args.threads.as_deref()), 1);
        assert_eq!(args.scene, 3);
        assert_eq!(args.output, PathBuf::from("out.ppm"));

        // Flags still parse as flags when no thread count is given
        let args = Args::try_parse_from(["ember", "-o", "flag.ppm"]).unwrap();
        assert_eq!(args.threads, None);
        assert_eq!(args.output, PathBuf::from("flag.ppm"));
    }
}
