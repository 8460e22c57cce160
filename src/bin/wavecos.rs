//! wavecos - compare progressive dct and wavelet reconstructions
//!
//! Reads a raw planar rgb image, encodes it with both transforms,
//! and writes every reconstructed frame to a png file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use image::RgbImage;

use wavecos::prelude::*;


/// Visualize lossy reconstruction quality of a block DCT and a Haar wavelet pyramid.
#[derive(Parser, Debug)]
#[command(name = "wavecos")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    wavecos image.rgb 16384         Retain 4 coefficients per 8x8 block, and the same count for the wavelet
    wavecos image.rgb -1            Progressive dct, then progressive wavelet
    wavecos image.rgb -2            Both progressions side by side")]
struct Args {
    /// Raw planar rgb file: all red bytes, then all green bytes, then all blue bytes
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of coefficients to retain in the whole image,
    /// or -1 for the independent progressions, or -2 for the balanced progression
    #[arg(value_name = "BUDGET", allow_negative_numbers = true)]
    budget: i64,

    /// Directory that receives the png frames
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Width and height of the input image, a power of two
    #[arg(short, long, default_value_t = 512)]
    size: usize,

    /// Pause between two progressive frames, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 0)]
    frame_delay_ms: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CodecConfig::default().with_plane_side(args.size)?;

    // reject invalid budgets before reading or transforming anything
    let request = Request::from_argument(args.budget, &config)?;

    let image = read_planar_rgb_file(&args.input, config.plane_size())?;
    std::fs::create_dir_all(&args.output)?;

    let codec = Codec::new(config)?;
    let encoded = codec.encode(&image)?;
    let delay = Duration::from_millis(args.frame_delay_ms);

    match request {
        Request::Single { budget } => {
            let dct = codec.decode_dct(&encoded, budget)?;
            let dwt = codec.decode_dwt(&encoded, budget)?;

            log::debug!("mean absolute error: dct {:.3}, dwt {:.3}",
                dct.mean_absolute_error(&image), dwt.mean_absolute_error(&image));

            save_png(&dct, &args.output.join("dct.png"))?;
            save_png(&dwt, &args.output.join("dwt.png"))?;
            save_png(&side_by_side(&dct, &dwt), &args.output.join("dct_vs_dwt.png"))?;
        },

        Request::Progressive => {
            write_frames(Progression::new(&codec, &encoded, Schedule::Dct)?, &image, &args.output, "dct_progressive", delay)?;
            write_frames(Progression::new(&codec, &encoded, Schedule::Dwt)?, &image, &args.output, "dwt_progressive", delay)?;
        },

        Request::Balanced => {
            write_frames(Progression::new(&codec, &encoded, Schedule::Balanced)?, &image, &args.output, "balanced", delay)?;
        },
    }

    Ok(())
}

/// Pull every frame from the progression and write it as soon as it is decoded.
fn write_frames(
    frames: Progression<'_>, original: &PixelGrid, directory: &Path, prefix: &str, delay: Duration
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    for frame in frames {
        let frame = frame?;
        if frame.image.resolution == original.resolution {
            log::debug!("iteration {}: mean absolute error {:.3}",
                frame.step.iteration, frame.image.mean_absolute_error(original));
        }

        let path = directory.join(format!("{}_{:02}.png", prefix, frame.step.iteration));
        save_png(&frame.image, &path)?;

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    Ok(())
}

fn save_png(grid: &PixelGrid, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (width, height) = (u32::try_from(grid.resolution.width())?, u32::try_from(grid.resolution.height())?);

    let png = RgbImage::from_raw(width, height, grid.to_interleaved_bytes())
        .ok_or("pixel buffer does not match the image resolution")?;

    png.save(path)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
