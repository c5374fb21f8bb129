//! Bin the pixels of an image by intensity and print a JSON summary.
//!
//! `cargo run --example bin_stats -- <image> [bins] [adaptive]`

use std::env;

use log::{info, LevelFilter};
use rankbin::core::init_with_level;
use rankbin::io::load_image;
use rankbin::report::BinningReport;
use rankbin::{BinningParams, RankedBinner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(LevelFilter::Info).map_err(|e| e.to_string())?;

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: bin_stats <image_path> [bins] [adaptive]");
        return Ok(());
    };
    let bins = args.get(2).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(8);
    let adaptive = args.get(3).is_some_and(|s| s == "adaptive");

    let img = load_image(path)?;
    let view = img.view(0).ok_or("image has no channels")?;
    info!("loaded {path}: {}x{}", img.width, img.height);

    // Pixel coordinates as payload, intensity as rank.
    let coords: Vec<(u32, u32)> = (0..img.height as u32)
        .flat_map(|y| (0..img.width as u32).map(move |x| (x, y)))
        .collect();

    let params = if adaptive {
        BinningParams::adaptive(bins)
    } else {
        BinningParams::equal_width(bins)
    };
    let binner = RankedBinner::new(&coords, view.data, &params)?;

    for bin in binner.iter() {
        let (sx, sy) = bin
            .data
            .iter()
            .fold((0u64, 0u64), |(sx, sy), &(x, y)| (sx + x as u64, sy + y as u64));
        let n = bin.count().max(1) as f64;
        info!(
            "bin {}: [{:.1}, {:.1}] {} px, centroid ({:.1}, {:.1})",
            bin.index,
            bin.begin,
            bin.end,
            bin.count(),
            sx as f64 / n,
            sy as f64 / n
        );
    }

    println!("{}", BinningReport::from_binner(&binner).to_json()?);
    Ok(())
}
