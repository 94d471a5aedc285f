//! Command-line configuration.

use clap::Parser;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectrum_grid")]
#[command(about = "Plays one track and lights up a grid of image cells from its spectrum", long_about = None)]
pub struct Args {
    /// Audio file to play (wav, mp3, ogg, flac)
    #[arg(value_name = "AUDIO", default_value = "assets/track.mp3")]
    pub audio: PathBuf,

    /// Directory holding the cell images
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets: PathBuf,

    /// Grid rows (magnitude levels)
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: u16,

    /// Grid columns (one frequency bin each)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: u16,

    /// Seed for the per-cell image draw (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Images shown by cells that are off
    #[arg(long, value_delimiter = ',', default_values = ["unlit1.jpg", "unlit2.jpg"])]
    pub inactive_images: Vec<String>,

    /// Images shown by cells that are lit
    #[arg(
        long,
        value_delimiter = ',',
        default_values = ["lit1.jpg", "lit2.jpg", "lit3.jpg", "lit4.jpg"]
    )]
    pub active_images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let args = Args::parse_from(["spectrum_grid"]);
        assert_eq!(args.rows, 32);
        assert_eq!(args.columns, 10);
        assert_eq!(args.inactive_images.len(), 2);
        assert_eq!(args.active_images.len(), 4);
        assert!(args.seed.is_none());
    }

    #[test]
    fn image_pools_split_on_commas() {
        let args = Args::parse_from(["spectrum_grid", "--active-images", "a.png,b.png", "song.wav"]);
        assert_eq!(args.active_images, vec!["a.png", "b.png"]);
        assert_eq!(args.audio, PathBuf::from("song.wav"));
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(Args::try_parse_from(["spectrum_grid", "--rows", "0"]).is_err());
    }
}
