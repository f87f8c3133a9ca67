#[macro_use]
extern crate glium;

mod downloader;
mod error;
mod image_viewer;
mod radar;

use std::path::PathBuf;
use std::time::Duration;

use downloader::Downloader;
use image_viewer::{Kiosk, Renderer, Settings};

const RADAR_URL: &str = "https://api.buienradar.nl/image/1.0/radarmapbe?width=550";
// Shown whenever the radar can't be fetched or decoded, relative to the working directory
const FALLBACK_IMAGE: &str = "error.png";

const TARGET_WIDTH: u32 = 1440;
const TARGET_HEIGHT: u32 = 900;
const UPDATE_INTERVAL: Duration = Duration::from_millis(60 * 1000);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    let settings = Settings {
        fallback: PathBuf::from(FALLBACK_IMAGE),
        target: (TARGET_WIDTH, TARGET_HEIGHT),
        interval: UPDATE_INTERVAL,
    };

    let downloader = Downloader::new(RADAR_URL)?;
    let (renderer, events_loop) = Renderer::new("Radar Kiosk")?;

    let mut kiosk = Kiosk::start(renderer, downloader, settings)?;
    log::info!("Refreshing every {}s", UPDATE_INTERVAL.as_secs());

    events_loop.run(move |event, _, control_flow| kiosk.handle(event, control_flow))
}
