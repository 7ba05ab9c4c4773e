use anyhow::Result;
use std::io::{self, Write};

use body_measure::camera::OpenCvCamera;
use body_measure::config::Config;
use body_measure::measure::MeasurementEngine;
use body_measure::pose::{ConfidenceThresholds, PoseDetector};
use body_measure::render::MinifbRenderer;
use body_measure::session::{parse_height, MeasurementSession};

const CONFIG_PATH: &str = "config.toml";
const WINDOW_TITLE: &str = "Privacy-First Body Measurements";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::load_or_default(CONFIG_PATH);

    println!("{}", "=".repeat(60));
    println!("Privacy-First Body Measurement System");
    println!("{}", "=".repeat(60));
    println!("\nPRIVACY ARCHITECTURE:");
    println!("  Processing locally on device");
    println!("  Only final measurements are shown, frames are discarded");
    println!("{}", "=".repeat(60));

    let height_cm = prompt_height(config.measurement.reference_height_cm)?;
    let engine = MeasurementEngine::new(height_cm)?;

    let mut camera = OpenCvCamera::open_with_resolution(
        config.camera.index,
        Some(config.camera.width),
        Some(config.camera.height),
    )?;
    let (width, height) = camera.resolution();
    println!("\nCamera opened: {}x{}", width, height);

    let detector = PoseDetector::new(
        &config.detection.model_path,
        ConfidenceThresholds::from_config(&config.detection),
    )?;
    let mut renderer = MinifbRenderer::new(WINDOW_TITLE, width as usize, height as usize)?;
    let mut session = MeasurementSession::new(detector, engine);

    println!("Stand in front of the camera with your full body visible.");
    println!("Press 'c' to calibrate, 'm' to measure, 'q' (or Esc) to quit.");

    while renderer.is_open() && session.is_running() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: could not read frame: {:#}", e);
                break;
            }
        };

        let command = renderer.poll_command();
        let report = session.process_frame(&frame, (width, height), command)?;

        renderer.draw_frame(&frame)?;
        if config.display.show_landmarks {
            if let Some(landmarks) = &report.landmarks {
                renderer.draw_landmarks(landmarks, &config.display);
            }
        }
        renderer.set_status(&format!(
            "Frame {} (discarded, not saved) | {}",
            report.frame_index,
            session.status_text()
        ));
        renderer.update()?;

        if let Some(outcome) = &report.outcome {
            println!("\n{}", outcome);
        }
    }

    println!("\n{}", session.stats().summary());
    Ok(())
}

/// 有効な身長が入力されるまで繰り返す
fn prompt_height(default_cm: f64) -> Result<f64> {
    loop {
        print!("\nEnter your height in centimeters (Enter for {}): ", default_cm);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            anyhow::bail!("stdin closed before a height was entered");
        }
        match parse_height(&input, default_cm) {
            Ok(height) => return Ok(height),
            Err(e) => println!("{}", e),
        }
    }
}
