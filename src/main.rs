use anyhow::{Context, Result, bail};
use log::{error, info};
use std::env;
use winscan_cv::{
    DetectionConfig, PostProcessor, SlidingWindowDetector, Template, TemplateClassifier,
};

mod cli;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let program = env::args().next().unwrap_or_else(|| "winscan".to_string());
    let args = match cli::parse_args(&program, env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => bail!(message),
    };

    // Configuration problems abort before any image is read
    let config = DetectionConfig::from_file(&args.config_path)?;
    let template = Template::load(&config.template_path)?;
    let classifier = TemplateClassifier::new(&template, config.scan.window)?;
    let detector = SlidingWindowDetector::new(config.scan.clone(), classifier)?;

    if args.parallel {
        return run_parallel(&detector, &config, &args.images);
    }

    let mut processor = config
        .post_processing
        .build()
        .context("Failed to set up post-processing")?;
    info!("Post-processing: {}", processor.describe());

    let mut failures = 0usize;
    for path in &args.images {
        match detector.process_file(path, &mut processor) {
            Ok(report) => println!(
                "{}: {} detections, {} windows, {}ms",
                path.display(),
                report.detections,
                report.windows_evaluated,
                report.processing_time_ms
            ),
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    processor.shutdown()?;

    if failures > 0 {
        bail!("{failures} of {} images failed", args.images.len());
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn run_parallel(
    detector: &SlidingWindowDetector<TemplateClassifier>,
    config: &DetectionConfig,
    images: &[std::path::PathBuf],
) -> Result<()> {
    use winscan_core::ScoreHistogram;
    use winscan_cv::{PostProcessingConfig, ScoreHistogramAccumulator};

    let PostProcessingConfig::ScoreHistogram {
        min_th,
        extent_th,
        bandwidth,
        output,
    } = &config.post_processing
    else {
        bail!("--parallel only supports the score_histogram strategy");
    };

    let mut accumulator =
        ScoreHistogramAccumulator::new(*min_th, *extent_th, *bandwidth, output.as_deref())
            .context("Failed to set up post-processing")?;
    info!("Post-processing: {}", accumulator.describe());

    let template = ScoreHistogram::new(*min_th, *extent_th, *bandwidth)?;
    let merged = detector.histogram_batch(images, &template)?;
    accumulator.absorb(&merged)?;
    accumulator.shutdown()?;

    println!("{} scores histogrammed over {} images", merged.total(), images.len());
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn run_parallel(
    _detector: &SlidingWindowDetector<TemplateClassifier>,
    _config: &DetectionConfig,
    _images: &[std::path::PathBuf],
) -> Result<()> {
    bail!("built without the 'parallel' feature")
}
