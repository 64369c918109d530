// tests/pipeline_tests.rs
use image::{GrayImage, Luma};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::fs;
use std::path::PathBuf;
use winscan_core::{DetectionRecord, Location};
use winscan_cv::{
    Classifier, DetectionConfig, HardNegativeRecorder, PostProcessingConfig, PostProcessor,
    Result, ScanConfig, ScoreHistogramAccumulator, SlidingWindowDetector, Template,
    TemplateClassifier, WindowView, postprocess::read_bins,
};

struct MeanClassifier;

impl Classifier for MeanClassifier {
    fn score(&self, window: &WindowView<'_>) -> Result<f64> {
        let sum: u64 = window.pixels().map(u64::from).sum();
        Ok(sum as f64 / f64::from(window.width() * window.height()) / 255.0)
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("winscan-it-{}-{}", std::process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Black image with white squares of `size` at each anchor
fn squares(width: u32, height: u32, size: u32, anchors: &[(u32, u32)]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inside = anchors
            .iter()
            .any(|&(ax, ay)| (ax..ax + size).contains(&x) && (ay..ay + size).contains(&y));
        Luma([if inside { 255 } else { 0 }])
    })
}

fn scan_config(threshold: f64) -> ScanConfig {
    ScanConfig {
        window: (16, 16),
        stride: (8, 8),
        scales: vec![1.0],
        score_threshold: threshold,
    }
}

#[test]
fn hard_negative_log_lists_detections_per_image_in_scan_order() -> Result<()> {
    init_logger();
    let dir = temp_dir("hard-negative");
    let log_path = dir.join("negatives.txt");

    let detector = SlidingWindowDetector::new(scan_config(0.99), MeanClassifier)?;
    let mut recorder = HardNegativeRecorder::new(&log_path)?;

    let first = squares(64, 48, 16, &[(32, 8), (8, 24)]);
    let second = squares(64, 48, 16, &[(40, 24)]);
    detector.process_image(&first, "frame_001.png", &mut recorder)?;
    detector.process_image(&second, "frame_002.png", &mut recorder)?;
    drop(recorder);

    let content = fs::read_to_string(&log_path)?;
    let lines: Vec<(&str, &str)> = content
        .lines()
        .map(|l| l.split_once('\t').unwrap())
        .collect();

    let expected = [
        ("frame_001.png", Location::new(32, 8)),
        ("frame_001.png", Location::new(8, 24)),
        ("frame_002.png", Location::new(40, 24)),
    ];
    assert_eq!(lines.len(), expected.len());
    for ((name, fields), (expected_name, location)) in lines.iter().zip(expected) {
        assert_eq!(*name, expected_name);
        let record = DetectionRecord::new(location, Location::new(16, 16), 1.0, 1.0);
        assert_eq!(*fields, record.render());
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn calibration_histogram_counts_every_window_across_images() -> Result<()> {
    init_logger();
    let dir = temp_dir("calibration");
    let hist_path = dir.join("scores.json");

    let config = PostProcessingConfig::ScoreHistogram {
        min_th: 0.0,
        extent_th: 1.0,
        bandwidth: 0.25,
        output: Some(hist_path.clone()),
    };
    let mut processor = config.build()?;
    let detector = SlidingWindowDetector::new(scan_config(2.0), MeanClassifier)?;

    let cases: [&[(u32, u32)]; 3] = [&[(0, 0)], &[], &[(16, 16), (40, 8)]];
    let mut windows = 0;
    for (i, anchors) in cases.iter().enumerate() {
        let image = squares(64, 48, 16, anchors);
        let report = detector.process_image(&image, &format!("img{i}.png"), &mut processor)?;
        assert_eq!(report.detections, 0);
        windows += report.windows_evaluated;
    }
    processor.shutdown()?;

    let bins = read_bins(&hist_path)?;
    assert_eq!(bins.len(), 4);
    assert_eq!(bins.iter().sum::<u64>(), windows as u64);
    // fully covered windows land in the top bin
    assert_eq!(bins[3], 3);

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn random_score_stream_is_conserved() -> Result<()> {
    let dir = temp_dir("random");
    let hist_path = dir.join("random.json");
    let mut rng = StdRng::seed_from_u64(7);

    let mut acc = ScoreHistogramAccumulator::new(-1.0, 2.0, 0.1, Some(&hist_path))?;
    let n = 10_000;
    for _ in 0..n {
        acc.observe(rng.gen_range(-3.0..3.0));
    }
    acc.shutdown()?;

    let bins = read_bins(&hist_path)?;
    assert_eq!(bins.len(), 20);
    assert_eq!(bins.iter().sum::<u64>(), n);
    // about a third of the mass is clamped onto each boundary bin
    assert!(bins[0] > bins[1] * 5);
    assert!(bins[19] > bins[18] * 5);

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn config_file_drives_strategy_selection() -> Result<()> {
    let dir = temp_dir("config");
    let config_path = dir.join("config.json");
    let log_path = dir.join("mined.txt");

    let mut config = DetectionConfig::for_hard_negative_mining(&log_path);
    config.scan = scan_config(0.5);
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    let loaded = DetectionConfig::from_file(&config_path)?;
    assert_eq!(loaded, config);

    let processor = loaded.post_processing.build()?;
    assert!(processor.describe().contains("mined.txt"));
    assert!(log_path.exists());

    let invalid = r#"{
        "scan": {"window": [0, 8], "stride": [4, 4], "scales": [1.0], "score_threshold": 0.5},
        "template_path": "t.png"
    }"#;
    fs::write(&config_path, invalid)?;
    assert!(DetectionConfig::from_file(&config_path).is_err());

    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn template_classifier_locates_embedded_pattern() -> Result<()> {
    init_logger();
    let pattern = GrayImage::from_fn(16, 16, |x, y| {
        Luma([if (x / 4 + y / 4) % 2 == 0 { 250 } else { 10 }])
    });
    let template = Template::new("checker".into(), pattern.clone());

    let mut scene = GrayImage::from_fn(64, 64, |x, y| {
        Luma([((x * 3 + y * 5) % 40 + 100) as u8])
    });
    image::imageops::replace(&mut scene, &pattern, 24, 32);

    let classifier = TemplateClassifier::new(&template, (16, 16))?;
    let detector = SlidingWindowDetector::new(scan_config(0.95), classifier)?;

    let mut sink = PostProcessingConfig::default().build()?;
    let scan = detector.scan_image(&scene, &mut sink)?;

    assert_eq!(scan.results.len(), 1);
    let best = scan.results.as_slice()[0];
    assert_eq!(best.location(), Location::new(24, 32));
    assert!(best.score() > 0.99);
    Ok(())
}
