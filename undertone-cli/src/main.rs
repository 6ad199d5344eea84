//! Prints one JSON document describing the skin tone and undertone of each
//! face found in the given image.

mod annotate;
mod args;
mod config;

use std::{env, io, process::ExitCode};

use anyhow::{Context, Result};
use log::{LevelFilter, debug, error, info, warn};
use undertone_core::{
    AnalysisResult, FaceDetector, PaletteSkinAnalyzer, SeetaFaceDetector, SkinToneAnalyzer,
    load_source,
};
use undertone_utils::{AppSettings, DetectionSettings, init_logging};

use crate::{
    annotate::AnnotationObserver,
    args::AnalyzeArgs,
    config::{apply_telemetry, load_settings},
};

const USAGE_ERROR: &str = "Image path not provided. Usage: undertone-cli <image_path>";

fn main() -> ExitCode {
    if let Err(err) = init_logging(LevelFilter::Warn) {
        eprintln!("failed to initialise logging: {err:#}");
    }

    let args = match AnalyzeArgs::parse_argv(env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            debug!("{err}");
            emit(&AnalysisResult::error(USAGE_ERROR));
            return ExitCode::from(1);
        }
    };

    match run(&args) {
        Ok(result) => {
            emit(&result);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            emit(&AnalysisResult::error(format!("{err:#}")));
            ExitCode::from(2)
        }
    }
}

fn run(args: &AnalyzeArgs) -> Result<AnalysisResult> {
    let settings = load_settings()?;
    apply_telemetry(&settings);
    analyze(args, &settings, load_seeta)
}

fn load_seeta(settings: &DetectionSettings) -> Result<Box<dyn FaceDetector>> {
    let model_path = &settings.model_path;
    info!("Loading face detection model from {model_path}");
    let detector = SeetaFaceDetector::from_path(model_path, settings)
        .with_context(|| format!("Could not load face detection model {model_path}"))?;
    Ok(Box::new(detector))
}

/// Errors returned here are setup failures; run-level outcomes such as an
/// unreadable image come back as an `Ok` error document.
fn analyze<F>(
    args: &AnalyzeArgs,
    settings: &AppSettings,
    build_detector: F,
) -> Result<AnalysisResult>
where
    F: FnOnce(&DetectionSettings) -> Result<Box<dyn FaceDetector>>,
{
    let image = match load_source(&args.image_path) {
        Ok(image) => image,
        Err(err) => {
            warn!("{err}");
            return Ok(err.into());
        }
    };

    let analyzer =
        PaletteSkinAnalyzer::new(&settings.analysis).context("Could not build skin analyzer")?;
    let detector = build_detector(&settings.detection)?;

    info!("Using undertone rule {}", settings.undertone.rule);
    let mut pipeline =
        SkinToneAnalyzer::new(detector, Box::new(analyzer)).with_rule(settings.undertone.rule);
    if let Some(dir) = settings.annotate_dir.as_ref() {
        match AnnotationObserver::new(dir, &args.image_path) {
            Ok(observer) => pipeline = pipeline.with_observer(Box::new(observer)),
            Err(err) => warn!("Annotation disabled: {err:#}"),
        }
    }

    Ok(pipeline.analyze_image(&image))
}

fn emit(result: &AnalysisResult) {
    if let Err(err) = result.write_json(io::stdout().lock()) {
        error!("failed to write result: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ffi::OsString, path::Path};

    use image::{DynamicImage, GrayImage, Rgb, RgbImage};
    use serde_json::{Value, json};
    use undertone_core::BoundingBox;

    struct FixedDetector(Vec<BoundingBox>);

    impl FaceDetector for FixedDetector {
        fn detect(&self, _gray: &GrayImage) -> Vec<BoundingBox> {
            self.0.clone()
        }
    }

    fn fixed(
        boxes: Vec<BoundingBox>,
    ) -> impl FnOnce(&DetectionSettings) -> Result<Box<dyn FaceDetector>> {
        move |_| Ok(Box::new(FixedDetector(boxes)) as Box<dyn FaceDetector>)
    }

    fn sample(dir: &Path) -> AnalyzeArgs {
        let path = dir.join("portrait.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(60, 60, Rgb([0x9D, 0x7A, 0x54])))
            .save(&path)
            .unwrap();
        let argv = [OsString::from("undertone-cli"), path.into_os_string()];
        AnalyzeArgs::parse_argv(argv).unwrap()
    }

    #[test]
    fn detected_face_produces_faces_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = sample(dir.path());
        let result = analyze(
            &args,
            &AppSettings::default(),
            fixed(vec![BoundingBox::new(15, 15, 30, 30)]),
        )
        .unwrap();

        let value: Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        let face = &value["faces"][0];
        assert_eq!(face["face_id"], json!(1));
        assert_eq!(face["skin_tone"], json!("#9D7A54"));
        assert_eq!(face["undertone"], json!("Warm"));
        assert!(face["accuracy"].as_f64().unwrap() > 99.0);
        assert_eq!(value["faces"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn no_detections_produce_error_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = sample(dir.path());
        let result = analyze(&args, &AppSettings::default(), fixed(vec![])).unwrap();
        assert_eq!(result, AnalysisResult::error("No faces detected in the image"));
    }

    #[test]
    fn annotate_dir_receives_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let args = sample(dir.path());
        let settings = AppSettings {
            annotate_dir: Some(dir.path().join("annotated")),
            ..AppSettings::default()
        };
        analyze(&args, &settings, fixed(vec![BoundingBox::new(15, 15, 30, 30)])).unwrap();
        assert!(dir.path().join("annotated/portrait_faces.png").is_file());
        assert!(dir.path().join("annotated/portrait_face_1.png").is_file());
    }

    #[test]
    fn detector_failure_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = sample(dir.path());
        let err = analyze(&args, &AppSettings::default(), load_seeta).unwrap_err();
        assert!(format!("{err:#}").starts_with("Could not load face detection model"));
    }
}
