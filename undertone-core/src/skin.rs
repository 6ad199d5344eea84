//! Built-in skin analyzer: skin mask, k-means in CIELAB, palette matching.

use std::collections::HashSet;

use anyhow::{Context, Result};
use image::DynamicImage;
use kmeans_colors::get_kmeans;
use log::debug;
use palette::{Hsv, IntoColor, Lab, Srgb, color_difference::Ciede2000};
use undertone_utils::{AnalysisSettings, hex_to_rgb, to_hex};

use crate::analyzer::{AnalyzerError, DominantColor, ReportFace, SkinAnalyzer, SkinReport};

/// A reference tone the dominant colors are matched against.
#[derive(Debug, Clone)]
struct PaletteTone {
    hex: String,
    label: String,
    lab: Lab,
}

/// Clusters skin pixels of a face crop and reports the closest palette tone.
///
/// Pixels are first filtered with a combined YCrCb/HSV skin mask. When the
/// mask keeps too few pixels (heavy shadow, unusual lighting) the whole crop
/// is clustered instead.
#[derive(Debug, Clone)]
pub struct PaletteSkinAnalyzer {
    tones: Vec<PaletteTone>,
    n_colors: usize,
    min_skin_pixels: usize,
    max_iterations: usize,
    convergence: f32,
    seed: u64,
}

impl PaletteSkinAnalyzer {
    /// Build an analyzer from validated settings.
    pub fn new(settings: &AnalysisSettings) -> Result<Self> {
        anyhow::ensure!(!settings.palette.is_empty(), "skin tone palette is empty");
        anyhow::ensure!(
            settings.palette.len() == settings.tone_labels.len(),
            "palette has {} colors but {} labels",
            settings.palette.len(),
            settings.tone_labels.len()
        );
        anyhow::ensure!(
            settings.n_dominant_colors > 0 && settings.n_dominant_colors <= 255,
            "n_dominant_colors must be between 1 and 255, got {}",
            settings.n_dominant_colors
        );

        let tones = settings
            .palette
            .iter()
            .zip(&settings.tone_labels)
            .map(|(hex, label)| {
                let (r, g, b) =
                    hex_to_rgb(hex).with_context(|| format!("invalid palette color {hex}"))?;
                Ok(PaletteTone {
                    hex: to_hex(r, g, b),
                    label: label.clone(),
                    lab: srgb_to_lab(r, g, b),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tones,
            n_colors: settings.n_dominant_colors,
            min_skin_pixels: settings.min_skin_pixels,
            max_iterations: settings.max_iterations,
            convergence: settings.convergence,
            seed: settings.seed,
        })
    }

    fn dominant_colors(&self, pixels: &[[u8; 3]]) -> Vec<(Lab, f64)> {
        // k-means++ seeding needs at least k distinct points.
        let distinct = pixels.iter().collect::<HashSet<_>>().len();
        let k = self.n_colors.min(distinct).max(1);

        let lab_pixels: Vec<Lab> = pixels
            .iter()
            .map(|&[r, g, b]| srgb_to_lab(r, g, b))
            .collect();
        let kmeans = get_kmeans(
            k,
            self.max_iterations,
            self.convergence,
            false,
            &lab_pixels,
            self.seed,
        );

        let mut counts = vec![0usize; kmeans.centroids.len()];
        for &index in &kmeans.indices {
            if let Some(count) = counts.get_mut(usize::from(index)) {
                *count += 1;
            }
        }

        let total = kmeans.indices.len().max(1) as f64;
        let mut clusters: Vec<(Lab, f64)> = kmeans
            .centroids
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(&lab, count)| (lab, count as f64 / total))
            .collect();
        clusters.sort_by(|a, b| b.1.total_cmp(&a.1));
        clusters
    }

    fn closest_tone(&self, clusters: &[(Lab, f64)]) -> Option<(&PaletteTone, f64)> {
        self.tones
            .iter()
            .map(|tone| {
                let distance: f64 = clusters
                    .iter()
                    .map(|&(lab, share)| f64::from(lab.difference(tone.lab)) * share)
                    .sum();
                (tone, distance)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl SkinAnalyzer for PaletteSkinAnalyzer {
    fn analyze(&self, face: &DynamicImage) -> Result<SkinReport, AnalyzerError> {
        let rgb = face.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(AnalyzerError::EmptyImage);
        }

        let all: Vec<[u8; 3]> = rgb.pixels().map(|p| p.0).collect();
        let skin: Vec<[u8; 3]> = all.iter().copied().filter(|&px| is_skin(px)).collect();
        let pixels = if !skin.is_empty() && skin.len() >= self.min_skin_pixels {
            skin
        } else {
            debug!(
                "Skin mask kept {} of {} pixels; clustering the whole crop",
                skin.len(),
                all.len()
            );
            all
        };

        let clusters = self.dominant_colors(&pixels);
        let (tone, distance) = self
            .closest_tone(&clusters)
            .ok_or_else(|| AnalyzerError::Failed("palette is empty".into()))?;

        let dominant_colors = clusters
            .iter()
            .map(|&(lab, share)| DominantColor {
                color: lab_to_hex(lab),
                percent: round2(share),
            })
            .collect();

        Ok(SkinReport {
            faces: vec![ReportFace {
                skin_tone: Some(tone.hex.clone()),
                tone_label: Some(tone.label.clone()),
                dominant_colors,
                accuracy: round2((100.0 - distance).max(0.0)),
            }],
        })
    }
}

fn srgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    Srgb::new(r, g, b).into_format::<f32>().into_color()
}

fn lab_to_hex(lab: Lab) -> String {
    let rgb: Srgb = lab.into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    to_hex(rgb.red, rgb.green, rgb.blue)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combined YCrCb and HSV skin test on an sRGB pixel.
fn is_skin([r, g, b]: [u8; 3]) -> bool {
    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));

    let y = 0.299 * rf + 0.587 * gf + 0.114 * bf;
    let cr = (rf - y) * 0.713 + 128.0;
    let cb = (bf - y) * 0.564 + 128.0;
    let ycrcb = y > 80.0 && (135.0..=180.0).contains(&cr) && (85.0..=135.0).contains(&cb);
    if !ycrcb {
        return false;
    }

    let hsv: Hsv = Srgb::new(r, g, b).into_format::<f32>().into_color();
    let hue = hsv.hue.into_positive_degrees();
    (0.0..=50.0).contains(&hue) && (0.23..=0.68).contains(&hsv.saturation)
}
