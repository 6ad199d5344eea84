//! Warm / cool / neutral undertone classification.

use std::fmt;

use log::warn;
use palette::{IntoColor, Lab, Srgb};
use serde::{Deserialize, Serialize};
use undertone_utils::{RgbColor, UndertoneRule};

/// Red is divided by this before being compared against blue.
pub const RED_SCALE: f64 = 1.61;

/// Scaled red and blue closer than this are considered balanced.
pub const NEUTRAL_BAND: f64 = 5.0;

/// Channel gap used by the legacy LAB rule.
const LAB_THRESHOLD: i32 = 5;

/// Coarse undertone label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Undertone {
    Warm,
    Cool,
    Neutral,
}

impl Undertone {
    pub fn as_str(self) -> &'static str {
        match self {
            Undertone::Warm => "Warm",
            Undertone::Cool => "Cool",
            Undertone::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an RGB color by comparing `R / 1.61` against `B`.
///
/// Within [`NEUTRAL_BAND`] the color is neutral, otherwise the larger side
/// wins. Green does not participate.
pub fn classify_undertone(red: u8, _green: u8, blue: u8) -> Undertone {
    let scaled_red = f64::from(red) / RED_SCALE;
    let blue_f = f64::from(blue);

    if (scaled_red - blue_f).abs() < NEUTRAL_BAND {
        Undertone::Neutral
    } else if scaled_red > blue_f {
        Undertone::Warm
    } else if scaled_red < blue_f || blue > red {
        Undertone::Cool
    } else {
        Undertone::Neutral
    }
}

/// Undertone of a hex color; malformed input logs a warning and yields `Neutral`.
pub fn get_undertone(hex: &str) -> Undertone {
    match RgbColor::from_hex(hex) {
        Ok(color) => classify_undertone(color.red, color.green, color.blue),
        Err(err) => {
            warn!("Error processing hex code {hex}: {err}");
            Undertone::Neutral
        }
    }
}

/// Superseded rule comparing the CIELAB `a` (green-red) and `b` (blue-yellow) channels.
///
/// Channels use the 8-bit encoding where both are offset by 128. It does not
/// agree with [`classify_undertone`] and is kept only for reproducing older
/// results through [`UndertoneRule::LegacyLab`].
pub fn classify_undertone_lab(red: u8, green: u8, blue: u8) -> Undertone {
    let lab: Lab = Srgb::new(red, green, blue).into_format::<f32>().into_color();
    let a = encode_lab_channel(lab.a);
    let b = encode_lab_channel(lab.b);

    if a > b + LAB_THRESHOLD {
        Undertone::Warm
    } else if b > a + LAB_THRESHOLD {
        Undertone::Cool
    } else {
        Undertone::Neutral
    }
}

fn encode_lab_channel(value: f32) -> i32 {
    (value + 128.0).round().clamp(0.0, 255.0) as i32
}

/// Apply `rule` to the color it reads: the dominant color for the scaled-RGB
/// rule, the skin tone for the legacy LAB rule.
pub fn undertone_for(rule: UndertoneRule, skin_tone: &str, dominant_color: &str) -> Undertone {
    match rule {
        UndertoneRule::ScaledRgb => get_undertone(dominant_color),
        UndertoneRule::LegacyLab => match RgbColor::from_hex(skin_tone) {
            Ok(color) => classify_undertone_lab(color.red, color.green, color.blue),
            Err(err) => {
                warn!("Error processing hex code {skin_tone}: {err}");
                Undertone::Neutral
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_examples() {
        // 255 / 1.61 = 158.39, within 5 of 158.
        assert_eq!(classify_undertone(255, 0, 158), Undertone::Neutral);
        assert_eq!(classify_undertone(255, 0, 0), Undertone::Warm);
        assert_eq!(classify_undertone(0, 0, 255), Undertone::Cool);
    }

    #[test]
    fn neutral_band_edges() {
        // 161 / 1.61 = 100.
        assert_eq!(classify_undertone(161, 0, 104), Undertone::Neutral);
        assert_eq!(classify_undertone(161, 0, 106), Undertone::Cool);
        assert_eq!(classify_undertone(161, 0, 94), Undertone::Warm);
        assert_eq!(classify_undertone(161, 0, 96), Undertone::Neutral);
    }

    #[test]
    fn green_is_ignored() {
        for green in [0, 77, 255] {
            assert_eq!(classify_undertone(200, green, 60), Undertone::Warm);
        }
    }

    #[test]
    fn classify_is_total_over_channel_range() {
        for red in (0..=255u16).step_by(5) {
            for blue in (0..=255u16).step_by(5) {
                let first = classify_undertone(red as u8, 128, blue as u8);
                let second = classify_undertone(red as u8, 128, blue as u8);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn get_undertone_parses_hex() {
        assert_eq!(get_undertone("#FF0000"), Undertone::Warm);
        assert_eq!(get_undertone("0000FF"), Undertone::Cool);
    }

    #[test]
    fn get_undertone_falls_back_to_neutral() {
        assert_eq!(get_undertone("ZZZZZZ"), Undertone::Neutral);
        assert_eq!(get_undertone("FFF"), Undertone::Neutral);
        assert_eq!(get_undertone(""), Undertone::Neutral);
    }

    mod capture {
        use std::sync::{Mutex, Once};

        use log::{Level, LevelFilter, Log, Metadata, Record};

        static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
        static INSTALL: Once = Once::new();

        struct CaptureLogger;

        impl Log for CaptureLogger {
            fn enabled(&self, _metadata: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push((record.level(), record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        pub fn install() {
            INSTALL.call_once(|| {
                log::set_logger(&CaptureLogger).expect("logger already installed");
                log::set_max_level(LevelFilter::Trace);
            });
        }

        pub fn contains(level: Level, needle: &str) -> bool {
            RECORDS
                .lock()
                .map(|records| {
                    records
                        .iter()
                        .any(|(lvl, msg)| *lvl == level && msg.contains(needle))
                })
                .unwrap_or(false)
        }
    }

    #[test]
    fn malformed_hex_logs_a_warning() {
        capture::install();
        assert_eq!(get_undertone("#NOTHEX"), Undertone::Neutral);
        assert!(capture::contains(log::Level::Warn, "#NOTHEX"));
    }

    #[test]
    fn lab_rule_compares_a_and_b_channels() {
        // Red: a* ~ 80 > b* ~ 67. Green: b* ~ 83 > a* ~ -86.
        assert_eq!(classify_undertone_lab(255, 0, 0), Undertone::Warm);
        assert_eq!(classify_undertone_lab(0, 255, 0), Undertone::Cool);
        assert_eq!(classify_undertone_lab(128, 128, 128), Undertone::Neutral);
    }

    #[test]
    fn lab_rule_disagrees_with_scaled_rgb() {
        // Scaled red and blue are balanced, but a* is far above b*.
        let (r, g, b) = (255, 0, 158);
        assert_eq!(classify_undertone(r, g, b), Undertone::Neutral);
        assert_eq!(classify_undertone_lab(r, g, b), Undertone::Warm);
    }

    #[test]
    fn undertone_for_selects_input_by_rule() {
        assert_eq!(
            undertone_for(UndertoneRule::ScaledRgb, "not-a-color", "#FF0000"),
            Undertone::Warm
        );
        assert_eq!(
            undertone_for(UndertoneRule::LegacyLab, "#00FF00", "#FF0000"),
            Undertone::Cool
        );
        assert_eq!(
            undertone_for(UndertoneRule::LegacyLab, "", "#FF0000"),
            Undertone::Neutral
        );
    }

    #[test]
    fn serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Undertone::Warm).unwrap(),
            "\"Warm\""
        );
    }
}
