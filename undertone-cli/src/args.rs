//! Command-line argument definitions for undertone-cli.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Analyze the skin tone and undertone of every face in an image.
///
/// Help and version flags are disabled: the binary accepts exactly one
/// positional argument, taken verbatim as the image path.
#[derive(Debug, Parser)]
#[command(
    name = "undertone-cli",
    about,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct AnalyzeArgs {
    /// Path to the image to analyze.
    #[arg(allow_hyphen_values = true)]
    pub image_path: PathBuf,
}

impl AnalyzeArgs {
    /// Parse a full argv (program name first).
    ///
    /// Anything but exactly one argument after the program name is rejected
    /// before clap sees it, so `--` cannot hide an extra argument. The single
    /// argument is passed after an escape so values such as `-photo.jpg`
    /// are read as the path.
    pub fn parse_argv<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let [program, path] = <[OsString; 2]>::try_from(argv).map_err(|argv| {
            clap::Error::raw(
                clap::error::ErrorKind::WrongNumberOfValues,
                format!(
                    "expected exactly one argument, got {}",
                    argv.len().saturating_sub(1)
                ),
            )
        })?;
        Self::try_parse_from([program, OsString::from("--"), path])
    }
}
