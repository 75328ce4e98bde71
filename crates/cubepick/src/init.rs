//! Startup: logging, options and the cube texture.

use std::path::PathBuf;

use cubepick_core::{Options, TextureData};

use crate::Result;

/// Environment variable naming a JSON options file.
pub const CONFIG_ENV: &str = "CUBEPICK_CONFIG";

/// Loads options from `CUBEPICK_CONFIG`, or the defaults when it is unset.
///
/// # Errors
///
/// Returns an error if the variable names a file that cannot be read or
/// holds invalid options.
pub fn load_options() -> Result<Options> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("loading options from {}", path.display());
            Ok(Options::load(&path)?)
        }
        None => Ok(Options::default()),
    }
}

/// Loads the configured texture image, or the built-in checkerboard.
pub fn load_texture(options: &Options) -> Result<TextureData> {
    match &options.texture_path {
        Some(path) => Ok(cubepick_render::load_texture_data(path)?),
        None => {
            log::debug!("using the default checkerboard texture");
            Ok(TextureData::checkerboard())
        }
    }
}

/// Opens the viewer with options from the environment.
///
/// Blocks until the window is closed (Escape or the close button) or a
/// frame fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> cubepick::Result<()> {
///     cubepick::show()
/// }
/// ```
pub fn show() -> Result<()> {
    let _ = env_logger::try_init();
    let options = load_options()?;
    run_with(options)
}

/// Opens the viewer with explicit options.
pub fn run(options: Options) -> Result<()> {
    let _ = env_logger::try_init();
    run_with(options)
}

fn run_with(options: Options) -> Result<()> {
    options.validate()?;
    let texture = load_texture(&options)?;
    crate::app::run_app(options, texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_texture_is_checkerboard() {
        let texture = load_texture(&Options::default()).unwrap();
        assert_eq!(texture, TextureData::checkerboard());
    }

    #[test]
    fn test_missing_texture_file_fails() {
        let options = Options {
            texture_path: Some(PathBuf::from("/nonexistent/cube.png")),
            ..Options::default()
        };
        assert!(load_texture(&options).is_err());
    }
}
