//! Opens the cube viewer.
//!
//! Hold any mouse button and move over the cube to highlight the triangle
//! under the cursor. Escape closes the window.
//!
//! ```text
//! cargo run --example viewer                 # defaults or $CUBEPICK_CONFIG
//! cargo run --example viewer -- --elapsed    # time-based rotation
//! cargo run --example viewer -- --screenshot cube.png
//! ```

use cubepick::*;

fn main() -> Result<()> {
    let _ = env_logger::try_init();
    let mut options = load_options()?;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--elapsed" => options.clock = ClockMode::elapsed(),
            "--deferred" => options.readback = ReadbackMode::Deferred,
            "--screenshot" => {
                let path = args.next().unwrap_or_else(|| "cubepick.png".to_string());
                render_to_file(&path, options.window_width, options.window_height, &options)?;
                println!("wrote {path}");
                return Ok(());
            }
            other => log::warn!("ignoring unknown argument {other}"),
        }
    }

    run(options)
}
