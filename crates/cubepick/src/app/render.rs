use cubepick_core::run_frame;

use super::App;

impl App {
    /// Renders one frame and emits its diagnostics.
    ///
    /// Transient surface conditions skip the frame. Anything else ends the loop.
    pub(super) fn render(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        let angle = self.clock.rotation_angle();
        let result = run_frame(
            engine,
            &mut self.interaction,
            angle,
            self.cursor,
            &self.options,
        );

        match result {
            Ok(report) => {
                for diagnostic in &report.diagnostics {
                    log::info!("{diagnostic}");
                }
                self.clock.advance();
            }
            Err(error) if error.is_transient() => {
                log::warn!("skipping frame: {error}");
            }
            Err(error) => self.fail(error),
        }
    }
}
