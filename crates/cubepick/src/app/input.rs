use std::sync::Arc;

use cubepick_core::{ButtonAction, CursorPosition, MouseButton};
use cubepick_render::RenderEngine;
use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::App;

/// Converts a winit button event into the state machine's input.
pub(crate) fn map_button(
    button: winit::event::MouseButton,
    state: ElementState,
) -> (MouseButton, ButtonAction) {
    let button = match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Back,
        winit::event::MouseButton::Forward => MouseButton::Forward,
        winit::event::MouseButton::Other(code) => MouseButton::Other(code),
    };
    let action = match state {
        ElementState::Pressed => ButtonAction::Pressed,
        ElementState::Released => ButtonAction::Released,
    };
    (button, action)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(PhysicalSize::new(
                self.options.window_width,
                self.options.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                self.fail(error);
                event_loop.exit();
                return;
            }
        };

        match RenderEngine::new_windowed(window.clone(), &self.options, &self.texture).block_on() {
            Ok(engine) => self.engine = Some(engine),
            Err(error) => {
                self.fail(error);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = CursorPosition::from_physical(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = CursorPosition::NONE;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (button, action) = map_button(button, state);
                self.interaction.handle_button(button, action);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.close_requested = true;
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_button() {
        assert_eq!(
            map_button(winit::event::MouseButton::Left, ElementState::Pressed),
            (MouseButton::Left, ButtonAction::Pressed)
        );
        assert_eq!(
            map_button(winit::event::MouseButton::Other(7), ElementState::Released),
            (MouseButton::Other(7), ButtonAction::Released)
        );
    }
}
