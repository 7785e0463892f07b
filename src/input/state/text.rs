use crate::dialogs::Dialogs;
use crate::draw::{Primitive, RasterOp};
use crate::input::tool::ToolKind;

use super::{ActiveStroke, InputState};

/// Smallest font size the text tool stamps with.
const MIN_TEXT_SIZE: u32 = 12;

impl InputState {
    /// Asks for text and stamps it with its top-left corner at `(x, y)`.
    ///
    /// Size is twice the pen width (at least 12). A dismissed or empty prompt
    /// does nothing. Overlay text and raster stamp form one history entry.
    pub fn place_text(&mut self, x: f64, y: f64, dialogs: &mut dyn Dialogs) {
        let Some(text) = dialogs.prompt_text().filter(|text| !text.trim().is_empty()) else {
            return;
        };

        let size = (self.tool.stroke_width * 2).max(MIN_TEXT_SIZE) as f64;
        let color = self.tool.color;
        let font = self.font_descriptor.clone();
        let mut stroke = ActiveStroke::new(
            ToolKind::Text,
            (x, y),
            color,
            self.tool.stroke_width,
            self.tool.opacity,
        );

        self.add_drawing(
            &mut stroke,
            Primitive::Text {
                x,
                y,
                text: text.clone(),
                color,
                alpha: 1.0,
                size,
                font: font.clone(),
            },
        );
        stroke.push_op(RasterOp::Text {
            x,
            y,
            text,
            color,
            size,
            font,
        });
        self.commit_stroke(stroke);
    }
}

#[cfg(test)]
mod tests {
    use crate::dialogs::ScriptedDialogs;
    use crate::draw::{BLACK, Layer, YELLOW};
    use crate::input::{BoardSettings, InputState, MouseButton, ToolKind};

    fn board() -> InputState {
        let settings = BoardSettings {
            page_width: 200,
            page_height: 80,
            display_width: 200,
            display_height: 80,
            ..BoardSettings::default()
        };
        InputState::with_rng_seed(settings, 5).unwrap()
    }

    fn ink_pixels(state: &InputState) -> usize {
        let raster = state.current_page().raster();
        (0..raster.height())
            .flat_map(|y| (0..raster.width()).map(move |x| (x, y)))
            .filter(|(x, y)| raster.pixel(*x, *y) != Some(BLACK))
            .count()
    }

    #[test]
    fn text_is_stamped_on_both_buffers() {
        let mut state = board();
        state.set_tool(ToolKind::Text);
        state.set_color(YELLOW);
        let mut dialogs = ScriptedDialogs::new().with_text("Hello");

        state.on_mouse_press(MouseButton::Left, 10.0, 10.0, &mut dialogs);
        assert!(!state.is_drawing());
        assert_eq!(state.renderer.overlay().count_layer(Layer::Drawing), 1);
        assert_eq!(state.history.undo_len(), 1);
        assert!(ink_pixels(&state) > 0);
    }

    #[test]
    fn dismissed_or_blank_prompt_is_silent() {
        let mut state = board();
        state.set_tool(ToolKind::Text);
        let mut dialogs = ScriptedDialogs::new().with_text("   ");

        state.on_mouse_press(MouseButton::Left, 10.0, 10.0, &mut dialogs);
        state.on_mouse_press(MouseButton::Left, 10.0, 10.0, &mut dialogs);
        assert_eq!(state.history.undo_len(), 0);
        assert_eq!(ink_pixels(&state), 0);
    }

    #[test]
    fn text_undo_restores_raster() {
        let mut state = board();
        state.set_tool(ToolKind::Text);
        let mut dialogs = ScriptedDialogs::new().with_text("Undo me");
        state.on_mouse_press(MouseButton::Left, 20.0, 20.0, &mut dialogs);
        assert!(ink_pixels(&state) > 0);

        state.undo();
        assert_eq!(ink_pixels(&state), 0);
        assert_eq!(state.renderer.overlay().count_layer(Layer::Drawing), 0);
    }
}
