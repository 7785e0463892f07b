use crate::draw::flood_fill;
use log::warn;

use super::InputState;

impl InputState {
    /// Flood-fills the region under the display point `(x, y)` with the pen colour.
    ///
    /// The seed is mapped into raster pixels with independent horizontal and
    /// vertical scale factors and clamped to the raster, so clicks on or past
    /// the display edge fill the edge pixel. Filling a region that already has the pen colour
    /// changes nothing and records nothing. Failures leave the page untouched.
    pub fn fill_at(&mut self, x: f64, y: f64) {
        let page = self.pages.current();
        let (sx, sy) = self.renderer.raster_scale(page);
        let seed = (
            ((x * sx).floor() as i32).clamp(0, page.width() - 1),
            ((y * sy).floor() as i32).clamp(0, page.height() - 1),
        );
        let target = self.tool.color;

        if page.raster().pixel(seed.0, seed.1) == Some(target) {
            self.set_status("Fill: same colour - skipped");
            return;
        }

        let filled = match flood_fill(page.raster(), seed, target, self.fill_threshold) {
            Ok(raster) => raster,
            Err(err) => {
                warn!("Flood fill at ({x}, {y}) failed: {err}");
                self.set_status(format!("Fill error: {err}"));
                return;
            }
        };

        let page = self.pages.current_mut();
        let background = page.background();
        match page.replace_raster(filled) {
            Ok(prior) => self.history.record_snapshot(prior, background),
            Err(err) => {
                warn!("Could not install filled raster: {err}");
                self.set_status(format!("Fill error: {err}"));
                return;
            }
        }

        self.refresh_backdrop();
        self.set_status("Fill applied");
    }
}

#[cfg(test)]
mod tests {
    use crate::draw::{BLUE, RED, WHITE};
    use crate::input::{BoardSettings, InputState};

    fn board(display: (i32, i32)) -> InputState {
        let settings = BoardSettings {
            page_width: 100,
            page_height: 50,
            display_width: display.0,
            display_height: display.1,
            background: WHITE,
            ..BoardSettings::default()
        };
        InputState::with_rng_seed(settings, 3).unwrap()
    }

    #[test]
    fn same_colour_fill_is_a_no_op() {
        let mut state = board((100, 50));
        state.set_color(WHITE);
        let before = state.current_page().raster().try_clone().unwrap();

        state.fill_at(10.0, 10.0);
        assert_eq!(state.status, "Fill: same colour - skipped");
        assert_eq!(state.history.undo_len(), 0);
        assert!(state.current_page().raster().same_pixels(&before));
    }

    #[test]
    fn fill_pushes_snapshot_and_renders_backdrop() {
        let mut state = board((100, 50));
        state.set_color(BLUE);
        state.fill_at(10.0, 10.0);

        assert_eq!(state.status, "Fill applied");
        assert_eq!(state.history.undo_len(), 1);
        assert!(state.history.last_undo().is_some_and(|r| r.is_snapshot()));
        assert_eq!(state.current_page().raster().pixel(99, 49), Some(BLUE));
        assert!(state.renderer.has_backdrop());
    }

    #[test]
    fn seed_is_scaled_per_axis() {
        // display is half the raster width and twice its height
        let mut state = board((50, 100));
        let ctx = state.current_page().pen().context();
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.rectangle(50.0, 0.0, 50.0, 50.0);
        ctx.fill().unwrap();

        state.set_color(BLUE);
        // display (10, 80) -> raster (20, 40): left half, still white
        state.fill_at(10.0, 80.0);
        let raster = state.current_page().raster();
        assert_eq!(raster.pixel(0, 0), Some(BLUE));
        assert_eq!(raster.pixel(75, 25), Some(RED));
    }

    #[test]
    fn seed_past_display_edge_clamps_to_raster() {
        let mut state = board((100, 50));
        let ctx = state.current_page().pen().context();
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.rectangle(0.0, 0.0, 50.0, 50.0);
        ctx.fill().unwrap();

        state.set_color(BLUE);
        state.fill_at(150.0, 10.0);
        assert_eq!(state.status, "Fill applied");
        let raster = state.current_page().raster();
        assert_eq!(raster.pixel(99, 10), Some(BLUE));
        assert_eq!(raster.pixel(10, 10), Some(RED));

        // exactly on the bottom-left edge and beyond the top
        state.set_color(WHITE);
        state.fill_at(0.0, 50.0);
        assert_eq!(state.current_page().raster().pixel(0, 49), Some(WHITE));
        state.fill_at(-5.0, -5.0);
        assert_eq!(state.status, "Fill: same colour - skipped");
        assert_eq!(state.history.undo_len(), 2);
    }
}
