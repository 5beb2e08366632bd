pub mod test_helpers {
    use crate::event_source::{Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind, SimulatedEventSource};
    use crate::raster::RasterImage;
    use image::{DynamicImage, Rgb, RgbImage};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl Default for TestScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        /// Add a key press with modifiers
        pub fn press_key(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
            self.events
                .push(SimulatedEventSource::key_event(code, modifiers));
            self
        }

        /// Scroll the wheel down (zoom out) over a terminal cell
        pub fn scroll_down_at(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::ScrollDown,
                column,
                row,
            ));
            self
        }

        /// Scroll the wheel up (zoom in) over a terminal cell
        pub fn scroll_up_at(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::ScrollUp,
                column,
                row,
            ));
            self
        }

        /// Press the left button at `from`, drag to `to`, release
        pub fn drag(mut self, from: (u16, u16), to: (u16, u16)) -> Self {
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Down(MouseButton::Left),
                from.0,
                from.1,
            ));
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Drag(MouseButton::Left),
                to.0,
                to.1,
            ));
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Up(MouseButton::Left),
                to.0,
                to.1,
            ));
            self
        }

        /// Quit the application (Ctrl+c)
        pub fn quit(mut self) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key('c'));
            self
        }

        /// Build the simulated event source
        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }

    /// Image whose red channel encodes x and green channel encodes y
    pub fn gradient_image(width: u32, height: u32) -> RasterImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                64,
            ])
        });
        RasterImage::from_dynamic(&DynamicImage::ImageRgb8(img)).unwrap()
    }
}
