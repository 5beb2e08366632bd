use vimg::settings::Settings;
use vimg::test_utils::test_helpers::*;
use vimg::{App, run_app_with_event_source};

/// 16x16 gradient in a 20x8 terminal: the body is 20x6 and fits the image
/// at zoom level 2 (10x10 px), centered at origin (-5, -1)
fn gradient_app() -> App {
    App::new(gradient_image(16, 16), "gradient.png", Settings::default())
}

#[test]
fn test_initial_render_fits_and_centers() {
    let mut terminal = create_test_terminal(20, 8);
    let mut app = gradient_app();

    terminal.draw(|f| app.draw(f)).unwrap();
    let snapshot = capture_terminal_state(&terminal);
    let lines: Vec<&str> = snapshot.lines().collect();

    assert_eq!(app.viewer().view().zoom_level(), 2);
    assert_eq!(app.viewer().view().zoomed_size(), (10, 10));
    assert_eq!(app.viewer().view().origin(), (-5, -1));

    assert!(lines[0].contains("vimg"));
    assert!(lines[0].contains("gradient.png"));
    // Odd origin: the first body row only shows the image's top pixel row
    assert_eq!(lines[1], format!("     {}", "▄".repeat(10)));
    for line in &lines[2..7] {
        assert_eq!(*line, format!("     {}", "▀".repeat(10)));
    }
    assert!(lines[7].starts_with("W/↑ Up"));
}

#[test]
fn test_keyboard_and_drag_pan() {
    let mut terminal = create_test_terminal(20, 8);
    let mut app = gradient_app();

    let mut events = TestScenarioBuilder::new()
        .press_char('a')
        .drag((8, 3), (10, 4))
        .quit()
        .build();
    run_app_with_event_source(&mut terminal, &mut app, &mut events).unwrap();

    // 'a' moves right by one, the drag by (2, 1 row = 2 px)
    assert_eq!(app.viewer().view().origin(), (-8, -3));
    assert!(!app.viewer().is_dragging());
}

#[test]
fn test_scroll_zooms_at_pointer() {
    let mut terminal = create_test_terminal(20, 8);
    let mut app = gradient_app();

    let mut events = TestScenarioBuilder::new().scroll_up_at(10, 3).build();
    run_app_with_event_source(&mut terminal, &mut app, &mut events).unwrap();

    // Pointer at body row 2, col 10 is image pixel (5, 3) at level 2.
    // Level 1 is 13px wide, so that pixel moves to (6.5, 3.9).
    assert_eq!(app.viewer().view().zoom_level(), 1);
    assert_eq!(app.viewer().view().origin(), (-3, 0));
}

#[test]
fn test_terminal_resize_keeps_center() {
    let mut terminal = create_test_terminal(20, 8);
    let mut app = gradient_app();
    terminal.draw(|f| app.draw(f)).unwrap();

    terminal.backend_mut().resize(24, 8);
    terminal.draw(|f| app.draw(f)).unwrap();

    assert_eq!(app.viewer().view().container_size(), Some((24, 6)));
    assert_eq!(app.viewer().view().origin(), (-7, -1));

    let snapshot = capture_terminal_state(&terminal);
    let lines: Vec<&str> = snapshot.lines().collect();
    assert_eq!(lines[2], format!("       {}", "▀".repeat(10)));
}

#[test]
fn test_zoom_out_stops_at_minimum_size() {
    let mut terminal = create_test_terminal(20, 8);
    let mut app = gradient_app();

    let mut events = TestScenarioBuilder::new()
        .press_char('Q')
        .press_char('Q')
        .press_char('Q')
        .quit()
        .build();
    run_app_with_event_source(&mut terminal, &mut app, &mut events).unwrap();

    let (w, h) = app.viewer().view().zoomed_size();
    assert!(w.min(h) <= 8);
    // Level 2 is 10px, level 4 is 7px; nothing beyond that is visited
    assert_eq!(app.viewer().view().zoom_level(), 4);
    assert!(!app.viewer().view().cache().contains(6));
}
