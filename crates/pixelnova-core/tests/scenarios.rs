//! End-to-end editing sessions driven through pointer and key events.

use kurbo::{Point, Vec2};
use pixelnova_core::{
    Canvas, EditorConfig, KeyEvent, Modifiers, PointerButton, PointerEvent, Raster, Rgba, ToolKind,
};

const RED: Rgba = Rgba::new(255, 0, 0, 255);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas(size: u32) -> Canvas {
    init_logger();
    Canvas::new(EditorConfig {
        document_width: size,
        document_height: size,
        ..EditorConfig::default()
    })
    .unwrap()
}

fn screen(canvas: &Canvas, x: i32, y: i32) -> Point {
    canvas
        .viewport()
        .canvas_to_screen(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

fn down(canvas: &mut Canvas, x: i32, y: i32) {
    let position = screen(canvas, x, y);
    canvas.handle_pointer(PointerEvent::Down {
        position,
        button: PointerButton::Primary,
    });
}

fn move_to(canvas: &mut Canvas, x: i32, y: i32) {
    let position = screen(canvas, x, y);
    canvas.handle_pointer(PointerEvent::Move { position });
}

fn up(canvas: &mut Canvas, x: i32, y: i32) {
    let position = screen(canvas, x, y);
    canvas.handle_pointer(PointerEvent::Up {
        position,
        button: PointerButton::Primary,
    });
}

fn layer(canvas: &Canvas) -> &Raster {
    canvas.layer_buffer(canvas.selected_layer_id()).unwrap()
}

fn opaque_pixels(raster: &Raster) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..raster.height() as i32 {
        for x in 0..raster.width() as i32 {
            if raster.pixel(x, y).is_some_and(|c| c.a > 0) {
                out.push((x, y));
            }
        }
    }
    out
}

/// Every pixel a distinct opaque color.
fn gradient(size: u32) -> Raster {
    let mut raster = Raster::new(size, size);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            raster.set_pixel(x, y, Rgba::new(x as u8 * 16, y as u8 * 16, 128, 255));
        }
    }
    raster
}

#[test]
fn test_pencil_click_then_undo() {
    let mut c = canvas(16);
    c.set_primary_color(Rgba::parse("#ff0000ff").unwrap());
    down(&mut c, 5, 5);
    up(&mut c, 5, 5);

    assert_eq!(layer(&c).pixel(5, 5), Some(RED));
    assert_eq!(opaque_pixels(layer(&c)), vec![(5, 5)]);

    assert!(c.undo());
    assert!(layer(&c).is_blank());
}

#[test]
fn test_move_selection_clears_source() {
    let mut c = canvas(16);
    c.import_image(gradient(16)).unwrap();
    let original = layer(&c).clone();
    c.set_clear_original(true);
    c.set_active_tool(ToolKind::Select);

    down(&mut c, 2, 2);
    move_to(&mut c, 6, 6);
    up(&mut c, 6, 6);
    assert!(c.is_valid_selection());

    down(&mut c, 2, 2);
    move_to(&mut c, 6, 6);
    move_to(&mut c, 10, 10);
    up(&mut c, 10, 10);
    assert!(!c.is_valid_selection());

    let raster = layer(&c);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(raster.pixel(10 + x, 10 + y), original.pixel(2 + x, 2 + y));
            assert_eq!(raster.pixel(2 + x, 2 + y), Some(Rgba::transparent()));
        }
    }
    assert_eq!(raster.pixel(6, 6), original.pixel(6, 6));
    assert_eq!(raster.pixel(1, 1), original.pixel(1, 1));
}

#[test]
fn test_pan_then_zoom_maps_click() {
    let mut c = canvas(16);
    c.pan(Vec2::new(10.0, 10.0));
    c.set_scale(2.0).unwrap();
    assert_eq!(c.screen_to_canvas(Point::new(20.0, 20.0)), (5, 5));

    let p = Point::new(20.0, 20.0);
    c.handle_pointer(PointerEvent::Down {
        position: p,
        button: PointerButton::Primary,
    });
    c.handle_pointer(PointerEvent::Up {
        position: p,
        button: PointerButton::Primary,
    });
    assert_eq!(opaque_pixels(layer(&c)), vec![(5, 5)]);
}

#[test]
fn test_line_stroke_ignores_intermediate_moves() {
    let mut c = canvas(8);
    c.set_active_tool(ToolKind::Line);
    down(&mut c, 0, 0);
    for (x, y) in [(1, 0), (2, 3), (5, 5), (3, 1), (3, 0), (2, 0), (3, 0)] {
        move_to(&mut c, x, y);
    }
    up(&mut c, 3, 0);

    assert_eq!(opaque_pixels(layer(&c)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(c.history().undo_count(), 1);
}

#[test]
fn test_history_snapshots_are_independent() {
    let mut c = canvas(8);
    down(&mut c, 1, 1);
    up(&mut c, 1, 1);
    c.set_primary_color(RED);
    down(&mut c, 2, 2);
    up(&mut c, 2, 2);
    let after_two = layer(&c).clone();

    assert!(c.undo());
    assert_eq!(opaque_pixels(layer(&c)), vec![(1, 1)]);

    // Drawing after undo discards the redo branch.
    down(&mut c, 4, 4);
    up(&mut c, 4, 4);
    assert!(!c.can_redo());
    assert!(c.undo());
    assert!(c.undo());
    assert!(layer(&c).is_blank());
    assert!(!c.undo());

    assert!(c.redo());
    assert!(c.redo());
    assert_eq!(opaque_pixels(layer(&c)), vec![(1, 1), (4, 4)]);
    assert_ne!(layer(&c), &after_two);
}

#[test]
fn test_space_mid_stroke_then_pan() {
    let mut c = canvas(8);
    down(&mut c, 0, 0);
    assert!(c.handle_key(&KeyEvent::pressed(" ")));
    move_to(&mut c, 2, 0);
    up(&mut c, 2, 0);
    assert_eq!(opaque_pixels(layer(&c)), vec![(0, 0), (1, 0), (2, 0)]);

    // Space is still held: the next primary press pans instead of drawing.
    let before = c.viewport().translate;
    down(&mut c, 5, 5);
    c.handle_pointer(PointerEvent::Move {
        position: screen(&c, 5, 5) + Vec2::new(8.0, 0.0),
    });
    assert_eq!(c.viewport().translate, before + Vec2::new(8.0, 0.0));
    c.handle_key(&KeyEvent::released(" "));
    assert!(!c.is_panning());
    assert_eq!(opaque_pixels(layer(&c)).len(), 3);
    assert_eq!(c.history().undo_count(), 1);
}

#[test]
fn test_copy_paste_and_delete() {
    let mut c = canvas(8);
    c.import_image(gradient(8)).unwrap();
    let original = layer(&c).clone();
    c.set_clear_original(false);
    c.set_active_tool(ToolKind::Select);
    down(&mut c, 0, 0);
    move_to(&mut c, 2, 2);
    up(&mut c, 2, 2);
    assert_eq!(layer(&c), &original);

    assert!(c.handle_key(&KeyEvent::pressed_with("c", Modifiers::CTRL)));
    assert!(c.handle_key(&KeyEvent::pressed_with("v", Modifiers::CTRL)));
    assert!(c.is_valid_selection());

    // Move the pasted buffer and stamp it.
    down(&mut c, 0, 0);
    move_to(&mut c, 5, 5);
    up(&mut c, 5, 5);
    assert_eq!(layer(&c).pixel(5, 5), original.pixel(0, 0));
    assert_eq!(layer(&c).pixel(6, 6), original.pixel(1, 1));

    down(&mut c, 0, 0);
    move_to(&mut c, 2, 2);
    up(&mut c, 2, 2);
    assert!(c.handle_key(&KeyEvent::pressed("Delete")));
    assert!(!c.is_valid_selection());
    assert_eq!(layer(&c).pixel(0, 0), Some(Rgba::transparent()));
    assert_eq!(layer(&c).pixel(1, 1), Some(Rgba::transparent()));
    assert_eq!(layer(&c).pixel(2, 2), original.pixel(2, 2));
}

#[test]
fn test_bucket_fill_with_secondary_color() {
    let mut c = canvas(6);
    c.set_active_tool(ToolKind::Pencil);
    c.set_primary_color(RED);
    for y in 0..6 {
        down(&mut c, 3, y);
        up(&mut c, 3, y);
    }
    c.set_active_tool(ToolKind::Bucket);
    let p = screen(&c, 0, 0);
    c.handle_pointer(PointerEvent::Down {
        position: p,
        button: PointerButton::Secondary,
    });
    c.handle_pointer(PointerEvent::Up {
        position: p,
        button: PointerButton::Secondary,
    });
    assert_eq!(layer(&c).pixel(2, 5), Some(Rgba::white()));
    assert_eq!(layer(&c).pixel(4, 0), Some(Rgba::transparent()));
    assert_eq!(c.history().undo_count(), 7);
}

#[test]
fn test_config_from_file_drives_canvas() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("editor.json");
    std::fs::write(
        &path,
        r##"{ "document_width": 12, "document_height": 10, "brush_size": 3, "primary_color": { "r": 0, "g": 0, "b": 255, "a": 255 } }"##,
    )
    .unwrap();

    let config = EditorConfig::load(&path).unwrap();
    let mut c = Canvas::new(config).unwrap();
    assert_eq!((c.width(), c.height()), (12, 10));
    down(&mut c, 5, 5);
    up(&mut c, 5, 5);
    assert_eq!(opaque_pixels(layer(&c)).len(), 9);
    assert_eq!(layer(&c).pixel(4, 4), Some(Rgba::new(0, 0, 255, 255)));
}
