mod common;

use celpaint::curve::Curve;
use celpaint::input::PointerEvent;
use celpaint::tool::{EyedropperTool, Tool};
use egui::{Color32, pos2};

use common::{bitmap_editor, settings, vector_editor};

#[test]
fn opaque_pixel_becomes_the_front_color() {
    let mut editor = bitmap_editor();
    if let Some(bitmap) = editor.document.current_bitmap_mut() {
        bitmap.set_pixel(pos2(5.5, 5.5), Color32::from_rgb(100, 50, 25));
    }
    let mut tool = EyedropperTool::new(settings());
    tool.load_settings();

    let event = PointerEvent::mouse(pos2(5.5, 5.5));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    assert_eq!(editor.front_color, Color32::from_rgb(100, 50, 25));
}

#[test]
fn translucent_pixel_is_composited_over_white() {
    let mut editor = bitmap_editor();
    if let Some(bitmap) = editor.document.current_bitmap_mut() {
        bitmap.set_pixel(pos2(5.5, 5.5), Color32::from_rgba_premultiplied(100, 50, 25, 128));
    }
    let mut tool = EyedropperTool::new(settings());
    tool.load_settings();

    let event = PointerEvent::mouse(pos2(5.5, 5.5));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    assert_eq!(editor.front_color, Color32::from_rgb(227, 177, 152));
}

#[test]
fn empty_pixel_leaves_the_front_color_alone() {
    let mut editor = bitmap_editor();
    editor.front_color = Color32::RED;
    let mut tool = EyedropperTool::new(settings());
    tool.load_settings();

    let event = PointerEvent::mouse(pos2(5.5, 5.5));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    assert_eq!(editor.front_color, Color32::RED);
}

#[test]
fn vector_pick_takes_the_curve_color_number() {
    let mut editor = vector_editor();
    if let Some(vector) = editor.document.current_vector_mut() {
        let mut curve = Curve::from_points(vec![pos2(0.0, 0.0), pos2(20.0, 0.0)], 4.0);
        curve.color_number = 7;
        vector.add_curve(curve);
    }
    let mut tool = EyedropperTool::new(settings());
    tool.load_settings();

    let event = PointerEvent::mouse(pos2(10.0, 0.0));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    assert_eq!(editor.color_number, 7);
}
