mod common;

use celpaint::input::PointerEvent;
use celpaint::tool::{BrushTool, EraserTool, Tool};
use egui::{Color32, Key, pos2};

use common::{bitmap_editor, recorded, settings, with_recording_canvas};

fn brush() -> BrushTool {
    common::init_logging();
    let mut tool = BrushTool::new(settings());
    tool.load_settings();
    tool
}

#[test]
fn single_click_leaves_exactly_one_dab() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    let mut tool = brush();

    let event = PointerEvent::mouse(pos2(20.0, 20.0));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    let canvas = recorded(&editor);
    assert_eq!(canvas.log.len(), 1);
    assert_eq!(canvas.log[0].width, 15.0);
    assert_eq!(canvas.log[0].opacity, 1.0);
    assert_eq!(canvas.log[0].position, pos2(20.0, 20.0));
    assert!(canvas.buffer_is_clear());

    let bitmap = editor.document.current_bitmap().unwrap();
    assert!(!bitmap.is_blank());
}

#[test]
fn dragged_stroke_commits_to_the_layer() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    let mut tool = brush();

    tool.pointer_press(&mut editor, &PointerEvent::mouse(pos2(10.0, 10.0)));
    tool.pointer_move(&mut editor, &PointerEvent::mouse(pos2(30.0, 10.0)));
    tool.pointer_release(&mut editor, &PointerEvent::mouse(pos2(40.0, 10.0)));

    let canvas = recorded(&editor);
    assert!(canvas.log.len() >= 2);
    assert!(canvas.buffer_is_clear());
    assert!(!editor.document.current_bitmap().unwrap().is_blank());
}

#[test]
fn layer_change_mid_stroke_discards_the_stroke() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    let mut tool = brush();

    tool.pointer_press(&mut editor, &PointerEvent::mouse(pos2(10.0, 10.0)));
    tool.pointer_move(&mut editor, &PointerEvent::mouse(pos2(30.0, 10.0)));
    // Jumping to a frame that does not exist invalidates the target.
    editor.document.current_frame = 1;
    tool.pointer_release(&mut editor, &PointerEvent::mouse(pos2(40.0, 10.0)));

    editor.document.current_frame = 0;
    assert!(editor.document.current_bitmap().unwrap().is_blank());
    assert!(recorded(&editor).buffer_is_clear());
}

#[test]
fn escape_cancels_without_touching_the_layer() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    let mut tool = brush();

    tool.pointer_press(&mut editor, &PointerEvent::mouse(pos2(10.0, 10.0)));
    tool.pointer_move(&mut editor, &PointerEvent::mouse(pos2(30.0, 10.0)));
    assert!(tool.key_press(&mut editor, Key::Escape));
    tool.pointer_release(&mut editor, &PointerEvent::mouse(pos2(40.0, 10.0)));

    assert!(editor.document.current_bitmap().unwrap().is_blank());
    assert!(recorded(&editor).buffer_is_clear());
}

#[test]
fn press_on_unpaintable_layer_is_a_no_op() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    editor.document.current_layer = 3;
    let mut tool = brush();

    let event = PointerEvent::mouse(pos2(20.0, 20.0));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    assert!(recorded(&editor).log.is_empty());
}

#[test]
fn eraser_click_removes_painted_pixels() {
    let mut editor = bitmap_editor();
    if let Some(bitmap) = editor.document.current_bitmap_mut() {
        for x in 15..25 {
            for y in 15..25 {
                bitmap.set_pixel(pos2(x as f32 + 0.5, y as f32 + 0.5), Color32::RED);
            }
        }
    }
    let mut tool = EraserTool::new(settings());
    tool.load_settings();

    let event = PointerEvent::mouse(pos2(20.0, 20.0));
    tool.pointer_press(&mut editor, &event);
    tool.pointer_release(&mut editor, &event);

    let bitmap = editor.document.current_bitmap().unwrap();
    let erased = bitmap.pixel_at(pos2(20.5, 20.5)).unwrap();
    assert_eq!(erased.a(), 0);
    // Pixels outside the dab footprint are untouched.
    let kept = bitmap.pixel_at(pos2(15.5, 15.5)).unwrap();
    assert!(kept.a() > 0);
}

#[test]
fn stroke_damage_covers_the_dab_footprint() {
    let mut editor = bitmap_editor();
    with_recording_canvas(&mut editor);
    let mut tool = brush();

    tool.pointer_press(&mut editor, &PointerEvent::mouse(pos2(10.0, 20.0)));
    tool.pointer_move(&mut editor, &PointerEvent::mouse(pos2(40.0, 20.0)));

    let damage = editor.canvas.take_damage();
    assert!(damage.is_finite());
    assert!(damage.contains(pos2(20.0, 20.0)));

    tool.pointer_release(&mut editor, &PointerEvent::mouse(pos2(50.0, 20.0)));
    let damage = editor.canvas.take_damage();
    assert!(damage.contains(pos2(50.0, 20.0)));
}
