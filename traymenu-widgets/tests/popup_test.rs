//! Tests for popup placement, capture and dismissal

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{event_at, headless, menu, Block};
use nalgebra::{Point2, Vector2};
use traymenu_core::layout::{Gravity, ScreenRect};
use traymenu_core::platform::headless::SurfaceKind;
use traymenu_core::platform::{AnchorSource, EventKind};
use traymenu_core::vg::kurbo::{Point, Rect};
use traymenu_core::vg::peniko::Brush;
use traymenu_core::vg::Scene;
use traymenu_core::vgi::{
    DrawOp, GlyphPainter, Graphics, IconSource, RecordingGraphics, VelloGraphics,
};
use traymenu_core::window::{Key, MouseButton, NamedKey};
use traymenu_widgets::menu::Menu;
use traymenu_widgets::menu_item::MenuItem;
use traymenu_widgets::node::MenuNode;

fn count_popdowns(menu: &Menu) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    menu.popped_down.connect(move |_| {
        counter.set(counter.get() + 1);
        false
    });
    count
}

#[test]
fn test_popup_attaches_to_south_east_corner() {
    let (_display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(100, 100, 50, 20), Gravity::SouthEast, Gravity::NorthWest)
        .unwrap();

    assert!(menu.is_visible());
    assert_eq!(menu.window().size(), Vector2::new(30, 40));
    assert_eq!(menu.window().position(), Point2::new(150, 120));
}

#[test]
fn test_popup_is_pulled_back_into_work_area() {
    let (display, capture) = headless(ScreenRect::new(0, 0, 160, 130));
    let menu = Menu::new(display, capture);
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(100, 100, 50, 20), Gravity::SouthEast, Gravity::NorthWest)
        .unwrap();

    assert_eq!(menu.window().position(), Point2::new(130, 90));
}

#[test]
fn test_left_and_top_edges_are_not_clamped() {
    // Known limitation: only the right and bottom edges pull the menu back.
    let (_display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(-20, -15, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    assert_eq!(menu.window().position(), Point2::new(-20, -15));
}

#[test]
fn test_menu_gravity_is_applied_to_window() {
    let (display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(100, 100, 50, 20), Gravity::North, Gravity::SouthWest)
        .unwrap();

    let record = display.surface(menu.window().id()).unwrap();
    assert_eq!(record.gravity, Gravity::SouthWest);
    assert_eq!(record.rect, ScreenRect::new(100, 100, 30, 40));
}

#[test]
fn test_children_are_stacked_at_natural_height() {
    let (display, _capture, menu) = menu();
    let top = Block::new(40, 10);
    let item = MenuItem::new("Open");
    let bottom = Block::new(40, 5);

    menu.append(top.widget());
    menu.append(item.clone());
    menu.append(bottom.widget());

    menu.popup_at_rect(ScreenRect::new(0, 0, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    // 2 * margin + 4 characters
    let width = 20 + 4 * 8;
    // 2 * margin + line height
    let item_height = 20 + 16;

    assert_eq!(menu.window().size(), Vector2::new(width, 10 + item_height + 5));
    assert_eq!(top.bounds(), ScreenRect::new(0, 0, width, 10));
    assert_eq!(item.allocation(), ScreenRect::new(0, 10, width, item_height));
    assert_eq!(bottom.bounds(), ScreenRect::new(0, 10 + item_height, width, 5));

    let region = display.surface(item.input_region().unwrap()).unwrap();
    assert_eq!(region.rect, item.allocation());
    assert_eq!(region.parent, Some(menu.window().id()));
    assert!(region.visible);
}

#[test]
fn test_popup_at_widget_offsets_by_toplevel() {
    struct Icon;

    impl AnchorSource for Icon {
        fn allocation(&self) -> ScreenRect {
            ScreenRect::new(10, 5, 20, 20)
        }

        fn toplevel_position(&self) -> Point2<i32> {
            Point2::new(100, 200)
        }
    }

    let (_display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_widget(&Icon, Gravity::SouthWest, Gravity::NorthWest)
        .unwrap();

    assert_eq!(menu.anchor().unwrap().rect, ScreenRect::new(110, 205, 20, 20));
    assert_eq!(menu.window().position(), Point2::new(110, 225));
}

#[test]
fn test_popup_at_pointer_uses_seat_position() {
    let (display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());
    display.headless_seat().set_pointer(Some(Point2::new(300, 200)));

    let click = event_at(
        menu.window().id(),
        EventKind::ButtonPress(MouseButton::Right),
        1.0,
        1.0,
        Point2::new(10.0, 10.0),
    );
    menu.popup_at_pointer(&click).unwrap();

    let anchor = menu.anchor().unwrap();
    assert_eq!(anchor.rect, ScreenRect::new(300, 200, 0, 0));
    assert_eq!(anchor.source_gravity, Gravity::SouthEast);
    assert_eq!(anchor.menu_gravity, Gravity::NorthWest);
    assert_eq!(menu.window().position(), Point2::new(300, 200));
}

#[test]
fn test_popup_at_pointer_falls_back_to_event_position() {
    let (_display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    let click = event_at(
        menu.window().id(),
        EventKind::ButtonPress(MouseButton::Right),
        15.0,
        20.0,
        Point2::new(25.0, 30.0),
    );
    menu.popup_at_pointer(&click).unwrap();

    assert_eq!(menu.window().position(), Point2::new(40, 50));
}

#[test]
fn test_popdown_is_idempotent() {
    let (display, capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());
    let popdowns = count_popdowns(&menu);

    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();
    assert!(capture.is_captured());
    assert!(menu.anchor().is_some());

    menu.popdown();
    menu.popdown();

    assert!(!menu.is_visible());
    assert!(!capture.is_captured());
    assert!(display.headless_seat().grabbed().is_none());
    assert!(menu.anchor().is_none());
    assert_eq!(popdowns.get(), 1);
}

#[test]
fn test_transfer_window_is_created_once() {
    let (display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();
    let transfer = menu.transfer_surface().unwrap();
    assert_eq!(display.headless_seat().grabbed(), Some(transfer));

    menu.popdown();
    menu.popup_at_rect(ScreenRect::new(20, 20, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    assert_eq!(menu.transfer_surface(), Some(transfer));
    assert_eq!(display.headless_seat().grabbed(), Some(transfer));

    let record = display.surface(transfer).unwrap();
    assert_eq!(record.kind, SurfaceKind::InputOnly);
    assert_eq!(record.parent, None);
    assert_eq!(record.rect, ScreenRect::new(-100, -100, 10, 10));
    assert!(record.override_redirect);
    assert!(record.visible);

    let toplevel_inputs = display
        .surfaces(SurfaceKind::InputOnly)
        .into_iter()
        .filter(|(_, record)| record.parent.is_none())
        .count();
    assert_eq!(toplevel_inputs, 1);
}

#[test]
fn test_popup_grab_skips_transfer_window() {
    let (display, _capture, menu) = menu();
    display.set_popup_grab(true);

    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    assert!(menu.transfer_surface().is_none());
    assert_eq!(display.headless_seat().grabbed(), Some(menu.window().id()));
}

#[test]
fn test_failed_grab_still_shows_menu() {
    let (display, capture, menu) = menu();
    display.headless_seat().set_grab_allowed(false);

    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    assert!(menu.is_visible());
    assert!(!capture.is_captured());

    // Escape still works since the key handler is connected regardless.
    let escape = event_at(
        menu.window().id(),
        EventKind::KeyPress(Key::Named(NamedKey::Escape)),
        0.0,
        0.0,
        Point2::new(10.0, 10.0),
    );
    menu.handle_event(&escape);
    assert!(!menu.is_visible());
}

#[test]
fn test_escape_dismisses_and_other_keys_do_not() {
    let (_display, _capture, menu) = menu();
    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();
    let surface = menu.window().id();
    let origin = Point2::new(10.0, 10.0);

    let other = event_at(surface, EventKind::KeyPress(Key::Named(NamedKey::Enter)), 0.0, 0.0, origin);
    assert!(!menu.handle_event(&other));
    assert!(menu.is_visible());

    let escape = event_at(surface, EventKind::KeyPress(Key::Named(NamedKey::Escape)), 0.0, 0.0, origin);
    assert!(menu.handle_event(&escape));
    assert!(!menu.is_visible());
}

#[test]
fn test_release_outside_dismisses() {
    let (_display, _capture, menu) = menu();
    menu.append(Block::new(30, 40).widget());
    menu.popup_at_rect(ScreenRect::new(100, 100, 50, 20), Gravity::SouthEast, Gravity::NorthWest)
        .unwrap();
    let surface = menu.window().id();
    let origin = Point2::new(150.0, 120.0);

    let inside = event_at(surface, EventKind::ButtonRelease(MouseButton::Left), 5.0, 5.0, origin);
    assert!(!menu.handle_event(&inside));
    assert!(menu.is_visible());

    let outside = event_at(surface, EventKind::ButtonRelease(MouseButton::Left), -5.0, 50.0, origin);
    assert!(menu.handle_event(&outside));
    assert!(!menu.is_visible());
}

#[test]
fn test_handlers_are_disconnected_on_popdown() {
    let (_display, _capture, menu) = menu();

    for _ in 0..3 {
        menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
            .unwrap();
    }
    assert_eq!(menu.key_press.handler_count(), 1);
    assert_eq!(menu.button_release.handler_count(), 1);

    menu.popdown();
    assert_eq!(menu.key_press.handler_count(), 0);
    assert_eq!(menu.button_release.handler_count(), 0);
}

#[test]
fn test_second_menu_revokes_first() {
    let (display, capture) = headless(ScreenRect::new(0, 0, 800, 600));
    let first = Menu::new(display.clone(), capture.clone());
    let second = Menu::new(display.clone(), capture.clone());
    let popdowns = count_popdowns(&first);

    first.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();
    second.popup_at_rect(ScreenRect::new(300, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    assert!(!first.is_visible());
    assert!(first.anchor().is_none());
    assert_eq!(popdowns.get(), 1);
    assert!(second.is_visible());
    assert_eq!(display.headless_seat().grabbed(), second.transfer_surface());

    second.popdown();
    assert!(!capture.is_captured());
}

#[test]
fn test_content_change_repositions_menu() {
    let (display, capture) = headless(ScreenRect::new(0, 0, 200, 160));
    let menu = Menu::new(display, capture);
    menu.append(Block::new(30, 40).widget());

    menu.popup_at_rect(ScreenRect::new(100, 100, 50, 20), Gravity::SouthEast, Gravity::NorthWest)
        .unwrap();
    assert_eq!(menu.window().position(), Point2::new(150, 120));

    menu.append(Block::new(60, 10).widget());
    menu.process_updates();

    assert_eq!(menu.window().size(), Vector2::new(60, 50));
    assert_eq!(menu.window().position(), Point2::new(140, 110));
}

#[test]
fn test_frame_is_drawn_beneath_children() {
    let (_display, _capture, menu) = menu();
    menu.append(MenuItem::new("Quit"));
    menu.popup_at_rect(ScreenRect::new(0, 0, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    let mut graphics = RecordingGraphics::new();
    menu.draw(&mut graphics);

    assert!(matches!(graphics.ops[0], DrawOp::Fill { .. }));
    assert!(matches!(graphics.ops[1], DrawOp::Stroke { .. }));
    assert_eq!(graphics.texts(), vec!["Quit"]);
}

#[derive(Default)]
struct Glyphs {
    texts: Vec<String>,
    icons: usize,
}

impl GlyphPainter for Glyphs {
    fn paint_text(&mut self, _scene: &mut Scene, text: &str, _origin: Point, _brush: &Brush) {
        self.texts.push(text.to_string());
    }

    fn paint_icon(&mut self, _scene: &mut Scene, _icon: &IconSource, _bounds: Rect) {
        self.icons += 1;
    }
}

#[test]
fn test_menu_renders_into_vello_scene() {
    let (_display, _capture, menu) = menu();
    menu.append(MenuItem::with_icon("Quit", IconSource::named("application-exit")));
    menu.popup_at_rect(ScreenRect::new(0, 0, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();

    let mut scene = Scene::new();
    let mut glyphs = Glyphs::default();
    {
        let mut graphics = VelloGraphics::with_glyphs(&mut scene, &mut glyphs);
        menu.draw(&mut graphics);
        assert!(graphics.as_scene_mut().is_some());
    }

    assert_eq!(glyphs.texts, vec!["Quit"]);
    assert_eq!(glyphs.icons, 1);

    // Without a painter only the shapes are drawn.
    let mut plain = Scene::new();
    menu.draw(&mut VelloGraphics::new(&mut plain));
}
