//! Tests for items, sections, panes and activation bubbling

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{event, menu, Block};
use nalgebra::Vector2;
use traymenu_core::layout::{Gravity, ScreenRect};
use traymenu_core::platform::EventKind;
use traymenu_core::vgi::{IconSource, RecordingGraphics};
use traymenu_core::window::MouseButton;
use traymenu_widgets::menu::Menu;
use traymenu_widgets::menu_item::{Arrow, MenuItem, StateFlags, SubmenuState};
use traymenu_widgets::node::{same_node, MenuNode, NodeRef};
use traymenu_widgets::pane::MenuPane;
use traymenu_widgets::section::MenuSection;

fn popup(menu: &Menu) {
    menu.popup_at_rect(ScreenRect::new(10, 10, 0, 0), Gravity::NorthWest, Gravity::NorthWest)
        .unwrap();
}

fn click(menu: &Menu, item: &MenuItem) -> bool {
    let surface = item.input_region().expect("item is realized");
    menu.handle_event(&event(surface, EventKind::ButtonRelease(MouseButton::Left), 5.0, 5.0))
}

fn submenu_fixture() -> (Rc<Menu>, Rc<MenuItem>, Rc<MenuSection>) {
    let (_display, _capture, menu) = menu();
    let item = MenuItem::new("More");
    let section = MenuSection::new();
    section.append(MenuItem::new("Inner"));

    menu.append(item.clone());
    menu.append(section.clone());
    item.set_submenu(Some(section.clone().into()));

    (menu, item, section)
}

#[test]
fn test_submenu_toggles_between_states() {
    let (menu, item, section) = submenu_fixture();
    popup(&menu);

    assert_eq!(item.submenu_state(), SubmenuState::Collapsed);
    assert_eq!(item.arrow(), Some(Arrow::Forward));
    assert!(!section.is_visible());
    assert_eq!(menu.window().size().y, 36);

    assert!(click(&menu, &item));
    assert_eq!(item.submenu_state(), SubmenuState::Expanded);
    assert_eq!(item.arrow(), Some(Arrow::Down));
    assert!(section.is_visible());
    assert!(MenuNode::is_mapped(&*section));
    assert!(menu.is_visible(), "toggling a submenu keeps the menu open");
    assert_eq!(menu.window().size().y, 72);

    assert!(click(&menu, &item));
    assert_eq!(item.submenu_state(), SubmenuState::Collapsed);
    assert_eq!(item.arrow(), Some(Arrow::Forward));
    assert!(!section.is_visible());
    assert_eq!(menu.window().size().y, 36);
}

#[test]
fn test_external_unmap_collapses_submenu() {
    let (menu, item, section) = submenu_fixture();
    popup(&menu);
    click(&menu, &item);
    assert_eq!(item.submenu_state(), SubmenuState::Expanded);

    section.hide();

    assert_eq!(item.submenu_state(), SubmenuState::Collapsed);
    assert_eq!(item.arrow(), Some(Arrow::Forward));
}

#[test]
fn test_popdown_collapses_submenu() {
    let (menu, item, section) = submenu_fixture();
    popup(&menu);
    click(&menu, &item);

    menu.popdown();

    assert_eq!(item.submenu_state(), SubmenuState::Collapsed);
    assert!(!section.is_visible());

    popup(&menu);
    assert!(!section.is_visible());
    assert_eq!(item.arrow(), Some(Arrow::Forward));
}

#[test]
fn test_show_all_skips_submenu_section() {
    let (menu, item, section) = submenu_fixture();
    item.hide();

    menu.show_all();

    assert!(item.is_visible());
    assert!(!section.is_visible());
    assert!(section.no_show_all());
}

#[test]
fn test_nested_activation_pops_down_once() {
    let (_display, _capture, menu) = menu();
    let outer = MenuSection::new();
    let inner = MenuSection::new();
    let leaf = MenuItem::new("Leaf");

    inner.append(leaf.clone());
    outer.append(inner.clone());
    menu.append(outer.clone());

    let popdowns = Rc::new(Cell::new(0));
    let counter = popdowns.clone();
    menu.popped_down.connect(move |_| {
        counter.set(counter.get() + 1);
        false
    });

    let activations = Rc::new(Cell::new(0));
    let counter = activations.clone();
    leaf.activate.connect(move |_| {
        counter.set(counter.get() + 1);
        false
    });

    let payload: Rc<RefCell<Option<NodeRef>>> = Rc::new(RefCell::new(None));
    let seen = payload.clone();
    menu.root().child_activated.connect(move |node| {
        *seen.borrow_mut() = Some(node.clone());
        false
    });

    popup(&menu);
    assert!(click(&menu, &leaf));

    assert_eq!(popdowns.get(), 1);
    assert_eq!(activations.get(), 1);
    assert!(!menu.is_visible());

    let leaf_node: NodeRef = leaf.clone();
    assert!(same_node(payload.borrow().as_ref().unwrap(), &leaf_node));
}

#[test]
fn test_handled_activation_stops_bubbling() {
    let (_display, _capture, menu) = menu();
    let section = MenuSection::new();
    let leaf = MenuItem::new("Leaf");
    section.append(leaf.clone());

    // Connected ahead of the menu's own handler, so it wins.
    section.child_activated().connect(|_| true);
    menu.append(section.clone());

    popup(&menu);
    click(&menu, &leaf);

    assert!(menu.is_visible());
}

#[test]
fn test_item_without_submenu_emits_activate() {
    let item = MenuItem::new("Plain");
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    item.activate.connect(move |_| {
        flag.set(true);
        true
    });

    assert!(item.maybe_activate());
    assert!(fired.get());
    assert_eq!(item.arrow(), None);
}

#[test]
fn test_input_region_follows_item_lifecycle() {
    let (display, _capture, menu) = menu();
    let item = MenuItem::new("Remove me");
    menu.append(item.clone());

    assert!(item.input_region().is_none());

    popup(&menu);
    let region = item.input_region().unwrap();
    assert!(display.surface(region).unwrap().visible);

    menu.popdown();
    assert!(!display.surface(region).unwrap().visible);

    let node: NodeRef = item.clone();
    assert!(menu.remove(&node));
    assert!(display.surface(region).is_none());
    assert!(item.input_region().is_none());
    assert!(item.parent().is_none());
    assert_eq!(item.activate.handler_count(), 0);
}

#[test]
fn test_items_added_while_shown_are_realized() {
    let (display, _capture, menu) = menu();
    popup(&menu);

    let late = MenuItem::new("Late");
    menu.append(late.clone());
    menu.process_updates();

    let region = late.input_region().unwrap();
    assert!(display.surface(region).unwrap().visible);
    assert_eq!(menu.window().size(), Vector2::new(20 + 4 * 8, 36));
}

#[test]
fn test_enter_and_leave_toggle_prelight() {
    let (_display, _capture, menu) = menu();
    let item = MenuItem::new("Hover");
    menu.append(item.clone());
    popup(&menu);
    let region = item.input_region().unwrap();

    menu.handle_event(&event(region, EventKind::Enter, 1.0, 1.0));
    assert!(item.state_flags().contains(StateFlags::PRELIGHT));

    let mut graphics = RecordingGraphics::new();
    menu.draw(&mut graphics);
    // background plus prelight
    assert_eq!(graphics.fills().len(), 2);

    menu.handle_event(&event(region, EventKind::Leave, 1.0, 1.0));
    assert!(!item.state_flags().contains(StateFlags::PRELIGHT));

    menu.handle_event(&event(region, EventKind::Enter, 1.0, 1.0));
    menu.popdown();
    assert!(item.state_flags().is_empty());
}

#[test]
fn test_relabel_resizes_menu() {
    let (_display, _capture, menu) = menu();
    let item = MenuItem::new("ab");
    menu.append(item.clone());
    popup(&menu);
    assert_eq!(menu.window().size().x, 20 + 2 * 8);

    item.set_label("abcdef");
    menu.process_updates();

    assert_eq!(menu.window().size().x, 20 + 6 * 8);
}

#[test]
fn test_icon_and_arrow_are_drawn() {
    let (_display, _capture, menu) = menu();
    let item = MenuItem::with_icon("Volume", IconSource::named("audio-volume-high"));
    let section = MenuSection::new();
    menu.append(item.clone());
    menu.append(section.clone());
    item.set_submenu(Some(section.into()));
    popup(&menu);

    // margins, icon, spacing, label, spacing, arrow
    let width = 2 * 10 + 16 + 7 + 6 * 8 + 7 + 16;
    assert_eq!(menu.window().size().x, width);

    let mut graphics = RecordingGraphics::new();
    menu.draw(&mut graphics);

    assert_eq!(
        graphics.icons(),
        vec![
            &IconSource::named("audio-volume-high"),
            &IconSource::named(Arrow::Forward.icon_name()),
        ]
    );
    assert_eq!(graphics.texts(), vec!["Volume"]);
}

#[test]
fn test_panes_share_extra_width() {
    let (_display, _capture, menu) = menu();
    let pane = MenuPane::new();
    let left = pane.add_pane();
    let right = pane.add_pane();
    let short = MenuItem::new("ab");
    let long = MenuItem::new("abcdef");
    left.append(short.clone());
    right.append(long.clone());

    menu.append(pane.clone());
    menu.append(Block::new(120, 10).widget());
    popup(&menu);

    assert_eq!(pane.allocation(), ScreenRect::new(0, 0, 120, 36));
    assert_eq!(left.allocation(), ScreenRect::new(0, 0, 36 + 8, 36));
    assert_eq!(right.allocation(), ScreenRect::new(44, 0, 68 + 8, 36));
    assert_eq!(long.allocation(), ScreenRect::new(44, 0, 76, 36));

    assert!(click(&menu, &long));
    assert!(!menu.is_visible());
}

#[test]
fn test_moved_section_keeps_children_and_bubbling() {
    let (display, _capture, menu) = menu();
    let first = MenuSection::new();
    let second = MenuSection::new();
    let group = MenuSection::new();
    let one = MenuItem::new("one");
    group.append(one.clone());
    group.append(MenuItem::new("two"));

    first.append(group.clone());
    menu.append(first.clone());
    menu.append(second.clone());
    popup(&menu);
    let region = one.input_region().unwrap();

    second.append(group.clone());
    menu.process_updates();

    assert!(first.children().is_empty());
    assert_eq!(second.children().len(), 1);
    assert_eq!(group.children().len(), 2);
    assert!(MenuNode::is_mapped(&*group));

    // Same window, so the item keeps its input region.
    assert_eq!(one.input_region(), Some(region));
    assert!(display.surface(region).unwrap().visible);
    // below the now empty first section, which keeps its minimum height
    assert_eq!(one.allocation().y, 10);

    let bubbled = Rc::new(Cell::new(0));
    let counter = bubbled.clone();
    second.child_activated().connect(move |_| {
        counter.set(counter.get() + 1);
        false
    });

    assert!(click(&menu, &one));
    assert_eq!(bubbled.get(), 1);
    assert!(!menu.is_visible());
}

#[test]
fn test_reparenting_moves_item_between_sections() {
    let first = MenuSection::new();
    let second = MenuSection::new();
    let item = MenuItem::new("Moving");

    first.append(item.clone());
    second.prepend(item.clone());

    assert!(first.children().is_empty());
    assert_eq!(second.children().len(), 1);
    assert_eq!(item.activate.handler_count(), 1);
}
