use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use traymenu::core::platform::headless::HeadlessDisplay;
use traymenu::core::vgi::RecordingGraphics;
use traymenu::core::window::MouseButton;
use traymenu::prelude::*;

fn click(menu: &Menu, item: &MenuItem) -> anyhow::Result<()> {
    let surface = item.input_region().context("item has no input region")?;
    let release = InputEvent::new(
        surface,
        EventKind::ButtonRelease(MouseButton::Left),
        Point2::new(4.0, 4.0),
        Point2::origin(),
    );
    menu.handle_event(&release);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = smol::block_on(MenuConfig::load()).unwrap_or_else(|err| {
        log::warn!("Using default menu config: {err}");
        MenuConfig::default()
    });

    let display = Rc::new(HeadlessDisplay::with_monitor(ScreenRect::new(0, 0, 1280, 800)));
    let capture = Rc::new(InputCaptureManager::new(display.seat()));
    let menu = Menu::with_config(display.clone(), capture, config);

    let player = MenuItem::with_icon("Player", IconSource::named("audio-x-generic"));
    let controls = MenuSection::new();
    let play = MenuItem::new("Play");
    let seeker = Seeker::new();
    seeker.set_label("1:23 / 4:56");
    seeker.set_fraction(0.3);
    controls.append(play.clone());
    controls.append(seeker.clone());

    menu.append(player.clone());
    menu.append(controls.clone());
    menu.append(MenuSeparator::new());
    menu.append(MenuItem::new("Quit"));
    player.set_submenu(Some(controls.into()));

    play.activate.connect(|_| {
        println!("play activated");
        PROPAGATE
    });
    seeker.seeked.connect(|fraction| {
        println!("seeked to {fraction:.2}");
        PROPAGATE
    });
    menu.popped_down.connect(|_| {
        println!("menu closed");
        PROPAGATE
    });

    // Tray icon in the top right corner, menu hangs below it.
    menu.popup_at_rect(ScreenRect::new(1250, 0, 24, 24), Gravity::SouthEast, Gravity::NorthEast)?;
    println!(
        "menu at {:?}, size {:?}",
        menu.window().position(),
        menu.window().size()
    );

    click(&menu, &player)?;
    println!("expanded, size {:?}", menu.window().size());

    let seeker_surface = seeker.input_region().context("seeker is not realized")?;
    let enter = InputEvent::new(seeker_surface, EventKind::Enter, Point2::new(1.0, 1.0), Point2::origin());
    menu.handle_event(&enter);
    display.clock().advance(Duration::from_millis(60));
    menu.process_updates();

    let scroll = InputEvent::new(
        seeker_surface,
        EventKind::Scroll(traymenu::core::platform::ScrollDirection::Up),
        Point2::new(1.0, 1.0),
        Point2::origin(),
    );
    menu.handle_event(&scroll);

    let mut graphics = RecordingGraphics::new();
    menu.draw(&mut graphics);
    println!("drew {} operations: {:?}", graphics.ops.len(), graphics.texts());

    click(&menu, &play)?;
    println!("visible after activation: {}", menu.is_visible());

    Ok(())
}
