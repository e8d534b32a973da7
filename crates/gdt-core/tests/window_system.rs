//! A scripted window system driving listeners through the `WindowSystem`
//! contract, the way a frame loop does.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gdt_core::inputs::{InputListeners, KeyListener, MouseMoveListener, ResizeListener};
use gdt_core::window::{WindowError, WindowSettings, WindowSystem};

enum Event {
    Key(i32, i32, i32),
    Move(f32, f32),
    Resize(u32, u32),
    CloseRequested,
}

/// Replays one queued batch of events per `update`.
struct ScriptedWindow {
    frames: VecDeque<Vec<Event>>,
    listeners: InputListeners,
    size: (u32, u32),
    created: bool,
    closing: bool,
    cursor_locked: bool,
    fail_with: Option<WindowError>,
}

impl ScriptedWindow {
    fn new(frames: Vec<Vec<Event>>) -> Self {
        Self {
            frames: frames.into(),
            listeners: InputListeners::new(),
            size: (0, 0),
            created: false,
            closing: false,
            cursor_locked: false,
            fail_with: None,
        }
    }
}

impl WindowSystem for ScriptedWindow {
    fn create(&mut self, settings: &WindowSettings) -> Result<(), WindowError> {
        if let Some(err) = self.fail_with.take() {
            return Err(err);
        }
        self.size = (settings.width, settings.height);
        self.created = true;
        Ok(())
    }

    fn update(&mut self) {
        let Some(events) = self.frames.pop_front() else {
            self.closing = true;
            return;
        };
        for event in events {
            match event {
                Event::Key(key, action, mods) => self.listeners.on_key_input(key, action, mods),
                Event::Move(x, y) => self.listeners.on_mouse_move(x, y),
                Event::Resize(w, h) => {
                    self.size = (w, h);
                    self.listeners.on_resize(w, h);
                }
                Event::CloseRequested => self.closing = true,
            }
        }
    }

    fn should_close(&self) -> bool {
        self.closing
    }

    fn close(&mut self) {
        self.closing = true;
    }

    fn destroy(&mut self) {
        self.created = false;
    }

    fn lock_cursor(&mut self, lock: bool) {
        self.cursor_locked = lock;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn listeners_mut(&mut self) -> &mut InputListeners {
        &mut self.listeners
    }
}

#[derive(Default)]
struct Controller {
    held: Vec<i32>,
    last_cursor: Option<(f32, f32)>,
    viewport: (u32, u32),
}

impl KeyListener for Controller {
    fn on_key_pressed(&mut self, key: i32, _mods: i32) {
        self.held.push(key);
    }

    fn on_key_released(&mut self, key: i32, _mods: i32) {
        self.held.retain(|&k| k != key);
    }
}

impl MouseMoveListener for Controller {
    fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.last_cursor = Some((x, y));
    }
}

impl ResizeListener for Controller {
    fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

#[test]
fn frame_loop_feeds_listeners_until_close() {
    const W: i32 = 87;
    const A: i32 = 65;

    let mut window = ScriptedWindow::new(vec![
        vec![Event::Key(W, 1, 0), Event::Move(10.0, 20.0)],
        vec![Event::Key(A, 1, 0), Event::Key(W, 2, 0)],
        vec![Event::Key(W, 0, 0), Event::Resize(800, 600)],
        vec![Event::CloseRequested],
        vec![Event::Key(A, 0, 0)],
    ]);
    window
        .create(&WindowSettings::new("scripted", 1024, 768))
        .unwrap();
    assert_eq!(window.size(), (1024, 768));

    let controller = Rc::new(RefCell::new(Controller::default()));
    let listeners = window.listeners_mut();
    listeners.add_key_listener(controller.clone());
    listeners.add_mouse_move_listener(controller.clone());
    listeners.add_resize_listener(controller.clone());
    window.lock_cursor(true);

    let mut frames = 0;
    while !window.should_close() {
        window.update();
        frames += 1;
    }
    window.destroy();

    assert_eq!(frames, 4);
    let c = controller.borrow();
    // The release of A sits in a frame that never ran.
    assert_eq!(c.held, vec![A]);
    assert_eq!(c.last_cursor, Some((10.0, 20.0)));
    assert_eq!(c.viewport, (800, 600));
    assert_eq!(window.size(), (800, 600));
    assert!(window.cursor_locked);
    assert!(!window.created);
}

#[test]
fn creation_failure_is_reported() {
    let mut window = ScriptedWindow::new(Vec::new());
    window.fail_with = Some(WindowError::CreationFailed("no display".to_string()));

    let err = window.create(&WindowSettings::default()).unwrap_err();
    assert_eq!(err.to_string(), "Failed to create window: no display");
    assert!(!window.created);
}

#[test]
fn close_stops_the_loop() {
    let mut window = ScriptedWindow::new(Vec::new());
    window.create(&WindowSettings::default()).unwrap();
    assert!(!window.should_close());
    window.close();
    assert!(window.should_close());
}
