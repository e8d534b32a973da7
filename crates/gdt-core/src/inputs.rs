//! Input fan-out from the window system to application listeners.
//!
//! The window system forwards raw callbacks (key code, action code, modifier
//! bits) to [`InputListeners`], which decodes the action and calls every
//! registered listener of the matching kind in registration order.

use std::cell::RefCell;
use std::rc::Rc;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use tracing::trace;

/// Action codes reported by the windowing library for keys and buttons.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum Action {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

pub trait KeyListener {
    fn on_key_pressed(&mut self, key: i32, mods: i32);
    fn on_key_released(&mut self, key: i32, mods: i32);
}

pub trait MouseMoveListener {
    fn on_mouse_move(&mut self, x: f32, y: f32);
}

pub trait MouseClickListener {
    fn on_mouse_clicked(&mut self, button: i32, mods: i32);
    fn on_mouse_released(&mut self, button: i32, mods: i32);
}

pub trait MouseScrollListener {
    fn on_mouse_scrolled(&mut self, x_offset: f32, y_offset: f32);
}

pub trait ResizeListener {
    fn on_resize(&mut self, width: u32, height: u32);
}

/// Ordered listener collections, one per input kind.
///
/// Listeners are shared with the application, which usually keeps its own
/// handle to read back state (a camera controller, for instance).
#[derive(Default)]
pub struct InputListeners {
    keys: Vec<Rc<RefCell<dyn KeyListener>>>,
    mouse_moves: Vec<Rc<RefCell<dyn MouseMoveListener>>>,
    mouse_clicks: Vec<Rc<RefCell<dyn MouseClickListener>>>,
    scrolls: Vec<Rc<RefCell<dyn MouseScrollListener>>>,
    resizes: Vec<Rc<RefCell<dyn ResizeListener>>>,
}

impl std::fmt::Debug for InputListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputListeners")
            .field("keys", &self.keys.len())
            .field("mouse_moves", &self.mouse_moves.len())
            .field("mouse_clicks", &self.mouse_clicks.len())
            .field("scrolls", &self.scrolls.len())
            .field("resizes", &self.resizes.len())
            .finish()
    }
}

impl InputListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key_listener(&mut self, listener: Rc<RefCell<dyn KeyListener>>) {
        self.keys.push(listener);
    }

    pub fn add_mouse_move_listener(&mut self, listener: Rc<RefCell<dyn MouseMoveListener>>) {
        self.mouse_moves.push(listener);
    }

    pub fn add_mouse_click_listener(&mut self, listener: Rc<RefCell<dyn MouseClickListener>>) {
        self.mouse_clicks.push(listener);
    }

    pub fn add_mouse_scroll_listener(&mut self, listener: Rc<RefCell<dyn MouseScrollListener>>) {
        self.scrolls.push(listener);
    }

    pub fn add_resize_listener(&mut self, listener: Rc<RefCell<dyn ResizeListener>>) {
        self.resizes.push(listener);
    }

    /// Forward a raw key callback. Only press and release reach listeners.
    pub fn on_key_input(&self, key: i32, action: i32, mods: i32) {
        match Action::from_i32(action) {
            Some(Action::Press) => {
                for l in &self.keys {
                    l.borrow_mut().on_key_pressed(key, mods);
                }
            }
            Some(Action::Release) => {
                for l in &self.keys {
                    l.borrow_mut().on_key_released(key, mods);
                }
            }
            other => trace!(key, action, ?other, "key action not forwarded"),
        }
    }

    /// Forward a raw mouse button callback. Only press and release reach
    /// listeners.
    pub fn on_mouse_button(&self, button: i32, action: i32, mods: i32) {
        match Action::from_i32(action) {
            Some(Action::Press) => {
                for l in &self.mouse_clicks {
                    l.borrow_mut().on_mouse_clicked(button, mods);
                }
            }
            Some(Action::Release) => {
                for l in &self.mouse_clicks {
                    l.borrow_mut().on_mouse_released(button, mods);
                }
            }
            other => trace!(button, action, ?other, "mouse action not forwarded"),
        }
    }

    pub fn on_mouse_move(&self, x: f32, y: f32) {
        for l in &self.mouse_moves {
            l.borrow_mut().on_mouse_move(x, y);
        }
    }

    pub fn on_scroll(&self, x_offset: f32, y_offset: f32) {
        for l in &self.scrolls {
            l.borrow_mut().on_mouse_scrolled(x_offset, y_offset);
        }
    }

    pub fn on_resize(&self, width: u32, height: u32) {
        for l in &self.resizes {
            l.borrow_mut().on_resize(width, height);
        }
    }
}
