//! Observed values for the debug panel.
//!
//! A [`ColorControl`] owns one value and a list of listeners. Editing the
//! value through [`ColorControl::set`] calls every listener synchronously,
//! before `set` returns, so the change is visible to the very next frame.

use std::fmt;

use crate::params::SmokeColor;

type Listener = Box<dyn FnMut(SmokeColor)>;

/// A labeled, editable color with change notification.
pub struct ColorControl {
    label: String,
    value: SmokeColor,
    listeners: Vec<Listener>,
}

impl ColorControl {
    pub fn new(label: impl Into<String>, initial: SmokeColor) -> Self {
        Self {
            label: label.into(),
            value: initial,
            listeners: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> SmokeColor {
        self.value
    }

    /// Register a callback invoked with the new value on every change.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(SmokeColor) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Store a new value. Channels are clamped to `[0, 1]`.
    ///
    /// Returns `true` and notifies listeners only if the value changed.
    pub fn set(&mut self, value: SmokeColor) -> bool {
        let value = value.clamped();
        if value == self.value {
            return false;
        }
        self.value = value;
        for listener in &mut self.listeners {
            listener(value);
        }
        true
    }
}

impl fmt::Debug for ColorControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorControl")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
