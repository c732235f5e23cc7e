//! Static action table
//!
//! Every key event (6 keys x pressed/released/hold) and every encoder event
//! (clockwise and counter-clockwise begin/end, switch pressed/released) is
//! bound to a plain function pointer. The table is assembled once with
//! [`ActionTableBuilder`] and is immutable afterwards; dispatch is a direct
//! call through the bound pointer, in the caller's context `C`.

use crate::config::KEY_COUNT;
use crate::types::{Action, EncoderEvent, KeyEvent};

/// A bound action. Runs to completion and may block.
pub type Handler<C> = fn(&mut C);

/// Handler for slots nobody bound
pub fn noop<C>(_cx: &mut C) {}

/// Handlers of one key
pub struct KeyActions<C> {
    pub pressed: Handler<C>,
    pub released: Handler<C>,
    pub hold: Handler<C>,
}

impl<C> KeyActions<C> {
    pub fn none() -> Self {
        Self {
            pressed: noop::<C>,
            released: noop::<C>,
            hold: noop::<C>,
        }
    }

    fn get(&self, event: KeyEvent) -> Handler<C> {
        match event {
            KeyEvent::Pressed => self.pressed,
            KeyEvent::Released => self.released,
            KeyEvent::Hold => self.hold,
        }
    }

    fn set(&mut self, event: KeyEvent, handler: Handler<C>) {
        match event {
            KeyEvent::Pressed => self.pressed = handler,
            KeyEvent::Released => self.released = handler,
            KeyEvent::Hold => self.hold = handler,
        }
    }
}

impl<C> Clone for KeyActions<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for KeyActions<C> {}

impl<C> Default for KeyActions<C> {
    fn default() -> Self {
        Self::none()
    }
}

/// Handlers of the rotary encoder
pub struct EncoderActions<C> {
    pub clockwise_begin: Handler<C>,
    pub clockwise_end: Handler<C>,
    pub counter_clockwise_begin: Handler<C>,
    pub counter_clockwise_end: Handler<C>,
    pub switch_pressed: Handler<C>,
    pub switch_released: Handler<C>,
}

impl<C> EncoderActions<C> {
    pub fn none() -> Self {
        Self {
            clockwise_begin: noop::<C>,
            clockwise_end: noop::<C>,
            counter_clockwise_begin: noop::<C>,
            counter_clockwise_end: noop::<C>,
            switch_pressed: noop::<C>,
            switch_released: noop::<C>,
        }
    }

    fn get(&self, event: EncoderEvent) -> Handler<C> {
        match event {
            EncoderEvent::ClockwiseBegin => self.clockwise_begin,
            EncoderEvent::ClockwiseEnd => self.clockwise_end,
            EncoderEvent::CounterClockwiseBegin => self.counter_clockwise_begin,
            EncoderEvent::CounterClockwiseEnd => self.counter_clockwise_end,
            EncoderEvent::SwitchPressed => self.switch_pressed,
            EncoderEvent::SwitchReleased => self.switch_released,
        }
    }

    fn set(&mut self, event: EncoderEvent, handler: Handler<C>) {
        match event {
            EncoderEvent::ClockwiseBegin => self.clockwise_begin = handler,
            EncoderEvent::ClockwiseEnd => self.clockwise_end = handler,
            EncoderEvent::CounterClockwiseBegin => self.counter_clockwise_begin = handler,
            EncoderEvent::CounterClockwiseEnd => self.counter_clockwise_end = handler,
            EncoderEvent::SwitchPressed => self.switch_pressed = handler,
            EncoderEvent::SwitchReleased => self.switch_released = handler,
        }
    }
}

impl<C> Clone for EncoderActions<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for EncoderActions<C> {}

impl<C> Default for EncoderActions<C> {
    fn default() -> Self {
        Self::none()
    }
}

/// The complete, immutable binding of events to handlers
pub struct ActionTable<C> {
    keys: [KeyActions<C>; KEY_COUNT],
    encoder: EncoderActions<C>,
}

impl<C> ActionTable<C> {
    pub fn builder() -> ActionTableBuilder<C> {
        ActionTableBuilder {
            table: Self {
                keys: [KeyActions::none(); KEY_COUNT],
                encoder: EncoderActions::none(),
            },
        }
    }

    /// Handler bound to `action`, `None` for a key index past the last key
    pub fn handler(&self, action: Action) -> Option<Handler<C>> {
        match action {
            Action::Key { index, event } => self.keys.get(index).map(|k| k.get(event)),
            Action::Encoder(event) => Some(self.encoder.get(event)),
        }
    }

    /// Run the handler bound to `action` to completion
    pub fn dispatch(&self, action: Action, cx: &mut C) {
        match self.handler(action) {
            Some(handler) => {
                trace!("Dispatch {:?}", action);
                handler(cx);
            }
            None => warn!("No handler slot for {:?}", action),
        }
    }
}

/// Assembles an [`ActionTable`]. Slots left unbound do nothing.
pub struct ActionTableBuilder<C> {
    table: ActionTable<C>,
}

impl<C> ActionTableBuilder<C> {
    /// Bind all three handlers of key `number` (1..=6)
    pub fn key(mut self, number: usize, actions: KeyActions<C>) -> Self {
        match key_slot(number) {
            Some(index) => self.table.keys[index] = actions,
            None => warn!("Key {} does not exist, binding ignored", number),
        }
        self
    }

    /// Bind a single event of key `number` (1..=6)
    pub fn on_key(mut self, number: usize, event: KeyEvent, handler: Handler<C>) -> Self {
        match key_slot(number) {
            Some(index) => self.table.keys[index].set(event, handler),
            None => warn!("Key {} does not exist, binding ignored", number),
        }
        self
    }

    pub fn encoder(mut self, actions: EncoderActions<C>) -> Self {
        self.table.encoder = actions;
        self
    }

    pub fn on_encoder(mut self, event: EncoderEvent, handler: Handler<C>) -> Self {
        self.table.encoder.set(event, handler);
        self
    }

    pub fn build(self) -> ActionTable<C> {
        self.table
    }
}

fn key_slot(number: usize) -> Option<usize> {
    if (1..=KEY_COUNT).contains(&number) {
        Some(number - 1)
    } else {
        None
    }
}
