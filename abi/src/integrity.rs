//! Integrity marker layout.
//!
//! Every driver initializer stamps a fixed pattern into its own slot of the
//! marker bank. The integrity gate later compares each slot byte-for-byte with
//! the pattern below; a slot that does not match means that driver did not run
//! its genuine initialization path.

use crate::error::Component;

/// Bytes per marker slot.
pub const MARKER_LEN: usize = 8;
/// 32-bit words per marker slot.
pub const MARKER_WORDS: usize = MARKER_LEN / 4;

pub const PIC_MARKER: [u8; MARKER_LEN] = [0x56, 0x49, 0x43, 0x39, 0x5A, 0xA5, 0x3C, 0xC3];
pub const UART_MARKER: [u8; MARKER_LEN] = [0x50, 0x4C, 0x30, 0x31, 0x31, 0x96, 0x69, 0x0F];
pub const TIMER_MARKER: [u8; MARKER_LEN] = [0x53, 0x50, 0x38, 0x30, 0x34, 0xE1, 0x1E, 0x77];

/// Components that carry a marker, in the order the gate checks them.
pub const MARKED_COMPONENTS: [Component; 3] = [
    Component::InterruptController,
    Component::Serial,
    Component::Timer,
];

/// Word offset of the component's slot inside the marker bank.
pub const fn marker_word_offset(component: Component) -> Option<usize> {
    match component {
        Component::InterruptController => Some(0),
        Component::Serial => Some(MARKER_WORDS),
        Component::Timer => Some(2 * MARKER_WORDS),
        Component::HardwareEnvironment => None,
    }
}

pub const fn expected_marker(component: Component) -> Option<&'static [u8; MARKER_LEN]> {
    match component {
        Component::InterruptController => Some(&PIC_MARKER),
        Component::Serial => Some(&UART_MARKER),
        Component::Timer => Some(&TIMER_MARKER),
        Component::HardwareEnvironment => None,
    }
}

/// Words needed to back every marker slot.
pub const MARKER_BANK_WORDS: usize = MARKED_COMPONENTS.len() * MARKER_WORDS;
