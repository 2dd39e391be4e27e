//! Vibration feedback

/// Short buzz on pickup
pub const COLLECT_PATTERN: &[u32] = &[30];
/// Buzz-pause-buzz on crash
pub const CRASH_PATTERN: &[u32] = &[200, 100, 200];

/// Best-effort vibration; implementations ignore calls they cannot honour
pub trait HapticFeedback {
    /// Alternating on/off durations in milliseconds
    fn vibrate(&mut self, pattern: &[u32]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn vibrate(&mut self, _pattern: &[u32]) {}
}

/// `navigator.vibrate`, where the browser has it
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigatorHaptics;

#[cfg(target_arch = "wasm32")]
impl HapticFeedback for NavigatorHaptics {
    fn vibrate(&mut self, pattern: &[u32]) {
        let Some(window) = web_sys::window() else { return };
        let array: js_sys::Array = pattern
            .iter()
            .map(|&ms| wasm_bindgen::JsValue::from(ms))
            .collect();
        // Returns false when unsupported or blocked
        let _ = window.navigator().vibrate_with_pattern(&array);
    }
}
