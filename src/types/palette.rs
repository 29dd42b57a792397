use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_COLORS: [&str; 8] = [
    "#FF3366", "#0099DD", "#4CD964", "#FF9933", "#8E2DE2", "#00EABD", "#FEB47B", "#FF0080",
];

/// Fixed set of track colors handed out in import order.
#[derive(Debug)]
pub struct Palette {
    colors: Vec<String>,
    next: AtomicUsize,
}

impl Palette {
    /// Builds a palette from `#RRGGBB` strings, dropping malformed entries.
    /// Falls back to the default colors if nothing usable is left.
    pub fn new<S: AsRef<str>>(colors: &[S]) -> Self {
        let mut colors: Vec<String> = colors
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| parse_hex_color(c).is_some())
            .map(|c| c.to_uppercase())
            .collect();
        if colors.is_empty() {
            colors = DEFAULT_COLORS.iter().map(|c| c.to_string()).collect();
        }
        Self {
            colors,
            next: AtomicUsize::new(0),
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn next_color(&self) -> String {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.colors[idx % self.colors.len()].clone()
    }

    pub fn reset(&self) {
        self.next.store(0, Ordering::Relaxed);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.as_slice())
    }
}

pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let value = hex.strip_prefix('#')?;
    if value.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&value[0..2], 16).ok()?;
    let g = u8::from_str_radix(&value[2..4], 16).ok()?;
    let b = u8::from_str_radix(&value[4..6], 16).ok()?;
    Some((r, g, b))
}
