// ── State projection ──
//
// Pure readings derived from a device's raw fields. `None` means the
// device did not report enough to decide; it never stands in for `false`.

use super::device::Device;

const COVER_OPEN_THRESHOLD: i64 = 95;
const COVER_CLOSED_THRESHOLD: i64 = 5;

const BATTERY_LOW: &str = "battery-low";

impl Device {
    /// Contact sensor reading: `"open"` is true, `"closed"` is false.
    pub fn contact(&self) -> Option<bool> {
        match self.state.contact.as_deref()? {
            "open" => Some(true),
            "closed" => Some(false),
            _ => None,
        }
    }

    /// General on/off reading: `"on"` is true, `"off"` is false.
    pub fn general(&self) -> Option<bool> {
        match self.state.general.as_deref()? {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        }
    }

    /// Binary sensor reading. Doors and windows report through the
    /// contact field, every other sensor through the general field.
    pub fn binary_state(&self) -> Option<bool> {
        match self.subtype.as_deref() {
            Some("door" | "window") => self.contact(),
            _ => self.general(),
        }
    }

    pub fn is_on(&self) -> Option<bool> {
        self.general()
    }

    /// Whether a cover is fully open.
    ///
    /// The general direction wins; the position is only consulted when
    /// the direction is missing or unrecognized.
    pub fn cover_is_open(&self) -> Option<bool> {
        match self.state.general.as_deref() {
            Some("up") => Some(true),
            Some("down") => Some(false),
            _ => self.position.map(|p| p >= COVER_OPEN_THRESHOLD),
        }
    }

    /// Whether a cover is fully closed.
    pub fn cover_is_closed(&self) -> Option<bool> {
        match self.state.general.as_deref() {
            Some("down") => Some(true),
            Some("up") => Some(false),
            _ => self.position.map(|p| p <= COVER_CLOSED_THRESHOLD),
        }
    }

    /// Cover position in 0..=100. Inferred from the direction when the
    /// device reports no position.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn cover_position(&self) -> Option<u8> {
        if let Some(position) = self.position {
            return Some(position.clamp(0, 100) as u8);
        }
        match self.state.general.as_deref()? {
            "down" => Some(0),
            "up" => Some(100),
            _ => None,
        }
    }

    /// Brightness on the 0..=255 presentation scale.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn brightness(&self) -> Option<u8> {
        let level = self.state.brightness?.clamp(0, 100) as u8;
        Some(brightness_to_presentation(level))
    }

    pub fn battery_low(&self) -> Option<bool> {
        self.state.battery_flag.as_deref().map(|flag| flag == BATTERY_LOW)
    }

    pub fn battery_level(&self) -> Option<i64> {
        self.state.battery_percentage
    }
}

/// Rescale a device level (0..=100) to the presentation scale (0..=255).
/// Values above 100 are treated as 100.
pub fn brightness_to_presentation(level: u8) -> u8 {
    rescale(level.min(100), 255, 100)
}

/// Rescale a presentation level (0..=255) to the device scale (0..=100).
pub fn brightness_to_device(level: u8) -> u8 {
    rescale(level, 100, 255)
}

/// `value * num / den`, rounded to nearest with ties to even.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn rescale(value: u8, num: u32, den: u32) -> u8 {
    let scaled = u32::from(value) * num;
    let (quotient, remainder) = (scaled / den, scaled % den);
    let rounded = match (remainder * 2).cmp(&den) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
        std::cmp::Ordering::Less => quotient,
    };
    rounded.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, DeviceState};
    use serde_json::Map;

    fn device(subtype: &str) -> Device {
        Device {
            id: DeviceId::from("d1"),
            subtype: Some(subtype.into()),
            name: None,
            model: None,
            firmware_version: None,
            position: None,
            capabilities: Vec::new(),
            state: DeviceState::default(),
            attributes: Map::new(),
        }
    }

    fn cover(general: Option<&str>, position: Option<i64>) -> Device {
        let mut d = device("shutter");
        d.state.general = general.map(Into::into);
        d.position = position;
        d
    }

    // ── Contact and general ─────────────────────────────────────────

    #[test]
    fn contact_reading() {
        let mut d = device("door");
        assert_eq!(d.contact(), None);
        d.state.contact = Some("open".into());
        assert_eq!(d.contact(), Some(true));
        d.state.contact = Some("closed".into());
        assert_eq!(d.contact(), Some(false));
        d.state.contact = Some("ajar".into());
        assert_eq!(d.contact(), None);
    }

    #[test]
    fn general_reading() {
        let mut d = device("socket");
        assert_eq!(d.general(), None);
        d.state.general = Some("on".into());
        assert_eq!(d.is_on(), Some(true));
        d.state.general = Some("off".into());
        assert_eq!(d.is_on(), Some(false));
        d.state.general = Some("standby".into());
        assert_eq!(d.is_on(), None);
    }

    #[test]
    fn binary_state_picks_field_by_subtype() {
        let mut window = device("window");
        window.state.general = Some("on".into());
        window.state.contact = Some("closed".into());
        assert_eq!(window.binary_state(), Some(false));

        let mut motion = device("motiondetector");
        motion.state.general = Some("on".into());
        motion.state.contact = Some("closed".into());
        assert_eq!(motion.binary_state(), Some(true));
    }

    // ── Covers ──────────────────────────────────────────────────────

    #[test]
    fn direction_decides_open_and_closed() {
        let down = cover(Some("down"), Some(100));
        assert_eq!(down.cover_is_closed(), Some(true));
        assert_eq!(down.cover_is_open(), Some(false));

        let up = cover(Some("up"), Some(0));
        assert_eq!(up.cover_is_closed(), Some(false));
        assert_eq!(up.cover_is_open(), Some(true));
    }

    #[test]
    fn position_thresholds_without_direction() {
        assert_eq!(cover(None, Some(5)).cover_is_closed(), Some(true));
        assert_eq!(cover(None, Some(6)).cover_is_closed(), Some(false));
        assert_eq!(cover(None, Some(95)).cover_is_open(), Some(true));
        assert_eq!(cover(None, Some(94)).cover_is_open(), Some(false));
        assert_eq!(cover(Some("moving"), Some(50)).cover_is_open(), Some(false));
        assert_eq!(cover(None, None).cover_is_open(), None);
        assert_eq!(cover(None, None).cover_is_closed(), None);
    }

    #[test]
    fn position_is_clamped() {
        assert_eq!(cover(None, Some(150)).cover_position(), Some(100));
        assert_eq!(cover(None, Some(-10)).cover_position(), Some(0));
        assert_eq!(cover(None, Some(42)).cover_position(), Some(42));
    }

    #[test]
    fn position_inferred_from_direction() {
        assert_eq!(cover(Some("down"), None).cover_position(), Some(0));
        assert_eq!(cover(Some("up"), None).cover_position(), Some(100));
        assert_eq!(cover(Some("stop"), None).cover_position(), None);
        assert_eq!(cover(None, None).cover_position(), None);
    }

    // ── Brightness ──────────────────────────────────────────────────

    #[test]
    fn brightness_scale_endpoints() {
        assert_eq!(brightness_to_presentation(100), 255);
        assert_eq!(brightness_to_device(255), 100);
        assert_eq!(brightness_to_presentation(0), 0);
        assert_eq!(brightness_to_device(0), 0);
    }

    #[test]
    fn brightness_round_trip_is_close() {
        assert_eq!(brightness_to_presentation(50), 128);
        assert_eq!(brightness_to_device(128), 50);
        for level in 0..=100u8 {
            let back = brightness_to_device(brightness_to_presentation(level));
            assert!(back.abs_diff(level) <= 1, "{level} came back as {back}");
        }
    }

    #[test]
    fn brightness_rounds_ties_to_even() {
        // 10 * 255 / 100 = 25.5 -> 26; 30 * 255 / 100 = 76.5 -> 76
        assert_eq!(brightness_to_presentation(10), 26);
        assert_eq!(brightness_to_presentation(30), 76);
    }

    #[test]
    fn device_brightness_projection() {
        let mut light = device("light");
        assert_eq!(light.brightness(), None);
        light.state.brightness = Some(100);
        assert_eq!(light.brightness(), Some(255));
        light.state.brightness = Some(250);
        assert_eq!(light.brightness(), Some(255));
    }

    // ── Battery ─────────────────────────────────────────────────────

    #[test]
    fn battery_attributes() {
        let mut sensor = device("smokedetector");
        assert_eq!(sensor.battery_low(), None);
        assert_eq!(sensor.battery_level(), None);

        sensor.state.battery_flag = Some("battery-low".into());
        sensor.state.battery_percentage = Some(12);
        assert_eq!(sensor.battery_low(), Some(true));
        assert_eq!(sensor.battery_level(), Some(12));

        sensor.state.battery_flag = Some("battery-ok".into());
        assert_eq!(sensor.battery_low(), Some(false));
    }
}
