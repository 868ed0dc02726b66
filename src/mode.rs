//! Operating modes of the intersection and their serial codes.

use core::fmt;

/// Operating mode of the intersection.
///
/// Selected over the serial link with a single ASCII digit. Exactly one mode
/// is active at any time.
///
/// # Default
///
/// Defaults to [`Regular`](Self::Regular), which is also what runs before
/// any valid code has been received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Fixed red/yellow/green/yellow cycle.
    #[default]
    Regular,
    /// Buzzer and flashing yellow while someone is close to the crossing.
    Pedestrian,
    /// Sensor-driven green/red hold when it is dark.
    Night,
    /// Green until the crossing button is pressed, then a timed alarm.
    Manual,
}

impl Mode {
    /// All modes in code order.
    pub const ALL: [Mode; 4] = [Mode::Regular, Mode::Pedestrian, Mode::Night, Mode::Manual];

    /// Returns the serial byte that selects this mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_junction::Mode;
    ///
    /// assert_eq!(Mode::Regular.code(), b'1');
    /// assert_eq!(Mode::Manual.code(), 52);
    /// ```
    #[inline]
    pub const fn code(&self) -> u8 {
        match self {
            Mode::Regular => b'1',
            Mode::Pedestrian => b'2',
            Mode::Night => b'3',
            Mode::Manual => b'4',
        }
    }

    /// Decode a serial byte. Returns `None` for anything but `'1'..='4'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_junction::Mode;
    ///
    /// assert_eq!(Mode::from_code(b'2'), Some(Mode::Pedestrian));
    /// assert_eq!(Mode::from_code(b'3'), Some(Mode::Night));
    /// assert_eq!(Mode::from_code(b'0'), None);
    /// assert_eq!(Mode::from_code(b'\n'), None);
    /// ```
    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'1' => Some(Mode::Regular),
            b'2' => Some(Mode::Pedestrian),
            b'3' => Some(Mode::Night),
            b'4' => Some(Mode::Manual),
            _ => None,
        }
    }

    /// Returns the name printed on the status line.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Regular => "Regular",
            Mode::Pedestrian => "Pedestrian",
            Mode::Night => "Night",
            Mode::Manual => "Manual",
        }
    }

    /// Returns true for the only mode driven by the button interrupt.
    #[inline]
    pub const fn uses_button(&self) -> bool {
        matches!(self, Mode::Manual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
