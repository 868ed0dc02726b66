//! Light and buzzer actuators.
//!
//! Both wrap a low-level output ([`DigitalOutput`] or [`ToneOutput`]) and
//! expose the common [`OutputDevice`] on/off capability. Each remembers the
//! last state it was commanded to so the controller and tests can observe
//! it without reading the hardware back.

use crate::traits::{DigitalOutput, OutputDevice, ToneOutput};

/// The three lamps of the signal head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Signal {
    /// Go.
    Green,
    /// Caution.
    Yellow,
    /// Stop.
    Red,
}

impl Signal {
    /// All lamps, top to bottom of a typical head.
    pub const ALL: [Signal; 3] = [Signal::Red, Signal::Yellow, Signal::Green];

    /// Returns the lamp name in lowercase.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Signal::Green => "green",
            Signal::Yellow => "yellow",
            Signal::Red => "red",
        }
    }
}

/// A lamp driven by one digital output (high = lit).
///
/// # Example
///
/// ```rust
/// use rs_junction::Light;
/// use rs_junction::hal::{Device, MockPin, Timeline};
/// use rs_junction::traits::OutputDevice;
///
/// let timeline = Timeline::new();
/// let mut green = Light::new(MockPin::new(Device::Green, &timeline));
///
/// green.on().unwrap();
/// assert!(green.is_on());
/// assert!(green.pin().is_high());
///
/// green.off().unwrap();
/// assert!(!green.pin().is_high());
/// ```
#[derive(Debug)]
pub struct Light<P: DigitalOutput> {
    pin: P,
    lit: bool,
}

impl<P: DigitalOutput> Light<P> {
    /// Wrap an output pin. The lamp is assumed dark until first commanded.
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    /// Borrow the underlying pin.
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: DigitalOutput> OutputDevice for Light<P> {
    type Error = P::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.pin.drive(true)?;
        self.lit = true;
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.pin.drive(false)?;
        self.lit = false;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.lit
    }
}

/// A passive buzzer driven by a tone generator.
///
/// # Example
///
/// ```rust
/// use rs_junction::Buzzer;
/// use rs_junction::hal::{MockTone, Timeline};
/// use rs_junction::traits::OutputDevice;
///
/// let timeline = Timeline::new();
/// let mut buzzer = Buzzer::new(MockTone::new(&timeline));
///
/// buzzer.on().unwrap();
/// assert!(buzzer.tone().is_sounding());
/// buzzer.off().unwrap();
/// assert!(!buzzer.is_on());
/// ```
#[derive(Debug)]
pub struct Buzzer<T: ToneOutput> {
    tone: T,
    sounding: bool,
}

impl<T: ToneOutput> Buzzer<T> {
    /// Wrap a tone generator. The buzzer is assumed silent until first commanded.
    pub fn new(tone: T) -> Self {
        Self {
            tone,
            sounding: false,
        }
    }

    /// Borrow the underlying tone generator.
    pub fn tone(&self) -> &T {
        &self.tone
    }

    /// Release the underlying tone generator.
    pub fn into_inner(self) -> T {
        self.tone
    }
}

impl<T: ToneOutput> OutputDevice for Buzzer<T> {
    type Error = T::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.tone.start_tone()?;
        self.sounding = true;
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.tone.stop_tone()?;
        self.sounding = false;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.sounding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyPin {
        fail: bool,
        level: bool,
    }

    impl DigitalOutput for FlakyPin {
        type Error = &'static str;

        fn drive(&mut self, high: bool) -> Result<(), Self::Error> {
            if self.fail {
                return Err("pin write failed");
            }
            self.level = high;
            Ok(())
        }
    }

    struct CountingTone {
        starts: usize,
        stops: usize,
    }

    impl ToneOutput for CountingTone {
        type Error = ();

        fn start_tone(&mut self) -> Result<(), ()> {
            self.starts += 1;
            Ok(())
        }

        fn stop_tone(&mut self) -> Result<(), ()> {
            self.stops += 1;
            Ok(())
        }
    }

    #[test]
    fn light_drives_pin() {
        let mut light = Light::new(FlakyPin {
            fail: false,
            level: false,
        });
        assert!(!light.is_on());

        light.on().unwrap();
        assert!(light.is_on());
        assert!(light.pin().level);

        light.off().unwrap();
        assert!(!light.is_on());
        assert!(!light.pin().level);
    }

    #[test]
    fn light_state_unchanged_on_pin_error() {
        let mut light = Light::new(FlakyPin {
            fail: true,
            level: false,
        });
        assert_eq!(light.on(), Err("pin write failed"));
        assert!(!light.is_on());
    }

    #[test]
    fn buzzer_starts_and_stops_tone() {
        let mut buzzer = Buzzer::new(CountingTone { starts: 0, stops: 0 });
        buzzer.on().unwrap();
        assert!(buzzer.is_on());
        buzzer.off().unwrap();
        buzzer.off().unwrap();
        assert!(!buzzer.is_on());

        let tone = buzzer.into_inner();
        assert_eq!(tone.starts, 1);
        assert_eq!(tone.stops, 2);
    }

    #[test]
    fn signal_names() {
        assert_eq!(Signal::Green.as_str(), "green");
        assert_eq!(Signal::Yellow.as_str(), "yellow");
        assert_eq!(Signal::Red.as_str(), "red");
        assert_eq!(Signal::ALL.len(), 3);
    }
}
