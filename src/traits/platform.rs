//! Platform bundle tying the device types of one board together.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use super::hardware::{DistanceSensor, LightSensor, OutputDevice, PushButton, SerialPort};

/// The set of concrete device types a board provides.
///
/// All devices share a single error type so that handlers and the
/// [`ModeController`](crate::ModeController) can propagate failures with `?`.
/// Implement this on a zero-sized marker type.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_junction::traits::Platform;
///
/// pub struct MyBoard;
///
/// impl Platform for MyBoard {
///     type Error = MyPinError;
///     type Light = Light<MyPin>;
///     type Buzzer = Buzzer<MyPwm>;
///     type Distance = Ultrasonic<MyEcho, MyDelay, MyClock>;
///     type Ambient = Photoresistor<MyAdc>;
///     type Serial = MyUart;
///     type Button = MyButton;
///     type Delay = MyDelay;
/// }
/// ```
pub trait Platform {
    /// Error type shared by every device on the board.
    type Error: Debug;
    /// Traffic light output (green, yellow and red use the same type).
    type Light: OutputDevice<Error = Self::Error>;
    /// Buzzer output.
    type Buzzer: OutputDevice<Error = Self::Error>;
    /// Distance sensor.
    type Distance: DistanceSensor<Error = Self::Error>;
    /// Ambient light sensor.
    type Ambient: LightSensor<Error = Self::Error>;
    /// Serial link for mode codes and status lines.
    type Serial: SerialPort<Error = Self::Error>;
    /// Manual crossing button.
    type Button: PushButton<Error = Self::Error>;
    /// Blocking delay used by the mode handlers.
    type Delay: DelayNs;
}
