//! Mockup structural extraction
//!
//! Turns freeform diagram markup into a [`ScreenDetectionResult`]: how many device
//! frames were drawn and which screens, fields, buttons and radio groups they hold.

pub mod detector;
pub mod families;
pub mod markup;
pub mod model;
pub mod radio;

pub use detector::detect_screens;
pub use families::{RadioVocabulary, ScreenFamily, FAMILIES};
pub use model::{RadioGroup, RadioOption, ScreenDetectionResult, ScreenSection};
