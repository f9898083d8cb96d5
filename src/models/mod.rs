pub mod ean13;
pub mod scanline;

pub use ean13::{Digit, EAN13_DIGITS, Ean13, ParseEan13Error, ScanResult, Side};
pub use scanline::{DEFAULT_BLOCKS, Scanline};
