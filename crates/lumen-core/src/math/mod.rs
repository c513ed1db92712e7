// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Numeric primitives shared by the codec.
//!
//! The wire carries numbers as `f64` while nodes store them as `f32`. The
//! [`narrow`] and [`widen`] pair is the only place where that conversion happens,
//! so every variant gets the same precision and range behavior.

// Re-export the constants the light family documents its defaults with.
pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

// --- Declare Sub-Modules ---

pub mod color;

// --- Re-export Principal Types ---

pub use self::color::LinearRgba;

// --- Utility Functions ---

/// Narrows a wire number to single precision.
///
/// Fails when the value is not finite or does not fit in an `f32`.
///
/// # Examples
///
/// ```
/// use lumen_core::math::narrow;
/// assert_eq!(narrow(2.5), Ok(2.5_f32));
/// assert!(narrow(1e300).is_err());
/// ```
pub fn narrow(value: f64) -> Result<f32, &'static str> {
    if !value.is_finite() {
        return Err("not a finite number");
    }
    let narrowed = value as f32;
    if narrowed.is_finite() {
        Ok(narrowed)
    } else {
        Err("out of single-precision range")
    }
}

/// Widens a stored `f32` to a wire number.
///
/// Goes through the shortest decimal that round-trips the `f32`, so `0.2_f32`
/// becomes `0.2` rather than `0.20000000298023224`. Narrowing the result gives
/// back the original value bit for bit.
pub fn widen(value: f32) -> f64 {
    if !value.is_finite() {
        return f64::from(value);
    }
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}
