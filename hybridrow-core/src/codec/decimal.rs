// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::buffer::{Reader, Writer};
use crate::codec::LayoutCodec;
use crate::error::Error;
use crate::layout::LayoutType;
use std::fmt;
use std::str::FromStr;

const SIGN_MASK: u32 = 0x8000_0000;
const SCALE_SHIFT: u32 = 16;
const MAX_SCALE: u8 = 28;
const MAX_MANTISSA: u128 = (1 << 96) - 1;

/// 128-bit decimal floating point: a 96-bit unsigned mantissa, a sign and a
/// power-of-ten scale between 0 and 28.
///
/// Stored as four little-endian 32-bit words: flags, hi, lo, mid. Equality
/// compares the stored words, so `1.0` and `1.00` are distinct values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
    flags: u32,
    hi: u32,
    lo: u32,
    mid: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        flags: 0,
        hi: 0,
        lo: 0,
        mid: 0,
    };
    pub const MAX: Decimal = Decimal {
        flags: 0,
        hi: u32::MAX,
        lo: u32::MAX,
        mid: u32::MAX,
    };
    pub const MIN: Decimal = Decimal {
        flags: SIGN_MASK,
        hi: u32::MAX,
        lo: u32::MAX,
        mid: u32::MAX,
    };

    pub fn from_parts(lo: u32, mid: u32, hi: u32, negative: bool, scale: u8) -> Result<Self, Error> {
        if scale > MAX_SCALE {
            return Err(Error::type_constraint(format!(
                "decimal scale {} exceeds {}",
                scale, MAX_SCALE
            )));
        }
        let mut flags = (scale as u32) << SCALE_SHIFT;
        if negative {
            flags |= SIGN_MASK;
        }
        Ok(Decimal { flags, hi, lo, mid })
    }

    /// Builds a decimal from a signed mantissa and scale, e.g. `(-12345, 2)` is `-123.45`.
    pub fn new(mantissa: i128, scale: u8) -> Result<Self, Error> {
        let magnitude = mantissa.unsigned_abs();
        if magnitude > MAX_MANTISSA {
            return Err(Error::type_constraint(
                "decimal mantissa exceeds 96 bits",
            ));
        }
        Decimal::from_parts(
            magnitude as u32,
            (magnitude >> 32) as u32,
            (magnitude >> 64) as u32,
            mantissa < 0,
            scale,
        )
    }

    pub fn mantissa(&self) -> u128 {
        ((self.hi as u128) << 64) | ((self.mid as u128) << 32) | self.lo as u128
    }

    pub fn scale(&self) -> u8 {
        ((self.flags >> SCALE_SHIFT) & 0xff) as u8
    }

    pub fn is_negative(&self) -> bool {
        self.flags & SIGN_MASK != 0
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        let magnitude = value.unsigned_abs();
        Decimal {
            flags: if value < 0 { SIGN_MASK } else { 0 },
            hi: 0,
            lo: magnitude as u32,
            mid: (magnitude >> 32) as u32,
        }
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal {
            flags: 0,
            hi: 0,
            lo: value as u32,
            mid: (value >> 32) as u32,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mantissa = self.mantissa();
        let scale = self.scale() as usize;
        let mut digits = mantissa.to_string();
        if digits.len() <= scale {
            digits = format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits);
        }
        if mantissa != 0 && self.is_negative() {
            write!(f, "-")?;
        }
        if scale == 0 {
            return write!(f, "{}", digits);
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::type_mismatch(format!("invalid decimal literal {:?}", s));
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > MAX_SCALE as usize {
            return Err(invalid());
        }
        let mut mantissa: u128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let d = c.to_digit(10).ok_or_else(invalid)?;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(d as u128))
                .filter(|m| *m <= MAX_MANTISSA)
                .ok_or_else(invalid)?;
        }
        Decimal::from_parts(
            mantissa as u32,
            (mantissa >> 32) as u32,
            (mantissa >> 64) as u32,
            negative,
            frac_part.len() as u8,
        )
    }
}

impl<'a> LayoutCodec<'a> for Decimal {
    const LAYOUT_TYPE: LayoutType = LayoutType::Decimal;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_u32(self.flags);
        writer.write_u32(self.hi);
        writer.write_u32(self.lo);
        writer.write_u32(self.mid);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(Decimal {
            flags: reader.read_u32()?,
            hi: reader.read_u32()?,
            lo: reader.read_u32()?,
            mid: reader.read_u32()?,
        })
    }
}
