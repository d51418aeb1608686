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
use chrono::{DateTime, NaiveDateTime};

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;
/// Seconds from 0001-01-01T00:00:00 to the Unix epoch.
const UNIX_EPOCH_SECONDS: i64 = 62_135_596_800;
/// The top two bits of a stored DateTime carry a kind marker and are ignored.
const TICKS_MASK: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Ticks of 9999-12-31T23:59:59.9999999, the last representable instant.
const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Converts to 100-nanosecond ticks since 0001-01-01T00:00:00.
///
/// Only years 1 through 9999 are representable.
pub fn to_ticks(value: &NaiveDateTime) -> Result<i64, Error> {
    let dt = value.and_utc();
    let ticks = dt
        .timestamp()
        .checked_add(UNIX_EPOCH_SECONDS)
        .and_then(|secs| secs.checked_mul(TICKS_PER_SECOND))
        .and_then(|ticks| ticks.checked_add(dt.timestamp_subsec_nanos() as i64 / NANOS_PER_TICK))
        .filter(|ticks| (0..=MAX_TICKS).contains(ticks));
    ticks.ok_or_else(|| Error::type_constraint(format!("date time {} is out of range", value)))
}

pub fn from_ticks(ticks: i64) -> Result<NaiveDateTime, Error> {
    let ticks = ticks & TICKS_MASK;
    let secs = ticks.div_euclid(TICKS_PER_SECOND) - UNIX_EPOCH_SECONDS;
    let nanos = ticks.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    DateTime::from_timestamp(secs, nanos as u32)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| Error::invalid_row(format!("date time ticks {} out of range", ticks)))
}

impl<'a> LayoutCodec<'a> for NaiveDateTime {
    const LAYOUT_TYPE: LayoutType = LayoutType::DateTime;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_i64(to_ticks(self)?);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        from_ticks(reader.read_i64()?)
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnixDateTime(pub i64);

impl UnixDateTime {
    pub fn milliseconds(self) -> i64 {
        self.0
    }
}

impl<'a> LayoutCodec<'a> for UnixDateTime {
    const LAYOUT_TYPE: LayoutType = LayoutType::UnixDateTime;

    fn encode(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_i64(self.0);
        Ok(())
    }

    fn decode(reader: &mut Reader<'a>) -> Result<Self, Error> {
        Ok(UnixDateTime(reader.read_i64()?))
    }
}
