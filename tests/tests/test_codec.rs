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

use chrono::NaiveDate;
use hybridrow::codec::{
    from_bytes, to_bytes, Decimal, Float128, MongoDbObjectId, UnixDateTime, VarInt, VarUInt,
};
use hybridrow::ResultCode;
use rand::Rng;
use uuid::Uuid;

#[test]
fn fixed_widths() {
    assert_eq!(to_bytes(&7i8).unwrap().len(), 1);
    assert_eq!(to_bytes(&7u16).unwrap().len(), 2);
    assert_eq!(to_bytes(&7i32).unwrap().len(), 4);
    assert_eq!(to_bytes(&7u64).unwrap().len(), 8);
    assert_eq!(to_bytes(&1.5f32).unwrap().len(), 4);
    assert_eq!(to_bytes(&Decimal::from(1i64)).unwrap().len(), 16);
    assert_eq!(to_bytes(&Float128::new(1, 2)).unwrap().len(), 16);
    assert_eq!(to_bytes(&Uuid::nil()).unwrap().len(), 16);
    assert_eq!(to_bytes(&UnixDateTime(0)).unwrap().len(), 8);
    assert_eq!(to_bytes(&MongoDbObjectId::default()).unwrap().len(), 12);
}

#[test]
fn little_endian_integers() {
    assert_eq!(to_bytes(&0x0102_0304i32).unwrap(), [4, 3, 2, 1]);
    assert_eq!(to_bytes(&-2i16).unwrap(), [0xfe, 0xff]);
    assert_eq!(from_bytes::<u32>(&[0x78, 0x56, 0x34, 0x12]).unwrap(), 0x1234_5678);
}

#[test]
fn random_numbers() {
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let i: i64 = rng.gen();
        assert_eq!(from_bytes::<i64>(&to_bytes(&i).unwrap()).unwrap(), i);
        let u: u32 = rng.gen();
        assert_eq!(from_bytes::<u32>(&to_bytes(&u).unwrap()).unwrap(), u);
        let f: f64 = rng.gen();
        assert_eq!(from_bytes::<f64>(&to_bytes(&f).unwrap()).unwrap(), f);
        let v: i64 = rng.gen();
        let bytes = to_bytes(&VarInt(v)).unwrap();
        assert_eq!(from_bytes::<VarInt>(&bytes).unwrap(), VarInt(v));
    }
}

#[test]
fn varints() {
    assert_eq!(to_bytes(&VarUInt(0)).unwrap(), [0]);
    assert_eq!(to_bytes(&VarUInt(300)).unwrap(), [0xac, 0x02]);
    // zigzag
    assert_eq!(to_bytes(&VarInt(-1)).unwrap(), [1]);
    assert_eq!(to_bytes(&VarInt(1)).unwrap(), [2]);
    assert_eq!(to_bytes(&VarUInt(u64::MAX)).unwrap().len(), 10);
    let err = from_bytes::<VarUInt>(&[0x80, 0x80]).unwrap_err();
    assert_eq!(err.code(), ResultCode::TooFewBytes);
}

#[test]
fn decimal_layout() {
    let mut bytes = vec![0, 0, 0, 0x80];
    bytes.extend_from_slice(&[0xff; 12]);
    let min: Decimal = from_bytes(&bytes).unwrap();
    assert_eq!(min, Decimal::MIN);
    assert_eq!(min.to_string(), "-79228162514264337593543950335");
    assert_eq!(to_bytes(&min).unwrap(), bytes);

    let d: Decimal = "1234.5678".parse().unwrap();
    let bytes = to_bytes(&d).unwrap();
    assert_eq!(from_bytes::<Decimal>(&bytes).unwrap().to_string(), "1234.5678");
}

#[test]
fn guid_mixed_endian() {
    let bytes = [
        0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    let id: Uuid = from_bytes(&bytes).unwrap();
    assert_eq!(id.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
    assert_eq!(to_bytes(&id).unwrap(), bytes);
}

#[test]
fn date_times() {
    let moment = NaiveDate::from_ymd_opt(2001, 9, 9)
        .unwrap()
        .and_hms_micro_opt(1, 46, 40, 123_456)
        .unwrap();
    let bytes = to_bytes(&moment).unwrap();
    assert_eq!(from_bytes::<chrono::NaiveDateTime>(&bytes).unwrap(), moment);
    let unix = UnixDateTime(1_000_000_000_123);
    let bytes = to_bytes(&unix).unwrap();
    assert_eq!(bytes, 1_000_000_000_123i64.to_le_bytes());
    assert_eq!(
        from_bytes::<UnixDateTime>(&bytes).unwrap().milliseconds(),
        1_000_000_000_123
    );
}

#[test]
fn date_time_outside_ticks_range() {
    let far = NaiveDate::from_ymd_opt(100_000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let err = to_bytes(&far).unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
    let ancient = NaiveDate::from_ymd_opt(-1, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(to_bytes(&ancient).unwrap_err().code(), ResultCode::TypeConstraint);
}

#[test]
fn strings_and_binary() {
    assert_eq!(to_bytes(&"abc").unwrap(), [3, b'a', b'b', b'c']);
    assert_eq!(to_bytes(&"").unwrap(), [0]);
    let long = "x".repeat(200);
    let bytes = to_bytes(&long.as_str()).unwrap();
    assert_eq!(&bytes[..2], [0xc8, 0x01]);
    assert_eq!(from_bytes::<&str>(&bytes).unwrap(), long);
    assert_eq!(from_bytes::<String>(&bytes).unwrap(), long);

    let blob: &[u8] = &[0, 1, 2, 255];
    assert_eq!(from_bytes::<Vec<u8>>(&to_bytes(&blob).unwrap()).unwrap(), blob);

    let err = from_bytes::<&str>(&[2, 0xc3, 0x28]).unwrap_err();
    assert_eq!(err.code(), ResultCode::InvalidRow);
    let err = from_bytes::<&str>(&[5, b'a']).unwrap_err();
    assert_eq!(err.code(), ResultCode::TooFewBytes);
}

#[test]
fn small_types() {
    assert_eq!(to_bytes(&true).unwrap(), [1]);
    assert_eq!(to_bytes(&false).unwrap(), [0]);
    let oid = MongoDbObjectId([0xab; 12]);
    assert_eq!(from_bytes::<MongoDbObjectId>(&to_bytes(&oid).unwrap()).unwrap(), oid);
    let f = Float128::new(-3, 9);
    assert_eq!(from_bytes::<Float128>(&to_bytes(&f).unwrap()).unwrap(), f);
}
