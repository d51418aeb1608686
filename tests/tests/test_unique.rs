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


use hybridrow::codec::{to_bytes, LayoutCodec};
use hybridrow::layout::{LayoutType, TypeArgument};
use hybridrow::{
    Error, HybridRowVersion, ResultCode, RowBuffer, RowCursor, RowWriter, UpdateOptions,
};
use rand::seq::SliceRandom;
use test_helpers::{new_row, resolver};
use uuid::Uuid;

fn int32() -> TypeArgument {
    TypeArgument::of(LayoutType::Int32)
}

fn utf8() -> TypeArgument {
    TypeArgument::of(LayoutType::Utf8)
}

fn write_set(row: &mut RowBuffer, values: &[i32]) -> Result<(), Error> {
    let set = TypeArgument::typed_set(int32());
    RowWriter::write_buffer(row, (), |w, _, _| {
        w.write_scope("ids", &set, (), |w, _, _| {
            for v in values {
                w.write_int32("", *v)?;
            }
            Ok(())
        })
    })
}

fn set_values(row: &RowBuffer, path: &str) -> Vec<i32> {
    let mut root = RowCursor::root(row).unwrap();
    assert!(root.find(row, path).unwrap());
    let mut set = row.read_scope(&root).unwrap();
    let mut values = Vec::new();
    while set.move_next(row).unwrap() {
        values.push(row.read_sparse::<i32>(&set).unwrap());
    }
    assert_eq!(values.len(), set.count());
    values
}

/// Cursor over the set at `path`, as a caller editing the row would get it.
fn open(row: &RowBuffer, path: &str) -> RowCursor {
    let mut root = RowCursor::root(row).unwrap();
    assert!(root.find(row, path).unwrap());
    row.read_scope(&root).unwrap()
}

fn stage<'v, T: LayoutCodec<'v>>(row: &mut RowBuffer, value: &T) -> RowCursor {
    let mut staging = RowCursor::root(row).unwrap();
    staging.find(row, "staging").unwrap();
    row.write_sparse(&mut staging, value, UpdateOptions::Upsert)
        .unwrap();
    staging
}

#[test]
fn writer_sorts_set_elements() {
    let mut row = new_row();
    write_set(&mut row, &[5, 1, 3]).unwrap();
    assert_eq!(set_values(&row, "ids"), [1, 3, 5]);
}

#[test]
fn move_field_policies() {
    let mut row = new_row();
    write_set(&mut row, &[5, 1, 3]).unwrap();
    let len = row.len();

    let mut set = open(&row, "ids");
    let mut source = stage(&mut row, &4i32);
    row.move_field(&mut set, &mut source, UpdateOptions::Insert)
        .unwrap();
    assert!(!source.exists());
    assert_eq!(set_values(&row, "ids"), [1, 3, 4, 5]);
    assert_eq!(row.len(), len + 4);

    let mut source = stage(&mut row, &3i32);
    let err = row
        .move_field(&mut set, &mut source, UpdateOptions::Insert)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::Exists);
    // a failed move leaves the source in place
    assert_eq!(row.read_sparse::<i32>(&source).unwrap(), 3);
    row.move_field(&mut set, &mut source, UpdateOptions::Upsert)
        .unwrap();
    assert_eq!(set_values(&row, "ids"), [1, 3, 4, 5]);

    let mut source = stage(&mut row, &9i32);
    let err = row
        .move_field(&mut set, &mut source, UpdateOptions::Update)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::NotFound);
    let err = row
        .move_field(&mut set, &mut source, UpdateOptions::InsertAt)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
    row.move_field(&mut set, &mut source, UpdateOptions::Upsert)
        .unwrap();
    assert_eq!(set_values(&row, "ids"), [1, 3, 4, 5, 9]);
    assert_eq!(row.len(), len + 8);

    let mut source = stage(&mut row, &"nine");
    let err = row
        .move_field(&mut set, &mut source, UpdateOptions::Upsert)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
}

#[test]
fn source_before_the_set() {
    let mut row = new_row();
    let set = TypeArgument::typed_set(int32());
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_int32("early", 2)?;
        w.write_scope("ids", &set, (), |w, _, _| {
            w.write_int32("", 3)?;
            w.write_int32("", 1)
        })
    })
    .unwrap();

    let mut set = open(&row, "ids");
    let mut source = RowCursor::root(&row).unwrap();
    assert!(source.find(&row, "early").unwrap());
    row.move_field(&mut set, &mut source, UpdateOptions::Insert)
        .unwrap();
    assert_eq!(set_values(&row, "ids"), [1, 2, 3]);

    // the destination cursor followed the shift
    let found = row.find_unique_value(&set, &3i32).unwrap();
    assert_eq!(found.index(), 2);
    assert_eq!(row.read_sparse::<i32>(&found).unwrap(), 3);
}

#[test]
fn elements_are_not_written_directly() {
    let mut row = new_row();
    write_set(&mut row, &[1, 2]).unwrap();
    let mut set = open(&row, "ids");
    assert!(!set.is_immutable());
    let err = row
        .write_sparse(&mut set, &7i32, UpdateOptions::Upsert)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::InsufficientPermissions);
    let err = row
        .write_sparse(&mut set, &7i32, UpdateOptions::InsertAt)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
    assert!(set.move_next(&row).unwrap());
    let err = row.delete_sparse(&mut set).unwrap_err();
    assert_eq!(err.code(), ResultCode::InsufficientPermissions);
}

#[test]
fn find_in_sets() {
    let mut row = new_row();
    write_set(&mut row, &[10, 20, 30]).unwrap();
    let set = open(&row, "ids");
    assert_eq!(row.find_unique_value(&set, &20i32).unwrap().index(), 1);
    let err = row.find_unique_value(&set, &25i32).unwrap_err();
    assert_eq!(err.code(), ResultCode::NotFound);

    let pattern = stage(&mut row, &30i32);
    let set = open(&row, "ids");
    let found = row.find_unique(&set, &pattern).unwrap();
    assert_eq!(found.index(), 2);

    let root = RowCursor::root(&row).unwrap();
    let err = row.find_unique_value(&root, &1i32).unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
}

#[test]
fn boolean_sets_compare_untagged() {
    let mut row = new_row();
    let set = TypeArgument::typed_set(TypeArgument::of(LayoutType::Boolean));
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("flags", &set, (), |w, _, _| {
            w.write_bool("", true)?;
            w.write_bool("", false)
        })
    })
    .unwrap();
    // staged as a tagged cell with no payload
    let pattern = stage(&mut row, &true);
    let set = open(&row, "flags");
    let found = row.find_unique(&set, &pattern).unwrap();
    assert_eq!(found.index(), 1);
    assert!(row.read_sparse::<bool>(&found).unwrap());
}

#[test]
fn guid_sets_follow_byte_order() {
    let mut rng = rand::thread_rng();
    let mut ids: Vec<Uuid> = (0..16u128)
        .map(|i| Uuid::from_u128(i.wrapping_mul(0x9e37_79b9_7f4a_7c15_f39c_c060_5ced_c835)))
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_by_key(|id| to_bytes(id).unwrap());

    for _ in 0..4 {
        ids.shuffle(&mut rng);
        let mut row = new_row();
        let set = TypeArgument::typed_set(TypeArgument::of(LayoutType::Guid));
        RowWriter::write_buffer(&mut row, (), |w, _, _| {
            w.write_scope("ids", &set, (), |w, _, _| {
                for id in &ids {
                    w.write_guid("", *id)?;
                }
                Ok(())
            })
        })
        .unwrap();

        let scope = open(&row, "ids");
        for (index, id) in sorted.iter().enumerate() {
            let found = row.find_unique_value(&scope, id).unwrap();
            assert_eq!(found.index(), index);
            assert_eq!(row.read_sparse::<Uuid>(&found).unwrap(), *id);
        }
    }
}

#[test]
fn map_entries_replace_by_key() {
    let mut row = new_row();
    let map = TypeArgument::typed_map(utf8(), int32());
    let entry = TypeArgument::typed_tuple(vec![utf8(), int32()]);
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("genres", &map, (), |w, _, _| {
            w.write_scope("", &entry, (), |w, _, _| {
                w.write_string("", "soul")?;
                w.write_int32("", 1)
            })
        })
    })
    .unwrap();

    let mut staging = RowCursor::root(&row).unwrap();
    staging.find(&row, "staging").unwrap();
    let mut pair = row
        .write_scope(&mut staging, &entry, UpdateOptions::Upsert)
        .unwrap();
    row.write_sparse(&mut pair, &"soul", UpdateOptions::Update)
        .unwrap();
    pair.move_next(&row).unwrap();
    row.write_sparse(&mut pair, &7i32, UpdateOptions::Update)
        .unwrap();

    let mut genres = open(&row, "genres");
    let err = row
        .move_field(&mut genres, &mut staging, UpdateOptions::Insert)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::Exists);
    row.move_field(&mut genres, &mut staging, UpdateOptions::Upsert)
        .unwrap();
    assert_eq!(genres.count(), 1);

    let found = row.find_unique_value(&genres, &"soul").unwrap();
    let mut value = row.read_scope(&found).unwrap();
    assert!(value.is_immutable());
    assert!(value.move_next(&row).unwrap());
    assert_eq!(row.read_sparse::<&str>(&value).unwrap(), "soul");
    assert!(value.move_next(&row).unwrap());
    assert_eq!(row.read_sparse::<i32>(&value).unwrap(), 7);
    let err = row
        .write_sparse(&mut value, &8i32, UpdateOptions::Update)
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::InsufficientPermissions);
}

#[test]
fn truncated_set_fails_with_too_few_bytes() {
    let mut row = new_row();
    let set = TypeArgument::typed_set(TypeArgument::of(LayoutType::Int64));
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("ids", &set, (), |w, _, _| {
            w.write_int64("", 9)?;
            w.write_int64("", 5)
        })
    })
    .unwrap();
    let bytes = row.to_bytes();
    let (_, resolver) = resolver();
    let mut truncated = RowBuffer::new(bytes.len());
    truncated
        .read_from(&bytes[..bytes.len() - 3], HybridRowVersion::V1, resolver)
        .unwrap();

    let scope = open(&truncated, "ids");
    assert_eq!(scope.count(), 2);
    let err = truncated.find_unique_value(&scope, &9i64).unwrap_err();
    assert_eq!(err.code(), ResultCode::TooFewBytes);
    let err = truncated.unique_index_rebuild(&scope).unwrap_err();
    assert_eq!(err.code(), ResultCode::TooFewBytes);
}
