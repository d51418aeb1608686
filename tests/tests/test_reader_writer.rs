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
use hybridrow::layout::{LayoutType, TypeArgument};
use hybridrow::{Error, ResultCode, RowBuffer, RowReader, RowWriter};
use test_helpers::{new_row, ARTIST};

fn utf8() -> TypeArgument {
    TypeArgument::of(LayoutType::Utf8)
}

fn int32() -> TypeArgument {
    TypeArgument::of(LayoutType::Int32)
}

fn write_album(row: &mut RowBuffer) -> Result<(), Error> {
    let tags = TypeArgument::typed_array(utf8());
    RowWriter::write_buffer(row, (), |w, _, _| {
        w.write_int32("year", 1979)?;
        w.write_bool("explicit", false)?;
        w.write_scope("tags", &tags, (), |w, _, _| {
            for tag in ["classic", "Post-disco", "funk"] {
                w.write_string("", tag)?;
            }
            Ok(())
        })?;
        // variable columns written after sparse cells move them
        w.write_string("title", "Off the Wall")?;
        w.write_varuint("plays", 42)?;
        w.write_scope("artist", &TypeArgument::udt(ARTIST), (), |w, _, _| {
            w.write_int16("born", 1958)?;
            w.write_string("name", "Michael")?;
            w.write_string("hometown", "Gary")
        })?;
        w.write_float64("rating", 4.5)
    })
}

#[test]
fn write_then_read_album() {
    let mut row = new_row();
    write_album(&mut row).unwrap();

    let mut reader = RowReader::new(&row).unwrap();
    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "year");
    assert_eq!(reader.layout_type(), Some(LayoutType::Int32));
    assert_eq!(reader.read_int32().unwrap(), 1979);

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "explicit");
    assert!(!reader.read_bool().unwrap());

    // the guid column was never written
    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "title");
    assert_eq!(reader.read_string().unwrap(), "Off the Wall");
    assert!(reader.read().unwrap());
    assert_eq!(reader.read_varuint().unwrap(), 42);

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "tags");
    let tags = reader
        .read_scope_with(Vec::new(), |child, mut tags| {
            while child.read()? {
                assert_eq!(child.path()?, "");
                tags.push(child.read_string()?);
            }
            Ok(tags)
        })
        .unwrap();
    assert_eq!(tags, ["classic", "Post-disco", "funk"]);

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "artist");
    let mut artist = reader.read_scope().unwrap();
    assert!(artist.read().unwrap());
    assert_eq!(artist.path().unwrap(), "born");
    assert_eq!(artist.read_int16().unwrap(), 1958);
    assert!(artist.read().unwrap());
    assert_eq!(artist.read_string().unwrap(), "Michael");
    assert!(artist.read().unwrap());
    assert_eq!(artist.path().unwrap(), "hometown");
    assert_eq!(artist.read_string().unwrap(), "Gary");
    assert!(!artist.read().unwrap());
    reader.skip_scope(&artist).unwrap();

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "rating");
    assert_eq!(reader.read_float64().unwrap(), 4.5);
    assert!(!reader.read().unwrap());
    assert!(!reader.read().unwrap());
}

#[test]
fn typed_array_stops_after_last_element() {
    let mut row = new_row();
    write_album(&mut row).unwrap();
    let mut reader = RowReader::new(&row).unwrap();
    while reader.read().unwrap() {
        if reader.path().unwrap() == "tags" {
            break;
        }
    }
    let mut tags = reader.read_scope().unwrap();
    for expected in ["classic", "Post-disco", "funk"] {
        assert!(tags.read().unwrap());
        assert_eq!(tags.read_string().unwrap(), expected);
    }
    assert_eq!(tags.index(), 2);
    assert!(!tags.read().unwrap());
}

#[test]
fn wrong_types_are_rejected() {
    let mut row = new_row();
    write_album(&mut row).unwrap();
    let err = RowWriter::write_buffer(&mut row, (), |w, _, _| w.write_int64("year", 1))
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeMismatch);
    let err = RowWriter::write_buffer(&mut row, (), |w, _, _| w.write_int32("tags", 1))
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);

    let mut reader = RowReader::new(&row).unwrap();
    assert!(reader.read().unwrap());
    assert_eq!(reader.read_string().unwrap_err().code(), ResultCode::TypeMismatch);
    assert_eq!(reader.read_scope().unwrap_err().code(), ResultCode::TypeMismatch);
}

#[test]
fn unrepresentable_date_time_leaves_row_untouched() {
    let mut row = new_row();
    write_album(&mut row).unwrap();
    let before = row.to_bytes();
    let far = NaiveDate::from_ymd_opt(100_000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let err = RowWriter::write_buffer(&mut row, (), |w, _, _| w.write_datetime("when", far))
        .unwrap_err();
    assert_eq!(err.code(), ResultCode::TypeConstraint);
    assert_eq!(row.to_bytes(), before);
}

#[test]
fn nullable_tagged_and_tuple_scopes() {
    let mut row = new_row();
    let maybe = TypeArgument::nullable(int32());
    let tagged = TypeArgument::tagged(utf8());
    let pair = TypeArgument::typed_tuple(vec![utf8(), int32()]);
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("some", &maybe, 5, |w, _, v| w.write_int32("", v))?;
        w.write_scope_none("none", &maybe)?;
        w.write_scope("tagged", &tagged, (), |w, _, _| {
            w.write_uint8("", 7)?;
            w.write_string("", "seven")
        })?;
        w.write_scope("pair", &pair, (), |w, _, _| {
            w.write_string("", "track")?;
            w.write_int32("", 12)
        })
    })
    .unwrap();

    let mut reader = RowReader::new(&row).unwrap();
    // "explicit" is a non-nullable fixed column and is always present
    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "explicit");

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "some");
    assert!(reader.has_value().unwrap());
    let v = reader
        .read_scope_with((), |child, _| {
            assert!(child.read()?);
            child.read_int32()
        })
        .unwrap();
    assert_eq!(v, 5);

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "none");
    assert!(!reader.has_value().unwrap());
    let mut child = reader.read_scope().unwrap();
    assert!(!child.read().unwrap());

    assert!(reader.read().unwrap());
    assert_eq!(reader.type_arg(), Some(tagged.clone()));
    let (tag, value) = reader
        .read_scope_with((), |child, _| {
            assert!(child.read()?);
            let tag = child.read_uint8()?;
            assert!(child.read()?);
            Ok((tag, child.read_string()?.to_string()))
        })
        .unwrap();
    assert_eq!((tag, value.as_str()), (7, "seven"));

    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "pair");
    let mut child = reader.read_scope().unwrap();
    assert!(child.read().unwrap());
    assert_eq!(child.read_string().unwrap(), "track");
    assert!(child.read().unwrap());
    assert_eq!(child.read_int32().unwrap(), 12);
    assert!(!child.read().unwrap());
    assert!(!reader.read().unwrap());
}

#[test]
fn maps_sort_by_encoded_key() {
    let mut row = new_row();
    let map = TypeArgument::typed_map(utf8(), int32());
    let entry = TypeArgument::typed_tuple(vec![utf8(), int32()]);
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("genres", &map, (), |w, _, _| {
            for (genre, plays) in [("soul", 3), ("funk", 8), ("disco", 5)] {
                w.write_scope("", &entry, (), |w, _, _| {
                    w.write_string("", genre)?;
                    w.write_int32("", plays)
                })?;
            }
            Ok(())
        })
    })
    .unwrap();

    let mut reader = RowReader::new(&row).unwrap();
    assert!(reader.read().unwrap());
    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "genres");
    let entries = reader
        .read_scope_with(Vec::new(), |map, mut entries| {
            while map.read()? {
                let mut entry = map.read_scope()?;
                assert!(entry.read()?);
                let key = entry.read_string()?;
                assert!(entry.read()?);
                entries.push((key, entry.read_int32()?));
                map.skip_scope(&entry)?;
            }
            Ok(entries)
        })
        .unwrap();
    // keys compare by their length prefix first
    assert_eq!(entries, [("funk", 8), ("soul", 3), ("disco", 5)]);
}

#[test]
fn duplicate_set_elements_fail_the_write() {
    let mut row = new_row();
    let set = TypeArgument::typed_set(int32());
    let err = RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("ids", &set, (), |w, _, _| {
            w.write_int32("", 2)?;
            w.write_int32("", 2)
        })
    })
    .unwrap_err();
    assert_eq!(err.code(), ResultCode::Exists);
}

#[test]
fn objects_and_arrays() {
    let mut row = new_row();
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("credits", &TypeArgument::object(), (), |w, _, _| {
            w.write_string("producer", "Quincy Jones")?;
            w.write_scope("studios", &TypeArgument::array(), (), |w, _, _| {
                w.write_string("", "Allen Zentz")?;
                w.write_int32("", 1979)?;
                w.write_null("")
            })
        })
    })
    .unwrap();

    let mut reader = RowReader::new(&row).unwrap();
    assert!(reader.read().unwrap());
    assert!(reader.read().unwrap());
    let mut credits = reader.read_scope().unwrap();
    assert!(credits.read().unwrap());
    assert_eq!(credits.path().unwrap(), "producer");
    assert_eq!(credits.read_string().unwrap(), "Quincy Jones");
    assert!(credits.read().unwrap());
    assert_eq!(credits.path().unwrap(), "studios");
    let mut studios = credits.read_scope().unwrap();
    assert!(studios.read().unwrap());
    assert_eq!(studios.layout_type(), Some(LayoutType::Utf8));
    assert!(studios.read().unwrap());
    assert_eq!(studios.read_int32().unwrap(), 1979);
    assert!(studios.read().unwrap());
    assert!(!studios.has_value().unwrap());
    assert!(!studios.read().unwrap());
    assert!(!credits.read().unwrap());
    assert!(!reader.read().unwrap());
}

#[test]
fn sets_of_udts_and_nested_arrays() {
    let mut row = new_row();
    let artist = TypeArgument::udt(ARTIST);
    let members = TypeArgument::typed_set(artist.clone());
    let line = TypeArgument::typed_array(int32());
    let matrix = TypeArgument::typed_array(line.clone());
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_scope("members", &members, (), |w, _, _| {
            for (born, name) in [(1958i16, "Michael"), (1946, "Jackie"), (1963, "Janet")] {
                w.write_scope("", &artist, (), |w, _, _| {
                    w.write_int16("born", born)?;
                    w.write_string("name", name)
                })?;
            }
            Ok(())
        })?;
        w.write_scope("matrix", &matrix, (), |w, _, _| {
            for values in [vec![1, 2], vec![], vec![3]] {
                w.write_scope("", &line, values, |w, _, values| {
                    for v in values {
                        w.write_int32("", v)?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })
    })
    .unwrap();

    let mut reader = RowReader::new(&row).unwrap();
    assert!(reader.read().unwrap());
    assert!(reader.read().unwrap());
    assert_eq!(reader.path().unwrap(), "members");
    let mut names = reader
        .read_scope_with(Vec::new(), |set, mut names| {
            while set.read()? {
                let mut member = set.read_scope()?;
                assert!(member.read()?);
                let born = member.read_int16()?;
                assert!(member.read()?);
                names.push((born, member.read_string()?));
            }
            Ok(names)
        })
        .unwrap();
    names.sort();
    assert_eq!(names, [(1946, "Jackie"), (1958, "Michael"), (1963, "Janet")]);

    assert!(reader.read().unwrap());
    let lines = reader
        .read_scope_with(Vec::new(), |outer, mut lines| {
            while outer.read()? {
                let values = outer.read_scope_with(Vec::new(), |inner, mut values| {
                    while inner.read()? {
                        values.push(inner.read_int32()?);
                    }
                    Ok(values)
                })?;
                lines.push(values);
            }
            Ok(lines)
        })
        .unwrap();
    assert_eq!(lines, [vec![1, 2], vec![], vec![3]]);
}
