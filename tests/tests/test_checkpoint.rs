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


use hybridrow::layout::{LayoutType, TypeArgument};
use hybridrow::{ReaderState, RowBuffer, RowReader, RowWriter};
use test_helpers::new_row;

fn sample_row() -> RowBuffer {
    let mut row = new_row();
    let scores = TypeArgument::typed_array(TypeArgument::of(LayoutType::Int64));
    RowWriter::write_buffer(&mut row, (), |w, _, _| {
        w.write_int32("year", 1987)?;
        w.write_string("title", "Bad")?;
        w.write_string("label", "Epic")?;
        w.write_scope("scores", &scores, (), |w, _, _| {
            for s in [7i64, 9, 8] {
                w.write_int64("", s)?;
            }
            Ok(())
        })?;
        w.write_uint16("tracks", 11)
    })
    .unwrap();
    row
}

fn remaining_paths(reader: &mut RowReader<'_>) -> Vec<String> {
    let mut paths = Vec::new();
    while reader.read().unwrap() {
        paths.push(reader.path().unwrap().to_string());
    }
    paths
}

#[test]
fn resume_from_checkpoint() {
    let row = sample_row();
    let mut reader = RowReader::new(&row).unwrap();
    assert_eq!(reader.state(), ReaderState::None);
    assert!(reader.read().unwrap());
    assert_eq!(reader.state(), ReaderState::Schematized);
    assert!(reader.read().unwrap());
    let checkpoint = reader.checkpoint();
    assert_eq!(checkpoint.state, ReaderState::Schematized);

    let rest = remaining_paths(&mut reader);
    assert_eq!(rest, ["title", "label", "scores", "tracks"]);
    assert_eq!(reader.state(), ReaderState::Done);

    let mut resumed = RowReader::from_checkpoint(&row, checkpoint.clone());
    assert_eq!(resumed.path().unwrap(), "explicit");
    assert_eq!(remaining_paths(&mut resumed), rest);

    // checkpoints are independent of each other
    let mut again = RowReader::from_checkpoint(&row, checkpoint);
    assert!(again.read().unwrap());
    assert_eq!(again.read_string().unwrap(), "Bad");
}

#[test]
fn checkpoint_in_sparse_region() {
    let row = sample_row();
    let mut reader = RowReader::new(&row).unwrap();
    while reader.read().unwrap() {
        if reader.path().unwrap() == "scores" {
            break;
        }
    }
    assert_eq!(reader.state(), ReaderState::Sparse);
    let checkpoint = reader.checkpoint();

    let total = reader
        .read_scope_with(0i64, |child, mut total| {
            while child.read()? {
                total += child.read_int64()?;
            }
            Ok(total)
        })
        .unwrap();
    assert_eq!(total, 24);
    assert!(reader.read().unwrap());
    assert_eq!(reader.read_uint16().unwrap(), 11);

    let mut resumed = RowReader::from_checkpoint(&row, checkpoint);
    assert_eq!(resumed.path().unwrap(), "scores");
    let mut child = resumed.read_scope().unwrap();
    assert!(child.read().unwrap());
    let inner = child.checkpoint();
    assert_eq!(child.read_int64().unwrap(), 7);
    assert!(child.read().unwrap());
    assert_eq!(child.read_int64().unwrap(), 9);

    let mut replay = RowReader::from_checkpoint(&row, inner);
    assert_eq!(replay.index(), 0);
    assert_eq!(replay.read_int64().unwrap(), 7);
    assert!(replay.read().unwrap());
    assert!(replay.read().unwrap());
    assert_eq!(replay.read_int64().unwrap(), 8);
    assert!(!replay.read().unwrap());

    // the parent still moves on without an explicit skip
    assert_eq!(remaining_paths(&mut resumed), ["tracks"]);
}
