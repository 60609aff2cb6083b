#![no_main]

use std::io::{BufReader, Cursor};

use libfuzzer_sys::fuzz_target;
use partitionrs::{decode, PartitionConfig, PartitionSource};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let size = usize::from(data[0]).max(1);
    let width = usize::from(data[1]).max(1);
    let payload = data[2..].to_vec();

    // Fixed-width records
    let source = PartitionSource::from_resource(
        Cursor::new(payload.clone()),
        PartitionConfig::new(size).unwrap(),
        |reader| decode::fixed_width(reader, width),
    )
    .unwrap();

    let records: Vec<u8> = source.scoped(|source| {
        let mut bytes = Vec::new();
        for partition in source.traversal().unwrap() {
            let partition = partition.unwrap();
            assert!(partition.len() <= size);
            for record in partition.iter() {
                assert!(record.len() <= width);
                bytes.extend_from_slice(record);
            }
        }
        bytes
    });
    assert_eq!(records, payload);

    // Newline-delimited records: rejoining them restores the payload
    let source = PartitionSource::from_resource(
        Cursor::new(payload.clone()),
        PartitionConfig::new(size).unwrap(),
        |reader| Ok::<_, std::io::Error>(decode::delimited(BufReader::new(reader), b'\n')),
    )
    .unwrap();

    let lines: Vec<Vec<u8>> = source.scoped(|source| {
        source
            .traversal()
            .unwrap()
            .flat_map(|partition| partition.unwrap().into_vec())
            .map(|record| record.to_vec())
            .collect()
    });
    let mut rejoined = lines.join(&b'\n');
    if payload.last() == Some(&b'\n') {
        rejoined.push(b'\n');
    }
    assert_eq!(rejoined, payload);
});
