#![no_main]

use libfuzzer_sys::fuzz_target;
use partitionrs::{PartitionConfig, PartitionSource};

fuzz_target!(|data: &[u8]| {
    let Some((&size, items)) = data.split_first() else {
        return;
    };
    let size = size as usize;

    let Ok(config) = PartitionConfig::new(size) else {
        // Only a zero size is rejected
        assert_eq!(size, 0);
        return;
    };

    let list = PartitionSource::from_slice(items, config).unwrap();
    let cursor = PartitionSource::from_cursor(items.to_vec().into_iter(), config).unwrap();

    for mut source in [list, cursor] {
        let partitions: Vec<_> = source
            .traversal()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        // Verify: ceil(len / size) partitions
        assert_eq!(partitions.len(), items.len().div_ceil(size));

        // Verify: every partition but the last is full, none is empty
        for (i, partition) in partitions.iter().enumerate() {
            assert!(!partition.is_empty());
            assert!(partition.len() <= size);
            if i < partitions.len() - 1 {
                assert_eq!(partition.len(), size);
            }
            assert_eq!(partition.index(), i);
        }

        // Verify: concatenation reproduces the input
        let flattened: Vec<u8> = partitions.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(flattened, items);
    }
});
