//! Weight file loading tests.

use std::io;

use once_cell::sync::Lazy;

use super::SYNTHETIC;
use crate::nnue::network::{
    ARCHITECTURE_HASH, DESCRIPTION_LEN, FEATURE_TRANSFORMER_MARKER, FILE_SIZE, NETWORK_MARKER,
    VERSION,
};
use crate::nnue::{
    HeaderField, NnueError, NnueNetwork, Section, HALFKP_INPUTS, HALF_DIMENSIONS, HIDDEN_SIZE,
    TRANSFORMED_SIZE,
};

const FT_MARKER_OFFSET: usize = 12 + DESCRIPTION_LEN;
const NETWORK_MARKER_OFFSET: usize =
    FT_MARKER_OFFSET + 4 + HALF_DIMENSIONS * 2 + HALFKP_INPUTS * HALF_DIMENSIONS * 2;
const HIDDEN1_WEIGHTS_OFFSET: usize = NETWORK_MARKER_OFFSET + 4 + HIDDEN_SIZE * 4;
const OUTPUT_OFFSET: usize = HIDDEN1_WEIGHTS_OFFSET
    + HIDDEN_SIZE * TRANSFORMED_SIZE
    + HIDDEN_SIZE * 4
    + HIDDEN_SIZE * HIDDEN_SIZE;

static ZEROED_BYTES: Lazy<Vec<u8>> = Lazy::new(|| NnueNetwork::zeroed().to_bytes());

fn patch_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[test]
fn test_layout_offsets() {
    let bytes = &*ZEROED_BYTES;
    assert_eq!(bytes.len(), FILE_SIZE);
    assert_eq!(
        &bytes[FT_MARKER_OFFSET..FT_MARKER_OFFSET + 4],
        &FEATURE_TRANSFORMER_MARKER.to_le_bytes()
    );
    assert_eq!(
        &bytes[NETWORK_MARKER_OFFSET..NETWORK_MARKER_OFFSET + 4],
        &NETWORK_MARKER.to_le_bytes()
    );
    assert_eq!(OUTPUT_OFFSET + 4 + HIDDEN_SIZE, FILE_SIZE);
}

#[test]
fn test_round_trip_is_bit_exact() {
    let bytes = SYNTHETIC.to_bytes();
    let loaded = NnueNetwork::from_bytes(&bytes).unwrap();
    assert_eq!(loaded.to_bytes(), bytes);
    assert_eq!(loaded.output_bias(), SYNTHETIC.output_bias());
    assert_eq!(loaded.feature_column(12_345), SYNTHETIC.feature_column(12_345));
}

#[test]
fn test_hand_built_stream_values() {
    let mut bytes = ZEROED_BYTES.clone();
    // feature bias 7 = -3
    let bias_offset = FT_MARKER_OFFSET + 4 + 7 * 2;
    bytes[bias_offset..bias_offset + 2].copy_from_slice(&(-3i16).to_le_bytes());
    // feature 2 column entry 1 = 1234
    let weight_offset = FT_MARKER_OFFSET + 4 + HALF_DIMENSIONS * 2 + (2 * HALF_DIMENSIONS + 1) * 2;
    bytes[weight_offset..weight_offset + 2].copy_from_slice(&1234i16.to_le_bytes());
    // hidden 1: output 2, input 300 (file order is output-major)
    bytes[HIDDEN1_WEIGHTS_OFFSET + 2 * TRANSFORMED_SIZE + 300] = 9;
    // output bias and last output weight
    bytes[OUTPUT_OFFSET..OUTPUT_OFFSET + 4].copy_from_slice(&(-77i32).to_le_bytes());
    bytes[FILE_SIZE - 1] = (-5i8) as u8;

    let network = NnueNetwork::from_bytes(&bytes).unwrap();
    assert_eq!(network.feature_bias()[7], -3);
    assert_eq!(network.feature_column(2)[1], 1234);
    assert_eq!(network.hidden1().weight(2, 300), 9);
    assert_eq!(network.hidden1().weight(3, 300), 0);
    assert_eq!(network.output_bias(), -77);
    assert_eq!(network.output_weights()[HIDDEN_SIZE - 1], -5);
    assert!(network.description().starts_with("Features=HalfKP"));
}

#[test]
fn test_rejects_bad_version() {
    let mut bytes = ZEROED_BYTES.clone();
    patch_u32(&mut bytes, 0, 0x1234_5678);
    assert_eq!(
        NnueNetwork::from_bytes(&bytes).unwrap_err(),
        NnueError::BadHeader {
            field: HeaderField::Version,
            expected: VERSION,
            found: 0x1234_5678,
        }
    );
}

#[test]
fn test_rejects_bad_hash() {
    let mut bytes = ZEROED_BYTES.clone();
    patch_u32(&mut bytes, 4, 0);
    assert_eq!(
        NnueNetwork::from_bytes(&bytes).unwrap_err(),
        NnueError::BadHeader {
            field: HeaderField::Hash,
            expected: ARCHITECTURE_HASH,
            found: 0,
        }
    );
}

#[test]
fn test_rejects_bad_description_length() {
    let mut bytes = ZEROED_BYTES.clone();
    patch_u32(&mut bytes, 8, 176);
    assert!(matches!(
        NnueNetwork::from_bytes(&bytes),
        Err(NnueError::BadHeader {
            field: HeaderField::DescriptionLength,
            found: 176,
            ..
        })
    ));
}

#[test]
fn test_rejects_bad_section_markers() {
    let mut bytes = ZEROED_BYTES.clone();
    patch_u32(&mut bytes, FT_MARKER_OFFSET, 0xDEAD_BEEF);
    assert_eq!(
        NnueNetwork::from_bytes(&bytes).unwrap_err(),
        NnueError::BadSectionMarker {
            section: Section::FeatureTransformer,
            expected: FEATURE_TRANSFORMER_MARKER,
            found: 0xDEAD_BEEF,
        }
    );

    let mut bytes = ZEROED_BYTES.clone();
    patch_u32(&mut bytes, NETWORK_MARKER_OFFSET, 0);
    assert!(matches!(
        NnueNetwork::from_bytes(&bytes),
        Err(NnueError::BadSectionMarker {
            section: Section::HiddenLayer1,
            expected: NETWORK_MARKER,
            found: 0,
        })
    ));
}

#[test]
fn test_rejects_truncation_per_section() {
    let cases = [
        (6, Section::Header),
        (12 + 100, Section::Description),
        (FT_MARKER_OFFSET + 4 + 1000, Section::FeatureTransformer),
        (HIDDEN1_WEIGHTS_OFFSET + 10, Section::HiddenLayer1),
        (OUTPUT_OFFSET - 1, Section::HiddenLayer2),
        (FILE_SIZE - 1, Section::Output),
    ];
    for (len, section) in cases {
        assert_eq!(
            NnueNetwork::from_bytes(&ZEROED_BYTES[..len]).unwrap_err(),
            NnueError::TruncatedFile { section },
            "truncated to {len} bytes"
        );
    }
    assert_eq!(
        NnueNetwork::from_bytes(&[]).unwrap_err(),
        NnueError::TruncatedFile {
            section: Section::Header
        }
    );
}

#[test]
fn test_rejects_trailing_data() {
    let mut bytes = ZEROED_BYTES.clone();
    bytes.extend_from_slice(&[0u8; 8]);
    assert_eq!(
        NnueNetwork::from_bytes(&bytes).unwrap_err(),
        NnueError::TrailingData { units: 2, bytes: 8 }
    );

    let mut bytes = ZEROED_BYTES.clone();
    bytes.extend_from_slice(&[0u8; 7]);
    assert_eq!(
        NnueNetwork::from_bytes(&bytes).unwrap_err(),
        NnueError::TrailingData { units: 1, bytes: 7 }
    );
}

#[test]
fn test_accepts_tail_shorter_than_a_unit() {
    for len in 1..4 {
        let mut bytes = ZEROED_BYTES.clone();
        bytes.extend(std::iter::repeat(0xAB).take(len));
        let network = NnueNetwork::from_bytes(&bytes).unwrap();
        assert_eq!(network.to_bytes(), *ZEROED_BYTES, "tail of {len} bytes");
    }
}

#[test]
fn test_missing_file() {
    let err = NnueNetwork::load("/definitely/not/here/nn.bin").unwrap_err();
    assert!(matches!(
        err,
        NnueError::FileNotFound {
            kind: io::ErrorKind::NotFound,
            ..
        }
    ));
}

#[test]
fn test_reader_failure_maps_to_read_error() {
    struct Failing;
    impl io::Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }
    assert_eq!(
        NnueNetwork::from_reader(Failing).unwrap_err(),
        NnueError::Read {
            section: Section::Header,
            kind: io::ErrorKind::BrokenPipe,
        }
    );
}

#[test]
fn test_load_and_write_file() {
    let path = std::env::temp_dir().join(format!("halfkp_eval_loader_{}.bin", std::process::id()));
    {
        let file = std::fs::File::create(&path).unwrap();
        SYNTHETIC.write_to(io::BufWriter::new(file)).unwrap();
    }
    let loaded = NnueNetwork::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.unwrap().to_bytes(), SYNTHETIC.to_bytes());
}
