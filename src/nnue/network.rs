//! Network parameters and the binary weight file format.
//!
//! All values are little-endian:
//!
//! | field | contents |
//! |---|---|
//! | header | version, architecture hash, description length (u32 each) |
//! | description | 177 bytes of text |
//! | feature transformer | marker, 256 i16 biases, 41024 x 256 i16 weights |
//! | network | marker |
//! | hidden layer 1 | 32 i32 biases, 32 x 512 i8 weights, output-major |
//! | hidden layer 2 | 32 i32 biases, 32 x 32 i8 weights, output-major |
//! | output | i32 bias, 32 i8 weights |
//!
//! No whole 4-byte unit may follow the output layer.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{HeaderField, NnueError, Section};
use super::{HALFKP_INPUTS, HALF_DIMENSIONS, HIDDEN_SIZE, TRANSFORMED_SIZE};

pub const VERSION: u32 = 0x7AF3_2F16;
pub const ARCHITECTURE_HASH: u32 = 0x3E5A_A6EE;
pub const DESCRIPTION_LEN: usize = 177;
pub const FEATURE_TRANSFORMER_MARKER: u32 = 0x5D69_D7B8;
pub const NETWORK_MARKER: u32 = 0x6333_7156;

/// Architecture string written by [`NnueNetwork::zeroed`] and
/// [`NnueNetwork::synthetic`]
pub const DEFAULT_DESCRIPTION: &str = "Features=HalfKP(Friend)[41024->256x2],\
Network=AffineTransform[1<-32](ClippedReLU[32](AffineTransform[32<-32](\
ClippedReLU[32](AffineTransform[32<-512](InputSlice[512(0:512)])))))";

/// Size in bytes of a well-formed weight file
pub const FILE_SIZE: usize = 3 * 4
    + DESCRIPTION_LEN
    + 4
    + HALF_DIMENSIONS * 2
    + HALFKP_INPUTS * HALF_DIMENSIONS * 2
    + 4
    + HIDDEN_SIZE * 4
    + HIDDEN_SIZE * TRANSFORMED_SIZE
    + HIDDEN_SIZE * 4
    + HIDDEN_SIZE * HIDDEN_SIZE
    + 4
    + HIDDEN_SIZE;

/// Little-endian reader that tags failures with the section being read
struct SectionReader<R> {
    inner: R,
    section: Section,
    buf: Vec<u8>,
}

impl<R: Read> SectionReader<R> {
    fn new(inner: R) -> Self {
        SectionReader {
            inner,
            section: Section::Header,
            buf: Vec::new(),
        }
    }

    fn enter(&mut self, section: Section) {
        self.section = section;
    }

    fn read_bytes(&mut self, len: usize) -> Result<&[u8], NnueError> {
        let section = self.section;
        self.buf.resize(len, 0);
        self.inner
            .read_exact(&mut self.buf)
            .map_err(|e| NnueError::from_io(section, &e))?;
        Ok(&self.buf)
    }

    fn read_u32(&mut self) -> Result<u32, NnueError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i16s(&mut self, out: &mut [i16]) -> Result<(), NnueError> {
        let bytes = self.read_bytes(out.len() * 2)?;
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(2)) {
            *value = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
        Ok(())
    }

    fn read_i32s(&mut self, out: &mut [i32]) -> Result<(), NnueError> {
        let bytes = self.read_bytes(out.len() * 4)?;
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(())
    }

    fn read_i8s(&mut self, out: &mut [i8]) -> Result<(), NnueError> {
        let bytes = self.read_bytes(out.len())?;
        for (value, &byte) in out.iter_mut().zip(bytes) {
            *value = byte as i8;
        }
        Ok(())
    }

    fn expect_header(&mut self, field: HeaderField, expected: u32) -> Result<(), NnueError> {
        let found = self.read_u32()?;
        debug!("NNUE header {field}: {found:#010x}");
        if found != expected {
            return Err(NnueError::BadHeader {
                field,
                expected,
                found,
            });
        }
        Ok(())
    }

    fn expect_marker(&mut self, expected: u32) -> Result<(), NnueError> {
        let found = self.read_u32()?;
        if found != expected {
            return Err(NnueError::BadSectionMarker {
                section: self.section,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Count the bytes left in the input
    fn remaining(&mut self) -> Result<u64, NnueError> {
        let section = self.section;
        io::copy(&mut self.inner, &mut io::sink()).map_err(|e| NnueError::from_io(section, &e))
    }
}

/// Affine layer with 32 outputs.
///
/// Weights are kept one row per input (`weights[j][i]` is the weight from
/// input `j` to output `i`) so the sparse input loop walks memory linearly.
#[derive(Clone)]
pub struct HiddenLayer {
    pub(crate) bias: [i32; HIDDEN_SIZE],
    pub(crate) weights: Vec<[i8; HIDDEN_SIZE]>,
}

impl HiddenLayer {
    fn zeroed(inputs: usize) -> Self {
        HiddenLayer {
            bias: [0; HIDDEN_SIZE],
            weights: vec![[0; HIDDEN_SIZE]; inputs],
        }
    }

    fn read<R: Read>(reader: &mut SectionReader<R>, inputs: usize) -> Result<Self, NnueError> {
        let mut layer = HiddenLayer::zeroed(inputs);
        reader.read_i32s(&mut layer.bias)?;

        // File order is output-major
        let mut row = vec![0i8; inputs];
        for i in 0..HIDDEN_SIZE {
            reader.read_i8s(&mut row)?;
            for (j, &w) in row.iter().enumerate() {
                layer.weights[j][i] = w;
            }
        }
        Ok(layer)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for bias in self.bias {
            out.extend_from_slice(&bias.to_le_bytes());
        }
        for i in 0..HIDDEN_SIZE {
            out.extend(self.weights.iter().map(|row| row[i] as u8));
        }
    }

    fn randomize(&mut self, rng: &mut StdRng) {
        for bias in &mut self.bias {
            *bias = rng.gen_range(-2048..=2048);
        }
        for row in &mut self.weights {
            for w in row.iter_mut() {
                *w = rng.gen_range(-32..=32);
            }
        }
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn bias(&self) -> &[i32; HIDDEN_SIZE] {
        &self.bias
    }

    /// Weight from input `input` to output `output`
    #[must_use]
    pub fn weight(&self, output: usize, input: usize) -> i8 {
        self.weights[input][output]
    }
}

/// Quantized HalfKP network parameters, immutable once built.
#[derive(Clone)]
pub struct NnueNetwork {
    description: Vec<u8>,
    pub(crate) feature_bias: [i16; HALF_DIMENSIONS],
    /// One 256-wide column per input feature
    pub(crate) feature_weights: Vec<[i16; HALF_DIMENSIONS]>,
    pub(crate) hidden1: HiddenLayer,
    pub(crate) hidden2: HiddenLayer,
    pub(crate) output_bias: i32,
    pub(crate) output_weights: [i8; HIDDEN_SIZE],
}

impl NnueNetwork {
    /// Load a network from a weight file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NnueError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| NnueError::FileNotFound {
            path: path.to_path_buf(),
            kind: e.kind(),
        })?;
        let network = Self::from_reader(BufReader::new(file))?;
        info!("Loaded NNUE {} ({})", path.display(), network.description());
        Ok(network)
    }

    /// Load a network from an in-memory weight file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, NnueError> {
        Self::from_reader(data)
    }

    /// Load a network from any reader. The reader must end right after the
    /// output layer.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, NnueError> {
        let mut reader = SectionReader::new(reader);

        reader.expect_header(HeaderField::Version, VERSION)?;
        reader.expect_header(HeaderField::Hash, ARCHITECTURE_HASH)?;
        reader.expect_header(HeaderField::DescriptionLength, DESCRIPTION_LEN as u32)?;

        reader.enter(Section::Description);
        let description = reader.read_bytes(DESCRIPTION_LEN)?.to_vec();

        reader.enter(Section::FeatureTransformer);
        reader.expect_marker(FEATURE_TRANSFORMER_MARKER)?;
        let mut feature_bias = [0i16; HALF_DIMENSIONS];
        reader.read_i16s(&mut feature_bias)?;
        let mut feature_weights = vec![[0i16; HALF_DIMENSIONS]; HALFKP_INPUTS];
        for column in &mut feature_weights {
            reader.read_i16s(column)?;
        }

        reader.enter(Section::HiddenLayer1);
        reader.expect_marker(NETWORK_MARKER)?;
        let hidden1 = HiddenLayer::read(&mut reader, TRANSFORMED_SIZE)?;

        reader.enter(Section::HiddenLayer2);
        let hidden2 = HiddenLayer::read(&mut reader, HIDDEN_SIZE)?;

        reader.enter(Section::Output);
        let mut output_bias = [0i32; 1];
        reader.read_i32s(&mut output_bias)?;
        let mut output_weights = [0i8; HIDDEN_SIZE];
        reader.read_i8s(&mut output_weights)?;

        // A tail shorter than one 4-byte unit is tolerated
        let bytes = reader.remaining()?;
        let units = bytes / 4;
        if units > 0 {
            return Err(NnueError::TrailingData { units, bytes });
        }
        if bytes > 0 {
            debug!("Ignoring {bytes} trailing bytes after the output layer");
        }

        Ok(NnueNetwork {
            description,
            feature_bias,
            feature_weights,
            hidden1,
            hidden2,
            output_bias: output_bias[0],
            output_weights,
        })
    }

    /// Network with every weight and bias zero
    #[must_use]
    pub fn zeroed() -> Self {
        let mut description = DEFAULT_DESCRIPTION.as_bytes().to_vec();
        description.resize(DESCRIPTION_LEN, 0);
        NnueNetwork {
            description,
            feature_bias: [0; HALF_DIMENSIONS],
            feature_weights: vec![[0; HALF_DIMENSIONS]; HALFKP_INPUTS],
            hidden1: HiddenLayer::zeroed(TRANSFORMED_SIZE),
            hidden2: HiddenLayer::zeroed(HIDDEN_SIZE),
            output_bias: 0,
            output_weights: [0; HIDDEN_SIZE],
        }
    }

    /// Deterministic pseudo-random network for tests and benchmarks.
    ///
    /// Weights are small enough that accumulators of ordinary positions
    /// land around the clipping range instead of saturating.
    #[must_use]
    pub fn synthetic(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut network = NnueNetwork::zeroed();

        for bias in &mut network.feature_bias {
            *bias = rng.gen_range(-32..=96);
        }
        for column in &mut network.feature_weights {
            rng.fill(&mut column[..]);
            for w in column.iter_mut() {
                // keep the top bits: -16..=15
                *w >>= 11;
            }
        }
        network.hidden1.randomize(&mut rng);
        network.hidden2.randomize(&mut rng);
        network.output_bias = rng.gen_range(-1000..=1000);
        for w in &mut network.output_weights {
            *w = rng.gen_range(-64..=64);
        }
        network
    }

    /// Architecture string from the file header, trailing NULs removed
    #[must_use]
    pub fn description(&self) -> String {
        String::from_utf8_lossy(&self.description)
            .trim_end_matches('\0')
            .to_string()
    }

    #[must_use]
    pub fn feature_bias(&self) -> &[i16; HALF_DIMENSIONS] {
        &self.feature_bias
    }

    /// Feature transformer column of one input feature
    #[inline]
    #[must_use]
    pub fn feature_column(&self, index: usize) -> &[i16; HALF_DIMENSIONS] {
        &self.feature_weights[index]
    }

    #[must_use]
    pub fn hidden1(&self) -> &HiddenLayer {
        &self.hidden1
    }

    #[must_use]
    pub fn hidden2(&self) -> &HiddenLayer {
        &self.hidden2
    }

    #[must_use]
    pub fn output_bias(&self) -> i32 {
        self.output_bias
    }

    #[must_use]
    pub fn output_weights(&self) -> &[i8; HIDDEN_SIZE] {
        &self.output_weights
    }

    /// Serialize into the weight file format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FILE_SIZE);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&ARCHITECTURE_HASH.to_le_bytes());
        out.extend_from_slice(&(DESCRIPTION_LEN as u32).to_le_bytes());
        out.extend_from_slice(&self.description);

        out.extend_from_slice(&FEATURE_TRANSFORMER_MARKER.to_le_bytes());
        for bias in self.feature_bias {
            out.extend_from_slice(&bias.to_le_bytes());
        }
        for column in &self.feature_weights {
            for w in column {
                out.extend_from_slice(&w.to_le_bytes());
            }
        }

        out.extend_from_slice(&NETWORK_MARKER.to_le_bytes());
        self.hidden1.encode(&mut out);
        self.hidden2.encode(&mut out);

        out.extend_from_slice(&self.output_bias.to_le_bytes());
        out.extend(self.output_weights.iter().map(|&w| w as u8));
        out
    }

    /// Write the weight file format to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }
}

impl fmt::Debug for NnueNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NnueNetwork")
            .field("description", &self.description())
            .field("features", &self.feature_weights.len())
            .field("output_bias", &self.output_bias)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_description_fits_header() {
        assert_eq!(DEFAULT_DESCRIPTION.len(), DESCRIPTION_LEN);
        assert_eq!(NnueNetwork::zeroed().description(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_zeroed_serializes_to_file_size() {
        let bytes = NnueNetwork::zeroed().to_bytes();
        assert_eq!(bytes.len(), FILE_SIZE);
        assert_eq!(&bytes[0..4], &VERSION.to_le_bytes());
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = NnueNetwork::synthetic(7);
        let b = NnueNetwork::synthetic(7);
        assert_eq!(a.feature_bias, b.feature_bias);
        assert_eq!(a.feature_weights[1000], b.feature_weights[1000]);
        assert_eq!(a.output_bias, b.output_bias);
        assert!(a.feature_weights[1000].iter().all(|w| (-16..=15).contains(w)));
    }

    #[test]
    fn test_hidden_layer_packing() {
        let mut layer = HiddenLayer::zeroed(HIDDEN_SIZE);
        layer.weights[3][5] = -7;
        assert_eq!(layer.weight(5, 3), -7);

        let mut out = Vec::new();
        layer.encode(&mut out);
        // output 5 row starts after the biases and five 32-byte rows
        assert_eq!(out[HIDDEN_SIZE * 4 + 5 * HIDDEN_SIZE + 3] as i8, -7);
    }
}
