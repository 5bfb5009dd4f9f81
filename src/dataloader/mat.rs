// Level 5 MAT-file reading, limited to what the Office-Caltech metadata needs.
//
// File layout:
//   header: text(116) | subsys offset(8) | version(2) | endian indicator "IM" or "MI"(2)
//   then tagged data elements: type(u32) | byte count(u32) | data, padded to 8 bytes.
//   Elements of at most 4 bytes may use the small form: count(u16) type(u16) packed in
//   one u32 followed by 4 data bytes.
//
// A variable is an miMATRIX element whose sub-elements are array flags, dimensions,
// name and the data itself. miCOMPRESSED elements hold one zlib-compressed element.
// Cell arrays nest miMATRIX elements, one per cell, in column-major order.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::error::{DatasetError, Result};

const HEADER_LEN: usize = 128;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF8: u32 = 16;
const MI_UTF16: u32 = 17;

const MX_CELL: u8 = 1;
const MX_CHAR: u8 = 4;
const MX_DOUBLE: u8 = 6;
const MX_UINT64: u8 = 15;

/// Reads the two arrays the Office-Caltech loader needs from a metadata file.
pub trait MetadataReader {
    /// First column of the `labels` array, converted from 1-based to 0-based.
    fn labels(&self, path: &Path) -> Result<Vec<i32>>;

    /// First string of every cell in the first column of `imgNames`, in file order.
    fn image_names(&self, path: &Path) -> Result<Vec<String>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MatFileReader;

impl MetadataReader for MatFileReader {
    fn labels(&self, path: &Path) -> Result<Vec<i32>> {
        let mat = MatFile::open(path)?;
        match mat.require(path, "labels")? {
            MatValue::Numeric { dims, data } => zero_based_labels(first_column(dims, data)),
            _ => Err(DatasetError::MatFormat(format!(
                "labels in {} is not a numeric array",
                path.display()
            ))),
        }
    }

    fn image_names(&self, path: &Path) -> Result<Vec<String>> {
        let mat = MatFile::open(path)?;
        match mat.require(path, "imgNames")? {
            MatValue::Cell { dims, cells } => first_column(dims, cells)
                .iter()
                .map(|cell| match cell {
                    MatValue::Char { rows, .. } if !rows.is_empty() => Ok(rows[0].clone()),
                    _ => Err(DatasetError::MatFormat(format!(
                        "imgNames in {} holds a cell that is not a string",
                        path.display()
                    ))),
                })
                .collect(),
            // A padded char matrix, one name per row
            MatValue::Char { rows, .. } => Ok(rows
                .iter()
                .map(|row| row.trim_end().to_string())
                .collect()),
            _ => Err(DatasetError::MatFormat(format!(
                "imgNames in {} is not a cell array",
                path.display()
            ))),
        }
    }
}

fn zero_based_labels(values: &[f64]) -> Result<Vec<i32>> {
    values
        .iter()
        .map(|&label| {
            (label as i32).checked_sub(1).ok_or_else(|| {
                DatasetError::MatFormat(format!("label {label} is out of range"))
            })
        })
        .collect()
}

fn first_column<'a, T>(dims: &[usize], values: &'a [T]) -> &'a [T] {
    let rows = dims.first().copied().unwrap_or(values.len());
    &values[..rows.min(values.len())]
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatValue {
    /// Any numeric class, widened to f64, column-major.
    Numeric { dims: Vec<usize>, data: Vec<f64> },
    /// One string per row.
    Char { dims: Vec<usize>, rows: Vec<String> },
    /// Cells in column-major order.
    Cell { dims: Vec<usize>, cells: Vec<MatValue> },
    Unsupported { class: u8 },
}

impl MatValue {
    pub fn column(data: Vec<f64>) -> Self {
        MatValue::Numeric {
            dims: vec![data.len(), 1],
            data,
        }
    }

    pub fn string(s: &str) -> Self {
        MatValue::Char {
            dims: vec![1, s.encode_utf16().count()],
            rows: vec![s.to_string()],
        }
    }

    pub fn cell_column(cells: Vec<MatValue>) -> Self {
        MatValue::Cell {
            dims: vec![cells.len(), 1],
            cells,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn array<const N: usize>(self, bytes: &[u8]) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes[..N]);
        if self == ByteOrder::Big {
            out.reverse();
        }
        out
    }

    fn u32(self, bytes: &[u8]) -> u32 {
        u32::from_le_bytes(self.array(bytes))
    }
}

struct ElementReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ElementReader<'a> {
    fn new(bytes: &'a [u8], order: ByteOrder) -> Self {
        Self { bytes, pos: 0, order }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                DatasetError::MatFormat(format!(
                    "element of {} bytes overruns buffer at offset {}",
                    n, self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn next_element(&mut self) -> Result<Option<(u32, &'a [u8])>> {
        // Anything shorter than a tag is trailing padding
        if self.bytes.len() - self.pos < 8 {
            return Ok(None);
        }

        let word = self.take(4)?;
        let first = self.order.u32(word);
        if first >> 16 != 0 {
            let data_type = first & 0xffff;
            let len = (first >> 16) as usize;
            if len > 4 {
                return Err(DatasetError::MatFormat(format!(
                    "small element claims {len} bytes"
                )));
            }
            let data = self.take(4)?;
            return Ok(Some((data_type, &data[..len])));
        }

        let word = self.take(4)?;
        let len = self.order.u32(word) as usize;
        let data = self.take(len)?;
        if first != MI_COMPRESSED {
            let pad = (8 - len % 8) % 8;
            self.pos = (self.pos + pad).min(self.bytes.len());
        }
        Ok(Some((first, data)))
    }

    fn expect_element(&mut self, what: &str) -> Result<(u32, &'a [u8])> {
        self.next_element()?
            .ok_or_else(|| DatasetError::MatFormat(format!("missing {what}")))
    }
}

/// The variables of one MAT-file, in file order.
#[derive(Clone, Debug, Default)]
pub struct MatFile {
    variables: Vec<(String, MatValue)>,
}

impl MatFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        log::debug!("Parsing {} ({} bytes)", path.as_ref().display(), bytes.len());
        Self::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(DatasetError::MatFormat("file shorter than header".into()));
        }

        let order = match &bytes[126..128] {
            b"IM" => ByteOrder::Little,
            b"MI" => ByteOrder::Big,
            other => {
                return Err(DatasetError::MatFormat(format!(
                    "bad endian indicator {other:?}"
                )))
            }
        };

        let mut mat = MatFile::default();
        mat.read_elements(&bytes[HEADER_LEN..], order)?;
        Ok(mat)
    }

    fn read_elements(&mut self, bytes: &[u8], order: ByteOrder) -> Result<()> {
        let mut reader = ElementReader::new(bytes, order);
        while let Some((data_type, data)) = reader.next_element()? {
            match data_type {
                MI_MATRIX => self.variables.push(parse_matrix(data, order)?),
                MI_COMPRESSED => {
                    let mut inflated = Vec::new();
                    ZlibDecoder::new(data).read_to_end(&mut inflated)?;
                    self.read_elements(&inflated, order)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MatValue> {
        self.variables
            .iter()
            .find(|(var, _)| var == name)
            .map(|(_, value)| value)
    }

    fn require(&self, path: &Path, name: &str) -> Result<&MatValue> {
        self.get(name).ok_or_else(|| DatasetError::MissingVariable {
            path: PathBuf::from(path),
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| name.as_str())
    }
}

fn parse_matrix(bytes: &[u8], order: ByteOrder) -> Result<(String, MatValue)> {
    // Empty cells are written as zero-length miMATRIX elements
    if bytes.is_empty() {
        return Ok((
            String::new(),
            MatValue::Numeric {
                dims: vec![0, 0],
                data: Vec::new(),
            },
        ));
    }

    let mut reader = ElementReader::new(bytes, order);

    let (_, flags) = reader.expect_element("array flags")?;
    if flags.len() < 4 {
        return Err(DatasetError::MatFormat("short array flags".into()));
    }
    let class = (order.u32(flags) & 0xff) as u8;

    let (dims_type, dims_bytes) = reader.expect_element("dimensions")?;
    let dims: Vec<usize> = decode_numeric(dims_type, dims_bytes, order)?
        .into_iter()
        .map(|d| d as usize)
        .collect();
    let count = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| DatasetError::MatFormat(format!("dimensions {dims:?} overflow")))?;

    let (_, name_bytes) = reader.expect_element("array name")?;
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    let value = match class {
        MX_CELL => {
            // Every cell needs at least one 8-byte tag
            let mut cells = Vec::with_capacity(count.min(bytes.len() / 8));
            for _ in 0..count {
                let (data_type, data) = reader.expect_element("cell")?;
                if data_type != MI_MATRIX {
                    return Err(DatasetError::MatFormat(format!(
                        "cell of {name} has element type {data_type}"
                    )));
                }
                cells.push(parse_matrix(data, order)?.1);
            }
            MatValue::Cell { dims, cells }
        }
        MX_CHAR => {
            let rows = match reader.next_element()? {
                Some((MI_UTF8, data)) => utf8_rows(&dims, data),
                Some((data_type, data)) => char_rows(&dims, &decode_numeric(data_type, data, order)?),
                None => Vec::new(),
            };
            MatValue::Char { dims, rows }
        }
        MX_DOUBLE..=MX_UINT64 => {
            let data = match reader.next_element()? {
                Some((data_type, data)) => decode_numeric(data_type, data, order)?,
                None => Vec::new(),
            };
            if data.len() != count {
                return Err(DatasetError::MatFormat(format!(
                    "{name} has {} values for {count} elements",
                    data.len()
                )));
            }
            MatValue::Numeric { dims, data }
        }
        other => MatValue::Unsupported { class: other },
    };

    Ok((name, value))
}

// Char data is stored column-major as code units
fn char_rows(dims: &[usize], units: &[f64]) -> Vec<String> {
    let rows = dims.first().copied().unwrap_or(0);
    if rows == 0 {
        return Vec::new();
    }
    let cols = units.len() / rows;

    (0..rows)
        .map(|r| {
            let row_units = (0..cols).map(|c| units[c * rows + r] as u16);
            char::decode_utf16(row_units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        })
        .collect()
}

// UTF-8 rows are gathered column-major by byte, then decoded
fn utf8_rows(dims: &[usize], bytes: &[u8]) -> Vec<String> {
    let rows = dims.first().copied().unwrap_or(0);
    if rows == 0 {
        return Vec::new();
    }
    let cols = bytes.len() / rows;

    (0..rows)
        .map(|r| {
            let row: Vec<u8> = (0..cols).map(|c| bytes[c * rows + r]).collect();
            String::from_utf8_lossy(&row).into_owned()
        })
        .collect()
}

fn decode_numeric(data_type: u32, bytes: &[u8], order: ByteOrder) -> Result<Vec<f64>> {
    fn words<const N: usize>(bytes: &[u8], order: ByteOrder) -> impl Iterator<Item = [u8; N]> + '_ {
        bytes.chunks_exact(N).map(move |chunk| order.array::<N>(chunk))
    }

    let values: Vec<f64> = match data_type {
        MI_INT8 => bytes.iter().map(|&b| b as i8 as f64).collect(),
        MI_UINT8 => bytes.iter().map(|&b| b as f64).collect(),
        MI_INT16 => words::<2>(bytes, order).map(|w| i16::from_le_bytes(w) as f64).collect(),
        MI_UINT16 | MI_UTF16 => words::<2>(bytes, order).map(|w| u16::from_le_bytes(w) as f64).collect(),
        MI_INT32 => words::<4>(bytes, order).map(|w| i32::from_le_bytes(w) as f64).collect(),
        MI_UINT32 => words::<4>(bytes, order).map(|w| u32::from_le_bytes(w) as f64).collect(),
        MI_SINGLE => words::<4>(bytes, order).map(|w| f32::from_le_bytes(w) as f64).collect(),
        MI_DOUBLE => words::<8>(bytes, order).map(f64::from_le_bytes).collect(),
        MI_INT64 => words::<8>(bytes, order).map(|w| i64::from_le_bytes(w) as f64).collect(),
        MI_UINT64 => words::<8>(bytes, order).map(|w| u64::from_le_bytes(w) as f64).collect(),
        other => {
            return Err(DatasetError::MatFormat(format!(
                "unsupported data type {other}"
            )))
        }
    };
    Ok(values)
}

/// Encodes little-endian MAT-file bytes holding `variables`, used to build fixtures.
pub fn encode_mat_file(variables: &[(&str, MatValue)], compress: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut text = b"MATLAB 5.0 MAT-file, written by office_datasets".to_vec();
    text.resize(116, b' ');
    out.extend_from_slice(&text);
    out.extend_from_slice(&[0u8; 8]);
    out.extend_from_slice(&0x0100u16.to_le_bytes());
    out.extend_from_slice(b"IM");

    for (name, value) in variables {
        let matrix = encode_matrix(name, value);
        if compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&matrix)?;
            let compressed = encoder.finish()?;
            out.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
            out.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
            out.extend_from_slice(&compressed);
        } else {
            out.extend_from_slice(&matrix);
        }
    }
    Ok(out)
}

fn encode_element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out.resize(out.len() + (8 - data.len() % 8) % 8, 0);
}

fn encode_matrix(name: &str, value: &MatValue) -> Vec<u8> {
    let (class, dims) = match value {
        MatValue::Numeric { dims, .. } => (MX_DOUBLE, dims.clone()),
        MatValue::Char { dims, .. } => (MX_CHAR, dims.clone()),
        MatValue::Cell { dims, .. } => (MX_CELL, dims.clone()),
        MatValue::Unsupported { class } => (*class, vec![0, 0]),
    };

    let mut body = Vec::new();
    let flags: Vec<u8> = [class as u32, 0].iter().flat_map(|v| v.to_le_bytes()).collect();
    encode_element(&mut body, MI_UINT32, &flags);
    let dims_bytes: Vec<u8> = dims.iter().flat_map(|&d| (d as i32).to_le_bytes()).collect();
    encode_element(&mut body, MI_INT32, &dims_bytes);
    encode_element(&mut body, MI_INT8, name.as_bytes());

    match value {
        MatValue::Numeric { data, .. } => {
            let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
            encode_element(&mut body, MI_DOUBLE, &bytes);
        }
        MatValue::Char { dims, rows } => {
            let cols = dims.get(1).copied().unwrap_or(0);
            let units: Vec<Vec<u16>> = rows.iter().map(|row| row.encode_utf16().collect()).collect();
            let mut bytes = Vec::with_capacity(rows.len() * cols * 2);
            for c in 0..cols {
                for row in &units {
                    let unit = row.get(c).copied().unwrap_or(b' ' as u16);
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
            }
            encode_element(&mut body, MI_UINT16, &bytes);
        }
        MatValue::Cell { cells, .. } => {
            for cell in cells {
                body.extend_from_slice(&encode_matrix("", cell));
            }
        }
        MatValue::Unsupported { .. } => {}
    }

    let mut out = Vec::with_capacity(body.len() + 8);
    encode_element(&mut out, MI_MATRIX, &body);
    out
}
