//! MetaImage (`.mhd` / `.mha`) volume reader
//!
//! A MetaImage file is a plain-text header of `Key = Value` lines followed,
//! either in the same file (`ElementDataFile = LOCAL`) or in a separate raw
//! file, by uncompressed voxel data. Only single-channel 2-D and 3-D images
//! are supported, which covers the CT datasets the medical demos read.
//!
//! ```text
//! ObjectType = Image
//! NDims = 3
//! DimSize = 256 256 94
//! ElementSpacing = 0.9375 0.9375 1.5
//! ElementType = MET_SHORT
//! ElementByteOrderMSB = False
//! ElementDataFile = FullHead.raw
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::image_data::ImageData;
use crate::error::{Error, Result};

/// Voxel storage types understood by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    UChar,
    Char,
    UShort,
    Short,
    UInt,
    Int,
    Float,
    Double,
}

impl ElementType {
    fn parse(value: &str) -> Result<Self> {
        Ok(match value {
            "MET_UCHAR" => Self::UChar,
            "MET_CHAR" => Self::Char,
            "MET_USHORT" => Self::UShort,
            "MET_SHORT" => Self::Short,
            "MET_UINT" => Self::UInt,
            "MET_INT" => Self::Int,
            "MET_FLOAT" => Self::Float,
            "MET_DOUBLE" => Self::Double,
            other => return Err(Error::Unsupported(format!("element type {other}"))),
        })
    }

    pub fn size(self) -> usize {
        match self {
            Self::UChar | Self::Char => 1,
            Self::UShort | Self::Short => 2,
            Self::UInt | Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }

    fn decode(self, bytes: &[u8], big_endian: bool) -> f32 {
        macro_rules! read {
            ($t:ty) => {{
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                if big_endian {
                    <$t>::from_be_bytes(raw)
                } else {
                    <$t>::from_le_bytes(raw)
                }
            }};
        }
        match self {
            Self::UChar => bytes[0] as f32,
            Self::Char => bytes[0] as i8 as f32,
            Self::UShort => read!(u16) as f32,
            Self::Short => read!(i16) as f32,
            Self::UInt => read!(u32) as f32,
            Self::Int => read!(i32) as f32,
            Self::Float => read!(f32),
            Self::Double => read!(f64) as f32,
        }
    }
}

/// Where the voxel bytes live
#[derive(Debug, Clone, PartialEq)]
pub enum DataFile {
    /// Immediately after the header, in the same file
    Local,
    /// A separate file, resolved relative to the header's directory
    External(PathBuf),
}

/// Parsed MetaImage header
#[derive(Debug, Clone, PartialEq)]
pub struct MetaHeader {
    pub dimensions: [usize; 3],
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    pub element_type: ElementType,
    pub big_endian: bool,
    /// `None` means "read the trailing `count * size` bytes" (`HeaderSize = -1`)
    pub header_size: Option<usize>,
    pub data_file: DataFile,
}

impl MetaHeader {
    /// Parses header text
    ///
    /// Parsing stops at `ElementDataFile`, which must be the last key. The
    /// second value is the byte offset just past that line, where local data
    /// begins.
    pub fn parse(text: &str) -> Result<(Self, usize)> {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut data_offset = None;
        let mut consumed = 0;

        for line in text.split_inclusive('\n') {
            consumed += line.len();
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(Error::invalid("header line", trimmed));
            };
            let key = key.trim();
            let value = value.trim();
            fields.insert(key.to_owned(), value.to_owned());
            if key == "ElementDataFile" {
                data_offset = Some(consumed);
                break;
            }
        }

        let data_offset = data_offset.ok_or(Error::MissingKey("ElementDataFile"))?;
        let header = Self::from_fields(&fields)?;
        Ok((header, data_offset))
    }

    fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        for key in fields.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("ignoring MetaImage key {key}");
            }
        }

        if let Some(kind) = fields.get("ObjectType") {
            if !kind.eq_ignore_ascii_case("Image") {
                return Err(Error::Unsupported(format!("object type {kind}")));
            }
        }

        let ndims: usize = parse_scalar(fields, "NDims")?;
        if !(2..=3).contains(&ndims) {
            return Err(Error::Unsupported(format!("{ndims} dimensions")));
        }

        let channels: usize = match fields.get("ElementNumberOfChannels") {
            Some(v) => v
                .parse()
                .map_err(|_| Error::invalid("ElementNumberOfChannels", v))?,
            None => 1,
        };
        if channels != 1 {
            return Err(Error::Unsupported(format!("{channels} channels per voxel")));
        }

        if let Some(compressed) = fields.get("CompressedData") {
            if parse_bool("CompressedData", compressed)? {
                return Err(Error::Unsupported("compressed voxel data".to_owned()));
            }
        }

        let dim_size: Vec<usize> = parse_vector(fields, "DimSize", ndims)?
            .ok_or(Error::MissingKey("DimSize"))?;
        let mut dimensions = [1usize; 3];
        dimensions[..ndims].copy_from_slice(&dim_size);
        if dimensions.contains(&0) {
            return Err(Error::BadDimensions(dimensions));
        }

        let mut spacing = [1.0f64; 3];
        let spacing_values = match parse_vector::<f64>(fields, "ElementSpacing", ndims)? {
            Some(v) => Some(v),
            None => parse_vector::<f64>(fields, "ElementSize", ndims)?,
        };
        if let Some(values) = spacing_values {
            spacing[..ndims].copy_from_slice(&values);
        }

        let mut origin = [0.0f64; 3];
        for key in ["Offset", "Origin", "Position"] {
            if let Some(values) = parse_vector::<f64>(fields, key, ndims)? {
                origin[..ndims].copy_from_slice(&values);
                break;
            }
        }

        let element_type = ElementType::parse(
            fields
                .get("ElementType")
                .ok_or(Error::MissingKey("ElementType"))?,
        )?;

        let dim_text = fields.get("DimSize").map_or("", String::as_str);
        dimensions
            .iter()
            .try_fold(element_type.size(), |len, &n| len.checked_mul(n))
            .ok_or_else(|| Error::invalid("DimSize", dim_text))?;

        let big_endian = match fields
            .get("ElementByteOrderMSB")
            .or_else(|| fields.get("BinaryDataByteOrderMSB"))
        {
            Some(v) => parse_bool("ElementByteOrderMSB", v)?,
            None => false,
        };

        let header_size = match fields.get("HeaderSize") {
            None => Some(0),
            Some(v) => match v.parse::<i64>() {
                Ok(-1) => None,
                Ok(n) if n >= 0 => Some(n as usize),
                _ => return Err(Error::invalid("HeaderSize", v)),
            },
        };

        let data_file = match fields.get("ElementDataFile").map(String::as_str) {
            Some("LOCAL") | Some("Local") | Some("local") => DataFile::Local,
            Some(name) if name.starts_with("LIST") || name.contains('%') => {
                return Err(Error::Unsupported(format!("multi-file data {name}")));
            }
            Some(name) => DataFile::External(PathBuf::from(name)),
            None => return Err(Error::MissingKey("ElementDataFile")),
        };

        Ok(Self {
            dimensions,
            spacing,
            origin,
            element_type,
            big_endian,
            header_size,
            data_file,
        })
    }

    /// Saturates at `usize::MAX` for grids that cannot be addressed
    pub fn voxel_count(&self) -> usize {
        self.dimensions
            .iter()
            .fold(1usize, |count, &n| count.saturating_mul(n))
    }

    pub fn data_len(&self) -> usize {
        self.voxel_count().saturating_mul(self.element_type.size())
    }

    /// Decodes voxel bytes into an [`ImageData`]
    ///
    /// `bytes` starts where the header says data starts; `HeaderSize` is
    /// applied here.
    pub fn decode(&self, bytes: &[u8]) -> Result<ImageData> {
        let expected = self.data_len();
        let start = match self.header_size {
            Some(skip) => skip,
            None => bytes.len().saturating_sub(expected),
        };
        let available = bytes.len().saturating_sub(start);
        if start.checked_add(expected).is_none() || available < expected {
            return Err(Error::TruncatedData {
                expected,
                found: available,
            });
        }

        let size = self.element_type.size();
        let scalars = bytes[start..start + expected]
            .chunks_exact(size)
            .map(|chunk| self.element_type.decode(chunk, self.big_endian))
            .collect();

        ImageData::new(self.dimensions, self.spacing, self.origin, scalars)
    }
}

const KNOWN_KEYS: &[&str] = &[
    "ObjectType",
    "NDims",
    "DimSize",
    "ElementSpacing",
    "ElementSize",
    "Offset",
    "Origin",
    "Position",
    "ElementType",
    "ElementNumberOfChannels",
    "ElementByteOrderMSB",
    "BinaryDataByteOrderMSB",
    "BinaryData",
    "HeaderSize",
    "CompressedData",
    "ElementDataFile",
];

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::invalid(key, value)),
    }
}

fn parse_scalar<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    key: &'static str,
) -> Result<T> {
    let value = fields.get(key).ok_or(Error::MissingKey(key))?;
    value.parse().map_err(|_| Error::invalid(key, value))
}

fn parse_vector<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    key: &str,
    len: usize,
) -> Result<Option<Vec<T>>> {
    let Some(value) = fields.get(key) else {
        return Ok(None);
    };
    let parsed = value
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|_| Error::invalid(key, value))?;
    if parsed.len() != len {
        return Err(Error::invalid(key, value));
    }
    Ok(Some(parsed))
}

/// Reads a MetaImage volume from `path`
pub fn read(path: impl AsRef<Path>) -> Result<ImageData> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    // Only the header is text; local voxel bytes follow it directly
    let header_end = header_end(&bytes).ok_or(Error::MissingKey("ElementDataFile"))?;
    let text = String::from_utf8_lossy(&bytes[..header_end]);
    let (header, _) = MetaHeader::parse(&text)?;
    info!(
        "{}: {:?} {:?} voxels, spacing {:?}",
        path.display(),
        header.element_type,
        header.dimensions,
        header.spacing
    );

    let image = match &header.data_file {
        DataFile::Local => header.decode(&bytes[header_end..])?,
        DataFile::External(name) => {
            let data_path = path.parent().unwrap_or(Path::new(".")).join(name);
            let data = fs::read(&data_path).map_err(|e| Error::io(&data_path, e))?;
            header.decode(&data)?
        }
    };

    debug!("scalar range {:?}", image.scalar_range());
    Ok(image)
}

/// Byte offset just past the `ElementDataFile` line
fn header_end(bytes: &[u8]) -> Option<usize> {
    let mut offset = 0;
    for line in bytes.split_inclusive(|&b| b == b'\n') {
        offset += line.len();
        if line.trim_ascii_start().starts_with(b"ElementDataFile") {
            return Some(offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ObjectType = Image\n\
        NDims = 3\n\
        DimSize = 3 2 2\n\
        ElementSpacing = 0.5 0.5 2\n\
        Offset = 1 2 3\n\
        ElementType = MET_SHORT\n\
        ElementByteOrderMSB = False\n\
        ElementDataFile = LOCAL\n";

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("isoview-mha-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn short_bytes(values: &[i16], big_endian: bool) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| {
                if big_endian {
                    v.to_be_bytes()
                } else {
                    v.to_le_bytes()
                }
            })
            .collect()
    }

    #[test]
    fn test_parse_header() {
        let (header, offset) = MetaHeader::parse(HEADER).unwrap();
        assert_eq!(offset, HEADER.len());
        assert_eq!(header.dimensions, [3, 2, 2]);
        assert_eq!(header.spacing, [0.5, 0.5, 2.0]);
        assert_eq!(header.origin, [1.0, 2.0, 3.0]);
        assert_eq!(header.element_type, ElementType::Short);
        assert!(!header.big_endian);
        assert_eq!(header.data_file, DataFile::Local);
        assert_eq!(header.data_len(), 24);
    }

    #[test]
    fn test_two_dimensional_header_pads_z() {
        let text = "NDims = 2\nDimSize = 4 5\nElementType = MET_UCHAR\nElementDataFile = img.raw\n";
        let (header, _) = MetaHeader::parse(text).unwrap();
        assert_eq!(header.dimensions, [4, 5, 1]);
        assert_eq!(header.spacing, [1.0, 1.0, 1.0]);
        assert_eq!(header.data_file, DataFile::External(PathBuf::from("img.raw")));
    }

    #[test]
    fn test_header_errors() {
        let missing = "NDims = 3\nDimSize = 1 1 1\nElementDataFile = LOCAL\n";
        assert!(matches!(
            MetaHeader::parse(missing),
            Err(Error::MissingKey("ElementType"))
        ));

        let bad_dims = "NDims = 3\nDimSize = 1 1\nElementType = MET_SHORT\nElementDataFile = LOCAL\n";
        assert!(matches!(
            MetaHeader::parse(bad_dims),
            Err(Error::InvalidValue { .. })
        ));

        let rgb = "NDims = 3\nDimSize = 1 1 1\nElementType = MET_UCHAR\n\
            ElementNumberOfChannels = 3\nElementDataFile = LOCAL\n";
        assert!(matches!(MetaHeader::parse(rgb), Err(Error::Unsupported(_))));

        let zipped = "NDims = 3\nDimSize = 1 1 1\nElementType = MET_UCHAR\n\
            CompressedData = True\nElementDataFile = LOCAL\n";
        assert!(matches!(MetaHeader::parse(zipped), Err(Error::Unsupported(_))));

        assert!(matches!(
            MetaHeader::parse("NDims = 3\n"),
            Err(Error::MissingKey("ElementDataFile"))
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let text = "NDims = 3\nDimSize = 4294967296 4294967296 4294967296\n\
            ElementType = MET_SHORT\nElementDataFile = LOCAL\n";
        match MetaHeader::parse(text) {
            Err(Error::InvalidValue { key, .. }) => assert_eq!(key, "DimSize"),
            other => panic!("expected an invalid DimSize, got {other:?}"),
        }

        // Grid fits but its byte length does not
        let text = format!(
            "NDims = 3\nDimSize = {} 2 1\nElementType = MET_DOUBLE\nElementDataFile = LOCAL\n",
            usize::MAX / 2
        );
        assert!(matches!(
            MetaHeader::parse(&text),
            Err(Error::InvalidValue { .. })
        ));

        let (mut header, _) = MetaHeader::parse(HEADER).unwrap();
        header.dimensions = [1 << 32, 1 << 32, 1 << 32];
        assert_eq!(header.data_len(), usize::MAX);
        assert!(matches!(
            header.decode(&[0; 16]),
            Err(Error::TruncatedData { found: 16, .. })
        ));
    }

    #[test]
    fn test_decode_big_endian_and_truncation() {
        let text = "NDims = 3\nDimSize = 2 1 1\nElementType = MET_SHORT\n\
            ElementByteOrderMSB = True\nElementDataFile = LOCAL\n";
        let (header, _) = MetaHeader::parse(text).unwrap();
        let image = header.decode(&short_bytes(&[-2, 1150], true)).unwrap();
        assert_eq!(image.scalars(), &[-2.0, 1150.0]);

        assert!(matches!(
            header.decode(&[0, 1, 2]),
            Err(Error::TruncatedData {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_header_size_minus_one_reads_trailing_bytes() {
        let text = "NDims = 3\nDimSize = 2 1 1\nElementType = MET_UCHAR\n\
            HeaderSize = -1\nElementDataFile = data.raw\n";
        let (header, _) = MetaHeader::parse(text).unwrap();
        let image = header.decode(&[9, 9, 9, 7, 8]).unwrap();
        assert_eq!(image.scalars(), &[7.0, 8.0]);
    }

    #[test]
    fn test_read_local_file() {
        let path = temp_path("local.mha");
        let values: Vec<i16> = (0..12).map(|v| v * 100).collect();
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend(short_bytes(&values, false));
        fs::write(&path, bytes).unwrap();

        let image = read(&path).unwrap();
        assert_eq!(image.dimensions(), [3, 2, 2]);
        assert_eq!(image.value(2, 1, 1), 1100.0);
        assert_eq!(image.point(0, 0, 1), [1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_read_external_file() {
        let header_path = temp_path("external.mhd");
        let data_path = temp_path("external.raw");
        fs::write(
            &header_path,
            "NDims = 3\nDimSize = 2 2 1\nElementType = MET_FLOAT\nElementDataFile = external.raw\n",
        )
        .unwrap();
        let data: Vec<u8> = [0.5f32, 1.5, 2.5, 3.5]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        fs::write(&data_path, data).unwrap();

        let image = read(&header_path).unwrap();
        assert_eq!(image.scalars(), &[0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read(temp_path("does-not-exist.mhd")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
