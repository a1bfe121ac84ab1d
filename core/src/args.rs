//! args.rs
//! Host-neutral argument model and arity/type validation.
//!
//! Host bindings translate their own values into `HostValue` and hand the
//! positional list to the dispatcher. Every check here runs before any codec call.

use std::borrow::Cow;

use crate::dictionary::{CompressionDictionary, DecompressionDictionary, DictionaryKind};
use crate::types::{BindError, BindResult};

/// One positional argument as seen from the host.
#[derive(Clone, Debug)]
pub enum HostValue<'a> {
    Bytes(Cow<'a, [u8]>),
    Int(i64),
    Float(f64),
    CompressionDict(CompressionDictionary),
    DecompressionDict(DecompressionDictionary),
    /// A dictionary handle whose resource was already released.
    Released(DictionaryKind),
    /// Any other host value, by type name.
    Other(String),
}

impl HostValue<'_> {
    pub fn type_name(&self) -> String {
        match self {
            HostValue::Bytes(_)             => "bytes".into(),
            HostValue::Int(_)               => "int".into(),
            HostValue::Float(_)             => "float".into(),
            HostValue::CompressionDict(_)   => "compression dictionary".into(),
            HostValue::DecompressionDict(_) => "decompression dictionary".into(),
            HostValue::Released(kind)       => format!("released {}", kind),
            HostValue::Other(name)          => name.clone(),
        }
    }
}

impl<'a> From<&'a [u8]> for HostValue<'a> {
    fn from(b: &'a [u8]) -> Self {
        HostValue::Bytes(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for HostValue<'static> {
    fn from(b: Vec<u8>) -> Self {
        HostValue::Bytes(Cow::Owned(b))
    }
}

impl From<i64> for HostValue<'static> {
    fn from(n: i64) -> Self {
        HostValue::Int(n)
    }
}

impl From<CompressionDictionary> for HostValue<'static> {
    fn from(d: CompressionDictionary) -> Self {
        HostValue::CompressionDict(d)
    }
}

impl From<DecompressionDictionary> for HostValue<'static> {
    fn from(d: DecompressionDictionary) -> Self {
        HostValue::DecompressionDict(d)
    }
}

/// Second argument of compress: a level or a compression dictionary, never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompressOption {
    Level(i32),
    Dictionary(CompressionDictionary),
}

pub struct CompressRequest<'a> {
    pub data: &'a [u8],
    /// `None` means "use the configured default level".
    pub option: Option<CompressOption>,
}

pub struct DecompressRequest<'a> {
    pub data: &'a [u8],
    pub dict: Option<DecompressionDictionary>,
}

pub struct CompressionDictRequest<'a> {
    pub bytes: &'a [u8],
    pub level: Option<i32>,
}

pub struct DecompressionDictRequest<'a> {
    pub bytes: &'a [u8],
}

/// compress(data, levelOrDict?)
pub fn parse_compress<'a>(args: &'a [HostValue<'_>]) -> BindResult<CompressRequest<'a>> {
    check_arity(args, 1, 2)?;
    let data = expect_bytes(&args[0], "first argument must be bytes: data to compress")?;

    let option = match args.get(1) {
        None => None,
        Some(HostValue::Int(n)) => Some(CompressOption::Level(level_from(*n)?)),
        Some(HostValue::CompressionDict(d)) => Some(CompressOption::Dictionary(d.clone())),
        Some(HostValue::Released(kind)) => return Err(released(*kind)),
        Some(other) => {
            return Err(BindError::argument(format!(
                "second argument must be either a compression level or a compression dictionary, got {}",
                other.type_name()
            )));
        }
    };

    Ok(CompressRequest { data, option })
}

/// decompress(data, dict?)
pub fn parse_decompress<'a>(args: &'a [HostValue<'_>]) -> BindResult<DecompressRequest<'a>> {
    check_arity(args, 1, 2)?;
    let data = expect_bytes(&args[0], "first argument must be bytes: data to decompress")?;

    let dict = match args.get(1) {
        None => None,
        Some(HostValue::DecompressionDict(d)) => Some(d.clone()),
        Some(HostValue::Released(kind)) => return Err(released(*kind)),
        Some(other) => {
            return Err(BindError::argument(format!(
                "second argument is an optional decompression dictionary, got {}",
                other.type_name()
            )));
        }
    };

    Ok(DecompressRequest { data, dict })
}

/// createCompressionDictionary(dictBytes, level?)
pub fn parse_compression_dict<'a>(args: &'a [HostValue<'_>]) -> BindResult<CompressionDictRequest<'a>> {
    check_arity(args, 1, 2)?;
    let bytes = expect_bytes(&args[0], "first argument must be bytes: dictionary")?;

    let level = match args.get(1) {
        None => None,
        Some(HostValue::Int(n)) => Some(level_from(*n)?),
        Some(other) => {
            return Err(BindError::argument(format!(
                "second argument must be an integer compression level, got {}",
                other.type_name()
            )));
        }
    };

    Ok(CompressionDictRequest { bytes, level })
}

/// createDecompressionDictionary(dictBytes)
pub fn parse_decompression_dict<'a>(args: &'a [HostValue<'_>]) -> BindResult<DecompressionDictRequest<'a>> {
    check_arity(args, 1, 1)?;
    let bytes = expect_bytes(&args[0], "first argument must be bytes: dictionary")?;
    Ok(DecompressionDictRequest { bytes })
}

fn check_arity(args: &[HostValue<'_>], min: usize, max: usize) -> BindResult<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else {
            format!("{} or {}", min, max)
        };
        return Err(BindError::argument(format!(
            "wrong number of arguments: expected {}, got {}",
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn expect_bytes<'a>(value: &'a HostValue<'_>, msg: &str) -> BindResult<&'a [u8]> {
    match value {
        HostValue::Bytes(b) => Ok(b.as_ref()),
        other => Err(BindError::argument(format!("{}, got {}", msg, other.type_name()))),
    }
}

fn level_from(n: i64) -> BindResult<i32> {
    i32::try_from(n)
        .map_err(|_| BindError::argument(format!("compression level {} is out of range", n)))
}

fn released(kind: DictionaryKind) -> BindError {
    BindError::argument(format!("{} has been released", kind))
}
