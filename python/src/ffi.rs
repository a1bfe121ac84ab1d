//! ffi.rs
//! Python surface: value marshalling, handle classes, exception mapping.
//!
//! Notes:
//! - Positional arguments are turned into `HostValue`s; all arity and type rules live in core.
//! - Byte inputs are borrowed from `bytes` objects and copied only for `bytearray`.
//! - The GIL is released while the codec runs.

use std::borrow::Cow;
use std::sync::OnceLock;

use parking_lot::Mutex;
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyMemoryError, PyTypeError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyByteArray, PyBytes, PyDict, PyFloat, PyInt, PyTuple};
use tracing::debug;

use zbind_core::constants::{CODEC_NAME, DEFAULT_DICT_CAPACITY};
use zbind_core::dictionary::{train_dictionary as train, DictionaryKind};
use zbind_core::prelude::*;
use zbind_core::sizing::bound_for;

create_exception!(zbind, ZbindError, PyException);
create_exception!(zbind, CodecError, ZbindError);
create_exception!(zbind, UnsupportedError, ZbindError);

/// Process-wide dispatcher behind the module-level functions.
static DEFAULT_DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

fn default_dispatcher() -> PyResult<&'static Dispatcher> {
    if let Some(d) = DEFAULT_DISPATCHER.get() {
        return Ok(d);
    }
    let d = Dispatcher::new().map_err(to_py_err)?;
    Ok(DEFAULT_DISPATCHER.get_or_init(|| d))
}

fn to_py_err(e: BindError) -> PyErr {
    let msg = e.to_string();
    match e.kind() {
        ErrorKind::Argument    => PyTypeError::new_err(msg),
        ErrorKind::Codec       => CodecError::new_err(msg),
        ErrorKind::Unsupported => UnsupportedError::new_err(msg),
        ErrorKind::Allocation  => PyMemoryError::new_err(msg),
    }
}

// -----------------------------------------------------------------------------
// Handle classes
// -----------------------------------------------------------------------------

/// Opaque compression dictionary. Pass it as the second argument of `compress`.
#[pyclass(name = "CompressionDict", module = "zbind", frozen)]
pub struct PyCompressionDict {
    handle: Mutex<Option<CompressionDictionary>>,
}

/// Opaque decompression dictionary. Pass it as the second argument of `decompress`.
#[pyclass(name = "DecompressionDict", module = "zbind", frozen)]
pub struct PyDecompressionDict {
    handle: Mutex<Option<DecompressionDictionary>>,
}

#[pymethods]
impl PyCompressionDict {
    /// Drop this object's reference to the codec dictionary.
    /// Returns True if the dictionary memory was freed.
    fn release(&self) -> bool {
        self.handle.lock().take().map(|h| h.release()).unwrap_or(false)
    }

    #[getter]
    fn released(&self) -> bool {
        self.handle.lock().is_none()
    }

    #[getter]
    fn dict_id(&self) -> Option<u32> {
        self.handle.lock().as_ref().and_then(|h| h.dict_id())
    }

    #[getter]
    fn level(&self) -> Option<i32> {
        self.handle.lock().as_ref().map(|h| h.level())
    }

    fn __repr__(&self) -> String {
        match self.handle.lock().as_ref() {
            Some(h) => format!("CompressionDict(dict_id={:?}, level={}, len={})", h.dict_id(), h.level(), h.source_len()),
            None => "CompressionDict(released)".to_string(),
        }
    }
}

#[pymethods]
impl PyDecompressionDict {
    /// Drop this object's reference to the codec dictionary.
    /// Returns True if the dictionary memory was freed.
    fn release(&self) -> bool {
        self.handle.lock().take().map(|h| h.release()).unwrap_or(false)
    }

    #[getter]
    fn released(&self) -> bool {
        self.handle.lock().is_none()
    }

    #[getter]
    fn dict_id(&self) -> Option<u32> {
        self.handle.lock().as_ref().and_then(|h| h.dict_id())
    }

    fn __repr__(&self) -> String {
        match self.handle.lock().as_ref() {
            Some(h) => format!("DecompressionDict(dict_id={:?}, len={})", h.dict_id(), h.source_len()),
            None => "DecompressionDict(released)".to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Marshalling
// -----------------------------------------------------------------------------

fn host_value<'a>(obj: &'a Bound<'_, PyAny>) -> PyResult<HostValue<'a>> {
    if let Ok(b) = obj.downcast::<PyBytes>() {
        return Ok(HostValue::Bytes(Cow::Borrowed(b.as_bytes())));
    }
    if let Ok(b) = obj.downcast::<PyByteArray>() {
        return Ok(HostValue::Bytes(Cow::Owned(b.to_vec())));
    }
    // bool is an int subclass in Python; it is not a level.
    if obj.is_instance_of::<PyBool>() {
        return Ok(HostValue::Other("bool".into()));
    }
    if obj.is_instance_of::<PyInt>() {
        return Ok(match obj.extract::<i64>() {
            Ok(n) => HostValue::Int(n),
            Err(_) => HostValue::Other("int outside 64-bit range".into()),
        });
    }
    if obj.is_instance_of::<PyFloat>() {
        return Ok(HostValue::Float(obj.extract::<f64>()?));
    }
    if let Ok(d) = obj.downcast::<PyCompressionDict>() {
        return Ok(match d.get().handle.lock().clone() {
            Some(h) => HostValue::CompressionDict(h),
            None => HostValue::Released(DictionaryKind::Compression),
        });
    }
    if let Ok(d) = obj.downcast::<PyDecompressionDict>() {
        return Ok(match d.get().handle.lock().clone() {
            Some(h) => HostValue::DecompressionDict(h),
            None => HostValue::Released(DictionaryKind::Decompression),
        });
    }

    let name = obj.get_type().name().map(|n| n.to_string()).unwrap_or_else(|_| "object".into());
    Ok(HostValue::Other(name))
}

fn host_values<'a>(items: &'a [Bound<'_, PyAny>]) -> PyResult<Vec<HostValue<'a>>> {
    items.iter().map(|o| host_value(o)).collect()
}

// -----------------------------------------------------------------------------
// Operations shared by module functions and `Codec`
// -----------------------------------------------------------------------------

fn run_compress<'py>(py: Python<'py>, d: &Dispatcher, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
    let items: Vec<Bound<'py, PyAny>> = args.iter().collect();
    let values = host_values(&items)?;
    let out = py.allow_threads(|| d.compress_args(&values)).map_err(to_py_err)?;
    Ok(PyBytes::new_bound(py, &out))
}

fn run_decompress<'py>(py: Python<'py>, d: &Dispatcher, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
    let items: Vec<Bound<'py, PyAny>> = args.iter().collect();
    let values = host_values(&items)?;
    let out = py.allow_threads(|| d.decompress_args(&values)).map_err(to_py_err)?;
    Ok(PyBytes::new_bound(py, &out))
}

fn run_create_cdict(py: Python<'_>, d: &Dispatcher, args: &Bound<'_, PyTuple>) -> PyResult<PyCompressionDict> {
    let items: Vec<Bound<'_, PyAny>> = args.iter().collect();
    let values = host_values(&items)?;
    let handle = py
        .allow_threads(|| d.create_compression_dictionary_args(&values))
        .map_err(to_py_err)?;
    Ok(PyCompressionDict { handle: Mutex::new(Some(handle)) })
}

fn run_create_ddict(py: Python<'_>, d: &Dispatcher, args: &Bound<'_, PyTuple>) -> PyResult<PyDecompressionDict> {
    let items: Vec<Bound<'_, PyAny>> = args.iter().collect();
    let values = host_values(&items)?;
    let handle = py
        .allow_threads(|| d.create_decompression_dictionary_args(&values))
        .map_err(to_py_err)?;
    Ok(PyDecompressionDict { handle: Mutex::new(Some(handle)) })
}

fn stats_dict<'py>(py: Python<'py>, d: &Dispatcher) -> PyResult<Bound<'py, PyDict>> {
    let s = d.stats();
    let dict = PyDict::new_bound(py);
    dict.set_item("compress_calls", s.compress_calls)?;
    dict.set_item("decompress_calls", s.decompress_calls)?;
    dict.set_item("cdicts_built", s.cdicts_built)?;
    dict.set_item("ddicts_built", s.ddicts_built)?;
    dict.set_item("bytes_compress_in", s.bytes_compress_in)?;
    dict.set_item("bytes_compress_out", s.bytes_compress_out)?;
    dict.set_item("bytes_decompress_in", s.bytes_decompress_in)?;
    dict.set_item("bytes_decompress_out", s.bytes_decompress_out)?;
    dict.set_item("argument_errors", s.argument_errors)?;
    dict.set_item("codec_errors", s.codec_errors)?;
    dict.set_item("unsupported_errors", s.unsupported_errors)?;
    dict.set_item("allocation_errors", s.allocation_errors)?;
    dict.set_item("compression_ratio", s.compression_ratio)?;
    Ok(dict)
}

// -----------------------------------------------------------------------------
// Codec: a dispatcher owned by Python code instead of the process
// -----------------------------------------------------------------------------

/// Independent pair of codec contexts with its own policy and counters.
#[pyclass(name = "Codec", module = "zbind", frozen)]
pub struct PyCodec {
    dispatcher: Dispatcher,
}

#[pymethods]
impl PyCodec {
    #[new]
    #[pyo3(signature = (default_level = None, max_decompressed_size = None))]
    fn new(default_level: Option<i32>, max_decompressed_size: Option<usize>) -> PyResult<Self> {
        let mut config = BindConfig::default();
        if let Some(level) = default_level {
            config = config.with_default_level(level);
        }
        if let Some(max) = max_decompressed_size {
            config = config.with_max_decompressed_size(max);
        }
        let dispatcher = Dispatcher::with_config(config).map_err(to_py_err)?;
        Ok(Self { dispatcher })
    }

    #[pyo3(signature = (*args))]
    fn compress<'py>(&self, py: Python<'py>, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
        run_compress(py, &self.dispatcher, args)
    }

    #[pyo3(signature = (*args))]
    fn decompress<'py>(&self, py: Python<'py>, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
        run_decompress(py, &self.dispatcher, args)
    }

    #[pyo3(signature = (*args))]
    fn create_cdict(&self, py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<PyCompressionDict> {
        run_create_cdict(py, &self.dispatcher, args)
    }

    #[pyo3(signature = (*args))]
    fn create_ddict(&self, py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<PyDecompressionDict> {
        run_create_ddict(py, &self.dispatcher, args)
    }

    fn stats<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        stats_dict(py, &self.dispatcher)
    }
}

// -----------------------------------------------------------------------------
// Module functions
// -----------------------------------------------------------------------------

/// compress(data, level_or_dict=None) -> bytes
#[pyfunction]
#[pyo3(signature = (*args))]
fn compress<'py>(py: Python<'py>, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
    run_compress(py, default_dispatcher()?, args)
}

/// decompress(data, ddict=None) -> bytes
#[pyfunction]
#[pyo3(signature = (*args))]
fn decompress<'py>(py: Python<'py>, args: &Bound<'py, PyTuple>) -> PyResult<Bound<'py, PyBytes>> {
    run_decompress(py, default_dispatcher()?, args)
}

/// create_cdict(dict_bytes, level=1) -> CompressionDict
#[pyfunction]
#[pyo3(signature = (*args))]
fn create_cdict(py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<PyCompressionDict> {
    run_create_cdict(py, default_dispatcher()?, args)
}

/// create_ddict(dict_bytes) -> DecompressionDict
#[pyfunction]
#[pyo3(signature = (*args))]
fn create_ddict(py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<PyDecompressionDict> {
    run_create_ddict(py, default_dispatcher()?, args)
}

/// train_dictionary(samples, capacity=None) -> bytes
#[pyfunction]
#[pyo3(signature = (samples, capacity = None))]
fn train_dictionary<'py>(py: Python<'py>, samples: Vec<Vec<u8>>, capacity: Option<usize>) -> PyResult<Bound<'py, PyBytes>> {
    let capacity = capacity.unwrap_or(DEFAULT_DICT_CAPACITY);
    let dict = py.allow_threads(|| train(&samples, capacity)).map_err(to_py_err)?;
    Ok(PyBytes::new_bound(py, &dict))
}

#[pyfunction]
fn compress_bound(n: usize) -> usize {
    bound_for(n)
}

#[pyfunction]
fn min_level() -> i32 {
    *zbind_core::level_range().start()
}

#[pyfunction]
fn max_level() -> i32 {
    *zbind_core::level_range().end()
}

#[pyfunction]
fn stats(py: Python<'_>) -> PyResult<Bound<'_, PyDict>> {
    stats_dict(py, default_dispatcher()?)
}

pub fn register(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCompressionDict>()?;
    m.add_class::<PyDecompressionDict>()?;
    m.add_class::<PyCodec>()?;
    m.add("CODEC", CODEC_NAME)?;

    m.add("ZbindError", py.get_type_bound::<ZbindError>())?;
    m.add("CodecError", py.get_type_bound::<CodecError>())?;
    m.add("UnsupportedError", py.get_type_bound::<UnsupportedError>())?;

    m.add_function(wrap_pyfunction!(compress, m)?)?;
    m.add_function(wrap_pyfunction!(decompress, m)?)?;
    m.add_function(wrap_pyfunction!(create_cdict, m)?)?;
    m.add_function(wrap_pyfunction!(create_ddict, m)?)?;
    m.add_function(wrap_pyfunction!(train_dictionary, m)?)?;
    m.add_function(wrap_pyfunction!(compress_bound, m)?)?;
    m.add_function(wrap_pyfunction!(min_level, m)?)?;
    m.add_function(wrap_pyfunction!(max_level, m)?)?;
    m.add_function(wrap_pyfunction!(stats, m)?)?;

    debug!("registered zbind module");
    Ok(())
}
