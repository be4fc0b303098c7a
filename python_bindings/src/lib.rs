use std::sync::{Mutex, OnceLock};

use ndarray::ArrayD;
use numpy::{IntoPyArray, PyArray1, PyArrayDyn, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyAttributeError, PyIndexError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat, PyInt, PyTuple};
use stochast_core::models::{self, Variable};
use stochast_core::stats::{self, Family};
use stochast_core::{Error, RandomState, Shape, Value};

// ── Random state ────────────────────────────────────────────────────

/// The module's generator. Seeded from entropy until `set_seed` is called.
static RNG: OnceLock<Mutex<RandomState>> = OnceLock::new();

fn with_rng<T>(f: impl FnOnce(&mut RandomState) -> T) -> T {
    let lock = RNG.get_or_init(|| Mutex::new(RandomState::from_entropy()));
    // A panic while sampling leaves the generator usable.
    let mut rng = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut rng)
}

#[pyfunction]
fn set_seed(seed: u64) {
    with_rng(|rng| rng.set_seed(seed));
}

// ── Conversions ─────────────────────────────────────────────────────

fn py_err(err: Error) -> PyErr {
    match err {
        Error::Index { .. } => PyIndexError::new_err(err.to_string()),
        Error::Shape(_) | Error::Domain { .. } => PyValueError::new_err(err.to_string()),
    }
}

/// Python float/int, numpy array or (nested) list to a [`Value`].
fn to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_instance_of::<PyFloat>() || obj.is_instance_of::<PyInt>() {
        return Ok(Value::from(obj.extract::<f64>()?));
    }
    let numpy = PyModule::import(obj.py(), "numpy")?;
    let array = numpy.call_method1("asarray", (obj, "float64"))?;
    let array: PyReadonlyArrayDyn<'_, f64> = array.extract()?;
    Ok(Value::from(array.as_array().to_owned()))
}

fn to_values(args: &Bound<'_, PyTuple>) -> PyResult<Vec<Value>> {
    args.iter().map(|a| to_value(&a)).collect()
}

/// An int `n` is the shape `(n,)`; otherwise any sequence of ints.
fn to_shape(obj: &Bound<'_, PyAny>) -> PyResult<Shape> {
    if let Ok(n) = obj.extract::<usize>() {
        return Ok(Shape::new(vec![n]));
    }
    let dims: Vec<usize> = obj.extract()?;
    Ok(Shape::new(dims))
}

fn to_index(obj: &Bound<'_, PyAny>) -> PyResult<Vec<usize>> {
    if let Ok(i) = obj.extract::<usize>() {
        return Ok(vec![i]);
    }
    obj.extract()
}

// ── Stats surface by family name ────────────────────────────────────

/// Run `$body` with `$F` bound to the family named `$name`.
macro_rules! with_family {
    ($name:expr, $F:ident => $body:expr) => {
        match $name {
            "bernoulli" => {
                type $F = stats::Bernoulli;
                $body
            }
            "beta" => {
                type $F = stats::Beta;
                $body
            }
            "expon" => {
                type $F = stats::Expon;
                $body
            }
            "gamma" => {
                type $F = stats::Gamma;
                $body
            }
            "invgamma" => {
                type $F = stats::InvGamma;
                $body
            }
            "lognorm" => {
                type $F = stats::LogNorm;
                $body
            }
            "norm" => {
                type $F = stats::Norm;
                $body
            }
            "poisson" => {
                type $F = stats::Poisson;
                $body
            }
            "t" => {
                type $F = stats::StudentT;
                $body
            }
            "uniform" => {
                type $F = stats::Uniform;
                $body
            }
            other => Err(PyValueError::new_err(format!(
                "unknown distribution family '{}'",
                other
            ))),
        }
    };
}

#[derive(Debug, Clone, Copy)]
enum Eval {
    LogPdf,
    Pdf,
    Cdf,
    LogCdf,
}

fn evaluate<F: Family>(which: Eval, x: Value, params: &[Value]) -> PyResult<ArrayD<f64>> {
    match which {
        Eval::LogPdf => stats::logpdf::<F>(x, params),
        Eval::Pdf => stats::pdf::<F>(x, params),
        Eval::Cdf => stats::cdf::<F>(x, params),
        Eval::LogCdf => stats::logcdf::<F>(x, params),
    }
    .map_err(py_err)
}

fn elementwise<'py>(
    py: Python<'py>,
    which: Eval,
    family: &str,
    x: &Bound<'py, PyAny>,
    params: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let x = to_value(x)?;
    let params = to_values(params)?;
    let out = with_family!(family, F => evaluate::<F>(which, x, &params))?;
    Ok(out.into_pyarray(py))
}

/// `rvs(family, *params, size=1)`: array of shape `(size,) + broadcast(params)`.
#[pyfunction]
#[pyo3(signature = (family, *params, size=1))]
fn rvs<'py>(
    py: Python<'py>,
    family: &str,
    params: &Bound<'py, PyTuple>,
    size: usize,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    let params = to_values(params)?;
    let out = with_family!(family, F => with_rng(|rng| stats::rvs::<F, _>(&params, size, rng)).map_err(py_err))?;
    Ok(out.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (family, x, *params))]
fn logpdf<'py>(
    py: Python<'py>,
    family: &str,
    x: &Bound<'py, PyAny>,
    params: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    elementwise(py, Eval::LogPdf, family, x, params)
}

#[pyfunction]
#[pyo3(signature = (family, x, *params))]
fn pdf<'py>(
    py: Python<'py>,
    family: &str,
    x: &Bound<'py, PyAny>,
    params: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    elementwise(py, Eval::Pdf, family, x, params)
}

#[pyfunction]
#[pyo3(signature = (family, x, *params))]
fn cdf<'py>(
    py: Python<'py>,
    family: &str,
    x: &Bound<'py, PyAny>,
    params: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    elementwise(py, Eval::Cdf, family, x, params)
}

#[pyfunction]
#[pyo3(signature = (family, x, *params))]
fn logcdf<'py>(
    py: Python<'py>,
    family: &str,
    x: &Bound<'py, PyAny>,
    params: &Bound<'py, PyTuple>,
) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
    elementwise(py, Eval::LogCdf, family, x, params)
}

// ── Random variables ────────────────────────────────────────────────

/// A random variable of any family, with a declared shape.
#[pyclass(name = "RandomVariable", frozen)]
struct PyRandomVariable {
    inner: Box<dyn Variable>,
}

impl PyRandomVariable {
    fn wrap(rv: stochast_core::Result<impl Variable + 'static>) -> PyResult<Self> {
        Ok(Self {
            inner: Box::new(rv.map_err(py_err)?),
        })
    }
}

#[pymethods]
impl PyRandomVariable {
    #[pyo3(signature = (n=1))]
    fn sample<'py>(&self, py: Python<'py>, n: usize) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        let draws = py
            .allow_threads(|| with_rng(|rng| self.inner.sample_dyn(n, rng)))
            .map_err(py_err)?;
        Ok(draws.into_pyarray(py))
    }

    fn log_prob<'py>(&self, py: Python<'py>, x: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let lp = self.inner.log_prob(to_value(x)?).map_err(py_err)?;
        Ok(lp.into_pyarray(py))
    }

    fn log_prob_idx<'py>(
        &self,
        py: Python<'py>,
        idx: &Bound<'py, PyAny>,
        x: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let idx = to_index(idx)?;
        let lp = self.inner.log_prob_idx(&idx, to_value(x)?).map_err(py_err)?;
        Ok(lp.into_pyarray(py))
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[getter]
    fn shape<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyTuple>> {
        PyTuple::new(py, self.inner.shape().dims().iter().copied())
    }

    /// Parameters by name, each broadcast to `shape`.
    #[getter]
    fn params<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for &name in self.inner.param_names() {
            if let Some(value) = self.inner.param(name) {
                dict.set_item(name, value.clone().into_pyarray(py))?;
            }
        }
        Ok(dict)
    }

    /// Read-only access to a parameter by name, e.g. `rv.alpha`.
    fn __getattr__<'py>(&self, py: Python<'py>, name: &str) -> PyResult<Bound<'py, PyArrayDyn<f64>>> {
        match self.inner.param(name) {
            Some(value) => Ok(value.clone().into_pyarray(py)),
            None => Err(PyAttributeError::new_err(format!(
                "'{}' random variable has no attribute '{}'",
                self.inner.name(),
                name
            ))),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "{}(shape={}, params=[{}])",
            self.inner.name(),
            self.inner.shape(),
            self.inner.param_names().join(", ")
        )
    }
}

#[pyfunction]
#[pyo3(name = "Beta", signature = (shape, a, b))]
fn beta(shape: &Bound<'_, PyAny>, a: &Bound<'_, PyAny>, b: &Bound<'_, PyAny>) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Beta::new(to_shape(shape)?, to_value(a)?, to_value(b)?))
}

#[pyfunction]
#[pyo3(name = "InvGamma", signature = (shape, alpha, beta))]
fn inv_gamma(
    shape: &Bound<'_, PyAny>,
    alpha: &Bound<'_, PyAny>,
    beta: &Bound<'_, PyAny>,
) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::InvGamma::new(to_shape(shape)?, to_value(alpha)?, to_value(beta)?))
}

#[pyfunction]
#[pyo3(name = "Uniform", signature = (shape, loc, scale))]
fn uniform(
    shape: &Bound<'_, PyAny>,
    loc: &Bound<'_, PyAny>,
    scale: &Bound<'_, PyAny>,
) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Uniform::new(to_shape(shape)?, to_value(loc)?, to_value(scale)?))
}

#[pyfunction]
#[pyo3(name = "Normal", signature = (shape, loc, scale))]
fn normal(
    shape: &Bound<'_, PyAny>,
    loc: &Bound<'_, PyAny>,
    scale: &Bound<'_, PyAny>,
) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Normal::new(to_shape(shape)?, to_value(loc)?, to_value(scale)?))
}

#[pyfunction]
#[pyo3(name = "Gamma", signature = (shape, alpha, beta))]
fn gamma(
    shape: &Bound<'_, PyAny>,
    alpha: &Bound<'_, PyAny>,
    beta: &Bound<'_, PyAny>,
) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Gamma::new(to_shape(shape)?, to_value(alpha)?, to_value(beta)?))
}

#[pyfunction]
#[pyo3(name = "Exponential", signature = (shape, scale))]
fn exponential(shape: &Bound<'_, PyAny>, scale: &Bound<'_, PyAny>) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Exponential::new(to_shape(shape)?, to_value(scale)?))
}

#[pyfunction]
#[pyo3(name = "Bernoulli", signature = (shape, p))]
fn bernoulli(shape: &Bound<'_, PyAny>, p: &Bound<'_, PyAny>) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Bernoulli::new(to_shape(shape)?, to_value(p)?))
}

#[pyfunction]
#[pyo3(name = "Poisson", signature = (shape, lam))]
fn poisson(shape: &Bound<'_, PyAny>, lam: &Bound<'_, PyAny>) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::Poisson::new(to_shape(shape)?, to_value(lam)?))
}

#[pyfunction]
#[pyo3(name = "LogNormal", signature = (shape, s))]
fn log_normal(shape: &Bound<'_, PyAny>, s: &Bound<'_, PyAny>) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::LogNormal::new(to_shape(shape)?, to_value(s)?))
}

#[pyfunction]
#[pyo3(name = "StudentT", signature = (shape, df, loc, scale))]
fn student_t(
    shape: &Bound<'_, PyAny>,
    df: &Bound<'_, PyAny>,
    loc: &Bound<'_, PyAny>,
    scale: &Bound<'_, PyAny>,
) -> PyResult<PyRandomVariable> {
    PyRandomVariable::wrap(models::StudentT::new(
        to_shape(shape)?,
        to_value(df)?,
        to_value(loc)?,
        to_value(scale)?,
    ))
}

#[pymodule]
fn stochast(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRandomVariable>()?;
    m.add_function(wrap_pyfunction!(set_seed, m)?)?;

    m.add_function(wrap_pyfunction!(rvs, m)?)?;
    m.add_function(wrap_pyfunction!(logpdf, m)?)?;
    m.add_function(wrap_pyfunction!(pdf, m)?)?;
    m.add_function(wrap_pyfunction!(cdf, m)?)?;
    m.add_function(wrap_pyfunction!(logcdf, m)?)?;

    m.add_function(wrap_pyfunction!(beta, m)?)?;
    m.add_function(wrap_pyfunction!(inv_gamma, m)?)?;
    m.add_function(wrap_pyfunction!(uniform, m)?)?;
    m.add_function(wrap_pyfunction!(normal, m)?)?;
    m.add_function(wrap_pyfunction!(gamma, m)?)?;
    m.add_function(wrap_pyfunction!(exponential, m)?)?;
    m.add_function(wrap_pyfunction!(bernoulli, m)?)?;
    m.add_function(wrap_pyfunction!(poisson, m)?)?;
    m.add_function(wrap_pyfunction!(log_normal, m)?)?;
    m.add_function(wrap_pyfunction!(student_t, m)?)?;
    Ok(())
}
