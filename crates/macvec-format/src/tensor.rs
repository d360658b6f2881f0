//! Row-major typed tensors
//!
//! A [`Tensor`] is a shape plus a flat element buffer in row-major order (the
//! last axis varies fastest). The buffer's element type is explicit, so the
//! codec can check it against a declared [`StorageFormat`](crate::StorageFormat).

use crate::e4m3::F8E4M3;
use crate::error::{CodecError, Result};
use crate::format::DType;
use half::bf16;

/// Typed element storage
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F8E4M3(Vec<F8E4M3>),
    BF16(Vec<bf16>),
    F32(Vec<f32>),
}

impl TensorData {
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::F8E4M3(_) => DType::F8E4M3,
            TensorData::BF16(_) => DType::BF16,
            TensorData::F32(_) => DType::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::F8E4M3(v) => v.len(),
            TensorData::BF16(v) => v.len(),
            TensorData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Build a tensor, checking that the buffer fills the shape exactly
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(CodecError::ShapeMismatch(format!(
                "shape {:?} needs {} elements, buffer holds {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// 1-D tensor over the given buffer
    pub fn vector(data: TensorData) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// `f32` tensor filled in row-major order by calling `f` once per element
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut() -> f32) -> Self {
        let len = shape.iter().product();
        let values = (0..len).map(|_| f()).collect();
        Self {
            shape,
            data: TensorData::F32(values),
        }
    }

    pub fn from_f32(shape: Vec<usize>, values: Vec<f32>) -> Result<Self> {
        Self::new(shape, TensorData::F32(values))
    }

    pub fn from_e4m3(shape: Vec<usize>, values: Vec<F8E4M3>) -> Result<Self> {
        Self::new(shape, TensorData::F8E4M3(values))
    }

    pub fn from_bf16(shape: Vec<usize>, values: Vec<bf16>) -> Result<Self> {
        Self::new(shape, TensorData::BF16(values))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Collapse to one dimension; the buffer is already row-major
    pub fn flatten(self) -> Self {
        Self::vector(self.data)
    }

    /// (rows, cols) of a 2-D tensor
    pub fn dims2(&self) -> Result<(usize, usize)> {
        match self.shape.as_slice() {
            [rows, cols] => Ok((*rows, *cols)),
            other => Err(CodecError::ShapeMismatch(format!(
                "expected a 2-D tensor, got shape {:?}",
                other
            ))),
        }
    }

    /// Widen every element to `f32`. Exact for all three element types.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            TensorData::F8E4M3(v) => v.iter().map(|x| x.to_f32()).collect(),
            TensorData::BF16(v) => v.iter().map(|x| x.to_f32()).collect(),
            TensorData::F32(v) => v.clone(),
        }
    }

    /// Convert to another element type.
    ///
    /// Narrowing goes through `f32` and rounds to nearest even; widening is
    /// exact. Converting to the same type is a copy.
    pub fn to_dtype(&self, dtype: DType) -> Tensor {
        if dtype == self.dtype() {
            return self.clone();
        }
        let values = self.to_f32_vec();
        let data = match dtype {
            DType::F8E4M3 => {
                TensorData::F8E4M3(values.into_iter().map(F8E4M3::from_f32).collect())
            }
            DType::BF16 => TensorData::BF16(values.into_iter().map(bf16::from_f32).collect()),
            DType::F32 => TensorData::F32(values),
        };
        Tensor {
            shape: self.shape.clone(),
            data,
        }
    }
}
