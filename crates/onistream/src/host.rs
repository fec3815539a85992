// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Caller-facing arrays
//!
//! Array-oriented host environments exchange column-major numeric arrays with
//! a class (element type) and a dimension vector. [`Array`] is that exchange
//! value: arguments arrive as arrays and results are returned as arrays.

use std::fmt;

use crate::{marshal::FrameArray, Error};

/// Typed column-major payload of an [`Array`].
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Double(Vec<f64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt64(Vec<u64>),
}

impl Data {
    pub fn len(&self) -> usize {
        match self {
            Data::Double(v) => v.len(),
            Data::UInt8(v) => v.len(),
            Data::UInt16(v) => v.len(),
            Data::UInt64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Host class name of the element type.
    pub fn class_name(&self) -> &'static str {
        match self {
            Data::Double(_) => "double",
            Data::UInt8(_) => "uint8",
            Data::UInt16(_) => "uint16",
            Data::UInt64(_) => "uint64",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    dims: Vec<usize>,
    data: Data,
    complex: bool,
}

impl Array {
    /// Build an array, checking the element count against `dims`.
    pub fn new(dims: Vec<usize>, data: Data) -> Result<Self, Error> {
        let count: usize = dims.iter().product();
        if dims.len() < 2 || count != data.len() {
            return Err(Error::InvalidArgument(format!(
                "{} elements do not fill a {} array",
                data.len(),
                dims_string(&dims)
            )));
        }
        Ok(Array {
            dims,
            data,
            complex: false,
        })
    }

    /// 1x1 double, the shape of an opid or video mode index argument.
    pub fn scalar(value: f64) -> Self {
        Array {
            dims: vec![1, 1],
            data: Data::Double(vec![value]),
            complex: false,
        }
    }

    /// 1x1 uint64, the shape of frame index and timestamp results.
    pub fn uint64(value: u64) -> Self {
        Array {
            dims: vec![1, 1],
            data: Data::UInt64(vec![value]),
            complex: false,
        }
    }

    /// Mark the array as complex (imaginary part of zero).
    pub fn into_complex(self) -> Self {
        Array {
            complex: true,
            ..self
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    pub fn is_complex(&self) -> bool {
        self.complex
    }

    pub fn class_name(&self) -> &'static str {
        self.data.class_name()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<FrameArray> for Array {
    fn from(frame: FrameArray) -> Self {
        let dims = frame.dims();
        let data = match frame {
            FrameArray::Mono16 { data, .. } => Data::UInt16(data),
            FrameArray::Mono8 { data, .. } | FrameArray::Rgb { data, .. } => Data::UInt8(data),
        };
        Array {
            dims,
            data,
            complex: false,
        }
    }
}

fn dims_string(dims: &[usize]) -> String {
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("x")
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.class_name(), dims_string(&self.dims))?;
        if self.len() == 1 {
            match &self.data {
                Data::Double(v) => write!(f, " = {}", v[0])?,
                Data::UInt8(v) => write!(f, " = {}", v[0])?,
                Data::UInt16(v) => write!(f, " = {}", v[0])?,
                Data::UInt64(v) => write!(f, " = {}", v[0])?,
            }
        }
        Ok(())
    }
}

/// Read an integral index from a real 1x1 double argument.
///
/// Any other class, shape, a complex value, or a value that is fractional,
/// non-finite, or outside `i64` is rejected with `message`.
pub fn scalar_index(arg: &Array, message: &str) -> Result<i64, Error> {
    let reject = || Error::InvalidArgument(message.to_owned());

    if arg.complex || arg.dims != [1, 1] {
        return Err(reject());
    }
    let Data::Double(values) = &arg.data else {
        return Err(reject());
    };
    let value = values[0];
    // 2^63 is the first double past i64::MAX
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= 9_223_372_036_854_775_808.0 {
        return Err(reject());
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MSG: &str = "First argument, opid, should be a scalar index";

    #[test]
    fn test_scalar_index_accepts_integral_doubles() {
        assert_eq!(scalar_index(&Array::scalar(13.0), MSG).unwrap(), 13);
        assert_eq!(scalar_index(&Array::scalar(-1.0), MSG).unwrap(), -1);
        assert_eq!(scalar_index(&Array::scalar(0.0), MSG).unwrap(), 0);
    }

    #[test]
    fn test_scalar_index_rejects_bad_values() {
        for value in [2.5, f64::NAN, f64::INFINITY, -f64::INFINITY, 1e19] {
            let err = scalar_index(&Array::scalar(value), MSG).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(ref m) if m == MSG), "{}", value);
        }
    }

    #[test]
    fn test_scalar_index_rejects_bad_shapes() {
        let row = Array::new(vec![1, 2], Data::Double(vec![1.0, 2.0])).unwrap();
        assert!(scalar_index(&row, MSG).is_err());

        let cube = Array::new(vec![1, 1, 1], Data::Double(vec![1.0])).unwrap();
        assert!(scalar_index(&cube, MSG).is_err());

        let empty = Array::new(vec![0, 0], Data::Double(Vec::new())).unwrap();
        assert!(scalar_index(&empty, MSG).is_err());

        assert!(scalar_index(&Array::uint64(2), MSG).is_err());
        assert!(scalar_index(&Array::scalar(2.0).into_complex(), MSG).is_err());
    }

    #[test]
    fn test_new_checks_element_count() {
        assert!(Array::new(vec![2, 3], Data::UInt8(vec![0; 6])).is_ok());
        assert!(Array::new(vec![2, 3], Data::UInt8(vec![0; 5])).is_err());
        assert!(Array::new(vec![6], Data::UInt8(vec![0; 6])).is_err());
    }

    #[test]
    fn test_from_frame_array() {
        let frame = FrameArray::Rgb {
            height: 1,
            width: 2,
            data: vec![1, 2, 3, 4, 5, 6],
        };
        let array = Array::from(frame);
        assert_eq!(array.dims(), &[1, 2, 3]);
        assert_eq!(array.class_name(), "uint8");

        let frame = FrameArray::Mono16 {
            height: 2,
            width: 1,
            data: vec![500, 600],
        };
        let array = Array::from(frame);
        assert_eq!(array.dims(), &[2, 1]);
        assert_eq!(array.data(), &Data::UInt16(vec![500, 600]));
    }

    #[test]
    fn test_display() {
        assert_eq!(Array::uint64(42).to_string(), "uint64 1x1 = 42");
        let frame = Array::from(FrameArray::Mono8 {
            height: 480,
            width: 640,
            data: vec![0; 640 * 480],
        });
        assert_eq!(frame.to_string(), "uint8 480x640");
    }
}
