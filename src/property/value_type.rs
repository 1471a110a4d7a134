use std::{fmt::Display, mem::size_of};

use num::complex::{Complex32, Complex64};

// The closed set of value types a property can carry. A property's type is
// chosen at creation and never changes; all typed accessors check against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Char,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    FloatComplex,
    DoubleComplex,
    /// Variable length array of characters. The only type whose value can
    /// grow, shrink, or spill out of the embedded buffer.
    String,
}

impl ValueType {
    /// Byte width of one element of this type as stored in the value
    /// member. For `String` this is the width of a single character; the
    /// property's element count carries the actual length.
    pub fn width(self) -> usize {
        match self {
            ValueType::Char => 1,
            ValueType::Bool => 1,
            ValueType::Int8 => 1,
            ValueType::Int16 => 2,
            ValueType::Int32 => 4,
            ValueType::Int64 => 8,
            ValueType::Float => 4,
            ValueType::Double => 8,
            ValueType::FloatComplex => 8,
            ValueType::DoubleComplex => 16,
            ValueType::String => 1,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            ValueType::Char => "char",
            ValueType::Bool => "bool",
            ValueType::Int8 => "int8",
            ValueType::Int16 => "int16",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::FloatComplex => "float complex",
            ValueType::DoubleComplex => "double complex",
            ValueType::String => "string",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ValueType::Int8
                | ValueType::Int16
                | ValueType::Int32
                | ValueType::Int64
        )
    }

    pub fn is_floating_point(self) -> bool {
        matches!(self, ValueType::Float | ValueType::Double)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, ValueType::FloatComplex | ValueType::DoubleComplex)
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Fixed width value that can be stored in the leading bytes of the
/// embedded buffer. Scalars are encoded with native-endian byte copies, so
/// the buffer needs no alignment guarantee to read them back.
pub(super) trait Scalar: Copy {
    const TYPE: ValueType;
    fn store(self, buf: &mut [u8]);
    fn load(buf: &[u8]) -> Self;
}

macro_rules! impl_scalar_prim {
    ($($t:ty => $vt:ident),* $(,)?) => {$(
        impl Scalar for $t {
            const TYPE: ValueType = ValueType::$vt;
            fn store(self, buf: &mut [u8]) {
                buf[..size_of::<$t>()]
                    .copy_from_slice(&self.to_ne_bytes());
            }
            fn load(buf: &[u8]) -> $t {
                <$t>::from_ne_bytes(
                    buf[..size_of::<$t>()].try_into().unwrap(),
                )
            }
        }
    )*};
}
impl_scalar_prim! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
}

impl Scalar for u8 {
    const TYPE: ValueType = ValueType::Char;
    fn store(self, buf: &mut [u8]) {
        buf[0] = self;
    }
    fn load(buf: &[u8]) -> u8 {
        buf[0]
    }
}

impl Scalar for bool {
    const TYPE: ValueType = ValueType::Bool;
    fn store(self, buf: &mut [u8]) {
        buf[0] = u8::from(self);
    }
    fn load(buf: &[u8]) -> bool {
        buf[0] != 0
    }
}

impl Scalar for Complex32 {
    const TYPE: ValueType = ValueType::FloatComplex;
    fn store(self, buf: &mut [u8]) {
        self.re.store(&mut buf[..4]);
        self.im.store(&mut buf[4..8]);
    }
    fn load(buf: &[u8]) -> Complex32 {
        Complex32::new(f32::load(&buf[..4]), f32::load(&buf[4..8]))
    }
}

impl Scalar for Complex64 {
    const TYPE: ValueType = ValueType::DoubleComplex;
    fn store(self, buf: &mut [u8]) {
        self.re.store(&mut buf[..8]);
        self.im.store(&mut buf[8..16]);
    }
    fn load(buf: &[u8]) -> Complex64 {
        Complex64::new(f64::load(&buf[..8]), f64::load(&buf[8..16]))
    }
}
