//! The property record and its supporting pieces.

mod card;
pub mod dicb;
pub mod value_type;

use std::{fmt, io};

use num::complex::{Complex32, Complex64};

use crate::fitsprop_error::PropertyError;
use card::CardBuf;
use dicb::DicbClass;
use value_type::{Scalar, ValueType};

/// A single named, typed header value with an optional comment: the
/// in-memory form of one FITS header card.
///
/// The record owns one fixed-capacity buffer shared by the embedded
/// representations of its name, value and comment; members only spill to
/// their own heap allocation when they outgrow it, and then stay there for
/// the rest of the record's lifetime. See [`crate`] level docs.
///
/// The value type is fixed at creation. Scalar accessors are type checked
/// against it and fail with [`PropertyError::TypeMismatch`] without touching
/// the record; integer and floating point getters of a wider type than the
/// stored one promote losslessly.
#[derive(Clone)]
pub struct Property {
    vtype: ValueType,
    /// Element count: 1 for scalars; for strings the encoded length
    /// including the terminator, recomputed on every string mutation.
    size: usize,
    sort_key: DicbClass,
    card: CardBuf,
}

impl Property {
    /// Creates a property with element count 1 and an all-zero value: `0`
    /// for the numeric types, `false`, `'\0'`, or `""`.
    pub fn new(
        name: &str,
        vtype: ValueType,
    ) -> Result<Property, PropertyError> {
        Property::with_size(name, vtype, 1)
    }

    /// Creates a property with an explicit element count. The count only
    /// matters for [`ValueType::String`], where it is the encoded value
    /// length including the terminator; for every scalar type it is forced
    /// to 1.
    pub fn with_size(
        name: &str,
        vtype: ValueType,
        count: usize,
    ) -> Result<Property, PropertyError> {
        if name.is_empty() {
            return Err(PropertyError::EmptyName);
        }
        if count == 0 {
            return Err(PropertyError::IllegalSize);
        }
        let count = if vtype == ValueType::String { count } else { 1 };
        let mut card = CardBuf::new();
        card.init_value(vtype.width() * count);
        card.set_name(name.as_bytes());
        Ok(Property {
            vtype,
            size: count,
            sort_key: DicbClass::Unclassified,
            card,
        })
    }

    pub fn value_type(&self) -> ValueType {
        self.vtype
    }

    /// The element count: 1 for every scalar type, the encoded string
    /// length (including the terminator) for string properties.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn name(&self) -> &str {
        terminated_str(self.card.name_bytes())
    }

    /// Renames the property. The sort key is reset to
    /// [`DicbClass::Unclassified`]: a key computed for the old name would
    /// silently misplace the record in the next sort.
    pub fn set_name(&mut self, name: &str) -> Result<(), PropertyError> {
        if name.is_empty() {
            return Err(PropertyError::EmptyName);
        }
        self.card.set_name(name.as_bytes());
        self.sort_key = DicbClass::Unclassified;
        Ok(())
    }

    pub fn comment(&self) -> Option<&str> {
        self.card.comment_bytes().map(terminated_str)
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.card.set_comment(comment.as_bytes());
    }

    pub fn clear_comment(&mut self) {
        self.card.clear_comment();
    }

    /// The precomputed DICB sort key, [`DicbClass::Unclassified`] until a
    /// classification pass assigns one via [`Property::set_sort_key`].
    pub fn sort_key(&self) -> DicbClass {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: DicbClass) {
        self.sort_key = key;
    }

    // per-type scalar accessors

    pub fn get_char(&self) -> Result<u8, PropertyError> {
        self.get_scalar::<u8>()
    }

    pub fn set_char(&mut self, v: u8) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    pub fn get_bool(&self) -> Result<bool, PropertyError> {
        self.get_scalar::<bool>()
    }

    pub fn set_bool(&mut self, v: bool) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    pub fn get_i8(&self) -> Result<i8, PropertyError> {
        self.get_scalar::<i8>()
    }

    pub fn set_i8(&mut self, v: i8) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored integer widened to `i16`. Accepts `Int8` and
    /// `Int16` properties.
    pub fn get_i16(&self) -> Result<i16, PropertyError> {
        match self.vtype {
            ValueType::Int8 => Ok(i16::from(self.load::<i8>())),
            ValueType::Int16 => Ok(self.load()),
            found => Err(PropertyError::mismatch(ValueType::Int16, found)),
        }
    }

    pub fn set_i16(&mut self, v: i16) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored integer widened to `i32`. Accepts `Int8`,
    /// `Int16` and `Int32` properties.
    pub fn get_i32(&self) -> Result<i32, PropertyError> {
        match self.vtype {
            ValueType::Int8 => Ok(i32::from(self.load::<i8>())),
            ValueType::Int16 => Ok(i32::from(self.load::<i16>())),
            ValueType::Int32 => Ok(self.load()),
            found => Err(PropertyError::mismatch(ValueType::Int32, found)),
        }
    }

    pub fn set_i32(&mut self, v: i32) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored integer widened to `i64`. Accepts every integer
    /// width; char and bool properties are rejected.
    pub fn get_i64(&self) -> Result<i64, PropertyError> {
        match self.vtype {
            ValueType::Int8 => Ok(i64::from(self.load::<i8>())),
            ValueType::Int16 => Ok(i64::from(self.load::<i16>())),
            ValueType::Int32 => Ok(i64::from(self.load::<i32>())),
            ValueType::Int64 => Ok(self.load()),
            found => Err(PropertyError::mismatch(ValueType::Int64, found)),
        }
    }

    pub fn set_i64(&mut self, v: i64) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored floating point value as `f32`. The one narrowing
    /// getter: reading a `Double` property truncates to single precision.
    pub fn get_f32(&self) -> Result<f32, PropertyError> {
        match self.vtype {
            ValueType::Float => Ok(self.load()),
            ValueType::Double => Ok(self.load::<f64>() as f32),
            found => Err(PropertyError::mismatch(ValueType::Float, found)),
        }
    }

    pub fn set_f32(&mut self, v: f32) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored floating point value widened to `f64`. Accepts
    /// `Float` and `Double` properties.
    pub fn get_f64(&self) -> Result<f64, PropertyError> {
        match self.vtype {
            ValueType::Float => Ok(f64::from(self.load::<f32>())),
            ValueType::Double => Ok(self.load()),
            found => Err(PropertyError::mismatch(ValueType::Double, found)),
        }
    }

    pub fn set_f64(&mut self, v: f64) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    pub fn get_c32(&self) -> Result<Complex32, PropertyError> {
        self.get_scalar::<Complex32>()
    }

    pub fn set_c32(&mut self, v: Complex32) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    /// Returns the stored complex value widened to double precision.
    /// Accepts `FloatComplex` and `DoubleComplex` properties.
    pub fn get_c64(&self) -> Result<Complex64, PropertyError> {
        match self.vtype {
            ValueType::FloatComplex => {
                let c = self.load::<Complex32>();
                Ok(Complex64::new(c.re.into(), c.im.into()))
            }
            ValueType::DoubleComplex => Ok(self.load()),
            found => {
                Err(PropertyError::mismatch(ValueType::DoubleComplex, found))
            }
        }
    }

    pub fn set_c64(&mut self, v: Complex64) -> Result<(), PropertyError> {
        self.set_scalar(v)
    }

    pub fn get_str(&self) -> Result<&str, PropertyError> {
        if self.vtype != ValueType::String {
            return Err(PropertyError::mismatch(
                ValueType::String,
                self.vtype,
            ));
        }
        Ok(terminated_str(self.card.value_bytes()))
    }

    /// Replaces the string value and updates the element count to the new
    /// encoded length.
    pub fn set_str(&mut self, value: &str) -> Result<(), PropertyError> {
        if self.vtype != ValueType::String {
            return Err(PropertyError::mismatch(
                ValueType::String,
                self.vtype,
            ));
        }
        self.card.set_value(value.as_bytes());
        self.size = value.len() + 1;
        Ok(())
    }

    /// Writes a diagnostic rendering of the record. Absent members print
    /// as empty; this never fails for any record state.
    pub fn dump(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        writeln!(sink, "property '{}'", self.name())?;
        writeln!(sink, "  comment: '{}'", self.comment().unwrap_or(""))?;
        writeln!(sink, "  type: {}", self.vtype)?;
        writeln!(sink, "  size: {}", self.size)?;
        writeln!(sink, "  value: {}", ValueDisplay(self))
    }

    fn load<T: Scalar>(&self) -> T {
        T::load(self.card.value_bytes())
    }

    fn get_scalar<T: Scalar>(&self) -> Result<T, PropertyError> {
        if self.vtype != T::TYPE {
            return Err(PropertyError::mismatch(T::TYPE, self.vtype));
        }
        Ok(self.load())
    }

    fn set_scalar<T: Scalar>(&mut self, v: T) -> Result<(), PropertyError> {
        if self.vtype != T::TYPE {
            return Err(PropertyError::mismatch(T::TYPE, self.vtype));
        }
        v.store(self.card.value_bytes_mut());
        Ok(())
    }
}

/// Strips the trailing NUL off a stored string member.
fn terminated_str(bytes: &[u8]) -> &str {
    let bytes = &bytes[..bytes.len() - 1];
    // SAFETY: string members are only ever written from `&str` arguments
    // plus a NUL terminator, and freshly created values are zero-filled;
    // both are valid UTF-8.
    unsafe { std::str::from_utf8_unchecked(bytes) }
}

struct ValueDisplay<'a>(&'a Property);

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        match p.vtype {
            ValueType::Char => {
                write!(f, "'{}'", char::from(p.load::<u8>()))
            }
            ValueType::Bool => write!(f, "{}", p.load::<bool>()),
            ValueType::Int8 => write!(f, "{}", p.load::<i8>()),
            ValueType::Int16 => write!(f, "{}", p.load::<i16>()),
            ValueType::Int32 => write!(f, "{}", p.load::<i32>()),
            ValueType::Int64 => write!(f, "{}", p.load::<i64>()),
            ValueType::Float => write!(f, "{}", p.load::<f32>()),
            ValueType::Double => write!(f, "{}", p.load::<f64>()),
            ValueType::FloatComplex => {
                let c = p.load::<Complex32>();
                write!(f, "{}{:+}i", c.re, c.im)
            }
            ValueType::DoubleComplex => {
                let c = p.load::<Complex64>();
                write!(f, "{}{:+}i", c.re, c.im)
            }
            ValueType::String => {
                write!(f, "'{}'", terminated_str(p.card.value_bytes()))
            }
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property {{ name: {:?}, type: {}, size: {}, value: {}",
            self.name(),
            self.vtype,
            self.size,
            ValueDisplay(self),
        )?;
        if let Some(comment) = self.comment() {
            write!(f, ", comment: {comment:?}")?;
        }
        f.write_str(" }")
    }
}

/// Logical equality: type, name, comment and value bytes. Deliberately
/// placement-independent, so a record whose members spilled compares equal
/// to a clone that kept them embedded.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.vtype == other.vtype
            && self.size == other.size
            && self.name() == other.name()
            && self.comment() == other.comment()
            && self.card.value_bytes() == other.card.value_bytes()
    }
}
