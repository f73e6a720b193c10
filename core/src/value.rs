//! Declaration and implementation of a primitive (non-sequence) value.
//!
//! See [`PrimitiveValue`].

use crate::header::Tag;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// An enum representing a typed value of a leaf record.
///
/// The result of decoding an element's payload with a value codec
/// is one of the variants below, depending on the value representation.
/// Multiple numbers are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
///
/// Text values keep the DICOM backslash separator for multiple values.
///
/// # Example
///
/// ```
/// # use dcmtree_core::PrimitiveValue;
/// # use dcmtree_core::smallvec::smallvec;
/// let value = PrimitiveValue::from("Smith^John");
/// assert_eq!(value, PrimitiveValue::Str("Smith^John".to_string()));
///
/// let value = PrimitiveValue::from(512_u16);
/// assert_eq!(value, PrimitiveValue::U16(smallvec![512]));
/// ```
///
/// [`smallvec`]: ../../smallvec/index.html
#[derive(Debug, PartialEq, Clone)]
pub enum PrimitiveValue {
    /// No data. Used for zero-length values.
    Empty,
    /// A character string.
    /// Used for all text-like VRs (AE, AS, CS, DA, DS, DT, IS, LO, LT,
    /// PN, SH, ST, TM, UC, UI, UR and UT).
    Str(String),
    /// A sequence of attribute tags. Used for AT.
    Tags(C<Tag>),
    /// Raw bytes. Used for OB and UN, and as the raw pass-through of SQ.
    U8(C<u8>),
    /// Signed 16-bit integers. Used for SS.
    I16(C<i16>),
    /// Unsigned 16-bit integers. Used for US and OW.
    U16(C<u16>),
    /// Signed 32-bit integers. Used for SL.
    I32(C<i32>),
    /// Unsigned 32-bit integers. Used for UL and OL.
    U32(C<u32>),
    /// Generic signed integers.
    ///
    /// Never produced by decoding;
    /// codecs accept it as input and check it against the target range.
    I64(C<i64>),
    /// Single precision floats. Used for FL and OF.
    F32(C<f32>),
    /// Double precision floats. Used for FD and OD.
    F64(C<f64>),
}

impl PrimitiveValue {
    /// The number of individual values held.
    ///
    /// Text counts backslash-separated components,
    /// and raw bytes always count as one value.
    pub fn multiplicity(&self) -> u32 {
        use PrimitiveValue::*;
        match self {
            Empty => 0,
            Str(s) => s.split('\\').count() as u32,
            U8(_) => 1,
            Tags(v) => v.len() as u32,
            I16(v) => v.len() as u32,
            U16(v) => v.len() as u32,
            I32(v) => v.len() as u32,
            U32(v) => v.len() as u32,
            I64(v) => v.len() as u32,
            F32(v) => v.len() as u32,
            F64(v) => v.len() as u32,
        }
    }

    /// Check whether the value holds nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            PrimitiveValue::Empty => true,
            PrimitiveValue::Str(s) => s.is_empty(),
            _ => self.multiplicity() == 0,
        }
    }

    /// Get a reference to the text, if the value is a string.
    pub fn string(&self) -> Option<&str> {
        match self {
            PrimitiveValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the raw bytes, if the value holds bytes.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            PrimitiveValue::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Get the attribute tags, if the value holds tags.
    pub fn tags(&self) -> Option<&[Tag]> {
        match self {
            PrimitiveValue::Tags(v) => Some(v),
            _ => None,
        }
    }

    /// Get the unsigned 16-bit integers, if the value holds them.
    pub fn uint16_slice(&self) -> Option<&[u16]> {
        match self {
            PrimitiveValue::U16(v) => Some(v),
            _ => None,
        }
    }

    /// Get the signed 16-bit integers, if the value holds them.
    pub fn int16_slice(&self) -> Option<&[i16]> {
        match self {
            PrimitiveValue::I16(v) => Some(v),
            _ => None,
        }
    }

    /// Get the unsigned 32-bit integers, if the value holds them.
    pub fn uint32_slice(&self) -> Option<&[u32]> {
        match self {
            PrimitiveValue::U32(v) => Some(v),
            _ => None,
        }
    }

    /// Get the signed 32-bit integers, if the value holds them.
    pub fn int32_slice(&self) -> Option<&[i32]> {
        match self {
            PrimitiveValue::I32(v) => Some(v),
            _ => None,
        }
    }

    /// Get the single precision floats, if the value holds them.
    pub fn float32_slice(&self) -> Option<&[f32]> {
        match self {
            PrimitiveValue::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Get the double precision floats, if the value holds them.
    pub fn float64_slice(&self) -> Option<&[f64]> {
        match self {
            PrimitiveValue::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Obtain a textual rendition of the value.
    ///
    /// Multiple values are joined with a backslash,
    /// tags are rendered as `(GGGG,EEEE)`.
    pub fn to_str(&self) -> Cow<str> {
        match self {
            PrimitiveValue::Empty => Cow::Borrowed(""),
            PrimitiveValue::Str(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter, values: &[T]) -> fmt::Result {
    let mut first = true;
    for v in values {
        if !first {
            f.write_str("\\")?;
        }
        write!(f, "{}", v)?;
        first = false;
    }
    Ok(())
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use PrimitiveValue::*;
        match self {
            Empty => Ok(()),
            Str(s) => f.write_str(s),
            Tags(v) => join(f, v),
            U8(v) => join(f, v),
            I16(v) => join(f, v),
            U16(v) => join(f, v),
            I32(v) => join(f, v),
            U32(v) => join(f, v),
            I64(v) => join(f, v),
            F32(v) => join(f, v),
            F64(v) => join(f, v),
        }
    }
}

impl From<String> for PrimitiveValue {
    fn from(value: String) -> Self {
        PrimitiveValue::Str(value)
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Str(value.to_owned())
    }
}

impl From<Tag> for PrimitiveValue {
    fn from(value: Tag) -> Self {
        PrimitiveValue::Tags(smallvec::smallvec![value])
    }
}

impl From<Vec<u8>> for PrimitiveValue {
    fn from(value: Vec<u8>) -> Self {
        PrimitiveValue::U8(C::from_vec(value))
    }
}

impl From<&[u8]> for PrimitiveValue {
    fn from(value: &[u8]) -> Self {
        PrimitiveValue::U8(C::from_slice(value))
    }
}

macro_rules! impl_from_number {
    ($typ: ty, $variant: ident) => {
        impl From<$typ> for PrimitiveValue {
            fn from(value: $typ) -> Self {
                PrimitiveValue::$variant(smallvec::smallvec![value])
            }
        }

        impl From<Vec<$typ>> for PrimitiveValue {
            fn from(value: Vec<$typ>) -> Self {
                PrimitiveValue::$variant(C::from_vec(value))
            }
        }
    };
}

impl_from_number!(i16, I16);
impl_from_number!(u16, U16);
impl_from_number!(i32, I32);
impl_from_number!(u32, U32);
impl_from_number!(i64, I64);
impl_from_number!(f32, F32);
impl_from_number!(f64, F64);

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn display_joins_with_backslash() {
        let value = PrimitiveValue::U16(smallvec![256, 0, 16]);
        assert_eq!(value.to_string(), "256\\0\\16");
        let value = PrimitiveValue::Tags(smallvec![Tag(0x0028, 0x2110), Tag(0x0010, 0x0010)]);
        assert_eq!(value.to_str(), "(0028,2110)\\(0010,0010)");
    }

    #[test]
    fn multiplicity() {
        assert_eq!(PrimitiveValue::Empty.multiplicity(), 0);
        assert_eq!(PrimitiveValue::from("ORIGINAL\\PRIMARY").multiplicity(), 2);
        assert_eq!(PrimitiveValue::from(vec![1.5_f64, 2.5]).multiplicity(), 2);
        assert_eq!(PrimitiveValue::from(vec![1_u8, 2, 3]).multiplicity(), 1);
    }

    #[test]
    fn accessors() {
        let value = PrimitiveValue::from(vec![512_u16, 1]);
        assert_eq!(value.uint16_slice(), Some(&[512_u16, 1][..]));
        assert_eq!(value.string(), None);
        assert_eq!(PrimitiveValue::from("065Y").string(), Some("065Y"));
        assert!(PrimitiveValue::from("").is_empty());
    }
}
