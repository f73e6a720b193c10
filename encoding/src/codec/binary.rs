//! Codecs of the binary value representations:
//! numbers, attribute tags and opaque byte strings.

use super::{
    kind_of, BadPatternSnafu, IncompatibleValueSnafu, OutOfRangeSnafu, Result, WriteValueSnafu,
};
use crate::decode::BasicDecoder;
use crate::encode::BasicEncoder;
use byteordered::Endianness;
use dcmtree_core::value::C;
use dcmtree_core::{PrimitiveValue, Tag, VR};
use snafu::{ensure, OptionExt, ResultExt};
use std::io;

/// Read as many whole words of `width` bytes as the payload holds.
fn read_words<T, F>(bytes: &[u8], width: usize, read_into: F) -> C<T>
where
    T: Default + Clone,
    F: FnOnce(&[u8], &mut [T]) -> io::Result<()>,
{
    // a trailing partial word is ignored
    let count = bytes.len() / width;
    let mut words = C::from_elem(T::default(), count);
    match read_into(&bytes[..count * width], words.as_mut_slice()) {
        Ok(()) => words,
        Err(_) => C::new(),
    }
}

pub(crate) fn decode(vr: VR, endianness: Endianness, bytes: &[u8]) -> PrimitiveValue {
    let basic = BasicDecoder::new(endianness);
    match vr {
        VR::US | VR::OW => {
            PrimitiveValue::U16(read_words(bytes, 2, |src, dst| basic.decode_us_into(src, dst)))
        }
        VR::SS => {
            PrimitiveValue::I16(read_words(bytes, 2, |src, dst| basic.decode_ss_into(src, dst)))
        }
        VR::UL | VR::OL => {
            PrimitiveValue::U32(read_words(bytes, 4, |src, dst| basic.decode_ul_into(src, dst)))
        }
        VR::SL => {
            PrimitiveValue::I32(read_words(bytes, 4, |src, dst| basic.decode_sl_into(src, dst)))
        }
        VR::FL | VR::OF => {
            PrimitiveValue::F32(read_words(bytes, 4, |src, dst| basic.decode_fl_into(src, dst)))
        }
        VR::FD | VR::OD => {
            PrimitiveValue::F64(read_words(bytes, 8, |src, dst| basic.decode_fd_into(src, dst)))
        }
        VR::AT => {
            let halves: C<u16> =
                read_words(bytes, 4, |src, dst: &mut [u16]| basic.decode_us_into(src, dst));
            PrimitiveValue::Tags(halves.chunks_exact(2).map(|h| Tag(h[0], h[1])).collect())
        }
        _ => PrimitiveValue::U8(C::from_slice(bytes)),
    }
}

pub(crate) fn encode(vr: VR, endianness: Endianness, value: &PrimitiveValue) -> Result<Vec<u8>> {
    // the other words accept their raw encoded form
    if let PrimitiveValue::U8(bytes) = value {
        if matches!(
            vr,
            VR::OB | VR::UN | VR::SQ | VR::OW | VR::OL | VR::OF | VR::OD
        ) {
            return Ok(bytes.to_vec());
        }
    }

    let basic = BasicEncoder::new(endianness);
    let mut out = Vec::new();
    let written = match vr {
        VR::US | VR::OW => integers::<u16>(vr, value)?
            .into_iter()
            .try_for_each(|v| basic.encode_us(&mut out, v)),
        VR::SS => integers::<i16>(vr, value)?
            .into_iter()
            .try_for_each(|v| basic.encode_ss(&mut out, v)),
        VR::UL | VR::OL => integers::<u32>(vr, value)?
            .into_iter()
            .try_for_each(|v| basic.encode_ul(&mut out, v)),
        VR::SL => integers::<i32>(vr, value)?
            .into_iter()
            .try_for_each(|v| basic.encode_sl(&mut out, v)),
        VR::FL | VR::OF => {
            let values = floats(vr, value)?;
            let mut narrow = Vec::with_capacity(values.len());
            for v in values {
                let f = v as f32;
                ensure!(
                    f.is_finite() || !v.is_finite(),
                    OutOfRangeSnafu {
                        vr,
                        value: v.to_string()
                    }
                );
                narrow.push(f);
            }
            narrow
                .into_iter()
                .try_for_each(|v| basic.encode_fl(&mut out, v))
        }
        VR::FD | VR::OD => floats(vr, value)?
            .into_iter()
            .try_for_each(|v| basic.encode_fd(&mut out, v)),
        VR::AT => tags(value)?
            .into_iter()
            .try_for_each(|tag| basic.encode_tag(&mut out, tag)),
        _ => {
            return IncompatibleValueSnafu {
                vr,
                kind: kind_of(value),
            }
            .fail()
        }
    };
    written.context(WriteValueSnafu { vr })?;
    Ok(out)
}

/// Collect the value as integers of the target type,
/// checking each one against the type's range.
fn integers<T>(vr: VR, value: &PrimitiveValue) -> Result<Vec<T>>
where
    T: TryFrom<i64>,
{
    let wide: Vec<i64> = match value {
        PrimitiveValue::I16(v) => v.iter().map(|x| i64::from(*x)).collect(),
        PrimitiveValue::U16(v) => v.iter().map(|x| i64::from(*x)).collect(),
        PrimitiveValue::I32(v) => v.iter().map(|x| i64::from(*x)).collect(),
        PrimitiveValue::U32(v) => v.iter().map(|x| i64::from(*x)).collect(),
        PrimitiveValue::I64(v) => v.to_vec(),
        PrimitiveValue::Str(s) => s
            .split('\\')
            .map(|part| {
                let part = part.trim();
                part.parse::<i64>().ok().context(BadPatternSnafu {
                    vr,
                    value: part,
                    expected: "an integer",
                })
            })
            .collect::<Result<_>>()?,
        other => {
            return IncompatibleValueSnafu {
                vr,
                kind: kind_of(other),
            }
            .fail()
        }
    };
    wide.into_iter()
        .map(|v| {
            T::try_from(v).ok().context(OutOfRangeSnafu {
                vr,
                value: v.to_string(),
            })
        })
        .collect()
}

fn floats(vr: VR, value: &PrimitiveValue) -> Result<Vec<f64>> {
    match value {
        PrimitiveValue::F32(v) => Ok(v.iter().map(|x| f64::from(*x)).collect()),
        PrimitiveValue::F64(v) => Ok(v.to_vec()),
        PrimitiveValue::I16(v) => Ok(v.iter().map(|x| f64::from(*x)).collect()),
        PrimitiveValue::U16(v) => Ok(v.iter().map(|x| f64::from(*x)).collect()),
        PrimitiveValue::I32(v) => Ok(v.iter().map(|x| f64::from(*x)).collect()),
        PrimitiveValue::U32(v) => Ok(v.iter().map(|x| f64::from(*x)).collect()),
        PrimitiveValue::I64(v) => Ok(v.iter().map(|x| *x as f64).collect()),
        PrimitiveValue::Str(s) => s
            .split('\\')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>().ok().context(BadPatternSnafu {
                    vr,
                    value: part,
                    expected: "a floating point number",
                })
            })
            .collect(),
        other => IncompatibleValueSnafu {
            vr,
            kind: kind_of(other),
        }
        .fail(),
    }
}

/// Attribute tags are accepted as tags,
/// as text in any of the usual tag notations,
/// or packed into 32-bit numbers as `0xGGGGEEEE`.
fn tags(value: &PrimitiveValue) -> Result<Vec<Tag>> {
    let vr = VR::AT;
    match value {
        PrimitiveValue::Tags(v) => Ok(v.to_vec()),
        PrimitiveValue::U32(v) => Ok(v
            .iter()
            .map(|x| Tag((x >> 16) as u16, (x & 0xFFFF) as u16))
            .collect()),
        PrimitiveValue::Str(s) => s
            .split('\\')
            .map(|part| {
                let part = part.trim();
                part.parse::<Tag>().ok().context(BadPatternSnafu {
                    vr,
                    value: part,
                    expected: "an attribute tag such as (GGGG,EEEE)",
                })
            })
            .collect(),
        other => IncompatibleValueSnafu {
            vr,
            kind: kind_of(other),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecRegistry, EncodeValueError};
    use dcmtree_core::smallvec::smallvec;

    #[test]
    fn decode_numbers_in_both_byte_orders() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(
            decode(VR::US, Endianness::Little, &bytes),
            PrimitiveValue::U16(smallvec![0x0201, 0x0403])
        );
        assert_eq!(
            decode(VR::US, Endianness::Big, &bytes),
            PrimitiveValue::U16(smallvec![0x0102, 0x0304])
        );
        assert_eq!(
            decode(VR::UL, Endianness::Little, &bytes),
            PrimitiveValue::U32(smallvec![0x0403_0201])
        );
        assert_eq!(
            decode(VR::SS, Endianness::Little, &[0xFF, 0xFF]),
            PrimitiveValue::I16(smallvec![-1])
        );
        assert_eq!(
            decode(VR::OB, Endianness::Big, &bytes),
            PrimitiveValue::U8(smallvec![1, 2, 3, 4])
        );
    }

    #[test]
    fn trailing_partial_word_is_ignored() {
        assert_eq!(
            decode(VR::UL, Endianness::Little, &[1, 0, 0, 0, 9, 9]),
            PrimitiveValue::U32(smallvec![1])
        );
        assert_eq!(
            decode(VR::FD, Endianness::Little, &[0; 7]),
            PrimitiveValue::F64(smallvec![])
        );
    }

    #[test]
    fn signed_and_float_words_follow_the_byte_order() {
        let pi = [0x40, 0x49, 0x0F, 0xDB];
        assert_eq!(
            decode(VR::FL, Endianness::Big, &pi),
            PrimitiveValue::F32(smallvec![std::f32::consts::PI])
        );
        assert_eq!(
            encode(VR::FL, Endianness::Big, &PrimitiveValue::from(std::f32::consts::PI)).unwrap(),
            pi
        );
        assert_eq!(
            decode(VR::SL, Endianness::Big, &[0xFF, 0xFF, 0xFF, 0xFE, 0x00, 0x00, 0x00, 0x01]),
            PrimitiveValue::I32(smallvec![-2, 1])
        );
        assert_eq!(
            decode(VR::SS, Endianness::Big, &[0xFF, 0xFE, 0x7F]),
            PrimitiveValue::I16(smallvec![-2])
        );
        // half a tag is dropped
        assert_eq!(
            decode(VR::AT, Endianness::Little, &[0x28, 0x00, 0x10, 0x00, 0x08, 0x00]),
            PrimitiveValue::Tags(smallvec![Tag(0x0028, 0x0010)])
        );
    }

    #[test]
    fn attribute_tags() {
        let le = CodecRegistry::little_endian().codec(VR::AT);
        let be = CodecRegistry::big_endian().codec(VR::AT);
        let value = PrimitiveValue::from(Tag(0x0028, 0x2110));

        let bytes = le.encode(&value).unwrap();
        assert_eq!(bytes, vec![0x28, 0x00, 0x10, 0x21]);
        assert_eq!(le.decode(&bytes, 0), value);

        let bytes = be.encode(&value).unwrap();
        assert_eq!(bytes, vec![0x00, 0x28, 0x21, 0x10]);
        assert_eq!(be.decode(&bytes, 0), value);

        // text and packed forms
        assert_eq!(le.encode(&"(0028,2110)".into()).unwrap(), vec![0x28, 0x00, 0x10, 0x21]);
        assert_eq!(le.encode(&"00282110".into()).unwrap(), vec![0x28, 0x00, 0x10, 0x21]);
        assert_eq!(
            le.encode(&PrimitiveValue::from(0x0028_2110_u32)).unwrap(),
            vec![0x28, 0x00, 0x10, 0x21]
        );
        assert!(matches!(
            le.encode(&"not a tag".into()),
            Err(EncodeValueError::BadPattern { vr: VR::AT, .. })
        ));
    }

    #[test]
    fn integers_are_range_checked() {
        let us = CodecRegistry::little_endian().codec(VR::US);
        assert_eq!(us.encode(&PrimitiveValue::from(512_i32)).unwrap(), vec![0x00, 0x02]);
        assert_eq!(us.encode(&"1\\2".into()).unwrap(), vec![1, 0, 2, 0]);
        assert!(matches!(
            us.encode(&PrimitiveValue::from(70_000_i32)),
            Err(EncodeValueError::OutOfRange { vr: VR::US, .. })
        ));
        assert!(matches!(
            us.encode(&PrimitiveValue::from(-1_i16)),
            Err(EncodeValueError::OutOfRange { .. })
        ));
        assert!(matches!(
            us.encode(&"twelve".into()),
            Err(EncodeValueError::BadPattern { .. })
        ));

        let sl = CodecRegistry::big_endian().codec(VR::SL);
        assert_eq!(
            sl.encode(&PrimitiveValue::from(-2_i64)).unwrap(),
            vec![0xFF, 0xFF, 0xFF, 0xFE]
        );
        assert!(sl.encode(&PrimitiveValue::from(1_i64 << 40)).is_err());
    }

    #[test]
    fn floats_round_trip() {
        for codecs in [CodecRegistry::little_endian(), CodecRegistry::big_endian()] {
            let fd = codecs.codec(VR::FD);
            let value = PrimitiveValue::from(vec![1.5_f64, -0.25, 1e300]);
            let bytes = fd.encode(&value).unwrap();
            assert_eq!(bytes.len(), 24);
            assert_eq!(fd.decode(&bytes, 0), value);

            let fl = codecs.codec(VR::FL);
            let bytes = fl.encode(&PrimitiveValue::from(0.5_f64)).unwrap();
            assert_eq!(fl.decode(&bytes, 0), PrimitiveValue::from(0.5_f32));
            assert!(matches!(
                fl.encode(&PrimitiveValue::from(1e300_f64)),
                Err(EncodeValueError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn words_accept_raw_bytes() {
        let ow = CodecRegistry::big_endian().codec(VR::OW);
        let raw = PrimitiveValue::from(vec![0x12_u8, 0x34]);
        assert_eq!(ow.encode(&raw).unwrap(), vec![0x12, 0x34]);
        assert_eq!(ow.decode(&[0x12, 0x34], 0), PrimitiveValue::from(0x1234_u16));

        let ob = CodecRegistry::little_endian().codec(VR::OB);
        assert!(matches!(
            ob.encode(&PrimitiveValue::from(1_u16)),
            Err(EncodeValueError::IncompatibleValue { vr: VR::OB, .. })
        ));
        // numeric values are not raw bytes
        let us = CodecRegistry::little_endian().codec(VR::US);
        assert!(us.encode(&raw).is_err());
    }
}
