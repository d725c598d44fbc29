//! Constant pool decoding.
//!
//! Only the entries that can carry a class reference are kept in decoded
//! form; everything else is skipped over with the correct width.

use super::ClassParseError;
use super::reader::ByteReader;

#[derive(Debug, Clone)]
pub(crate) enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    NameAndType { descriptor_index: u16 },
    MethodType { descriptor_index: u16 },
    Other,
    /// Slot 0 and the second slot of long/double entries.
    Unusable,
}

pub(crate) struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ClassParseError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    // Modified UTF-8: the class-name subset is plain UTF-8.
                    Constant::Utf8(String::from_utf8_lossy(bytes).into_owned())
                }
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    reader.skip(8)?;
                    entries.push(Constant::Other);
                    Constant::Unusable
                }
                7 => Constant::Class {
                    name_index: reader.read_u2()?,
                },
                8 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                9..=11 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                12 => {
                    let _name_index = reader.read_u2()?;
                    Constant::NameAndType {
                        descriptor_index: reader.read_u2()?,
                    }
                }
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                16 => Constant::MethodType {
                    descriptor_index: reader.read_u2()?,
                },
                17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                other => return Err(ClassParseError::UnsupportedConstant { tag: other }),
            };
            entries.push(entry);
        }

        if entries.len() > count {
            // A trailing long/double claimed a slot past the declared count.
            return Err(ClassParseError::InvalidConstantIndex { index: count as u16 });
        }

        Ok(Self { entries })
    }

    pub(crate) fn entries(&self) -> &[Constant] {
        &self.entries
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassParseError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassParseError::InvalidConstantIndex { index })
    }

    pub(crate) fn utf8(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    /// Internal name behind a `CONSTANT_Class` entry.
    pub(crate) fn class_name(&self, index: u16) -> Result<&str, ClassParseError> {
        match self.get(index)? {
            Constant::Class { name_index } => self.utf8(*name_index),
            _ => Err(ClassParseError::InvalidConstantIndex { index }),
        }
    }

    /// Like [`Self::class_name`] but treats index 0 as "absent".
    pub(crate) fn optional_class_name(&self, index: u16) -> Result<Option<&str>, ClassParseError> {
        if index == 0 {
            return Ok(None);
        }
        self.class_name(index).map(Some)
    }
}
