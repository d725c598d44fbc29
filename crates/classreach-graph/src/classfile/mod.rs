//! Class file reference extraction.
//!
//! [`parse_class`] walks a compiled class file and records every class name
//! the file mentions: the constant pool, member descriptors, generic
//! signatures, checked exceptions, nesting metadata, local variable tables
//! and annotation payloads (type annotations included). Names are returned
//! raw, in whatever form the class file stores them (internal names, and
//! array encodings for `CONSTANT_Class` entries that denote array types).

mod constant_pool;
mod reader;
mod signature;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::class_name::ClassName;
use crate::classpath::ClasspathError;
use constant_pool::{Constant, ConstantPool};
use reader::ByteReader;
use signature::{scan_class_signature, scan_descriptor, scan_field_signature, scan_method_signature};

/// Error raised when bytes cannot be read as a class file.
#[derive(Debug, Error)]
pub enum ClassParseError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("malformed descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("invalid annotation element tag '{0}'")]
    InvalidElementTag(char),
    #[error("invalid type annotation target 0x{0:02x}")]
    InvalidTypeAnnotationTarget(u8),
}

/// References extracted from one class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassReferences {
    /// Internal name of the class the file defines.
    pub this_class: String,
    /// Internal name of the superclass, absent only for `java/lang/Object`.
    pub super_class: Option<String>,
    /// Internal names of directly implemented interfaces.
    pub interfaces: Vec<String>,
    /// Every referenced name, raw. Includes `this_class`.
    pub names: BTreeSet<String>,
}

impl ClassReferences {
    /// Canonical name of the defining class.
    pub fn class_name(&self) -> Option<ClassName> {
        ClassName::from_reference(&self.this_class)
    }

    /// Canonical forms of every referenced name, primitive markers dropped.
    pub fn canonical_names(&self) -> BTreeSet<ClassName> {
        self.names
            .iter()
            .filter_map(|raw| ClassName::from_reference(raw))
            .collect()
    }
}

#[derive(Clone, Copy)]
enum Owner {
    Class,
    Field,
    Method,
    RecordComponent,
}

/// Read and parse the class file at `path`.
pub fn read_class_file(path: &Path) -> Result<ClassReferences, ClasspathError> {
    let bytes = fs::read(path).map_err(|source| ClasspathError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_class(&bytes).map_err(|source| ClasspathError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a class file and collect every class it references.
pub fn parse_class(bytes: &[u8]) -> Result<ClassReferences, ClassParseError> {
    let mut reader = ByteReader::new(bytes);
    reader.expect_magic()?;
    let _minor_version = reader.read_u2()?;
    let _major_version = reader.read_u2()?;
    let pool = ConstantPool::parse(&mut reader)?;

    let mut collector = Collector {
        pool: &pool,
        names: FxHashSet::default(),
    };
    collector.scan_constant_pool()?;

    let _access_flags = reader.read_u2()?;
    let this_class = pool.class_name(reader.read_u2()?)?.to_string();
    let super_class = pool.optional_class_name(reader.read_u2()?)?.map(str::to_string);

    let interfaces_count = reader.read_u2()?;
    let mut interfaces = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        interfaces.push(pool.class_name(reader.read_u2()?)?.to_string());
    }

    let fields_count = reader.read_u2()?;
    for _ in 0..fields_count {
        collector.member(&mut reader, Owner::Field)?;
    }

    let methods_count = reader.read_u2()?;
    for _ in 0..methods_count {
        collector.member(&mut reader, Owner::Method)?;
    }

    collector.attributes(&mut reader, Owner::Class)?;

    let mut names: BTreeSet<String> = collector.names.into_iter().collect();
    names.insert(this_class.clone());
    if let Some(super_class) = &super_class {
        names.insert(super_class.clone());
    }
    names.extend(interfaces.iter().cloned());

    Ok(ClassReferences {
        this_class,
        super_class,
        interfaces,
        names,
    })
}

struct Collector<'p> {
    pool: &'p ConstantPool,
    names: FxHashSet<String>,
}

impl<'p> Collector<'p> {
    fn scan_constant_pool(&mut self) -> Result<(), ClassParseError> {
        for entry in self.pool.entries() {
            match entry {
                Constant::Class { name_index } => {
                    self.names.insert(self.pool.utf8(*name_index)?.to_string());
                }
                Constant::NameAndType { descriptor_index } => {
                    let descriptor = self.pool.utf8(*descriptor_index)?;
                    scan_descriptor(descriptor, &mut self.names)?;
                }
                Constant::MethodType { descriptor_index } => {
                    let descriptor = self.pool.utf8(*descriptor_index)?;
                    scan_method_signature(descriptor, &mut self.names)?;
                }
                Constant::Utf8(_) | Constant::Other | Constant::Unusable => {}
            }
        }
        Ok(())
    }

    fn class_index(&mut self, index: u16) -> Result<(), ClassParseError> {
        if let Some(name) = self.pool.optional_class_name(index)? {
            self.names.insert(name.to_string());
        }
        Ok(())
    }

    fn member(&mut self, reader: &mut ByteReader<'_>, owner: Owner) -> Result<(), ClassParseError> {
        let _access_flags = reader.read_u2()?;
        let _name_index = reader.read_u2()?;
        let descriptor = self.pool.utf8(reader.read_u2()?)?;
        match owner {
            Owner::Method => scan_method_signature(descriptor, &mut self.names)?,
            _ => scan_field_signature(descriptor, &mut self.names)?,
        }
        self.attributes(reader, owner)
    }

    fn attributes(&mut self, reader: &mut ByteReader<'_>, owner: Owner) -> Result<(), ClassParseError> {
        let count = reader.read_u2()?;
        for _ in 0..count {
            let name = self.pool.utf8(reader.read_u2()?)?;
            let length = reader.read_u4()? as usize;
            let mut body = ByteReader::new(reader.read_slice(length)?);
            self.attribute(name, &mut body, owner)?;
        }
        Ok(())
    }

    fn attribute(
        &mut self,
        name: &str,
        body: &mut ByteReader<'_>,
        owner: Owner,
    ) -> Result<(), ClassParseError> {
        match name {
            "Signature" => {
                let signature = self.pool.utf8(body.read_u2()?)?;
                match owner {
                    Owner::Class => scan_class_signature(signature, &mut self.names)?,
                    Owner::Method => scan_method_signature(signature, &mut self.names)?,
                    Owner::Field | Owner::RecordComponent => {
                        scan_field_signature(signature, &mut self.names)?
                    }
                }
            }
            "Exceptions" | "NestMembers" | "PermittedSubclasses" => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    self.class_index(body.read_u2()?)?;
                }
            }
            "NestHost" => self.class_index(body.read_u2()?)?,
            "EnclosingMethod" => {
                self.class_index(body.read_u2()?)?;
                let _method_index = body.read_u2()?;
            }
            "InnerClasses" => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    self.class_index(body.read_u2()?)?;
                    self.class_index(body.read_u2()?)?;
                    let _inner_name_index = body.read_u2()?;
                    let _inner_flags = body.read_u2()?;
                }
            }
            "Code" => self.code(body)?,
            "LocalVariableTable" | "LocalVariableTypeTable" => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    let _start_pc = body.read_u2()?;
                    let _length = body.read_u2()?;
                    let _name_index = body.read_u2()?;
                    let descriptor = self.pool.utf8(body.read_u2()?)?;
                    let _slot = body.read_u2()?;
                    scan_field_signature(descriptor, &mut self.names)?;
                }
            }
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                self.annotations(body)?;
            }
            "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations" => {
                let parameters = body.read_u1()?;
                for _ in 0..parameters {
                    self.annotations(body)?;
                }
            }
            "RuntimeVisibleTypeAnnotations" | "RuntimeInvisibleTypeAnnotations" => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    self.type_annotation(body)?;
                }
            }
            "AnnotationDefault" => self.element_value(body)?,
            "Record" => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    let _name_index = body.read_u2()?;
                    let descriptor = self.pool.utf8(body.read_u2()?)?;
                    scan_field_signature(descriptor, &mut self.names)?;
                    self.attributes(body, Owner::RecordComponent)?;
                }
            }
            // Everything else carries no class references outside the constant pool.
            _ => {}
        }
        Ok(())
    }

    fn code(&mut self, body: &mut ByteReader<'_>) -> Result<(), ClassParseError> {
        let _max_stack = body.read_u2()?;
        let _max_locals = body.read_u2()?;
        let code_length = body.read_u4()? as usize;
        body.skip(code_length)?;
        let handlers = body.read_u2()?;
        for _ in 0..handlers {
            let _start_pc = body.read_u2()?;
            let _end_pc = body.read_u2()?;
            let _handler_pc = body.read_u2()?;
            self.class_index(body.read_u2()?)?;
        }
        self.attributes(body, Owner::Method)
    }

    fn annotations(&mut self, body: &mut ByteReader<'_>) -> Result<(), ClassParseError> {
        let count = body.read_u2()?;
        for _ in 0..count {
            self.annotation(body)?;
        }
        Ok(())
    }

    fn annotation(&mut self, body: &mut ByteReader<'_>) -> Result<(), ClassParseError> {
        let type_descriptor = self.pool.utf8(body.read_u2()?)?;
        scan_field_signature(type_descriptor, &mut self.names)?;
        let pairs = body.read_u2()?;
        for _ in 0..pairs {
            let _element_name_index = body.read_u2()?;
            self.element_value(body)?;
        }
        Ok(())
    }

    fn type_annotation(&mut self, body: &mut ByteReader<'_>) -> Result<(), ClassParseError> {
        let target_type = body.read_u1()?;
        let target_info = match target_type {
            // type parameter, or the throws/formal parameter index
            0x00 | 0x01 | 0x16 => 1,
            // supertype, throws, catch and instruction offset targets
            0x10 | 0x17 | 0x42..=0x46 => 2,
            // type parameter bound
            0x11 | 0x12 => 2,
            // field, return, receiver
            0x13..=0x15 => 0,
            // local variable table
            0x40 | 0x41 => {
                let table_length = body.read_u2()? as usize;
                table_length * 6
            }
            // cast and type argument offsets
            0x47..=0x4B => 3,
            other => return Err(ClassParseError::InvalidTypeAnnotationTarget(other)),
        };
        body.skip(target_info)?;
        let path_length = body.read_u1()? as usize;
        body.skip(path_length * 2)?;
        self.annotation(body)
    }

    fn element_value(&mut self, body: &mut ByteReader<'_>) -> Result<(), ClassParseError> {
        let tag = body.read_u1()?;
        match tag {
            b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b's' => {
                let _const_value_index = body.read_u2()?;
            }
            b'e' => {
                let enum_type = self.pool.utf8(body.read_u2()?)?;
                scan_field_signature(enum_type, &mut self.names)?;
                let _const_name_index = body.read_u2()?;
            }
            b'c' => {
                let class_info = self.pool.utf8(body.read_u2()?)?;
                scan_field_signature(class_info, &mut self.names)?;
            }
            b'@' => self.annotation(body)?,
            b'[' => {
                let count = body.read_u2()?;
                for _ in 0..count {
                    self.element_value(body)?;
                }
            }
            other => return Err(ClassParseError::InvalidElementTag(other as char)),
        }
        Ok(())
    }
}
