//! Encodes [`ClassDescriptor`]s as class files.
//!
//! Produces structurally valid class files without bytecode: methods carry
//! no `Code` attribute. Used to build fixtures for importer and end-to-end
//! tests without a JDK.

use crate::classfile::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_PRIVATE, ACC_PROTECTED,
    ACC_PUBLIC, ACC_STATIC, ACC_SUPER, MAGIC, TAG_CLASS, TAG_DOUBLE, TAG_INTEGER, TAG_LONG,
    TAG_UTF8,
};
use crate::descriptor::{method_descriptor, type_to_descriptor, type_to_internal};
use crate::mutf8;
use byteorder::{BigEndian, WriteBytesExt};
use classlint_core::{
    Annotation, AnnotationValue, ClassDescriptor, ClassKind, Modifiers, TypeName, Visibility,
};
use std::collections::HashMap;
use std::io;

const JAVA_17: u16 = 61;

/// Writes class files from descriptors.
#[derive(Debug, Clone, Copy)]
pub struct ClassFileWriter {
    major_version: u16,
}

impl Default for ClassFileWriter {
    fn default() -> Self {
        Self {
            major_version: JAVA_17,
        }
    }
}

impl ClassFileWriter {
    /// Creates a writer emitting Java 17 class files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the class-file major version.
    #[must_use]
    pub fn major_version(mut self, version: u16) -> Self {
        self.major_version = version;
        self
    }

    /// Encodes one class.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when a table exceeds the
    /// class-file limits (e.g. more than 65535 constants).
    pub fn write(&self, class: &ClassDescriptor) -> io::Result<Vec<u8>> {
        let mut pool = PoolBuilder::default();
        let mut body = Vec::new();

        body.write_u16::<BigEndian>(class_flags(class))?;
        body.write_u16::<BigEndian>(pool.class(&class.name)?)?;
        let superclass = match class.kind {
            ClassKind::Interface | ClassKind::Annotation => {
                Some(pool.class(&TypeName::new("java.lang.Object"))?)
            }
            _ => class
                .superclass
                .as_ref()
                .map(|s| pool.class(s))
                .transpose()?,
        };
        body.write_u16::<BigEndian>(superclass.unwrap_or(0))?;

        body.write_u16::<BigEndian>(count(class.interfaces.len())?)?;
        for interface in &class.interfaces {
            body.write_u16::<BigEndian>(pool.class(interface)?)?;
        }

        body.write_u16::<BigEndian>(count(class.fields.len())?)?;
        for field in &class.fields {
            body.write_u16::<BigEndian>(member_flags(field.modifiers))?;
            body.write_u16::<BigEndian>(pool.utf8(&field.name)?)?;
            body.write_u16::<BigEndian>(pool.utf8(&type_to_descriptor(&field.field_type))?)?;
            let mut attributes = Vec::new();
            if !field.annotations.is_empty() {
                attributes.push(annotations_attribute(&mut pool, &field.annotations)?);
            }
            write_attributes(&mut body, &attributes)?;
        }

        body.write_u16::<BigEndian>(count(class.methods.len())?)?;
        for method in &class.methods {
            let params: Vec<TypeName> = method
                .parameters
                .iter()
                .map(|p| p.param_type.clone())
                .collect();
            body.write_u16::<BigEndian>(member_flags(method.modifiers))?;
            body.write_u16::<BigEndian>(pool.utf8(&method.name)?)?;
            body.write_u16::<BigEndian>(
                pool.utf8(&method_descriptor(&params, &method.return_type))?,
            )?;

            let mut attributes = Vec::new();
            if !method.annotations.is_empty() {
                attributes.push(annotations_attribute(&mut pool, &method.annotations)?);
            }
            if method.parameters.iter().any(|p| !p.annotations.is_empty()) {
                let mut data = Vec::new();
                data.write_u8(u8::try_from(method.parameters.len()).map_err(too_large)?)?;
                for parameter in &method.parameters {
                    write_annotations(&mut pool, &mut data, &parameter.annotations)?;
                }
                attributes.push((pool.utf8("RuntimeVisibleParameterAnnotations")?, data));
            }
            if !method.parameters.is_empty() {
                let mut data = Vec::new();
                data.write_u8(u8::try_from(method.parameters.len()).map_err(too_large)?)?;
                for parameter in &method.parameters {
                    data.write_u16::<BigEndian>(pool.utf8(&parameter.name)?)?;
                    data.write_u16::<BigEndian>(0)?;
                }
                attributes.push((pool.utf8("MethodParameters")?, data));
            }
            write_attributes(&mut body, &attributes)?;
        }

        for reference in &class.code_references {
            pool.class(reference)?;
        }

        let mut attributes = Vec::new();
        if let Some(source_file) = &class.source_file {
            let mut data = Vec::new();
            data.write_u16::<BigEndian>(pool.utf8(source_file)?)?;
            attributes.push((pool.utf8("SourceFile")?, data));
        }
        if !class.annotations.is_empty() {
            attributes.push(annotations_attribute(&mut pool, &class.annotations)?);
        }
        if class.kind == ClassKind::Record {
            let components: Vec<_> = class
                .fields
                .iter()
                .filter(|f| !f.modifiers.is_static)
                .collect();
            let mut data = Vec::new();
            data.write_u16::<BigEndian>(count(components.len())?)?;
            for component in components {
                data.write_u16::<BigEndian>(pool.utf8(&component.name)?)?;
                data.write_u16::<BigEndian>(
                    pool.utf8(&type_to_descriptor(&component.field_type))?,
                )?;
                data.write_u16::<BigEndian>(0)?;
            }
            attributes.push((pool.utf8("Record")?, data));
        }
        write_attributes(&mut body, &attributes)?;

        let mut out = Vec::with_capacity(body.len() + 256);
        out.write_u32::<BigEndian>(MAGIC)?;
        out.write_u16::<BigEndian>(0)?;
        out.write_u16::<BigEndian>(self.major_version)?;
        pool.write_to(&mut out)?;
        out.extend_from_slice(&body);
        Ok(out)
    }
}

fn class_flags(class: &ClassDescriptor) -> u16 {
    let kind = match class.kind {
        ClassKind::Class | ClassKind::Record => ACC_SUPER,
        ClassKind::Enum => ACC_SUPER | ACC_ENUM,
        ClassKind::Interface => ACC_INTERFACE | ACC_ABSTRACT,
        ClassKind::Annotation => ACC_ANNOTATION | ACC_INTERFACE | ACC_ABSTRACT,
    };
    kind | member_flags(class.modifiers)
}

fn member_flags(modifiers: Modifiers) -> u16 {
    let mut flags = match modifiers.visibility {
        Visibility::Public => ACC_PUBLIC,
        Visibility::Protected => ACC_PROTECTED,
        Visibility::Private => ACC_PRIVATE,
        Visibility::Package => 0,
    };
    if modifiers.is_static {
        flags |= ACC_STATIC;
    }
    if modifiers.is_final {
        flags |= ACC_FINAL;
    }
    if modifiers.is_abstract {
        flags |= ACC_ABSTRACT;
    }
    flags
}

fn annotations_attribute(
    pool: &mut PoolBuilder,
    annotations: &[Annotation],
) -> io::Result<(u16, Vec<u8>)> {
    let mut data = Vec::new();
    write_annotations(pool, &mut data, annotations)?;
    Ok((pool.utf8("RuntimeVisibleAnnotations")?, data))
}

fn write_annotations(
    pool: &mut PoolBuilder,
    out: &mut Vec<u8>,
    annotations: &[Annotation],
) -> io::Result<()> {
    out.write_u16::<BigEndian>(count(annotations.len())?)?;
    for annotation in annotations {
        write_annotation(pool, out, annotation)?;
    }
    Ok(())
}

fn write_annotation(
    pool: &mut PoolBuilder,
    out: &mut Vec<u8>,
    annotation: &Annotation,
) -> io::Result<()> {
    out.write_u16::<BigEndian>(pool.utf8(&type_to_descriptor(&annotation.type_name))?)?;
    out.write_u16::<BigEndian>(count(annotation.properties.len())?)?;
    for (name, value) in &annotation.properties {
        out.write_u16::<BigEndian>(pool.utf8(name)?)?;
        write_element_value(pool, out, value)?;
    }
    Ok(())
}

fn write_element_value(
    pool: &mut PoolBuilder,
    out: &mut Vec<u8>,
    value: &AnnotationValue,
) -> io::Result<()> {
    match value {
        AnnotationValue::Int(v) => match i32::try_from(*v) {
            Ok(small) => {
                out.write_u8(b'I')?;
                out.write_u16::<BigEndian>(pool.add(Entry::Integer(small))?)?;
            }
            Err(_) => {
                out.write_u8(b'J')?;
                out.write_u16::<BigEndian>(pool.add(Entry::Long(*v))?)?;
            }
        },
        AnnotationValue::Float(x) => {
            out.write_u8(b'D')?;
            out.write_u16::<BigEndian>(pool.add(Entry::Double(x.to_bits()))?)?;
        }
        AnnotationValue::Bool(b) => {
            out.write_u8(b'Z')?;
            out.write_u16::<BigEndian>(pool.add(Entry::Integer(i32::from(*b)))?)?;
        }
        AnnotationValue::Char(c) => {
            let code = i32::try_from(u32::from(*c)).map_err(too_large)?;
            out.write_u8(b'C')?;
            out.write_u16::<BigEndian>(pool.add(Entry::Integer(code))?)?;
        }
        AnnotationValue::String(s) => {
            out.write_u8(b's')?;
            out.write_u16::<BigEndian>(pool.utf8(s)?)?;
        }
        AnnotationValue::Enum {
            type_name,
            constant,
        } => {
            out.write_u8(b'e')?;
            out.write_u16::<BigEndian>(pool.utf8(&type_to_descriptor(type_name))?)?;
            out.write_u16::<BigEndian>(pool.utf8(constant)?)?;
        }
        AnnotationValue::Class(type_name) => {
            out.write_u8(b'c')?;
            out.write_u16::<BigEndian>(pool.utf8(&type_to_descriptor(type_name))?)?;
        }
        AnnotationValue::Annotation(nested) => {
            out.write_u8(b'@')?;
            write_annotation(pool, out, nested)?;
        }
        AnnotationValue::Array(items) => {
            out.write_u8(b'[')?;
            out.write_u16::<BigEndian>(count(items.len())?)?;
            for item in items {
                write_element_value(pool, out, item)?;
            }
        }
    }
    Ok(())
}

fn write_attributes(out: &mut Vec<u8>, attributes: &[(u16, Vec<u8>)]) -> io::Result<()> {
    out.write_u16::<BigEndian>(count(attributes.len())?)?;
    for (name, data) in attributes {
        out.write_u16::<BigEndian>(*name)?;
        out.write_u32::<BigEndian>(u32::try_from(data.len()).map_err(too_large)?)?;
        out.extend_from_slice(data);
    }
    Ok(())
}

fn count(len: usize) -> io::Result<u16> {
    u16::try_from(len).map_err(too_large)
}

fn too_large(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Entry {
    Utf8(String),
    Integer(i32),
    Long(i64),
    Double(u64),
    Class(u16),
}

/// Deduplicating constant pool under construction.
#[derive(Debug, Default)]
struct PoolBuilder {
    entries: Vec<Entry>,
    index: HashMap<Entry, u16>,
    slots: u16,
}

impl PoolBuilder {
    fn add(&mut self, entry: Entry) -> io::Result<u16> {
        if let Some(&index) = self.index.get(&entry) {
            return Ok(index);
        }
        let width = if matches!(entry, Entry::Long(_) | Entry::Double(_)) {
            2
        } else {
            1
        };
        let index = self.slots + 1;
        self.slots = self
            .slots
            .checked_add(width)
            .filter(|&s| s < u16::MAX)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "constant pool overflow"))?;
        self.index.insert(entry.clone(), index);
        self.entries.push(entry);
        Ok(index)
    }

    fn utf8(&mut self, text: &str) -> io::Result<u16> {
        self.add(Entry::Utf8(text.to_string()))
    }

    fn class(&mut self, name: &TypeName) -> io::Result<u16> {
        let name_index = self.utf8(&type_to_internal(name))?;
        self.add(Entry::Class(name_index))
    }

    fn write_to(&self, out: &mut Vec<u8>) -> io::Result<()> {
        out.write_u16::<BigEndian>(self.slots + 1)?;
        for entry in &self.entries {
            match entry {
                Entry::Utf8(text) => {
                    let bytes = mutf8::encode(text);
                    out.write_u8(TAG_UTF8)?;
                    out.write_u16::<BigEndian>(count(bytes.len())?)?;
                    out.extend_from_slice(&bytes);
                }
                Entry::Integer(v) => {
                    out.write_u8(TAG_INTEGER)?;
                    out.write_i32::<BigEndian>(*v)?;
                }
                Entry::Long(v) => {
                    out.write_u8(TAG_LONG)?;
                    out.write_i64::<BigEndian>(*v)?;
                }
                Entry::Double(bits) => {
                    out.write_u8(TAG_DOUBLE)?;
                    out.write_u64::<BigEndian>(*bits)?;
                }
                Entry::Class(name_index) => {
                    out.write_u8(TAG_CLASS)?;
                    out.write_u16::<BigEndian>(*name_index)?;
                }
            }
        }
        Ok(())
    }
}
