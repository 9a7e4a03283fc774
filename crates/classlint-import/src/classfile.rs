//! Class-file decoding into [`ClassDescriptor`]s.
//!
//! Only the structure is read: constant pool, access flags, members, and
//! the attributes that carry annotations, parameter names, record and
//! source information. Bytecode is never interpreted.

use crate::descriptor::{field_type, internal_to_type, method_type, slot_size};
use crate::error::ClassFormatError;
use crate::mutf8;
use byteorder::{BigEndian, ReadBytesExt};
use classlint_core::{
    Annotation, AnnotationValue, ClassDescriptor, ClassKind, FieldDescriptor, MethodDescriptor,
    Modifiers, Parameter, TypeName, Visibility, CONSTRUCTOR_NAME,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;

pub(crate) const MAGIC: u32 = 0xCAFE_BABE;

pub(crate) const ACC_PUBLIC: u16 = 0x0001;
pub(crate) const ACC_PRIVATE: u16 = 0x0002;
pub(crate) const ACC_PROTECTED: u16 = 0x0004;
pub(crate) const ACC_STATIC: u16 = 0x0008;
pub(crate) const ACC_FINAL: u16 = 0x0010;
pub(crate) const ACC_SUPER: u16 = 0x0020;
pub(crate) const ACC_BRIDGE: u16 = 0x0040;
pub(crate) const ACC_INTERFACE: u16 = 0x0200;
pub(crate) const ACC_ABSTRACT: u16 = 0x0400;
pub(crate) const ACC_SYNTHETIC: u16 = 0x1000;
pub(crate) const ACC_ANNOTATION: u16 = 0x2000;
pub(crate) const ACC_ENUM: u16 = 0x4000;

pub(crate) const TAG_UTF8: u8 = 1;
pub(crate) const TAG_INTEGER: u8 = 3;
pub(crate) const TAG_FLOAT: u8 = 4;
pub(crate) const TAG_LONG: u8 = 5;
pub(crate) const TAG_DOUBLE: u8 = 6;
pub(crate) const TAG_CLASS: u8 = 7;

const CLASS_INITIALIZER: &str = "<clinit>";

/// Decodes one class file.
///
/// # Errors
///
/// Returns [`ClassFormatError`] for truncated or malformed input.
pub fn parse_class(bytes: &[u8]) -> Result<ClassDescriptor, ClassFormatError> {
    let mut r = Reader::new(bytes);
    let magic = r.u4()?;
    if magic != MAGIC {
        return Err(ClassFormatError::BadMagic { found: magic });
    }
    let _minor = r.u2()?;
    let _major = r.u2()?;
    let pool = ConstantPool::read(&mut r)?;

    let access = r.u2()?;
    let this_index = r.u2()?;
    let name = pool.class_name(this_index)?;
    let super_index = r.u2()?;
    let superclass = if super_index == 0 {
        None
    } else {
        Some(pool.class_name(super_index)?)
    };

    let interface_count = r.u2()?;
    let mut interfaces = Vec::with_capacity(usize::from(interface_count));
    for _ in 0..interface_count {
        interfaces.push(pool.class_name(r.u2()?)?);
    }

    let field_count = r.u2()?;
    let mut fields = Vec::with_capacity(usize::from(field_count));
    for _ in 0..field_count {
        if let Some(field) = read_field(&mut r, &pool, &name)? {
            fields.push(field);
        }
    }

    let method_count = r.u2()?;
    let mut methods = Vec::with_capacity(usize::from(method_count));
    for _ in 0..method_count {
        if let Some(method) = read_method(&mut r, &pool, &name)? {
            methods.push(method);
        }
    }

    let mut class_attrs = ClassAttributes::default();
    for_each_attribute(&mut r, &pool, |attr, data| {
        read_class_attribute(attr, data, &pool, this_index, &mut class_attrs)
    })?;

    let flags = class_attrs.inner_access.unwrap_or(access);
    let kind = if flags & ACC_ANNOTATION != 0 {
        ClassKind::Annotation
    } else if flags & ACC_INTERFACE != 0 {
        ClassKind::Interface
    } else if flags & ACC_ENUM != 0 {
        ClassKind::Enum
    } else if class_attrs.is_record {
        ClassKind::Record
    } else {
        ClassKind::Class
    };
    let code_references = code_references(&pool, &name, superclass.as_ref(), &interfaces)?;
    // interfaces name java.lang.Object as their superclass
    let superclass = match kind {
        ClassKind::Interface | ClassKind::Annotation => None,
        _ => superclass,
    };

    let mut class = ClassDescriptor::new(name, kind).with_modifiers(modifiers(flags));
    class.superclass = superclass;
    class.interfaces = interfaces;
    class.annotations = class_attrs.annotations;
    class.fields = fields;
    class.methods = methods;
    class.source_file = class_attrs.source_file;
    class.code_references = code_references;
    Ok(class)
}

pub(crate) fn modifiers(flags: u16) -> Modifiers {
    let visibility = if flags & ACC_PUBLIC != 0 {
        Visibility::Public
    } else if flags & ACC_PRIVATE != 0 {
        Visibility::Private
    } else if flags & ACC_PROTECTED != 0 {
        Visibility::Protected
    } else {
        Visibility::Package
    };
    Modifiers {
        visibility,
        is_static: flags & ACC_STATIC != 0,
        is_final: flags & ACC_FINAL != 0,
        is_abstract: flags & ACC_ABSTRACT != 0,
    }
}

fn read_field(
    r: &mut Reader<'_>,
    pool: &ConstantPool,
    owner: &TypeName,
) -> Result<Option<FieldDescriptor>, ClassFormatError> {
    let access = r.u2()?;
    let name = pool.utf8(r.u2()?)?.to_string();
    let field_type = field_type(pool.utf8(r.u2()?)?)?;

    let mut annotations = Vec::new();
    for_each_attribute(r, pool, |attr, data| {
        if is_annotations_attribute(attr) {
            annotations.extend(read_annotations(&mut Reader::new(data), pool)?);
        }
        Ok(())
    })?;

    if access & ACC_SYNTHETIC != 0 {
        return Ok(None);
    }
    Ok(Some(FieldDescriptor {
        owner: owner.clone(),
        name,
        field_type,
        annotations,
        modifiers: modifiers(access),
    }))
}

#[derive(Default)]
struct MethodAttributes {
    annotations: Vec<Annotation>,
    parameter_annotations: Vec<Vec<Annotation>>,
    parameter_names: Option<Vec<Option<String>>>,
    local_names: HashMap<u16, String>,
}

fn read_method(
    r: &mut Reader<'_>,
    pool: &ConstantPool,
    owner: &TypeName,
) -> Result<Option<MethodDescriptor>, ClassFormatError> {
    let access = r.u2()?;
    let name = pool.utf8(r.u2()?)?.to_string();
    let (param_types, return_type) = method_type(pool.utf8(r.u2()?)?)?;

    let mut attrs = MethodAttributes::default();
    for_each_attribute(r, pool, |attr, data| {
        read_method_attribute(attr, data, pool, param_types.len(), &mut attrs)
    })?;

    if access & (ACC_SYNTHETIC | ACC_BRIDGE) != 0 || name == CLASS_INITIALIZER {
        return Ok(None);
    }

    let mut slot = u16::from(access & ACC_STATIC == 0);
    let mut parameters = Vec::with_capacity(param_types.len());
    for (index, param_type) in param_types.into_iter().enumerate() {
        let recorded = attrs
            .parameter_names
            .as_ref()
            .and_then(|names| names.get(index).cloned().flatten());
        let name = recorded
            .or_else(|| attrs.local_names.get(&slot).cloned())
            .unwrap_or_else(|| format!("arg{index}"));
        slot += slot_size(&param_type);
        parameters.push(Parameter {
            index,
            name,
            param_type,
            annotations: attrs
                .parameter_annotations
                .get(index)
                .cloned()
                .unwrap_or_default(),
        });
    }

    Ok(Some(MethodDescriptor {
        owner: owner.clone(),
        is_constructor: name == CONSTRUCTOR_NAME,
        name,
        return_type,
        parameters,
        annotations: attrs.annotations,
        modifiers: modifiers(access),
    }))
}

fn read_method_attribute(
    attr: &str,
    data: &[u8],
    pool: &ConstantPool,
    param_count: usize,
    attrs: &mut MethodAttributes,
) -> Result<(), ClassFormatError> {
    let mut r = Reader::new(data);
    match attr {
        "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
            attrs.annotations.extend(read_annotations(&mut r, pool)?);
        }
        "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations" => {
            if attrs.parameter_annotations.len() < param_count {
                attrs.parameter_annotations.resize(param_count, Vec::new());
            }
            let recorded = usize::from(r.u1()?);
            // javac omits synthetic leading parameters here
            let offset = param_count.saturating_sub(recorded);
            for i in 0..recorded {
                let annotations = read_annotations(&mut r, pool)?;
                if let Some(slot) = attrs.parameter_annotations.get_mut(offset + i) {
                    slot.extend(annotations);
                }
            }
        }
        "MethodParameters" => {
            let count = r.u1()?;
            let mut names = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                let name_index = r.u2()?;
                let _flags = r.u2()?;
                names.push(if name_index == 0 {
                    None
                } else {
                    Some(pool.utf8(name_index)?.to_string())
                });
            }
            if names.len() == param_count {
                attrs.parameter_names = Some(names);
            }
        }
        "Code" => {
            let _max_stack = r.u2()?;
            let _max_locals = r.u2()?;
            let code_length = r.u4()?;
            r.skip(code_length as usize)?;
            let exception_entries = r.u2()?;
            r.skip(usize::from(exception_entries) * 8)?;
            for_each_attribute(&mut r, pool, |inner, table| {
                if inner == "LocalVariableTable" {
                    read_local_names(table, pool, &mut attrs.local_names)?;
                }
                Ok(())
            })?;
        }
        _ => {}
    }
    Ok(())
}

fn read_local_names(
    data: &[u8],
    pool: &ConstantPool,
    names: &mut HashMap<u16, String>,
) -> Result<(), ClassFormatError> {
    let mut r = Reader::new(data);
    let count = r.u2()?;
    for _ in 0..count {
        let start_pc = r.u2()?;
        let _length = r.u2()?;
        let name_index = r.u2()?;
        let _descriptor = r.u2()?;
        let slot = r.u2()?;
        if start_pc == 0 && !names.contains_key(&slot) {
            names.insert(slot, pool.utf8(name_index)?.to_string());
        }
    }
    Ok(())
}

#[derive(Default)]
struct ClassAttributes {
    annotations: Vec<Annotation>,
    source_file: Option<String>,
    is_record: bool,
    inner_access: Option<u16>,
}

fn read_class_attribute(
    attr: &str,
    data: &[u8],
    pool: &ConstantPool,
    this_index: u16,
    attrs: &mut ClassAttributes,
) -> Result<(), ClassFormatError> {
    let mut r = Reader::new(data);
    match attr {
        "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
            attrs.annotations.extend(read_annotations(&mut r, pool)?);
        }
        "SourceFile" => attrs.source_file = Some(pool.utf8(r.u2()?)?.to_string()),
        "Record" => attrs.is_record = true,
        "InnerClasses" => {
            let count = r.u2()?;
            for _ in 0..count {
                let inner = r.u2()?;
                let _outer = r.u2()?;
                let _name = r.u2()?;
                let flags = r.u2()?;
                if inner == this_index {
                    attrs.inner_access = Some(flags);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn is_annotations_attribute(attr: &str) -> bool {
    matches!(
        attr,
        "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations"
    )
}

fn read_annotations(
    r: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, ClassFormatError> {
    let count = r.u2()?;
    (0..count).map(|_| read_annotation(r, pool)).collect()
}

fn read_annotation(r: &mut Reader<'_>, pool: &ConstantPool) -> Result<Annotation, ClassFormatError> {
    let type_name = field_type(pool.utf8(r.u2()?)?)?;
    let pairs = r.u2()?;
    let mut properties = BTreeMap::new();
    for _ in 0..pairs {
        let name = pool.utf8(r.u2()?)?.to_string();
        let value = read_element_value(r, pool)?;
        properties.insert(name, value);
    }
    Ok(Annotation {
        type_name,
        properties,
    })
}

fn read_element_value(
    r: &mut Reader<'_>,
    pool: &ConstantPool,
) -> Result<AnnotationValue, ClassFormatError> {
    let tag = r.u1()?;
    let value = match tag {
        b'B' | b'S' | b'I' => AnnotationValue::Int(i64::from(pool.integer(r.u2()?)?)),
        b'J' => AnnotationValue::Int(pool.long(r.u2()?)?),
        b'Z' => AnnotationValue::Bool(pool.integer(r.u2()?)? != 0),
        b'C' => {
            let index = r.u2()?;
            let code = pool.integer(index)?;
            let c = u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .ok_or(ClassFormatError::BadConstant {
                    index,
                    expected: "char constant",
                })?;
            AnnotationValue::Char(c)
        }
        b'F' => AnnotationValue::Float(f64::from(pool.float(r.u2()?)?)),
        b'D' => AnnotationValue::Float(pool.double(r.u2()?)?),
        b's' => AnnotationValue::String(pool.utf8(r.u2()?)?.to_string()),
        b'e' => {
            let type_name = field_type(pool.utf8(r.u2()?)?)?;
            let constant = pool.utf8(r.u2()?)?.to_string();
            AnnotationValue::Enum {
                type_name,
                constant,
            }
        }
        b'c' => {
            let descriptor = pool.utf8(r.u2()?)?;
            if descriptor == "V" {
                AnnotationValue::Class(TypeName::new("void"))
            } else {
                AnnotationValue::Class(field_type(descriptor)?)
            }
        }
        b'@' => AnnotationValue::Annotation(Box::new(read_annotation(r, pool)?)),
        b'[' => {
            let count = r.u2()?;
            AnnotationValue::Array(
                (0..count)
                    .map(|_| read_element_value(r, pool))
                    .collect::<Result<_, _>>()?,
            )
        }
        other => return Err(ClassFormatError::UnknownElementTag { tag: other }),
    };
    Ok(value)
}

/// Classes named by `CONSTANT_Class` entries, beyond the declared supertypes.
fn code_references(
    pool: &ConstantPool,
    this: &TypeName,
    superclass: Option<&TypeName>,
    interfaces: &[TypeName],
) -> Result<Vec<TypeName>, ClassFormatError> {
    let mut seen: HashSet<TypeName> = HashSet::new();
    seen.insert(this.clone());
    seen.extend(superclass.cloned());
    seen.extend(interfaces.iter().cloned());

    let mut references = Vec::new();
    for index in pool.class_indices() {
        let target = pool.class_name(index)?.element_type();
        if target.is_primitive() {
            continue;
        }
        if seen.insert(target.clone()) {
            references.push(target);
        }
    }
    Ok(references)
}

/// Reads `attributes_count` attributes, handing each body to `visit`.
fn for_each_attribute<'a, F>(
    r: &mut Reader<'a>,
    pool: &ConstantPool,
    mut visit: F,
) -> Result<(), ClassFormatError>
where
    F: FnMut(&str, &'a [u8]) -> Result<(), ClassFormatError>,
{
    let count = r.u2()?;
    for _ in 0..count {
        let name = pool.utf8(r.u2()?)?;
        let length = r.u4()?;
        let data = r.bytes(length as usize)?;
        visit(name, data)?;
    }
    Ok(())
}

enum Constant {
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    Other,
}

struct ConstantPool(Vec<Constant>);

impl ConstantPool {
    fn read(r: &mut Reader<'_>) -> Result<Self, ClassFormatError> {
        let count = r.u2()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(Constant::Unusable);
        let mut index = 1u16;
        while index < count {
            let tag = r.u1()?;
            let (entry, wide) = match tag {
                TAG_UTF8 => {
                    let length = r.u2()?;
                    let bytes = r.bytes(usize::from(length))?;
                    let text =
                        mutf8::decode(bytes).ok_or(ClassFormatError::InvalidUtf8 { index })?;
                    (Constant::Utf8(text), false)
                }
                TAG_INTEGER => (Constant::Integer(r.i4()?), false),
                TAG_FLOAT => (Constant::Float(f32::from_bits(r.u4()?)), false),
                TAG_LONG => (Constant::Long(r.i8()?), true),
                TAG_DOUBLE => (Constant::Double(f64::from_bits(r.u8()?)), true),
                TAG_CLASS => (Constant::Class(r.u2()?), false),
                // String, MethodType, Module, Package
                8 | 16 | 19 | 20 => {
                    r.skip(2)?;
                    (Constant::Other, false)
                }
                // member refs, NameAndType, Dynamic, InvokeDynamic
                9..=12 | 17 | 18 => {
                    r.skip(4)?;
                    (Constant::Other, false)
                }
                // MethodHandle
                15 => {
                    r.skip(3)?;
                    (Constant::Other, false)
                }
                other => return Err(ClassFormatError::UnknownConstantTag { index, tag: other }),
            };
            if wide && index + 1 >= count {
                return Err(ClassFormatError::BadConstant {
                    index,
                    expected: "8-byte constant inside the pool",
                });
            }
            entries.push(entry);
            index += 1;
            if wide {
                entries.push(Constant::Unusable);
                index += 1;
            }
        }
        Ok(Self(entries))
    }

    fn get(&self, index: u16) -> Option<&Constant> {
        self.0.get(usize::from(index))
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Utf8(s)) => Ok(s),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Utf8 entry",
            }),
        }
    }

    fn class_name(&self, index: u16) -> Result<TypeName, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Class(name_index)) => internal_to_type(self.utf8(*name_index)?),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Class entry",
            }),
        }
    }

    fn class_indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Constant::Class(_)))
            .filter_map(|(i, _)| u16::try_from(i).ok())
    }

    fn integer(&self, index: u16) -> Result<i32, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Integer(v)) => Ok(*v),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Integer entry",
            }),
        }
    }

    fn long(&self, index: u16) -> Result<i64, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Long(v)) => Ok(*v),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Long entry",
            }),
        }
    }

    fn float(&self, index: u16) -> Result<f32, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Float(v)) => Ok(*v),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Float entry",
            }),
        }
    }

    fn double(&self, index: u16) -> Result<f64, ClassFormatError> {
        match self.get(index) {
            Some(Constant::Double(v)) => Ok(*v),
            _ => Err(ClassFormatError::BadConstant {
                index,
                expected: "Double entry",
            }),
        }
    }
}

/// Big-endian reader over a borrowed buffer.
struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn truncated(&self) -> ClassFormatError {
        ClassFormatError::Truncated {
            offset: self.cursor.position(),
        }
    }

    fn u1(&mut self) -> Result<u8, ClassFormatError> {
        self.cursor.read_u8().map_err(|_| self.truncated())
    }

    fn u2(&mut self) -> Result<u16, ClassFormatError> {
        self.cursor
            .read_u16::<BigEndian>()
            .map_err(|_| self.truncated())
    }

    fn u4(&mut self) -> Result<u32, ClassFormatError> {
        self.cursor
            .read_u32::<BigEndian>()
            .map_err(|_| self.truncated())
    }

    fn i4(&mut self) -> Result<i32, ClassFormatError> {
        self.cursor
            .read_i32::<BigEndian>()
            .map_err(|_| self.truncated())
    }

    fn u8(&mut self) -> Result<u64, ClassFormatError> {
        self.cursor
            .read_u64::<BigEndian>()
            .map_err(|_| self.truncated())
    }

    fn i8(&mut self) -> Result<i64, ClassFormatError> {
        self.cursor
            .read_i64::<BigEndian>()
            .map_err(|_| self.truncated())
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], ClassFormatError> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = usize::try_from(self.cursor.position()).map_err(|_| self.truncated())?;
        let end = start.checked_add(len).ok_or_else(|| self.truncated())?;
        let slice = data.get(start..end).ok_or_else(|| self.truncated())?;
        self.cursor.set_position(end as u64);
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassFormatError> {
        self.bytes(len).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `public class x.Empty extends java.lang.Object`, no members.
    fn empty_class() -> Vec<u8> {
        let mut b = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61];
        // pool: 1 Utf8 x/Empty, 2 Class #1, 3 Utf8 java/lang/Object, 4 Class #3
        b.extend([0, 5]);
        b.extend([TAG_UTF8, 0, 7]);
        b.extend(b"x/Empty");
        b.extend([TAG_CLASS, 0, 1]);
        b.extend([TAG_UTF8, 0, 16]);
        b.extend(b"java/lang/Object");
        b.extend([TAG_CLASS, 0, 3]);
        // public super, this #2, super #4, no interfaces/fields/methods/attributes
        b.extend([0, 0x21, 0, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
        b
    }

    #[test]
    fn decodes_hand_written_class() {
        let Ok(class) = parse_class(&empty_class()) else {
            panic!("valid class rejected");
        };
        assert_eq!(class.name.as_str(), "x.Empty");
        assert_eq!(class.kind, ClassKind::Class);
        assert_eq!(class.modifiers.visibility, Visibility::Public);
        assert_eq!(class.superclass, Some(TypeName::new("java.lang.Object")));
        assert!(class.code_references.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = empty_class();
        bytes[0] = 0xCB;
        assert!(matches!(
            parse_class(&bytes),
            Err(ClassFormatError::BadMagic { found: 0xCBFE_BABE })
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = empty_class();
        for len in [3, 12, 30, bytes.len() - 1] {
            assert!(
                matches!(
                    parse_class(&bytes[..len]),
                    Err(ClassFormatError::Truncated { .. })
                ),
                "length {len}"
            );
        }
    }

    #[test]
    fn rejects_wrong_constant_kind() {
        let mut bytes = empty_class();
        // this_class points at the Utf8 entry instead of the Class entry
        let this_low_byte = bytes.len() - 11;
        bytes[this_low_byte] = 1;
        assert!(matches!(
            parse_class(&bytes),
            Err(ClassFormatError::BadConstant { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_constant_tag() {
        let mut bytes = empty_class();
        bytes[10] = 2;
        assert!(matches!(
            parse_class(&bytes),
            Err(ClassFormatError::UnknownConstantTag { index: 1, tag: 2 })
        ));
    }

    #[test]
    fn rejects_wide_constant_in_last_pool_slot() {
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61, 0xFF, 0xFF];
        for _ in 1..0xFFFE {
            bytes.extend([8, 0, 1]);
        }
        bytes.push(TAG_LONG);
        bytes.extend([0; 8]);
        assert!(matches!(
            parse_class(&bytes),
            Err(ClassFormatError::BadConstant { index: 0xFFFE, .. })
        ));
    }

    #[test]
    fn local_variable_names_must_be_utf8_entries() {
        let bytes = empty_class();
        let Ok(pool) = ConstantPool::read(&mut Reader::new(&bytes[8..])) else {
            panic!("valid pool rejected");
        };
        let table = |name_index: u8| [0, 1, 0, 0, 0, 4, 0, name_index, 0, 3, 0, 0];

        let mut names = HashMap::new();
        assert!(read_local_names(&table(1), &pool, &mut names).is_ok());
        assert_eq!(names.get(&0).map(String::as_str), Some("x/Empty"));

        let mut names = HashMap::new();
        assert!(matches!(
            read_local_names(&table(2), &pool, &mut names),
            Err(ClassFormatError::BadConstant { index: 2, .. })
        ));
    }
}
