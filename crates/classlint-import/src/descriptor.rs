//! JVM type descriptors and internal names.
//!
//! `Ljava/lang/String;` and `[I` on the class-file side, `java.lang.String`
//! and `int[]` on the model side.

use crate::error::ClassFormatError;
use classlint_core::TypeName;

/// Converts an internal name (`a/b/C`) or array class name (`[La/b/C;`).
pub(crate) fn internal_to_type(name: &str) -> Result<TypeName, ClassFormatError> {
    if name.starts_with('[') {
        return field_type(name);
    }
    Ok(TypeName::new(name.replace('/', ".")))
}

/// Converts a type name back to an internal name.
pub(crate) fn type_to_internal(name: &TypeName) -> String {
    if name.is_array() {
        type_to_descriptor(name)
    } else {
        name.as_str().replace('.', "/")
    }
}

/// Parses a complete field descriptor.
pub(crate) fn field_type(descriptor: &str) -> Result<TypeName, ClassFormatError> {
    match parse_one(descriptor)? {
        (ty, "") => Ok(ty),
        _ => Err(bad(descriptor)),
    }
}

/// Parses `(params)return` into parameter types and the return type.
pub(crate) fn method_type(descriptor: &str) -> Result<(Vec<TypeName>, TypeName), ClassFormatError> {
    let inner = descriptor.strip_prefix('(').ok_or_else(|| bad(descriptor))?;
    let (params_text, ret) = inner.split_once(')').ok_or_else(|| bad(descriptor))?;

    let mut params = Vec::new();
    let mut rest = params_text;
    while !rest.is_empty() {
        let (ty, tail) = parse_one(rest).map_err(|_| bad(descriptor))?;
        params.push(ty);
        rest = tail;
    }
    let ret = if ret == "V" {
        TypeName::new("void")
    } else {
        field_type(ret).map_err(|_| bad(descriptor))?
    };
    Ok((params, ret))
}

/// Local variable slots taken by a parameter of this type.
pub(crate) fn slot_size(ty: &TypeName) -> u16 {
    match ty.as_str() {
        "long" | "double" => 2,
        _ => 1,
    }
}

/// Encodes a type name as a field descriptor (`void` as `V`).
pub(crate) fn type_to_descriptor(name: &TypeName) -> String {
    let text = name.as_str();
    let element = text.trim_end_matches("[]");
    let dims = (text.len() - element.len()) / 2;
    let mut out = "[".repeat(dims);
    match element {
        "boolean" => out.push('Z'),
        "byte" => out.push('B'),
        "char" => out.push('C'),
        "short" => out.push('S'),
        "int" => out.push('I'),
        "long" => out.push('J'),
        "float" => out.push('F'),
        "double" => out.push('D'),
        "void" => out.push('V'),
        class => {
            out.push('L');
            out.push_str(&class.replace('.', "/"));
            out.push(';');
        }
    }
    out
}

/// Encodes a method descriptor.
pub(crate) fn method_descriptor(params: &[TypeName], ret: &TypeName) -> String {
    let mut out = String::from("(");
    for p in params {
        out.push_str(&type_to_descriptor(p));
    }
    out.push(')');
    out.push_str(&type_to_descriptor(ret));
    out
}

fn parse_one(text: &str) -> Result<(TypeName, &str), ClassFormatError> {
    let dims = text.len() - text.trim_start_matches('[').len();
    let rest = &text[dims..];
    let mut chars = rest.chars();
    let primitive = match chars.next() {
        Some('Z') => "boolean",
        Some('B') => "byte",
        Some('C') => "char",
        Some('S') => "short",
        Some('I') => "int",
        Some('J') => "long",
        Some('F') => "float",
        Some('D') => "double",
        Some('L') => {
            let end = rest.find(';').ok_or_else(|| bad(text))?;
            let class = &rest[1..end];
            if class.is_empty() {
                return Err(bad(text));
            }
            let name = format!("{}{}", class.replace('/', "."), "[]".repeat(dims));
            return Ok((TypeName::new(name), &rest[end + 1..]));
        }
        _ => return Err(bad(text)),
    };
    let name = format!("{primitive}{}", "[]".repeat(dims));
    Ok((TypeName::new(name), &rest[1..]))
}

fn bad(descriptor: &str) -> ClassFormatError {
    ClassFormatError::BadDescriptor {
        descriptor: descriptor.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_descriptors() {
        assert_eq!(field_type("I"), Ok(TypeName::new("int")));
        assert_eq!(
            field_type("Ljava/lang/String;"),
            Ok(TypeName::new("java.lang.String"))
        );
        assert_eq!(field_type("[[J"), Ok(TypeName::new("long[][]")));
        assert_eq!(
            field_type("[Lcom/app/Outer$Inner;"),
            Ok(TypeName::new("com.app.Outer$Inner[]"))
        );
        assert!(field_type("Ljava/lang/String").is_err());
        assert!(field_type("II").is_err());
        assert!(field_type("V").is_err());
    }

    #[test]
    fn parses_method_descriptors() {
        let Ok((params, ret)) = method_type("(JLjava/util/List;[B)V") else {
            panic!("valid descriptor rejected");
        };
        assert_eq!(
            params,
            [
                TypeName::new("long"),
                TypeName::new("java.util.List"),
                TypeName::new("byte[]")
            ]
        );
        assert_eq!(ret, TypeName::new("void"));
        assert!(method_type("I)V").is_err());
    }

    #[test]
    fn encodes_descriptors() {
        let params = [TypeName::new("int[]"), TypeName::new("x.dto.OrderRq")];
        let descriptor = method_descriptor(&params, &TypeName::new("x.dto.OrderResponse"));
        assert_eq!(descriptor, "([ILx/dto/OrderRq;)Lx/dto/OrderResponse;");
        assert_eq!(method_type(&descriptor).map(|(p, _)| p), Ok(params.to_vec()));
    }

    #[test]
    fn converts_internal_names() {
        assert_eq!(
            internal_to_type("java/lang/Object"),
            Ok(TypeName::new("java.lang.Object"))
        );
        assert_eq!(
            internal_to_type("[Ljava/lang/Object;"),
            Ok(TypeName::new("java.lang.Object[]"))
        );
        assert_eq!(type_to_internal(&TypeName::new("a.b.C")), "a/b/C");
        assert_eq!(type_to_internal(&TypeName::new("a.b.C[]")), "[La/b/C;");
    }
}
