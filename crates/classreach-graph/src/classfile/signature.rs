//! Descriptor and generic signature scanning.
//!
//! Plain descriptors (`(ILjava/lang/String;)V`) are a subset of the generic
//! signature grammar, so one recursive-descent parser handles both. The
//! parser does not build a type tree; it only records every class name it
//! walks past, in internal form. Inner classes written as `Outer<T>.Inner`
//! are recorded under their binary name `Outer$Inner`.

use rustc_hash::FxHashSet;

use super::ClassParseError;

/// Scan a field or method descriptor (or signature); dispatch on the leading `(`.
pub(crate) fn scan_descriptor(
    descriptor: &str,
    names: &mut FxHashSet<String>,
) -> Result<(), ClassParseError> {
    if descriptor.starts_with('(') || (descriptor.starts_with('<') && descriptor.contains('(')) {
        scan_method_signature(descriptor, names)
    } else {
        scan_field_signature(descriptor, names)
    }
}

/// Scan a field signature or field descriptor. `V` is accepted so that
/// `void.class` literals in annotations pass through.
pub(crate) fn scan_field_signature(
    signature: &str,
    names: &mut FxHashSet<String>,
) -> Result<(), ClassParseError> {
    let mut parser = SignatureParser::new(signature, names);
    if parser.peek() == Some(b'V') {
        parser.pos += 1;
    } else {
        parser.java_type()?;
    }
    parser.finish()
}

/// Scan a method signature or method descriptor, including `^` throws clauses.
pub(crate) fn scan_method_signature(
    signature: &str,
    names: &mut FxHashSet<String>,
) -> Result<(), ClassParseError> {
    let mut parser = SignatureParser::new(signature, names);
    if parser.peek() == Some(b'<') {
        parser.type_parameters()?;
    }
    parser.expect(b'(')?;
    while parser.peek() != Some(b')') {
        parser.java_type()?;
    }
    parser.expect(b')')?;
    if parser.peek() == Some(b'V') {
        parser.pos += 1;
    } else {
        parser.java_type()?;
    }
    while parser.peek() == Some(b'^') {
        parser.pos += 1;
        parser.reference_type()?;
    }
    parser.finish()
}

/// Scan a class signature: type parameters, superclass and interfaces.
pub(crate) fn scan_class_signature(
    signature: &str,
    names: &mut FxHashSet<String>,
) -> Result<(), ClassParseError> {
    let mut parser = SignatureParser::new(signature, names);
    if parser.peek() == Some(b'<') {
        parser.type_parameters()?;
    }
    // Superclass is mandatory; interfaces follow until the end.
    parser.class_type()?;
    while parser.peek().is_some() {
        parser.class_type()?;
    }
    parser.finish()
}

struct SignatureParser<'a, 'n> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    names: &'n mut FxHashSet<String>,
}

impl<'a, 'n> SignatureParser<'a, 'n> {
    fn new(source: &'a str, names: &'n mut FxHashSet<String>) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            names,
        }
    }

    fn error(&self, reason: &str) -> ClassParseError {
        ClassParseError::InvalidDescriptor(format!("{reason} at {} in '{}'", self.pos, self.source))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), ClassParseError> {
        if self.peek() != Some(byte) {
            return Err(self.error(&format!("expected '{}'", byte as char)));
        }
        self.pos += 1;
        Ok(())
    }

    fn finish(&self) -> Result<(), ClassParseError> {
        if self.pos != self.bytes.len() {
            return Err(self.error("trailing characters"));
        }
        Ok(())
    }

    /// Identifier up to (not including) any of the signature delimiters.
    fn identifier(&mut self, allow_slash: bool) -> Result<&'a str, ClassParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'.' | b';' | b'[' | b'<' | b'>' | b':' => break,
                b'/' if !allow_slash => break,
                _ => self.pos += 1,
            }
        }
        if self.pos == start {
            return Err(self.error("empty identifier"));
        }
        Ok(&self.source[start..self.pos])
    }

    fn java_type(&mut self) -> Result<(), ClassParseError> {
        match self.peek() {
            Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => {
                self.pos += 1;
                Ok(())
            }
            _ => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<(), ClassParseError> {
        match self.peek() {
            Some(b'L') => self.class_type(),
            Some(b'T') => {
                self.pos += 1;
                self.identifier(false)?;
                self.expect(b';')
            }
            Some(b'[') => {
                self.pos += 1;
                self.java_type()
            }
            _ => Err(self.error("expected reference type")),
        }
    }

    fn class_type(&mut self) -> Result<(), ClassParseError> {
        self.expect(b'L')?;
        let mut binary_name = self.identifier(true)?.to_string();
        self.names.insert(binary_name.clone());
        if self.peek() == Some(b'<') {
            self.type_arguments()?;
        }
        while self.peek() == Some(b'.') {
            self.pos += 1;
            let inner = self.identifier(false)?;
            binary_name.push('$');
            binary_name.push_str(inner);
            self.names.insert(binary_name.clone());
            if self.peek() == Some(b'<') {
                self.type_arguments()?;
            }
        }
        self.expect(b';')
    }

    fn type_arguments(&mut self) -> Result<(), ClassParseError> {
        self.expect(b'<')?;
        loop {
            match self.peek() {
                Some(b'>') => break,
                Some(b'*') => self.pos += 1,
                Some(b'+' | b'-') => {
                    self.pos += 1;
                    self.reference_type()?;
                }
                Some(_) => self.reference_type()?,
                None => return Err(self.error("unterminated type arguments")),
            }
        }
        self.expect(b'>')
    }

    fn type_parameters(&mut self) -> Result<(), ClassParseError> {
        self.expect(b'<')?;
        while self.peek() != Some(b'>') {
            self.identifier(false)?;
            // Class bound may be empty (`T::Ljava/lang/Comparable;`).
            self.expect(b':')?;
            if !matches!(self.peek(), Some(b':' | b'>')) {
                self.reference_type()?;
            }
            while self.peek() == Some(b':') {
                self.pos += 1;
                self.reference_type()?;
            }
            if self.peek().is_none() {
                return Err(self.error("unterminated type parameters"));
            }
        }
        self.expect(b'>')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: FxHashSet<String>) -> Vec<String> {
        let mut v: Vec<_> = names.into_iter().collect();
        v.sort();
        v
    }

    fn method(sig: &str) -> Vec<String> {
        let mut names = FxHashSet::default();
        scan_method_signature(sig, &mut names).unwrap();
        sorted(names)
    }

    #[test]
    fn test_method_descriptor() {
        assert_eq!(
            method("(I[Ljava/lang/String;Lcom/example/Foo;)Lcom/example/Bar;"),
            vec!["com/example/Bar", "com/example/Foo", "java/lang/String"]
        );
        assert!(method("()V").is_empty());
    }

    #[test]
    fn test_generic_method_with_bounds_and_throws() {
        let names = method(
            "<T:Ljava/lang/Object;E:Ljava/lang/Exception;>(Ljava/util/List<+TT;>;)TT;^TE;^Lcom/example/Failure;",
        );
        assert_eq!(
            names,
            vec![
                "com/example/Failure",
                "java/lang/Exception",
                "java/lang/Object",
                "java/util/List"
            ]
        );
    }

    #[test]
    fn test_type_parameter_named_like_a_tag() {
        // `L` and `T` are legal type-parameter identifiers.
        let names = method("<L:Lcom/example/Base;T::Ljava/lang/Comparable<TT;>;>(TL;)V");
        assert_eq!(names, vec!["com/example/Base", "java/lang/Comparable"]);
    }

    #[test]
    fn test_class_signature_with_inner_suffix() {
        let mut names = FxHashSet::default();
        scan_class_signature(
            "<K:Ljava/lang/Object;>Lcom/example/Outer<TK;>.Inner<*>;Ljava/io/Serializable;",
            &mut names,
        )
        .unwrap();
        assert_eq!(
            sorted(names),
            vec![
                "com/example/Outer",
                "com/example/Outer$Inner",
                "java/io/Serializable",
                "java/lang/Object"
            ]
        );
    }

    #[test]
    fn test_field_signature_nested_generics() {
        let mut names = FxHashSet::default();
        scan_field_signature(
            "Ljava/util/Map<Ljava/lang/String;[Ljava/util/List<-Lcom/example/Item;>;>;",
            &mut names,
        )
        .unwrap();
        assert_eq!(
            sorted(names),
            vec!["com/example/Item", "java/lang/String", "java/util/List", "java/util/Map"]
        );
    }

    #[test]
    fn test_void_class_literal() {
        let mut names = FxHashSet::default();
        scan_field_signature("V", &mut names).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_malformed_signatures_fail() {
        let mut names = FxHashSet::default();
        assert!(scan_field_signature("Ljava/lang/String", &mut names).is_err());
        assert!(scan_method_signature("(I", &mut names).is_err());
        assert!(scan_field_signature("Ljava/util/List<Ljava/lang/String;;", &mut names).is_err());
        assert!(scan_field_signature("Q", &mut names).is_err());
    }

    #[test]
    fn test_scan_descriptor_dispatch() {
        let mut names = FxHashSet::default();
        scan_descriptor("(Lcom/example/A;)V", &mut names).unwrap();
        scan_descriptor("Lcom/example/B;", &mut names).unwrap();
        assert_eq!(sorted(names), vec!["com/example/A", "com/example/B"]);
    }
}
