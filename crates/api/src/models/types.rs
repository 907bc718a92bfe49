use super::util::serde_arc_str;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Fully-qualified, dot-separated type name (e.g. `com.acme.RedWidget`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its package, and without any enclosing types
    /// (`com.acme.Outer$DefaultInner` -> `DefaultInner`).
    pub fn simple_name(&self) -> &str {
        let name: &str = &self.0;
        let tail = name.rsplit('.').next().unwrap_or(name);
        tail.rsplit('$').next().unwrap_or(tail)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl Serialize for TypeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_arc_str::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for TypeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_arc_str::deserialize(deserializer).map(Self)
    }
}

/// A possibly parameterized type signature, e.g. `javax.inject.Provider<com.acme.Widget>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub raw: TypeName,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn raw(raw: impl Into<TypeName>) -> Self {
        Self {
            raw: raw.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(raw: impl Into<TypeName>, args: Vec<TypeRef>) -> Self {
        Self {
            raw: raw.into(),
            args,
        }
    }

    pub fn parse(signature: &str) -> ApiResult<Self> {
        signature.parse()
    }

    pub fn is_raw(&self, name: &str) -> bool {
        self.raw.as_str() == name
    }
}

impl From<TypeName> for TypeRef {
    fn from(raw: TypeName) -> Self {
        Self::raw(raw)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({self})")
    }
}

impl FromStr for TypeRef {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = SignatureParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
}

impl SignatureParser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, reason: &str) -> ApiError {
        ApiError::InvalidSignature {
            signature: self.input.to_string(),
            reason: format!("{reason} at offset {}", self.pos),
        }
    }

    fn parse_type(&mut self) -> ApiResult<TypeRef> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '<' | '>' | ',') || c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        let raw = TypeName::new(&self.input[start..self.pos]);

        self.skip_whitespace();
        let mut args = Vec::new();
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(self.error("expected `,` or `>`")),
                }
            }
        }

        Ok(TypeRef { raw, args })
    }
}
