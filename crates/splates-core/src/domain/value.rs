//! Values carried by template data and globals.
//!
//! The wrappers ([`Text`], [`Html`], [`Attr`], [`Js`], [`Slot`]) are
//! immutable and decide their own escaping policy when converted to a string
//! through `Display`. The engine never inspects them beyond that.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{error::DomainError, escape};

// ── Wrappers ─────────────────────────────────────────────────────────────────

/// Text that is HTML-escaped when displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The unescaped value.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape::html(&self.0))
    }
}

/// Trusted markup, displayed as-is.
///
/// Never wrap user input in `Html`; use [`Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text escaped for attribute context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr(String);

impl Attr {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape::attr(&self.0))
    }
}

/// A JSON payload safe to embed in a `<script>` element.
///
/// Encoding is validated at construction; display hex-escapes the characters
/// that could close the script element or break out of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Js(serde_json::Value);

impl Js {
    pub fn new<T: Serialize + ?Sized>(value: &T) -> Result<Self, DomainError> {
        serde_json::to_value(value)
            .map(Self)
            .map_err(|e| DomainError::InvalidJsValue(e.to_string()))
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }
}

impl fmt::Display for Js {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        for c in encoded.chars() {
            match c {
                '<' => f.write_str("\\u003C")?,
                '>' => f.write_str("\\u003E")?,
                '&' => f.write_str("\\u0026")?,
                '\'' => f.write_str("\\u0027")?,
                // Quotes inside strings are already escaped by serde_json; the
                // remaining ones delimit JSON strings and must stay literal.
                other => fmt::Write::write_char(f, other)?,
            }
        }
        Ok(())
    }
}

/// Lazily produced content; the callback runs each time the slot is displayed.
#[derive(Clone)]
pub struct Slot(Arc<dyn Fn() -> String + Send + Sync>);

impl Slot {
    pub fn new(producer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(producer))
    }

    pub fn render(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slot(..)")
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A shared service object registered by the host.
///
/// Services are never escaped or converted; units downcast them back to
/// their concrete type.
#[derive(Clone)]
pub struct Service {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Service {
    pub fn new<T: Any + Send + Sync>(service: T) -> Self {
        Self::from_arc(Arc::new(service))
    }

    pub fn from_arc<T: Any + Send + Sync>(service: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: service,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service({})", self.type_name)
    }
}

// ── Value ────────────────────────────────────────────────────────────────────

/// A dynamically typed template value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Text(Text),
    Html(Html),
    Attr(Attr),
    Js(Js),
    Slot(Slot),
    Service(Service),
}

impl Value {
    pub fn service<T: Any + Send + Sync>(service: T) -> Self {
        Self::Service(Service::new(service))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The raw string for plain strings and text-like wrappers.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Text(t) => Some(t.raw()),
            Self::Attr(a) => Some(a.raw()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Service(s) => s.downcast(),
            _ => None,
        }
    }

    /// Wrap a plain string in [`Text`]; every other value is returned as-is.
    pub fn into_escaped(self) -> Self {
        match self {
            Self::Str(s) => Self::Text(Text(s)),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Text(t) => t.fmt(f),
            Self::Html(h) => h.fmt(f),
            Self::Attr(a) => a.fmt(f),
            Self::Js(j) => j.fmt(f),
            Self::Slot(s) => s.fmt(f),
            Self::Service(s) => write!(f, "[{}]", s.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Html(a), Self::Html(b)) => a == b,
            (Self::Attr(a), Self::Attr(b)) => a == b,
            (Self::Js(a), Self::Js(b)) => a == b,
            (Self::Slot(a), Self::Slot(b)) => Arc::ptr_eq(&a.0, &b.0),
            (Self::Service(a), Self::Service(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Text> for Value {
    fn from(t: Text) -> Self {
        Self::Text(t)
    }
}

impl From<Html> for Value {
    fn from(h: Html) -> Self {
        Self::Html(h)
    }
}

impl From<Attr> for Value {
    fn from(a: Attr) -> Self {
        Self::Attr(a)
    }
}

impl From<Js> for Value {
    fn from(j: Js) -> Self {
        Self::Js(j)
    }
}

impl From<Slot> for Value {
    fn from(s: Slot) -> Self {
        Self::Slot(s)
    }
}

impl From<Service> for Value {
    fn from(s: Service) -> Self {
        Self::Service(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_escapes_on_display() {
        let text = Text::new("<script>alert(\"XSS\")</script>");
        assert_eq!(
            text.to_string(),
            "&lt;script&gt;alert(&quot;XSS&quot;)&lt;/script&gt;"
        );
        assert_eq!(Text::new("<b>Bold</b>").raw(), "<b>Bold</b>");
    }

    #[test]
    fn html_is_passthrough() {
        assert_eq!(Html::trusted("<b>Bold</b>").to_string(), "<b>Bold</b>");
    }

    #[test]
    fn attr_escapes_quotes() {
        assert_eq!(
            Attr::new("\" onclick=\"x").to_string(),
            "&quot; onclick=&quot;x"
        );
    }

    #[test]
    fn js_hex_escapes_markup() {
        let js = Js::new("</script><script>alert('x')").unwrap();
        let out = js.to_string();
        assert!(!out.contains('<'));
        assert!(!out.contains('\''));
        assert!(out.starts_with('"'));
    }

    #[test]
    fn slot_is_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let slot = Slot::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "body".to_string()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(slot.to_string(), "body");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn escaping_wraps_only_plain_strings() {
        assert!(matches!(Value::from("<b>").into_escaped(), Value::Text(_)));
        assert!(matches!(Value::Int(3).into_escaped(), Value::Int(3)));
        assert!(matches!(
            Value::service(String::from("svc")).into_escaped(),
            Value::Service(_)
        ));
    }

    #[test]
    fn services_downcast_to_their_type() {
        struct Clock(u32);
        let value = Value::service(Clock(7));
        assert_eq!(value.downcast::<Clock>().map(|c| c.0), Some(7));
        assert!(value.downcast::<String>().is_none());
    }
}
