//! HTML escaping.
//!
//! Two fixed policies are used across the engine:
//!
//! | Char | [`html`]  | [`attr`]  |
//! |------|-----------|-----------|
//! | `&`  | `&amp;`   | `&amp;`   |
//! | `<`  | `&lt;`    | `&lt;`    |
//! | `>`  | `&gt;`    | `&gt;`    |
//! | `"`  | `&quot;`  | `&quot;`  |
//! | `'`  | `&#039;`  | `&apos;`  |
//!
//! Input is always valid UTF-8 (`&str`), so no substitution pass is needed.

use std::borrow::Cow;

const HTML_TABLE: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
];

const ATTR_TABLE: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&apos;"),
];

/// Escape for HTML text context.
pub fn html(value: &str) -> Cow<'_, str> {
    replace_with(value, &HTML_TABLE)
}

/// Escape for HTML attribute context.
pub fn attr(value: &str) -> Cow<'_, str> {
    replace_with(value, &ATTR_TABLE)
}

fn replace_with<'a>(value: &'a str, table: &[(char, &str); 5]) -> Cow<'a, str> {
    let Some(first) = value.find(|c| table.iter().any(|(from, _)| *from == c)) else {
        return Cow::Borrowed(value);
    };

    let mut out = String::with_capacity(value.len() + 16);
    out.push_str(&value[..first]);

    for c in value[first..].chars() {
        match table.iter().find(|(from, _)| *from == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Scalars accepted by the escaper.
pub trait Escapable {
    fn to_raw(&self) -> Cow<'_, str>;
}

impl Escapable for str {
    fn to_raw(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Escapable for String {
    fn to_raw(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl Escapable for bool {
    fn to_raw(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }
}

macro_rules! escapable_number {
    ($($ty:ty),*) => {
        $(
            impl Escapable for $ty {
                fn to_raw(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

escapable_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Escapable + ?Sized> Escapable for &T {
    fn to_raw(&self) -> Cow<'_, str> {
        (**self).to_raw()
    }
}

/// Convert a scalar to a string and HTML-escape it.
pub fn escape<T: Escapable + ?Sized>(value: &T) -> String {
    html(&value.to_raw()).into_owned()
}
