
/// A name/value pair taken from a `<param>`-style element.
///
/// `order` is the 0-based position among its siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: String,
    pub order: i32,
}

impl Setting {
    pub fn new(name: impl Into<String>, value: impl Into<String>, order: i32) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            order,
        }
    }
}
