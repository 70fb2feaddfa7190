
/// A `X-PRE-PROCESS` variable from `vars.xml`.
///
/// Global variables are not scoped to a tenant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalVar {
    pub name: String,
    pub value: String,
    pub description: String,
}
