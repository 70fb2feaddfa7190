
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub phone_number: String,
}
