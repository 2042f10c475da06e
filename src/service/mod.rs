pub mod accounts;
pub mod fields;
pub mod password;
pub mod records;

#[cfg(test)]
pub(crate) mod test_support;

pub use accounts::{Account, CredentialStore};
pub use records::{ManagedRecord, ManagedRecordStore};
