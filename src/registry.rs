//! Interface to an external Windows registry hive parser.
//!
//! No hive parser ships with this crate and the disk analysis never uses this
//! module. Lookups return `Option` so that a missing key or value is an
//! ordinary outcome.

use std::fmt::{self, Display};

/// A scalar registry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValue {
    String(String),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
}

impl Display for RegistryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryValue::String(s) => write!(f, "{s}"),
            RegistryValue::Dword(v) => write!(f, "{v}"),
            RegistryValue::Qword(v) => write!(f, "{v}"),
            RegistryValue::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// A key of an opened hive.
pub trait RegistryKey: Sized {
    fn name(&self) -> &str;
    fn value(&self, name: &str) -> Option<RegistryValue>;
    fn subkeys(&self) -> Vec<Self>;
}

/// An opened registry hive.
pub trait RegistryHive {
    type Key: RegistryKey;

    /// Opens the key at a backslash-separated path, e.g. `SAM\Domains\Account\Users\Names`.
    fn open(&self, path: &str) -> Option<Self::Key>;
}

/// Returns the names of the subkeys of `key`, sorted.
pub fn sorted_subkey_names<K: RegistryKey>(key: &K) -> Vec<String> {
    let mut names: Vec<String> = key.subkeys().iter().map(|k| k.name().to_string()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct MemKey {
        name: String,
        values: Vec<(String, RegistryValue)>,
        children: Vec<MemKey>,
    }

    impl RegistryKey for MemKey {
        fn name(&self) -> &str {
            &self.name
        }

        fn value(&self, name: &str) -> Option<RegistryValue> {
            self.values
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        }

        fn subkeys(&self) -> Vec<Self> {
            self.children.clone()
        }
    }

    struct MemHive(MemKey);

    impl RegistryHive for MemHive {
        type Key = MemKey;

        fn open(&self, path: &str) -> Option<MemKey> {
            path.split('\\').try_fold(self.0.clone(), |key, part| {
                key.children.into_iter().find(|k| k.name == part)
            })
        }
    }

    fn key(name: &str, children: Vec<MemKey>) -> MemKey {
        MemKey {
            name: name.to_string(),
            values: vec![],
            children,
        }
    }

    #[test]
    fn lists_user_names_sorted() {
        let hive = MemHive(key(
            "",
            vec![key(
                "Names",
                vec![key("zoe", vec![]), key("Administrator", vec![]), key("bob", vec![])],
            )],
        ));

        let names = sorted_subkey_names(&hive.open("Names").unwrap());

        assert_eq!(names, vec!["Administrator", "bob", "zoe"]);
        assert!(hive.open("Names\\missing").is_none());
    }

    #[test]
    fn missing_value_is_none() {
        let mut version = key("CurrentVersion", vec![]);
        version.values.push((
            "ProductName".to_string(),
            RegistryValue::String("Windows 7 Professional".to_string()),
        ));

        assert_eq!(
            version.value("ProductName").map(|v| v.to_string()),
            Some("Windows 7 Professional".to_string())
        );
        assert_eq!(version.value("CSDVersion"), None);
        assert_eq!(RegistryValue::Binary(vec![0xde, 0xad]).to_string(), "dead");
    }
}
